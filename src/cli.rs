use clap::{Args, Parser, Subcommand};
use padfind::SearchOptions;
use std::path::PathBuf;

/// padfind - find, replace and locate text the way a Notepad dialog does.
#[derive(Parser, Debug)]
#[command(name = "padfind", version, about)]
pub struct Cli {
    /// Config file path override.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level override (debug, info, warn, error).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// Search flags; each one turns an option on over the config defaults.
#[derive(Args, Debug, Clone, Copy, Default)]
pub struct SearchFlags {
    /// Match case.
    #[arg(short = 'c', long)]
    pub match_case: bool,

    /// Only match whole words (ignored with --regex).
    #[arg(short = 'w', long)]
    pub whole_word: bool,

    /// Treat the pattern as a regular expression.
    #[arg(short = 'r', long)]
    pub regex: bool,
}

impl SearchFlags {
    pub fn apply(&self, defaults: SearchOptions) -> SearchOptions {
        SearchOptions {
            case_sensitive: defaults.case_sensitive || self.match_case,
            use_regex: defaults.use_regex || self.regex,
            whole_word: defaults.whole_word || self.whole_word,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List every match and select the next (or previous) one from an offset.
    Find {
        file: PathBuf,
        pattern: String,

        #[command(flatten)]
        flags: SearchFlags,

        /// Caret offset, in characters, to search from.
        #[arg(long, default_value_t = 0)]
        from: usize,

        /// Search backwards from the caret.
        #[arg(long)]
        prev: bool,

        /// Stop at the end of the document instead of wrapping around.
        #[arg(long)]
        no_wrap: bool,

        /// Never colour the output.
        #[arg(long)]
        no_color: bool,
    },

    /// Replace every match and print the result.
    Replace {
        file: PathBuf,
        pattern: String,
        replacement: String,

        #[command(flatten)]
        flags: SearchFlags,

        /// Write the result back to FILE instead of printing it.
        #[arg(long)]
        in_place: bool,
    },

    /// Convert between a character offset and a line/column position.
    Position {
        file: PathBuf,

        #[arg(long, conflicts_with_all = ["line", "column"])]
        offset: Option<usize>,

        /// 1-based line number.
        #[arg(long, requires = "column")]
        line: Option<usize>,

        /// 0-based column.
        #[arg(long, requires = "line")]
        column: Option<usize>,
    },
}

pub fn parse() -> Cli {
    Cli::parse()
}
