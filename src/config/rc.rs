use crate::document_model::LineEnding;
use crate::error::ConfigError;
use crate::search::SearchOptions;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const RC_FILE_NAME: &str = ".padfindrc";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RcConfig {
    pub match_case: bool,
    pub whole_word: bool,
    pub use_regex: bool,
    pub wrap_around: bool,
    /// Fixed terminator for position math; `None` detects it per file.
    pub line_ending: Option<LineEnding>,
}

impl Default for RcConfig {
    fn default() -> Self {
        Self {
            match_case: false,
            whole_word: false,
            use_regex: false,
            wrap_around: true,
            line_ending: None,
        }
    }
}

impl RcConfig {
    pub fn search_options(&self) -> SearchOptions {
        SearchOptions {
            case_sensitive: self.match_case,
            use_regex: self.use_regex,
            whole_word: self.whole_word,
        }
    }
}

pub struct RcLoader;

impl RcLoader {
    /// Get the path to the RC file
    /// Looks for .padfindrc in:
    /// 1. Current directory
    /// 2. Home directory (~/.padfindrc)
    pub fn get_rc_path() -> Option<PathBuf> {
        let current_rc = Path::new(RC_FILE_NAME);
        if current_rc.exists() {
            return Some(current_rc.to_path_buf());
        }

        if let Ok(home) = env::var("HOME") {
            let home_rc = Path::new(&home).join(RC_FILE_NAME);
            if home_rc.exists() {
                return Some(home_rc);
            }
        }

        None
    }

    /// Load the RC file if there is one. Unreadable files fall back to defaults.
    pub fn load_config() -> RcConfig {
        let Some(rc_path) = Self::get_rc_path() else {
            debug!("no rc file found, using defaults");
            return RcConfig::default();
        };

        Self::load_from(&rc_path).unwrap_or_else(|e| {
            warn!("{e}; using default settings");
            RcConfig::default()
        })
    }

    /// Load a specific RC file.
    pub fn load_from(path: &Path) -> Result<RcConfig, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "loaded rc file");

        let mut config = RcConfig::default();
        Self::parse_config_content(&content, &mut config);
        Ok(config)
    }

    fn parse_config_content(content: &str, config: &mut RcConfig) {
        for line in content.lines() {
            let line = line.trim();

            // Skip empty lines and comments
            if line.is_empty() || line.starts_with('#') || line.starts_with('"') {
                continue;
            }

            Self::parse_config_line(line, config);
        }
    }

    fn parse_config_line(line: &str, config: &mut RcConfig) {
        // Remove inline comments
        let line = match line.find('#') {
            Some(pos) => &line[..pos],
            None => line,
        }
        .trim();

        if let Some(stripped) = line.strip_prefix("set ") {
            let setting = stripped.trim();

            if let Some(value) = setting.strip_prefix("fileformat=") {
                if let Some(line_ending) = LineEnding::from_name(value) {
                    config.line_ending = Some(line_ending);
                }
                return;
            }

            let (name, enabled) = match setting.strip_prefix("no") {
                Some(name) if Self::flag(config, name).is_some() => (name, false),
                _ => (setting, true),
            };
            match Self::flag(config, name) {
                Some(flag) => *flag = enabled,
                None => debug!(setting, "ignoring unknown rc setting"),
            }
        } else if let Some((key, value)) = line.split_once('=') {
            let key = key.trim();
            let value = value.trim();

            match key {
                "fileformat" | "line_ending" => {
                    if let Some(line_ending) = LineEnding::from_name(value) {
                        config.line_ending = Some(line_ending);
                    }
                }
                _ => match Self::flag(config, key) {
                    Some(flag) => *flag = matches!(value, "true" | "1" | "yes"),
                    None => debug!(key, "ignoring unknown rc setting"),
                },
            }
        }
    }

    fn flag<'a>(config: &'a mut RcConfig, name: &str) -> Option<&'a mut bool> {
        match name {
            "matchcase" | "match_case" => Some(&mut config.match_case),
            "wholeword" | "whole_word" => Some(&mut config.whole_word),
            "regex" | "use_regex" => Some(&mut config.use_regex),
            "wrapscan" | "wrap_around" => Some(&mut config.wrap_around),
            _ => None,
        }
    }

    /// Generate a sample RC file content
    pub fn generate_sample_rc() -> String {
        r#"# padfind configuration file (.padfindrc)
# Lines starting with # or " are comments

# Search defaults
set nomatchcase        # Case-insensitive search (or set matchcase)
set nowholeword        # Match inside words too (or set wholeword)
set noregex            # Literal patterns (or set regex)
set wrapscan           # Wrap find next/previous around the document

# Line ending used for line/column math: unix, dos, or mac.
# Detected from each file when unset.
set fileformat=dos

# Alternative key=value syntax:
# match_case=true
# whole_word=false
# use_regex=false
# wrap_around=true
# line_ending=unix
"#
        .to_string()
    }
}
