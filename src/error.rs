use std::path::PathBuf;

/// Errors produced by the match engine.
///
/// An invalid regular expression is the only failure a search can have.
/// "No matches" and "no further match" are ordinary results, not errors.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("Invalid search pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("could not read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
