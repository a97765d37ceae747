//! Document position model and find/replace engine for a plain-text editor.
//!
//! [`Document`] owns the text, its line cache and the selection, and maps
//! between character offsets and line/column positions. [`MatchEngine`]
//! finds, navigates and replaces matches in plain strings, and
//! [`SearchSession`] drives it the way a find/replace dialog does.

pub mod config;
pub mod document_model;
pub mod error;
pub mod recent;
pub mod search;
pub mod view;

pub use document_model::{Document, LineEnding, Navigation, SearchPhase, SearchSession};
pub use error::{ConfigError, SearchError};
pub use search::{MatchEngine, MatchInfo, SearchOptions};
