/// Document model subsystem - text storage, position math and search sessions
///
/// This module owns the editor's text buffer, its line cache and selection,
/// and the find/replace session state driven by the UI layer.

pub mod document;
pub mod search_state;
pub mod text_buffer;

// Re-export main types for convenience
pub use document::{Document, LineEnding};
pub use search_state::{Navigation, SearchDirection, SearchPhase, SearchSession};
pub use text_buffer::TextBuffer;
