/// View subsystem - terminal rendering of search results
///
/// Turns match lists into printable rows, with optional highlight colours,
/// independent of how the caller obtained the text.

pub mod renderer;

// Re-export public interface
pub use renderer::{MatchListView, highlight_line, truncate_to_width};
