use super::text_buffer::TextBuffer;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineEnding {
    Unix,    // \n (LF)
    Windows, // \r\n (CRLF)
    Mac,     // \r (CR)
}

impl LineEnding {
    pub fn system_default() -> Self {
        if cfg!(windows) {
            LineEnding::Windows
        } else {
            LineEnding::Unix
        }
    }

    pub fn detect(content: &str) -> Self {
        if content.contains("\r\n") {
            LineEnding::Windows
        } else if content.contains('\r') {
            LineEnding::Mac
        } else {
            LineEnding::Unix
        }
    }

    /// Parse the `fileformat` names used in rc files.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "unix" => Some(LineEnding::Unix),
            "dos" => Some(LineEnding::Windows),
            "mac" => Some(LineEnding::Mac),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LineEnding::Unix => "\n",
            LineEnding::Windows => "\r\n",
            LineEnding::Mac => "\r",
        }
    }

    pub fn terminator_len(&self) -> usize {
        self.as_str().len()
    }
}

/// An editable text document with a selection.
///
/// Position math (`line_number_at_offset`, `column_at_offset`,
/// `offset_at_position`) counts every line as its content length plus the
/// length of `line_ending`, whatever terminator the line actually ends with.
/// A document whose real terminators differ from `line_ending` reports
/// drifting positions past the first mismatched line.
#[derive(Debug, Clone)]
pub struct Document {
    pub file_path: Option<PathBuf>,
    pub modified: bool,
    text_buffer: TextBuffer,
    selection_start: usize,
    selection_length: usize,
}

impl Document {
    pub fn new() -> Self {
        Self {
            file_path: None,
            modified: false,
            text_buffer: TextBuffer::new(),
            selection_start: 0,
            selection_length: 0,
        }
    }

    pub fn with_line_ending(line_ending: LineEnding) -> Self {
        let mut document = Self::new();
        document.set_line_ending(line_ending);
        document
    }

    /// A document holding `text`, not marked modified.
    pub fn from_text(text: impl Into<String>, line_ending: LineEnding) -> Self {
        let mut document = Self::with_line_ending(line_ending);
        document.text_buffer.set_text(text.into());
        document
    }

    pub fn text(&self) -> &str {
        self.text_buffer.get_text()
    }

    /// Replace the whole buffer. The selection is clamped to the new text.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text_buffer.set_text(text.into());
        self.modified = true;
        self.set_selection(self.selection_start, self.selection_length);
    }

    pub fn line_ending(&self) -> LineEnding {
        self.text_buffer.line_ending()
    }

    pub fn set_line_ending(&mut self, line_ending: LineEnding) {
        self.text_buffer.set_line_ending(line_ending);
    }

    pub fn file_name(&self) -> String {
        self.file_path
            .as_deref()
            .and_then(Path::file_name)
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn mark_saved(&mut self) {
        self.modified = false;
    }

    pub fn char_len(&self) -> usize {
        self.text_buffer.char_len()
    }

    pub fn total_lines(&self) -> usize {
        self.text_buffer.line_count()
    }

    pub fn get_line(&self, index: usize) -> Option<&str> {
        self.text_buffer.get_line(index)
    }

    pub fn lines(&self) -> &[String] {
        self.text_buffer.get_lines()
    }

    pub fn selection_start(&self) -> usize {
        self.selection_start
    }

    pub fn selection_length(&self) -> usize {
        self.selection_length
    }

    pub fn caret_index(&self) -> usize {
        self.selection_start
    }

    pub fn set_selection(&mut self, start: usize, length: usize) {
        let len = self.char_len();
        self.selection_start = start.min(len);
        self.selection_length = length.min(len - self.selection_start);
    }

    pub fn set_caret(&mut self, offset: usize) {
        self.set_selection(offset, 0);
    }

    pub fn selected_text(&self) -> String {
        if self.selection_length == 0 {
            return String::new();
        }
        self.text_buffer
            .substring(self.selection_start, self.selection_start + self.selection_length)
    }

    pub fn current_line_number(&self) -> usize {
        self.line_number_at_offset(self.selection_start)
    }

    pub fn caret_column_index(&self) -> usize {
        self.column_at_offset(self.selection_start)
    }

    pub fn current_line_text(&self) -> &str {
        self.current_line_number()
            .checked_sub(1)
            .and_then(|index| self.text_buffer.get_line(index))
            .unwrap_or("")
    }

    /// 1-based line containing `offset`. An offset past the last line yields
    /// `total_lines() + 1`.
    pub fn line_number_at_offset(&self, offset: usize) -> usize {
        if self.text_buffer.is_empty() {
            return 1;
        }

        let terminator = self.line_ending().terminator_len();
        let mut position = 0;
        for (index, &length) in self.text_buffer.line_lengths().iter().enumerate() {
            if offset <= position + length {
                return index + 1;
            }
            position += length + terminator;
        }
        self.total_lines() + 1
    }

    /// 0-based column of `offset` within its line, or 0 past the end.
    pub fn column_at_offset(&self, offset: usize) -> usize {
        if offset == 0 {
            return 0;
        }

        let terminator = self.line_ending().terminator_len();
        let mut position = 0;
        for &length in self.text_buffer.line_lengths() {
            let span = length + terminator;
            if offset <= position + span {
                return offset - position;
            }
            position += span;
        }
        0
    }

    /// Offset of (`line_number`, `column`). Out-of-range lines give 0 and the
    /// column is clamped to the line's length.
    pub fn offset_at_position(&self, line_number: usize, column: usize) -> usize {
        if line_number == 0 || line_number > self.total_lines() {
            return 0;
        }

        let terminator = self.line_ending().terminator_len();
        let preceding: usize = self.text_buffer.line_lengths()[..line_number - 1]
            .iter()
            .map(|length| length + terminator)
            .sum();
        preceding + column.min(self.text_buffer.line_length(line_number - 1))
    }

    /// Remove the caret's line, including its terminator unless it is the
    /// last line, and return the removed text. The caret moves to the start
    /// of the removed span. Returns `None` when the line's computed start
    /// lies past the end of the text, which mismatched terminators can cause.
    pub fn cut_current_line(&mut self) -> Option<String> {
        let line_number = self.current_line_number();
        let index = line_number.checked_sub(1)?;
        if index >= self.total_lines() {
            return None;
        }

        let start = self.offset_at_position(line_number, 0);
        if start > self.char_len() {
            return None;
        }
        let mut length = self.text_buffer.line_length(index);
        if index < self.total_lines() - 1 {
            length += self.line_ending().terminator_len();
        }
        let end = (start + length).min(self.char_len());

        let removed = self.text_buffer.substring(start, end);
        self.text_buffer.replace(start, end - start, "");
        self.modified = true;
        self.set_caret(start);
        Some(removed)
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}
