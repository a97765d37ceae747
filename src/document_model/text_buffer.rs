use super::document::LineEnding;

/// Backing store for a [`Document`](super::Document).
///
/// Holds the raw text together with its line cache. The cache is rebuilt on
/// every `set_text`, so line queries always reflect the current text.
/// Offsets are character offsets (Unicode scalar values), not bytes.
#[derive(Debug, Clone)]
pub struct TextBuffer {
    text: String,
    lines: Vec<String>,
    line_lengths: Vec<usize>,
    char_len: usize,
    line_ending: LineEnding,
}

impl TextBuffer {
    pub fn new() -> Self {
        Self::from_string(String::new())
    }

    pub fn from_string(content: String) -> Self {
        let mut buffer = Self {
            text: String::new(),
            lines: Vec::new(),
            line_lengths: Vec::new(),
            char_len: 0,
            line_ending: LineEnding::system_default(),
        };
        buffer.set_text(content);
        buffer
    }

    pub fn set_text(&mut self, content: String) {
        self.lines = split_lines(&content);
        self.line_lengths = self.lines.iter().map(|line| line.chars().count()).collect();
        self.char_len = content.chars().count();
        self.text = content;
    }

    pub fn get_text(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn char_len(&self) -> usize {
        self.char_len
    }

    pub fn get_line(&self, line_number: usize) -> Option<&str> {
        self.lines.get(line_number).map(String::as_str)
    }

    pub fn get_lines(&self) -> &[String] {
        &self.lines
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn line_length(&self, line_number: usize) -> usize {
        self.line_lengths.get(line_number).copied().unwrap_or(0)
    }

    pub fn line_lengths(&self) -> &[usize] {
        &self.line_lengths
    }

    pub fn line_ending(&self) -> LineEnding {
        self.line_ending
    }

    pub fn set_line_ending(&mut self, line_ending: LineEnding) {
        self.line_ending = line_ending;
    }

    /// Characters in `[start, end)`, clamped to the buffer.
    pub fn substring(&self, start: usize, end: usize) -> String {
        let end = end.min(self.char_len);
        if start >= end {
            return String::new();
        }
        self.text.chars().skip(start).take(end - start).collect()
    }

    pub fn replace(&mut self, start: usize, length: usize, replacement: &str) {
        let start_byte = byte_index(&self.text, start);
        let end_byte = byte_index(&self.text, start.saturating_add(length));
        let mut text = std::mem::take(&mut self.text);
        text.replace_range(start_byte..end_byte, replacement);
        self.set_text(text);
    }
}

impl Default for TextBuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// Split on `\r\n`, `\r` and `\n`. `\r\n` wins over a lone `\r` at the same
/// position. A trailing terminator yields a trailing empty line, and the
/// empty string yields one empty line.
pub fn split_lines(text: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                lines.push(std::mem::take(&mut current));
            }
            '\n' => lines.push(std::mem::take(&mut current)),
            _ => current.push(ch),
        }
    }

    lines.push(current);
    lines
}

/// Byte index of the `char_offset`-th character, or `text.len()` past the end.
pub fn byte_index(text: &str, char_offset: usize) -> usize {
    text.char_indices()
        .nth(char_offset)
        .map_or(text.len(), |(byte, _)| byte)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_buffer() {
        let buffer = TextBuffer::new();
        assert!(buffer.is_empty());
        assert_eq!(buffer.line_count(), 1);
        assert_eq!(buffer.get_line(0), Some(""));
    }

    #[test]
    fn test_split_mixed_terminators() {
        assert_eq!(split_lines("a\r\nb\rc\nd"), vec!["a", "b", "c", "d"]);
        assert_eq!(split_lines("a\n"), vec!["a", ""]);
        assert_eq!(split_lines("\r\r\n"), vec!["", "", ""]);
    }

    #[test]
    fn test_cache_follows_text() {
        let mut buffer = TextBuffer::from_string("Line 1\nLine 2\nLine 3".to_string());
        assert_eq!(buffer.line_count(), 3);
        assert_eq!(buffer.get_line(1), Some("Line 2"));

        buffer.set_text("only".to_string());
        assert_eq!(buffer.line_count(), 1);
        assert_eq!(buffer.get_line(1), None);
        assert_eq!(buffer.line_length(0), 4);
    }

    #[test]
    fn test_char_offsets_with_multibyte_text() {
        let mut buffer = TextBuffer::from_string("héllo wörld".to_string());
        assert_eq!(buffer.char_len(), 11);
        assert_eq!(buffer.substring(6, 11), "wörld");

        buffer.replace(1, 1, "e");
        assert_eq!(buffer.get_text(), "hello wörld");
    }

    #[test]
    fn test_substring_clamps() {
        let buffer = TextBuffer::from_string("abc".to_string());
        assert_eq!(buffer.substring(1, 99), "bc");
        assert_eq!(buffer.substring(5, 9), "");
    }

    #[test]
    fn test_byte_index() {
        assert_eq!(byte_index("añb", 2), 3);
        assert_eq!(byte_index("añb", 3), 4);
        assert_eq!(byte_index("añb", 10), 4);
    }
}
