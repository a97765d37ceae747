use crate::document_model::text_buffer::byte_index;
use crate::error::SearchError;
use regex::{Regex, RegexBuilder};
use std::fmt;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchOptions {
    pub case_sensitive: bool,
    pub use_regex: bool,
    /// Plain mode only; regex patterns are matched as written.
    pub whole_word: bool,
}

/// A single match, positioned in characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchInfo {
    pub offset: usize,
    pub length: usize,
    /// 1-based line of `offset`, following the text's own terminators.
    pub line: usize,
    /// 1-based column of `offset` within `line`.
    pub column: usize,
    /// The containing line, trimmed.
    pub preview: String,
}

impl MatchInfo {
    pub fn end(&self) -> usize {
        self.offset + self.length
    }

    pub fn location(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for MatchInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ln {}, Col {}", self.line, self.column)
    }
}

pub struct MatchEngine;

impl MatchEngine {
    /// Every match of `pattern` in `text`, in ascending offset order.
    ///
    /// An empty pattern matches nothing. In plain mode matches never
    /// overlap; a whole-word candidate that touches an alphanumeric
    /// character is skipped and the scan resumes one character later.
    pub fn find_all(
        text: &str,
        pattern: &str,
        options: &SearchOptions,
    ) -> Result<Vec<MatchInfo>, SearchError> {
        if pattern.is_empty() {
            return Ok(Vec::new());
        }

        let regex = Self::compile(pattern, options)?;
        let spans = if options.use_regex {
            regex
                .find_iter(text)
                .map(|m| (m.start(), m.end()))
                .collect()
        } else {
            Self::literal_spans(&regex, text, options.whole_word)
        };

        let lines = LineIndex::new(text);
        let mut cursor = CharCursor::new(text);
        let matches: Vec<MatchInfo> = spans
            .into_iter()
            .map(|(start, end)| {
                let offset = cursor.advance_to(start);
                let length = cursor.advance_to(end) - offset;
                let (line, column) = lines.location(text, start);
                MatchInfo {
                    offset,
                    length,
                    line: line + 1,
                    column,
                    preview: lines.line_text(text, line).trim().to_string(),
                }
            })
            .collect();

        debug!(pattern, ?options, count = matches.len(), "search complete");
        Ok(matches)
    }

    /// Index of the first match after `current_offset`.
    pub fn find_next(
        current_offset: usize,
        matches: &[MatchInfo],
        wrap_around: bool,
    ) -> Option<usize> {
        matches
            .iter()
            .position(|m| m.offset > current_offset)
            .or_else(|| (wrap_around && !matches.is_empty()).then_some(0))
    }

    /// Index of the last match before `current_offset`.
    pub fn find_previous(
        current_offset: usize,
        matches: &[MatchInfo],
        wrap_around: bool,
    ) -> Option<usize> {
        matches
            .iter()
            .rposition(|m| m.offset < current_offset)
            .or_else(|| {
                if wrap_around {
                    matches.len().checked_sub(1)
                } else {
                    None
                }
            })
    }

    /// Whether the selection is the text a replace should act on.
    pub fn selection_matches(selected: &str, pattern: &str, case_sensitive: bool) -> bool {
        if case_sensitive {
            selected == pattern
        } else {
            selected.to_lowercase() == pattern.to_lowercase()
        }
    }

    pub fn replace_one(text: &str, offset: usize, length: usize, replacement: &str) -> String {
        let start = byte_index(text, offset);
        let end = byte_index(text, offset.saturating_add(length));

        let mut result = String::with_capacity(text.len() - (end - start) + replacement.len());
        result.push_str(&text[..start]);
        result.push_str(replacement);
        result.push_str(&text[end..]);
        result
    }

    /// Replace every span in `matches`, working from the highest offset down
    /// so lower offsets stay valid. Returns the new text and the count.
    pub fn replace_all(text: &str, matches: &[MatchInfo], replacement: &str) -> (String, usize) {
        let mut spans: Vec<(usize, usize)> = matches.iter().map(|m| (m.offset, m.end())).collect();
        spans.sort_unstable();

        let mut cursor = ByteCursor::new(text);
        let byte_spans: Vec<(usize, usize)> = spans
            .iter()
            .map(|&(start, end)| (cursor.advance_to(start), cursor.advance_to(end)))
            .collect();

        let mut result = text.to_string();
        for &(start, end) in byte_spans.iter().rev() {
            result.replace_range(start..end, replacement);
        }
        (result, byte_spans.len())
    }

    fn compile(pattern: &str, options: &SearchOptions) -> Result<Regex, SearchError> {
        let source = if options.use_regex {
            pattern.to_string()
        } else {
            regex::escape(pattern)
        };

        RegexBuilder::new(&source)
            .case_insensitive(!options.case_sensitive)
            .build()
            .map_err(|source| {
                warn!(pattern, "invalid search pattern");
                SearchError::InvalidPattern {
                    pattern: pattern.to_string(),
                    source,
                }
            })
    }

    fn literal_spans(regex: &Regex, text: &str, whole_word: bool) -> Vec<(usize, usize)> {
        let mut spans = Vec::new();
        let mut at = 0;

        while at < text.len() {
            let Some(m) = regex.find_at(text, at) else {
                break;
            };

            if whole_word && !is_whole_word(text, m.start(), m.end()) {
                at = m.start() + text[m.start()..].chars().next().map_or(1, char::len_utf8);
                continue;
            }

            spans.push((m.start(), m.end()));
            at = m.end().max(m.start() + 1);
        }

        spans
    }
}

fn is_whole_word(text: &str, start: usize, end: usize) -> bool {
    let before = text[..start].chars().next_back();
    let after = text[end..].chars().next();
    !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
}

/// Byte offsets of line starts, honouring each line's own terminator.
struct LineIndex {
    starts: Vec<usize>,
}

impl LineIndex {
    fn new(text: &str) -> Self {
        let bytes = text.as_bytes();
        let mut starts = vec![0];
        let mut i = 0;
        while i < bytes.len() {
            match bytes[i] {
                b'\r' if bytes.get(i + 1) == Some(&b'\n') => {
                    i += 2;
                    starts.push(i);
                }
                b'\r' | b'\n' => {
                    i += 1;
                    starts.push(i);
                }
                _ => i += 1,
            }
        }
        Self { starts }
    }

    /// 0-based line and 1-based column of a byte offset.
    fn location(&self, text: &str, byte: usize) -> (usize, usize) {
        let line = self.starts.partition_point(|&start| start <= byte) - 1;
        let column = text[self.starts[line]..byte].chars().count() + 1;
        (line, column)
    }

    fn line_text<'a>(&self, text: &'a str, line: usize) -> &'a str {
        let start = self.starts[line];
        let end = self.starts.get(line + 1).copied().unwrap_or(text.len());
        text[start..end].trim_end_matches(['\r', '\n'])
    }
}

/// Converts ascending byte offsets to character offsets in one pass.
struct CharCursor<'a> {
    text: &'a str,
    byte: usize,
    chars: usize,
}

impl<'a> CharCursor<'a> {
    fn new(text: &'a str) -> Self {
        Self { text, byte: 0, chars: 0 }
    }

    fn advance_to(&mut self, byte: usize) -> usize {
        if byte < self.byte {
            self.byte = 0;
            self.chars = 0;
        }
        self.chars += self.text[self.byte..byte].chars().count();
        self.byte = byte;
        self.chars
    }
}

/// Converts ascending character offsets to byte offsets in one pass.
struct ByteCursor<'a> {
    text: &'a str,
    byte: usize,
    chars: usize,
}

impl<'a> ByteCursor<'a> {
    fn new(text: &'a str) -> Self {
        Self { text, byte: 0, chars: 0 }
    }

    fn advance_to(&mut self, char_offset: usize) -> usize {
        if char_offset < self.chars {
            self.byte = 0;
            self.chars = 0;
        }
        let rest = &self.text[self.byte..];
        self.byte += byte_index(rest, char_offset - self.chars);
        self.chars = char_offset;
        self.byte
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn plain() -> SearchOptions {
        SearchOptions {
            case_sensitive: true,
            ..SearchOptions::default()
        }
    }

    fn offsets(matches: &[MatchInfo]) -> Vec<usize> {
        matches.iter().map(|m| m.offset).collect()
    }

    fn at(offsets: &[usize]) -> Vec<MatchInfo> {
        offsets
            .iter()
            .map(|&offset| MatchInfo {
                offset,
                length: 1,
                line: 1,
                column: offset + 1,
                preview: String::new(),
            })
            .collect()
    }

    #[test]
    fn test_empty_pattern_matches_nothing() {
        let matches = MatchEngine::find_all("anything", "", &plain()).unwrap();
        assert!(matches.is_empty());

        let regex = SearchOptions { use_regex: true, ..plain() };
        assert!(MatchEngine::find_all("anything", "", &regex).unwrap().is_empty());
    }

    #[test]
    fn test_absent_pattern_matches_nothing() {
        let matches = MatchEngine::find_all("hello world", "xyz", &plain()).unwrap();
        assert!(matches.is_empty());
    }

    #[test]
    fn test_single_char_matches_do_not_overlap() {
        let matches = MatchEngine::find_all("aaa", "a", &plain()).unwrap();
        assert_eq!(offsets(&matches), vec![0, 1, 2]);
        for pair in matches.windows(2) {
            assert!(pair[1].offset >= pair[0].offset + pair[0].length);
        }
    }

    #[test]
    fn test_repeated_pattern_matches_do_not_overlap() {
        let matches = MatchEngine::find_all("aaaa", "aa", &plain()).unwrap();
        assert_eq!(offsets(&matches), vec![0, 2]);
    }

    #[test]
    fn test_whole_word() {
        let options = SearchOptions { whole_word: true, ..plain() };
        let matches = MatchEngine::find_all("The cat sat", "cat", &options).unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].offset, 4);

        let matches = MatchEngine::find_all("The cat sat", "at", &options).unwrap();
        assert!(matches.is_empty());

        let matches = MatchEngine::find_all("The cat sat", "at", &plain()).unwrap();
        assert_eq!(offsets(&matches), vec![5, 9]);
    }

    #[test]
    fn test_whole_word_rejection_advances_one_char() {
        // The candidate at 0 touches 'a' on the right, so the scan retries
        // at 1 and finds nothing until the standalone word at 4.
        let options = SearchOptions { whole_word: true, ..plain() };
        let matches = MatchEngine::find_all("aaa aa", "aa", &options).unwrap();
        assert_eq!(offsets(&matches), vec![4]);
    }

    #[test]
    fn test_whole_word_treats_punctuation_as_boundary() {
        let options = SearchOptions { whole_word: true, ..plain() };
        let matches = MatchEngine::find_all("(cat),cat_cat", "cat", &options).unwrap();
        assert_eq!(offsets(&matches), vec![1, 6, 10]);
    }

    #[test]
    fn test_case_insensitive_plain() {
        let options = SearchOptions::default();
        let matches = MatchEngine::find_all("Foo foo FOO", "foo", &options).unwrap();
        assert_eq!(offsets(&matches), vec![0, 4, 8]);

        let matches = MatchEngine::find_all("Foo foo FOO", "foo", &plain()).unwrap();
        assert_eq!(offsets(&matches), vec![4]);
    }

    #[test]
    fn test_plain_mode_escapes_metacharacters() {
        let matches = MatchEngine::find_all("a.b axb a.b", "a.b", &plain()).unwrap();
        assert_eq!(offsets(&matches), vec![0, 8]);
    }

    #[test]
    fn test_regex_mode() {
        let options = SearchOptions { use_regex: true, ..plain() };
        let matches = MatchEngine::find_all("a1 b22 c333", r"\d+", &options).unwrap();
        assert_eq!(offsets(&matches), vec![1, 4, 8]);
        assert_eq!(matches[2].length, 3);

        let options = SearchOptions { use_regex: true, ..SearchOptions::default() };
        let matches = MatchEngine::find_all("Cat cat", "CAT", &options).unwrap();
        assert_eq!(matches.len(), 2);
    }

    #[test]
    fn test_regex_mode_ignores_whole_word() {
        let options = SearchOptions {
            use_regex: true,
            whole_word: true,
            ..plain()
        };
        let matches = MatchEngine::find_all("The cat sat", "at", &options).unwrap();
        assert_eq!(offsets(&matches), vec![5, 9]);
    }

    #[test]
    fn test_regex_empty_width_matches() {
        let options = SearchOptions { use_regex: true, ..plain() };
        let matches = MatchEngine::find_all("bb", "a*", &options).unwrap();
        assert_eq!(offsets(&matches), vec![0, 1, 2]);
        assert!(matches.iter().all(|m| m.length == 0));
        assert_eq!(matches[2].column, 3);

        let (result, count) = MatchEngine::replace_all("bb", &matches, "-");
        assert_eq!(result, "-b-b-");
        assert_eq!(count, 3);
    }

    #[test]
    fn test_invalid_regex_is_an_error() {
        let options = SearchOptions { use_regex: true, ..plain() };
        let result = MatchEngine::find_all("(abc", "(", &options);
        assert!(matches!(result, Err(SearchError::InvalidPattern { .. })));

        // The same text is a literal in plain mode
        let matches = MatchEngine::find_all("(abc", "(", &plain()).unwrap();
        assert_eq!(offsets(&matches), vec![0]);
    }

    #[test]
    fn test_locations_and_previews() {
        let text = "first\r\n  second line  \rthird\nsecond again";
        let matches = MatchEngine::find_all(text, "second", &plain()).unwrap();
        assert_eq!(matches.len(), 2);

        assert_eq!(matches[0].offset, 9);
        assert_eq!(matches[0].location(), "Ln 2, Col 3");
        assert_eq!(matches[0].preview, "second line");

        assert_eq!(matches[1].line, 4);
        assert_eq!(matches[1].column, 1);
        assert_eq!(matches[1].preview, "second again");
    }

    #[test]
    fn test_offsets_are_characters() {
        let matches = MatchEngine::find_all("größe größe", "größe", &plain()).unwrap();
        assert_eq!(offsets(&matches), vec![0, 6]);
        assert_eq!(matches[1].length, 5);
        assert_eq!(matches[1].column, 7);
    }

    #[test]
    fn test_find_next() {
        let matches = at(&[2, 8, 15]);
        assert_eq!(MatchEngine::find_next(0, &matches, false), Some(0));
        assert_eq!(MatchEngine::find_next(2, &matches, false), Some(1));
        assert_eq!(MatchEngine::find_next(15, &matches, true), Some(0));
        assert_eq!(MatchEngine::find_next(15, &matches, false), None);
        assert_eq!(MatchEngine::find_next(0, &[], true), None);
    }

    #[test]
    fn test_find_previous() {
        let matches = at(&[2, 8, 15]);
        assert_eq!(MatchEngine::find_previous(20, &matches, false), Some(2));
        assert_eq!(MatchEngine::find_previous(8, &matches, false), Some(0));
        assert_eq!(MatchEngine::find_previous(2, &matches, true), Some(2));
        assert_eq!(MatchEngine::find_previous(2, &matches, false), None);
        assert_eq!(MatchEngine::find_previous(5, &[], true), None);
    }

    #[test]
    fn test_replace_one() {
        assert_eq!(MatchEngine::replace_one("hello world", 6, 5, "there"), "hello there");
        assert_eq!(MatchEngine::replace_one("añb", 1, 1, "n"), "anb");
        assert_eq!(MatchEngine::replace_one("abc", 3, 0, "d"), "abcd");
    }

    #[test]
    fn test_replace_all() {
        let text = "aXbXc";
        let matches = MatchEngine::find_all(text, "X", &plain()).unwrap();
        let (result, count) = MatchEngine::replace_all(text, &matches, "");
        assert_eq!(result, "abc");
        assert_eq!(count, 2);
    }

    #[test]
    fn test_replace_all_with_longer_text() {
        let text = "ü-ü-ü";
        let matches = MatchEngine::find_all(text, "ü", &plain()).unwrap();
        let (result, count) = MatchEngine::replace_all(text, &matches, "ue");
        assert_eq!(result, "ue-ue-ue");
        assert_eq!(count, 3);
    }

    #[test]
    fn test_replace_all_without_matches() {
        let (result, count) = MatchEngine::replace_all("unchanged", &[], "x");
        assert_eq!(result, "unchanged");
        assert_eq!(count, 0);
    }

    #[test]
    fn test_selection_matches() {
        assert!(MatchEngine::selection_matches("Cat", "cat", false));
        assert!(!MatchEngine::selection_matches("Cat", "cat", true));
        assert!(MatchEngine::selection_matches("cat", "cat", true));
    }
}
