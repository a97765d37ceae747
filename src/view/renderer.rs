use crate::search::MatchInfo;
use crossterm::style::{Color, ResetColor, SetBackgroundColor, SetForegroundColor};
use unicode_width::UnicodeWidthChar;

const CURRENT_MATCH: Color = Color::Rgb { r: 255, g: 165, b: 0 };
const OTHER_MATCH: Color = Color::Yellow;

/// Renders a find-all result list, one row per match.
#[derive(Debug, Clone, Copy)]
pub struct MatchListView {
    pub width: usize,
    pub color: bool,
}

impl MatchListView {
    pub fn new(width: usize, color: bool) -> Self {
        Self { width, color }
    }

    /// `lines` are the searched text's lines; the preview shown for each row
    /// is the trimmed line, cut to fit `width` display columns.
    pub fn render(
        &self,
        lines: &[String],
        matches: &[MatchInfo],
        current: Option<usize>,
    ) -> Vec<String> {
        let label_width = matches
            .iter()
            .map(|m| m.location().len())
            .max()
            .unwrap_or(0);

        matches
            .iter()
            .enumerate()
            .map(|(index, m)| {
                let is_current = current == Some(index);
                let marker = if is_current { '>' } else { ' ' };
                let label = format!("{marker} {:<label_width$}  ", m.location());

                let line = lines
                    .get(m.line.saturating_sub(1))
                    .map_or(m.preview.as_str(), String::as_str);
                let leading = line.chars().take_while(|c| c.is_whitespace()).count();
                let shown = truncate_to_width(line.trim(), self.width.saturating_sub(label.len()));

                if !self.color {
                    return format!("{label}{shown}");
                }
                let start = (m.column - 1).saturating_sub(leading);
                let span = [(start, start + m.length)];
                let body = highlight_line(&shown, &span, is_current.then_some(0));
                format!("{label}{body}")
            })
            .collect()
    }
}

/// Wrap each character span of `line` in highlight colours. The span at
/// index `current` gets the current-match colour.
pub fn highlight_line(line: &str, spans: &[(usize, usize)], current: Option<usize>) -> String {
    let mut result = String::with_capacity(line.len());
    let mut active: Option<usize> = None;

    for (column, ch) in line.chars().enumerate() {
        let span = spans
            .iter()
            .position(|&(start, end)| column >= start && column < end);

        if span != active {
            if active.is_some() {
                result.push_str(&format!("{ResetColor}"));
            }
            if let Some(index) = span {
                let background = if current == Some(index) {
                    CURRENT_MATCH
                } else {
                    OTHER_MATCH
                };
                result.push_str(&format!(
                    "{}{}",
                    SetBackgroundColor(background),
                    SetForegroundColor(Color::Black)
                ));
            }
            active = span;
        }
        result.push(ch);
    }

    if active.is_some() {
        result.push_str(&format!("{ResetColor}"));
    }
    result
}

/// Cut `text` to at most `width` display columns, marking the cut with `…`.
pub fn truncate_to_width(text: &str, width: usize) -> String {
    let total: usize = text.chars().map(|ch| ch.width().unwrap_or(0)).sum();
    if total <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }

    let mut result = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w + 1 > width {
            break;
        }
        used += w;
        result.push(ch);
    }
    result.push('…');
    result
}
