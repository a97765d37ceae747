use super::document::Document;
use crate::error::SearchError;
use crate::search::{MatchEngine, MatchInfo, SearchOptions};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchDirection {
    Forward,
    Backward,
}

/// Where a find/replace session stands.
///
/// `Idle -> Searching -> (MatchesFound | NoMatches) -> Navigating`, and back
/// to `Searching` whenever the pattern or options change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchPhase {
    Idle,
    Searching,
    MatchesFound,
    NoMatches,
    Navigating,
}

/// Result of a find next / find previous step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Found { index: usize, wrapped: bool },
    /// Matches exist but none lie in the search direction and wrapping is off.
    Exhausted,
    NoMatches,
}

#[derive(Debug, Clone)]
pub struct SearchSession {
    pattern: String,
    options: SearchOptions,
    pub wrap_around: bool,
    matches: Vec<MatchInfo>,
    current_match: Option<usize>,
    phase: SearchPhase,
    status: String,
}

impl SearchSession {
    pub fn new() -> Self {
        Self {
            pattern: String::new(),
            options: SearchOptions::default(),
            wrap_around: true,
            matches: Vec::new(),
            current_match: None,
            phase: SearchPhase::Idle,
            status: "Ready".to_string(),
        }
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn options(&self) -> SearchOptions {
        self.options
    }

    pub fn phase(&self) -> SearchPhase {
        self.phase
    }

    pub fn matches(&self) -> &[MatchInfo] {
        &self.matches
    }

    pub fn current_match_index(&self) -> Option<usize> {
        self.current_match
    }

    pub fn current_match(&self) -> Option<&MatchInfo> {
        self.current_match.and_then(|index| self.matches.get(index))
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    /// Short count shown next to the find box.
    pub fn match_count_label(&self) -> String {
        match (self.phase, self.matches.len()) {
            (SearchPhase::Idle | SearchPhase::Searching, _) => String::new(),
            (_, 0) => "No matches".to_string(),
            (_, 1) => "1 match".to_string(),
            (_, count) => format!("{count} matches"),
        }
    }

    /// Change the pattern or options. Any change drops the current matches.
    pub fn set_query(&mut self, pattern: impl Into<String>, options: SearchOptions) {
        let pattern = pattern.into();
        if pattern == self.pattern && options == self.options && self.phase != SearchPhase::Idle {
            return;
        }

        self.pattern = pattern;
        self.options = options;
        self.reset_matches();
        if self.pattern.is_empty() {
            self.phase = SearchPhase::Idle;
            self.status = "Ready".to_string();
        } else {
            self.phase = SearchPhase::Searching;
        }
    }

    /// Run the current query against `text` and return the match count.
    pub fn search(&mut self, text: &str) -> Result<usize, SearchError> {
        self.reset_matches();
        if self.pattern.is_empty() {
            self.phase = SearchPhase::Idle;
            self.status = "Ready".to_string();
            return Ok(0);
        }

        self.phase = SearchPhase::Searching;
        match MatchEngine::find_all(text, &self.pattern, &self.options) {
            Ok(matches) => {
                self.matches = matches;
                self.status = match self.matches.len() {
                    0 => "No matches found".to_string(),
                    1 => "1 match found".to_string(),
                    count => format!("{count} matches found"),
                };
                self.phase = if self.matches.is_empty() {
                    SearchPhase::NoMatches
                } else {
                    SearchPhase::MatchesFound
                };
                Ok(self.matches.len())
            }
            Err(e) => {
                self.status = format!("Error: {e}");
                Err(e)
            }
        }
    }

    pub fn find_next(&mut self, document: &mut Document) -> Result<Navigation, SearchError> {
        self.navigate(document, SearchDirection::Forward)
    }

    pub fn find_previous(&mut self, document: &mut Document) -> Result<Navigation, SearchError> {
        self.navigate(document, SearchDirection::Backward)
    }

    /// Search `document` again and select the nearest match in `direction`
    /// from the caret.
    pub fn navigate(
        &mut self,
        document: &mut Document,
        direction: SearchDirection,
    ) -> Result<Navigation, SearchError> {
        if self.pattern.is_empty() {
            self.status = "Please enter search text".to_string();
            return Ok(Navigation::NoMatches);
        }

        self.search(document.text())?;
        if self.matches.is_empty() {
            return Ok(Navigation::NoMatches);
        }

        let caret = document.caret_index();
        let (found, wrapped_to) = match direction {
            SearchDirection::Forward => (MatchEngine::find_next(caret, &self.matches, false), 0),
            SearchDirection::Backward => (
                MatchEngine::find_previous(caret, &self.matches, false),
                self.matches.len() - 1,
            ),
        };

        self.phase = SearchPhase::Navigating;
        let (index, wrapped) = match found {
            Some(index) => (index, false),
            None if self.wrap_around => (wrapped_to, true),
            None => {
                self.status = "No more matches found".to_string();
                return Ok(Navigation::Exhausted);
            }
        };

        let target = &self.matches[index];
        document.set_selection(target.offset, target.length);
        self.current_match = Some(index);
        self.status = format!("Match {} of {}", index + 1, self.matches.len());
        debug!(index, wrapped, ?direction, "selected match");
        Ok(Navigation::Found { index, wrapped })
    }

    /// Replace the selection if it is the search text, then move to the
    /// next match. Returns how many spans were replaced (0 or 1).
    pub fn replace(
        &mut self,
        document: &mut Document,
        replacement: &str,
    ) -> Result<(usize, Navigation), SearchError> {
        if self.pattern.is_empty() {
            self.status = "Please enter search text".to_string();
            return Ok((0, Navigation::NoMatches));
        }

        let mut replaced = 0;
        if document.selection_length() > 0
            && MatchEngine::selection_matches(
                &document.selected_text(),
                &self.pattern,
                self.options.case_sensitive,
            )
        {
            let start = document.selection_start();
            let text = MatchEngine::replace_one(
                document.text(),
                start,
                document.selection_length(),
                replacement,
            );
            document.set_text(text);
            document.set_caret(start + replacement.chars().count());
            replaced = 1;
        }

        let navigation = self.find_next(document)?;
        Ok((replaced, navigation))
    }

    /// Replace every match in `document` and refresh the match list.
    pub fn replace_all(
        &mut self,
        document: &mut Document,
        replacement: &str,
    ) -> Result<usize, SearchError> {
        if self.pattern.is_empty() {
            self.status = "Please enter search text".to_string();
            return Ok(0);
        }

        self.search(document.text())?;
        if self.matches.is_empty() {
            self.status = "No matches to replace".to_string();
            return Ok(0);
        }

        let (text, count) = MatchEngine::replace_all(document.text(), &self.matches, replacement);
        document.set_text(text);

        self.search(document.text())?;
        self.status = format!("Replaced {count} occurrence(s)");
        Ok(count)
    }

    /// Forget matches and return to `Idle`, keeping the query.
    pub fn clear(&mut self) {
        self.reset_matches();
        self.phase = SearchPhase::Idle;
        self.status = "Ready".to_string();
    }

    fn reset_matches(&mut self) {
        self.matches.clear();
        self.current_match = None;
    }
}

impl Default for SearchSession {
    fn default() -> Self {
        Self::new()
    }
}
