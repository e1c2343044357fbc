//! Search-result navigation over a line collection.
//!
//! Used by both the transcript panel and the slide-text panel: run one query
//! over every line, then step through the hits with next/previous, wrapping
//! at both ends.

use serde::Serialize;

use super::matching::{find_all_matches, SearchMatch};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineMatch {
    pub line_index: usize,
    #[serde(rename = "match")]
    pub search_match: SearchMatch,
}

#[derive(Debug, Default)]
pub struct SearchNavigator {
    matches: Vec<LineMatch>,
    cursor: Option<usize>,
}

impl SearchNavigator {
    /// Run `query` over every line. Matches keep line order; within a line
    /// they come best-score-first from the matcher.
    pub fn search<'a, I>(lines: I, query: &str) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut matches = Vec::new();
        for (line_index, line) in lines.into_iter().enumerate() {
            for m in find_all_matches(line, query) {
                matches.push(LineMatch {
                    line_index,
                    search_match: m,
                });
            }
        }
        Self {
            matches,
            cursor: None,
        }
    }

    pub fn result_count(&self) -> usize {
        self.matches.len()
    }

    pub fn matches(&self) -> &[LineMatch] {
        &self.matches
    }

    pub fn current(&self) -> Option<&LineMatch> {
        self.cursor.and_then(|i| self.matches.get(i))
    }

    /// Advance to the next result, wrapping to the first after the last.
    pub fn next(&mut self) -> Option<&LineMatch> {
        if self.matches.is_empty() {
            return None;
        }
        let next = match self.cursor {
            None => 0,
            Some(i) => (i + 1) % self.matches.len(),
        };
        self.cursor = Some(next);
        self.matches.get(next)
    }

    /// Step back to the previous result, wrapping to the last before the
    /// first.
    pub fn previous(&mut self) -> Option<&LineMatch> {
        if self.matches.is_empty() {
            return None;
        }
        let prev = match self.cursor {
            None => self.matches.len() - 1,
            Some(0) => self.matches.len() - 1,
            Some(i) => i - 1,
        };
        self.cursor = Some(prev);
        self.matches.get(prev)
    }
}
