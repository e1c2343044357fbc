//! Highlight rendering for search results.
//!
//! Converts a match into emphasis segments the UI layer can style. The full
//! match span gets one emphasis level; when explicit matched character
//! positions are available (fuzzy matches) those characters get stronger
//! emphasis. Concatenating the segments always reproduces the original text
//! unchanged.

use serde::Serialize;

use super::matching::SearchMatch;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Emphasis {
    /// Text outside the match.
    None,
    /// Inside the match span.
    Match,
    /// A character the fuzzy matcher explicitly matched.
    Strong,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HighlightSegment {
    pub text: String,
    pub emphasis: Emphasis,
}

/// Split `text` into emphasis segments for one match. Indices in the match
/// are character indices.
pub fn highlight_spans(text: &str, m: &SearchMatch) -> Vec<HighlightSegment> {
    let chars: Vec<char> = text.chars().collect();
    let start = m.start_index.min(chars.len());
    let end = m.end_index.min(chars.len());

    fn push(segments: &mut Vec<HighlightSegment>, text: String, emphasis: Emphasis) {
        if text.is_empty() {
            return;
        }
        // Coalesce adjacent runs with the same emphasis.
        if let Some(last) = segments.last_mut() {
            if last.emphasis == emphasis {
                last.text.push_str(&text);
                return;
            }
        }
        segments.push(HighlightSegment { text, emphasis });
    }

    let mut segments = Vec::new();

    push(
        &mut segments,
        chars[..start].iter().collect(),
        Emphasis::None,
    );

    match &m.matched_positions {
        Some(positions) => {
            for (i, &c) in chars[start..end].iter().enumerate() {
                let emphasis = if positions.contains(&(start + i)) {
                    Emphasis::Strong
                } else {
                    Emphasis::Match
                };
                push(&mut segments, c.to_string(), emphasis);
            }
        }
        None => {
            push(
                &mut segments,
                chars[start..end].iter().collect(),
                Emphasis::Match,
            );
        }
    }

    push(&mut segments, chars[end..].iter().collect(), Emphasis::None);
    segments
}
