//! Approximate string matching.
//!
//! Pure functions shared by the transcript search and the slide-text search.
//! All indices are character indices into the searched text.

use serde::Serialize;

/// Score threshold for accepting a fuzzy window.
pub const DEFAULT_THRESHOLD: f64 = 0.8;
/// Relaxed threshold for very short queries (length <= 2), which cannot
/// accumulate much score structure.
pub const SHORT_QUERY_THRESHOLD: f64 = 0.7;

const SCORE_WEIGHT_CONSECUTIVE: f64 = 0.5;
const SCORE_WEIGHT_PROXIMITY: f64 = 0.3;
const SCORE_WEIGHT_POSITION: f64 = 0.2;

/// Float guard for comparisons exactly at a threshold boundary.
const SCORE_EPSILON: f64 = 1e-9;

/// One match of a query against a text. Ephemeral, recomputed per query.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchMatch {
    pub start_index: usize,
    /// Exclusive.
    pub end_index: usize,
    /// 1.0 for exact substring matches; weighted fuzzy score otherwise.
    pub score: f64,
    /// Exact characters matched by a fuzzy query, absent for exact matches
    /// (the whole span matched).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_positions: Option<Vec<usize>>,
}

fn lower_chars(s: &str) -> Vec<char> {
    s.chars()
        .map(|c| c.to_lowercase().next().unwrap_or(c))
        .collect()
}

/// Case-insensitive substring search; the fast path. Score is always 1.0.
pub fn exact_match(text: &str, query: &str) -> Option<SearchMatch> {
    if query.is_empty() {
        return None;
    }
    let text_chars = lower_chars(text);
    let query_chars = lower_chars(query);
    find_substring(&text_chars, &query_chars, 0).map(|start| SearchMatch {
        start_index: start,
        end_index: start + query_chars.len(),
        score: 1.0,
        matched_positions: None,
    })
}

fn find_substring(text: &[char], query: &[char], from: usize) -> Option<usize> {
    if query.is_empty() || text.len() < query.len() {
        return None;
    }
    (from..=text.len() - query.len()).find(|&i| text[i..i + query.len()] == *query)
}

/// Greedy left-to-right subsequence match.
///
/// Every query character must be found, in order, within the text; if any
/// character is unmatched there is no match at all. The score rewards
/// adjacent matched characters, small total gaps, and matches starting early
/// in the text.
pub fn fuzzy_match(text: &str, query: &str) -> Option<SearchMatch> {
    if query.is_empty() {
        return None;
    }
    let text_chars = lower_chars(text);
    let query_chars = lower_chars(query);

    let mut positions = Vec::with_capacity(query_chars.len());
    let mut cursor = 0usize;
    for qc in &query_chars {
        let found = text_chars[cursor..].iter().position(|tc| tc == qc)?;
        positions.push(cursor + found);
        cursor = cursor + found + 1;
    }

    let score = score_positions(&positions, text_chars.len());
    Some(SearchMatch {
        start_index: positions[0],
        end_index: positions[positions.len() - 1] + 1,
        score,
        matched_positions: Some(positions),
    })
}

/// Weighted quality of a set of matched positions.
///
/// The consecutive component is the longest adjacent run over the query
/// length, so a fully in-a-row match scores 1.0 and an entirely scattered
/// one scores 1/n rather than zero.
fn score_positions(positions: &[usize], text_len: usize) -> f64 {
    debug_assert!(!positions.is_empty());
    let n = positions.len();

    let mut longest_run = 1usize;
    let mut run = 1usize;
    for pair in positions.windows(2) {
        if pair[1] == pair[0] + 1 {
            run += 1;
            longest_run = longest_run.max(run);
        } else {
            run = 1;
        }
    }
    let consecutive_ratio = longest_run as f64 / n as f64;

    let span = positions[n - 1] - positions[0] + 1;
    let gaps = span - n;
    let proximity_ratio = if text_len == 0 {
        0.0
    } else {
        (1.0 - gaps as f64 / text_len as f64).max(0.0)
    };

    let position_ratio = if text_len == 0 {
        0.0
    } else {
        1.0 - positions[0] as f64 / text_len as f64
    };

    SCORE_WEIGHT_CONSECUTIVE * consecutive_ratio
        + SCORE_WEIGHT_PROXIMITY * proximity_ratio
        + SCORE_WEIGHT_POSITION * position_ratio
}

/// All matches of `query` in `text`, best first.
///
/// Exact occurrences short-circuit: each is returned with score 1.0 and no
/// fuzzy pass runs. Otherwise a window of `min(text_len, 3 * query_len)`
/// characters slides across the text and each window is fuzzy-scored;
/// windows at or above the threshold are kept, and the scan skips ahead by
/// half the query length after each accepted window so overlapping
/// near-duplicates are not reported.
pub fn find_all_matches(text: &str, query: &str) -> Vec<SearchMatch> {
    if query.is_empty() || text.is_empty() {
        return Vec::new();
    }

    let text_chars = lower_chars(text);
    let query_chars = lower_chars(query);
    let qlen = query_chars.len();

    // Exact fast path: every occurrence.
    let mut exact = Vec::new();
    let mut from = 0usize;
    while let Some(start) = find_substring(&text_chars, &query_chars, from) {
        exact.push(SearchMatch {
            start_index: start,
            end_index: start + qlen,
            score: 1.0,
            matched_positions: None,
        });
        from = start + 1;
    }
    if !exact.is_empty() {
        return exact;
    }

    let threshold = if qlen <= 2 {
        SHORT_QUERY_THRESHOLD
    } else {
        DEFAULT_THRESHOLD
    };

    let window = (3 * qlen).min(text_chars.len());
    if window < qlen {
        return Vec::new();
    }

    let mut matches = Vec::new();
    let mut i = 0usize;
    while i + window <= text_chars.len() {
        let window_str: String = text_chars[i..i + window].iter().collect();
        if let Some(m) = fuzzy_match(&window_str, query) {
            if m.score >= threshold - SCORE_EPSILON {
                matches.push(SearchMatch {
                    start_index: m.start_index + i,
                    end_index: m.end_index + i,
                    score: m.score,
                    matched_positions: m
                        .matched_positions
                        .map(|ps| ps.into_iter().map(|p| p + i).collect()),
                });
                i += (qlen / 2).max(1);
                continue;
            }
        }
        i += 1;
    }

    matches.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    matches
}
