pub mod matching;
pub mod navigator;
pub mod spans;

pub use matching::{
    exact_match, find_all_matches, fuzzy_match, SearchMatch, DEFAULT_THRESHOLD,
    SHORT_QUERY_THRESHOLD,
};
pub use navigator::{LineMatch, SearchNavigator};
pub use spans::{highlight_spans, Emphasis, HighlightSegment};
