pub mod highlighter;

pub use highlighter::CrossModalHighlighter;
