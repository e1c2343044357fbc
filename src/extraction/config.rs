/// Configuration for which detection kinds get extracted.
#[derive(Debug, Clone)]
pub struct ExtractionConfig {
    /// Extract detections the detector classified as text-bearing.
    pub include_text_detections: bool,

    /// Extract OCR results that matched no detection box.
    pub include_unmatched_text: bool,

    /// Extract non-text detections (figures, presenter video, etc.).
    pub include_non_text_detections: bool,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            include_text_detections: true,
            include_unmatched_text: true,
            include_non_text_detections: true,
        }
    }
}
