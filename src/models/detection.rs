//! Detection and OCR records produced by the recognition backend.
//!
//! Wire format follows the backend's scene JSON: detections live under
//! `yolo_detections.detections`, free-standing recognized text under
//! `ocr_results`. Records are immutable once received.

use serde::{Deserialize, Serialize};

use super::geometry::BoundingBox;

/// Sub-class assigned to text-bearing regions by the detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TextClass {
    #[serde(rename = "title")]
    Title,
    #[serde(rename = "page-text")]
    PageText,
    #[serde(rename = "other-text")]
    OtherText,
    #[serde(rename = "caption")]
    Caption,
}

impl TextClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            TextClass::Title => "title",
            TextClass::PageText => "page-text",
            TextClass::OtherText => "other-text",
            TextClass::Caption => "caption",
        }
    }
}

/// Which recognition engine produced a text result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OcrSource {
    Tesseract,
    Surya,
}

/// A single detected region within a scene.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Detection {
    /// Detector class label, e.g. "title", "figure", "presenter".
    #[serde(rename = "class")]
    pub class_name: String,
    pub confidence: f64,
    pub bbox: BoundingBox,
    /// Recognized text, present once OCR has run over the region.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ocr_class: Option<TextClass>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ocr_source: Option<OcrSource>,
}

impl Detection {
    /// Whether the detector classified this region as text-bearing.
    pub fn is_text_class(&self) -> bool {
        self.ocr_class.is_some()
            || matches!(
                self.class_name.to_lowercase().as_str(),
                "title" | "page-text" | "other-text" | "caption"
            )
    }
}

/// Recognized text that may or may not correspond to a detection box.
/// Items with `matched == false` had no overlapping detection and are
/// extracted as free-standing text regions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrItem {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bbox: Option<BoundingBox>,
    #[serde(default, rename = "class", skip_serializing_if = "Option::is_none")]
    pub class: Option<TextClass>,
    #[serde(default)]
    pub matched: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<OcrSource>,
}

/// Wrapper object the backend stores detections under.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct YoloDetections {
    #[serde(default)]
    pub detections: Vec<Detection>,
}
