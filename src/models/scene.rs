//! Scene records delivered by the detection backend.
//!
//! Scenes are ordered by start time and non-overlapping; a scene ends where
//! the next one starts (the last is unbounded). Detections and OCR results
//! arrive incrementally as background processing completes, so existing
//! scene objects are updated in place, never replaced.

use serde::{Deserialize, Serialize};

use super::detection::{Detection, OcrItem, YoloDetections};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scene {
    pub index: usize,
    /// Scene start in seconds from the beginning of the recording.
    pub start_time: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub yolo_detections: Option<YoloDetections>,
    #[serde(default)]
    pub ocr_results: Vec<OcrItem>,
}

impl Scene {
    pub fn new(index: usize, start_time: f64) -> Self {
        Self {
            index,
            start_time,
            thumbnail_url: None,
            full_image_url: None,
            yolo_detections: None,
            ocr_results: Vec::new(),
        }
    }

    pub fn detections(&self) -> &[Detection] {
        self.yolo_detections
            .as_ref()
            .map(|y| y.detections.as_slice())
            .unwrap_or(&[])
    }

    pub fn has_detections(&self) -> bool {
        self.yolo_detections.is_some()
    }

    /// Attach detection results that completed after the initial load.
    /// Replaces any earlier partial set for this scene.
    pub fn attach_detections(&mut self, detections: Vec<Detection>) {
        self.yolo_detections = Some(YoloDetections { detections });
    }

    /// Attach OCR results that completed after the initial load.
    pub fn attach_ocr(&mut self, ocr_results: Vec<OcrItem>) {
        self.ocr_results = ocr_results;
    }

    /// OCR items that never matched a detection box; these become
    /// free-standing extracted text regions.
    pub fn unmatched_ocr(&self) -> impl Iterator<Item = &OcrItem> {
        self.ocr_results.iter().filter(|item| !item.matched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::geometry::BoundingBox;

    #[test]
    fn scene_parses_backend_record() {
        let json = r#"{
            "index": 3,
            "start_time": 42.5,
            "thumbnail_url": "/static/scenes/v1/thumb_3.jpg",
            "yolo_detections": {
                "detections": [
                    { "class": "figure", "confidence": 0.8, "bbox": [0, 0, 320, 240] }
                ]
            },
            "ocr_results": [
                { "text": "loss curve", "bbox": [10, 10, 80, 30], "matched": false }
            ]
        }"#;
        let scene: Scene = serde_json::from_str(json).unwrap();
        assert_eq!(scene.index, 3);
        assert_eq!(scene.start_time, 42.5);
        assert_eq!(scene.detections().len(), 1);
        assert_eq!(scene.unmatched_ocr().count(), 1);
    }

    #[test]
    fn attach_detections_updates_in_place() {
        let mut scene = Scene::new(0, 0.0);
        assert!(!scene.has_detections());
        scene.attach_detections(vec![Detection {
            class_name: "presenter".into(),
            confidence: 0.95,
            bbox: BoundingBox::new(0.0, 0.0, 200.0, 300.0),
            text: None,
            ocr_class: None,
            ocr_source: None,
        }]);
        assert!(scene.has_detections());
        assert_eq!(scene.detections().len(), 1);
    }
}
