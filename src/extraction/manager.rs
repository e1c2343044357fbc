//! Extraction manager: turns detection records into extracted elements.

use image::RgbaImage;
use log::warn;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::events::EventSink;
use crate::models::{BoundingBox, Detection, DisplayGeometry, OcrItem, Scene, TextClass};
use crate::render::surface::resample_into;

use std::collections::HashSet;

use super::config::ExtractionConfig;
use super::element::ExtractedElement;
use super::mask::Mask;

/// What an element is extracted from: a detector box, or recognized text
/// that matched no detection box.
#[derive(Debug, Clone, Copy)]
pub enum DetectionSource<'a> {
    Yolo(&'a Detection),
    UnmatchedOcr(&'a OcrItem),
}

impl<'a> DetectionSource<'a> {
    pub fn bbox(&self) -> Option<&'a BoundingBox> {
        match self {
            DetectionSource::Yolo(d) => Some(&d.bbox),
            DetectionSource::UnmatchedOcr(item) => item.bbox.as_ref(),
        }
    }

    pub fn text(&self) -> Option<&'a str> {
        match self {
            DetectionSource::Yolo(d) => d.text.as_deref(),
            DetectionSource::UnmatchedOcr(item) => Some(item.text.as_str()),
        }
    }

    pub fn text_class(&self) -> Option<TextClass> {
        match self {
            DetectionSource::Yolo(d) => d.ocr_class,
            DetectionSource::UnmatchedOcr(item) => item.class,
        }
    }

    pub fn is_text(&self) -> bool {
        match self {
            DetectionSource::Yolo(d) => d.is_text_class(),
            DetectionSource::UnmatchedOcr(_) => true,
        }
    }
}

/// Owns every extracted element and its mask. All element mutation flows
/// through here or the interaction controller.
#[derive(Debug)]
pub struct ExtractionManager {
    elements: Vec<ExtractedElement>,
    /// Scenes that already went through `extract_all`; extraction happens at
    /// most once per scene per session.
    extracted_scenes: HashSet<usize>,
    events: EventSink,
}

impl ExtractionManager {
    pub fn new(events: EventSink) -> Self {
        Self {
            elements: Vec::new(),
            extracted_scenes: HashSet::new(),
            events,
        }
    }

    /// Build one extracted element from a detection source.
    ///
    /// Maps the intrinsic box to display pixels and viewport fractions,
    /// snapshots the region into a fresh raster surface, and samples the
    /// occlusion mask color from the border strip of the current frame.
    /// Returns `None` (with a warn log) for sources without a usable box.
    pub fn extract_from_detection(
        &mut self,
        source: DetectionSource<'_>,
        scene_index: usize,
        frame: Option<&RgbaImage>,
        display: &DisplayGeometry,
    ) -> Option<&ExtractedElement> {
        let Some(bbox) = source.bbox() else {
            warn!("skipping extraction in scene {scene_index}: source has no bounding box");
            return None;
        };
        if !bbox.is_valid() {
            warn!("skipping extraction in scene {scene_index}: invalid bbox {bbox:?}");
            return None;
        }

        let display_rect = display.intrinsic_to_display(bbox);
        let frac = display_rect.to_frac(display.viewport);

        let surface_w = (display_rect.width.round() as u32).max(1);
        let surface_h = (display_rect.height.round() as u32).max(1);
        let mut surface = RgbaImage::new(surface_w, surface_h);
        if let Some(frame) = frame {
            if let Err(err) = resample_into(frame, bbox, &mut surface) {
                warn!("initial resample failed for scene {scene_index}: {err:?}");
            }
        }

        let element = ExtractedElement {
            id: Uuid::new_v4().to_string(),
            scene_index,
            source_rect: *bbox,
            position: frac.position(),
            size: frac.size(),
            ocr_text: source.text().map(str::to_string),
            text_class: source.text_class(),
            is_locked: false,
            is_canvas_view: true,
            is_text_mode: false,
            is_highlighted: false,
            mask: Mask::for_region(bbox, frame, display),
            surface,
            subscriptions: CancellationToken::new(),
        };

        let id = element.id.clone();
        self.elements.push(element);
        self.events.element_created(&id, scene_index);
        self.elements.last()
    }

    /// Extract the full element set for a scene: detector boxes plus
    /// unmatched OCR text, filtered by `config`.
    ///
    /// Idempotent: if the scene was already extracted this session the call
    /// is a silent no-op. Returns the number of elements created.
    pub fn extract_all(
        &mut self,
        scene: &Scene,
        frame: Option<&RgbaImage>,
        display: &DisplayGeometry,
        config: &ExtractionConfig,
    ) -> usize {
        if self.extracted_scenes.contains(&scene.index) || self.scene_has_elements(scene.index) {
            return 0;
        }

        let mut created = 0;

        for detection in scene.detections() {
            let source = DetectionSource::Yolo(detection);
            let wanted = if source.is_text() {
                config.include_text_detections
            } else {
                config.include_non_text_detections
            };
            if !wanted {
                continue;
            }
            if self
                .extract_from_detection(source, scene.index, frame, display)
                .is_some()
            {
                created += 1;
            }
        }

        if config.include_unmatched_text {
            let unmatched: Vec<&OcrItem> = scene.unmatched_ocr().collect();
            for item in unmatched {
                if self
                    .extract_from_detection(
                        DetectionSource::UnmatchedOcr(item),
                        scene.index,
                        frame,
                        display,
                    )
                    .is_some()
                {
                    created += 1;
                }
            }
        }

        self.extracted_scenes.insert(scene.index);
        self.events.scene_extraction_complete(scene.index, created);
        created
    }

    pub fn scene_has_elements(&self, scene_index: usize) -> bool {
        self.elements.iter().any(|e| e.scene_index == scene_index)
    }

    pub fn scene_extracted(&self, scene_index: usize) -> bool {
        self.extracted_scenes.contains(&scene_index)
    }

    /// Remove the element, its mask, and any attached subscriptions.
    pub fn delete_element(&mut self, id: &str) -> bool {
        let Some(pos) = self.elements.iter().position(|e| e.id == id) else {
            return false;
        };
        let element = self.elements.remove(pos);
        element.subscriptions.cancel();
        self.events.element_deleted(id);
        true
    }

    /// Remove all elements and masks across all scenes, allowing scenes to
    /// be re-extracted.
    pub fn clear_all(&mut self) {
        for element in self.elements.drain(..) {
            element.subscriptions.cancel();
        }
        self.extracted_scenes.clear();
        self.events.elements_cleared();
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn elements(&self) -> &[ExtractedElement] {
        &self.elements
    }

    pub fn elements_mut(&mut self) -> &mut [ExtractedElement] {
        &mut self.elements
    }

    pub fn element(&self, id: &str) -> Option<&ExtractedElement> {
        self.elements.iter().find(|e| e.id == id)
    }

    pub fn element_mut(&mut self, id: &str) -> Option<&mut ExtractedElement> {
        self.elements.iter_mut().find(|e| e.id == id)
    }

    pub fn elements_for_scene(&self, scene_index: usize) -> impl Iterator<Item = &ExtractedElement> {
        self.elements
            .iter()
            .filter(move |e| e.scene_index == scene_index)
    }

    pub fn elements_for_scene_mut(
        &mut self,
        scene_index: usize,
    ) -> impl Iterator<Item = &mut ExtractedElement> {
        self.elements
            .iter_mut()
            .filter(move |e| e.scene_index == scene_index)
    }
}
