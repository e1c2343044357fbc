//! Cross-modal highlighter: links recognized slide text to transcript lines
//! in both directions.
//!
//! The relationship table is precomputed by an external alignment service.
//! When it is absent (alignment not finished, or never requested) every
//! operation is a silent no-op: highlighting simply stays off.

use crate::events::EventSink;
use crate::extraction::ExtractionManager;
use crate::models::{active_line_at, RelationshipTable, TextClass, TranscriptLine};

#[derive(Debug)]
pub struct CrossModalHighlighter {
    table: Option<RelationshipTable>,
    transcript: Vec<TranscriptLine>,
    enabled: bool,
    events: EventSink,
}

impl CrossModalHighlighter {
    pub fn new(events: EventSink) -> Self {
        Self {
            table: None,
            transcript: Vec::new(),
            enabled: true,
            events,
        }
    }

    pub fn set_transcript(&mut self, transcript: Vec<TranscriptLine>) {
        self.transcript = transcript;
    }

    pub fn transcript(&self) -> &[TranscriptLine] {
        &self.transcript
    }

    /// Install the relationship table once the alignment service delivers it.
    pub fn set_relationships(&mut self, table: RelationshipTable) {
        self.table = Some(table);
    }

    pub fn has_relationships(&self) -> bool {
        self.table.is_some()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Global toggle. Disabling immediately clears all active highlight
    /// state in both directions.
    pub fn set_enabled(&mut self, enabled: bool, manager: &mut ExtractionManager) {
        if self.enabled == enabled {
            return;
        }
        self.enabled = enabled;
        if !enabled {
            clear_element_highlights(manager);
            self.events.transcript_highlight(Vec::new());
        }
        self.events.highlight_toggled(enabled);
    }

    /// Time-driven direction (video → text): highlight the extracted text
    /// elements related to the transcript line spoken at `t`.
    ///
    /// Stale highlights are cleared before new ones are applied, every tick.
    /// Elements of the designated non-highlightable class (slide titles) are
    /// never highlighted. Matches outside the active scene are ignored.
    pub fn on_time_update(
        &mut self,
        t: f64,
        active_scene: Option<usize>,
        manager: &mut ExtractionManager,
    ) {
        clear_element_highlights(manager);

        if !self.enabled {
            return;
        }
        let Some(table) = &self.table else {
            return;
        };
        let Some(scene_index) = active_scene else {
            return;
        };
        let Some(line_index) = active_line_at(&self.transcript, t) else {
            return;
        };

        for ocr_match in table.ocr_for_transcript(line_index) {
            if ocr_match.scene_index != scene_index {
                continue;
            }
            for element in manager.elements_for_scene_mut(scene_index) {
                if element.text_class == Some(TextClass::Title) {
                    continue;
                }
                if element.ocr_text.as_deref() == Some(ocr_match.text.as_str()) {
                    element.is_highlighted = true;
                }
            }
        }
    }

    /// Click-driven direction (element → text): highlight the transcript
    /// lines related to the selected element's recognized text and report
    /// which line to scroll into view.
    ///
    /// Returns the highlighted transcript indices, best match first; empty
    /// when the element carries no text or no relationship exists.
    pub fn on_element_selected(
        &self,
        manager: &ExtractionManager,
        element_id: &str,
    ) -> Vec<usize> {
        let Some(element) = manager.element(element_id) else {
            return Vec::new();
        };
        self.events.element_selected(element_id);

        if !self.enabled {
            return Vec::new();
        }
        let Some(table) = &self.table else {
            return Vec::new();
        };
        let Some(text) = element.ocr_text.as_deref() else {
            return Vec::new();
        };

        let indices: Vec<usize> = table
            .transcript_for_ocr(element.scene_index, text)
            .iter()
            .map(|m| m.transcript_index)
            .collect();

        if !indices.is_empty() {
            self.events.transcript_highlight(indices.clone());
        }
        indices
    }
}

fn clear_element_highlights(manager: &mut ExtractionManager) {
    for element in manager.elements_mut() {
        element.is_highlighted = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::ExtractionConfig;
    use crate::models::{
        BoundingBox, Detection, DisplayGeometry, OcrKey, OcrMatch, Scene, TranscriptMatch,
        ViewportSize,
    };
    use image::{Rgba, RgbaImage};

    fn text_detection(text: &str, class: TextClass, x: f64) -> Detection {
        Detection {
            class_name: class.as_str().into(),
            confidence: 0.9,
            bbox: BoundingBox::new(x, 100.0, x + 300.0, 160.0),
            text: Some(text.into()),
            ocr_class: Some(class),
            ocr_source: None,
        }
    }

    fn setup() -> (ExtractionManager, CrossModalHighlighter) {
        let mut scene = Scene::new(7, 0.0);
        scene.attach_detections(vec![
            text_detection("Gradient Descent", TextClass::PageText, 100.0),
            text_detection("Lecture 4", TextClass::Title, 500.0),
        ]);

        let frame = RgbaImage::from_pixel(1920, 1080, Rgba([255, 255, 255, 255]));
        let display = DisplayGeometry::fit(ViewportSize::new(1280.0, 720.0), 1920, 1080);
        let events = EventSink::new();
        let mut manager = ExtractionManager::new(events.clone());
        manager.extract_all(&scene, Some(&frame), &display, &ExtractionConfig::default());

        let mut highlighter = CrossModalHighlighter::new(events);
        highlighter.set_transcript(vec![TranscriptLine {
            start: 10.0,
            duration: 5.0,
            text: "now we apply gradient descent to the loss".into(),
        }]);

        let mut table = RelationshipTable::default();
        table.transcript_to_ocr.insert(
            0,
            vec![
                OcrMatch {
                    scene_index: 7,
                    text: "Gradient Descent".into(),
                    similarity: 0.82,
                },
                OcrMatch {
                    scene_index: 7,
                    text: "Lecture 4".into(),
                    similarity: 0.6,
                },
            ],
        );
        table.ocr_to_transcript.insert(
            OcrKey::new(7, "Gradient Descent"),
            vec![TranscriptMatch {
                transcript_index: 0,
                similarity: 0.82,
            }],
        );
        highlighter.set_relationships(table);

        (manager, highlighter)
    }

    fn highlighted_texts(manager: &ExtractionManager) -> Vec<String> {
        manager
            .elements()
            .iter()
            .filter(|e| e.is_highlighted)
            .filter_map(|e| e.ocr_text.clone())
            .collect()
    }

    #[test]
    fn time_update_highlights_matching_elements_excluding_titles() {
        let (mut manager, mut highlighter) = setup();

        highlighter.on_time_update(12.0, Some(7), &mut manager);
        assert_eq!(highlighted_texts(&manager), vec!["Gradient Descent"]);

        // Outside the line's interval: stale highlight is cleared.
        highlighter.on_time_update(30.0, Some(7), &mut manager);
        assert!(highlighted_texts(&manager).is_empty());
    }

    #[test]
    fn matches_outside_active_scene_are_ignored() {
        let (mut manager, mut highlighter) = setup();
        highlighter.on_time_update(12.0, Some(3), &mut manager);
        assert!(highlighted_texts(&manager).is_empty());
    }

    #[test]
    fn element_selection_returns_transcript_indices() {
        let (manager, highlighter) = setup();
        let id = manager
            .elements()
            .iter()
            .find(|e| e.ocr_text.as_deref() == Some("Gradient Descent"))
            .unwrap()
            .id
            .clone();

        let indices = highlighter.on_element_selected(&manager, &id);
        assert_eq!(indices, vec![0]);
    }

    #[test]
    fn bidirectional_consistency() {
        let (mut manager, mut highlighter) = setup();

        // Forward: selecting the element highlights transcript line 0.
        let id = manager
            .elements()
            .iter()
            .find(|e| e.ocr_text.as_deref() == Some("Gradient Descent"))
            .unwrap()
            .id
            .clone();
        let indices = highlighter.on_element_selected(&manager, &id);
        assert_eq!(indices, vec![0]);

        // Backward: time inside line 0 highlights the same element.
        highlighter.on_time_update(12.0, Some(7), &mut manager);
        assert!(manager.element(&id).unwrap().is_highlighted);
    }

    #[test]
    fn missing_table_is_a_silent_noop() {
        let (mut manager, _) = setup();
        let mut bare = CrossModalHighlighter::new(EventSink::new());
        bare.set_transcript(vec![TranscriptLine {
            start: 0.0,
            duration: 100.0,
            text: "anything".into(),
        }]);

        bare.on_time_update(12.0, Some(7), &mut manager);
        assert!(highlighted_texts(&manager).is_empty());

        let id = manager.elements()[0].id.clone();
        assert!(bare.on_element_selected(&manager, &id).is_empty());
    }

    #[test]
    fn disabling_clears_active_highlights() {
        let (mut manager, mut highlighter) = setup();
        highlighter.on_time_update(12.0, Some(7), &mut manager);
        assert!(!highlighted_texts(&manager).is_empty());

        highlighter.set_enabled(false, &mut manager);
        assert!(highlighted_texts(&manager).is_empty());

        // While disabled, time updates apply nothing.
        highlighter.on_time_update(12.0, Some(7), &mut manager);
        assert!(highlighted_texts(&manager).is_empty());
    }
}
