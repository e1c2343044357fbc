//! Precomputed transcript↔OCR relationship tables.
//!
//! Produced by an external semantic-alignment service once embeddings are
//! available; read-only here. Absence of the table is a valid state (cross
//! highlighting silently disabled), not an error.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Composite key identifying one recognized text within one scene.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OcrKey {
    pub scene_index: usize,
    pub text: String,
}

impl OcrKey {
    pub fn new(scene_index: usize, text: impl Into<String>) -> Self {
        Self {
            scene_index,
            text: text.into(),
        }
    }
}

/// A transcript line semantically related to some OCR text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptMatch {
    pub transcript_index: usize,
    pub similarity: f64,
}

/// An OCR text semantically related to some transcript line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrMatch {
    pub scene_index: usize,
    pub text: String,
    pub similarity: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RelationshipTable {
    pub ocr_to_transcript: HashMap<OcrKey, Vec<TranscriptMatch>>,
    pub transcript_to_ocr: HashMap<usize, Vec<OcrMatch>>,
}

impl RelationshipTable {
    /// Transcript lines related to the OCR text shown in `scene_index`,
    /// best match first.
    pub fn transcript_for_ocr(&self, scene_index: usize, text: &str) -> &[TranscriptMatch] {
        self.ocr_to_transcript
            .get(&OcrKey::new(scene_index, text))
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// OCR texts related to the given transcript line, best match first.
    pub fn ocr_for_transcript(&self, transcript_index: usize) -> &[OcrMatch] {
        self.transcript_to_ocr
            .get(&transcript_index)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.ocr_to_transcript.is_empty() && self.transcript_to_ocr.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookups_miss_as_empty_slices() {
        let table = RelationshipTable::default();
        assert!(table.transcript_for_ocr(0, "anything").is_empty());
        assert!(table.ocr_for_transcript(42).is_empty());
    }

    #[test]
    fn bidirectional_entries_resolve() {
        let mut table = RelationshipTable::default();
        table.ocr_to_transcript.insert(
            OcrKey::new(7, "Gradient Descent"),
            vec![TranscriptMatch {
                transcript_index: 42,
                similarity: 0.83,
            }],
        );
        table.transcript_to_ocr.insert(
            42,
            vec![OcrMatch {
                scene_index: 7,
                text: "Gradient Descent".into(),
                similarity: 0.83,
            }],
        );

        let forward = table.transcript_for_ocr(7, "Gradient Descent");
        assert_eq!(forward[0].transcript_index, 42);
        let back = table.ocr_for_transcript(42);
        assert_eq!(back[0].scene_index, 7);
        assert_eq!(back[0].text, "Gradient Descent");
    }
}
