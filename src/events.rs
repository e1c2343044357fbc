//! Events exposed to the surrounding UI chrome.
//!
//! Delivered over a broadcast channel; UI layers subscribe and react (update
//! panels, scroll transcript views, stop progress polling). Emission never
//! blocks and a send with no subscribers is not an error.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::broadcast;

const EVENT_CHANNEL_CAPACITY: usize = 256;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase", tag = "type")]
pub enum EngineEvent {
    ElementCreated {
        timestamp: DateTime<Utc>,
        element_id: String,
        scene_index: usize,
    },
    ElementDeleted {
        timestamp: DateTime<Utc>,
        element_id: String,
    },
    ElementSelected {
        timestamp: DateTime<Utc>,
        element_id: String,
    },
    ElementsCleared {
        timestamp: DateTime<Utc>,
    },
    /// All extraction work for a scene finished; progress UI can stop polling.
    SceneExtractionComplete {
        timestamp: DateTime<Utc>,
        scene_index: usize,
        element_count: usize,
    },
    HighlightToggled {
        timestamp: DateTime<Utc>,
        enabled: bool,
    },
    /// Transcript lines to highlight after a click on an extracted element;
    /// `scroll_to` is the first (best) match.
    TranscriptHighlight {
        timestamp: DateTime<Utc>,
        transcript_indices: Vec<usize>,
        scroll_to: Option<usize>,
    },
}

/// Fan-out handle shared by the engine's components.
#[derive(Debug, Clone)]
pub struct EventSink {
    tx: broadcast::Sender<EngineEvent>,
}

impl EventSink {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<EngineEvent> {
        self.tx.subscribe()
    }

    /// Fire-and-forget emit; a closed channel just means nobody is listening.
    pub fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }

    pub fn element_created(&self, element_id: &str, scene_index: usize) {
        self.emit(EngineEvent::ElementCreated {
            timestamp: Utc::now(),
            element_id: element_id.to_string(),
            scene_index,
        });
    }

    pub fn element_deleted(&self, element_id: &str) {
        self.emit(EngineEvent::ElementDeleted {
            timestamp: Utc::now(),
            element_id: element_id.to_string(),
        });
    }

    pub fn element_selected(&self, element_id: &str) {
        self.emit(EngineEvent::ElementSelected {
            timestamp: Utc::now(),
            element_id: element_id.to_string(),
        });
    }

    pub fn elements_cleared(&self) {
        self.emit(EngineEvent::ElementsCleared {
            timestamp: Utc::now(),
        });
    }

    pub fn scene_extraction_complete(&self, scene_index: usize, element_count: usize) {
        self.emit(EngineEvent::SceneExtractionComplete {
            timestamp: Utc::now(),
            scene_index,
            element_count,
        });
    }

    pub fn highlight_toggled(&self, enabled: bool) {
        self.emit(EngineEvent::HighlightToggled {
            timestamp: Utc::now(),
            enabled,
        });
    }

    pub fn transcript_highlight(&self, transcript_indices: Vec<usize>) {
        let scroll_to = transcript_indices.first().copied();
        self.emit(EngineEvent::TranscriptHighlight {
            timestamp: Utc::now(),
            transcript_indices,
            scroll_to,
        });
    }
}

impl Default for EventSink {
    fn default() -> Self {
        Self::new()
    }
}
