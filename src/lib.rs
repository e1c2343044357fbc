//! slidelift: scene-anchored interactive overlay and synchronization engine
//! for annotated lecture playback.
//!
//! The engine consumes scene, detection, transcript, and relationship
//! records from an external recognition backend and lets a viewer lift
//! detected regions off the playback surface into independently positioned
//! live copies, navigate by scene time, and cross-highlight between slide
//! text and the spoken transcript. It computes no detections and persists
//! nothing; all state is rebuilt from backend records on load.

pub mod engine;
pub mod events;
pub mod extraction;
pub mod highlight;
pub mod interaction;
pub mod models;
pub mod render;
pub mod scene_index;
pub mod search;
pub mod utils;
pub mod video;

pub use engine::OverlayEngine;
pub use events::{EngineEvent, EventSink};
pub use extraction::{DetectionSource, ExtractedElement, ExtractionConfig, ExtractionManager, Mask};
pub use highlight::CrossModalHighlighter;
pub use interaction::{
    Gesture, HitRegion, InteractionController, PointerInput, ResizeHandle, WheelInput,
};
pub use models::{
    BoundingBox, Detection, DisplayGeometry, FracPoint, FracRect, FracSize, OcrItem, OcrKey,
    OcrMatch, RectPx, RelationshipTable, Scene, TextClass, TranscriptLine, TranscriptMatch,
    ViewportSize,
};
pub use render::RenderController;
pub use scene_index::SceneTimeIndex;
pub use search::{
    exact_match, find_all_matches, fuzzy_match, highlight_spans, Emphasis, HighlightSegment,
    SearchMatch, SearchNavigator,
};
pub use video::VideoSource;
