pub mod detection;
pub mod geometry;
pub mod relationship;
pub mod scene;
pub mod transcript;

pub use detection::{Detection, OcrItem, OcrSource, TextClass, YoloDetections};
pub use geometry::{
    BoundingBox, DisplayGeometry, FracPoint, FracRect, FracSize, RectPx, ViewportSize,
};
pub use relationship::{OcrKey, OcrMatch, RelationshipTable, TranscriptMatch};
pub use scene::Scene;
pub use transcript::{active_line_at, TranscriptLine};
