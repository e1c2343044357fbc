//! Interface to the playable media resource.
//!
//! The engine never decodes video itself; the hosting player implements
//! `VideoSource` and the engine reads playback time and decoded frames
//! through it.

use image::RgbaImage;

pub trait VideoSource: Send + Sync {
    /// Current playback position in seconds.
    fn current_time(&self) -> f64;

    /// Total duration in seconds.
    fn duration(&self) -> f64;

    /// Intrinsic pixel dimensions of the video.
    fn intrinsic_size(&self) -> (u32, u32);

    /// The currently decoded frame, or `None` when no frame is decodable
    /// yet (before first decode, during seeks). Callers treat `None` as a
    /// transient condition and retry on the next tick.
    fn current_frame(&self) -> Option<RgbaImage>;
}
