//! Geometry primitives shared across the engine.
//!
//! Three coordinate spaces are in play:
//! - intrinsic pixels: the video's native pixel space, used by backend
//!   detections (`BoundingBox`)
//! - display pixels: the on-screen viewport (`RectPx`)
//! - viewport fractions: resolution-independent element geometry
//!   (`FracPoint`/`FracSize`/`FracRect`)
//!
//! Fractions are the source of truth for element position/size; pixels are
//! always derived through a `ViewportSize` or `DisplayGeometry`.

use serde::{Deserialize, Serialize};

/// Axis-aligned box in the video's intrinsic pixel space.
/// Backend wire format is a `[x1, y1, x2, y2]` array.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 4]", into = "[f64; 4]")]
pub struct BoundingBox {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl From<[f64; 4]> for BoundingBox {
    fn from(v: [f64; 4]) -> Self {
        Self {
            x1: v[0],
            y1: v[1],
            x2: v[2],
            y2: v[3],
        }
    }
}

impl From<BoundingBox> for [f64; 4] {
    fn from(b: BoundingBox) -> Self {
        [b.x1, b.y1, b.x2, b.y2]
    }
}

impl BoundingBox {
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    pub fn width(&self) -> f64 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> f64 {
        self.y2 - self.y1
    }

    /// A box is usable only if it has strictly positive area and finite
    /// coordinates. Backend records occasionally carry degenerate boxes.
    pub fn is_valid(&self) -> bool {
        self.x1.is_finite()
            && self.y1.is_finite()
            && self.x2.is_finite()
            && self.y2.is_finite()
            && self.width() > 0.0
            && self.height() > 0.0
    }

    /// Clamp to the given intrinsic frame dimensions.
    pub fn clamped_to(&self, frame_width: u32, frame_height: u32) -> Self {
        let w = frame_width as f64;
        let h = frame_height as f64;
        Self {
            x1: self.x1.clamp(0.0, w),
            y1: self.y1.clamp(0.0, h),
            x2: self.x2.clamp(0.0, w),
            y2: self.y2.clamp(0.0, h),
        }
    }
}

/// Rectangle in display (viewport) pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RectPx {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl RectPx {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn contains(&self, px: f64, py: f64) -> bool {
        px >= self.x && px < self.x + self.width && py >= self.y && py < self.y + self.height
    }

    pub fn to_frac(&self, viewport: ViewportSize) -> FracRect {
        FracRect {
            x: self.x / viewport.width,
            y: self.y / viewport.height,
            width: self.width / viewport.width,
            height: self.height / viewport.height,
        }
    }
}

/// Logical pixel size of the hosting viewport.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewportSize {
    pub width: f64,
    pub height: f64,
}

impl ViewportSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Point stored as a fraction of the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FracPoint {
    pub x: f64,
    pub y: f64,
}

impl FracPoint {
    pub fn to_px(&self, viewport: ViewportSize) -> (f64, f64) {
        (self.x * viewport.width, self.y * viewport.height)
    }

    pub fn from_px(x: f64, y: f64, viewport: ViewportSize) -> Self {
        Self {
            x: x / viewport.width,
            y: y / viewport.height,
        }
    }
}

/// Size stored as a fraction of the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FracSize {
    pub width: f64,
    pub height: f64,
}

impl FracSize {
    pub fn to_px(&self, viewport: ViewportSize) -> (f64, f64) {
        (self.width * viewport.width, self.height * viewport.height)
    }

    pub fn from_px(width: f64, height: f64, viewport: ViewportSize) -> Self {
        Self {
            width: width / viewport.width,
            height: height / viewport.height,
        }
    }
}

/// Rectangle stored as fractions of the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FracRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl FracRect {
    pub fn to_px(&self, viewport: ViewportSize) -> RectPx {
        RectPx {
            x: self.x * viewport.width,
            y: self.y * viewport.height,
            width: self.width * viewport.width,
            height: self.height * viewport.height,
        }
    }

    pub fn position(&self) -> FracPoint {
        FracPoint {
            x: self.x,
            y: self.y,
        }
    }

    pub fn size(&self) -> FracSize {
        FracSize {
            width: self.width,
            height: self.height,
        }
    }
}

/// Where the video content actually sits inside the viewport.
///
/// The video element letterboxes (object-fit: contain), so the displayed
/// video rectangle is usually smaller than the viewport on one axis. All
/// intrinsic↔display conversions go through this.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayGeometry {
    pub viewport: ViewportSize,
    /// Displayed video rectangle, in viewport pixels.
    pub video_rect: RectPx,
    /// Intrinsic video dimensions in pixels.
    pub intrinsic_width: u32,
    pub intrinsic_height: u32,
}

impl DisplayGeometry {
    /// Compute the letterboxed video rectangle for a video of the given
    /// intrinsic size centered inside the viewport.
    pub fn fit(viewport: ViewportSize, intrinsic_width: u32, intrinsic_height: u32) -> Self {
        let vw = viewport.width;
        let vh = viewport.height;
        let iw = intrinsic_width.max(1) as f64;
        let ih = intrinsic_height.max(1) as f64;

        let scale = (vw / iw).min(vh / ih);
        let dw = iw * scale;
        let dh = ih * scale;

        Self {
            viewport,
            video_rect: RectPx {
                x: (vw - dw) / 2.0,
                y: (vh - dh) / 2.0,
                width: dw,
                height: dh,
            },
            intrinsic_width,
            intrinsic_height,
        }
    }

    fn scale_x(&self) -> f64 {
        self.video_rect.width / self.intrinsic_width.max(1) as f64
    }

    fn scale_y(&self) -> f64 {
        self.video_rect.height / self.intrinsic_height.max(1) as f64
    }

    /// Map an intrinsic-pixel box to viewport pixels.
    pub fn intrinsic_to_display(&self, bbox: &BoundingBox) -> RectPx {
        RectPx {
            x: self.video_rect.x + bbox.x1 * self.scale_x(),
            y: self.video_rect.y + bbox.y1 * self.scale_y(),
            width: bbox.width() * self.scale_x(),
            height: bbox.height() * self.scale_y(),
        }
    }

    /// Map a viewport-pixel rectangle back to intrinsic pixels.
    pub fn display_to_intrinsic(&self, rect: &RectPx) -> BoundingBox {
        let sx = self.scale_x();
        let sy = self.scale_y();
        BoundingBox {
            x1: (rect.x - self.video_rect.x) / sx,
            y1: (rect.y - self.video_rect.y) / sy,
            x2: (rect.x + rect.width - self.video_rect.x) / sx,
            y2: (rect.y + rect.height - self.video_rect.y) / sy,
        }
    }
}
