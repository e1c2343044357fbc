//! Occlusion masks.
//!
//! A mask paints over a detection's original on-screen location once its
//! content has been lifted into a floating copy, so the same content is not
//! visible twice. Mask geometry is pinned to the original detection position
//! and never follows the extracted element around.

use image::{Rgba, RgbaImage};

use crate::models::{BoundingBox, DisplayGeometry, FracRect};

/// Width of the border strip sampled around the region, intrinsic pixels.
const BORDER_STRIP_PX: u32 = 10;
/// Gap between the region edge and the sampled strip.
const BORDER_PADDING_PX: u32 = 2;

/// Fallback when the region touches the frame edge on all sides and no
/// border pixels can be sampled.
const NEUTRAL_GRAY: Rgba<u8> = Rgba([128, 128, 128, 255]);

#[derive(Debug, Clone, PartialEq)]
pub struct Mask {
    /// Viewport-fraction rectangle of the original detection position.
    pub rect: FracRect,
    /// Average border color used to paint the occluded region.
    pub color: Rgba<u8>,
}

impl Mask {
    /// Build a mask for a detection box: geometry from the current display
    /// mapping, color from the border strip of the current frame.
    pub fn for_region(
        bbox: &BoundingBox,
        frame: Option<&RgbaImage>,
        display: &DisplayGeometry,
    ) -> Self {
        let rect = display
            .intrinsic_to_display(bbox)
            .to_frac(display.viewport);
        let color = frame
            .map(|f| sample_border_color(f, bbox))
            .unwrap_or(NEUTRAL_GRAY);
        Self { rect, color }
    }
}

/// Average the pixels of a fixed-width strip around the region (top, bottom,
/// left, right, with a small padding). Used as the mask fill so the occluded
/// patch blends with the slide background around it.
pub fn sample_border_color(frame: &RgbaImage, bbox: &BoundingBox) -> Rgba<u8> {
    let (fw, fh) = frame.dimensions();
    let clamped = bbox.clamped_to(fw, fh);
    if !clamped.is_valid() {
        return NEUTRAL_GRAY;
    }

    let x1 = clamped.x1 as i64;
    let y1 = clamped.y1 as i64;
    let x2 = clamped.x2 as i64;
    let y2 = clamped.y2 as i64;

    let pad = BORDER_PADDING_PX as i64;
    let strip = BORDER_STRIP_PX as i64;

    let mut sum = [0u64; 3];
    let mut count = 0u64;

    let mut accumulate = |sx1: i64, sy1: i64, sx2: i64, sy2: i64| {
        let sx1 = sx1.max(0);
        let sy1 = sy1.max(0);
        let sx2 = sx2.min(fw as i64);
        let sy2 = sy2.min(fh as i64);
        for y in sy1..sy2 {
            for x in sx1..sx2 {
                let px = frame.get_pixel(x as u32, y as u32);
                sum[0] += px.0[0] as u64;
                sum[1] += px.0[1] as u64;
                sum[2] += px.0[2] as u64;
                count += 1;
            }
        }
    };

    // Top and bottom strips span the region width plus both side strips.
    accumulate(x1 - pad - strip, y1 - pad - strip, x2 + pad + strip, y1 - pad);
    accumulate(x1 - pad - strip, y2 + pad, x2 + pad + strip, y2 + pad + strip);
    // Left and right strips cover the remaining region height.
    accumulate(x1 - pad - strip, y1 - pad, x1 - pad, y2 + pad);
    accumulate(x2 + pad, y1 - pad, x2 + pad + strip, y2 + pad);

    if count == 0 {
        return NEUTRAL_GRAY;
    }

    Rgba([
        (sum[0] / count) as u8,
        (sum[1] / count) as u8,
        (sum[2] / count) as u8,
        255,
    ])
}
