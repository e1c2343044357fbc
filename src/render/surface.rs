//! Raster surface resampling.

use anyhow::{bail, Result};
use image::RgbaImage;

use crate::models::BoundingBox;

/// Copy `source_rect` of the frame into `dest`, scaled to the destination
/// dimensions (nearest neighbour; surfaces track display size so quality is
/// adequate and the per-tick cost stays low).
///
/// Fails on a degenerate source rectangle or an empty destination; callers
/// in the render loop log and retry next tick.
pub fn resample_into(frame: &RgbaImage, source_rect: &BoundingBox, dest: &mut RgbaImage) -> Result<()> {
    let (fw, fh) = frame.dimensions();
    let clamped = source_rect.clamped_to(fw, fh);
    if !clamped.is_valid() {
        bail!("degenerate source rect {source_rect:?} for {fw}x{fh} frame");
    }

    let (dw, dh) = dest.dimensions();
    if dw == 0 || dh == 0 {
        bail!("empty destination surface");
    }

    let sx = clamped.width() / dw as f64;
    let sy = clamped.height() / dh as f64;

    for dy in 0..dh {
        let src_y = (clamped.y1 + (dy as f64 + 0.5) * sy) as u32;
        let src_y = src_y.min(fh - 1);
        for dx in 0..dw {
            let src_x = (clamped.x1 + (dx as f64 + 0.5) * sx) as u32;
            let src_x = src_x.min(fw - 1);
            dest.put_pixel(dx, dy, *frame.get_pixel(src_x, src_y));
        }
    }

    Ok(())
}

/// Resize an element's surface for a new display size, keeping at least one
/// pixel per axis. Contents are refreshed by the next resample.
pub fn resize_surface(surface: &mut RgbaImage, width_px: f64, height_px: f64) {
    let w = (width_px.round() as u32).max(1);
    let h = (height_px.round() as u32).max(1);
    if surface.dimensions() != (w, h) {
        *surface = RgbaImage::new(w, h);
    }
}
