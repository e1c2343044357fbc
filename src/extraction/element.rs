//! Extracted elements: user-manipulable floating copies of detected regions.

use image::RgbaImage;
use tokio_util::sync::CancellationToken;

use crate::models::{BoundingBox, FracPoint, FracSize, RectPx, TextClass, ViewportSize};

use super::mask::Mask;

/// A floating copy of one detected region, scoped to one scene.
///
/// Position and size are stored as viewport fractions so they survive
/// container resizes; pixel geometry is always derived. `source_rect` is the
/// intrinsic-pixel rectangle resampled from the live frame every tick while
/// the element is in raster view.
#[derive(Debug, Clone)]
pub struct ExtractedElement {
    pub id: String,
    pub scene_index: usize,
    /// Intrinsic-pixel source rectangle used for per-frame resampling.
    pub source_rect: BoundingBox,
    /// Top-left corner, viewport fraction.
    pub position: FracPoint,
    /// Size, viewport fraction.
    pub size: FracSize,
    pub ocr_text: Option<String>,
    pub text_class: Option<TextClass>,
    pub is_locked: bool,
    /// Raster view: the element shows a continuously refreshed copy of the
    /// video region. When false the element renders its recognized text.
    pub is_canvas_view: bool,
    pub is_text_mode: bool,
    pub is_highlighted: bool,
    /// Occlusion mask pinned to the original detection position.
    pub mask: Mask,
    /// Private raster surface the render loop draws into.
    pub surface: RgbaImage,
    /// Layout-change observers and pollers attached to this element; cancelled
    /// when the element is deleted.
    pub subscriptions: CancellationToken,
}

impl ExtractedElement {
    /// Current on-screen rectangle for the given viewport size.
    pub fn display_rect(&self, viewport: ViewportSize) -> RectPx {
        let (x, y) = self.position.to_px(viewport);
        let (w, h) = self.size.to_px(viewport);
        RectPx::new(x, y, w, h)
    }

    pub fn aspect_ratio(&self) -> f64 {
        if self.size.height == 0.0 {
            1.0
        } else {
            self.size.width / self.size.height
        }
    }

    /// Switch between raster view and text rendering. Only meaningful for
    /// elements that carry recognized text.
    pub fn set_text_mode(&mut self, text_mode: bool) {
        if text_mode && self.ocr_text.is_none() {
            return;
        }
        self.is_text_mode = text_mode;
        self.is_canvas_view = !text_mode;
    }

    pub fn set_locked(&mut self, locked: bool) {
        self.is_locked = locked;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbaImage;

    fn element() -> ExtractedElement {
        ExtractedElement {
            id: "e1".into(),
            scene_index: 0,
            source_rect: BoundingBox::new(0.0, 0.0, 100.0, 50.0),
            position: FracPoint { x: 0.25, y: 0.5 },
            size: FracSize {
                width: 0.2,
                height: 0.1,
            },
            ocr_text: Some("hello".into()),
            text_class: None,
            is_locked: false,
            is_canvas_view: true,
            is_text_mode: false,
            is_highlighted: false,
            mask: Mask {
                rect: crate::models::FracRect {
                    x: 0.25,
                    y: 0.5,
                    width: 0.2,
                    height: 0.1,
                },
                color: image::Rgba([128, 128, 128, 255]),
            },
            surface: RgbaImage::new(1, 1),
            subscriptions: CancellationToken::new(),
        }
    }

    #[test]
    fn display_rect_derives_from_fractions() {
        let rect = element().display_rect(ViewportSize::new(1000.0, 800.0));
        assert_eq!(rect.x, 250.0);
        assert_eq!(rect.y, 400.0);
        assert_eq!(rect.width, 200.0);
        assert_eq!(rect.height, 80.0);
    }

    #[test]
    fn text_mode_requires_ocr_text() {
        let mut el = element();
        el.ocr_text = None;
        el.set_text_mode(true);
        assert!(!el.is_text_mode);

        let mut el = element();
        el.set_text_mode(true);
        assert!(el.is_text_mode);
        assert!(!el.is_canvas_view);
        el.set_text_mode(false);
        assert!(el.is_canvas_view);
    }
}
