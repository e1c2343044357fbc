//! Pure geometry for drag, resize, and wheel zoom.
//!
//! All functions take and return display-pixel rectangles; the controller
//! converts to viewport fractions for storage. Invalid results are clamped,
//! never rejected: a gesture can only shrink an element to the minimum size,
//! not past it.

use serde::{Deserialize, Serialize};

use crate::models::RectPx;

/// Minimum element size per axis, logical pixels.
pub const MIN_ELEMENT_SIZE_PX: f64 = 20.0;

pub const ZOOM_IN_FACTOR: f64 = 1.1;
pub const ZOOM_OUT_FACTOR: f64 = 0.9;

/// The four corner resize handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ResizeHandle {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl ResizeHandle {
    pub const ALL: [ResizeHandle; 4] = [
        ResizeHandle::TopLeft,
        ResizeHandle::TopRight,
        ResizeHandle::BottomLeft,
        ResizeHandle::BottomRight,
    ];

    /// The corner held fixed while this handle is dragged.
    pub fn anchor(&self, rect: &RectPx) -> (f64, f64) {
        match self {
            ResizeHandle::TopLeft => (rect.x + rect.width, rect.y + rect.height),
            ResizeHandle::TopRight => (rect.x, rect.y + rect.height),
            ResizeHandle::BottomLeft => (rect.x + rect.width, rect.y),
            ResizeHandle::BottomRight => (rect.x, rect.y),
        }
    }

    /// Outward direction of the dragged corner relative to the anchor.
    fn direction(&self) -> (f64, f64) {
        match self {
            ResizeHandle::TopLeft => (-1.0, -1.0),
            ResizeHandle::TopRight => (1.0, -1.0),
            ResizeHandle::BottomLeft => (-1.0, 1.0),
            ResizeHandle::BottomRight => (1.0, 1.0),
        }
    }
}

/// Move the rectangle so its grab point follows the pointer. Unconstrained:
/// elements may be dragged anywhere, including off the video surface.
pub fn drag_update(pointer: (f64, f64), grab_offset: (f64, f64), rect: &RectPx) -> RectPx {
    RectPx {
        x: pointer.0 - grab_offset.0,
        y: pointer.1 - grab_offset.1,
        width: rect.width,
        height: rect.height,
    }
}

/// Recompute the rectangle for a corner-handle drag.
///
/// The anchor corner (opposite the handle) stays fixed. With
/// `preserve_aspect` the larger of the two axis deltas drives the other axis
/// so the start rectangle's ratio is kept; otherwise both axes follow the
/// pointer freely. Sizes clamp to `MIN_ELEMENT_SIZE_PX` per axis.
pub fn resize_update(
    pointer: (f64, f64),
    handle: ResizeHandle,
    start_rect: &RectPx,
    preserve_aspect: bool,
) -> RectPx {
    let anchor = handle.anchor(start_rect);
    let dir = handle.direction();

    // Outward extent of the dragged corner along each axis.
    let raw_w = (pointer.0 - anchor.0) * dir.0;
    let raw_h = (pointer.1 - anchor.1) * dir.1;

    let (mut width, mut height) = if preserve_aspect {
        let dw = raw_w - start_rect.width;
        let dh = raw_h - start_rect.height;
        let scale = if dw.abs() >= dh.abs() {
            raw_w / start_rect.width
        } else {
            raw_h / start_rect.height
        };
        // Keep the ratio exact while honouring the per-axis minimum.
        let min_scale = (MIN_ELEMENT_SIZE_PX / start_rect.width)
            .max(MIN_ELEMENT_SIZE_PX / start_rect.height);
        let scale = scale.max(min_scale);
        (start_rect.width * scale, start_rect.height * scale)
    } else {
        (raw_w, raw_h)
    };

    width = width.max(MIN_ELEMENT_SIZE_PX);
    height = height.max(MIN_ELEMENT_SIZE_PX);

    RectPx {
        x: if dir.0 < 0.0 { anchor.0 - width } else { anchor.0 },
        y: if dir.1 < 0.0 { anchor.1 - height } else { anchor.1 },
        width,
        height,
    }
}

/// Scale the rectangle by a fixed step around the cursor so the point under
/// the cursor stays visually stationary. Aspect ratio is always preserved;
/// the step is limited so neither axis drops below the minimum size.
pub fn zoom_step(cursor: (f64, f64), rect: &RectPx, zoom_in: bool) -> RectPx {
    let mut factor = if zoom_in {
        ZOOM_IN_FACTOR
    } else {
        ZOOM_OUT_FACTOR
    };

    let min_factor =
        (MIN_ELEMENT_SIZE_PX / rect.width).max(MIN_ELEMENT_SIZE_PX / rect.height);
    if factor < min_factor {
        factor = min_factor.min(1.0);
    }

    RectPx {
        x: cursor.0 - (cursor.0 - rect.x) * factor,
        y: cursor.1 - (cursor.1 - rect.y) * factor,
        width: rect.width * factor,
        height: rect.height * factor,
    }
}
