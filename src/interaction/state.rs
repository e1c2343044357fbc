//! Gesture state machine types.
//!
//! Per element: `Idle → {Dragging | Resizing} → Idle`. Wheel zoom is applied
//! per event and never lingers in the state machine. Any pointer release or
//! loss of capture unconditionally returns to `Idle`, so no gesture can get
//! stuck.

use serde::{Deserialize, Serialize};

use crate::models::RectPx;

use super::geometry::ResizeHandle;

/// Raw pointer event fed in by the platform input layer.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointerInput {
    pub x: f64,
    pub y: f64,
    /// Free-resize modifier (Shift). Aspect ratio is preserved by default;
    /// holding the modifier switches the active resize to free-form.
    pub free_resize: bool,
}

impl PointerInput {
    pub fn at(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            free_resize: false,
        }
    }

    pub fn pos(&self) -> (f64, f64) {
        (self.x, self.y)
    }
}

/// Wheel event fed in by the platform input layer.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WheelInput {
    pub x: f64,
    pub y: f64,
    /// Positive scrolls down (zoom out), negative scrolls up (zoom in).
    pub delta_y: f64,
}

/// Where a pointer-down landed on an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HitRegion {
    Body,
    Handle(ResizeHandle),
}

/// Active gesture for one element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gesture {
    Idle,
    Dragging {
        /// Pointer offset from the element origin at grab time, display px.
        grab_offset: (f64, f64),
    },
    Resizing {
        handle: ResizeHandle,
        /// Element rectangle at gesture start; resize math is computed from
        /// this, not from the intermediate rects.
        start_rect: RectPx,
    },
}

impl Gesture {
    pub fn is_idle(&self) -> bool {
        matches!(self, Gesture::Idle)
    }
}

impl Default for Gesture {
    fn default() -> Self {
        Gesture::Idle
    }
}
