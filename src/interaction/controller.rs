//! Direct-manipulation controller.
//!
//! Translates raw pointer/wheel input into geometry mutations on extracted
//! elements. The platform layer only feeds events in and renders results
//! out; all gesture logic and geometry math lives here.

use std::collections::HashMap;

use image::RgbaImage;
use log::warn;

use crate::extraction::{ExtractedElement, ExtractionManager};
use crate::models::{DisplayGeometry, RectPx, ViewportSize};
use crate::render::surface::{resample_into, resize_surface};

use super::geometry::{drag_update, resize_update, zoom_step};
use super::state::{Gesture, HitRegion, PointerInput, WheelInput};

#[derive(Debug, Default)]
pub struct InteractionController {
    gestures: HashMap<String, Gesture>,
}

impl InteractionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gesture(&self, element_id: &str) -> Gesture {
        self.gestures
            .get(element_id)
            .copied()
            .unwrap_or(Gesture::Idle)
    }

    /// Begin a drag or resize. Returns false when the gesture is rejected:
    /// unknown element, locked element, or a gesture already in flight for
    /// this element.
    pub fn on_pointer_down(
        &mut self,
        manager: &ExtractionManager,
        element_id: &str,
        input: PointerInput,
        region: HitRegion,
        viewport: ViewportSize,
    ) -> bool {
        let Some(element) = manager.element(element_id) else {
            return false;
        };
        if element.is_locked {
            return false;
        }
        if !self.gesture(element_id).is_idle() {
            return false;
        }

        let rect = element.display_rect(viewport);
        let gesture = match region {
            HitRegion::Body => Gesture::Dragging {
                grab_offset: (input.x - rect.x, input.y - rect.y),
            },
            HitRegion::Handle(handle) => Gesture::Resizing {
                handle,
                start_rect: rect,
            },
        };
        self.gestures.insert(element_id.to_string(), gesture);
        true
    }

    /// Apply pointer movement to the active gesture, if any.
    pub fn on_pointer_move(
        &mut self,
        manager: &mut ExtractionManager,
        element_id: &str,
        input: PointerInput,
        viewport: ViewportSize,
        frame: Option<&RgbaImage>,
    ) {
        let gesture = self.gesture(element_id);
        let Some(element) = manager.element_mut(element_id) else {
            return;
        };

        match gesture {
            Gesture::Idle => {}
            Gesture::Dragging { grab_offset } => {
                let rect = element.display_rect(viewport);
                let moved = drag_update(input.pos(), grab_offset, &rect);
                apply_rect(element, &moved, viewport, frame);
            }
            Gesture::Resizing { handle, start_rect } => {
                let resized =
                    resize_update(input.pos(), handle, &start_rect, !input.free_resize);
                apply_rect(element, &resized, viewport, frame);
            }
        }
    }

    /// Pointer release: unconditionally back to idle.
    pub fn on_pointer_up(&mut self, element_id: &str) {
        self.gestures.remove(element_id);
    }

    /// Loss of pointer capture is treated exactly like a release.
    pub fn on_capture_lost(&mut self, element_id: &str) {
        self.gestures.remove(element_id);
    }

    /// Wheel zoom: a fixed multiplicative step around the cursor, applied
    /// immediately. No gesture state is left behind.
    pub fn on_wheel(
        &mut self,
        manager: &mut ExtractionManager,
        element_id: &str,
        wheel: WheelInput,
        viewport: ViewportSize,
        frame: Option<&RgbaImage>,
    ) {
        let Some(element) = manager.element_mut(element_id) else {
            return;
        };
        if element.is_locked {
            return;
        }
        if wheel.delta_y == 0.0 {
            return;
        }

        let rect = element.display_rect(viewport);
        let zoomed = zoom_step((wheel.x, wheel.y), &rect, wheel.delta_y < 0.0);
        apply_rect(element, &zoomed, viewport, frame);
    }

    /// Forget any gesture for a deleted element.
    pub fn forget(&mut self, element_id: &str) {
        self.gestures.remove(element_id);
    }

    pub fn clear(&mut self) {
        self.gestures.clear();
    }
}

/// Store the new geometry as viewport fractions, keep the raster surface at
/// the new display size, and refresh its content so it doesn't visibly lag.
/// The element's mask is never touched: masks stay pinned to the original
/// detection position.
fn apply_rect(
    element: &mut ExtractedElement,
    rect: &RectPx,
    viewport: ViewportSize,
    frame: Option<&RgbaImage>,
) {
    let frac = rect.to_frac(viewport);
    element.position = frac.position();
    element.size = frac.size();

    if !element.is_canvas_view {
        return;
    }

    resize_surface(&mut element.surface, rect.width, rect.height);
    if let Some(frame) = frame {
        if let Err(err) = resample_into(frame, &element.source_rect, &mut element.surface) {
            warn!("gesture resample failed for element {}: {err:?}", element.id);
        }
    }
}

/// Map a viewport-pixel point to the element and hit region under it, top
/// element first. Handles win over the body within a small corner radius.
/// Only elements of the active scene are hittable; everything else is not
/// being rendered and must not capture the pointer.
pub fn hit_test(
    manager: &ExtractionManager,
    active_scene: Option<usize>,
    x: f64,
    y: f64,
    viewport: ViewportSize,
) -> Option<(String, HitRegion)> {
    const HANDLE_RADIUS_PX: f64 = 8.0;

    let active_scene = active_scene?;
    for element in manager.elements().iter().rev() {
        if element.scene_index != active_scene {
            continue;
        }
        let rect = element.display_rect(viewport);
        let near = |cx: f64, cy: f64| (x - cx).abs() <= HANDLE_RADIUS_PX && (y - cy).abs() <= HANDLE_RADIUS_PX;

        for handle in super::geometry::ResizeHandle::ALL {
            // The handle sits on the corner opposite its anchor.
            let opposite = match handle {
                super::geometry::ResizeHandle::TopLeft => (rect.x, rect.y),
                super::geometry::ResizeHandle::TopRight => (rect.x + rect.width, rect.y),
                super::geometry::ResizeHandle::BottomLeft => (rect.x, rect.y + rect.height),
                super::geometry::ResizeHandle::BottomRight => {
                    (rect.x + rect.width, rect.y + rect.height)
                }
            };
            if near(opposite.0, opposite.1) {
                return Some((element.id.clone(), HitRegion::Handle(handle)));
            }
        }

        if rect.contains(x, y) {
            return Some((element.id.clone(), HitRegion::Body));
        }
    }
    None
}

/// Convenience used by hosting code after a layout change: no geometry needs
/// recomputing because positions and sizes are stored as viewport fractions,
/// but raster surfaces must be resized to the new pixel dimensions.
pub fn refresh_surfaces_for_viewport(
    manager: &mut ExtractionManager,
    display: &DisplayGeometry,
    frame: Option<&RgbaImage>,
) {
    let viewport = display.viewport;
    for element in manager.elements_mut() {
        if !element.is_canvas_view {
            continue;
        }
        let rect = element.display_rect(viewport);
        resize_surface(&mut element.surface, rect.width, rect.height);
        if let Some(frame) = frame {
            if let Err(err) = resample_into(frame, &element.source_rect, &mut element.surface) {
                warn!("viewport refresh resample failed for {}: {err:?}", element.id);
            }
        }
    }
}
