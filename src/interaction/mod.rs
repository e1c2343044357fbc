pub mod controller;
pub mod geometry;
pub mod state;

pub use controller::{hit_test, refresh_surfaces_for_viewport, InteractionController};
pub use geometry::{ResizeHandle, MIN_ELEMENT_SIZE_PX};
pub use state::{Gesture, HitRegion, PointerInput, WheelInput};
