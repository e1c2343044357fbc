pub mod controller;
pub mod loop_worker;
pub mod surface;

pub use controller::RenderController;
