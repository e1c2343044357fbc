pub mod config;
pub mod element;
pub mod manager;
pub mod mask;

pub use config::ExtractionConfig;
pub use element::ExtractedElement;
pub use manager::{DetectionSource, ExtractionManager};
pub use mask::Mask;
