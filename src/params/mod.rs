//! Parameter definitions with physical units and documented semantics.
//!
//! All tunables are extracted here with:
//! - Units (Hz, samples, pixels, radians)
//! - Documented ranges and meanings
//! - A `validate()` guarding the invariants the pipeline relies on

mod audio;
mod render;
mod visualizer;

// Re-export all types
pub use audio::{AnalyzerConfig, CaptureConfig};
pub use render::RenderConfig;
pub use visualizer::{Smoothing, VisualizerConfig};
