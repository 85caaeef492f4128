//! Bar visualizer: spectrum-to-bar mapping, smoothing, colour policy and
//! the demo-mode idle animation.

mod bars;
mod color;
mod demo;

// Re-export public types
pub use bars::{spectrum_index, BarMapper, BarRect};
pub use color::{Color, ColorBands};
pub use demo::DemoSignal;
