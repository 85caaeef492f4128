//! SoundWave library - system audio spectrum as an animated bar overlay

pub mod audio;
pub mod cli;
pub mod error;
pub mod params;
pub mod pipeline;
pub mod rendering;
pub mod visualizer;
