//! Command-line argument parsing.

use clap::{Parser, ValueEnum};

use crate::params::{RenderConfig, Smoothing, VisualizerConfig};

/// Smoothing discipline selectable from the command line
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum SmoothingArg {
    /// Instant rise, slow linear fall
    AttackDecay,
    /// Exponential blend toward each frame's value
    Exponential,
}

impl From<SmoothingArg> for Smoothing {
    fn from(arg: SmoothingArg) -> Self {
        match arg {
            SmoothingArg::AttackDecay => Smoothing::attack_decay(),
            SmoothingArg::Exponential => Smoothing::exponential(),
        }
    }
}

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "SoundWave")]
#[command(about = "Desktop overlay visualizing system audio as a bar spectrum", long_about = None)]
pub struct Args {
    /// Number of bars
    #[arg(long, value_name = "COUNT", default_value_t = 64)]
    pub bars: usize,

    /// Window width (logical pixels)
    #[arg(long, value_name = "PIXELS", default_value_t = 800)]
    pub width: u32,

    /// Window height (logical pixels)
    #[arg(long, value_name = "PIXELS", default_value_t = 200)]
    pub height: u32,

    /// Temporal smoothing applied to every bar
    #[arg(long, value_enum, default_value_t = SmoothingArg::AttackDecay)]
    pub smoothing: SmoothingArg,

    /// Seed for the demo animation jitter
    #[arg(long, value_name = "SEED")]
    pub seed: Option<u64>,

    /// Skip audio capture and run the demo animation
    #[arg(long)]
    pub demo: bool,

    /// Start with the background panel visible (toggle with B)
    #[arg(long)]
    pub background: bool,
}

impl Args {
    pub fn visualizer_config(&self) -> VisualizerConfig {
        VisualizerConfig {
            bar_count: self.bars,
            smoothing: self.smoothing.into(),
            seed: self.seed,
            ..Default::default()
        }
    }

    pub fn render_config(&self) -> RenderConfig {
        RenderConfig {
            window_width: self.width,
            window_height: self.height,
            show_background: self.background,
            ..Default::default()
        }
    }
}
