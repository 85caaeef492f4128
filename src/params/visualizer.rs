//! Bar visualizer configuration: mapping, smoothing and geometry.

use crate::error::ConfigError;

/// Temporal smoothing discipline applied to every bar
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Smoothing {
    /// Snap up to rising values, fall by a fixed step per frame
    AttackDecay {
        /// Intensity lost per update when the input drops
        decay_step: f32,
    },

    /// smoothed = smoothed·(1 − blend) + value·blend
    Exponential {
        /// Blend factor k in (0, 1]
        blend: f32,
    },
}

impl Smoothing {
    pub const DEFAULT_DECAY_STEP: f32 = 0.02;
    pub const DEFAULT_BLEND: f32 = 0.3;

    pub fn attack_decay() -> Self {
        Self::AttackDecay {
            decay_step: Self::DEFAULT_DECAY_STEP,
        }
    }

    pub fn exponential() -> Self {
        Self::Exponential {
            blend: Self::DEFAULT_BLEND,
        }
    }

    /// Advance one smoothed value toward the current-frame value
    pub fn apply(&self, previous: f32, value: f32) -> f32 {
        let next = match *self {
            Self::AttackDecay { decay_step } => {
                if value > previous {
                    value
                } else {
                    previous - decay_step
                }
            }
            Self::Exponential { blend } => previous * (1.0 - blend) + value * blend,
        };
        next.clamp(0.0, 1.0)
    }
}

impl Default for Smoothing {
    fn default() -> Self {
        Self::attack_decay()
    }
}

/// Bar visualizer configuration
#[derive(Debug, Clone)]
pub struct VisualizerConfig {
    /// Number of bars (fixed for the lifetime of a mapper)
    pub bar_count: usize,

    /// Gap between adjacent bars (pixels)
    pub gap_px: f32,

    /// Multiplier on spectrum values before clamping to [0, 1]
    /// Compensates for the analyzer's conservative dB ceiling
    pub gain: f32,

    /// Fraction of the surface height a full-scale bar occupies
    pub height_scale: f32,

    /// Bars never shrink below this height (pixels)
    pub min_bar_height_px: f32,

    /// Temporal smoothing discipline
    pub smoothing: Smoothing,

    /// Demo-mode phase advance per update (radians)
    pub demo_phase_step: f32,

    /// Demo-mode jitter amplitude (± intensity)
    pub demo_jitter: f32,

    /// Seed for the demo-mode jitter source (None = entropy)
    pub seed: Option<u64>,
}

impl Default for VisualizerConfig {
    fn default() -> Self {
        Self {
            bar_count: 64,
            gap_px: 2.0,
            gain: 2.0,
            height_scale: 0.85,
            min_bar_height_px: 3.0,
            smoothing: Smoothing::default(),
            demo_phase_step: 0.05,
            demo_jitter: 0.05,
            seed: None,
        }
    }
}

impl VisualizerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bar_count == 0 {
            return Err(ConfigError::ZeroBars);
        }
        match self.smoothing {
            Smoothing::AttackDecay { decay_step } if !(decay_step > 0.0 && decay_step <= 1.0) => {
                return Err(ConfigError::Smoothing(decay_step));
            }
            Smoothing::Exponential { blend } if !(blend > 0.0 && blend <= 1.0) => {
                return Err(ConfigError::Smoothing(blend));
            }
            _ => {}
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attack_snaps_up() {
        let smoothing = Smoothing::attack_decay();
        assert_eq!(smoothing.apply(0.1, 0.9), 0.9);
    }

    #[test]
    fn test_decay_is_floored() {
        let smoothing = Smoothing::attack_decay();
        assert_eq!(smoothing.apply(0.01, 0.0), 0.0);
    }

    #[test]
    fn test_exponential_blend() {
        let smoothing = Smoothing::exponential();
        let next = smoothing.apply(0.0, 1.0);
        assert!((next - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_zero_bars_rejected() {
        let config = VisualizerConfig {
            bar_count: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::ZeroBars)));
    }

    #[test]
    fn test_bad_smoothing_rejected() {
        let config = VisualizerConfig {
            smoothing: Smoothing::Exponential { blend: 0.0 },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
