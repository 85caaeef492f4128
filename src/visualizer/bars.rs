//! Spectrum → bar mapping with temporal smoothing.

use glam::Vec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::color::{Color, ColorBands};
use super::demo::DemoSignal;
use crate::error::ConfigError;
use crate::params::VisualizerConfig;

/// One rectangle for the rendering surface (pixels, origin top-left)
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BarRect {
    pub position: Vec2,
    pub size: Vec2,
    pub color: Color,
}

/// Maps a magnitude spectrum (or the demo signal) onto a fixed set of bars
///
/// Owns only numeric state: one smoothed intensity per bar plus the surface
/// geometry. Drawing is left to whoever consumes [`emit_draw_state`](Self::emit_draw_state).
pub struct BarMapper<R = StdRng> {
    config: VisualizerConfig,
    colors: ColorBands,
    demo: DemoSignal<R>,
    smoothed: Vec<f32>,
    width: f32,
    height: f32,
    bar_width: f32,
}

impl BarMapper<StdRng> {
    /// Create a mapper whose demo jitter is seeded from `config.seed` (or entropy)
    pub fn new(config: VisualizerConfig, width: f32, height: f32) -> Result<Self, ConfigError> {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(config, width, height, rng)
    }
}

impl<R: Rng> BarMapper<R> {
    /// Create a mapper with an injected jitter source
    pub fn with_rng(
        config: VisualizerConfig,
        width: f32,
        height: f32,
        rng: R,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let demo = DemoSignal::new(rng, config.demo_phase_step, config.demo_jitter);
        let mut mapper = Self {
            smoothed: vec![0.0; config.bar_count],
            colors: ColorBands::default(),
            demo,
            config,
            width: 0.0,
            height: 0.0,
            bar_width: 0.0,
        };
        mapper.resize(width, height);
        Ok(mapper)
    }

    pub fn bar_count(&self) -> usize {
        self.smoothed.len()
    }

    pub fn bar_width(&self) -> f32 {
        self.bar_width
    }

    /// Smoothed intensity per bar, each in [0, 1]
    pub fn smoothed(&self) -> &[f32] {
        &self.smoothed
    }

    pub fn demo(&self) -> &DemoSignal<R> {
        &self.demo
    }

    pub fn demo_mut(&mut self) -> &mut DemoSignal<R> {
        &mut self.demo
    }

    /// Advance one frame
    ///
    /// An empty spectrum runs demo mode; anything else runs live mode. The
    /// demo phase advances once per call either way.
    pub fn update(&mut self, spectrum: &[f32]) {
        self.demo.advance();

        let count = self.smoothed.len();
        let smoothing = self.config.smoothing;

        if spectrum.is_empty() {
            for i in 0..count {
                let value = self.demo.sample(i, count);
                self.smoothed[i] = smoothing.apply(self.smoothed[i], value);
            }
            return;
        }

        let gain = self.config.gain;
        for (i, smoothed) in self.smoothed.iter_mut().enumerate() {
            let index = spectrum_index(i, count, spectrum.len());
            let value = (spectrum[index] * gain).clamp(0.0, 1.0);
            *smoothed = smoothing.apply(*smoothed, value);
        }
    }

    /// Recompute per-bar geometry for a new surface size
    ///
    /// Smoothed intensities are kept so the animation does not jump.
    pub fn resize(&mut self, width: f32, height: f32) {
        let count = self.smoothed.len() as f32;
        let gaps = self.config.gap_px * (count - 1.0);

        self.width = width.max(0.0);
        self.height = height.max(0.0);
        self.bar_width = ((self.width - gaps) / count).max(1.0);
    }

    /// Rectangles for the current bar state, bottom-anchored, one per bar
    pub fn emit_draw_state(&self) -> Vec<BarRect> {
        let max_height = self.height;
        let step = self.bar_width + self.config.gap_px;

        self.smoothed
            .iter()
            .enumerate()
            .map(|(i, &intensity)| {
                let height = (intensity * max_height * self.config.height_scale)
                    .max(self.config.min_bar_height_px)
                    .min(max_height);
                BarRect {
                    position: Vec2::new(i as f32 * step, max_height - height),
                    size: Vec2::new(self.bar_width, height),
                    color: self.colors.color_for(intensity),
                }
            })
            .collect()
    }
}

/// Spectrum bin sampled by bar `bar` of `bar_count`
///
/// Power-law skew `floor(t² · len / 2)` with `t = bar / bar_count`, which
/// spends most bars on the low end of the spectrum.
pub fn spectrum_index(bar: usize, bar_count: usize, spectrum_len: usize) -> usize {
    if spectrum_len == 0 {
        return 0;
    }
    let t = bar as f32 / bar_count.max(1) as f32;
    let index = (t * t * spectrum_len as f32 / 2.0).floor() as usize;
    index.min(spectrum_len - 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::Smoothing;
    use approx::assert_abs_diff_eq;

    fn mapper(smoothing: Smoothing) -> BarMapper {
        let config = VisualizerConfig {
            smoothing,
            seed: Some(42),
            ..Default::default()
        };
        BarMapper::new(config, 800.0, 200.0).unwrap()
    }

    #[test]
    fn test_zero_bars_rejected() {
        let config = VisualizerConfig {
            bar_count: 0,
            ..Default::default()
        };
        assert!(matches!(
            BarMapper::new(config, 800.0, 200.0),
            Err(ConfigError::ZeroBars)
        ));
    }

    #[test]
    fn test_draw_state_always_bar_count() {
        let mut bars = mapper(Smoothing::attack_decay());
        assert_eq!(bars.emit_draw_state().len(), 64);

        bars.update(&[]);
        assert_eq!(bars.emit_draw_state().len(), 64);

        bars.update(&[0.3; 512]);
        assert_eq!(bars.emit_draw_state().len(), 64);

        bars.update(&[1.0; 3]);
        assert_eq!(bars.emit_draw_state().len(), 64);
    }

    #[test]
    fn test_power_law_index() {
        assert_eq!(spectrum_index(0, 64, 512), 0);
        assert_eq!(spectrum_index(63, 64, 512), 248);
        assert_eq!(spectrum_index(32, 64, 512), 64);

        // Low bars stay densely packed at the bottom of the spectrum
        let indices: Vec<_> = (0..64).map(|i| spectrum_index(i, 64, 512)).collect();
        assert!(indices.windows(2).all(|w| w[0] <= w[1]));
        assert!(indices[..16].iter().all(|&i| i < 16));
    }

    #[test]
    fn test_index_clamped_to_short_spectrum() {
        assert_eq!(spectrum_index(63, 64, 1), 0);
        assert!(spectrum_index(63, 64, 3) <= 2);
        assert_eq!(spectrum_index(5, 64, 0), 0);
    }

    #[test]
    fn test_attack_is_instant() {
        let mut bars = mapper(Smoothing::attack_decay());

        // 0.5 × gain 2.0 = full scale
        bars.update(&[0.5; 512]);

        assert!(bars.smoothed().iter().all(|&v| v == 1.0));
    }

    #[test]
    fn test_decay_is_linear() {
        let mut bars = mapper(Smoothing::attack_decay());
        bars.update(&[0.5; 512]);

        let silence = [0.0; 512];
        let mut previous = bars.smoothed()[10];
        for step in 1..=50 {
            bars.update(&silence);
            let current = bars.smoothed()[10];
            assert!(previous - current <= 0.02 + 1e-6);
            if step < 50 {
                assert!(current > 0.0, "reached zero early at step {step}");
            }
            previous = current;
        }
        assert_abs_diff_eq!(bars.smoothed()[10], 0.0, epsilon = 1e-5);

        bars.update(&silence);
        assert_eq!(bars.smoothed()[10], 0.0);
    }

    #[test]
    fn test_exponential_step_response() {
        let mut bars = mapper(Smoothing::exponential());

        bars.update(&[0.5; 512]);
        assert_abs_diff_eq!(bars.smoothed()[0], 0.3, epsilon = 1e-6);

        bars.update(&[0.5; 512]);
        assert_abs_diff_eq!(bars.smoothed()[0], 0.51, epsilon = 1e-6);

        bars.update(&[0.0; 512]);
        assert_abs_diff_eq!(bars.smoothed()[0], 0.357, epsilon = 1e-6);
    }

    #[test]
    fn test_gain_clamped() {
        let mut bars = mapper(Smoothing::attack_decay());
        bars.update(&[0.9; 512]);
        assert!(bars.smoothed().iter().all(|&v| v == 1.0));
    }

    #[test]
    fn test_demo_mode_deterministic_with_seed() {
        let mut a = mapper(Smoothing::attack_decay());
        let mut b = mapper(Smoothing::attack_decay());

        for _ in 0..30 {
            a.update(&[]);
            b.update(&[]);
        }

        assert_eq!(a.smoothed(), b.smoothed());
        assert!(a.smoothed().iter().any(|&v| v > 0.0));
        assert!(a.smoothed().iter().all(|&v| (0.0..=1.0).contains(&v)));
    }

    #[test]
    fn test_demo_phase_advances_once_per_update() {
        let mut bars = mapper(Smoothing::attack_decay());
        bars.demo_mut().set_phase(1.0);

        bars.update(&[]);
        assert_abs_diff_eq!(bars.demo().phase(), 1.05, epsilon = 1e-6);

        bars.update(&[0.1; 512]);
        assert_abs_diff_eq!(bars.demo().phase(), 1.10, epsilon = 1e-6);
    }

    #[test]
    fn test_geometry() {
        let bars = mapper(Smoothing::attack_decay());
        let rects = bars.emit_draw_state();

        // (800 - 2·63) / 64
        assert_abs_diff_eq!(bars.bar_width(), 10.53125, epsilon = 1e-5);
        assert_eq!(rects[0].position.x, 0.0);
        assert_abs_diff_eq!(rects[1].position.x, 12.53125, epsilon = 1e-5);

        let last = rects[63];
        assert!(last.position.x + last.size.x <= 800.0 + 1e-3);
    }

    #[test]
    fn test_height_floor_and_scale() {
        let mut bars = mapper(Smoothing::attack_decay());

        // Silent bars keep a minimum sliver, bottom-anchored
        let rects = bars.emit_draw_state();
        assert_eq!(rects[0].size.y, 3.0);
        assert_eq!(rects[0].position.y, 197.0);

        bars.update(&[0.5; 512]);
        let rects = bars.emit_draw_state();
        assert_abs_diff_eq!(rects[0].size.y, 170.0, epsilon = 1e-4);
        assert_abs_diff_eq!(rects[0].position.y, 30.0, epsilon = 1e-4);
    }

    #[test]
    fn test_colors_follow_intensity() {
        let mut bars = mapper(Smoothing::attack_decay());
        let bands = ColorBands::default();

        assert_eq!(bars.emit_draw_state()[0].color, bands.low);

        bars.update(&[0.5; 512]);
        assert_eq!(bars.emit_draw_state()[0].color, bands.peak);
    }

    #[test]
    fn test_resize_preserves_intensity() {
        let mut bars = mapper(Smoothing::attack_decay());
        bars.update(&[0.3; 512]);
        let before = bars.smoothed().to_vec();

        bars.resize(400.0, 100.0);

        assert_eq!(bars.smoothed(), before.as_slice());
        assert_eq!(bars.emit_draw_state().len(), 64);
        // (400 - 126) / 64
        assert_abs_diff_eq!(bars.bar_width(), 4.28125, epsilon = 1e-5);
    }

    #[test]
    fn test_narrow_surface_keeps_visible_bars() {
        let mut bars = mapper(Smoothing::attack_decay());
        bars.resize(50.0, 2.0);

        assert_eq!(bars.bar_width(), 1.0);
        // Minimum height never exceeds the surface
        assert!(bars.emit_draw_state().iter().all(|r| r.size.y <= 2.0));
    }
}
