//! Synthetic idle animation used when no audio is available.

use rand::Rng;
use std::f32::consts::TAU;

/// Fast term frequency relative to the slow one
const FAST_RATIO: f32 = 2.3;

/// Shortest phase span after which both terms repeat (2.3 · 20 = 46 turns)
const PERIOD: f32 = 20.0 * TAU;

/// Two superimposed travelling sines plus bounded jitter
///
/// The phase is an explicit accumulator advanced once per [`advance`](Self::advance),
/// and jitter comes from an injected RNG so runs are reproducible with a
/// seeded generator.
pub struct DemoSignal<R> {
    phase: f32,
    phase_step: f32,
    jitter: f32,
    rng: R,
}

impl<R: Rng> DemoSignal<R> {
    pub fn new(rng: R, phase_step: f32, jitter: f32) -> Self {
        Self {
            phase: 0.0,
            phase_step,
            jitter: jitter.abs(),
            rng,
        }
    }

    pub fn phase(&self) -> f32 {
        self.phase
    }

    pub fn set_phase(&mut self, phase: f32) {
        self.phase = phase;
    }

    /// Step the phase accumulator, wrapped to the common period of both terms
    pub fn advance(&mut self) {
        self.phase = (self.phase + self.phase_step) % PERIOD;
    }

    /// Intensity in [0, 1] for bar `index` of `count` at the current phase
    pub fn sample(&mut self, index: usize, count: usize) -> f32 {
        let base = Self::shape(self.phase, index, count);
        let jitter = if self.jitter > 0.0 {
            self.rng.gen_range(-self.jitter..=self.jitter)
        } else {
            0.0
        };
        (base + jitter).clamp(0.0, 1.0)
    }

    /// Deterministic part of the signal, before jitter and clamping
    pub fn shape(phase: f32, index: usize, count: usize) -> f32 {
        let t = index as f32 / count.max(1) as f32;
        let slow = 0.25 * (phase + 1.5 * TAU * t).sin();
        let fast = 0.15 * (FAST_RATIO * phase - 4.0 * TAU * t).sin();
        // Lean toward the low end like real music
        (0.35 + slow + fast) * (1.0 - 0.4 * t)
    }
}
