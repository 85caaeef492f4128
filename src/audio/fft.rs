//! Windowed FFT producing a normalized dB magnitude spectrum.

use rustfft::{num_complex::Complex, Fft, FftPlanner};
use std::f32::consts::PI;
use std::sync::Arc;

use crate::error::AnalyzerError;
use crate::params::AnalyzerConfig;

/// Spectral analyzer with a planned FFT and precomputed Hann window
///
/// The FFT plan and scratch buffers are acquired once here and dropped with
/// the analyzer.
pub struct SpectralAnalyzer {
    config: AnalyzerConfig,
    fft: Arc<dyn Fft<f32>>,
    window: Vec<f32>,
    buffer: Vec<Complex<f32>>,
    scratch: Vec<Complex<f32>>,
    /// Last successfully computed spectrum (empty until the first analysis)
    spectrum: Vec<f32>,
}

impl SpectralAnalyzer {
    pub fn new(config: AnalyzerConfig) -> Self {
        let size = config.fft_size;
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(size);
        let scratch = vec![Complex::new(0.0, 0.0); fft.get_inplace_scratch_len()];

        Self {
            window: (0..size).map(|i| hann_window(i, size)).collect(),
            buffer: vec![Complex::new(0.0, 0.0); size],
            spectrum: Vec::with_capacity(size / 2),
            scratch,
            fft,
            config,
        }
    }

    /// Transform size N
    pub fn size(&self) -> usize {
        self.config.fft_size
    }

    pub fn window(&self) -> &[f32] {
        &self.window
    }

    /// Analyze the first N samples
    ///
    /// Returns the N / 2 bin magnitude spectrum, each bin
    /// `20·log10(|X| + 1) / db_ceiling` clamped to [0, 1].
    ///
    /// With fewer than N samples nothing is read and the previous spectrum
    /// is left untouched, so callers can keep drawing the last good frame.
    pub fn analyze(&mut self, samples: &[f32]) -> Result<&[f32], AnalyzerError> {
        let size = self.config.fft_size;
        if samples.len() < size {
            return Err(AnalyzerError::InsufficientSamples {
                required: size,
                available: samples.len(),
            });
        }

        // Apply Hann window
        for ((slot, &sample), &weight) in self.buffer.iter_mut().zip(samples).zip(&self.window) {
            *slot = Complex::new(sample * weight, 0.0);
        }

        // Perform FFT
        self.fft.process_with_scratch(&mut self.buffer, &mut self.scratch);

        // Keep the non-mirrored half
        let ceiling = self.config.db_ceiling;
        self.spectrum.clear();
        self.spectrum.extend(
            self.buffer[..size / 2]
                .iter()
                .map(|c| (magnitude_db(c.norm()) / ceiling).clamp(0.0, 1.0)),
        );

        Ok(&self.spectrum)
    }

    /// Most recent good spectrum (empty before the first successful analysis)
    pub fn spectrum(&self) -> &[f32] {
        &self.spectrum
    }
}

/// Hann window function for FFT analysis
pub fn hann_window(index: usize, size: usize) -> f32 {
    if size < 2 {
        return 1.0;
    }
    0.5 * (1.0 - ((2.0 * PI * index as f32) / (size as f32 - 1.0)).cos())
}

/// Decibel magnitude with a +1 offset so silent bins map to 0 dB
pub fn magnitude_db(magnitude: f32) -> f32 {
    20.0 * (magnitude + 1.0).log10()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(freq_hz: f32, sample_rate: f32, amplitude: f32, len: usize) -> Vec<f32> {
        (0..len)
            .map(|i| amplitude * (2.0 * PI * freq_hz * i as f32 / sample_rate).sin())
            .collect()
    }

    fn peak_bin(spectrum: &[f32]) -> usize {
        spectrum
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(i, _)| i)
            .unwrap()
    }

    #[test]
    fn test_hann_window() {
        let size = 1024;

        // Hann window should be 0 at edges, 1 at center
        assert!((hann_window(0, size) - 0.0).abs() < 0.01);
        assert!((hann_window(size - 1, size) - 0.0).abs() < 0.01);
        assert!((hann_window(size / 2, size) - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_window_precomputed() {
        let analyzer = SpectralAnalyzer::new(AnalyzerConfig::default());
        assert_eq!(analyzer.window().len(), 1024);
        assert_eq!(analyzer.window()[10], hann_window(10, 1024));
    }

    #[test]
    fn test_spectrum_length_and_range() {
        let mut analyzer = SpectralAnalyzer::new(AnalyzerConfig::default());

        // Full-scale square-ish signal to push bins past the ceiling
        let samples: Vec<f32> = (0..1024)
            .map(|i| if (i / 8) % 2 == 0 { 1.0 } else { -1.0 })
            .collect();
        let spectrum = analyzer.analyze(&samples).unwrap();

        assert_eq!(spectrum.len(), 512);
        assert!(spectrum.iter().all(|&v| (0.0..=1.0).contains(&v)));
    }

    #[test]
    fn test_silence_is_zero() {
        let mut analyzer = SpectralAnalyzer::new(AnalyzerConfig::default());
        let spectrum = analyzer.analyze(&[0.0; 1024]).unwrap();

        assert!(spectrum.iter().all(|&v| v.abs() < 1e-6));
    }

    #[test]
    fn test_sine_peak_bin() {
        let sample_rate = 44_100.0;
        let n = 1024;
        let mut analyzer = SpectralAnalyzer::new(AnalyzerConfig::default());

        for freq in [440.0, 1000.0, 5000.0] {
            let samples = sine(freq, sample_rate, 0.5, n);
            let spectrum = analyzer.analyze(&samples).unwrap();

            let expected = (freq * n as f32 / sample_rate).round() as i64;
            let actual = peak_bin(spectrum) as i64;
            assert!(
                (actual - expected).abs() <= 1,
                "{freq} Hz: peak at bin {actual}, expected {expected}"
            );
        }
    }

    #[test]
    fn test_extra_samples_ignored() {
        let mut analyzer = SpectralAnalyzer::new(AnalyzerConfig::default());
        let mut samples = sine(1000.0, 44_100.0, 0.5, 1024);
        let exact = analyzer.analyze(&samples).unwrap().to_vec();

        samples.extend(std::iter::repeat(1.0).take(512));
        let longer = analyzer.analyze(&samples).unwrap();

        assert_eq!(exact, longer);
    }

    #[test]
    fn test_insufficient_samples_keeps_previous() {
        let mut analyzer = SpectralAnalyzer::new(AnalyzerConfig::default());
        assert!(analyzer.spectrum().is_empty());

        let samples = sine(1000.0, 44_100.0, 0.5, 1024);
        let good = analyzer.analyze(&samples).unwrap().to_vec();

        let err = analyzer.analyze(&samples[..100]).unwrap_err();
        assert_eq!(
            err,
            AnalyzerError::InsufficientSamples {
                required: 1024,
                available: 100
            }
        );
        assert_eq!(analyzer.spectrum(), good.as_slice());
    }

    #[test]
    fn test_magnitude_db_offset() {
        assert_eq!(magnitude_db(0.0), 0.0);
        assert!((magnitude_db(9.0) - 20.0).abs() < 1e-4);
    }
}
