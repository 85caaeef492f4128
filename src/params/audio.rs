//! Audio capture and spectral analysis configuration.

use crate::error::ConfigError;

/// Loopback capture stream configuration
#[derive(Debug, Clone)]
pub struct CaptureConfig {
    /// Requested stream sample rate (Hz)
    pub sample_rate_hz: u32,

    /// Requested interleaved channel count (stereo loopback)
    pub channels: u16,

    /// Channel kept when downmixing interleaved frames (0 = left)
    pub downmix_channel: usize,

    /// Mono sample buffer capacity (samples)
    /// Must be >= the analyzer's FFT size
    pub buffer_capacity: usize,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            sample_rate_hz: 44_100,
            channels: 2,
            downmix_channel: 0,
            buffer_capacity: 1024,
        }
    }
}

impl CaptureConfig {
    /// Validate configuration (non-zero rate and capacity, channel in range)
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sample_rate_hz == 0 {
            return Err(ConfigError::ZeroSampleRate);
        }
        if self.buffer_capacity == 0 {
            return Err(ConfigError::ZeroBufferCapacity);
        }
        if self.downmix_channel >= self.channels as usize {
            return Err(ConfigError::DownmixChannel {
                channel: self.downmix_channel,
                channels: self.channels,
            });
        }
        Ok(())
    }
}

/// FFT analysis configuration
#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    /// FFT window size N (must be power of 2)
    /// Output spectrum has N / 2 bins
    pub fft_size: usize,

    /// dB value mapped to 1.0 by normalization
    /// 20·log10(|X| + 1) / ceiling
    pub db_ceiling: f32,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            fft_size: 1024,
            db_ceiling: 60.0,
        }
    }
}

impl AnalyzerConfig {
    /// Number of usable (non-mirrored) bins
    pub fn spectrum_len(&self) -> usize {
        self.fft_size / 2
    }

    /// Approximate centre frequency of a bin (Hz)
    pub fn bin_to_hz(&self, bin: usize, sample_rate_hz: u32) -> f32 {
        bin as f32 * sample_rate_hz as f32 / self.fft_size as f32
    }

    /// Validate configuration (FFT size must be power of 2, etc.)
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fft_size < 2 || !self.fft_size.is_power_of_two() {
            return Err(ConfigError::FftSize(self.fft_size));
        }
        if !(self.db_ceiling > 0.0) {
            return Err(ConfigError::DbCeiling(self.db_ceiling));
        }
        Ok(())
    }

    /// Check that a capture buffer can feed a full transform
    pub fn validate_against(&self, capture: &CaptureConfig) -> Result<(), ConfigError> {
        if capture.buffer_capacity < self.fft_size {
            return Err(ConfigError::BufferTooSmall {
                capacity: capture.buffer_capacity,
                fft_size: self.fft_size,
            });
        }
        Ok(())
    }
}
