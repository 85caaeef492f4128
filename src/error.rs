//! Error types for capture, analysis, configuration and rendering.

use thiserror::Error;

/// Failure to open or start the loopback capture stream.
///
/// Never fatal: the frame pipeline falls back to demo mode.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("no audio capture device available")]
    NoDevice,

    #[error("device '{device}' offers no f32 capture config (wanted {sample_rate} Hz)")]
    UnsupportedFormat { device: String, sample_rate: u32 },

    #[error("failed to query device configuration: {0}")]
    Config(#[from] cpal::DefaultStreamConfigError),

    #[error("failed to enumerate devices: {0}")]
    Devices(#[from] cpal::DevicesError),

    #[error("failed to build capture stream: {0}")]
    Build(#[from] cpal::BuildStreamError),

    #[error("failed to start capture stream: {0}")]
    Play(#[from] cpal::PlayStreamError),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AnalyzerError {
    #[error("need at least {required} samples for analysis, got {available}")]
    InsufficientSamples { required: usize, available: usize },
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("bar count must be at least 1")]
    ZeroBars,

    #[error("sample rate must be > 0")]
    ZeroSampleRate,

    #[error("capture buffer capacity must be > 0")]
    ZeroBufferCapacity,

    #[error("downmix channel {channel} out of range for {channels} channels")]
    DownmixChannel { channel: usize, channels: u16 },

    #[error("FFT size must be a power of 2 and >= 2, got {0}")]
    FftSize(usize),

    #[error("dB ceiling must be > 0, got {0}")]
    DbCeiling(f32),

    #[error("capture buffer ({capacity}) smaller than FFT size ({fft_size})")]
    BufferTooSmall { capacity: usize, fft_size: usize },

    #[error("smoothing factor must be in (0, 1], got {0}")]
    Smoothing(f32),
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to create surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),

    #[error("failed to find suitable GPU adapter")]
    NoAdapter,

    #[error("failed to request device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),
}
