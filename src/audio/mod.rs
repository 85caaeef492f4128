//! System audio capture and FFT analysis.
//!
//! A cpal loopback stream writes downmixed samples into a shared
//! [`CaptureBuffer`]; the frame loop snapshots it and hands the copy to the
//! [`SpectralAnalyzer`].

mod capture;
mod device;
mod fft;

// Re-export public types
pub use capture::CaptureBuffer;
pub use device::AudioCapture;
pub use fft::{hann_window, magnitude_db, SpectralAnalyzer};
