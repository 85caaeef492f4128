//! Loopback capture stream feeding a [`CaptureBuffer`].

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{
    DefaultStreamConfigError, Device, SampleFormat, SampleRate, StreamConfig,
    SupportedStreamConfig, SupportedStreamConfigRange,
};
use log::{debug, error, info, warn};

use super::capture::CaptureBuffer;
use crate::error::CaptureError;
use crate::params::CaptureConfig;

/// Running capture stream
///
/// The stream stops when this value is dropped.
pub struct AudioCapture {
    buffer: CaptureBuffer,
    device_name: String,
    config: StreamConfig,

    /// Capture stream (kept alive)
    _stream: cpal::Stream,
}

impl AudioCapture {
    /// Open and start a loopback capture stream writing into `buffer`
    ///
    /// Candidates are tried in order: the default output device (loopback on
    /// WASAPI), any input whose name marks it as a monitor of an output
    /// (PulseAudio/PipeWire), then the default input. The first device that
    /// accepts f32 capture and starts streaming wins. The configured rate is
    /// preferred; otherwise the device's native f32 rate is used.
    pub fn initialize(config: &CaptureConfig, buffer: CaptureBuffer) -> Result<Self, CaptureError> {
        let host = cpal::default_host();
        let candidates = loopback_candidates(&host)?;
        if candidates.is_empty() {
            return Err(CaptureError::NoDevice);
        }

        let mut last_error = CaptureError::NoDevice;
        for (device, kind) in candidates {
            let name = device.name().unwrap_or_else(|_| "Unknown".to_string());
            match start_stream(&device, config, buffer.clone()) {
                Ok((stream, stream_config)) => {
                    if kind == SourceKind::Input {
                        warn!(
                            "Audio: no loopback device available, capturing input '{}' instead of system output",
                            name
                        );
                    }
                    info!(
                        "Audio: capturing '{}' ({} ch @ {} Hz)",
                        name, stream_config.channels, stream_config.sample_rate.0
                    );
                    return Ok(Self {
                        buffer,
                        device_name: name,
                        config: stream_config,
                        _stream: stream,
                    });
                }
                Err(e) => {
                    debug!("Audio: '{}' rejected: {}", name, e);
                    last_error = e;
                }
            }
        }

        Err(last_error)
    }

    /// Buffer shared with the capture callback
    pub fn buffer(&self) -> &CaptureBuffer {
        &self.buffer
    }

    pub fn device_name(&self) -> &str {
        &self.device_name
    }

    /// Negotiated capture rate, which may differ from the configured one
    pub fn sample_rate(&self) -> u32 {
        self.config.sample_rate.0
    }
}

/// Where a capture candidate came from
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SourceKind {
    /// Output device opened for loopback, or an output monitor
    Loopback,
    /// Plain input (usually a microphone)
    Input,
}

fn loopback_candidates(host: &cpal::Host) -> Result<Vec<(Device, SourceKind)>, CaptureError> {
    let mut devices = Vec::new();

    if let Some(output) = host.default_output_device() {
        devices.push((output, SourceKind::Loopback));
    }

    for input in host.input_devices()? {
        let is_monitor = input
            .name()
            .map(|name| name.to_lowercase().contains("monitor"))
            .unwrap_or(false);
        if is_monitor {
            devices.push((input, SourceKind::Loopback));
        }
    }

    if let Some(input) = host.default_input_device() {
        devices.push((input, SourceKind::Input));
    }

    Ok(devices)
}

fn start_stream(
    device: &Device,
    config: &CaptureConfig,
    buffer: CaptureBuffer,
) -> Result<(cpal::Stream, StreamConfig), CaptureError> {
    let stream_config = select_stream_config(device, config)?;
    let channels = stream_config.channels as usize;
    // Mono devices can only offer channel 0
    let channel = config.downmix_channel.min(channels.saturating_sub(1));

    let stream = device.build_input_stream(
        &stream_config,
        move |data: &[f32], _: &cpal::InputCallbackInfo| {
            buffer.on_samples_available(data, channels, channel);
        },
        |err| error!("Audio stream error: {}", err),
        None,
    )?;
    stream.play()?;

    Ok((stream, stream_config))
}

/// Pick an f32 stream config for `device`, see [`choose_stream_config`]
fn select_stream_config(
    device: &Device,
    config: &CaptureConfig,
) -> Result<StreamConfig, CaptureError> {
    let supported: Vec<_> = device
        .supported_input_configs()
        .map(|configs| configs.collect())
        .unwrap_or_default();

    let default = || {
        device
            .default_input_config()
            .or_else(|_| device.default_output_config())
    };

    choose_stream_config(&supported, default, config)?.ok_or_else(|| {
        CaptureError::UnsupportedFormat {
            device: device.name().unwrap_or_else(|_| "Unknown".to_string()),
            sample_rate: config.sample_rate_hz,
        }
    })
}

/// Pick an f32 stream config, preferably at the requested rate
///
/// Prefers the requested channel count, accepts any count otherwise. Falls
/// back to the device's default config (input, then output for loopback)
/// at its native rate when that is f32. WASAPI render devices report no
/// input ranges, so their mix format always decides.
fn choose_stream_config<F>(
    supported: &[SupportedStreamConfigRange],
    default: F,
    config: &CaptureConfig,
) -> Result<Option<StreamConfig>, CaptureError>
where
    F: FnOnce() -> Result<SupportedStreamConfig, DefaultStreamConfigError>,
{
    let rate = SampleRate(config.sample_rate_hz);

    let matching = |range: &&SupportedStreamConfigRange| {
        range.sample_format() == SampleFormat::F32
            && range.min_sample_rate() <= rate
            && range.max_sample_rate() >= rate
    };

    let best = supported
        .iter()
        .filter(matching)
        .find(|range| range.channels() == config.channels)
        .or_else(|| supported.iter().find(matching));
    if let Some(range) = best {
        return Ok(Some(range.clone().with_sample_rate(rate).config()));
    }

    let default = default()?;
    if default.sample_format() != SampleFormat::F32 {
        return Ok(None);
    }
    if default.sample_rate() != rate {
        debug!(
            "Audio: {} Hz unavailable, using native {} Hz",
            config.sample_rate_hz,
            default.sample_rate().0
        );
    }
    Ok(Some(default.config()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cpal::SupportedBufferSize;

    fn range(
        channels: u16,
        min: u32,
        max: u32,
        format: SampleFormat,
    ) -> SupportedStreamConfigRange {
        SupportedStreamConfigRange::new(
            channels,
            SampleRate(min),
            SampleRate(max),
            SupportedBufferSize::Unknown,
            format,
        )
    }

    fn default_config(
        rate: u32,
        format: SampleFormat,
    ) -> impl FnOnce() -> Result<SupportedStreamConfig, DefaultStreamConfigError> {
        move || {
            Ok(SupportedStreamConfig::new(
                2,
                SampleRate(rate),
                SupportedBufferSize::Unknown,
                format,
            ))
        }
    }

    #[test]
    fn test_prefers_requested_rate_and_channels() {
        let supported = [
            range(1, 8_000, 96_000, SampleFormat::F32),
            range(2, 8_000, 96_000, SampleFormat::I16),
            range(2, 8_000, 96_000, SampleFormat::F32),
        ];

        let chosen = choose_stream_config(
            &supported,
            default_config(48_000, SampleFormat::F32),
            &CaptureConfig::default(),
        )
        .unwrap()
        .unwrap();

        assert_eq!(chosen.sample_rate, SampleRate(44_100));
        assert_eq!(chosen.channels, 2);
    }

    #[test]
    fn test_any_channel_count_at_requested_rate() {
        let supported = [range(1, 44_100, 44_100, SampleFormat::F32)];

        let chosen = choose_stream_config(
            &supported,
            default_config(48_000, SampleFormat::F32),
            &CaptureConfig::default(),
        )
        .unwrap()
        .unwrap();

        assert_eq!(chosen.channels, 1);
        assert_eq!(chosen.sample_rate, SampleRate(44_100));
    }

    #[test]
    fn test_render_device_uses_native_rate() {
        // Loopback on a render device: no input ranges, 48 kHz mix format
        let chosen = choose_stream_config(
            &[],
            default_config(48_000, SampleFormat::F32),
            &CaptureConfig::default(),
        )
        .unwrap()
        .unwrap();

        assert_eq!(chosen.sample_rate, SampleRate(48_000));
        assert_eq!(chosen.channels, 2);
    }

    #[test]
    fn test_non_float_default_rejected() {
        let supported = [range(2, 8_000, 96_000, SampleFormat::I16)];

        let chosen = choose_stream_config(
            &supported,
            default_config(44_100, SampleFormat::I16),
            &CaptureConfig::default(),
        )
        .unwrap();

        assert!(chosen.is_none());
    }
}
