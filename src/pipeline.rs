//! Per-frame audio → spectrum → bars pipeline.

use log::trace;
use rand::rngs::StdRng;
use rand::Rng;

use crate::audio::{CaptureBuffer, SpectralAnalyzer};
use crate::visualizer::{BarMapper, BarRect};

/// Frame pipeline confined to the render thread
///
/// Pulls a snapshot from the capture buffer, analyzes it and feeds the bar
/// mapper. Without a source, or before the first callback arrives, the
/// mapper receives an empty spectrum and animates in demo mode. When a
/// snapshot is too short the previous spectrum is reused.
pub struct FramePipeline<R = StdRng> {
    source: Option<CaptureBuffer>,
    analyzer: SpectralAnalyzer,
    mapper: BarMapper<R>,
    samples: Vec<f32>,
}

impl<R: Rng> FramePipeline<R> {
    pub fn new(
        source: Option<CaptureBuffer>,
        analyzer: SpectralAnalyzer,
        mapper: BarMapper<R>,
    ) -> Self {
        Self {
            source,
            samples: Vec::with_capacity(analyzer.size()),
            analyzer,
            mapper,
        }
    }

    /// True while frames are driven by captured audio
    pub fn is_live(&self) -> bool {
        self.source
            .as_ref()
            .is_some_and(|buffer| buffer.has_signal())
    }

    /// Run one frame and return the bars to draw
    pub fn tick(&mut self) -> Vec<BarRect> {
        let spectrum: &[f32] = match &self.source {
            Some(buffer) if buffer.has_signal() => {
                buffer.snapshot_into(&mut self.samples);
                if let Err(e) = self.analyzer.analyze(&self.samples) {
                    trace!("Skipping analysis: {}", e);
                }
                self.analyzer.spectrum()
            }
            _ => &[],
        };

        self.mapper.update(spectrum);
        self.mapper.emit_draw_state()
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.mapper.resize(width, height);
    }

    pub fn mapper(&self) -> &BarMapper<R> {
        &self.mapper
    }

    pub fn analyzer(&self) -> &SpectralAnalyzer {
        &self.analyzer
    }
}
