//! Shared mono sample buffer between the capture callback and the frame loop.

use std::sync::{Arc, Mutex, MutexGuard};

struct Samples {
    data: Vec<f32>,
    /// Number of callbacks that wrote at least one frame
    writes: u64,
}

/// Fixed-capacity mono sample buffer
///
/// The audio callback is the sole writer, the frame loop the sole reader.
/// Both sides take the same lock: writes overwrite from index 0 (most recent
/// callback wins, no ring accumulation) and reads copy the whole buffer, so a
/// snapshot never observes a half-written callback.
#[derive(Clone)]
pub struct CaptureBuffer {
    inner: Arc<Mutex<Samples>>,
    capacity: usize,
}

impl CaptureBuffer {
    /// Allocate an all-zero buffer
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Samples {
                data: vec![0.0; capacity],
                writes: 0,
            })),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    // A writer that panicked mid-copy leaves plain floats behind, never an
    // invalid buffer, so poisoning is ignored.
    fn lock(&self) -> MutexGuard<'_, Samples> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Downmix interleaved frames into the buffer
    ///
    /// Keeps `channel` from each frame of `channels` interleaved samples and
    /// writes `min(frame_count, capacity)` values starting at index 0. Samples
    /// past the written prefix keep their previous values. A trailing partial
    /// frame is ignored.
    ///
    /// # Arguments
    /// * `interleaved` - Raw callback data, `channels` samples per frame
    /// * `channels` - Interleaved channel count of the stream
    /// * `channel` - Channel to keep (0 = left)
    pub fn on_samples_available(&self, interleaved: &[f32], channels: usize, channel: usize) {
        if channels == 0 || channel >= channels {
            return;
        }

        let frames = interleaved.chunks_exact(channels);
        let frame_count = frames.len().min(self.capacity);
        if frame_count == 0 {
            return;
        }

        let mut samples = self.lock();
        for (slot, frame) in samples.data.iter_mut().zip(frames) {
            *slot = frame[channel];
        }
        samples.writes += 1;
    }

    /// Copy of the current buffer contents, always `capacity` long
    pub fn snapshot(&self) -> Vec<f32> {
        self.lock().data.clone()
    }

    /// Copy into an existing vector, reusing its allocation
    pub fn snapshot_into(&self, out: &mut Vec<f32>) {
        let samples = self.lock();
        out.clear();
        out.extend_from_slice(&samples.data);
    }

    /// Number of callbacks that delivered audio so far
    pub fn write_count(&self) -> u64 {
        self.lock().writes
    }

    /// False until the first callback delivers audio
    ///
    /// An untouched buffer is all zeros and means "no signal", not an error.
    pub fn has_signal(&self) -> bool {
        self.write_count() > 0
    }
}
