use ringbuf::{traits::*, HeapRb};
use std::sync::Arc;
use parking_lot::Mutex;

/// Recent input samples, shared between the capture callback and the UI
/// so the record button can show the input level.
pub struct LevelMeter {
    buffer: Arc<Mutex<HeapRb<f32>>>,
}

impl LevelMeter {
    /// Create a meter remembering the last `capacity` samples
    pub fn new(capacity: usize) -> Self {
        Self {
            buffer: Arc::new(Mutex::new(HeapRb::new(capacity))),
        }
    }

    /// Push samples, overwriting the oldest ones when full
    pub fn push(&self, samples: &[f32]) {
        let mut buffer = self.buffer.lock();
        for &sample in samples {
            buffer.push_overwrite(sample);
        }
    }

    /// Root mean square of the remembered samples, 0.0 when empty
    pub fn rms(&self) -> f32 {
        let buffer = self.buffer.lock();
        let len = buffer.occupied_len();
        if len == 0 {
            return 0.0;
        }
        let sum: f32 = buffer.iter().map(|s| s * s).sum();
        (sum / len as f32).sqrt()
    }

    pub fn len(&self) -> usize {
        self.buffer.lock().occupied_len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.lock().is_empty()
    }

    pub fn clear(&self) {
        self.buffer.lock().clear();
    }
}

impl Default for LevelMeter {
    fn default() -> Self {
        // About a quarter second at 16 kHz
        Self::new(4096)
    }
}

impl Clone for LevelMeter {
    fn clone(&self) -> Self {
        Self {
            buffer: Arc::clone(&self.buffer),
        }
    }
}
