//! Audio capture for voice search
//!
//! A capture goes through an owned [`RecordingSession`]; the finished audio is
//! turned into a base64 WAV payload by [`encode::encode_payload`].

pub mod buffer;
pub mod encode;
#[cfg(feature = "audio-io")]
pub mod input;
pub mod resampler;
pub mod session;

pub use buffer::LevelMeter;
pub use encode::{encode_payload, encode_wav, EncodedAudio};
#[cfg(feature = "audio-io")]
pub use input::MicrophoneSource;
pub use resampler::{resample_audio, AudioResampler};
pub use session::{AudioCapture, RecordingSession, SessionState, SourceFactory};

use crate::Result;
use serde::{Deserialize, Serialize};

/// Recording format sent to the backend's speech recognizer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureProfile {
    pub sample_rate: u32,
    pub channels: u16,
    pub bits_per_sample: u16,
    /// Encoding name understood by the recognizer
    pub encoding: String,
}

impl Default for CaptureProfile {
    fn default() -> Self {
        Self {
            sample_rate: 16000,
            channels: 1,
            bits_per_sample: 16,
            encoding: "LINEAR16".to_string(),
        }
    }
}

impl CaptureProfile {
    /// Bits per second of the encoded stream
    pub fn bit_rate(&self) -> u32 {
        self.sample_rate * self.bits_per_sample as u32 * self.channels as u32
    }
}

/// Whether the app may use the microphone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MicPermission {
    Undetermined,
    Granted,
    Denied,
}

impl MicPermission {
    pub fn is_granted(self) -> bool {
        self == MicPermission::Granted
    }
}

/// Mono samples as delivered by the input device
#[derive(Debug, Clone, Default)]
pub struct CapturedAudio {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

impl CapturedAudio {
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    pub fn duration_seconds(&self) -> f32 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f32 / self.sample_rate as f32
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// A device (or fake) that can record one capture
pub trait AudioSource {
    /// Select the device configuration for `profile`
    fn prepare(&mut self, profile: &CaptureProfile) -> Result<()>;

    /// Start delivering samples
    fn begin(&mut self) -> Result<()>;

    /// Stop and hand over everything recorded since `begin`
    fn finish(&mut self) -> Result<CapturedAudio>;
}

/// Decide microphone access by probing for a usable input device
#[cfg(feature = "audio-io")]
pub fn probe_permission() -> MicPermission {
    input::probe_permission()
}

#[cfg(not(feature = "audio-io"))]
pub fn probe_permission() -> MicPermission {
    MicPermission::Denied
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_bit_rate() {
        assert_eq!(CaptureProfile::default().bit_rate(), 256_000);
    }

    #[test]
    fn test_captured_duration() {
        let audio = CapturedAudio::new(vec![0.0; 8000], 16000);
        assert!((audio.duration_seconds() - 0.5).abs() < f32::EPSILON);
        assert!(CapturedAudio::default().is_empty());
        assert_eq!(CapturedAudio::default().duration_seconds(), 0.0);
    }
}
