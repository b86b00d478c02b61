use super::resampler::resample_audio;
use super::{CaptureProfile, CapturedAudio};
use crate::recipes::AudioConfig;
use crate::{FlavorError, Result};
use base64::Engine;
use hound::{SampleFormat, WavSpec, WavWriter};
use std::io::Cursor;
use tracing::debug;

/// A recording ready for upload
#[derive(Debug, Clone)]
pub struct EncodedAudio {
    /// Standard base64 of a WAV file
    pub audio_base64: String,
    pub config: AudioConfig,
}

/// Encode mono f32 samples as a 16-bit PCM WAV file in memory
pub fn encode_wav(samples: &[f32], sample_rate: u32) -> Result<Vec<u8>> {
    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());
    let mut writer = WavWriter::new(&mut cursor, spec)
        .map_err(|e| FlavorError::AudioProcessing(format!("Failed to create WAV writer: {}", e)))?;

    for &sample in samples {
        let amplitude = (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
        writer
            .write_sample(amplitude)
            .map_err(|e| FlavorError::AudioProcessing(format!("Failed to write sample: {}", e)))?;
    }

    writer
        .finalize()
        .map_err(|e| FlavorError::AudioProcessing(format!("Failed to finalize WAV: {}", e)))?;

    Ok(cursor.into_inner())
}

/// Resample to the profile rate, wrap as WAV and base64 it
pub fn encode_payload(
    audio: &CapturedAudio,
    profile: &CaptureProfile,
    language_code: &str,
) -> Result<EncodedAudio> {
    if audio.is_empty() {
        return Err(FlavorError::AudioProcessing("No audio recorded".into()));
    }

    let samples = resample_audio(&audio.samples, audio.sample_rate, profile.sample_rate)?;
    let wav = encode_wav(&samples, profile.sample_rate)?;
    let audio_base64 = base64::engine::general_purpose::STANDARD.encode(&wav);

    debug!(
        "Encoded {:.2}s of audio into {} WAV bytes",
        audio.duration_seconds(),
        wav.len()
    );

    Ok(EncodedAudio {
        audio_base64,
        config: AudioConfig {
            encoding: profile.encoding.clone(),
            sample_rate_hertz: profile.sample_rate,
            language_code: language_code.to_string(),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use hound::WavReader;

    #[test]
    fn test_wav_header() {
        let wav = encode_wav(&[0.0, 0.5, -0.5], 16000).unwrap();
        assert_eq!(&wav[0..4], b"RIFF");
        assert_eq!(&wav[8..12], b"WAVE");

        let reader = WavReader::new(Cursor::new(wav)).unwrap();
        assert_eq!(reader.spec().sample_rate, 16000);
        assert_eq!(reader.spec().channels, 1);
        assert_eq!(reader.len(), 3);
    }

    #[test]
    fn test_payload_carries_profile() {
        let audio = CapturedAudio::new(vec![0.1; 1600], 16000);
        let encoded = encode_payload(&audio, &CaptureProfile::default(), "en-GB").unwrap();

        assert_eq!(encoded.config.encoding, "LINEAR16");
        assert_eq!(encoded.config.sample_rate_hertz, 16000);
        assert_eq!(encoded.config.language_code, "en-GB");

        let wav = base64::engine::general_purpose::STANDARD
            .decode(&encoded.audio_base64)
            .unwrap();
        assert_eq!(&wav[0..4], b"RIFF");
    }

    #[test]
    fn test_empty_recording_is_rejected() {
        let result = encode_payload(&CapturedAudio::default(), &CaptureProfile::default(), "en-GB");
        assert!(result.is_err());
    }
}
