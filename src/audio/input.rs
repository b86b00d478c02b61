use super::{AudioSource, CaptureProfile, CapturedAudio, LevelMeter, MicPermission};
use crate::{FlavorError, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, SampleFormat, Stream, StreamConfig};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// The default input device, recorded as mono f32 at the device rate.
///
/// The stream is not `Send`; build this on the thread that records.
pub struct MicrophoneSource {
    device: Device,
    config: Option<StreamConfig>,
    format: SampleFormat,
    stream: Option<Stream>,
    recorded: Arc<Mutex<Vec<f32>>>,
    meter: LevelMeter,
}

impl MicrophoneSource {
    /// Open the default input device
    pub fn new(meter: LevelMeter) -> Result<Self> {
        let host = cpal::default_host();

        let device = host
            .default_input_device()
            .ok_or_else(|| FlavorError::AudioDevice("No input device available".into()))?;

        info!(
            "Using input device: {}",
            device.name().unwrap_or_else(|_| "Unknown".to_string())
        );

        Ok(Self {
            device,
            config: None,
            format: SampleFormat::F32,
            stream: None,
            recorded: Arc::new(Mutex::new(Vec::new())),
            meter,
        })
    }

    pub fn sample_rate(&self) -> Option<u32> {
        self.config.as_ref().map(|c| c.sample_rate.0)
    }

    fn build_stream(&self, config: &StreamConfig) -> Result<Stream> {
        let channels = config.channels as usize;
        let recorded = Arc::clone(&self.recorded);
        let meter = self.meter.clone();

        let err_fn = |err| {
            error!("Audio input stream error: {}", err);
        };

        let stream = match self.format {
            SampleFormat::F32 => self.device.build_input_stream(
                config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    let mono = to_mono(data, channels);
                    meter.push(&mono);
                    recorded.lock().extend_from_slice(&mono);
                },
                err_fn,
                None,
            ),
            SampleFormat::I16 => self.device.build_input_stream(
                config,
                move |data: &[i16], _: &cpal::InputCallbackInfo| {
                    let floats: Vec<f32> =
                        data.iter().map(|&s| s as f32 / i16::MAX as f32).collect();
                    let mono = to_mono(&floats, channels);
                    meter.push(&mono);
                    recorded.lock().extend_from_slice(&mono);
                },
                err_fn,
                None,
            ),
            other => {
                return Err(FlavorError::AudioDevice(format!(
                    "Unsupported sample format: {:?}",
                    other
                )))
            }
        };

        stream.map_err(|e| FlavorError::AudioDevice(format!("Failed to build input stream: {}", e)))
    }
}

impl AudioSource for MicrophoneSource {
    fn prepare(&mut self, profile: &CaptureProfile) -> Result<()> {
        let supported = self
            .device
            .default_input_config()
            .map_err(|e| FlavorError::AudioDevice(format!("Failed to get input config: {}", e)))?;

        self.format = supported.sample_format();
        let config: StreamConfig = supported.into();

        // The device rate is kept; encoding resamples to the profile rate
        if config.sample_rate.0 != profile.sample_rate {
            debug!(
                "Device records at {} Hz, upload uses {} Hz",
                config.sample_rate.0, profile.sample_rate
            );
        }

        self.config = Some(config);
        Ok(())
    }

    fn begin(&mut self) -> Result<()> {
        if self.stream.is_some() {
            warn!("Already recording");
            return Ok(());
        }

        let config = self
            .config
            .clone()
            .ok_or_else(|| FlavorError::InvalidState("input device not prepared".into()))?;

        self.recorded.lock().clear();
        self.meter.clear();

        let stream = self.build_stream(&config)?;
        stream
            .play()
            .map_err(|e| FlavorError::AudioDevice(format!("Failed to start input stream: {}", e)))?;

        self.stream = Some(stream);
        info!("Started audio recording");
        Ok(())
    }

    fn finish(&mut self) -> Result<CapturedAudio> {
        let sample_rate = self
            .sample_rate()
            .ok_or_else(|| FlavorError::InvalidState("input device not prepared".into()))?;

        if let Some(stream) = self.stream.take() {
            drop(stream);
            info!("Stopped audio recording");
        }

        self.meter.clear();
        let samples = std::mem::take(&mut *self.recorded.lock());
        Ok(CapturedAudio::new(samples, sample_rate))
    }
}

impl Drop for MicrophoneSource {
    fn drop(&mut self) {
        self.stream.take();
    }
}

/// Average interleaved frames down to one channel
fn to_mono(data: &[f32], channels: usize) -> Vec<f32> {
    if channels <= 1 {
        return data.to_vec();
    }
    data.chunks(channels)
        .map(|frame| frame.iter().sum::<f32>() / channels as f32)
        .collect()
}

/// Granted when a default input device with a usable config exists
pub fn probe_permission() -> MicPermission {
    let host = cpal::default_host();
    match host.default_input_device() {
        Some(device) if device.default_input_config().is_ok() => MicPermission::Granted,
        Some(_) => {
            warn!("Input device has no usable configuration");
            MicPermission::Denied
        }
        None => {
            warn!("No input device available");
            MicPermission::Denied
        }
    }
}
