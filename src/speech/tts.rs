//! VITS voice for spoken replies (sherpa-rs synthesis, rodio playback)
//!
//! Neither the model nor the output stream may leave the thread that
//! created them, so both live on a dedicated voice thread fed over a
//! channel.

use super::{normalize_for_speech, Speaker, VoiceConfig};
use crate::{FlavorError, Result};
use crossbeam_channel::{bounded, Sender};
use rodio::buffer::SamplesBuffer;
use rodio::{OutputStream, Sink};
use sherpa_rs::tts::{VitsTts, VitsTtsConfig};
use std::thread;
use tracing::{debug, error, info, warn};

enum VoiceCommand {
    Say(String),
    Shutdown,
}

pub struct VitsSpeaker {
    command_tx: Sender<VoiceCommand>,
    handle: Option<thread::JoinHandle<()>>,
}

impl VitsSpeaker {
    /// Load the model and open the output device on a new thread
    pub fn spawn(config: VoiceConfig) -> Result<Self> {
        check_paths(&config)?;

        let (command_tx, command_rx) = bounded::<VoiceCommand>(16);
        let (ready_tx, ready_rx) = bounded::<Result<()>>(1);

        let handle = thread::Builder::new()
            .name("voice-reply".into())
            .spawn(move || {
                let mut tts = VitsTts::new(VitsTtsConfig {
                    model: config.model_path.to_string_lossy().into_owned(),
                    tokens: config.tokens_path.to_string_lossy().into_owned(),
                    lexicon: path_or_empty(&config.lexicon_path),
                    data_dir: path_or_empty(&config.data_dir),
                    ..Default::default()
                });

                let (_stream, handle) = match OutputStream::try_default() {
                    Ok(output) => output,
                    Err(e) => {
                        let _ = ready_tx.send(Err(FlavorError::AudioDevice(format!(
                            "No output device: {}",
                            e
                        ))));
                        return;
                    }
                };

                let sink = match Sink::try_new(&handle) {
                    Ok(sink) => sink,
                    Err(e) => {
                        let _ = ready_tx
                            .send(Err(FlavorError::AudioDevice(format!("Failed to open sink: {}", e))));
                        return;
                    }
                };

                let _ = ready_tx.send(Ok(()));
                info!("Voice replies ready");

                while let Ok(command) = command_rx.recv() {
                    match command {
                        VoiceCommand::Say(text) => {
                            let text = normalize_for_speech(&text);
                            match tts.create(&text, config.speaker_id, config.speed) {
                                Ok(audio) => {
                                    debug!(
                                        "Synthesized {} samples at {} Hz",
                                        audio.samples.len(),
                                        audio.sample_rate
                                    );
                                    sink.append(SamplesBuffer::new(
                                        1,
                                        audio.sample_rate as u32,
                                        audio.samples,
                                    ));
                                }
                                Err(e) => error!("Synthesis failed: {}", e),
                            }
                        }
                        VoiceCommand::Shutdown => break,
                    }
                }

                sink.stop();
                info!("Voice thread stopped");
            })
            .map_err(|e| FlavorError::Speech(format!("Failed to start voice thread: {}", e)))?;

        ready_rx
            .recv()
            .map_err(|_| FlavorError::Speech("Voice thread exited during startup".into()))??;

        Ok(Self {
            command_tx,
            handle: Some(handle),
        })
    }
}

impl Speaker for VitsSpeaker {
    fn speak(&self, text: &str) -> Result<()> {
        info!("Assistant: {}", text);
        self.command_tx
            .try_send(VoiceCommand::Say(text.to_string()))
            .map_err(|e| FlavorError::Channel(format!("Voice queue unavailable: {}", e)))
    }
}

impl Drop for VitsSpeaker {
    fn drop(&mut self) {
        let _ = self.command_tx.send(VoiceCommand::Shutdown);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("Voice thread panicked");
            }
        }
    }
}

fn check_paths(config: &VoiceConfig) -> Result<()> {
    if !config.model_path.exists() {
        return Err(FlavorError::Config(format!(
            "Voice model not found: {:?}",
            config.model_path
        )));
    }
    if !config.tokens_path.exists() {
        return Err(FlavorError::Config(format!(
            "Voice tokens not found: {:?}",
            config.tokens_path
        )));
    }
    Ok(())
}

fn path_or_empty(path: &Option<std::path::PathBuf>) -> String {
    path.as_ref()
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_default()
}
