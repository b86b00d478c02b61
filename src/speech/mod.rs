//! Spoken replies for voice search
//!
//! Every search ends with one line for the user: an apology, a not-found
//! notice, or the backend's answer. A [`Speaker`] delivers it. The default
//! [`TranscriptSpeaker`] keeps the line for the view; with the
//! `voice-reply` feature a VITS voice reads it aloud.

#[cfg(feature = "voice-reply")]
pub mod tts;

#[cfg(feature = "voice-reply")]
pub use tts::VitsSpeaker;

use crate::integration::AppConfig;
use crate::Result;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

pub const TRANSCRIBE_APOLOGY: &str =
    "I am sorry, I could not transcribe your request, please try again.";

pub const NOT_FOUND_REPLY: &str = "I am sorry, I could not find any recipes related to your request, please be more specific or try something else.";

pub const DEFAULT_ACKNOWLEDGEMENT: &str = "Here are some recipes I found for you";

/// Delivers a reply line to the user
pub trait Speaker: Send + Sync {
    fn speak(&self, text: &str) -> Result<()>;
}

/// Logs each reply and keeps it for display
#[derive(Clone, Default)]
pub struct TranscriptSpeaker {
    lines: Arc<Mutex<Vec<String>>>,
}

impl TranscriptSpeaker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> Option<String> {
        self.lines.lock().last().cloned()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().clone()
    }
}

impl Speaker for TranscriptSpeaker {
    fn speak(&self, text: &str) -> Result<()> {
        info!("Assistant: {}", text);
        self.lines.lock().push(text.to_string());
        Ok(())
    }
}

/// Paths and voice settings for a VITS model
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VoiceConfig {
    /// ONNX model file
    pub model_path: PathBuf,

    pub tokens_path: PathBuf,

    #[serde(default)]
    pub lexicon_path: Option<PathBuf>,

    /// espeak-ng data directory, needed by Piper voices
    #[serde(default)]
    pub data_dir: Option<PathBuf>,

    #[serde(default)]
    pub speaker_id: i32,

    /// 1.0 is normal speed
    #[serde(default = "default_speed")]
    pub speed: f32,
}

fn default_speed() -> f32 {
    1.0
}

impl VoiceConfig {
    pub fn new(model_path: impl Into<PathBuf>, tokens_path: impl Into<PathBuf>) -> Self {
        Self {
            model_path: model_path.into(),
            tokens_path: tokens_path.into(),
            lexicon_path: None,
            data_dir: None,
            speaker_id: 0,
            speed: default_speed(),
        }
    }
}

/// Spell out the kitchen abbreviations a voice would stumble over
pub fn normalize_for_speech(text: &str) -> String {
    const UNITS: [(&str, &str); 8] = [
        ("tbsp", "tablespoons"),
        ("tsp", "teaspoons"),
        ("oz", "ounces"),
        ("lb", "pounds"),
        ("lbs", "pounds"),
        ("kg", "kilograms"),
        ("ml", "millilitres"),
        ("mins", "minutes"),
    ];

    text.split_whitespace()
        .map(|word| {
            let trimmed = word.trim_end_matches('.');
            UNITS
                .iter()
                .find(|(short, _)| trimmed.eq_ignore_ascii_case(short))
                .map(|(_, long)| long.to_string())
                .unwrap_or_else(|| word.to_string())
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Pick the speaker for this build and configuration
pub fn build_speaker(config: &AppConfig) -> Arc<dyn Speaker> {
    if let Some(speaker) = config.voice.as_ref().and_then(voice_speaker) {
        return speaker;
    }
    Arc::new(TranscriptSpeaker::new())
}

#[cfg(feature = "voice-reply")]
fn voice_speaker(voice: &VoiceConfig) -> Option<Arc<dyn Speaker>> {
    match VitsSpeaker::spawn(voice.clone()) {
        Ok(speaker) => Some(Arc::new(speaker)),
        Err(e) => {
            warn!("Voice replies disabled: {}", e);
            None
        }
    }
}

#[cfg(not(feature = "voice-reply"))]
fn voice_speaker(_voice: &VoiceConfig) -> Option<Arc<dyn Speaker>> {
    warn!("A voice is configured but this build has no voice-reply support");
    None
}
