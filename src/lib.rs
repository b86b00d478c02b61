pub mod audio;
pub mod integration;
pub mod recipes;
pub mod speech;
pub mod storage;
pub mod ui;

use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum FlavorError {
    #[error("Audio device error: {0}")]
    AudioDevice(String),

    #[error("Microphone permission denied")]
    PermissionDenied,

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Backend returned {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Audio processing error: {0}")]
    AudioProcessing(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Speech error: {0}")]
    Speech(String),

    #[error("Channel error: {0}")]
    Channel(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),
}

impl From<std::io::Error> for FlavorError {
    fn from(e: std::io::Error) -> Self {
        FlavorError::Storage(e.to_string())
    }
}

impl From<serde_json::Error> for FlavorError {
    fn from(e: serde_json::Error) -> Self {
        FlavorError::Decode(e.to_string())
    }
}

impl From<reqwest::Error> for FlavorError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            FlavorError::Decode(e.to_string())
        } else if let Some(status) = e.status() {
            FlavorError::Http {
                status: status.as_u16(),
                body: e.to_string(),
            }
        } else {
            FlavorError::Network(e.to_string())
        }
    }
}

impl FlavorError {
    /// Check if this error is recoverable
    pub fn is_recoverable(&self) -> bool {
        match self {
            // Hardware/device errors may require user intervention
            FlavorError::AudioDevice(_) => false,
            FlavorError::PermissionDenied => false,
            // A later toggle rewrites the whole record
            FlavorError::Storage(_) => true,
            // These are typically transient errors
            FlavorError::Network(_) => true,
            FlavorError::Http { status, .. } => *status >= 500,
            FlavorError::Decode(_) => true,
            FlavorError::AudioProcessing(_) => true,
            FlavorError::Config(_) => false,
            FlavorError::Speech(_) => true,
            FlavorError::Channel(_) => false,
            FlavorError::InvalidState(_) => true,
        }
    }

    /// Get a user-friendly description
    pub fn user_message(&self) -> String {
        match self {
            FlavorError::AudioDevice(_) => {
                "Audio device error. Please check your microphone.".to_string()
            }
            FlavorError::PermissionDenied => {
                "Microphone access is required for voice search.".to_string()
            }
            FlavorError::Storage(_) => "Could not save your changes.".to_string(),
            FlavorError::Network(_) | FlavorError::Http { .. } => {
                "Could not reach the recipe service. Please try again.".to_string()
            }
            FlavorError::Decode(_) => {
                "The recipe service sent an unexpected reply.".to_string()
            }
            FlavorError::AudioProcessing(_) => {
                "Audio processing failed. Please try again.".to_string()
            }
            FlavorError::Config(_) => {
                "Configuration error. Please check settings.".to_string()
            }
            FlavorError::Speech(_) => {
                "Spoken replies are unavailable. Replies will be shown as text.".to_string()
            }
            FlavorError::Channel(_) => {
                "Internal communication error. Please restart the application.".to_string()
            }
            FlavorError::InvalidState(_) => "Please try again.".to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, FlavorError>;
