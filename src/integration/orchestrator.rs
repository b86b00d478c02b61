//! Voice-search orchestrator
//!
//! Press starts a capture; release stops it, uploads the recording and turns
//! the backend reply into one [`SearchOutcome`]. The worker owns the
//! recording session for its whole life and runs one pipeline at a time.

use super::config::AppConfig;
use crate::audio::{
    encode_payload, AudioCapture, CaptureProfile, CapturedAudio, MicPermission, SourceFactory,
};
use crate::recipes::{Recipe, RecipeService, TranscribeRequest};
use crate::speech::{Speaker, DEFAULT_ACKNOWLEDGEMENT, NOT_FOUND_REPLY, TRANSCRIBE_APOLOGY};
use crate::{FlavorError, Result};
use crossbeam_channel::{unbounded, Receiver, Sender, TryRecvError};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tokio::runtime::Handle;
use tracing::{debug, error, info, warn};

/// Commands sent by the mic button
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrchestratorCommand {
    /// The mic button went down
    PressStart,

    /// The mic button was released
    Release,

    Shutdown,
}

/// Events emitted by the orchestrator
#[derive(Debug, Clone)]
pub enum OrchestratorEvent {
    RecordingStarted,

    /// Capture stopped, the upload is in flight
    AwaitingResults,

    /// The search produced an outcome
    Outcome(SearchOutcome),

    /// Always the last event of a press, whatever happened
    RecordingFinished,

    Shutdown,
}

/// What a voice search ended with
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// Nothing usable came back
    Untranscribed,

    /// The request was understood but matched nothing
    NoMatches { transcript: String },

    Found {
        transcript: String,
        recipes: Vec<Recipe>,
        reply: String,
    },
}

impl SearchOutcome {
    /// The line read back to the user
    pub fn spoken_reply(&self) -> &str {
        match self {
            SearchOutcome::Untranscribed => TRANSCRIBE_APOLOGY,
            SearchOutcome::NoMatches { .. } => NOT_FOUND_REPLY,
            SearchOutcome::Found { reply, .. } => reply,
        }
    }

    pub fn transcript(&self) -> Option<&str> {
        match self {
            SearchOutcome::Untranscribed => None,
            SearchOutcome::NoMatches { transcript } | SearchOutcome::Found { transcript, .. } => {
                Some(transcript)
            }
        }
    }

    pub fn recipes(&self) -> &[Recipe] {
        match self {
            SearchOutcome::Found { recipes, .. } => recipes,
            _ => &[],
        }
    }
}

/// Send the recording and classify the reply
pub async fn run_search(service: &dyn RecipeService, request: &TranscribeRequest) -> SearchOutcome {
    let response = match service.transcribe_and_search(request).await {
        Ok(response) => response,
        Err(e) => {
            warn!("Voice search failed: {}", e);
            return SearchOutcome::Untranscribed;
        }
    };

    let transcript = response.input.trim().to_string();
    if transcript.is_empty() {
        return SearchOutcome::Untranscribed;
    }

    if response.recipes.is_empty() {
        return SearchOutcome::NoMatches { transcript };
    }

    let reply = if response.answer.is_empty() {
        DEFAULT_ACKNOWLEDGEMENT.to_string()
    } else {
        response.answer
    };

    SearchOutcome::Found {
        transcript,
        recipes: response.recipes,
        reply,
    }
}

/// Handle for controlling the orchestrator from the UI
#[derive(Clone)]
pub struct OrchestratorHandle {
    command_tx: Sender<OrchestratorCommand>,
    event_rx: Receiver<OrchestratorEvent>,
    is_recording: Arc<AtomicBool>,
    is_searching: Arc<AtomicBool>,
    permission: MicPermission,
}

impl OrchestratorHandle {
    pub fn send_command(&self, cmd: OrchestratorCommand) -> Result<()> {
        self.command_tx
            .send(cmd)
            .map_err(|e| FlavorError::Channel(format!("Failed to send command: {}", e)))
    }

    pub fn try_recv_event(&self) -> Option<OrchestratorEvent> {
        self.event_rx.try_recv().ok()
    }

    /// Receiver for blocking waits (tests, headless use)
    pub fn events(&self) -> &Receiver<OrchestratorEvent> {
        &self.event_rx
    }

    pub fn is_recording(&self) -> bool {
        self.is_recording.load(Ordering::SeqCst)
    }

    pub fn is_searching(&self) -> bool {
        self.is_searching.load(Ordering::SeqCst)
    }

    pub fn permission(&self) -> MicPermission {
        self.permission
    }

    /// Whether the mic button should accept a press
    pub fn can_record(&self) -> bool {
        self.permission.is_granted() && !self.is_recording() && !self.is_searching()
    }
}

pub struct Orchestrator {
    service: Arc<dyn RecipeService>,
    speaker: Arc<dyn Speaker>,
    factory: SourceFactory,
    profile: CaptureProfile,
    permission: MicPermission,
    language_code: String,
    runtime: Handle,
    command_rx: Receiver<OrchestratorCommand>,
    event_tx: Sender<OrchestratorEvent>,
    is_recording: Arc<AtomicBool>,
    is_searching: Arc<AtomicBool>,
}

impl Orchestrator {
    /// Spawn the worker thread. The audio source is built on that thread.
    pub fn start(self) -> Result<JoinHandle<()>> {
        thread::Builder::new()
            .name("voice-search".into())
            .spawn(move || self.run())
            .map_err(|e| FlavorError::Channel(format!("Failed to start orchestrator: {}", e)))
    }

    fn run(self) {
        info!("Orchestrator started");

        let Orchestrator {
            service,
            speaker,
            factory,
            profile,
            permission,
            language_code,
            runtime,
            command_rx,
            event_tx,
            is_recording,
            is_searching,
        } = self;

        let mut worker = Worker {
            capture: AudioCapture::new(factory, profile, permission),
            service,
            speaker,
            language_code,
            runtime,
            command_rx,
            event_tx,
            is_recording,
            is_searching,
            stop_requested: false,
        };

        while !worker.stop_requested {
            match worker.command_rx.recv() {
                Ok(OrchestratorCommand::PressStart) => worker.press_start(),
                Ok(OrchestratorCommand::Release) => worker.release(),
                Ok(OrchestratorCommand::Shutdown) => break,
                Err(_) => {
                    debug!("All orchestrator handles dropped");
                    break;
                }
            }
        }

        worker.shutdown();
        info!("Orchestrator stopped");
    }
}

struct Worker {
    capture: AudioCapture,
    service: Arc<dyn RecipeService>,
    speaker: Arc<dyn Speaker>,
    language_code: String,
    runtime: Handle,
    command_rx: Receiver<OrchestratorCommand>,
    event_tx: Sender<OrchestratorEvent>,
    is_recording: Arc<AtomicBool>,
    is_searching: Arc<AtomicBool>,
    /// A shutdown arrived while a search was running
    stop_requested: bool,
}

impl Worker {
    fn emit(&self, event: OrchestratorEvent) {
        if self.event_tx.send(event).is_err() {
            debug!("No listener for orchestrator events");
        }
    }

    fn press_start(&mut self) {
        if !self.capture.permission().is_granted() {
            warn!("Microphone permission not granted; ignoring press");
            return;
        }

        match self.capture.start() {
            Ok(()) => {
                self.is_recording.store(true, Ordering::SeqCst);
                self.emit(OrchestratorEvent::RecordingStarted);
            }
            Err(e) => {
                error!("Failed to start recording: {}", e);
                self.is_recording.store(false, Ordering::SeqCst);
                self.emit(OrchestratorEvent::RecordingFinished);
            }
        }
    }

    fn release(&mut self) {
        if !self.capture.is_recording() {
            debug!("Release without an active recording");
            self.is_recording.store(false, Ordering::SeqCst);
            self.emit(OrchestratorEvent::RecordingFinished);
            return;
        }

        self.is_searching.store(true, Ordering::SeqCst);
        let captured = self.capture.stop();
        self.is_recording.store(false, Ordering::SeqCst);
        self.emit(OrchestratorEvent::AwaitingResults);

        let outcome = match captured.and_then(|audio| self.build_request(&audio)) {
            Ok(request) => self
                .runtime
                .block_on(run_search(self.service.as_ref(), &request)),
            Err(e) => {
                warn!("Could not prepare the recording: {}", e);
                SearchOutcome::Untranscribed
            }
        };

        info!(
            "Voice search finished: {} recipes for {:?}",
            outcome.recipes().len(),
            outcome.transcript()
        );

        if let Err(e) = self.speaker.speak(outcome.spoken_reply()) {
            warn!("Failed to speak reply: {}", e);
        }

        self.emit(OrchestratorEvent::Outcome(outcome));
        self.reject_queued();
        self.is_searching.store(false, Ordering::SeqCst);
        self.emit(OrchestratorEvent::RecordingFinished);
    }

    fn build_request(&self, audio: &CapturedAudio) -> Result<TranscribeRequest> {
        let encoded = encode_payload(audio, self.capture.profile(), &self.language_code)?;
        Ok(TranscribeRequest {
            audio_url: encoded.audio_base64,
            audio_config: encoded.config,
        })
    }

    /// Drop presses that queued up while a search was running
    fn reject_queued(&mut self) {
        loop {
            match self.command_rx.try_recv() {
                Ok(OrchestratorCommand::Shutdown) | Err(TryRecvError::Disconnected) => {
                    self.stop_requested = true;
                    return;
                }
                Ok(command) => debug!("Ignoring {:?} received during a search", command),
                Err(TryRecvError::Empty) => return,
            }
        }
    }

    fn shutdown(&mut self) {
        if self.capture.is_recording() {
            if let Err(e) = self.capture.stop() {
                warn!("Failed to stop recording on shutdown: {}", e);
            }
        }
        self.is_recording.store(false, Ordering::SeqCst);
        self.emit(OrchestratorEvent::Shutdown);
    }
}

/// Builder for creating an orchestrator
pub struct OrchestratorBuilder {
    config: AppConfig,
    permission: Option<MicPermission>,
}

impl OrchestratorBuilder {
    pub fn new() -> Self {
        Self {
            config: AppConfig::default(),
            permission: None,
        }
    }

    pub fn with_config(mut self, config: AppConfig) -> Self {
        self.config = config;
        self
    }

    /// Skip probing the input device
    pub fn with_permission(mut self, permission: MicPermission) -> Self {
        self.permission = Some(permission);
        self
    }

    /// Build with an explicit audio source factory
    pub fn build(
        self,
        service: Arc<dyn RecipeService>,
        speaker: Arc<dyn Speaker>,
        factory: SourceFactory,
        runtime: Handle,
    ) -> (Orchestrator, OrchestratorHandle) {
        let permission = if self.config.enable_audio_input {
            self.permission.unwrap_or_else(crate::audio::probe_permission)
        } else {
            MicPermission::Denied
        };

        let (command_tx, command_rx) = unbounded();
        let (event_tx, event_rx) = unbounded();
        let is_recording = Arc::new(AtomicBool::new(false));
        let is_searching = Arc::new(AtomicBool::new(false));

        info!("Microphone permission: {:?}", permission);

        let orchestrator = Orchestrator {
            service,
            speaker,
            factory,
            profile: self.config.capture.clone(),
            permission,
            language_code: self.config.language_code.clone(),
            runtime,
            command_rx,
            event_tx,
            is_recording: Arc::clone(&is_recording),
            is_searching: Arc::clone(&is_searching),
        };

        let handle = OrchestratorHandle {
            command_tx,
            event_rx,
            is_recording,
            is_searching,
            permission,
        };

        (orchestrator, handle)
    }

    /// Build against the default microphone
    #[cfg(feature = "audio-io")]
    pub fn build_with_microphone(
        self,
        service: Arc<dyn RecipeService>,
        speaker: Arc<dyn Speaker>,
        meter: crate::audio::LevelMeter,
        runtime: Handle,
    ) -> (Orchestrator, OrchestratorHandle) {
        let factory: SourceFactory = Box::new(move || -> Result<Box<dyn crate::audio::AudioSource>> {
            let source = crate::audio::MicrophoneSource::new(meter.clone())?;
            Ok(Box::new(source))
        });
        self.build(service, speaker, factory, runtime)
    }
}

impl Default for OrchestratorBuilder {
    fn default() -> Self {
        Self::new()
    }
}
