//! Recording session state machine
//!
//! A session records exactly one capture:
//! `Unprepared → Prepared → Recording → Stopped`. A stopped session cannot
//! be restarted; [`AudioCapture`] replaces it with a fresh one.

use super::{AudioSource, CaptureProfile, CapturedAudio, MicPermission};
use crate::{FlavorError, Result};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Unprepared,
    Prepared(CaptureProfile),
    Recording(CaptureProfile),
    Stopped,
}

/// Builds a fresh audio source for each session
pub type SourceFactory = Box<dyn FnMut() -> Result<Box<dyn AudioSource>> + Send>;

pub struct RecordingSession {
    state: SessionState,
    source: Box<dyn AudioSource>,
}

impl RecordingSession {
    pub fn new(source: Box<dyn AudioSource>) -> Self {
        Self {
            state: SessionState::Unprepared,
            source,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Whether `begin` can still be reached from here
    pub fn is_recordable(&self) -> bool {
        matches!(self.state, SessionState::Unprepared | SessionState::Prepared(_))
    }

    pub fn is_recording(&self) -> bool {
        matches!(self.state, SessionState::Recording(_))
    }

    pub fn prepare(&mut self, profile: &CaptureProfile) -> Result<()> {
        if self.state != SessionState::Unprepared {
            return Err(FlavorError::InvalidState(format!(
                "cannot prepare a session in state {:?}",
                self.state
            )));
        }

        self.source.prepare(profile)?;
        self.state = SessionState::Prepared(profile.clone());
        debug!("Prepared recording session");
        Ok(())
    }

    pub fn begin(&mut self) -> Result<()> {
        let profile = match &self.state {
            SessionState::Prepared(profile) => profile.clone(),
            other => {
                return Err(FlavorError::InvalidState(format!(
                    "cannot record from state {:?}",
                    other
                )))
            }
        };

        self.source.begin()?;
        self.state = SessionState::Recording(profile);
        Ok(())
    }

    pub fn stop(&mut self) -> Result<CapturedAudio> {
        if !self.is_recording() {
            return Err(FlavorError::InvalidState(format!(
                "cannot stop a session in state {:?}",
                self.state
            )));
        }

        // The session is spent even if the device fails to hand over audio
        self.state = SessionState::Stopped;
        self.source.finish()
    }
}

/// Owns the one recording session used by voice search
pub struct AudioCapture {
    factory: SourceFactory,
    session: Option<RecordingSession>,
    profile: CaptureProfile,
    permission: MicPermission,
}

impl AudioCapture {
    pub fn new(factory: SourceFactory, profile: CaptureProfile, permission: MicPermission) -> Self {
        Self {
            factory,
            session: None,
            profile,
            permission,
        }
    }

    pub fn permission(&self) -> MicPermission {
        self.permission
    }

    pub fn profile(&self) -> &CaptureProfile {
        &self.profile
    }

    pub fn is_recording(&self) -> bool {
        self.session.as_ref().is_some_and(|s| s.is_recording())
    }

    pub fn session_state(&self) -> Option<&SessionState> {
        self.session.as_ref().map(|s| s.state())
    }

    /// Start a capture, replacing a spent session first
    pub fn start(&mut self) -> Result<()> {
        if !self.permission.is_granted() {
            return Err(FlavorError::PermissionDenied);
        }

        if self.is_recording() {
            warn!("Already recording");
            return Ok(());
        }

        let needs_fresh = self.session.as_ref().map_or(true, |s| !s.is_recordable());
        if needs_fresh {
            self.session = Some(RecordingSession::new((self.factory)()?));
        }

        let Some(session) = self.session.as_mut() else {
            return Err(FlavorError::InvalidState("no recording session".into()));
        };

        if *session.state() == SessionState::Unprepared {
            session.prepare(&self.profile)?;
        }

        if let Err(e) = session.begin() {
            // A session that failed to start is not trusted again
            self.session = None;
            return Err(e);
        }

        info!(
            "Recording started ({} Hz, {} channel)",
            self.profile.sample_rate, self.profile.channels
        );
        Ok(())
    }

    /// Finish the capture; the spent session is dropped
    pub fn stop(&mut self) -> Result<CapturedAudio> {
        let mut session = self
            .session
            .take()
            .ok_or_else(|| FlavorError::InvalidState("not recording".into()))?;

        let audio = session.stop()?;
        info!(
            "Recording stopped: {} samples ({:.2}s)",
            audio.samples.len(),
            audio.duration_seconds()
        );
        Ok(audio)
    }
}
