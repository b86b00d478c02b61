//! End-to-end voice search with a scripted backend and a fake microphone

use async_trait::async_trait;
use base64::Engine;
use flavormap::audio::{AudioSource, CaptureProfile, CapturedAudio, MicPermission, SourceFactory};
use flavormap::integration::{
    OrchestratorBuilder, OrchestratorCommand, OrchestratorEvent, OrchestratorHandle, SearchOutcome,
};
use flavormap::recipes::{Recipe, RecipeService, SearchResponse, TranscribeRequest};
use flavormap::speech::{TranscriptSpeaker, DEFAULT_ACKNOWLEDGEMENT, NOT_FOUND_REPLY, TRANSCRIBE_APOLOGY};
use flavormap::{FlavorError, Result};
use parking_lot::Mutex;
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

/// Produces half a second of a 440 Hz tone at 48 kHz
struct ToneSource;

impl AudioSource for ToneSource {
    fn prepare(&mut self, _profile: &CaptureProfile) -> Result<()> {
        Ok(())
    }

    fn begin(&mut self) -> Result<()> {
        Ok(())
    }

    fn finish(&mut self) -> Result<CapturedAudio> {
        let samples = (0..24_000)
            .map(|i| (i as f32 * 440.0 * 2.0 * std::f32::consts::PI / 48_000.0).sin() * 0.5)
            .collect();
        Ok(CapturedAudio::new(samples, 48_000))
    }
}

fn tone_factory() -> SourceFactory {
    Box::new(|| -> Result<Box<dyn AudioSource>> { Ok(Box::new(ToneSource)) })
}

struct Backend {
    reply: Result<SearchResponse>,
    requests: Mutex<Vec<TranscribeRequest>>,
}

impl Backend {
    fn replying(reply: Result<SearchResponse>) -> Arc<Self> {
        Arc::new(Self {
            reply,
            requests: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl RecipeService for Backend {
    async fn popular(&self, _: bool) -> Result<Vec<Recipe>> {
        Ok(Vec::new())
    }

    async fn recommended(&self, _: &[String], _: bool) -> Result<Vec<Recipe>> {
        Ok(Vec::new())
    }

    async fn by_category(&self, _: &str) -> Result<Vec<Recipe>> {
        Ok(Vec::new())
    }

    async fn by_ids(&self, _: &[String]) -> Result<Vec<Recipe>> {
        Ok(Vec::new())
    }

    async fn transcribe_and_search(&self, request: &TranscribeRequest) -> Result<SearchResponse> {
        self.requests.lock().push(request.clone());
        self.reply.clone()
    }
}

fn recipe(id: &str) -> Recipe {
    serde_json::from_value(serde_json::json!({
        "Id": id,
        "Name": format!("Recipe {}", id),
        "Time": 20,
        "Servings": "2",
    }))
    .unwrap()
}

struct Session {
    _runtime: tokio::runtime::Runtime,
    handle: OrchestratorHandle,
    worker: Option<JoinHandle<()>>,
    speaker: TranscriptSpeaker,
}

impl Session {
    fn start(backend: Arc<Backend>) -> Self {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let speaker = TranscriptSpeaker::new();
        let (orchestrator, handle) = OrchestratorBuilder::new()
            .with_permission(MicPermission::Granted)
            .build(
                backend,
                Arc::new(speaker.clone()),
                tone_factory(),
                runtime.handle().clone(),
            );
        let worker = orchestrator.start().unwrap();

        Self {
            _runtime: runtime,
            handle,
            worker: Some(worker),
            speaker,
        }
    }

    /// Press, release and collect events up to `RecordingFinished`
    fn search(&self) -> Vec<OrchestratorEvent> {
        self.handle.send_command(OrchestratorCommand::PressStart).unwrap();
        self.handle.send_command(OrchestratorCommand::Release).unwrap();

        let mut events = Vec::new();
        loop {
            let event = self
                .handle
                .events()
                .recv_timeout(Duration::from_secs(10))
                .expect("orchestrator stalled");
            let finished = matches!(event, OrchestratorEvent::RecordingFinished);
            events.push(event);
            if finished {
                return events;
            }
        }
    }

    fn outcome(events: &[OrchestratorEvent]) -> SearchOutcome {
        events
            .iter()
            .find_map(|e| match e {
                OrchestratorEvent::Outcome(outcome) => Some(outcome.clone()),
                _ => None,
            })
            .expect("no outcome")
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        let _ = self.handle.send_command(OrchestratorCommand::Shutdown);
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

#[test]
fn test_recipes_found_in_server_order() {
    let backend = Backend::replying(Ok(SearchResponse {
        input: "something with chickpeas".into(),
        answer: "Here are three chickpea dishes".into(),
        recipes: vec![recipe("3"), recipe("1"), recipe("2")],
    }));
    let session = Session::start(backend.clone());

    let events = session.search();
    assert!(matches!(events[0], OrchestratorEvent::RecordingStarted));
    assert!(matches!(events[1], OrchestratorEvent::AwaitingResults));
    assert!(matches!(events.last(), Some(OrchestratorEvent::RecordingFinished)));

    let outcome = Session::outcome(&events);
    let ids: Vec<&str> = outcome.recipes().iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["3", "1", "2"]);
    assert_eq!(
        session.speaker.last().as_deref(),
        Some("Here are three chickpea dishes")
    );
}

#[test]
fn test_upload_is_a_16k_wav() {
    let backend = Backend::replying(Ok(SearchResponse::default()));
    let session = Session::start(backend.clone());
    session.search();

    let requests = backend.requests.lock();
    assert_eq!(requests.len(), 1);

    let config = &requests[0].audio_config;
    assert_eq!(config.encoding, "LINEAR16");
    assert_eq!(config.sample_rate_hertz, 16_000);
    assert_eq!(config.language_code, "en-GB");

    let wav = base64::engine::general_purpose::STANDARD
        .decode(&requests[0].audio_url)
        .unwrap();
    let reader = hound::WavReader::new(std::io::Cursor::new(wav)).unwrap();
    assert_eq!(reader.spec().sample_rate, 16_000);
    assert_eq!(reader.spec().channels, 1);
    assert!(reader.len() > 7_000 && reader.len() < 9_000);
}

#[test]
fn test_empty_answer_gets_acknowledgement() {
    let backend = Backend::replying(Ok(SearchResponse {
        input: "lemon tart".into(),
        answer: String::new(),
        recipes: vec![recipe("tart")],
    }));
    let session = Session::start(backend);
    session.search();

    assert_eq!(session.speaker.last().as_deref(), Some(DEFAULT_ACKNOWLEDGEMENT));
}

#[test]
fn test_no_recipes_speaks_not_found() {
    let backend = Backend::replying(Ok(SearchResponse {
        input: "unicorn stew".into(),
        answer: "ignored".into(),
        recipes: vec![],
    }));
    let session = Session::start(backend);

    let outcome = Session::outcome(&session.search());
    assert!(outcome.recipes().is_empty());
    assert_eq!(outcome.transcript(), Some("unicorn stew"));
    assert_eq!(session.speaker.last().as_deref(), Some(NOT_FOUND_REPLY));
}

#[test]
fn test_backend_failure_apologises_and_finishes() {
    let backend = Backend::replying(Err(FlavorError::Http {
        status: 500,
        body: "boom".into(),
    }));
    let session = Session::start(backend);

    let events = session.search();
    assert_eq!(Session::outcome(&events), SearchOutcome::Untranscribed);
    assert!(matches!(events.last(), Some(OrchestratorEvent::RecordingFinished)));
    assert_eq!(session.speaker.last().as_deref(), Some(TRANSCRIBE_APOLOGY));
    assert!(session.handle.can_record());
}

#[test]
fn test_consecutive_searches_use_fresh_sessions() {
    let backend = Backend::replying(Ok(SearchResponse {
        input: "soup".into(),
        answer: String::new(),
        recipes: vec![recipe("soup")],
    }));
    let session = Session::start(backend.clone());

    session.search();
    session.search();

    assert_eq!(backend.requests.lock().len(), 2);
    assert_eq!(session.speaker.lines().len(), 2);
}
