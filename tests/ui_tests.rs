//! UI automation tests using egui_kittest and AccessKit
//!
//! Screens are driven through their accessibility labels, the way a user
//! would click through them.

use async_trait::async_trait;
use egui_kittest::kittest::Queryable;
use egui_kittest::Harness;
use flavormap::integration::{OrchestratorEvent, SearchOutcome};
use flavormap::recipes::{Recipe, RecipeService, SearchResponse, TranscribeRequest};
use flavormap::storage::{LocalState, MemoryStore};
use flavormap::ui::{screens, Screen, Tab, Theme, ViewState, LOGIN_REQUIRED, RECORD_HINT};
use flavormap::Result;
use std::sync::Arc;

struct EmptyBackend;

#[async_trait]
impl RecipeService for EmptyBackend {
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

    async fn transcribe_and_search(&self, _: &TranscribeRequest) -> Result<SearchResponse> {
        Ok(SearchResponse::default())
    }
}

struct TestApp {
    _runtime: tokio::runtime::Runtime,
    state: ViewState,
    theme: Theme,
}

impl TestApp {
    fn new() -> Self {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let state = ViewState::new(
            LocalState::new(Arc::new(MemoryStore::new())),
            Arc::new(EmptyBackend),
            runtime.handle().clone(),
        );
        Self {
            _runtime: runtime,
            state,
            theme: Theme::light(),
        }
    }

    fn logged_in(mut self, name: &str) -> Self {
        self.state.login_input = name.to_string();
        self.state.submit_login();
        self
    }
}

fn recipe(id: &str, name: &str, description: &str) -> Recipe {
    serde_json::from_value(serde_json::json!({
        "Id": id,
        "Name": name,
        "ImageUrl": format!("https://img.example/{}.jpg", id),
        "Author": "Jamie",
        "Difficulty": "Easy",
        "Time": "95",
        "Servings": 4,
        "Description": description,
        "Ingredients": ["200g flour", "2 eggs"],
        "Instructions": ["Mix", "Bake"],
    }))
    .unwrap()
}

fn harness(app: TestApp) -> Harness<'static, TestApp> {
    Harness::builder()
        .with_size(egui::Vec2::new(420.0, 780.0))
        .build_state(
            |ctx, app: &mut TestApp| {
                egui::CentralPanel::default().show(ctx, |ui| {
                    screens::show(&mut app.state, &app.theme, ui);
                });
            },
            app,
        )
}

#[test]
fn test_blank_username_is_rejected() {
    let mut harness = harness(TestApp::new());
    harness.run();

    harness.get_by_label("Login").click();
    harness.run();

    let _error = harness.get_by_label(LOGIN_REQUIRED);
    assert_eq!(harness.state().state.screen, Screen::Login);
}

#[test]
fn test_login_opens_home() {
    let mut harness = harness(TestApp::new());
    harness.run();

    harness.get_by_label("Username").focus();
    harness.run();
    harness.get_by_label("Username").type_text("sam");
    harness.run();

    harness.get_by_label("Login").click();
    harness.run();

    assert_eq!(harness.state().state.screen, Screen::Main(Tab::Home));
    let _greeting = harness.get_by_label("Hi, sam!");
}

#[test]
fn test_view_all_opens_list() {
    let mut harness = harness(TestApp::new().logged_in("sam"));
    harness.run();

    harness.get_by_label("View All Popular").click();
    harness.run();

    assert!(matches!(
        harness.state().state.screen,
        Screen::RecipeList(flavormap::recipes::FeedKind::Popular)
    ));
    assert!(harness.state().state.can_go_back());
}

#[test]
fn test_search_shows_hint_and_capitalized_transcript() {
    let mut app = TestApp::new().logged_in("sam");
    app.state.select_tab(Tab::Search);
    app.state.apply_orchestrator_event(OrchestratorEvent::AwaitingResults);
    app.state.apply_orchestrator_event(OrchestratorEvent::Outcome(SearchOutcome::NoMatches {
        transcript: "BANANA bread".into(),
    }));
    app.state.apply_orchestrator_event(OrchestratorEvent::RecordingFinished);

    let mut harness = harness(app);
    harness.run();

    let _hint = harness.get_by_label(RECORD_HINT);
    let _record = harness.get_by_label("Record");
    let _bubble = harness.get_by_label("You said: Banana bread");
    assert!(!harness.state().state.can_record());
}

#[test]
fn test_detail_like_and_checklist() {
    let long = "A slow weekend loaf. ".repeat(20);
    let mut app = TestApp::new().logged_in("sam");
    app.state.open_recipe(recipe("r1", "Banana bread", &long));

    let mut harness = harness(app);
    harness.run();

    harness.get_by_label("Like recipe").click();
    harness.run();
    assert!(harness.state().state.is_liked("r1"));
    let _unlike = harness.get_by_label("Unlike recipe");

    harness.get_by_label("2 eggs").click();
    harness.run();
    assert!(harness.state().state.checked_ingredients("r1").contains(&1));

    harness.get_by_label("Read more").click();
    harness.run();
    let _less = harness.get_by_label("Show less");
}

#[test]
fn test_sign_out_returns_to_login() {
    let mut app = TestApp::new().logged_in("sam");
    app.state.select_tab(Tab::Account);

    let mut harness = harness(app);
    harness.run();

    harness.get_by_label("Sign out").click();
    harness.run();

    assert_eq!(harness.state().state.screen, Screen::Login);
    assert!(harness.state().state.local().username().is_none());
}
