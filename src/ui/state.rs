//! View state for the FlavorMap window
//!
//! Owns navigation and everything the screens draw. Feeds load as tokio
//! tasks and the orchestrator runs on its own thread; both report back over
//! channels drained once per frame by [`ViewState::poll_events`].

use crate::audio::{LevelMeter, MicPermission};
use crate::integration::{OrchestratorCommand, OrchestratorEvent, OrchestratorHandle, SearchOutcome};
use crate::recipes::{load_feed, FeedKind, Recipe, RecipeService};
use crate::storage::LocalState;
use crossbeam_channel::{unbounded, Receiver, Sender};
use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;
use tokio::runtime::Handle;
use tracing::{debug, error, info, warn};

pub const LOGIN_REQUIRED: &str = "Please enter a username";
pub const RECORD_HINT: &str = "Press and hold to record";
pub const AWAITING_STATUS: &str = "...";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Home,
    Search,
    Account,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Screen {
    Login,
    Main(Tab),
    RecipeList(FeedKind),
    RecipeDetail(Recipe),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DetailTab {
    #[default]
    Ingredients,
    Instructions,
}

/// Which list a feed result belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedTarget {
    HomePopular,
    HomeRecommended,
    List,
    Liked,
}

struct FeedUpdate {
    target: FeedTarget,
    generation: u64,
    recipes: Vec<Recipe>,
}

/// Search tab state
#[derive(Debug, Clone, Default)]
pub struct SearchView {
    pub is_recording: bool,
    pub awaiting: bool,
    /// Whether a recording has been sent since the last apology
    pub has_recorded: bool,
    pub transcript: Option<String>,
    pub reply: Option<String>,
    pub status: String,
    pub results: Vec<Recipe>,
    /// egui time at which the current results started entering
    pub results_since: Option<f64>,
    /// The mic button is held down
    pub mic_held: bool,
}

impl SearchView {
    /// Transcript as shown in the bubble: first letter upper case, rest lower
    pub fn display_transcript(&self) -> Option<String> {
        self.transcript.as_deref().map(capitalize)
    }

    /// New results that have not started entering yet; the list scrolls to the top
    pub fn has_fresh_results(&self) -> bool {
        !self.results.is_empty() && self.results_since.is_none()
    }
}

/// Recipe detail screen state
#[derive(Debug, Clone, Default)]
pub struct DetailView {
    pub description_expanded: bool,
    pub tab: DetailTab,
}

pub struct ViewState {
    pub screen: Screen,
    back_stack: Vec<Screen>,

    pub username: Option<String>,
    pub login_input: String,
    pub login_error: Option<String>,

    pub home_popular: Vec<Recipe>,
    pub home_recommended: Vec<Recipe>,
    pub list_recipes: Vec<Recipe>,
    pub liked_recipes: Vec<Recipe>,

    pub search: SearchView,
    pub detail: DetailView,

    /// Input level while recording
    pub meter: LevelMeter,

    local: LocalState,
    /// In-memory copies of the stored records, refreshed on toggle and focus
    liked: HashSet<String>,
    checked: (String, BTreeSet<usize>),
    service: Arc<dyn RecipeService>,
    runtime: Handle,
    feed_tx: Sender<FeedUpdate>,
    feed_rx: Receiver<FeedUpdate>,
    list_generation: u64,
    orchestrator: Option<OrchestratorHandle>,
}

impl ViewState {
    pub fn new(local: LocalState, service: Arc<dyn RecipeService>, runtime: Handle) -> Self {
        let (feed_tx, feed_rx) = unbounded();
        let username = local.username();
        let screen = if username.is_some() {
            Screen::Main(Tab::Home)
        } else {
            Screen::Login
        };

        let mut state = Self {
            screen,
            back_stack: Vec::new(),
            username,
            login_input: String::new(),
            login_error: None,
            home_popular: Vec::new(),
            home_recommended: Vec::new(),
            list_recipes: Vec::new(),
            liked_recipes: Vec::new(),
            search: SearchView::default(),
            detail: DetailView::default(),
            meter: LevelMeter::default(),
            liked: HashSet::new(),
            checked: (String::new(), BTreeSet::new()),
            local,
            service,
            runtime,
            feed_tx,
            feed_rx,
            list_generation: 0,
            orchestrator: None,
        };

        state.load_liked();
        if state.username.is_some() {
            state.refresh_home();
        }
        state
    }

    pub fn with_orchestrator(mut self, handle: OrchestratorHandle) -> Self {
        self.orchestrator = Some(handle);
        self
    }

    pub fn with_meter(mut self, meter: LevelMeter) -> Self {
        self.meter = meter;
        self
    }

    pub fn local(&self) -> &LocalState {
        &self.local
    }

    // Session

    pub fn submit_login(&mut self) {
        match self.local.set_username(&self.login_input) {
            Ok(true) => {
                let name = self.login_input.trim().to_string();
                info!("Logged in as {}", name);
                self.username = Some(name);
                self.login_input.clear();
                self.login_error = None;
                self.back_stack.clear();
                self.screen = Screen::Main(Tab::Home);
                self.refresh_home();
            }
            Ok(false) => self.login_error = Some(LOGIN_REQUIRED.to_string()),
            Err(e) => {
                error!("Failed to store username: {}", e);
                self.login_error = Some(e.user_message());
            }
        }
    }

    pub fn sign_out(&mut self) {
        if let Err(e) = self.local.clear_username() {
            error!("Failed to clear username: {}", e);
        }
        info!("Signed out");
        self.username = None;
        self.back_stack.clear();
        self.home_popular.clear();
        self.home_recommended.clear();
        self.liked_recipes.clear();
        self.list_recipes.clear();
        self.screen = Screen::Login;
    }

    // Navigation

    pub fn select_tab(&mut self, tab: Tab) {
        self.load_liked();
        self.back_stack.clear();
        self.screen = Screen::Main(tab);
        match tab {
            Tab::Home => self.refresh_home(),
            Tab::Account => self.refresh_liked(),
            Tab::Search => {}
        }
    }

    pub fn current_tab(&self) -> Option<Tab> {
        match self.screen {
            Screen::Main(tab) => Some(tab),
            _ => None,
        }
    }

    pub fn open_list(&mut self, kind: FeedKind) {
        self.list_recipes.clear();
        self.list_generation += 1;
        self.request_feed(FeedTarget::List, kind.clone(), false);
        self.push_screen(Screen::RecipeList(kind));
    }

    pub fn open_recipe(&mut self, recipe: Recipe) {
        self.detail = DetailView::default();
        self.load_liked();
        self.load_checked(&recipe.id);
        self.push_screen(Screen::RecipeDetail(recipe));
    }

    pub fn can_go_back(&self) -> bool {
        !self.back_stack.is_empty()
    }

    pub fn go_back(&mut self) {
        if let Some(screen) = self.back_stack.pop() {
            self.load_liked();
            if let Screen::RecipeDetail(recipe) = &screen {
                self.load_checked(&recipe.id);
            }
            // Likes may have changed on the way
            if screen == Screen::Main(Tab::Account) {
                self.refresh_liked();
            }
            self.screen = screen;
        }
    }

    fn push_screen(&mut self, screen: Screen) {
        let previous = std::mem::replace(&mut self.screen, screen);
        self.back_stack.push(previous);
    }

    // Feeds

    pub fn refresh_home(&mut self) {
        self.request_feed(FeedTarget::HomePopular, FeedKind::Popular, true);
        self.request_feed(FeedTarget::HomeRecommended, FeedKind::Recommended, true);
    }

    pub fn refresh_liked(&mut self) {
        self.request_feed(FeedTarget::Liked, FeedKind::Liked, false);
    }

    fn request_feed(&self, target: FeedTarget, kind: FeedKind, on_home_page: bool) {
        let service = Arc::clone(&self.service);
        let local = self.local.clone();
        let tx = self.feed_tx.clone();
        let generation = self.list_generation;

        self.runtime.spawn(async move {
            let recipes = load_feed(service.as_ref(), &local, &kind, on_home_page).await;
            if tx
                .send(FeedUpdate {
                    target,
                    generation,
                    recipes,
                })
                .is_err()
            {
                debug!("View closed before {:?} loaded", kind);
            }
        });
    }

    /// Apply a loaded feed directly
    pub fn apply_feed(&mut self, target: FeedTarget, recipes: Vec<Recipe>) {
        match target {
            FeedTarget::HomePopular => self.home_popular = recipes,
            FeedTarget::HomeRecommended => self.home_recommended = recipes,
            FeedTarget::List => self.list_recipes = recipes,
            FeedTarget::Liked => self.liked_recipes = recipes,
        }
    }

    // Likes and checklist

    fn load_liked(&mut self) {
        self.liked = self.local.liked_ids().into_iter().collect();
    }

    fn load_checked(&mut self, recipe_id: &str) {
        self.checked = (recipe_id.to_string(), self.local.checked_indices(recipe_id));
    }

    pub fn is_liked(&self, recipe_id: &str) -> bool {
        self.liked.contains(recipe_id)
    }

    /// Toggle a like; the shown flag only changes once the write succeeded
    pub fn toggle_like(&mut self, recipe_id: &str) {
        match self.local.toggle_liked(recipe_id) {
            Ok(true) => {
                self.liked.insert(recipe_id.to_string());
            }
            Ok(false) => {
                self.liked.remove(recipe_id);
            }
            Err(e) => error!("Failed to update liked recipes: {}", e),
        }
    }

    pub fn checked_ingredients(&self, recipe_id: &str) -> BTreeSet<usize> {
        if self.checked.0 == recipe_id {
            self.checked.1.clone()
        } else {
            self.local.checked_indices(recipe_id)
        }
    }

    pub fn toggle_ingredient(&mut self, recipe_id: &str, index: usize) {
        match self.local.toggle_checked(recipe_id, index) {
            Ok(_) => self.load_checked(recipe_id),
            Err(e) => error!("Failed to update checked ingredients: {}", e),
        }
    }

    // Voice search

    pub fn mic_permission(&self) -> MicPermission {
        self.orchestrator
            .as_ref()
            .map_or(MicPermission::Denied, |o| o.permission())
    }

    /// Whether the mic button accepts a press
    pub fn can_record(&self) -> bool {
        self.mic_permission().is_granted() && !self.search.is_recording && !self.search.awaiting
    }

    pub fn press_mic(&mut self) {
        if self.search.mic_held || !self.can_record() {
            return;
        }
        if let Some(orchestrator) = &self.orchestrator {
            match orchestrator.send_command(OrchestratorCommand::PressStart) {
                Ok(()) => self.search.mic_held = true,
                Err(e) => error!("{}", e),
            }
        }
    }

    pub fn release_mic(&mut self) {
        if !self.search.mic_held {
            return;
        }
        self.search.mic_held = false;
        if let Some(orchestrator) = &self.orchestrator {
            if let Err(e) = orchestrator.send_command(OrchestratorCommand::Release) {
                error!("{}", e);
            }
        }
    }

    /// Drain feed results and orchestrator events
    pub fn poll_events(&mut self) {
        while let Ok(update) = self.feed_rx.try_recv() {
            if update.target == FeedTarget::List && update.generation != self.list_generation {
                debug!("Dropping stale list results");
                continue;
            }
            self.apply_feed(update.target, update.recipes);
        }

        let events: Vec<OrchestratorEvent> = match &self.orchestrator {
            Some(orchestrator) => std::iter::from_fn(|| orchestrator.try_recv_event()).collect(),
            None => Vec::new(),
        };

        for event in events {
            self.apply_orchestrator_event(event);
        }
    }

    pub fn apply_orchestrator_event(&mut self, event: OrchestratorEvent) {
        match event {
            OrchestratorEvent::RecordingStarted => {
                self.search.is_recording = true;
            }
            OrchestratorEvent::AwaitingResults => {
                self.search.is_recording = false;
                self.search.awaiting = true;
                self.search.has_recorded = true;
                self.search.results.clear();
                self.search.results_since = None;
                self.search.transcript = None;
                self.search.reply = None;
                self.search.status = AWAITING_STATUS.to_string();
            }
            OrchestratorEvent::Outcome(outcome) => self.apply_outcome(outcome),
            OrchestratorEvent::RecordingFinished => {
                self.search.is_recording = false;
                self.search.awaiting = false;
            }
            OrchestratorEvent::Shutdown => {
                warn!("Voice search stopped");
                self.orchestrator = None;
            }
        }
    }

    fn apply_outcome(&mut self, outcome: SearchOutcome) {
        self.search.awaiting = false;
        self.search.status.clear();
        self.search.reply = Some(outcome.spoken_reply().to_string());

        match outcome {
            SearchOutcome::Untranscribed => {
                self.search.has_recorded = false;
                self.search.transcript = None;
            }
            SearchOutcome::NoMatches { transcript } => {
                self.search.transcript = Some(transcript);
            }
            SearchOutcome::Found {
                transcript,
                recipes,
                ..
            } => {
                self.search.transcript = Some(transcript);
                self.search.results = recipes;
                self.search.results_since = None;
            }
        }
    }

    /// Stop the orchestrator worker
    pub fn shutdown(&mut self) {
        if let Some(orchestrator) = &self.orchestrator {
            if orchestrator.send_command(OrchestratorCommand::Shutdown).is_err() {
                debug!("Orchestrator already stopped");
            }
        }
    }
}

/// First character upper case, the rest lower case
pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recipes::feed::fake::RecordingService;
    use crate::recipes::types::sample_recipe;
    use crate::storage::{KeyValueStore, MemoryStore};

    fn view(runtime: &tokio::runtime::Runtime) -> ViewState {
        ViewState::new(
            LocalState::new(Arc::new(MemoryStore::new())),
            Arc::new(RecordingService::default()),
            runtime.handle().clone(),
        )
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("CHOCOLATE cake"), "Chocolate cake");
        assert_eq!(capitalize("é"), "É");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn test_login_requires_name() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let mut state = view(&runtime);
        assert_eq!(state.screen, Screen::Login);

        state.login_input = "   ".into();
        state.submit_login();
        assert_eq!(state.login_error.as_deref(), Some(LOGIN_REQUIRED));
        assert_eq!(state.screen, Screen::Login);

        state.login_input = " Sam ".into();
        state.submit_login();
        assert_eq!(state.username.as_deref(), Some("Sam"));
        assert_eq!(state.screen, Screen::Main(Tab::Home));

        state.sign_out();
        assert_eq!(state.screen, Screen::Login);
        assert!(state.local().username().is_none());
    }

    #[test]
    fn test_navigation_stack() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let mut state = view(&runtime);
        state.select_tab(Tab::Home);

        state.open_list(FeedKind::Category("baking".into()));
        state.open_recipe(sample_recipe("r1"));
        assert!(matches!(state.screen, Screen::RecipeDetail(_)));

        state.go_back();
        assert_eq!(state.screen, Screen::RecipeList(FeedKind::Category("baking".into())));
        state.go_back();
        assert_eq!(state.screen, Screen::Main(Tab::Home));
        assert!(!state.can_go_back());
    }

    #[test]
    fn test_search_events() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let mut state = view(&runtime);

        state.apply_orchestrator_event(OrchestratorEvent::RecordingStarted);
        assert!(state.search.is_recording);

        state.apply_orchestrator_event(OrchestratorEvent::AwaitingResults);
        assert_eq!(state.search.status, AWAITING_STATUS);
        assert!(state.search.has_recorded);

        state.apply_orchestrator_event(OrchestratorEvent::Outcome(SearchOutcome::Found {
            transcript: "PASTA bake".into(),
            recipes: vec![sample_recipe("a"), sample_recipe("b")],
            reply: "Enjoy".into(),
        }));
        state.apply_orchestrator_event(OrchestratorEvent::RecordingFinished);

        assert_eq!(state.search.display_transcript().as_deref(), Some("Pasta bake"));
        assert_eq!(state.search.results.len(), 2);
        assert!(state.search.has_fresh_results());
        state.search.results_since = Some(0.0);
        assert!(!state.search.has_fresh_results());
        assert_eq!(state.search.reply.as_deref(), Some("Enjoy"));
        assert!(!state.search.awaiting);
        assert!(!state.search.is_recording);
    }

    #[test]
    fn test_untranscribed_resets_has_recorded() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let mut state = view(&runtime);

        state.apply_orchestrator_event(OrchestratorEvent::AwaitingResults);
        state.apply_orchestrator_event(OrchestratorEvent::Outcome(SearchOutcome::Untranscribed));
        assert!(!state.search.has_recorded);
        assert!(state.search.results.is_empty());
        assert_eq!(
            state.search.reply.as_deref(),
            Some(crate::speech::TRANSCRIBE_APOLOGY)
        );
    }

    #[test]
    fn test_checklist_and_likes() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let mut state = view(&runtime);

        state.toggle_like("r1");
        assert!(state.is_liked("r1"));
        state.toggle_like("r1");
        assert!(!state.is_liked("r1"));

        state.toggle_ingredient("r1", 0);
        state.toggle_ingredient("r1", 2);
        state.toggle_ingredient("r1", 0);
        assert_eq!(state.checked_ingredients("r1"), BTreeSet::from([2]));
    }

    /// Counts reads so tests can tell cached lookups from store hits
    #[derive(Default)]
    struct CountingStore {
        inner: MemoryStore,
        reads: std::sync::atomic::AtomicUsize,
    }

    impl KeyValueStore for CountingStore {
        fn get(&self, key: &str) -> crate::Result<Option<String>> {
            self.reads.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: String) -> crate::Result<()> {
            self.inner.set(key, value)
        }

        fn remove(&self, key: &str) -> crate::Result<()> {
            self.inner.remove(key)
        }
    }

    #[test]
    fn test_detail_lookups_use_cached_records() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let store = Arc::new(CountingStore::default());
        let local = LocalState::new(store.clone());
        local.toggle_liked("r1").unwrap();
        local.toggle_checked("r1", 1).unwrap();

        let mut state = ViewState::new(
            local.clone(),
            Arc::new(RecordingService::default()),
            runtime.handle().clone(),
        );
        state.open_recipe(sample_recipe("r1"));

        let reads = store.reads.load(std::sync::atomic::Ordering::SeqCst);
        for _ in 0..100 {
            assert!(state.is_liked("r1"));
            assert_eq!(state.checked_ingredients("r1"), BTreeSet::from([1]));
        }
        assert_eq!(store.reads.load(std::sync::atomic::Ordering::SeqCst), reads);

        state.toggle_like("r1");
        state.toggle_ingredient("r1", 1);
        assert!(!state.is_liked("r1"));
        assert!(state.checked_ingredients("r1").is_empty());
        assert!(!local.is_liked("r1"));
    }

    #[test]
    fn test_mic_disabled_without_orchestrator() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let mut state = view(&runtime);
        assert!(!state.can_record());
        state.press_mic();
        assert!(!state.search.mic_held);
    }
}
