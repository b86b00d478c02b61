use anyhow::{Context, Result};
use flavormap::audio::LevelMeter;
use flavormap::integration::{AppConfig, OrchestratorBuilder};
use flavormap::recipes::{HttpRecipeClient, RecipeService};
use flavormap::speech::build_speaker;
use flavormap::storage::{FileStore, LocalState};
use flavormap::ui::{FlavorMapApp, ViewState};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "flavormap=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting FlavorMap");

    let config = AppConfig::load().context("Failed to load configuration")?;
    info!("Recipe backend at {}", config.base_url());

    let store = FileStore::open(config.store_path()).context("Failed to open local store")?;
    let local = LocalState::new(Arc::new(store));

    let service: Arc<dyn RecipeService> = Arc::new(HttpRecipeClient::new(&config)?);
    let speaker = build_speaker(&config);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("flavormap-io")
        .build()
        .context("Failed to start async runtime")?;

    let meter = LevelMeter::default();
    let builder = OrchestratorBuilder::new().with_config(config.clone());

    #[cfg(feature = "audio-io")]
    let (orchestrator, handle) = builder.build_with_microphone(
        Arc::clone(&service),
        speaker,
        meter.clone(),
        runtime.handle().clone(),
    );

    #[cfg(not(feature = "audio-io"))]
    let (orchestrator, handle) = builder.build(
        Arc::clone(&service),
        speaker,
        Box::new(|| -> flavormap::Result<Box<dyn flavormap::audio::AudioSource>> {
            Err(flavormap::FlavorError::AudioDevice(
                "built without audio input".into(),
            ))
        }),
        runtime.handle().clone(),
    );

    let worker = orchestrator.start()?;

    let state = ViewState::new(local, service, runtime.handle().clone())
        .with_orchestrator(handle)
        .with_meter(meter);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([420.0, 780.0])
            .with_min_inner_size([360.0, 560.0])
            .with_title("FlavorMap"),
        ..Default::default()
    };

    eframe::run_native(
        "FlavorMap",
        options,
        Box::new(|cc| Ok(Box::new(FlavorMapApp::new(cc, state)))),
    )
    .map_err(|e| anyhow::anyhow!("Window failed: {}", e))?;

    if worker.join().is_err() {
        tracing::warn!("Voice search worker panicked");
    }
    info!("FlavorMap stopped");
    Ok(())
}
