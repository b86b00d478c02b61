//! egui/eframe view layer for FlavorMap

pub mod animation;
mod app;
pub mod components;
pub mod screens;
mod state;
mod theme;

pub use app::FlavorMapApp;
pub use state::{
    capitalize, DetailTab, DetailView, FeedTarget, Screen, SearchView, Tab, ViewState,
    AWAITING_STATUS, LOGIN_REQUIRED, RECORD_HINT,
};
pub use theme::Theme;
