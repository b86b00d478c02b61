//! eframe integration

use crate::ui::screens;
use crate::ui::state::{Screen, ViewState};
use crate::ui::theme::Theme;
use egui::{self, CentralPanel, TopBottomPanel};

pub struct FlavorMapApp {
    state: ViewState,
    theme: Theme,
}

impl FlavorMapApp {
    pub fn new(cc: &eframe::CreationContext<'_>, state: ViewState) -> Self {
        egui_extras::install_image_loaders(&cc.egui_ctx);
        let theme = Theme::light();
        theme.apply(&cc.egui_ctx);
        Self { state, theme }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    fn show_tabs(&mut self, ctx: &egui::Context) {
        if !matches!(self.state.screen, Screen::Main(_)) {
            return;
        }

        TopBottomPanel::bottom("tabs")
            .frame(
                egui::Frame::none()
                    .fill(self.theme.bg_card)
                    .inner_margin(self.theme.spacing_sm),
            )
            .show(ctx, |ui| {
                screens::tab_bar(&mut self.state, &self.theme, ui);
            });
    }
}

impl eframe::App for FlavorMapApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.state.poll_events();

        self.show_tabs(ctx);
        CentralPanel::default()
            .frame(
                egui::Frame::none()
                    .fill(self.theme.bg_page)
                    .inner_margin(self.theme.spacing),
            )
            .show(ctx, |ui| {
                screens::show(&mut self.state, &self.theme, ui);
            });

        // Feeds and searches report back from other threads
        let busy = self.state.search.is_recording || self.state.search.awaiting;
        let interval = if busy { 16 } else { 250 };
        ctx.request_repaint_after(std::time::Duration::from_millis(interval));
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.state.shutdown();
    }
}
