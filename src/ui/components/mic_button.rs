//! Press-and-hold record button

use crate::ui::state::ViewState;
use crate::ui::theme::Theme;
use egui::{self, RichText, Vec2, WidgetInfo, WidgetType};

pub const MIC_BUTTON_LABEL: &str = "Record";

pub struct MicButton<'a> {
    state: &'a mut ViewState,
    theme: &'a Theme,
}

impl<'a> MicButton<'a> {
    pub fn new(state: &'a mut ViewState, theme: &'a Theme) -> Self {
        Self { state, theme }
    }

    pub fn show(self, ui: &mut egui::Ui) -> egui::Response {
        let is_recording = self.state.search.is_recording;
        let enabled = self.state.search.mic_held || self.state.can_record();

        let (icon, color) = if is_recording {
            ("⏹", self.theme.accent)
        } else {
            ("🎤", self.theme.bg_card)
        };

        let fill = if enabled {
            self.theme.primary
        } else {
            self.theme.skeleton
        };

        let button = egui::Button::new(RichText::new(icon).size(28.0).color(color))
            .min_size(Vec2::splat(72.0))
            .rounding(egui::Rounding::same(36.0))
            .fill(fill);

        let response = ui.add_enabled(enabled, button);
        response.widget_info(|| {
            WidgetInfo::labeled(WidgetType::Button, enabled, MIC_BUTTON_LABEL)
        });

        let held = response.is_pointer_button_down_on();
        if held && !self.state.search.mic_held {
            self.state.press_mic();
        } else if !held && self.state.search.mic_held {
            self.state.release_mic();
        }

        if is_recording {
            let t = ui.ctx().input(|i| i.time);
            let level = self.state.meter.rms().min(1.0);
            let pulse = ((t * 3.0).sin() * 0.5 + 0.5) as f32;
            let radius = response.rect.width() / 2.0 + 4.0 + pulse * 3.0 + level * 20.0;

            ui.painter().circle_stroke(
                response.rect.center(),
                radius,
                egui::Stroke::new(2.0, self.theme.accent.gamma_multiply(1.0 - pulse * 0.5)),
            );
            ui.ctx().request_repaint();
        }

        response
    }
}
