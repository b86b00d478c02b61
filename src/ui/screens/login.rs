use crate::ui::state::ViewState;
use crate::ui::theme::Theme;
use egui::{self, Key, RichText, WidgetInfo, WidgetType};

pub const USERNAME_INPUT_LABEL: &str = "Username";

pub fn show(state: &mut ViewState, theme: &Theme, ui: &mut egui::Ui) {
    ui.vertical_centered(|ui| {
        ui.add_space(theme.spacing_lg * 3.0);
        ui.heading(RichText::new("FlavorMap").color(theme.primary).strong());
        ui.label(RichText::new("Find recipes by asking for them").color(theme.text_muted));
        ui.add_space(theme.spacing_lg);

        let input = ui.add(
            egui::TextEdit::singleline(&mut state.login_input)
                .hint_text("Enter your username")
                .desired_width(260.0),
        );
        input.widget_info(|| {
            WidgetInfo::labeled(WidgetType::TextEdit, true, USERNAME_INPUT_LABEL)
        });

        let submitted = input.lost_focus() && ui.input(|i| i.key_pressed(Key::Enter));

        if let Some(error) = &state.login_error {
            ui.label(RichText::new(error).color(theme.accent));
        }

        ui.add_space(theme.spacing_sm);
        let login = ui.add(
            egui::Button::new(RichText::new("Login").color(theme.bg_card))
                .fill(theme.primary)
                .rounding(theme.button_rounding)
                .min_size(egui::vec2(260.0, 36.0)),
        );

        if login.clicked() || submitted {
            state.submit_login();
        }
    });
}
