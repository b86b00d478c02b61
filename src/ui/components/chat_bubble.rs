use crate::ui::theme::Theme;
use egui::{self, Layout, RichText, WidgetInfo, WidgetType};

/// One line of the voice-search exchange
pub struct ChatBubble<'a> {
    text: &'a str,
    from_user: bool,
    theme: &'a Theme,
}

impl<'a> ChatBubble<'a> {
    pub fn user(text: &'a str, theme: &'a Theme) -> Self {
        Self {
            text,
            from_user: true,
            theme,
        }
    }

    pub fn reply(text: &'a str, theme: &'a Theme) -> Self {
        Self {
            text,
            from_user: false,
            theme,
        }
    }

    pub fn show(self, ui: &mut egui::Ui) {
        let (layout, fill, prefix) = if self.from_user {
            (
                Layout::right_to_left(egui::Align::Min),
                self.theme.bubble_user,
                "You said",
            )
        } else {
            (
                Layout::left_to_right(egui::Align::Min),
                self.theme.bubble_reply,
                "Assistant",
            )
        };

        ui.with_layout(layout, |ui| {
            let response = egui::Frame::none()
                .fill(fill)
                .rounding(self.theme.card_rounding)
                .inner_margin(self.theme.spacing_sm + 4.0)
                .show(ui, |ui| {
                    ui.set_max_width(ui.available_width() * 0.8);
                    ui.label(RichText::new(self.text).color(self.theme.text_primary));
                })
                .response;

            let label = format!("{}: {}", prefix, self.text);
            response.widget_info(|| WidgetInfo::labeled(WidgetType::Label, true, &label));
        });
    }
}
