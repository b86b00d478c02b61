use crate::recipes::Recipe;
use crate::ui::animation::{entry_frame, entry_settled, ENTRY_OFFSET};
use crate::ui::components::{CardSize, ChatBubble, MicButton, RecipeCard, Skeleton};
use crate::ui::state::{ViewState, RECORD_HINT};
use crate::ui::theme::Theme;
use egui::{self, RichText};

pub fn show(state: &mut ViewState, theme: &Theme, ui: &mut egui::Ui) {
    let mut opened: Option<Recipe> = None;

    egui::TopBottomPanel::bottom("mic")
        .frame(egui::Frame::none().fill(theme.bg_page).inner_margin(theme.spacing))
        .show_inside(ui, |ui| {
            ui.vertical_centered(|ui| {
                MicButton::new(state, theme).show(ui);
                let hint = if state.search.is_recording {
                    "Release to search"
                } else {
                    RECORD_HINT
                };
                ui.label(RichText::new(hint).small().color(theme.text_muted));
            });
        });

    let mut scroll = egui::ScrollArea::vertical()
        .id_salt("search")
        .auto_shrink([false, false]);
    if state.search.has_fresh_results() {
        scroll = scroll.vertical_scroll_offset(0.0);
    }

    scroll.show(ui, |ui| {
        if !state.search.has_recorded && state.search.reply.is_none() {
            ui.add_space(theme.spacing_lg);
            ui.vertical_centered(|ui| {
                ui.label(
                    RichText::new("Ask for a recipe, for example \"a quick vegetarian pasta\"")
                        .color(theme.text_muted),
                );
            });
        }

        if let Some(transcript) = state.search.display_transcript() {
            ChatBubble::user(&transcript, theme).show(ui);
        } else if state.search.awaiting {
            ChatBubble::user(&state.search.status, theme).show(ui);
        }

        if let Some(reply) = &state.search.reply {
            ChatBubble::reply(reply, theme).show(ui);
        }

        if state.search.awaiting {
            Skeleton::new(theme, CardSize::Large).count(2).show(ui);
            return;
        }

        if state.search.results.is_empty() {
            return;
        }

        let now = ui.input(|i| i.time);
        let since = *state.search.results_since.get_or_insert(now);
        let elapsed = now - since;

        for (index, recipe) in state.search.results.iter().enumerate() {
            let frame = entry_frame(index, elapsed);
            ui.scope(|ui| {
                ui.set_opacity(frame.opacity);
                ui.add_space(frame.offset - ENTRY_OFFSET);
                if RecipeCard::new(recipe, theme).show(ui).clicked() {
                    opened = Some(recipe.clone());
                }
            });
        }

        if !entry_settled(state.search.results.len(), elapsed) {
            ui.ctx().request_repaint();
        }
    });

    if let Some(recipe) = opened {
        state.open_recipe(recipe);
    }
}
