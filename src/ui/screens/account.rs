use crate::recipes::Recipe;
use crate::ui::components::RecipeCard;
use crate::ui::state::ViewState;
use crate::ui::theme::Theme;
use egui::{self, RichText};

pub fn show(state: &mut ViewState, theme: &Theme, ui: &mut egui::Ui) {
    let mut opened: Option<Recipe> = None;
    let mut sign_out = false;

    egui::ScrollArea::vertical()
        .id_salt("account")
        .auto_shrink([false, false])
        .show(ui, |ui| {
            ui.horizontal(|ui| {
                ui.heading(
                    RichText::new(state.username.as_deref().unwrap_or_default())
                        .strong()
                        .color(theme.text_primary),
                );
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    sign_out = ui.button("Sign out").clicked();
                });
            });

            ui.add_space(theme.spacing);
            ui.label(RichText::new("Liked recipes").size(18.0).strong());

            if state.liked_recipes.is_empty() {
                ui.label(
                    RichText::new("Recipes you like will show up here").color(theme.text_muted),
                );
            }

            for recipe in &state.liked_recipes {
                if RecipeCard::new(recipe, theme).show(ui).clicked() {
                    opened = Some(recipe.clone());
                }
            }
        });

    if sign_out {
        state.sign_out();
    } else if let Some(recipe) = opened {
        state.open_recipe(recipe);
    }
}
