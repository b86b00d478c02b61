use crate::recipes::{FeedKind, Recipe};
use crate::ui::components::{CardSize, RecipeCard, Skeleton};
use crate::ui::state::ViewState;
use crate::ui::theme::Theme;
use egui::{self, RichText};

pub fn show(state: &mut ViewState, kind: &FeedKind, theme: &Theme, ui: &mut egui::Ui) {
    let mut opened: Option<Recipe> = None;

    let back = super::title_bar(ui, theme, &kind.title());

    egui::ScrollArea::vertical()
        .id_salt("recipe_list")
        .auto_shrink([false, false])
        .show(ui, |ui| {
            if state.list_recipes.is_empty() {
                Skeleton::new(theme, CardSize::Large).show(ui);
                return;
            }

            ui.label(
                RichText::new(format!("{} recipes", state.list_recipes.len()))
                    .small()
                    .color(theme.text_muted),
            );
            for recipe in &state.list_recipes {
                if RecipeCard::new(recipe, theme).show(ui).clicked() {
                    opened = Some(recipe.clone());
                }
            }
        });

    if back {
        state.go_back();
    } else if let Some(recipe) = opened {
        state.open_recipe(recipe);
    }
}
