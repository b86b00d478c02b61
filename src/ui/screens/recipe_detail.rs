use crate::recipes::Recipe;
use crate::ui::components::recipe_image;
use crate::ui::state::{DetailTab, ViewState};
use crate::ui::theme::Theme;
use egui::{self, RichText, WidgetInfo, WidgetType};

/// Characters of description shown before "Read more"
const DESCRIPTION_PREVIEW: usize = 160;

pub fn show(state: &mut ViewState, recipe: &Recipe, theme: &Theme, ui: &mut egui::Ui) {
    let back = super::title_bar(ui, theme, &recipe.name);
    if back {
        state.go_back();
        return;
    }

    egui::ScrollArea::vertical()
        .id_salt("recipe_detail")
        .auto_shrink([false, false])
        .show(ui, |ui| {
            recipe_image(ui, theme, recipe, 180.0);

            ui.horizontal(|ui| {
                ui.label(
                    RichText::new(&recipe.name)
                        .size(20.0)
                        .strong()
                        .color(theme.text_primary),
                );
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    like_button(state, recipe, theme, ui);
                });
            });

            description(state, recipe, theme, ui);

            ui.add_space(theme.spacing_sm);
            ui.horizontal_wrapped(|ui| {
                fact(ui, theme, "By", &recipe.author);
                fact(ui, theme, "Difficulty", &recipe.difficulty);
                fact(ui, theme, "Time", &recipe.readable_duration());
                fact(ui, theme, "Serves", &recipe.servings_label());
            });

            ui.add_space(theme.spacing);
            ui.horizontal(|ui| {
                let ingredients_tab = format!("Ingredients ({})", recipe.ingredient_count_label());
                let instructions_tab = format!("Instructions ({})", recipe.instruction_count_label());
                ui.selectable_value(&mut state.detail.tab, DetailTab::Ingredients, ingredients_tab);
                ui.selectable_value(&mut state.detail.tab, DetailTab::Instructions, instructions_tab);
            });
            ui.separator();

            match state.detail.tab {
                DetailTab::Ingredients => ingredients(state, recipe, ui),
                DetailTab::Instructions => instructions(recipe, theme, ui),
            }
        });
}

fn like_button(state: &mut ViewState, recipe: &Recipe, theme: &Theme, ui: &mut egui::Ui) {
    let liked = state.is_liked(&recipe.id);
    let (icon, color, label) = if liked {
        ("♥", theme.accent, "Unlike recipe")
    } else {
        ("♡", theme.text_muted, "Like recipe")
    };

    let response =
        ui.add(egui::Button::new(RichText::new(icon).size(22.0).color(color)).frame(false));
    response.widget_info(|| WidgetInfo::labeled(WidgetType::Button, true, label));
    if response.clicked() {
        state.toggle_like(&recipe.id);
    }
}

fn description(state: &mut ViewState, recipe: &Recipe, theme: &Theme, ui: &mut egui::Ui) {
    if recipe.description.is_empty() {
        return;
    }

    let long = recipe.description.chars().count() > DESCRIPTION_PREVIEW;
    let text = if long && !state.detail.description_expanded {
        let preview: String = recipe.description.chars().take(DESCRIPTION_PREVIEW).collect();
        format!("{}…", preview.trim_end())
    } else {
        recipe.description.clone()
    };
    ui.label(RichText::new(text).color(theme.text_secondary));

    if long {
        let toggle = if state.detail.description_expanded {
            "Show less"
        } else {
            "Read more"
        };
        if ui.link(RichText::new(toggle).color(theme.primary)).clicked() {
            state.detail.description_expanded = !state.detail.description_expanded;
        }
    }
}

fn fact(ui: &mut egui::Ui, theme: &Theme, name: &str, value: &str) {
    if value.trim().is_empty() {
        return;
    }
    egui::Frame::none()
        .fill(theme.bg_card)
        .rounding(theme.button_rounding)
        .inner_margin(theme.spacing_sm)
        .show(ui, |ui| {
            ui.label(RichText::new(name).small().color(theme.text_muted));
            ui.label(RichText::new(value).color(theme.text_primary));
        });
}

fn ingredients(state: &mut ViewState, recipe: &Recipe, ui: &mut egui::Ui) {
    let checked = state.checked_ingredients(&recipe.id);
    let mut toggled = None;

    for (index, ingredient) in recipe.ingredients.iter().enumerate() {
        let mut is_checked = checked.contains(&index);
        if ui.checkbox(&mut is_checked, ingredient.as_str()).changed() {
            toggled = Some(index);
        }
    }

    if let Some(index) = toggled {
        state.toggle_ingredient(&recipe.id, index);
    }
}

fn instructions(recipe: &Recipe, theme: &Theme, ui: &mut egui::Ui) {
    for (index, step) in recipe.instructions.iter().enumerate() {
        ui.horizontal_wrapped(|ui| {
            ui.label(
                RichText::new(format!("{}.", index + 1))
                    .strong()
                    .color(theme.primary),
            );
            ui.label(RichText::new(step).color(theme.text_secondary));
        });
    }
}
