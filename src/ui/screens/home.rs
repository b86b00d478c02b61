use crate::recipes::{FeedKind, Recipe, CATEGORIES};
use crate::ui::components::{CardSize, CategoryCard, RecipeCard, Skeleton};
use crate::ui::state::ViewState;
use crate::ui::theme::Theme;
use egui::{self, RichText};

enum Action {
    OpenRecipe(Recipe),
    OpenList(FeedKind),
}

pub fn show(state: &mut ViewState, theme: &Theme, ui: &mut egui::Ui) {
    let mut action = None;

    egui::ScrollArea::vertical()
        .id_salt("home")
        .auto_shrink([false, false])
        .show(ui, |ui| {
            let name = state.username.as_deref().unwrap_or_default();
            ui.heading(
                RichText::new(format!("Hi, {}!", name))
                    .strong()
                    .color(theme.text_primary),
            );
            ui.label(RichText::new("What would you like to cook today?").color(theme.text_muted));
            ui.add_space(theme.spacing);

            egui::ScrollArea::horizontal()
                .id_salt("categories")
                .show(ui, |ui| {
                    ui.horizontal(|ui| {
                        for category in CATEGORIES.iter() {
                            if CategoryCard::new(category, theme).show(ui).clicked() {
                                action = Some(Action::OpenList(FeedKind::Category(
                                    category.name.to_string(),
                                )));
                            }
                        }
                    });
                });

            ui.add_space(theme.spacing);
            if section_header(ui, theme, "Popular") {
                action = Some(Action::OpenList(FeedKind::Popular));
            }
            if state.home_popular.is_empty() {
                Skeleton::new(theme, CardSize::Small).show(ui);
            } else {
                ui.horizontal(|ui| {
                    for recipe in &state.home_popular {
                        if RecipeCard::new(recipe, theme)
                            .size(CardSize::Small)
                            .show(ui)
                            .clicked()
                        {
                            action = Some(Action::OpenRecipe(recipe.clone()));
                        }
                    }
                });
            }

            ui.add_space(theme.spacing);
            if section_header(ui, theme, "Recommended") {
                action = Some(Action::OpenList(FeedKind::Recommended));
            }
            if state.home_recommended.is_empty() {
                Skeleton::new(theme, CardSize::Large).count(2).show(ui);
            } else {
                for recipe in &state.home_recommended {
                    if RecipeCard::new(recipe, theme).show(ui).clicked() {
                        action = Some(Action::OpenRecipe(recipe.clone()));
                    }
                }
            }
        });

    match action {
        Some(Action::OpenRecipe(recipe)) => state.open_recipe(recipe),
        Some(Action::OpenList(kind)) => state.open_list(kind),
        None => {}
    }
}

/// Section title with a "View All" link; true when the link was clicked
fn section_header(ui: &mut egui::Ui, theme: &Theme, title: &str) -> bool {
    let mut clicked = false;
    ui.horizontal(|ui| {
        ui.label(RichText::new(title).size(18.0).strong().color(theme.text_primary));
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            let link = ui.link(RichText::new("View All").color(theme.primary));
            let label = format!("View All {}", title);
            link.widget_info(|| egui::WidgetInfo::labeled(egui::WidgetType::Link, true, &label));
            clicked = link.clicked();
        });
    });
    clicked
}
