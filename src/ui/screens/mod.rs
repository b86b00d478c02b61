//! One module per screen; each draws from and mutates [`ViewState`]

pub mod account;
pub mod home;
pub mod login;
pub mod recipe_detail;
pub mod recipe_list;
pub mod search;

use crate::ui::state::{Screen, Tab, ViewState};
use crate::ui::theme::Theme;
use egui::{self, RichText};

/// Draw whichever screen is current
pub fn show(state: &mut ViewState, theme: &Theme, ui: &mut egui::Ui) {
    match state.screen.clone() {
        Screen::Login => login::show(state, theme, ui),
        Screen::Main(Tab::Home) => home::show(state, theme, ui),
        Screen::Main(Tab::Search) => search::show(state, theme, ui),
        Screen::Main(Tab::Account) => account::show(state, theme, ui),
        Screen::RecipeList(kind) => recipe_list::show(state, &kind, theme, ui),
        Screen::RecipeDetail(recipe) => recipe_detail::show(state, &recipe, theme, ui),
    }
}

/// Back button and title; true when back was clicked
pub(crate) fn title_bar(ui: &mut egui::Ui, theme: &Theme, title: &str) -> bool {
    let mut back = false;
    ui.horizontal(|ui| {
        back = ui.button("← Back").clicked();
        ui.label(RichText::new(title).size(18.0).strong().color(theme.text_primary));
    });
    ui.add_space(theme.spacing_sm);
    back
}

/// Tab bar along the bottom of the main screens
pub fn tab_bar(state: &mut ViewState, theme: &Theme, ui: &mut egui::Ui) {
    let current = state.current_tab();
    let mut selected = None;

    ui.columns(3, |columns| {
        for (column, (tab, title)) in columns.iter_mut().zip([
            (Tab::Home, "Home"),
            (Tab::Search, "Search"),
            (Tab::Account, "Account"),
        ]) {
            column.vertical_centered(|ui| {
                let color = if current == Some(tab) {
                    theme.primary
                } else {
                    theme.text_muted
                };
                let button = egui::Button::new(RichText::new(title).color(color)).frame(false);
                if ui.add(button).clicked() {
                    selected = Some(tab);
                }
            });
        }
    });

    if let Some(tab) = selected {
        state.select_tab(tab);
    }
}
