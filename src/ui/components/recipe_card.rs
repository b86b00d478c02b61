//! Recipe and category cards

use crate::recipes::{Category, Recipe};
use crate::ui::theme::Theme;
use egui::load::TexturePoll;
use egui::{self, Align2, FontId, RichText, Sense, Vec2, WidgetInfo, WidgetType};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardSize {
    /// Narrow card in the home "Popular" row
    Small,
    /// Full-width card with description
    Large,
}

impl CardSize {
    pub fn height(self) -> f32 {
        match self {
            CardSize::Small => 190.0,
            CardSize::Large => 240.0,
        }
    }
}

/// Clickable recipe summary
pub struct RecipeCard<'a> {
    recipe: &'a Recipe,
    theme: &'a Theme,
    size: CardSize,
}

impl<'a> RecipeCard<'a> {
    pub fn new(recipe: &'a Recipe, theme: &'a Theme) -> Self {
        Self {
            recipe,
            theme,
            size: CardSize::Large,
        }
    }

    pub fn size(mut self, size: CardSize) -> Self {
        self.size = size;
        self
    }

    pub fn show(self, ui: &mut egui::Ui) -> egui::Response {
        let width = match self.size {
            CardSize::Small => 160.0,
            CardSize::Large => ui.available_width(),
        };

        let inner = egui::Frame::none()
            .fill(self.theme.bg_card)
            .rounding(self.theme.card_rounding)
            .inner_margin(self.theme.spacing_sm)
            .show(ui, |ui| {
                ui.set_width(width - 2.0 * self.theme.spacing_sm);
                ui.vertical(|ui| {
                    let image_height = match self.size {
                        CardSize::Small => 90.0,
                        CardSize::Large => self.theme.card_image_height,
                    };
                    recipe_image(ui, self.theme, self.recipe, image_height);

                    ui.label(
                        RichText::new(&self.recipe.name)
                            .strong()
                            .color(self.theme.text_primary),
                    );
                    ui.label(
                        RichText::new(format!(
                            "{} · {}",
                            self.recipe.readable_duration(),
                            self.recipe.difficulty
                        ))
                        .small()
                        .color(self.theme.text_muted),
                    );

                    if self.size == CardSize::Large && !self.recipe.description.is_empty() {
                        ui.add(
                            egui::Label::new(
                                RichText::new(&self.recipe.description)
                                    .color(self.theme.text_secondary),
                            )
                            .truncate(),
                        );
                    }
                });
            });

        let response = inner.response.interact(Sense::click());
        let name = self.recipe.name.clone();
        response.widget_info(|| WidgetInfo::labeled(WidgetType::Button, true, &name));
        response.on_hover_cursor(egui::CursorIcon::PointingHand)
    }
}

/// Image address of a recipe, if the backend sent one
pub fn image_uri(recipe: &Recipe) -> Option<&str> {
    let uri = recipe.image_url.trim();
    (!uri.is_empty()).then_some(uri)
}

/// Recipe photo, drawn over the placeholder once it has loaded
pub fn recipe_image(ui: &mut egui::Ui, theme: &Theme, recipe: &Recipe, height: f32) {
    let rect = image_placeholder(ui, theme, recipe, height);

    let Some(uri) = image_uri(recipe) else {
        return;
    };

    let image = egui::Image::new(uri)
        .rounding(theme.card_rounding)
        .fit_to_exact_size(rect.size());
    // Pending and failed loads keep the placeholder
    if let Ok(TexturePoll::Ready { .. }) = image.load_for_size(ui.ctx(), rect.size()) {
        image.paint_at(ui, rect);
    }
}

/// Stand-in for the recipe photo: a tinted block with the dish initial
fn image_placeholder(ui: &mut egui::Ui, theme: &Theme, recipe: &Recipe, height: f32) -> egui::Rect {
    let (rect, _) = ui.allocate_exact_size(Vec2::new(ui.available_width(), height), Sense::hover());
    let painter = ui.painter();
    painter.rect_filled(rect, theme.card_rounding, theme.image_tint(&recipe.id));

    let initial = recipe
        .name
        .chars()
        .next()
        .map(|c| c.to_uppercase().to_string())
        .unwrap_or_default();
    painter.text(
        rect.center(),
        Align2::CENTER_CENTER,
        initial,
        FontId::proportional(height * 0.4),
        theme.bg_card,
    );
    rect
}

/// Home screen category tile
pub struct CategoryCard<'a> {
    category: &'a Category,
    theme: &'a Theme,
}

impl<'a> CategoryCard<'a> {
    pub fn new(category: &'a Category, theme: &'a Theme) -> Self {
        Self { category, theme }
    }

    pub fn show(self, ui: &mut egui::Ui) -> egui::Response {
        let inner = egui::Frame::none()
            .fill(self.theme.primary.gamma_multiply(0.12))
            .rounding(self.theme.card_rounding)
            .inner_margin(self.theme.spacing)
            .show(ui, |ui| {
                ui.set_width(180.0);
                ui.label(
                    RichText::new(self.category.title)
                        .strong()
                        .color(self.theme.text_primary),
                );
                ui.label(
                    RichText::new(self.category.info)
                        .small()
                        .color(self.theme.text_secondary),
                );
            });

        let response = inner.response.interact(Sense::click());
        let title = self.category.title;
        response.widget_info(|| WidgetInfo::labeled(WidgetType::Button, true, title));
        response.on_hover_cursor(egui::CursorIcon::PointingHand)
    }
}
