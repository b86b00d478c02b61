//! Colors, spacing and text styles for the FlavorMap window

use egui::{Color32, FontFamily, FontId, Rounding, Stroke, Vec2, Visuals};

#[derive(Clone, Debug)]
pub struct Theme {
    /// Buttons, active tab, links
    pub primary: Color32,
    /// Liked heart, recording ring
    pub accent: Color32,
    pub success: Color32,

    pub bg_page: Color32,
    pub bg_card: Color32,
    /// Placeholder blocks while a feed is empty
    pub skeleton: Color32,

    pub text_primary: Color32,
    pub text_secondary: Color32,
    pub text_muted: Color32,

    /// User transcript bubble
    pub bubble_user: Color32,
    /// Assistant reply bubble
    pub bubble_reply: Color32,

    pub button_rounding: Rounding,
    pub card_rounding: Rounding,

    pub spacing: f32,
    pub spacing_lg: f32,
    pub spacing_sm: f32,

    /// Image area of a large recipe card
    pub card_image_height: f32,
}

impl Default for Theme {
    fn default() -> Self {
        Self::light()
    }
}

impl Theme {
    pub fn light() -> Self {
        Self {
            primary: Color32::from_rgb(234, 88, 12),   // Orange
            accent: Color32::from_rgb(225, 29, 72),    // Rose
            success: Color32::from_rgb(22, 163, 74),   // Green

            bg_page: Color32::from_rgb(255, 251, 245),
            bg_card: Color32::from_rgb(255, 255, 255),
            skeleton: Color32::from_rgb(231, 229, 228),

            text_primary: Color32::from_rgb(28, 25, 23),
            text_secondary: Color32::from_rgb(68, 64, 60),
            text_muted: Color32::from_rgb(120, 113, 108),

            bubble_user: Color32::from_rgb(254, 215, 170),
            bubble_reply: Color32::from_rgb(245, 245, 244),

            button_rounding: Rounding::same(10.0),
            card_rounding: Rounding::same(14.0),

            spacing: 16.0,
            spacing_lg: 24.0,
            spacing_sm: 8.0,

            card_image_height: 120.0,
        }
    }

    /// Placeholder tint for a recipe image, stable per recipe id
    pub fn image_tint(&self, recipe_id: &str) -> Color32 {
        const TINTS: [Color32; 5] = [
            Color32::from_rgb(253, 186, 116),
            Color32::from_rgb(190, 242, 100),
            Color32::from_rgb(252, 165, 165),
            Color32::from_rgb(253, 224, 71),
            Color32::from_rgb(165, 180, 252),
        ];
        let hash = recipe_id
            .bytes()
            .fold(0usize, |acc, b| acc.wrapping_mul(31).wrapping_add(b as usize));
        TINTS[hash % TINTS.len()]
    }

    pub fn apply(&self, ctx: &egui::Context) {
        let mut visuals = Visuals::light();

        visuals.panel_fill = self.bg_page;
        visuals.window_fill = self.bg_card;
        visuals.extreme_bg_color = self.bg_card;

        visuals.widgets.noninteractive.bg_fill = self.bg_card;
        visuals.widgets.noninteractive.fg_stroke = Stroke::new(1.0, self.text_secondary);

        visuals.widgets.inactive.bg_fill = self.bg_card;
        visuals.widgets.inactive.weak_bg_fill = self.bg_card;
        visuals.widgets.inactive.fg_stroke = Stroke::new(1.0, self.text_primary);

        visuals.widgets.hovered.weak_bg_fill = self.primary.gamma_multiply(0.15);
        visuals.widgets.active.weak_bg_fill = self.primary.gamma_multiply(0.3);

        visuals.selection.bg_fill = self.primary.gamma_multiply(0.3);
        visuals.selection.stroke = Stroke::new(1.0, self.primary);
        visuals.hyperlink_color = self.primary;
        visuals.window_rounding = self.card_rounding;

        ctx.set_visuals(visuals);

        let mut style = (*ctx.style()).clone();
        style.spacing.item_spacing = Vec2::splat(self.spacing_sm);
        style.spacing.button_padding = Vec2::new(self.spacing, self.spacing_sm);

        style.text_styles.insert(
            egui::TextStyle::Heading,
            FontId::new(24.0, FontFamily::Proportional),
        );
        style.text_styles.insert(
            egui::TextStyle::Body,
            FontId::new(15.0, FontFamily::Proportional),
        );
        style.text_styles.insert(
            egui::TextStyle::Button,
            FontId::new(15.0, FontFamily::Proportional),
        );
        style.text_styles.insert(
            egui::TextStyle::Small,
            FontId::new(12.0, FontFamily::Proportional),
        );

        ctx.set_style(style);
    }
}
