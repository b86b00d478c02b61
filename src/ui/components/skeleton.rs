//! Pulsing placeholders shown while a feed is empty

use super::recipe_card::CardSize;
use crate::ui::theme::Theme;
use egui::{self, Sense, Vec2};

pub struct Skeleton<'a> {
    theme: &'a Theme,
    size: CardSize,
    count: usize,
}

impl<'a> Skeleton<'a> {
    pub fn new(theme: &'a Theme, size: CardSize) -> Self {
        Self {
            theme,
            size,
            count: 3,
        }
    }

    pub fn count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    pub fn show(self, ui: &mut egui::Ui) {
        let t = ui.ctx().input(|i| i.time);
        let pulse = 0.6 + 0.4 * ((t * 2.0).sin() * 0.5 + 0.5) as f32;
        let fill = self.theme.skeleton.gamma_multiply(pulse);

        let draw = |ui: &mut egui::Ui| {
            let width = match self.size {
                CardSize::Small => 160.0,
                CardSize::Large => ui.available_width(),
            };
            let (rect, _) =
                ui.allocate_exact_size(Vec2::new(width, self.size.height()), Sense::hover());
            ui.painter().rect_filled(rect, self.theme.card_rounding, fill);
        };

        match self.size {
            CardSize::Small => {
                ui.horizontal(|ui| {
                    for _ in 0..self.count {
                        draw(ui);
                    }
                });
            }
            CardSize::Large => {
                for _ in 0..self.count {
                    draw(ui);
                }
            }
        }

        ui.ctx().request_repaint();
    }
}
