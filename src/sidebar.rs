//! Story sidebar: heading, guide chat, notes, diagram hint, and legend.

use crate::scene::{LegendSwatch, SceneDescriptor, SidebarContent, Speaker};
use eframe::egui;

const GUIDE_BUBBLE: egui::Color32 = egui::Color32::from_rgb(21, 36, 66);
const USER_BUBBLE: egui::Color32 = egui::Color32::from_rgb(40, 44, 52);

pub fn show(ui: &mut egui::Ui, scene: &SceneDescriptor) {
    let content: &SidebarContent = &scene.sidebar;

    ui.add_space(4.0);
    ui.label(egui::RichText::new(content.heading).strong().size(16.0));
    ui.add_space(8.0);

    for msg in content.chat {
        let (fill, prefix) = match msg.from {
            Speaker::User => (USER_BUBBLE, "You"),
            Speaker::Guide => (GUIDE_BUBBLE, "Guide"),
        };
        egui::Frame::new()
            .fill(fill)
            .corner_radius(6.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.label(egui::RichText::new(prefix).weak().size(10.0));
                ui.label(egui::RichText::new(msg.text).size(12.0));
            });
        ui.add_space(6.0);
    }

    if !content.notes.is_empty() {
        ui.add_space(4.0);
        ui.separator();
        for note in content.notes {
            ui.horizontal_wrapped(|ui| {
                ui.label(egui::RichText::new("•").weak());
                ui.label(egui::RichText::new(*note).size(11.0));
            });
        }
    }

    if !content.diagram_hint.is_empty() {
        ui.add_space(6.0);
        ui.label(
            egui::RichText::new(content.diagram_hint)
                .weak()
                .italics()
                .size(10.0),
        );
    }

    if !content.legend.is_empty() {
        ui.add_space(6.0);
        ui.separator();
        for section in content.legend {
            ui.label(egui::RichText::new(section.title).strong().size(11.0));
            for item in section.items {
                ui.horizontal(|ui| {
                    let (rect, _) =
                        ui.allocate_exact_size(egui::vec2(12.0, 12.0), egui::Sense::hover());
                    match item.swatch {
                        LegendSwatch::Color(color) => {
                            ui.painter().circle_filled(rect.center(), 5.0, color);
                        }
                        LegendSwatch::Area(color) => {
                            ui.painter().rect_filled(rect, 2.0, color.gamma_multiply(0.3));
                        }
                    }
                    ui.label(egui::RichText::new(item.label).size(11.0));
                });
            }
            ui.add_space(4.0);
        }
    }
}
