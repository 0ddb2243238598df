//! Previous/next scene navigation controls.

use eframe::egui;

/// Render the navigation pair; edge buttons disable rather than wrap.
pub fn show(
    ui: &mut egui::Ui,
    current_index: usize,
    scene_count: usize,
    mut on_prev: impl FnMut(),
    mut on_next: impl FnMut(),
) {
    ui.horizontal(|ui| {
        let at_first = current_index == 0;
        let at_last = current_index + 1 >= scene_count;

        if ui
            .add_enabled(!at_first, egui::Button::new("◀ Previous"))
            .clicked()
        {
            on_prev();
        }
        ui.label(
            egui::RichText::new(format!("{} / {}", current_index + 1, scene_count))
                .weak()
                .size(11.0),
        );
        if ui
            .add_enabled(!at_last, egui::Button::new("Next ▶"))
            .clicked()
        {
            on_next();
        }
    });
}
