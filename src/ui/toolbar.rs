// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Wall toolbar with zoom controls.
//!
//! Shows the wall's real size and lets the user zoom between the
//! configured limits or jump back to the fit-to-screen scale.

use crate::util::scale::Zoom;

/// Display the toolbar. Changes are applied to `zoom` directly.
pub fn show(ui: &mut egui::Ui, zoom: &mut Zoom, wall_label: Option<&str>) {
    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 8.0;

        match wall_label {
            Some(label) => ui.label(format!("Wall: {}", label)),
            None => ui.label(egui::RichText::new("No wall").italics().weak()),
        };

        ui.separator();

        let enabled = wall_label.is_some();
        if ui
            .add_enabled(enabled, egui::Button::new("−"))
            .on_hover_text("Zoom out")
            .clicked()
        {
            zoom.zoom_out();
        }

        let (min, max) = zoom.range();
        let mut scale = zoom.scale();
        let slider = egui::Slider::new(&mut scale, min..=max).show_value(false);
        if ui.add_enabled(enabled, slider).changed() {
            zoom.set_scale(scale);
        }

        if ui
            .add_enabled(enabled, egui::Button::new("+"))
            .on_hover_text("Zoom in")
            .clicked()
        {
            zoom.zoom_in();
        }

        ui.label(zoom.percent_label());

        if ui
            .add_enabled(enabled, egui::Button::new("Fit"))
            .on_hover_text("Fit to screen")
            .clicked()
        {
            zoom.reset_to_fit();
        }
    });
}
