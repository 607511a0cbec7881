// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Wall setup, painting upload and painting list.
//!
//! The sidebar collects user input for new walls and paintings. Submitted
//! forms are reported as actions; validation happens in the models when
//! the app applies them.

use super::textures::{TextureCache, TextureKey};
use crate::io::media::LoadedImage;
use crate::models::painting::{Painting, PaintingId};
use crate::models::wall::Wall;

/// Image plus real-world dimensions typed by the user.
#[derive(Default)]
pub struct UploadForm {
    pub image: Option<LoadedImage>,
    pub width: String,
    pub height: String,
    /// An image file is being read in the background
    pub loading: bool,
}

impl UploadForm {
    /// Parsed width and height, `None` when either field is not a number.
    pub fn dimensions(&self) -> Option<(f64, f64)> {
        let width = self.width.trim().parse().ok()?;
        let height = self.height.trim().parse().ok()?;
        Some((width, height))
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Result of sidebar interaction.
pub enum SidebarAction {
    None,
    PickWallImage,
    SetWall,
    ChangeWall,
    PickPaintingImage,
    AddPainting,
    RemovePainting(PaintingId),
}

/// Display the sidebar.
pub fn show(
    ui: &mut egui::Ui,
    wall: Option<&Wall>,
    paintings: &[Painting],
    wall_form: &mut UploadForm,
    painting_form: &mut UploadForm,
    textures: &TextureCache,
) -> SidebarAction {
    let mut action = SidebarAction::None;

    match wall {
        None => {
            ui.heading("Wall Setup");
            if upload_form(ui, wall_form, textures, TextureKey::WallPreview, "wall", ("e.g., 120", "e.g., 96")) {
                action = SidebarAction::PickWallImage;
            }
            if ui.button("Set Wall").clicked() {
                action = SidebarAction::SetWall;
            }
        }
        Some(wall) => {
            ui.heading("Wall Set");
            ui.label(wall.dimensions_label());
            if ui.button("Change Wall").clicked() {
                action = SidebarAction::ChangeWall;
            }
        }
    }

    ui.separator();

    let enabled = wall.is_some();
    ui.heading("Add Painting");
    if !enabled {
        ui.label(egui::RichText::new("Set up a wall first to add paintings").italics().weak());
    }
    ui.add_enabled_ui(enabled, |ui| {
        if upload_form(ui, painting_form, textures, TextureKey::PaintingPreview, "painting", ("e.g., 24", "e.g., 36")) {
            action = SidebarAction::PickPaintingImage;
        }
        if ui.button("Add Painting").clicked() {
            action = SidebarAction::AddPainting;
        }
    });

    if !paintings.is_empty() {
        ui.separator();
        ui.heading(format!("Paintings ({})", paintings.len()));
        for painting in paintings {
            ui.horizontal(|ui| {
                ui.label(format!("Painting #{}", painting.id));
                ui.label(egui::RichText::new(painting.dimensions_label()).weak());
                if ui.small_button("Remove").clicked() {
                    action = SidebarAction::RemovePainting(painting.id);
                }
            });
        }
    }

    action
}

/// Image picker with preview and width/height fields.
///
/// Returns `true` when the user asked to pick an image file.
fn upload_form(
    ui: &mut egui::Ui,
    form: &mut UploadForm,
    textures: &TextureCache,
    preview: TextureKey,
    noun: &str,
    hints: (&str, &str),
) -> bool {
    let mut pick = false;

    ui.horizontal(|ui| {
        if ui.button(format!("Choose {} image...", noun)).clicked() {
            pick = true;
        }
        if form.loading {
            ui.spinner();
        } else if let Some(image) = &form.image {
            let name = image
                .path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            ui.label(egui::RichText::new(name).weak());
        }
    });

    if form.image.is_some() {
        if let Some(texture) = textures.get(preview) {
            let size = texture.size_vec2();
            let scale = (ui.available_width() / size.x).min(120.0 / size.y).min(1.0);
            ui.add(egui::Image::new((texture.id(), size * scale)));
        }
    }

    ui.horizontal(|ui| {
        ui.label("Width (inches)");
        ui.add(egui::TextEdit::singleline(&mut form.width).hint_text(hints.0).desired_width(70.0));
    });
    ui.horizontal(|ui| {
        ui.label("Height (inches)");
        ui.add(egui::TextEdit::singleline(&mut form.height).hint_text(hints.1).desired_width(70.0));
    });

    pick
}
