// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Wall canvas with draggable paintings.
//!
//! This module draws the wall at the current zoom with every painting on
//! top of it, and turns pointer input into canvas actions. It never moves
//! paintings itself: presses, moves and releases are handed to the app,
//! which runs them through the drag controller.

use super::textures::{TextureCache, TextureKey};
use crate::models::composition::{Layout, PaintingLayout};
use crate::models::painting::{FrameStyle, PaintingId};
use crate::util::drag::PointerButton;
use crate::util::geometry::{Point, Size};

const BUTTON_SIZE: f32 = 20.0;

/// Result of canvas interaction.
pub enum CanvasAction {
    None,
    /// A painting was grabbed; positions are in screen coordinates
    Press {
        painting: PaintingId,
        button: PointerButton,
        pointer: Point,
        painting_top_left: Point,
    },
    /// The pointer moved while a painting is being dragged
    Drag {
        pointer: Point,
        wall_origin: Point,
        container: Size,
        painting_size: Size,
    },
    /// The pointer was released or left the window
    Release,
    Remove(PaintingId),
    ToggleFramePicker(PaintingId),
    SelectFrame(PaintingId, FrameStyle),
}

/// Border drawn around a framed painting.
struct FrameLook {
    width: f32,
    color: egui::Color32,
    /// Thin inner edge, for moulded frames
    bevel: Option<egui::Color32>,
}

fn frame_look(style: FrameStyle) -> Option<FrameLook> {
    use egui::Color32;

    let (width, color, bevel) = match style {
        FrameStyle::None => return None,
        FrameStyle::ModernBlack => (4.0, Color32::from_rgb(20, 20, 20), None),
        FrameStyle::ModernWhite => (4.0, Color32::from_rgb(245, 245, 245), None),
        FrameStyle::ClassicGold => (
            9.0,
            Color32::from_rgb(201, 162, 39),
            Some(Color32::from_rgb(140, 105, 20)),
        ),
        FrameStyle::ClassicSilver => (
            9.0,
            Color32::from_rgb(192, 192, 192),
            Some(Color32::from_rgb(120, 120, 120)),
        ),
        FrameStyle::RusticWood => (10.0, Color32::from_rgb(139, 90, 43), None),
        FrameStyle::DarkWood => (10.0, Color32::from_rgb(62, 39, 35), None),
        // White mat floating on a thin black edge
        FrameStyle::GalleryFloat => (
            12.0,
            Color32::from_rgb(250, 250, 248),
            Some(Color32::from_rgb(30, 30, 30)),
        ),
    };
    Some(FrameLook { width, color, bevel })
}

fn to_point(pos: egui::Pos2) -> Point {
    Point::new(pos.x as f64, pos.y as f64)
}

/// Display the wall canvas and handle mouse interactions.
pub fn show(
    ui: &mut egui::Ui,
    layout: Option<&Layout<'_>>,
    textures: &TextureCache,
    dragging: Option<PaintingId>,
    frame_picker: Option<PaintingId>,
) -> CanvasAction {
    let Some(layout) = layout else {
        ui.centered_and_justified(|ui| {
            ui.label(
                egui::RichText::new("Upload a wall image to get started")
                    .size(16.0)
                    .color(egui::Color32::from_gray(160)),
            );
        });
        return CanvasAction::None;
    };

    let mut action = CanvasAction::None;

    egui::ScrollArea::both()
        .auto_shrink([false, false])
        .show(ui, |ui| {
            let wall_size = egui::vec2(layout.wall.size.width as f32, layout.wall.size.height as f32);
            let (wall_rect, _) = ui.allocate_exact_size(wall_size, egui::Sense::hover());
            let painter = ui.painter_at(wall_rect.expand(16.0));

            match textures.get(TextureKey::Wall) {
                Some(texture) => {
                    painter.image(
                        texture.id(),
                        wall_rect,
                        egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                        egui::Color32::WHITE,
                    );
                }
                None => {
                    painter.rect_filled(wall_rect, 0.0, egui::Color32::from_gray(60));
                }
            }

            // Later paintings are drawn (and hit-tested) on top
            for painting in &layout.paintings {
                let painting_action = show_painting(ui, &painter, wall_rect, painting, textures, frame_picker);
                if !matches!(painting_action, CanvasAction::None) {
                    action = painting_action;
                }
            }

            if let Some(active) = dragging {
                let (released, pointer) = ui.input(|i| {
                    (
                        i.pointer.any_released() || !i.pointer.has_pointer(),
                        i.pointer.latest_pos(),
                    )
                });
                if released {
                    action = CanvasAction::Release;
                } else if let (Some(pointer), Some(painting)) =
                    (pointer, layout.paintings.iter().find(|p| p.id == active))
                {
                    action = CanvasAction::Drag {
                        pointer: to_point(pointer),
                        wall_origin: to_point(wall_rect.min),
                        container: layout.wall.size,
                        painting_size: painting.size,
                    };
                }
            }
        });

    action
}

/// Draw one painting with its frame and overlay buttons.
fn show_painting(
    ui: &mut egui::Ui,
    painter: &egui::Painter,
    wall_rect: egui::Rect,
    painting: &PaintingLayout<'_>,
    textures: &TextureCache,
    frame_picker: Option<PaintingId>,
) -> CanvasAction {
    let mut action = CanvasAction::None;

    let rect = egui::Rect::from_min_size(
        wall_rect.min + egui::vec2(painting.position.x as f32, painting.position.y as f32),
        egui::vec2(painting.size.width as f32, painting.size.height as f32),
    );

    if let Some(look) = frame_look(painting.frame_style) {
        let outer = rect.expand(look.width);
        painter.rect_filled(outer.translate(egui::vec2(2.0, 3.0)), 1.0, egui::Color32::from_black_alpha(90));
        painter.rect_filled(outer, 1.0, look.color);
        if let Some(bevel) = look.bevel {
            painter.rect_stroke(rect.expand(1.0), 0.0, egui::Stroke::new(1.5, bevel));
        }
    }

    match textures.get(TextureKey::Painting(painting.id)) {
        Some(texture) => {
            painter.image(
                texture.id(),
                rect,
                egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                egui::Color32::WHITE,
            );
        }
        None => {
            painter.rect_filled(rect, 0.0, egui::Color32::from_gray(90));
        }
    }

    let response = ui
        .interact(rect, egui::Id::new(("painting", painting.id)), egui::Sense::click_and_drag())
        .on_hover_cursor(egui::CursorIcon::Grab);

    if response.drag_started() {
        let button = if response.drag_started_by(egui::PointerButton::Primary) {
            PointerButton::Primary
        } else if response.drag_started_by(egui::PointerButton::Secondary) {
            PointerButton::Secondary
        } else {
            PointerButton::Middle
        };
        // Where the button went down, not where the drag threshold was crossed
        let pointer = ui
            .input(|i| i.pointer.press_origin())
            .or_else(|| response.interact_pointer_pos());
        if let Some(pointer) = pointer {
            action = CanvasAction::Press {
                painting: painting.id,
                button,
                pointer: to_point(pointer),
                painting_top_left: to_point(rect.min),
            };
        }
    }

    // Overlay buttons sit in the top-right corner, above the drag area
    let remove_rect = egui::Rect::from_min_size(
        egui::pos2(rect.max.x - BUTTON_SIZE - 2.0, rect.min.y + 2.0),
        egui::vec2(BUTTON_SIZE, BUTTON_SIZE),
    );
    let frame_rect = remove_rect.translate(egui::vec2(-(BUTTON_SIZE + 2.0), 0.0));

    if ui
        .put(remove_rect, egui::Button::new("×").small())
        .on_hover_text("Remove painting")
        .clicked()
    {
        action = CanvasAction::Remove(painting.id);
    }
    if ui
        .put(frame_rect, egui::Button::new("⬜").small())
        .on_hover_text("Change frame")
        .clicked()
    {
        action = CanvasAction::ToggleFramePicker(painting.id);
    }

    if frame_picker == Some(painting.id) {
        egui::Area::new(egui::Id::new(("frame_picker", painting.id)))
            .order(egui::Order::Foreground)
            .fixed_pos(frame_rect.left_bottom() + egui::vec2(0.0, 4.0))
            .show(ui.ctx(), |ui| {
                egui::Frame::popup(ui.style()).show(ui, |ui| {
                    for style in FrameStyle::ALL {
                        let selected = painting.frame_style == style;
                        if ui.selectable_label(selected, style.display_name()).clicked() {
                            action = CanvasAction::SelectFrame(painting.id, style);
                        }
                    }
                });
            });
    }

    painter.text(
        rect.center_bottom() - egui::vec2(0.0, 4.0),
        egui::Align2::CENTER_BOTTOM,
        &painting.label,
        egui::FontId::proportional(12.0),
        egui::Color32::WHITE,
    );

    action
}
