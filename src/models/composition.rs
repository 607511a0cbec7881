// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! The live wall and its paintings.
//!
//! `Composition` owns the authoritative in-memory state: the current wall,
//! the paintings in z-order (later entries are drawn on top) and the id
//! counter. The wall and its paintings change together; setting a new wall
//! always clears the paintings.

use super::painting::{FrameStyle, Painting, PaintingId, PaintingSpec};
use super::wall::Wall;
use super::ValidationError;
use crate::config::PlacementDefaults;
use crate::io::media::ImageRef;
use crate::util::geometry::{Point, Size};
use crate::util::scale::{scaled_dimensions, Zoom};

/// A wall together with the paintings placed on it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    pub wall: Option<Wall>,
    pub paintings: Vec<Painting>,
}

/// Wall background handed to the canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct WallLayout<'a> {
    pub image: &'a ImageRef,
    /// Displayed size of the wall at the current zoom
    pub size: Size,
    pub pixels_per_inch: f64,
}

/// One painting as the canvas should draw it.
#[derive(Debug, Clone, PartialEq)]
pub struct PaintingLayout<'a> {
    pub id: PaintingId,
    pub image: &'a ImageRef,
    /// Top-left corner relative to the wall
    pub position: Point,
    pub size: Size,
    pub frame_style: FrameStyle,
    pub label: String,
}

/// Everything the canvas needs for one frame, paintings in z-order.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout<'a> {
    pub wall: WallLayout<'a>,
    pub paintings: Vec<PaintingLayout<'a>>,
}

/// Owner of the live wall, paintings and painting id counter.
#[derive(Debug, Clone)]
pub struct Composition {
    wall: Option<Wall>,
    paintings: Vec<Painting>,
    /// Next painting id; only ever grows
    next_id: PaintingId,
    placement: PlacementDefaults,
}

impl Composition {
    pub fn new(placement: PlacementDefaults) -> Self {
        Self {
            wall: None,
            paintings: Vec::new(),
            next_id: 1,
            placement,
        }
    }

    pub fn wall(&self) -> Option<&Wall> {
        self.wall.as_ref()
    }

    pub fn paintings(&self) -> &[Painting] {
        &self.paintings
    }

    pub fn painting(&self, id: PaintingId) -> Option<&Painting> {
        self.paintings.iter().find(|p| p.id == id)
    }

    #[cfg(test)]
    pub fn next_id(&self) -> PaintingId {
        self.next_id
    }

    /// Replace the wall. All paintings are removed with the old wall.
    pub fn set_wall(&mut self, wall: Wall) {
        log::info!(
            "Wall set: {} ({}x{} px), cleared {} painting(s)",
            wall.dimensions_label(),
            wall.image_width,
            wall.image_height,
            self.paintings.len()
        );
        self.wall = Some(wall);
        self.paintings.clear();
    }

    /// Validate `spec` and append it as the top-most painting.
    pub fn add_painting(&mut self, spec: PaintingSpec) -> Result<PaintingId, ValidationError> {
        if self.wall.is_none() {
            return Err(ValidationError::NoWall);
        }

        let id = self.next_id;
        let next_id = id.checked_add(1).ok_or(ValidationError::IdsExhausted)?;
        let painting = Painting::from_spec(
            id,
            spec,
            self.placement.initial_position,
            self.placement.frame_style,
        )?;
        log::info!("Added painting {} ({})", id, painting.dimensions_label());
        self.paintings.push(painting);
        self.next_id = next_id;
        Ok(id)
    }

    /// Move a painting. Returns `false` when no painting has that id.
    pub fn update_position(&mut self, id: PaintingId, position: Point) -> bool {
        match self.paintings.iter_mut().find(|p| p.id == id) {
            Some(painting) => {
                painting.position = position;
                true
            }
            None => false,
        }
    }

    /// Change a painting's frame. Returns `false` when no painting has that id.
    pub fn update_frame_style(&mut self, id: PaintingId, frame_style: FrameStyle) -> bool {
        match self.paintings.iter_mut().find(|p| p.id == id) {
            Some(painting) => {
                painting.frame_style = frame_style;
                true
            }
            None => false,
        }
    }

    /// Remove a painting. Remaining ids are left as they are.
    pub fn remove_painting(&mut self, id: PaintingId) -> Option<Painting> {
        let index = self.paintings.iter().position(|p| p.id == id)?;
        let removed = self.paintings.remove(index);
        log::info!("Removed painting {}, total: {}", id, self.paintings.len());
        Some(removed)
    }

    /// Clear the wall and all paintings.
    pub fn reset(&mut self) {
        self.wall = None;
        self.paintings.clear();
    }

    /// Replace the whole scene, e.g. after loading a project.
    ///
    /// The id counter moves past every loaded id so new paintings never
    /// collide with loaded ones.
    pub fn load(&mut self, scene: Scene) {
        self.wall = scene.wall;
        self.paintings = scene.paintings;
        self.bump_next_id();
    }

    /// Put back an earlier painting arrangement (undo/redo).
    pub fn restore_paintings(&mut self, paintings: Vec<Painting>) {
        self.paintings = paintings;
        self.bump_next_id();
    }

    fn bump_next_id(&mut self) {
        let max_id = self.paintings.iter().map(|p| p.id).max().unwrap_or(0);
        self.next_id = self.next_id.max(max_id.saturating_add(1));
    }

    /// Copy of the current wall and paintings.
    #[cfg(test)]
    pub fn snapshot(&self) -> Scene {
        Scene {
            wall: self.wall.clone(),
            paintings: self.paintings.clone(),
        }
    }

    /// Compute display geometry for the current zoom.
    ///
    /// Returns `None` while no wall is set.
    pub fn layout(&self, zoom: &Zoom) -> Option<Layout<'_>> {
        let wall = self.wall.as_ref()?;
        let pixels_per_inch = zoom.pixels_per_inch(wall.image_width as f64, wall.real_width);

        let paintings = self
            .paintings
            .iter()
            .map(|p| PaintingLayout {
                id: p.id,
                image: &p.image,
                position: p.position,
                size: scaled_dimensions(p.width_inches, p.height_inches, pixels_per_inch),
                frame_style: p.frame_style,
                label: p.dimensions_label(),
            })
            .collect();

        Some(Layout {
            wall: WallLayout {
                image: &wall.image,
                size: zoom.container_size(wall.image_size()),
                pixels_per_inch,
            },
            paintings,
        })
    }
}
