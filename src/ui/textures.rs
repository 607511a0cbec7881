// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! GPU textures for the wall, the paintings and the upload previews.

use crate::io::media::{self, DecodedImage, ImageRef};
use crate::models::painting::PaintingId;
use std::collections::{HashMap, HashSet};

/// What a texture shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureKey {
    Wall,
    Painting(PaintingId),
    WallPreview,
    PaintingPreview,
}

/// Textures uploaded to egui, keyed by what they show.
///
/// Images that fail to decode are remembered so they are not decoded again
/// every frame.
#[derive(Default)]
pub struct TextureCache {
    textures: HashMap<TextureKey, egui::TextureHandle>,
    failed: HashSet<TextureKey>,
}

impl TextureCache {
    pub fn get(&self, key: TextureKey) -> Option<&egui::TextureHandle> {
        self.textures.get(&key)
    }

    /// Upload already decoded pixels.
    pub fn insert(&mut self, ctx: &egui::Context, key: TextureKey, image: &DecodedImage) {
        let size = [image.width as usize, image.height as usize];
        let color_image = egui::ColorImage::from_rgba_unmultiplied(size, &image.pixels);
        let texture = ctx.load_texture(format!("{:?}", key), color_image, egui::TextureOptions::LINEAR);
        self.failed.remove(&key);
        self.textures.insert(key, texture);
    }

    /// Decode and upload `image` unless a texture for `key` already exists.
    pub fn ensure(&mut self, ctx: &egui::Context, key: TextureKey, image: &ImageRef) {
        if self.textures.contains_key(&key) || self.failed.contains(&key) {
            return;
        }
        match media::decode(image) {
            Ok(decoded) => self.insert(ctx, key, &decoded),
            Err(e) => {
                log::error!("Failed to decode image for {:?}: {}", key, e);
                self.failed.insert(key);
            }
        }
    }

    pub fn remove(&mut self, key: TextureKey) {
        self.textures.remove(&key);
        self.failed.remove(&key);
    }

    /// Drop the wall and painting textures, keeping upload previews.
    pub fn clear_scene(&mut self) {
        let keep = |key: &TextureKey| {
            matches!(key, TextureKey::WallPreview | TextureKey::PaintingPreview)
        };
        self.textures.retain(|key, _| keep(key));
        self.failed.retain(|key| keep(key));
    }
}
