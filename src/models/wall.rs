// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! The wall paintings are placed on.

use super::{require_positive, ValidationError};
use crate::io::media::ImageRef;
use crate::util::geometry::Size;

/// A wall photo together with the real-world size it shows.
#[derive(Debug, Clone, PartialEq)]
pub struct Wall {
    pub image: ImageRef,
    /// Natural pixel size of the decoded image
    pub image_width: u32,
    pub image_height: u32,
    pub real_width: f64,
    pub real_height: f64,
}

impl Wall {
    /// Build a wall, rejecting missing images and non-positive dimensions.
    pub fn new(
        image: Option<ImageRef>,
        image_width: u32,
        image_height: u32,
        real_width: f64,
        real_height: f64,
    ) -> Result<Self, ValidationError> {
        let image = image.ok_or(ValidationError::MissingImage)?;
        require_positive("Image width", image_width as f64)?;
        require_positive("Image height", image_height as f64)?;
        let real_width = require_positive("Wall width", real_width)?;
        let real_height = require_positive("Wall height", real_height)?;

        Ok(Self {
            image,
            image_width,
            image_height,
            real_width,
            real_height,
        })
    }

    /// Natural size of the wall image in pixels.
    pub fn image_size(&self) -> Size {
        Size::new(self.image_width as f64, self.image_height as f64)
    }

    pub fn dimensions_label(&self) -> String {
        format!("{}\" x {}\"", self.real_width, self.real_height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image() -> Option<ImageRef> {
        Some(ImageRef::embedded("data:image/png;base64,AA=="))
    }

    #[test]
    fn test_new_wall() {
        let wall = Wall::new(image(), 1200, 960, 120.0, 96.0).unwrap();
        assert_eq!(wall.image_size(), Size::new(1200.0, 960.0));
        assert_eq!(wall.dimensions_label(), "120\" x 96\"");
    }

    #[test]
    fn test_rejects_invalid_walls() {
        assert_eq!(
            Wall::new(None, 1200, 960, 120.0, 96.0),
            Err(ValidationError::MissingImage)
        );
        assert!(matches!(
            Wall::new(image(), 0, 960, 120.0, 96.0),
            Err(ValidationError::NonPositiveDimension { field: "Image width", .. })
        ));
        assert!(matches!(
            Wall::new(image(), 1200, 960, -1.0, 96.0),
            Err(ValidationError::NonPositiveDimension { field: "Wall width", .. })
        ));
        assert!(matches!(
            Wall::new(image(), 1200, 960, 120.0, 0.0),
            Err(ValidationError::NonPositiveDimension { field: "Wall height", .. })
        ));
    }
}
