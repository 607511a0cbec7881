// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Painting data structures.
//!
//! A painting is a rectangular image with real-world dimensions, a position
//! on the wall in display pixels, and a decorative frame style.

use super::{require_positive, ValidationError};
use crate::io::media::ImageRef;
use crate::util::geometry::Point;
use serde::{Deserialize, Deserializer, Serialize};

/// Identifier of a painting, unique within a project.
pub type PaintingId = u32;

/// Decorative frame drawn around a painting. Has no effect on geometry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FrameStyle {
    #[default]
    None,
    ModernBlack,
    ModernWhite,
    ClassicGold,
    ClassicSilver,
    RusticWood,
    DarkWood,
    GalleryFloat,
}

impl FrameStyle {
    pub const ALL: [FrameStyle; 8] = [
        FrameStyle::None,
        FrameStyle::ModernBlack,
        FrameStyle::ModernWhite,
        FrameStyle::ClassicGold,
        FrameStyle::ClassicSilver,
        FrameStyle::RusticWood,
        FrameStyle::DarkWood,
        FrameStyle::GalleryFloat,
    ];

    /// Get display name for UI
    pub fn display_name(&self) -> &'static str {
        match self {
            FrameStyle::None => "No Frame",
            FrameStyle::ModernBlack => "Modern Black",
            FrameStyle::ModernWhite => "Modern White",
            FrameStyle::ClassicGold => "Classic Gold",
            FrameStyle::ClassicSilver => "Classic Silver",
            FrameStyle::RusticWood => "Rustic Wood",
            FrameStyle::DarkWood => "Dark Wood",
            FrameStyle::GalleryFloat => "Gallery Float",
        }
    }
}

/// Deserialize a frame style, treating a missing or `null` value as `none`.
pub(crate) fn deserialize_frame_style<'de, D>(deserializer: D) -> Result<FrameStyle, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<FrameStyle>::deserialize(deserializer)?.unwrap_or_default())
}

/// User input for a new painting, before it is placed on the wall.
#[derive(Debug, Clone)]
pub struct PaintingSpec {
    pub image: Option<ImageRef>,
    pub width_inches: f64,
    pub height_inches: f64,
}

/// A painting placed on the wall.
#[derive(Debug, Clone, PartialEq)]
pub struct Painting {
    pub id: PaintingId,
    pub image: ImageRef,
    pub width_inches: f64,
    pub height_inches: f64,
    /// Top-left corner in display pixels relative to the rendered wall
    pub position: Point,
    pub frame_style: FrameStyle,
}

impl Painting {
    /// Validate `spec` and build a painting from it.
    ///
    /// Nothing is created when the image is missing or a dimension is not
    /// a positive number.
    pub fn from_spec(
        id: PaintingId,
        spec: PaintingSpec,
        position: Point,
        frame_style: FrameStyle,
    ) -> Result<Self, ValidationError> {
        let image = spec.image.ok_or(ValidationError::MissingImage)?;
        let width_inches = require_positive("Painting width", spec.width_inches)?;
        let height_inches = require_positive("Painting height", spec.height_inches)?;

        Ok(Self {
            id,
            image,
            width_inches,
            height_inches,
            position,
            frame_style,
        })
    }

    /// Short `W" x H"` description used in lists and captions.
    pub fn dimensions_label(&self) -> String {
        format!("{}\" x {}\"", self.width_inches, self.height_inches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(width: f64, height: f64) -> PaintingSpec {
        PaintingSpec {
            image: Some(ImageRef::embedded("data:image/png;base64,AA==")),
            width_inches: width,
            height_inches: height,
        }
    }

    #[test]
    fn test_from_spec() {
        let p = Painting::from_spec(1, spec(24.0, 36.0), Point::new(50.0, 50.0), FrameStyle::None).unwrap();
        assert_eq!(p.id, 1);
        assert_eq!(p.dimensions_label(), "24\" x 36\"");
    }

    #[test]
    fn test_from_spec_rejects_bad_input() {
        let missing = PaintingSpec {
            image: None,
            ..spec(24.0, 36.0)
        };
        assert_eq!(
            Painting::from_spec(1, missing, Point::default(), FrameStyle::None),
            Err(ValidationError::MissingImage)
        );
        assert!(matches!(
            Painting::from_spec(1, spec(0.0, 36.0), Point::default(), FrameStyle::None),
            Err(ValidationError::NonPositiveDimension { field: "Painting width", .. })
        ));
        assert!(matches!(
            Painting::from_spec(1, spec(24.0, f64::NAN), Point::default(), FrameStyle::None),
            Err(ValidationError::NonPositiveDimension { field: "Painting height", .. })
        ));
    }

    #[test]
    fn test_frame_style_wire_names() {
        let json = serde_json::to_string(&FrameStyle::ClassicGold).unwrap();
        assert_eq!(json, "\"classic-gold\"");
        let parsed: FrameStyle = serde_json::from_str("\"gallery-float\"").unwrap();
        assert_eq!(parsed, FrameStyle::GalleryFloat);
        assert!(serde_json::from_str::<FrameStyle>("\"neon\"").is_err());
    }

    #[test]
    fn test_every_style_has_a_name() {
        for style in FrameStyle::ALL {
            assert!(!style.display_name().is_empty());
        }
    }
}
