// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Real-world scale conversions and the wall zoom level.
//!
//! Everything placed on the wall is measured in inches. What the user sees
//! is measured in display pixels, which depend on how wide the wall image is
//! currently drawn. The ratio between the two must therefore be recomputed
//! from the displayed width every time the zoom changes.

use crate::config::ZoomConfig;
use crate::util::geometry::Size;

/// Display pixels per real-world inch for a wall drawn `display_width_px` wide.
///
/// Returns 0 when the real width is zero, negative or not a number, so a bad
/// wall degrades to a zero-size layout instead of dividing by zero.
pub fn pixels_per_inch(display_width_px: f64, real_width_inches: f64) -> f64 {
    if !(real_width_inches > 0.0) {
        return 0.0;
    }
    display_width_px / real_width_inches
}

/// Convert a real-world length to display pixels.
pub fn inches_to_pixels(inches: f64, pixels_per_inch: f64) -> f64 {
    inches * pixels_per_inch
}

/// Display size of a `width_inches` x `height_inches` object.
pub fn scaled_dimensions(width_inches: f64, height_inches: f64, pixels_per_inch: f64) -> Size {
    Size {
        width: inches_to_pixels(width_inches, pixels_per_inch),
        height: inches_to_pixels(height_inches, pixels_per_inch),
    }
}

/// Current zoom of the wall view, plus the scale that fits it on screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Zoom {
    scale: f64,
    fit_scale: f64,
    min: f64,
    max: f64,
    step: f64,
}

impl Zoom {
    pub fn new(config: &ZoomConfig) -> Self {
        let min = config.min.min(config.max);
        let max = config.max.max(config.min);
        let initial = config.initial.clamp(min, max);
        Self {
            scale: initial,
            fit_scale: initial,
            min,
            max,
            step: config.step,
        }
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    #[cfg(test)]
    pub fn fit_scale(&self) -> f64 {
        self.fit_scale
    }

    pub fn range(&self) -> (f64, f64) {
        (self.min, self.max)
    }

    /// Set the zoom, clamped to the configured range.
    pub fn set_scale(&mut self, scale: f64) {
        if scale.is_finite() {
            self.scale = scale.clamp(self.min, self.max);
        }
    }

    pub fn zoom_in(&mut self) {
        self.set_scale(self.scale + self.step);
    }

    pub fn zoom_out(&mut self) {
        self.set_scale(self.scale - self.step);
    }

    /// Recompute the fit scale for an image of `image` pixels and jump to it.
    ///
    /// The fit scale is the largest scale (capped at `max_fit`) at which the
    /// image fits `available_width - margin` horizontally and
    /// `window_height * fit_height_fraction` vertically.
    pub fn fit(&mut self, image: Size, available_width: f64, window_height: f64, config: &ZoomConfig) {
        if image.width <= 0.0 || image.height <= 0.0 {
            return;
        }
        let scale_x = (available_width - config.fit_margin) / image.width;
        let scale_y = (window_height * config.fit_height_fraction) / image.height;
        let fit = scale_x.min(scale_y).min(config.max_fit);
        if fit.is_finite() && fit > 0.0 {
            self.fit_scale = fit;
            self.scale = fit;
        }
    }

    /// Jump back to the last computed fit scale.
    pub fn reset_to_fit(&mut self) {
        self.scale = self.fit_scale;
    }

    /// Size of the wall container when an `image`-sized wall is drawn at this zoom.
    pub fn container_size(&self, image: Size) -> Size {
        Size {
            width: image.width * self.scale,
            height: image.height * self.scale,
        }
    }

    /// Display pixels per inch for a wall of `image_width_px` and `real_width_inches`.
    pub fn pixels_per_inch(&self, image_width_px: f64, real_width_inches: f64) -> f64 {
        pixels_per_inch(image_width_px * self.scale, real_width_inches)
    }

    pub fn percent_label(&self) -> String {
        format!("{:.0}%", self.scale * 100.0)
    }
}
