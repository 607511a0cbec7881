// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Geometric utility types and functions.
//!
//! All coordinates here are display pixels. Positions are top-left corners
//! relative to the wall as it is currently drawn.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub};

/// A 2D point in display pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// A width/height pair in display pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Clamp one axis so an object of `extent` stays inside `container`.
///
/// The valid range is `[0, max(0, container - extent)]`. An object larger
/// than its container pins to 0, and a non-finite candidate also lands on 0.
pub fn clamp_axis(candidate: f64, container: f64, extent: f64) -> f64 {
    let upper = (container - extent).max(0.0);
    if !candidate.is_finite() || !upper.is_finite() {
        return 0.0;
    }
    candidate.clamp(0.0, upper)
}

/// Clamp a top-left position so an object of `object` size stays inside `container`.
pub fn clamp_position(candidate: Point, container: Size, object: Size) -> Point {
    Point {
        x: clamp_axis(candidate.x, container.width, object.width),
        y: clamp_axis(candidate.y, container.height, object.height),
    }
}
