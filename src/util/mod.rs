// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Geometry, scale and drag helpers shared by the models and the canvas.

pub mod drag;
pub mod geometry;
pub mod scale;
