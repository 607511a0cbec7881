// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Data model: the wall, its paintings and their persisted project form.

pub mod composition;
pub mod history;
pub mod painting;
pub mod project;
pub mod wall;

use thiserror::Error;

/// Rejected input when creating a wall or a painting.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Please provide an image")]
    MissingImage,
    #[error("{field} must be a positive number (got {value})")]
    NonPositiveDimension { field: &'static str, value: f64 },
    #[error("Set up a wall first to add paintings")]
    NoWall,
    #[error("No painting ids are left")]
    IdsExhausted,
}

/// Check that a real-world or pixel dimension is finite and greater than zero.
pub(crate) fn require_positive(field: &'static str, value: f64) -> Result<f64, ValidationError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(ValidationError::NonPositiveDimension { field, value })
    }
}
