// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Application configuration.
//!
//! Defaults used when placing paintings, encoding images, zooming and
//! storing projects. The record is read from
//! `<config dir>/WallMockup/config.yaml`; any field left out of the file
//! keeps its default.

use crate::models::painting::FrameStyle;
use crate::util::geometry::Point;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

const APP_DIR: &str = "WallMockup";
const CONFIG_FILE: &str = "config.yaml";

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// Where and how new paintings appear.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementDefaults {
    /// Top-left position of a freshly added painting, in display pixels
    pub initial_position: Point,
    pub frame_style: FrameStyle,
}

impl Default for PlacementDefaults {
    fn default() -> Self {
        Self {
            initial_position: Point::new(50.0, 50.0),
            frame_style: FrameStyle::None,
        }
    }
}

/// Raster step used when embedding uploaded images in a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncodingConfig {
    pub jpeg_quality: u8,
}

impl Default for EncodingConfig {
    fn default() -> Self {
        Self { jpeg_quality: 85 }
    }
}

/// Zoom range of the wall view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoomConfig {
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub initial: f64,
    /// The fit-to-screen scale never exceeds this
    pub max_fit: f64,
    /// Share of the window height the wall may take when fitted
    pub fit_height_fraction: f64,
    /// Horizontal space kept free around a fitted wall, in pixels
    pub fit_margin: f64,
}

impl Default for ZoomConfig {
    fn default() -> Self {
        Self {
            min: 0.05,
            max: 1.5,
            step: 0.1,
            initial: 0.5,
            max_fit: 1.0,
            fit_height_fraction: 0.6,
            fit_margin: 40.0,
        }
    }
}

/// Project store location and file naming.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Overrides the platform data directory
    pub directory: Option<PathBuf>,
    /// Exported files are named `<project>.<file_extension>.json`
    pub file_extension: String,
    /// Persistence operations running longer than this are reported as stalled
    pub slow_operation_secs: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            directory: None,
            file_extension: "wallmockup".to_string(),
            slow_operation_secs: 10,
        }
    }
}

impl StorageConfig {
    /// Directory holding the saved projects.
    pub fn projects_dir(&self) -> PathBuf {
        self.directory.clone().unwrap_or_else(|| {
            let mut path = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
            path.push(APP_DIR);
            path.push("projects");
            path
        })
    }
}

/// Complete application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub placement: PlacementDefaults,
    pub encoding: EncodingConfig,
    pub zoom: ZoomConfig,
    pub storage: StorageConfig,
    /// How long status messages stay visible, in seconds
    pub message_secs: f32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            placement: PlacementDefaults::default(),
            encoding: EncodingConfig::default(),
            zoom: ZoomConfig::default(),
            storage: StorageConfig::default(),
            message_secs: default_message_secs(),
        }
    }
}

impl AppConfig {
    /// Default location of the configuration file.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|mut p| {
            p.push(APP_DIR);
            p.push(CONFIG_FILE);
            p
        })
    }

    /// Load the configuration from the default location.
    ///
    /// Falls back to defaults when the file is missing or cannot be read.
    pub fn load() -> Self {
        let Some(path) = Self::default_path() else {
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }

        match Self::load_from_file(&path) {
            Ok(config) => {
                log::info!("Loaded configuration from {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("Ignoring configuration at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let yaml = fs::read_to_string(path)?;
        Self::from_yaml(&yaml)
    }

    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = serde_yaml::from_str(yaml)?;
        if !(config.message_secs > 0.0) {
            config.message_secs = default_message_secs();
        }
        Ok(config)
    }
}

fn default_message_secs() -> f32 {
    3.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_yaml("{}").unwrap();
        assert_eq!(config.placement.initial_position, Point::new(50.0, 50.0));
        assert_eq!(config.placement.frame_style, FrameStyle::None);
        assert_eq!(config.encoding.jpeg_quality, 85);
        assert_eq!(config.zoom.min, 0.05);
        assert_eq!(config.zoom.max, 1.5);
        assert_eq!(config.storage.file_extension, "wallmockup");
        assert_eq!(config.message_secs, 3.0);
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let yaml = "placement:\n  frame_style: classic-gold\nzoom:\n  step: 0.25\n";
        let config = AppConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.placement.frame_style, FrameStyle::ClassicGold);
        assert_eq!(config.placement.initial_position, Point::new(50.0, 50.0));
        assert_eq!(config.zoom.step, 0.25);
        assert_eq!(config.zoom.initial, 0.5);
    }

    #[test]
    fn test_invalid_yaml_is_an_error() {
        assert!(matches!(
            AppConfig::from_yaml("zoom: [1, 2"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_storage_directory_override() {
        let storage = StorageConfig {
            directory: Some(PathBuf::from("/tmp/wallmock-projects")),
            ..Default::default()
        };
        assert_eq!(storage.projects_dir(), PathBuf::from("/tmp/wallmock-projects"));
    }
}
