// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Persisted project data.
//!
//! A project is a named, self-contained snapshot of one wall and its
//! paintings. Images are embedded as data URLs, so a project can move
//! between the store and exported files without losing anything. Keys are
//! camelCase on the wire.

use super::painting::{deserialize_frame_style, FrameStyle, PaintingId};
use crate::util::geometry::Point;
use serde::{Deserialize, Serialize};

/// Schema version written by this build.
pub const CURRENT_VERSION: u32 = 1;

fn default_version() -> u32 {
    CURRENT_VERSION
}

/// Current time in Unix milliseconds, the unit of every project timestamp.
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// The wall as stored in a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WallRecord {
    pub image_data: String,
    pub image_width: u32,
    pub image_height: u32,
    pub real_width: f64,
    pub real_height: f64,
}

/// A painting as stored in a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaintingRecord {
    pub id: PaintingId,
    pub image_data: String,
    pub width_inches: f64,
    pub height_inches: f64,
    pub position: Point,
    #[serde(default, deserialize_with = "deserialize_frame_style")]
    pub frame_style: FrameStyle,
}

/// Complete project data for serialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Assigned by the store on first save, reused on every later save
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default = "default_version")]
    pub version: u32,
    /// Unix milliseconds
    #[serde(default)]
    pub created_at: i64,
    /// Unix milliseconds, stamped by the store
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<i64>,
    pub wall: Option<WallRecord>,
    #[serde(default)]
    pub paintings: Vec<PaintingRecord>,
}

impl Project {
    /// Create an empty project with the given name.
    pub fn new(name: String, created_at: i64) -> Self {
        Self {
            id: None,
            name,
            version: CURRENT_VERSION,
            created_at,
            updated_at: None,
            wall: None,
            paintings: Vec::new(),
        }
    }

    pub fn summary(&self) -> Option<ProjectSummary> {
        Some(ProjectSummary {
            id: self.id.clone()?,
            name: self.name.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at.unwrap_or(self.created_at),
            painting_count: self.paintings.len(),
        })
    }
}

/// A saved project as shown in the project list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectSummary {
    pub id: String,
    pub name: String,
    pub created_at: i64,
    pub updated_at: i64,
    pub painting_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_format_is_camel_case() {
        let mut project = Project::new("Living room".to_string(), 1_700_000_000_000);
        project.paintings.push(PaintingRecord {
            id: 1,
            image_data: "data:image/jpeg;base64,AA==".to_string(),
            width_inches: 24.0,
            height_inches: 36.0,
            position: Point::new(50.0, 50.0),
            frame_style: FrameStyle::DarkWood,
        });

        let json = serde_json::to_value(&project).unwrap();
        assert_eq!(json["version"], 1);
        assert_eq!(json["createdAt"], 1_700_000_000_000i64);
        assert!(json.get("id").is_none());
        assert!(json["wall"].is_null());
        assert_eq!(json["paintings"][0]["widthInches"], 24.0);
        assert_eq!(json["paintings"][0]["frameStyle"], "dark-wood");
        assert_eq!(json["paintings"][0]["position"]["x"], 50.0);
    }

    #[test]
    fn test_frame_style_defaults_when_absent_or_null() {
        let absent = r#"{"id":3,"imageData":"x","widthInches":1,"heightInches":2,"position":{"x":0,"y":0}}"#;
        let record: PaintingRecord = serde_json::from_str(absent).unwrap();
        assert_eq!(record.frame_style, FrameStyle::None);

        let null = r#"{"id":3,"imageData":"x","widthInches":1,"heightInches":2,"position":{"x":0,"y":0},"frameStyle":null}"#;
        let record: PaintingRecord = serde_json::from_str(null).unwrap();
        assert_eq!(record.frame_style, FrameStyle::None);
    }

    #[test]
    fn test_version_defaults_to_current() {
        let project: Project = serde_json::from_str(r#"{"name":"old","wall":null}"#).unwrap();
        assert_eq!(project.version, CURRENT_VERSION);
        assert!(project.paintings.is_empty());
    }

    #[test]
    fn test_summary_needs_an_id() {
        let mut project = Project::new("p".to_string(), 10);
        assert!(project.summary().is_none());
        project.id = Some("abc".to_string());
        let summary = project.summary().unwrap();
        assert_eq!(summary.updated_at, 10);
        assert_eq!(summary.painting_count, 0);
    }
}
