// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Project data serialization and deserialization.
//!
//! This module converts the live scene into a self-contained `Project`
//! (every image embedded as a data URL) and back, and exports/imports
//! projects as JSON or YAML.

use crate::io::media::{self, ImageRef, MediaError};
use crate::models::composition::Scene;
use crate::models::painting::{Painting, PaintingId, PaintingSpec};
use crate::models::project::{now_millis, PaintingRecord, Project, WallRecord, CURRENT_VERSION};
use crate::models::wall::Wall;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while converting, exporting or importing projects.
#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("Invalid project file: {0}")]
    Malformed(String),
    #[error("Project version {found} is newer than the supported version {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },
    #[error("Incompatible project: {0}")]
    Incompatible(String),
    #[error("Unsupported file extension: {0:?}")]
    UnsupportedExtension(Option<String>),
    #[error("Failed to write project: {0}")]
    Encode(String),
    #[error(transparent)]
    Media(#[from] MediaError),
    #[error("Failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ProjectError {
    /// Whether the error means the input itself was unusable.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            ProjectError::Malformed(_)
                | ProjectError::UnsupportedVersion { .. }
                | ProjectError::Incompatible(_)
                | ProjectError::UnsupportedExtension(_)
        )
    }
}

/// Portable project file formats, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Json,
    Yaml,
}

impl FileFormat {
    pub fn from_path(path: &Path) -> Result<Self, ProjectError> {
        let extension = path.extension().and_then(|s| s.to_str());
        match extension {
            Some("json") => Ok(FileFormat::Json),
            Some("yaml") | Some("yml") => Ok(FileFormat::Yaml),
            _ => Err(ProjectError::UnsupportedExtension(
                extension.map(str::to_string),
            )),
        }
    }
}

/// Build a self-contained project from the live wall and paintings.
///
/// Transient images are re-encoded as JPEG at `jpeg_quality`; embedded
/// images are copied as they are. The result shares nothing with the live
/// state. `id` is left empty for the caller to fill in.
pub fn serialize(
    name: &str,
    wall: Option<&Wall>,
    paintings: &[Painting],
    jpeg_quality: u8,
) -> Result<Project, ProjectError> {
    serialize_at(name, wall, paintings, jpeg_quality, now_millis())
}

fn serialize_at(
    name: &str,
    wall: Option<&Wall>,
    paintings: &[Painting],
    jpeg_quality: u8,
    created_at: i64,
) -> Result<Project, ProjectError> {
    let mut project = Project::new(name.to_string(), created_at);

    if let Some(wall) = wall {
        project.wall = Some(WallRecord {
            image_data: media::to_data_url(&wall.image, jpeg_quality)?,
            image_width: wall.image_width,
            image_height: wall.image_height,
            real_width: wall.real_width,
            real_height: wall.real_height,
        });
    }

    for painting in paintings {
        project.paintings.push(PaintingRecord {
            id: painting.id,
            image_data: media::to_data_url(&painting.image, jpeg_quality)?,
            width_inches: painting.width_inches,
            height_inches: painting.height_inches,
            position: painting.position,
            frame_style: painting.frame_style,
        });
    }

    Ok(project)
}

/// Rebuild the live wall and paintings from a project.
///
/// Embedded image data becomes directly usable image handles.
pub fn deserialize(project: &Project) -> Result<Scene, ProjectError> {
    check_version(project)?;

    let wall = match &project.wall {
        Some(record) => {
            let image = embedded_image(&record.image_data, "wall")?;
            let wall = Wall::new(
                Some(image),
                record.image_width,
                record.image_height,
                record.real_width,
                record.real_height,
            )
            .map_err(|e| ProjectError::Incompatible(e.to_string()))?;
            Some(wall)
        }
        None => None,
    };

    let mut seen = HashSet::new();
    let mut paintings = Vec::with_capacity(project.paintings.len());
    for record in &project.paintings {
        // The id counter must be able to move past every loaded id
        if record.id == PaintingId::MAX {
            return Err(ProjectError::Incompatible(format!(
                "painting id {} is out of range",
                record.id
            )));
        }
        if !seen.insert(record.id) {
            return Err(ProjectError::Incompatible(format!(
                "painting id {} appears more than once",
                record.id
            )));
        }

        let spec = PaintingSpec {
            image: Some(embedded_image(&record.image_data, "painting")?),
            width_inches: record.width_inches,
            height_inches: record.height_inches,
        };
        let painting = Painting::from_spec(record.id, spec, record.position, record.frame_style)
            .map_err(|e| ProjectError::Incompatible(format!("painting {}: {}", record.id, e)))?;
        paintings.push(painting);
    }

    Ok(Scene { wall, paintings })
}

fn check_version(project: &Project) -> Result<(), ProjectError> {
    if project.version > CURRENT_VERSION {
        return Err(ProjectError::UnsupportedVersion {
            found: project.version,
            supported: CURRENT_VERSION,
        });
    }
    Ok(())
}

fn embedded_image(data: &str, owner: &str) -> Result<ImageRef, ProjectError> {
    if !data.starts_with("data:") {
        return Err(ProjectError::Incompatible(format!(
            "{} image is not embedded in the project",
            owner
        )));
    }
    Ok(ImageRef::embedded(data))
}

/// Serialize a project as pretty-printed JSON.
pub fn export_to_bytes(project: &Project) -> Result<Vec<u8>, ProjectError> {
    serde_json::to_vec_pretty(project).map_err(|e| ProjectError::Encode(e.to_string()))
}

/// Parse a JSON project, rejecting anything that could not be loaded.
pub fn import_from_bytes(bytes: &[u8]) -> Result<Project, ProjectError> {
    let project: Project =
        serde_json::from_slice(bytes).map_err(|e| ProjectError::Malformed(e.to_string()))?;
    validate(project)
}

/// Serialize a project as YAML.
pub fn export_yaml_bytes(project: &Project) -> Result<Vec<u8>, ProjectError> {
    serde_yaml::to_string(project)
        .map(String::into_bytes)
        .map_err(|e| ProjectError::Encode(e.to_string()))
}

/// Parse a YAML project, rejecting anything that could not be loaded.
pub fn import_yaml_bytes(bytes: &[u8]) -> Result<Project, ProjectError> {
    let project: Project =
        serde_yaml::from_slice(bytes).map_err(|e| ProjectError::Malformed(e.to_string()))?;
    validate(project)
}

fn validate(project: Project) -> Result<Project, ProjectError> {
    deserialize(&project)?;
    Ok(project)
}

/// Export a project to `path`, in the format given by its extension.
pub fn export_file(project: &Project, path: &Path) -> Result<(), ProjectError> {
    let bytes = match FileFormat::from_path(path)? {
        FileFormat::Json => export_to_bytes(project)?,
        FileFormat::Yaml => export_yaml_bytes(project)?,
    };
    std::fs::write(path, bytes).map_err(|source| ProjectError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    log::info!("Exported project \"{}\" to {}", project.name, path.display());
    Ok(())
}

/// Import a project from `path`, in the format given by its extension.
///
/// The imported project has no store id; saving it creates a new record.
pub fn import_file(path: &Path) -> Result<Project, ProjectError> {
    let format = FileFormat::from_path(path)?;
    let bytes = std::fs::read(path).map_err(|source| ProjectError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut project = match format {
        FileFormat::Json => import_from_bytes(&bytes)?,
        FileFormat::Yaml => import_yaml_bytes(&bytes)?,
    };
    project.id = None;
    log::info!(
        "Imported project \"{}\" with {} painting(s) from {}",
        project.name,
        project.paintings.len(),
        path.display()
    );
    Ok(project)
}

/// Suggested export file name, `<name>.<extension>.json`.
pub fn default_file_name(name: &str, extension: &str) -> String {
    let stem: String = name
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '-',
            c => c,
        })
        .collect();
    let stem = if stem.is_empty() { "project".to_string() } else { stem };
    format!("{}.{}.json", stem, extension)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::media::tests::sample_png;
    use crate::models::painting::FrameStyle;
    use crate::util::geometry::Point;

    fn live_scene() -> (Wall, Vec<Painting>) {
        let wall = Wall::new(
            Some(ImageRef::transient(sample_png(12, 10))),
            12,
            10,
            120.0,
            96.5,
        )
        .unwrap();
        let paintings = vec![
            Painting {
                id: 1,
                image: ImageRef::transient(sample_png(3, 4)),
                width_inches: 24.0,
                height_inches: 36.0,
                position: Point::new(50.0, 50.0),
                frame_style: FrameStyle::None,
            },
            Painting {
                id: 3,
                image: ImageRef::transient(sample_png(5, 5)),
                width_inches: 17.25,
                height_inches: 11.1,
                position: Point::new(123.456, 0.1),
                frame_style: FrameStyle::ClassicSilver,
            },
        ];
        (wall, paintings)
    }

    fn temp_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("wallmock-serial-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_serialize_embeds_every_image() {
        let (wall, paintings) = live_scene();
        let project = serialize_at("Hallway", Some(&wall), &paintings, 85, 42).unwrap();

        assert_eq!(project.name, "Hallway");
        assert_eq!(project.version, CURRENT_VERSION);
        assert_eq!(project.created_at, 42);
        assert!(project.id.is_none());
        assert!(project
            .wall
            .as_ref()
            .unwrap()
            .image_data
            .starts_with("data:image/jpeg;base64,"));
        assert_eq!(project.paintings.len(), 2);
        assert!(project.paintings.iter().all(|p| p.image_data.starts_with("data:")));
    }

    #[test]
    fn test_round_trip_preserves_geometry() {
        let (wall, paintings) = live_scene();
        let project = serialize("p", Some(&wall), &paintings, 85).unwrap();
        let scene = deserialize(&project).unwrap();

        let restored_wall = scene.wall.unwrap();
        assert_eq!(restored_wall.image_width, wall.image_width);
        assert_eq!(restored_wall.image_height, wall.image_height);
        assert_eq!(restored_wall.real_width, wall.real_width);
        assert_eq!(restored_wall.real_height, wall.real_height);
        assert!(restored_wall.image.is_embedded());

        assert_eq!(scene.paintings.len(), paintings.len());
        for (restored, before) in scene.paintings.iter().zip(&paintings) {
            assert_eq!(restored.id, before.id);
            assert_eq!(restored.width_inches, before.width_inches);
            assert_eq!(restored.height_inches, before.height_inches);
            assert_eq!(restored.position, before.position);
            assert_eq!(restored.frame_style, before.frame_style);

            let pixels = media::decode(&restored.image).unwrap();
            let expected = media::decode(&before.image).unwrap();
            assert_eq!((pixels.width, pixels.height), (expected.width, expected.height));
        }
    }

    #[test]
    fn test_embedded_images_survive_unchanged() {
        let (wall, paintings) = live_scene();
        let first = serialize("p", Some(&wall), &paintings, 85).unwrap();
        let scene = deserialize(&first).unwrap();
        let second = serialize("p", scene.wall.as_ref(), &scene.paintings, 85).unwrap();

        assert_eq!(first.wall, second.wall);
        assert_eq!(first.paintings, second.paintings);
    }

    #[test]
    fn test_serialized_project_is_detached_from_live_state() {
        let (wall, mut paintings) = live_scene();
        let project = serialize("p", Some(&wall), &paintings, 85).unwrap();

        paintings[0].position = Point::new(999.0, 999.0);
        paintings[0].frame_style = FrameStyle::GalleryFloat;
        assert_eq!(project.paintings[0].position, Point::new(50.0, 50.0));
        assert_eq!(project.paintings[0].frame_style, FrameStyle::None);
    }

    #[test]
    fn test_empty_project_round_trip() {
        let project = serialize("empty", None, &[], 85).unwrap();
        let scene = deserialize(&project).unwrap();
        assert!(scene.wall.is_none());
        assert!(scene.paintings.is_empty());
    }

    #[test]
    fn test_bytes_round_trip_exactly() {
        let (wall, paintings) = live_scene();
        let mut project = serialize("Den", Some(&wall), &paintings, 85).unwrap();
        project.id = Some("0b6c3a7e".to_string());
        project.updated_at = Some(1_700_000_000_123);

        let bytes = export_to_bytes(&project).unwrap();
        assert_eq!(import_from_bytes(&bytes).unwrap(), project);

        let yaml = export_yaml_bytes(&project).unwrap();
        assert_eq!(import_yaml_bytes(&yaml).unwrap(), project);
    }

    #[test]
    fn test_import_rejects_garbage() {
        let err = import_from_bytes(b"this is not json").unwrap_err();
        assert!(matches!(err, ProjectError::Malformed(_)));
        assert!(err.is_invalid_input());

        let err = import_from_bytes(br#"{"foo": 1}"#).unwrap_err();
        assert!(matches!(err, ProjectError::Malformed(_)));
    }

    #[test]
    fn test_import_rejects_newer_versions() {
        let json = br#"{"name":"future","version":99,"createdAt":1,"wall":null,"paintings":[]}"#;
        assert!(matches!(
            import_from_bytes(json),
            Err(ProjectError::UnsupportedVersion { found: 99, .. })
        ));
    }

    #[test]
    fn test_import_rejects_broken_entities() {
        let bad_wall = br#"{"name":"w","version":1,"createdAt":1,
            "wall":{"imageData":"data:image/png;base64,AA==","imageWidth":10,"imageHeight":10,"realWidth":-5,"realHeight":10},
            "paintings":[]}"#;
        assert!(matches!(import_from_bytes(bad_wall), Err(ProjectError::Incompatible(_))));

        let duplicate_ids = br#"{"name":"d","version":1,"createdAt":1,"wall":null,"paintings":[
            {"id":1,"imageData":"data:image/png;base64,AA==","widthInches":1,"heightInches":1,"position":{"x":0,"y":0}},
            {"id":1,"imageData":"data:image/png;base64,AA==","widthInches":1,"heightInches":1,"position":{"x":0,"y":0}}]}"#;
        assert!(matches!(import_from_bytes(duplicate_ids), Err(ProjectError::Incompatible(_))));

        let external_image = br#"{"name":"e","version":1,"createdAt":1,"wall":null,"paintings":[
            {"id":1,"imageData":"blob:http://localhost/123","widthInches":1,"heightInches":1,"position":{"x":0,"y":0}}]}"#;
        assert!(matches!(import_from_bytes(external_image), Err(ProjectError::Incompatible(_))));
    }

    #[test]
    fn test_import_rejects_painting_id_at_limit() {
        let json = br#"{"name":"m","version":1,"createdAt":1,"wall":null,"paintings":[
            {"id":4294967295,"imageData":"data:image/png;base64,AA==","widthInches":1,"heightInches":1,"position":{"x":0,"y":0}}]}"#;
        let err = import_from_bytes(json).unwrap_err();
        assert!(matches!(err, ProjectError::Incompatible(_)));
        assert!(err.is_invalid_input());
    }

    #[test]
    fn test_files_by_extension() {
        let dir = temp_dir();
        let (wall, paintings) = live_scene();
        let mut project = serialize("Kitchen", Some(&wall), &paintings, 85).unwrap();
        project.id = Some("stored-id".to_string());

        for name in ["kitchen.wallmockup.json", "kitchen.yaml"] {
            let path = dir.join(name);
            export_file(&project, &path).unwrap();
            let imported = import_file(&path).unwrap();
            assert!(imported.id.is_none());
            assert_eq!(imported.paintings, project.paintings);
            assert_eq!(imported.wall, project.wall);
        }

        assert!(matches!(
            export_file(&project, &dir.join("kitchen.txt")),
            Err(ProjectError::UnsupportedExtension(_))
        ));
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_default_file_name() {
        assert_eq!(default_file_name("Living room", "wallmockup"), "Living room.wallmockup.json");
        assert_eq!(default_file_name("  ", "wallmockup"), "project.wallmockup.json");
        assert_eq!(default_file_name("a/b", "wallmockup"), "a-b.wallmockup.json");
    }
}
