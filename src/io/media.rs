// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Image loading, decoding and embedding.
//!
//! Images enter the application as raw file bytes (a transient handle that
//! only lives in memory) and leave it as self-contained `data:` URLs that
//! can be stored in a project. This module converts between the two and
//! decodes either form to RGBA pixels suitable for display in egui.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use image::codecs::jpeg::JpegEncoder;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

const DATA_URL_PREFIX: &str = "data:";
const BASE64_MARKER: &str = ";base64";

/// Errors raised while reading, decoding or encoding images.
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to decode image: {0}")]
    Decode(#[source] image::ImageError),
    #[error("Failed to encode image: {0}")]
    Encode(#[source] image::ImageError),
    #[error("Embedded image is not a base64 data URL")]
    NotDataUrl,
    #[error("Embedded image has invalid base64 data: {0}")]
    Base64(#[from] base64::DecodeError),
}

/// Handle to the pixels of a wall or painting.
///
/// Both variants are immutable and cheap to clone, so a serialized project
/// never shares mutable state with the live scene.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageRef {
    /// Raw bytes of an uploaded file; must be re-encoded before persisting
    Transient(Arc<[u8]>),
    /// Self-contained `data:<mime>;base64,...` URL
    Embedded(Arc<str>),
}

impl ImageRef {
    pub fn transient(bytes: Vec<u8>) -> Self {
        ImageRef::Transient(bytes.into())
    }

    pub fn embedded(data_url: impl Into<String>) -> Self {
        let data_url: String = data_url.into();
        ImageRef::Embedded(data_url.into())
    }

    #[cfg(test)]
    pub fn is_embedded(&self) -> bool {
        matches!(self, ImageRef::Embedded(_))
    }

    /// The encoded file bytes behind this handle.
    pub fn encoded_bytes(&self) -> Result<Vec<u8>, MediaError> {
        match self {
            ImageRef::Transient(bytes) => Ok(bytes.to_vec()),
            ImageRef::Embedded(url) => parse_data_url(url).map(|(_, bytes)| bytes),
        }
    }
}

/// Decoded RGBA8 pixels.
#[derive(Clone)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl std::fmt::Debug for DecodedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecodedImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("pixels", &format_args!("[{} bytes]", self.pixels.len()))
            .finish()
    }
}

/// An image read from disk together with its decoded pixels.
#[derive(Debug, Clone)]
pub struct LoadedImage {
    pub path: PathBuf,
    pub image: ImageRef,
    pub decoded: DecodedImage,
}

/// Read an image file and decode it.
pub fn load_file(path: &Path) -> Result<LoadedImage, MediaError> {
    let bytes = std::fs::read(path).map_err(|source| MediaError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let decoded = decode_bytes(&bytes)?;
    log::info!(
        "Loaded image: {} ({}x{})",
        path.display(),
        decoded.width,
        decoded.height
    );

    Ok(LoadedImage {
        path: path.to_path_buf(),
        image: ImageRef::transient(bytes),
        decoded,
    })
}

/// Decode either kind of image handle to RGBA pixels.
pub fn decode(image: &ImageRef) -> Result<DecodedImage, MediaError> {
    decode_bytes(&image.encoded_bytes()?)
}

fn decode_bytes(bytes: &[u8]) -> Result<DecodedImage, MediaError> {
    let rgba = image::load_from_memory(bytes)
        .map_err(MediaError::Decode)?
        .to_rgba8();
    Ok(DecodedImage {
        width: rgba.width(),
        height: rgba.height(),
        pixels: rgba.into_raw(),
    })
}

/// Resolve an image handle to a self-contained data URL.
///
/// Embedded images pass through untouched. Transient images are decoded
/// and re-encoded as JPEG at `jpeg_quality` (1-100); transparency is
/// flattened.
pub fn to_data_url(image: &ImageRef, jpeg_quality: u8) -> Result<String, MediaError> {
    match image {
        ImageRef::Embedded(url) => Ok(url.to_string()),
        ImageRef::Transient(bytes) => {
            let jpeg = encode_jpeg(bytes, jpeg_quality)?;
            Ok(format!(
                "{DATA_URL_PREFIX}image/jpeg{BASE64_MARKER},{}",
                BASE64.encode(jpeg)
            ))
        }
    }
}

fn encode_jpeg(bytes: &[u8], quality: u8) -> Result<Vec<u8>, MediaError> {
    let rgb = image::load_from_memory(bytes)
        .map_err(MediaError::Decode)?
        .to_rgb8();

    let mut out = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut out, quality.clamp(1, 100));
    encoder.encode_image(&rgb).map_err(MediaError::Encode)?;
    Ok(out)
}

/// Split a base64 data URL into its MIME type and decoded payload.
pub fn parse_data_url(url: &str) -> Result<(String, Vec<u8>), MediaError> {
    let rest = url.strip_prefix(DATA_URL_PREFIX).ok_or(MediaError::NotDataUrl)?;
    let (header, payload) = rest.split_once(',').ok_or(MediaError::NotDataUrl)?;
    let mime = header
        .strip_suffix(BASE64_MARKER)
        .ok_or(MediaError::NotDataUrl)?;
    let bytes = BASE64.decode(payload.trim())?;
    Ok((mime.to_string(), bytes))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use image::{ImageFormat, Rgba, RgbaImage};
    use std::io::Cursor;

    /// Encode a solid-colour PNG in memory.
    pub(crate) fn sample_png(width: u32, height: u32) -> Vec<u8> {
        let img = RgbaImage::from_pixel(width, height, Rgba([180, 40, 90, 255]));
        let mut buf = Vec::new();
        img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png).unwrap();
        buf
    }

    #[test]
    fn test_decode_transient() {
        let decoded = decode(&ImageRef::transient(sample_png(4, 3))).unwrap();
        assert_eq!((decoded.width, decoded.height), (4, 3));
        assert_eq!(decoded.pixels.len(), 4 * 3 * 4);
    }

    #[test]
    fn test_transient_becomes_jpeg_data_url() {
        let url = to_data_url(&ImageRef::transient(sample_png(8, 6)), 85).unwrap();
        assert!(url.starts_with("data:image/jpeg;base64,"));

        let decoded = decode(&ImageRef::embedded(url)).unwrap();
        assert_eq!((decoded.width, decoded.height), (8, 6));
    }

    #[test]
    fn test_embedded_passes_through() {
        let url = format!("data:image/png;base64,{}", BASE64.encode(sample_png(2, 2)));
        let out = to_data_url(&ImageRef::embedded(url.clone()), 85).unwrap();
        assert_eq!(out, url);
    }

    #[test]
    fn test_parse_data_url() {
        let (mime, bytes) = parse_data_url("data:text/plain;base64,aGVsbG8=").unwrap();
        assert_eq!(mime, "text/plain");
        assert_eq!(bytes, b"hello");
    }

    #[test]
    fn test_parse_rejects_non_base64_urls() {
        assert!(matches!(parse_data_url("blob:1234"), Err(MediaError::NotDataUrl)));
        assert!(matches!(parse_data_url("data:text/plain,hello"), Err(MediaError::NotDataUrl)));
        assert!(matches!(parse_data_url("data:image/png;base64,@@@"), Err(MediaError::Base64(_))));
    }

    #[test]
    fn test_garbage_bytes_fail_to_decode() {
        let err = decode(&ImageRef::transient(vec![1, 2, 3, 4])).unwrap_err();
        assert!(matches!(err, MediaError::Decode(_)));
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_file(Path::new("/definitely/not/here.png")).unwrap_err();
        assert!(matches!(err, MediaError::Io { .. }));
    }
}
