// SPDX-License-Identifier: MPL-2.0
//! Image decoding for uploaded photos and frame templates (PNG, JPEG, GIF, SVG, etc.).
//!
//! Uploads are limited to the `image/*` MIME family: anything else is rejected with
//! [`UploadError::InvalidFileType`], which callers ignore silently.

use crate::error::{Error, Result, UploadError};
use image_rs::GenericImageView;
use resvg::usvg;
use std::fs;
use std::path::Path;
use std::sync::Arc;

/// Decoded straight-alpha RGBA pixels.
#[derive(Debug, Clone)]
pub struct ImageData {
    pub width: u32,
    pub height: u32,
    /// Stored in Arc so snapshots and preview handles share one buffer.
    rgba_bytes: Arc<Vec<u8>>,
}

impl ImageData {
    /// Creates a new `ImageData` from RGBA pixels.
    #[must_use]
    pub fn from_rgba(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        Self {
            width,
            height,
            rgba_bytes: Arc::new(pixels),
        }
    }

    /// Returns a reference to the RGBA bytes.
    #[must_use]
    pub fn rgba_bytes(&self) -> &[u8] {
        &self.rgba_bytes
    }

    /// Returns whether both values share the same pixel buffer.
    #[must_use]
    pub fn same_pixels(&self, other: &ImageData) -> bool {
        Arc::ptr_eq(&self.rgba_bytes, &other.rgba_bytes)
    }

    /// Copies the pixels into an `image` crate buffer.
    #[must_use]
    pub fn to_rgba_image(&self) -> Option<image_rs::RgbaImage> {
        image_rs::RgbaImage::from_raw(self.width, self.height, self.rgba_bytes.to_vec())
    }
}

/// The photo placed into the circular viewport.
#[derive(Debug, Clone)]
pub struct PhotoSource {
    /// File name the photo was uploaded from.
    pub name: String,
    pub image: ImageData,
}

impl PhotoSource {
    #[must_use]
    pub fn new(name: impl Into<String>, image: ImageData) -> Self {
        Self {
            name: name.into(),
            image,
        }
    }

    /// Convenience constructor from raw RGBA pixels.
    #[must_use]
    pub fn from_rgba(name: impl Into<String>, width: u32, height: u32, pixels: Vec<u8>) -> Self {
        Self::new(name, ImageData::from_rgba(width, height, pixels))
    }

    /// Returns whether both sources refer to the same decoded upload.
    #[must_use]
    pub fn same_source(&self, other: &PhotoSource) -> bool {
        self.image.same_pixels(&other.image)
    }
}

// =============================================================================
// MIME handling
// =============================================================================

/// Extension to MIME table for the formats the decoder understands.
const MIME_TABLE: &[(&str, &str)] = &[
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("gif", "image/gif"),
    ("webp", "image/webp"),
    ("bmp", "image/bmp"),
    ("tif", "image/tiff"),
    ("tiff", "image/tiff"),
    ("ico", "image/x-icon"),
    ("svg", "image/svg+xml"),
];

/// Extensions offered by the file picker.
pub const UPLOAD_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "gif", "webp", "bmp", "tif", "tiff", "ico", "svg",
];

/// Returns whether `mime` belongs to the `image/*` family.
#[must_use]
pub fn accepts_mime(mime: &str) -> bool {
    mime.trim()
        .to_ascii_lowercase()
        .strip_prefix("image/")
        .is_some_and(|subtype| !subtype.is_empty())
}

/// Guesses the MIME type of a file from its extension.
#[must_use]
pub fn mime_from_path(path: &Path) -> Option<&'static str> {
    let extension = path.extension()?.to_str()?.to_ascii_lowercase();
    MIME_TABLE
        .iter()
        .find(|(ext, _)| *ext == extension)
        .map(|(_, mime)| *mime)
}

// =============================================================================
// Decoding
// =============================================================================

/// Reads and decodes a file selected for upload.
///
/// # Errors
///
/// - [`UploadError::InvalidFileType`] when the file is not an image
/// - [`UploadError::Io`] when the file cannot be read
/// - [`UploadError::Decode`] when the data is corrupt or unsupported
pub fn decode_upload<P: AsRef<Path>>(path: P) -> std::result::Result<PhotoSource, UploadError> {
    let path = path.as_ref();
    let mime = mime_from_path(path).ok_or(UploadError::InvalidFileType)?;

    let bytes = fs::read(path).map_err(|e| UploadError::Io(e.to_string()))?;
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("photo")
        .to_string();

    decode_upload_bytes(name, Some(mime), &bytes)
}

/// Decodes an in-memory upload whose MIME type was declared by the picker.
///
/// # Errors
///
/// Same as [`decode_upload`], minus I/O failures.
pub fn decode_upload_bytes(
    name: impl Into<String>,
    mime: Option<&str>,
    bytes: &[u8],
) -> std::result::Result<PhotoSource, UploadError> {
    let mime = mime.ok_or(UploadError::InvalidFileType)?;
    if !accepts_mime(mime) {
        return Err(UploadError::InvalidFileType);
    }

    let image = if mime.eq_ignore_ascii_case("image/svg+xml") {
        rasterize_svg(bytes).map_err(|e| UploadError::Decode(e.to_string()))?
    } else {
        decode_raster(bytes).map_err(|e| UploadError::Decode(e.to_string()))?
    };

    if image.width == 0 || image.height == 0 {
        return Err(UploadError::Decode("image has empty dimensions".into()));
    }

    Ok(PhotoSource::new(name, image))
}

/// Template shipped with the application, used when none is configured.
const BUNDLED_TEMPLATE_SVG: &[u8] = include_bytes!("../../assets/frame/template.svg");

/// Rasterizes the bundled frame template.
///
/// # Errors
///
/// Returns an error if the embedded SVG cannot be parsed.
pub fn default_template() -> Result<ImageData> {
    rasterize_svg(BUNDLED_TEMPLATE_SVG)
}

/// Loads a frame template background from disk.
///
/// # Errors
///
/// Returns an error if the file cannot be read or decoded.
pub fn load_template<P: AsRef<Path>>(path: P) -> Result<ImageData> {
    let path = path.as_ref();
    let bytes = fs::read(path)?;
    if matches!(mime_from_path(path), Some("image/svg+xml")) {
        rasterize_svg(&bytes)
    } else {
        decode_raster(&bytes)
    }
}

fn decode_raster(bytes: &[u8]) -> Result<ImageData> {
    let img = image_rs::load_from_memory(bytes)?;
    let (width, height) = img.dimensions();
    let pixels = img.to_rgba8().into_vec();
    Ok(ImageData::from_rgba(width, height, pixels))
}

fn rasterize_svg(svg_data: &[u8]) -> Result<ImageData> {
    let tree = usvg::Tree::from_data(svg_data, &usvg::Options::default())
        .map_err(|e| Error::Svg(e.to_string()))?;

    let pixmap_size = tree.size().to_int_size();
    let width = pixmap_size.width();
    let height = pixmap_size.height();
    if width == 0 || height == 0 {
        return Err(Error::Svg("SVG has empty dimensions".into()));
    }

    let mut pixmap = tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| Error::Svg("Failed to allocate SVG pixmap".into()))?;

    resvg::render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());

    // tiny-skia stores premultiplied pixels
    let pixels = pixmap
        .pixels()
        .iter()
        .flat_map(|pixel| {
            let color = pixel.demultiply();
            [color.red(), color.green(), color.blue(), color.alpha()]
        })
        .collect();

    Ok(ImageData::from_rgba(width, height, pixels))
}
