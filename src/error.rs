// SPDX-License-Identifier: MPL-2.0
use std::fmt;

#[derive(Debug, Clone)]
pub enum Error {
    Io(String),
    Svg(String),
    Config(String),
    Image(String),
}

/// Reasons a selected file could not become the framed photo.
#[derive(Debug, Clone, PartialEq)]
pub enum UploadError {
    /// The selection is not in the `image/*` family. Ignored silently.
    InvalidFileType,

    /// The file could not be read.
    Io(String),

    /// The file looks like an image but could not be decoded.
    Decode(String),
}

impl UploadError {
    /// Returns the i18n message key for this error type.
    pub fn i18n_key(&self) -> &'static str {
        match self {
            UploadError::InvalidFileType => "notification-upload-invalid-type",
            UploadError::Io(_) => "notification-upload-io-error",
            UploadError::Decode(_) => "notification-upload-decode-error",
        }
    }

    /// Whether the error should be shown to the user at all.
    pub fn is_silent(&self) -> bool {
        matches!(self, UploadError::InvalidFileType)
    }
}

impl fmt::Display for UploadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UploadError::InvalidFileType => write!(f, "Selected file is not an image"),
            UploadError::Io(msg) => write!(f, "Could not read image: {}", msg),
            UploadError::Decode(msg) => write!(f, "Could not decode image: {}", msg),
        }
    }
}

/// Failures raised by a rasterizer while flattening a composition.
#[derive(Debug, Clone, PartialEq)]
pub enum RasterError {
    /// The requested canvas has no pixels or is too large to allocate.
    Canvas { width: u32, height: u32 },

    /// A layer could not be drawn.
    Layer(String),
}

impl fmt::Display for RasterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RasterError::Canvas { width, height } => {
                write!(f, "Cannot allocate a {}x{} canvas", width, height)
            }
            RasterError::Layer(msg) => write!(f, "Layer rendering failed: {}", msg),
        }
    }
}

/// Failures of the composition export pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum ExportError {
    /// Export was requested before a photo was loaded. The rasterizer is
    /// never invoked for this case.
    NoImageLoaded,

    /// Another export is still running.
    InProgress,

    /// The rasterizer failed.
    Rasterization(RasterError),

    /// The rasterizer returned an empty buffer.
    EmptyBitmap,

    /// The rasterizer returned a buffer whose length does not match its size.
    CorruptBitmap { expected: usize, actual: usize },

    /// The bitmap contains cross-origin pixels and cannot be serialized.
    Tainted,

    /// PNG encoding failed.
    Encoding(String),

    /// The encoded file could not be saved.
    Save(String),

    /// The background export job stopped before finishing.
    Interrupted(String),
}

impl ExportError {
    /// Returns the i18n message key for this error type.
    pub fn i18n_key(&self) -> &'static str {
        match self {
            ExportError::NoImageLoaded => "notification-export-no-image",
            ExportError::InProgress => "notification-export-in-progress",
            ExportError::Save(_) => "notification-export-save-error",
            ExportError::Rasterization(_)
            | ExportError::EmptyBitmap
            | ExportError::CorruptBitmap { .. }
            | ExportError::Tainted
            | ExportError::Encoding(_)
            | ExportError::Interrupted(_) => "notification-export-error",
        }
    }
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportError::NoImageLoaded => write!(f, "No photo loaded"),
            ExportError::InProgress => write!(f, "An export is already running"),
            ExportError::Rasterization(err) => write!(f, "Rasterization failed: {}", err),
            ExportError::EmptyBitmap => write!(f, "Rasterizer returned an empty bitmap"),
            ExportError::CorruptBitmap { expected, actual } => write!(
                f,
                "Rasterizer returned {} bytes, expected {}",
                actual, expected
            ),
            ExportError::Tainted => write!(f, "Composition contains cross-origin pixels"),
            ExportError::Encoding(msg) => write!(f, "PNG encoding failed: {}", msg),
            ExportError::Save(msg) => write!(f, "Could not save file: {}", msg),
            ExportError::Interrupted(msg) => write!(f, "Export was interrupted: {}", msg),
        }
    }
}

impl From<RasterError> for ExportError {
    fn from(err: RasterError) -> Self {
        ExportError::Rasterization(err)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "I/O Error: {}", e),
            Error::Svg(e) => write!(f, "SVG Error: {}", e),
            Error::Config(e) => write!(f, "Config Error: {}", e),
            Error::Image(e) => write!(f, "Image Error: {}", e),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<image_rs::ImageError> for Error {
    fn from(err: image_rs::ImageError) -> Self {
        Error::Image(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
