// SPDX-License-Identifier: MPL-2.0
//! Composition export: rasterize, encode as PNG and hand the file to a sink.
//!
//! The workflow is synchronous; callers run [`Exporter::export`] on a
//! blocking thread. An atomic flag rejects overlapping exports and drives
//! the busy state of the save button.

use crate::domain::frame::ExportQuality;
use crate::error::ExportError;
use crate::media::composition::CompositionRequest;
use crate::media::rasterizer::{RasterBitmap, RasterOptions, Rasterizer};
use image_rs::codecs::png::{CompressionType, FilterType, PngEncoder};
use image_rs::{ExtendedColorType, ImageEncoder};
use std::fs;
use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

/// MIME type of every exported file.
pub const PNG_MIME: &str = "image/png";

/// Upper bound on ` (n)` suffixes tried before giving up.
const MAX_NAME_ATTEMPTS: u32 = 10_000;

/// Encoded file waiting to be saved.
#[derive(Debug, Clone, PartialEq)]
pub struct FileBlob {
    pub file_name: String,
    pub mime: &'static str,
    pub bytes: Vec<u8>,
}

/// Where an export ended up.
#[derive(Debug, Clone, PartialEq)]
pub struct SavedFile {
    pub path: PathBuf,
    pub size: usize,
}

/// Destination for encoded exports.
pub trait FileSink: Send + Sync {
    /// Persists `blob` and reports where it was written.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::Save`] when the file cannot be written.
    fn save(&self, blob: &FileBlob) -> Result<SavedFile, ExportError>;
}

/// Writes exports into a downloads folder, browser style.
///
/// An existing `name.png` is never overwritten: the next free
/// `name (1).png`, `name (2).png`, ... is used instead.
#[derive(Debug, Clone, Default)]
pub struct DownloadsSink {
    directory: Option<PathBuf>,
}

impl DownloadsSink {
    /// Sink writing to the platform download directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sink writing to `directory` instead of the platform default.
    #[must_use]
    pub fn with_directory(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: Some(directory.into()),
        }
    }

    /// Resolves the target directory: configured, downloads, then home.
    #[must_use]
    pub fn directory(&self) -> Option<PathBuf> {
        self.directory
            .clone()
            .or_else(dirs::download_dir)
            .or_else(dirs::home_dir)
    }
}

impl DownloadsSink {
    /// Stages the bytes in a hidden temporary file, then moves it to the
    /// first free name. A failed write leaves nothing behind.
    fn save_with<W>(&self, blob: &FileBlob, write: W) -> Result<SavedFile, ExportError>
    where
        W: FnOnce(&mut fs::File, &[u8]) -> io::Result<()>,
    {
        let directory = self
            .directory()
            .ok_or_else(|| ExportError::Save("no download directory available".into()))?;
        fs::create_dir_all(&directory).map_err(|e| ExportError::Save(e.to_string()))?;

        let mut staged = tempfile::Builder::new()
            .prefix(".goru-frame-")
            .suffix(".part")
            .tempfile_in(&directory)
            .map_err(|e| ExportError::Save(e.to_string()))?;
        write(staged.as_file_mut(), &blob.bytes).map_err(|e| ExportError::Save(e.to_string()))?;

        for attempt in 0..MAX_NAME_ATTEMPTS {
            let path = directory.join(numbered_name(&blob.file_name, attempt));
            match staged.persist_noclobber(&path) {
                Ok(_) => {
                    return Ok(SavedFile {
                        path,
                        size: blob.bytes.len(),
                    })
                }
                Err(e) if e.error.kind() == ErrorKind::AlreadyExists => staged = e.file,
                Err(e) => return Err(ExportError::Save(e.error.to_string())),
            }
        }

        Err(ExportError::Save(format!(
            "no free file name for {}",
            blob.file_name
        )))
    }
}

impl FileSink for DownloadsSink {
    fn save(&self, blob: &FileBlob) -> Result<SavedFile, ExportError> {
        self.save_with(blob, |file, bytes| {
            file.write_all(bytes)?;
            file.flush()
        })
    }
}

/// `name.png` for attempt 0, `name (n).png` afterwards.
fn numbered_name(file_name: &str, attempt: u32) -> String {
    if attempt == 0 {
        return file_name.to_string();
    }
    let path = Path::new(file_name);
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(file_name);
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{} ({}).{}", stem, attempt, ext),
        None => format!("{} ({})", stem, attempt),
    }
}

/// Picks the PNG compression effort for a quality in `[0, 1]`.
#[must_use]
pub fn compression_for(quality: ExportQuality) -> CompressionType {
    match quality.value() {
        q if q >= 0.9 => CompressionType::Best,
        q if q >= 0.5 => CompressionType::Default,
        _ => CompressionType::Fast,
    }
}

/// Encodes a validated bitmap as PNG.
///
/// # Errors
///
/// Returns [`ExportError::Encoding`] when the encoder fails.
pub fn encode_png(bitmap: &RasterBitmap, quality: ExportQuality) -> Result<Vec<u8>, ExportError> {
    let mut bytes = Vec::new();
    let encoder =
        PngEncoder::new_with_quality(&mut bytes, compression_for(quality), FilterType::Adaptive);
    encoder
        .write_image(
            &bitmap.pixels,
            bitmap.width,
            bitmap.height,
            ExtendedColorType::Rgba8,
        )
        .map_err(|e| ExportError::Encoding(e.to_string()))?;
    Ok(bytes)
}

/// Clears the exporting flag when the export scope ends, even on early return.
struct ExportGuard<'a>(&'a AtomicBool);

impl Drop for ExportGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Runs the export workflow against a rasterizer and a sink.
#[derive(Debug)]
pub struct Exporter<R, S> {
    rasterizer: R,
    sink: S,
    options: RasterOptions,
    exporting: AtomicBool,
}

impl<R: Rasterizer, S: FileSink> Exporter<R, S> {
    #[must_use]
    pub fn new(rasterizer: R, sink: S, options: RasterOptions) -> Self {
        Self {
            rasterizer,
            sink,
            options,
            exporting: AtomicBool::new(false),
        }
    }

    #[must_use]
    pub fn options(&self) -> &RasterOptions {
        &self.options
    }

    #[must_use]
    pub fn rasterizer(&self) -> &R {
        &self.rasterizer
    }

    #[must_use]
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Returns `true` while an export is running.
    #[must_use]
    pub fn is_exporting(&self) -> bool {
        self.exporting.load(Ordering::Acquire)
    }

    /// Exports the composition described by `request`.
    ///
    /// `None` means no photo is loaded.
    ///
    /// # Errors
    ///
    /// - [`ExportError::NoImageLoaded`] without a request; nothing is rendered
    /// - [`ExportError::InProgress`] when another export is running
    /// - rasterization, validation, encoding or save failures
    pub fn export(&self, request: Option<CompositionRequest>) -> Result<SavedFile, ExportError> {
        let request = request.ok_or(ExportError::NoImageLoaded)?;

        if self
            .exporting
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(ExportError::InProgress);
        }
        let _guard = ExportGuard(&self.exporting);

        let bitmap = self.rasterizer.rasterize(&request.root, &self.options)?;
        bitmap.validate()?;
        let bytes = encode_png(&bitmap, self.options.quality)?;

        self.sink.save(&FileBlob {
            file_name: request.file_name,
            mime: PNG_MIME,
            bytes,
        })
    }
}
