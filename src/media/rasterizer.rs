// SPDX-License-Identifier: MPL-2.0
//! Rasterizer contract for flattening a [`CompositionRoot`] into pixels.
//!
//! The exporter only depends on the [`Rasterizer`] trait, so the rendering
//! backend can be swapped (or mocked in tests) without touching the export
//! workflow.

use crate::domain::frame::{ExportQuality, ExportScale};
use crate::error::{ExportError, RasterError};
use crate::media::composition::{CompositionRoot, RgbaColor};

/// Options controlling a single rasterization pass.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterOptions {
    /// Load images outside the asset root as if they were shared with us.
    pub use_cors: bool,
    /// Load cross-origin images anyway, marking the result as tainted.
    pub allow_taint: bool,
    /// Canvas background; `None` keeps transparency.
    pub background: Option<RgbaColor>,
    /// Output pixel density relative to layout pixels.
    pub scale: ExportScale,
    /// Requested encoder quality.
    pub quality: ExportQuality,
    /// Emit per-layer debug output.
    pub logging: bool,
}

impl Default for RasterOptions {
    fn default() -> Self {
        Self {
            use_cors: true,
            allow_taint: true,
            background: None,
            scale: ExportScale::default(),
            quality: ExportQuality::MAX,
            logging: false,
        }
    }
}

impl RasterOptions {
    /// Options for the on-screen preview: same pipeline at layout density.
    #[must_use]
    pub fn preview() -> Self {
        Self {
            scale: ExportScale::new(1.0),
            ..Self::default()
        }
    }

    /// Size in device pixels of a `width` x `height` layout at this scale.
    #[must_use]
    pub fn device_size(&self, width: f32, height: f32) -> (u32, u32) {
        let scale = self.scale.value();
        (to_device(width * scale), to_device(height * scale))
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_device(value: f32) -> u32 {
    if value.is_finite() && value > 0.0 {
        value.ceil() as u32
    } else {
        0
    }
}

/// Straight-alpha RGBA output of a rasterization pass.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterBitmap {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
    /// Set when cross-origin pixels were drawn without CORS approval.
    pub tainted: bool,
}

impl RasterBitmap {
    /// Checks that the bitmap can be encoded.
    ///
    /// # Errors
    ///
    /// - [`ExportError::EmptyBitmap`] for a zero-sized or empty buffer
    /// - [`ExportError::CorruptBitmap`] when the buffer length is not
    ///   `width * height * 4`
    /// - [`ExportError::Tainted`] when cross-origin pixels were drawn
    pub fn validate(&self) -> Result<(), ExportError> {
        if self.width == 0 || self.height == 0 || self.pixels.is_empty() {
            return Err(ExportError::EmptyBitmap);
        }
        let expected = self.width as usize * self.height as usize * 4;
        if self.pixels.len() != expected {
            return Err(ExportError::CorruptBitmap {
                expected,
                actual: self.pixels.len(),
            });
        }
        if self.tainted {
            return Err(ExportError::Tainted);
        }
        Ok(())
    }
}

/// Something that can flatten a composition into a bitmap.
pub trait Rasterizer: Send + Sync {
    /// Renders `root` with the given options.
    ///
    /// # Errors
    ///
    /// Returns a [`RasterError`] when the canvas cannot be created or a
    /// layer fails to draw.
    fn rasterize(
        &self,
        root: &CompositionRoot,
        options: &RasterOptions,
    ) -> Result<RasterBitmap, RasterError>;
}
