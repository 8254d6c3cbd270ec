// SPDX-License-Identifier: MPL-2.0
//! Media handling: photo decoding, the composition model, rasterization and
//! PNG export.

pub mod composition;
pub mod frame_export;
pub mod image;
pub mod rasterizer;
pub mod render;

// Re-export commonly used types
pub use composition::{
    export_file_name, Captions, CompositionRequest, CompositionRoot, FrameLayout, ImageRef,
    RgbaColor,
};
pub use frame_export::{DownloadsSink, Exporter, FileBlob, FileSink, SavedFile};
pub use image::{decode_upload, load_template, ImageData, PhotoSource};
pub use rasterizer::{RasterBitmap, RasterOptions, Rasterizer};
pub use render::SoftwareRasterizer;

/// Exporter wired to the default rasterizer and downloads folder.
pub type DefaultExporter = Exporter<SoftwareRasterizer, DownloadsSink>;
