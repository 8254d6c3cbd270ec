// SPDX-License-Identifier: MPL-2.0
//! Shared test helpers: float assertions and ready-made photos.

pub use approx::assert_abs_diff_eq;

use crate::media::image::PhotoSource;

/// A `size` x `size` photo filled with a single RGBA color.
pub fn solid_photo(name: &str, size: u32, rgba: [u8; 4]) -> PhotoSource {
    let pixels = rgba
        .iter()
        .copied()
        .cycle()
        .take((size * size * 4) as usize)
        .collect();
    PhotoSource::from_rgba(name, size, size, pixels)
}
