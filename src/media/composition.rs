// SPDX-License-Identifier: MPL-2.0
//! Composition model: the layered visual that is previewed and exported.
//!
//! A [`CompositionRoot`] is an immutable snapshot of everything a rasterizer
//! needs, in layout pixels:
//!
//! 1. the template background scaled to cover the canvas over a fallback fill,
//! 2. the circular mask with the photo clipped, offset and zoomed inside it,
//! 3. the caption lines and the credit line.
//!
//! Snapshots share pixel buffers with the live state through `Arc`, so taking
//! one per frame or per export is cheap.

use crate::domain::frame::{Offset, ZoomFactor};
use crate::media::image::{ImageData, PhotoSource};
use crate::ui::state::ViewportState;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Stem used for the export file name when the caption is blank.
pub const DEFAULT_FILE_STEM: &str = "profile";

/// Suffix appended to every export file stem.
pub const FILE_SUFFIX: &str = "-image.png";

/// Longest stem (in characters) kept from a caption.
const MAX_STEM_CHARS: usize = 100;

/// Distance from the top of a text box to its baseline, as a share of the
/// font size (normal line height).
const TEXT_BASELINE_RATIO: f32 = 0.9;

/// Line height as a share of the font size.
const LINE_HEIGHT_RATIO: f32 = 1.2;

// =============================================================================
// Colors
// =============================================================================

/// Straight-alpha 8-bit color, written as `#rrggbb` or `#rrggbbaa` in config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RgbaColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl RgbaColor {
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const TRANSPARENT: Self = Self::rgba(0, 0, 0, 0);
    /// `#8b0000`, shown while the template is missing.
    pub const DARK_RED: Self = Self::rgb(139, 0, 0);

    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    #[must_use]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parses `#rgb`, `#rrggbb` or `#rrggbbaa`.
    #[must_use]
    pub fn parse_hex(value: &str) -> Option<Self> {
        let hex = value.trim().strip_prefix('#')?;
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        match hex.len() {
            3 => {
                let short = |i: usize| u8::from_str_radix(&hex[i..=i], 16).ok().map(|v| v * 17);
                Some(Self::rgb(short(0)?, short(1)?, short(2)?))
            }
            6 => Some(Self::rgb(channel(0)?, channel(2)?, channel(4)?)),
            8 => Some(Self::rgba(channel(0)?, channel(2)?, channel(4)?, channel(6)?)),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_opaque(self) -> bool {
        self.a == 255
    }
}

impl fmt::Display for RgbaColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_opaque() {
            write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            write!(f, "#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

impl TryFrom<String> for RgbaColor {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse_hex(&value).ok_or_else(|| format!("invalid color: {}", value))
    }
}

impl From<RgbaColor> for String {
    fn from(color: RgbaColor) -> Self {
        color.to_string()
    }
}

// =============================================================================
// Layout
// =============================================================================

/// Placement of the circular photo viewport.
#[derive(Debug, Clone, PartialEq)]
pub struct MaskLayout {
    pub diameter: f32,
    /// Distance from the frame top, as a share of the frame height.
    pub top_percent: f32,
    /// Distance from the frame right edge, as a share of the frame width.
    /// Negative values push the circle past the edge.
    pub right_percent: f32,
    /// Fill drawn inside the circle beneath the photo.
    pub backdrop: RgbaColor,
}

/// Anchor and style of a text block.
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    pub left_percent: f32,
    pub top_percent: f32,
    pub font_size: f32,
    pub bold: bool,
    pub color: RgbaColor,
}

/// Small attribution line pinned to the bottom-right corner.
#[derive(Debug, Clone, PartialEq)]
pub struct CreditLayout {
    pub text: String,
    pub font_size: f32,
    pub right: f32,
    pub bottom: f32,
    pub color: RgbaColor,
}

/// Geometry of the whole composition, in layout pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameLayout {
    pub width: f32,
    pub height: f32,
    /// Shown where the template does not cover.
    pub fill: RgbaColor,
    pub mask: MaskLayout,
    /// The name line.
    pub caption: TextStyle,
    /// Optional second line under the name.
    pub info: TextStyle,
    pub credit: Option<CreditLayout>,
    /// Comma-separated font families, most preferred first.
    pub font_family: String,
}

impl Default for FrameLayout {
    fn default() -> Self {
        Self {
            width: 458.0,
            height: 458.0,
            fill: RgbaColor::DARK_RED,
            mask: MaskLayout {
                diameter: 240.0,
                top_percent: 0.18,
                right_percent: -0.02,
                backdrop: RgbaColor::rgb(0xee, 0xee, 0xee),
            },
            caption: TextStyle {
                left_percent: 0.05,
                top_percent: 0.75,
                font_size: 25.0,
                bold: true,
                color: RgbaColor::BLACK,
            },
            info: TextStyle {
                left_percent: 0.05,
                top_percent: 0.75,
                font_size: 25.0,
                bold: true,
                color: RgbaColor::BLACK,
            },
            credit: Some(CreditLayout {
                text: "Made With \u{2764}\u{fe0f} by Abu Sayed".to_string(),
                font_size: 8.0,
                right: 10.0,
                bottom: 10.0,
                color: RgbaColor::BLACK,
            }),
            font_family: "Hind Siliguri, sans-serif".to_string(),
        }
    }
}

/// Axis-aligned circle in layout pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub center_x: f32,
    pub center_y: f32,
    pub radius: f32,
}

impl Circle {
    #[must_use]
    pub fn contains(&self, x: f32, y: f32) -> bool {
        let dx = x - self.center_x;
        let dy = y - self.center_y;
        dx * dx + dy * dy <= self.radius * self.radius
    }
}

impl FrameLayout {
    /// Position of the circular viewport inside the frame.
    #[must_use]
    pub fn mask_circle(&self) -> Circle {
        let diameter = self.mask.diameter;
        let left = self.width - self.mask.right_percent * self.width - diameter;
        let top = self.mask.top_percent * self.height;
        Circle {
            center_x: left + diameter / 2.0,
            center_y: top + diameter / 2.0,
            radius: diameter / 2.0,
        }
    }

    /// Lays out the caption block and credit line as positioned text layers.
    ///
    /// Blank lines are omitted, like conditionally rendered paragraphs.
    #[must_use]
    pub fn text_layers(&self, captions: &Captions) -> Vec<TextLayer> {
        let mut layers = Vec::new();
        let margin = 5.0;
        let mut cursor_y = self.caption.top_percent * self.height;

        for (text, style) in [(&captions.name, &self.caption), (&captions.info, &self.info)] {
            let text = text.trim();
            if text.is_empty() {
                continue;
            }
            cursor_y += margin;
            layers.push(TextLayer {
                text: text.to_string(),
                x: style.left_percent * self.width,
                baseline: cursor_y + style.font_size * TEXT_BASELINE_RATIO,
                font_size: style.font_size,
                bold: style.bold,
                color: style.color,
                anchor: TextAnchor::Start,
            });
            cursor_y += style.font_size * LINE_HEIGHT_RATIO + margin;
        }

        if let Some(credit) = &self.credit {
            if !credit.text.trim().is_empty() {
                layers.push(TextLayer {
                    text: credit.text.clone(),
                    x: self.width - credit.right,
                    baseline: self.height
                        - credit.bottom
                        - credit.font_size * (LINE_HEIGHT_RATIO - TEXT_BASELINE_RATIO),
                    font_size: credit.font_size,
                    bold: false,
                    color: credit.color,
                    anchor: TextAnchor::End,
                });
            }
        }

        layers
    }
}

// =============================================================================
// Layers
// =============================================================================

/// Horizontal alignment of a text layer relative to its `x`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAnchor {
    Start,
    End,
}

/// A single positioned line of text.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLayer {
    pub text: String,
    pub x: f32,
    pub baseline: f32,
    pub font_size: f32,
    pub bold: bool,
    pub color: RgbaColor,
    pub anchor: TextAnchor,
}

/// Caption text entered by the user.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Captions {
    pub name: String,
    pub info: String,
}

/// Reference to an image layer, resolved by the rasterizer.
#[derive(Debug, Clone)]
pub enum ImageRef {
    /// Pixels already in memory.
    Decoded(ImageData),
    /// A file fetched at rasterization time.
    Path(PathBuf),
}

/// Immutable snapshot of the full layered visual.
#[derive(Debug, Clone)]
pub struct CompositionRoot {
    pub layout: FrameLayout,
    pub template: Option<ImageRef>,
    pub photo: PhotoSource,
    pub offset: Offset,
    pub zoom: ZoomFactor,
    pub texts: Vec<TextLayer>,
}

impl CompositionRoot {
    /// Captures the current visual state.
    ///
    /// Returns `None` when no photo is loaded.
    #[must_use]
    pub fn snapshot(
        state: &ViewportState,
        layout: &FrameLayout,
        template: Option<&ImageRef>,
        captions: &Captions,
    ) -> Option<Self> {
        let photo = state.photo()?.clone();
        Some(Self {
            layout: layout.clone(),
            template: template.cloned(),
            photo,
            offset: state.offset,
            zoom: state.zoom,
            texts: layout.text_layers(captions),
        })
    }
}

/// A single export job: what to rasterize and what to call the file.
#[derive(Debug, Clone)]
pub struct CompositionRequest {
    pub root: CompositionRoot,
    pub file_name: String,
}

impl CompositionRequest {
    /// Builds a request named after `caption`, or `default_stem` when blank.
    #[must_use]
    pub fn new(root: CompositionRoot, caption: &str, default_stem: &str) -> Self {
        Self {
            root,
            file_name: export_file_name(caption, default_stem),
        }
    }
}

/// Derives the download name `<stem>-image.png` from the caption.
///
/// Characters that are not allowed in file names are replaced by `_`. A
/// blank caption (or blank `default_stem`) falls back to [`DEFAULT_FILE_STEM`].
#[must_use]
pub fn export_file_name(caption: &str, default_stem: &str) -> String {
    let stem = sanitize_stem(caption)
        .or_else(|| sanitize_stem(default_stem))
        .unwrap_or_else(|| DEFAULT_FILE_STEM.to_string());
    format!("{}{}", stem, FILE_SUFFIX)
}

fn sanitize_stem(raw: &str) -> Option<String> {
    let cleaned: String = raw
        .trim()
        .chars()
        .take(MAX_STEM_CHARS)
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    let cleaned = cleaned.trim_end_matches(['.', ' ']).trim();
    (!cleaned.is_empty()).then(|| cleaned.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::assert_abs_diff_eq;
    use crate::ui::state::TransformController;

    #[test]
    fn blank_caption_uses_default_name() {
        assert_eq!(export_file_name("", DEFAULT_FILE_STEM), "profile-image.png");
        assert_eq!(export_file_name("   ", DEFAULT_FILE_STEM), "profile-image.png");
        assert_eq!(export_file_name("", ""), "profile-image.png");
    }

    #[test]
    fn caption_becomes_file_stem() {
        assert_eq!(export_file_name(" Rahim ", "profile"), "Rahim-image.png");
        assert_eq!(export_file_name("রহিম", "profile"), "রহিম-image.png");
    }

    #[test]
    fn path_hostile_characters_are_replaced() {
        assert_eq!(export_file_name("a/b\\c:d", "profile"), "a_b_c_d-image.png");
        assert_eq!(export_file_name("..", "profile"), "profile-image.png");
    }

    #[test]
    fn long_captions_are_truncated() {
        let caption = "x".repeat(300);
        let name = export_file_name(&caption, "profile");
        assert_eq!(name.len(), MAX_STEM_CHARS + FILE_SUFFIX.len());
    }

    #[test]
    fn color_parses_hex_forms() {
        assert_eq!(RgbaColor::parse_hex("#fff"), Some(RgbaColor::WHITE));
        assert_eq!(RgbaColor::parse_hex("#8b0000"), Some(RgbaColor::DARK_RED));
        assert_eq!(
            RgbaColor::parse_hex("#77777780"),
            Some(RgbaColor::rgba(0x77, 0x77, 0x77, 0x80))
        );
        assert_eq!(RgbaColor::parse_hex("8b0000"), None);
        assert_eq!(RgbaColor::parse_hex("#zzzzzz"), None);
        assert_eq!(RgbaColor::DARK_RED.to_string(), "#8b0000");
    }

    #[test]
    fn mask_circle_is_anchored_to_top_right() {
        let layout = FrameLayout::default();
        let circle = layout.mask_circle();
        // left = 458 + 0.02 * 458 - 240
        assert_abs_diff_eq!(circle.center_x, 458.0 + 9.16 - 240.0 + 120.0, epsilon = 1e-3);
        assert_abs_diff_eq!(circle.center_y, 0.18 * 458.0 + 120.0, epsilon = 1e-3);
        assert_abs_diff_eq!(circle.radius, 120.0);
        assert!(circle.contains(circle.center_x, circle.center_y));
        assert!(!circle.contains(0.0, 0.0));
    }

    #[test]
    fn blank_caption_lines_are_not_laid_out() {
        let layout = FrameLayout {
            credit: None,
            ..FrameLayout::default()
        };
        assert!(layout.text_layers(&Captions::default()).is_empty());

        let captions = Captions {
            name: "Karim".into(),
            info: " ".into(),
        };
        let layers = layout.text_layers(&captions);
        assert_eq!(layers.len(), 1);
        assert_eq!(layers[0].text, "Karim");
        assert!(layers[0].bold);
    }

    #[test]
    fn info_line_sits_below_name() {
        let layout = FrameLayout::default();
        let captions = Captions {
            name: "Karim".into(),
            info: "Class 10".into(),
        };
        let layers = layout.text_layers(&captions);
        assert_eq!(layers.len(), 3);
        assert!(layers[1].baseline > layers[0].baseline);
        assert_eq!(layers[2].anchor, TextAnchor::End);
    }

    #[test]
    fn snapshot_requires_photo() {
        let controller = TransformController::default();
        let layout = FrameLayout::default();
        assert!(
            CompositionRoot::snapshot(controller.state(), &layout, None, &Captions::default())
                .is_none()
        );
    }

    #[test]
    fn snapshot_copies_transform() {
        let mut controller = TransformController::default();
        controller.load_image(PhotoSource::from_rgba("p.png", 1, 1, vec![1, 2, 3, 255]));
        controller.set_zoom(2.0);

        let layout = FrameLayout::default();
        let root = CompositionRoot::snapshot(
            controller.state(),
            &layout,
            None,
            &Captions::default(),
        )
        .expect("photo is loaded");

        assert_abs_diff_eq!(root.zoom.value(), 2.0);
        assert_eq!(root.offset, Offset::ZERO);
        assert_eq!(root.photo.name, "p.png");
    }
}
