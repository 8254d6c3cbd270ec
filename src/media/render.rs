// SPDX-License-Identifier: MPL-2.0
//! CPU rasterizer for frame compositions, built on tiny-skia and resvg.
//!
//! Layers are painted back to front: canvas background, fallback fill and
//! template, circular photo viewport, then text. Text goes through a small
//! generated SVG document so resvg handles shaping and system fonts.

use crate::error::RasterError;
use crate::domain::frame::{Offset, ZoomFactor};
use crate::media::composition::{
    CompositionRoot, FrameLayout, ImageRef, RgbaColor, TextAnchor, TextLayer,
};
use crate::media::image::{load_template, ImageData};
use crate::media::rasterizer::{RasterBitmap, RasterOptions, Rasterizer};
use resvg::usvg;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock};
use std::time::Instant;
use tiny_skia::{
    Color, ColorU8, FillRule, FilterQuality, IntSize, Mask, Paint, PathBuilder, Pixmap,
    PixmapPaint, Rect, Transform,
};

/// System font database, loaded on first text render.
fn font_database() -> Arc<usvg::fontdb::Database> {
    static FONTS: OnceLock<Arc<usvg::fontdb::Database>> = OnceLock::new();
    FONTS
        .get_or_init(|| {
            let mut db = usvg::fontdb::Database::new();
            db.load_system_fonts();
            Arc::new(db)
        })
        .clone()
}

/// Premultiplied pixmap cached against the pixel buffer it came from.
#[derive(Default)]
struct PixmapCache {
    entry: Mutex<Option<(ImageData, Arc<Pixmap>)>>,
}

impl PixmapCache {
    fn get_or_build(
        &self,
        image: &ImageData,
        build: impl FnOnce(&ImageData) -> Option<Pixmap>,
    ) -> Option<Arc<Pixmap>> {
        if let Ok(guard) = self.entry.lock() {
            if let Some((source, pixmap)) = guard.as_ref() {
                if source.same_pixels(image) {
                    return Some(Arc::clone(pixmap));
                }
            }
        }

        let pixmap = Arc::new(build(image)?);
        if let Ok(mut guard) = self.entry.lock() {
            *guard = Some((image.clone(), Arc::clone(&pixmap)));
        }
        Some(pixmap)
    }
}

/// Last image decoded from disk, keyed by its path.
#[derive(Default)]
struct FileCache {
    entry: Mutex<Option<(PathBuf, ImageData)>>,
}

impl FileCache {
    fn load(&self, path: &Path) -> crate::error::Result<ImageData> {
        if let Ok(guard) = self.entry.lock() {
            if let Some((cached, data)) = guard.as_ref() {
                if cached == path {
                    return Ok(data.clone());
                }
            }
        }

        let data = load_template(path)?;
        if let Ok(mut guard) = self.entry.lock() {
            *guard = Some((path.to_path_buf(), data.clone()));
        }
        Ok(data)
    }
}

/// Default [`Rasterizer`] used for both the live preview and exports.
#[derive(Default)]
pub struct SoftwareRasterizer {
    /// Directory whose files count as same-origin. `None` trusts every path.
    asset_root: Option<PathBuf>,
    files: FileCache,
    photo_cache: PixmapCache,
    template_cache: PixmapCache,
}

impl std::fmt::Debug for SoftwareRasterizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SoftwareRasterizer")
            .field("asset_root", &self.asset_root)
            .finish_non_exhaustive()
    }
}

impl SoftwareRasterizer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Treats only files under `root` as same-origin.
    #[must_use]
    pub fn with_asset_root(root: impl Into<PathBuf>) -> Self {
        Self {
            asset_root: Some(root.into()),
            ..Self::default()
        }
    }

    /// Same-origin root when one is given, otherwise trusts every path.
    #[must_use]
    pub fn for_asset_root(root: Option<PathBuf>) -> Self {
        match root {
            Some(root) => Self::with_asset_root(root),
            None => Self::new(),
        }
    }

    fn is_same_origin(&self, path: &Path) -> bool {
        let Some(root) = &self.asset_root else {
            return true;
        };
        match (path.canonicalize(), root.canonicalize()) {
            (Ok(path), Ok(root)) => path.starts_with(root),
            _ => path.starts_with(root),
        }
    }

    /// Resolves an image layer, applying the cross-origin rules.
    ///
    /// Returns `None` when the layer must be skipped.
    fn resolve_image(
        &self,
        image: &ImageRef,
        options: &RasterOptions,
        tainted: &mut bool,
    ) -> Option<ImageData> {
        let path = match image {
            ImageRef::Decoded(data) => return Some(data.clone()),
            ImageRef::Path(path) => path,
        };

        let cross_origin = !self.is_same_origin(path);
        if cross_origin && !options.use_cors && !options.allow_taint {
            if options.logging {
                eprintln!("[render] skipping cross-origin image {}", path.display());
            }
            return None;
        }

        match self.files.load(path) {
            Ok(data) => {
                if cross_origin && !options.use_cors {
                    *tainted = true;
                }
                Some(data)
            }
            Err(err) => {
                eprintln!("Failed to load image layer {}: {}", path.display(), err);
                None
            }
        }
    }
}

impl Rasterizer for SoftwareRasterizer {
    fn rasterize(
        &self,
        root: &CompositionRoot,
        options: &RasterOptions,
    ) -> Result<RasterBitmap, RasterError> {
        let placement = PhotoPlacement {
            image: &root.photo.image,
            offset: root.offset,
            zoom: root.zoom,
        };
        self.paint(
            &root.layout,
            root.template.as_ref(),
            Some(placement),
            &root.texts,
            options,
        )
    }
}

/// Photo layer parameters for [`SoftwareRasterizer::paint`].
struct PhotoPlacement<'a> {
    image: &'a ImageData,
    offset: Offset,
    zoom: ZoomFactor,
}

impl SoftwareRasterizer {
    /// Renders the frame without a photo: the mask shows its backdrop only.
    ///
    /// Used by the editor before a photo is uploaded.
    ///
    /// # Errors
    ///
    /// Same as [`Rasterizer::rasterize`].
    pub fn render_empty_frame(
        &self,
        layout: &FrameLayout,
        template: Option<&ImageRef>,
        texts: &[TextLayer],
        options: &RasterOptions,
    ) -> Result<RasterBitmap, RasterError> {
        self.paint(layout, template, None, texts, options)
    }

    fn paint(
        &self,
        layout: &FrameLayout,
        template: Option<&ImageRef>,
        photo: Option<PhotoPlacement<'_>>,
        texts: &[TextLayer],
        options: &RasterOptions,
    ) -> Result<RasterBitmap, RasterError> {
        let (width, height) = options.device_size(layout.width, layout.height);
        let mut pixmap = Pixmap::new(width, height).ok_or(RasterError::Canvas { width, height })?;
        let scale = options.scale.value();
        let mut tainted = false;
        let mut timer = LayerTimer::new(options.logging);

        if let Some(background) = options.background {
            pixmap.fill(to_color(background));
        }
        timer.lap("background");

        fill_rect(&mut pixmap, 0.0, 0.0, width as f32, height as f32, layout.fill);
        if let Some(template) = template.and_then(|t| self.resolve_image(t, options, &mut tainted)) {
            if let Some(template) = self.template_cache.get_or_build(&template, full_pixmap) {
                draw_cover(&mut pixmap, &template);
            }
        }
        timer.lap("template");

        let circle = layout.mask_circle();
        let (cx, cy, radius) = (
            circle.center_x * scale,
            circle.center_y * scale,
            circle.radius * scale,
        );
        let circle_path = PathBuilder::from_circle(cx, cy, radius)
            .ok_or_else(|| RasterError::Layer("invalid mask circle".into()))?;
        let mut paint = Paint::default();
        paint.anti_alias = true;
        set_paint_color(&mut paint, layout.mask.backdrop);
        pixmap.fill_path(
            &circle_path,
            &paint,
            FillRule::Winding,
            Transform::identity(),
            None,
        );

        if let Some(placement) = photo {
            let mut mask = Mask::new(width, height).ok_or(RasterError::Canvas { width, height })?;
            mask.fill_path(&circle_path, FillRule::Winding, true, Transform::identity());

            if let Some(photo) = self
                .photo_cache
                .get_or_build(placement.image, center_square_pixmap)
            {
                // The square is scaled to the mask diameter, zoomed around its
                // center and then shifted by the drag offset.
                let side = photo.width() as f32;
                let k = layout.mask.diameter / side * placement.zoom.value() * scale;
                let center_x = (circle.center_x + placement.offset.x) * scale;
                let center_y = (circle.center_y + placement.offset.y) * scale;
                let transform = Transform::from_row(
                    k,
                    0.0,
                    0.0,
                    k,
                    center_x - side * k / 2.0,
                    center_y - side * k / 2.0,
                );
                let paint = PixmapPaint {
                    quality: FilterQuality::Bicubic,
                    ..PixmapPaint::default()
                };
                pixmap.draw_pixmap(0, 0, Pixmap::as_ref(&photo), &paint, transform, Some(&mask));
            }
        }
        timer.lap("photo");

        if !texts.is_empty() {
            draw_text_layers(
                &mut pixmap,
                texts,
                &layout.font_family,
                layout.width,
                layout.height,
                scale,
            )?;
        }
        timer.lap("text");

        let pixels = pixmap
            .pixels()
            .iter()
            .flat_map(|pixel| {
                let color = pixel.demultiply();
                [color.red(), color.green(), color.blue(), color.alpha()]
            })
            .collect();
        timer.lap("readback");

        Ok(RasterBitmap {
            width,
            height,
            pixels,
            tainted,
        })
    }
}

struct LayerTimer {
    enabled: bool,
    last: Instant,
}

impl LayerTimer {
    fn new(enabled: bool) -> Self {
        Self {
            enabled,
            last: Instant::now(),
        }
    }

    fn lap(&mut self, layer: &str) {
        if self.enabled {
            eprintln!("[render] {} took {:?}", layer, self.last.elapsed());
            self.last = Instant::now();
        }
    }
}

fn to_color(color: RgbaColor) -> Color {
    Color::from_rgba8(color.r, color.g, color.b, color.a)
}

fn set_paint_color(paint: &mut Paint, color: RgbaColor) {
    paint.set_color_rgba8(color.r, color.g, color.b, color.a);
}

fn fill_rect(pixmap: &mut Pixmap, x: f32, y: f32, w: f32, h: f32, color: RgbaColor) {
    if let Some(rect) = Rect::from_xywh(x, y, w, h) {
        let mut paint = Paint::default();
        set_paint_color(&mut paint, color);
        pixmap.fill_rect(rect, &paint, Transform::identity(), None);
    }
}

/// Draws `image` centered so it covers the whole canvas.
fn draw_cover(pixmap: &mut Pixmap, image: &Pixmap) {
    let (canvas_w, canvas_h) = (pixmap.width() as f32, pixmap.height() as f32);
    let (image_w, image_h) = (image.width() as f32, image.height() as f32);
    let k = (canvas_w / image_w).max(canvas_h / image_h);
    let transform = Transform::from_row(
        k,
        0.0,
        0.0,
        k,
        (canvas_w - image_w * k) / 2.0,
        (canvas_h - image_h * k) / 2.0,
    );
    let paint = PixmapPaint {
        quality: FilterQuality::Bicubic,
        ..PixmapPaint::default()
    };
    pixmap.draw_pixmap(0, 0, image.as_ref(), &paint, transform, None);
}

fn premultiply(rgba: &[u8], out: &mut Vec<u8>) {
    for px in rgba.chunks_exact(4) {
        let color = ColorU8::from_rgba(px[0], px[1], px[2], px[3]).premultiply();
        out.extend_from_slice(&[color.red(), color.green(), color.blue(), color.alpha()]);
    }
}

fn full_pixmap(image: &ImageData) -> Option<Pixmap> {
    let mut data = Vec::with_capacity(image.rgba_bytes().len());
    premultiply(image.rgba_bytes(), &mut data);
    Pixmap::from_vec(data, IntSize::from_wh(image.width, image.height)?)
}

/// Crops the largest centered square, like `object-fit: cover` in a circle.
fn center_square_pixmap(image: &ImageData) -> Option<Pixmap> {
    let side = image.width.min(image.height);
    if side == 0 {
        return None;
    }
    let x0 = ((image.width - side) / 2) as usize;
    let y0 = ((image.height - side) / 2) as usize;
    let stride = image.width as usize * 4;
    let row_len = side as usize * 4;
    let bytes = image.rgba_bytes();
    if bytes.len() < stride * image.height as usize {
        return None;
    }

    let mut data = Vec::with_capacity(row_len * side as usize);
    for row in y0..y0 + side as usize {
        let start = row * stride + x0 * 4;
        premultiply(&bytes[start..start + row_len], &mut data);
    }
    Pixmap::from_vec(data, IntSize::from_wh(side, side)?)
}

/// Builds the SVG document holding every text layer, in layout pixels.
fn text_svg(texts: &[TextLayer], font_family: &str, width: f32, height: f32) -> String {
    let mut svg = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}">"#,
        width, height
    );
    for text in texts {
        let anchor = match text.anchor {
            TextAnchor::Start => "start",
            TextAnchor::End => "end",
        };
        let weight = if text.bold { "bold" } else { "normal" };
        let _ = write!(
            svg,
            r#"<text x="{}" y="{}" font-family="{}" font-size="{}" font-weight="{}" fill="{}" fill-opacity="{}" text-anchor="{}">{}</text>"#,
            text.x,
            text.baseline,
            quick_xml::escape::escape(font_family),
            text.font_size,
            weight,
            RgbaColor { a: 255, ..text.color },
            f32::from(text.color.a) / 255.0,
            anchor,
            quick_xml::escape::escape(text.text.as_str()),
        );
    }
    svg.push_str("</svg>");
    svg
}

fn draw_text_layers(
    pixmap: &mut Pixmap,
    texts: &[TextLayer],
    font_family: &str,
    width: f32,
    height: f32,
    scale: f32,
) -> Result<(), RasterError> {
    let svg = text_svg(texts, font_family, width, height);
    let options = usvg::Options {
        fontdb: font_database(),
        ..usvg::Options::default()
    };
    let tree =
        usvg::Tree::from_str(&svg, &options).map_err(|e| RasterError::Layer(e.to_string()))?;
    resvg::render(&tree, Transform::from_scale(scale, scale), &mut pixmap.as_mut());
    Ok(())
}
