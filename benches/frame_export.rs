// SPDX-License-Identifier: MPL-2.0
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use goru_frame::domain::frame::{ExportQuality, ExportScale, Offset, ZoomFactor};
use goru_frame::media::frame_export::encode_png;
use goru_frame::media::image::default_template;
use goru_frame::media::{
    Captions, CompositionRoot, FrameLayout, ImageRef, PhotoSource, RasterOptions, Rasterizer,
    SoftwareRasterizer,
};
use std::hint::black_box;

fn sample_root() -> CompositionRoot {
    let layout = FrameLayout::default();
    // Gradient so the photo resampling has real work to do
    let (width, height) = (640u32, 480u32);
    let mut pixels = Vec::with_capacity((width * height * 4) as usize);
    for y in 0..height {
        for x in 0..width {
            pixels.extend_from_slice(&[(x % 256) as u8, (y % 256) as u8, 128, 255]);
        }
    }
    let captions = Captions {
        name: "Abu Sayed".into(),
        info: String::new(),
    };
    CompositionRoot {
        texts: layout.text_layers(&captions),
        template: default_template().ok().map(ImageRef::Decoded),
        photo: PhotoSource::from_rgba("bench.png", width, height, pixels),
        offset: Offset::new(20.0, -15.0),
        zoom: ZoomFactor::new(1.6),
        layout,
    }
}

fn rasterize_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("rasterize");
    group.sample_size(20);

    let root = sample_root();
    let rasterizer = SoftwareRasterizer::new();

    for scale in [1.0_f32, 4.0] {
        let options = RasterOptions {
            scale: ExportScale::new(scale),
            ..RasterOptions::default()
        };
        group.bench_with_input(BenchmarkId::from_parameter(scale), &options, |b, options| {
            b.iter(|| black_box(rasterizer.rasterize(&root, options)));
        });
    }

    group.finish();
}

fn encode_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode_png");
    group.sample_size(20);

    let root = sample_root();
    let options = RasterOptions::default();
    let Ok(bitmap) = SoftwareRasterizer::new().rasterize(&root, &options) else {
        return;
    };

    for quality in [0.2_f32, 1.0] {
        let quality = ExportQuality::new(quality);
        group.bench_with_input(
            BenchmarkId::from_parameter(quality.value()),
            &quality,
            |b, quality| {
                b.iter(|| black_box(encode_png(&bitmap, *quality)));
            },
        );
    }

    group.finish();
}

criterion_group!(benches, rasterize_benchmark, encode_benchmark);
criterion_main!(benches);
