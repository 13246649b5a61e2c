//! Benchmarks for the per-frame overlay pipeline

use accessory_overlay::assets::{AccessoryAsset, AssetStore};
use accessory_overlay::constants::face::{FACE_OVAL, LEFT_EYE_OUTER, NECK_BASE, RIGHT_EYE_OUTER};
use accessory_overlay::constants::hand::{RING_FINGER_MCP, RING_FINGER_PIP};
use accessory_overlay::engine::{FrameSettings, OverlayEngine};
use accessory_overlay::filters::SmoothingFilter;
use accessory_overlay::landmarks::{FrameInput, LandmarkFrame, Viewport};
use accessory_overlay::resolvers::Mode;
use accessory_overlay::surface::{RasterSurface, RecordingSurface};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use image::{Rgba, RgbaImage};
use std::time::Duration;

fn face(cx: f64, cy: f64) -> LandmarkFrame {
    let mut points = vec![(cx, cy); 468];
    for (k, &index) in FACE_OVAL.iter().enumerate() {
        let t = k as f64 / FACE_OVAL.len() as f64 * std::f64::consts::TAU;
        points[index] = (cx + 0.15 * t.sin(), cy - 0.2 * t.cos());
    }
    points[RIGHT_EYE_OUTER] = (cx - 0.1, cy - 0.05);
    points[LEFT_EYE_OUTER] = (cx + 0.1, cy - 0.05);
    points[NECK_BASE] = (cx, cy + 0.17);
    LandmarkFrame::from(points)
}

fn hand(x: f64, y: f64) -> LandmarkFrame {
    let mut points = vec![(x, y); 21];
    points[RING_FINGER_MCP] = (x, y + 0.03);
    points[RING_FINGER_PIP] = (x, y - 0.02);
    LandmarkFrame::from(points)
}

/// A short head/hand sway, one input per frame
fn recorded_frames(len: usize) -> Vec<FrameInput> {
    (0..len)
        .map(|i| {
            let t = i as f64 * 0.1;
            let dx = 0.03 * t.sin();
            FrameInput {
                hands: vec![hand(0.3 + dx, 0.6), hand(0.7 - dx, 0.6)],
                face: Some(face(0.5 + dx, 0.45)),
            }
        })
        .collect()
}

fn engine() -> OverlayEngine {
    let sprite = |w, h| RgbaImage::from_pixel(w, h, Rgba([212, 175, 55, 200]));
    let mut store = AssetStore::new();
    store.insert(AccessoryAsset::preloaded("band", Mode::Rings, sprite(64, 64)));
    store.insert(AccessoryAsset::preloaded("aviators", Mode::Sunglasses, sprite(256, 96)));
    store.insert(AccessoryAsset::preloaded("drop", Mode::Earrings, sprite(32, 64)));
    store.insert(AccessoryAsset::preloaded("chain", Mode::Necklace, sprite(256, 128)));
    OverlayEngine::new(store, None, SmoothingFilter::default())
}

fn benchmark_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline");
    let frames = recorded_frames(60);
    let viewport = Viewport::new(1280.0, 720.0, 1.0);

    for mode in Mode::ALL {
        group.bench_with_input(BenchmarkId::new("recording_60", mode), &frames, |b, frames| {
            let mut engine = engine();
            let mut surface = RecordingSurface::new(viewport);
            let settings = FrameSettings::new(mode);
            b.iter(|| {
                for input in frames {
                    black_box(engine.process_frame(input, &settings, &mut surface));
                }
            });
        });
    }

    group.finish();
}

fn benchmark_raster(c: &mut Criterion) {
    let mut group = c.benchmark_group("raster");
    group.measurement_time(Duration::from_secs(10));
    let frames = recorded_frames(10);

    for mode in [Mode::Sunglasses, Mode::Earrings] {
        group.bench_with_input(BenchmarkId::new("frames_10", mode), &frames, |b, frames| {
            let mut engine = engine();
            let mut surface = RasterSurface::new(Viewport::new(640.0, 360.0, 1.0)).unwrap();
            let settings = FrameSettings::new(mode);
            b.iter(|| {
                for input in frames {
                    black_box(engine.process_frame(input, &settings, &mut surface));
                }
            });
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_pipeline, benchmark_raster);
criterion_main!(benches);
