//! Benchmarks for anchor smoothing

use accessory_overlay::filters::{smooth_angle, smooth_value, AnchorId, SmoothingFilter};
use accessory_overlay::pose::Pose;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

/// Jittery anchor track with a deterministic noise pattern
fn noisy_track(len: usize) -> Vec<Pose> {
    (0..len)
        .map(|i| {
            let t = i as f64 * 0.05;
            let noise = ((i * 17) % 11) as f64 / 11.0 - 0.5;
            Pose::new(
                400.0 + 80.0 * t.sin() + 3.0 * noise,
                300.0 + 40.0 * t.cos() - 2.0 * noise,
                (t * 0.7).sin() * 3.0,
                45.0 + noise,
            )
        })
        .collect()
}

fn benchmark_scalar_smoothing(c: &mut Criterion) {
    let mut group = c.benchmark_group("scalar_smoothing");

    group.bench_function("linear", |b| {
        b.iter(|| black_box(smooth_value(black_box(Some(100.0)), black_box(140.0), black_box(0.3))));
    });
    group.bench_function("circular_wrapping", |b| {
        b.iter(|| black_box(smooth_angle(black_box(Some(3.0)), black_box(-3.0), black_box(0.18))));
    });

    group.finish();
}

fn benchmark_anchor_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("anchor_filter");
    let track = noisy_track(300);

    for anchor in [AnchorId::RingHand, AnchorId::LeftEar, AnchorId::Necklace] {
        group.bench_with_input(BenchmarkId::new("sequence_300", anchor), &track, |b, track| {
            let mut filter = SmoothingFilter::default();
            b.iter(|| {
                filter.reset();
                for pose in track {
                    black_box(filter.update(anchor, black_box(*pose)));
                }
            });
        });
    }

    // Visibility flickering every fourth frame exercises the loss policies
    group.bench_with_input(BenchmarkId::new("flicker_300", "all_anchors"), &track, |b, track| {
        let mut filter = SmoothingFilter::default();
        b.iter(|| {
            for (i, pose) in track.iter().enumerate() {
                for anchor in AnchorId::ALL {
                    if i % 4 == 0 {
                        filter.mark_lost(anchor);
                    } else {
                        black_box(filter.update(anchor, *pose));
                    }
                }
            }
        });
    });

    group.finish();
}

criterion_group!(benches, benchmark_scalar_smoothing, benchmark_anchor_filter);
criterion_main!(benches);
