//! Benchmarks for gesture classification and debouncing

use body_gesture_analysis::{
    debounce::GestureDebouncer,
    gesture::GestureClassifier,
    landmarks::{hand, Landmark},
};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::Rng;
use std::time::Duration;

/// Hand with the given fingers (index, middle, ring, pinky) extended
fn hand_shape(extended: [bool; 4], thumb_tip_y: f32) -> Vec<Landmark> {
    let mut points = vec![Landmark::new(0.5, 0.9, 1.0); 21];
    points[hand::THUMB_MCP] = Landmark::new(0.4, 0.8, 1.0);
    points[hand::THUMB_TIP] = Landmark::new(0.35, thumb_tip_y, 1.0);
    let fingers = [
        (hand::INDEX_PIP, hand::INDEX_TIP),
        (hand::MIDDLE_PIP, hand::MIDDLE_TIP),
        (hand::RING_PIP, hand::RING_TIP),
        (hand::PINKY_PIP, hand::PINKY_TIP),
    ];
    for ((pip, tip), up) in fingers.into_iter().zip(extended) {
        points[pip] = Landmark::new(0.5, 0.8, 1.0);
        points[tip] = Landmark::new(0.5, if up { 0.6 } else { 0.8 }, 1.0);
    }
    points
}

fn bench_classify(c: &mut Criterion) {
    let mut group = c.benchmark_group("classify");
    let classifier = GestureClassifier::new();

    let shapes = [
        ("point", hand_shape([true, false, false, false], 0.85)),
        ("open_palm", hand_shape([true; 4], 0.85)),
        ("thumbs_down", hand_shape([false, false, true, false], 0.95)),
        ("unmatched", hand_shape([false, true, false, false], 0.85)),
    ];
    for (name, points) in &shapes {
        group.bench_with_input(BenchmarkId::new("shape", name), points, |b, points| {
            b.iter(|| black_box(classifier.classify(black_box(points))));
        });
    }

    // Noisy hands around an open palm, as a jittery model would report
    let mut rng = rand::thread_rng();
    let base = hand_shape([true; 4], 0.85);
    let noisy: Vec<Vec<Landmark>> = (0..100)
        .map(|_| {
            base.iter()
                .map(|p| Landmark::new(p.x + rng.gen_range(-0.02..0.02), p.y + rng.gen_range(-0.02..0.02), 1.0))
                .collect()
        })
        .collect();
    group.bench_function("noisy_sequence_100", |b| {
        b.iter(|| {
            for points in &noisy {
                black_box(classifier.classify(points));
            }
        });
    });

    group.finish();
}

fn bench_debounce(c: &mut Criterion) {
    let classifier = GestureClassifier::new();
    let points = hand_shape([true, true, false, false], 0.85);
    let Some(classified) = classifier.classify(&points) else {
        return;
    };

    c.bench_function("debounce_30fps_10s", |b| {
        b.iter(|| {
            let mut debouncer = GestureDebouncer::default();
            for frame in 0..300u64 {
                let event = classified.at(Duration::from_millis(frame * 33));
                black_box(debouncer.observe(event));
            }
        });
    });
}

criterion_group!(benches, bench_classify, bench_debounce);
criterion_main!(benches);
