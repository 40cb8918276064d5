//! Benchmarks for the per-frame signal path

use blink_morse::blink::BlinkDetector;
use blink_morse::ear::{eye_aspect_ratio, EyeContour};
use blink_morse::morse::{classify_blink, decode, MorseAccumulator};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::time::{Duration, Instant};

fn benchmark_ear(c: &mut Criterion) {
    let eye: EyeContour = [
        (120.0, 80.0),
        (128.0, 76.0),
        (136.0, 76.0),
        (144.0, 80.0),
        (136.0, 84.0),
        (128.0, 84.0),
    ];

    c.bench_function("ear_single_contour", |b| {
        b.iter(|| black_box(eye_aspect_ratio(black_box(&eye))));
    });
}

fn benchmark_classification(c: &mut Criterion) {
    let dot_max = Duration::from_millis(500);
    let dash_max = Duration::from_millis(1000);
    let durations: Vec<Duration> = (0..100).map(|i| Duration::from_millis(i * 15)).collect();

    c.bench_function("classify_100_durations", |b| {
        b.iter(|| {
            for &d in &durations {
                black_box(classify_blink(black_box(d), dot_max, dash_max));
            }
        });
    });
}

fn benchmark_decode(c: &mut Criterion) {
    let sequences = [".-", "-...", "....", "---", "..-", "......", "-----"];

    c.bench_function("morse_table_lookup", |b| {
        b.iter(|| {
            for seq in &sequences {
                black_box(decode(black_box(seq)));
            }
        });
    });
}

fn benchmark_blink_stream(c: &mut Criterion) {
    // Simulated EAR stream at 30 fps: mostly open, one blink per second
    let stream: Vec<f64> = (0..300)
        .map(|i| if i % 30 < 4 { 0.1 } else { 0.3 })
        .collect();

    c.bench_function("blink_stream_300_frames", |b| {
        b.iter(|| {
            let t0 = Instant::now();
            let mut detector = BlinkDetector::new(0.2, t0);
            let mut morse = MorseAccumulator::new(Duration::from_secs(3));
            for (i, &ear) in stream.iter().enumerate() {
                let now = t0 + Duration::from_millis(i as u64 * 33);
                if let Some(event) = detector.update(ear, now) {
                    if let Some(symbol) = classify_blink(
                        event.duration,
                        Duration::from_millis(500),
                        Duration::from_millis(1000),
                    ) {
                        morse.push(symbol);
                    }
                }
                black_box(morse.tick(detector.idle_time(now)));
            }
            black_box(morse.text().len())
        });
    });
}

criterion_group!(
    benches,
    benchmark_ear,
    benchmark_classification,
    benchmark_decode,
    benchmark_blink_stream
);
criterion_main!(benches);
