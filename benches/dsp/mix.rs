//! Benchmarks for signal mixing operations.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use streamsynth::dsp::mix::{blend_dry_wet, Mixer};

use crate::BLOCK_SIZES;

pub fn bench_mix(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/mix");

    for &size in BLOCK_SIZES {
        // Generate test signals
        let signals: Vec<Vec<f32>> = (0..8)
            .map(|k| {
                (0..size)
                    .map(|i| (i as f32 * 0.01 * (k + 1) as f32).sin())
                    .collect()
            })
            .collect();
        let mut output = vec![0.0f32; size];
        let mut mixer = Mixer::new(size);

        // Two weighted signals
        group.bench_with_input(BenchmarkId::new("two_signals", size), &size, |b, _| {
            b.iter(|| {
                mixer.add_signal(black_box(&signals[0]), 0.8);
                mixer.add_signal(black_box(&signals[1]), 0.5);
                mixer.mix(black_box(&mut output));
            })
        });

        // Full default polyphony
        group.bench_with_input(BenchmarkId::new("eight_signals", size), &size, |b, _| {
            b.iter(|| {
                for signal in &signals {
                    mixer.add_signal(black_box(signal), 0.7);
                }
                mixer.mix(black_box(&mut output));
            })
        });

        // Dry/wet mixing (common for effects)
        let dry = signals[0].clone();
        let wet = signals[1].clone();
        group.bench_with_input(BenchmarkId::new("dry_wet", size), &size, |b, _| {
            b.iter(|| {
                for ((o, &d), &w) in output.iter_mut().zip(&dry).zip(&wet) {
                    *o = blend_dry_wet(d, w, black_box(0.3));
                }
            })
        });
    }

    group.finish();
}
