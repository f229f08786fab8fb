//! Benchmarks for oscillator waveform generation.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use streamsynth::dsp::{Oscillator, Waveform};

use crate::BLOCK_SIZES;

const SAMPLE_RATE: f32 = 48_000.0;

pub fn bench_oscillator(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/oscillator");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        // Sine - f64 sin() per sample
        // Sawtooth, triangle - phase arithmetic only
        // Square, pulse - branch per sample
        // Noise - seeded StdRng
        for waveform in [
            Waveform::Sine,
            Waveform::Sawtooth,
            Waveform::Square,
            Waveform::Triangle,
            Waveform::Pulse,
            Waveform::Noise,
        ] {
            let mut osc = Oscillator::new(waveform, 440.0, SAMPLE_RATE);
            group.bench_with_input(
                BenchmarkId::new(waveform.to_string(), size),
                &size,
                |b, _| {
                    b.iter(|| {
                        osc.render(black_box(&mut buffer));
                    })
                },
            );
        }
    }

    group.finish();
}
