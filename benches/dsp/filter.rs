//! Benchmarks for the streaming Butterworth filter.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use streamsynth::dsp::{FilterConfig, StreamingFilter};

use crate::BLOCK_SIZES;

const SAMPLE_RATE: f32 = 48_000.0;

pub fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/filter");

    let configs = [
        ("lowpass_2", FilterConfig::lowpass(1_000.0, 2)),
        ("lowpass_8", FilterConfig::lowpass(1_000.0, 8)),
        ("highpass_4", FilterConfig::highpass(1_000.0, 4)),
        ("bandpass_4", FilterConfig::bandpass(500.0, 2_000.0, 4)),
        ("bandstop_4", FilterConfig::bandstop(500.0, 2_000.0, 4)),
    ];

    for &size in BLOCK_SIZES {
        // Generate a test signal (sawtooth-like ramp)
        let input: Vec<f32> = (0..size)
            .map(|i| (i as f32 / size as f32) * 2.0 - 1.0)
            .collect();

        for (name, config) in configs {
            let mut filter = StreamingFilter::new(config, SAMPLE_RATE).unwrap();
            let mut buffer = input.clone();
            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, _| {
                b.iter(|| {
                    buffer.copy_from_slice(&input);
                    filter.apply(black_box(&mut buffer));
                })
            });
        }
    }

    group.finish();
}
