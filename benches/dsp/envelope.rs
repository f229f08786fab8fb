//! Benchmarks for the AHDSR envelope generator.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use streamsynth::dsp::{Envelope, EnvelopeConfig, EnvelopeCurve};

use crate::BLOCK_SIZES;

const SAMPLE_RATE: f32 = 48_000.0;

pub fn bench_envelope(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/envelope");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        // Attack phase (ramping up), one per curve shape
        for (name, curve) in [
            ("attack_linear", EnvelopeCurve::Linear),
            ("attack_exponential", EnvelopeCurve::Exponential),
            ("attack_logarithmic", EnvelopeCurve::Logarithmic),
        ] {
            let config = EnvelopeConfig::adsr(10.0, 0.1, 0.7, 0.3).with_curve(curve);
            let mut env = Envelope::new(config, SAMPLE_RATE).unwrap();
            env.trigger_on();
            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, _| {
                b.iter(|| {
                    env.render(black_box(&mut buffer));
                })
            });
        }

        // Sustain phase (holding steady)
        let mut env = Envelope::adsr(0.001, 0.001, 0.7, 0.3, SAMPLE_RATE).unwrap();
        env.trigger_on();
        // Advance past attack/decay
        for _ in 0..200 {
            env.next_sample();
        }
        group.bench_with_input(BenchmarkId::new("sustain", size), &size, |b, _| {
            b.iter(|| {
                env.render(black_box(&mut buffer));
            })
        });

        // Release phase (ramping down)
        let mut env = Envelope::adsr(0.001, 0.001, 0.7, 100.0, SAMPLE_RATE).unwrap();
        env.trigger_on();
        for _ in 0..200 {
            env.next_sample();
        }
        env.trigger_off();
        group.bench_with_input(BenchmarkId::new("release", size), &size, |b, _| {
            b.iter(|| {
                env.render(black_box(&mut buffer));
            })
        });
    }

    group.finish();
}
