//! Benchmarks for the effect stages and a full chain.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use streamsynth::effects::{EffectChain, EffectDescriptor};

use crate::BLOCK_SIZES;

const SAMPLE_RATE: f32 = 48_000.0;

pub fn bench_effects(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/effects");

    let reverb = EffectDescriptor::Reverb {
        decay: 0.6,
        room_size: 0.05,
    };
    let delay = EffectDescriptor::Delay {
        delay_time: 0.25,
        feedback: 0.4,
        mix: 0.3,
    };
    let chorus = EffectDescriptor::Chorus {
        depth: 0.003,
        rate: 1.0,
        mix: 0.4,
    };
    let tremolo = EffectDescriptor::Tremolo {
        depth: 0.5,
        rate: 5.0,
    };

    let stages: [(&str, &[EffectDescriptor]); 5] = [
        ("reverb", &[reverb]),
        ("delay", &[delay]),
        ("chorus", &[chorus]),
        ("tremolo", &[tremolo]),
        ("full_chain", &[chorus, delay, reverb, tremolo]),
    ];

    for &size in BLOCK_SIZES {
        let input: Vec<f32> = (0..size).map(|i| (i as f32 * 0.05).sin()).collect();

        for (name, descriptors) in stages {
            let mut chain = EffectChain::new(SAMPLE_RATE);
            for descriptor in descriptors {
                chain.push(*descriptor).unwrap();
            }
            let mut buffer = input.clone();
            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, _| {
                b.iter(|| {
                    buffer.copy_from_slice(&input);
                    chain.process(black_box(&mut buffer));
                })
            });
        }
    }

    group.finish();
}
