//! Benchmarks for complete engines: voices → mixer → filter → effects.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use streamsynth::dsp::{FilterConfig, Waveform};
use streamsynth::effects::EffectDescriptor;
use streamsynth::{SynthConfig, SynthEngine};

use crate::BLOCK_SIZES;

pub fn bench_engine(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/engine");

    // === PLAIN ===
    // default config, 8-voice chord, no effects
    let plain = SynthConfig::default();

    // === PAD ===
    // saw voices through a steep low-pass, chorus and reverb
    let pad = SynthConfig::default()
        .with_waveform(Waveform::Sawtooth)
        .with_filter(FilterConfig::lowpass(2_500.0, 6))
        .with_effect(EffectDescriptor::Chorus {
            depth: 0.003,
            rate: 0.7,
            mix: 0.4,
        })
        .with_effect(EffectDescriptor::Reverb {
            decay: 0.5,
            room_size: 0.04,
        });

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        for (name, config) in [("plain", &plain), ("pad", &pad)] {
            let (mut engine, _notes) = SynthEngine::new(config.clone()).unwrap();
            for note in [48, 52, 55, 60, 64, 67, 71, 72] {
                engine.note_on(note, 0.6).unwrap();
            }

            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, _| {
                b.iter(|| {
                    engine.render(black_box(&mut buffer));
                })
            });
        }
    }

    group.finish();
}
