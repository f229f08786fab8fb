//! Benchmarks for the voice manager.
//!
//! Cost of rendering held chords, from a single note up to full polyphony.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use streamsynth::dsp::{EnvelopeConfig, Mixer, Waveform};
use streamsynth::synth::{VoiceConfig, VoiceManager};
use streamsynth::MAX_BLOCK_SIZE;

use crate::BLOCK_SIZES;

const SAMPLE_RATE: f32 = 48_000.0;

pub fn bench_voices(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/voices");
    // Long sustain so voices stay live for the whole run
    let voice = VoiceConfig::new(Waveform::Sawtooth, EnvelopeConfig::adsr(0.01, 0.1, 0.6, 0.2));

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];
        let mut mixer = Mixer::new(MAX_BLOCK_SIZE);

        for polyphony in [1usize, 4, 8, 16] {
            let mut manager = VoiceManager::new(polyphony, voice, SAMPLE_RATE).unwrap();
            for k in 0..polyphony {
                manager.note_on(48 + (k as u8) * 3, 0.7);
            }

            group.bench_with_input(
                BenchmarkId::new(format!("{polyphony}_voices"), size),
                &size,
                |b, _| {
                    b.iter(|| {
                        manager.render(black_box(&mut buffer), &mut mixer);
                    })
                },
            );
        }
    }

    group.finish();
}
