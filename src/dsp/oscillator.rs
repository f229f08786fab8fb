use std::f64::consts::TAU;
use std::fmt;
use std::str::FromStr;

use rand::{rngs::StdRng, Rng, SeedableRng};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{check_range, Result, SynthError};

/*
Audio Oscillator
================

An oscillator is the fundamental sound source in a synthesizer. It generates
a repeating waveform at a specific frequency (pitch), producing the raw
audio material that gets shaped by envelopes, filters, and effects.

Waveforms
---------

  Sine      A·sin(ωt + φ)
            Pure tone, fundamental only.

  Square    A·sign(sin(ωt + φ))
            Odd harmonics, hollow. sign(0) is 0, so the zero crossings
            emit exact silence.

  Sawtooth  A·2·(ft − floor(0.5 + ft))
            All harmonics, bright and buzzy.

  Triangle  A·(2·|2·(ft − floor(0.5 + ft))| − 1)
            Odd harmonics falling off as 1/n², soft.

  Pulse     +A for the first `duty_cycle` fraction of each period, −A for
            the rest. duty_cycle = 0.5 is a square wave.

  Noise     Uniform in [−A, A]. No pitch.

For the ramp shapes `ft` is measured in cycles, so the phase offset φ
(radians) shifts them by φ/2π of a period.


Time Origin
-----------

Every periodic sample is a pure function of its absolute sample index n:

    t = n / sample_rate

The oscillator keeps a running index and advances it by the number of
samples emitted. Rendering 512 samples at once or 4 × 128 samples produces
the same waveform, because time never restarts at zero for a new block.


Noise
-----

Noise comes from a PRNG seeded with a fixed constant when the oscillator is
built. Two oscillators built the same way play the same noise sequence,
which keeps renders reproducible. The stream only moves forward, so noise
continues across blocks but ignores an explicit origin.
*/

/// Seed for the noise waveform's generator.
pub const NOISE_SEED: u64 = 2024;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Square,
    Sawtooth,
    Triangle,
    Pulse,
    Noise,
}

impl FromStr for Waveform {
    type Err = SynthError;

    fn from_str(name: &str) -> Result<Self> {
        match name.to_ascii_lowercase().as_str() {
            "sine" => Ok(Waveform::Sine),
            "square" => Ok(Waveform::Square),
            "sawtooth" | "saw" => Ok(Waveform::Sawtooth),
            "triangle" => Ok(Waveform::Triangle),
            "pulse" => Ok(Waveform::Pulse),
            "noise" => Ok(Waveform::Noise),
            other => Err(SynthError::Configuration(format!(
                "unsupported waveform `{other}`"
            ))),
        }
    }
}

impl fmt::Display for Waveform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Waveform::Sine => "sine",
            Waveform::Square => "square",
            Waveform::Sawtooth => "sawtooth",
            Waveform::Triangle => "triangle",
            Waveform::Pulse => "pulse",
            Waveform::Noise => "noise",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone)]
pub struct Oscillator {
    waveform: Waveform,
    frequency: f32,
    amplitude: f32,
    phase: f32,      // radians
    duty_cycle: f32, // pulse only, 0.0 - 1.0
    sample_rate: f32,

    position: u64, // absolute index of the next sample
    noise: StdRng,
}

impl Oscillator {
    pub fn new(waveform: Waveform, frequency: f32, sample_rate: f32) -> Self {
        Self {
            waveform,
            frequency,
            amplitude: 1.0,
            phase: 0.0,
            duty_cycle: 0.5,
            sample_rate,
            position: 0,
            noise: StdRng::seed_from_u64(NOISE_SEED),
        }
    }

    pub fn with_amplitude(mut self, amplitude: f32) -> Self {
        self.amplitude = amplitude;
        self
    }

    pub fn with_phase(mut self, phase: f32) -> Self {
        self.phase = phase;
        self
    }

    pub fn with_duty_cycle(mut self, duty_cycle: f32) -> Result<Self> {
        self.set_duty_cycle(duty_cycle)?;
        Ok(self)
    }

    pub fn set_waveform(&mut self, waveform: Waveform) {
        self.waveform = waveform;
    }

    pub fn set_frequency(&mut self, frequency: f32) {
        self.frequency = frequency;
    }

    pub fn set_amplitude(&mut self, amplitude: f32) {
        self.amplitude = amplitude;
    }

    pub fn set_phase(&mut self, phase: f32) {
        self.phase = phase;
    }

    pub fn set_duty_cycle(&mut self, duty_cycle: f32) -> Result<()> {
        check_range("duty_cycle", duty_cycle, 0.0, 1.0, "a value in [0, 1]")?;
        self.duty_cycle = duty_cycle;
        Ok(())
    }

    /// Rewind to sample index 0 and reseed the noise generator.
    pub fn reset(&mut self) {
        self.position = 0;
        self.noise = StdRng::seed_from_u64(NOISE_SEED);
    }

    /// Fill `out` starting at the running sample index, then advance it.
    pub fn render(&mut self, out: &mut [f32]) {
        if self.waveform == Waveform::Noise {
            let amplitude = self.amplitude;
            for sample in out.iter_mut() {
                *sample = amplitude * self.noise.gen_range(-1.0f32..=1.0);
            }
        } else {
            for (i, sample) in out.iter_mut().enumerate() {
                *sample = self.sample_at(self.position + i as u64);
            }
        }

        self.position += out.len() as u64;
    }

    /// Render with an explicit time origin (absolute sample index).
    pub fn render_from(&mut self, out: &mut [f32], origin: u64) {
        self.position = origin;
        self.render(out);
    }

    pub fn generate(&mut self, num_samples: usize) -> Vec<f32> {
        let mut out = vec![0.0; num_samples];
        self.render(&mut out);
        out
    }

    /// Value at absolute sample index `n`, independent of the running
    /// index. Noise has no closed form and reads as 0 here.
    pub fn sample_at(&self, n: u64) -> f32 {
        let t = n as f64 / self.sample_rate as f64;
        let frequency = self.frequency as f64;
        let phase = self.phase as f64;
        let amplitude = self.amplitude as f64;

        let value = match self.waveform {
            Waveform::Sine => (TAU * frequency * t + phase).sin(),
            Waveform::Square => {
                let s = (TAU * frequency * t + phase).sin();
                if s > 0.0 {
                    1.0
                } else if s < 0.0 {
                    -1.0
                } else {
                    0.0
                }
            }
            Waveform::Sawtooth => {
                let ft = frequency * t + phase / TAU;
                2.0 * (ft - (0.5 + ft).floor())
            }
            Waveform::Triangle => {
                let ft = frequency * t + phase / TAU;
                2.0 * (2.0 * (ft - (0.5 + ft).floor())).abs() - 1.0
            }
            Waveform::Pulse => {
                let angle = (TAU * frequency * t + phase).rem_euclid(TAU);
                if angle < TAU * self.duty_cycle as f64 {
                    1.0
                } else {
                    -1.0
                }
            }
            Waveform::Noise => 0.0,
        };

        (amplitude * value) as f32
    }

    pub fn waveform(&self) -> Waveform {
        self.waveform
    }

    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    /// Absolute index of the next sample to be rendered.
    pub fn position(&self) -> u64 {
        self.position
    }
}
