//! Low Frequency Oscillator (LFO) phase accumulator.

use std::f64::consts::TAU;

/*
Low Frequency Oscillators
=========================

An LFO is an oscillator running below the audio band (~0.01 - 20 Hz) whose
output moves an effect parameter instead of being heard directly: the
tremolo gain, the chorus read position.

  bipolar     -1.0 to +1.0, what sin() gives us
  unipolar     0.0 to +1.0, (bipolar + 1) / 2

Phase
-----

The phase is kept in cycles (0.0 - 1.0) and advanced by rate / sample_rate
every sample:

    value(n) = sin(2π · phase(n))
    phase(n) = frac(n · rate / sample_rate)

The accumulator belongs to the effect instance and is never reset between
blocks, so the modulation carries on seamlessly from one block to the next.
A rate of 0 Hz holds the phase at 0, i.e. sin(0) = 0.
*/

pub struct Lfo {
    phase: f64,     // cycles, 0.0 - 1.0
    increment: f64, // cycles per sample
}

impl Lfo {
    pub fn new(rate_hz: f32, sample_rate: f32) -> Self {
        Self {
            phase: 0.0,
            increment: rate_hz as f64 / sample_rate as f64,
        }
    }

    /// Current bipolar value, then advance one sample.
    #[inline]
    pub fn next_sample(&mut self) -> f32 {
        let value = (TAU * self.phase).sin();
        self.phase = (self.phase + self.increment).fract();
        value as f32
    }

    pub fn phase(&self) -> f64 {
        self.phase
    }

    pub fn reset(&mut self) {
        self.phase = 0.0;
    }
}

/// Convert bipolar signal (-1.0 to +1.0) to unipolar (0.0 to 1.0).
#[inline]
pub fn bipolar_to_unipolar(bipolar: f32) -> f32 {
    (bipolar + 1.0) * 0.5
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bipolar_to_unipolar() {
        assert_eq!(bipolar_to_unipolar(-1.0), 0.0);
        assert_eq!(bipolar_to_unipolar(0.0), 0.5);
        assert_eq!(bipolar_to_unipolar(1.0), 1.0);
    }

    #[test]
    fn zero_rate_holds_phase() {
        let mut lfo = Lfo::new(0.0, 48_000.0);
        for _ in 0..100 {
            assert_eq!(lfo.next_sample(), 0.0);
        }
    }

    #[test]
    fn quarter_period_peaks() {
        // 1 Hz at 400 Hz sample rate: peak at sample 100
        let mut lfo = Lfo::new(1.0, 400.0);
        let values: Vec<f32> = (0..400).map(|_| lfo.next_sample()).collect();
        assert!((values[100] - 1.0).abs() < 1e-6);
        assert!((values[300] + 1.0).abs() < 1e-6);
        assert!(lfo.phase() < 1e-9 || lfo.phase() > 1.0 - 1e-9, "wrapped after one cycle");
    }
}
