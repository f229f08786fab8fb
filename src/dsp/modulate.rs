//! Amplitude and frequency modulation of a carrier by a modulator signal.

use std::f64::consts::TAU;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Result, SynthError};

/*
Modulation
==========

  carrier     the signal being shaped (an oscillator buffer)
  modulator   the control signal doing the shaping
  index       modulation depth

AM
--

The modulator is normalized to its own peak, then bends the carrier's
amplitude around unity:

    out[i] = (1 + index · m[i] / max|m|) · carrier[i]

index = 1 swings the gain between 0 and 2. An all-zero modulator leaves the
carrier untouched.

FM
--

The modulator is added to the phase of a cosine at the carrier frequency:

    out[i] = cos(2π · fc · t[i] + index · m[i]),   t[i] = (origin + i) / sr

Only the carrier frequency matters here, not the carrier samples. `origin`
is the absolute sample index of the first sample, so a long FM signal can
be produced block by block without phase jumps.
*/

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModulationType {
    Am,
    Fm,
}

impl FromStr for ModulationType {
    type Err = SynthError;

    fn from_str(name: &str) -> Result<Self> {
        match name.to_ascii_lowercase().as_str() {
            "am" => Ok(ModulationType::Am),
            "fm" => Ok(ModulationType::Fm),
            other => Err(SynthError::Configuration(format!(
                "unsupported modulation type `{other}`"
            ))),
        }
    }
}

pub struct Modulator {
    modulation_type: ModulationType,
    index: f32,
}

impl Modulator {
    pub fn new(modulation_type: ModulationType, index: f32) -> Self {
        Self {
            modulation_type,
            index,
        }
    }

    pub fn set_modulation_type(&mut self, modulation_type: ModulationType) {
        self.modulation_type = modulation_type;
    }

    pub fn set_modulation_index(&mut self, index: f32) {
        self.index = index;
    }

    pub fn modulation_type(&self) -> ModulationType {
        self.modulation_type
    }

    /// Amplitude-modulate `carrier` in place.
    pub fn amplitude(&self, carrier: &mut [f32], modulator: &[f32]) {
        debug_assert_eq!(carrier.len(), modulator.len());

        let peak = modulator.iter().fold(0.0f32, |acc, &m| acc.max(m.abs()));
        if peak == 0.0 {
            return;
        }

        let scale = self.index / peak;
        for (c, &m) in carrier.iter_mut().zip(modulator) {
            *c *= 1.0 + scale * m;
        }
    }

    /// Write an FM signal at `carrier_hz` into `out`.
    pub fn frequency(
        &self,
        out: &mut [f32],
        modulator: &[f32],
        carrier_hz: f32,
        sample_rate: f32,
        origin: u64,
    ) {
        debug_assert_eq!(out.len(), modulator.len());

        let index = self.index as f64;
        for (i, (o, &m)) in out.iter_mut().zip(modulator).enumerate() {
            let t = (origin + i as u64) as f64 / sample_rate as f64;
            *o = (TAU * carrier_hz as f64 * t + index * m as f64).cos() as f32;
        }
    }

    /// Apply the configured modulation. `carrier` is modulated in place for
    /// AM and overwritten with the FM signal for FM.
    pub fn modulate(
        &self,
        carrier: &mut [f32],
        modulator: &[f32],
        carrier_hz: f32,
        sample_rate: f32,
        origin: u64,
    ) {
        match self.modulation_type {
            ModulationType::Am => self.amplitude(carrier, modulator),
            ModulationType::Fm => self.frequency(carrier, modulator, carrier_hz, sample_rate, origin),
        }
    }
}
