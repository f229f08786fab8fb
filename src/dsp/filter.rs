use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::dsp::butterworth::{self, Band, Coefficients};
use crate::error::{Result, SynthError};

/*
| type      | cutoff        | passes          | rejects         |
| --------- | ------------- | --------------- | --------------- |
| low-pass  | Single(f)     | below f         | above f         |
| high-pass | Single(f)     | above f         | below f         |
| band-pass | Band(lo, hi)  | between lo, hi  | outside         |
| band-stop | Band(lo, hi)  | outside         | between lo, hi  |

Streaming
---------

The filter runs the recursive difference equation in transposed direct
form II. For coefficients b, a (a[0] = 1) of length n and a delay line z of
n − 1 values:

    y    = b[0]·x + z[0]
    z[i] = b[i+1]·x − a[i+1]·y + z[i+1]      (z[n−1] taken as 0)

z is the only memory, and it lives on the filter between calls. Filtering a
buffer in one call or in several consecutive chunks therefore runs the
exact same arithmetic in the exact same order.

Changing the cutoff, order or type redesigns the coefficients and zeroes z.
The old memory means nothing to the new coefficients, so the output can
jump at that point; that discontinuity is accepted.
*/

/// Highest supported prototype order. Band designs double it.
pub const MAX_FILTER_ORDER: usize = 12;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterType {
    LowPass,
    HighPass,
    BandPass,
    BandStop,
}

impl FromStr for FilterType {
    type Err = SynthError;

    fn from_str(name: &str) -> Result<Self> {
        match name.to_ascii_lowercase().as_str() {
            "lowpass" => Ok(FilterType::LowPass),
            "highpass" => Ok(FilterType::HighPass),
            "bandpass" => Ok(FilterType::BandPass),
            "bandstop" => Ok(FilterType::BandStop),
            other => Err(SynthError::Configuration(format!(
                "unsupported filter type `{other}`"
            ))),
        }
    }
}

impl FilterType {
    pub fn is_band(self) -> bool {
        matches!(self, FilterType::BandPass | FilterType::BandStop)
    }
}

/// Cutoff frequency in Hz: one edge for low/high-pass, two for band types.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cutoff {
    Single(f32),
    Band(f32, f32),
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterConfig {
    pub filter_type: FilterType,
    pub cutoff: Cutoff,
    pub order: usize,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self::lowpass(5_000.0, 2)
    }
}

impl FilterConfig {
    pub fn lowpass(cutoff_hz: f32, order: usize) -> Self {
        Self {
            filter_type: FilterType::LowPass,
            cutoff: Cutoff::Single(cutoff_hz),
            order,
        }
    }

    pub fn highpass(cutoff_hz: f32, order: usize) -> Self {
        Self {
            filter_type: FilterType::HighPass,
            cutoff: Cutoff::Single(cutoff_hz),
            order,
        }
    }

    pub fn bandpass(low_hz: f32, high_hz: f32, order: usize) -> Self {
        Self {
            filter_type: FilterType::BandPass,
            cutoff: Cutoff::Band(low_hz, high_hz),
            order,
        }
    }

    pub fn bandstop(low_hz: f32, high_hz: f32, order: usize) -> Self {
        Self {
            filter_type: FilterType::BandStop,
            cutoff: Cutoff::Band(low_hz, high_hz),
            order,
        }
    }

    /// Check the shape against `sample_rate` and normalize it to Nyquist.
    fn band(&self, sample_rate: f32) -> Result<Band> {
        if self.order == 0 || self.order > MAX_FILTER_ORDER {
            return Err(SynthError::Configuration(format!(
                "filter order must be in 1..={MAX_FILTER_ORDER}, got {}",
                self.order
            )));
        }

        let nyquist = 0.5 * sample_rate as f64;
        let normalize = |hz: f32| -> Result<f64> {
            let w = hz as f64 / nyquist;
            if w.is_finite() && w > 0.0 && w < 1.0 {
                Ok(w)
            } else {
                Err(SynthError::Configuration(format!(
                    "cutoff {hz} Hz must lie strictly between 0 and Nyquist ({nyquist} Hz)"
                )))
            }
        };

        match (self.filter_type, self.cutoff) {
            (FilterType::LowPass, Cutoff::Single(f)) => Ok(Band::LowPass(normalize(f)?)),
            (FilterType::HighPass, Cutoff::Single(f)) => Ok(Band::HighPass(normalize(f)?)),
            (kind, Cutoff::Band(lo, hi)) if kind.is_band() => {
                let (lo, hi) = (normalize(lo)?, normalize(hi)?);
                if lo >= hi {
                    return Err(SynthError::Configuration(format!(
                        "band cutoff needs low < high, got ({}, {}) Hz",
                        lo * nyquist,
                        hi * nyquist
                    )));
                }
                Ok(match kind {
                    FilterType::BandPass => Band::BandPass(lo, hi),
                    _ => Band::BandStop(lo, hi),
                })
            }
            (kind, Cutoff::Single(_)) => Err(SynthError::Configuration(format!(
                "{kind:?} needs a (low, high) cutoff pair"
            ))),
            (kind, Cutoff::Band(..)) => Err(SynthError::Configuration(format!(
                "{kind:?} needs a single cutoff frequency"
            ))),
        }
    }

    pub fn validate(&self, sample_rate: f32) -> Result<()> {
        self.band(sample_rate).map(|_| ())
    }
}

/// Butterworth IIR filter whose memory survives between calls.
pub struct StreamingFilter {
    config: FilterConfig,
    sample_rate: f32,
    b: Vec<f64>,
    a: Vec<f64>,
    z: Vec<f64>, // delay line, len = max(len(a), len(b)) - 1
}

impl StreamingFilter {
    pub fn new(config: FilterConfig, sample_rate: f32) -> Result<Self> {
        let Coefficients { b, a } = butterworth::design(config.order, config.band(sample_rate)?);
        let z = vec![0.0; b.len().max(a.len()) - 1];

        Ok(Self {
            config,
            sample_rate,
            b,
            a,
            z,
        })
    }

    /// Filter `buffer` in place, carrying the delay line forward.
    pub fn apply(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = step(&self.b, &self.a, &mut self.z, *sample as f64) as f32;
        }
    }

    pub fn apply_to_vec(&mut self, signal: &[f32]) -> Vec<f32> {
        let mut out = signal.to_vec();
        self.apply(&mut out);
        out
    }

    pub fn reset(&mut self) {
        self.z.fill(0.0);
    }

    /// Redesign with a new configuration. On error the current design stays.
    pub fn set_config(&mut self, config: FilterConfig) -> Result<()> {
        let designed = Self::new(config, self.sample_rate)?;
        *self = designed;
        log::debug!(
            "filter redesigned: {:?} {:?} order {}",
            config.filter_type,
            config.cutoff,
            config.order
        );
        Ok(())
    }

    pub fn set_cutoff(&mut self, cutoff: Cutoff) -> Result<()> {
        self.set_config(FilterConfig {
            cutoff,
            ..self.config
        })
    }

    pub fn set_order(&mut self, order: usize) -> Result<()> {
        self.set_config(FilterConfig {
            order,
            ..self.config
        })
    }

    pub fn set_filter_type(&mut self, filter_type: FilterType) -> Result<()> {
        self.set_config(FilterConfig {
            filter_type,
            ..self.config
        })
    }

    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    /// (b, a) transfer-function coefficients.
    pub fn coefficients(&self) -> (&[f64], &[f64]) {
        (&self.b, &self.a)
    }

    pub fn delay_line(&self) -> &[f64] {
        &self.z
    }
}

/// One sample of the transposed direct-form II recursion.
#[inline]
fn step(b: &[f64], a: &[f64], z: &mut [f64], x: f64) -> f64 {
    let n = z.len();
    let y = b[0] * x + z.first().copied().unwrap_or(0.0);

    for i in 0..n {
        let carried = if i + 1 < n { z[i + 1] } else { 0.0 };
        z[i] = b[i + 1] * x - a[i + 1] * y + carried;
    }

    y
}
