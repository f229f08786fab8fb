//! Post-mix effect chain: reverb, feedback delay, chorus and tremolo.
//!
//! Stages are described by an [`EffectDescriptor`], validated once, then
//! built into stateful processors that run in order on the mixed signal.
//! Every stage keeps its history across calls to [`EffectChain::process`].

use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{check_range, Result, SynthError};

pub mod chorus;
pub mod delay;
pub mod reverb;
pub mod tremolo;

pub use chorus::Chorus;
pub use delay::Delay;
pub use reverb::Reverb;
pub use tremolo::Tremolo;

/// Longest room size or delay time, in seconds.
pub const MAX_EFFECT_TIME: f32 = 10.0;

/// Largest value strictly below 1.0, the top of the feedback ranges.
const BELOW_ONE: f32 = 1.0 - f32::EPSILON / 2.0;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectKind {
    Reverb,
    Delay,
    Chorus,
    Tremolo,
}

impl EffectKind {
    /// Parameter names the kind requires, in descriptor order.
    pub fn parameters(self) -> &'static [&'static str] {
        match self {
            EffectKind::Reverb => &["decay", "room_size"],
            EffectKind::Delay => &["delay_time", "feedback", "mix"],
            EffectKind::Chorus => &["depth", "rate", "mix"],
            EffectKind::Tremolo => &["depth", "rate"],
        }
    }

    fn name(self) -> &'static str {
        match self {
            EffectKind::Reverb => "reverb",
            EffectKind::Delay => "delay",
            EffectKind::Chorus => "chorus",
            EffectKind::Tremolo => "tremolo",
        }
    }
}

impl FromStr for EffectKind {
    type Err = SynthError;

    fn from_str(name: &str) -> Result<Self> {
        match name.to_ascii_lowercase().as_str() {
            "reverb" => Ok(EffectKind::Reverb),
            "delay" => Ok(EffectKind::Delay),
            "chorus" => Ok(EffectKind::Chorus),
            "tremolo" => Ok(EffectKind::Tremolo),
            other => Err(SynthError::InvalidEffect(format!(
                "unknown effect type `{other}`"
            ))),
        }
    }
}

impl fmt::Display for EffectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single effect stage and its parameters.
///
/// Times are in seconds, rates in Hz, everything else is a 0-1 amount.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EffectDescriptor {
    Reverb { decay: f32, room_size: f32 },
    Delay { delay_time: f32, feedback: f32, mix: f32 },
    Chorus { depth: f32, rate: f32, mix: f32 },
    Tremolo { depth: f32, rate: f32 },
}

impl EffectDescriptor {
    /// Build a descriptor from named values. Every parameter of `kind` must
    /// be present exactly once and no others may appear. Ranges are checked
    /// separately by [`validate`](Self::validate), which needs the sample
    /// rate.
    pub fn from_params(kind: EffectKind, params: &[(&str, f32)]) -> Result<Self> {
        let expected = kind.parameters();

        let known = |name: &str| expected.iter().any(|&e| e == name);
        if let Some((unknown, _)) = params.iter().find(|(name, _)| !known(name)) {
            return Err(SynthError::InvalidEffect(format!(
                "{kind} does not take a `{unknown}` parameter"
            )));
        }

        let mut values = [0.0f32; 3];
        for (slot, &name) in values.iter_mut().zip(expected) {
            let mut found = params.iter().filter(|(key, _)| *key == name);
            *slot = match (found.next(), found.next()) {
                (Some(&(_, value)), None) => value,
                (None, _) => {
                    return Err(SynthError::InvalidEffect(format!(
                        "{kind} is missing the `{name}` parameter"
                    )))
                }
                (Some(_), Some(_)) => {
                    return Err(SynthError::InvalidEffect(format!(
                        "{kind} parameter `{name}` given more than once"
                    )))
                }
            };
        }

        let [a, b, c] = values;
        Ok(match kind {
            EffectKind::Reverb => EffectDescriptor::Reverb {
                decay: a,
                room_size: b,
            },
            EffectKind::Delay => EffectDescriptor::Delay {
                delay_time: a,
                feedback: b,
                mix: c,
            },
            EffectKind::Chorus => EffectDescriptor::Chorus {
                depth: a,
                rate: b,
                mix: c,
            },
            EffectKind::Tremolo => EffectDescriptor::Tremolo { depth: a, rate: b },
        })
    }

    pub fn kind(&self) -> EffectKind {
        match self {
            EffectDescriptor::Reverb { .. } => EffectKind::Reverb,
            EffectDescriptor::Delay { .. } => EffectKind::Delay,
            EffectDescriptor::Chorus { .. } => EffectKind::Chorus,
            EffectDescriptor::Tremolo { .. } => EffectKind::Tremolo,
        }
    }

    pub fn validate(&self, sample_rate: f32) -> Result<()> {
        let nyquist = sample_rate / 2.0;
        match *self {
            EffectDescriptor::Reverb { decay, room_size } => {
                check_range("decay", decay, 0.0, BELOW_ONE, "a value in [0, 1)")?;
                check_seconds("room_size", room_size)
            }
            EffectDescriptor::Delay {
                delay_time,
                feedback,
                mix,
            } => {
                check_seconds("delay_time", delay_time)?;
                check_range("feedback", feedback, 0.0, BELOW_ONE, "a value in [0, 1)")?;
                check_range("mix", mix, 0.0, 1.0, "a value in [0, 1]")
            }
            EffectDescriptor::Chorus { depth, rate, mix } => {
                check_range("depth", depth, 0.0, 1.0, "a delay in [0, 1] seconds")?;
                check_range("rate", rate, 0.0, nyquist, "a rate in [0, sample_rate / 2] Hz")?;
                check_range("mix", mix, 0.0, 1.0, "a value in [0, 1]")
            }
            EffectDescriptor::Tremolo { depth, rate } => {
                check_range("depth", depth, 0.0, 1.0, "a value in [0, 1]")?;
                check_range("rate", rate, 0.0, nyquist, "a rate in [0, sample_rate / 2] Hz")
            }
        }
    }
}

fn check_seconds(name: &'static str, value: f32) -> Result<()> {
    if value > 0.0 {
        check_range(name, value, 0.0, MAX_EFFECT_TIME, "a time in (0, 10] seconds")
    } else {
        Err(SynthError::parameter(name, value, "a time in (0, 10] seconds"))
    }
}

/// A built, stateful effect stage.
pub enum Effect {
    Reverb(Reverb),
    Delay(Delay),
    Chorus(Chorus),
    Tremolo(Tremolo),
}

impl Effect {
    /// Validate `descriptor` and allocate the stage's history buffers.
    pub fn new(descriptor: &EffectDescriptor, sample_rate: f32) -> Result<Self> {
        descriptor.validate(sample_rate)?;
        Ok(match *descriptor {
            EffectDescriptor::Reverb { decay, room_size } => {
                Effect::Reverb(Reverb::new(decay, room_size, sample_rate))
            }
            EffectDescriptor::Delay {
                delay_time,
                feedback,
                mix,
            } => Effect::Delay(Delay::new(delay_time, feedback, mix, sample_rate)),
            EffectDescriptor::Chorus { depth, rate, mix } => {
                Effect::Chorus(Chorus::new(depth, rate, mix, sample_rate))
            }
            EffectDescriptor::Tremolo { depth, rate } => {
                Effect::Tremolo(Tremolo::new(depth, rate, sample_rate))
            }
        })
    }

    pub fn process(&mut self, buffer: &mut [f32]) {
        match self {
            Effect::Reverb(stage) => stage.process(buffer),
            Effect::Delay(stage) => stage.process(buffer),
            Effect::Chorus(stage) => stage.process(buffer),
            Effect::Tremolo(stage) => stage.process(buffer),
        }
    }

    pub fn reset(&mut self) {
        match self {
            Effect::Reverb(stage) => stage.reset(),
            Effect::Delay(stage) => stage.reset(),
            Effect::Chorus(stage) => stage.reset(),
            Effect::Tremolo(stage) => stage.reset(),
        }
    }
}

/// Ordered list of effect stages applied in place to a buffer.
pub struct EffectChain {
    sample_rate: f32,
    descriptors: Vec<EffectDescriptor>,
    stages: Vec<Effect>,
}

impl EffectChain {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            sample_rate,
            descriptors: Vec::new(),
            stages: Vec::new(),
        }
    }

    /// Append a stage by name, e.g. `add_effect("delay", &[("delay_time",
    /// 0.25), ("feedback", 0.4), ("mix", 0.3)])`.
    pub fn add_effect(&mut self, kind: &str, params: &[(&str, f32)]) -> Result<()> {
        let kind = kind.parse::<EffectKind>()?;
        let descriptor = EffectDescriptor::from_params(kind, params)?;
        self.push(descriptor)
    }

    /// Append a typed stage. On error the chain is left unchanged.
    pub fn push(&mut self, descriptor: EffectDescriptor) -> Result<()> {
        let effect = Effect::new(&descriptor, self.sample_rate)?;
        log::debug!("effect chain: appended {:?}", descriptor);
        self.descriptors.push(descriptor);
        self.stages.push(effect);
        Ok(())
    }

    pub fn clear_effects(&mut self) {
        if !self.stages.is_empty() {
            log::debug!("effect chain: cleared {} stage(s)", self.stages.len());
        }
        self.descriptors.clear();
        self.stages.clear();
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    pub fn descriptors(&self) -> &[EffectDescriptor] {
        &self.descriptors
    }

    /// Clear every stage's history and LFO phase.
    pub fn reset(&mut self) {
        for stage in &mut self.stages {
            stage.reset();
        }
    }

    /// Run every stage over `buffer`, in the order they were added.
    pub fn process(&mut self, buffer: &mut [f32]) {
        for stage in &mut self.stages {
            stage.process(buffer);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RATE: f32 = 48_000.0;

    fn full_chain() -> EffectChain {
        let mut chain = EffectChain::new(SAMPLE_RATE);
        chain
            .add_effect("reverb", &[("decay", 0.5), ("room_size", 0.02)])
            .unwrap();
        chain
            .add_effect(
                "delay",
                &[("delay_time", 0.01), ("feedback", 0.3), ("mix", 0.5)],
            )
            .unwrap();
        chain
            .add_effect("chorus", &[("depth", 0.002), ("rate", 1.5), ("mix", 0.5)])
            .unwrap();
        chain
            .add_effect("tremolo", &[("depth", 0.8), ("rate", 5.0)])
            .unwrap();
        chain
    }

    #[test]
    fn empty_chain_is_identity() {
        let mut chain = EffectChain::new(SAMPLE_RATE);
        let input: Vec<f32> = (0..128).map(|i| (i as f32 * 0.1).sin()).collect();
        let mut buffer = input.clone();
        chain.process(&mut buffer);
        assert_eq!(buffer, input);
    }

    #[test]
    fn silence_stays_silent_through_every_stage() {
        let mut chain = full_chain();
        assert_eq!(chain.len(), 4);
        let mut buffer = vec![0.0; 4_096];
        chain.process(&mut buffer);
        assert!(buffer.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn chunked_processing_matches_whole() {
        let input: Vec<f32> = (0..6_000).map(|i| (i as f32 * 0.013).sin() * 0.5).collect();

        let mut whole = input.clone();
        full_chain().process(&mut whole);

        let mut chunked = input;
        let mut chain = full_chain();
        for chunk in chunked.chunks_mut(333) {
            chain.process(chunk);
        }

        assert_eq!(whole, chunked);
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let mut chain = EffectChain::new(SAMPLE_RATE);
        assert!(matches!(
            chain.add_effect("flanger", &[("rate", 1.0)]),
            Err(SynthError::InvalidEffect(_))
        ));
        assert!(chain.is_empty());
    }

    #[test]
    fn missing_and_unknown_keys_are_rejected() {
        let missing = EffectDescriptor::from_params(EffectKind::Reverb, &[("decay", 0.5)]);
        assert!(matches!(missing, Err(SynthError::InvalidEffect(_))));

        let unknown = EffectDescriptor::from_params(
            EffectKind::Tremolo,
            &[("depth", 0.5), ("rate", 2.0), ("mix", 0.3)],
        );
        assert!(matches!(unknown, Err(SynthError::InvalidEffect(_))));

        let twice = EffectDescriptor::from_params(
            EffectKind::Tremolo,
            &[("depth", 0.5), ("rate", 2.0), ("depth", 0.3)],
        );
        assert!(matches!(twice, Err(SynthError::InvalidEffect(_))));
    }

    #[test]
    fn params_can_come_in_any_order() {
        let descriptor = EffectDescriptor::from_params(
            EffectKind::Delay,
            &[("mix", 0.2), ("delay_time", 0.5), ("feedback", 0.1)],
        )
        .unwrap();
        assert_eq!(
            descriptor,
            EffectDescriptor::Delay {
                delay_time: 0.5,
                feedback: 0.1,
                mix: 0.2
            }
        );
        assert_eq!(descriptor.kind(), EffectKind::Delay);
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        let mut chain = EffectChain::new(SAMPLE_RATE);
        let bad = [
            EffectDescriptor::Reverb {
                decay: 1.0,
                room_size: 0.1,
            },
            EffectDescriptor::Reverb {
                decay: 0.5,
                room_size: 0.0,
            },
            EffectDescriptor::Delay {
                delay_time: 11.0,
                feedback: 0.5,
                mix: 0.5,
            },
            EffectDescriptor::Chorus {
                depth: 0.01,
                rate: 30_000.0,
                mix: 0.5,
            },
            EffectDescriptor::Tremolo {
                depth: -0.1,
                rate: 1.0,
            },
            EffectDescriptor::Tremolo {
                depth: 0.5,
                rate: f32::NAN,
            },
        ];
        for descriptor in bad {
            assert!(
                matches!(
                    chain.push(descriptor),
                    Err(SynthError::InvalidParameter { .. })
                ),
                "{descriptor:?} should be rejected"
            );
        }
        assert!(chain.is_empty(), "failed pushes leave the chain unchanged");
    }

    #[test]
    fn stages_apply_in_order() {
        // tremolo (gain 0.5) then reverb, versus reverb then tremolo
        let tremolo = EffectDescriptor::Tremolo {
            depth: 1.0,
            rate: 0.0,
        };
        let reverb = EffectDescriptor::Reverb {
            decay: 0.5,
            room_size: 0.001,
        };

        let mut chain = EffectChain::new(1_000.0);
        chain.push(tremolo).unwrap();
        chain.push(reverb).unwrap();
        let mut buffer = vec![1.0, 0.0, 0.0];
        chain.process(&mut buffer);
        assert_eq!(buffer, vec![0.5, 0.25, 0.125]);
        assert_eq!(chain.descriptors(), &[tremolo, reverb]);
    }

    #[test]
    fn clear_and_reset() {
        let mut chain = full_chain();
        let mut buffer = vec![1.0; 64];
        chain.process(&mut buffer);

        chain.reset();
        let mut silence = vec![0.0; 4_096];
        chain.process(&mut silence);
        assert!(silence.iter().all(|&s| s == 0.0), "reset drops the tails");

        chain.clear_effects();
        assert!(chain.is_empty());
        assert!(chain.descriptors().is_empty());
    }
}
