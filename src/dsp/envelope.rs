use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::dsp::seconds_to_samples;
use crate::error::{check_range, Result, SynthError};

/*
ADSR Envelope Implementation
============================

This module implements the amplitude envelope of every voice: an
Attack-(Hold)-Decay-Sustain-Release state machine whose output multiplies
the oscillator.

Vocabulary
----------

  level       The envelope's current output value (0.0 to 1.0).

  stage       Which phase of the envelope we're in: Idle, Attack, Hold,
              Decay, Sustain, or Release.

  position    Samples elapsed inside the current stage. Always smaller
              than the stage length, except in Sustain (unbounded) and
              Idle (always 0).

  curve       The shape of every ramp: linear, exponential or logarithmic.


The Shape
---------

  Level
    1.0 ┐     ╱‾‾╲
        │    ╱    ╲___________
    S   │   ╱                 ╲
        │  ╱                   ╲
    0.0 └─╱─────────────────────╲──→ Time
        Attack Hold Decay Sustain Release

Hold is zero-length by default, in which case Attack flows straight into
Decay. Any zero-length stage is skipped when it is entered.


Segments
--------

Each ramp of N samples goes from `start` to `end`. At position p the
progress is u = p / (N − 1), so the first sample is `start` and the last
one is exactly `end`:

  linear       start + (end − start)·u
  exponential  geometric steps between max(start, ε) and max(end, ε),
               shifted down by ε so the ramp can reach 0
  logarithmic  10^(ls + (le − ls)·u),  ls = log10(max(start, ε)),
                                       le = log10(max(end, ε))

Both non-linear curves take equal ratios per sample (slow start, fast
finish on the way up). The logarithmic curve interpolates log10(level)
linearly and is not shifted, so a ramp down to 0 ends on ε rather than 0.


The State Machine
-----------------

    ┌──────┐ trigger_on ┌────────┐      ┌──────┐      ┌───────┐      ┌─────────┐
    │ Idle │ ─────────→ │ Attack │ ───→ │ Hold │ ───→ │ Decay │ ───→ │ Sustain │
    └──────┘            └────────┘      └──────┘      └───────┘      └─────────┘
        ↑                    │              │             │               │
        │                    └──────────────┴─────┬───────┴───────────────┘
        │                                         │ trigger_off
        │        level = 0     ┌─────────┐        │
        └───────────────────── │ Release │ ←──────┘
                               └─────────┘

Release starts from the CURRENT level, whatever stage we were in, so a note
released mid-attack fades from where it got to.


Streaming
---------

All runtime state lives in `EnvelopeState`, a small Copy value. One sample
is one call to `advance`, which maps the old state to (output, new state).
Rendering a block just threads the state through `advance`, so a block of
N samples and two blocks of n1 + n2 = N samples are bit-identical.
*/

/// Smallest level the exponential and logarithmic curves interpolate from.
const CURVE_FLOOR: f64 = 1e-6;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeCurve {
    Linear,
    Exponential,
    Logarithmic,
}

impl FromStr for EnvelopeCurve {
    type Err = SynthError;

    fn from_str(name: &str) -> Result<Self> {
        match name.to_ascii_lowercase().as_str() {
            "lin" | "linear" => Ok(EnvelopeCurve::Linear),
            "exp" | "exponential" => Ok(EnvelopeCurve::Exponential),
            "log" | "logarithmic" => Ok(EnvelopeCurve::Logarithmic),
            other => Err(SynthError::Configuration(format!(
                "unsupported envelope curve `{other}`"
            ))),
        }
    }
}

impl EnvelopeCurve {
    /// Value at `position` of a `len`-sample ramp from `start` to `end`.
    fn segment(self, start: f32, end: f32, position: usize, len: usize) -> f32 {
        let u = if len <= 1 {
            1.0
        } else {
            position as f64 / (len - 1) as f64
        };
        let (start, end) = (start as f64, end as f64);

        let value = match self {
            EnvelopeCurve::Linear => start + (end - start) * u,
            EnvelopeCurve::Exponential => {
                let s = start.max(CURVE_FLOOR);
                let e = end.max(CURVE_FLOOR);
                s * (e / s).powf(u) - CURVE_FLOOR
            }
            EnvelopeCurve::Logarithmic => {
                let ls = start.max(CURVE_FLOOR).log10();
                let le = end.max(CURVE_FLOOR).log10();
                10f64.powf(ls + (le - ls) * u)
            }
        };

        value.clamp(0.0, 1.0) as f32
    }
}

/// The current stage of the envelope state machine.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeStage {
    Idle,    // inactive, level = 0
    Attack,  // ramping 0 → 1
    Hold,    // holding 1
    Decay,   // ramping 1 → sustain
    Sustain, // holding sustain until trigger_off
    Release, // ramping release_start_level → 0
}

/// Everything that changes sample by sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnvelopeState {
    pub stage: EnvelopeStage,
    pub position: usize,
    pub current_level: f32,
    pub release_start_level: f32,
}

impl EnvelopeState {
    pub const IDLE: Self = Self {
        stage: EnvelopeStage::Idle,
        position: 0,
        current_level: 0.0,
        release_start_level: 0.0,
    };
}

impl Default for EnvelopeState {
    fn default() -> Self {
        Self::IDLE
    }
}

/// Envelope shape in seconds.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnvelopeConfig {
    pub attack: f32,
    pub hold: f32,
    pub decay: f32,
    pub sustain_level: f32,
    pub release: f32,
    pub curve: EnvelopeCurve,
}

impl Default for EnvelopeConfig {
    fn default() -> Self {
        Self {
            attack: 0.01,
            hold: 0.0,
            decay: 0.1,
            sustain_level: 0.7,
            release: 0.3,
            curve: EnvelopeCurve::Linear,
        }
    }
}

impl EnvelopeConfig {
    pub fn adsr(attack: f32, decay: f32, sustain_level: f32, release: f32) -> Self {
        Self {
            attack,
            decay,
            sustain_level,
            release,
            ..Self::default()
        }
    }

    pub fn with_hold(mut self, hold: f32) -> Self {
        self.hold = hold;
        self
    }

    pub fn with_curve(mut self, curve: EnvelopeCurve) -> Self {
        self.curve = curve;
        self
    }

    pub fn validate(&self) -> Result<()> {
        const TIME: &str = "a finite, non-negative time in seconds";
        check_range("attack", self.attack, 0.0, f32::MAX, TIME)?;
        check_range("hold", self.hold, 0.0, f32::MAX, TIME)?;
        check_range("decay", self.decay, 0.0, f32::MAX, TIME)?;
        check_range("release", self.release, 0.0, f32::MAX, TIME)?;
        check_range("sustain_level", self.sustain_level, 0.0, 1.0, "a level in [0, 1]")
    }
}

#[derive(Debug, Clone)]
pub struct Envelope {
    // Shape, fixed until set_parameters
    attack_samples: usize,
    hold_samples: usize,
    decay_samples: usize,
    release_samples: usize,
    sustain_level: f32,
    curve: EnvelopeCurve,

    config: EnvelopeConfig,
    sample_rate: f32,

    state: EnvelopeState,
}

impl Envelope {
    pub fn new(config: EnvelopeConfig, sample_rate: f32) -> Result<Self> {
        config.validate()?;

        let mut env = Self {
            attack_samples: 0,
            hold_samples: 0,
            decay_samples: 0,
            release_samples: 0,
            sustain_level: 0.0,
            curve: config.curve,
            config,
            sample_rate,
            state: EnvelopeState::IDLE,
        };
        env.apply_config(config);
        Ok(env)
    }

    pub fn adsr(attack: f32, decay: f32, sustain: f32, release: f32, sample_rate: f32) -> Result<Self> {
        Self::new(EnvelopeConfig::adsr(attack, decay, sustain, release), sample_rate)
    }

    /// Replace the envelope shape. The current stage and level carry on;
    /// the new lengths take effect from the next sample.
    pub fn set_parameters(&mut self, config: EnvelopeConfig) -> Result<()> {
        config.validate()?;
        self.apply_config(config);

        // Keep the position invariant if a stage just got shorter.
        let len = self.stage_len(self.state.stage);
        if self.state.position >= len && len > 0 {
            self.state.position = len - 1;
        }
        Ok(())
    }

    fn apply_config(&mut self, config: EnvelopeConfig) {
        self.attack_samples = seconds_to_samples(config.attack, self.sample_rate);
        self.hold_samples = seconds_to_samples(config.hold, self.sample_rate);
        self.decay_samples = seconds_to_samples(config.decay, self.sample_rate);
        self.release_samples = seconds_to_samples(config.release, self.sample_rate);
        self.sustain_level = config.sustain_level;
        self.curve = config.curve;
        self.config = config;
    }

    /// Gate high: restart the attack from zero.
    pub fn trigger_on(&mut self) {
        self.state = self.enter(EnvelopeState {
            stage: EnvelopeStage::Attack,
            position: 0,
            current_level: 0.0,
            release_start_level: 0.0,
        });
    }

    /// Gate low: release from whatever level we are at right now.
    pub fn trigger_off(&mut self) {
        if matches!(self.state.stage, EnvelopeStage::Idle | EnvelopeStage::Release) {
            return;
        }

        self.state = self.enter(EnvelopeState {
            stage: EnvelopeStage::Release,
            position: 0,
            current_level: self.state.current_level,
            release_start_level: self.state.current_level,
        });
    }

    /// Length in samples of a bounded stage. Sustain and Idle report 0.
    pub fn stage_len(&self, stage: EnvelopeStage) -> usize {
        match stage {
            EnvelopeStage::Attack => self.attack_samples,
            EnvelopeStage::Hold => self.hold_samples,
            EnvelopeStage::Decay => self.decay_samples,
            EnvelopeStage::Release => self.release_samples,
            EnvelopeStage::Sustain | EnvelopeStage::Idle => 0,
        }
    }

    /// Skip forward over zero-length stages.
    fn enter(&self, mut state: EnvelopeState) -> EnvelopeState {
        loop {
            let next = match state.stage {
                EnvelopeStage::Attack if self.attack_samples == 0 => EnvelopeStage::Hold,
                EnvelopeStage::Hold if self.hold_samples == 0 => EnvelopeStage::Decay,
                EnvelopeStage::Decay if self.decay_samples == 0 => EnvelopeStage::Sustain,
                EnvelopeStage::Release if self.release_samples == 0 => return EnvelopeState::IDLE,
                _ => return state,
            };
            state.stage = next;
            state.position = 0;
        }
    }

    /// One sample of the state machine: (output, next state).
    pub fn advance(&self, state: EnvelopeState) -> (f32, EnvelopeState) {
        let level = match state.stage {
            EnvelopeStage::Idle => return (0.0, EnvelopeState::IDLE),
            EnvelopeStage::Sustain => {
                let level = self.sustain_level;
                return (
                    level,
                    EnvelopeState {
                        current_level: level,
                        ..state
                    },
                );
            }
            EnvelopeStage::Attack => self.curve.segment(0.0, 1.0, state.position, self.attack_samples),
            EnvelopeStage::Hold => 1.0,
            EnvelopeStage::Decay => {
                self.curve
                    .segment(1.0, self.sustain_level, state.position, self.decay_samples)
            }
            EnvelopeStage::Release => self.curve.segment(
                state.release_start_level,
                0.0,
                state.position,
                self.release_samples,
            ),
        };

        let mut next = EnvelopeState {
            position: state.position + 1,
            current_level: level,
            ..state
        };

        if next.position >= self.stage_len(state.stage) {
            next.position = 0;
            next.stage = match state.stage {
                EnvelopeStage::Attack => EnvelopeStage::Hold,
                EnvelopeStage::Hold => EnvelopeStage::Decay,
                EnvelopeStage::Decay => EnvelopeStage::Sustain,
                _ => EnvelopeStage::Idle,
            };
            if next.stage == EnvelopeStage::Idle {
                next = EnvelopeState::IDLE;
            } else {
                next = self.enter(next);
            }
        }

        debug_assert!((0.0..=1.0).contains(&level));
        (level, next)
    }

    /// Advance the envelope by one sample.
    pub fn next_sample(&mut self) -> f32 {
        let (level, state) = self.advance(self.state);
        self.state = state;
        level
    }

    /// Render a block of envelope values into the buffer.
    pub fn render(&mut self, buffer: &mut [f32]) {
        let mut state = self.state;
        for sample in buffer.iter_mut() {
            let (level, next) = self.advance(state);
            *sample = level;
            state = next;
        }
        self.state = state;
    }

    pub fn generate(&mut self, num_samples: usize) -> Vec<f32> {
        let mut out = vec![0.0; num_samples];
        self.render(&mut out);
        out
    }

    /// Returns true if the envelope is producing output (not idle).
    pub fn is_active(&self) -> bool {
        self.state.stage != EnvelopeStage::Idle
    }

    pub fn reset(&mut self) {
        self.state = EnvelopeState::IDLE;
    }

    pub fn level(&self) -> f32 {
        self.state.current_level
    }

    pub fn stage(&self) -> EnvelopeStage {
        self.state.stage
    }

    pub fn state(&self) -> EnvelopeState {
        self.state
    }

    pub fn config(&self) -> &EnvelopeConfig {
        &self.config
    }
}
