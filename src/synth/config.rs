use crate::dsp::{EnvelopeConfig, FilterConfig, Oscillator, Waveform};
use crate::effects::EffectDescriptor;
use crate::error::{check_range, Result, SynthError};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// What every voice plays: an oscillator shape shaped by an envelope.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VoiceConfig {
    pub waveform: Waveform,
    pub amplitude: f32,
    pub phase: f32,      // radians
    pub duty_cycle: f32, // pulse only
    pub envelope: EnvelopeConfig,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            waveform: Waveform::Sine,
            amplitude: 1.0,
            phase: 0.0,
            duty_cycle: 0.5,
            envelope: EnvelopeConfig::default(),
        }
    }
}

impl VoiceConfig {
    pub fn new(waveform: Waveform, envelope: EnvelopeConfig) -> Self {
        Self {
            waveform,
            envelope,
            ..Self::default()
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

    pub fn with_duty_cycle(mut self, duty_cycle: f32) -> Self {
        self.duty_cycle = duty_cycle;
        self
    }

    /// The oscillator every voice starts from, before it is tuned.
    pub(crate) fn oscillator(&self, sample_rate: f32) -> Result<Oscillator> {
        self.validate()?;
        Oscillator::new(self.waveform, 0.0, sample_rate)
            .with_amplitude(self.amplitude)
            .with_phase(self.phase)
            .with_duty_cycle(self.duty_cycle)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.amplitude.is_finite() {
            return Err(SynthError::parameter("amplitude", self.amplitude, "a finite gain"));
        }
        if !self.phase.is_finite() {
            return Err(SynthError::parameter("phase", self.phase, "a finite phase in radians"));
        }
        check_range("duty_cycle", self.duty_cycle, 0.0, 1.0, "a value in [0, 1]")?;
        self.envelope.validate()
    }
}

/// Everything a [`SynthEngine`](super::SynthEngine) is built from.
///
/// ```
/// use streamsynth::dsp::{FilterConfig, Waveform};
/// use streamsynth::synth::SynthConfig;
///
/// let config = SynthConfig::default()
///     .with_sample_rate(44_100.0)
///     .with_max_polyphony(4)
///     .with_waveform(Waveform::Sawtooth)
///     .with_filter(FilterConfig::lowpass(2_000.0, 4));
/// assert!(config.validate().is_ok());
/// ```
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, PartialEq)]
pub struct SynthConfig {
    pub sample_rate: f32,
    pub max_polyphony: usize,
    pub voice: VoiceConfig,
    pub filter: FilterConfig,
    pub effects: Vec<EffectDescriptor>,
    /// Slots in the control queue between `NoteSender` and the engine.
    pub queue_capacity: usize,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            sample_rate: 48_000.0,
            max_polyphony: 8,
            voice: VoiceConfig::default(),
            filter: FilterConfig::default(),
            effects: Vec::new(),
            queue_capacity: 256,
        }
    }
}

impl SynthConfig {
    pub fn with_sample_rate(mut self, sample_rate: f32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    pub fn with_max_polyphony(mut self, max_polyphony: usize) -> Self {
        self.max_polyphony = max_polyphony;
        self
    }

    pub fn with_voice(mut self, voice: VoiceConfig) -> Self {
        self.voice = voice;
        self
    }

    pub fn with_waveform(mut self, waveform: Waveform) -> Self {
        self.voice.waveform = waveform;
        self
    }

    pub fn with_envelope(mut self, envelope: EnvelopeConfig) -> Self {
        self.voice.envelope = envelope;
        self
    }

    pub fn with_filter(mut self, filter: FilterConfig) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_effect(mut self, effect: EffectDescriptor) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn with_queue_capacity(mut self, queue_capacity: usize) -> Self {
        self.queue_capacity = queue_capacity;
        self
    }

    /// Check the whole configuration before anything is built.
    pub fn validate(&self) -> Result<()> {
        if !(self.sample_rate.is_finite() && self.sample_rate > 0.0) {
            return Err(SynthError::Configuration(format!(
                "sample rate must be positive, got {}",
                self.sample_rate
            )));
        }
        if self.max_polyphony == 0 {
            return Err(SynthError::Configuration(
                "max_polyphony must be at least 1".into(),
            ));
        }
        if self.queue_capacity == 0 {
            return Err(SynthError::Configuration(
                "queue_capacity must be at least 1".into(),
            ));
        }

        self.voice.validate()?;
        self.filter.validate(self.sample_rate)?;
        for effect in &self.effects {
            effect.validate(self.sample_rate)?;
        }
        Ok(())
    }
}
