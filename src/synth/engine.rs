use rtrb::{Consumer, RingBuffer};

use crate::dsp::{Cutoff, FilterConfig, FilterType, Mixer, StreamingFilter};
use crate::effects::{EffectChain, EffectDescriptor};
use crate::error::Result;
use crate::synth::config::SynthConfig;
use crate::synth::manager::VoiceManager;
use crate::synth::message::{MessageReceiver, NoteSender, SynthMessage};
use crate::MAX_BLOCK_SIZE;

/*
Signal Flow
===========

    NoteSender ──rtrb──┐
                       ▼
    note_on/off ──► VoiceManager ──► Mixer ──► StreamingFilter ──► EffectChain ──► out
                    (osc × env,     (Σ velocity ·
                     per voice)       voice)

`render` first drains every queued note event, then produces the buffer in
sub-blocks of at most MAX_BLOCK_SIZE samples. Every stage keeps its state
between calls, so the output does not depend on how the caller slices time:

    engine.generate(1000)  ==  engine.generate(300) ++ engine.generate(700)

Events take effect at the start of the next render call, never mid-buffer.

Configuration changes (`set_*`, `add_effect`, ...) take `&mut self`, so they
can only happen between renders. A change that fails leaves the previous
configuration running.
*/

pub struct SynthEngine {
    config: SynthConfig,
    voices: VoiceManager,
    mixer: Mixer,
    filter: StreamingFilter,
    effects: EffectChain,
    rx: Consumer<SynthMessage>,
}

impl SynthEngine {
    /// Build an engine and the control-thread handle that feeds it.
    pub fn new(config: SynthConfig) -> Result<(Self, NoteSender)> {
        config.validate()?;

        let sample_rate = config.sample_rate;
        let voices = VoiceManager::new(config.max_polyphony, config.voice, sample_rate)?;
        let filter = StreamingFilter::new(config.filter, sample_rate)?;
        let mut effects = EffectChain::new(sample_rate);
        for descriptor in &config.effects {
            effects.push(*descriptor)?;
        }
        let (tx, rx) = RingBuffer::new(config.queue_capacity);

        log::info!(
            "synth engine: {} Hz, {} voices, {} wave, {:?} filter, {} effect(s)",
            sample_rate,
            config.max_polyphony,
            config.voice.waveform,
            config.filter.filter_type,
            effects.len()
        );

        let engine = Self {
            config,
            voices,
            mixer: Mixer::new(MAX_BLOCK_SIZE),
            filter,
            effects,
            rx,
        };
        Ok((engine, NoteSender::new(tx)))
    }

    pub fn note_on(&mut self, note: u8, velocity: f32) -> Result<()> {
        let message = SynthMessage::NoteOn { note, velocity };
        message.validate()?;
        self.apply(message);
        Ok(())
    }

    pub fn note_off(&mut self, note: u8) -> Result<()> {
        let message = SynthMessage::NoteOff { note };
        message.validate()?;
        self.apply(message);
        Ok(())
    }

    pub fn all_notes_off(&mut self) {
        self.apply(SynthMessage::AllNotesOff);
    }

    fn apply(&mut self, message: SynthMessage) {
        match message {
            SynthMessage::NoteOn { note, velocity } => self.voices.note_on(note, velocity),
            SynthMessage::NoteOff { note } => self.voices.note_off(note),
            SynthMessage::AllNotesOff => self.voices.all_notes_off(),
        }
    }

    /// Fill `out` with the next `out.len()` samples.
    pub fn render(&mut self, out: &mut [f32]) {
        while let Some(message) = MessageReceiver::pop(&mut self.rx) {
            self.apply(message);
        }

        for block in out.chunks_mut(MAX_BLOCK_SIZE) {
            self.voices.render(block, &mut self.mixer);
            self.filter.apply(block);
            self.effects.process(block);
        }
    }

    pub fn generate(&mut self, num_samples: usize) -> Vec<f32> {
        let mut out = vec![0.0; num_samples];
        self.render(&mut out);
        out
    }

    pub fn set_filter(&mut self, filter: FilterConfig) -> Result<()> {
        self.filter.set_config(filter)?;
        self.config.filter = filter;
        Ok(())
    }

    pub fn set_cutoff(&mut self, cutoff: Cutoff) -> Result<()> {
        self.set_filter(FilterConfig {
            cutoff,
            ..self.config.filter
        })
    }

    pub fn set_filter_order(&mut self, order: usize) -> Result<()> {
        self.set_filter(FilterConfig {
            order,
            ..self.config.filter
        })
    }

    pub fn set_filter_type(&mut self, filter_type: FilterType) -> Result<()> {
        self.set_filter(FilterConfig {
            filter_type,
            ..self.config.filter
        })
    }

    /// Append an effect by name, see [`EffectChain::add_effect`].
    pub fn add_effect(&mut self, kind: &str, params: &[(&str, f32)]) -> Result<()> {
        self.effects.add_effect(kind, params)?;
        self.sync_effects();
        Ok(())
    }

    pub fn push_effect(&mut self, descriptor: EffectDescriptor) -> Result<()> {
        self.effects.push(descriptor)?;
        self.sync_effects();
        Ok(())
    }

    pub fn clear_effects(&mut self) {
        self.effects.clear_effects();
        self.config.effects.clear();
    }

    fn sync_effects(&mut self) {
        self.config.effects.clear();
        self.config.effects.extend_from_slice(self.effects.descriptors());
    }

    pub fn sample_rate(&self) -> f32 {
        self.config.sample_rate
    }

    /// Voices still sounding, including ones in their release stage.
    pub fn live_voices(&self) -> usize {
        self.voices.live_count()
    }

    pub fn voices(&self) -> &VoiceManager {
        &self.voices
    }

    /// The configuration currently in effect.
    pub fn config(&self) -> &SynthConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SynthError;

    #[test]
    fn new_builds_configured_effects() {
        let config = SynthConfig::default().with_effect(EffectDescriptor::Tremolo {
            depth: 0.5,
            rate: 2.0,
        });
        let (engine, _tx) = SynthEngine::new(config).unwrap();
        assert_eq!(engine.config().effects.len(), 1);
        assert_eq!(engine.sample_rate(), 48_000.0);
    }

    #[test]
    fn invalid_config_fails_construction() {
        let config = SynthConfig::default().with_max_polyphony(0);
        assert!(matches!(
            SynthEngine::new(config),
            Err(SynthError::Configuration(_))
        ));
    }

    #[test]
    fn failed_filter_change_keeps_previous() {
        let (mut engine, _tx) = SynthEngine::new(SynthConfig::default()).unwrap();
        assert!(engine.set_filter_order(0).is_err());
        assert!(engine.set_filter_type(FilterType::BandPass).is_err());
        assert_eq!(engine.config().filter, FilterConfig::default());

        engine.set_cutoff(Cutoff::Single(1_000.0)).unwrap();
        assert_eq!(engine.config().filter.cutoff, Cutoff::Single(1_000.0));
    }

    #[test]
    fn effect_config_tracks_chain() {
        let (mut engine, _tx) = SynthEngine::new(SynthConfig::default()).unwrap();
        engine
            .add_effect("reverb", &[("decay", 0.3), ("room_size", 0.05)])
            .unwrap();
        assert!(engine.add_effect("phaser", &[]).is_err());
        assert_eq!(engine.config().effects.len(), 1);

        engine.clear_effects();
        assert!(engine.config().effects.is_empty());
    }

    #[test]
    fn queued_events_apply_on_render() {
        let (mut engine, mut tx) = SynthEngine::new(SynthConfig::default()).unwrap();
        tx.note_on(60, 1.0).unwrap();
        assert_eq!(engine.live_voices(), 0);

        engine.generate(16);
        assert_eq!(engine.live_voices(), 1);
        assert!(engine.voices().is_live(60));
    }
}
