use crate::dsp::{Envelope, EnvelopeStage, Oscillator};

/// Equal-tempered frequency of a MIDI note, A4 (69) = 440 Hz.
#[inline]
pub fn midi_note_to_freq(note: u8) -> f32 {
    (440.0 * 2f64.powf((note as f64 - 69.0) / 12.0)) as f32
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceState {
    Active,    // gate held: attack, hold, decay or sustain
    Releasing, // key released, envelope in release phase
    Finished,  // envelope idle, removed after the next render
}

/// One sounding note: an oscillator at the note's pitch shaped by its own
/// envelope.
#[derive(Debug, Clone)]
pub struct Voice {
    note: u8,
    velocity: f32,
    age: u64,
    oscillator: Oscillator,
    envelope: Envelope,
}

impl Voice {
    /// Build a voice for `note` and open its envelope. `oscillator` and
    /// `envelope` are used as given apart from the frequency and trigger.
    pub fn start(note: u8, velocity: f32, age: u64, mut oscillator: Oscillator, mut envelope: Envelope) -> Self {
        oscillator.set_frequency(midi_note_to_freq(note));
        envelope.trigger_on();
        Self {
            note,
            velocity,
            age,
            oscillator,
            envelope,
        }
    }

    /// Same note struck again: reopen the envelope from zero and take the
    /// new velocity. The oscillator keeps running.
    pub fn retrigger(&mut self, velocity: f32, age: u64) {
        self.velocity = velocity;
        self.age = age;
        self.envelope.trigger_on();
    }

    pub fn release(&mut self) {
        self.envelope.trigger_off();
    }

    /// Render oscillator × envelope into `out`, using `scratch` for the
    /// envelope values. Both slices must be the same length.
    pub fn render(&mut self, out: &mut [f32], scratch: &mut [f32]) {
        debug_assert_eq!(out.len(), scratch.len());
        self.oscillator.render(out);
        self.envelope.render(scratch);
        for (o, &gain) in out.iter_mut().zip(scratch.iter()) {
            *o *= gain;
        }
    }

    pub fn state(&self) -> VoiceState {
        match self.envelope.stage() {
            EnvelopeStage::Idle => VoiceState::Finished,
            EnvelopeStage::Release => VoiceState::Releasing,
            _ => VoiceState::Active,
        }
    }

    /// Still producing sound (envelope not idle).
    pub fn is_live(&self) -> bool {
        self.envelope.is_active()
    }

    pub fn note(&self) -> u8 {
        self.note
    }

    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    pub fn age(&self) -> u64 {
        self.age
    }

    pub fn envelope(&self) -> &Envelope {
        &self.envelope
    }

    pub fn frequency(&self) -> f32 {
        self.oscillator.frequency()
    }
}
