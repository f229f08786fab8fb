use crate::dsp::{Envelope, Mixer, Oscillator};
use crate::error::Result;
use crate::synth::config::VoiceConfig;
use crate::synth::voice::{Voice, VoiceState};
use crate::MAX_BLOCK_SIZE;

/*
Voice Management
================

Voices are created on note-on and dropped once their envelope has finished
its release, so only sounding notes cost anything to render. The voice list
never grows past `max_polyphony` and is allocated at that capacity up front.

  note_on (same note live)   restart that voice in place
  note_on (below capacity)   new voice
  note_on (at capacity)      steal: oldest releasing voice first, else the
                             oldest voice overall
  note_off                   release the voice; it keeps sounding through
                             its release stage
  render                     Σ velocity · (osc × env), then drop voices
                             whose envelope reached Idle

"Oldest" is by age: a counter bumped on every note-on, so the voice that
was (re)struck longest ago has the lowest age.
*/

pub struct VoiceManager {
    voices: Vec<Voice>,
    max_polyphony: usize,
    // Cloned for every new voice, so note_on never has to validate.
    oscillator: Oscillator,
    envelope: Envelope,
    next_age: u64,
    voice_buffer: Vec<f32>,
    envelope_buffer: Vec<f32>,
}

impl VoiceManager {
    pub fn new(max_polyphony: usize, voice: VoiceConfig, sample_rate: f32) -> Result<Self> {
        Ok(Self {
            voices: Vec::with_capacity(max_polyphony),
            max_polyphony,
            oscillator: voice.oscillator(sample_rate)?,
            envelope: Envelope::new(voice.envelope, sample_rate)?,
            next_age: 0,
            voice_buffer: vec![0.0; MAX_BLOCK_SIZE],
            envelope_buffer: vec![0.0; MAX_BLOCK_SIZE],
        })
    }

    pub fn note_on(&mut self, note: u8, velocity: f32) {
        let age = self.next_age;
        self.next_age += 1;

        if let Some(voice) = self.voices.iter_mut().find(|v| v.note() == note && v.is_live()) {
            voice.retrigger(velocity, age);
            return;
        }

        self.voices.retain(Voice::is_live);
        let voice = Voice::start(
            note,
            velocity,
            age,
            self.oscillator.clone(),
            self.envelope.clone(),
        );

        if self.voices.len() < self.max_polyphony {
            self.voices.push(voice);
        } else if let Some(idx) = self.steal_index() {
            self.voices[idx] = voice;
        }
    }

    pub fn note_off(&mut self, note: u8) {
        for voice in self.voices.iter_mut().filter(|v| v.note() == note) {
            voice.release();
        }
    }

    pub fn all_notes_off(&mut self) {
        for voice in &mut self.voices {
            voice.release();
        }
    }

    /// Mix every live voice into `out`. `out` may be any length; it is
    /// rendered in pieces of at most `MAX_BLOCK_SIZE`.
    pub fn render(&mut self, out: &mut [f32], mixer: &mut Mixer) {
        for block in out.chunks_mut(MAX_BLOCK_SIZE) {
            let n = block.len();
            for voice in &mut self.voices {
                let signal = &mut self.voice_buffer[..n];
                voice.render(signal, &mut self.envelope_buffer[..n]);
                mixer.add_signal(signal, voice.velocity());
            }
            mixer.mix(block);
        }

        self.voices.retain(Voice::is_live);
    }

    fn steal_index(&self) -> Option<usize> {
        let oldest = |state: Option<VoiceState>| {
            self.voices
                .iter()
                .enumerate()
                .filter(|(_, v)| state.map_or(true, |s| v.state() == s))
                .min_by_key(|(_, v)| v.age())
                .map(|(idx, _)| idx)
        };

        oldest(Some(VoiceState::Releasing)).or_else(|| oldest(None))
    }

    pub fn live_count(&self) -> usize {
        self.voices.iter().filter(|v| v.is_live()).count()
    }

    pub fn is_live(&self, note: u8) -> bool {
        self.voices.iter().any(|v| v.note() == note && v.is_live())
    }

    pub fn voices(&self) -> impl Iterator<Item = &Voice> {
        self.voices.iter()
    }

    pub fn max_polyphony(&self) -> usize {
        self.max_polyphony
    }
}
