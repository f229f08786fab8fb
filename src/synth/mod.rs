// Purpose: Voice management, polyphony, note events and the engine
// This layer sits above the dsp primitives and the effect chain

pub mod config;
pub mod engine;
pub mod manager;
pub mod message;
pub mod voice;

pub use config::{SynthConfig, VoiceConfig};
pub use engine::SynthEngine;
pub use manager::VoiceManager;
pub use message::{MessageReceiver, NoteSender, SynthMessage};
pub use voice::{midi_note_to_freq, Voice, VoiceState};
