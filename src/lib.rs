//! Polyphonic streaming synthesizer core.
//!
//! Voices (oscillator × envelope) are summed by a [`Mixer`](dsp::Mixer),
//! shaped by a Butterworth [`StreamingFilter`](dsp::StreamingFilter) and
//! run through an [`EffectChain`](effects::EffectChain). Every stage keeps
//! its state between calls, so rendering a signal in one buffer or in many
//! consecutive ones gives the same samples.
//!
//! ```
//! use streamsynth::{SynthConfig, SynthEngine};
//!
//! let (mut engine, mut notes) = SynthEngine::new(SynthConfig::default())?;
//! notes.note_on(60, 0.8)?;
//!
//! let mut block = [0.0f32; 256];
//! engine.render(&mut block);
//! # Ok::<(), streamsynth::SynthError>(())
//! ```

pub mod dsp; // Oscillators, envelopes, filters, mixing
pub mod effects; // Reverb, delay, chorus, tremolo
pub mod error;
pub mod synth; // Voice management and the engine

pub use error::{Result, SynthError};
pub use synth::{NoteSender, SynthConfig, SynthEngine, VoiceConfig};

/// Largest block any component renders at once. Scratch buffers are sized
/// to this at construction; longer requests are split.
pub const MAX_BLOCK_SIZE: usize = 2048;
