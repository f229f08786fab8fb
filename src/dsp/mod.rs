//! Low-level DSP primitives used by the effect chain and the synth engine.
//!
//! Every primitive owns its own state and keeps it between calls, so a
//! signal rendered in one block or in many consecutive blocks comes out the
//! same. Buffers are sized at construction; the per-sample paths never
//! allocate.

/// Butterworth coefficient design.
pub(crate) mod butterworth;
/// Fixed-size circular history buffer.
pub mod delay;
/// Attack/hold/decay/sustain/release envelope generator.
pub mod envelope;
/// Streaming Butterworth IIR filter.
pub mod filter;
/// LFO phase accumulator and the bipolar-to-unipolar helper.
pub mod lfo;
/// Weighted signal mixer.
pub mod mix;
/// AM/FM modulation.
pub mod modulate;
/// Oscillator waveforms and seeded noise.
pub mod oscillator;

/// Convert a duration to a whole number of samples, rounding to nearest.
pub(crate) fn seconds_to_samples(seconds: f32, sample_rate: f32) -> usize {
    (seconds as f64 * sample_rate as f64).round() as usize
}

pub use envelope::{Envelope, EnvelopeConfig, EnvelopeCurve, EnvelopeStage, EnvelopeState};
pub use filter::{Cutoff, FilterConfig, FilterType, StreamingFilter};
pub use mix::Mixer;
pub use modulate::{ModulationType, Modulator};
pub use oscillator::{Oscillator, Waveform};
