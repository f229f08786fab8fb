//! Weighted signal summing.

/*
Signal Mixing
=============

Mixing combines signals by ADDING them together, each scaled by a weight:

    output[i] = Σ weight_k × signal_k[i]

  weight      per-signal gain. The synth uses each voice's velocity.

  summing     adding at full level. Several voices peaking at 1.0 can sum
              past [-1.0, +1.0]; the engine leaves normalization to whoever
              consumes the buffer.

  wet/dry     effect blending, see `blend_dry_wet`.

Silence Is Not An Error
-----------------------

A polyphonic synth spends plenty of time with no voices sounding. Mixing
zero signals yields a buffer of zeros of the requested length.

Staging
-------

`Mixer` accumulates into a buffer sized when it is built, so staging a
signal is a multiply-add with no allocation:

    mixer.add_signal(&voice_a, 0.8);
    mixer.add_signal(&voice_b, 0.5);
    mixer.mix(&mut out);          // out = 0.8·a + 0.5·b, stage cleared
*/

pub struct Mixer {
    accum: Vec<f32>,
    staged_len: usize, // longest signal staged since the last mix
    signals: usize,
}

impl Mixer {
    /// A mixer that stages signals of up to `max_len` samples without
    /// allocating.
    pub fn new(max_len: usize) -> Self {
        Self {
            accum: vec![0.0; max_len],
            staged_len: 0,
            signals: 0,
        }
    }

    /// Stage `weight × signal`.
    pub fn add_signal(&mut self, signal: &[f32], weight: f32) {
        if signal.len() > self.accum.len() {
            // Only reachable when a caller outgrows the configured block size.
            self.accum.resize(signal.len(), 0.0);
        }

        for (acc, &s) in self.accum.iter_mut().zip(signal) {
            *acc += weight * s;
        }
        self.staged_len = self.staged_len.max(signal.len());
        self.signals += 1;
    }

    /// Write the weighted sum into `out` and clear the stage. Samples past
    /// the end of every staged signal are zero.
    pub fn mix(&mut self, out: &mut [f32]) {
        let n = out.len().min(self.accum.len());
        out[..n].copy_from_slice(&self.accum[..n]);
        out[n..].fill(0.0);
        self.clear();
    }

    pub fn mix_to_vec(&mut self, num_samples: usize) -> Vec<f32> {
        let mut out = vec![0.0; num_samples];
        self.mix(&mut out);
        out
    }

    /// Drop everything staged since the last mix.
    pub fn clear(&mut self) {
        self.accum[..self.staged_len].fill(0.0);
        self.staged_len = 0;
        self.signals = 0;
    }

    /// Number of signals staged since the last mix.
    pub fn signal_count(&self) -> usize {
        self.signals
    }
}

/// Blend dry and wet samples using linear crossfade.
///
/// output = (dry × (1-mix)) + (wet × mix)
#[inline]
pub fn blend_dry_wet(dry: f32, wet: f32, mix: f32) -> f32 {
    dry * (1.0 - mix) + wet * mix
}
