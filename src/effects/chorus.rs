use crate::dsp::delay::DelayLine;
use crate::dsp::lfo::Lfo;
use crate::dsp::mix::blend_dry_wet;

/*
Chorus
======

Mixes the input with a copy of ITSELF read back at a delay that an LFO
sweeps up and down:

    d[n]   = trunc(depth · sample_rate · sin(2π · rate · n / sample_rate))
    out[n] = (1 − mix) · in[n] + mix · (in[n] + in[n − d[n]])

The moving read position detunes the copy slightly, which is what thickens
the sound.

On the negative half of the LFO cycle d[n] would point into the future.
Nothing is known there yet, so the copy contributes silence, exactly like
reading from before the first sample ever processed.

Parameters
----------

Depth (seconds):
  Largest delay the sweep reaches. The input history is sized to hold it.

Rate (Hz):
  LFO speed. 0 keeps d at 0, so the copy is the input itself.

Mix (0.0 - 1.0):
  Dry/wet blend.
*/

pub struct Chorus {
    history: DelayLine,
    lfo: Lfo,
    depth_samples: f64,
    mix: f32,
}

impl Chorus {
    pub fn new(depth: f32, rate: f32, mix: f32, sample_rate: f32) -> Self {
        let depth_samples = depth as f64 * sample_rate as f64;
        let max_delay = depth_samples as usize;
        Self {
            // current input plus `max_delay` samples behind it
            history: DelayLine::new(max_delay + 1),
            lfo: Lfo::new(rate, sample_rate),
            depth_samples,
            mix,
        }
    }

    #[inline]
    pub fn process_sample(&mut self, input: f32) -> f32 {
        let offset = (self.depth_samples * self.lfo.next_sample() as f64).trunc();
        let delayed = if offset < 0.0 {
            self.history.write(input);
            0.0
        } else {
            let delay = (offset as usize).min(self.history.len() - 1);
            self.history.next_sample(input, delay)
        };
        blend_dry_wet(input, input + delayed, self.mix)
    }

    pub fn process(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.process_sample(*sample);
        }
    }

    pub fn reset(&mut self) {
        self.history.reset();
        self.lfo.reset();
    }
}
