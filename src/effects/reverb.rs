use crate::dsp::delay::DelayLine;
use crate::dsp::seconds_to_samples;

/*
Reverb
======

A single feedback comb filter over the OUTPUT history:

    out[n] = in[n] + decay · out[n − D],     D = round(room_size · sample_rate)

Every echo is fed back in, so an impulse comes back every D samples, each
time scaled by `decay`:

    in:   1 0 0 0 0 0 0 0 0 ...
    out:  1 0 0 d 0 0 d² 0 0 ...      (D = 3)

Parameters
----------

Decay (0.0 - <1.0):
  Feedback gain. Higher = longer tail. 1.0 would never die away, so it is
  rejected when the stage is configured.

Room Size (seconds):
  Spacing between repeats, rounded to the nearest sample. The ring buffer
  holds exactly D samples of output history and persists across blocks, so
  a tail started in one block keeps ringing through the following ones.
*/

pub struct Reverb {
    history: DelayLine,
    delay_samples: usize,
    decay: f32,
}

impl Reverb {
    pub fn new(decay: f32, room_size: f32, sample_rate: f32) -> Self {
        let delay_samples = seconds_to_samples(room_size, sample_rate).max(1);
        Self {
            history: DelayLine::new(delay_samples),
            delay_samples,
            decay,
        }
    }

    #[inline]
    pub fn process_sample(&mut self, input: f32) -> f32 {
        let output = input + self.decay * self.history.read(self.delay_samples);
        self.history.write(output);
        output
    }

    pub fn process(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.process_sample(*sample);
        }
    }

    pub fn reset(&mut self) {
        self.history.reset();
    }

    pub fn delay_samples(&self) -> usize {
        self.delay_samples
    }
}
