use crate::dsp::delay::DelayLine;
use crate::dsp::mix::blend_dry_wet;
use crate::dsp::seconds_to_samples;

/*
Feedback Delay
==============

An echo built from the stage's own output history:

    wet[n] = feedback · out[n − D]
    out[n] = (1 − mix) · in[n] + mix · (in[n] + wet[n])

so the first echo lands D samples after the input at `mix · feedback`, and
each further echo is the previous one times `mix · feedback` again.

Parameters
----------

Delay Time (seconds):
  Distance between echoes. D = delay_time · sample_rate rounded to the
  nearest sample, at least 1.

Feedback (0.0 - <1.0):
  How much of the output comes back around.

Mix (0.0 - 1.0):
  Dry/wet blend. 0 passes the input untouched.
*/

pub struct Delay {
    history: DelayLine,
    delay_samples: usize,
    feedback: f32,
    mix: f32,
}

impl Delay {
    pub fn new(delay_time: f32, feedback: f32, mix: f32, sample_rate: f32) -> Self {
        let delay_samples = seconds_to_samples(delay_time, sample_rate).max(1);
        Self {
            history: DelayLine::new(delay_samples),
            delay_samples,
            feedback,
            mix,
        }
    }

    #[inline]
    pub fn process_sample(&mut self, input: f32) -> f32 {
        let wet = self.feedback * self.history.read(self.delay_samples);
        let output = blend_dry_wet(input, input + wet, self.mix);
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
