use crate::dsp::lfo::{bipolar_to_unipolar, Lfo};

/*
Tremolo
=======

Amplitude modulation by a sine LFO:

    gain[n] = 1 − depth · (1 + sin(2π · rate · n / sample_rate)) / 2
    out[n]  = in[n] · gain[n]

Depth 0 leaves the signal alone; depth 1 swings the gain all the way from
1.0 down to silence once per LFO cycle. With rate 0 the LFO sits at
sin(0) = 0, so the gain is a constant 1 − depth / 2.
*/

pub struct Tremolo {
    lfo: Lfo,
    depth: f32,
}

impl Tremolo {
    pub fn new(depth: f32, rate: f32, sample_rate: f32) -> Self {
        Self {
            lfo: Lfo::new(rate, sample_rate),
            depth,
        }
    }

    #[inline]
    pub fn process_sample(&mut self, input: f32) -> f32 {
        let gain = 1.0 - self.depth * bipolar_to_unipolar(self.lfo.next_sample());
        input * gain
    }

    pub fn process(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.process_sample(*sample);
        }
    }

    pub fn reset(&mut self) {
        self.lfo.reset();
    }
}
