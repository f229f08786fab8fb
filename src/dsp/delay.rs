/// Fixed-size circular history buffer.
///
/// Sized once at construction; reads and writes never allocate. `read(d)`
/// returns the sample written `d` writes ago, so `read(1)` is the most
/// recent one and `read(len)` the oldest still held.
pub struct DelayLine {
    buffer: Vec<f32>,
    write_pos: usize,
}

impl DelayLine {
    pub fn new(len: usize) -> Self {
        Self {
            buffer: vec![0.0; len.max(1)],
            write_pos: 0,
        }
    }

    /// Samples of history held. Never 0.
    pub(crate) fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Sample written `delay` writes ago (`1..=len`). Unwritten history is 0.
    #[inline]
    pub fn read(&self, delay: usize) -> f32 {
        let len = self.buffer.len();
        debug_assert!(delay >= 1 && delay <= len);
        let delay = delay.clamp(1, len);
        self.buffer[(self.write_pos + len - delay) % len]
    }

    #[inline]
    pub fn write(&mut self, sample: f32) {
        self.buffer[self.write_pos] = sample;
        self.write_pos = (self.write_pos + 1) % self.buffer.len();
    }

    /// Write `sample`, then return the one from `delay` samples before it.
    pub fn next_sample(&mut self, sample: f32, delay: usize) -> f32 {
        self.write(sample);
        if delay == 0 {
            sample
        } else {
            self.read(delay + 1)
        }
    }

    pub fn reset(&mut self) {
        self.buffer.fill(0.0);
        self.write_pos = 0;
    }
}
