use rtrb::{Consumer, Producer};

use crate::error::{check_range, Result, SynthError};

/// Note event handed from a control thread to the engine.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum SynthMessage {
    NoteOn { note: u8, velocity: f32 },
    NoteOff { note: u8 },
    AllNotesOff,
}

impl SynthMessage {
    /// Reject notes above 127 and velocities outside `[0, 1]`.
    pub fn validate(&self) -> Result<()> {
        match *self {
            SynthMessage::NoteOn { note, velocity } => {
                validate_note(note)?;
                check_range("velocity", velocity, 0.0, 1.0, "a velocity in [0, 1]")
            }
            SynthMessage::NoteOff { note } => validate_note(note),
            SynthMessage::AllNotesOff => Ok(()),
        }
    }
}

pub(crate) fn validate_note(note: u8) -> Result<()> {
    if note <= 127 {
        Ok(())
    } else {
        Err(SynthError::parameter("note", note, "a MIDI note in 0..=127"))
    }
}

pub trait MessageReceiver {
    fn pop(&mut self) -> Option<SynthMessage>;
}

impl MessageReceiver for Consumer<SynthMessage> {
    fn pop(&mut self) -> Option<SynthMessage> {
        Consumer::pop(self).ok()
    }
}

/// Control-thread handle for queueing note events.
///
/// Events are validated here, before they reach the realtime thread, and
/// applied at the start of the engine's next `render` call.
pub struct NoteSender {
    tx: Producer<SynthMessage>,
}

impl NoteSender {
    pub(crate) fn new(tx: Producer<SynthMessage>) -> Self {
        Self { tx }
    }

    pub fn send(&mut self, message: SynthMessage) -> Result<()> {
        message.validate()?;
        self.tx.push(message).map_err(|_| {
            log::warn!("note queue full, dropping {:?}", message);
            SynthError::QueueFull
        })
    }

    pub fn note_on(&mut self, note: u8, velocity: f32) -> Result<()> {
        self.send(SynthMessage::NoteOn { note, velocity })
    }

    pub fn note_off(&mut self, note: u8) -> Result<()> {
        self.send(SynthMessage::NoteOff { note })
    }

    pub fn all_notes_off(&mut self) -> Result<()> {
        self.send(SynthMessage::AllNotesOff)
    }

    /// Free slots left in the queue.
    pub fn slots(&self) -> usize {
        self.tx.slots()
    }

    /// True once the engine holding the other end has been dropped.
    pub fn is_abandoned(&self) -> bool {
        self.tx.is_abandoned()
    }
}
