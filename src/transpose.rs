use std::fmt;

use midly::num::u7;
use midly::MidiMessage;

use crate::error::TransposeError;

pub const LOWEST_NOTE: u8 = 0;
pub const HIGHEST_NOTE: u8 = 127;

/// Largest shift in either direction. At most one octave correction is ever
/// needed for shifts within this bound.
pub const MAX_SHIFT: i8 = 12;

/// Transpose a MIDI note number by `shift` semitones.
///
/// A result below [`LOWEST_NOTE`] is raised by an octave, then a result above
/// [`HIGHEST_NOTE`] is lowered by an octave. Both corrections apply to the same
/// running value.
///
/// # Panics
///
/// Panics if `note` is above 127 or `shift` is outside -12..=12.
pub fn transpose_note(note: u8, shift: i8) -> u8 {
    assert!(
        note <= HIGHEST_NOTE,
        "note value must be between {} and {}, got {}",
        LOWEST_NOTE,
        HIGHEST_NOTE,
        note
    );
    assert!(
        (-MAX_SHIFT..=MAX_SHIFT).contains(&shift),
        "transposition must be between -{} and {}, got {}",
        MAX_SHIFT,
        MAX_SHIFT,
        shift
    );

    let mut transposed = note as i16 + shift as i16;
    if transposed < LOWEST_NOTE as i16 {
        transposed += 12;
    }
    if transposed > HIGHEST_NOTE as i16 {
        transposed -= 12;
    }
    transposed as u8
}

/// A validated semitone offset in -12..=12.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Transposition(i8);

impl Transposition {
    pub fn new(semitones: i32) -> Result<Self, TransposeError> {
        if (-(MAX_SHIFT as i32)..=MAX_SHIFT as i32).contains(&semitones) {
            Ok(Self(semitones as i8))
        } else {
            Err(TransposeError::ShiftOutOfRange(semitones))
        }
    }

    pub fn semitones(self) -> i8 {
        self.0
    }

    pub fn apply(self, note: u8) -> u8 {
        transpose_note(note, self.0)
    }
}

impl fmt::Display for Transposition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<i32> for Transposition {
    type Error = TransposeError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Transpose a MIDI channel message in place.
///
/// Only note-on and note-off keys change. Returns whether `message` was a
/// note event.
pub fn transpose_message(message: &mut MidiMessage, shift: Transposition) -> bool {
    match message {
        MidiMessage::NoteOn { key, .. } | MidiMessage::NoteOff { key, .. } => {
            *key = u7::new(shift.apply(key.as_int()));
            true
        }
        MidiMessage::Aftertouch { .. }
        | MidiMessage::Controller { .. }
        | MidiMessage::ProgramChange { .. }
        | MidiMessage::ChannelAftertouch { .. }
        | MidiMessage::PitchBend { .. } => false,
    }
}
