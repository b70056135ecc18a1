//! # Pitch Model
//!
//! Pure conversions between a linear scale-degree number and the octave/letter
//! identity of a natural note, plus the clef reference points that place a
//! degree on the staff.
//!
//! ## Scale Degrees
//! A scale degree counts letter steps from C0: `degree = octave * 7 + letter`,
//! where the letter index maps `C D E F G A B` to `0..=6`. Accidentals do not
//! exist in this model; every degree is a white key.
//!
//! ```text
//! degree:  28  29  30  31  32  33  34  35
//! note:    C4  D4  E4  F4  G4  A4  B4  C5
//! ```
//!
//! ## Step Index
//! A note's step index is its distance in letter steps from the bottom line of
//! its clef's staff. `0` is the bottom line, `8` the top line, even values sit
//! on lines and odd values in spaces. Values outside `0..=8` need ledger lines.
//!
//! ## Example
//! ```rust
//! use staffcard::{Clef, NamingStyle, Note};
//!
//! let note = Note::new(Clef::Treble, 32);
//! assert_eq!(note.step, 2);
//! assert_eq!(note.name(NamingStyle::Letter), "G4");
//! ```

use std::ops::RangeInclusive;

/// Number of letter names in one octave
pub const LETTERS_PER_OCTAVE: i32 = 7;

/// Encode an octave and letter index as a scale-degree number.
pub const fn encode(octave: i32, letter_index: i32) -> i32 {
    octave * LETTERS_PER_OCTAVE + letter_index
}

/// Split a scale-degree number into its octave and letter.
///
/// Uses floor division, so negative degrees still yield a letter in `C..=B`:
/// degree `-1` is B in octave `-1`.
pub fn decode(degree: i32) -> Pitch {
    let octave = degree.div_euclid(LETTERS_PER_OCTAVE);
    let letter = Letter::from_index(degree - octave * LETTERS_PER_OCTAVE);
    Pitch { octave, letter }
}

/// Natural note names C through B
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Letter {
    #[default]
    C,
    D,
    E,
    F,
    G,
    A,
    B,
}

const LETTER_NAMES: [&str; 7] = ["C", "D", "E", "F", "G", "A", "B"];
const SOLFEGE_NAMES: [&str; 7] = ["ド", "レ", "ミ", "ファ", "ソ", "ラ", "シ"];

impl Letter {
    /// Letter for an index already reduced into `0..=6`.
    fn from_index(index: i32) -> Self {
        match index {
            0 => Letter::C,
            1 => Letter::D,
            2 => Letter::E,
            3 => Letter::F,
            4 => Letter::G,
            5 => Letter::A,
            6 => Letter::B,
            _ => unreachable!("letter index {} not reduced modulo 7", index),
        }
    }

    /// Position of the letter within the octave (C = 0, B = 6)
    pub fn index(&self) -> i32 {
        *self as i32
    }
}

/// Octave and letter of a scale degree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pitch {
    pub octave: i32,
    pub letter: Letter,
}

impl Pitch {
    pub fn degree(&self) -> i32 {
        encode(self.octave, self.letter.index())
    }
}

/// Staff clef
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Clef {
    #[default]
    Treble,
    Bass,
}

impl Clef {
    /// Degree of the note sitting on the bottom staff line (E4 treble, G2 bass)
    pub fn bottom_line_degree(&self) -> i32 {
        match self {
            Clef::Treble => encode(4, 2),
            Clef::Bass => encode(2, 4),
        }
    }

    /// Inclusive range of degrees a question may ask about.
    ///
    /// Treble covers C4..A5 and bass covers E2..C4, which keeps every question
    /// within two ledger lines of the staff.
    pub fn range(&self) -> RangeInclusive<i32> {
        match self {
            Clef::Treble => encode(4, 0)..=encode(5, 5),
            Clef::Bass => encode(2, 2)..=encode(4, 0),
        }
    }

    /// Musical symbol drawn at the start of the staff
    pub fn symbol(&self) -> &'static str {
        match self {
            Clef::Treble => "𝄞",
            Clef::Bass => "𝄢",
        }
    }

    /// Text label drawn under the symbol, for fonts without the music glyphs
    pub fn label(&self) -> &'static str {
        match self {
            Clef::Treble => "Treble",
            Clef::Bass => "Bass",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Clef::Treble => "treble",
            Clef::Bass => "bass",
        }
    }
}

/// How note names are spelled in answers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NamingStyle {
    /// C D E F G A B
    #[default]
    Letter,
    /// ド レ ミ ファ ソ ラ シ
    Solfege,
}

impl NamingStyle {
    /// Parse a naming style. Accepts `solfège` with or without the accent.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "letter" => Some(NamingStyle::Letter),
            "solfege" | "solfège" => Some(NamingStyle::Solfege),
            _ => None,
        }
    }

    fn table(&self) -> &'static [&'static str; 7] {
        match self {
            NamingStyle::Letter => &LETTER_NAMES,
            NamingStyle::Solfege => &SOLFEGE_NAMES,
        }
    }
}

/// A note placed on a clef's staff. Recreated for every question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Note {
    pub clef: Clef,
    pub degree: i32,
    pub octave: i32,
    pub letter: Letter,
    /// Letter steps above the bottom staff line; negative below the staff
    pub step: i32,
}

impl Note {
    pub fn new(clef: Clef, degree: i32) -> Self {
        let Pitch { octave, letter } = decode(degree);
        Self {
            clef,
            degree,
            octave,
            letter,
            step: degree - clef.bottom_line_degree(),
        }
    }

    /// Name of the note with its octave number, e.g. `C4` or `ド4`
    pub fn name(&self, style: NamingStyle) -> String {
        note_name(self, style)
    }
}

/// Spell a note in the given naming style followed by its octave number.
pub fn note_name(note: &Note, style: NamingStyle) -> String {
    let text = style.table()[note.letter.index() as usize];
    format!("{}{}", text, note.octave)
}
