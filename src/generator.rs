//! # Note Generator
//!
//! Picks the clef for each question and draws a note uniformly from that
//! clef's range. The random source is injected so that runs can be replayed
//! from a seed.
//!
//! ## Example
//! ```rust
//! use staffcard::{Clef, ClefMode, NoteGenerator};
//!
//! let mut generator = NoteGenerator::seeded(7);
//! let clef = generator.pick_clef(ClefMode::Fixed(Clef::Bass));
//! let note = generator.generate(clef);
//! assert!(Clef::Bass.range().contains(&note.degree));
//! ```

use crate::pitch::{Clef, Note};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Which clef questions are drawn on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClefMode {
    Fixed(Clef),
    /// Treble or bass with equal probability, chosen anew each question
    #[default]
    Random,
}

impl ClefMode {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "treble" => Some(ClefMode::Fixed(Clef::Treble)),
            "bass" => Some(ClefMode::Fixed(Clef::Bass)),
            "random" => Some(ClefMode::Random),
            _ => None,
        }
    }
}

/// Random note source
pub struct NoteGenerator<R: Rng = StdRng> {
    rng: R,
}

impl NoteGenerator<StdRng> {
    /// Generator seeded from the operating system
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }

    /// Deterministic generator for replayable sessions
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> NoteGenerator<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    pub fn pick_clef(&mut self, mode: ClefMode) -> Clef {
        pick_clef(mode, &mut self.rng)
    }

    pub fn generate(&mut self, clef: Clef) -> Note {
        generate(clef, &mut self.rng)
    }

    pub fn clef_for_degree(&mut self, mode: ClefMode, degree: i32) -> Clef {
        clef_for_degree(mode, degree, &mut self.rng)
    }
}

/// Resolve a clef mode to a concrete clef, flipping a fair coin for `Random`.
pub fn pick_clef(mode: ClefMode, rng: &mut impl Rng) -> Clef {
    match mode {
        ClefMode::Fixed(clef) => clef,
        ClefMode::Random => {
            if rng.gen_bool(0.5) {
                Clef::Treble
            } else {
                Clef::Bass
            }
        }
    }
}

/// Resolve a clef mode for a fixed degree. `Random` only chooses among the
/// clefs whose range holds `degree`, and falls back to a coin flip when
/// neither does. A fixed clef is kept even if the degree lies outside it.
pub fn clef_for_degree(mode: ClefMode, degree: i32, rng: &mut impl Rng) -> Clef {
    let fits = |clef: Clef| clef.range().contains(&degree);
    match (mode, fits(Clef::Treble), fits(Clef::Bass)) {
        (ClefMode::Random, true, false) => Clef::Treble,
        (ClefMode::Random, false, true) => Clef::Bass,
        _ => pick_clef(mode, rng),
    }
}

/// Draw a note uniformly from the clef's inclusive degree range.
///
/// The step index may fall outside the staff; the range keeps it within two
/// ledger lines either side.
pub fn generate(clef: Clef, rng: &mut impl Rng) -> Note {
    let degree = rng.gen_range(clef.range());
    Note::new(clef, degree)
}
