//! # Rendering
//!
//! The quiz core only produces data: a clef, a note's step index, the ledger
//! positions around it and an answer string. A [`Renderer`] turns those into
//! something visible.
//!
//! ## Sub-modules
//! - `svg` - Builds an SVG document of the current card
//! - `terminal` - Draws the staff as text on any `io::Write`
//!
//! ## Call Order
//! A question is presented as `draw_staff`, `draw_ledgers`, `draw_note`, an
//! optional `draw_note_ledger`, then `show_answer_text("")` to hide the
//! previous answer. Revealing the answer is a single `show_answer_text`.
//! Stopping calls `clear`.

mod svg;
mod terminal;

pub use svg::SvgRenderer;
pub use terminal::TerminalRenderer;

use crate::pitch::{Clef, Note};
use crate::staff::{ledger_lines, needs_note_ledger};

/// Text shown on the idle card before the first question
pub const IDLE_PROMPT: &str = "Press start";

/// Drawing surface for flashcards
pub trait Renderer {
    /// Draw the five staff lines and the clef symbol, discarding any note.
    fn draw_staff(&mut self, clef: Clef);

    /// Draw full-width ledger lines at the given step positions.
    fn draw_ledgers(&mut self, steps: &[i32]);

    /// Draw the note head at a step position.
    fn draw_note(&mut self, step: i32);

    /// Draw the short mark through a note head that sits on a ledger position.
    fn draw_note_ledger(&mut self, step: i32);

    /// Show the answer line. An empty string hides it.
    fn show_answer_text(&mut self, text: &str);

    /// Remove the note and answer, leaving an empty card.
    fn clear(&mut self);
}

/// Draw a question card for `note`, with the answer hidden.
pub fn present_question<R: Renderer + ?Sized>(renderer: &mut R, note: &Note) {
    renderer.draw_staff(note.clef);
    renderer.draw_ledgers(&ledger_lines(note.step));
    renderer.draw_note(note.step);
    if needs_note_ledger(note.step) {
        renderer.draw_note_ledger(note.step);
    }
    renderer.show_answer_text("");
}

/// Draw the card shown before the quiz starts: E4 on the bottom treble line.
pub fn present_idle<R: Renderer + ?Sized>(renderer: &mut R) {
    let placeholder = Note::new(Clef::Treble, Clef::Treble.bottom_line_degree());
    present_question(renderer, &placeholder);
    renderer.show_answer_text(IDLE_PROMPT);
}
