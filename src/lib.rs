pub mod config;
pub mod driver;
pub mod error;
pub mod generator;
pub mod pitch;
pub mod render;
pub mod scheduler;
pub mod staff;
pub mod timer;

pub use config::{ConfigSource, FileConfig, RawConfig, StaticConfig, TrainerSettings};
pub use error::*;
pub use generator::{ClefMode, NoteGenerator};
pub use pitch::{decode, encode, note_name, Clef, Letter, NamingStyle, Note, Pitch};
pub use render::{present_question, Renderer, SvgRenderer, TerminalRenderer};
pub use scheduler::{Actions, Phase, QuizEvent, QuizScheduler, QuizState};
pub use staff::{ledger_lines, needs_note_ledger, StaffLayout};
pub use timer::{DeadlineTimer, Timer, TimerHandle};

/// Render a single flashcard as SVG.
/// This is the entry point for producing a card without running the quiz.
pub fn render_card(note: &Note, answer: Option<NamingStyle>) -> String {
    let mut renderer = SvgRenderer::default();
    present_question(&mut renderer, note);
    if let Some(style) = answer {
        renderer.show_answer_text(&note.name(style));
    }
    renderer.to_svg()
}

/// Build the note for an explicit degree, checking it against the clef's range
pub fn note_in_range(clef: Clef, degree: i32) -> Result<Note, TrainerError> {
    let range = clef.range();
    if !range.contains(&degree) {
        return Err(TrainerError::OutOfRange {
            degree,
            clef: clef.as_str(),
            min: *range.start(),
            max: *range.end(),
        });
    }
    Ok(Note::new(clef, degree))
}
