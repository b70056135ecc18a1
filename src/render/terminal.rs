use super::Renderer;
use crate::pitch::Clef;
use crate::staff::{BOTTOM_LINE_STEP, TOP_LINE_STEP};
use std::io::Write;
use tracing::warn;

const STAFF_COLUMNS: usize = 24;
const NOTE_COLUMN: usize = 13;
const LEDGER_HALF_WIDTH: usize = 3;
const LABEL_WIDTH: usize = 8;

/// Text-mode flashcards.
///
/// The card is redrawn on `show_answer_text`, which ends every question and
/// answer presentation, and on `clear`.
pub struct TerminalRenderer<W: Write> {
    out: W,
    clef: Clef,
    ledgers: Vec<i32>,
    note: Option<i32>,
    note_ledger: bool,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            clef: Clef::default(),
            ledgers: Vec::new(),
            note: None,
            note_ledger: false,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Staff rows from the highest step down, always showing one ledger
    /// position either side of the staff.
    pub fn frame(&self) -> Vec<String> {
        let mut top = TOP_LINE_STEP + 2;
        let mut bottom = BOTTOM_LINE_STEP - 2;
        for &step in self.ledgers.iter().chain(self.note.iter()) {
            top = top.max(step);
            bottom = bottom.min(step);
        }

        (bottom..=top)
            .rev()
            .map(|step| {
                let label = if step == 4 { self.clef.label() } else { "" };
                format!("{:<width$}{}", label, self.row(step), width = LABEL_WIDTH)
            })
            .collect()
    }

    fn row(&self, step: i32) -> String {
        let on_staff_line = step.rem_euclid(2) == 0 && (BOTTOM_LINE_STEP..=TOP_LINE_STEP).contains(&step);
        let mut cells = vec![if on_staff_line { '─' } else { ' ' }; STAFF_COLUMNS];

        if self.ledgers.contains(&step) {
            for cell in &mut cells[NOTE_COLUMN - LEDGER_HALF_WIDTH..=NOTE_COLUMN + LEDGER_HALF_WIDTH] {
                *cell = '─';
            }
        }
        if self.note == Some(step) {
            if self.note_ledger {
                cells[NOTE_COLUMN - 1] = '═';
                cells[NOTE_COLUMN + 1] = '═';
            }
            cells[NOTE_COLUMN] = 'o';
        }
        cells.into_iter().collect::<String>().trim_end().to_string()
    }

    fn write_card(&mut self, answer: &str) {
        let mut card = self.frame().join("\n");
        card.push('\n');
        card.push_str(&format!("{:<width$}{}\n\n", "", answer, width = LABEL_WIDTH));
        if let Err(e) = self.out.write_all(card.as_bytes()).and_then(|_| self.out.flush()) {
            warn!(error = %e, "failed to draw card");
        }
    }
}

impl<W: Write> Renderer for TerminalRenderer<W> {
    fn draw_staff(&mut self, clef: Clef) {
        self.clef = clef;
        self.ledgers.clear();
        self.note = None;
        self.note_ledger = false;
    }

    fn draw_ledgers(&mut self, steps: &[i32]) {
        self.ledgers = steps.to_vec();
    }

    fn draw_note(&mut self, step: i32) {
        self.note = Some(step);
    }

    fn draw_note_ledger(&mut self, _step: i32) {
        self.note_ledger = true;
    }

    fn show_answer_text(&mut self, text: &str) {
        let answer = if text.is_empty() { "?" } else { text };
        self.write_card(answer);
    }

    fn clear(&mut self) {
        self.ledgers.clear();
        self.note = None;
        self.note_ledger = false;
        self.write_card("(stopped)");
    }
}
