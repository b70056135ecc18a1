//! # Staff Geometry
//!
//! Maps step indices to vertical coordinates on a five-line staff and works out
//! which ledger lines a note needs.
//!
//! ## Coordinates
//! ```text
//!  step 10  - - - - -   ledger line above
//!  step  8  ─────────   top line      (line 4)
//!  step  6  ─────────                 (line 3)
//!  step  4  ─────────                 (line 2)
//!  step  2  ─────────                 (line 1)
//!  step  0  ─────────   bottom line   (line 0)
//!  step -2  - - - - -   ledger line below
//! ```
//!
//! Y grows downward. Each step is half a line spacing, so odd steps land in
//! the spaces between lines.
//!
//! ## Ledger Lines
//! Ledger lines only ever sit on even (line) positions two steps apart. A note
//! outside the staff gets every ledger line from the staff edge out to the
//! line at or beyond the note, so a note in the space just below the bottom
//! line still gets the `-2` ledger. A note that sits exactly on a ledger
//! position additionally gets a short mark through its head.

/// Step index of the bottom staff line
pub const BOTTOM_LINE_STEP: i32 = 0;
/// Step index of the top staff line
pub const TOP_LINE_STEP: i32 = 8;

/// Pixel layout of the staff card
#[derive(Debug, Clone, PartialEq)]
pub struct StaffLayout {
    pub width: f64,
    pub height: f64,
    /// Room left of the staff for the clef symbol
    pub margin_left: f64,
    pub margin_right: f64,
    /// Y of the top staff line
    pub top: f64,
    /// Distance between adjacent staff lines
    pub line_spacing: f64,
    /// Horizontal position of the note as a fraction of the staff width
    pub note_position: f64,
    /// Half-width of a full ledger line
    pub ledger_half_width: f64,
    /// Half-width of the mark drawn through a note head on a ledger position
    pub note_ledger_half_width: f64,
}

impl Default for StaffLayout {
    fn default() -> Self {
        Self {
            width: 700.0,
            height: 220.0,
            margin_left: 80.0,
            margin_right: 40.0,
            top: 60.0,
            line_spacing: 16.0,
            note_position: 0.55,
            ledger_half_width: 22.0,
            note_ledger_half_width: 14.0,
        }
    }
}

impl StaffLayout {
    /// Y of staff line `line_index` in `0..=4`, 0 being the bottom line.
    pub fn line_y(&self, line_index: i32) -> f64 {
        self.top + (4 - line_index) as f64 * self.line_spacing
    }

    pub fn step_height(&self) -> f64 {
        self.line_spacing / 2.0
    }

    /// Y of any step position, lines and spaces, inside or outside the staff.
    pub fn step_to_y(&self, step: i32) -> f64 {
        self.line_y(0) - step as f64 * self.step_height()
    }

    pub fn staff_left(&self) -> f64 {
        self.margin_left
    }

    pub fn staff_right(&self) -> f64 {
        self.width - self.margin_right
    }

    pub fn staff_width(&self) -> f64 {
        self.staff_right() - self.staff_left()
    }

    /// X of the note head centre
    pub fn note_x(&self) -> f64 {
        self.margin_left + self.staff_width() * self.note_position
    }
}

/// Ledger line positions needed for a note at `step`, ordered from the staff
/// outward.
///
/// ```rust
/// use staffcard::staff::ledger_lines;
///
/// assert!(ledger_lines(4).is_empty());
/// assert_eq!(ledger_lines(-3), vec![-2, -4]);
/// assert_eq!(ledger_lines(11), vec![10, 12]);
/// ```
pub fn ledger_lines(step: i32) -> Vec<i32> {
    if step < BOTTOM_LINE_STEP {
        // Odd steps round down to the line below them
        let lowest = step - step.rem_euclid(2);
        (lowest..=BOTTOM_LINE_STEP - 2).rev().step_by(2).collect()
    } else if step > TOP_LINE_STEP {
        let highest = step + step.rem_euclid(2);
        (TOP_LINE_STEP + 2..=highest).step_by(2).collect()
    } else {
        Vec::new()
    }
}

/// Whether a note head sits exactly on a ledger position
pub fn needs_note_ledger(step: i32) -> bool {
    (step < BOTTOM_LINE_STEP || step > TOP_LINE_STEP) && step.rem_euclid(2) == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pitch::{Clef, Note};

    #[test]
    fn test_line_positions() {
        let layout = StaffLayout::default();
        assert_eq!(layout.line_y(4), 60.0);
        assert_eq!(layout.line_y(0), 124.0);
        assert_eq!(layout.step_to_y(0), layout.line_y(0));
        assert_eq!(layout.step_to_y(8), layout.line_y(4));
        assert_eq!(layout.step_to_y(1), 116.0);
        assert_eq!(layout.step_to_y(-2), 140.0);
    }

    #[test]
    fn test_no_ledgers_inside_staff() {
        for step in 0..=8 {
            assert!(ledger_lines(step).is_empty(), "step {} should need no ledgers", step);
            assert!(!needs_note_ledger(step));
        }
    }

    #[test]
    fn test_ledgers_below_staff() {
        assert_eq!(ledger_lines(-1), vec![-2]);
        assert_eq!(ledger_lines(-2), vec![-2]);
        assert_eq!(ledger_lines(-4), vec![-2, -4]);
        assert_eq!(ledger_lines(-5), vec![-2, -4, -6]);
    }

    #[test]
    fn test_ledgers_above_staff() {
        assert_eq!(ledger_lines(9), vec![10]);
        assert_eq!(ledger_lines(10), vec![10]);
        assert_eq!(ledger_lines(12), vec![10, 12]);
        assert_eq!(ledger_lines(13), vec![10, 12, 14]);
    }

    #[test]
    fn test_note_ledger_only_on_line_positions() {
        assert!(needs_note_ledger(-2));
        assert!(needs_note_ledger(10));
        assert!(!needs_note_ledger(-1));
        assert!(!needs_note_ledger(9));
        assert!(!needs_note_ledger(-3));
    }

    #[test]
    fn test_g4_sits_on_second_line() {
        // G4 on treble: second line from the bottom, no ledgers
        let layout = StaffLayout::default();
        let note = Note::new(Clef::Treble, 32);
        assert_eq!(note.step, 2);
        assert!(ledger_lines(note.step).is_empty());
        assert!(!needs_note_ledger(note.step));
        assert_eq!(layout.step_to_y(note.step), layout.line_y(1));
    }

    #[test]
    fn test_a5_sits_on_first_ledger_above() {
        let layout = StaffLayout::default();
        let note = Note::new(Clef::Treble, 40);
        assert_eq!(note.step, 10);
        assert_eq!(ledger_lines(note.step), vec![10]);
        assert!(needs_note_ledger(note.step));
        assert_eq!(layout.step_to_y(note.step), layout.line_y(4) - layout.line_spacing);
    }

    #[test]
    fn test_note_x() {
        let layout = StaffLayout::default();
        assert_eq!(layout.staff_width(), 580.0);
        assert!((layout.note_x() - 399.0).abs() < 1e-9);
    }
}
