use super::Renderer;
use crate::pitch::Clef;
use crate::staff::StaffLayout;

const NOTE_HEAD_RX: f64 = 9.0;
const NOTE_HEAD_RY: f64 = 6.5;
const NOTE_HEAD_TILT: f64 = -20.0;
const CLEF_OFFSET_X: f64 = 40.0;
const CLEF_LABEL_OFFSET_Y: f64 = 46.0;
const ANSWER_OFFSET_Y: f64 = 24.0;

/// Keeps the current card and serializes it as an SVG document
#[derive(Debug, Clone)]
pub struct SvgRenderer {
    layout: StaffLayout,
    clef: Clef,
    ledgers: Vec<i32>,
    note: Option<i32>,
    note_ledger: Option<i32>,
    answer: String,
}

impl SvgRenderer {
    pub fn new(layout: StaffLayout) -> Self {
        Self {
            layout,
            clef: Clef::default(),
            ledgers: Vec::new(),
            note: None,
            note_ledger: None,
            answer: String::new(),
        }
    }

    pub fn layout(&self) -> &StaffLayout {
        &self.layout
    }

    /// Serialize the current card
    pub fn to_svg(&self) -> String {
        let layout = &self.layout;
        let mut svg = String::new();

        svg.push_str(&format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = layout.width,
            h = layout.height
        ));
        svg.push('\n');

        // Staff lines and clef
        svg.push_str("  <g class=\"staff\">\n");
        for line in 0..5 {
            svg.push_str(&line_element(
                layout.staff_left(),
                layout.staff_right(),
                layout.line_y(line),
                "staff-line",
            ));
        }
        let clef_x = layout.staff_left() - CLEF_OFFSET_X;
        svg.push_str(&format!(
            "    <text x=\"{}\" y=\"{}\" class=\"clef-symbol\" text-anchor=\"middle\">{}</text>\n",
            clef_x,
            layout.line_y(2),
            self.clef.symbol()
        ));
        svg.push_str(&format!(
            "    <text x=\"{}\" y=\"{}\" class=\"clef-label\" text-anchor=\"middle\">{}</text>\n",
            clef_x,
            layout.line_y(2) + CLEF_LABEL_OFFSET_Y,
            self.clef.label()
        ));
        svg.push_str("  </g>\n");

        // Ledger lines and the on-note mark
        svg.push_str("  <g class=\"overlay\">\n");
        let note_x = layout.note_x();
        for &step in &self.ledgers {
            svg.push_str(&line_element(
                note_x - layout.ledger_half_width,
                note_x + layout.ledger_half_width,
                layout.step_to_y(step),
                "ledger-line",
            ));
        }
        if let Some(step) = self.note_ledger {
            svg.push_str(&line_element(
                note_x - layout.note_ledger_half_width,
                note_x + layout.note_ledger_half_width,
                layout.step_to_y(step),
                "ledger-line",
            ));
        }
        svg.push_str("  </g>\n");

        svg.push_str("  <g class=\"notes\">\n");
        if let Some(step) = self.note {
            let y = layout.step_to_y(step);
            svg.push_str(&format!(
                "    <ellipse cx=\"{x}\" cy=\"{y}\" rx=\"{}\" ry=\"{}\" transform=\"rotate({} {x} {y})\" class=\"note-head\"/>\n",
                NOTE_HEAD_RX,
                NOTE_HEAD_RY,
                NOTE_HEAD_TILT,
                x = note_x,
                y = y
            ));
        }
        svg.push_str("  </g>\n");

        if !self.answer.is_empty() {
            svg.push_str(&format!(
                "  <text x=\"{}\" y=\"{}\" class=\"answer\" text-anchor=\"middle\">{}</text>\n",
                layout.width / 2.0,
                layout.height - ANSWER_OFFSET_Y,
                escape_xml(&self.answer)
            ));
        }

        svg.push_str("</svg>\n");
        svg
    }
}

impl Default for SvgRenderer {
    fn default() -> Self {
        Self::new(StaffLayout::default())
    }
}

impl Renderer for SvgRenderer {
    fn draw_staff(&mut self, clef: Clef) {
        self.clef = clef;
        self.ledgers.clear();
        self.note = None;
        self.note_ledger = None;
    }

    fn draw_ledgers(&mut self, steps: &[i32]) {
        self.ledgers = steps.to_vec();
    }

    fn draw_note(&mut self, step: i32) {
        self.note = Some(step);
    }

    fn draw_note_ledger(&mut self, step: i32) {
        self.note_ledger = Some(step);
    }

    fn show_answer_text(&mut self, text: &str) {
        self.answer = text.to_string();
    }

    fn clear(&mut self) {
        self.ledgers.clear();
        self.note = None;
        self.note_ledger = None;
        self.answer.clear();
    }
}

fn line_element(x1: f64, x2: f64, y: f64, class: &str) -> String {
    format!(
        "    <line x1=\"{}\" y1=\"{y}\" x2=\"{}\" y2=\"{y}\" class=\"{}\"/>\n",
        x1,
        x2,
        class,
        y = y
    )
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
