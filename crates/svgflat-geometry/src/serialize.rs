//! Minimal path data serialization.
//!
//! Numbers are rounded to a fixed number of decimals with trailing zeros
//! stripped, and the comma before a negative operand is dropped. Line
//! segments pick the shortest of their absolute, relative and single-axis
//! encodings.
//!
//! The writer tracks the pen position a reader of the output would see
//! (rounded values, not the exact input), so relative encodings never
//! accumulate rounding error: every emitted point stays within half a unit
//! of the last decimal from the exact one.

use crate::path::{Command, Path};

/// Decimal places used when none are requested.
pub const DEFAULT_PRECISION: usize = 4;

/// Format a number with at most `digits` decimals. Exact halves round
/// away from zero.
pub fn format_number(value: f64, digits: usize) -> String {
    let s = format!("{:.*}", digits, round_half_away(value, digits));
    let s = if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s
    };

    if s == "-0" {
        "0".to_string()
    } else {
        s
    }
}

/// Round to `digits` decimals, halves away from zero.
///
/// `format!` alone rounds halves to even (`2.5` becomes `2`).
fn round_half_away(value: f64, digits: usize) -> f64 {
    let factor = 10f64.powi(i32::try_from(digits).unwrap_or(i32::MAX));
    let scaled = value * factor;
    // Beyond 2^52 every f64 is already an integer.
    if !scaled.is_finite() || scaled.abs() >= 4_503_599_627_370_496.0 {
        return value;
    }
    scaled.round() / factor
}

/// Join numbers into one operand group, omitting the comma before
/// negative values.
pub fn join_numbers(digits: usize, values: &[f64]) -> String {
    let mut s = String::new();
    for (i, value) in values.iter().enumerate() {
        let formatted = format_number(*value, digits);
        if i > 0 && !formatted.starts_with('-') {
            s.push(',');
        }
        s.push_str(&formatted);
    }
    s
}

/// The value a reader recovers from the formatted number.
fn quantize(value: f64, digits: usize) -> f64 {
    format_number(value, digits).parse().unwrap_or(value)
}

/// One way of writing a segment, with the pen position it leaves behind.
struct Candidate {
    text: String,
    pen: (f64, f64),
}

/// Shortest candidate; the first one wins ties.
fn shortest(candidates: Vec<Candidate>) -> Option<Candidate> {
    let mut best: Option<Candidate> = None;
    for candidate in candidates {
        match &best {
            Some(b) if b.text.len() <= candidate.text.len() => {}
            _ => best = Some(candidate),
        }
    }
    best
}

struct PathWriter {
    digits: usize,
    out: String,
    /// Pen position as decoded from the output so far.
    pen: (f64, f64),
    /// Start of the current subpath, as decoded.
    start: (f64, f64),
}

impl PathWriter {
    fn new(digits: usize) -> Self {
        Self {
            digits,
            out: String::new(),
            pen: (0.0, 0.0),
            start: (0.0, 0.0),
        }
    }

    fn write_absolute(&mut self, letter: char, values: &[f64], end: (f64, f64)) {
        self.out.push(letter);
        self.out.push_str(&join_numbers(self.digits, values));
        self.pen = (quantize(end.0, self.digits), quantize(end.1, self.digits));
    }

    fn write_line(&mut self, x: f64, y: f64) {
        let digits = self.digits;
        let (px, py) = self.pen;
        let dx = x - px;
        let dy = y - py;

        let mut candidates = Vec::with_capacity(2);
        if format_number(dx, digits) == "0" {
            candidates.push(Candidate {
                text: format!("V{}", join_numbers(digits, &[y])),
                pen: (px, quantize(y, digits)),
            });
            candidates.push(Candidate {
                text: format!("v{}", join_numbers(digits, &[dy])),
                pen: (px, py + quantize(dy, digits)),
            });
        } else if format_number(dy, digits) == "0" {
            candidates.push(Candidate {
                text: format!("H{}", join_numbers(digits, &[x])),
                pen: (quantize(x, digits), py),
            });
            candidates.push(Candidate {
                text: format!("h{}", join_numbers(digits, &[dx])),
                pen: (px + quantize(dx, digits), py),
            });
        } else {
            candidates.push(Candidate {
                text: format!("L{}", join_numbers(digits, &[x, y])),
                pen: (quantize(x, digits), quantize(y, digits)),
            });
            candidates.push(Candidate {
                text: format!("l{}", join_numbers(digits, &[dx, dy])),
                pen: (px + quantize(dx, digits), py + quantize(dy, digits)),
            });
        }

        if let Some(best) = shortest(candidates) {
            self.out.push_str(&best.text);
            self.pen = best.pen;
        }
    }

    fn write(&mut self, command: &Command) {
        match *command {
            Command::MoveTo { x, y } => {
                self.write_absolute('M', &[x, y], (x, y));
                self.start = self.pen;
            }
            Command::LineTo { x, y } => self.write_line(x, y),
            Command::QuadTo { x1, y1, x, y } => {
                self.write_absolute('Q', &[x1, y1, x, y], (x, y));
            }
            Command::CurveTo {
                x1,
                y1,
                x2,
                y2,
                x,
                y,
            } => {
                self.write_absolute('C', &[x1, y1, x2, y2, x, y], (x, y));
            }
            Command::ArcTo {
                rx,
                ry,
                x_rotation,
                large_arc,
                sweep,
                x,
                y,
            } => {
                let large_arc = if large_arc { 1.0 } else { 0.0 };
                let sweep = if sweep { 1.0 } else { 0.0 };
                self.write_absolute('A', &[rx, ry, x_rotation, large_arc, sweep, x, y], (x, y));
            }
            Command::ClosePath => {
                self.out.push('z');
                self.pen = self.start;
            }
        }
    }
}

/// Serialize a path to the shortest path data this writer can produce,
/// rounding to `digits` decimals.
pub fn serialize(path: &Path, digits: usize) -> String {
    let mut writer = PathWriter::new(digits);
    for command in path {
        writer.write(command);
    }
    writer.out
}
