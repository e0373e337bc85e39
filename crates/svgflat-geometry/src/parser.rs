//! Path data parser.
//!
//! Resolves the stateful path grammar (relative operands, implicit command
//! repetition, `H`/`V` single-axis lines, `S`/`T` reflected control points,
//! close-then-continue) into a [`Path`] of absolute canonical commands.

use tracing::trace;

use crate::path::{Command, Path};
use crate::tokenizer::{tokenize_path_data, tokenize_points, Token};
use crate::{GeometryError, GeometryResult};

/// Number of operands one group of a command consumes.
fn arity(command: char) -> usize {
    match command {
        'M' | 'L' | 'T' => 2,
        'H' | 'V' => 1,
        'S' | 'Q' => 4,
        'C' => 6,
        'A' => 7,
        _ => 0,
    }
}

/// Reflect `control` about `(x, y)`.
fn reflect(control: (f64, f64), x: f64, y: f64) -> (f64, f64) {
    (x + (x - control.0), y + (y - control.1))
}

/// Path data parser.
pub struct PathParser {
    tokens: Vec<Token>,
    pos: usize,
    path: Path,
    /// Current point.
    x: f64,
    y: f64,
    /// Start of the current subpath.
    start_x: f64,
    start_y: f64,
    /// Second control point of the previous cubic.
    last_cubic: Option<(f64, f64)>,
    /// Control point of the previous quadratic.
    last_quad: Option<(f64, f64)>,
    /// Set after a close; the next drawing command starts a new subpath.
    needs_move: bool,
}

impl PathParser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            pos: 0,
            path: Path::new(),
            x: 0.0,
            y: 0.0,
            start_x: 0.0,
            start_y: 0.0,
            last_cubic: None,
            last_quad: None,
            needs_move: false,
        }
    }

    pub fn parse(mut self) -> GeometryResult<Path> {
        while let Some(token) = self.next_token() {
            match token {
                Token::Command(letter) => self.parse_command(letter)?,
                Token::Number(n) => {
                    return Err(GeometryError::malformed(format!(
                        "expected a command letter, found {}",
                        n
                    )));
                }
            }
        }

        Ok(self.path)
    }

    fn next_token(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).copied();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn has_operands(&self) -> bool {
        matches!(self.tokens.get(self.pos), Some(Token::Number(_)))
    }

    /// Read one operand group of `command`.
    fn operands(&mut self, command: char) -> GeometryResult<Vec<f64>> {
        let count = arity(command.to_ascii_uppercase());
        let mut values = Vec::with_capacity(count);
        for _ in 0..count {
            match self.next_token() {
                Some(Token::Number(n)) => values.push(n),
                _ => {
                    return Err(GeometryError::malformed(format!(
                        "command '{}' expects {} operands per group",
                        command, count
                    )));
                }
            }
        }
        Ok(values)
    }

    /// Offset the coordinate operands of a relative group by the current point.
    fn absolutize(&self, command: char, values: &mut [f64]) {
        let coords = match command {
            // Radii, rotation and flags are never relative.
            'A' => &mut values[5..],
            'H' => {
                values[0] += self.x;
                return;
            }
            'V' => {
                values[0] += self.y;
                return;
            }
            _ => values,
        };
        for pair in coords.chunks_mut(2) {
            pair[0] += self.x;
            pair[1] += self.y;
        }
    }

    fn parse_command(&mut self, letter: char) -> GeometryResult<()> {
        let command = letter.to_ascii_uppercase();
        let relative = letter.is_ascii_lowercase();
        trace!(command = %letter, "parsing path command");

        if self.path.is_empty() && command != 'M' {
            return Err(GeometryError::malformed(format!(
                "path data must start with a moveto, found '{}'",
                letter
            )));
        }

        if command == 'Z' {
            self.push(Command::ClosePath);
            return Ok(());
        }

        if !self.has_operands() {
            return Err(GeometryError::malformed(format!(
                "command '{}' is missing its operands",
                letter
            )));
        }

        let mut first = true;
        while self.has_operands() {
            let mut values = self.operands(command)?;
            if relative {
                self.absolutize(command, &mut values);
            }

            let resolved = match command {
                // Extra pairs after a moveto are implicit linetos.
                'M' if first => Command::from_letter('M', &values)?,
                'M' => Command::from_letter('L', &values)?,
                'H' => Command::LineTo {
                    x: values[0],
                    y: self.y,
                },
                'V' => Command::LineTo {
                    x: self.x,
                    y: values[0],
                },
                'S' => {
                    let (x1, y1) = match self.last_cubic {
                        Some(control) => reflect(control, self.x, self.y),
                        None => (self.x, self.y),
                    };
                    Command::CurveTo {
                        x1,
                        y1,
                        x2: values[0],
                        y2: values[1],
                        x: values[2],
                        y: values[3],
                    }
                }
                'T' => {
                    let (x1, y1) = match self.last_quad {
                        Some(control) => reflect(control, self.x, self.y),
                        None => (self.x, self.y),
                    };
                    Command::QuadTo {
                        x1,
                        y1,
                        x: values[0],
                        y: values[1],
                    }
                }
                other => Command::from_letter(other, &values)?,
            };

            self.push(resolved);
            first = false;
        }

        Ok(())
    }

    /// Append a resolved command and update the parser state.
    fn push(&mut self, command: Command) {
        if self.needs_move && !matches!(command, Command::MoveTo { .. }) {
            self.path.move_to(self.start_x, self.start_y);
        }
        self.needs_move = false;
        self.path.push(command);

        self.last_cubic = None;
        self.last_quad = None;
        match command {
            Command::MoveTo { x, y } => {
                self.x = x;
                self.y = y;
                self.start_x = x;
                self.start_y = y;
            }
            Command::CurveTo { x2, y2, x, y, .. } => {
                self.last_cubic = Some((x2, y2));
                self.x = x;
                self.y = y;
            }
            Command::QuadTo { x1, y1, x, y } => {
                self.last_quad = Some((x1, y1));
                self.x = x;
                self.y = y;
            }
            Command::LineTo { x, y } | Command::ArcTo { x, y, .. } => {
                self.x = x;
                self.y = y;
            }
            Command::ClosePath => {
                self.x = self.start_x;
                self.y = self.start_y;
                self.needs_move = true;
            }
        }
    }
}

/// Parse a path data string (`d` attribute).
pub fn parse_path_data(d: &str) -> GeometryResult<Path> {
    PathParser::new(tokenize_path_data(d)?).parse()
}

/// Parse a point list into an open polyline: a moveto followed by linetos.
pub fn parse_points(s: &str) -> GeometryResult<Path> {
    let numbers = tokenize_points(s)?;
    if numbers.len() % 2 != 0 {
        return Err(GeometryError::malformed(format!(
            "point list has an odd number of coordinates ({})",
            numbers.len()
        )));
    }

    let mut path = Path::new();
    for (i, point) in numbers.chunks(2).enumerate() {
        if i == 0 {
            path.move_to(point[0], point[1]);
        } else {
            path.line_to(point[0], point[1]);
        }
    }
    Ok(path)
}
