//! Path data tokenizer.
//!
//! Lexes the path-data mini-language into command letters and numbers.
//! The same numeric scanner reads point lists (`polygon` points, matrix
//! arguments, viewBox values), which simply have no command letters.

use crate::{GeometryError, GeometryResult};

/// Command letters recognized in path data.
pub const COMMAND_LETTERS: &str = "MmLlHhVvCcSsQqTtAaZz";

/// Token types emitted by the tokenizer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Token {
    /// A single command letter, e.g. `M` or `c`.
    Command(char),
    /// A number operand.
    Number(f64),
}

impl Token {
    pub fn is_command(&self) -> bool {
        matches!(self, Token::Command(_))
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Token::Number(n) => Some(*n),
            Token::Command(_) => None,
        }
    }
}

/// Which grammar the tokenizer accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Grammar {
    PathData,
    PointList,
}

/// Path data tokenizer.
pub struct Tokenizer {
    input: Vec<char>,
    pos: usize,
    grammar: Grammar,
    tokens: Vec<Token>,
}

impl Tokenizer {
    /// Tokenizer for path data (`d` attribute).
    pub fn path_data(input: &str) -> Self {
        Self::with_grammar(input, Grammar::PathData)
    }

    /// Tokenizer for bare number lists (`points`, `viewBox`, ...).
    pub fn point_list(input: &str) -> Self {
        Self::with_grammar(input, Grammar::PointList)
    }

    fn with_grammar(input: &str, grammar: Grammar) -> Self {
        Self {
            input: input.chars().collect(),
            pos: 0,
            grammar,
            tokens: Vec::new(),
        }
    }

    fn current_char(&self) -> Option<char> {
        self.input.get(self.pos).copied()
    }

    fn consume(&mut self) -> Option<char> {
        let ch = self.current_char();
        if ch.is_some() {
            self.pos += 1;
        }
        ch
    }

    fn emit(&mut self, token: Token) {
        self.tokens.push(token);
    }

    pub fn tokenize(mut self) -> GeometryResult<Vec<Token>> {
        while let Some(c) = self.current_char() {
            if is_separator(c) {
                self.consume();
            } else if is_number_start(c) {
                let number = self.scan_number()?;
                self.emit(Token::Number(number));
            } else if self.grammar == Grammar::PathData && COMMAND_LETTERS.contains(c) {
                self.consume();
                self.emit(Token::Command(c));
            } else {
                return Err(GeometryError::malformed(format!(
                    "unexpected character '{}' at offset {}",
                    c, self.pos
                )));
            }
        }

        Ok(self.tokens)
    }

    /// Scan `-?\d*\.?\d*`. A second `.` ends the number, so `1.5.5`
    /// yields `1.5` followed by `.5`.
    fn scan_number(&mut self) -> GeometryResult<f64> {
        let start = self.pos;
        let mut has_dot = false;

        if self.current_char() == Some('-') {
            self.consume();
        }

        while let Some(c) = self.current_char() {
            if c.is_ascii_digit() {
                self.consume();
            } else if c == '.' && !has_dot {
                has_dot = true;
                self.consume();
            } else {
                break;
            }
        }

        let text: String = self.input[start..self.pos].iter().collect();
        text.parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| {
                GeometryError::malformed(format!("invalid number '{}' at offset {}", text, start))
            })
    }
}

fn is_separator(c: char) -> bool {
    c == ',' || c.is_whitespace()
}

fn is_number_start(c: char) -> bool {
    c.is_ascii_digit() || c == '.' || c == '-'
}

/// Tokenize a path data string.
pub fn tokenize_path_data(d: &str) -> GeometryResult<Vec<Token>> {
    Tokenizer::path_data(d).tokenize()
}

/// Tokenize a point list into its numbers.
pub fn tokenize_points(s: &str) -> GeometryResult<Vec<f64>> {
    let tokens = Tokenizer::point_list(s).tokenize()?;
    Ok(tokens.iter().filter_map(Token::as_number).collect())
}
