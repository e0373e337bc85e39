//! # svgflat geometry
//!
//! Path geometry for svgflat: reading path data, transforming it and
//! writing it back out as compactly as possible.
//!
//! ## Architecture
//!
//! ```text
//! path data ──► Tokenizer ──► PathParser ──► Path (absolute M/L/Q/C/A/Z)
//!                                              │
//!                                  Transform ──┤
//!                                              ▼
//!                 Group tree ──► flatten ──► Path ──► serialize ──► string
//! ```
//!
//! Every stage takes its input by reference and returns a new value, so a
//! `Path` is never shared between two shapes.

pub mod parser;
pub mod path;
pub mod serialize;
pub mod tokenizer;
pub mod transform;

pub use parser::{parse_path_data, parse_points, PathParser};
pub use path::{flatten, Command, Group, Node, Path, KAPPA};
pub use serialize::{format_number, join_numbers, serialize, DEFAULT_PRECISION};
pub use tokenizer::{tokenize_path_data, tokenize_points, Token, Tokenizer};
pub use transform::Transform;

use thiserror::Error;

/// Errors raised by the geometry pipeline.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// Path data or a point list could not be read.
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    /// A command letter outside the canonical set reached the model.
    #[error("Unknown command: {0}")]
    UnknownCommand(char),
}

/// Result type for geometry operations.
pub type GeometryResult<T> = Result<T, GeometryError>;

impl GeometryError {
    /// Create a malformed input error.
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedInput(msg.into())
    }
}
