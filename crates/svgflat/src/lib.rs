//! # svgflat
//!
//! Flattens a tree of simple SVG shapes into one compact `<path>`.
//!
//! ## Features
//!
//! - **Shapes**: `rect`, `line`, `circle`, `ellipse`, `polygon`, `path`
//! - **Groups**: nested `<g>` with `matrix(...)` transforms
//! - **Sizing**: unit-suffixed width/height, viewBox, fit to a target
//!   width or height
//! - **Output**: minimal path data at a chosen precision
//!
//! ## Pipeline
//!
//! ```text
//! Element tree ──► shapes ──► Group tree ──► flatten ──► Path
//!                                                         │
//!              markup ◄── serialize ◄── target fit ◄── viewBox scale
//! ```
//!
//! The source tree is only read. Documents are independent of each other,
//! so callers may convert several in parallel.

pub mod config;
pub mod document;
pub mod element;
pub mod shapes;
pub mod size;

pub use config::ConvertOptions;
pub use document::Document;
pub use element::{Element, MarkupElement};
pub use size::{TargetSize, ViewBox};

use svgflat_geometry::{format_number, serialize, GeometryError, Path};
use thiserror::Error;
use tracing::debug;

use crate::size::fit_to_target;

/// Errors that abort the conversion of a document.
#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    #[error("Unsupported element: {0}")]
    UnsupportedElement(String),

    #[error("Unknown command: {0}")]
    UnknownCommand(char),

    #[error("Invalid size: {0}")]
    InvalidSize(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] serde_json::Error),
}

/// Result type for conversions.
pub type ConvertResult<T> = Result<T, ConvertError>;

impl ConvertError {
    /// Create a malformed input error.
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedInput(msg.into())
    }

    /// Stable label for the error kind.
    pub fn category(&self) -> &'static str {
        match self {
            ConvertError::MalformedInput(_) => "malformed_input",
            ConvertError::UnsupportedElement(_) => "unsupported_element",
            ConvertError::UnknownCommand(_) => "unknown_command",
            ConvertError::InvalidSize(_) => "invalid_size",
            ConvertError::InvalidConfig(_) => "invalid_config",
        }
    }
}

impl From<GeometryError> for ConvertError {
    fn from(err: GeometryError) -> Self {
        match err {
            GeometryError::MalformedInput(msg) => ConvertError::MalformedInput(msg),
            GeometryError::UnknownCommand(c) => ConvertError::UnknownCommand(c),
        }
    }
}

/// A normalized document: one path in pixel coordinates and its size.
#[derive(Debug, Clone, PartialEq)]
pub struct Conversion {
    pub width: f64,
    pub height: f64,
    pub path: Path,
}

impl Conversion {
    /// Render as a standalone `<svg>` holding a single `<path>`.
    pub fn to_markup(&self, precision: usize) -> String {
        let width = format_number(self.width, precision);
        let height = format_number(self.height, precision);
        format!(
            r#"<svg width="{w}" height="{h}" viewBox="0 0 {w} {h}" xmlns="http://www.w3.org/2000/svg"><path d="{d}"/></svg>"#,
            w = width,
            h = height,
            d = serialize(&self.path, precision),
        )
    }
}

/// Flatten a document and fit it to `target`.
pub fn normalize(document: &Document, target: Option<TargetSize>) -> ConvertResult<Conversion> {
    let path = document.to_path();
    path.validate()?;

    let (path, width, height) = match target {
        Some(target) => {
            let (factor, width, height) =
                fit_to_target(document.width, document.height, target)?;
            (path.scale(factor, factor), width, height)
        }
        None => (path, document.width, document.height),
    };

    debug!(
        width,
        height,
        scale = document.scale(),
        commands = path.len(),
        "normalized document"
    );
    Ok(Conversion {
        width,
        height,
        path,
    })
}

/// Convert a parsed document.
pub fn convert_document(document: &Document, options: &ConvertOptions) -> ConvertResult<String> {
    let conversion = normalize(document, options.target())?;
    Ok(conversion.to_markup(options.precision))
}

/// Convert a root `<svg>` element.
pub fn convert<E: Element>(svg: &E, options: &ConvertOptions) -> ConvertResult<String> {
    let document = Document::from_element(svg)?;
    convert_document(&document, options)
}

/// Convert markup text.
pub fn convert_str(markup: &str, options: &ConvertOptions) -> ConvertResult<String> {
    let svg = MarkupElement::parse(markup)?;
    convert(&svg, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use svgflat_geometry::{Group, Transform};

    #[test]
    fn test_error_categories() {
        assert_eq!(ConvertError::malformed("x").category(), "malformed_input");
        assert_eq!(ConvertError::InvalidSize("x".into()).category(), "invalid_size");
        assert_eq!(
            ConvertError::UnsupportedElement("text".into()).category(),
            "unsupported_element"
        );
    }

    #[test]
    fn test_geometry_error_mapping() {
        let err: ConvertError = GeometryError::UnknownCommand('X').into();
        assert!(matches!(err, ConvertError::UnknownCommand('X')));
        let err: ConvertError = GeometryError::malformed("bad").into();
        assert_eq!(err.category(), "malformed_input");
    }

    #[test]
    fn test_normalize_rejects_invalid_path() {
        let mut path = Path::new();
        path.line_to(1.0, 1.0);
        let mut root = Group::with_transform(Transform::identity());
        root.push(path);

        let document = Document::new(10.0, 10.0, None, root);
        assert!(matches!(
            normalize(&document, None),
            Err(ConvertError::MalformedInput(_))
        ));
    }

    #[test]
    fn test_normalize_fits_height() {
        let mut path = Path::new();
        path.move_to(0.0, 0.0);
        path.line_to(100.0, 50.0);
        let mut root = Group::new();
        root.push(path);

        let document = Document::new(100.0, 50.0, None, root);
        let conversion = normalize(&document, Some(TargetSize::Height(25.0))).unwrap();
        assert_eq!(conversion.width, 50.0);
        assert_eq!(conversion.height, 25.0);
        assert_eq!(conversion.path.commands()[1].end_point(), Some((50.0, 25.0)));
    }

    #[test]
    fn test_to_markup() {
        let mut path = Path::new();
        path.move_to(1.0, 2.0);
        path.line_to(1.0, 5.0);
        let conversion = Conversion {
            width: 10.0,
            height: 12.5,
            path,
        };
        assert_eq!(
            conversion.to_markup(4),
            r#"<svg width="10" height="12.5" viewBox="0 0 10 12.5" xmlns="http://www.w3.org/2000/svg"><path d="M1,2v3"/></svg>"#
        );
    }
}
