//! Lengths, units, viewBox and target-size fitting.

use svgflat_geometry::tokenize_points;

use crate::{ConvertError, ConvertResult};

/// Pixels per unit. A bare number is in pixels.
static UNITS: [(&str, f64); 6] = [
    ("px", 1.0),
    ("in", 96.0),
    ("cm", 37.795),
    ("mm", 3.7795),
    ("pt", 1.3333),
    ("pc", 16.0),
];

/// Pixel factor of a unit suffix, `None` for unknown units.
pub fn unit_factor(unit: &str) -> Option<f64> {
    UNITS
        .iter()
        .find(|(name, _)| *name == unit)
        .map(|(_, factor)| *factor)
}

/// Split a length into its numeric prefix and trimmed unit suffix.
pub fn split_length(s: &str) -> (&str, &str) {
    let s = s.trim();
    let split = s
        .char_indices()
        .find(|&(i, c)| !(c.is_ascii_digit() || c == '.' || (c == '-' && i == 0)))
        .map(|(i, _)| i)
        .unwrap_or(s.len());
    let (number, unit) = s.split_at(split);
    (number, unit.trim())
}

/// Pixel factor for a unit suffix; an empty suffix is pixels.
pub fn length_factor(unit: &str, length: &str) -> ConvertResult<f64> {
    if unit.is_empty() {
        return Ok(1.0);
    }
    unit_factor(unit).ok_or_else(|| {
        ConvertError::InvalidSize(format!("unknown unit '{}' in '{}'", unit, length))
    })
}

/// Parse a length such as `"12"`, `"2in"` or `"10.5 mm"` into pixels.
pub fn parse_length(s: &str) -> ConvertResult<f64> {
    let (number, unit) = split_length(s);
    let value = number
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ConvertError::InvalidSize(format!("'{}' is not a number", s.trim())))?;
    Ok(value * length_factor(unit, s.trim())?)
}

/// SVG viewBox.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewBox {
    pub min_x: f64,
    pub min_y: f64,
    pub width: f64,
    pub height: f64,
}

impl ViewBox {
    /// Parse viewBox attribute.
    pub fn parse(s: &str) -> ConvertResult<Self> {
        let parts = tokenize_points(s)
            .map_err(|e| ConvertError::InvalidSize(format!("viewBox '{}': {}", s, e)))?;
        if parts.len() != 4 {
            return Err(ConvertError::InvalidSize(format!(
                "viewBox '{}' must have 4 numbers",
                s
            )));
        }

        let view_box = ViewBox {
            min_x: parts[0],
            min_y: parts[1],
            width: parts[2],
            height: parts[3],
        };
        if view_box.width <= 0.0 || view_box.height <= 0.0 {
            return Err(ConvertError::InvalidSize(format!(
                "viewBox '{}' must have a positive size",
                s
            )));
        }
        Ok(view_box)
    }
}

/// The single dimension a conversion is fitted to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TargetSize {
    Width(f64),
    Height(f64),
}

impl TargetSize {
    /// The requested dimension in pixels.
    pub fn value(&self) -> f64 {
        match *self {
            TargetSize::Width(v) | TargetSize::Height(v) => v,
        }
    }
}

/// Fit `(width, height)` to `target`, keeping the aspect ratio.
///
/// Returns the uniform scale factor and the new dimensions. The target
/// must be a positive, finite length.
pub fn fit_to_target(
    width: f64,
    height: f64,
    target: TargetSize,
) -> ConvertResult<(f64, f64, f64)> {
    let value = target.value();
    if !(value.is_finite() && value > 0.0) {
        return Err(ConvertError::InvalidSize(format!("target size {} is not positive", value)));
    }

    let ratio = width / height;
    Ok(match target {
        TargetSize::Width(w) => (w / width, w, w / ratio),
        TargetSize::Height(h) => (h / height, h * ratio, h),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_length_units() {
        assert_eq!(parse_length("100").unwrap(), 100.0);
        assert_eq!(parse_length("50px").unwrap(), 50.0);
        assert_eq!(parse_length("2in").unwrap(), 192.0);
        assert!((parse_length("10mm").unwrap() - 37.795).abs() < 1e-9);
        assert!((parse_length("1cm").unwrap() - 37.795).abs() < 1e-9);
        assert!((parse_length("3pt").unwrap() - 3.9999).abs() < 1e-9);
        assert_eq!(parse_length("2pc").unwrap(), 32.0);
        assert_eq!(parse_length(" 1.5 in ").unwrap(), 144.0);
    }

    #[test]
    fn test_parse_length_errors() {
        assert!(matches!(parse_length("abc"), Err(ConvertError::InvalidSize(_))));
        assert!(matches!(parse_length("10em"), Err(ConvertError::InvalidSize(_))));
        assert!(matches!(parse_length("50%"), Err(ConvertError::InvalidSize(_))));
        assert!(parse_length("").is_err());
        assert!(parse_length("inf").is_err());
        assert!(parse_length(&"9".repeat(400)).is_err());
    }

    #[test]
    fn test_unit_factor() {
        assert_eq!(unit_factor("in"), Some(96.0));
        assert_eq!(unit_factor("ft"), None);
    }

    #[test]
    fn test_viewbox_parse() {
        let vb = ViewBox::parse("0 0 100 50").unwrap();
        assert_eq!(vb.min_x, 0.0);
        assert_eq!(vb.min_y, 0.0);
        assert_eq!(vb.width, 100.0);
        assert_eq!(vb.height, 50.0);

        let vb = ViewBox::parse("10,20,30,40").unwrap();
        assert_eq!(vb.min_x, 10.0);
        assert_eq!(vb.min_y, 20.0);

        let vb = ViewBox::parse("-5 -5 10 10").unwrap();
        assert_eq!(vb.min_x, -5.0);
    }

    #[test]
    fn test_viewbox_errors() {
        assert!(ViewBox::parse("0 0 100").is_err());
        assert!(ViewBox::parse("0 0 0 50").is_err());
        assert!(ViewBox::parse("a b c d").is_err());
    }

    #[test]
    fn test_fit_to_target() {
        assert_eq!(
            fit_to_target(100.0, 50.0, TargetSize::Width(200.0)).unwrap(),
            (2.0, 200.0, 100.0)
        );
        assert_eq!(
            fit_to_target(100.0, 50.0, TargetSize::Height(25.0)).unwrap(),
            (0.5, 50.0, 25.0)
        );
    }

    #[test]
    fn test_fit_to_target_rejects_non_positive() {
        for target in [
            TargetSize::Width(0.0),
            TargetSize::Height(-20.0),
            TargetSize::Width(f64::NAN),
            TargetSize::Height(f64::INFINITY),
        ] {
            assert!(matches!(
                fit_to_target(100.0, 50.0, target),
                Err(ConvertError::InvalidSize(_))
            ));
        }
    }

    #[test]
    fn test_split_length() {
        assert_eq!(split_length(" 10.5 mm "), ("10.5", "mm"));
        assert_eq!(split_length("-3px"), ("-3", "px"));
        assert_eq!(split_length("NaN"), ("", "NaN"));
        assert_eq!(split_length("7"), ("7", ""));
    }
}
