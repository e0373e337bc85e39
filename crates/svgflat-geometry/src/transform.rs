//! 2D affine transforms and their action on paths.

use crate::path::{Command, Path};
use crate::tokenizer::tokenize_points;

/// 2D affine transform matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// Matrix elements [a, b, c, d, e, f]
    /// Represents: [a c e]
    ///             [b d f]
    ///             [0 0 1]
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Transform {
    /// Create identity transform.
    pub fn identity() -> Self {
        Self {
            a: 1.0, b: 0.0,
            c: 0.0, d: 1.0,
            e: 0.0, f: 0.0,
        }
    }

    pub fn new(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Self { a, b, c, d, e, f }
    }

    /// Translate along the current axes.
    pub fn translate(self, tx: f64, ty: f64) -> Self {
        self.multiply(&Transform {
            a: 1.0, b: 0.0,
            c: 0.0, d: 1.0,
            e: tx, f: ty,
        })
    }

    /// Scale the current axes.
    pub fn scale(self, sx: f64, sy: f64) -> Self {
        self.multiply(&Transform {
            a: sx, b: 0.0,
            c: 0.0, d: sy,
            e: 0.0, f: 0.0,
        })
    }

    /// Multiply two transforms (`self` applied after `other`).
    pub fn multiply(&self, other: &Transform) -> Self {
        Transform {
            a: self.a * other.a + self.c * other.b,
            b: self.b * other.a + self.d * other.b,
            c: self.a * other.c + self.c * other.d,
            d: self.b * other.c + self.d * other.d,
            e: self.a * other.e + self.c * other.f + self.e,
            f: self.b * other.e + self.d * other.f + self.f,
        }
    }

    /// Transform a point.
    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        (
            self.a * x + self.c * y + self.e,
            self.b * x + self.d * y + self.f,
        )
    }

    /// Transform an offset; the translation part is ignored.
    pub fn apply_vector(&self, x: f64, y: f64) -> (f64, f64) {
        (self.a * x + self.c * y, self.b * x + self.d * y)
    }

    pub fn determinant(&self) -> f64 {
        self.a * self.d - self.b * self.c
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::identity()
    }

    /// Parse a `transform` attribute made of `matrix(a b c d e f)` functions.
    ///
    /// Returns `None` if any function is not a well-formed `matrix`.
    pub fn parse(s: &str) -> Option<Self> {
        let mut result = Self::identity();

        let mut s = s.trim();
        while !s.is_empty() {
            let (func, rest) = parse_matrix_function(s)?;
            result = result.multiply(&func);
            s = rest.trim_start_matches(|c: char| c == ',' || c.is_whitespace());
        }

        Some(result)
    }

    /// Map one command through this transform.
    pub fn transform_command(&self, command: &Command) -> Command {
        match *command {
            Command::MoveTo { x, y } => {
                let (x, y) = self.apply(x, y);
                Command::MoveTo { x, y }
            }
            Command::LineTo { x, y } => {
                let (x, y) = self.apply(x, y);
                Command::LineTo { x, y }
            }
            Command::QuadTo { x1, y1, x, y } => {
                let (x1, y1) = self.apply(x1, y1);
                let (x, y) = self.apply(x, y);
                Command::QuadTo { x1, y1, x, y }
            }
            Command::CurveTo {
                x1,
                y1,
                x2,
                y2,
                x,
                y,
            } => {
                let (x1, y1) = self.apply(x1, y1);
                let (x2, y2) = self.apply(x2, y2);
                let (x, y) = self.apply(x, y);
                Command::CurveTo {
                    x1,
                    y1,
                    x2,
                    y2,
                    x,
                    y,
                }
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
                // Radii behave like an offset from the origin. A reflection
                // reverses the direction the arc is swept in.
                let (rx, ry) = self.apply_vector(rx, ry);
                let (x, y) = self.apply(x, y);
                Command::ArcTo {
                    rx: rx.abs(),
                    ry: ry.abs(),
                    x_rotation,
                    large_arc,
                    sweep: if self.determinant() < 0.0 { !sweep } else { sweep },
                    x,
                    y,
                }
            }
            Command::ClosePath => Command::ClosePath,
        }
    }

    /// Map every command of a path, producing a new path.
    pub fn transform_path(&self, path: &Path) -> Path {
        let mut result = Path::new();
        for command in path {
            result.push(self.transform_command(command));
        }
        result
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

/// Parse a single `matrix(...)` function.
fn parse_matrix_function(s: &str) -> Option<(Transform, &str)> {
    let open = s.find('(')?;
    let close = s.find(')')?;
    if close < open || s[..open].trim() != "matrix" {
        return None;
    }

    let args = tokenize_points(&s[open + 1..close]).ok()?;
    if args.len() != 6 {
        return None;
    }

    let transform = Transform::new(args[0], args[1], args[2], args[3], args[4], args[5]);
    Some((transform, &s[close + 1..]))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_path() -> Path {
        let mut p = Path::new();
        p.move_to(1.0, 2.0);
        p.line_to(3.0, -4.0);
        p.quad_to(5.0, 6.0, 7.0, 8.0);
        p.curve_to(1.0, 1.0, 2.0, 2.0, 3.0, 3.0);
        p.arc_to(4.0, 5.0, 30.0, true, false, 9.0, 10.0);
        p.close_path();
        p
    }

    #[test]
    fn test_transform_identity() {
        let t = Transform::identity();
        let (x, y) = t.apply(10.0, 20.0);
        assert_eq!(x, 10.0);
        assert_eq!(y, 20.0);
        assert!(t.is_identity());
        assert_eq!(Transform::default(), t);
    }

    #[test]
    fn test_transform_translate() {
        let t = Transform::identity().translate(5.0, 10.0);
        let (x, y) = t.apply(10.0, 20.0);
        assert_eq!(x, 15.0);
        assert_eq!(y, 30.0);
    }

    #[test]
    fn test_transform_scale() {
        let t = Transform::identity().scale(2.0, 3.0);
        let (x, y) = t.apply(10.0, 20.0);
        assert_eq!(x, 20.0);
        assert_eq!(y, 60.0);
    }

    #[test]
    fn test_translate_uses_current_basis() {
        // Translating after scaling moves in scaled units.
        let t = Transform::identity().scale(2.0, 2.0).translate(5.0, 0.0);
        assert_eq!(t.e, 10.0);
        assert_eq!(t.apply(0.0, 0.0), (10.0, 0.0));
        assert_eq!(t.apply(1.0, 1.0), (12.0, 2.0));
    }

    #[test]
    fn test_scale_composition_is_linear() {
        let path = sample_path();
        let twice = path.scale(2.0, 2.0).scale(3.0, 3.0);
        let once = path.scale(6.0, 6.0);
        assert_eq!(twice, once);

        match twice.commands()[4] {
            Command::ArcTo { rx, ry, .. } => {
                assert_eq!(rx, 24.0);
                assert_eq!(ry, 30.0);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_translation_does_not_move_arc_radii() {
        let path = sample_path().translate(100.0, 200.0);
        match path.commands()[4] {
            Command::ArcTo { rx, ry, x, y, .. } => {
                assert_eq!((rx, ry), (4.0, 5.0));
                assert_eq!((x, y), (109.0, 210.0));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_reflection_flips_sweep() {
        let path = sample_path().scale(-1.0, 1.0);
        match path.commands()[4] {
            Command::ArcTo { rx, sweep, large_arc, .. } => {
                assert_eq!(rx, 4.0);
                assert!(sweep);
                assert!(large_arc);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_transform_all_points() {
        let t = Transform::new(1.0, 0.0, 0.0, 1.0, 10.0, 20.0);
        let path = t.transform_path(&sample_path());
        assert_eq!(path.len(), 6);
        assert_eq!(path.commands()[0], Command::MoveTo { x: 11.0, y: 22.0 });
        assert_eq!(
            path.commands()[2],
            Command::QuadTo {
                x1: 15.0,
                y1: 26.0,
                x: 17.0,
                y: 28.0
            }
        );
        assert_eq!(
            path.commands()[3],
            Command::CurveTo {
                x1: 11.0,
                y1: 21.0,
                x2: 12.0,
                y2: 22.0,
                x: 13.0,
                y: 23.0
            }
        );
        assert_eq!(path.commands()[5], Command::ClosePath);
    }

    #[test]
    fn test_transform_parse_matrix() {
        let t = Transform::parse("matrix(1 0 0 1 10 20)").unwrap();
        assert_eq!(t.apply(0.0, 0.0), (10.0, 20.0));

        let t = Transform::parse("matrix(2,0,0,2,0,0)").unwrap();
        assert_eq!(t.apply(5.0, 5.0), (10.0, 10.0));
    }

    #[test]
    fn test_transform_parse_composes() {
        let t = Transform::parse("matrix(2 0 0 2 0 0) matrix(1 0 0 1 5 0)").unwrap();
        assert_eq!(t.apply(0.0, 0.0), (10.0, 0.0));
    }

    #[test]
    fn test_transform_parse_rejects_other_functions() {
        assert!(Transform::parse("rotate(45)").is_none());
        assert!(Transform::parse("matrix(1 0 0 1)").is_none());
        assert!(Transform::parse("matrix(1 0 0 1 0 0) translate(5)").is_none());
    }

    #[test]
    fn test_determinant() {
        assert_eq!(Transform::identity().scale(2.0, 3.0).determinant(), 6.0);
        assert!(Transform::identity().scale(1.0, -1.0).determinant() < 0.0);
    }
}
