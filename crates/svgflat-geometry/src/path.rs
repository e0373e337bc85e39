//! Geometry model: commands, paths and groups.

use crate::transform::Transform;
use crate::{GeometryError, GeometryResult};

/// Control point offset for approximating a quarter ellipse with a cubic,
/// `(-1 + sqrt(2)) / 3 * 4`.
pub const KAPPA: f64 = 0.552_284_749_830_793_4;

// ==================== Commands ====================

/// A resolved, absolute path command.
///
/// Smooth (`S`/`T`) and axis-aligned (`H`/`V`) forms never reach the model;
/// the parser resolves them to `CurveTo`, `QuadTo` and `LineTo`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    /// Start a new subpath.
    MoveTo { x: f64, y: f64 },
    /// Straight segment.
    LineTo { x: f64, y: f64 },
    /// Quadratic Bézier with one control point.
    QuadTo { x1: f64, y1: f64, x: f64, y: f64 },
    /// Cubic Bézier with two control points.
    CurveTo {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        x: f64,
        y: f64,
    },
    /// Elliptical arc in endpoint parameterization.
    ArcTo {
        rx: f64,
        ry: f64,
        x_rotation: f64,
        large_arc: bool,
        sweep: bool,
        x: f64,
        y: f64,
    },
    /// Close the current subpath.
    ClosePath,
}

impl Command {
    /// Build a canonical command from its letter and absolute operands.
    ///
    /// Only `M`, `L`, `Q`, `C`, `A` and `Z` are canonical.
    pub fn from_letter(letter: char, operands: &[f64]) -> GeometryResult<Self> {
        let expected = match letter {
            'M' | 'L' => 2,
            'Q' => 4,
            'C' => 6,
            'A' => 7,
            'Z' => 0,
            _ => return Err(GeometryError::UnknownCommand(letter)),
        };
        if operands.len() != expected {
            return Err(GeometryError::malformed(format!(
                "command '{}' takes {} operands, got {}",
                letter,
                expected,
                operands.len()
            )));
        }

        let o = operands;
        Ok(match letter {
            'M' => Command::MoveTo { x: o[0], y: o[1] },
            'L' => Command::LineTo { x: o[0], y: o[1] },
            'Q' => Command::QuadTo {
                x1: o[0],
                y1: o[1],
                x: o[2],
                y: o[3],
            },
            'C' => Command::CurveTo {
                x1: o[0],
                y1: o[1],
                x2: o[2],
                y2: o[3],
                x: o[4],
                y: o[5],
            },
            'A' => Command::ArcTo {
                rx: o[0],
                ry: o[1],
                x_rotation: o[2],
                large_arc: o[3] != 0.0,
                sweep: o[4] != 0.0,
                x: o[5],
                y: o[6],
            },
            _ => Command::ClosePath,
        })
    }

    /// Canonical letter of this command.
    pub fn letter(&self) -> char {
        match self {
            Command::MoveTo { .. } => 'M',
            Command::LineTo { .. } => 'L',
            Command::QuadTo { .. } => 'Q',
            Command::CurveTo { .. } => 'C',
            Command::ArcTo { .. } => 'A',
            Command::ClosePath => 'Z',
        }
    }

    /// Point the pen ends on, `None` for `ClosePath`.
    pub fn end_point(&self) -> Option<(f64, f64)> {
        match *self {
            Command::MoveTo { x, y }
            | Command::LineTo { x, y }
            | Command::QuadTo { x, y, .. }
            | Command::CurveTo { x, y, .. }
            | Command::ArcTo { x, y, .. } => Some((x, y)),
            Command::ClosePath => None,
        }
    }
}

// ==================== Path ====================

/// An ordered sequence of absolute commands, possibly several subpaths.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Path {
    commands: Vec<Command>,
}

impl Path {
    /// Create an empty path.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a path from commands, checking the moveto invariant.
    pub fn from_commands(commands: Vec<Command>) -> GeometryResult<Self> {
        let path = Self { commands };
        path.validate()?;
        Ok(path)
    }

    /// Check that the path starts with a `MoveTo` and that every
    /// `ClosePath` is followed by one.
    pub fn validate(&self) -> GeometryResult<()> {
        let mut needs_move = true;
        for (index, command) in self.commands.iter().enumerate() {
            match command {
                Command::MoveTo { .. } => needs_move = false,
                _ if needs_move => {
                    return Err(GeometryError::malformed(format!(
                        "command {} ('{}') is not preceded by a moveto",
                        index,
                        command.letter()
                    )));
                }
                Command::ClosePath => needs_move = true,
                _ => {}
            }
        }
        Ok(())
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn push(&mut self, command: Command) {
        self.commands.push(command);
    }

    pub fn move_to(&mut self, x: f64, y: f64) {
        self.push(Command::MoveTo { x, y });
    }

    pub fn line_to(&mut self, x: f64, y: f64) {
        self.push(Command::LineTo { x, y });
    }

    pub fn quad_to(&mut self, x1: f64, y1: f64, x: f64, y: f64) {
        self.push(Command::QuadTo { x1, y1, x, y });
    }

    pub fn curve_to(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, x: f64, y: f64) {
        self.push(Command::CurveTo {
            x1,
            y1,
            x2,
            y2,
            x,
            y,
        });
    }

    #[allow(clippy::too_many_arguments)]
    pub fn arc_to(
        &mut self,
        rx: f64,
        ry: f64,
        x_rotation: f64,
        large_arc: bool,
        sweep: bool,
        x: f64,
        y: f64,
    ) {
        self.push(Command::ArcTo {
            rx,
            ry,
            x_rotation,
            large_arc,
            sweep,
            x,
            y,
        });
    }

    pub fn close_path(&mut self) {
        self.push(Command::ClosePath);
    }

    /// Append a closed ellipse made of four cubic segments, starting at the
    /// leftmost point and running through the top.
    pub fn add_ellipse(&mut self, cx: f64, cy: f64, rx: f64, ry: f64) {
        let dx = rx * KAPPA;
        let dy = ry * KAPPA;
        let left = cx - rx;
        let right = cx + rx;
        let top = cy - ry;
        let bottom = cy + ry;

        self.move_to(left, cy);
        self.curve_to(left, cy - dy, cx - dx, top, cx, top);
        self.curve_to(cx + dx, top, right, cy - dy, right, cy);
        self.curve_to(right, cy + dy, cx + dx, bottom, cx, bottom);
        self.curve_to(cx - dx, bottom, left, cy + dy, left, cy);
        self.close_path();
    }

    /// Append all commands of another path.
    pub fn extend(&mut self, other: &Path) {
        self.commands.extend_from_slice(&other.commands);
    }

    /// Number of subpaths (one per `MoveTo`).
    pub fn subpath_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, Command::MoveTo { .. }))
            .count()
    }

    /// Map every command through `transform`.
    pub fn transform(&self, transform: &Transform) -> Path {
        transform.transform_path(self)
    }

    pub fn scale(&self, sx: f64, sy: f64) -> Path {
        Transform::identity().scale(sx, sy).transform_path(self)
    }

    pub fn translate(&self, tx: f64, ty: f64) -> Path {
        Transform::identity().translate(tx, ty).transform_path(self)
    }
}

impl<'a> IntoIterator for &'a Path {
    type Item = &'a Command;
    type IntoIter = std::slice::Iter<'a, Command>;

    fn into_iter(self) -> Self::IntoIter {
        self.commands.iter()
    }
}

// ==================== Groups ====================

/// A child of a group.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Path(Path),
    Group(Group),
}

impl From<Path> for Node {
    fn from(path: Path) -> Self {
        Node::Path(path)
    }
}

impl From<Group> for Node {
    fn from(group: Group) -> Self {
        Node::Group(group)
    }
}

/// Group of paths and nested groups (`<g>`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Group {
    /// Child nodes in document order.
    pub children: Vec<Node>,
    /// Own transform, applied to everything inside the group.
    pub transform: Transform,
}

impl Group {
    /// Create a new group.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_transform(transform: Transform) -> Self {
        Self {
            children: Vec::new(),
            transform,
        }
    }

    pub fn push(&mut self, node: impl Into<Node>) {
        self.children.push(node.into());
    }

    /// Combine every descendant path into one path, in document order.
    pub fn flatten(&self) -> Path {
        let mut path = Path::new();
        for child in &self.children {
            match child {
                Node::Path(p) => path.extend(p),
                Node::Group(g) => path.extend(&g.flatten()),
            }
        }

        if self.transform.is_identity() {
            path
        } else {
            self.transform.transform_path(&path)
        }
    }
}

/// Flatten a group tree into a single path.
pub fn flatten(group: &Group) -> Path {
    group.flatten()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(x: f64, y: f64) -> Path {
        let mut p = Path::new();
        p.move_to(x, y);
        p.line_to(x + 1.0, y);
        p.line_to(x + 1.0, y + 1.0);
        p.close_path();
        p
    }

    #[test]
    fn test_from_letter() {
        assert_eq!(
            Command::from_letter('C', &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap(),
            Command::CurveTo {
                x1: 1.0,
                y1: 2.0,
                x2: 3.0,
                y2: 4.0,
                x: 5.0,
                y: 6.0
            }
        );
        assert!(matches!(
            Command::from_letter('A', &[5.0, 5.0, 0.0, 1.0, 0.0, 10.0, 10.0]).unwrap(),
            Command::ArcTo {
                large_arc: true,
                sweep: false,
                ..
            }
        ));
        assert_eq!(Command::from_letter('Z', &[]).unwrap(), Command::ClosePath);
    }

    #[test]
    fn test_from_letter_errors() {
        assert_eq!(
            Command::from_letter('S', &[1.0, 2.0, 3.0, 4.0]),
            Err(GeometryError::UnknownCommand('S'))
        );
        assert!(matches!(
            Command::from_letter('L', &[1.0]),
            Err(GeometryError::MalformedInput(_))
        ));
    }

    #[test]
    fn test_end_point() {
        assert_eq!(Command::LineTo { x: 3.0, y: 4.0 }.end_point(), Some((3.0, 4.0)));
        assert_eq!(Command::ClosePath.end_point(), None);
    }

    #[test]
    fn test_validate() {
        assert!(Path::new().validate().is_ok());
        assert!(square(0.0, 0.0).validate().is_ok());

        let err = Path::from_commands(vec![Command::LineTo { x: 1.0, y: 1.0 }]);
        assert!(matches!(err, Err(GeometryError::MalformedInput(_))));

        let err = Path::from_commands(vec![
            Command::MoveTo { x: 0.0, y: 0.0 },
            Command::ClosePath,
            Command::LineTo { x: 1.0, y: 1.0 },
        ]);
        assert!(err.is_err());
    }

    #[test]
    fn test_add_ellipse() {
        let mut p = Path::new();
        p.add_ellipse(10.0, 20.0, 4.0, 2.0);
        assert_eq!(p.len(), 6);
        assert_eq!(p.commands()[0], Command::MoveTo { x: 6.0, y: 20.0 });
        assert_eq!(p.commands()[1].end_point(), Some((10.0, 18.0)));
        assert_eq!(p.commands()[2].end_point(), Some((14.0, 20.0)));
        assert_eq!(p.commands()[3].end_point(), Some((10.0, 22.0)));
        assert_eq!(p.commands()[4].end_point(), Some((6.0, 20.0)));
        assert_eq!(p.commands()[5], Command::ClosePath);

        match p.commands()[1] {
            Command::CurveTo { y1, x2, .. } => {
                assert!((y1 - (20.0 - 2.0 * KAPPA)).abs() < 1e-12);
                assert!((x2 - (10.0 - 4.0 * KAPPA)).abs() < 1e-12);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_kappa() {
        let expected = (-1.0 + 2f64.sqrt()) / 3.0 * 4.0;
        assert!((KAPPA - expected).abs() < 1e-15);
    }

    #[test]
    fn test_flatten_order() {
        let a = square(0.0, 0.0);
        let b = square(5.0, 5.0);
        let c = square(9.0, 0.0);

        let mut inner = Group::new();
        inner.push(b.clone());
        inner.push(c.clone());

        let mut root = Group::new();
        root.push(a.clone());
        root.push(inner);

        let flat = flatten(&root);
        let mut expected = a.commands().to_vec();
        expected.extend_from_slice(b.commands());
        expected.extend_from_slice(c.commands());

        assert_eq!(flat.commands(), expected.as_slice());
        assert_eq!(flat.subpath_count(), 3);
    }

    #[test]
    fn test_flatten_applies_group_transform() {
        let mut inner = Group::with_transform(Transform::identity().translate(10.0, 0.0));
        inner.push(square(0.0, 0.0));

        let mut root = Group::new();
        root.push(inner);

        let flat = root.flatten();
        assert_eq!(flat.commands()[0], Command::MoveTo { x: 10.0, y: 0.0 });
        assert_eq!(flat.commands()[2], Command::LineTo { x: 11.0, y: 1.0 });
    }

    #[test]
    fn test_flatten_does_not_touch_source() {
        let mut group = Group::with_transform(Transform::identity().scale(2.0, 2.0));
        group.push(square(1.0, 1.0));
        let before = group.clone();
        let _ = group.flatten();
        assert_eq!(group, before);
    }
}
