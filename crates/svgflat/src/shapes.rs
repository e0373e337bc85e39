//! Element adapters: turn shape elements into paths and containers into
//! groups.

use svgflat_geometry::{parse_path_data, parse_points, Group, Node, Path, Transform};
use tracing::{debug, warn};

use crate::element::Element;
use crate::size::{length_factor, split_length};
use crate::{ConvertError, ConvertResult};

/// Element names taking part in a conversion.
pub const SUPPORTED_ELEMENTS: [&str; 7] =
    ["g", "line", "rect", "circle", "ellipse", "path", "polygon"];

/// Parse a supported element into a group (`g`) or a path (shapes).
pub fn parse_element<E: Element>(el: &E) -> ConvertResult<Node> {
    match el.node_name() {
        "g" => Ok(Node::Group(parse_group(el)?)),
        _ => Ok(Node::Path(parse_shape(el)?)),
    }
}

/// Parse a container: its supported children plus its own transform.
/// Unsupported children are skipped.
pub fn parse_group<E: Element>(el: &E) -> ConvertResult<Group> {
    let mut group = Group::with_transform(element_transform(el));
    for child in el.children() {
        if SUPPORTED_ELEMENTS.iter().any(|name| *name == child.node_name()) {
            group.push(parse_element(child)?);
        } else {
            debug!(element = child.node_name(), "skipping unsupported element");
        }
    }
    Ok(group)
}

/// Parse a shape element into a path with its transform applied.
pub fn parse_shape<E: Element>(el: &E) -> ConvertResult<Path> {
    let path = match el.node_name() {
        "path" => parse_path(el)?,
        "polygon" => parse_polygon(el)?,
        "rect" => parse_rect(el)?,
        "line" => parse_line(el)?,
        "ellipse" => parse_ellipse(el)?,
        "circle" => parse_circle(el)?,
        other => return Err(ConvertError::UnsupportedElement(other.to_string())),
    };

    let transform = element_transform(el);
    if transform.is_identity() {
        Ok(path)
    } else {
        Ok(transform.transform_path(&path))
    }
}

/// The element's `transform` attribute; unsupported syntax is ignored.
fn element_transform<E: Element>(el: &E) -> Transform {
    match el.attribute("transform") {
        Some(value) => Transform::parse(value).unwrap_or_else(|| {
            warn!(
                element = el.node_name(),
                transform = value,
                "ignoring unsupported transform"
            );
            Transform::identity()
        }),
        None => Transform::identity(),
    }
}

/// Length attribute in pixels, with a default for when it is absent.
///
/// Unit suffixes go through the unit table; anything that is not a finite
/// number is malformed.
fn number_attr<E: Element>(el: &E, name: &str, default: f64) -> ConvertResult<f64> {
    let Some(value) = el.attribute(name) else {
        return Ok(default);
    };

    let (number, unit) = split_length(value);
    let number = number
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| {
            ConvertError::malformed(format!(
                "<{}> attribute {}=\"{}\" is not a number",
                el.node_name(),
                name,
                value
            ))
        })?;
    Ok(number * length_factor(unit, value.trim())?)
}

fn parse_path<E: Element>(el: &E) -> ConvertResult<Path> {
    match el.attribute("d") {
        Some(d) => Ok(parse_path_data(d)?),
        None => Ok(Path::new()),
    }
}

fn parse_polygon<E: Element>(el: &E) -> ConvertResult<Path> {
    match el.attribute("points") {
        Some(points) => Ok(parse_points(points)?),
        None => Ok(Path::new()),
    }
}

fn parse_rect<E: Element>(el: &E) -> ConvertResult<Path> {
    let x = number_attr(el, "x", 0.0)?;
    let y = number_attr(el, "y", 0.0)?;
    let width = number_attr(el, "width", 0.0)?;
    let height = number_attr(el, "height", 0.0)?;

    let mut path = Path::new();
    path.move_to(x, y);
    path.line_to(x + width, y);
    path.line_to(x + width, y + height);
    path.line_to(x, y + height);
    path.close_path();
    Ok(path)
}

fn parse_line<E: Element>(el: &E) -> ConvertResult<Path> {
    let x1 = number_attr(el, "x1", 0.0)?;
    let y1 = number_attr(el, "y1", 0.0)?;
    let x2 = number_attr(el, "x2", 0.0)?;
    let y2 = number_attr(el, "y2", 0.0)?;

    let mut path = Path::new();
    path.move_to(x1, y1);
    path.line_to(x2, y2);
    Ok(path)
}

fn parse_ellipse<E: Element>(el: &E) -> ConvertResult<Path> {
    let cx = number_attr(el, "cx", 0.0)?;
    let cy = number_attr(el, "cy", 0.0)?;
    // A missing radius takes the value of the other one.
    let rx = el.attribute("rx").map(|_| number_attr(el, "rx", 0.0)).transpose()?;
    let ry = el.attribute("ry").map(|_| number_attr(el, "ry", 0.0)).transpose()?;
    let (rx, ry) = match (rx, ry) {
        (Some(rx), Some(ry)) => (rx, ry),
        (Some(r), None) | (None, Some(r)) => (r, r),
        (None, None) => (0.0, 0.0),
    };

    let mut path = Path::new();
    path.add_ellipse(cx, cy, rx, ry);
    Ok(path)
}

fn parse_circle<E: Element>(el: &E) -> ConvertResult<Path> {
    let cx = number_attr(el, "cx", 0.0)?;
    let cy = number_attr(el, "cy", 0.0)?;
    let r = number_attr(el, "r", 0.0)?;

    let mut path = Path::new();
    path.add_ellipse(cx, cy, r, r);
    Ok(path)
}
