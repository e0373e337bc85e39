//! Document: declared size, viewBox and the shape tree.

use svgflat_geometry::{Group, Path, Transform};
use tracing::debug;

use crate::element::Element;
use crate::shapes::parse_group;
use crate::size::{parse_length, ViewBox};
use crate::{ConvertError, ConvertResult};

/// A parsed document, immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
    pub view_box: Option<ViewBox>,
    pub root: Group,
}

impl Document {
    pub fn new(width: f64, height: f64, view_box: Option<ViewBox>, root: Group) -> Self {
        Self {
            width,
            height,
            view_box,
            root,
        }
    }

    /// Build a document from its root element.
    ///
    /// A missing `width`/`height` is derived from the viewBox.
    pub fn from_element<E: Element>(svg: &E) -> ConvertResult<Self> {
        let view_box = svg.attribute("viewBox").map(ViewBox::parse).transpose()?;
        let width = svg.attribute("width").map(parse_length).transpose()?;
        let height = svg.attribute("height").map(parse_length).transpose()?;

        // A single declared dimension takes the other from the viewBox
        // aspect ratio.
        let (width, height) = match (width, height, view_box) {
            (Some(w), Some(h), _) => (w, h),
            (Some(w), None, Some(vb)) => (w, w * vb.height / vb.width),
            (None, Some(h), Some(vb)) => (h * vb.width / vb.height, h),
            (None, None, Some(vb)) => (vb.width, vb.height),
            (Some(_), None, None) => {
                return Err(ConvertError::InvalidSize("document has no height or viewBox".into()));
            }
            (None, _, None) => {
                return Err(ConvertError::InvalidSize("document has no width or viewBox".into()));
            }
        };
        if width <= 0.0 || height <= 0.0 {
            return Err(ConvertError::InvalidSize(format!(
                "document size {}x{} is not positive",
                width, height
            )));
        }

        // The root element's own transform is not part of the markup subset.
        let mut root = parse_group(svg)?;
        root.transform = Transform::identity();

        debug!(width, height, ?view_box, "read document");
        Ok(Self::new(width, height, view_box, root))
    }

    /// Uniform scale from viewBox units to pixels.
    pub fn scale(&self) -> f64 {
        self.view_box.map(|vb| self.width / vb.width).unwrap_or(1.0)
    }

    /// Offset moving the viewBox origin to zero.
    pub fn translation(&self) -> (f64, f64) {
        self.view_box
            .map(|vb| (-vb.min_x, -vb.min_y))
            .unwrap_or((0.0, 0.0))
    }

    /// Scale, then translate along the scaled axes.
    pub fn view_transform(&self) -> Transform {
        let scale = self.scale();
        let (tx, ty) = self.translation();
        Transform::identity().scale(scale, scale).translate(tx, ty)
    }

    /// All shapes as one path in pixel coordinates.
    pub fn to_path(&self) -> Path {
        let path = self.root.flatten();
        let transform = self.view_transform();
        if transform.is_identity() {
            path
        } else {
            transform.transform_path(&path)
        }
    }
}
