//! Conversion options

use serde::{Deserialize, Serialize};
use svgflat_geometry::DEFAULT_PRECISION;

use crate::size::TargetSize;
use crate::ConvertResult;

/// Conversion options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertOptions {
    /// Fit the output to this width, keeping the aspect ratio
    pub width: Option<f64>,

    /// Fit the output to this height, keeping the aspect ratio
    pub height: Option<f64>,

    /// Decimal places kept in the path data
    pub precision: usize,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            width: None,
            height: None,
            precision: DEFAULT_PRECISION,
        }
    }
}

impl ConvertOptions {
    /// Read options from JSON; missing fields take their defaults.
    pub fn from_json(json: &str) -> ConvertResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_width(mut self, width: f64) -> Self {
        self.width = Some(width);
        self
    }

    pub fn with_height(mut self, height: f64) -> Self {
        self.height = Some(height);
        self
    }

    pub fn with_precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }

    /// The dimension to fit to. Only one is honored; width wins.
    pub fn target(&self) -> Option<TargetSize> {
        match (self.width, self.height) {
            (Some(w), _) => Some(TargetSize::Width(w)),
            (None, Some(h)) => Some(TargetSize::Height(h)),
            (None, None) => None,
        }
    }
}
