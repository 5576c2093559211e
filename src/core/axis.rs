use serde::{Deserialize, Serialize};

use crate::core::crs::{BuiltinCrs, great_circle_distance};
use crate::error::{ScaleBarError, ScaleBarResult};

/// What the scale-bar engine needs to know about the host's map axis.
///
/// Everything is read fresh on every draw; implementations should report the
/// current view limits and physical size rather than cached values.
pub trait MapAxis {
    /// Current `(min, max)` view limits of the x axis, in CRS units.
    fn x_limits(&self) -> (f64, f64);

    /// Current `(min, max)` view limits of the y axis, in CRS units.
    fn y_limits(&self) -> (f64, f64);

    /// Physical `(width, height)` of the axis patch in inches.
    fn size_inches(&self) -> (f64, f64);

    /// Output resolution of the figure the axis belongs to.
    fn dpi(&self) -> f64;

    /// CRS of the axis data, when the host knows it.
    fn crs(&self) -> Option<&str> {
        None
    }

    /// Linear unit name of one CRS axis (0 = east-west, 1 = north-south).
    fn axis_unit_name(&self, crs: &str, axis_index: usize) -> ScaleBarResult<String> {
        BuiltinCrs.axis_unit_name(crs, axis_index)
    }

    /// Ground distance in meters between two `(lon, lat)` points.
    fn great_circle_distance(&self, a: (f64, f64), b: (f64, f64)) -> f64 {
        great_circle_distance(a, b)
    }
}

/// Plain-data axis snapshot for headless rendering and tests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaticAxis {
    pub x_limits: (f64, f64),
    pub y_limits: (f64, f64),
    pub width_in: f64,
    pub height_in: f64,
    pub dpi: f64,
    #[serde(default)]
    pub crs: Option<String>,
}

impl StaticAxis {
    pub fn new(
        x_limits: (f64, f64),
        y_limits: (f64, f64),
        width_in: f64,
        height_in: f64,
        dpi: f64,
    ) -> ScaleBarResult<Self> {
        for (name, value) in [("width_in", width_in), ("height_in", height_in), ("dpi", dpi)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ScaleBarError::InvalidData(format!(
                    "axis `{name}` must be finite and > 0"
                )));
            }
        }
        for (name, (min, max)) in [("x_limits", x_limits), ("y_limits", y_limits)] {
            if !min.is_finite() || !max.is_finite() || min == max {
                return Err(ScaleBarError::InvalidData(format!(
                    "axis `{name}` must be finite and non-empty"
                )));
            }
        }

        Ok(Self {
            x_limits,
            y_limits,
            width_in,
            height_in,
            dpi,
            crs: None,
        })
    }

    #[must_use]
    pub fn with_crs(mut self, crs: impl Into<String>) -> Self {
        self.crs = Some(crs.into());
        self
    }
}

impl MapAxis for StaticAxis {
    fn x_limits(&self) -> (f64, f64) {
        self.x_limits
    }

    fn y_limits(&self) -> (f64, f64) {
        self.y_limits
    }

    fn size_inches(&self) -> (f64, f64) {
        (self.width_in, self.height_in)
    }

    fn dpi(&self) -> f64 {
        self.dpi
    }

    fn crs(&self) -> Option<&str> {
        self.crs.as_deref()
    }
}
