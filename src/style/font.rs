use serde::{Deserialize, Serialize};

use crate::diagnostics::{Diagnostics, ScaleBarWarning};
use crate::error::{ScaleBarError, ScaleBarResult};

/// Base size that named font sizes scale from, in points.
pub const BASE_FONT_SIZE_PT: f64 = 10.0;

/// A font size in points, or a relative name such as `"large"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FontSize {
    Points(f64),
    Named(String),
}

impl FontSize {
    /// Resolves to points; unknown names fall back to the base size with a warning.
    pub fn to_points(&self, diagnostics: &mut Diagnostics) -> ScaleBarResult<f64> {
        match self {
            Self::Points(points) => {
                if !points.is_finite() || *points <= 0.0 {
                    return Err(ScaleBarError::config(
                        "fontsize",
                        format!("must be finite and > 0, got {points}"),
                    ));
                }
                Ok(*points)
            }
            Self::Named(name) => match named_scaling(name) {
                Some(scaling) => Ok(BASE_FONT_SIZE_PT * scaling),
                None => {
                    diagnostics.warn(ScaleBarWarning::UnknownFontSize { name: name.clone() });
                    Ok(BASE_FONT_SIZE_PT)
                }
            },
        }
    }
}

impl From<f64> for FontSize {
    fn from(points: f64) -> Self {
        Self::Points(points)
    }
}

impl From<&str> for FontSize {
    fn from(name: &str) -> Self {
        Self::Named(name.to_owned())
    }
}

fn named_scaling(name: &str) -> Option<f64> {
    let scaling = match name.trim() {
        "xx-small" => 0.579,
        "x-small" => 0.694,
        "small" | "smaller" => 0.833,
        "medium" => 1.0,
        "large" | "larger" => 1.2,
        "x-large" => 1.44,
        "xx-large" => 1.728,
        _ => return None,
    };
    Some(scaling)
}
