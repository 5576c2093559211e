use serde::{Deserialize, Serialize};

use crate::diagnostics::Diagnostics;
use crate::error::ScaleBarResult;
use crate::render::{Color, FontFamily, FontStyle, FontWeight};
use crate::style::font::FontSize;
use crate::style::text::{FontOverrides, RotationMode};
use crate::style::validation::{UnknownKeys, check_min, report_unknown};

/// Where the units label is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitsLoc {
    /// Trailing the bar on the same row.
    #[default]
    Bar,
    /// Appended to the last division label.
    Text,
    /// On the side of the bar facing away from the labels.
    Opposite,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnitsStyle {
    /// Replaces the resolved unit abbreviation.
    pub label: Option<String>,
    pub loc: UnitsLoc,
    /// Points between the units text and the bar (`Opposite` only).
    pub sep: f64,
    pub pad: f64,
    pub font: FontOverrides,
}

impl UnitsStyle {
    pub fn validate(&self) -> ScaleBarResult<()> {
        check_min("units.sep", self.sep, 0.0)?;
        check_min("units.pad", self.pad, 0.0)?;
        self.font.validate("units")
    }

    pub fn merge(&self, overrides: &UnitsOverrides, diagnostics: &mut Diagnostics) -> ScaleBarResult<Self> {
        report_unknown("units", &overrides.unknown, diagnostics);

        let mut merged = self.clone();
        if let Some(label) = &overrides.label {
            merged.label = Some(label.clone());
        }
        if let Some(loc) = overrides.loc {
            merged.loc = loc;
        }
        if let Some(sep) = overrides.sep {
            merged.sep = sep;
        }
        if let Some(pad) = overrides.pad {
            merged.pad = pad;
        }
        let font = FontOverrides {
            fontsize: overrides
                .fontsize
                .as_ref()
                .map(|size| size.to_points(diagnostics))
                .transpose()?,
            textcolors: overrides.textcolor.map(|color| vec![color]),
            fontfamily: overrides.fontfamily,
            fontstyle: overrides.fontstyle,
            fontweight: overrides.fontweight,
            stroke_width: overrides.stroke_width,
            stroke_color: overrides.stroke_color,
            rotation: overrides.rotation,
            rotation_mode: overrides.rotation_mode,
        };
        merged.font = merged.font.merged_with(&font);

        merged.validate()?;
        Ok(merged)
    }
}

/// Serialized `units` section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UnitsOverrides {
    pub label: Option<String>,
    pub loc: Option<UnitsLoc>,
    pub fontsize: Option<FontSize>,
    pub textcolor: Option<Color>,
    pub fontfamily: Option<FontFamily>,
    pub fontstyle: Option<FontStyle>,
    pub fontweight: Option<FontWeight>,
    pub stroke_width: Option<f64>,
    pub stroke_color: Option<Color>,
    pub rotation: Option<f64>,
    pub rotation_mode: Option<RotationMode>,
    pub sep: Option<f64>,
    pub pad: Option<f64>,
    #[serde(flatten, skip_serializing)]
    pub unknown: UnknownKeys,
}
