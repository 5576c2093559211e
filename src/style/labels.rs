use serde::{Deserialize, Serialize};

use crate::core::{CustomLabel, LabelStyle, NumberFormat};
use crate::diagnostics::Diagnostics;
use crate::error::ScaleBarResult;
use crate::render::{Color, FontFamily, FontStyle, FontWeight};
use crate::style::font::FontSize;
use crate::style::text::{FontOverrides, RotationMode};
use crate::style::validation::{UnknownKeys, check_min, color_list, report_unknown};

/// Side of the bar the division labels sit on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelLoc {
    #[default]
    Above,
    Below,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelsStyle {
    pub labels: Option<Vec<CustomLabel>>,
    /// `None` shows raw values.
    pub format: Option<NumberFormat>,
    pub format_int: bool,
    pub style: LabelStyle,
    pub loc: LabelLoc,
    /// Points between the label row and the bar.
    pub sep: f64,
    pub pad: f64,
    pub font: FontOverrides,
}

impl LabelsStyle {
    pub fn validate(&self) -> ScaleBarResult<()> {
        check_min("labels.sep", self.sep, 0.0)?;
        check_min("labels.pad", self.pad, 0.0)?;
        self.font.validate("labels")
    }

    pub fn merge(&self, overrides: &LabelsOverrides, diagnostics: &mut Diagnostics) -> ScaleBarResult<Self> {
        report_unknown("labels", &overrides.unknown, diagnostics);

        let mut merged = self.clone();
        if let Some(labels) = &overrides.labels {
            merged.labels = Some(labels.clone());
        }
        if let Some(format) = &overrides.format {
            merged.format = match format.trim() {
                "" => None,
                spec => Some(NumberFormat::parse(spec)?),
            };
        }
        if let Some(format_int) = overrides.format_int {
            merged.format_int = format_int;
        }
        if let Some(style) = overrides.style {
            merged.style = style;
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
            textcolors: overrides.textcolors.clone(),
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

/// Serialized `labels` section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelsOverrides {
    pub labels: Option<Vec<CustomLabel>>,
    /// Empty string clears the format.
    pub format: Option<String>,
    pub format_int: Option<bool>,
    pub style: Option<LabelStyle>,
    pub loc: Option<LabelLoc>,
    pub fontsize: Option<FontSize>,
    #[serde(deserialize_with = "color_list")]
    pub textcolors: Option<Vec<Color>>,
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
