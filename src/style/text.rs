use serde::{Deserialize, Serialize};

use crate::diagnostics::Diagnostics;
use crate::error::ScaleBarResult;
use crate::render::{Color, FontFamily, FontSpec, FontStyle, FontWeight};
use crate::style::font::FontSize;
use crate::style::validation::{
    UnknownKeys, check_colors, check_min, check_range, color_list, report_unknown,
};

/// How rotated text is positioned relative to its anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RotationMode {
    /// Rotate first, then align the rotated extent.
    Default,
    /// Align first, then rotate around the anchor point.
    #[default]
    Anchor,
}

/// Shared text appearance; labels and units fall back to it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextStyle {
    /// Points.
    pub fontsize: f64,
    /// Cycled across labels; units use the first entry.
    pub textcolors: Vec<Color>,
    pub fontfamily: FontFamily,
    pub fontstyle: FontStyle,
    pub fontweight: FontWeight,
    /// Halo width in points.
    pub stroke_width: f64,
    pub stroke_color: Color,
    pub rotation: Option<f64>,
    pub rotation_mode: RotationMode,
}

impl TextStyle {
    pub fn validate(&self) -> ScaleBarResult<()> {
        check_min("text.fontsize", self.fontsize, f64::MIN_POSITIVE)?;
        check_colors("text.textcolor", &self.textcolors)?;
        check_min("text.stroke_width", self.stroke_width, 0.0)?;
        self.stroke_color.validate()?;
        if let Some(rotation) = self.rotation {
            check_range("text.rotation", rotation, -360.0, 360.0)?;
        }
        Ok(())
    }

    /// Merges overrides onto a copy and validates the result.
    pub fn merge(&self, overrides: &TextOverrides, diagnostics: &mut Diagnostics) -> ScaleBarResult<Self> {
        report_unknown("text", &overrides.unknown, diagnostics);
        let font = FontOverrides {
            fontsize: overrides
                .fontsize
                .as_ref()
                .map(|size| size.to_points(diagnostics))
                .transpose()?,
            textcolors: overrides.textcolor.clone(),
            fontfamily: overrides.fontfamily,
            fontstyle: overrides.fontstyle,
            fontweight: overrides.fontweight,
            stroke_width: overrides.stroke_width,
            stroke_color: overrides.stroke_color,
            rotation: overrides.rotation,
            rotation_mode: overrides.rotation_mode,
        };
        let merged = self.with_overrides(&font);
        merged.validate()?;
        Ok(merged)
    }

    /// Effective appearance after applying section-level font overrides.
    #[must_use]
    pub fn with_overrides(&self, font: &FontOverrides) -> Self {
        Self {
            fontsize: font.fontsize.unwrap_or(self.fontsize),
            textcolors: font
                .textcolors
                .clone()
                .unwrap_or_else(|| self.textcolors.clone()),
            fontfamily: font.fontfamily.unwrap_or(self.fontfamily),
            fontstyle: font.fontstyle.unwrap_or(self.fontstyle),
            fontweight: font.fontweight.unwrap_or(self.fontweight),
            stroke_width: font.stroke_width.unwrap_or(self.stroke_width),
            stroke_color: font.stroke_color.unwrap_or(self.stroke_color),
            rotation: font.rotation.or(self.rotation),
            rotation_mode: font.rotation_mode.unwrap_or(self.rotation_mode),
        }
    }

    #[must_use]
    pub fn font_spec(&self) -> FontSpec {
        FontSpec {
            family: self.fontfamily,
            style: self.fontstyle,
            weight: self.fontweight,
        }
    }

    #[must_use]
    pub fn primary_color(&self) -> Color {
        self.textcolors.first().copied().unwrap_or(Color::BLACK)
    }
}

/// Font fields a labels or units section may set on top of the text style.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FontOverrides {
    pub fontsize: Option<f64>,
    pub textcolors: Option<Vec<Color>>,
    pub fontfamily: Option<FontFamily>,
    pub fontstyle: Option<FontStyle>,
    pub fontweight: Option<FontWeight>,
    pub stroke_width: Option<f64>,
    pub stroke_color: Option<Color>,
    pub rotation: Option<f64>,
    pub rotation_mode: Option<RotationMode>,
}

impl FontOverrides {
    pub fn validate(&self, section: &str) -> ScaleBarResult<()> {
        if let Some(fontsize) = self.fontsize {
            check_min(&format!("{section}.fontsize"), fontsize, f64::MIN_POSITIVE)?;
        }
        if let Some(colors) = &self.textcolors {
            check_colors(&format!("{section}.textcolors"), colors)?;
        }
        if let Some(stroke_width) = self.stroke_width {
            check_min(&format!("{section}.stroke_width"), stroke_width, 0.0)?;
        }
        if let Some(rotation) = self.rotation {
            check_range(&format!("{section}.rotation"), rotation, -360.0, 360.0)?;
        }
        Ok(())
    }

    /// Right-biased merge: fields set in `other` win.
    #[must_use]
    pub fn merged_with(&self, other: &Self) -> Self {
        Self {
            fontsize: other.fontsize.or(self.fontsize),
            textcolors: other.textcolors.clone().or_else(|| self.textcolors.clone()),
            fontfamily: other.fontfamily.or(self.fontfamily),
            fontstyle: other.fontstyle.or(self.fontstyle),
            fontweight: other.fontweight.or(self.fontweight),
            stroke_width: other.stroke_width.or(self.stroke_width),
            stroke_color: other.stroke_color.or(self.stroke_color),
            rotation: other.rotation.or(self.rotation),
            rotation_mode: other.rotation_mode.or(self.rotation_mode),
        }
    }
}

/// Serialized `text` section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextOverrides {
    pub fontsize: Option<FontSize>,
    #[serde(deserialize_with = "color_list")]
    pub textcolor: Option<Vec<Color>>,
    pub fontfamily: Option<FontFamily>,
    pub fontstyle: Option<FontStyle>,
    pub fontweight: Option<FontWeight>,
    pub stroke_width: Option<f64>,
    pub stroke_color: Option<Color>,
    pub rotation: Option<f64>,
    pub rotation_mode: Option<RotationMode>,
    #[serde(flatten, skip_serializing)]
    pub unknown: UnknownKeys,
}
