use serde::{Deserialize, Serialize};

use crate::core::{MAX_DRAWN_DIVISIONS, MinorType, Projection, drawn_divisions};
use crate::diagnostics::{Diagnostics, ScaleBarWarning};
use crate::error::{ScaleBarError, ScaleBarResult};
use crate::render::Color;
use crate::style::validation::{
    UnknownKeys, check_colors, check_min, check_optional_min, check_range, color_list,
    report_unknown,
};

/// How the bar itself is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BarKind {
    /// Alternating filled rectangles.
    #[default]
    Boxes,
    /// A baseline with vertical tick marks.
    Ticks,
}

/// Vertical placement of tick marks relative to the baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TickLoc {
    #[default]
    Above,
    Below,
    Middle,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarStyle {
    /// `None` measures in the axis CRS.
    pub projection: Option<Projection>,
    pub unit: Option<String>,
    /// Counter-clockwise degrees.
    pub rotation: f64,
    pub max: Option<f64>,
    /// Inches, or a fraction of the axis when below 1.
    pub length: Option<f64>,
    pub major_mult: Option<f64>,
    /// Inches.
    pub height: f64,
    pub reverse: bool,
    pub major_div: Option<u32>,
    pub minor_div: Option<u32>,
    pub minor_frac: f64,
    pub minor_type: MinorType,
    pub facecolors: Vec<Color>,
    pub edgecolors: Vec<Color>,
    /// Points.
    pub edgewidth: f64,
    pub tick_loc: TickLoc,
    pub basecolors: Vec<Color>,
    pub tickcolors: Vec<Color>,
    /// Points.
    pub tickwidth: f64,
    pub raster_dpi: Option<f64>,
    pub raster_dpi_scale: f64,
}

const BOXES_ONLY: [&str; 3] = ["facecolors", "edgecolors", "edgewidth"];
const TICKS_ONLY: [&str; 5] = ["minor_frac", "tick_loc", "basecolors", "tickcolors", "tickwidth"];

impl BarStyle {
    pub fn validate(&self) -> ScaleBarResult<()> {
        check_range("bar.rotation", self.rotation, -360.0, 360.0)?;
        check_optional_min("bar.max", self.max, 0.0)?;
        check_optional_min("bar.length", self.length, 0.0)?;
        check_optional_min("bar.major_mult", self.major_mult, 0.0)?;
        check_min("bar.height", self.height, 0.0)?;
        if self.major_div == Some(0) {
            return Err(ScaleBarError::config("bar.major_div", "must be >= 1"));
        }
        let counts = [("bar.major_div", self.major_div), ("bar.minor_div", self.minor_div)];
        for (field, divisions) in counts {
            if divisions.is_some_and(|n| n > MAX_DRAWN_DIVISIONS) {
                return Err(ScaleBarError::config(
                    field,
                    format!("must be <= {MAX_DRAWN_DIVISIONS}"),
                ));
            }
        }
        if let (Some(major), Some(minor)) = (self.major_div, self.minor_div)
            && drawn_divisions(major, minor).is_none()
        {
            return Err(ScaleBarError::config(
                "bar.minor_div",
                format!("major_div * minor_div must be <= {MAX_DRAWN_DIVISIONS}"),
            ));
        }
        check_range("bar.minor_frac", self.minor_frac, 0.0, 1.0)?;
        check_colors("bar.facecolors", &self.facecolors)?;
        check_colors("bar.edgecolors", &self.edgecolors)?;
        check_min("bar.edgewidth", self.edgewidth, 0.0)?;
        check_colors("bar.basecolors", &self.basecolors)?;
        check_colors("bar.tickcolors", &self.tickcolors)?;
        check_min("bar.tickwidth", self.tickwidth, 0.0)?;
        if let Some(dpi) = self.raster_dpi {
            check_min("bar.raster_dpi", dpi, f64::MIN_POSITIVE)?;
        }
        check_min("bar.raster_dpi_scale", self.raster_dpi_scale, f64::MIN_POSITIVE)?;
        Ok(())
    }

    /// Merges overrides onto a copy, skipping keys that do not apply to `kind`.
    pub fn merge(
        &self,
        overrides: &BarOverrides,
        kind: BarKind,
        diagnostics: &mut Diagnostics,
    ) -> ScaleBarResult<Self> {
        report_unknown("bar", &overrides.unknown, diagnostics);
        let (ignored, reason): (&[&str], _) = match kind {
            BarKind::Boxes => (&TICKS_ONLY, "only used by ticks-style bars"),
            BarKind::Ticks => (&BOXES_ONLY, "only used by boxes-style bars"),
        };
        let mut applies = |key: &'static str, is_set: bool| {
            if is_set && ignored.contains(&key) {
                diagnostics.warn(ScaleBarWarning::StyleKeyIgnored {
                    section: "bar",
                    key: key.to_owned(),
                    reason,
                });
                return false;
            }
            is_set
        };

        let mut merged = self.clone();
        if let Some(projection) = &overrides.projection {
            merged.projection = Some(projection.clone());
        }
        if let Some(unit) = &overrides.unit {
            merged.unit = Some(unit.clone());
        }
        if let Some(rotation) = overrides.rotation {
            merged.rotation = rotation;
        }
        if overrides.max.is_some() {
            merged.max = overrides.max;
        }
        if overrides.length.is_some() {
            merged.length = overrides.length;
        }
        if overrides.major_mult.is_some() {
            merged.major_mult = overrides.major_mult;
        }
        if let Some(height) = overrides.height {
            merged.height = height;
        }
        if let Some(reverse) = overrides.reverse {
            merged.reverse = reverse;
        }
        if overrides.major_div.is_some() {
            merged.major_div = overrides.major_div;
        }
        if overrides.minor_div.is_some() {
            merged.minor_div = overrides.minor_div;
        }
        if let Some(minor_type) = overrides.minor_type {
            merged.minor_type = minor_type;
        }
        if overrides.raster_dpi.is_some() {
            merged.raster_dpi = overrides.raster_dpi;
        }
        if let Some(scale) = overrides.raster_dpi_scale {
            merged.raster_dpi_scale = scale;
        }

        if applies("facecolors", overrides.facecolors.is_some()) {
            merged.facecolors = overrides.facecolors.clone().unwrap_or_default();
        }
        if applies("edgecolors", overrides.edgecolors.is_some()) {
            merged.edgecolors = overrides.edgecolors.clone().unwrap_or_default();
        }
        if applies("edgewidth", overrides.edgewidth.is_some()) {
            merged.edgewidth = overrides.edgewidth.unwrap_or(merged.edgewidth);
        }
        if applies("minor_frac", overrides.minor_frac.is_some()) {
            merged.minor_frac = overrides.minor_frac.unwrap_or(merged.minor_frac);
        }
        if applies("tick_loc", overrides.tick_loc.is_some()) {
            merged.tick_loc = overrides.tick_loc.unwrap_or(merged.tick_loc);
        }
        if applies("basecolors", overrides.basecolors.is_some()) {
            merged.basecolors = overrides.basecolors.clone().unwrap_or_default();
        }
        if applies("tickcolors", overrides.tickcolors.is_some()) {
            merged.tickcolors = overrides.tickcolors.clone().unwrap_or_default();
        }
        if applies("tickwidth", overrides.tickwidth.is_some()) {
            merged.tickwidth = overrides.tickwidth.unwrap_or(merged.tickwidth);
        }

        merged.validate()?;
        Ok(merged)
    }
}

/// Serialized `bar` section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BarOverrides {
    pub projection: Option<Projection>,
    pub unit: Option<String>,
    pub rotation: Option<f64>,
    pub max: Option<f64>,
    pub length: Option<f64>,
    pub major_mult: Option<f64>,
    pub height: Option<f64>,
    pub reverse: Option<bool>,
    pub major_div: Option<u32>,
    pub minor_div: Option<u32>,
    pub minor_frac: Option<f64>,
    pub minor_type: Option<MinorType>,
    #[serde(deserialize_with = "color_list")]
    pub facecolors: Option<Vec<Color>>,
    #[serde(deserialize_with = "color_list")]
    pub edgecolors: Option<Vec<Color>>,
    pub edgewidth: Option<f64>,
    pub tick_loc: Option<TickLoc>,
    #[serde(deserialize_with = "color_list")]
    pub basecolors: Option<Vec<Color>>,
    #[serde(deserialize_with = "color_list")]
    pub tickcolors: Option<Vec<Color>>,
    pub tickwidth: Option<f64>,
    pub raster_dpi: Option<f64>,
    pub raster_dpi_scale: Option<f64>,
    #[serde(flatten, skip_serializing)]
    pub unknown: UnknownKeys,
}
