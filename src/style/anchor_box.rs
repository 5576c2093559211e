use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::diagnostics::Diagnostics;
use crate::error::ScaleBarResult;
use crate::render::Color;
use crate::style::font::FontSize;
use crate::style::validation::{check_min, check_range};

/// Placement hooks handed to the host untouched (`bbox_to_anchor`, ...).
pub type Passthrough = IndexMap<String, serde_json::Value>;

/// Container the raster is anchored in.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnchorBoxStyle {
    pub facecolor: Option<Color>,
    pub edgecolor: Option<Color>,
    pub alpha: Option<f64>,
    /// Fraction of `prop_pt`.
    pub pad: f64,
    /// Fraction of `prop_pt`.
    pub borderpad: f64,
    /// Font size the paddings are relative to, in points.
    pub prop_pt: f64,
    pub frameon: bool,
    pub extra: Passthrough,
}

impl AnchorBoxStyle {
    pub fn validate(&self) -> ScaleBarResult<()> {
        check_min("aob.pad", self.pad, 0.0)?;
        check_min("aob.borderpad", self.borderpad, 0.0)?;
        check_min("aob.prop", self.prop_pt, f64::MIN_POSITIVE)?;
        if let Some(alpha) = self.alpha {
            check_range("aob.alpha", alpha, 0.0, 1.0)?;
        }
        if let Some(color) = self.facecolor {
            color.validate()?;
        }
        if let Some(color) = self.edgecolor {
            color.validate()?;
        }
        Ok(())
    }

    /// Unrecognized keys are kept in `extra` rather than reported.
    pub fn merge(
        &self,
        overrides: &AnchorBoxOverrides,
        diagnostics: &mut Diagnostics,
    ) -> ScaleBarResult<Self> {
        let mut merged = self.clone();
        if overrides.facecolor.is_some() {
            merged.facecolor = overrides.facecolor;
        }
        if overrides.edgecolor.is_some() {
            merged.edgecolor = overrides.edgecolor;
        }
        if overrides.alpha.is_some() {
            merged.alpha = overrides.alpha;
        }
        if let Some(pad) = overrides.pad {
            merged.pad = pad;
        }
        if let Some(borderpad) = overrides.borderpad {
            merged.borderpad = borderpad;
        }
        if let Some(prop) = &overrides.prop {
            merged.prop_pt = prop.to_points(diagnostics)?;
        }
        if let Some(frameon) = overrides.frameon {
            merged.frameon = frameon;
        }
        for (key, value) in &overrides.extra {
            merged.extra.insert(key.clone(), value.clone());
        }

        merged.validate()?;
        Ok(merged)
    }

    #[must_use]
    pub fn pad_pt(&self) -> f64 {
        self.pad * self.prop_pt
    }

    #[must_use]
    pub fn borderpad_pt(&self) -> f64 {
        self.borderpad * self.prop_pt
    }
}

/// Serialized `aob` section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnchorBoxOverrides {
    pub facecolor: Option<Color>,
    pub edgecolor: Option<Color>,
    pub alpha: Option<f64>,
    pub pad: Option<f64>,
    pub borderpad: Option<f64>,
    pub prop: Option<FontSize>,
    pub frameon: Option<bool>,
    #[serde(flatten)]
    pub extra: Passthrough,
}
