use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};

use crate::diagnostics::{Diagnostics, ScaleBarWarning};
use crate::error::{ScaleBarError, ScaleBarResult};
use crate::render::Color;

/// Keys present in serialized overrides that no field consumed.
pub type UnknownKeys = IndexMap<String, serde_json::Value>;

pub(super) fn report_unknown(section: &'static str, unknown: &UnknownKeys, diagnostics: &mut Diagnostics) {
    for key in unknown.keys() {
        diagnostics.warn(ScaleBarWarning::UnknownStyleKey {
            section,
            key: key.clone(),
        });
    }
}

pub(super) fn check_min(field: &str, value: f64, min: f64) -> ScaleBarResult<()> {
    if !value.is_finite() || value < min {
        return Err(ScaleBarError::config(
            field,
            format!("must be finite and >= {min}, got {value}"),
        ));
    }
    Ok(())
}

pub(super) fn check_range(field: &str, value: f64, min: f64, max: f64) -> ScaleBarResult<()> {
    if !value.is_finite() || !(min..=max).contains(&value) {
        return Err(ScaleBarError::config(
            field,
            format!("must be within [{min}, {max}], got {value}"),
        ));
    }
    Ok(())
}

pub(super) fn check_optional_min(field: &str, value: Option<f64>, min: f64) -> ScaleBarResult<()> {
    value.map_or(Ok(()), |value| check_min(field, value, min))
}

pub(super) fn check_colors(field: &str, colors: &[Color]) -> ScaleBarResult<()> {
    if colors.is_empty() {
        return Err(ScaleBarError::config(field, "at least one color is required"));
    }
    colors.iter().try_for_each(|color| color.validate())
}

/// Accepts either a single color or a list of colors.
pub(super) fn color_list<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<Vec<Color>>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        One(Color),
        Many(Vec<Color>),
    }

    Ok(Option::<Raw>::deserialize(deserializer)?.map(|raw| match raw {
        Raw::One(color) => vec![color],
        Raw::Many(colors) => colors,
    }))
}
