//! Picks a readable bar maximum and a matching division scheme.
//!
//! Naively scaling the axis gives bars such as "37.42 km". Instead the implied
//! maximum is normalized to a mantissa in `(1.5, 15]` and snapped to the
//! nearest entry of a cartographic table of preferred values, each pre-paired
//! with a balanced `(major_div, minor_div)` scheme.

use ordered_float::OrderedFloat;
use serde::Serialize;
use smallvec::SmallVec;
use tracing::debug;

use crate::diagnostics::{Diagnostics, ScaleBarWarning};

/// Preferred bar maxima (before scaling by a power of ten) and their divisions.
pub const PREFERRED_DIVS: [(f64, u32, u32); 10] = [
    (2.0, 4, 2),
    (2.5, 5, 1),
    (3.0, 3, 3),
    (4.0, 4, 2),
    (5.0, 5, 1),
    (6.0, 3, 2),
    (7.0, 2, 1),
    (8.0, 4, 2),
    (9.0, 3, 3),
    (10.0, 5, 2),
];

/// Default bar length as a fraction of the axis.
pub const DEFAULT_LENGTH_FRACTION: f64 = 0.25;

/// Above this share of the axis a bar is reported as too long.
const TOO_LONG_FRACTION: f64 = 0.9;

const MAX_MAGNITUDE: i32 = 22;

/// User-supplied length constraints, all optional.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LengthRequest {
    pub max: Option<f64>,
    /// Inches, or a fraction of the axis when below 1.
    pub length: Option<f64>,
    pub major_mult: Option<f64>,
    pub major_div: Option<u32>,
}

/// Outcome of the optimizer before any explicit `minor_div` override.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarLength {
    pub bar_max: f64,
    pub bar_length_in: f64,
    pub major_div: u32,
    pub minor_div: u32,
}

/// Derives `(bar_max, bar_length, major_div, minor_div)` from the request.
///
/// Conflicting inputs are resolved by a fixed precedence and reported as
/// warnings. Returns `None` when no combination of the inputs yields a length.
pub fn optimize_bar_length(
    request: LengthRequest,
    axis_inches: f64,
    axis_range: f64,
    pass_through: Option<&str>,
    diagnostics: &mut Diagnostics,
) -> Option<BarLength> {
    let LengthRequest {
        max,
        mut length,
        major_mult,
        mut major_div,
    } = request;

    if length.is_some() && max.is_some() {
        diagnostics.warn(ScaleBarWarning::LengthIgnoredForMax);
    } else if (max.is_some() || length.is_some()) && major_mult.is_some() {
        diagnostics.warn(ScaleBarWarning::MajorMultIgnored);
    } else if length.is_some() && major_div.is_some() {
        diagnostics.warn(ScaleBarWarning::MajorDivIgnoredForLength);
    } else if let Some(requested) = length.filter(|requested| *requested > axis_inches) {
        diagnostics.warn(ScaleBarWarning::LengthExceedsAxis {
            length: requested,
            axis_inches,
        });
        length = Some(DEFAULT_LENGTH_FRACTION);
    } else if let (Some(projection), Some(_)) = (pass_through, length) {
        diagnostics.warn(ScaleBarWarning::LengthWithPassThrough {
            projection: projection.to_owned(),
        });
    } else if major_mult.is_some() && major_div.is_none() {
        diagnostics.warn(ScaleBarWarning::MajorMultWithoutMajorDiv);
        length = Some(DEFAULT_LENGTH_FRACTION);
    } else if max.is_none() && length.is_none() && major_mult.is_none() && major_div.is_some() {
        diagnostics.warn(ScaleBarWarning::MajorDivWithoutMultiplier);
        major_div = None;
    }

    if max.is_none() && length.is_none() && major_mult.is_none() && major_div.is_none() {
        length = Some(DEFAULT_LENGTH_FRACTION);
    }

    let result = if let Some(bar_max) = max {
        let major_div = major_div.unwrap_or_else(|| infer_major_div(bar_max));
        BarLength {
            bar_max,
            bar_length_in: axis_inches * (bar_max / axis_range),
            major_div,
            minor_div: minor_div_for(major_div),
        }
    } else if let Some(length) = length {
        let length_in = if length < 1.0 {
            axis_inches * length
        } else {
            length
        };
        let implied_max = axis_range * (length_in / axis_inches);
        let (bar_max, major_div, minor_div) = round_to_preferred(implied_max);
        BarLength {
            bar_max,
            bar_length_in: axis_inches * (bar_max / axis_range),
            major_div,
            minor_div,
        }
    } else if let (Some(major_mult), Some(major_div)) = (major_mult, major_div) {
        let bar_max = major_mult * f64::from(major_div);
        BarLength {
            bar_max,
            bar_length_in: axis_inches * (bar_max / axis_range),
            major_div,
            minor_div: minor_div_for(major_div),
        }
    } else {
        diagnostics.warn(ScaleBarWarning::LengthUnresolved);
        return None;
    };

    if result.bar_length_in / axis_inches > TOO_LONG_FRACTION
        || result.bar_max > axis_range * TOO_LONG_FRACTION
    {
        diagnostics.warn(ScaleBarWarning::BarTooLong {
            bar_max: result.bar_max,
            axis_range,
        });
    }

    debug!(
        bar_max = result.bar_max,
        bar_length_in = result.bar_length_in,
        major_div = result.major_div,
        minor_div = result.minor_div,
        "optimized bar length"
    );
    Some(result)
}

/// Largest of 3, 2, 1 that divides `bar_max` evenly.
#[must_use]
pub fn infer_major_div(bar_max: f64) -> u32 {
    if bar_max % 3.0 == 0.0 {
        3
    } else if bar_max % 2.0 == 0.0 {
        2
    } else {
        1
    }
}

/// Even major counts get two minor divisions, odd counts none.
#[must_use]
pub const fn minor_div_for(major_div: u32) -> u32 {
    if major_div % 2 == 0 { 2 } else { 1 }
}

/// Power of ten `k` such that `value / 10^k` lies in `(1.5, 15]`.
#[must_use]
pub fn magnitude(value: f64) -> i32 {
    if !value.is_finite() || value <= 0.0 {
        return 0;
    }
    let mut mag = (value / 15.0).log10().ceil() as i32;
    mag = mag.clamp(-MAX_MAGNITUDE, MAX_MAGNITUDE);
    // log10 can land one step off near exact powers of ten.
    if value / 10f64.powi(mag) > 15.0 {
        mag += 1;
    } else if value / 10f64.powi(mag - 1) <= 15.0 {
        mag -= 1;
    }
    mag
}

/// Snaps `value` to the nearest preferred maximum, keeping its magnitude.
///
/// Returns the rounded maximum and the paired `(major_div, minor_div)`.
#[must_use]
pub fn round_to_preferred(value: f64) -> (f64, u32, u32) {
    let mag = magnitude(value);
    let scale = 10f64.powi(mag);
    let mantissa = value / scale;

    let mut ranked: SmallVec<[(OrderedFloat<f64>, OrderedFloat<f64>, u32, u32); 10]> =
        PREFERRED_DIVS
            .iter()
            .map(|&(preferred, major, minor)| {
                (
                    OrderedFloat((preferred - mantissa).abs()),
                    OrderedFloat(preferred),
                    major,
                    minor,
                )
            })
            .collect();
    ranked.sort();

    let (_, best, major_div, minor_div) = ranked[0];
    (best.0 * scale, major_div, minor_div)
}

/// Geometry of one bar, recomputed on every draw.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarConfig {
    pub bar_max: f64,
    pub bar_length_in: f64,
    pub major_div: u32,
    pub minor_div: u32,
    pub units_label: String,
}

impl BarConfig {
    /// Applies an explicit `minor_div`, which always wins over the computed one.
    #[must_use]
    pub fn new(length: BarLength, minor_div: Option<u32>, units_label: impl Into<String>) -> Self {
        Self {
            bar_max: length.bar_max,
            bar_length_in: length.bar_length_in,
            major_div: length.major_div,
            minor_div: minor_div.unwrap_or(length.minor_div),
            units_label: units_label.into(),
        }
    }

    /// Width of one major division in inches.
    #[must_use]
    pub fn major_width_in(&self) -> f64 {
        self.bar_length_in / f64::from(self.major_div.max(1))
    }
}
