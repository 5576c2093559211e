use tracing::debug;

use crate::core::axis::MapAxis;
use crate::core::crs::DEGREE_UNIT;
use crate::core::units::{BarOrientation, LengthUnit, PassThrough, Projection};
use crate::diagnostics::{Diagnostics, ScaleBarWarning};
use crate::error::ScaleBarResult;

pub const POINTS_PER_INCH: f64 = 72.0;

/// Ranges above this many meters are relabeled in kilometers.
const METERS_UPGRADE_THRESHOLD: f64 = 1000.0 * 5.0;
/// Ranges above this many feet are relabeled in miles.
const FEET_UPGRADE_THRESHOLD: f64 = 5280.0 * 5.0;

/// Axis extent expressed in the unit the bar will be labeled in.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisMeasure {
    pub axis_inches: f64,
    pub axis_range: f64,
    pub units_label: String,
    pub pass_through: Option<PassThrough>,
}

/// Resolves the axis length in inches and in real-world units.
///
/// Returns `Ok(None)` when the CRS unit cannot be mapped to a length unit: the
/// caller must draw nothing. Unparseable CRS identifiers are errors.
pub fn resolve_axis_units<A: MapAxis + ?Sized>(
    axis: &A,
    orientation: BarOrientation,
    projection: &Projection,
    requested_unit: Option<&str>,
    diagnostics: &mut Diagnostics,
) -> ScaleBarResult<Option<AxisMeasure>> {
    let (width_in, height_in) = axis.size_inches();
    let (axis_inches, (min_lim, max_lim)) = match orientation {
        BarOrientation::Horizontal => (width_in, axis.x_limits()),
        BarOrientation::Vertical => (height_in, axis.y_limits()),
    };
    let axis_range = (max_lim - min_lim).abs();

    let crs = match projection {
        Projection::PassThrough(mode) => {
            if requested_unit.is_some() {
                diagnostics.warn(ScaleBarWarning::UnitIgnoredForPassThrough {
                    projection: mode.name().to_owned(),
                });
            }
            let axis_range = match mode {
                PassThrough::Pixels => axis_inches * axis.dpi(),
                PassThrough::Points => axis_inches * POINTS_PER_INCH,
                PassThrough::Axis => axis_range,
            };
            return Ok(Some(AxisMeasure {
                axis_inches,
                axis_range,
                units_label: String::new(),
                pass_through: Some(*mode),
            }));
        }
        Projection::Crs(crs) => crs,
    };

    let native_name = axis.axis_unit_name(crs, orientation.axis_index())?;
    let (native, ground_range) = if native_name == DEGREE_UNIT {
        diagnostics.warn(ScaleBarWarning::DegreeCrs { crs: crs.clone() });
        (LengthUnit::Meter, degree_range_in_meters(axis, orientation))
    } else {
        match LengthUnit::standardize(&native_name) {
            Some(unit) => (unit, axis_range),
            None => {
                diagnostics.warn(ScaleBarWarning::UnsupportedCrsUnit { unit: native_name });
                return Ok(None);
            }
        }
    };

    let requested = requested_unit.and_then(|name| {
        let unit = LengthUnit::standardize(name);
        if unit.is_none() {
            diagnostics.warn(ScaleBarWarning::UnsupportedRequestedUnit {
                unit: name.to_owned(),
            });
        }
        unit
    });

    let (axis_range, unit) = match requested {
        None => auto_upgrade(native, ground_range),
        Some(user) if user != native => (ground_range * native.ratio_to(user), user),
        Some(user) => (ground_range, user),
    };
    debug!(
        crs = crs.as_str(),
        native = native.label(),
        resolved = unit.label(),
        axis_inches,
        axis_range,
        "resolved axis units"
    );

    Ok(Some(AxisMeasure {
        axis_inches,
        axis_range,
        units_label: unit.label().to_owned(),
        pass_through: None,
    }))
}

fn auto_upgrade(native: LengthUnit, range: f64) -> (f64, LengthUnit) {
    match native {
        LengthUnit::Meter if range > METERS_UPGRADE_THRESHOLD => {
            (range / 1000.0, LengthUnit::Kilometer)
        }
        LengthUnit::Foot if range > FEET_UPGRADE_THRESHOLD => (range / 5280.0, LengthUnit::Mile),
        _ => (range, native),
    }
}

/// Ground distance spanned by a geographic axis, holding the other coordinate at its midpoint.
fn degree_range_in_meters<A: MapAxis + ?Sized>(axis: &A, orientation: BarOrientation) -> f64 {
    let (x_min, x_max) = axis.x_limits();
    let (y_min, y_max) = axis.y_limits();
    match orientation {
        BarOrientation::Vertical => {
            let lon = (x_min + x_max) / 2.0;
            axis.great_circle_distance((lon, y_min), (lon, y_max))
        }
        BarOrientation::Horizontal => {
            let lat = (y_min + y_max) / 2.0;
            axis.great_circle_distance((x_min, lat), (x_max, lat))
        }
    }
}
