//! Minimal CRS knowledge needed to size a scale bar.
//!
//! Full reprojection is the host's business. A bar only needs two facts from
//! the coordinate subsystem: the linear unit of one CRS axis, and the ground
//! distance between two geographic points. `BuiltinCrs` answers the first for
//! common EPSG codes and PROJ strings; hosts with a real CRS library override
//! `MapAxis::axis_unit_name` instead.

use crate::error::{ScaleBarError, ScaleBarResult};

/// Mean earth radius (IUGG) in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_008.8;

pub const DEGREE_UNIT: &str = "degree";

/// Lookup table for axis units of well-known coordinate reference systems.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinCrs;

impl BuiltinCrs {
    /// Returns the unit name of CRS axis `axis_index` (0 = east-west, 1 = north-south).
    ///
    /// All supported systems share one unit across both axes, so the index only
    /// matters for hosts that override this lookup.
    pub fn axis_unit_name(&self, crs: &str, axis_index: usize) -> ScaleBarResult<String> {
        if axis_index > 1 {
            return Err(ScaleBarError::InvalidData(format!(
                "CRS axis index must be 0 or 1, got {axis_index}"
            )));
        }

        let trimmed = crs.trim();
        if trimmed.starts_with('+') {
            return proj_string_unit(trimmed);
        }

        let code = parse_epsg_code(trimmed).ok_or_else(|| ScaleBarError::InvalidCrs(crs.to_owned()))?;
        epsg_unit(code)
            .map(str::to_owned)
            .ok_or_else(|| ScaleBarError::InvalidCrs(crs.to_owned()))
    }
}

fn parse_epsg_code(crs: &str) -> Option<u32> {
    let upper = crs.to_ascii_uppercase();
    let digits = upper
        .strip_prefix("EPSG::")
        .or_else(|| upper.strip_prefix("EPSG:"))
        .unwrap_or(&upper);
    digits.trim().parse().ok()
}

fn epsg_unit(code: u32) -> Option<&'static str> {
    let unit = match code {
        // Geographic 2D systems.
        4326 | 4269 | 4267 | 4258 | 4283 | 4674 | 4617 => DEGREE_UNIT,
        // UTM zones (WGS84 north/south, NAD83, NAD27, ETRS89).
        32601..=32660 | 32701..=32760 | 26901..=26923 | 26701..=26722 | 25828..=25838 => "metre",
        3857 | 3395 | 5070 | 27700 | 2154 | 3035 | 3578 | 3005 | 3347 | 3978 | 6933 | 8857 => {
            "metre"
        }
        // US state plane systems published in US survey feet.
        2225..=2250 | 2263..=2266 | 2272 | 2273 | 2276..=2279 | 2283 | 2284 | 2868 | 3435 | 3436 => {
            "US survey foot"
        }
        // International feet.
        2260 | 2261 | 2262 | 3735 => "foot",
        _ => return None,
    };
    Some(unit)
}

fn proj_string_unit(proj: &str) -> ScaleBarResult<String> {
    let mut units = None;
    let mut is_longlat = false;
    for token in proj.split_whitespace() {
        let token = token.trim_start_matches('+');
        match token.split_once('=') {
            Some(("proj", "longlat" | "latlong" | "lonlat" | "latlon")) => is_longlat = true,
            Some(("units", value)) => units = Some(value),
            Some(_) => {}
            None => {}
        }
    }
    if !proj.contains("proj=") {
        return Err(ScaleBarError::InvalidCrs(proj.to_owned()));
    }
    if is_longlat {
        return Ok(DEGREE_UNIT.to_owned());
    }

    let unit = match units.unwrap_or("m") {
        "m" => "metre",
        "km" => "kilometre",
        "ft" => "foot",
        "us-ft" => "US survey foot",
        "yd" => "yard",
        "mi" | "us-mi" => "mile",
        "kmi" => "nautical mile",
        other => other,
    };
    Ok(unit.to_owned())
}

/// Haversine distance in meters between two `(lon, lat)` points in degrees.
#[must_use]
pub fn great_circle_distance(a: (f64, f64), b: (f64, f64)) -> f64 {
    let (lon_a, lat_a) = (a.0.to_radians(), a.1.to_radians());
    let (lon_b, lat_b) = (b.0.to_radians(), b.1.to_radians());
    let d_lat = lat_b - lat_a;
    let d_lon = lon_b - lon_a;
    let h = (d_lat / 2.0).sin().powi(2) + lat_a.cos() * lat_b.cos() * (d_lon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * h.sqrt().min(1.0).asin()
}
