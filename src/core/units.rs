use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{ScaleBarError, ScaleBarResult};

/// Real-world length units a bar can be expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LengthUnit {
    Meter,
    Kilometer,
    Foot,
    Yard,
    Mile,
    NauticalMile,
}

impl LengthUnit {
    /// Maps any accepted spelling to its canonical unit.
    ///
    /// `nm` is deliberately absent: it means nanometers.
    #[must_use]
    pub fn standardize(name: &str) -> Option<Self> {
        let unit = match name.trim() {
            "ft" | "ftUS" | "foot" | "feet" | "US survey foot" => Self::Foot,
            "yd" | "yard" | "yards" => Self::Yard,
            "mi" | "mile" | "miles" => Self::Mile,
            "nmi" | "nautical" | "nautical mile" | "nautical miles" => Self::NauticalMile,
            "m" | "meter" | "metre" | "meters" | "metres" => Self::Meter,
            "km" | "kilometer" | "kilometers" | "kilometre" | "kilometres" => Self::Kilometer,
            _ => return None,
        };
        Some(unit)
    }

    /// Length of one unit in meters.
    #[must_use]
    pub const fn meters(self) -> f64 {
        match self {
            Self::Meter => 1.0,
            Self::Kilometer => 1000.0,
            Self::Foot => 0.3048,
            Self::Yard => 0.9144,
            Self::Mile => 1609.34,
            Self::NauticalMile => 1852.0,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Meter => "m",
            Self::Kilometer => "km",
            Self::Foot => "ft",
            Self::Yard => "yd",
            Self::Mile => "mi",
            Self::NauticalMile => "nmi",
        }
    }

    /// Factor that converts a length in `self` into `target`.
    #[must_use]
    pub fn ratio_to(self, target: Self) -> f64 {
        self.meters() / target.meters()
    }
}

impl fmt::Display for LengthUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Projections that bypass unit conversion entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PassThrough {
    Pixels,
    Points,
    Axis,
}

impl PassThrough {
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim() {
            "px" | "pixel" | "pixels" => Some(Self::Pixels),
            "pt" | "point" | "points" => Some(Self::Points),
            "dx" | "custom" | "axis" => Some(Self::Axis),
            _ => None,
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Pixels => "px",
            Self::Points => "pt",
            Self::Axis => "axis",
        }
    }
}

/// Coordinate reference the bar is measured in.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Projection {
    PassThrough(PassThrough),
    /// Any CRS identifier understood by the axis (`EPSG:3857`, PROJ strings, ...).
    Crs(String),
}

impl Projection {
    pub fn parse(value: &str) -> ScaleBarResult<Self> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ScaleBarError::InvalidCrs(value.to_owned()));
        }
        if let Some(mode) = PassThrough::parse(trimmed) {
            return Ok(Self::PassThrough(mode));
        }
        Ok(Self::Crs(trimmed.to_owned()))
    }

    /// Bare EPSG codes are accepted the same way PROJ accepts them.
    #[must_use]
    pub fn epsg(code: u32) -> Self {
        Self::Crs(format!("EPSG:{code}"))
    }

    #[must_use]
    pub fn pass_through(&self) -> Option<PassThrough> {
        match self {
            Self::PassThrough(mode) => Some(*mode),
            Self::Crs(_) => None,
        }
    }
}

impl fmt::Display for Projection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PassThrough(mode) => f.write_str(mode.name()),
            Self::Crs(crs) => f.write_str(crs),
        }
    }
}

impl Serialize for Projection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Projection {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Code(u32),
            Name(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Code(code) => Ok(Self::epsg(code)),
            Raw::Name(name) => Self::parse(&name).map_err(serde::de::Error::custom),
        }
    }
}

/// Whether the bar measures the x (east-west) or y (north-south) axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BarOrientation {
    Horizontal,
    Vertical,
}

impl BarOrientation {
    /// Odd quarter turns make a vertical bar, even ones a horizontal bar.
    #[must_use]
    pub fn from_rotation(degrees: f64) -> Self {
        let quarters = (degrees / 90.0).round_ties_even() as i64;
        if quarters.rem_euclid(2) == 0 {
            Self::Horizontal
        } else {
            Self::Vertical
        }
    }

    /// CRS axis index: 0 for east-west, 1 for north-south.
    #[must_use]
    pub const fn axis_index(self) -> usize {
        match self {
            Self::Horizontal => 0,
            Self::Vertical => 1,
        }
    }
}
