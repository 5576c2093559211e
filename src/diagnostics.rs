use std::fmt;

use tracing::warn;

/// Non-fatal condition met while resolving, laying out or rendering a bar.
///
/// Warnings never abort a draw: the pipeline continues with a substitute
/// value and the warning is both logged and handed back to the caller.
#[derive(Debug, Clone, PartialEq)]
pub enum ScaleBarWarning {
    UnitIgnoredForPassThrough { projection: String },
    DegreeCrs { crs: String },
    UnsupportedCrsUnit { unit: String },
    UnsupportedRequestedUnit { unit: String },
    LengthIgnoredForMax,
    MajorMultIgnored,
    MajorDivIgnoredForLength,
    LengthExceedsAxis { length: f64, axis_inches: f64 },
    LengthWithPassThrough { projection: String },
    MajorMultWithoutMajorDiv,
    MajorDivWithoutMultiplier,
    LengthUnresolved,
    BarTooLong { bar_max: f64, axis_range: f64 },
    TooManyLabels { provided: usize, needed: usize },
    TooFewLabels { provided: usize, needed: usize },
    UnknownStyleKey { section: &'static str, key: String },
    StyleKeyIgnored { section: &'static str, key: String, reason: &'static str },
    UnknownFontSize { name: String },
    DualRotation,
    DualFieldIgnored { field: &'static str },
    EmptyRaster,
}

impl fmt::Display for ScaleBarWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnitIgnoredForPassThrough { projection } => write!(
                f,
                "projection `{projection}` does not carry units; bar unit is ignored, set a units label instead"
            ),
            Self::DegreeCrs { crs } => write!(
                f,
                "CRS `{crs}` uses degrees; distances are approximated along a great circle, prefer a projected CRS"
            ),
            Self::UnsupportedCrsUnit { unit } => write!(
                f,
                "CRS unit `{unit}` is not supported; use a projection in feet, yards, miles, nautical miles or metres"
            ),
            Self::UnsupportedRequestedUnit { unit } => write!(
                f,
                "requested unit `{unit}` is not supported; falling back to the projection unit"
            ),
            Self::LengthIgnoredForMax => {
                write!(f, "both bar max and bar length are set; length is ignored")
            }
            Self::MajorMultIgnored => write!(
                f,
                "bar max or length is set together with major_mult; major_mult is ignored"
            ),
            Self::MajorDivIgnoredForLength => write!(
                f,
                "both bar length and major_div are set; an optimal major_div is computed instead"
            ),
            Self::LengthExceedsAxis {
                length,
                axis_inches,
            } => write!(
                f,
                "bar length ({length}) exceeds the axis length ({axis_inches} in); using 25% of the axis"
            ),
            Self::LengthWithPassThrough { projection } => write!(
                f,
                "a bar length cannot be combined with projection `{projection}`; use max or major_mult instead"
            ),
            Self::MajorMultWithoutMajorDiv => write!(
                f,
                "major_mult requires major_div; using 25% of the axis"
            ),
            Self::MajorDivWithoutMultiplier => write!(
                f,
                "major_div without max or major_mult is ignored; using 25% of the axis"
            ),
            Self::LengthUnresolved => write!(
                f,
                "bar length could not be resolved from max, length, major_mult and major_div"
            ),
            Self::BarTooLong {
                bar_max,
                axis_range,
            } => write!(
                f,
                "bar ({bar_max}) is too long for the axis ({axis_range}); consider a smaller max or a smaller unit"
            ),
            Self::TooManyLabels { provided, needed } => write!(
                f,
                "{provided} labels provided but only {needed} are used; the rest are dropped"
            ),
            Self::TooFewLabels { provided, needed } => write!(
                f,
                "{provided} labels provided but {needed} are needed; the remaining labels are hidden"
            ),
            Self::UnknownStyleKey { section, key } => {
                write!(f, "unknown `{section}` key `{key}` is dropped")
            }
            Self::StyleKeyIgnored {
                section,
                key,
                reason,
            } => write!(f, "`{section}` key `{key}` is ignored: {reason}"),
            Self::UnknownFontSize { name } => {
                write!(f, "font size `{name}` is not recognized; using the default size")
            }
            Self::DualRotation => write!(
                f,
                "rotation is not fully supported for dual bars; rotate the returned raster instead"
            ),
            Self::DualFieldIgnored { field } => write!(
                f,
                "bar `{field}` is ignored for dual bars; it is set per bar"
            ),
            Self::EmptyRaster => {
                write!(f, "rendered scale bar has no visible pixels; returning the uncropped canvas")
            }
        }
    }
}

/// Collects warnings for one draw call and mirrors them to `tracing`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Diagnostics {
    warnings: Vec<ScaleBarWarning>,
}

impl Diagnostics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn warn(&mut self, warning: ScaleBarWarning) {
        warn!(warning = %warning, "scale bar");
        self.warnings.push(warning);
    }

    #[must_use]
    pub fn warnings(&self) -> &[ScaleBarWarning] {
        &self.warnings
    }

    #[must_use]
    pub fn into_warnings(self) -> Vec<ScaleBarWarning> {
        self.warnings
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty()
    }

    pub fn extend(&mut self, other: Diagnostics) {
        self.warnings.extend(other.warnings);
    }
}
