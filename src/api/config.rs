use serde::{Deserialize, Serialize};

use crate::api::placement::Location;
use crate::style::{
    AnchorBoxOverrides, BarKind, BarOverrides, LabelsOverrides, TextOverrides, UnitsOverrides,
};

/// Matplotlib's default stacking level for anchored scale bars.
pub const DEFAULT_ZORDER: i32 = 99;

/// Serializable description of one scale bar.
///
/// Every style section is a sparse override applied on top of the registry
/// defaults when the bar is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScaleBarConfig {
    #[serde(default, rename = "style")]
    pub kind: BarKind,
    #[serde(default)]
    pub location: Location,
    #[serde(default)]
    pub bar: BarOverrides,
    #[serde(default)]
    pub units: UnitsOverrides,
    #[serde(default)]
    pub labels: LabelsOverrides,
    #[serde(default)]
    pub text: TextOverrides,
    #[serde(default)]
    pub aob: AnchorBoxOverrides,
    #[serde(default = "default_zorder")]
    pub zorder: i32,
}

impl Default for ScaleBarConfig {
    fn default() -> Self {
        Self {
            kind: BarKind::default(),
            location: Location::default(),
            bar: BarOverrides::default(),
            units: UnitsOverrides::default(),
            labels: LabelsOverrides::default(),
            text: TextOverrides::default(),
            aob: AnchorBoxOverrides::default(),
            zorder: DEFAULT_ZORDER,
        }
    }
}

impl ScaleBarConfig {
    #[must_use]
    pub fn with_kind(mut self, kind: BarKind) -> Self {
        self.kind = kind;
        self
    }

    #[must_use]
    pub fn with_location(mut self, location: Location) -> Self {
        self.location = location;
        self
    }

    #[must_use]
    pub fn with_bar(mut self, bar: BarOverrides) -> Self {
        self.bar = bar;
        self
    }

    #[must_use]
    pub fn with_units(mut self, units: UnitsOverrides) -> Self {
        self.units = units;
        self
    }

    #[must_use]
    pub fn with_labels(mut self, labels: LabelsOverrides) -> Self {
        self.labels = labels;
        self
    }

    #[must_use]
    pub fn with_text(mut self, text: TextOverrides) -> Self {
        self.text = text;
        self
    }

    #[must_use]
    pub fn with_aob(mut self, aob: AnchorBoxOverrides) -> Self {
        self.aob = aob;
        self
    }

    #[must_use]
    pub fn with_zorder(mut self, zorder: i32) -> Self {
        self.zorder = zorder;
        self
    }
}

/// Settings that differ between the two bars of a dual scale bar.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DualBarSettings {
    pub unit: Option<String>,
    pub max: Option<f64>,
    pub length: Option<f64>,
    pub major_div: Option<u32>,
    pub minor_div: Option<u32>,
}

impl DualBarSettings {
    #[must_use]
    pub fn with_unit(unit: impl Into<String>) -> Self {
        Self {
            unit: Some(unit.into()),
            ..Self::default()
        }
    }
}

/// Two bars in different units sharing one zero point.
///
/// The first bar carries its labels and ticks above, the second below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DualScaleBarConfig {
    #[serde(default, rename = "style")]
    pub kind: BarKind,
    #[serde(default)]
    pub location: Location,
    #[serde(default = "default_dual_bars")]
    pub bars: [DualBarSettings; 2],
    #[serde(default)]
    pub bar: BarOverrides,
    #[serde(default)]
    pub units: UnitsOverrides,
    #[serde(default)]
    pub labels: LabelsOverrides,
    #[serde(default)]
    pub text: TextOverrides,
    #[serde(default)]
    pub aob: AnchorBoxOverrides,
    #[serde(default = "default_zorder")]
    pub zorder: i32,
    /// Points between the two bars.
    #[serde(default)]
    pub sep: f64,
    /// Points around the pair.
    #[serde(default)]
    pub pad: f64,
}

impl Default for DualScaleBarConfig {
    fn default() -> Self {
        Self {
            kind: BarKind::default(),
            location: Location::default(),
            bars: default_dual_bars(),
            bar: BarOverrides::default(),
            units: UnitsOverrides::default(),
            labels: LabelsOverrides::default(),
            text: TextOverrides::default(),
            aob: AnchorBoxOverrides::default(),
            zorder: DEFAULT_ZORDER,
            sep: 0.0,
            pad: 0.0,
        }
    }
}

impl DualScaleBarConfig {
    #[must_use]
    pub fn with_units_pair(mut self, first: impl Into<String>, second: impl Into<String>) -> Self {
        self.bars[0].unit = Some(first.into());
        self.bars[1].unit = Some(second.into());
        self
    }

    #[must_use]
    pub fn with_kind(mut self, kind: BarKind) -> Self {
        self.kind = kind;
        self
    }

    #[must_use]
    pub fn with_spacing(mut self, sep: f64, pad: f64) -> Self {
        self.sep = sep;
        self.pad = pad;
        self
    }
}

fn default_zorder() -> i32 {
    DEFAULT_ZORDER
}

fn default_dual_bars() -> [DualBarSettings; 2] {
    [
        DualBarSettings::with_unit("mi"),
        DualBarSettings::with_unit("km"),
    ]
}
