//! Typed scale-bar styles and their per-size-tier defaults.
//!
//! Every section (`bar`, `labels`, `units`, `text`, `aob`) has a resolved
//! style with all fields present and an `*Overrides` companion that mirrors
//! the serialized form. Overrides merge onto a copy which is validated before
//! it replaces anything.

mod anchor_box;
mod bar;
mod font;
mod labels;
mod text;
mod units;
mod validation;

use std::fmt;
use std::str::FromStr;
use std::sync::RwLock;

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::debug;

use crate::core::{LabelStyle, MinorType, NumberFormat};
use crate::error::{ScaleBarError, ScaleBarResult};
use crate::render::{Color, FontFamily, FontStyle, FontWeight};

pub use anchor_box::{AnchorBoxOverrides, AnchorBoxStyle, Passthrough};
pub use bar::{BarKind, BarOverrides, BarStyle, TickLoc};
pub use font::{BASE_FONT_SIZE_PT, FontSize};
pub use labels::{LabelLoc, LabelsOverrides, LabelsStyle};
pub use text::{FontOverrides, RotationMode, TextOverrides, TextStyle};
pub use units::{UnitsLoc, UnitsOverrides, UnitsStyle};
pub use validation::UnknownKeys;

/// Overall size preset that scales every default dimension together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SizeTier {
    XSmall,
    Small,
    #[default]
    Medium,
    Large,
    XLarge,
}

impl SizeTier {
    pub const ALL: [Self; 5] = [
        Self::XSmall,
        Self::Small,
        Self::Medium,
        Self::Large,
        Self::XLarge,
    ];

    pub fn parse(name: &str) -> ScaleBarResult<Self> {
        let tier = match name.trim().to_ascii_lowercase().as_str() {
            "xs" | "xsmall" | "x-small" => Self::XSmall,
            "sm" | "small" => Self::Small,
            "md" | "medium" => Self::Medium,
            "lg" | "large" => Self::Large,
            "xl" | "xlarge" | "x-large" => Self::XLarge,
            _ => {
                return Err(ScaleBarError::config(
                    "size",
                    format!("`{name}` is not one of xs, sm, md, lg, xl"),
                ));
            }
        };
        Ok(tier)
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::XSmall => "xs",
            Self::Small => "sm",
            Self::Medium => "md",
            Self::Large => "lg",
            Self::XLarge => "xl",
        }
    }

    const fn index(self) -> usize {
        match self {
            Self::XSmall => 0,
            Self::Small => 1,
            Self::Medium => 2,
            Self::Large => 3,
            Self::XLarge => 4,
        }
    }
}

impl fmt::Display for SizeTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SizeTier {
    type Err = ScaleBarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for SizeTier {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for SizeTier {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Self::parse(&name).map_err(serde::de::Error::custom)
    }
}

// Per-tier tables, ordered xs, sm, md, lg, xl.
const BAR_HEIGHT_IN: [f64; 5] = [0.05, 0.075, 0.1, 0.2, 0.4];
const BAR_EDGEWIDTH_PT: [f64; 5] = [0.5, 0.75, 1.0, 2.0, 4.0];
const BAR_TICKWIDTH_PT: [f64; 5] = [0.5, 0.75, 1.5, 3.0, 5.0];
const LABEL_SEP_PT: [f64; 5] = [1.5, 3.0, 5.0, 8.0, 12.0];
const TEXT_FONTSIZE_PT: [f64; 5] = [4.0, 6.0, 12.0, 24.0, 48.0];
const TEXT_STROKE_PT: [f64; 5] = [0.5, 0.5, 1.0, 2.0, 4.0];
const AOB_PAD: [f64; 5] = [0.1, 0.33, 0.5, 1.0, 2.0];

/// Source of default styles for one size tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StyleRegistry {
    tier: SizeTier,
}

static DEFAULT_TIER: RwLock<SizeTier> = RwLock::new(SizeTier::Medium);

impl StyleRegistry {
    #[must_use]
    pub const fn new(tier: SizeTier) -> Self {
        Self { tier }
    }

    /// Registry for the process-wide default tier.
    #[must_use]
    pub fn global() -> Self {
        let tier = match DEFAULT_TIER.read() {
            Ok(tier) => *tier,
            Err(poisoned) => *poisoned.into_inner(),
        };
        Self { tier }
    }

    /// Changes the tier returned by [`StyleRegistry::global`].
    ///
    /// Bars built before the call keep their styles.
    pub fn set_default_size(tier: SizeTier) {
        let mut guard = match DEFAULT_TIER.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *guard = tier;
        debug!(tier = tier.name(), "default scale bar size changed");
    }

    #[must_use]
    pub const fn tier(self) -> SizeTier {
        self.tier
    }

    #[must_use]
    pub fn bar(self) -> BarStyle {
        let i = self.tier.index();
        BarStyle {
            projection: None,
            unit: None,
            rotation: 0.0,
            max: None,
            length: None,
            major_mult: None,
            height: BAR_HEIGHT_IN[i],
            reverse: false,
            major_div: None,
            minor_div: None,
            minor_frac: 0.66,
            minor_type: MinorType::First,
            facecolors: vec![Color::BLACK, Color::WHITE],
            edgecolors: vec![Color::BLACK],
            edgewidth: BAR_EDGEWIDTH_PT[i],
            tick_loc: TickLoc::Above,
            basecolors: vec![Color::BLACK],
            tickcolors: vec![Color::BLACK],
            tickwidth: BAR_TICKWIDTH_PT[i],
            raster_dpi: None,
            raster_dpi_scale: 1.0,
        }
    }

    #[must_use]
    pub fn labels(self) -> LabelsStyle {
        let i = self.tier.index();
        LabelsStyle {
            labels: None,
            format: Some(NumberFormat::fixed(2)),
            format_int: true,
            style: match self.tier {
                SizeTier::XSmall | SizeTier::Small => LabelStyle::FirstLast,
                _ => LabelStyle::Major,
            },
            loc: LabelLoc::Above,
            sep: LABEL_SEP_PT[i],
            pad: 0.0,
            font: FontOverrides::default(),
        }
    }

    #[must_use]
    pub fn units(self) -> UnitsStyle {
        UnitsStyle {
            label: None,
            loc: UnitsLoc::Bar,
            sep: LABEL_SEP_PT[self.tier.index()],
            pad: 0.0,
            font: FontOverrides::default(),
        }
    }

    #[must_use]
    pub fn text(self) -> TextStyle {
        let i = self.tier.index();
        TextStyle {
            fontsize: TEXT_FONTSIZE_PT[i],
            textcolors: vec![Color::BLACK],
            fontfamily: FontFamily::SansSerif,
            fontstyle: FontStyle::Normal,
            fontweight: FontWeight::REGULAR,
            stroke_width: TEXT_STROKE_PT[i],
            stroke_color: Color::WHITE,
            rotation: None,
            rotation_mode: RotationMode::Anchor,
        }
    }

    #[must_use]
    pub fn anchor_box(self) -> AnchorBoxStyle {
        let pad = AOB_PAD[self.tier.index()];
        AnchorBoxStyle {
            facecolor: None,
            edgecolor: None,
            alpha: None,
            pad,
            borderpad: pad,
            prop_pt: BASE_FONT_SIZE_PT,
            frameon: false,
            extra: IndexMap::new(),
        }
    }
}
