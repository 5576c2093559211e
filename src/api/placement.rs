use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::core::POINTS_PER_INCH;
use crate::error::{ScaleBarError, ScaleBarResult};
use crate::render::Color;
use crate::style::{AnchorBoxStyle, Passthrough};

/// Where the anchored container sits inside the axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Location {
    #[default]
    UpperRight,
    UpperLeft,
    LowerLeft,
    LowerRight,
    CenterLeft,
    CenterRight,
    LowerCenter,
    UpperCenter,
    Center,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Edge {
    Start,
    Middle,
    End,
}

impl Location {
    pub const ALL: [Self; 9] = [
        Self::UpperRight,
        Self::UpperLeft,
        Self::LowerLeft,
        Self::LowerRight,
        Self::CenterLeft,
        Self::CenterRight,
        Self::LowerCenter,
        Self::UpperCenter,
        Self::Center,
    ];

    pub fn parse(name: &str) -> ScaleBarResult<Self> {
        Self::ALL
            .into_iter()
            .find(|location| location.name() == name.trim())
            .ok_or_else(|| {
                ScaleBarError::config("location", format!("`{name}` is not a valid location"))
            })
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::UpperRight => "upper right",
            Self::UpperLeft => "upper left",
            Self::LowerLeft => "lower left",
            Self::LowerRight => "lower right",
            Self::CenterLeft => "center left",
            Self::CenterRight => "center right",
            Self::LowerCenter => "lower center",
            Self::UpperCenter => "upper center",
            Self::Center => "center",
        }
    }

    /// Horizontal then vertical edge, in y-down order.
    const fn edges(self) -> (Edge, Edge) {
        match self {
            Self::UpperRight => (Edge::End, Edge::Start),
            Self::UpperLeft => (Edge::Start, Edge::Start),
            Self::LowerLeft => (Edge::Start, Edge::End),
            Self::LowerRight => (Edge::End, Edge::End),
            Self::CenterLeft => (Edge::Start, Edge::Middle),
            Self::CenterRight => (Edge::End, Edge::Middle),
            Self::LowerCenter => (Edge::Middle, Edge::End),
            Self::UpperCenter => (Edge::Middle, Edge::Start),
            Self::Center => (Edge::Middle, Edge::Middle),
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Location {
    type Err = ScaleBarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Location {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for Location {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Self::parse(&name).map_err(serde::de::Error::custom)
    }
}

/// Background patch drawn behind the raster by the host.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FramePatch {
    pub facecolor: Option<Color>,
    pub edgecolor: Option<Color>,
    pub alpha: Option<f64>,
}

/// How the host should anchor a rendered raster on its axis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Placement {
    pub location: Location,
    pub zorder: i32,
    pub pad_pt: f64,
    pub borderpad_pt: f64,
    /// `None` when no frame should be drawn.
    pub frame: Option<FramePatch>,
    /// Untouched anchor hooks such as `bbox_to_anchor`.
    pub extra: Passthrough,
    /// Scale that draws the raster at its physical size (`72 / raster dpi`).
    pub zoom: f64,
}

impl Placement {
    #[must_use]
    pub fn new(location: Location, zorder: i32, aob: &AnchorBoxStyle, raster_dpi: f64) -> Self {
        let has_patch = aob.facecolor.is_some() || aob.edgecolor.is_some() || aob.alpha.is_some();
        let frame = (aob.frameon || has_patch).then_some(FramePatch {
            facecolor: aob.facecolor,
            edgecolor: aob.edgecolor,
            alpha: aob.alpha,
        });
        Self {
            location,
            zorder,
            pad_pt: aob.pad_pt(),
            borderpad_pt: aob.borderpad_pt(),
            frame,
            extra: aob.extra.clone(),
            zoom: POINTS_PER_INCH / raster_dpi,
        }
    }

    /// Top-left pixel of the raster inside `axes_rect_px` (`x, y, width, height`, y down).
    ///
    /// `image_size_px` is the raster size and `dpi` the host output resolution.
    #[must_use]
    pub fn anchor_origin(
        &self,
        axes_rect_px: (f64, f64, f64, f64),
        image_size_px: (u32, u32),
        dpi: f64,
    ) -> (f64, f64) {
        let (ax, ay, aw, ah) = axes_rect_px;
        let px_per_pt = dpi / POINTS_PER_INCH;
        let pad = self.pad_pt * px_per_pt;
        let borderpad = self.borderpad_pt * px_per_pt;
        let shown = |pixels: u32| f64::from(pixels) * self.zoom * px_per_pt;
        let container_w = shown(image_size_px.0) + 2.0 * pad;
        let container_h = shown(image_size_px.1) + 2.0 * pad;

        let place = |edge: Edge, start: f64, span: f64, size: f64| match edge {
            Edge::Start => start + borderpad,
            Edge::Middle => start + (span - size) / 2.0,
            Edge::End => start + span - borderpad - size,
        };
        let (horizontal, vertical) = self.location.edges();
        (
            place(horizontal, ax, aw, container_w) + pad,
            place(vertical, ay, ah, container_h) + pad,
        )
    }
}
