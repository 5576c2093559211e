use tracing::debug;

use crate::api::config::DualScaleBarConfig;
use crate::api::pipeline::{RenderedScaleBar, render_bar};
use crate::api::placement::{Location, Placement};
use crate::api::scale_bar::ScaleBar;
use crate::core::{BarOrientation, MapAxis, POINTS_PER_INCH};
use crate::diagnostics::{Diagnostics, ScaleBarWarning};
use crate::error::{ScaleBarError, ScaleBarResult};
use crate::raster::{align_dual_with_spacing, compose_dual, zero_end_reversed};
use crate::render::Renderer;
use crate::style::{AnchorBoxStyle, BarKind, LabelLoc, StyleRegistry, TickLoc, UnitsLoc};

const OUTER_LABELS: [LabelLoc; 2] = [LabelLoc::Above, LabelLoc::Below];
const OUTER_TICKS: [TickLoc; 2] = [TickLoc::Above, TickLoc::Below];

/// Two bars in different units drawn back to back.
#[derive(Debug, Clone, PartialEq)]
pub struct DualScaleBar {
    bars: [ScaleBar; 2],
    location: Location,
    zorder: i32,
    aob: AnchorBoxStyle,
    sep: f64,
    pad: f64,
    style_warnings: Vec<ScaleBarWarning>,
}

impl DualScaleBar {
    pub fn new(config: &DualScaleBarConfig, registry: StyleRegistry) -> ScaleBarResult<Self> {
        let mut diagnostics = Diagnostics::new();
        for (field, value) in [("sep", config.sep), ("pad", config.pad)] {
            if !value.is_finite() || value < 0.0 {
                return Err(ScaleBarError::config(
                    field,
                    format!("must be a non-negative number, got {value}"),
                ));
            }
        }

        let mut shared = config.bar.clone();
        if shared.rotation.is_some_and(|rotation| rotation != 0.0) {
            diagnostics.warn(ScaleBarWarning::DualRotation);
        }
        let per_bar_fields = [
            ("unit", shared.unit.take().is_some()),
            ("max", shared.max.take().is_some()),
            ("length", shared.length.take().is_some()),
            ("major_div", shared.major_div.take().is_some()),
            ("minor_div", shared.minor_div.take().is_some()),
        ];
        for (field, was_set) in per_bar_fields {
            if was_set {
                diagnostics.warn(ScaleBarWarning::DualFieldIgnored { field });
            }
        }

        let bar = registry.bar().merge(&shared, config.kind, &mut diagnostics)?;
        let units = registry.units().merge(&config.units, &mut diagnostics)?;
        if units.loc == UnitsLoc::Opposite {
            return Err(ScaleBarError::config(
                "units.loc",
                "`opposite` cannot be used with dual bars; use `bar` or `text`",
            ));
        }
        let labels = registry.labels().merge(&config.labels, &mut diagnostics)?;
        let text = registry.text().merge(&config.text, &mut diagnostics)?;
        let aob = registry.anchor_box().merge(&config.aob, &mut diagnostics)?;

        let build = |index: usize| -> ScaleBarResult<ScaleBar> {
            let settings = &config.bars[index];
            let mut bar = bar.clone();
            bar.unit = settings.unit.clone();
            bar.max = settings.max;
            bar.length = settings.length;
            bar.major_div = settings.major_div;
            bar.minor_div = settings.minor_div;
            if config.kind == BarKind::Ticks {
                bar.tick_loc = OUTER_TICKS[index];
            }
            bar.validate()?;
            let mut labels = labels.clone();
            labels.loc = OUTER_LABELS[index];
            Ok(ScaleBar::from_parts(
                config.kind,
                config.location,
                bar,
                units.clone(),
                labels,
                text.clone(),
                aob.clone(),
            ))
        };
        let bars = [build(0)?, build(1)?];
        debug!(
            first = ?config.bars[0].unit,
            second = ?config.bars[1].unit,
            "dual scale bar configured"
        );

        Ok(Self {
            bars,
            location: config.location,
            zorder: config.zorder,
            aob,
            sep: config.sep,
            pad: config.pad,
            style_warnings: diagnostics.into_warnings(),
        })
    }

    /// First bar (labels outside on top), then second (labels outside below).
    #[must_use]
    pub fn bars(&self) -> &[ScaleBar; 2] {
        &self.bars
    }

    #[must_use]
    pub fn location(&self) -> Location {
        self.location
    }

    #[must_use]
    pub fn zorder(&self) -> i32 {
        self.zorder
    }

    #[must_use]
    pub fn anchor_box(&self) -> &AnchorBoxStyle {
        &self.aob
    }

    #[must_use]
    pub fn sep(&self) -> f64 {
        self.sep
    }

    #[must_use]
    pub fn pad(&self) -> f64 {
        self.pad
    }

    #[must_use]
    pub fn style_warnings(&self) -> &[ScaleBarWarning] {
        &self.style_warnings
    }
}

/// Renders both bars, aligns their zero points and packs them into one raster.
///
/// Returns `Ok(None)` when either bar resolves to nothing.
pub fn render_dual<A, R>(
    axis: &A,
    dual: &DualScaleBar,
    renderer: &mut R,
    resolution: Option<f64>,
) -> ScaleBarResult<Option<RenderedScaleBar>>
where
    A: MapAxis + ?Sized,
    R: Renderer + ?Sized,
{
    let [first_bar, second_bar] = dual.bars();
    let Some(first) = render_bar(axis, first_bar, renderer, resolution)? else {
        return Ok(None);
    };
    let Some(second) = render_bar(axis, second_bar, renderer, resolution)? else {
        return Ok(None);
    };

    let dpi = first.dpi;
    let to_px = |points: f64| (points * dpi / POINTS_PER_INCH).round() as u32;
    let (sep, pad) = (to_px(dual.sep), to_px(dual.pad));
    let style = first_bar.bar();
    let orientation = BarOrientation::from_rotation(style.rotation);
    let reverse = zero_end_reversed(style.rotation, style.reverse);
    let (a, b) = align_dual_with_spacing(&first.image, &second.image, orientation, reverse, sep, pad);
    let image = compose_dual(&a, &b, orientation, reverse, sep, pad);
    debug!(
        width = image.width(),
        height = image.height(),
        "dual scale bar composed"
    );

    let mut warnings = first.warnings;
    warnings.extend(second.warnings);
    Ok(Some(RenderedScaleBar {
        image,
        dpi,
        placement: Placement::new(dual.location, dual.zorder, &dual.aob, dpi),
        warnings,
    }))
}
