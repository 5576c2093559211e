//! One draw: axis → units → length → segments → layout → raster.

use image::RgbaImage;
use serde::Serialize;
use tracing::{debug, trace};

use crate::api::placement::Placement;
use crate::api::scale_bar::ScaleBar;
use crate::core::{
    BarConfig, BarOrientation, LengthRequest, MapAxis, POINTS_PER_INCH, Projection, Segment,
    MAX_DRAWN_DIVISIONS, SegmentRequest, build_segments, drawn_divisions, optimize_bar_length,
    resolve_axis_units,
};
use crate::diagnostics::{Diagnostics, ScaleBarWarning};
use crate::error::{ScaleBarError, ScaleBarResult};
use crate::layout::{AssemblyInput, assemble_bar};
use crate::raster::{crop_to_content, rotate};
use crate::render::{RenderFrame, Renderer, Viewport};

/// Off-screen canvas side as a multiple of the larger axis dimension.
const CANVAS_FACTOR: f64 = 1.5;

/// Largest canvas side the pipeline will allocate.
pub const MAX_CANVAS_PX: u32 = 16_384;

/// Bar geometry derived from one axis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarComputation {
    pub config: BarConfig,
    pub segments: Vec<Segment>,
    #[serde(skip)]
    pub warnings: Vec<ScaleBarWarning>,
}

/// A cropped raster ready to be anchored on the host axis.
#[derive(Debug, Clone)]
pub struct RenderedScaleBar {
    pub image: RgbaImage,
    /// Resolution the raster was drawn at.
    pub dpi: f64,
    pub placement: Placement,
    pub warnings: Vec<ScaleBarWarning>,
}

/// Resolves units, length and segments for `scale_bar` on `axis`.
///
/// `Ok(None)` means nothing should be drawn; the reason is in the logged
/// warnings.
pub fn compute_bar<A: MapAxis + ?Sized>(
    axis: &A,
    scale_bar: &ScaleBar,
) -> ScaleBarResult<Option<BarComputation>> {
    let mut diagnostics = Diagnostics::new();
    let computed = compute_with(axis, scale_bar, &mut diagnostics)?;
    Ok(computed.map(|(config, segments)| BarComputation {
        config,
        segments,
        warnings: diagnostics.into_warnings(),
    }))
}

/// Computes, lays out and rasterizes `scale_bar` for `axis`.
///
/// `resolution` overrides both the bar's `raster_dpi` and the axis dpi.
pub fn render_bar<A, R>(
    axis: &A,
    scale_bar: &ScaleBar,
    renderer: &mut R,
    resolution: Option<f64>,
) -> ScaleBarResult<Option<RenderedScaleBar>>
where
    A: MapAxis + ?Sized,
    R: Renderer + ?Sized,
{
    let mut diagnostics = Diagnostics::new();
    let Some((config, segments)) = compute_with(axis, scale_bar, &mut diagnostics)? else {
        return Ok(None);
    };

    let bar = scale_bar.bar();
    let dpi = raster_dpi(axis, bar.raster_dpi, bar.raster_dpi_scale, resolution)?;
    let root = assemble_bar(&AssemblyInput {
        kind: scale_bar.kind(),
        config: &config,
        segments: &segments,
        bar,
        labels: scale_bar.labels(),
        units: scale_bar.units(),
        text: scale_bar.text(),
    });

    let scale = dpi / POINTS_PER_INCH;
    let extent = root.extent();
    let (width_in, height_in) = axis.size_inches();
    let base_side = (width_in.max(height_in).ceil() * CANVAS_FACTOR * dpi).ceil();
    let tree_side = (extent.width.max(extent.height) * scale * CANVAS_FACTOR).ceil();
    let side = base_side.max(tree_side).max(1.0);
    if side > f64::from(MAX_CANVAS_PX) {
        return Err(ScaleBarError::InvalidData(format!(
            "scale bar canvas of {side} px exceeds the {MAX_CANVAS_PX} px limit"
        )));
    }
    let side = side as u32;

    let side_pt = f64::from(side) / scale;
    let origin = (
        (side_pt - extent.width) / 2.0,
        (side_pt - extent.height) / 2.0,
    );
    let mut frame = RenderFrame::new(Viewport::new(side, side));
    root.emit(origin, scale, &mut frame);
    trace!(
        side,
        rects = frame.rects.len(),
        lines = frame.lines.len(),
        texts = frame.texts.len(),
        "scale bar frame built"
    );

    let canvas = renderer.render(&frame)?;
    let rotated = rotate(&canvas, bar.rotation);
    let image = match crop_to_content(&rotated) {
        Some(cropped) => cropped,
        None => {
            diagnostics.warn(ScaleBarWarning::EmptyRaster);
            rotated
        }
    };
    debug!(
        dpi,
        width = image.width(),
        height = image.height(),
        "scale bar rasterized"
    );

    Ok(Some(RenderedScaleBar {
        image,
        dpi,
        placement: Placement::new(
            scale_bar.location(),
            scale_bar.zorder(),
            scale_bar.anchor_box(),
            dpi,
        ),
        warnings: diagnostics.into_warnings(),
    }))
}

/// Picks the raster resolution: explicit argument, then the bar, then the axis.
pub(crate) fn raster_dpi<A: MapAxis + ?Sized>(
    axis: &A,
    bar_dpi: Option<f64>,
    dpi_scale: f64,
    resolution: Option<f64>,
) -> ScaleBarResult<f64> {
    let dpi = resolution.or(bar_dpi).unwrap_or_else(|| axis.dpi()) * dpi_scale;
    if !dpi.is_finite() || dpi <= 0.0 {
        return Err(ScaleBarError::config(
            "raster_dpi",
            format!("resolution must be positive, got {dpi}"),
        ));
    }
    Ok(dpi)
}

fn compute_with<A: MapAxis + ?Sized>(
    axis: &A,
    scale_bar: &ScaleBar,
    diagnostics: &mut Diagnostics,
) -> ScaleBarResult<Option<(BarConfig, Vec<Segment>)>> {
    let bar = scale_bar.bar();
    let projection = match (&bar.projection, axis.crs()) {
        (Some(projection), _) => projection.clone(),
        (None, Some(crs)) => Projection::parse(crs)?,
        (None, None) => {
            return Err(ScaleBarError::config(
                "bar.projection",
                "no projection is set and the axis has no CRS",
            ));
        }
    };
    let orientation = BarOrientation::from_rotation(bar.rotation);

    let Some(measure) =
        resolve_axis_units(axis, orientation, &projection, bar.unit.as_deref(), diagnostics)?
    else {
        return Ok(None);
    };
    if !(measure.axis_range.is_finite() && measure.axis_range > 0.0)
        || !(measure.axis_inches.is_finite() && measure.axis_inches > 0.0)
    {
        return Err(ScaleBarError::InvalidData(format!(
            "axis spans {} units over {} in",
            measure.axis_range, measure.axis_inches
        )));
    }

    let request = LengthRequest {
        max: bar.max,
        length: bar.length,
        major_mult: bar.major_mult,
        major_div: bar.major_div,
    };
    let Some(length) = optimize_bar_length(
        request,
        measure.axis_inches,
        measure.axis_range,
        measure.pass_through.map(|mode| mode.name()),
        diagnostics,
    ) else {
        return Ok(None);
    };

    let units = scale_bar.units();
    let units_label = units.label.clone().unwrap_or(measure.units_label);
    let config = BarConfig::new(length, bar.minor_div, units_label);
    if drawn_divisions(config.major_div, config.minor_div).is_none() {
        return Err(ScaleBarError::config(
            "bar.minor_div",
            format!(
                "{} major x {} minor divisions exceed {MAX_DRAWN_DIVISIONS}",
                config.major_div, config.minor_div
            ),
        ));
    }

    let labels = scale_bar.labels();
    let segments = build_segments(
        &SegmentRequest {
            bar_max: config.bar_max,
            major_width_in: config.major_width_in(),
            major_div: config.major_div,
            minor_div: config.minor_div,
            minor_type: bar.minor_type,
            label_style: labels.style,
            labels: labels.labels.as_deref(),
            format: labels.format,
            format_int: labels.format_int,
        },
        diagnostics,
    );
    debug!(
        bar_max = config.bar_max,
        segments = segments.len(),
        units = config.units_label.as_str(),
        "scale bar computed"
    );
    Ok(Some((config, segments)))
}
