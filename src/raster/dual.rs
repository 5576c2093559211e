//! Pixel alignment of two independently rasterized bars.
//!
//! Each bar is laid out on its own, so two bars with different division
//! counts can round their zero edge to different pixels. The correction
//! samples one line through each raster, finds where the bar starts and pads
//! the earlier one with transparent pixels. It is best-effort: when either
//! line has no opaque pixel the rasters are returned unchanged.

use image::{Rgba, RgbaImage, imageops};
use tracing::debug;

use crate::core::BarOrientation;

/// Distance of each sampling line from the centre of the packed pair.
pub const SAMPLE_OFFSET_PX: i64 = 15;

/// Pixels at or below this alpha are treated as background.
pub const ALPHA_THRESHOLD: u8 = 20;

/// Whether the zero end sits on the reversed side once `rotation` is applied.
///
/// Half and three-quarter turns carry the zero end to the right or the top, so
/// they flip the effective `reverse` of a horizontal or vertical bar.
#[must_use]
pub fn zero_end_reversed(rotation: f64, reverse: bool) -> bool {
    let quarters = (rotation / 90.0).round_ties_even() as i64;
    reverse ^ (quarters.rem_euclid(4) >= 2)
}

/// Index of the first opaque pixel along `line`, counted from the leading edge.
///
/// `line` is a row for horizontal bars and a column for vertical bars. The
/// leading edge is the bar's zero end: left (right when reversed) for
/// horizontal bars, bottom (top when reversed) for vertical bars.
#[must_use]
pub fn leading_edge(
    image: &RgbaImage,
    line: u32,
    orientation: BarOrientation,
    reverse: bool,
) -> Option<u32> {
    let (width, height) = image.dimensions();
    let opaque = |x: u32, y: u32| image.get_pixel(x, y)[3] > ALPHA_THRESHOLD;
    match orientation {
        BarOrientation::Horizontal => {
            if line >= height {
                return None;
            }
            (0..width).find(|&i| {
                let x = if reverse { width - 1 - i } else { i };
                opaque(x, line)
            })
        }
        BarOrientation::Vertical => {
            if line >= width {
                return None;
            }
            (0..height).find(|&i| {
                let y = if reverse { i } else { height - 1 - i };
                opaque(line, y)
            })
        }
    }
}

/// Aligns two bars that will be packed with no separation or padding.
#[must_use]
pub fn align_dual(
    a: &RgbaImage,
    b: &RgbaImage,
    orientation: BarOrientation,
    reverse: bool,
) -> (RgbaImage, RgbaImage) {
    align_dual_with_spacing(a, b, orientation, reverse, 0, 0)
}

/// Aligns two bars that will be packed by [`compose_dual`] with `sep` and `pad` pixels.
#[must_use]
pub fn align_dual_with_spacing(
    a: &RgbaImage,
    b: &RgbaImage,
    orientation: BarOrientation,
    reverse: bool,
    sep: u32,
    pad: u32,
) -> (RgbaImage, RgbaImage) {
    let across = |image: &RgbaImage| -> i64 {
        match orientation {
            BarOrientation::Horizontal => i64::from(image.height()),
            BarOrientation::Vertical => i64::from(image.width()),
        }
    };
    let (size_a, size_b) = (across(a), across(b));
    let (sep, pad) = (i64::from(sep), i64::from(pad));
    let total = pad + size_a + sep + size_b + pad;
    let mid = total / 2;

    let line_a = mid - SAMPLE_OFFSET_PX - pad;
    let line_b = mid + SAMPLE_OFFSET_PX - (pad + size_a + sep);
    let unchanged = || (a.clone(), b.clone());
    if !(0..size_a).contains(&line_a) || !(0..size_b).contains(&line_b) {
        debug!(line_a, line_b, "dual bar sampling lines fall outside the rasters");
        return unchanged();
    }

    let lead_a = leading_edge(a, line_a as u32, orientation, reverse);
    let lead_b = leading_edge(b, line_b as u32, orientation, reverse);
    let (Some(lead_a), Some(lead_b)) = (lead_a, lead_b) else {
        debug!("no unambiguous leading edge; dual bars left unaligned");
        return unchanged();
    };

    let diff = i64::from(lead_b) - i64::from(lead_a);
    debug!(lead_a, lead_b, diff, "dual bar alignment");
    match diff {
        0 => unchanged(),
        diff if diff < 0 => (a.clone(), pad_leading(b, diff.unsigned_abs() as u32, orientation, reverse)),
        diff => (pad_leading(a, diff as u32, orientation, reverse), b.clone()),
    }
}

/// Adds `amount` transparent columns or rows on the leading edge.
#[must_use]
pub fn pad_leading(
    image: &RgbaImage,
    amount: u32,
    orientation: BarOrientation,
    reverse: bool,
) -> RgbaImage {
    let (width, height) = image.dimensions();
    let (new_w, new_h, x, y) = match (orientation, reverse) {
        (BarOrientation::Horizontal, false) => (width + amount, height, amount, 0),
        (BarOrientation::Horizontal, true) => (width + amount, height, 0, 0),
        (BarOrientation::Vertical, false) => (width, height + amount, 0, 0),
        (BarOrientation::Vertical, true) => (width, height + amount, 0, amount),
    };
    let mut padded = RgbaImage::from_pixel(new_w, new_h, Rgba([0, 0, 0, 0]));
    imageops::replace(&mut padded, image, i64::from(x), i64::from(y));
    padded
}

/// Packs two aligned bars: stacked for horizontal bars, side by side for vertical ones.
///
/// Children share their leading edge, matching the geometry [`align_dual_with_spacing`]
/// samples.
#[must_use]
pub fn compose_dual(
    a: &RgbaImage,
    b: &RgbaImage,
    orientation: BarOrientation,
    reverse: bool,
    sep: u32,
    pad: u32,
) -> RgbaImage {
    let (wa, ha) = a.dimensions();
    let (wb, hb) = b.dimensions();
    match orientation {
        BarOrientation::Horizontal => {
            let inner_w = wa.max(wb);
            let mut canvas = RgbaImage::new(inner_w + 2 * pad, ha + sep + hb + 2 * pad);
            let x_of = |w: u32| if reverse { pad + inner_w - w } else { pad };
            imageops::replace(&mut canvas, a, i64::from(x_of(wa)), i64::from(pad));
            imageops::replace(&mut canvas, b, i64::from(x_of(wb)), i64::from(pad + ha + sep));
            canvas
        }
        BarOrientation::Vertical => {
            let inner_h = ha.max(hb);
            let mut canvas = RgbaImage::new(wa + sep + wb + 2 * pad, inner_h + 2 * pad);
            let y_of = |h: u32| if reverse { pad } else { pad + inner_h - h };
            imageops::replace(&mut canvas, a, i64::from(pad), i64::from(y_of(ha)));
            imageops::replace(&mut canvas, b, i64::from(pad + wa + sep), i64::from(y_of(hb)));
            canvas
        }
    }
}
