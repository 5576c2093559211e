use image::{RgbaImage, imageops};

const QUARTER_TURN_EPSILON: f64 = 1e-9;

/// Normalizes to `[0, 360)`.
fn normalize(degrees: f64) -> f64 {
    degrees.rem_euclid(360.0)
}

fn quarter_turns(degrees: f64) -> Option<u8> {
    let normalized = normalize(degrees);
    let quarters = (normalized / 90.0).round();
    if (normalized - quarters * 90.0).abs() < QUARTER_TURN_EPSILON {
        Some((quarters as u8) % 4)
    } else {
        None
    }
}

/// Size of the canvas needed to hold `(width, height)` rotated by `degrees`.
#[must_use]
pub fn rotated_size(width: u32, height: u32, degrees: f64) -> (u32, u32) {
    match quarter_turns(degrees) {
        Some(0 | 2) => (width, height),
        Some(_) => (height, width),
        None => {
            let (sin, cos) = degrees.to_radians().sin_cos();
            let (w, h) = (f64::from(width), f64::from(height));
            let rotated_w = (w * cos.abs() + h * sin.abs()).ceil();
            let rotated_h = (w * sin.abs() + h * cos.abs()).ceil();
            (rotated_w as u32, rotated_h as u32)
        }
    }
}

/// Where `point` lands after rotating a `size` image counter-clockwise with expansion.
#[must_use]
pub fn rotated_point(point: (f64, f64), size: (u32, u32), degrees: f64) -> (f64, f64) {
    let (new_w, new_h) = rotated_size(size.0, size.1, degrees);
    let (sin, cos) = degrees.to_radians().sin_cos();
    let dx = point.0 - f64::from(size.0) / 2.0;
    let dy = point.1 - f64::from(size.1) / 2.0;
    (
        f64::from(new_w) / 2.0 + dx * cos + dy * sin,
        f64::from(new_h) / 2.0 - dx * sin + dy * cos,
    )
}

/// Rotates counter-clockwise, growing the canvas so nothing is clipped.
///
/// Quarter turns are exact pixel permutations; other angles use
/// nearest-neighbour sampling.
#[must_use]
pub fn rotate(image: &RgbaImage, degrees: f64) -> RgbaImage {
    match quarter_turns(degrees) {
        Some(0) => image.clone(),
        Some(1) => imageops::rotate270(image),
        Some(2) => imageops::rotate180(image),
        Some(_) => imageops::rotate90(image),
        None => rotate_nearest(image, degrees),
    }
}

fn rotate_nearest(image: &RgbaImage, degrees: f64) -> RgbaImage {
    let (width, height) = image.dimensions();
    let (new_w, new_h) = rotated_size(width, height, degrees);
    let (sin, cos) = degrees.to_radians().sin_cos();
    let (src_cx, src_cy) = (f64::from(width) / 2.0, f64::from(height) / 2.0);
    let (dst_cx, dst_cy) = (f64::from(new_w) / 2.0, f64::from(new_h) / 2.0);

    RgbaImage::from_fn(new_w, new_h, |x, y| {
        let dx = f64::from(x) + 0.5 - dst_cx;
        let dy = f64::from(y) + 0.5 - dst_cy;
        let sx = src_cx + dx * cos - dy * sin;
        let sy = src_cy + dx * sin + dy * cos;
        if sx < 0.0 || sy < 0.0 {
            return image::Rgba([0, 0, 0, 0]);
        }
        let (sx, sy) = (sx.floor() as u32, sy.floor() as u32);
        if sx >= width || sy >= height {
            return image::Rgba([0, 0, 0, 0]);
        }
        *image.get_pixel(sx, sy)
    })
}

/// Bounding box `(x, y, width, height)` of all pixels with non-zero alpha.
#[must_use]
pub fn content_bounds(image: &RgbaImage) -> Option<(u32, u32, u32, u32)> {
    let mut bounds: Option<(u32, u32, u32, u32)> = None;
    for (x, y, pixel) in image.enumerate_pixels() {
        if pixel[3] == 0 {
            continue;
        }
        bounds = Some(match bounds {
            None => (x, y, x, y),
            Some((min_x, min_y, max_x, max_y)) => {
                (min_x.min(x), min_y.min(y), max_x.max(x), max_y.max(y))
            }
        });
    }
    bounds.map(|(min_x, min_y, max_x, max_y)| (min_x, min_y, max_x - min_x + 1, max_y - min_y + 1))
}

/// Crops to the non-transparent content, or `None` when every pixel is transparent.
#[must_use]
pub fn crop_to_content(image: &RgbaImage) -> Option<RgbaImage> {
    let (x, y, width, height) = content_bounds(image)?;
    Some(imageops::crop_imm(image, x, y, width, height).to_image())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn marked(width: u32, height: u32, at: (u32, u32)) -> RgbaImage {
        let mut image = RgbaImage::new(width, height);
        image.put_pixel(at.0, at.1, Rgba([255, 0, 0, 255]));
        image
    }

    #[test]
    fn quarter_turn_moves_right_edge_to_top() {
        let image = marked(4, 2, (3, 1));
        let rotated = rotate(&image, 90.0);
        assert_eq!(rotated.dimensions(), (2, 4));
        assert_eq!(rotated.get_pixel(1, 0)[3], 255);
    }

    #[test]
    fn negative_quarter_turn_is_clockwise() {
        let image = marked(4, 2, (3, 0));
        let rotated = rotate(&image, -90.0);
        assert_eq!(rotated.dimensions(), (2, 4));
        assert_eq!(rotated.get_pixel(1, 3)[3], 255);
    }

    #[test]
    fn arbitrary_angle_expands_canvas() {
        let image = RgbaImage::from_pixel(10, 10, Rgba([0, 0, 0, 255]));
        let rotated = rotate(&image, 45.0);
        assert_eq!(rotated.dimensions(), (15, 15));
        let (cx, cy) = (7, 7);
        assert_eq!(rotated.get_pixel(cx, cy)[3], 255);
        assert_eq!(rotated.get_pixel(0, 0)[3], 0);
    }

    #[test]
    fn rotated_point_matches_quarter_turn() {
        let (x, y) = rotated_point((4.0, 1.0), (4, 2), 90.0);
        assert!((x - 1.0).abs() < 1e-9);
        assert!((y - 0.0).abs() < 1e-9);
    }

    #[test]
    fn crop_keeps_only_content() {
        let mut image = RgbaImage::new(10, 10);
        image.put_pixel(2, 3, Rgba([0, 0, 0, 255]));
        image.put_pixel(5, 7, Rgba([0, 0, 0, 10]));
        let cropped = crop_to_content(&image).unwrap();
        assert_eq!(cropped.dimensions(), (4, 5));
        assert!(crop_to_content(&RgbaImage::new(3, 3)).is_none());
    }
}
