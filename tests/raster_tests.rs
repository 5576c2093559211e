use image::{Rgba, RgbaImage};
use scalebar_rs::core::BarOrientation;
use scalebar_rs::raster::{
    align_dual, align_dual_with_spacing, compose_dual, content_bounds, crop_to_content,
    leading_edge, pad_leading, rotate, rotated_size, zero_end_reversed,
};

const INK: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Horizontal strip with opaque columns `start..end`.
fn strip(width: u32, height: u32, start: u32, end: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, _| {
        if (start..end).contains(&x) {
            INK
        } else {
            Rgba([0, 0, 0, 0])
        }
    })
}

/// Vertical strip with opaque rows `start..end`.
fn column(width: u32, height: u32, start: u32, end: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |_, y| {
        if (start..end).contains(&y) {
            INK
        } else {
            Rgba([0, 0, 0, 0])
        }
    })
}

fn first_opaque_in_row(image: &RgbaImage, y: u32) -> Option<u32> {
    (0..image.width()).find(|&x| image.get_pixel(x, y)[3] > 20)
}

fn last_opaque_in_row(image: &RgbaImage, y: u32) -> Option<u32> {
    (0..image.width()).rev().find(|&x| image.get_pixel(x, y)[3] > 20)
}

fn last_opaque_in_column(image: &RgbaImage, x: u32) -> Option<u32> {
    (0..image.height()).rev().find(|&y| image.get_pixel(x, y)[3] > 20)
}

#[test]
fn leading_edge_counts_from_the_zero_end() {
    let image = strip(100, 10, 10, 90);
    assert_eq!(leading_edge(&image, 5, BarOrientation::Horizontal, false), Some(10));
    assert_eq!(leading_edge(&image, 5, BarOrientation::Horizontal, true), Some(10));
    assert_eq!(leading_edge(&image, 50, BarOrientation::Horizontal, false), None);

    let image = column(10, 100, 0, 95);
    assert_eq!(leading_edge(&image, 5, BarOrientation::Vertical, false), Some(5));
    assert_eq!(leading_edge(&image, 5, BarOrientation::Vertical, true), Some(0));
}

#[test]
fn faint_pixels_do_not_count_as_the_bar() {
    let mut image = strip(50, 4, 20, 50);
    image.put_pixel(5, 2, Rgba([0, 0, 0, 20]));
    assert_eq!(leading_edge(&image, 2, BarOrientation::Horizontal, false), Some(20));
}

#[test]
fn horizontal_pairs_share_their_zero_column() {
    let a = strip(100, 40, 10, 100);
    let b = strip(100, 40, 13, 100);
    let (a, b) = align_dual(&a, &b, BarOrientation::Horizontal, false);
    assert_eq!(a.width(), 103);
    assert_eq!(b.width(), 100);

    let packed = compose_dual(&a, &b, BarOrientation::Horizontal, false, 0, 0);
    assert_eq!(packed.dimensions(), (103, 80));
    assert_eq!(first_opaque_in_row(&packed, 25), Some(13));
    assert_eq!(first_opaque_in_row(&packed, 55), Some(13));
}

#[test]
fn reversed_pairs_align_on_the_right() {
    let a = strip(100, 40, 0, 90);
    let b = strip(100, 40, 0, 87);
    let (a, b) = align_dual(&a, &b, BarOrientation::Horizontal, true);
    assert_eq!(a.width(), 103);

    let packed = compose_dual(&a, &b, BarOrientation::Horizontal, true, 0, 0);
    assert_eq!(last_opaque_in_row(&packed, 25), last_opaque_in_row(&packed, 55));
}

#[test]
fn the_later_bar_is_padded_when_it_starts_first() {
    let a = strip(100, 40, 13, 100);
    let b = strip(100, 40, 10, 100);
    let (a, b) = align_dual(&a, &b, BarOrientation::Horizontal, false);
    assert_eq!((a.width(), b.width()), (100, 103));
}

#[test]
fn vertical_pairs_share_their_bottom_row() {
    let a = column(40, 100, 0, 90);
    let b = column(40, 100, 0, 87);
    let (a, b) = align_dual(&a, &b, BarOrientation::Vertical, false);
    assert_eq!(a.height(), 103);

    let packed = compose_dual(&a, &b, BarOrientation::Vertical, false, 0, 0);
    assert_eq!(packed.dimensions(), (80, 103));
    assert_eq!(
        last_opaque_in_column(&packed, 25),
        last_opaque_in_column(&packed, 55)
    );
}

#[test]
fn spacing_moves_the_sampling_lines() {
    // With 10 px of separation the sampled rows are 30 in the first bar and 10 in the second.
    let mut a = RgbaImage::new(100, 40);
    let mut b = RgbaImage::new(100, 40);
    for x in 4..100 {
        a.put_pixel(x, 30, INK);
    }
    for x in 6..100 {
        b.put_pixel(x, 10, INK);
    }
    let (a, b) = align_dual_with_spacing(&a, &b, BarOrientation::Horizontal, false, 10, 0);
    assert_eq!((a.width(), b.width()), (102, 100));

    let packed = compose_dual(&a, &b, BarOrientation::Horizontal, false, 10, 3);
    assert_eq!(packed.dimensions(), (108, 96));
}

#[test]
fn unreadable_pairs_are_left_unchanged() {
    let a = RgbaImage::new(60, 40);
    let b = strip(60, 40, 5, 60);
    let (a2, b2) = align_dual(&a, &b, BarOrientation::Horizontal, false);
    assert_eq!(a2, a);
    assert_eq!(b2, b);
}

#[test]
fn pad_leading_keeps_content_on_the_trailing_side() {
    let image = strip(10, 2, 0, 10);
    let padded = pad_leading(&image, 4, BarOrientation::Horizontal, false);
    assert_eq!(padded.dimensions(), (14, 2));
    assert_eq!(padded.get_pixel(3, 0)[3], 0);
    assert_eq!(padded.get_pixel(4, 0)[3], 255);

    let padded = pad_leading(&image, 4, BarOrientation::Vertical, true);
    assert_eq!(padded.dimensions(), (10, 6));
    assert_eq!(padded.get_pixel(0, 3)[3], 0);
    assert_eq!(padded.get_pixel(0, 4)[3], 255);
}

#[test]
fn quarter_turn_rotates_counter_clockwise() {
    let mut image = RgbaImage::new(4, 2);
    image.put_pixel(0, 0, INK);
    let rotated = rotate(&image, 90.0);
    assert_eq!(rotated.dimensions(), (2, 4));
    assert_eq!(rotated.get_pixel(0, 3)[3], 255);
    assert_eq!(rotated_size(4, 2, 90.0), (2, 4));
}

#[test]
fn crop_keeps_only_visible_pixels() {
    let mut image = RgbaImage::new(20, 20);
    image.put_pixel(5, 7, INK);
    image.put_pixel(9, 8, INK);
    assert_eq!(content_bounds(&image), Some((5, 7, 5, 2)));
    let cropped = crop_to_content(&image).expect("content");
    assert_eq!(cropped.dimensions(), (5, 2));

    assert!(crop_to_content(&RgbaImage::new(3, 3)).is_none());
}

#[test]
fn half_and_three_quarter_turns_flip_the_zero_end() {
    assert!(!zero_end_reversed(0.0, false));
    assert!(!zero_end_reversed(90.0, false));
    assert!(zero_end_reversed(180.0, false));
    assert!(zero_end_reversed(-90.0, false));
    assert!(zero_end_reversed(270.0, false));
    assert!(!zero_end_reversed(-180.0, true));
    assert!(zero_end_reversed(360.0, true));
}
