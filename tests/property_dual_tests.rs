use image::{Rgba, RgbaImage};
use scalebar_rs::core::BarOrientation;
use scalebar_rs::raster::{align_dual, compose_dual, leading_edge};
use proptest::prelude::*;

fn bar(width: u32, height: u32, start: u32, end: u32, orientation: BarOrientation) -> RgbaImage {
    let (w, h) = match orientation {
        BarOrientation::Horizontal => (width, height),
        BarOrientation::Vertical => (height, width),
    };
    RgbaImage::from_fn(w, h, |x, y| {
        let along = match orientation {
            BarOrientation::Horizontal => x,
            BarOrientation::Vertical => y,
        };
        if (start..end).contains(&along) {
            Rgba([0, 0, 0, 255])
        } else {
            Rgba([0, 0, 0, 0])
        }
    })
}

fn orientation() -> impl Strategy<Value = BarOrientation> {
    prop_oneof![Just(BarOrientation::Horizontal), Just(BarOrientation::Vertical)]
}

proptest! {
    #[test]
    fn aligned_bars_share_their_leading_edge(
        length in 60u32..200,
        inset_a in 0u32..40,
        inset_b in 0u32..40,
        orientation in orientation(),
        reverse in any::<bool>()
    ) {
        // Insets are measured from the zero end of each bar.
        let span = |inset: u32| {
            let zero_at_far_end = match orientation {
                BarOrientation::Horizontal => reverse,
                BarOrientation::Vertical => !reverse,
            };
            if zero_at_far_end { (0, length - inset) } else { (inset, length) }
        };
        let (a0, a1) = span(inset_a);
        let (b0, b1) = span(inset_b);
        let a = bar(length, 30, a0, a1, orientation);
        let b = bar(length, 30, b0, b1, orientation);

        let (a, b) = align_dual(&a, &b, orientation, reverse);
        let edge_a = leading_edge(&a, 15, orientation, reverse);
        let edge_b = leading_edge(&b, 15, orientation, reverse);
        prop_assert!(edge_a.is_some());
        prop_assert_eq!(edge_a, edge_b);

        let packed = compose_dual(&a, &b, orientation, reverse, 0, 0);
        let along = match orientation {
            BarOrientation::Horizontal => packed.width(),
            BarOrientation::Vertical => packed.height(),
        };
        prop_assert_eq!(along, length + inset_a.abs_diff(inset_b));
    }
}
