use scalebar_rs::core::{
    LabelStyle, MinorType, NumberFormat, SegmentKind, SegmentRequest, build_segments,
};
use scalebar_rs::Diagnostics;
use proptest::prelude::*;

fn minor_type() -> impl Strategy<Value = MinorType> {
    prop_oneof![Just(MinorType::None), Just(MinorType::First), Just(MinorType::All)]
}

fn label_style() -> impl Strategy<Value = LabelStyle> {
    prop_oneof![
        Just(LabelStyle::Major),
        Just(LabelStyle::FirstLast),
        Just(LabelStyle::LastOnly),
        Just(LabelStyle::MinorAll),
        Just(LabelStyle::MinorFirst),
    ]
}

fn request<'a>(
    bar_max: f64,
    major_div: u32,
    minor_div: u32,
    minor_type: MinorType,
    label_style: LabelStyle,
) -> SegmentRequest<'a> {
    SegmentRequest {
        bar_max,
        major_width_in: 0.5,
        major_div,
        minor_div,
        minor_type,
        label_style,
        labels: None,
        format: Some(NumberFormat::fixed(2)),
        format_int: true,
    }
}

proptest! {
    #[test]
    fn segments_run_from_zero_to_the_maximum(
        bar_max in 0.1f64..1e6,
        major_div in 1u32..8,
        minor_div in 1u32..6,
        minor_type in minor_type(),
        label_style in label_style()
    ) {
        let req = request(bar_max, major_div, minor_div, minor_type, label_style);
        let segments = build_segments(&req, &mut Diagnostics::new());
        prop_assert!(!segments.is_empty());

        let last = segments.last().expect("non-empty");
        prop_assert_eq!(last.kind, SegmentKind::Major);
        prop_assert!((last.value - bar_max).abs() <= 1e-9 * bar_max);
        if req.collapses_to_total() {
            prop_assert_eq!(segments.len(), 1);
            return Ok(());
        }

        prop_assert_eq!(segments[0].kind, SegmentKind::Major);
        prop_assert_eq!(segments[0].value, 0.0);
        let values: Vec<f64> = segments
            .iter()
            .filter(|segment| !segment.is_spacer())
            .map(|segment| segment.value)
            .collect();
        prop_assert!(values.windows(2).all(|pair| pair[0] < pair[1]));
        prop_assert!(segments.iter().all(|segment| segment.width_pt >= 0.0));
    }

    #[test]
    fn drawn_divisions_conserve_the_bar_width(
        major_div in 1u32..8,
        minor_div in 1u32..6,
        minor_type in minor_type()
    ) {
        let req = request(100.0, major_div, minor_div, minor_type, LabelStyle::Major);
        let segments = build_segments(&req, &mut Diagnostics::new());

        // The final slot only carries the closing label.
        let drawn: f64 = segments[..segments.len() - 1]
            .iter()
            .filter(|segment| !segment.is_spacer())
            .map(|segment| segment.width_pt)
            .sum();
        let expected = 0.5 * 72.0 * f64::from(major_div);
        prop_assert!((drawn - expected).abs() <= 1e-9 * expected);
        if minor_type == MinorType::All || !req.has_minor_segments() {
            let slots = if req.has_minor_segments() { major_div * minor_div } else { major_div };
            prop_assert_eq!(segments.len(), slots as usize + 1);
        }
    }

    #[test]
    fn label_styles_pick_the_expected_number_of_labels(
        major_div in 2u32..8,
        minor_div in 1u32..6,
        minor_type in minor_type(),
        label_style in label_style()
    ) {
        let req = request(100.0, major_div, minor_div, minor_type, label_style);
        let segments = build_segments(&req, &mut Diagnostics::new());
        let labeled = segments.iter().filter(|segment| segment.label.is_some()).count();
        let majors = segments
            .iter()
            .filter(|segment| segment.kind == SegmentKind::Major)
            .count();

        match label_style {
            LabelStyle::Major => prop_assert_eq!(labeled, majors),
            LabelStyle::FirstLast => prop_assert_eq!(labeled, 2),
            LabelStyle::LastOnly => prop_assert_eq!(labeled, 1),
            LabelStyle::MinorAll => prop_assert_eq!(
                labeled,
                segments.iter().filter(|segment| !segment.is_spacer()).count()
            ),
            LabelStyle::MinorFirst => {
                let extra = usize::from(req.has_minor_segments());
                prop_assert_eq!(labeled, majors + extra);
            }
        }
        prop_assert!(segments.iter().filter(|segment| segment.is_spacer()).all(|s| s.label.is_none()));
    }
}
