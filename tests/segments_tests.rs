use approx::assert_relative_eq;
use scalebar_rs::core::{
    CustomLabel, LabelStyle, MAX_DRAWN_DIVISIONS, MinorType, NumberFormat, Segment, SegmentKind,
    SegmentRequest, build_segments, drawn_divisions,
};
use scalebar_rs::{Diagnostics, ScaleBarWarning};

fn request<'a>(major_div: u32, minor_div: u32) -> SegmentRequest<'a> {
    SegmentRequest {
        bar_max: 100.0,
        major_width_in: 0.5,
        major_div,
        minor_div,
        minor_type: MinorType::First,
        label_style: LabelStyle::Major,
        labels: None,
        format: Some(NumberFormat::fixed(2)),
        format_int: true,
    }
}

fn build(request: &SegmentRequest<'_>) -> Vec<Segment> {
    build_segments(request, &mut Diagnostics::new())
}

fn labels(segments: &[Segment]) -> Vec<Option<&str>> {
    segments.iter().map(|segment| segment.label.as_deref()).collect()
}

#[test]
fn major_only_bars_get_one_slot_per_boundary() {
    let segments = build(&request(4, 1));

    assert_eq!(segments.len(), 5);
    assert!(segments.iter().all(|segment| segment.kind == SegmentKind::Major));
    for segment in &segments {
        assert_relative_eq!(segment.width_pt, 36.0);
        assert_relative_eq!(segment.length_pt, 36.0);
    }
    assert_eq!(
        labels(&segments),
        vec![Some("0"), Some("25"), Some("50"), Some("75"), Some("100")]
    );
}

#[test]
fn first_minor_type_subdivides_the_first_major_division() {
    let segments = build(&request(4, 2));
    let kinds: Vec<SegmentKind> = segments.iter().map(|segment| segment.kind).collect();

    assert_eq!(
        kinds,
        vec![
            SegmentKind::Major,
            SegmentKind::Minor,
            SegmentKind::Major,
            SegmentKind::Spacer,
            SegmentKind::Major,
            SegmentKind::Major,
            SegmentKind::Major,
        ]
    );
    assert_relative_eq!(segments[0].width_pt, 18.0);
    assert_relative_eq!(segments[2].width_pt, 36.0);
    assert_relative_eq!(segments[2].length_pt, 18.0);
    assert_relative_eq!(segments[3].width_pt, 9.0);
    assert_eq!(
        labels(&segments),
        vec![
            Some("0"),
            None,
            Some("25"),
            None,
            Some("50"),
            Some("75"),
            Some("100"),
        ]
    );
}

#[test]
fn all_minor_type_subdivides_every_major_division() {
    let mut req = request(2, 2);
    req.minor_type = MinorType::All;
    req.label_style = LabelStyle::MinorAll;
    let segments = build(&req);

    assert_eq!(segments.len(), 5);
    let values: Vec<f64> = segments.iter().map(|segment| segment.value).collect();
    assert_eq!(values, vec![0.0, 25.0, 50.0, 75.0, 100.0]);
    assert_eq!(segments[1].kind, SegmentKind::Minor);
    assert_eq!(segments[2].kind, SegmentKind::Major);
    assert!(segments.iter().all(|segment| segment.label.is_some()));
}

#[test]
fn first_minor_type_with_one_major_behaves_like_all() {
    let segments = build(&request(1, 4));
    assert_eq!(segments.len(), 5);
    assert!(segments.iter().all(|segment| !segment.is_spacer()));
    assert_eq!(segments.first().map(|segment| segment.kind), Some(SegmentKind::Major));
    assert_eq!(segments.last().map(|segment| segment.kind), Some(SegmentKind::Major));
}

#[test]
fn minor_first_labels_the_first_minor_boundary_only() {
    let mut req = request(2, 4);
    req.minor_type = MinorType::All;
    req.label_style = LabelStyle::MinorFirst;
    let segments = build(&req);

    let labeled: Vec<&str> = segments
        .iter()
        .filter_map(|segment| segment.label.as_deref())
        .collect();
    assert_eq!(labeled, vec!["0", "12.50", "50", "100"]);
}

#[test]
fn first_last_and_last_only_styles() {
    let mut req = request(4, 1);
    req.label_style = LabelStyle::FirstLast;
    assert_eq!(
        labels(&build(&req)),
        vec![Some("0"), None, None, None, Some("100")]
    );

    req.label_style = LabelStyle::LastOnly;
    assert_eq!(labels(&build(&req)), vec![None, None, None, None, Some("100")]);
}

#[test]
fn last_only_with_a_single_division_collapses_to_the_total() {
    let mut req = request(1, 1);
    req.label_style = LabelStyle::LastOnly;
    assert!(req.collapses_to_total());

    let segments = build(&req);
    assert_eq!(segments.len(), 1);
    assert_relative_eq!(segments[0].value, 100.0);
    assert_eq!(segments[0].label.as_deref(), Some("100"));
}

#[test]
fn custom_labels_fill_labeled_slots_in_order() {
    let custom = [
        CustomLabel::Text("start".to_owned()),
        CustomLabel::Hidden,
        CustomLabel::Auto,
        CustomLabel::Value(0.5),
        CustomLabel::Text("end".to_owned()),
    ];
    let mut req = request(4, 1);
    req.labels = Some(&custom);
    let mut diagnostics = Diagnostics::new();
    let segments = build_segments(&req, &mut diagnostics);

    assert!(diagnostics.is_empty());
    assert_eq!(
        labels(&segments),
        vec![Some("start"), None, Some("50"), Some("0.50"), Some("end")]
    );
}

#[test]
fn label_count_mismatches_warn() {
    let too_few = [CustomLabel::Text("a".to_owned())];
    let mut req = request(2, 1);
    req.labels = Some(&too_few);
    let mut diagnostics = Diagnostics::new();
    let segments = build_segments(&req, &mut diagnostics);
    assert_eq!(labels(&segments), vec![Some("a"), None, None]);
    assert_eq!(
        diagnostics.warnings(),
        [ScaleBarWarning::TooFewLabels {
            provided: 1,
            needed: 3
        }]
    );

    let too_many: Vec<CustomLabel> = (0..5).map(|i| CustomLabel::Value(f64::from(i))).collect();
    req.labels = Some(&too_many);
    let mut diagnostics = Diagnostics::new();
    let segments = build_segments(&req, &mut diagnostics);
    assert_eq!(labels(&segments), vec![Some("0"), Some("1"), Some("2")]);
    assert_eq!(
        diagnostics.warnings(),
        [ScaleBarWarning::TooManyLabels {
            provided: 5,
            needed: 3
        }]
    );
}

#[test]
fn raw_values_are_shown_without_a_format() {
    let mut req = request(2, 1);
    req.format = None;
    assert_eq!(
        labels(&build(&req)),
        vec![Some("0.0"), Some("50.0"), Some("100.0")]
    );
}

#[test]
fn custom_labels_deserialize_from_mixed_json() {
    let parsed: Vec<CustomLabel> =
        serde_json::from_str(r#"[true, false, null, 2.5, "far"]"#).expect("valid labels");
    assert_eq!(
        parsed,
        vec![
            CustomLabel::Auto,
            CustomLabel::Hidden,
            CustomLabel::Hidden,
            CustomLabel::Value(2.5),
            CustomLabel::Text("far".to_owned()),
        ]
    );
}

#[test]
fn division_counts_past_the_cap_are_clamped() {
    assert_eq!(drawn_divisions(5, 4), Some(20));
    assert_eq!(drawn_divisions(70_000, 70_000), None);
    assert_eq!(drawn_divisions(u32::MAX, 2), None);

    let oversized = SegmentRequest {
        minor_type: MinorType::All,
        ..request(70_000, 70_000)
    };
    let segments = build(&oversized);
    assert_eq!(segments.len(), MAX_DRAWN_DIVISIONS as usize + 1);
    assert_relative_eq!(
        segments.last().expect("last boundary").value,
        100.0,
        max_relative = 1e-12
    );
}
