use approx::assert_relative_eq;
use scalebar_rs::core::{
    BarOrientation, MapAxis, PassThrough, Projection, StaticAxis, resolve_axis_units,
};
use scalebar_rs::{Diagnostics, ScaleBarError, ScaleBarWarning};

fn web_mercator_axis() -> StaticAxis {
    StaticAxis::new((0.0, 1_000_000.0), (0.0, 600_000.0), 8.0, 6.0, 100.0)
        .expect("valid axis")
        .with_crs("EPSG:3857")
}

#[test]
fn metre_ranges_upgrade_to_kilometres() {
    let axis = web_mercator_axis();
    let mut diagnostics = Diagnostics::new();
    let measure = resolve_axis_units(
        &axis,
        BarOrientation::Horizontal,
        &Projection::epsg(3857),
        None,
        &mut diagnostics,
    )
    .expect("resolves")
    .expect("supported unit");

    assert!(diagnostics.is_empty());
    assert_eq!(measure.units_label, "km");
    assert_relative_eq!(measure.axis_range, 1000.0);
    assert_relative_eq!(measure.axis_inches, 8.0);
    assert_eq!(measure.pass_through, None);
}

#[test]
fn vertical_bars_measure_the_y_axis() {
    let axis = web_mercator_axis();
    let mut diagnostics = Diagnostics::new();
    let measure = resolve_axis_units(
        &axis,
        BarOrientation::Vertical,
        &Projection::epsg(3857),
        Some("m"),
        &mut diagnostics,
    )
    .expect("resolves")
    .expect("supported unit");

    assert_eq!(measure.units_label, "m");
    assert_relative_eq!(measure.axis_range, 600_000.0);
    assert_relative_eq!(measure.axis_inches, 6.0);
}

#[test]
fn requested_units_are_converted() {
    let axis = web_mercator_axis();
    let mut diagnostics = Diagnostics::new();
    let measure = resolve_axis_units(
        &axis,
        BarOrientation::Horizontal,
        &Projection::epsg(3857),
        Some("miles"),
        &mut diagnostics,
    )
    .expect("resolves")
    .expect("supported unit");

    assert_eq!(measure.units_label, "mi");
    assert_relative_eq!(measure.axis_range, 1_000_000.0 / 1609.34, max_relative = 1e-12);
}

#[test]
fn unknown_requested_unit_falls_back_with_a_warning() {
    let axis = web_mercator_axis();
    let mut diagnostics = Diagnostics::new();
    let measure = resolve_axis_units(
        &axis,
        BarOrientation::Horizontal,
        &Projection::epsg(3857),
        Some("nm"),
        &mut diagnostics,
    )
    .expect("resolves")
    .expect("supported unit");

    assert_eq!(measure.units_label, "km");
    assert_eq!(
        diagnostics.warnings(),
        [ScaleBarWarning::UnsupportedRequestedUnit {
            unit: "nm".to_owned()
        }]
    );
}

#[test]
fn degree_systems_use_great_circle_distance() {
    let axis = StaticAxis::new((0.0, 10.0), (-5.0, 5.0), 6.0, 6.0, 100.0).expect("valid axis");
    let mut diagnostics = Diagnostics::new();
    let measure = resolve_axis_units(
        &axis,
        BarOrientation::Horizontal,
        &Projection::epsg(4326),
        None,
        &mut diagnostics,
    )
    .expect("resolves")
    .expect("supported unit");

    assert_eq!(measure.units_label, "km");
    // Ten degrees of longitude along the equator.
    assert_relative_eq!(measure.axis_range, 1111.95, max_relative = 1e-3);
    assert!(matches!(
        diagnostics.warnings(),
        [ScaleBarWarning::DegreeCrs { .. }]
    ));
}

#[test]
fn feet_systems_upgrade_to_miles() {
    let axis = StaticAxis::new((0.0, 52_800.0), (0.0, 10.0), 5.0, 5.0, 72.0).expect("valid axis");
    let mut diagnostics = Diagnostics::new();
    let measure = resolve_axis_units(
        &axis,
        BarOrientation::Horizontal,
        &Projection::Crs("+proj=tmerc +units=ft".to_owned()),
        None,
        &mut diagnostics,
    )
    .expect("resolves")
    .expect("supported unit");

    assert_eq!(measure.units_label, "mi");
    assert_relative_eq!(measure.axis_range, 10.0);
}

#[test]
fn pass_through_projections_skip_conversion() {
    let axis = web_mercator_axis();
    let mut diagnostics = Diagnostics::new();

    let pixels = resolve_axis_units(
        &axis,
        BarOrientation::Horizontal,
        &Projection::PassThrough(PassThrough::Pixels),
        Some("km"),
        &mut diagnostics,
    )
    .expect("resolves")
    .expect("pass-through always resolves");
    assert_relative_eq!(pixels.axis_range, 800.0);
    assert_eq!(pixels.units_label, "");
    assert_eq!(pixels.pass_through, Some(PassThrough::Pixels));
    assert!(matches!(
        diagnostics.warnings(),
        [ScaleBarWarning::UnitIgnoredForPassThrough { .. }]
    ));

    let points = resolve_axis_units(
        &axis,
        BarOrientation::Vertical,
        &Projection::PassThrough(PassThrough::Points),
        None,
        &mut diagnostics,
    )
    .expect("resolves")
    .expect("pass-through always resolves");
    assert_relative_eq!(points.axis_range, 6.0 * 72.0);

    let data = resolve_axis_units(
        &axis,
        BarOrientation::Horizontal,
        &Projection::parse("dx").expect("dx parses"),
        None,
        &mut diagnostics,
    )
    .expect("resolves")
    .expect("pass-through always resolves");
    assert_relative_eq!(data.axis_range, 1_000_000.0);
}

#[test]
fn unsupported_crs_units_draw_nothing() {
    let axis = web_mercator_axis();
    let mut diagnostics = Diagnostics::new();
    let measure = resolve_axis_units(
        &axis,
        BarOrientation::Horizontal,
        &Projection::Crs("+proj=tmerc +units=ch".to_owned()),
        None,
        &mut diagnostics,
    )
    .expect("lookup succeeds");

    assert!(measure.is_none());
    assert!(matches!(
        diagnostics.warnings(),
        [ScaleBarWarning::UnsupportedCrsUnit { .. }]
    ));
}

#[test]
fn unknown_crs_identifiers_are_errors() {
    let axis = web_mercator_axis();
    let mut diagnostics = Diagnostics::new();
    let err = resolve_axis_units(
        &axis,
        BarOrientation::Horizontal,
        &Projection::Crs("EPSG:999999".to_owned()),
        None,
        &mut diagnostics,
    )
    .expect_err("unknown code must fail");
    assert!(matches!(err, ScaleBarError::InvalidCrs(_)));
}

#[test]
fn hosts_can_supply_their_own_crs_lookup() {
    struct SurveyAxis;

    impl MapAxis for SurveyAxis {
        fn x_limits(&self) -> (f64, f64) {
            (0.0, 3000.0)
        }

        fn y_limits(&self) -> (f64, f64) {
            (0.0, 3000.0)
        }

        fn size_inches(&self) -> (f64, f64) {
            (4.0, 4.0)
        }

        fn dpi(&self) -> f64 {
            96.0
        }

        fn axis_unit_name(&self, _crs: &str, _axis_index: usize) -> scalebar_rs::ScaleBarResult<String> {
            Ok("yard".to_owned())
        }
    }

    let mut diagnostics = Diagnostics::new();
    let measure = resolve_axis_units(
        &SurveyAxis,
        BarOrientation::Horizontal,
        &Projection::Crs("LOCAL:survey".to_owned()),
        None,
        &mut diagnostics,
    )
    .expect("resolves")
    .expect("yards are supported");
    assert_eq!(measure.units_label, "yd");
    assert_relative_eq!(measure.axis_range, 3000.0);
}

fn resolved_label(x_max: f64, crs: &str) -> (String, f64) {
    let axis = StaticAxis::new((0.0, x_max), (0.0, 1_000.0), 8.0, 6.0, 100.0)
        .expect("valid axis")
        .with_crs(crs);
    let measure = resolve_axis_units(
        &axis,
        BarOrientation::Horizontal,
        &Projection::Crs(crs.to_owned()),
        None,
        &mut Diagnostics::new(),
    )
    .expect("resolves")
    .expect("supported unit");
    (measure.units_label, measure.axis_range)
}

#[test]
fn kilometre_upgrade_starts_strictly_above_five_kilometres() {
    let (label, range) = resolved_label(5_000.0, "EPSG:3857");
    assert_eq!(label, "m");
    assert_relative_eq!(range, 5_000.0);

    let (label, range) = resolved_label(5_000.001, "EPSG:3857");
    assert_eq!(label, "km");
    assert_relative_eq!(range, 5.000_001, max_relative = 1e-12);
}

#[test]
fn mile_upgrade_starts_strictly_above_five_miles() {
    let (label, range) = resolved_label(26_400.0, "EPSG:2260");
    assert_eq!(label, "ft");
    assert_relative_eq!(range, 26_400.0);

    let (label, range) = resolved_label(26_400.5, "EPSG:2260");
    assert_eq!(label, "mi");
    assert_relative_eq!(range, 26_400.5 / 5_280.0, max_relative = 1e-12);
}
