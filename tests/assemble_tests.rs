use approx::assert_relative_eq;
use scalebar_rs::core::{
    BarConfig, BarLength, LabelStyle, Segment, SegmentRequest, build_segments,
};
use scalebar_rs::layout::{AssemblyInput, Extent, LayoutNode, assemble_bar};
use scalebar_rs::render::{Color, RenderFrame, TextHAlign, Viewport};
use scalebar_rs::style::{
    BarKind, BarStyle, LabelLoc, LabelsStyle, TickLoc, UnitsLoc, UnitsStyle,
};
use scalebar_rs::{Diagnostics, SizeTier, StyleRegistry};

const MAJOR_W: f64 = 36.0;
const LEAD: f64 = MAJOR_W / 2.0;
// md tier: 12 pt text with a 1 pt halo.
const TEXT_H: f64 = 14.0;
const BAR_H: f64 = 7.2;
const SEP: f64 = 5.0;

struct Fixture {
    kind: BarKind,
    config: BarConfig,
    bar: BarStyle,
    labels: LabelsStyle,
    units: UnitsStyle,
}

impl Fixture {
    fn new(kind: BarKind, major_div: u32, minor_div: u32) -> Self {
        let registry = StyleRegistry::new(SizeTier::Medium);
        let config = BarConfig::new(
            BarLength {
                bar_max: 100.0,
                bar_length_in: 0.5 * f64::from(major_div),
                major_div,
                minor_div,
            },
            None,
            "km",
        );
        Self {
            kind,
            config,
            bar: registry.bar(),
            labels: registry.labels(),
            units: registry.units(),
        }
    }

    fn segments(&self) -> Vec<Segment> {
        build_segments(
            &SegmentRequest {
                bar_max: self.config.bar_max,
                major_width_in: self.config.major_width_in(),
                major_div: self.config.major_div,
                minor_div: self.config.minor_div,
                minor_type: self.bar.minor_type,
                label_style: self.labels.style,
                labels: self.labels.labels.as_deref(),
                format: self.labels.format,
                format_int: self.labels.format_int,
            },
            &mut Diagnostics::new(),
        )
    }

    fn assemble(&self) -> LayoutNode {
        let segments = self.segments();
        let text = StyleRegistry::new(SizeTier::Medium).text();
        assemble_bar(&AssemblyInput {
            kind: self.kind,
            config: &self.config,
            segments: &segments,
            bar: &self.bar,
            labels: &self.labels,
            units: &self.units,
            text: &text,
        })
    }
}

fn emit(root: &LayoutNode) -> RenderFrame {
    let mut frame = RenderFrame::new(Viewport::new(400, 400));
    root.emit((0.0, 0.0), 1.0, &mut frame);
    frame
}

#[test]
fn boxes_bar_with_labels_above() {
    let root = Fixture::new(BarKind::Boxes, 4, 1).assemble();

    // Spacer, four boxes and the units text side by side.
    assert_eq!(
        root.extent(),
        Extent::new(LEAD + 4.0 * MAJOR_W + MAJOR_W, TEXT_H + SEP + TEXT_H)
    );

    let frame = emit(&root);
    assert_eq!(frame.rects.len(), 4);
    let fills: Vec<Color> = frame.rects.iter().map(|rect| rect.fill_color).collect();
    assert_eq!(fills, vec![Color::BLACK, Color::WHITE, Color::BLACK, Color::WHITE]);

    let first = frame.rects[0];
    assert_relative_eq!(first.x, LEAD);
    assert_relative_eq!(first.y, TEXT_H + SEP + (TEXT_H - BAR_H) / 2.0);
    assert_relative_eq!(first.width, MAJOR_W);

    let texts: Vec<&str> = frame.texts.iter().map(|text| text.text.as_str()).collect();
    assert_eq!(texts, vec!["0", "25", "50", "75", "100", "km"]);
    for (index, label) in frame.texts.iter().take(5).enumerate() {
        // Each label is centred on the box boundary it names.
        assert_relative_eq!(label.x, LEAD + MAJOR_W * index as f64);
        assert_relative_eq!(label.y, TEXT_H - 1.0);
        assert_eq!(label.h_align, TextHAlign::Center);
    }
    let units = &frame.texts[5];
    assert_eq!(units.h_align, TextHAlign::Left);
    assert_relative_eq!(units.x, LEAD + 4.0 * MAJOR_W + 6.0);
}

#[test]
fn labels_below_put_the_bar_row_first() {
    let mut fixture = Fixture::new(BarKind::Boxes, 4, 1);
    fixture.labels.loc = LabelLoc::Below;
    let frame = emit(&fixture.assemble());

    assert_relative_eq!(frame.rects[0].y, (TEXT_H - BAR_H) / 2.0);
    assert_relative_eq!(frame.texts[0].y, TEXT_H + SEP + TEXT_H - 1.0);
}

#[test]
fn reversed_bars_mirror_boxes_and_labels() {
    let mut fixture = Fixture::new(BarKind::Boxes, 4, 1);
    fixture.bar.reverse = true;
    let root = fixture.assemble();
    let frame = emit(&root);

    // Units text leads, the zero end sits on the right.
    let units = frame
        .texts
        .iter()
        .find(|text| text.text == "km")
        .expect("units label");
    assert_eq!(units.h_align, TextHAlign::Right);
    assert_relative_eq!(units.x, MAJOR_W - 6.0);

    assert_relative_eq!(frame.rects[0].x, MAJOR_W);
    let fills: Vec<Color> = frame.rects.iter().map(|rect| rect.fill_color).collect();
    assert_eq!(fills, vec![Color::WHITE, Color::BLACK, Color::WHITE, Color::BLACK]);

    let zero = frame
        .texts
        .iter()
        .find(|text| text.text == "0")
        .expect("zero label");
    assert_relative_eq!(zero.x, MAJOR_W + 4.0 * MAJOR_W);
    let total = frame
        .texts
        .iter()
        .find(|text| text.text == "100")
        .expect("total label");
    assert_relative_eq!(total.x, MAJOR_W);
}

#[test]
fn ticks_bar_draws_baseline_and_ticks() {
    let fixture = Fixture::new(BarKind::Ticks, 4, 1);
    let frame = emit(&fixture.assemble());

    assert!(frame.rects.is_empty());
    // Four baseline pieces and five ticks.
    assert_eq!(frame.lines.len(), 9);
    let ticks: Vec<_> = frame.lines.iter().filter(|line| line.x1 == line.x2).collect();
    assert_eq!(ticks.len(), 5);
    assert_relative_eq!(ticks[0].x1, LEAD);
    assert_relative_eq!(ticks[4].x1, LEAD + 4.0 * MAJOR_W);

    let baseline_y = frame.lines[0].y1;
    assert!(frame.lines.iter().take(4).all(|line| line.y1 == baseline_y && line.y2 == baseline_y));
}

#[test]
fn tick_location_moves_the_baseline() {
    let baseline_offset = |loc: TickLoc| {
        let mut fixture = Fixture::new(BarKind::Ticks, 2, 1);
        fixture.labels.loc = LabelLoc::Below;
        fixture.bar.tick_loc = loc;
        let frame = emit(&fixture.assemble());
        frame.lines[0].y1 - (TEXT_H - BAR_H) / 2.0
    };
    assert_relative_eq!(baseline_offset(TickLoc::Above), BAR_H);
    assert_relative_eq!(baseline_offset(TickLoc::Below), 0.0);
    assert_relative_eq!(baseline_offset(TickLoc::Middle), BAR_H / 2.0);
}

#[test]
fn units_can_join_the_last_label() {
    let mut fixture = Fixture::new(BarKind::Boxes, 2, 1);
    fixture.units.loc = UnitsLoc::Text;
    let frame = emit(&fixture.assemble());

    let texts: Vec<&str> = frame.texts.iter().map(|text| text.text.as_str()).collect();
    assert_eq!(texts, vec!["0", "50", "100 km"]);
}

#[test]
fn opposite_units_sit_on_the_far_side_of_the_labels() {
    let mut fixture = Fixture::new(BarKind::Boxes, 4, 1);
    fixture.units.loc = UnitsLoc::Opposite;
    let root = fixture.assemble();
    let extent = root.extent();

    // Main block: label row (5 slots) over the bar row, then the units row.
    let main_height = TEXT_H + SEP + BAR_H;
    assert_relative_eq!(extent.height, main_height + SEP + TEXT_H);
    assert_relative_eq!(extent.width, 5.0 * MAJOR_W);

    let frame = emit(&root);
    let units = frame.texts.last().expect("units label");
    assert_eq!(units.text, "km");
    assert_eq!(units.h_align, TextHAlign::Right);
    assert!(units.y > frame.rects[0].y);
}

#[test]
fn last_only_single_division_collapses_to_one_box() {
    let mut fixture = Fixture::new(BarKind::Boxes, 1, 1);
    fixture.labels.style = LabelStyle::LastOnly;
    let frame = emit(&fixture.assemble());

    assert_eq!(frame.rects.len(), 1);
    assert_relative_eq!(frame.rects[0].x, 0.0);
    assert_relative_eq!(frame.rects[0].width, MAJOR_W);
    let labels: Vec<&str> = frame.texts.iter().map(|text| text.text.as_str()).collect();
    assert_eq!(labels, vec!["100", "km"]);
}

#[test]
fn colors_cycle_across_boxes() {
    let mut fixture = Fixture::new(BarKind::Boxes, 4, 1);
    let red = Color::rgb(1.0, 0.0, 0.0);
    fixture.bar.facecolors = vec![red, Color::WHITE, Color::BLACK];
    let frame = emit(&fixture.assemble());
    let fills: Vec<Color> = frame.rects.iter().map(|rect| rect.fill_color).collect();
    assert_eq!(fills, vec![red, Color::WHITE, Color::BLACK, red]);
}
