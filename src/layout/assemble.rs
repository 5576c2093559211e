use tracing::debug;

use crate::core::{BarConfig, LabelStyle, MinorType, POINTS_PER_INCH, Segment, SegmentKind};
use crate::layout::node::{
    BoxCell, BoxesNode, Extent, LayoutNode, Pack, PackAlign, TextAppearance, TextNode, TicksNode,
};
use crate::render::{Color, LineCap, LinePrimitive, TextHAlign, TextVAlign};
use crate::style::{
    BarKind, BarStyle, LabelLoc, LabelsStyle, TextStyle, TickLoc, UnitsLoc, UnitsStyle,
};

/// Everything the assembler reads for one bar.
#[derive(Debug, Clone, Copy)]
pub struct AssemblyInput<'a> {
    pub kind: BarKind,
    pub config: &'a BarConfig,
    pub segments: &'a [Segment],
    pub bar: &'a BarStyle,
    pub labels: &'a LabelsStyle,
    pub units: &'a UnitsStyle,
    pub text: &'a TextStyle,
}

impl AssemblyInput<'_> {
    fn collapsed(&self) -> bool {
        self.labels.style == LabelStyle::LastOnly
            && self.config.major_div == 1
            && self.config.minor_div <= 1
    }

    fn has_minor_segments(&self) -> bool {
        self.config.minor_div > 1 && self.bar.minor_type != MinorType::None
    }

    fn major_width(&self) -> f64 {
        self.config.major_width_in() * POINTS_PER_INCH
    }

    fn major_height(&self) -> f64 {
        self.bar.height * POINTS_PER_INCH
    }

    fn units_label(&self) -> &str {
        self.units
            .label
            .as_deref()
            .unwrap_or(&self.config.units_label)
    }
}

/// Builds the complete drawable tree: bar row, label row and units text.
#[must_use]
pub fn assemble_bar(input: &AssemblyInput<'_>) -> LayoutNode {
    let reverse = input.bar.reverse;
    let units_look = appearance(&input.text.with_overrides(&input.units.font), 0);

    let bar_pack = bar_row(input, &units_look);
    let label_pack = label_row(input);

    let mut rows = vec![bar_pack, label_pack];
    if input.labels.loc == LabelLoc::Above {
        rows.reverse();
    }
    let align = if reverse { PackAlign::End } else { PackAlign::Start };
    let mut root = LayoutNode::VPack(
        Pack::new(rows)
            .with_spacing(input.labels.sep, input.labels.pad)
            .with_align(align),
    );

    if input.units.loc == UnitsLoc::Opposite {
        let major_w = input.major_width();
        let (anchor_x, h_align, align) = if reverse {
            (major_w / 2.0, TextHAlign::Left, PackAlign::Start)
        } else {
            (major_w, TextHAlign::Right, PackAlign::End)
        };
        let units = units_text(
            major_w * 1.5,
            anchor_x,
            h_align,
            input.units_label(),
            units_look,
        );
        let mut column = vec![units, root];
        if input.labels.loc == LabelLoc::Above {
            column.reverse();
        }
        root = LayoutNode::VPack(
            Pack::new(column)
                .with_spacing(input.units.sep, input.units.pad)
                .with_align(align),
        );
    }

    let extent = root.extent();
    debug!(
        width_pt = extent.width,
        height_pt = extent.height,
        kind = ?input.kind,
        "assembled scale bar"
    );
    root
}

fn bar_row(input: &AssemblyInput<'_>, units_look: &TextAppearance) -> LayoutNode {
    let major_w = input.major_width();
    let major_h = input.major_height();

    let mut children = Vec::with_capacity(3);
    if !input.collapsed() {
        let lead = if input.has_minor_segments() {
            major_w / f64::from(input.config.minor_div) / 2.0
        } else {
            major_w / 2.0
        };
        children.push(LayoutNode::Spacer(Extent::new(lead, major_h)));
    }

    children.push(match input.kind {
        BarKind::Boxes => LayoutNode::Boxes(boxes(input)),
        BarKind::Ticks => LayoutNode::Ticks(ticks(input)),
    });

    if input.units.loc == UnitsLoc::Bar {
        let fontsize = units_look.fontsize;
        let (anchor_x, h_align) = if input.bar.reverse {
            (major_w - fontsize / 2.0, TextHAlign::Right)
        } else {
            (fontsize / 2.0, TextHAlign::Left)
        };
        children.push(units_text(
            major_w,
            anchor_x,
            h_align,
            input.units_label(),
            units_look.clone(),
        ));
    }

    if input.bar.reverse {
        children.reverse();
    }
    LayoutNode::HPack(Pack::new(children).with_align(PackAlign::Center))
}

fn boxes(input: &AssemblyInput<'_>) -> BoxesNode {
    let segments = input.segments;
    let mut widths: Vec<f64> = segments
        .iter()
        .take(segments.len().saturating_sub(1))
        .filter(|segment| !segment.is_spacer())
        .map(|segment| segment.width_pt)
        .collect();
    if widths.is_empty() {
        widths.extend(segments.first().map(|segment| segment.width_pt));
    }

    let bar = input.bar;
    let mut cells: Vec<BoxCell> = widths
        .into_iter()
        .enumerate()
        .map(|(index, width)| BoxCell {
            width,
            fill: cycle(&bar.facecolors, index),
            edge: cycle(&bar.edgecolors, index),
        })
        .collect();
    if bar.reverse {
        cells.reverse();
    }

    BoxesNode {
        cells,
        height: input.major_height(),
        edge_width: bar.edgewidth,
    }
}

fn ticks(input: &AssemblyInput<'_>) -> TicksNode {
    let bar = input.bar;
    let width = input.config.bar_length_in * POINTS_PER_INCH;
    let major_h = input.major_height();
    let minor_h = major_h * bar.minor_frac;

    let (baseline, major_span, minor_span) = match bar.tick_loc {
        TickLoc::Above => (major_h, (0.0, major_h), (major_h - minor_h, major_h)),
        TickLoc::Below => (0.0, (0.0, major_h), (0.0, minor_h)),
        TickLoc::Middle => {
            let mid = major_h / 2.0;
            (
                mid,
                (mid - major_h / 2.0, mid + major_h / 2.0),
                (mid - minor_h / 2.0, mid + minor_h / 2.0),
            )
        }
    };

    let bar_max = input.config.bar_max;
    let position = |value: f64| {
        let x = if bar_max == 0.0 {
            0.0
        } else {
            value / bar_max * width
        };
        if bar.reverse { width - x } else { x }
    };

    let drawn: Vec<&Segment> = input
        .segments
        .iter()
        .filter(|segment| !segment.is_spacer())
        .collect();
    let mut strokes = Vec::with_capacity(drawn.len() * 2);

    let mut previous = position(0.0);
    for (index, segment) in drawn.iter().enumerate() {
        let x = position(segment.value);
        if x != previous {
            strokes.push(LinePrimitive::new(
                previous,
                baseline,
                x,
                baseline,
                bar.tickwidth,
                cycle(&bar.basecolors, index.saturating_sub(1)),
            ));
        }
        previous = x;
    }

    for (index, segment) in drawn.iter().enumerate() {
        let x = position(segment.value);
        let (top, bottom) = if segment.kind == SegmentKind::Minor {
            minor_span
        } else {
            major_span
        };
        strokes.push(
            LinePrimitive::new(
                x,
                top,
                x,
                bottom,
                bar.tickwidth,
                cycle(&bar.tickcolors, index),
            )
            .with_cap(LineCap::Projecting),
        );
    }

    TicksNode {
        width,
        height: major_h,
        strokes,
    }
}

fn label_row(input: &AssemblyInput<'_>) -> LayoutNode {
    let labels_text = input.text.with_overrides(&input.labels.font);
    let fontsize = labels_text.fontsize;
    let stroke = labels_text.stroke_width;
    let height = fontsize + 2.0 * stroke;

    let h_align = if input.labels.style == LabelStyle::LastOnly && !input.collapsed() {
        if input.bar.reverse {
            TextHAlign::Left
        } else {
            TextHAlign::Right
        }
    } else {
        TextHAlign::Center
    };

    let mut texts: Vec<Option<String>> = input
        .segments
        .iter()
        .map(|segment| segment.label.clone())
        .collect();
    if input.units.loc == UnitsLoc::Text {
        let units = input.units_label();
        if let Some(last) = texts.last_mut() {
            *last = match last.take() {
                Some(label) if !units.is_empty() => Some(format!("{label} {units}")),
                Some(label) => Some(label),
                None => Some(units.to_owned()),
            };
        }
    }

    let mut children: Vec<LayoutNode> = input
        .segments
        .iter()
        .zip(texts)
        .enumerate()
        .map(|(index, (segment, text))| {
            LayoutNode::Text(TextNode {
                width: segment.length_pt,
                height,
                text,
                anchor_x: segment.length_pt / 2.0,
                anchor_y: height - stroke,
                h_align,
                v_align: TextVAlign::Bottom,
                appearance: appearance(&labels_text, index),
            })
        })
        .collect();
    if input.bar.reverse {
        children.reverse();
    }
    LayoutNode::HPack(Pack::new(children))
}

fn units_text(
    width: f64,
    anchor_x: f64,
    h_align: TextHAlign,
    label: &str,
    appearance: TextAppearance,
) -> LayoutNode {
    let height = appearance.fontsize + 2.0 * appearance.stroke_width;
    LayoutNode::Text(TextNode {
        width,
        height,
        text: Some(label.to_owned()),
        anchor_x,
        anchor_y: height / 2.0,
        h_align,
        v_align: TextVAlign::CenterBaseline,
        appearance,
    })
}

fn appearance(style: &TextStyle, color_index: usize) -> TextAppearance {
    TextAppearance {
        fontsize: style.fontsize,
        color: cycle(&style.textcolors, color_index),
        font: style.font_spec(),
        rotation: style.rotation.unwrap_or(0.0),
        stroke_width: style.stroke_width,
        stroke_color: style.stroke_color,
    }
}

fn cycle(colors: &[Color], index: usize) -> Color {
    if colors.is_empty() {
        return Color::BLACK;
    }
    colors[index % colors.len()]
}
