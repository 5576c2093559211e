//! Retained layout tree measured and placed in points, y pointing down.
//!
//! `extent` is the measure pass; `emit` places every drawable into a
//! [`RenderFrame`] in pixel space, scaling points by `dpi / 72`.

use crate::render::{
    Color, FontSpec, LinePrimitive, RectPrimitive, RenderFrame, TextHAlign, TextPrimitive,
    TextVAlign,
};

/// Measured size of a node in points.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Extent {
    pub width: f64,
    pub height: f64,
}

impl Extent {
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Cross-axis alignment of pack children.
///
/// For an `HPack` this is top, center, bottom; for a `VPack` left, center, right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PackAlign {
    #[default]
    Start,
    Center,
    End,
}

impl PackAlign {
    fn offset(self, available: f64, used: f64) -> f64 {
        match self {
            Self::Start => 0.0,
            Self::Center => (available - used) / 2.0,
            Self::End => available - used,
        }
    }
}

/// One filled cell of a boxes-style bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxCell {
    pub width: f64,
    pub fill: Color,
    pub edge: Color,
}

/// Row of adjacent boxes sharing a height and an edge width.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxesNode {
    pub cells: Vec<BoxCell>,
    pub height: f64,
    pub edge_width: f64,
}

/// Baseline and tick strokes, coordinates relative to the node origin in points.
#[derive(Debug, Clone, PartialEq)]
pub struct TicksNode {
    pub width: f64,
    pub height: f64,
    pub strokes: Vec<LinePrimitive>,
}

/// Resolved text appearance in points.
#[derive(Debug, Clone, PartialEq)]
pub struct TextAppearance {
    pub fontsize: f64,
    pub color: Color,
    pub font: FontSpec,
    pub rotation: f64,
    pub stroke_width: f64,
    pub stroke_color: Color,
}

/// Fixed-size box holding at most one anchored string.
///
/// The string may overflow the box; nothing is clipped.
#[derive(Debug, Clone, PartialEq)]
pub struct TextNode {
    pub width: f64,
    pub height: f64,
    pub text: Option<String>,
    pub anchor_x: f64,
    pub anchor_y: f64,
    pub h_align: TextHAlign,
    pub v_align: TextVAlign,
    pub appearance: TextAppearance,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Pack {
    pub children: Vec<LayoutNode>,
    pub sep: f64,
    pub pad: f64,
    pub align: PackAlign,
}

impl Pack {
    #[must_use]
    pub fn new(children: Vec<LayoutNode>) -> Self {
        Self {
            children,
            sep: 0.0,
            pad: 0.0,
            align: PackAlign::Start,
        }
    }

    #[must_use]
    pub fn with_spacing(mut self, sep: f64, pad: f64) -> Self {
        self.sep = sep;
        self.pad = pad;
        self
    }

    #[must_use]
    pub fn with_align(mut self, align: PackAlign) -> Self {
        self.align = align;
        self
    }

    fn gaps(&self) -> f64 {
        self.sep * self.children.len().saturating_sub(1) as f64
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LayoutNode {
    /// Invisible box used to offset siblings.
    Spacer(Extent),
    Boxes(BoxesNode),
    Ticks(TicksNode),
    Text(TextNode),
    /// Children left to right.
    HPack(Pack),
    /// Children top to bottom.
    VPack(Pack),
}

impl LayoutNode {
    #[must_use]
    pub fn extent(&self) -> Extent {
        match self {
            Self::Spacer(extent) => *extent,
            Self::Boxes(boxes) => Extent::new(
                boxes.cells.iter().map(|cell| cell.width).sum(),
                boxes.height,
            ),
            Self::Ticks(ticks) => Extent::new(ticks.width, ticks.height),
            Self::Text(text) => Extent::new(text.width, text.height),
            Self::HPack(pack) => {
                let (width, height) = pack.children.iter().map(Self::extent).fold(
                    (0.0_f64, 0.0_f64),
                    |(width, height), child| (width + child.width, height.max(child.height)),
                );
                Extent::new(
                    width + pack.gaps() + 2.0 * pack.pad,
                    height + 2.0 * pack.pad,
                )
            }
            Self::VPack(pack) => {
                let (width, height) = pack.children.iter().map(Self::extent).fold(
                    (0.0_f64, 0.0_f64),
                    |(width, height), child| (width.max(child.width), height + child.height),
                );
                Extent::new(
                    width + 2.0 * pack.pad,
                    height + pack.gaps() + 2.0 * pack.pad,
                )
            }
        }
    }

    /// Places this node with its top-left corner at `origin` (points).
    pub fn emit(&self, origin: (f64, f64), scale: f64, frame: &mut RenderFrame) {
        let (x0, y0) = origin;
        match self {
            Self::Spacer(_) => {}
            Self::Boxes(boxes) => {
                let mut x = x0;
                for cell in &boxes.cells {
                    frame.rects.push(
                        RectPrimitive::new(
                            x * scale,
                            y0 * scale,
                            cell.width * scale,
                            boxes.height * scale,
                            cell.fill,
                        )
                        .with_border(cell.edge, boxes.edge_width * scale),
                    );
                    x += cell.width;
                }
            }
            Self::Ticks(ticks) => {
                for stroke in &ticks.strokes {
                    frame.lines.push(
                        LinePrimitive::new(
                            (x0 + stroke.x1) * scale,
                            (y0 + stroke.y1) * scale,
                            (x0 + stroke.x2) * scale,
                            (y0 + stroke.y2) * scale,
                            stroke.stroke_width * scale,
                            stroke.color,
                        )
                        .with_cap(stroke.cap),
                    );
                }
            }
            Self::Text(node) => {
                let Some(text) = node.text.as_deref().filter(|text| !text.is_empty()) else {
                    return;
                };
                let look = &node.appearance;
                frame.texts.push(
                    TextPrimitive::new(
                        text,
                        (x0 + node.anchor_x) * scale,
                        (y0 + node.anchor_y) * scale,
                        look.fontsize * scale,
                        look.color,
                        node.h_align,
                    )
                    .with_v_align(node.v_align)
                    .with_font(look.font)
                    .with_rotation(look.rotation)
                    .with_stroke(look.stroke_width * scale, look.stroke_color),
                );
            }
            Self::HPack(pack) => {
                let inner_height = self.extent().height - 2.0 * pack.pad;
                let mut x = x0 + pack.pad;
                for child in &pack.children {
                    let extent = child.extent();
                    let y = y0 + pack.pad + pack.align.offset(inner_height, extent.height);
                    child.emit((x, y), scale, frame);
                    x += extent.width + pack.sep;
                }
            }
            Self::VPack(pack) => {
                let inner_width = self.extent().width - 2.0 * pack.pad;
                let mut y = y0 + pack.pad;
                for child in &pack.children {
                    let extent = child.extent();
                    let x = x0 + pack.pad + pack.align.offset(inner_width, extent.width);
                    child.emit((x, y), scale, frame);
                    y += extent.height + pack.sep;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::Viewport;

    fn spacer(width: f64, height: f64) -> LayoutNode {
        LayoutNode::Spacer(Extent::new(width, height))
    }

    #[test]
    fn packs_accumulate_extent_with_sep_and_pad() {
        let row = LayoutNode::HPack(
            Pack::new(vec![spacer(10.0, 4.0), spacer(20.0, 8.0)]).with_spacing(2.0, 1.0),
        );
        assert_eq!(row.extent(), Extent::new(34.0, 10.0));

        let column = LayoutNode::VPack(Pack::new(vec![row, spacer(5.0, 5.0)]).with_spacing(3.0, 0.0));
        assert_eq!(column.extent(), Extent::new(34.0, 18.0));
    }

    #[test]
    fn hpack_center_alignment_offsets_shorter_children() {
        let boxes = LayoutNode::Boxes(BoxesNode {
            cells: vec![BoxCell {
                width: 10.0,
                fill: Color::BLACK,
                edge: Color::BLACK,
            }],
            height: 4.0,
            edge_width: 1.0,
        });
        let row = LayoutNode::HPack(
            Pack::new(vec![spacer(5.0, 10.0), boxes]).with_align(PackAlign::Center),
        );
        let mut frame = RenderFrame::new(Viewport::new(100, 100));
        row.emit((0.0, 0.0), 2.0, &mut frame);

        assert_eq!(frame.rects.len(), 1);
        let rect = frame.rects[0];
        assert_eq!((rect.x, rect.y), (10.0, 6.0));
        assert_eq!((rect.width, rect.height), (20.0, 8.0));
        assert_eq!(rect.border_width, 2.0);
    }

    #[test]
    fn vpack_end_alignment_right_aligns_children() {
        let column = LayoutNode::VPack(
            Pack::new(vec![spacer(30.0, 2.0), LayoutNode::Boxes(BoxesNode {
                cells: vec![BoxCell {
                    width: 10.0,
                    fill: Color::WHITE,
                    edge: Color::BLACK,
                }],
                height: 2.0,
                edge_width: 0.0,
            })])
            .with_align(PackAlign::End),
        );
        let mut frame = RenderFrame::new(Viewport::new(100, 100));
        column.emit((1.0, 1.0), 1.0, &mut frame);
        assert_eq!((frame.rects[0].x, frame.rects[0].y), (21.0, 3.0));
    }

    #[test]
    fn empty_text_is_not_emitted() {
        let node = LayoutNode::Text(TextNode {
            width: 10.0,
            height: 10.0,
            text: Some(String::new()),
            anchor_x: 5.0,
            anchor_y: 5.0,
            h_align: TextHAlign::Center,
            v_align: TextVAlign::Bottom,
            appearance: TextAppearance {
                fontsize: 10.0,
                color: Color::BLACK,
                font: FontSpec::default(),
                rotation: 0.0,
                stroke_width: 0.0,
                stroke_color: Color::WHITE,
            },
        });
        let mut frame = RenderFrame::new(Viewport::new(10, 10));
        node.emit((0.0, 0.0), 1.0, &mut frame);
        assert!(frame.texts.is_empty());
    }
}
