use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::trace;

use crate::core::number_format::{NumberFormat, format_value};
use crate::core::unit_resolver::POINTS_PER_INCH;
use crate::diagnostics::{Diagnostics, ScaleBarWarning};

/// Value carried by spacer segments, which are never drawn or labeled.
pub const SPACER_VALUE: f64 = -1.0;

/// Upper bound on `major_div * minor_div` for one bar.
pub const MAX_DRAWN_DIVISIONS: u32 = 1000;

/// Total divisions drawn for the given counts, or `None` past [`MAX_DRAWN_DIVISIONS`].
#[must_use]
pub fn drawn_divisions(major_div: u32, minor_div: u32) -> Option<u32> {
    major_div
        .max(1)
        .checked_mul(minor_div.max(1))
        .filter(|&total| total <= MAX_DRAWN_DIVISIONS)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentKind {
    Major,
    Minor,
    Spacer,
}

/// Where minor divisions are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MinorType {
    None,
    #[default]
    First,
    All,
}

/// Which segment boundaries receive a label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelStyle {
    #[default]
    Major,
    FirstLast,
    LastOnly,
    MinorAll,
    MinorFirst,
}

/// One entry of a user-supplied label list.
#[derive(Debug, Clone, PartialEq)]
pub enum CustomLabel {
    /// Keep the computed label (`true`).
    Auto,
    /// Suppress the label (`false` / `null`).
    Hidden,
    /// Show this number with the label format.
    Value(f64),
    Text(String),
}

impl Serialize for CustomLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Auto => serializer.serialize_bool(true),
            Self::Hidden => serializer.serialize_none(),
            Self::Value(value) => serializer.serialize_f64(*value),
            Self::Text(text) => serializer.serialize_str(text),
        }
    }
}

impl<'de> Deserialize<'de> for CustomLabel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Flag(bool),
            Number(f64),
            Text(String),
        }

        Ok(match Option::<Raw>::deserialize(deserializer)? {
            Some(Raw::Flag(true)) => Self::Auto,
            Some(Raw::Flag(false)) | None => Self::Hidden,
            Some(Raw::Number(value)) => Self::Value(value),
            Some(Raw::Text(text)) => Self::Text(text),
        })
    }
}

/// One slot of the bar: a drawn division and the label at its left boundary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Segment {
    /// Drawn width in points.
    pub width_pt: f64,
    /// Width of the label slot in points.
    pub length_pt: f64,
    pub value: f64,
    pub kind: SegmentKind,
    pub label: Option<String>,
}

impl Segment {
    fn new(width_in: f64, length_in: f64, value: f64, kind: SegmentKind) -> Self {
        Self {
            width_pt: width_in * POINTS_PER_INCH,
            length_pt: length_in * POINTS_PER_INCH,
            value,
            kind,
            label: None,
        }
    }

    #[must_use]
    pub fn is_spacer(&self) -> bool {
        self.kind == SegmentKind::Spacer
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentRequest<'a> {
    pub bar_max: f64,
    /// Width of one major division in inches.
    pub major_width_in: f64,
    pub major_div: u32,
    pub minor_div: u32,
    pub minor_type: MinorType,
    pub label_style: LabelStyle,
    pub labels: Option<&'a [CustomLabel]>,
    pub format: Option<NumberFormat>,
    pub format_int: bool,
}

impl SegmentRequest<'_> {
    /// Whether the request shrinks to a single "total length" segment.
    #[must_use]
    pub fn collapses_to_total(&self) -> bool {
        self.label_style == LabelStyle::LastOnly && self.major_div == 1 && self.minor_div <= 1
    }

    /// Whether minor-width segments are produced at all.
    #[must_use]
    pub fn has_minor_segments(&self) -> bool {
        self.minor_div > 1 && self.minor_type != MinorType::None
    }
}

/// Builds the ordered segment list with labels for one bar.
///
/// Counts past [`MAX_DRAWN_DIVISIONS`] are clamped; validated styles never reach that.
pub fn build_segments(request: &SegmentRequest<'_>, diagnostics: &mut Diagnostics) -> Vec<Segment> {
    let major_div = request.major_div.clamp(1, MAX_DRAWN_DIVISIONS);
    let minor_div = request.minor_div.min(MAX_DRAWN_DIVISIONS / major_div);
    let major_w = request.major_width_in;
    let major_step = request.bar_max / f64::from(major_div);

    let mut segments = if !request.has_minor_segments() {
        (0..=major_div)
            .map(|d| Segment::new(major_w, major_w, f64::from(d) * major_step, SegmentKind::Major))
            .collect()
    } else if request.minor_type == MinorType::First && major_div > 1 {
        first_division_segments(request.bar_max, major_w, major_div, minor_div)
    } else {
        all_division_segments(request.bar_max, major_w, major_div, minor_div)
    };

    if let Some(first) = segments.first_mut() {
        first.kind = SegmentKind::Major;
    }
    if let Some(last) = segments.last_mut() {
        last.kind = SegmentKind::Major;
    }

    let mut slots = label_slots(request.label_style, &segments);
    if request.collapses_to_total() && segments.len() > 1 {
        segments = vec![segments.swap_remove(1)];
        slots = vec![true];
    }

    let labels = resolve_labels(request, &segments, &slots, diagnostics);
    for (segment, label) in segments.iter_mut().zip(labels) {
        segment.label = label;
    }

    for (index, segment) in segments.iter().enumerate() {
        trace!(
            index,
            width_pt = segment.width_pt,
            length_pt = segment.length_pt,
            value = segment.value,
            kind = ?segment.kind,
            label = segment.label.as_deref(),
            "segment"
        );
    }
    segments
}

fn first_division_segments(bar_max: f64, major_w: f64, major_div: u32, minor_div: u32) -> Vec<Segment> {
    let minor_w = major_w / f64::from(minor_div);
    let major_step = bar_max / f64::from(major_div);
    let minor_step = major_step / f64::from(minor_div);

    let mut segments: Vec<Segment> = (0..minor_div)
        .map(|d| Segment::new(minor_w, minor_w, f64::from(d) * minor_step, SegmentKind::Minor))
        .collect();
    // Drawn as a full major box but labeled on the minor grid.
    segments.push(Segment::new(major_w, minor_w, major_step, SegmentKind::Major));
    let spacer_w = minor_w * (f64::from(minor_div) - 1.0) / 2.0;
    segments.push(Segment::new(spacer_w, spacer_w, SPACER_VALUE, SegmentKind::Spacer));
    segments.extend(
        (2..=major_div)
            .map(|d| Segment::new(major_w, major_w, f64::from(d) * major_step, SegmentKind::Major)),
    );
    segments
}

fn all_division_segments(bar_max: f64, major_w: f64, major_div: u32, minor_div: u32) -> Vec<Segment> {
    let minor_w = major_w / f64::from(minor_div);
    let minor_step = bar_max / f64::from(major_div * minor_div);
    (0..=major_div * minor_div)
        .map(|d| {
            let kind = if d % minor_div == 0 {
                SegmentKind::Major
            } else {
                SegmentKind::Minor
            };
            Segment::new(minor_w, minor_w, f64::from(d) * minor_step, kind)
        })
        .collect()
}

fn label_slots(style: LabelStyle, segments: &[Segment]) -> Vec<bool> {
    let last = segments.len().saturating_sub(1);
    match style {
        LabelStyle::Major => segments
            .iter()
            .map(|segment| segment.kind == SegmentKind::Major)
            .collect(),
        LabelStyle::FirstLast => (0..segments.len())
            .map(|index| index == 0 || index == last)
            .collect(),
        LabelStyle::LastOnly => (0..segments.len()).map(|index| index == last).collect(),
        LabelStyle::MinorFirst => {
            let mut minor_pending = true;
            segments
                .iter()
                .map(|segment| match segment.kind {
                    SegmentKind::Major => true,
                    SegmentKind::Minor if minor_pending => {
                        minor_pending = false;
                        true
                    }
                    _ => false,
                })
                .collect()
        }
        LabelStyle::MinorAll => segments.iter().map(|segment| !segment.is_spacer()).collect(),
    }
}

fn resolve_labels(
    request: &SegmentRequest<'_>,
    segments: &[Segment],
    slots: &[bool],
    diagnostics: &mut Diagnostics,
) -> Vec<Option<String>> {
    let auto = |value: f64| format_value(value, request.format, request.format_int);

    let Some(custom) = request.labels else {
        return segments
            .iter()
            .zip(slots)
            .map(|(segment, &slot)| slot.then(|| auto(segment.value)))
            .collect();
    };

    let needed = slots.iter().filter(|slot| **slot).count();
    if custom.len() > needed {
        diagnostics.warn(ScaleBarWarning::TooManyLabels {
            provided: custom.len(),
            needed,
        });
    } else if custom.len() < needed {
        diagnostics.warn(ScaleBarWarning::TooFewLabels {
            provided: custom.len(),
            needed,
        });
    }

    let mut entries = custom.iter();
    segments
        .iter()
        .zip(slots)
        .map(|(segment, &slot)| {
            if !slot {
                return None;
            }
            match entries.next() {
                Some(CustomLabel::Auto) => Some(auto(segment.value)),
                Some(CustomLabel::Value(value)) => Some(auto(*value)),
                Some(CustomLabel::Text(text)) => Some(text.clone()),
                Some(CustomLabel::Hidden) | None => None,
            }
        })
        .collect()
}
