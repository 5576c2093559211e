pub mod axis;
pub mod bar_length;
pub mod crs;
pub mod number_format;
pub mod segments;
pub mod unit_resolver;
pub mod units;

pub use axis::{MapAxis, StaticAxis};
pub use bar_length::{BarConfig, BarLength, LengthRequest, optimize_bar_length};
pub use crs::BuiltinCrs;
pub use number_format::{NumberFormat, format_value};
pub use segments::{
    CustomLabel, LabelStyle, MAX_DRAWN_DIVISIONS, MinorType, Segment, SegmentKind,
    SegmentRequest, build_segments, drawn_divisions,
};
pub use unit_resolver::{AxisMeasure, POINTS_PER_INCH, resolve_axis_units};
pub use units::{BarOrientation, LengthUnit, PassThrough, Projection};
