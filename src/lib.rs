//! scalebar-rs: cartographic scale bars for map axes.
//!
//! A bar is resolved fresh against the axis on every draw: the axis extent is
//! converted to real-world units, a readable length and division scheme is
//! picked, and the resulting segments are laid out in points and rasterized
//! onto an off-screen canvas that the host anchors on its figure.

pub mod api;
pub mod core;
pub mod diagnostics;
pub mod error;
pub mod layout;
pub mod raster;
pub mod render;
pub mod style;
pub mod telemetry;

pub use api::{
    DualScaleBar, DualScaleBarConfig, Location, Placement, RenderedScaleBar, ScaleBar,
    ScaleBarConfig, compute_bar, render_bar, render_dual,
};
pub use crate::core::{MapAxis, Projection, StaticAxis};
pub use diagnostics::{Diagnostics, ScaleBarWarning};
pub use error::{ScaleBarError, ScaleBarResult};
pub use style::{SizeTier, StyleRegistry};
