//! Public entry points: configure a bar, then compute or render it per axis.

mod config;
mod dual;
mod pipeline;
mod placement;
mod scale_bar;

pub use config::{DEFAULT_ZORDER, DualBarSettings, DualScaleBarConfig, ScaleBarConfig};
pub use dual::{DualScaleBar, render_dual};
pub use pipeline::{BarComputation, MAX_CANVAS_PX, RenderedScaleBar, compute_bar, render_bar};
pub use placement::{FramePatch, Location, Placement};
pub use scale_bar::ScaleBar;
