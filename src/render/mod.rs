mod frame;
mod null_renderer;
mod primitives;
mod software;

pub use frame::{RenderFrame, Viewport};
pub use null_renderer::NullRenderer;
pub use primitives::{
    Color, FontFamily, FontSpec, FontStyle, FontWeight, LineCap, LinePrimitive, RectPrimitive,
    TextHAlign, TextPrimitive, TextVAlign,
};
pub use software::{SoftwareRenderStats, SoftwareRenderer};

use image::RgbaImage;

use crate::error::ScaleBarResult;

/// Contract implemented by any rasterizing backend.
///
/// Backends receive a fully materialized `RenderFrame` in pixel space and
/// return the off-screen canvas as straight-alpha RGBA. Unpainted pixels must
/// stay fully transparent so the bar can be cropped to its content.
pub trait Renderer {
    fn render(&mut self, frame: &RenderFrame) -> ScaleBarResult<RgbaImage>;
}

#[cfg(feature = "cairo-backend")]
mod cairo_backend;
#[cfg(feature = "cairo-backend")]
pub use cairo_backend::{CairoContextRenderer, CairoRenderStats, CairoRenderer};
