use image::RgbaImage;

use crate::error::ScaleBarResult;
use crate::render::{RenderFrame, Renderer};

/// No-op renderer used by tests and headless layout checks.
///
/// It still validates frame content so tests can catch invalid geometry, and
/// returns a fully transparent canvas of the requested size.
#[derive(Debug, Default)]
pub struct NullRenderer {
    pub last_rect_count: usize,
    pub last_line_count: usize,
    pub last_text_count: usize,
    pub last_frame: Option<RenderFrame>,
}

impl Renderer for NullRenderer {
    fn render(&mut self, frame: &RenderFrame) -> ScaleBarResult<RgbaImage> {
        frame.validate()?;
        self.last_rect_count = frame.rects.len();
        self.last_line_count = frame.lines.len();
        self.last_text_count = frame.texts.len();
        self.last_frame = Some(frame.clone());
        Ok(RgbaImage::new(frame.viewport.width, frame.viewport.height))
    }
}
