use std::fmt;
use std::path::Path;

use ab_glyph::{Font, FontVec, GlyphId, PxScale, ScaleFont, point};
use image::{Rgba, RgbaImage};
use tiny_skia::{Paint, PathBuilder, Pixmap, Rect, Stroke, Transform};
use tracing::debug;

use crate::error::{ScaleBarError, ScaleBarResult};
use crate::raster::transform::{rotate, rotated_point};
use crate::render::{
    Color, LineCap, LinePrimitive, RectPrimitive, RenderFrame, Renderer, TextHAlign,
    TextPrimitive, TextVAlign,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SoftwareRenderStats {
    pub lines_drawn: usize,
    pub rects_drawn: usize,
    pub texts_drawn: usize,
    /// Texts dropped because no font was loaded.
    pub texts_skipped: usize,
}

/// CPU rasterizer: tiny-skia for shapes, ab_glyph for text.
///
/// `ab_glyph` does not discover system fonts, so text is only drawn once a
/// font has been supplied; every text primitive uses that single face.
pub struct SoftwareRenderer {
    font: Option<FontVec>,
    clear_color: Color,
    last_stats: SoftwareRenderStats,
}

impl fmt::Debug for SoftwareRenderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SoftwareRenderer")
            .field("has_font", &self.font.is_some())
            .field("clear_color", &self.clear_color)
            .field("last_stats", &self.last_stats)
            .finish()
    }
}

impl Default for SoftwareRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl SoftwareRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            font: None,
            clear_color: Color::TRANSPARENT,
            last_stats: SoftwareRenderStats::default(),
        }
    }

    /// Loads a TrueType/OpenType face from memory.
    pub fn with_font_bytes(mut self, bytes: Vec<u8>) -> ScaleBarResult<Self> {
        let font = FontVec::try_from_vec(bytes)
            .map_err(|err| ScaleBarError::Backend(format!("failed to parse font: {err}")))?;
        self.font = Some(font);
        Ok(self)
    }

    pub fn with_font_file(self, path: impl AsRef<Path>) -> ScaleBarResult<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|err| {
            ScaleBarError::Backend(format!("failed to read font `{}`: {err}", path.display()))
        })?;
        self.with_font_bytes(bytes)
    }

    #[must_use]
    pub fn backend_name(&self) -> &'static str {
        "tiny-skia+ab_glyph"
    }

    #[must_use]
    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }

    #[must_use]
    pub fn clear_color(&self) -> Color {
        self.clear_color
    }

    /// Background painted before any primitive; keep it transparent for cropping.
    pub fn set_clear_color(&mut self, color: Color) -> ScaleBarResult<()> {
        color.validate()?;
        self.clear_color = color;
        Ok(())
    }

    #[must_use]
    pub fn last_stats(&self) -> SoftwareRenderStats {
        self.last_stats
    }
}

impl Renderer for SoftwareRenderer {
    fn render(&mut self, frame: &RenderFrame) -> ScaleBarResult<RgbaImage> {
        frame.validate()?;
        let mut pixmap = Pixmap::new(frame.viewport.width, frame.viewport.height).ok_or_else(
            || {
                ScaleBarError::Backend(format!(
                    "failed to allocate {}x{} pixmap",
                    frame.viewport.width, frame.viewport.height
                ))
            },
        )?;
        let [r, g, b, a] = self.clear_color.to_rgba8();
        pixmap.fill(tiny_skia::Color::from_rgba8(r, g, b, a));

        let mut stats = SoftwareRenderStats::default();
        for rect in &frame.rects {
            draw_rect(&mut pixmap, rect);
            stats.rects_drawn += 1;
        }
        for line in &frame.lines {
            draw_line(&mut pixmap, line);
            stats.lines_drawn += 1;
        }

        let mut canvas = to_image(&pixmap);
        for text in &frame.texts {
            let Some(font) = &self.font else {
                stats.texts_skipped += 1;
                continue;
            };
            if let Some((glyphs, anchor)) = rasterize_text(font, text) {
                let x = (text.x - anchor.0).round() as i64;
                let y = (text.y - anchor.1).round() as i64;
                composite(&mut canvas, &glyphs, x, y);
            }
            stats.texts_drawn += 1;
        }
        if stats.texts_skipped > 0 {
            debug!(skipped = stats.texts_skipped, "no font loaded; text primitives skipped");
        }

        self.last_stats = stats;
        Ok(canvas)
    }
}

fn paint_for(color: Color) -> Paint<'static> {
    let [r, g, b, a] = color.to_rgba8();
    let mut paint = Paint::default();
    paint.set_color_rgba8(r, g, b, a);
    paint.anti_alias = true;
    paint
}

fn draw_rect(pixmap: &mut Pixmap, rect: &RectPrimitive) {
    let Some(area) = Rect::from_xywh(
        rect.x as f32,
        rect.y as f32,
        rect.width as f32,
        rect.height as f32,
    ) else {
        return;
    };
    if rect.fill_color.is_visible() {
        pixmap.fill_rect(area, &paint_for(rect.fill_color), Transform::identity(), None);
    }
    if rect.border_width > 0.0 && rect.border_color.is_visible() {
        let path = PathBuilder::from_rect(area);
        let stroke = Stroke {
            width: rect.border_width as f32,
            ..Stroke::default()
        };
        pixmap.stroke_path(
            &path,
            &paint_for(rect.border_color),
            &stroke,
            Transform::identity(),
            None,
        );
    }
}

fn draw_line(pixmap: &mut Pixmap, line: &LinePrimitive) {
    if line.stroke_width <= 0.0 || !line.color.is_visible() {
        return;
    }
    let mut builder = PathBuilder::new();
    builder.move_to(line.x1 as f32, line.y1 as f32);
    builder.line_to(line.x2 as f32, line.y2 as f32);
    let Some(path) = builder.finish() else {
        return;
    };
    let stroke = Stroke {
        width: line.stroke_width as f32,
        line_cap: match line.cap {
            LineCap::Butt => tiny_skia::LineCap::Butt,
            LineCap::Projecting => tiny_skia::LineCap::Square,
        },
        ..Stroke::default()
    };
    pixmap.stroke_path(
        &path,
        &paint_for(line.color),
        &stroke,
        Transform::identity(),
        None,
    );
}

fn to_image(pixmap: &Pixmap) -> RgbaImage {
    let width = pixmap.width();
    let pixels = pixmap.pixels();
    RgbaImage::from_fn(width, pixmap.height(), |x, y| {
        let color = pixels[(y * width + x) as usize].demultiply();
        Rgba([color.red(), color.green(), color.blue(), color.alpha()])
    })
}

/// Renders one string to its own image.
///
/// Returns the image and the anchor position inside it.
fn rasterize_text(font: &FontVec, text: &TextPrimitive) -> Option<(RgbaImage, (f64, f64))> {
    let scale = PxScale::from(text.font_size_px as f32);
    let scaled = font.as_scaled(scale);
    let ascent = f64::from(scaled.ascent());
    let descent = f64::from(scaled.descent());

    let mut caret = 0.0_f32;
    let mut previous: Option<GlyphId> = None;
    let mut glyphs = Vec::with_capacity(text.text.len());
    for ch in text.text.chars().filter(|ch| !ch.is_control()) {
        let id = scaled.glyph_id(ch);
        if let Some(previous) = previous {
            caret += scaled.kern(previous, id);
        }
        glyphs.push(id.with_scale_and_position(scale, point(caret, ascent as f32)));
        caret += scaled.h_advance(id);
        previous = Some(id);
    }

    let halo = if text.stroke_color.is_visible() {
        text.stroke_width_px / 2.0
    } else {
        0.0
    };
    let margin = halo.ceil() as u32 + 1;
    let text_w = f64::from(caret);
    let text_h = ascent - descent;
    let width = text_w.ceil().max(1.0) as u32 + 2 * margin;
    let height = text_h.ceil().max(1.0) as u32 + 2 * margin;

    let mut coverage = vec![0.0_f32; (width * height) as usize];
    for glyph in glyphs {
        let Some(outlined) = font.outline_glyph(glyph) else {
            continue;
        };
        let bounds = outlined.px_bounds();
        outlined.draw(|gx, gy, value| {
            let x = bounds.min.x as i64 + i64::from(gx) + i64::from(margin);
            let y = bounds.min.y as i64 + i64::from(gy) + i64::from(margin);
            if x < 0 || y < 0 || x >= i64::from(width) || y >= i64::from(height) {
                return;
            }
            let cell = &mut coverage[(y as u32 * width + x as u32) as usize];
            *cell = (*cell + value).min(1.0);
        });
    }

    let halo_coverage = (halo > 0.0).then(|| dilate(&coverage, width, height, halo));
    let mut image = RgbaImage::new(width, height);
    for (x, y, pixel) in image.enumerate_pixels_mut() {
        let index = (y * width + x) as usize;
        if let Some(halo_coverage) = &halo_coverage {
            blend(pixel, text.stroke_color, f64::from(halo_coverage[index]));
        }
        blend(pixel, text.color, f64::from(coverage[index]));
    }

    let anchor_x = f64::from(margin)
        + match text.h_align {
            TextHAlign::Left => 0.0,
            TextHAlign::Center => text_w / 2.0,
            TextHAlign::Right => text_w,
        };
    let anchor_y = f64::from(margin)
        + match text.v_align {
            TextVAlign::Top => 0.0,
            TextVAlign::Center => text_h / 2.0,
            TextVAlign::CenterBaseline => ascent / 2.0,
            TextVAlign::Baseline => ascent,
            TextVAlign::Bottom => text_h,
        };

    if text.rotation_deg == 0.0 {
        return Some((image, (anchor_x, anchor_y)));
    }
    let anchor = rotated_point((anchor_x, anchor_y), image.dimensions(), text.rotation_deg);
    Some((rotate(&image, text.rotation_deg), anchor))
}

/// Maximum coverage within `radius` pixels, used for the text halo.
fn dilate(coverage: &[f32], width: u32, height: u32, radius: f64) -> Vec<f32> {
    let reach = radius.ceil() as i64;
    let radius_sq = radius * radius;
    let offsets: Vec<(i64, i64)> = (-reach..=reach)
        .flat_map(|dy| (-reach..=reach).map(move |dx| (dx, dy)))
        .filter(|&(dx, dy)| ((dx * dx + dy * dy) as f64) <= radius_sq)
        .collect();

    let (w, h) = (i64::from(width), i64::from(height));
    let mut dilated = vec![0.0_f32; coverage.len()];
    for y in 0..h {
        for x in 0..w {
            let mut best = 0.0_f32;
            for &(dx, dy) in &offsets {
                let (nx, ny) = (x + dx, y + dy);
                if nx < 0 || ny < 0 || nx >= w || ny >= h {
                    continue;
                }
                best = best.max(coverage[(ny * w + nx) as usize]);
            }
            dilated[(y * w + x) as usize] = best;
        }
    }
    dilated
}

/// Straight-alpha source-over of `color` scaled by `coverage`.
fn blend(pixel: &mut Rgba<u8>, color: Color, coverage: f64) {
    let src_a = (color.alpha * coverage).clamp(0.0, 1.0);
    if src_a <= 0.0 {
        return;
    }
    let dst_a = f64::from(pixel[3]) / 255.0;
    let out_a = src_a + dst_a * (1.0 - src_a);
    let channel = |src: f64, dst: u8| {
        let dst = f64::from(dst) / 255.0;
        let value = (src * src_a + dst * dst_a * (1.0 - src_a)) / out_a;
        (value * 255.0).round().clamp(0.0, 255.0) as u8
    };
    *pixel = Rgba([
        channel(color.red, pixel[0]),
        channel(color.green, pixel[1]),
        channel(color.blue, pixel[2]),
        (out_a * 255.0).round().clamp(0.0, 255.0) as u8,
    ]);
}

fn composite(canvas: &mut RgbaImage, layer: &RgbaImage, x: i64, y: i64) {
    let (width, height) = (i64::from(canvas.width()), i64::from(canvas.height()));
    for (lx, ly, source) in layer.enumerate_pixels() {
        let (cx, cy) = (x + i64::from(lx), y + i64::from(ly));
        if source[3] == 0 || cx < 0 || cy < 0 || cx >= width || cy >= height {
            continue;
        }
        let color = Color::from_rgba8(source[0], source[1], source[2], u8::MAX);
        blend(
            canvas.get_pixel_mut(cx as u32, cy as u32),
            color,
            f64::from(source[3]) / 255.0,
        );
    }
}
