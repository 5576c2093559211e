use cairo::{Context, Format, ImageSurface};
use image::{Rgba, RgbaImage};
use pango::FontDescription;

use crate::error::{ScaleBarError, ScaleBarResult};
use crate::render::{
    Color, FontStyle, LineCap, RectPrimitive, RenderFrame, Renderer, TextHAlign, TextPrimitive,
    TextVAlign,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CairoRenderStats {
    pub lines_drawn: usize,
    pub rects_drawn: usize,
    pub texts_drawn: usize,
}

/// Optional extension trait for renderers that can draw into an external Cairo
/// context (for example a GTK `DrawingArea` callback).
pub trait CairoContextRenderer {
    fn render_on_cairo_context(
        &mut self,
        context: &Context,
        frame: &RenderFrame,
    ) -> ScaleBarResult<()>;
}

/// Cairo + Pango + PangoCairo renderer backend.
///
/// Unlike the software renderer it resolves font family, style and weight
/// through fontconfig.
#[derive(Debug)]
pub struct CairoRenderer {
    clear_color: Color,
    last_stats: CairoRenderStats,
}

impl Default for CairoRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl CairoRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            clear_color: Color::TRANSPARENT,
            last_stats: CairoRenderStats::default(),
        }
    }

    #[must_use]
    pub fn backend_name(&self) -> &'static str {
        "cairo+pango+pangocairo"
    }

    #[must_use]
    pub fn clear_color(&self) -> Color {
        self.clear_color
    }

    pub fn set_clear_color(&mut self, color: Color) -> ScaleBarResult<()> {
        color.validate()?;
        self.clear_color = color;
        Ok(())
    }

    #[must_use]
    pub fn last_stats(&self) -> CairoRenderStats {
        self.last_stats
    }

    fn render_with_context(&mut self, context: &Context, frame: &RenderFrame) -> ScaleBarResult<()> {
        frame.validate()?;
        self.clear_color.validate()?;

        context.set_operator(cairo::Operator::Source);
        apply_color(context, self.clear_color);
        context
            .paint()
            .map_err(|err| map_backend_error("failed to clear surface", err))?;
        context.set_operator(cairo::Operator::Over);

        let mut stats = CairoRenderStats::default();

        for rect in &frame.rects {
            draw_rect(context, *rect)?;
            stats.rects_drawn += 1;
        }

        for line in &frame.lines {
            if line.stroke_width <= 0.0 {
                continue;
            }
            apply_color(context, line.color);
            context.set_line_width(line.stroke_width);
            context.set_line_cap(match line.cap {
                LineCap::Butt => cairo::LineCap::Butt,
                LineCap::Projecting => cairo::LineCap::Square,
            });
            context.move_to(line.x1, line.y1);
            context.line_to(line.x2, line.y2);
            context
                .stroke()
                .map_err(|err| map_backend_error("failed to stroke line", err))?;
            stats.lines_drawn += 1;
        }

        for text in &frame.texts {
            draw_text(context, text)?;
            stats.texts_drawn += 1;
        }

        self.last_stats = stats;
        Ok(())
    }
}

impl Renderer for CairoRenderer {
    fn render(&mut self, frame: &RenderFrame) -> ScaleBarResult<RgbaImage> {
        frame.validate()?;
        let (width, height) = (frame.viewport.width, frame.viewport.height);
        let surface_size = |value: u32| {
            i32::try_from(value).map_err(|_| ScaleBarError::InvalidViewport { width, height })
        };
        let mut surface =
            ImageSurface::create(Format::ARgb32, surface_size(width)?, surface_size(height)?)
                .map_err(|err| map_backend_error("failed to create cairo surface", err))?;
        {
            let context = Context::new(&surface)
                .map_err(|err| map_backend_error("failed to create cairo context", err))?;
            self.render_with_context(&context, frame)?;
        }
        surface.flush();

        let stride = usize::try_from(surface.stride())
            .map_err(|_| ScaleBarError::Backend("negative cairo stride".to_owned()))?;
        let data = surface
            .data()
            .map_err(|err| ScaleBarError::Backend(format!("failed to read cairo surface: {err}")))?;
        Ok(RgbaImage::from_fn(width, height, |x, y| {
            let offset = y as usize * stride + x as usize * 4;
            let argb = u32::from_ne_bytes([
                data[offset],
                data[offset + 1],
                data[offset + 2],
                data[offset + 3],
            ]);
            unpremultiply(argb)
        }))
    }
}

impl CairoContextRenderer for CairoRenderer {
    fn render_on_cairo_context(
        &mut self,
        context: &Context,
        frame: &RenderFrame,
    ) -> ScaleBarResult<()> {
        self.render_with_context(context, frame)
    }
}

fn apply_color(context: &Context, color: Color) {
    context.set_source_rgba(color.red, color.green, color.blue, color.alpha);
}

fn draw_rect(context: &Context, rect: RectPrimitive) -> ScaleBarResult<()> {
    context.rectangle(rect.x, rect.y, rect.width, rect.height);
    apply_color(context, rect.fill_color);
    if rect.border_width > 0.0 && rect.border_color.is_visible() {
        context
            .fill_preserve()
            .map_err(|err| map_backend_error("failed to fill rectangle", err))?;
        apply_color(context, rect.border_color);
        context.set_line_width(rect.border_width);
        context.set_line_cap(cairo::LineCap::Butt);
        context
            .stroke()
            .map_err(|err| map_backend_error("failed to stroke rectangle border", err))
    } else {
        context
            .fill()
            .map_err(|err| map_backend_error("failed to fill rectangle", err))
    }
}

fn draw_text(context: &Context, text: &TextPrimitive) -> ScaleBarResult<()> {
    let layout = pangocairo::functions::create_layout(context);
    let mut font_description = FontDescription::new();
    font_description.set_family(text.font.family.name());
    font_description.set_style(match text.font.style {
        FontStyle::Normal => pango::Style::Normal,
        FontStyle::Italic => pango::Style::Italic,
        FontStyle::Oblique => pango::Style::Oblique,
    });
    font_description.set_weight(if text.font.weight.is_bold() {
        pango::Weight::Bold
    } else {
        pango::Weight::Normal
    });
    font_description.set_absolute_size(text.font_size_px * f64::from(pango::SCALE));
    layout.set_font_description(Some(&font_description));
    layout.set_text(&text.text);

    let (text_width, text_height) = layout.pixel_size();
    let (text_width, text_height) = (f64::from(text_width), f64::from(text_height));
    let baseline = f64::from(layout.baseline()) / f64::from(pango::SCALE);
    let anchor_x = match text.h_align {
        TextHAlign::Left => 0.0,
        TextHAlign::Center => text_width / 2.0,
        TextHAlign::Right => text_width,
    };
    let anchor_y = match text.v_align {
        TextVAlign::Top => 0.0,
        TextVAlign::Center => text_height / 2.0,
        TextVAlign::CenterBaseline => baseline / 2.0,
        TextVAlign::Baseline => baseline,
        TextVAlign::Bottom => text_height,
    };

    context
        .save()
        .map_err(|err| map_backend_error("failed to save cairo state", err))?;
    context.translate(text.x, text.y);
    // Cairo angles turn clockwise in y-down space.
    context.rotate(-text.rotation_deg.to_radians());
    context.move_to(-anchor_x, -anchor_y);
    pangocairo::functions::layout_path(context, &layout);
    if text.stroke_width_px > 0.0 && text.stroke_color.is_visible() {
        apply_color(context, text.stroke_color);
        context.set_line_width(text.stroke_width_px);
        context.set_line_join(cairo::LineJoin::Round);
        context
            .stroke_preserve()
            .map_err(|err| map_backend_error("failed to stroke text halo", err))?;
    }
    apply_color(context, text.color);
    context
        .fill()
        .map_err(|err| map_backend_error("failed to fill text", err))?;
    context
        .restore()
        .map_err(|err| map_backend_error("failed to restore cairo state", err))
}

fn unpremultiply(argb: u32) -> Rgba<u8> {
    let alpha = (argb >> 24) as u8;
    if alpha == 0 {
        return Rgba([0, 0, 0, 0]);
    }
    let channel = |shift: u32| {
        let premultiplied = u32::from((argb >> shift) as u8);
        ((premultiplied * 255 + u32::from(alpha) / 2) / u32::from(alpha)).min(255) as u8
    };
    Rgba([channel(16), channel(8), channel(0), alpha])
}

fn map_backend_error(prefix: &str, err: cairo::Error) -> ScaleBarError {
    ScaleBarError::Backend(format!("{prefix}: {err}"))
}
