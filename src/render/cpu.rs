use crate::{
    compile::plan::{DrawOp, RenderPlan},
    foundation::core::{Affine, BezPath, Point, Rgba8},
    foundation::error::{AnimError, AnimResult},
    render::backend::{FrameRGBA, RenderBackend, RenderSettings},
    render::text::{TextBrush, TextLayoutEngine},
};

/// Software rasterizer for [`RenderPlan`]s.
pub struct CpuRasterizer {
    settings: RenderSettings,
    // Built on the first text op, so plans without labels never touch the font.
    text: Option<TextLayoutEngine>,
}

impl CpuRasterizer {
    /// Rasterizer with `settings`; the font is loaded lazily.
    pub fn new(settings: RenderSettings) -> Self {
        Self {
            settings,
            text: None,
        }
    }

    /// Renders `plan` into a premultiplied RGBA8 frame of the plan's surface size.
    #[tracing::instrument(skip(self, plan), fields(ops = plan.ops.len()))]
    pub fn render(&mut self, plan: &RenderPlan) -> AnimResult<FrameRGBA> {
        let width: u16 = plan
            .surface
            .width
            .try_into()
            .map_err(|_| AnimError::validation("surface width exceeds u16"))?;
        let height: u16 = plan
            .surface
            .height
            .try_into()
            .map_err(|_| AnimError::validation("surface height exceeds u16"))?;
        if width == 0 || height == 0 {
            return Err(AnimError::validation("surface must be at least 1x1"));
        }

        let mut pixmap = vello_cpu::Pixmap::new(width, height);
        let mut ctx = vello_cpu::RenderContext::new(width, height);

        if let Some([r, g, b, a]) = self.settings.clear_rgba
            && a > 0
        {
            ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
            ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(r, g, b, a));
            ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                0.0,
                0.0,
                f64::from(width),
                f64::from(height),
            ));
        }

        for op in &plan.ops {
            self.draw_op(&mut ctx, op)?;
        }
        ctx.flush();
        ctx.render_to_pixmap(&mut pixmap);

        Ok(FrameRGBA {
            width: plan.surface.width,
            height: plan.surface.height,
            data: pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        })
    }
}

impl RenderBackend for CpuRasterizer {
    fn render_plan(&mut self, plan: &RenderPlan) -> AnimResult<FrameRGBA> {
        self.render(plan)
    }
}

impl CpuRasterizer {
    fn draw_op(&mut self, ctx: &mut vello_cpu::RenderContext, op: &DrawOp) -> AnimResult<()> {
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);

        match op {
            DrawOp::FillPath {
                path,
                transform,
                color,
                opacity,
            } => {
                ctx.set_transform(affine_to_cpu(*transform));
                ctx.set_paint(color_to_cpu(*color));
                with_opacity(ctx, *opacity, |ctx| ctx.fill_path(&bezpath_to_cpu(path)));
            }
            DrawOp::StrokePath {
                path,
                transform,
                color,
                width,
                opacity,
            } => {
                ctx.set_transform(affine_to_cpu(*transform));
                ctx.set_paint(color_to_cpu(*color));
                ctx.set_stroke(vello_cpu::kurbo::Stroke::new(*width));
                with_opacity(ctx, *opacity, |ctx| ctx.stroke_path(&bezpath_to_cpu(path)));
            }
            DrawOp::Text {
                text,
                transform,
                color,
                font_size,
                opacity,
            } => {
                // A label with no positive font size leaves no ink.
                if !(font_size.is_finite() && *font_size > 0.0) {
                    return Ok(());
                }
                if self.text.is_none() {
                    let engine =
                        TextLayoutEngine::from_font_path(self.settings.font_path.as_deref())?;
                    tracing::debug!(family = engine.family_name(), "text engine ready");
                    self.text = Some(engine);
                }
                let Some(engine) = self.text.as_mut() else {
                    return Ok(());
                };
                let brush = TextBrush {
                    r: color.r,
                    g: color.g,
                    b: color.b,
                    a: color.a,
                };
                let label = engine.layout_label(text, *font_size as f32, brush)?;

                // Layout space has its top-left at the origin; the op centers the label.
                let centered =
                    *transform * Affine::translate((-label.width / 2.0, -label.height / 2.0));
                ctx.set_transform(affine_to_cpu(centered));

                let font = engine.font();
                with_opacity(ctx, *opacity, |ctx| {
                    for line in label.layout.lines() {
                        for item in line.items() {
                            let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                                continue;
                            };

                            let brush = run.style().brush;
                            ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                                brush.r, brush.g, brush.b, brush.a,
                            ));

                            let mut x = run.offset();
                            let baseline = run.baseline();
                            let glyphs = run.glyphs().map(|g| {
                                let glyph = vello_cpu::Glyph {
                                    id: g.id,
                                    x: x + g.x,
                                    y: baseline - g.y,
                                };
                                x += g.advance;
                                glyph
                            });
                            ctx.glyph_run(font)
                                .font_size(run.run().font_size())
                                .fill_glyphs(glyphs);
                        }
                    }
                });
            }
        }
        Ok(())
    }
}

fn with_opacity(
    ctx: &mut vello_cpu::RenderContext,
    opacity: f32,
    draw: impl FnOnce(&mut vello_cpu::RenderContext),
) {
    if opacity < 1.0 {
        ctx.push_opacity_layer(opacity);
        draw(ctx);
        ctx.pop_layer();
    } else {
        draw(ctx);
    }
}

fn color_to_cpu(c: Rgba8) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a)
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn point_to_cpu(p: Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(point_to_cpu(p)),
            PathEl::LineTo(p) => out.line_to(point_to_cpu(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(point_to_cpu(p1), point_to_cpu(p2)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to(point_to_cpu(p1), point_to_cpu(p2), point_to_cpu(p3));
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
