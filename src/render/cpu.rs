use crate::{
    field::{
        MotionField,
        cloud::PointCloud,
        dashes::{DASH_WIDTH, Dash, DashField},
    },
    foundation::{
        core::{Affine, BezPath, Point, Rgba8, Viewport},
        error::{ScrollreelError, ScrollreelResult},
    },
    render::{
        FrameRGBA, FrameView, RenderBackend, RenderSettings, blur, composite,
        geometry::{fill_path, stroke_outline},
        text::TextEngine,
    },
    scene::{
        builder::{VIEW_HEIGHT, VIEW_WIDTH},
        model::{Node, NodeId, Scene, Shape, TextAnchor},
    },
};

/// Software rasterizer on top of `vello_cpu`.
///
/// Every child of the scene root is drawn into its own premultiplied layer,
/// blurred when its `blur` style is set, and composited with its opacity.
/// Text nodes are only drawn once a font is attached with
/// [`CpuBackend::with_text`].
pub struct CpuBackend {
    settings: RenderSettings,
    glyphs: Glyphs,
}

impl CpuBackend {
    pub fn new(settings: RenderSettings) -> Self {
        Self {
            settings,
            glyphs: Glyphs::default(),
        }
    }

    pub fn with_text(mut self, engine: TextEngine) -> Self {
        tracing::debug!(family = engine.family(), "text enabled");
        self.glyphs.engine = Some(engine);
        self
    }
}

impl RenderBackend for CpuBackend {
    fn render(&mut self, view: &FrameView<'_>) -> ScrollreelResult<FrameRGBA> {
        let (w, h) = surface_size(view.viewport)?;
        let mut frame = view.clear.premul().repeat(usize::from(w) * usize::from(h));

        match view.field {
            MotionField::Dashes(f) => self.draw_dashes(f, view.palette.particle, w, h, &mut frame)?,
            MotionField::Cloud(c) => self.draw_cloud(c, view.palette.particle, w, h, &mut frame)?,
        }

        let fit = view.viewport.fit(VIEW_WIDTH, VIEW_HEIGHT);
        let device_scale = fit.as_coeffs()[0];
        let mut layers = 0usize;
        for &id in view.scene.children(Scene::ROOT) {
            if draw_layer(view.scene, id, fit, device_scale, w, h, &mut self.glyphs, &mut frame)? {
                layers += 1;
            }
        }
        tracing::trace!(layers, "frame rasterized");

        Ok(FrameRGBA {
            width: view.viewport.width,
            height: view.viewport.height,
            data: frame,
            premultiplied: true,
        })
    }
}

impl CpuBackend {
    fn draw_dashes(
        &self,
        field: &DashField,
        color: Rgba8,
        w: u16,
        h: u16,
        frame: &mut [u8],
    ) -> ScrollreelResult<()> {
        let dashes = field.dashes();
        if dashes.is_empty() {
            return Ok(());
        }

        let paint = |ctx: &mut vello_cpu::RenderContext, dashes: &[&Dash], alpha_scale: f64| {
            ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
            ctx.set_stroke(
                vello_cpu::kurbo::Stroke::new(DASH_WIDTH).with_caps(vello_cpu::kurbo::Cap::Round),
            );
            for d in dashes {
                ctx.set_paint(color_to_cpu(color.with_opacity(d.opacity * alpha_scale)));
                let mut path = vello_cpu::kurbo::BezPath::new();
                path.move_to((d.x, d.y));
                path.line_to((d.x, d.y + d.length));
                ctx.stroke_path(&path);
            }
        };

        for bin in glow_bins(dashes) {
            let mut glow = render_layer(w, h, |ctx| paint(ctx, &bin.dashes, 0.8));
            blur::blur_in_place(
                glow.data_as_u8_slice_mut(),
                u32::from(w),
                u32::from(h),
                bin.glow * self.settings.glow_scale,
            )?;
            composite::over_in_place(frame, glow.data_as_u8_slice(), 1.0)?;
        }

        let all: Vec<&Dash> = dashes.iter().collect();
        let core = render_layer(w, h, |ctx| paint(ctx, &all, 1.0));
        composite::over_in_place(frame, core.data_as_u8_slice(), 1.0)
    }

    fn draw_cloud(
        &self,
        cloud: &PointCloud,
        color: Rgba8,
        w: u16,
        h: u16,
        frame: &mut [u8],
    ) -> ScrollreelResult<()> {
        let projected = cloud.project();
        let points = render_layer(w, h, |ctx| {
            ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
            for p in &projected {
                let fade = (1.0 - (p.depth - 10.0) / 60.0).clamp(0.15, 1.0);
                ctx.set_paint(color_to_cpu(color.with_opacity(0.8 * fade)));
                let half = p.size / 2.0;
                ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                    p.pos.x - half,
                    p.pos.y - half,
                    p.pos.x + half,
                    p.pos.y + half,
                ));
            }
        });
        composite::over_in_place(frame, points.data_as_u8_slice(), 1.0)?;

        if self.settings.bloom_strength > 0.0 {
            let mut bloom = points.data_as_u8_slice().to_vec();
            blur::blur_in_place(&mut bloom, u32::from(w), u32::from(h), self.settings.bloom_sigma)?;
            composite::add_in_place(frame, &bloom, self.settings.bloom_strength)?;
        }
        Ok(())
    }
}

const GLOW_BINS: usize = 3;

/// Dashes sharing one glow blur.
struct GlowBin<'a> {
    /// Mean glow of the members.
    glow: f64,
    dashes: Vec<&'a Dash>,
}

/// Split `dashes` into up to [`GLOW_BINS`] equal-width glow ranges so each
/// range is blurred once. Empty ranges are dropped.
fn glow_bins(dashes: &[Dash]) -> Vec<GlowBin<'_>> {
    let lo = dashes.iter().map(|d| d.glow).fold(f64::INFINITY, f64::min);
    let hi = dashes.iter().map(|d| d.glow).fold(f64::NEG_INFINITY, f64::max);
    let span = hi - lo;

    let mut bins: Vec<Vec<&Dash>> = vec![Vec::new(); GLOW_BINS];
    for d in dashes {
        let i = if span > 0.0 {
            (((d.glow - lo) / span * GLOW_BINS as f64) as usize).min(GLOW_BINS - 1)
        } else {
            0
        };
        bins[i].push(d);
    }
    bins.into_iter()
        .filter(|b| !b.is_empty())
        .map(|dashes| GlowBin {
            glow: dashes.iter().map(|d| d.glow).sum::<f64>() / dashes.len() as f64,
            dashes,
        })
        .collect()
}

fn surface_size(viewport: Viewport) -> ScrollreelResult<(u16, u16)> {
    let w: u16 = viewport
        .width
        .try_into()
        .map_err(|_| ScrollreelError::evaluation("surface width exceeds u16"))?;
    let h: u16 = viewport
        .height
        .try_into()
        .map_err(|_| ScrollreelError::evaluation("surface height exceeds u16"))?;
    if w == 0 || h == 0 {
        return Err(ScrollreelError::evaluation("surface must be non-empty"));
    }
    Ok((w, h))
}

fn render_layer(w: u16, h: u16, draw: impl FnOnce(&mut vello_cpu::RenderContext)) -> vello_cpu::Pixmap {
    let mut pixmap = vello_cpu::Pixmap::new(w, h);
    let mut ctx = vello_cpu::RenderContext::new(w, h);
    draw(&mut ctx);
    ctx.flush();
    ctx.render_to_pixmap(&mut pixmap);
    pixmap
}

#[derive(Default)]
struct Glyphs {
    engine: Option<TextEngine>,
    warned: bool,
}

impl Glyphs {
    fn available(&mut self) -> bool {
        if self.engine.is_none() && !self.warned {
            tracing::warn!("no font configured; text nodes are not drawn");
            self.warned = true;
        }
        self.engine.is_some()
    }
}

/// Returns `false` when the layer was skipped.
#[allow(clippy::too_many_arguments)]
fn draw_layer(
    scene: &Scene,
    id: NodeId,
    fit: Affine,
    device_scale: f64,
    w: u16,
    h: u16,
    glyphs: &mut Glyphs,
    frame: &mut [u8],
) -> ScrollreelResult<bool> {
    let Some(node) = scene.get(id) else {
        return Ok(false);
    };
    let opacity = node.style.opacity.clamp(0.0, 1.0);
    if opacity <= 0.0 || !paints_anything(scene, node, glyphs) {
        return Ok(false);
    }

    let mut layer = render_layer(w, h, |ctx| draw_node(ctx, scene, node, fit, 1.0, glyphs));
    let sigma = node.style.blur * device_scale;
    if sigma > 0.0 {
        blur::blur_in_place(layer.data_as_u8_slice_mut(), u32::from(w), u32::from(h), sigma)?;
    }
    composite::over_in_place(frame, layer.data_as_u8_slice(), opacity as f32)?;
    Ok(true)
}

fn paints_anything(scene: &Scene, node: &Node, glyphs: &mut Glyphs) -> bool {
    let own = match node.shape {
        Shape::Group | Shape::Camera { .. } => false,
        Shape::Text { .. } => node.style.fill.is_some() && glyphs.available(),
        _ => true,
    };
    own || node
        .children
        .iter()
        .filter_map(|&c| scene.get(c))
        .any(|c| c.style.opacity > 0.0 && paints_anything(scene, c, glyphs))
}

/// `alpha` overrides the node's own opacity (layer roots composite theirs).
fn draw_node(
    ctx: &mut vello_cpu::RenderContext,
    scene: &Scene,
    node: &Node,
    parent: Affine,
    alpha: f64,
    glyphs: &mut Glyphs,
) {
    if alpha <= 0.0 {
        return;
    }
    let xf = parent * node.transform.to_affine();
    let grouped = !node.children.is_empty() && alpha < 1.0;
    if grouped {
        ctx.push_opacity_layer(alpha as f32);
    }
    let leaf_alpha = if grouped { 1.0 } else { alpha };
    paint_shape(ctx, node, xf, leaf_alpha, glyphs);
    for child in node.children.iter().filter_map(|&c| scene.get(c)) {
        draw_node(ctx, scene, child, xf, child.style.opacity.clamp(0.0, 1.0), glyphs);
    }
    if grouped {
        ctx.pop_layer();
    }
}

fn paint_shape(
    ctx: &mut vello_cpu::RenderContext,
    node: &Node,
    xf: Affine,
    alpha: f64,
    glyphs: &mut Glyphs,
) {
    let style = &node.style;
    if let Shape::Text {
        x,
        y,
        content,
        anchor,
        size,
    } = &node.shape
    {
        if let Some(fill) = style.fill
            && let Some(engine) = glyphs.engine.as_mut()
        {
            paint_text(ctx, engine, (*x, *y), content, *anchor, *size, xf, fill.with_opacity(alpha));
        }
        return;
    }
    ctx.set_transform(affine_to_cpu(xf));

    if let Some(fill) = style.fill
        && let Some(path) = fill_path(&node.shape)
    {
        ctx.set_paint(color_to_cpu(fill.with_opacity(alpha)));
        ctx.fill_path(&bezpath_to_cpu(&path));
    }

    if let Some(stroke) = style.stroke
        && style.stroke_width > 0.0
        && let Some(outline) = stroke_outline(&node.shape, style)
    {
        let mut s = vello_cpu::kurbo::Stroke::new(style.stroke_width);
        if style.round_caps {
            s = s.with_caps(vello_cpu::kurbo::Cap::Round);
        }
        ctx.set_stroke(s);
        ctx.set_paint(color_to_cpu(stroke.with_opacity(alpha)));
        ctx.stroke_path(&bezpath_to_cpu(&outline.to_path()));
    }
}

/// `(x, y)` is the anchor point on the first baseline.
#[allow(clippy::too_many_arguments)]
fn paint_text(
    ctx: &mut vello_cpu::RenderContext,
    engine: &mut TextEngine,
    (x, y): (f64, f64),
    content: &str,
    anchor: TextAnchor,
    size: f64,
    xf: Affine,
    color: Rgba8,
) {
    let Some(shaped) = engine.shape(content, size as f32) else {
        return;
    };
    let align = match anchor {
        TextAnchor::Start => 0.0,
        TextAnchor::Middle => 0.5,
        TextAnchor::End => 1.0,
    };
    let origin = Affine::translate((x - align * shaped.width, y - shaped.baseline));
    ctx.set_transform(affine_to_cpu(xf * origin));
    ctx.set_paint(color_to_cpu(color));

    for line in shaped.layout.lines() {
        for item in line.items() {
            let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                continue;
            };
            let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                id: g.id,
                x: g.x,
                y: g.y,
            });
            ctx.glyph_run(shaped.font)
                .font_size(run.run().font_size())
                .fill_glyphs(glyphs);
        }
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
