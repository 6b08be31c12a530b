use std::path::Path;

use super::*;
use crate::scene::{builder::Palette, model::NodeSpec};

const BLACK: Rgba8 = Rgba8::rgb(0, 0, 0);

fn viewport() -> Viewport {
    Viewport::new(100, 80).unwrap()
}

fn no_field() -> MotionField {
    MotionField::Dashes(DashField::new(0, 100.0, 80.0, 1))
}

fn render(scene: &Scene, field: &MotionField) -> FrameRGBA {
    let palette = Palette::default();
    let view = FrameView {
        viewport: viewport(),
        scene,
        field,
        palette: &palette,
        clear: BLACK,
    };
    CpuBackend::new(RenderSettings::default()).render(&view).unwrap()
}

fn px(frame: &FrameRGBA, x: u32, y: u32) -> [u8; 4] {
    let i = ((y * frame.width + x) * 4) as usize;
    [frame.data[i], frame.data[i + 1], frame.data[i + 2], frame.data[i + 3]]
}

#[test]
fn empty_scene_is_clear_color() {
    let frame = render(&Scene::new(), &no_field());
    assert_eq!((frame.width, frame.height), (100, 80));
    assert!(frame.premultiplied);
    assert!(frame.data.chunks_exact(4).all(|p| *p == [0, 0, 0, 255]));
}

#[test]
fn filled_rect_lands_in_fitted_viewbox() {
    let mut scene = Scene::new();
    scene.add(
        Scene::ROOT,
        NodeSpec::rect(400.0, 300.0, 200.0, 200.0).fill(Rgba8::rgb(255, 0, 0)),
    );
    let frame = render(&scene, &no_field());
    assert_eq!(px(&frame, 50, 40), [255, 0, 0, 255]);
    assert_eq!(px(&frame, 10, 10), [0, 0, 0, 255]);
}

#[test]
fn group_opacity_scales_the_layer() {
    let mut scene = Scene::new();
    let g = scene.add(Scene::ROOT, NodeSpec::group().opacity(0.5));
    scene.add(
        g,
        NodeSpec::rect(0.0, 0.0, 1000.0, 800.0).fill(Rgba8::rgb(255, 255, 255)),
    );
    let frame = render(&scene, &no_field());
    let [r, _, _, a] = px(&frame, 50, 40);
    assert_eq!(a, 255);
    assert!((126..=129).contains(&r), "r = {r}");
}

#[test]
fn invisible_layers_are_skipped() {
    let mut scene = Scene::new();
    scene.add(
        Scene::ROOT,
        NodeSpec::rect(0.0, 0.0, 1000.0, 800.0)
            .fill(Rgba8::rgb(255, 255, 255))
            .opacity(0.0),
    );
    scene.add(Scene::ROOT, NodeSpec::text(500.0, 400.0, "label").fill(Rgba8::rgb(255, 255, 255)));
    let frame = render(&scene, &no_field());
    assert!(frame.data.chunks_exact(4).all(|p| *p == [0, 0, 0, 255]));
}

#[test]
fn hidden_draw_on_outline_paints_nothing() {
    let mut scene = Scene::new();
    let id = scene.add(
        Scene::ROOT,
        NodeSpec::rect(100.0, 100.0, 800.0, 600.0)
            .stroke(Rgba8::rgb(255, 255, 255), 40.0)
            .draw_on(2800.0),
    );
    let frame = render(&scene, &no_field());
    assert!(frame.data.chunks_exact(4).all(|p| *p == [0, 0, 0, 255]));

    scene.set_attr(id, crate::scene::model::Attr::DashOffset, 0.0);
    let frame = render(&scene, &no_field());
    assert_eq!(px(&frame, 50, 10)[0], 255);
}

#[test]
fn blur_spreads_a_layer() {
    let mut scene = Scene::new();
    let id = scene.add(
        Scene::ROOT,
        NodeSpec::rect(450.0, 350.0, 100.0, 100.0).fill(Rgba8::rgb(255, 255, 255)),
    );
    let sharp = render(&scene, &no_field());
    assert_eq!(px(&sharp, 42, 40)[0], 0);

    scene.set_attr(id, crate::scene::model::Attr::Blur, 30.0);
    let soft = render(&scene, &no_field());
    assert!(px(&soft, 42, 40)[0] > 0);
    assert!(px(&soft, 50, 40)[0] < 255);
}

#[test]
fn dashes_draw_over_the_background() {
    let field = MotionField::Dashes(DashField::new(40, 100.0, 80.0, 3));
    let frame = render(&Scene::new(), &field);
    assert!(frame.data.chunks_exact(4).any(|p| p[1] > 0));
}

#[test]
fn cloud_points_render_with_bloom() {
    let mut cloud = PointCloud::new(0, 100.0, 80.0, 1);
    cloud.set_camera(30.0, 0.0, 75.0);
    let field = MotionField::Cloud(cloud);
    let empty = render(&Scene::new(), &field);
    assert!(empty.data.chunks_exact(4).all(|p| *p == [0, 0, 0, 255]));

    let field = MotionField::Cloud(PointCloud::new(500, 100.0, 80.0, 1));
    let frame = render(&Scene::new(), &field);
    assert!(frame.data.chunks_exact(4).any(|p| p[2] > 0));
}

fn font() -> TextEngine {
    TextEngine::from_file(Path::new(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/tests/data/fonts/DejaVuSans.ttf"
    )))
    .unwrap()
}

fn render_with_font(scene: &Scene) -> FrameRGBA {
    let palette = Palette::default();
    let field = no_field();
    let view = FrameView {
        viewport: viewport(),
        scene,
        field: &field,
        palette: &palette,
        clear: BLACK,
    };
    CpuBackend::new(RenderSettings::default())
        .with_text(font())
        .render(&view)
        .unwrap()
}

fn lit_columns(frame: &FrameRGBA) -> Vec<u32> {
    (0..frame.height)
        .flat_map(|y| (0..frame.width).map(move |x| (x, y)))
        .filter(|&(x, y)| px(frame, x, y)[0] > 0)
        .map(|(x, _)| x)
        .collect()
}

#[test]
fn text_paints_with_a_font() {
    let mut scene = Scene::new();
    scene.add(
        Scene::ROOT,
        NodeSpec::text(500.0, 400.0, "DEPLOY")
            .font_size(120.0)
            .fill(Rgba8::rgb(255, 255, 255)),
    );
    let cols = lit_columns(&render_with_font(&scene));
    assert!(cols.len() > 20, "painted {} pixels", cols.len());
    // middle anchor straddles the anchor column
    assert!(cols.iter().any(|&x| x < 45));
    assert!(cols.iter().any(|&x| x > 55));

    // no font: same scene draws nothing and does not fail
    let frame = render(&scene, &no_field());
    assert!(frame.data.chunks_exact(4).all(|p| *p == [0, 0, 0, 255]));
}

#[test]
fn text_anchor_picks_the_side() {
    let white = Rgba8::rgb(255, 255, 255);
    let mut start = Scene::new();
    start.add(
        Scene::ROOT,
        NodeSpec::text(500.0, 400.0, "DEPLOY")
            .anchor(TextAnchor::Start)
            .font_size(120.0)
            .fill(white),
    );
    let cols = lit_columns(&render_with_font(&start));
    assert!(!cols.is_empty());
    assert!(cols.iter().all(|&x| x >= 49), "{cols:?}");

    let mut end = Scene::new();
    end.add(
        Scene::ROOT,
        NodeSpec::text(500.0, 400.0, "DEPLOY")
            .anchor(TextAnchor::End)
            .font_size(120.0)
            .fill(white),
    );
    let cols = lit_columns(&render_with_font(&end));
    assert!(!cols.is_empty());
    assert!(cols.iter().all(|&x| x <= 51), "{cols:?}");
}

#[test]
fn text_sits_on_its_baseline() {
    let mut scene = Scene::new();
    scene.add(
        Scene::ROOT,
        NodeSpec::text(500.0, 400.0, "DEPLOY")
            .font_size(120.0)
            .fill(Rgba8::rgb(255, 255, 255)),
    );
    let frame = render_with_font(&scene);
    let rows: Vec<u32> = (0..frame.height)
        .filter(|&y| (0..frame.width).any(|x| px(&frame, x, y)[0] > 0))
        .collect();
    // capitals rise above the baseline (row 40) and Y has no descender
    // in DejaVu Sans
    assert!(rows.iter().any(|&y| y < 36));
    assert!(rows.iter().all(|&y| y <= 41), "{rows:?}");
}

fn dash(glow: f64) -> Dash {
    Dash {
        x: 10.0,
        y: 10.0,
        length: 20.0,
        width: DASH_WIDTH,
        vy: 1.0,
        opacity: 0.5,
        glow,
    }
}

#[test]
fn dashes_blur_with_their_own_glow_range() {
    let dashes = [dash(6.0), dash(6.5), dash(10.0), dash(14.0), dash(13.0)];
    let bins = glow_bins(&dashes);
    let summary: Vec<(f64, usize)> = bins.iter().map(|b| (b.glow, b.dashes.len())).collect();
    assert_eq!(summary, vec![(6.25, 2), (10.0, 1), (13.5, 2)]);

    // uniform glow collapses to one pass
    let same = [dash(8.0), dash(8.0)];
    let bins = glow_bins(&same);
    assert_eq!(bins.len(), 1);
    assert_eq!(bins[0].glow, 8.0);
}

#[test]
fn missing_font_warns_once() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    let mut glyphs = Glyphs::default();
    assert!(!glyphs.available());
    assert!(glyphs.warned);
    assert!(!glyphs.available());

    glyphs.engine = Some(font());
    assert!(glyphs.available());
}
