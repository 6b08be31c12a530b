use crate::{
    foundation::core::{Point, Rgba8},
    scene::{
        grid::{Grid, create_grid},
        model::{NodeId, NodeSpec, Scene, Shape},
    },
};

/// Logical drawing space of the narrative layer; fitted into the viewport at render time.
pub const VIEW_WIDTH: f64 = 1000.0;
pub const VIEW_HEIGHT: f64 = 800.0;
pub const CENTER: Point = Point::new(500.0, 400.0);

pub const NARRATIVE_LINES: usize = 40;
pub const WINDOW_PITCH_X: f64 = 25.0;
pub const WINDOW_PITCH_Y: f64 = 30.0;
pub const REPORT_BASELINE: f64 = 370.0;

/// Class shared by the layers that blur out at the logo payoff.
pub const NARRATIVE_ELEMENT: &str = "narrative-element";

/// Flat: 2D dash particles, 70-unit timeline. Depth: 3D point cloud with a
/// timeline-driven camera, 60-unit timeline.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    #[default]
    Flat,
    Depth,
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Palette {
    pub accent: Rgba8,
    pub particle: Rgba8,
    pub ink: Rgba8,
    pub glow: Rgba8,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            accent: Rgba8::rgb(0, 163, 255),
            particle: Rgba8::rgb(0, 242, 255),
            ink: Rgba8::rgb(226, 236, 255),
            glow: Rgba8::rgb(40, 110, 255),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tower {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Tower {
    pub fn columns(&self) -> usize {
        (self.w / WINDOW_PITCH_X).floor().max(0.0) as usize
    }

    pub fn rows(&self) -> usize {
        (self.h / WINDOW_PITCH_Y).floor().max(0.0) as usize
    }

    pub fn window_count(&self) -> usize {
        self.columns() * self.rows()
    }
}

pub const TOWERS: [Tower; 3] = [
    Tower {
        x: 350.0,
        y: 400.0,
        w: 70.0,
        h: 200.0,
    },
    Tower {
        x: 450.0,
        y: 320.0,
        w: 120.0,
        h: 280.0,
    },
    Tower {
        x: 600.0,
        y: 420.0,
        w: 100.0,
        h: 180.0,
    },
];

/// Typed handles to every node the timeline animates.
#[derive(Clone, Debug, serde::Serialize)]
pub struct Handles {
    pub central_glow: NodeId,
    pub line_system: NodeId,
    pub lines: Vec<NodeId>,
    pub node_system: NodeId,
    pub node_squares: Vec<NodeId>,
    pub grid_layers: Vec<Grid>,
    pub chip_group: NodeId,
    pub bot_card: NodeId,
    /// Eyes, pupils, mouth in document order.
    pub bot_features: Vec<NodeId>,
    pub scanner_line: NodeId,
    pub building_group: NodeId,
    pub building_outlines: Vec<NodeId>,
    pub building_windows: NodeId,
    pub windows: Vec<NodeId>,
    pub report_group: NodeId,
    pub report_base: NodeId,
    pub report_bars: Vec<NodeId>,
    pub report_pie: NodeId,
    pub pie_slices: Vec<NodeId>,
    pub pipeline_nodes: Vec<NodeId>,
    pub pipeline_links: Vec<NodeId>,
    /// Pipeline captions and workflow captions in document order.
    pub workflow_labels: Vec<NodeId>,
    pub workflow_icons: Vec<NodeId>,
    pub narrative_elements: Vec<NodeId>,
    pub logo_payoff: NodeId,
    pub camera: Option<NodeId>,
}

/// Scene plus handles: the single context object every subsystem borrows from.
#[derive(Clone, Debug)]
pub struct Stage {
    pub variant: Variant,
    pub scene: Scene,
    pub handles: Handles,
}

/// Build every primitive the narrative needs. Revealable nodes start hidden.
#[tracing::instrument(skip(palette))]
pub fn build_stage(variant: Variant, palette: &Palette) -> Stage {
    let mut scene = Scene::new();
    let accent = palette.accent;
    let ink = palette.ink;

    let camera = match variant {
        Variant::Flat => None,
        Variant::Depth => Some(scene.add(
            Scene::ROOT,
            NodeSpec::new(Shape::Camera {
                z: 30.0,
                fov_deg: 75.0,
            })
            .named("camera"),
        )),
    };

    let central_glow = scene.add(
        Scene::ROOT,
        NodeSpec::circle(CENTER.x, CENTER.y, 220.0)
            .named("central-glow")
            .fill(palette.glow.with_opacity(0.18))
            .opacity(0.6)
            .origin(CENTER.x, CENTER.y),
    );

    let mut grid_containers = Vec::with_capacity(4);
    for i in 1..=4 {
        grid_containers.push(
            scene.add(
                Scene::ROOT,
                NodeSpec::group()
                    .named(format!("grid-layer-{i}"))
                    .class("grid-layer")
                    .class(NARRATIVE_ELEMENT)
                    .origin(CENTER.x, CENTER.y),
            ),
        );
    }
    let grid_layers: Vec<Grid> = grid_containers
        .into_iter()
        .map(|c| create_grid(&mut scene, c, accent))
        .collect();

    let line_system = scene.add(
        Scene::ROOT,
        NodeSpec::group()
            .named("line-system")
            .class(NARRATIVE_ELEMENT)
            .origin(CENTER.x, CENTER.y),
    );
    let lines = (0..NARRATIVE_LINES)
        .map(|_| {
            scene.add(
                line_system,
                NodeSpec::line(CENTER.x, CENTER.y, CENTER.x, CENTER.y)
                    .class("narrative-line")
                    .stroke(accent, 1.5)
                    .round_caps()
                    .origin(CENTER.x, CENTER.y),
            )
        })
        .collect();

    let node_system = scene.add(
        Scene::ROOT,
        NodeSpec::group()
            .named("node-system")
            .class(NARRATIVE_ELEMENT)
            .origin(CENTER.x, CENTER.y),
    );
    let mut node_squares = Vec::with_capacity(36);
    for x in 0..6 {
        for y in 0..6 {
            node_squares.push(
                scene.add(
                    node_system,
                    NodeSpec::rect(345.0 + x as f64 * 60.0, 245.0 + y as f64 * 60.0, 10.0, 10.0)
                        .class("node-square")
                        .fill(accent)
                        .opacity(0.0)
                        .origin(CENTER.x, CENTER.y),
                ),
            );
        }
    }

    let chip_group = build_chip(&mut scene, accent);
    let (bot_card, bot_features) = build_bot(&mut scene, accent, ink);

    let scanner_line = scene.add(
        Scene::ROOT,
        NodeSpec::line(300.0, 0.0, 700.0, 0.0)
            .named("scanner-line")
            .class("scanner-line")
            .stroke(palette.particle, 2.0)
            .opacity(0.0),
    );

    let building = build_building(&mut scene, accent);
    let report = build_report(&mut scene, accent, ink);

    let logo_payoff = scene.add(
        Scene::ROOT,
        NodeSpec::group()
            .named("logo-payoff")
            .opacity(0.0)
            .scale(0.8)
            .origin(CENTER.x, CENTER.y),
    );
    scene.add(
        logo_payoff,
        NodeSpec::rect(440.0, 340.0, 120.0, 120.0)
            .rounded(24.0)
            .stroke(accent, 3.0),
    );
    scene.add(
        logo_payoff,
        NodeSpec::new(diamond(CENTER.x, CENTER.y, 36.0)).fill(palette.particle),
    );
    scene.add(
        logo_payoff,
        NodeSpec::text(CENTER.x, 500.0, "INSIGHT")
            .font_size(28.0)
            .fill(ink),
    );

    let narrative_elements = scene.with_class(NARRATIVE_ELEMENT);
    let handles = Handles {
        central_glow,
        line_system,
        lines,
        node_system,
        node_squares,
        grid_layers,
        chip_group,
        bot_card,
        bot_features,
        scanner_line,
        building_group: building.group,
        building_outlines: building.outlines,
        building_windows: building.windows_group,
        windows: building.windows,
        report_group: report.group,
        report_base: report.base,
        report_bars: report.bars,
        report_pie: report.pie,
        pie_slices: report.pie_slices,
        pipeline_nodes: report.pipeline_nodes,
        pipeline_links: report.pipeline_links,
        workflow_labels: report.labels,
        workflow_icons: report.icons,
        narrative_elements,
        logo_payoff,
        camera,
    };

    tracing::debug!(nodes = scene.len(), "stage built");
    Stage {
        variant,
        scene,
        handles,
    }
}

fn diamond(cx: f64, cy: f64, r: f64) -> Shape {
    Shape::Path {
        points: vec![
            Point::new(cx - r, cy),
            Point::new(cx, cy - r),
            Point::new(cx + r, cy),
            Point::new(cx, cy + r),
        ],
        closed: true,
    }
}

fn build_chip(scene: &mut Scene, accent: Rgba8) -> NodeId {
    let chip = scene.add(
        Scene::ROOT,
        NodeSpec::group()
            .named("chip-group")
            .class(NARRATIVE_ELEMENT)
            .origin(CENTER.x, CENTER.y),
    );
    scene.add(
        chip,
        NodeSpec::rect(476.0, 376.0, 48.0, 48.0)
            .rounded(6.0)
            .stroke(accent, 2.0),
    );
    for i in 0..3 {
        let off = 486.0 + i as f64 * 14.0;
        scene.add(chip, NodeSpec::line(off, 366.0, off, 376.0).stroke(accent, 2.0));
        scene.add(chip, NodeSpec::line(off, 424.0, off, 434.0).stroke(accent, 2.0));
    }
    chip
}

fn build_bot(scene: &mut Scene, accent: Rgba8, ink: Rgba8) -> (NodeId, Vec<NodeId>) {
    let card = scene.add(
        Scene::ROOT,
        NodeSpec::group()
            .named("bot-card")
            .class(NARRATIVE_ELEMENT)
            .opacity(0.0)
            .scale(0.8)
            .origin(CENTER.x, CENTER.y),
    );
    scene.add(
        card,
        NodeSpec::rect(420.0, 300.0, 160.0, 200.0)
            .rounded(16.0)
            .stroke(accent, 2.0)
            .fill(accent.with_opacity(0.08)),
    );

    let mut features = Vec::with_capacity(5);
    for cx in [465.0, 535.0] {
        features.push(
            scene.add(
                card,
                NodeSpec::circle(cx, 370.0, 12.0)
                    .class("bot-eye")
                    .stroke(accent, 2.0)
                    .opacity(0.0)
                    .scale(0.0)
                    .origin(cx, 370.0),
            ),
        );
    }
    for cx in [465.0, 535.0] {
        features.push(
            scene.add(
                card,
                NodeSpec::circle(cx, 370.0, 5.0)
                    .class("bot-pupil")
                    .fill(ink)
                    .opacity(0.0)
                    .scale(0.0)
                    .origin(cx, 370.0),
            ),
        );
    }
    features.push(
        scene.add(
            card,
            NodeSpec::new(Shape::Path {
                points: vec![
                    Point::new(470.0, 430.0),
                    Point::new(500.0, 445.0),
                    Point::new(530.0, 430.0),
                ],
                closed: false,
            })
            .class("bot-mouth")
            .stroke(accent, 2.0)
            .round_caps()
            .opacity(0.0)
            .scale(0.0)
            .origin(500.0, 437.0),
        ),
    );
    (card, features)
}

struct BuildingHandles {
    group: NodeId,
    outlines: Vec<NodeId>,
    windows_group: NodeId,
    windows: Vec<NodeId>,
}

fn build_building(scene: &mut Scene, accent: Rgba8) -> BuildingHandles {
    let group = scene.add(
        Scene::ROOT,
        NodeSpec::group()
            .named("building-group")
            .class(NARRATIVE_ELEMENT)
            .opacity(0.0)
            .origin(CENTER.x, CENTER.y),
    );
    let outlines = TOWERS
        .iter()
        .map(|t| {
            scene.add(
                group,
                NodeSpec::rect(t.x, t.y, t.w, t.h)
                    .class("building-outline")
                    .stroke(accent, 1.5)
                    .opacity(0.0)
                    .draw_on(2.0 * (t.w + t.h)),
            )
        })
        .collect();

    let windows_group = scene.add(group, NodeSpec::group().named("building-windows"));
    let mut windows = Vec::new();
    for t in &TOWERS {
        for r in 0..t.rows() {
            for c in 0..t.columns() {
                windows.push(
                    scene.add(
                        windows_group,
                        NodeSpec::rect(
                            t.x + 10.0 + c as f64 * WINDOW_PITCH_X,
                            t.y + 15.0 + r as f64 * WINDOW_PITCH_Y,
                            8.0,
                            8.0,
                        )
                        .fill(accent)
                        .opacity(0.0),
                    ),
                );
            }
        }
    }

    BuildingHandles {
        group,
        outlines,
        windows_group,
        windows,
    }
}

struct ReportHandles {
    group: NodeId,
    base: NodeId,
    bars: Vec<NodeId>,
    pie: NodeId,
    pie_slices: Vec<NodeId>,
    pipeline_nodes: Vec<NodeId>,
    pipeline_links: Vec<NodeId>,
    labels: Vec<NodeId>,
    icons: Vec<NodeId>,
}

const PIPELINE: [(f64, f64, &str); 3] = [(40.0, 0.0, "DATA"), (160.0, 0.0, "ML/AI"), (280.0, 0.0, "ROI")];
const WORKFLOW: [(f64, &str); 3] = [(80.0, "CLEANSE"), (160.0, "TRAIN"), (240.0, "DEPLOY")];
const PIE_CIRCUMFERENCE: f64 = 100.0;

fn build_report(scene: &mut Scene, accent: Rgba8, ink: Rgba8) -> ReportHandles {
    let group = scene.add(
        Scene::ROOT,
        NodeSpec::group()
            .named("report-group")
            .class(NARRATIVE_ELEMENT)
            .opacity(0.0)
            .scale(0.8)
            .origin(CENTER.x, CENTER.y),
    );
    let base = scene.add(
        group,
        NodeSpec::rect(330.0, 220.0, 340.0, 380.0)
            .rounded(12.0)
            .class("report-base")
            .stroke(accent.with_opacity(0.6), 1.0)
            .fill(accent.with_opacity(0.05))
            .opacity(0.0),
    );

    let bars_group = scene.add(group, NodeSpec::group().named("report-bars"));
    let bars = (0..6)
        .map(|i| {
            scene.add(
                bars_group,
                NodeSpec::rect(550.0 + i as f64 * 20.0, REPORT_BASELINE, 12.0, 0.0)
                    .class("report-item")
                    .fill(accent),
            )
        })
        .collect();

    // r = 100 / 2pi so a full-length dash covers the circle exactly.
    let pie_r = PIE_CIRCUMFERENCE / std::f64::consts::TAU;
    let pie = scene.add(
        group,
        NodeSpec::group()
            .named("report-pie")
            .scale(0.0)
            .origin(420.0, 320.0),
    );
    scene.add(
        pie,
        NodeSpec::circle(420.0, 320.0, pie_r * 2.0).fill(accent.with_opacity(0.2)),
    );
    let pie_slices = vec![scene.add(
        pie,
        NodeSpec::circle(420.0, 320.0, pie_r)
            .class("pie-slice")
            .stroke(accent, pie_r * 2.0)
            .draw_on(PIE_CIRCUMFERENCE),
    )];

    let pipeline = scene.add(
        group,
        NodeSpec::group().named("ml-pipeline").translate(340.0, 470.0),
    );
    let mut pipeline_nodes = Vec::with_capacity(PIPELINE.len());
    let mut pipeline_links = Vec::with_capacity(PIPELINE.len() - 1);
    let mut labels = Vec::new();
    for (i, &(x, y, label)) in PIPELINE.iter().enumerate() {
        if let Some(&(nx, ny, _)) = PIPELINE.get(i + 1) {
            let (x1, x2) = (x + 15.0, nx - 15.0);
            pipeline_links.push(
                scene.add(
                    pipeline,
                    NodeSpec::line(x1, y, x2, ny)
                        .class("pipeline-link")
                        .stroke(accent, 2.0)
                        .opacity(0.0)
                        .draw_on(((x2 - x1).powi(2) + (ny - y).powi(2)).sqrt()),
                ),
            );
        }
        pipeline_nodes.push(
            scene.add(
                pipeline,
                NodeSpec::rect(x - 15.0, y - 15.0, 30.0, 30.0)
                    .rounded(6.0)
                    .class("pipeline-node")
                    .stroke(accent, 2.0)
                    .fill(accent.with_opacity(0.15))
                    .opacity(0.0)
                    .origin(x, y),
            ),
        );
        labels.push(
            scene.add(
                pipeline,
                NodeSpec::text(x, y + 35.0, label)
                    .class("workflow-label")
                    .fill(ink)
                    .opacity(0.0),
            ),
        );
    }

    let icons_group = scene.add(
        group,
        NodeSpec::group().named("workflow-icons").translate(340.0, 540.0),
    );
    let mut icons = Vec::with_capacity(WORKFLOW.len());
    for &(x, label) in &WORKFLOW {
        let g = scene.add(icons_group, NodeSpec::group().opacity(0.0));
        scene.add(
            g,
            NodeSpec::new(diamond(x, 0.0, 10.0))
                .class("workflow-icon")
                .stroke(accent, 2.0),
        );
        labels.push(
            scene.add(
                g,
                NodeSpec::text(x, 25.0, label)
                    .class("workflow-label")
                    .fill(ink)
                    .opacity(0.0),
            ),
        );
        icons.push(g);
    }

    ReportHandles {
        group,
        base,
        bars,
        pie,
        pie_slices,
        pipeline_nodes,
        pipeline_links,
        labels,
        icons,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/builder.rs"]
mod tests;
