//! The narrative schedule: which nodes move, when, and how.

use crate::{
    animation::{ease::Ease, value::Value},
    scene::{
        builder::{CENTER, Handles, REPORT_BASELINE, Stage, Variant},
        grid::{GRID_BOTTOM, GRID_LEFT, GRID_PITCH, GRID_RIGHT, GRID_TOP},
        model::{Attr, NodeId},
    },
    timeline::{
        timeline::{Phase, Timeline},
        tween::{StaggerFrom, Tween},
    },
};

pub const FLAT_DURATION: f64 = 70.0;
pub const DEPTH_DURATION: f64 = 60.0;

/// Offsets the corner grids fly in from: top-left, top-right, bottom-left, bottom-right.
pub const CORNERS: [(f64, f64); 4] = [(-800.0, -600.0), (800.0, -600.0), (-800.0, 600.0), (800.0, 600.0)];

const POWER1_IN_OUT: Ease = Ease::InOutQuad;
const POWER2_IN_OUT: Ease = Ease::InOutCubic;
const POWER2_OUT: Ease = Ease::OutCubic;

pub fn author_timeline(stage: &Stage, seed: u64) -> Timeline {
    match stage.variant {
        Variant::Flat => author_flat(&stage.handles, seed),
        Variant::Depth => author_depth(&stage.handles, seed),
    }
}

/// Seven sections of ten units each.
pub fn author_flat(h: &Handles, seed: u64) -> Timeline {
    let mut tl = Timeline::new(FLAT_DURATION, seed);
    foundation(&mut tl, h, 0.0);
    chaos(&mut tl, h, 10.0);
    structure(&mut tl, h, 20.0);
    agent(&mut tl, h, 30.0);
    utilization(&mut tl, h, 40.0);
    value(&mut tl, h, 50.0, Phase::Value);
    logo(&mut tl, h, 60.0);
    tl
}

/// Six sections: the building scan is dropped and the camera follows the story.
pub fn author_depth(h: &Handles, seed: u64) -> Timeline {
    let mut tl = Timeline::new(DEPTH_DURATION, seed);
    let cam: Vec<NodeId> = h.camera.into_iter().collect();
    let dolly = |tl: &mut Timeline, at: f64, z: f64, y: f64, duration: f64| {
        tl.push(
            Tween::to(cam.iter().copied(), at, duration)
                .set(Attr::CameraZ, z)
                .set(Attr::TranslateY, y)
                .ease(POWER2_IN_OUT),
        );
    };

    dolly(&mut tl, 0.0, 26.0, 0.0, 8.0);
    foundation(&mut tl, h, 0.0);
    dolly(&mut tl, 10.0, 20.0, 2.0, 9.0);
    chaos(&mut tl, h, 10.0);
    dolly(&mut tl, 20.0, 16.0, 0.0, 8.0);
    structure(&mut tl, h, 20.0);
    dolly(&mut tl, 30.0, 12.0, -2.0, 9.0);
    agent(&mut tl, h, 30.0);
    dolly(&mut tl, 40.0, 20.0, 0.0, 9.0);
    value(&mut tl, h, 40.0, Phase::Value);
    dolly(&mut tl, 50.0, 34.0, 0.0, 8.0);
    logo(&mut tl, h, 50.0);
    tl
}

fn foundation(tl: &mut Timeline, h: &Handles, at: f64) {
    tl.add_label(Phase::Foundation, at);
    tl.push(
        Tween::to(h.lines[..3].iter().copied(), at, 8.0)
            .set(Attr::X1, CENTER.x)
            .set(Attr::Y1, CENTER.y)
            .set(Attr::X2, Value::per_index(|i, _| 500.0 + (i as f64 - 1.0) * 200.0))
            .set(Attr::Y2, Value::per_index(|i, _| 100.0 + i as f64 * 150.0))
            .ease(POWER2_IN_OUT),
    );
}

fn chaos(tl: &mut Timeline, h: &Handles, at: f64) {
    tl.add_label(Phase::Chaos, at);
    tl.push(
        Tween::to(h.lines.iter().copied(), at, 9.0)
            .set(Attr::X1, Value::random(0, |u| 300.0 + u * 400.0))
            .set(Attr::Y1, Value::random(1, |u| 200.0 + u * 400.0))
            .set(Attr::X2, Value::random(2, |u| 300.0 + u * 400.0))
            .set(Attr::Y2, Value::random(3, |u| 200.0 + u * 400.0))
            .set(Attr::Opacity, 0.6)
            .stagger(0.01)
            .ease(POWER1_IN_OUT),
    );
}

fn structure(tl: &mut Timeline, h: &Handles, at: f64) {
    tl.add_label(Phase::Structure, at);
    tl.push(
        Tween::to(h.lines[..6].iter().copied(), at, 3.0)
            .set(Attr::X1, GRID_LEFT)
            .set(Attr::Y1, Value::per_index(|i, _| GRID_TOP + i as f64 * GRID_PITCH))
            .set(Attr::X2, GRID_RIGHT)
            .set(Attr::Y2, Value::per_index(|i, _| GRID_TOP + i as f64 * GRID_PITCH))
            .ease(POWER2_OUT),
    );
    tl.push(
        Tween::to(h.lines[6..12].iter().copied(), at, 3.0)
            .set(Attr::X1, Value::per_index(|i, _| GRID_LEFT + i as f64 * GRID_PITCH))
            .set(Attr::Y1, GRID_TOP)
            .set(Attr::X2, Value::per_index(|i, _| GRID_LEFT + i as f64 * GRID_PITCH))
            .set(Attr::Y2, GRID_BOTTOM)
            .ease(POWER2_OUT),
    );
    tl.push(
        Tween::to(h.lines[12..].iter().copied(), at, 1.5)
            .set(Attr::Opacity, 0.0)
            .ease(POWER2_OUT),
    );
    tl.push(
        Tween::to(h.node_squares.iter().copied(), at + 2.0, 4.0)
            .set(Attr::Opacity, 0.8)
            .stagger(0.01)
            .ease(POWER2_OUT),
    );

    for (i, (grid, &(cx, cy))) in h.grid_layers.iter().zip(CORNERS.iter()).enumerate() {
        tl.push(
            Tween::to([grid.container], at + 2.0 + i as f64 * 0.4, 5.0)
                .from_to(Attr::TranslateX, cx, 0.0)
                .from_to(Attr::TranslateY, cy, 0.0)
                .from_to(Attr::Opacity, 0.0, 0.5)
                .from_to(Attr::Scale, 0.5, 1.0)
                .from_to(Attr::Rotation, 45.0, 0.0)
                .ease(POWER2_OUT),
        );
    }
}

fn agent(tl: &mut Timeline, h: &Handles, at: f64) {
    tl.add_label(Phase::Agent, at);

    let mut fading: Vec<NodeId> = h.node_squares.clone();
    fading.extend_from_slice(&h.lines[..12]);
    fading.push(h.line_system);
    fading.extend(h.grid_layers.iter().map(|g| g.container));
    fading.push(h.chip_group);
    tl.push(
        Tween::to(fading, at, 2.0)
            .set(Attr::Opacity, 0.0)
            .set(Attr::Scale, 0.8)
            .ease(POWER2_IN_OUT),
    );

    tl.push(
        Tween::to([h.bot_card], at + 1.0, 2.5)
            .set(Attr::Opacity, 1.0)
            .set(Attr::Scale, 1.0)
            .ease(POWER2_OUT),
    );
    tl.push(
        Tween::to(h.bot_features.iter().copied(), at + 2.0, 1.5)
            .from_to(Attr::Opacity, 0.0, 1.0)
            .from_to(Attr::Scale, 0.0, 1.0)
            .stagger(0.15)
            .ease(Ease::out_back(1.7)),
    );
    tl.push(
        Tween::to([h.bot_card], at + 6.0, 2.0)
            .set(Attr::RotationX, 90.0)
            .set(Attr::ScaleY, 0.01)
            .set(Attr::Opacity, 0.0)
            .ease(POWER2_IN_OUT),
    );
    tl.push(
        Tween::to([h.scanner_line], at + 7.0, 0.5)
            .from_to(Attr::Opacity, 0.0, 1.0)
            .from_to(Attr::TranslateY, 200.0, 200.0),
    );
    tl.push(Tween::to([h.building_group], at + 7.5, 0.5).set(Attr::Opacity, 1.0));
    tl.push(
        Tween::to(h.building_outlines.iter().copied(), at + 8.0, 1.5)
            .set(Attr::Opacity, 1.0)
            .set(Attr::DashOffset, 0.0)
            .stagger(0.3)
            .ease(POWER2_IN_OUT),
    );
}

fn utilization(tl: &mut Timeline, h: &Handles, at: f64) {
    tl.add_label(Phase::Utilization, at);
    tl.push(
        Tween::to([h.scanner_line], at, 8.0)
            .set(Attr::TranslateY, 600.0)
            .ease(Ease::Linear),
    );
    tl.push(
        Tween::to(h.windows.iter().copied(), at + 2.0, 6.0)
            .set(Attr::Opacity, 0.8)
            .stagger_from(0.01, StaggerFrom::Top),
    );
}

fn value(tl: &mut Timeline, h: &Handles, at: f64, label: Phase) {
    tl.add_label(label, at);
    tl.push(
        Tween::to([h.scanner_line], at, 1.5)
            .set(Attr::Opacity, 0.0)
            .ease(POWER2_IN_OUT),
    );
    tl.push(
        Tween::to([h.building_group], at, 2.0)
            .set(Attr::Opacity, 0.0)
            .ease(POWER2_IN_OUT),
    );
    tl.push(
        Tween::to([h.report_group], at + 1.0, 2.5)
            .from_to(Attr::TranslateX, 0.0, 0.0)
            .from_to(Attr::Opacity, 0.0, 1.0)
            .from_to(Attr::Scale, 0.8, 1.0)
            .ease(POWER2_OUT),
    );
    tl.push(Tween::to([h.report_base], at + 2.0, 1.5).set(Attr::Opacity, 1.0));
    tl.push(
        Tween::to(h.report_bars.iter().copied(), at + 3.0, 2.0)
            .set(Attr::Height, Value::random(0, |u| 20.0 + u * 60.0))
            .set(
                Attr::Y,
                Value::random(0, |u| REPORT_BASELINE - (20.0 + u * 60.0)),
            )
            .stagger(0.1)
            .ease(POWER2_OUT),
    );
    tl.push(
        Tween::to([h.report_pie], at + 4.0, 2.0)
            .set(Attr::Scale, 1.0)
            .ease(Ease::out_back(1.7)),
    );
    tl.push(
        Tween::to(h.pie_slices.iter().copied(), at + 4.0, 2.0)
            .set(Attr::DashOffset, 50.0)
            .ease(POWER2_IN_OUT),
    );
    tl.push(
        Tween::to(h.pipeline_nodes.iter().copied(), at + 5.0, 1.5)
            .set(Attr::Opacity, 1.0)
            .set(Attr::Scale, 1.0)
            .stagger(0.1)
            .ease(POWER2_OUT),
    );
    tl.push(
        Tween::to(h.pipeline_links.iter().copied(), at + 5.0, 1.5)
            .set(Attr::Opacity, 0.4)
            .set(Attr::DashOffset, 0.0)
            .stagger(0.1)
            .ease(POWER2_OUT),
    );
    tl.push(
        Tween::to(h.workflow_labels.iter().copied(), at + 5.0, 1.5)
            .set(Attr::Opacity, 1.0)
            .stagger(0.05),
    );
    tl.push(
        Tween::to(h.workflow_icons.iter().copied(), at + 6.0, 2.0)
            .set(Attr::Opacity, 1.0)
            .stagger(0.2)
            .ease(POWER2_OUT),
    );
}

fn logo(tl: &mut Timeline, h: &Handles, at: f64) {
    tl.add_label(Phase::Logo, at);
    tl.push(
        Tween::to(h.narrative_elements.iter().copied(), at, 4.0)
            .set(Attr::Opacity, 0.0)
            .set(Attr::Blur, 20.0)
            .set(Attr::Scale, 0.9)
            .ease(POWER2_IN_OUT),
    );
    tl.push(
        Tween::to([h.central_glow], at, 4.0)
            .set(Attr::Opacity, 0.0)
            .set(Attr::Scale, 1.5)
            .ease(POWER2_IN_OUT),
    );
    tl.push(
        Tween::to(h.lines[..12].iter().copied(), at, 3.0)
            .set(Attr::X1, 600.0)
            .set(Attr::Y1, CENTER.y)
            .set(Attr::X2, 600.0)
            .set(Attr::Y2, CENTER.y)
            .set(Attr::Opacity, 0.0)
            .ease(POWER2_IN_OUT),
    );
    tl.push(
        Tween::to([h.logo_payoff], at + 2.0, 4.0)
            .set(Attr::Opacity, 1.0)
            .set(Attr::Scale, 1.0)
            .ease(Ease::out_back(1.2)),
    );
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/phases.rs"]
mod tests;
