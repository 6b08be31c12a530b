use crate::{
    foundation::core::Rgba8,
    scene::model::{NodeId, NodeSpec, Scene},
};

pub const GRID_SIZE: usize = 6;
pub const GRID_PITCH: f64 = 60.0;
pub const GRID_LEFT: f64 = 350.0;
pub const GRID_TOP: f64 = 250.0;
pub const GRID_RIGHT: f64 = GRID_LEFT + GRID_PITCH * (GRID_SIZE as f64 - 1.0);
pub const GRID_BOTTOM: f64 = GRID_TOP + GRID_PITCH * (GRID_SIZE as f64 - 1.0);

/// A 6x6 lattice: 6 horizontal lines, then 6 vertical lines, then 36 nodes
/// in column-major order.
#[derive(Clone, Debug, serde::Serialize)]
pub struct Grid {
    pub container: NodeId,
    pub lines: Vec<NodeId>,
    pub nodes: Vec<NodeId>,
}

pub fn grid_coord(base: f64, i: usize) -> f64 {
    base + i as f64 * GRID_PITCH
}

pub fn create_grid(scene: &mut Scene, container: NodeId, color: Rgba8) -> Grid {
    let mut lines = Vec::with_capacity(GRID_SIZE * 2);
    for i in 0..GRID_SIZE {
        let y = grid_coord(GRID_TOP, i);
        lines.push(scene.add(
            container,
            NodeSpec::line(GRID_LEFT, y, GRID_RIGHT, y)
                .stroke(color, 1.0)
                .opacity(0.4),
        ));
    }
    for i in 0..GRID_SIZE {
        let x = grid_coord(GRID_LEFT, i);
        lines.push(scene.add(
            container,
            NodeSpec::line(x, GRID_TOP, x, GRID_BOTTOM)
                .stroke(color, 1.0)
                .opacity(0.4),
        ));
    }

    let mut nodes = Vec::with_capacity(GRID_SIZE * GRID_SIZE);
    for x in 0..GRID_SIZE {
        for y in 0..GRID_SIZE {
            nodes.push(scene.add(
                container,
                NodeSpec::circle(grid_coord(GRID_LEFT, x), grid_coord(GRID_TOP, y), 3.0)
                    .fill(color)
                    .opacity(0.8),
            ));
        }
    }

    Grid {
        container,
        lines,
        nodes,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/grid.rs"]
mod tests;
