use super::*;
use crate::scene::model::{Attr, Shape};

#[test]
fn grid_has_twelve_lines_and_thirty_six_nodes() {
    let mut scene = Scene::new();
    let layer = scene.add(Scene::ROOT, NodeSpec::group());
    let grid = create_grid(&mut scene, layer, Rgba8::rgb(0, 163, 255));

    assert_eq!(grid.lines.len(), 12);
    assert_eq!(grid.nodes.len(), 36);
    assert_eq!(scene.children(layer).len(), 48);
}

#[test]
fn node_coordinates_follow_pitch() {
    let mut scene = Scene::new();
    let layer = scene.add(Scene::ROOT, NodeSpec::group());
    let grid = create_grid(&mut scene, layer, Rgba8::rgb(255, 255, 255));

    for x in 0..GRID_SIZE {
        for y in 0..GRID_SIZE {
            let id = grid.nodes[x * GRID_SIZE + y];
            assert_eq!(scene.attr(id, Attr::Cx), Some(350.0 + x as f64 * 60.0));
            assert_eq!(scene.attr(id, Attr::Cy), Some(250.0 + y as f64 * 60.0));
            assert_eq!(scene.attr(id, Attr::R), Some(3.0));
        }
    }
}

#[test]
fn horizontal_lines_come_first() {
    let mut scene = Scene::new();
    let layer = scene.add(Scene::ROOT, NodeSpec::group());
    let grid = create_grid(&mut scene, layer, Rgba8::rgb(255, 255, 255));

    for (i, &id) in grid.lines.iter().enumerate() {
        let Shape::Line { x1, y1, x2, y2 } = scene.get(id).unwrap().shape else {
            panic!("grid line is not a line");
        };
        if i < GRID_SIZE {
            assert_eq!(y1, y2);
            assert_eq!((x1, x2), (350.0, 650.0));
            assert_eq!(y1, 250.0 + i as f64 * 60.0);
        } else {
            assert_eq!(x1, x2);
            assert_eq!((y1, y2), (250.0, 550.0));
            assert_eq!(x1, 350.0 + (i - GRID_SIZE) as f64 * 60.0);
        }
        assert_eq!(scene.attr(id, Attr::Opacity), Some(0.4));
    }
}
