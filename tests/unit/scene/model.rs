use super::*;

fn sample_scene() -> (Scene, NodeId, NodeId) {
    let mut scene = Scene::new();
    let group = scene.add(
        Scene::ROOT,
        NodeSpec::group().named("layer").opacity(0.5).origin(10.0, 10.0),
    );
    let line = scene.add(
        group,
        NodeSpec::line(0.0, 5.0, 20.0, 30.0)
            .class("narrative-line")
            .opacity(0.5),
    );
    (scene, group, line)
}

#[test]
fn add_links_parent_and_names() {
    let (scene, group, line) = sample_scene();
    assert_eq!(scene.len(), 3);
    assert_eq!(scene.find("layer"), Some(group));
    assert_eq!(scene.children(group), &[line]);
    assert_eq!(scene.get(line).unwrap().parent, Some(group));
    assert_eq!(scene.with_class("narrative-line"), vec![line]);
}

#[test]
fn attrs_apply_only_to_matching_shapes() {
    let (mut scene, group, line) = sample_scene();
    assert_eq!(scene.attr(line, Attr::X2), Some(20.0));
    assert!(scene.set_attr(line, Attr::X2, 42.0));
    assert_eq!(scene.attr(line, Attr::X2), Some(42.0));

    assert_eq!(scene.attr(line, Attr::Width), None);
    assert!(!scene.set_attr(line, Attr::Width, 1.0));
    assert!(!scene.set_attr(group, Attr::R, 1.0));
    assert!(scene.set_attr(group, Attr::Scale, 2.0));
    assert!(!scene.set_attr(NodeId(999), Attr::Opacity, 1.0));
}

#[test]
fn transform_scales_around_origin() {
    let t = NodeTransform {
        scale: 2.0,
        origin: Point::new(10.0, 10.0),
        ..NodeTransform::default()
    };
    let a = t.to_affine();
    assert_eq!(a * Point::new(10.0, 10.0), Point::new(10.0, 10.0));
    assert_eq!(a * Point::new(11.0, 10.0), Point::new(12.0, 10.0));
}

#[test]
fn rotation_x_ninety_collapses_height() {
    let t = NodeTransform {
        rotation_x: 90.0,
        ..NodeTransform::default()
    };
    let p = t.to_affine() * Point::new(3.0, 50.0);
    assert!((p.x - 3.0).abs() < 1e-9);
    assert!(p.y.abs() < 1e-9);
}

#[test]
fn subtree_top_uses_children() {
    let (mut scene, group, _) = sample_scene();
    scene.add(group, NodeSpec::rect(0.0, -4.0, 2.0, 2.0));
    assert_eq!(scene.top(group), Some(-4.0));
}

#[test]
fn unknown_parent_falls_back_to_root() {
    let mut scene = Scene::new();
    let id = scene.add(NodeId(77), NodeSpec::circle(0.0, 0.0, 1.0));
    assert_eq!(scene.get(id).unwrap().parent, Some(Scene::ROOT));
}
