use super::*;
use crate::{
    scene::model::NodeSpec,
    timeline::tween::StaggerFrom,
};

fn scene_with_lines(n: usize) -> (Scene, Vec<NodeId>) {
    let mut scene = Scene::new();
    let ids = (0..n)
        .map(|i| scene.add(Scene::ROOT, NodeSpec::line(0.0, i as f64 * 10.0, 0.0, i as f64 * 10.0)))
        .collect();
    (scene, ids)
}

fn x2(scene: &Scene, id: NodeId) -> f64 {
    scene.attr(id, Attr::X2).unwrap()
}

#[test]
fn linear_tween_interpolates_and_clamps() {
    let (mut scene, ids) = scene_with_lines(1);
    let mut tl = Timeline::new(10.0, 1);
    tl.push(Tween::to(ids.clone(), 2.0, 4.0).set(Attr::X2, 100.0).ease(Ease::Linear));
    let mut tl = tl.bind(&scene).unwrap();

    tl.seek(0.0, &mut scene);
    assert_eq!(x2(&scene, ids[0]), 0.0);
    tl.seek(4.0, &mut scene);
    assert_eq!(x2(&scene, ids[0]), 50.0);
    tl.seek(9.0, &mut scene);
    assert_eq!(x2(&scene, ids[0]), 100.0);
    tl.seek(1.0, &mut scene);
    assert_eq!(x2(&scene, ids[0]), 0.0);
}

#[test]
fn per_index_values_use_target_position() {
    let (mut scene, ids) = scene_with_lines(3);
    let mut tl = Timeline::new(10.0, 1);
    tl.push(
        Tween::to(ids.clone(), 0.0, 1.0)
            .set(Attr::X2, Value::per_index(|i, _| 500.0 + (i as f64 - 1.0) * 200.0))
            .set(Attr::Y2, Value::per_index(|i, n| (n - i) as f64)),
    );
    let mut tl = tl.bind(&scene).unwrap();
    tl.seek(10.0, &mut scene);
    let xs: Vec<f64> = ids.iter().map(|&id| x2(&scene, id)).collect();
    assert_eq!(xs, vec![300.0, 500.0, 700.0]);
    assert_eq!(scene.attr(ids[0], Attr::Y2), Some(3.0));
}

#[test]
fn chained_tweens_start_from_previous_end() {
    let (mut scene, ids) = scene_with_lines(1);
    let mut tl = Timeline::new(10.0, 1);
    tl.push(Tween::to(ids.clone(), 0.0, 2.0).set(Attr::X2, 100.0).ease(Ease::Linear));
    tl.push(Tween::to(ids.clone(), 4.0, 2.0).set(Attr::X2, 300.0).ease(Ease::Linear));
    let mut tl = tl.bind(&scene).unwrap();

    tl.seek(3.0, &mut scene);
    assert_eq!(x2(&scene, ids[0]), 100.0);
    tl.seek(5.0, &mut scene);
    assert_eq!(x2(&scene, ids[0]), 200.0);
    tl.seek(1.0, &mut scene);
    assert_eq!(x2(&scene, ids[0]), 50.0);
}

#[test]
fn overlapping_later_start_takes_over_continuously() {
    let (mut scene, ids) = scene_with_lines(1);
    let mut tl = Timeline::new(10.0, 1);
    tl.push(Tween::to(ids.clone(), 0.0, 4.0).set(Attr::X2, 100.0).ease(Ease::Linear));
    tl.push(Tween::to(ids.clone(), 2.0, 2.0).set(Attr::X2, 0.0).ease(Ease::Linear));
    let mut tl = tl.bind(&scene).unwrap();

    tl.seek(2.0, &mut scene);
    assert_eq!(x2(&scene, ids[0]), 50.0);
    tl.seek(3.0, &mut scene);
    assert_eq!(x2(&scene, ids[0]), 25.0);
    tl.seek(8.0, &mut scene);
    assert_eq!(x2(&scene, ids[0]), 0.0);
}

#[test]
fn from_to_applies_start_value_before_start() {
    let (mut scene, ids) = scene_with_lines(1);
    let mut tl = Timeline::new(10.0, 1);
    tl.push(
        Tween::to(ids.clone(), 5.0, 1.0)
            .from_to(Attr::Opacity, 0.0, 1.0)
            .from_to(Attr::TranslateX, -800.0, 0.0),
    );
    let mut tl = tl.bind(&scene).unwrap();
    tl.seek(0.0, &mut scene);
    assert_eq!(scene.attr(ids[0], Attr::Opacity), Some(0.0));
    assert_eq!(scene.attr(ids[0], Attr::TranslateX), Some(-800.0));
    tl.seek(10.0, &mut scene);
    assert_eq!(scene.attr(ids[0], Attr::Opacity), Some(1.0));
    assert_eq!(scene.attr(ids[0], Attr::TranslateX), Some(0.0));
}

#[test]
fn stagger_offsets_each_target() {
    let (mut scene, ids) = scene_with_lines(3);
    let mut tl = Timeline::new(10.0, 1);
    tl.push(
        Tween::to(ids.clone(), 1.0, 1.0)
            .set(Attr::X2, 10.0)
            .ease(Ease::Linear)
            .stagger(0.5),
    );
    let mut tl = tl.bind(&scene).unwrap();
    tl.seek(1.5, &mut scene);
    let xs: Vec<f64> = ids.iter().map(|&id| x2(&scene, id)).collect();
    assert_eq!(xs, vec![5.0, 0.0, 0.0]);
    tl.seek(2.0, &mut scene);
    let xs: Vec<f64> = ids.iter().map(|&id| x2(&scene, id)).collect();
    assert_eq!(xs, vec![10.0, 5.0, 0.0]);
}

#[test]
fn stagger_from_top_orders_by_position() {
    // Line tops are 0, 10, 20; reversed target order must not matter.
    let (mut scene, mut ids) = scene_with_lines(3);
    ids.reverse();
    let mut tl = Timeline::new(10.0, 1);
    tl.push(
        Tween::to(ids.clone(), 0.0, 1.0)
            .set(Attr::X2, 10.0)
            .ease(Ease::Linear)
            .stagger_from(1.0, StaggerFrom::Top),
    );
    let mut tl = tl.bind(&scene).unwrap();
    tl.seek(1.0, &mut scene);
    // ids[2] has top 0 and finishes first.
    assert_eq!(x2(&scene, ids[2]), 10.0);
    assert_eq!(x2(&scene, ids[1]), 0.0);
    assert_eq!(x2(&scene, ids[0]), 0.0);
}

#[test]
fn seek_is_idempotent() {
    let (mut scene, ids) = scene_with_lines(4);
    let mut tl = Timeline::new(10.0, 9);
    tl.push(
        Tween::to(ids.clone(), 1.0, 3.0)
            .set(Attr::X1, Value::random(0, |u| 300.0 + u * 400.0))
            .set(Attr::X2, 42.0)
            .stagger(0.1),
    );
    let mut tl = tl.bind(&scene).unwrap();
    for t in [0.0, 1.3, 2.0, 5.0, 10.0] {
        tl.seek(t, &mut scene);
        let a = serde_json::to_string(&scene).unwrap();
        tl.seek(t, &mut scene);
        let b = serde_json::to_string(&scene).unwrap();
        assert_eq!(a, b, "t = {t}");
    }
}

#[test]
fn random_values_hold_while_scrubbing_and_resample_on_reentry() {
    let (mut scene, ids) = scene_with_lines(1);
    let mut tl = Timeline::new(10.0, 3);
    tl.push(Tween::to(ids.clone(), 2.0, 2.0).set(Attr::X2, Value::random(0, |u| u * 1000.0)));
    let mut tl = tl.bind(&scene).unwrap();

    tl.seek(6.0, &mut scene);
    let first = x2(&scene, ids[0]);
    tl.seek(3.0, &mut scene);
    tl.seek(8.0, &mut scene);
    assert_eq!(x2(&scene, ids[0]), first);

    tl.seek(0.0, &mut scene);
    assert_eq!(x2(&scene, ids[0]), 0.0);
    tl.seek(6.0, &mut scene);
    assert_ne!(x2(&scene, ids[0]), first);
}

#[test]
fn shared_slot_keeps_derived_values_consistent() {
    let mut scene = Scene::new();
    let bar = scene.add(Scene::ROOT, NodeSpec::rect(0.0, 370.0, 12.0, 0.0));
    let mut tl = Timeline::new(10.0, 5);
    tl.push(
        Tween::to([bar], 0.0, 1.0)
            .set(Attr::Height, Value::random(0, |u| 20.0 + u * 60.0))
            .set(Attr::Y, Value::random(0, |u| 370.0 - (20.0 + u * 60.0))),
    );
    let mut tl = tl.bind(&scene).unwrap();
    tl.seek(10.0, &mut scene);
    let h = scene.attr(bar, Attr::Height).unwrap();
    let y = scene.attr(bar, Attr::Y).unwrap();
    assert!((20.0..80.0).contains(&h));
    assert!((y + h - 370.0).abs() < 1e-9);
}

#[test]
fn missing_targets_and_attrs_are_inert() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    let (mut scene, ids) = scene_with_lines(1);
    let mut tl = Timeline::new(10.0, 1);
    tl.push(
        Tween::to([NodeId(999), ids[0]], 0.0, 1.0)
            .set(Attr::X2, 7.0)
            .set(Attr::R, 3.0),
    );
    tl.push(Tween::to([NodeId(1234)], 1.0, 1.0).set(Attr::Opacity, 0.0));
    let mut tl = tl.bind(&scene).unwrap();
    assert_eq!(tl.channel_count(), 1);
    assert_eq!(tl.seek(10.0, &mut scene), 1);
    assert_eq!(x2(&scene, ids[0]), 7.0);
}

#[test]
fn validation_rejects_bad_schedules() {
    let (scene, ids) = scene_with_lines(2);

    let mut tl = Timeline::new(10.0, 1);
    tl.push(Tween::to(ids.clone(), 5.0, 1.0));
    tl.push(Tween::to(ids.clone(), 4.0, 1.0));
    assert!(matches!(tl.bind(&scene), Err(ScrollreelError::Animation(_))));

    let mut tl = Timeline::new(10.0, 1);
    tl.push(Tween::to(ids.clone(), 9.0, 1.0).stagger(0.5));
    assert!(tl.bind(&scene).is_err());

    let mut tl = Timeline::new(10.0, 1);
    tl.push(Tween::to(ids.clone(), 1.0, -1.0));
    assert!(tl.bind(&scene).is_err());

    let mut tl = Timeline::new(10.0, 1);
    tl.add_label(Phase::Logo, 11.0);
    assert!(matches!(tl.bind(&scene), Err(ScrollreelError::Validation(_))));

    assert!(Timeline::new(0.0, 1).bind(&scene).is_err());
}

#[test]
fn labels_map_times_to_phases() {
    let scene = Scene::new();
    let mut tl = Timeline::new(30.0, 1);
    tl.add_label(Phase::Foundation, 0.0);
    tl.add_label(Phase::Chaos, 10.0);
    tl.add_label(Phase::Structure, 20.0);
    let tl = tl.bind(&scene).unwrap();
    assert_eq!(tl.phase_at(0.0), Some(Phase::Foundation));
    assert_eq!(tl.phase_at(9.99), Some(Phase::Foundation));
    assert_eq!(tl.phase_at(10.0), Some(Phase::Chaos));
    assert_eq!(tl.phase_at(30.0), Some(Phase::Structure));
    assert_eq!(tl.label_time(Phase::Chaos), Some(10.0));
    assert_eq!(tl.label_time(Phase::Logo), None);
    assert_eq!(Phase::from_label("structure"), Some(Phase::Structure));
}

#[test]
fn seek_clamps_out_of_range_time() {
    let (mut scene, ids) = scene_with_lines(1);
    let mut tl = Timeline::new(10.0, 1);
    tl.push(Tween::to(ids.clone(), 0.0, 10.0).set(Attr::X2, 10.0).ease(Ease::Linear));
    let mut tl = tl.bind(&scene).unwrap();
    tl.seek(25.0, &mut scene);
    assert_eq!(tl.time(), Some(10.0));
    assert_eq!(x2(&scene, ids[0]), 10.0);
    tl.seek(f64::NAN, &mut scene);
    assert_eq!(tl.time(), Some(0.0));
    assert_eq!(tl.progress_to_time(0.5), 5.0);
}
