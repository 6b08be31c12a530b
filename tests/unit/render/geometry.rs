use super::*;

fn rect(w: f64, h: f64) -> Shape {
    Shape::Rect {
        x: 10.0,
        y: 20.0,
        width: w,
        height: h,
        rx: 0.0,
    }
}

#[test]
fn rect_outline_is_closed_perimeter() {
    let o = outline(&rect(30.0, 40.0)).unwrap();
    assert!(o.closed);
    assert_eq!(o.points.first(), o.points.last());
    assert!((o.length() - 140.0).abs() < 1e-9);
}

#[test]
fn circle_outline_approximates_circumference() {
    let r = 100.0 / std::f64::consts::TAU;
    let o = outline(&Shape::Circle {
        cx: 0.0,
        cy: 0.0,
        r,
    })
    .unwrap();
    assert_eq!(o.points.len(), CIRCLE_SEGMENTS + 1);
    assert!((o.length() - 100.0).abs() < 0.1);
    assert!((o.points[0].x - r).abs() < 1e-12);
}

#[test]
fn rounded_rect_outline_is_shorter_than_square_corners() {
    let sharp = outline(&rect(100.0, 100.0)).unwrap().length();
    let round = outline(&Shape::Rect {
        x: 0.0,
        y: 0.0,
        width: 100.0,
        height: 100.0,
        rx: 10.0,
    })
    .unwrap()
    .length();
    assert!(round < sharp);
    assert!(round > sharp - 8.0 * 10.0);
}

#[test]
fn groups_and_text_have_no_outline() {
    assert!(outline(&Shape::Group).is_none());
    assert!(fill_path(&Shape::Group).is_none());
    assert!(
        outline(&Shape::Line {
            x1: 0.0,
            y1: 0.0,
            x2: 1.0,
            y2: 0.0
        })
        .is_some()
    );
}

#[test]
fn trim_cuts_mid_segment() {
    let o = outline(&rect(30.0, 40.0)).unwrap();
    let t = o.trim(45.0);
    assert!(!t.closed);
    assert!((t.length() - 45.0).abs() < 1e-9);
    assert_eq!(t.points.last().copied(), Some(Point::new(40.0, 35.0)));
    assert_eq!(o.trim(1e9), o);
}

#[test]
fn draw_on_visible_length_is_pattern_minus_offset() {
    let shape = rect(30.0, 40.0);
    let mut style = Style {
        draw_on: Some(140.0),
        dash_offset: 140.0,
        ..Style::default()
    };
    assert!(stroke_outline(&shape, &style).is_none());

    style.dash_offset = 70.0;
    let half = stroke_outline(&shape, &style).unwrap();
    assert!((half.length() - 70.0).abs() < 1e-9);

    style.dash_offset = 0.0;
    assert!(stroke_outline(&shape, &style).unwrap().closed);
}

#[test]
fn fill_paths_exist_for_closed_shapes_only() {
    assert!(fill_path(&rect(1.0, 1.0)).is_some());
    assert!(
        fill_path(&Shape::Line {
            x1: 0.0,
            y1: 0.0,
            x2: 1.0,
            y2: 1.0
        })
        .is_none()
    );
    let open = Shape::Path {
        points: vec![Point::new(0.0, 0.0), Point::new(1.0, 0.0), Point::new(1.0, 1.0)],
        closed: false,
    };
    assert!(fill_path(&open).is_none());
}
