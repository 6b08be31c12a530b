use kurbo::Shape as _;

use crate::{
    foundation::core::{BezPath, Point},
    scene::model::{Shape, Style},
};

/// Segments used to approximate a full circle outline.
pub const CIRCLE_SEGMENTS: usize = 64;
const CORNER_SEGMENTS: usize = 8;
const TOLERANCE: f64 = 0.1;

/// A shape's stroked outline as a polyline. Closed outlines repeat their
/// first point at the end, so length and trimming need no special case.
#[derive(Clone, Debug, PartialEq)]
pub struct Outline {
    pub points: Vec<Point>,
    pub closed: bool,
}

impl Outline {
    pub fn length(&self) -> f64 {
        self.points.windows(2).map(|w| w[0].distance(w[1])).sum()
    }

    /// The first `len` units of the outline, as an open polyline.
    pub fn trim(&self, len: f64) -> Outline {
        if len >= self.length() {
            return self.clone();
        }
        let mut out = Vec::new();
        let mut left = len.max(0.0);
        for w in self.points.windows(2) {
            if out.is_empty() {
                out.push(w[0]);
            }
            let seg = w[0].distance(w[1]);
            if seg >= left {
                if seg > 0.0 && left > 0.0 {
                    out.push(w[0].lerp(w[1], left / seg));
                }
                break;
            }
            out.push(w[1]);
            left -= seg;
        }
        Outline {
            points: out,
            closed: false,
        }
    }

    pub fn to_path(&self) -> BezPath {
        let mut path = BezPath::new();
        let mut pts = self.points.iter();
        if let Some(&first) = pts.next() {
            path.move_to(first);
            for &p in pts {
                path.line_to(p);
            }
            if self.closed {
                path.close_path();
            }
        }
        path
    }
}

/// Outline of `shape`, starting where an SVG stroke starts: lines at their
/// first point, rects at the top-left corner, circles at 3 o'clock going
/// clockwise on screen.
pub fn outline(shape: &Shape) -> Option<Outline> {
    let (points, closed) = match shape {
        Shape::Line { x1, y1, x2, y2 } => (vec![Point::new(*x1, *y1), Point::new(*x2, *y2)], false),
        Shape::Rect {
            x,
            y,
            width,
            height,
            rx,
        } => (rect_points(*x, *y, *width, *height, *rx), true),
        Shape::Circle { cx, cy, r } => {
            let pts = (0..CIRCLE_SEGMENTS)
                .map(|i| {
                    let a = std::f64::consts::TAU * i as f64 / CIRCLE_SEGMENTS as f64;
                    Point::new(cx + r * a.cos(), cy + r * a.sin())
                })
                .collect();
            (pts, true)
        }
        Shape::Path { points, closed } => (points.clone(), *closed),
        Shape::Group | Shape::Text { .. } | Shape::Camera { .. } => return None,
    };
    if points.len() < 2 {
        return None;
    }
    let mut points = points;
    if closed && let Some(&first) = points.first() {
        points.push(first);
    }
    Some(Outline { points, closed })
}

fn rect_points(x: f64, y: f64, w: f64, h: f64, rx: f64) -> Vec<Point> {
    let r = rx.clamp(0.0, w.abs().min(h.abs()) / 2.0);
    if r <= 0.0 {
        return vec![
            Point::new(x, y),
            Point::new(x + w, y),
            Point::new(x + w, y + h),
            Point::new(x, y + h),
        ];
    }
    let corners = [
        (Point::new(x + w - r, y + r), -0.25),
        (Point::new(x + w - r, y + h - r), 0.0),
        (Point::new(x + r, y + h - r), 0.25),
        (Point::new(x + r, y + r), 0.5),
    ];
    let mut pts = vec![Point::new(x + r, y)];
    for (c, start_turn) in corners {
        for i in 0..=CORNER_SEGMENTS {
            let a = std::f64::consts::TAU * (start_turn + 0.25 * i as f64 / CORNER_SEGMENTS as f64);
            pts.push(Point::new(c.x + r * a.cos(), c.y + r * a.sin()));
        }
    }
    pts
}

/// Polyline to stroke once draw-on trimming is applied. `None` when nothing
/// of the outline is visible.
pub fn stroke_outline(shape: &Shape, style: &Style) -> Option<Outline> {
    let outline = outline(shape)?;
    match style.draw_on {
        None => Some(outline),
        Some(pattern) => {
            let visible = pattern - style.dash_offset;
            if visible <= 0.0 {
                None
            } else {
                Some(outline.trim(visible))
            }
        }
    }
}

/// Area to fill, if the shape has one.
pub fn fill_path(shape: &Shape) -> Option<BezPath> {
    match shape {
        Shape::Rect {
            x,
            y,
            width,
            height,
            rx,
        } => {
            let rect = kurbo::Rect::new(*x, *y, x + width, y + height).abs();
            if *rx > 0.0 {
                Some(kurbo::RoundedRect::from_rect(rect, *rx).to_path(TOLERANCE))
            } else {
                Some(rect.to_path(TOLERANCE))
            }
        }
        Shape::Circle { cx, cy, r } if *r > 0.0 => {
            Some(kurbo::Circle::new((*cx, *cy), *r).to_path(TOLERANCE))
        }
        Shape::Path {
            points,
            closed: true,
        } if points.len() >= 3 => Some(
            Outline {
                points: points.clone(),
                closed: true,
            }
            .to_path(),
        ),
        _ => None,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/geometry.rs"]
mod tests;
