use std::collections::BTreeMap;

use crate::foundation::core::{Affine, Point, Rgba8, Vec2};

/// Handle into the scene arena. Resolved once at build time; never re-looked-up by name.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct NodeId(pub u32);

impl NodeId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// Animatable attributes. Which ones apply depends on the node's [`Shape`].
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub enum Attr {
    X1,
    Y1,
    X2,
    Y2,
    X,
    Y,
    Width,
    Height,
    Cx,
    Cy,
    R,
    Opacity,
    DashOffset,
    Blur,
    TranslateX,
    TranslateY,
    Scale,
    ScaleY,
    Rotation,
    RotationX,
    CameraZ,
}

pub const DEFAULT_TEXT_SIZE: f64 = 12.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum TextAnchor {
    Start,
    Middle,
    End,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind")]
pub enum Shape {
    Group,
    Line {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
    },
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        rx: f64,
    },
    Circle {
        cx: f64,
        cy: f64,
        r: f64,
    },
    /// Polyline, optionally closed.
    Path { points: Vec<Point>, closed: bool },
    Text {
        x: f64,
        y: f64,
        content: String,
        anchor: TextAnchor,
        /// Font size in view-box units.
        size: f64,
    },
    /// Perspective camera for the point-cloud background; never drawn.
    Camera { z: f64, fov_deg: f64 },
}

impl Shape {
    /// Top edge in local coordinates, used by spatial stagger ordering.
    pub fn top(&self) -> Option<f64> {
        match self {
            Self::Line { y1, y2, .. } => Some(y1.min(*y2)),
            Self::Rect { y, height, .. } => Some(y.min(y + height)),
            Self::Circle { cy, r, .. } => Some(cy - r),
            Self::Path { points, .. } => points.iter().map(|p| p.y).reduce(f64::min),
            Self::Text { y, .. } => Some(*y),
            Self::Group | Self::Camera { .. } => None,
        }
    }
}

/// Paint state. `draw_on` enables the stroke-reveal effect: only
/// `draw_on - dash_offset` of the outline length is stroked.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Style {
    pub stroke: Option<Rgba8>,
    pub fill: Option<Rgba8>,
    pub stroke_width: f64,
    pub opacity: f64,
    pub draw_on: Option<f64>,
    pub dash_offset: f64,
    pub blur: f64,
    pub round_caps: bool,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            stroke: None,
            fill: None,
            stroke_width: 1.0,
            opacity: 1.0,
            draw_on: None,
            dash_offset: 0.0,
            blur: 0.0,
            round_caps: false,
        }
    }
}

/// Node transform. Angles are degrees; `rotation_x` is a flip around the
/// horizontal axis, flattened to a vertical squash by `cos(rotation_x)`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct NodeTransform {
    pub translate: Vec2,
    pub scale: f64,
    pub scale_y: f64,
    pub rotation: f64,
    pub rotation_x: f64,
    pub origin: Point,
}

impl Default for NodeTransform {
    fn default() -> Self {
        Self {
            translate: Vec2::ZERO,
            scale: 1.0,
            scale_y: 1.0,
            rotation: 0.0,
            rotation_x: 0.0,
            origin: Point::ZERO,
        }
    }
}

impl NodeTransform {
    pub fn to_affine(self) -> Affine {
        let sx = self.scale;
        let sy = self.scale * self.scale_y * self.rotation_x.to_radians().cos();
        let origin = self.origin.to_vec2();

        // T(translate) * T(origin) * R(rot) * S(sx, sy) * T(-origin)
        Affine::translate(self.translate)
            * Affine::translate(origin)
            * Affine::rotate(self.rotation.to_radians())
            * Affine::scale_non_uniform(sx, sy)
            * Affine::translate(-origin)
    }
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub name: Option<String>,
    pub classes: Vec<String>,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub shape: Shape,
    pub style: Style,
    pub transform: NodeTransform,
}

impl Node {
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn get(&self, attr: Attr) -> Option<f64> {
        let t = &self.transform;
        let s = &self.style;
        match attr {
            Attr::Opacity => return Some(s.opacity),
            Attr::DashOffset => return Some(s.dash_offset),
            Attr::Blur => return Some(s.blur),
            Attr::TranslateX => return Some(t.translate.x),
            Attr::TranslateY => return Some(t.translate.y),
            Attr::Scale => return Some(t.scale),
            Attr::ScaleY => return Some(t.scale_y),
            Attr::Rotation => return Some(t.rotation),
            Attr::RotationX => return Some(t.rotation_x),
            _ => {}
        }
        match (&self.shape, attr) {
            (Shape::Line { x1, .. }, Attr::X1) => Some(*x1),
            (Shape::Line { y1, .. }, Attr::Y1) => Some(*y1),
            (Shape::Line { x2, .. }, Attr::X2) => Some(*x2),
            (Shape::Line { y2, .. }, Attr::Y2) => Some(*y2),
            (Shape::Rect { x, .. } | Shape::Text { x, .. }, Attr::X) => Some(*x),
            (Shape::Rect { y, .. } | Shape::Text { y, .. }, Attr::Y) => Some(*y),
            (Shape::Rect { width, .. }, Attr::Width) => Some(*width),
            (Shape::Rect { height, .. }, Attr::Height) => Some(*height),
            (Shape::Circle { cx, .. }, Attr::Cx) => Some(*cx),
            (Shape::Circle { cy, .. }, Attr::Cy) => Some(*cy),
            (Shape::Circle { r, .. }, Attr::R) => Some(*r),
            (Shape::Camera { z, .. }, Attr::CameraZ) => Some(*z),
            _ => None,
        }
    }

    /// Returns `false` when `attr` does not apply to this node.
    pub fn set(&mut self, attr: Attr, v: f64) -> bool {
        let slot: &mut f64 = match attr {
            Attr::Opacity => &mut self.style.opacity,
            Attr::DashOffset => &mut self.style.dash_offset,
            Attr::Blur => &mut self.style.blur,
            Attr::TranslateX => &mut self.transform.translate.x,
            Attr::TranslateY => &mut self.transform.translate.y,
            Attr::Scale => &mut self.transform.scale,
            Attr::ScaleY => &mut self.transform.scale_y,
            Attr::Rotation => &mut self.transform.rotation,
            Attr::RotationX => &mut self.transform.rotation_x,
            _ => match (&mut self.shape, attr) {
                (Shape::Line { x1, .. }, Attr::X1) => x1,
                (Shape::Line { y1, .. }, Attr::Y1) => y1,
                (Shape::Line { x2, .. }, Attr::X2) => x2,
                (Shape::Line { y2, .. }, Attr::Y2) => y2,
                (Shape::Rect { x, .. } | Shape::Text { x, .. }, Attr::X) => x,
                (Shape::Rect { y, .. } | Shape::Text { y, .. }, Attr::Y) => y,
                (Shape::Rect { width, .. }, Attr::Width) => width,
                (Shape::Rect { height, .. }, Attr::Height) => height,
                (Shape::Circle { cx, .. }, Attr::Cx) => cx,
                (Shape::Circle { cy, .. }, Attr::Cy) => cy,
                (Shape::Circle { r, .. }, Attr::R) => r,
                (Shape::Camera { z, .. }, Attr::CameraZ) => z,
                _ => return false,
            },
        };
        *slot = v;
        true
    }
}

/// Declarative description of a node to insert.
#[derive(Clone, Debug)]
pub struct NodeSpec {
    name: Option<String>,
    classes: Vec<String>,
    shape: Shape,
    style: Style,
    transform: NodeTransform,
}

impl NodeSpec {
    pub fn new(shape: Shape) -> Self {
        Self {
            name: None,
            classes: Vec::new(),
            shape,
            style: Style::default(),
            transform: NodeTransform::default(),
        }
    }

    pub fn group() -> Self {
        Self::new(Shape::Group)
    }

    pub fn line(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self::new(Shape::Line { x1, y1, x2, y2 })
    }

    pub fn rect(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::new(Shape::Rect {
            x,
            y,
            width,
            height,
            rx: 0.0,
        })
    }

    pub fn circle(cx: f64, cy: f64, r: f64) -> Self {
        Self::new(Shape::Circle { cx, cy, r })
    }

    pub fn text(x: f64, y: f64, content: impl Into<String>) -> Self {
        Self::new(Shape::Text {
            x,
            y,
            content: content.into(),
            anchor: TextAnchor::Middle,
            size: DEFAULT_TEXT_SIZE,
        })
    }

    /// No effect on non-text shapes.
    pub fn font_size(mut self, px: f64) -> Self {
        if let Shape::Text { size, .. } = &mut self.shape {
            *size = px;
        }
        self
    }

    pub fn anchor(mut self, to: TextAnchor) -> Self {
        if let Shape::Text { anchor, .. } = &mut self.shape {
            *anchor = to;
        }
        self
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    pub fn rounded(mut self, radius: f64) -> Self {
        if let Shape::Rect { rx, .. } = &mut self.shape {
            *rx = radius;
        }
        self
    }

    pub fn stroke(mut self, color: Rgba8, width: f64) -> Self {
        self.style.stroke = Some(color);
        self.style.stroke_width = width;
        self
    }

    pub fn fill(mut self, color: Rgba8) -> Self {
        self.style.fill = Some(color);
        self
    }

    pub fn opacity(mut self, opacity: f64) -> Self {
        self.style.opacity = opacity;
        self
    }

    pub fn round_caps(mut self) -> Self {
        self.style.round_caps = true;
        self
    }

    /// Hide the outline behind a full-length dash offset so it can be drawn on.
    pub fn draw_on(mut self, length: f64) -> Self {
        self.style.draw_on = Some(length);
        self.style.dash_offset = length;
        self
    }

    pub fn origin(mut self, x: f64, y: f64) -> Self {
        self.transform.origin = Point::new(x, y);
        self
    }

    pub fn translate(mut self, x: f64, y: f64) -> Self {
        self.transform.translate = Vec2::new(x, y);
        self
    }

    pub fn scale(mut self, scale: f64) -> Self {
        self.transform.scale = scale;
        self
    }
}

/// Arena-backed scene graph. Node 0 is the root group.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Scene {
    nodes: Vec<Node>,
    names: BTreeMap<String, NodeId>,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    pub const ROOT: NodeId = NodeId(0);

    pub fn new() -> Self {
        let root = Node {
            id: Self::ROOT,
            name: Some("stage".to_string()),
            classes: Vec::new(),
            parent: None,
            children: Vec::new(),
            shape: Shape::Group,
            style: Style::default(),
            transform: NodeTransform::default(),
        };
        let mut names = BTreeMap::new();
        names.insert("stage".to_string(), Self::ROOT);
        Self {
            nodes: vec![root],
            names,
        }
    }

    /// Insert `spec` as the last child of `parent` (or of the root when `parent` is unknown).
    pub fn add(&mut self, parent: NodeId, spec: NodeSpec) -> NodeId {
        let parent = if self.get(parent).is_some() {
            parent
        } else {
            tracing::warn!(?parent, "unknown parent, attaching to root");
            Self::ROOT
        };

        let id = NodeId(self.nodes.len() as u32);
        if let Some(name) = &spec.name {
            if self.names.insert(name.clone(), id).is_some() {
                tracing::warn!(name = %name, "duplicate node name, last one wins");
            }
        }
        self.nodes.push(Node {
            id,
            name: spec.name,
            classes: spec.classes,
            parent: Some(parent),
            children: Vec::new(),
            shape: spec.shape,
            style: spec.style,
            transform: spec.transform,
        });
        self.nodes[parent.index()].children.push(id);
        id
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.index())
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.names.get(name).copied()
    }

    pub fn with_class(&self, class: &str) -> Vec<NodeId> {
        self.nodes
            .iter()
            .filter(|n| n.has_class(class))
            .map(|n| n.id)
            .collect()
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    pub fn attr(&self, id: NodeId, attr: Attr) -> Option<f64> {
        self.get(id)?.get(attr)
    }

    pub fn set_attr(&mut self, id: NodeId, attr: Attr, v: f64) -> bool {
        match self.get_mut(id) {
            Some(node) => node.set(attr, v),
            None => false,
        }
    }

    /// Top edge of a node's subtree in its parent's space, ignoring animated transforms.
    pub fn top(&self, id: NodeId) -> Option<f64> {
        let node = self.get(id)?;
        let own = node.shape.top();
        node.children
            .iter()
            .filter_map(|&c| self.top(c))
            .chain(own)
            .reduce(f64::min)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/model.rs"]
mod tests;
