use crate::{
    animation::{ease::Ease, value::Value},
    scene::model::{Attr, NodeId},
};

/// Ordering used to hand out stagger slots across a tween's targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum StaggerFrom {
    Start,
    End,
    Center,
    /// Ascending top edge; ties keep target order.
    Top,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Stagger {
    pub each: f64,
    pub from: StaggerFrom,
}

#[derive(Clone, Copy, Debug)]
pub struct PropChange {
    pub attr: Attr,
    /// Explicit start value; `None` starts from whatever the channel holds.
    pub from: Option<Value>,
    pub to: Value,
}

/// One authored instruction: move `props` of every target over
/// `[start, start + duration)` of virtual time.
#[derive(Clone, Debug)]
pub struct Tween {
    pub targets: Vec<NodeId>,
    pub props: Vec<PropChange>,
    pub start: f64,
    pub duration: f64,
    pub ease: Ease,
    pub stagger: Option<Stagger>,
}

impl Tween {
    /// Default ease is `OutQuad`.
    pub fn to(targets: impl IntoIterator<Item = NodeId>, start: f64, duration: f64) -> Self {
        Self {
            targets: targets.into_iter().collect(),
            props: Vec::new(),
            start,
            duration,
            ease: Ease::OutQuad,
            stagger: None,
        }
    }

    /// Animate `attr` from the channel's current value to `to`.
    pub fn set(mut self, attr: Attr, to: impl Into<Value>) -> Self {
        self.props.push(PropChange {
            attr,
            from: None,
            to: to.into(),
        });
        self
    }

    /// Animate `attr` between explicit endpoints. The start value also applies
    /// before `start` when this is the first instruction for the channel.
    pub fn from_to(mut self, attr: Attr, from: impl Into<Value>, to: impl Into<Value>) -> Self {
        self.props.push(PropChange {
            attr,
            from: Some(from.into()),
            to: to.into(),
        });
        self
    }

    pub fn ease(mut self, ease: Ease) -> Self {
        self.ease = ease;
        self
    }

    pub fn stagger(mut self, each: f64) -> Self {
        self.stagger = Some(Stagger {
            each,
            from: StaggerFrom::Start,
        });
        self
    }

    pub fn stagger_from(mut self, each: f64, from: StaggerFrom) -> Self {
        self.stagger = Some(Stagger { each, from });
        self
    }

    pub fn has_random(&self) -> bool {
        self.props
            .iter()
            .any(|p| p.to.is_random() || p.from.is_some_and(|f| f.is_random()))
    }
}

/// Stagger slot for each of `count` targets. `tops` is only consulted for `Top`.
pub fn stagger_order(from: StaggerFrom, count: usize, tops: &[Option<f64>]) -> Vec<f64> {
    match from {
        StaggerFrom::Start => (0..count).map(|i| i as f64).collect(),
        StaggerFrom::End => (0..count).map(|i| (count - 1 - i) as f64).collect(),
        StaggerFrom::Center => {
            let mid = (count as f64 - 1.0) / 2.0;
            (0..count).map(|i| (i as f64 - mid).abs()).collect()
        }
        StaggerFrom::Top => {
            let mut idx: Vec<usize> = (0..count).collect();
            let top = |i: usize| tops.get(i).copied().flatten().unwrap_or(f64::INFINITY);
            idx.sort_by(|&a, &b| top(a).total_cmp(&top(b)).then(a.cmp(&b)));
            let mut order = vec![0.0; count];
            for (rank, i) in idx.into_iter().enumerate() {
                order[i] = rank as f64;
            }
            order
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/tween.rs"]
mod tests;
