use std::collections::BTreeMap;

use crate::{
    animation::{
        ease::Ease,
        value::{Value, lerp},
    },
    foundation::{
        error::{ScrollreelError, ScrollreelResult},
        rng::Rng64,
    },
    scene::model::{Attr, NodeId, Scene},
    timeline::tween::{Tween, stagger_order},
};

const EPS: f64 = 1e-9;

/// Narrative beats, in timeline order.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Foundation,
    Chaos,
    Structure,
    Agent,
    Utilization,
    Value,
    Logo,
}

impl Phase {
    pub const ALL: [Phase; 7] = [
        Phase::Foundation,
        Phase::Chaos,
        Phase::Structure,
        Phase::Agent,
        Phase::Utilization,
        Phase::Value,
        Phase::Logo,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Foundation => "foundation",
            Self::Chaos => "chaos",
            Self::Structure => "structure",
            Self::Agent => "agent",
            Self::Utilization => "utilization",
            Self::Value => "value",
            Self::Logo => "logo",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.label() == label)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct Label {
    pub phase: Phase,
    pub at: f64,
}

/// Authored schedule. Immutable once bound to a scene.
#[derive(Clone, Debug)]
pub struct Timeline {
    total: f64,
    seed: u64,
    labels: Vec<Label>,
    tweens: Vec<Tween>,
}

impl Timeline {
    pub fn new(total_duration: f64, seed: u64) -> Self {
        Self {
            total: total_duration,
            seed,
            labels: Vec::new(),
            tweens: Vec::new(),
        }
    }

    pub fn add_label(&mut self, phase: Phase, at: f64) {
        self.labels.push(Label { phase, at });
    }

    pub fn push(&mut self, tween: Tween) {
        self.tweens.push(tween);
    }

    pub fn total_duration(&self) -> f64 {
        self.total
    }

    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    pub fn tweens(&self) -> &[Tween] {
        &self.tweens
    }

    pub fn validate(&self) -> ScrollreelResult<()> {
        if !self.total.is_finite() || self.total <= 0.0 {
            return Err(ScrollreelError::validation(
                "timeline total duration must be finite and > 0",
            ));
        }
        for l in &self.labels {
            if !(0.0..=self.total).contains(&l.at) {
                return Err(ScrollreelError::validation(format!(
                    "label '{}' at {} is outside [0, {}]",
                    l.phase.label(),
                    l.at,
                    self.total
                )));
            }
        }

        let mut prev_start = 0.0;
        for (i, t) in self.tweens.iter().enumerate() {
            if !t.start.is_finite() || t.start < 0.0 {
                return Err(ScrollreelError::animation(format!(
                    "tween {i}: start must be finite and >= 0"
                )));
            }
            if !t.duration.is_finite() || t.duration < 0.0 {
                return Err(ScrollreelError::animation(format!(
                    "tween {i}: duration must be finite and >= 0"
                )));
            }
            if t.start + EPS < prev_start {
                return Err(ScrollreelError::animation(format!(
                    "tween {i}: start {} precedes previous start {prev_start}",
                    t.start
                )));
            }
            prev_start = t.start;

            let spread = match t.stagger {
                Some(s) if !s.each.is_finite() || s.each < 0.0 => {
                    return Err(ScrollreelError::animation(format!(
                        "tween {i}: stagger must be finite and >= 0"
                    )));
                }
                Some(s) => s.each * t.targets.len().saturating_sub(1) as f64,
                None => 0.0,
            };
            let end = t.start + spread + t.duration;
            if end > self.total + EPS {
                return Err(ScrollreelError::animation(format!(
                    "tween {i}: ends at {end}, after total duration {}",
                    self.total
                )));
            }
        }
        Ok(())
    }

    /// Resolve targets against `scene` and compile per-channel segment lists.
    ///
    /// Channel base values are read from `scene` now, so bind before the first seek.
    #[tracing::instrument(skip(self, scene), fields(tweens = self.tweens.len()))]
    pub fn bind(self, scene: &Scene) -> ScrollreelResult<BoundTimeline> {
        self.validate()?;

        let mut channels: BTreeMap<(NodeId, Attr), Channel> = BTreeMap::new();
        let mut first_starts = Vec::with_capacity(self.tweens.len());
        let mut random = Vec::with_capacity(self.tweens.len());

        for (ti, tween) in self.tweens.iter().enumerate() {
            let mut targets: Vec<NodeId> = Vec::with_capacity(tween.targets.len());
            for &id in &tween.targets {
                if scene.get(id).is_none() {
                    tracing::warn!(tween = ti, ?id, "tween target not found, skipping");
                    continue;
                }
                if !targets.contains(&id) {
                    targets.push(id);
                }
            }
            if targets.is_empty() {
                tracing::warn!(tween = ti, "tween has no resolvable targets");
            }

            let count = targets.len();
            let offsets: Vec<f64> = match tween.stagger {
                Some(s) => {
                    let tops: Vec<Option<f64>> = targets.iter().map(|&id| scene.top(id)).collect();
                    stagger_order(s.from, count, &tops)
                        .into_iter()
                        .map(|o| o * s.each)
                        .collect()
                }
                None => vec![0.0; count],
            };
            let first = offsets.iter().copied().reduce(f64::min).unwrap_or(0.0);
            first_starts.push(tween.start + first);
            random.push(tween.has_random());

            for prop in &tween.props {
                for (pos, &id) in targets.iter().enumerate() {
                    let Some(base) = scene.attr(id, prop.attr) else {
                        tracing::warn!(
                            tween = ti,
                            ?id,
                            attr = ?prop.attr,
                            "attribute does not apply to target, skipping"
                        );
                        continue;
                    };
                    channels
                        .entry((id, prop.attr))
                        .or_insert_with(|| Channel {
                            target: id,
                            attr: prop.attr,
                            base,
                            segments: Vec::new(),
                        })
                        .segments
                        .push(Segment {
                            tween: ti,
                            index: pos,
                            count,
                            start: tween.start + offsets[pos],
                            duration: tween.duration,
                            ease: tween.ease,
                            from: prop.from,
                            to: prop.to,
                        });
                }
            }
        }

        let mut channels: Vec<Channel> = channels.into_values().collect();
        for ch in &mut channels {
            ch.segments.sort_by(|a, b| {
                a.start
                    .total_cmp(&b.start)
                    .then_with(|| a.tween.cmp(&b.tween))
            });
            for w in ch.segments.windows(2) {
                if w[1].start + EPS < w[0].start + w[0].duration {
                    tracing::warn!(
                        target_node = ?ch.target,
                        attr = ?ch.attr,
                        earlier = w[0].tween,
                        later = w[1].tween,
                        "overlapping tweens on one attribute; the later start takes over"
                    );
                }
            }
        }

        tracing::debug!(channels = channels.len(), "timeline bound");
        Ok(BoundTimeline {
            total: self.total,
            seed: self.seed,
            labels: self.labels,
            channels,
            first_starts,
            random,
            activations: vec![Activation::default(); self.tweens.len()],
            time: None,
        })
    }
}

#[derive(Clone, Debug)]
struct Segment {
    tween: usize,
    index: usize,
    count: usize,
    start: f64,
    duration: f64,
    ease: Ease,
    from: Option<Value>,
    to: Value,
}

/// Every segment that writes one attribute of one node, sorted by effective start.
#[derive(Clone, Debug)]
struct Channel {
    target: NodeId,
    attr: Attr,
    base: f64,
    segments: Vec<Segment>,
}

#[derive(Clone, Copy, Debug, Default)]
struct Activation {
    epoch: u64,
    entered: bool,
}

/// A timeline compiled against a scene. Seeking is idempotent and works in
/// both directions: the state at `t` depends only on `t` and the random epochs.
#[derive(Clone, Debug)]
pub struct BoundTimeline {
    total: f64,
    seed: u64,
    labels: Vec<Label>,
    channels: Vec<Channel>,
    first_starts: Vec<f64>,
    random: Vec<bool>,
    activations: Vec<Activation>,
    time: Option<f64>,
}

impl BoundTimeline {
    pub fn total_duration(&self) -> f64 {
        self.total
    }

    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Virtual time of the last seek.
    pub fn time(&self) -> Option<f64> {
        self.time
    }

    pub fn label_time(&self, phase: Phase) -> Option<f64> {
        self.labels.iter().find(|l| l.phase == phase).map(|l| l.at)
    }

    /// Latest label at or before `t`.
    pub fn phase_at(&self, t: f64) -> Option<Phase> {
        self.labels
            .iter()
            .filter(|l| l.at <= t + EPS)
            .max_by(|a, b| a.at.total_cmp(&b.at))
            .map(|l| l.phase)
    }

    pub fn progress_to_time(&self, progress: f64) -> f64 {
        if progress.is_finite() {
            progress.clamp(0.0, 1.0) * self.total
        } else {
            0.0
        }
    }

    /// Evaluate every channel at `t` and write the results into `scene`.
    /// Returns the number of channels written.
    pub fn seek(&mut self, t: f64, scene: &mut Scene) -> usize {
        let t = if t.is_finite() {
            t.clamp(0.0, self.total)
        } else {
            0.0
        };

        for (ti, act) in self.activations.iter_mut().enumerate() {
            if !self.random[ti] {
                continue;
            }
            let entered = t + EPS >= self.first_starts[ti];
            if entered && !act.entered {
                act.epoch += 1;
            }
            act.entered = entered;
        }

        let mut written = 0;
        for ch in &self.channels {
            let v = self.sample(ch, t);
            if scene.set_attr(ch.target, ch.attr, v) {
                written += 1;
            }
        }
        self.time = Some(t);
        tracing::trace!(t, written, "timeline seek");
        written
    }

    pub fn seek_progress(&mut self, progress: f64, scene: &mut Scene) -> usize {
        let t = self.progress_to_time(progress);
        self.seek(t, scene)
    }

    fn sample(&self, ch: &Channel, t: f64) -> f64 {
        let started = ch.segments.partition_point(|s| s.start <= t + EPS);
        if started == 0 {
            return match ch.segments.first() {
                Some(first) => match first.from {
                    Some(from) => self.resolve(first, from),
                    None => ch.base,
                },
                None => ch.base,
            };
        }

        let mut cur: Option<(f64, &Segment)> = None;
        for seg in &ch.segments[..started] {
            let from = match (seg.from, cur) {
                (Some(v), _) => self.resolve(seg, v),
                (None, Some((prev_from, prev))) => self.interpolate(prev, prev_from, seg.start),
                (None, None) => ch.base,
            };
            cur = Some((from, seg));
        }
        match cur {
            Some((from, seg)) => self.interpolate(seg, from, t),
            None => ch.base,
        }
    }

    fn interpolate(&self, seg: &Segment, from: f64, t: f64) -> f64 {
        let to = self.resolve(seg, seg.to);
        let local = if seg.duration <= 0.0 {
            if t + EPS >= seg.start { 1.0 } else { 0.0 }
        } else {
            ((t - seg.start) / seg.duration).clamp(0.0, 1.0)
        };
        lerp(from, to, seg.ease.apply(local))
    }

    fn resolve(&self, seg: &Segment, v: Value) -> f64 {
        let epoch = self.activations[seg.tween].epoch;
        v.resolve(seg.index, seg.count, |slot| {
            Rng64::derive(
                self.seed,
                &[seg.tween as u64, seg.index as u64, u64::from(slot), epoch],
            )
            .next_f64_01()
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/timeline.rs"]
mod tests;
