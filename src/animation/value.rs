/// Closed-form per-target function: `(index, count) -> value`.
pub type IndexFn = fn(usize, usize) -> f64;

/// Maps a uniform draw in `[0, 1)` to an attribute value.
pub type SampleFn = fn(f64) -> f64;

/// End (or explicit start) value of a property change.
///
/// Random values draw from a numbered slot: two properties of the same tween that
/// name the same slot see the same draw for a given target, which keeps derived
/// pairs (a bar's height and its top edge) consistent.
#[derive(Clone, Copy, Debug)]
pub enum Value {
    Const(f64),
    PerIndex(IndexFn),
    Random { slot: u8, map: SampleFn },
}

impl Value {
    pub fn per_index(f: IndexFn) -> Self {
        Self::PerIndex(f)
    }

    pub fn random(slot: u8, map: SampleFn) -> Self {
        Self::Random { slot, map }
    }

    pub fn is_random(&self) -> bool {
        matches!(self, Self::Random { .. })
    }

    /// Resolve for target `index` of `count`; `draw(slot)` supplies uniform samples.
    pub fn resolve(&self, index: usize, count: usize, draw: impl FnOnce(u8) -> f64) -> f64 {
        match *self {
            Self::Const(v) => v,
            Self::PerIndex(f) => f(index, count),
            Self::Random { slot, map } => map(draw(slot)),
        }
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Const(v)
    }
}

/// Exact at both ends.
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    if t == 1.0 { b } else { a + (b - a) * t }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/value.rs"]
mod tests;
