use crate::{
    animation::{ease::Ease, value::lerp},
    foundation::error::{ScrollreelError, ScrollreelResult},
};

/// Distance (px) under which the smoothed position snaps to its target.
pub const SNAP_PX: f64 = 0.5;

/// How the smoothed position chases the raw target.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case", tag = "mode")]
pub enum Smoothing {
    /// Frame-rate independent exponential approach:
    /// `current += (target - current) * (1 - exp(-lambda * dt))`.
    Damp { lambda: f64 },
    /// Each new target restarts an eased glide from the current position
    /// lasting `duration_secs`.
    Eased { duration_secs: f64, ease: Ease },
}

impl Default for Smoothing {
    fn default() -> Self {
        Self::Eased {
            duration_secs: 1.0,
            ease: Ease::OutExpo,
        }
    }
}

impl Smoothing {
    pub fn validate(&self) -> ScrollreelResult<()> {
        match *self {
            Self::Damp { lambda } if !lambda.is_finite() || lambda <= 0.0 => Err(
                ScrollreelError::validation("damp smoothing lambda must be finite and > 0"),
            ),
            Self::Eased { duration_secs, .. }
                if !duration_secs.is_finite() || duration_secs < 0.0 =>
            {
                Err(ScrollreelError::validation(
                    "eased smoothing duration must be finite and >= 0",
                ))
            }
            _ => Ok(()),
        }
    }
}

/// Raw scroll input, in document pixels.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrollInput {
    /// Relative wheel delta; positive scrolls down.
    Wheel(f64),
    /// Absolute position from a touch drag.
    Touch(f64),
    /// Absolute position applied immediately, e.g. an anchor jump.
    Jump(f64),
}

#[derive(Clone, Copy, Debug)]
struct Glide {
    from: f64,
    elapsed: f64,
}

/// Turns raw wheel/touch/jump input into a smoothed scroll position in
/// `[0, limit]`, where `limit = document_height - viewport_height`.
#[derive(Clone, Debug)]
pub struct ScrollNormalizer {
    smoothing: Smoothing,
    smooth_touch: bool,
    limit: f64,
    target: f64,
    current: f64,
    glide: Option<Glide>,
}

impl ScrollNormalizer {
    pub fn new(
        document_height: f64,
        viewport_height: f64,
        smoothing: Smoothing,
    ) -> ScrollreelResult<Self> {
        smoothing.validate()?;
        let mut out = Self {
            smoothing,
            smooth_touch: false,
            limit: 0.0,
            target: 0.0,
            current: 0.0,
            glide: None,
        };
        out.resize(document_height, viewport_height);
        Ok(out)
    }

    /// Smooth touch positions like wheel input instead of applying them directly.
    pub fn with_smooth_touch(mut self, smooth_touch: bool) -> Self {
        self.smooth_touch = smooth_touch;
        self
    }

    pub fn limit(&self) -> f64 {
        self.limit
    }

    pub fn target(&self) -> f64 {
        self.target
    }

    pub fn position(&self) -> f64 {
        self.current
    }

    /// Scroll progress in `[0, 1]`; 0 when the document fits the viewport.
    pub fn progress(&self) -> f64 {
        if self.limit <= 0.0 {
            0.0
        } else {
            (self.current / self.limit).clamp(0.0, 1.0)
        }
    }

    pub fn is_settled(&self) -> bool {
        self.current == self.target
    }

    pub fn input(&mut self, input: ScrollInput) {
        let value = match input {
            ScrollInput::Wheel(v) | ScrollInput::Touch(v) | ScrollInput::Jump(v) => v,
        };
        if !value.is_finite() {
            tracing::warn!(?input, "ignoring non-finite scroll input");
            return;
        }
        match input {
            ScrollInput::Wheel(dy) => self.retarget(self.target + dy),
            ScrollInput::Touch(pos) if self.smooth_touch => self.retarget(pos),
            ScrollInput::Touch(pos) | ScrollInput::Jump(pos) => {
                let pos = self.clamp(pos);
                self.target = pos;
                self.current = pos;
                self.glide = None;
            }
        }
    }

    fn retarget(&mut self, target: f64) {
        self.target = self.clamp(target);
        if matches!(self.smoothing, Smoothing::Eased { .. }) {
            self.glide = Some(Glide {
                from: self.current,
                elapsed: 0.0,
            });
        }
    }

    /// Advance smoothing by `dt` seconds. Returns `true` when the position moved.
    pub fn tick(&mut self, dt: f64) -> bool {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        let before = self.current;

        match self.smoothing {
            Smoothing::Damp { lambda } => {
                self.current += (self.target - self.current) * (1.0 - (-lambda * dt).exp());
            }
            Smoothing::Eased {
                duration_secs,
                ease,
            } => {
                if let Some(glide) = &mut self.glide {
                    glide.elapsed += dt;
                    let p = if duration_secs <= 0.0 {
                        1.0
                    } else {
                        (glide.elapsed / duration_secs).clamp(0.0, 1.0)
                    };
                    self.current = lerp(glide.from, self.target, ease.apply(p));
                    if p >= 1.0 {
                        self.glide = None;
                    }
                }
            }
        }

        if (self.target - self.current).abs() < SNAP_PX {
            self.current = self.target;
            self.glide = None;
        }
        self.current != before
    }

    /// Recompute the scroll limit and clamp positions into it. Idempotent.
    pub fn resize(&mut self, document_height: f64, viewport_height: f64) {
        let limit = document_height - viewport_height;
        self.limit = if limit.is_finite() { limit.max(0.0) } else { 0.0 };
        self.target = self.clamp(self.target);
        self.current = self.clamp(self.current);
        if let Some(glide) = &mut self.glide {
            glide.from = glide.from.clamp(0.0, self.limit);
        }
        tracing::debug!(limit = self.limit, "scroll limit updated");
    }

    fn clamp(&self, v: f64) -> f64 {
        v.clamp(0.0, self.limit)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scroll/normalizer.rs"]
mod tests;
