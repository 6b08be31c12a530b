/// Easing curves applied to a normalized local time in `[0, 1]`.
///
/// The quad and cubic families match the usual `power1` / `power2` curves used
/// when authoring scroll narratives.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum Ease {
    Linear,
    InQuad,
    OutQuad,
    InOutQuad,
    InCubic,
    OutCubic,
    InOutCubic,
    /// Overshoots past 1 before settling; `overshoot` of 1.70158 is the classic curve.
    OutBack { overshoot: f64 },
    /// `min(1, 1.001 - 2^(-10 t))`, the smooth-scroll default.
    OutExpo,
}

impl Ease {
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::InQuad => t * t,
            Self::OutQuad => 1.0 - (1.0 - t) * (1.0 - t),
            Self::InOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(2) / 2.0)
                }
            }
            Self::InCubic => t * t * t,
            Self::OutCubic => 1.0 - (1.0 - t).powi(3),
            Self::InOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(3) / 2.0)
                }
            }
            Self::OutBack { overshoot } => {
                let p = t - 1.0;
                p * p * ((overshoot + 1.0) * p + overshoot) + 1.0
            }
            Self::OutExpo => (1.001 - 2f64.powf(-10.0 * t)).min(1.0),
        }
    }

    /// `back.out(1.7)`-style helper.
    pub fn out_back(overshoot: f64) -> Self {
        Self::OutBack { overshoot }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/ease.rs"]
mod tests;
