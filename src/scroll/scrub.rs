/// Catch-up rate: the playhead closes ~99% of the gap within `lag_secs`.
const CATCH_UP: f64 = 5.0;
const SNAP: f64 = 1e-4;

/// Timeline playhead that trails the scroll-derived time.
///
/// With `lag_secs == 0` it follows the target exactly.
#[derive(Clone, Debug)]
pub struct Playhead {
    lag_secs: f64,
    target: f64,
    time: Option<f64>,
}

impl Playhead {
    pub fn new(lag_secs: f64) -> Self {
        let lag_secs = if lag_secs.is_finite() { lag_secs.max(0.0) } else { 0.0 };
        Self {
            lag_secs,
            target: 0.0,
            time: None,
        }
    }

    pub fn set_target(&mut self, t: f64) {
        if t.is_finite() {
            self.target = t;
        }
    }

    pub fn target(&self) -> f64 {
        self.target
    }

    /// Current playhead time; `None` before the first tick.
    pub fn time(&self) -> Option<f64> {
        self.time
    }

    /// Place the playhead on its target immediately.
    pub fn snap(&mut self) {
        self.time = Some(self.target);
    }

    /// Returns `true` when the playhead moved (always on the first tick).
    pub fn tick(&mut self, dt: f64) -> bool {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        let Some(time) = self.time else {
            self.time = Some(self.target);
            return true;
        };

        let next = if self.lag_secs <= 0.0 {
            self.target
        } else {
            let k = 1.0 - (-CATCH_UP / self.lag_secs * dt).exp();
            let t = time + (self.target - time) * k;
            if (self.target - t).abs() < SNAP {
                self.target
            } else {
                t
            }
        };
        self.time = Some(next);
        next != time
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scroll/scrub.rs"]
mod tests;
