use crate::foundation::rng::Rng64;

pub const DEFAULT_DASH_COUNT: usize = 120;
pub const DASH_WIDTH: f64 = 2.0;

/// One falling dash. Units are surface pixels and pixels per frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Dash {
    pub x: f64,
    pub y: f64,
    pub length: f64,
    pub width: f64,
    pub vy: f64,
    pub opacity: f64,
    /// Glow blur in pixels. Dashes of similar glow share one blur pass.
    pub glow: f64,
}

/// Fixed pool of vertical dashes drifting down a `width x height` surface
/// and re-entering from the top.
#[derive(Clone, Debug)]
pub struct DashField {
    width: f64,
    height: f64,
    dashes: Vec<Dash>,
    rng: Rng64,
}

impl DashField {
    pub fn new(count: usize, width: f64, height: f64, seed: u64) -> Self {
        let mut rng = Rng64::derive(seed, &[0xDA5E]);
        let dashes = (0..count)
            .map(|_| {
                let mut d = Dash {
                    x: 0.0,
                    y: rng.range(0.0, height),
                    length: 0.0,
                    width: DASH_WIDTH,
                    vy: rng.range(0.5, 1.3),
                    opacity: 0.0,
                    glow: 0.0,
                };
                reroll(&mut d, &mut rng, width);
                d
            })
            .collect();
        Self {
            width,
            height,
            dashes,
            rng,
        }
    }

    pub fn dashes(&self) -> &[Dash] {
        &self.dashes
    }

    pub fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    /// One animation frame of motion. Returns how many dashes wrapped.
    pub fn advance(&mut self) -> usize {
        let mut wrapped = 0;
        for d in &mut self.dashes {
            d.y += d.vy;
            if d.y > self.height + d.length {
                reroll(d, &mut self.rng, self.width);
                d.y = -d.length;
                wrapped += 1;
            }
        }
        wrapped
    }

    /// Adopt a new surface size. Dashes keep their positions; those now
    /// outside the surface horizontally drift back in on their next wrap.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }
}

fn reroll(d: &mut Dash, rng: &mut Rng64, width: f64) {
    d.x = rng.range(0.0, width);
    d.length = rng.range(8.0, 23.0);
    d.opacity = rng.range(0.25, 0.5);
    d.glow = rng.range(6.0, 14.0);
}

#[cfg(test)]
#[path = "../../tests/unit/field/dashes.rs"]
mod tests;
