//! Decorative background motion behind the scene.

pub mod cloud;
pub mod dashes;

use cloud::PointCloud;
use dashes::DashField;

/// The background for one story variant. Advances once per animation frame
/// regardless of scroll.
#[derive(Clone, Debug)]
pub enum MotionField {
    Dashes(DashField),
    Cloud(PointCloud),
}

impl MotionField {
    pub fn advance(&mut self) {
        match self {
            Self::Dashes(f) => {
                let wrapped = f.advance();
                if wrapped > 0 {
                    tracing::trace!(wrapped, "dashes re-entered");
                }
            }
            Self::Cloud(c) => c.advance(),
        }
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        match self {
            Self::Dashes(f) => f.resize(width, height),
            Self::Cloud(c) => c.resize(width, height),
        }
    }

    pub fn size(&self) -> (f64, f64) {
        match self {
            Self::Dashes(f) => f.size(),
            Self::Cloud(c) => c.size(),
        }
    }
}
