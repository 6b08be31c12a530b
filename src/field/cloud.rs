use crate::foundation::{core::Point, rng::Rng64};

pub const DEFAULT_CLOUD_POINTS: usize = 2000;
/// Edge length of the cube the points are scattered in, centered on the origin.
pub const CLOUD_EXTENT: f64 = 40.0;
pub const SPIN_Y: f64 = 0.0015;
pub const SPIN_X: f64 = 0.0005;
pub const NEAR: f64 = 0.1;
pub const FAR: f64 = 1000.0;
/// World-space point size; projected size shrinks with distance.
pub const POINT_SIZE: f64 = 0.08;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// Perspective camera on the z axis looking toward -z.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    pub z: f64,
    pub y: f64,
    pub fov_deg: f64,
    pub aspect: f64,
}

impl Camera {
    pub fn new(z: f64, fov_deg: f64, aspect: f64) -> Self {
        Self {
            z,
            y: 0.0,
            fov_deg,
            aspect,
        }
    }
}

/// A point after projection onto a `width x height` surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projected {
    pub pos: Point,
    /// Diameter in pixels.
    pub size: f64,
    /// Camera-space distance, for depth fading.
    pub depth: f64,
}

/// Slowly spinning cube of points viewed through a perspective camera.
#[derive(Clone, Debug)]
pub struct PointCloud {
    points: Vec<Vec3>,
    rotation: Vec3,
    width: f64,
    height: f64,
    camera: Camera,
}

impl PointCloud {
    pub fn new(count: usize, width: f64, height: f64, seed: u64) -> Self {
        let mut rng = Rng64::derive(seed, &[0xC10D]);
        let half = CLOUD_EXTENT / 2.0;
        let points = (0..count)
            .map(|_| {
                Vec3::new(
                    rng.range(-half, half),
                    rng.range(-half, half),
                    rng.range(-half, half),
                )
            })
            .collect();
        Self {
            points,
            rotation: Vec3::new(0.0, 0.0, 0.0),
            width,
            height,
            camera: Camera::new(30.0, 75.0, aspect(width, height)),
        }
    }

    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    pub fn rotation(&self) -> Vec3 {
        self.rotation
    }

    pub fn camera(&self) -> Camera {
        self.camera
    }

    pub fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    /// One animation frame of spin.
    pub fn advance(&mut self) {
        self.rotation.y += SPIN_Y;
        self.rotation.x += SPIN_X;
    }

    /// Follow the timeline-driven camera. Aspect stays tied to the surface.
    pub fn set_camera(&mut self, z: f64, y: f64, fov_deg: f64) {
        self.camera.z = z;
        self.camera.y = y;
        self.camera.fov_deg = fov_deg;
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
        self.camera.aspect = aspect(width, height);
    }

    /// Rotate (y then x), view and project every point. Points behind the
    /// near plane or past the far plane are culled.
    pub fn project(&self) -> Vec<Projected> {
        let (sy, cy) = self.rotation.y.sin_cos();
        let (sx, cx) = self.rotation.x.sin_cos();
        let f = 1.0 / (self.camera.fov_deg.to_radians() / 2.0).tan();
        let half_h = self.height / 2.0;

        self.points
            .iter()
            .filter_map(|p| {
                let x1 = p.x * cy + p.z * sy;
                let z1 = -p.x * sy + p.z * cy;
                let y2 = p.y * cx - z1 * sx;
                let z2 = p.y * sx + z1 * cx;

                let vy = y2 - self.camera.y;
                let depth = self.camera.z - z2;
                if !(NEAR..=FAR).contains(&depth) {
                    return None;
                }
                let ndc_x = f / self.camera.aspect * x1 / depth;
                let ndc_y = f * vy / depth;
                Some(Projected {
                    pos: Point::new(
                        (ndc_x + 1.0) / 2.0 * self.width,
                        (1.0 - ndc_y) / 2.0 * self.height,
                    ),
                    size: (POINT_SIZE * f * half_h / depth).max(1.0),
                    depth,
                })
            })
            .collect()
    }
}

fn aspect(width: f64, height: f64) -> f64 {
    if height > 0.0 { width / height } else { 1.0 }
}

#[cfg(test)]
#[path = "../../tests/unit/field/cloud.rs"]
mod tests;
