//! Just enough 3D math to turn a pointer position into a point on the
//! drawing plane.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn dot(&self, other: &Vec3) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn sub(&self, other: &Vec3) -> Vec3 {
        Vec3::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }

    pub fn add_scaled(&self, dir: &Vec3, t: f64) -> Vec3 {
        Vec3::new(self.x + dir.x * t, self.y + dir.y * t, self.z + dir.z * t)
    }

    pub fn length(&self) -> f64 {
        self.dot(self).sqrt()
    }

    pub fn normalize(&self) -> Vec3 {
        let len = self.length();
        if len == 0.0 {
            *self
        } else {
            Vec3::new(self.x / len, self.y / len, self.z / len)
        }
    }

    pub fn distance_to(&self, other: &Vec3) -> f64 {
        self.sub(other).length()
    }

    pub fn to_array(self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }
}

impl From<[f64; 3]> for Vec3 {
    fn from([x, y, z]: [f64; 3]) -> Self {
        Vec3::new(x, y, z)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    /// Unit length.
    pub direction: Vec3,
}

/// Plane `normal · p + constant = 0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Plane {
    pub normal: Vec3,
    pub constant: f64,
}

impl Plane {
    /// The z = 0 plane strokes are drawn on.
    pub const DRAWING: Plane = Plane {
        normal: Vec3::new(0.0, 0.0, 1.0),
        constant: 0.0,
    };

    pub fn distance_to_point(&self, point: &Vec3) -> f64 {
        self.normal.dot(point) + self.constant
    }

    /// Where `ray` hits the plane, if it does in front of its origin.
    pub fn intersect(&self, ray: &Ray) -> Option<Vec3> {
        let denominator = self.normal.dot(&ray.direction);
        if denominator == 0.0 {
            // Parallel: only a ray lying in the plane touches it.
            return (self.distance_to_point(&ray.origin) == 0.0).then_some(ray.origin);
        }
        let t = -(ray.origin.dot(&self.normal) + self.constant) / denominator;
        (t >= 0.0).then(|| ray.origin.add_scaled(&ray.direction, t))
    }
}

/// Viewport size in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    /// Client coordinates to normalized device coordinates (-1..1, y up).
    pub fn to_ndc(&self, client_x: f64, client_y: f64) -> Option<(f64, f64)> {
        if self.width <= 0.0 || self.height <= 0.0 {
            return None;
        }
        Some((
            (client_x / self.width) * 2.0 - 1.0,
            -(client_y / self.height) * 2.0 + 1.0,
        ))
    }

    pub fn aspect(&self) -> f64 {
        if self.height > 0.0 {
            self.width / self.height
        } else {
            1.0
        }
    }
}

/// Perspective camera looking down -z with no rotation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerspectiveCamera {
    pub position: Vec3,
    /// Vertical field of view in degrees.
    pub fov: f64,
}

impl Default for PerspectiveCamera {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 15.0),
            fov: 45.0,
        }
    }
}

impl PerspectiveCamera {
    pub fn ray_from_ndc(&self, ndc_x: f64, ndc_y: f64, aspect: f64) -> Ray {
        let half_height = (self.fov.to_radians() / 2.0).tan();
        let direction = Vec3::new(ndc_x * half_height * aspect, ndc_y * half_height, -1.0);
        Ray {
            origin: self.position,
            direction: direction.normalize(),
        }
    }
}
