use serde::{Deserialize, Serialize};

/// Floor-plan coordinate. Ten map units are roughly one meter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Point2D) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Egocentric world coordinate in meters: `y` is height, negative `z` points
/// forward from the entrance.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point3D {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3D {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn distance(&self, other: &Point3D) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        let dz = other.z - self.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

/// A stop the caller wants to visit. Destinations sharing a `group_key` are
/// colocated and visited once.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Destination {
    pub id: String,
    pub position: Point2D,
    pub group_key: String,
}

impl Destination {
    pub fn new(id: impl Into<String>, position: Point2D, group_key: impl Into<String>) -> Self {
        Self { id: id.into(), position, group_key: group_key.into() }
    }
}

/// Total length of a polyline in map units.
pub fn path_length(points: &[Point2D]) -> f64 {
    points.windows(2).map(|w| w[0].distance(&w[1])).sum()
}
