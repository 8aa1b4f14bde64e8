use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::models::Point3D;

/// Distance below which the caller may treat the target as reached.
pub const ARRIVAL_THRESHOLD_M: f64 = 0.5;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bearing {
    /// Radians in (-π, π]; 0 is straight ahead, positive to the right.
    pub angle: f64,
    /// Full 3D distance in meters, height included.
    pub distance: f64,
}

impl Bearing {
    pub fn arrived(&self) -> bool {
        self.distance < ARRIVAL_THRESHOLD_M
    }
}

/// Heading of a horizontal direction, measured from world forward (-z).
fn heading(x: f64, z: f64) -> f64 {
    x.atan2(-z)
}

/// Fold an angle into (-π, π].
pub fn normalize_angle(mut angle: f64) -> f64 {
    while angle > PI {
        angle -= 2.0 * PI;
    }
    while angle <= -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Only the horizontal components of `forward` matter and it need not be unit length.
pub fn bearing_and_distance(observer: Point3D, forward: Point3D, target: Point3D) -> Bearing {
    let target_heading = heading(target.x - observer.x, target.z - observer.z);
    let observer_heading = heading(forward.x, forward.z);
    Bearing { angle: normalize_angle(target_heading - observer_heading), distance: observer.distance(&target) }
}

/// Unit vector from `observer` toward `target`; world forward when they coincide.
pub fn direction_to(observer: Point3D, target: Point3D) -> Point3D {
    let d = observer.distance(&target);
    if d == 0.0 {
        return Point3D::new(0.0, 0.0, -1.0);
    }
    Point3D::new((target.x - observer.x) / d, (target.y - observer.y) / d, (target.z - observer.z) / d)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ORIGIN: Point3D = Point3D::new(0.0, 0.0, 0.0);
    const FORWARD: Point3D = Point3D::new(0.0, 0.0, -1.0);

    #[test]
    fn straight_ahead_is_zero() {
        for h in [-2.0, 0.0, 1.5, 7.0] {
            let b = bearing_and_distance(ORIGIN, FORWARD, Point3D::new(0.0, h, -5.0));
            assert!(b.angle.abs() < 1e-12);
        }
    }

    #[test]
    fn behind_is_pi() {
        let b = bearing_and_distance(ORIGIN, FORWARD, Point3D::new(0.0, 1.5, 5.0));
        assert!((b.angle.abs() - PI).abs() < 1e-12);
        assert!(b.angle > 0.0, "π itself lies inside (-π, π]");
    }

    #[test]
    fn right_is_positive_left_is_negative() {
        let right = bearing_and_distance(ORIGIN, FORWARD, Point3D::new(3.0, 0.0, -3.0));
        assert!((right.angle - PI / 4.0).abs() < 1e-12);
        let left = bearing_and_distance(ORIGIN, FORWARD, Point3D::new(-3.0, 0.0, 0.0));
        assert!((left.angle + PI / 2.0).abs() < 1e-12);
    }

    #[test]
    fn forward_vector_scale_is_ignored() {
        let t = Point3D::new(2.0, 1.0, -1.0);
        let a = bearing_and_distance(ORIGIN, Point3D::new(1.0, 0.3, -1.0), t);
        let b = bearing_and_distance(ORIGIN, Point3D::new(10.0, -4.0, -10.0), t);
        assert!((a.angle - b.angle).abs() < 1e-12);
    }

    #[test]
    fn wraps_across_the_seam() {
        // observer faces back-left, target back-right: the short way is through ±π
        let b = bearing_and_distance(ORIGIN, Point3D::new(-0.1, 0.0, 1.0), Point3D::new(0.1, 0.0, 1.0));
        assert!(b.angle < 0.0 && b.angle > -PI);
        assert!(b.angle.abs() < 0.3);
    }

    #[test]
    fn distance_includes_height() {
        let b = bearing_and_distance(ORIGIN, FORWARD, Point3D::new(0.0, 0.6, -0.8));
        assert!((b.distance - 1.0).abs() < 1e-12);
        assert!(!b.arrived());
        let close = bearing_and_distance(ORIGIN, FORWARD, Point3D::new(0.0, 0.0, -0.2));
        assert!(close.arrived());
    }

    #[test]
    fn normalize_keeps_range() {
        assert!((normalize_angle(2.5 * PI) - PI / 2.0).abs() < 1e-12);
        assert!((normalize_angle(-PI) - PI).abs() < 1e-12);
        assert!((normalize_angle(-5.0 * PI / 2.0) + PI / 2.0).abs() < 1e-12);
    }

    #[test]
    fn direction_is_unit_or_forward() {
        let d = direction_to(ORIGIN, Point3D::new(0.0, 3.0, -4.0));
        assert!((d.y - 0.6).abs() < 1e-12 && (d.z + 0.8).abs() < 1e-12);
        assert_eq!(direction_to(ORIGIN, ORIGIN), FORWARD);
    }
}
