use crate::error::{Result, WayfindError};
use crate::models::{Point2D, Point3D};
use crate::options::TransformOptions;

/// Maps between the floor plan and the AR world frame anchored at the
/// entrance. World `x` grows to the right, `z` grows backwards (moving down
/// the floor plan is moving forward, i.e. negative `z`).
#[derive(Clone, Debug, PartialEq)]
pub struct CoordinateTransform {
    entrance: Point2D,
    units_per_meter: f64,
    default_height: f64,
}

impl CoordinateTransform {
    pub fn new(options: &TransformOptions) -> Result<Self> {
        if !options.entrance.is_finite() || !options.default_height.is_finite() {
            return Err(WayfindError::Configuration("transform anchor must be finite".into()));
        }
        if !(options.units_per_meter.is_finite() && options.units_per_meter > 0.0) {
            return Err(WayfindError::Configuration(format!(
                "units_per_meter must be positive, got {}",
                options.units_per_meter
            )));
        }
        Ok(Self {
            entrance: options.entrance,
            units_per_meter: options.units_per_meter,
            default_height: options.default_height,
        })
    }

    pub fn entrance(&self) -> Point2D {
        self.entrance
    }

    pub fn map_to_world(&self, p: Point2D) -> Point3D {
        self.map_to_world_at(p, self.default_height)
    }

    pub fn map_to_world_at(&self, p: Point2D, height: f64) -> Point3D {
        Point3D {
            x: (p.x - self.entrance.x) / self.units_per_meter,
            y: height,
            z: -(p.y - self.entrance.y) / self.units_per_meter,
        }
    }

    /// Height is dropped; the floor plan has no vertical axis.
    pub fn world_to_map(&self, w: Point3D) -> Point2D {
        Point2D {
            x: self.entrance.x + w.x * self.units_per_meter,
            y: self.entrance.y - w.z * self.units_per_meter,
        }
    }
}

impl Default for CoordinateTransform {
    fn default() -> Self {
        let o = TransformOptions::default();
        Self { entrance: o.entrance, units_per_meter: o.units_per_meter, default_height: o.default_height }
    }
}
