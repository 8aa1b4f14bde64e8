use serde::{Deserialize, Serialize};

use crate::models::Point2D;

/// Two waypoints share a horizontal row when their `y` differ by less than this.
pub const DEFAULT_ROW_TOLERANCE: f64 = 5.0;
/// Slack added to both ends of a corridor span when testing coverage.
pub const DEFAULT_SPAN_TOLERANCE: f64 = 10.0;
/// A node this close to the goal waypoint ends the search.
pub const DEFAULT_GOAL_TOLERANCE: f64 = 10.0;
pub const DEFAULT_MAX_EXPANSIONS: u32 = 200;

pub const DEFAULT_ENTRANCE: Point2D = Point2D::new(890.0, 50.0);
/// Map units per meter in the AR frame (one unit is one centimeter).
pub const DEFAULT_UNITS_PER_METER: f64 = 100.0;
/// Shelf height assigned to map points lifted into the 3D frame.
pub const DEFAULT_HEIGHT_M: f64 = 1.5;

pub const DEFAULT_STAGING: Point2D = Point2D::new(735.0, 85.0);
pub const DEFAULT_CHECKOUT: Point2D = Point2D::new(445.0, 80.0);
pub const DEFAULT_EXIT: Point2D = Point2D::new(105.0, 50.0);

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphOptions {
    pub row_tolerance: f64,
    pub span_tolerance: f64,
}

impl Default for GraphOptions {
    fn default() -> Self {
        Self { row_tolerance: DEFAULT_ROW_TOLERANCE, span_tolerance: DEFAULT_SPAN_TOLERANCE }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchOptions {
    pub goal_tolerance: f64,
    pub max_expansions: u32,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self { goal_tolerance: DEFAULT_GOAL_TOLERANCE, max_expansions: DEFAULT_MAX_EXPANSIONS }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformOptions {
    pub entrance: Point2D,
    pub units_per_meter: f64,
    pub default_height: f64,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            entrance: DEFAULT_ENTRANCE,
            units_per_meter: DEFAULT_UNITS_PER_METER,
            default_height: DEFAULT_HEIGHT_M,
        }
    }
}

/// Fixed points every trip passes through.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TripOptions {
    /// Pickup point visited before the first stop, e.g. the cart area.
    pub staging: Option<Point2D>,
    pub checkout: Point2D,
    pub exit: Point2D,
}

impl Default for TripOptions {
    fn default() -> Self {
        Self { staging: Some(DEFAULT_STAGING), checkout: DEFAULT_CHECKOUT, exit: DEFAULT_EXIT }
    }
}

/// Every knob of the engine in one deserializable bundle.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineOptions {
    pub graph: GraphOptions,
    pub search: SearchOptions,
    pub transform: TransformOptions,
    pub trip: TripOptions,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn defaults_match_store_layout() {
        let g = GraphOptions::default();
        assert_eq!(g.row_tolerance, 5.0);
        assert_eq!(g.span_tolerance, 10.0);
        let s = SearchOptions::default();
        assert_eq!(s.max_expansions, 200);
        assert_eq!(s.goal_tolerance, 10.0);
        let t = TripOptions::default();
        assert_eq!(t.checkout, Point2D::new(445.0, 80.0));
        assert_eq!(t.exit, Point2D::new(105.0, 50.0));
    }

    #[test]
    fn deserializes_with_defaults_when_missing_fields() {
        let o: SearchOptions = serde_json::from_value(json!({ "max_expansions": 50 })).unwrap();
        assert_eq!(o.max_expansions, 50);
        assert_eq!(o.goal_tolerance, DEFAULT_GOAL_TOLERANCE);

        let t: TransformOptions = serde_json::from_value(json!({ "default_height": 1.2 })).unwrap();
        assert_eq!(t.entrance, DEFAULT_ENTRANCE);
        assert_eq!(t.units_per_meter, DEFAULT_UNITS_PER_METER);
        assert_eq!(t.default_height, 1.2);

        let trip: TripOptions = serde_json::from_value(json!({ "staging": null })).unwrap();
        assert!(trip.staging.is_none());
        assert_eq!(trip.exit, DEFAULT_EXIT);
    }

    #[test]
    fn engine_options_nest_sections() {
        let o: EngineOptions = serde_json::from_value(json!({ "search": { "goal_tolerance": 4.0 } })).unwrap();
        assert_eq!(o.search.goal_tolerance, 4.0);
        assert_eq!(o.search.max_expansions, DEFAULT_MAX_EXPANSIONS);
        assert_eq!(o.graph, GraphOptions::default());
    }
}
