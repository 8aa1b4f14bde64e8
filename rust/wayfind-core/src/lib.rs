pub mod error;
pub mod models;
pub mod options;
pub mod layout;
pub mod graph;
pub mod astar;
pub mod optimizer;
pub mod route;
pub mod transform;
pub mod bearing;
pub mod beacons;
pub mod engine;

pub use error::{Result, WayfindError};
pub use models::{path_length, Destination, Point2D, Point3D};
pub use options::{EngineOptions, GraphOptions, SearchOptions, TransformOptions, TripOptions};
pub use layout::{Corridors, HorizontalCorridor, Layout, Obstacle, VerticalCorridor};
pub use graph::{GraphManifest, WaypointGraph};
pub use astar::{PathFinder, PathResult, PathStatus};
pub use optimizer::optimize_stops;
pub use route::{build_full_route, Direction, NavigationStep, RouteSummary, TurnSegment};
pub use transform::CoordinateTransform;
pub use bearing::{bearing_and_distance, direction_to, Bearing, ARRIVAL_THRESHOLD_M};
pub use beacons::{Beacon, BeaconRepository, InMemoryBeaconRepository, NewBeacon};
pub use engine::{TripPlan, Wayfinder};

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
