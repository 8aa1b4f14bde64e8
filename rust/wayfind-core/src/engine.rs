//! Validating facade over the engine.
//!
//! Every public method checks its inputs once and then hands off to the pure
//! helpers, which assume finite coordinates. A `Wayfinder` is immutable after
//! construction and can be shared across threads behind an `Arc`.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::astar::{PathFinder, PathResult};
use crate::beacons::BeaconRepository;
use crate::bearing::{bearing_and_distance, Bearing};
use crate::error::{ensure_finite, Result, WayfindError};
use crate::graph::WaypointGraph;
use crate::layout::Layout;
use crate::models::{Destination, Point2D, Point3D};
use crate::optimizer::optimize_stops;
use crate::options::{EngineOptions, SearchOptions, TripOptions};
use crate::route::{build_full_route, navigation_steps, turn_segments, NavigationStep, RouteSummary, TurnSegment};
use crate::transform::CoordinateTransform;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TripPlan {
    pub stops: Vec<Destination>,
    pub path: Vec<Point2D>,
    pub segments: Vec<TurnSegment>,
    pub steps: Vec<NavigationStep>,
    pub summary: RouteSummary,
}

#[derive(Clone, Debug)]
pub struct Wayfinder {
    graph: WaypointGraph,
    search: SearchOptions,
    trip: TripOptions,
    transform: CoordinateTransform,
}

fn check_2d(what: &str, p: &Point2D) -> Result<()> {
    ensure_finite(what, &[p.x, p.y])
}

fn check_3d(what: &str, p: &Point3D) -> Result<()> {
    ensure_finite(what, &[p.x, p.y, p.z])
}

fn check_destinations(destinations: &[Destination]) -> Result<()> {
    for d in destinations {
        check_2d(&format!("destination {}", d.id), &d.position)?;
    }
    Ok(())
}

impl Wayfinder {
    pub fn new(layout: &Layout, options: EngineOptions) -> Result<Self> {
        let graph = WaypointGraph::build(layout, options.graph)?;
        let transform = CoordinateTransform::new(&options.transform)?;
        if options.search.max_expansions == 0 {
            return Err(WayfindError::Configuration("max_expansions must be at least 1".into()));
        }
        if !(options.search.goal_tolerance.is_finite() && options.search.goal_tolerance >= 0.0) {
            return Err(WayfindError::Configuration("goal_tolerance must be finite and non-negative".into()));
        }
        let trip = options.trip;
        if let Some(staging) = &trip.staging {
            check_2d("staging", staging).map_err(|e| WayfindError::Configuration(e.to_string()))?;
        }
        check_2d("checkout", &trip.checkout).map_err(|e| WayfindError::Configuration(e.to_string()))?;
        check_2d("exit", &trip.exit).map_err(|e| WayfindError::Configuration(e.to_string()))?;
        info!(waypoints = graph.len(), max_expansions = options.search.max_expansions, "wayfinder ready");
        Ok(Self { graph, search: options.search, trip, transform })
    }

    /// Engine over the built-in store layout with default options.
    pub fn store() -> Result<Self> {
        Self::new(&Layout::store(), EngineOptions::default())
    }

    pub fn graph(&self) -> &WaypointGraph {
        &self.graph
    }

    pub fn trip_options(&self) -> &TripOptions {
        &self.trip
    }

    pub fn transform(&self) -> &CoordinateTransform {
        &self.transform
    }

    pub fn finder(&self) -> PathFinder<'_> {
        PathFinder::new(&self.graph, &self.search)
    }

    pub fn find_path(&self, start: Point2D, end: Point2D) -> Result<Vec<Point2D>> {
        Ok(self.search(start, end)?.path)
    }

    pub fn search(&self, start: Point2D, end: Point2D) -> Result<PathResult> {
        check_2d("start", &start)?;
        check_2d("end", &end)?;
        Ok(self.finder().search(start, end))
    }

    pub fn optimize_stops(&self, destinations: &[Destination], start: Point2D) -> Result<Vec<Destination>> {
        check_2d("start", &start)?;
        check_destinations(destinations)?;
        Ok(optimize_stops(destinations, start))
    }

    pub fn build_full_route(
        &self,
        start: Point2D,
        staging: Option<Point2D>,
        stops: &[Destination],
        checkout: Point2D,
        exit: Point2D,
    ) -> Result<Vec<Point2D>> {
        check_2d("start", &start)?;
        if let Some(s) = &staging {
            check_2d("staging", s)?;
        }
        check_destinations(stops)?;
        check_2d("checkout", &checkout)?;
        check_2d("exit", &exit)?;
        Ok(build_full_route(&self.finder(), start, staging, stops, checkout, exit))
    }

    pub fn map_to_world(&self, p: Point2D) -> Result<Point3D> {
        check_2d("map point", &p)?;
        Ok(self.transform.map_to_world(p))
    }

    pub fn world_to_map(&self, w: Point3D) -> Result<Point2D> {
        check_3d("world point", &w)?;
        Ok(self.transform.world_to_map(w))
    }

    pub fn bearing_and_distance(&self, observer: Point3D, forward: Point3D, target: Point3D) -> Result<Bearing> {
        check_3d("observer", &observer)?;
        check_3d("forward", &forward)?;
        check_3d("target", &target)?;
        if forward.x == 0.0 && forward.z == 0.0 {
            return Err(WayfindError::InvalidInput("forward has no horizontal component".into()));
        }
        Ok(bearing_and_distance(observer, forward, target))
    }

    /// Bearing toward a stored beacon's world position.
    pub fn bearing_to_beacon(
        &self,
        repo: &dyn BeaconRepository,
        observer: Point3D,
        forward: Point3D,
        beacon_id: &str,
    ) -> Result<Bearing> {
        let beacon = repo
            .get(beacon_id)?
            .ok_or_else(|| WayfindError::NotFound(format!("beacon {beacon_id}")))?;
        self.bearing_and_distance(observer, forward, beacon.world_position)
    }

    /// Order the stops, route through staging, stops, checkout and exit.
    pub fn plan_trip(&self, destinations: &[Destination], start: Point2D) -> Result<TripPlan> {
        if destinations.is_empty() {
            return Err(WayfindError::InvalidInput("at least one destination is required".into()));
        }
        check_2d("start", &start)?;
        check_destinations(destinations)?;

        let stops = optimize_stops(destinations, start);
        let path = build_full_route(&self.finder(), start, self.trip.staging, &stops, self.trip.checkout, self.trip.exit);
        let segments = turn_segments(&path);
        let steps = navigation_steps(&stops, start);
        // Time estimates always count from the store entrance, wherever the trip starts.
        let summary = RouteSummary::new(&stops, self.transform.entrance(), &path);
        info!(stops = stops.len(), points = path.len(), minutes = summary.estimated_minutes, "trip planned");
        Ok(TripPlan { stops, path, segments, steps, summary })
    }
}
