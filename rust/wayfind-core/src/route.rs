use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::astar::PathFinder;
use crate::models::{path_length, Destination, Point2D};

/// Floor-plan units per meter used for walking estimates.
pub const PLAN_UNITS_PER_METER: f64 = 10.0;
pub const WALKING_SPEED_MPS: f64 = 1.4;
pub const MINUTES_PER_STOP: f64 = 2.0;

/// Stitch one continuous polyline: start, optional staging point, each stop
/// in order, checkout, exit. Each leg after the first drops its first point,
/// which repeats the previous leg's last one.
pub fn build_full_route(
    finder: &PathFinder<'_>,
    start: Point2D,
    staging: Option<Point2D>,
    stops: &[Destination],
    checkout: Point2D,
    exit: Point2D,
) -> Vec<Point2D> {
    let targets = staging
        .into_iter()
        .chain(stops.iter().map(|d| d.position))
        .chain([checkout, exit]);

    let mut route = vec![start];
    let mut current = start;
    for target in targets {
        let leg = finder.find_path(current, target);
        route.extend_from_slice(&leg[1..]);
        current = target;
    }
    route
}

/// Screen-space heading on the floor plan; `y` grows downward.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Dominant axis of the move; vertical wins exact diagonals.
    pub fn between(from: &Point2D, to: &Point2D) -> Self {
        let dx = to.x - from.x;
        let dy = to.y - from.y;
        if dx.abs() > dy.abs() {
            if dx > 0.0 { Direction::Right } else { Direction::Left }
        } else if dy > 0.0 {
            Direction::Down
        } else {
            Direction::Up
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TurnSegment {
    pub from: Point2D,
    pub to: Point2D,
    pub direction: Direction,
    /// Map units.
    pub length: f64,
}

/// Collapse a polyline into maximal runs that keep one heading.
pub fn turn_segments(route: &[Point2D]) -> Vec<TurnSegment> {
    let mut out: Vec<TurnSegment> = Vec::new();
    for w in route.windows(2) {
        let (a, b) = (w[0], w[1]);
        let length = a.distance(&b);
        if length <= f64::EPSILON {
            continue;
        }
        let direction = Direction::between(&a, &b);
        match out.last_mut() {
            Some(last) if last.direction == direction => {
                last.to = b;
                last.length += length;
            }
            _ => out.push(TurnSegment { from: a, to: b, direction, length }),
        }
    }
    out
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NavigationStep {
    pub destination_id: String,
    pub direction: Direction,
    /// Straight-line distance from the previous stop, whole meters, at least 1.
    pub distance_m: u32,
}

pub fn navigation_steps(stops: &[Destination], start: Point2D) -> Vec<NavigationStep> {
    let mut previous = start;
    stops
        .iter()
        .map(|d| {
            let meters = (previous.distance(&d.position) / PLAN_UNITS_PER_METER).round().max(1.0);
            let step = NavigationStep {
                destination_id: d.id.clone(),
                direction: Direction::between(&previous, &d.position),
                distance_m: meters as u32,
            };
            previous = d.position;
            step
        })
        .collect()
}

/// Two minutes per stop plus walking the straight-line chain from `from`.
pub fn estimate_minutes(stops: &[Destination], from: Point2D) -> u32 {
    let mut total = 0.0;
    let mut current = from;
    for d in stops {
        total += current.distance(&d.position);
        current = d.position;
    }
    let walking = total / PLAN_UNITS_PER_METER / WALKING_SPEED_MPS / 60.0;
    (stops.len() as f64 * MINUTES_PER_STOP + walking).round() as u32
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RouteSummary {
    /// Stops plus the staging and checkout visits.
    pub total_stops: usize,
    pub distinct_groups: usize,
    pub estimated_minutes: u32,
    pub path_length_m: f64,
}

impl RouteSummary {
    pub fn new(stops: &[Destination], from: Point2D, route: &[Point2D]) -> Self {
        let groups: HashSet<&str> = stops.iter().map(|d| d.group_key.as_str()).collect();
        Self {
            total_stops: stops.len() + 2,
            distinct_groups: groups.len(),
            estimated_minutes: estimate_minutes(stops, from),
            path_length_m: path_length(route) / PLAN_UNITS_PER_METER,
        }
    }
}
