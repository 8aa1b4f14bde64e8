//! Greedy nearest-neighbor stop ordering.
//!
//! The order is a heuristic, not an optimal tour: from the current position
//! the closest unvisited group is always taken next, measured as a straight
//! line on the floor plan. Corridors are not consulted.

use indexmap::IndexMap;
use tracing::debug;

use crate::models::{Destination, Point2D};

/// One representative per distinct `group_key`, in visiting order.
///
/// The first destination seen for a group represents it; later members of the
/// same group are colocated and dropped. Distance ties go to the
/// representative whose group appeared first in the input.
pub fn optimize_stops(destinations: &[Destination], start: Point2D) -> Vec<Destination> {
    let mut groups: IndexMap<&str, &Destination> = IndexMap::new();
    for d in destinations {
        groups.entry(d.group_key.as_str()).or_insert(d);
    }
    let mut remaining: Vec<&Destination> = groups.into_values().collect();
    let mut ordered = Vec::with_capacity(remaining.len());
    let mut current = start;

    while !remaining.is_empty() {
        let mut nearest = 0;
        let mut min_d = current.distance(&remaining[0].position);
        for (i, d) in remaining.iter().enumerate().skip(1) {
            let dist = current.distance(&d.position);
            if dist < min_d {
                min_d = dist;
                nearest = i;
            }
        }
        // `remove` keeps the scan order of what is left stable
        let next = remaining.remove(nearest);
        current = next.position;
        ordered.push(next.clone());
    }
    debug!(input = destinations.len(), stops = ordered.len(), "stops ordered");
    ordered
}
