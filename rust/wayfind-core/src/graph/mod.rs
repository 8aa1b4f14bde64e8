//! Corridor waypoint graph.
//!
//! Waypoints are the intersections of horizontal (main or bypass) corridors
//! with vertical corridors. Two waypoints are adjacent when a single corridor
//! covers the straight span between them; diagonals are never synthesized.
//! The adjacency list is materialized once at build time and the graph is
//! immutable afterwards.

pub mod adjacency;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Result, WayfindError};
use crate::layout::{Corridors, Layout};
use crate::models::Point2D;
use crate::options::GraphOptions;

pub use adjacency::Adjacency;

#[derive(Clone, Debug)]
pub struct WaypointGraph {
    waypoints: Vec<Point2D>,
    adjacency: Adjacency,
    corridors: Corridors,
    options: GraphOptions,
}

impl WaypointGraph {
    pub fn build(layout: &Layout, options: GraphOptions) -> Result<Self> {
        layout.validate()?;
        if !(options.row_tolerance.is_finite() && options.row_tolerance > 0.0)
            || !(options.span_tolerance.is_finite() && options.span_tolerance >= 0.0)
        {
            return Err(WayfindError::Configuration("graph tolerances must be finite and positive".into()));
        }
        let corridors = layout.corridors.clone();
        let waypoints = intersections(&corridors);
        if waypoints.is_empty() {
            return Err(WayfindError::Configuration("layout has no corridor intersections".into()));
        }

        let mut src = Vec::new();
        let mut dst = Vec::new();
        let mut w = Vec::new();
        for (i, a) in waypoints.iter().enumerate() {
            for (j, b) in waypoints.iter().enumerate() {
                if i != j && connected(&corridors, &options, a, b) {
                    src.push(i as u32);
                    dst.push(j as u32);
                    w.push(a.distance(b));
                }
            }
        }
        let adjacency = Adjacency::build(waypoints.len(), &src, &dst, &w);
        info!(waypoints = waypoints.len(), edges = adjacency.edge_count() / 2, "waypoint graph built");
        Ok(Self { waypoints, adjacency, corridors, options })
    }

    pub fn waypoints(&self) -> &[Point2D] {
        &self.waypoints
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    pub fn waypoint(&self, index: u32) -> Point2D {
        self.waypoints[index as usize]
    }

    pub fn adjacency(&self) -> &Adjacency {
        &self.adjacency
    }

    pub fn neighbors(&self, index: u32) -> impl Iterator<Item = (u32, f64)> + '_ {
        self.adjacency.neighbors(index)
    }

    pub fn options(&self) -> &GraphOptions {
        &self.options
    }

    /// Evaluate the corridor predicate directly, for arbitrary points.
    pub fn connected(&self, a: &Point2D, b: &Point2D) -> bool {
        connected(&self.corridors, &self.options, a, b)
    }

    /// Index of the waypoint closest to `p`; ties keep the earliest waypoint.
    pub fn snap(&self, p: &Point2D) -> u32 {
        let mut best = 0u32;
        let mut best_d = f64::INFINITY;
        for (i, wp) in self.waypoints.iter().enumerate() {
            let d = p.distance(wp);
            if d < best_d {
                best_d = d;
                best = i as u32;
            }
        }
        best
    }

    pub fn manifest(&self) -> GraphManifest {
        let mut edges = Vec::with_capacity(self.adjacency.edge_count() / 2);
        for from in 0..self.waypoints.len() as u32 {
            for (to, length) in self.adjacency.neighbors(from) {
                if from < to {
                    edges.push(ManifestEdge { from, to, length });
                }
            }
        }
        GraphManifest { waypoints: self.waypoints.clone(), edges }
    }
}

/// Serializable view of the graph for renderers and offline tooling.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GraphManifest {
    pub waypoints: Vec<Point2D>,
    pub edges: Vec<ManifestEdge>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ManifestEdge {
    pub from: u32,
    pub to: u32,
    pub length: f64,
}

/// Intersections in a fixed order: main horizontals against verticals, then
/// bypasses against verticals. Duplicates keep their first position.
///
/// Only the vertical corridor's extent is checked. A bypass row therefore
/// gets a waypoint on every aisle that reaches it, even outside its own
/// span; those points link vertically only.
fn intersections(corridors: &Corridors) -> Vec<Point2D> {
    let mut seen: HashSet<(u64, u64)> = HashSet::new();
    let mut out = Vec::new();
    for h in corridors.horizontal.iter().chain(corridors.horizontal_bypass.iter()) {
        for v in &corridors.vertical {
            if !v.contains_y(h.y) {
                continue;
            }
            let p = Point2D::new(v.x, h.y);
            // -0.0 and 0.0 must collapse to one key
            let key = ((p.x + 0.0).to_bits(), (p.y + 0.0).to_bits());
            if seen.insert(key) {
                out.push(p);
            }
        }
    }
    out
}

pub(crate) fn connected(corridors: &Corridors, opts: &GraphOptions, a: &Point2D, b: &Point2D) -> bool {
    let eps = opts.row_tolerance;
    let tau = opts.span_tolerance;
    if (a.y - b.y).abs() < eps {
        let (min_x, max_x) = (a.x.min(b.x), a.x.max(b.x));
        let covered = corridors
            .all_horizontal()
            .any(|h| (a.y - h.y).abs() < eps && min_x >= h.x_start - tau && max_x <= h.x_end + tau);
        if covered {
            return true;
        }
    }
    if (a.x - b.x).abs() < eps {
        let (min_y, max_y) = (a.y.min(b.y), a.y.max(b.y));
        return corridors
            .vertical
            .iter()
            .any(|v| (a.x - v.x).abs() < eps && min_y >= v.y_start - tau && max_y <= v.y_end + tau);
    }
    false
}
