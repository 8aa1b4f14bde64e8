use std::cmp::Ordering;
use std::collections::BinaryHeap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::graph::WaypointGraph;
use crate::models::Point2D;
use crate::options::SearchOptions;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathStatus {
    /// Both endpoints snapped to the same spot; no routing was needed.
    Direct,
    Found,
    /// The expansion cap or an exhausted frontier stopped the search; the path
    /// runs straight through the two snapped waypoints.
    Degraded,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PathResult {
    pub path: Vec<Point2D>,
    pub status: PathStatus,
    pub expanded: u32,
}

#[derive(Clone, Copy, Debug)]
struct QueueNode {
    f: f64,
    g: f64,
    id: u32,
    seq: u64,
}

impl PartialEq for QueueNode {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}
impl Eq for QueueNode {}
impl PartialOrd for QueueNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for QueueNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap is max-heap; invert for lowest f, then lowest waypoint
        // index, then earliest push.
        other
            .f
            .total_cmp(&self.f)
            .then_with(|| other.id.cmp(&self.id))
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// A* over the corridor waypoint graph.
pub struct PathFinder<'a> {
    graph: &'a WaypointGraph,
    options: &'a SearchOptions,
}

impl<'a> PathFinder<'a> {
    pub fn new(graph: &'a WaypointGraph, options: &'a SearchOptions) -> Self {
        Self { graph, options }
    }

    /// Polyline from `start` to `end`; the endpoints are returned untouched.
    pub fn find_path(&self, start: Point2D, end: Point2D) -> Vec<Point2D> {
        self.search(start, end).path
    }

    pub fn search(&self, start: Point2D, end: Point2D) -> PathResult {
        let graph = self.graph;
        let s = graph.snap(&start);
        let e = graph.snap(&end);
        let start_wp = graph.waypoint(s);
        let end_wp = graph.waypoint(e);
        let tolerance = self.options.goal_tolerance;

        if start_wp.distance(&end_wp) < tolerance {
            return PathResult { path: vec![start, end], status: PathStatus::Direct, expanded: 0 };
        }

        let n = graph.len();
        let mut g_score = vec![f64::INFINITY; n];
        let mut parent = vec![u32::MAX; n];
        let mut open = BinaryHeap::new();
        let mut expanded: u32 = 0;
        let mut seq: u64 = 0;

        g_score[s as usize] = 0.0;
        open.push(QueueNode { f: start_wp.distance(&end_wp), g: 0.0, id: s, seq });

        while let Some(qn) = open.pop() {
            // Discard stale
            if qn.g > g_score[qn.id as usize] {
                continue;
            }
            if expanded >= self.options.max_expansions {
                break;
            }
            expanded += 1;

            let current = graph.waypoint(qn.id);
            // Goal is any node near the end waypoint, not only the waypoint itself.
            if current.distance(&end_wp) < tolerance {
                let mut path = reconstruct(graph, &parent, s, qn.id);
                path.insert(0, start);
                path.push(end);
                debug!(expanded, hops = path.len() - 2, cost = qn.g, "path found");
                return PathResult { path, status: PathStatus::Found, expanded };
            }

            for (v, w) in graph.neighbors(qn.id) {
                let tentative_g = qn.g + w;
                if tentative_g < g_score[v as usize] {
                    g_score[v as usize] = tentative_g;
                    parent[v as usize] = qn.id;
                    seq += 1;
                    let h = graph.waypoint(v).distance(&end_wp);
                    open.push(QueueNode { f: tentative_g + h, g: tentative_g, id: v, seq });
                }
            }
        }

        warn!(expanded, start_wp = ?start_wp, end_wp = ?end_wp, "search gave up; returning degraded path");
        PathResult { path: vec![start, start_wp, end_wp, end], status: PathStatus::Degraded, expanded }
    }
}

fn reconstruct(graph: &WaypointGraph, parent: &[u32], start: u32, goal: u32) -> Vec<Point2D> {
    let mut chain = vec![graph.waypoint(goal)];
    let mut cur = goal;
    while cur != start {
        cur = parent[cur as usize];
        if cur == u32::MAX {
            break;
        }
        chain.push(graph.waypoint(cur));
    }
    chain.reverse();
    chain
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{Corridors, HorizontalCorridor, Layout, VerticalCorridor};
    use crate::options::GraphOptions;

    fn ladder() -> WaypointGraph {
        let layout = Layout {
            obstacles: vec![],
            corridors: Corridors {
                horizontal: vec![
                    HorizontalCorridor { y: 0.0, x_start: 0.0, x_end: 300.0 },
                    HorizontalCorridor { y: 200.0, x_start: 0.0, x_end: 300.0 },
                ],
                vertical: vec![
                    VerticalCorridor { x: 0.0, y_start: 0.0, y_end: 200.0 },
                    VerticalCorridor { x: 300.0, y_start: 0.0, y_end: 200.0 },
                ],
                horizontal_bypass: vec![],
            },
        };
        WaypointGraph::build(&layout, GraphOptions::default()).unwrap()
    }

    #[test]
    fn finds_path_around_the_rectangle() {
        let graph = ladder();
        let opts = SearchOptions::default();
        let res = PathFinder::new(&graph, &opts).search(Point2D::new(-5.0, -5.0), Point2D::new(305.0, 205.0));
        assert_eq!(res.status, PathStatus::Found);
        assert_eq!(res.path.first(), Some(&Point2D::new(-5.0, -5.0)));
        assert_eq!(res.path.last(), Some(&Point2D::new(305.0, 205.0)));
        // start corner, one turning corner, goal corner
        assert_eq!(res.path.len(), 5);
        let turn = res.path[2];
        assert!(turn == Point2D::new(300.0, 0.0) || turn == Point2D::new(0.0, 200.0));
    }

    #[test]
    fn deterministic_tie_breaker() {
        let graph = ladder();
        let opts = SearchOptions::default();
        let finder = PathFinder::new(&graph, &opts);
        let a = finder.search(Point2D::new(0.0, 0.0), Point2D::new(300.0, 200.0));
        let b = finder.search(Point2D::new(0.0, 0.0), Point2D::new(300.0, 200.0));
        assert_eq!(a, b);
        // equal-cost routes: the lower waypoint index (300,0) is expanded first
        assert_eq!(a.path[2], Point2D::new(300.0, 0.0));
    }

    #[test]
    fn same_snap_point_returns_direct_pair() {
        let graph = ladder();
        let opts = SearchOptions::default();
        let res = PathFinder::new(&graph, &opts).search(Point2D::new(3.0, 4.0), Point2D::new(-2.0, 1.0));
        assert_eq!(res.status, PathStatus::Direct);
        assert_eq!(res.path, vec![Point2D::new(3.0, 4.0), Point2D::new(-2.0, 1.0)]);
    }

    #[test]
    fn expansion_cap_degrades_instead_of_failing() {
        let graph = ladder();
        let opts = SearchOptions { max_expansions: 1, ..SearchOptions::default() };
        let res = PathFinder::new(&graph, &opts).search(Point2D::new(0.0, 0.0), Point2D::new(300.0, 200.0));
        assert_eq!(res.status, PathStatus::Degraded);
        assert_eq!(res.expanded, 1);
        assert_eq!(
            res.path,
            vec![Point2D::new(0.0, 0.0), Point2D::new(0.0, 0.0), Point2D::new(300.0, 200.0), Point2D::new(300.0, 200.0)]
        );
    }

    #[test]
    fn disconnected_components_degrade() {
        let layout = Layout {
            obstacles: vec![],
            corridors: Corridors {
                horizontal: vec![
                    HorizontalCorridor { y: 150.0, x_start: 90.0, x_end: 300.0 },
                    HorizontalCorridor { y: 600.0, x_start: 500.0, x_end: 900.0 },
                ],
                vertical: vec![
                    VerticalCorridor { x: 210.0, y_start: 100.0, y_end: 410.0 },
                    VerticalCorridor { x: 700.0, y_start: 500.0, y_end: 700.0 },
                ],
                horizontal_bypass: vec![],
            },
        };
        let graph = WaypointGraph::build(&layout, GraphOptions::default()).unwrap();
        let opts = SearchOptions::default();
        let res = PathFinder::new(&graph, &opts).search(Point2D::new(200.0, 140.0), Point2D::new(710.0, 610.0));
        assert_eq!(res.status, PathStatus::Degraded);
        assert_eq!(res.expanded, 1);
        assert_eq!(res.path[1], Point2D::new(210.0, 150.0));
        assert_eq!(res.path[2], Point2D::new(700.0, 600.0));
    }
}
