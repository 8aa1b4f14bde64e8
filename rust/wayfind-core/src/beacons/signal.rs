//! Fixed radio beacons on the floor plan and coarse positioning from them.

use serde::{Deserialize, Serialize};

use crate::models::Point2D;

pub const DEFAULT_SCAN_RANGE: f64 = 100.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalKind {
    Entrance,
    Aisle,
    Department,
    Checkout,
    Display,
    Waypoint,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SignalBeacon {
    pub id: String,
    pub name: String,
    pub kind: SignalKind,
    pub position: Point2D,
    /// Detection range in map units.
    pub range: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub beacon: SignalBeacon,
    pub distance: f64,
    /// 0..=100, falling linearly to zero at the beacon's range.
    pub signal: f64,
}

/// Beacons within `max_range` of `position`, nearest first.
pub fn nearby(beacons: &[SignalBeacon], position: Point2D, max_range: f64) -> Vec<Detection> {
    let mut out: Vec<Detection> = beacons
        .iter()
        .filter_map(|b| {
            let distance = position.distance(&b.position);
            (distance <= max_range).then(|| Detection {
                beacon: b.clone(),
                distance,
                signal: (100.0 - distance / b.range * 100.0).max(0.0),
            })
        })
        .collect();
    out.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    out
}

pub fn by_id<'a>(beacons: &'a [SignalBeacon], id: &str) -> Option<&'a SignalBeacon> {
    beacons.iter().find(|b| b.id == id)
}

/// Beacons of one kind, in deployment order.
pub fn by_kind(beacons: &[SignalBeacon], kind: SignalKind) -> Vec<&SignalBeacon> {
    beacons.iter().filter(|b| b.kind == kind).collect()
}

/// Signal-weighted centroid. Needs at least two detections with some signal.
pub fn estimate_position(detections: &[Detection]) -> Option<Point2D> {
    if detections.len() < 2 {
        return None;
    }
    let mut total = 0.0;
    let (mut wx, mut wy) = (0.0, 0.0);
    for d in detections {
        let weight = d.signal / 100.0;
        wx += d.beacon.position.x * weight;
        wy += d.beacon.position.y * weight;
        total += weight;
    }
    if total == 0.0 {
        return None;
    }
    Some(Point2D::new(wx / total, wy / total))
}

/// The deployment matching [`crate::layout::Layout::store`].
pub fn store() -> Vec<SignalBeacon> {
    let b = |id: &str, name: &str, kind: SignalKind, x: f64, y: f64, range: f64| SignalBeacon {
        id: id.to_string(),
        name: name.to_string(),
        kind,
        position: Point2D::new(x, y),
        range,
    };
    let mut out = vec![
        b("beacon-entrance-1", "Entrance", SignalKind::Entrance, 890.0, 50.0, 50.0),
        b("beacon-cart-1", "Cart Area", SignalKind::Waypoint, 735.0, 85.0, 30.0),
    ];
    for (i, x) in [252.0, 302.0, 382.0, 432.0, 512.0, 562.0, 642.0, 692.0].into_iter().enumerate() {
        let n = i + 1;
        out.push(b(&format!("beacon-aisle-{n}"), &format!("Aisle {n}"), SignalKind::Aisle, x, 200.0, 40.0));
    }
    out.extend([
        b("beacon-dairy", "Dairy", SignalKind::Department, 50.0, 305.0, 50.0),
        b("beacon-produce", "Produce", SignalKind::Department, 950.0, 305.0, 50.0),
        b("beacon-meat", "Meat", SignalKind::Department, 170.0, 515.0, 50.0),
        b("beacon-frozen", "Frozen", SignalKind::Department, 485.0, 530.0, 50.0),
        b("beacon-bakery", "Bakery", SignalKind::Department, 830.0, 515.0, 50.0),
        b("beacon-display-1", "Display D1", SignalKind::Display, 150.0, 220.0, 35.0),
        b("beacon-display-2", "Display D2", SignalKind::Display, 770.0, 340.0, 35.0),
    ]);
    for (i, x) in [317.0, 417.0, 517.0, 617.0].into_iter().enumerate() {
        let n = i + 1;
        out.push(b(&format!("beacon-checkout-{n}"), &format!("Checkout {n}"), SignalKind::Checkout, x, 75.0, 30.0));
    }
    out.push(b("beacon-exit-1", "Exit", SignalKind::Entrance, 105.0, 50.0, 50.0));
    let corners = [210.0, 342.0, 472.0, 602.0, 735.0];
    for (i, (x, y)) in corners.iter().map(|&x| (x, 150.0)).chain(corners.iter().map(|&x| (x, 410.0))).enumerate() {
        out.push(b(&format!("beacon-waypoint-{}", i + 1), "Waypoint", SignalKind::Waypoint, x, y, 25.0));
    }
    out
}
