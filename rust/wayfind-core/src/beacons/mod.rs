//! Virtual beacons placed by retailers at shelf positions.
//!
//! Storage is an injected collaborator: anything that implements
//! [`BeaconRepository`]. The engine only reads through it.

pub mod signal;

use std::sync::RwLock;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Result, WayfindError};
use crate::models::{Point2D, Point3D};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Beacon {
    pub id: String,
    pub name: String,
    /// Destination (product) this beacon marks, when it marks one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_id: Option<String>,
    pub world_position: Point3D,
    pub map_position: Point2D,
    #[serde(default)]
    pub placed_by: String,
}

/// A beacon before the repository has assigned its id.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NewBeacon {
    pub name: String,
    #[serde(default)]
    pub destination_id: Option<String>,
    pub world_position: Point3D,
    pub map_position: Point2D,
    #[serde(default)]
    pub placed_by: String,
}

impl NewBeacon {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(WayfindError::InvalidInput("beacon name is required".into()));
        }
        if !self.world_position.is_finite() {
            return Err(WayfindError::InvalidInput("beacon world position has non-finite coordinates".into()));
        }
        if !self.map_position.is_finite() {
            return Err(WayfindError::InvalidInput("beacon map position has non-finite coordinates".into()));
        }
        Ok(())
    }

    pub fn with_id(self, id: String) -> Beacon {
        Beacon {
            id,
            name: self.name.trim().to_string(),
            destination_id: self.destination_id,
            world_position: self.world_position,
            map_position: self.map_position,
            placed_by: self.placed_by,
        }
    }
}

pub trait BeaconRepository: Send + Sync {
    fn get(&self, id: &str) -> Result<Option<Beacon>>;
    /// Validate, assign an id, store.
    fn add(&self, beacon: NewBeacon) -> Result<Beacon>;
    /// Returns whether a beacon was removed.
    fn remove(&self, id: &str) -> Result<bool>;
    /// All beacons in placement order.
    fn list(&self) -> Result<Vec<Beacon>>;

    /// Closest beacon in full 3D distance; the earliest placed wins ties.
    fn nearest(&self, world: Point3D) -> Result<Option<Beacon>> {
        let mut best: Option<(f64, Beacon)> = None;
        for b in self.list()? {
            let d = world.distance(&b.world_position);
            if best.as_ref().map(|(bd, _)| d < *bd).unwrap_or(true) {
                best = Some((d, b));
            }
        }
        Ok(best.map(|(_, b)| b))
    }

    fn by_destination(&self, destination_id: &str) -> Result<Option<Beacon>> {
        Ok(self.list()?.into_iter().find(|b| b.destination_id.as_deref() == Some(destination_id)))
    }
}

#[derive(Debug, Default)]
struct Store {
    beacons: Vec<Beacon>,
    next_id: u64,
}

/// Process-local repository, for tests and single-node deployments.
#[derive(Debug, Default)]
pub struct InMemoryBeaconRepository {
    inner: RwLock<Store>,
}

impl InMemoryBeaconRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<T>(_: T) -> WayfindError {
    WayfindError::Repository("beacon store lock poisoned".into())
}

impl BeaconRepository for InMemoryBeaconRepository {
    fn get(&self, id: &str) -> Result<Option<Beacon>> {
        let guard = self.inner.read().map_err(poisoned)?;
        Ok(guard.beacons.iter().find(|b| b.id == id).cloned())
    }

    fn add(&self, beacon: NewBeacon) -> Result<Beacon> {
        beacon.validate()?;
        let mut guard = self.inner.write().map_err(poisoned)?;
        guard.next_id += 1;
        let stored = beacon.with_id(format!("beacon-{}", guard.next_id));
        guard.beacons.push(stored.clone());
        info!(id = %stored.id, name = %stored.name, "beacon placed");
        Ok(stored)
    }

    fn remove(&self, id: &str) -> Result<bool> {
        let mut guard = self.inner.write().map_err(poisoned)?;
        let before = guard.beacons.len();
        guard.beacons.retain(|b| b.id != id);
        Ok(guard.beacons.len() != before)
    }

    fn list(&self) -> Result<Vec<Beacon>> {
        let guard = self.inner.read().map_err(poisoned)?;
        Ok(guard.beacons.clone())
    }
}
