//! SQLite-backed [`BeaconRepository`].
//!
//! Ids are the table's autoincrement key rendered as `beacon-{n}`, so they are
//! never reused after a delete.

use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::info;
use wayfind_core::{Beacon, BeaconRepository, NewBeacon, Point2D, Point3D, WayfindError};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS virtual_beacons (
    beacon_seq     INTEGER PRIMARY KEY AUTOINCREMENT,
    name           TEXT NOT NULL,
    destination_id TEXT,
    world_x        REAL NOT NULL,
    world_y        REAL NOT NULL,
    world_z        REAL NOT NULL,
    map_x          REAL NOT NULL,
    map_y          REAL NOT NULL,
    placed_by      TEXT NOT NULL DEFAULT ''
);
CREATE INDEX IF NOT EXISTS idx_virtual_beacons_destination ON virtual_beacons(destination_id);
";

const COLUMNS: &str = "beacon_seq, name, destination_id, world_x, world_y, world_z, map_x, map_y, placed_by";

pub struct SqliteBeaconRepository {
    conn: Mutex<Connection>,
}

impl SqliteBeaconRepository {
    /// Open (creating when missing) and ensure the schema exists.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path).with_context(|| format!("failed to open beacon db {}", path.display()))?;
        Self::from_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("open in-memory beacon db")?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        Self::apply_pragmas(&conn);
        conn.execute_batch(SCHEMA).context("create beacon schema")?;
        Ok(Self { conn: Mutex::new(conn) })
    }

    fn apply_pragmas(conn: &Connection) {
        // Best-effort; in-memory databases ignore journal_mode
        let _ = conn.pragma_update(None, "journal_mode", "WAL");
        let _ = conn.pragma_update(None, "synchronous", "NORMAL");
    }

    pub fn count(&self) -> Result<usize> {
        let conn = self.conn.lock().map_err(|_| anyhow::anyhow!("beacon db lock poisoned"))?;
        let n: i64 = conn
            .query_row("SELECT COUNT(*) FROM virtual_beacons", [], |r| r.get(0))
            .context("count beacons")?;
        Ok(n as usize)
    }

    fn lock(&self) -> wayfind_core::Result<std::sync::MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| WayfindError::Repository("beacon db lock poisoned".into()))
    }
}

fn repo_err(e: rusqlite::Error) -> WayfindError {
    WayfindError::Repository(e.to_string())
}

/// `beacon-42` -> 42; anything else cannot name a stored row.
fn parse_id(id: &str) -> Option<i64> {
    id.strip_prefix("beacon-")?.parse().ok()
}

fn beacon_from_row(r: &Row<'_>) -> rusqlite::Result<Beacon> {
    let seq: i64 = r.get(0)?;
    Ok(Beacon {
        id: format!("beacon-{seq}"),
        name: r.get(1)?,
        destination_id: r.get(2)?,
        world_position: Point3D::new(r.get(3)?, r.get(4)?, r.get(5)?),
        map_position: Point2D::new(r.get(6)?, r.get(7)?),
        placed_by: r.get(8)?,
    })
}

impl BeaconRepository for SqliteBeaconRepository {
    fn get(&self, id: &str) -> wayfind_core::Result<Option<Beacon>> {
        let Some(seq) = parse_id(id) else { return Ok(None) };
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare_cached(&format!("SELECT {COLUMNS} FROM virtual_beacons WHERE beacon_seq = ?1"))
            .map_err(repo_err)?;
        stmt.query_row(params![seq], beacon_from_row).optional().map_err(repo_err)
    }

    fn add(&self, beacon: NewBeacon) -> wayfind_core::Result<Beacon> {
        beacon.validate()?;
        let conn = self.lock()?;
        let name = beacon.name.trim();
        conn.execute(
            "INSERT INTO virtual_beacons (name, destination_id, world_x, world_y, world_z, map_x, map_y, placed_by)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                name,
                beacon.destination_id,
                beacon.world_position.x,
                beacon.world_position.y,
                beacon.world_position.z,
                beacon.map_position.x,
                beacon.map_position.y,
                beacon.placed_by,
            ],
        )
        .map_err(repo_err)?;
        let stored = beacon.with_id(format!("beacon-{}", conn.last_insert_rowid()));
        info!(id = %stored.id, name = %stored.name, "beacon placed");
        Ok(stored)
    }

    fn remove(&self, id: &str) -> wayfind_core::Result<bool> {
        let Some(seq) = parse_id(id) else { return Ok(false) };
        let conn = self.lock()?;
        let n = conn
            .execute("DELETE FROM virtual_beacons WHERE beacon_seq = ?1", params![seq])
            .map_err(repo_err)?;
        Ok(n > 0)
    }

    fn list(&self) -> wayfind_core::Result<Vec<Beacon>> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare_cached(&format!("SELECT {COLUMNS} FROM virtual_beacons ORDER BY beacon_seq"))
            .map_err(repo_err)?;
        let rows = stmt.query_map([], beacon_from_row).map_err(repo_err)?;
        let mut out = Vec::new();
        for r in rows {
            out.push(r.map_err(repo_err)?);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_only_well_formed_ids() {
        assert_eq!(parse_id("beacon-7"), Some(7));
        assert_eq!(parse_id("beacon-"), None);
        assert_eq!(parse_id("7"), None);
        assert_eq!(parse_id("beacon-aisle-1"), None);
    }

    #[test]
    fn foreign_ids_are_absent() {
        let repo = SqliteBeaconRepository::open_in_memory().unwrap();
        assert_eq!(repo.get("nope").unwrap(), None);
        assert!(!repo.remove("beacon-1").unwrap());
    }
}
