use anyhow::{Context, Result};
use tracing::{debug, info};
use wayfind_core::beacons::signal::SignalBeacon;
use wayfind_core::{BeaconRepository, CoordinateTransform, NewBeacon};

/// Marks beacons placed by the builder; the suffix is the signal beacon id.
pub const SEED_PLACED_BY: &str = "wayfind-builder";

fn seed_tag(signal: &SignalBeacon) -> String {
    format!("{SEED_PLACED_BY}:{}", signal.id)
}

/// Place one virtual beacon at each signal beacon's map position, lifted to
/// shelf height. Signal beacons seeded by an earlier run are skipped.
pub fn seed_signal_beacons(
    repo: &dyn BeaconRepository,
    transform: &CoordinateTransform,
    signals: &[SignalBeacon],
) -> Result<usize> {
    let existing: Vec<String> = repo.list().context("list existing beacons")?.into_iter().map(|b| b.placed_by).collect();
    let mut added = 0usize;
    for s in signals {
        let tag = seed_tag(s);
        if existing.contains(&tag) {
            debug!(id = %s.id, "already seeded");
            continue;
        }
        repo.add(NewBeacon {
            name: s.name.clone(),
            destination_id: None,
            world_position: transform.map_to_world(s.position),
            map_position: s.position,
            placed_by: tag,
        })
        .with_context(|| format!("seed beacon {}", s.id))?;
        added += 1;
    }
    info!(added, skipped = signals.len() - added, "signal beacons seeded");
    Ok(added)
}
