use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::FmtSubscriber;

use wayfind_builder::build::manifest::{compile_manifest, load_layout, load_options, write_manifest};
use wayfind_builder::build::seed::seed_signal_beacons;
use wayfind_core::beacons::signal;
use wayfind_core::CoordinateTransform;
use wayfind_service::db::SqliteBeaconRepository;

#[derive(Parser, Debug)]
#[command(name = "wayfind-builder", version, about = "Compile a store layout into a waypoint graph manifest")]
struct Args {
    /// Layout JSON; the built-in store layout when omitted
    #[arg(long = "layout", value_name = "PATH")]
    layout: Option<PathBuf>,

    /// Engine options JSON (graph tolerances, transform)
    #[arg(long = "options", value_name = "PATH")]
    options: Option<PathBuf>,

    /// Output graph manifest
    #[arg(long = "out-graph", value_name = "PATH")]
    out_graph: PathBuf,

    /// SQLite beacon store to create or update
    #[arg(long = "beacon-db", value_name = "PATH")]
    beacon_db: Option<PathBuf>,

    /// Place a virtual beacon at every built-in signal beacon
    #[arg(long = "seed-signal", requires = "beacon_db")]
    seed_signal: bool,
}

fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder().with_ansi(false).finish();
    let _ = tracing::subscriber::set_global_default(subscriber);

    let args = Args::parse();
    info!(?args, "starting builder");

    let layout = load_layout(args.layout.as_deref())?;
    let options = load_options(args.options.as_deref())?;
    let manifest = compile_manifest(&layout, &options)?;
    write_manifest(&manifest, &args.out_graph)?;
    info!(out = %args.out_graph.display(), "wrote graph manifest");

    if let Some(db_path) = &args.beacon_db {
        let repo = SqliteBeaconRepository::open(db_path)?;
        if args.seed_signal {
            let transform = CoordinateTransform::new(&options.transform).context("invalid transform options")?;
            seed_signal_beacons(&repo, &transform, &signal::store())?;
        }
        info!(beacons = repo.count()?, db = %db_path.display(), "beacon store ready");
    }
    Ok(())
}
