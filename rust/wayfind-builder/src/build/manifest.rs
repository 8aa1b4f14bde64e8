use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;
use wayfind_core::{EngineOptions, GraphManifest, Layout, WaypointGraph};

/// Layout from a JSON file, or the built-in store layout. Always validated.
pub fn load_layout(path: Option<&Path>) -> Result<Layout> {
    let layout = match path {
        Some(p) => Layout::from_path(p).with_context(|| format!("failed to load layout {}", p.display()))?,
        None => Layout::store(),
    };
    layout.validate().context("layout failed validation")?;
    Ok(layout)
}

pub fn load_options(path: Option<&Path>) -> Result<EngineOptions> {
    let Some(p) = path else { return Ok(EngineOptions::default()) };
    let raw = std::fs::read_to_string(p).with_context(|| format!("failed to read options {}", p.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("invalid options JSON in {}", p.display()))
}

pub fn compile_manifest(layout: &Layout, options: &EngineOptions) -> Result<GraphManifest> {
    let graph = WaypointGraph::build(layout, options.graph.clone()).context("failed to build waypoint graph")?;
    let manifest = graph.manifest();
    info!(waypoints = manifest.waypoints.len(), edges = manifest.edges.len(), "graph compiled");
    Ok(manifest)
}

pub fn write_manifest(manifest: &GraphManifest, out: &Path) -> Result<()> {
    let file = File::create(out).with_context(|| format!("failed to create {}", out.display()))?;
    let mut w = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut w, manifest).context("serialize graph manifest")?;
    w.write_all(b"\n")?;
    w.flush()?;
    Ok(())
}
