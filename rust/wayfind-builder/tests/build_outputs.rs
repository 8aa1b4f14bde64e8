use wayfind_builder::build::manifest::{compile_manifest, load_layout, load_options, write_manifest};
use wayfind_builder::build::seed::{seed_signal_beacons, SEED_PLACED_BY};
use wayfind_core::beacons::signal;
use wayfind_core::{BeaconRepository, CoordinateTransform, EngineOptions, GraphManifest, Layout, Point2D};
use wayfind_service::db::SqliteBeaconRepository;

#[test]
fn store_manifest_round_trips_through_disk() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("graph.json");
    let layout = load_layout(None).unwrap();
    let manifest = compile_manifest(&layout, &EngineOptions::default()).unwrap();
    write_manifest(&manifest, &out).unwrap();

    let read: GraphManifest = serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(read, manifest);
    assert_eq!(read.waypoints.len(), 18);
    assert!(read.edges.iter().all(|e| e.from < e.to && e.length > 0.0));
}

#[test]
fn invalid_layout_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("layout.json");
    let mut layout = Layout::store();
    layout.corridors.horizontal[0].x_end = layout.corridors.horizontal[0].x_start;
    std::fs::write(&path, serde_json::to_string(&layout).unwrap()).unwrap();
    assert!(load_layout(Some(path.as_path())).is_err());
    assert!(load_layout(Some(dir.path().join("missing.json").as_path())).is_err());
}

#[test]
fn options_file_overrides_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("options.json");
    std::fs::write(&path, r#"{"transform": {"units_per_meter": 50.0}}"#).unwrap();
    let o = load_options(Some(path.as_path())).unwrap();
    assert_eq!(o.transform.units_per_meter, 50.0);
    assert_eq!(o.graph, EngineOptions::default().graph);
}

#[test]
fn seeding_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let repo = SqliteBeaconRepository::open(dir.path().join("beacons.db")).unwrap();
    let transform = CoordinateTransform::default();
    let signals = signal::store();

    let added = seed_signal_beacons(&repo, &transform, &signals).unwrap();
    assert_eq!(added, signals.len());
    assert_eq!(seed_signal_beacons(&repo, &transform, &signals).unwrap(), 0);

    let beacons = repo.list().unwrap();
    assert_eq!(beacons.len(), signals.len());
    let entrance = &beacons[0];
    assert_eq!(entrance.placed_by, format!("{SEED_PLACED_BY}:beacon-entrance-1"));
    assert_eq!(entrance.map_position, Point2D::new(890.0, 50.0));
    assert_eq!(entrance.world_position, transform.map_to_world(Point2D::new(890.0, 50.0)));
}
