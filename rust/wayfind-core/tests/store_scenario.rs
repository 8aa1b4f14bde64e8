use wayfind_core::{
    Corridors, Destination, EngineOptions, HorizontalCorridor, Layout, PathStatus, Point2D, VerticalCorridor, Wayfinder,
};

fn two_aisle_layout() -> Layout {
    Layout {
        obstacles: vec![],
        corridors: Corridors {
            horizontal: vec![
                HorizontalCorridor { y: 150.0, x_start: 90.0, x_end: 900.0 },
                HorizontalCorridor { y: 410.0, x_start: 90.0, x_end: 900.0 },
            ],
            vertical: vec![
                VerticalCorridor { x: 210.0, y_start: 150.0, y_end: 410.0 },
                VerticalCorridor { x: 342.0, y_start: 150.0, y_end: 410.0 },
            ],
            horizontal_bypass: vec![],
        },
    }
}

fn axis_aligned(a: &Point2D, b: &Point2D) -> bool {
    (a.x - b.x).abs() < 1e-9 || (a.y - b.y).abs() < 1e-9
}

#[test]
fn routes_around_the_aisle_block() {
    let wf = Wayfinder::new(&two_aisle_layout(), EngineOptions::default()).expect("engine");
    let wps = wf.graph().waypoints();
    for corner in [(210.0, 150.0), (342.0, 150.0), (210.0, 410.0), (342.0, 410.0)] {
        assert!(wps.contains(&Point2D::new(corner.0, corner.1)), "missing waypoint {corner:?}");
    }

    let start = Point2D::new(200.0, 100.0);
    let end = Point2D::new(350.0, 450.0);
    let res = wf.search(start, end).expect("search");
    assert_eq!(res.status, PathStatus::Found);
    assert_eq!(res.path.first(), Some(&start));
    assert_eq!(res.path.last(), Some(&end));
    assert!(res.path.contains(&Point2D::new(210.0, 150.0)));
    assert!(res.path.contains(&Point2D::new(342.0, 150.0)) || res.path.contains(&Point2D::new(342.0, 410.0)));

    // interior legs follow corridors, never the diagonal through the block
    let interior = &res.path[1..res.path.len() - 1];
    assert!(interior.len() >= 3);
    for w in interior.windows(2) {
        assert!(axis_aligned(&w[0], &w[1]), "diagonal leg {:?} -> {:?}", w[0], w[1]);
        assert!(wf.graph().connected(&w[0], &w[1]));
    }
}

#[test]
fn store_trip_visits_every_group_once() {
    let wf = Wayfinder::store().expect("engine");
    let dests = vec![
        Destination::new("milk", Point2D::new(50.0, 305.0), "dairy"),
        Destination::new("steak", Point2D::new(170.0, 515.0), "meat"),
        Destination::new("peas", Point2D::new(485.0, 530.0), "frozen"),
        Destination::new("cheese", Point2D::new(60.0, 300.0), "dairy"),
        Destination::new("apples", Point2D::new(950.0, 305.0), "produce"),
        Destination::new("rice", Point2D::new(512.0, 250.0), "aisle-5"),
    ];
    let start = Point2D::new(890.0, 50.0);
    let plan = wf.plan_trip(&dests, start).expect("plan");

    let mut groups: Vec<&str> = plan.stops.iter().map(|d| d.group_key.as_str()).collect();
    groups.sort_unstable();
    assert_eq!(groups, vec!["aisle-5", "dairy", "frozen", "meat", "produce"]);
    assert!(plan.stops.iter().all(|d| d.id != "cheese"));

    let trip = wf.trip_options();
    let staging = trip.staging.expect("store has a cart area");
    for p in [staging, trip.checkout, trip.exit] {
        assert!(plan.path.contains(&p));
    }
    // the staging point comes before any stop, the exit is last
    let staging_at = plan.path.iter().position(|p| *p == staging).unwrap();
    let first_stop_at = plan.path.iter().position(|p| *p == plan.stops[0].position).unwrap();
    assert!(staging_at < first_stop_at);
    assert_eq!(plan.path.last(), Some(&trip.exit));
}

#[test]
fn display_d2_is_bypassed_not_crossed() {
    let wf = Wayfinder::store().expect("engine");
    // from above display D2 to below it along the x=735 side
    let res = wf.search(Point2D::new(740.0, 260.0), Point2D::new(740.0, 420.0)).expect("search");
    assert_eq!(res.status, PathStatus::Found);
    let interior = &res.path[1..res.path.len() - 1];
    for w in interior.windows(2) {
        assert!(wf.graph().connected(&w[0], &w[1]));
    }
    // the gap at x=735 between y=270 and y=410 is never a single leg
    assert!(!interior
        .windows(2)
        .any(|w| w[0] == Point2D::new(735.0, 270.0) && w[1] == Point2D::new(735.0, 410.0)));
}

#[test]
fn mid_aisle_shelf_is_reached_down_the_aisle() {
    let wf = Wayfinder::store().expect("engine");
    // oatmeal sits halfway down aisle 1; the route walks down x=210 first
    let res = wf.search(Point2D::new(210.0, 150.0), Point2D::new(252.0, 270.0)).expect("search");
    assert_eq!(res.status, PathStatus::Found);
    assert_eq!(
        res.path,
        vec![
            Point2D::new(210.0, 150.0),
            Point2D::new(210.0, 150.0),
            Point2D::new(210.0, 270.0),
            Point2D::new(252.0, 270.0),
        ]
    );
}
