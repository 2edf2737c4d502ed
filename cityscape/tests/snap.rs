use cityscape::{
    LineSegment, Point, SegmentLayer, SnapConfig, SnapEngine, SnapKind, SpatialIndex,
};

fn horizontal_road() -> SnapEngine {
    let mut e = SnapEngine::default();
    e.register_provider(
        "roads",
        Box::new(SegmentLayer::from_polyline("main", "road", &[Point::new(0.0, 100.0), Point::new(200.0, 100.0)])),
    );
    e
}

#[test]
fn vertex_near_segment_start() {
    let res = horizontal_road().find_snap_point(-3.0, 96.0);
    let vertex = res
        .candidates
        .iter()
        .find(|c| c.kind == SnapKind::Vertex)
        .expect("vertex candidate");
    assert_eq!((vertex.x, vertex.y), (0.0, 100.0));
    assert_eq!(vertex.geometry_id, "main");
}

#[test]
fn nearest_only_projects_onto_segment() {
    let mut e = horizontal_road();
    e.set_config(SnapConfig::only(&[SnapKind::Nearest]));
    let best = e.find_snap_point(100.0, 100.0).best.expect("nearest");
    assert_eq!(best.kind, SnapKind::Nearest);
    assert_eq!((best.x, best.y), (100.0, 100.0));
    assert_eq!(best.distance, 0.0);
}

#[test]
fn out_of_threshold_has_no_best() {
    let res = horizontal_road().find_snap_point(100.0, 200.0);
    assert!(res.best.is_none());
    assert!(res.candidates.is_empty());
    assert_eq!(horizontal_road().snap_or_cursor(100.0, 200.0), Point::new(100.0, 200.0));
}

#[test]
fn candidates_sorted_within_threshold() {
    let mut e = SnapEngine::new(SnapConfig { threshold: 30.0, ..SnapConfig::default() });
    e.register_provider(
        "grid",
        Box::new(SegmentLayer::new(vec![
            LineSegment::new(Point::new(0.0, 0.0), Point::new(100.0, 0.0), "h", "road"),
            LineSegment::new(Point::new(50.0, -50.0), Point::new(50.0, 50.0), "v", "road"),
            LineSegment::new(Point::new(0.0, 20.0), Point::new(100.0, 20.0), "h2", "road"),
        ])),
    );
    let res = e.find_snap_point(45.0, 5.0);
    assert!(res.candidates.len() > 3);
    assert!(res.candidates.windows(2).all(|w| w[0].distance <= w[1].distance));
    assert!(res.candidates.iter().all(|c| c.distance <= 30.0));
    assert_eq!(res.best.as_ref(), res.candidates.first());
    assert!(res.candidates.iter().any(|c| c.kind == SnapKind::Intersection && c.geometry_id == "h|v"));
}

#[test]
fn ring_layer_and_provider_swap() {
    let mut e = SnapEngine::default();
    let square = [Point::new(0.0, 0.0), Point::new(100.0, 0.0), Point::new(100.0, 100.0), Point::new(0.0, 100.0)];
    e.register_provider("coast", Box::new(SegmentLayer::from_ring("c1", "coastline", &square)));
    assert_eq!(e.index().len(), 4);
    // Closing edge (0,100)->(0,0) is snappable
    let best = e.find_snap_point(3.0, 50.0).best.expect("snap");
    assert_eq!((best.x, best.y), (0.0, 50.0));

    e.register_provider("coast", Box::new(SegmentLayer::default()));
    assert!(e.index().is_empty());
    assert_eq!(e.provider_keys().collect::<Vec<_>>(), vec!["coast"]);
    assert!(e.unregister_provider("coast"));
    assert!(!e.unregister_provider("coast"));
}

#[test]
fn index_query_returns_each_segment_once() {
    let mut idx = SpatialIndex::new(10.0);
    let id = idx.insert(LineSegment::new(Point::new(0.0, 5.0), Point::new(49.0, 5.0), "long", "road"));
    assert_eq!(idx.occupied_cells(), 5);
    assert_eq!(idx.query_ids(Point::new(25.0, 5.0), 30.0), vec![id]);
}

#[test]
fn tiny_cells_and_huge_threshold_stay_bounded() {
    let mut e = SnapEngine::with_cell_size(SnapConfig::default(), 1e-9);
    e.add_segments([
        LineSegment::new(Point::new(0.0, 5.0), Point::new(200.0, 5.0), "road", "road"),
        LineSegment::new(Point::new(3.0, 0.0), Point::new(3.0 + 1e-7, 0.0), "stub", "road"),
    ]);
    let best = e.find_snap_point(0.0, 0.0).best.expect("snap");
    assert_eq!(best.geometry_id, "stub");
    assert_eq!((best.x, best.y), (3.0, 0.0));

    let mut wide = SnapEngine::new(SnapConfig { threshold: 1.0e12, ..SnapConfig::default() });
    wide.add_segments([LineSegment::new(Point::new(0.0, 5.0), Point::new(200.0, 5.0), "road", "road")]);
    let best = wide.find_snap_point(1.0e9, -1.0e9).best.expect("snap");
    assert_eq!((best.x, best.y), (200.0, 5.0));
}
