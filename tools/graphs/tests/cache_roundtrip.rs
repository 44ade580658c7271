//! S6: build -> serialize -> deserialize yields an observationally equal
//! Map, and shortest-path queries agree before and after the round trip.

use std::fs;
use std::io::Write;
use std::sync::Mutex;

use graphs_model::{Building, BuildingKind, Node};
use graphs_routing::{Graph, Map};

static CWD_LOCK: Mutex<()> = Mutex::new(());

fn fixture_map() -> Map {
    let mut g = Graph::new();
    let n1 = Node::new(1, 51.50, -0.12);
    let n2 = Node::new(2, 51.51, -0.11);
    let n3 = Node::new(3, 51.52, -0.10);
    g.add_edge_two_way(n1, n2, 150.0);
    g.add_edge_two_way(n2, n3, 300.0);

    let house_a = Building::new(1, BuildingKind::House, n1.location(), n1);
    let house_b = Building::new(2, BuildingKind::House, n3.location(), n3);
    Map::new(vec![house_a, house_b], g)
}

#[test]
fn cache_round_trip_preserves_shortest_paths() {
    let _guard = CWD_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("fixture.pbf");
    fs::File::create(&source).unwrap().write_all(b"not a real pbf, only used as a cache key").unwrap();

    let original_dir = std::env::current_dir().unwrap();
    std::env::set_current_dir(dir.path()).unwrap();

    let original = fixture_map();
    graphs_io::store(&source, &original).unwrap();
    let restored = graphs_io::load(&source).unwrap().expect("cache hit expected");

    let houses = original.buildings().clone();
    let before = original.shortest_paths_with_trace(houses[0], &[houses[1]]);
    let restored_houses = restored.buildings().clone();
    let after = restored.shortest_paths_with_trace(restored_houses[0], &[restored_houses[1]]);

    assert_eq!(before[0].distance, after[0].distance);
    assert_eq!(before[0].trace, after[0].trace);
    assert_eq!(restored.buildings().len(), original.buildings().len());
    for (a, b) in restored.buildings().iter().zip(original.buildings()) {
        assert_eq!(a.id(), b.id());
        assert_eq!(a.kind(), b.kind());
        assert_eq!(a.location(), b.location());
        assert_eq!(a.closest(), b.closest());
    }
    assert_eq!(restored.graph().nodes(), original.graph().nodes());

    std::env::set_current_dir(original_dir).unwrap();
}
