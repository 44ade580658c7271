//! CSV adjacency-matrix import/export round trip: exporting a Graph and
//! re-importing it yields the same edges, and importing materializes no
//! buildings.

use graphs_routing::{Graph, Node};

#[test]
fn csv_export_then_import_preserves_edges() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("roundtrip.csv");

    let mut graph = Graph::new();
    graph.add_edge_one_way(Node::new(10, 0.0, 0.0), Node::new(20, 0.0, 0.0), 42.0);
    graph.add_edge_two_way(Node::new(20, 0.0, 0.0), Node::new(30, 0.0, 0.0), 7.5);

    graphs_csv::export(&path, &graph).unwrap();
    let map = graphs_csv::import(&path).unwrap();

    assert!(map.buildings().is_empty());

    let n10 = Node::new(10, 0.0, 0.0);
    let n20 = Node::new(20, 0.0, 0.0);
    let n30 = Node::new(30, 0.0, 0.0);
    assert_eq!(map.graph().nodes()[&n10][&n20], 42.0);
    assert_eq!(map.graph().nodes()[&n20][&n30], 7.5);
    assert_eq!(map.graph().nodes()[&n30][&n20], 7.5);
}
