//! All-pairs building distance matrix, built via repeated Dijkstra.

use rustc_hash::FxHashMap;

use graphs_model::Building;

use crate::graph::Distance;
use crate::map::Map;

/// Square distance table keyed by (from building id, to building id).
/// Missing entries are treated as unreachable (+infinity) by consumers.
#[derive(Debug, Clone, Default)]
pub struct DistanceMatrix {
    distances: FxHashMap<(u64, u64), Distance>,
}

impl DistanceMatrix {
    /// Runs one Dijkstra per building in `map.buildings()`, against every
    /// other building. O(n) Dijkstras over the full graph.
    pub fn build(map: &Map) -> Self {
        let buildings = map.buildings().clone();
        let mut distances = FxHashMap::default();

        for &from in &buildings {
            let paths = map.shortest_paths(from, &buildings);
            for path in paths {
                distances.insert((from.id(), path.to.id()), path.distance);
            }
        }

        Self { distances }
    }

    pub fn get(&self, from: Building, to: Building) -> Distance {
        self.distances
            .get(&(from.id(), to.id()))
            .copied()
            .unwrap_or(Distance::INFINITY)
    }

    pub fn len(&self) -> usize {
        self.distances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.distances.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Graph;
    use graphs_model::{BuildingKind, Node};

    #[test]
    fn builds_full_pairwise_table() {
        let mut g = Graph::new();
        let n1 = Node::new(1, 0.0, 0.0);
        let n2 = Node::new(2, 0.0, 0.0);
        let n3 = Node::new(3, 0.0, 0.0);
        g.add_edge_two_way(n1, n2, 10.0);
        g.add_edge_two_way(n2, n3, 5.0);

        let b1 = Building::new(1, BuildingKind::House, (0.0, 0.0), n1);
        let b2 = Building::new(2, BuildingKind::House, (0.0, 0.0), n2);
        let b3 = Building::new(3, BuildingKind::Facility, (0.0, 0.0), n3);
        let map = Map::new(vec![b1, b2, b3], g);

        let matrix = DistanceMatrix::build(&map);
        assert_eq!(matrix.get(b1, b1), 0.0);
        assert_eq!(matrix.get(b1, b2), 10.0);
        assert_eq!(matrix.get(b1, b3), 15.0);
        assert_eq!(matrix.get(b3, b1), 15.0);
    }
}
