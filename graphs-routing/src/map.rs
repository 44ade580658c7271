//! The Map facade: buildings + graph, random selection, shortest paths.

use graphs_model::{Building, Buildings, Node};
use rand::seq::SliceRandom;

use crate::graph::{reconstruct_path, Distance, Graph};

/// A single from/to shortest-path result, with no reconstructed trace.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Path {
    pub from: Building,
    pub to: Building,
    pub distance: Distance,
}

/// A shortest-path result plus the reconstructed node chain. `trace` is
/// empty when `to` is unreachable from `from`, and `distance` is
/// `Distance::INFINITY`.
#[derive(Debug, Clone, PartialEq)]
pub struct TracedPath {
    pub from: Building,
    pub to: Building,
    pub distance: Distance,
    pub trace: Vec<Node>,
}

/// Buildings plus a routing Graph. Every `Building::closest` is guaranteed
/// to reference a Node present in `graph` by construction (OSM importer,
/// CSV importer, cache loader).
#[derive(Debug, Clone)]
pub struct Map {
    buildings: Buildings,
    graph: Graph,
}

impl Map {
    pub fn new(buildings: Buildings, graph: Graph) -> Self {
        Self { buildings, graph }
    }

    pub fn buildings(&self) -> &Buildings {
        &self.buildings
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn select_buildings(&self, pred: impl Fn(&Building) -> bool) -> Buildings {
        self.buildings.iter().copied().filter(|b| pred(b)).collect()
    }

    /// Uniform reservoir sample of up to `n` items from the filtered set.
    pub fn select_random_buildings(&self, n: usize, pred: impl Fn(&Building) -> bool) -> Buildings {
        let filtered = self.select_buildings(pred);
        let mut rng = rand::rng();
        reservoir_sample(&filtered, n, &mut rng)
    }

    pub fn select_random_houses(&self, n: usize) -> Buildings {
        self.select_random_buildings(n, Building::is_house)
    }

    pub fn select_random_facilities(&self, n: usize) -> Buildings {
        self.select_random_buildings(n, Building::is_facility)
    }

    /// One Dijkstra from `from.closest()`; one Path per target.
    pub fn shortest_paths(&self, from: Building, to: &[Building]) -> Vec<Path> {
        let (distances, _) = self.graph.dijkstra(from.closest());
        to.iter()
            .map(|&target| Path {
                from,
                to: target,
                distance: distances
                    .get(&target.closest())
                    .copied()
                    .unwrap_or(Distance::INFINITY),
            })
            .collect()
    }

    /// Same as [`Map::shortest_paths`], plus a reconstructed trace for each
    /// target. Unreachable targets get an empty trace and +infinity.
    pub fn shortest_paths_with_trace(&self, from: Building, to: &[Building]) -> Vec<TracedPath> {
        let (distances, predecessors) = self.graph.dijkstra(from.closest());
        to.iter()
            .map(|&target| {
                let distance = distances
                    .get(&target.closest())
                    .copied()
                    .unwrap_or(Distance::INFINITY);
                let trace = if distance.is_finite() {
                    reconstruct_path(from.closest(), target.closest(), &predecessors)
                } else {
                    Vec::new()
                };
                TracedPath {
                    from,
                    to: target,
                    distance,
                    trace,
                }
            })
            .collect()
    }

    pub fn weights_sum(&self) -> Distance {
        self.graph.weights_sum()
    }

    /// Extracts the induced subgraph covering every endpoint building and
    /// every directed edge walked by any traced path. Edge weights are
    /// looked up in `self`; an edge referenced by a trace but absent from
    /// this map's graph is a programmer error and panics.
    pub fn paths_to_map(&self, traced_paths: &[TracedPath]) -> Map {
        let mut buildings: Vec<Building> = Vec::new();
        let mut seen_buildings = std::collections::HashSet::new();
        let mut graph = Graph::new();

        for tp in traced_paths {
            for b in [tp.from, tp.to] {
                if seen_buildings.insert(b.id()) {
                    buildings.push(b);
                }
            }
            for window in tp.trace.windows(2) {
                let (a, b) = (window[0], window[1]);
                let weight = *self
                    .graph
                    .nodes()
                    .get(&a)
                    .and_then(|neighbors| neighbors.get(&b))
                    .expect("paths_to_map: traced edge absent from parent graph");
                graph.add_edge_one_way(a, b, weight);
            }
        }

        Map::new(buildings, graph)
    }
}

fn reservoir_sample(items: &[Building], n: usize, rng: &mut impl rand::Rng) -> Buildings {
    if n >= items.len() {
        let mut all: Buildings = items.to_vec();
        all.shuffle(rng);
        return all;
    }

    let mut reservoir: Buildings = items[..n].to_vec();
    for (i, &item) in items.iter().enumerate().skip(n) {
        let j = rng.random_range(0..=i);
        if j < n {
            reservoir[j] = item;
        }
    }
    reservoir
}

#[cfg(test)]
mod tests {
    use super::*;
    use graphs_model::BuildingKind;

    fn node(id: u64) -> Node {
        Node::new(id, 0.0, 0.0)
    }

    fn building(id: u64, kind: BuildingKind, closest: Node) -> Building {
        Building::new(id, kind, (0.0, 0.0), closest)
    }

    fn sample_map() -> Map {
        let mut g = Graph::new();
        g.add_edge_two_way(node(1), node(2), 100.0);
        g.add_edge_two_way(node(2), node(3), 50.0);
        let b1 = building(1, BuildingKind::House, node(1));
        let b2 = building(2, BuildingKind::Facility, node(3));
        Map::new(vec![b1, b2], g)
    }

    #[test]
    fn shortest_paths_basic() {
        let map = sample_map();
        let buildings = map.buildings().clone();
        let paths = map.shortest_paths(buildings[0], &[buildings[1]]);
        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0].distance, 150.0);
    }

    #[test]
    fn shortest_paths_with_trace_unreachable() {
        let mut g = Graph::new();
        g.add_edge_one_way(node(1), node(2), 10.0);
        let isolated = building(2, BuildingKind::House, node(3));
        let from = building(1, BuildingKind::House, node(1));
        let map = Map::new(vec![from, isolated], g);

        let traced = map.shortest_paths_with_trace(from, &[isolated]);
        assert_eq!(traced[0].distance, Distance::INFINITY);
        assert!(traced[0].trace.is_empty());
    }

    #[test]
    fn paths_to_map_builds_induced_subgraph() {
        let map = sample_map();
        let buildings = map.buildings().clone();
        let traced = map.shortest_paths_with_trace(buildings[0], &[buildings[1]]);
        let induced = map.paths_to_map(&traced);

        assert_eq!(induced.buildings().len(), 2);
        assert_eq!(induced.graph().nodes()[&node(1)][&node(2)], 100.0);
        assert_eq!(induced.graph().nodes()[&node(2)][&node(3)], 50.0);
    }

    #[test]
    fn trace_sums_to_reported_distance() {
        let mut g = Graph::new();
        g.add_edge_two_way(node(1), node(2), 7.0);
        g.add_edge_two_way(node(2), node(3), 13.5);
        g.add_edge_two_way(node(3), node(4), 4.25);
        let from = building(1, BuildingKind::House, node(1));
        let to = building(2, BuildingKind::Facility, node(4));
        let map = Map::new(vec![from, to], g);

        let traced = map.shortest_paths_with_trace(from, &[to]);
        let path = &traced[0];
        assert!(path.distance.is_finite());
        assert_eq!(path.trace, vec![node(1), node(2), node(3), node(4)]);

        let summed: Distance = path
            .trace
            .windows(2)
            .map(|w| map.graph().nodes()[&w[0]][&w[1]])
            .sum();
        let tolerance = 1e-6 * (path.distance + 1.0);
        assert!((summed - path.distance).abs() <= tolerance);
    }

    #[test]
    fn select_buildings_filters() {
        let map = sample_map();
        let houses = map.select_buildings(Building::is_house);
        assert_eq!(houses.len(), 1);
        assert_eq!(houses[0].kind(), BuildingKind::House);
    }

    #[test]
    fn reservoir_sample_is_deterministic_under_a_fixed_seed() {
        use rand::SeedableRng;

        let items: Buildings = (0..10)
            .map(|id| building(id, BuildingKind::House, node(id)))
            .collect();

        let mut rng_a = rand::rngs::StdRng::seed_from_u64(42);
        let a = reservoir_sample(&items, 3, &mut rng_a);

        let mut rng_b = rand::rngs::StdRng::seed_from_u64(42);
        let b = reservoir_sample(&items, 3, &mut rng_b);

        assert_eq!(a.iter().map(Building::id).collect::<Vec<_>>(), b.iter().map(Building::id).collect::<Vec<_>>());
    }
}
