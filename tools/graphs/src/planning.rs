//! Planning: shortest-path trees rooted at facilities, and agglomerative
//! clustering of houses with per-cluster trees.

use graphs_routing::{Building, Buildings, ClusterStructure, Distance, DistanceMatrix, Map};

pub fn run(map: &Map, houses_num: usize, clusters_num: usize) {
    let mut houses = map.select_random_houses(houses_num);
    if houses.is_empty() {
        tracing::warn!("planning: no houses sampled, skipping");
        return;
    }

    let Some(&facility) = map.select_random_facilities(1).first() else {
        tracing::warn!("planning: no facility sampled, skipping");
        return;
    };

    let (tree, shortest_paths_sum) = shortest_paths_tree(map, facility, &houses);
    tracing::info!(
        shortest_paths_sum,
        tree_weight = tree.weights_sum(),
        "planning: single-facility tree"
    );

    run_clusters(map, &mut houses, clusters_num);
}

/// Shortest-path tree from `facility` to every building in `buildings`:
/// the induced subgraph of every trace, plus the sum of the individual
/// shortest-path distances (not the tree's own edge-weight sum).
pub fn shortest_paths_tree(map: &Map, facility: Building, buildings: &Buildings) -> (Map, Distance) {
    let traced = map.shortest_paths_with_trace(facility, buildings);
    let sum: Distance = traced.iter().filter(|p| p.distance.is_finite()).map(|p| p.distance).sum();
    let tree = map.paths_to_map(&traced);
    (tree, sum)
}

fn run_clusters(map: &Map, houses: &mut Buildings, clusters_num: usize) {
    if houses.len() < 2 {
        tracing::warn!("planning: fewer than two houses, skipping clustering");
        return;
    }

    let sample = Map::new(houses.clone(), map.graph().clone());
    let leaf_matrix = DistanceMatrix::build(&sample);
    let structure = ClusterStructure::build(houses.clone(), &leaf_matrix);

    let cut = structure.get_k_clusters(clusters_num);
    if cut.is_empty() {
        tracing::warn!(clusters_num, total = structure.total_clusters(), "planning: k exceeds available clusters");
        return;
    }

    let mut shortest_paths_total = 0.0;
    let mut tree_weight_total = 0.0;

    for id in cut {
        let cluster = structure.cluster(id);
        let elements = structure.get_elements(id);
        let (tree, shortest_paths_sum) = shortest_paths_tree(map, cluster.centroid, &elements);
        let tree_weight = tree.weights_sum();

        tracing::info!(
            cluster = cluster.id,
            size = cluster.size,
            shortest_paths_sum,
            tree_weight,
            "planning: cluster tree"
        );

        shortest_paths_total += shortest_paths_sum;
        tree_weight_total += tree_weight;
    }

    tracing::info!(shortest_paths_total, tree_weight_total, "planning: cluster totals");
}
