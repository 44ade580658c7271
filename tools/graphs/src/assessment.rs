//! Random-sample assessment: closest-pair assignments, within-range sets,
//! minmax centers, and 1-median centers.

use graphs_routing::{Building, Distance, Map};

/// Distance threshold used by the within-range analysis. Not named by an
/// external parameter; a fixed constant matching a typical walkable
/// radius around a house.
const WITHIN_RANGE_METERS: Distance = 1000.0;

pub fn run(map: &Map, houses_num: usize, facilities_num: usize) {
    let houses = map.select_random_houses(houses_num);
    let facilities = map.select_random_facilities(facilities_num);

    if houses.is_empty() || facilities.is_empty() {
        tracing::warn!("assessment: no houses or no facilities sampled, skipping");
        return;
    }

    closest_pairs(map, &houses, &facilities);
    within_range(map, &houses, &facilities, WITHIN_RANGE_METERS);

    if let Some((facility, max_distance)) = minmax_center(map, &facilities, &houses) {
        tracing::info!(facility = facility.id(), max_distance, "minmax center");
    }
    if let Some((facility, total_distance)) = median_center(map, &facilities, &houses) {
        tracing::info!(facility = facility.id(), total_distance, "1-median center");
    }
}

/// For each house, the nearest reachable facility by road distance.
fn closest_pairs(map: &Map, houses: &[Building], facilities: &[Building]) {
    for &house in houses {
        let nearest = map
            .shortest_paths(house, facilities)
            .into_iter()
            .filter(|p| p.distance.is_finite())
            .min_by(|a, b| a.distance.partial_cmp(&b.distance).expect("distances are never NaN"));

        match nearest {
            Some(path) => tracing::info!(
                house = house.id(),
                facility = path.to.id(),
                distance = path.distance,
                "closest facility"
            ),
            None => tracing::debug!(house = house.id(), "no reachable facility"),
        }
    }
}

/// For each house, every facility within `range` meters by road distance.
fn within_range(map: &Map, houses: &[Building], facilities: &[Building], range: Distance) {
    for &house in houses {
        let within: Vec<u64> = map
            .shortest_paths(house, facilities)
            .into_iter()
            .filter(|p| p.distance <= range)
            .map(|p| p.to.id())
            .collect();
        tracing::info!(house = house.id(), count = within.len(), "facilities within range");
    }
}

/// The candidate minimizing the maximum distance to any client
/// (minimax facility location).
fn minmax_center(map: &Map, candidates: &[Building], clients: &[Building]) -> Option<(Building, Distance)> {
    candidates
        .iter()
        .map(|&candidate| {
            let furthest = map
                .shortest_paths(candidate, clients)
                .into_iter()
                .filter(|p| p.distance.is_finite())
                .map(|p| p.distance)
                .fold(0.0_f64, f64::max);
            (candidate, furthest)
        })
        .min_by(|a, b| a.1.partial_cmp(&b.1).expect("distances are never NaN"))
}

/// The candidate minimizing the sum of distances to every client
/// (1-median facility location).
fn median_center(map: &Map, candidates: &[Building], clients: &[Building]) -> Option<(Building, Distance)> {
    candidates
        .iter()
        .map(|&candidate| {
            let total: Distance = map
                .shortest_paths(candidate, clients)
                .into_iter()
                .filter(|p| p.distance.is_finite())
                .map(|p| p.distance)
                .sum();
            (candidate, total)
        })
        .min_by(|a, b| a.1.partial_cmp(&b.1).expect("distances are never NaN"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use graphs_model::{BuildingKind, Node};
    use graphs_routing::Graph;

    fn star_map() -> (Map, Building, Vec<Building>) {
        let mut g = Graph::new();
        let center = Node::new(1, 0.0, 0.0);
        let a = Node::new(2, 0.0, 0.0);
        let b = Node::new(3, 0.0, 0.0);
        let c = Node::new(4, 0.0, 0.0);
        g.add_edge_two_way(center, a, 10.0);
        g.add_edge_two_way(center, b, 20.0);
        g.add_edge_two_way(center, c, 30.0);

        let house = Building::new(1, BuildingKind::House, (0.0, 0.0), center);
        let fa = Building::new(2, BuildingKind::Facility, (0.0, 0.0), a);
        let fb = Building::new(3, BuildingKind::Facility, (0.0, 0.0), b);
        let fc = Building::new(4, BuildingKind::Facility, (0.0, 0.0), c);
        let facilities = vec![fa, fb, fc];
        let map = Map::new(
            std::iter::once(house).chain(facilities.iter().copied()).collect(),
            g,
        );
        (map, house, facilities)
    }

    #[test]
    fn closest_pairs_picks_minimum_distance() {
        let (map, house, facilities) = star_map();
        let nearest = map
            .shortest_paths(house, &facilities)
            .into_iter()
            .min_by(|a, b| a.distance.partial_cmp(&b.distance).unwrap())
            .unwrap();
        assert_eq!(nearest.to.id(), 2);
        assert_eq!(nearest.distance, 10.0);
    }

    #[test]
    fn minmax_center_minimizes_worst_case() {
        let (map, house, facilities) = star_map();
        let (best, max_distance) = minmax_center(&map, &facilities, &[house]).unwrap();
        // Each candidate facility only reaches the single house, so the
        // "worst case" equals the direct distance; minmax picks nearest.
        assert_eq!(best.id(), 2);
        assert_eq!(max_distance, 10.0);
    }

    #[test]
    fn median_center_minimizes_total() {
        let (map, house, facilities) = star_map();
        let (best, total) = median_center(&map, &facilities, &[house]).unwrap();
        assert_eq!(best.id(), 2);
        assert_eq!(total, 10.0);
    }

    #[test]
    fn within_range_filters_by_distance() {
        let (map, house, facilities) = star_map();
        let within: Vec<u64> = map
            .shortest_paths(house, &facilities)
            .into_iter()
            .filter(|p| p.distance <= 15.0)
            .map(|p| p.to.id())
            .collect();
        assert_eq!(within, vec![2]);
    }
}
