//! Three-pass OSM importer: intersection marking, route-graph assembly,
//! building attachment. Each pass is an independent read of the same
//! extract — see [`import`].

use rustc_hash::FxHashMap;

use graphs_extract::{scan_elements, Element, ExtractError, RawWay};
use graphs_model::{barycenter, classify, haversine, Building, Location};
use graphs_routing::{Graph, Map, Node};

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error(transparent)]
    Extract(#[from] ExtractError),
}

fn is_highway(way: &RawWay) -> bool {
    way.has_tag_key("highway")
}

fn is_one_way(way: &RawWay) -> bool {
    way.tag("oneway") == Some("yes")
}

/// A single collapsed edge between two marked nodes: accumulated distance
/// over every intermediate node elided in between.
struct CollapsedEdge {
    from: u64,
    to: u64,
    distance: f64,
}

/// Collapses one way's node-ref list into edges between marked nodes,
/// given the locations of every referenced node. Pulled out of
/// [`build_route_graph`]'s scan so the collapse logic can be tested
/// without a real PBF file.
fn collapse_way(
    node_refs: &[u64],
    seen_twice: &FxHashMap<u64, bool>,
    locations: &FxHashMap<u64, Location>,
) -> Vec<CollapsedEdge> {
    let mut edges = Vec::new();
    if node_refs.len() < 2 {
        return edges;
    }

    let is_marked = |node_id: u64, position: usize, len: usize| -> bool {
        position == 0 || position == len - 1 || seen_twice.get(&node_id).copied().unwrap_or(false)
    };

    let len = node_refs.len();
    let mut mrkd = node_refs[0];
    let mut pred = node_refs[0];
    let mut accumulated = 0.0;

    for (i, &curr) in node_refs.iter().enumerate().skip(1) {
        let loc_pred = locations.get(&pred).copied().unwrap_or((0.0, 0.0));
        let loc_curr = locations.get(&curr).copied().unwrap_or((0.0, 0.0));
        accumulated += haversine(loc_pred, loc_curr);

        if is_marked(curr, i, len) {
            edges.push(CollapsedEdge { from: mrkd, to: curr, distance: accumulated });
            mrkd = curr;
            accumulated = 0.0;
        }
        pred = curr;
    }

    edges
}

/// Pass 1 — marks every node that appears more than once across the
/// node-ref lists of `highway=*` ways. Boundary nodes (first/last of a
/// way) are handled separately in pass 2, not here.
fn mark_intersections(path: &std::path::Path) -> Result<FxHashMap<u64, bool>, ImportError> {
    let mut seen_twice: FxHashMap<u64, bool> = FxHashMap::default();

    scan_elements(path, |element| {
        if let Element::Way(way) = element {
            if is_highway(&way) {
                for &node_id in &way.node_refs {
                    seen_twice
                        .entry(node_id)
                        .and_modify(|seen| *seen = true)
                        .or_insert(false);
                }
            }
        }
    })?;

    Ok(seen_twice)
}

/// Pass 2 — collapses every `highway=*` way into edges between marked
/// (intersection or boundary) nodes, preserving true geographic length.
/// Returns the route graph and a side table of the locations of every
/// node that ended up in the graph.
fn build_route_graph(
    path: &std::path::Path,
    seen_twice: &FxHashMap<u64, bool>,
) -> Result<(Graph, FxHashMap<u64, Node>), ImportError> {
    let mut raw_locations: FxHashMap<u64, Location> = FxHashMap::default();
    let mut graph = Graph::new();
    let mut node_table: FxHashMap<u64, Node> = FxHashMap::default();

    scan_elements(path, |element| match element {
        Element::Node(raw) => {
            raw_locations.insert(raw.id, (raw.lat, raw.lon));
        }
        Element::Way(way) => {
            if !is_highway(&way) {
                return;
            }
            let one_way = is_one_way(&way);

            for edge in collapse_way(&way.node_refs, seen_twice, &raw_locations) {
                let loc_from = raw_locations.get(&edge.from).copied().unwrap_or((0.0, 0.0));
                let loc_to = raw_locations.get(&edge.to).copied().unwrap_or((0.0, 0.0));
                let from = *node_table
                    .entry(edge.from)
                    .or_insert_with(|| Node::new(edge.from, loc_from.0, loc_from.1));
                let to = *node_table
                    .entry(edge.to)
                    .or_insert_with(|| Node::new(edge.to, loc_to.0, loc_to.1));

                if one_way {
                    graph.add_edge_one_way(from, to, edge.distance);
                } else {
                    graph.add_edge_two_way(from, to, edge.distance);
                }
            }
        }
    })?;

    Ok((graph, node_table))
}

/// Pass 3 — attaches every `building=*` way to the nearest node in the
/// route graph, by linear scan of `node_table`.
fn attach_buildings(
    path: &std::path::Path,
    node_table: &FxHashMap<u64, Node>,
) -> Result<Vec<Building>, ImportError> {
    let mut raw_locations: FxHashMap<u64, Location> = FxHashMap::default();
    let mut buildings = Vec::new();

    scan_elements(path, |element| match element {
        Element::Node(raw) => {
            raw_locations.insert(raw.id, (raw.lat, raw.lon));
        }
        Element::Way(way) => {
            let Some(tag) = way.tag("building") else {
                return;
            };
            if way.node_refs.is_empty() {
                return;
            }

            let locations: Vec<Location> = way
                .node_refs
                .iter()
                .map(|id| raw_locations.get(id).copied().unwrap_or((0.0, 0.0)))
                .collect();
            let centroid = barycenter(&locations);
            let kind = classify(tag);

            let closest = nearest_node(centroid, node_table);
            if let Some(closest) = closest {
                buildings.push(Building::new(way.id, kind, centroid, closest));
            }
        }
    })?;

    Ok(buildings)
}

fn nearest_node(location: Location, node_table: &FxHashMap<u64, Node>) -> Option<Node> {
    node_table
        .values()
        .copied()
        .min_by(|a, b| {
            let da = haversine(location, a.location());
            let db = haversine(location, b.location());
            da.partial_cmp(&db)
                .expect("haversine distances are never NaN")
                .then(a.id().cmp(&b.id()))
        })
}

/// Runs all three passes over `path` and returns the assembled Map.
pub fn import(path: impl AsRef<std::path::Path>) -> Result<Map, ImportError> {
    let path = path.as_ref();
    tracing::info!(?path, "pass 1: marking intersections");
    let seen_twice = mark_intersections(path)?;

    tracing::info!(?path, "pass 2: assembling route graph");
    let (graph, node_table) = build_route_graph(path, &seen_twice)?;
    tracing::info!(nodes = node_table.len(), "route graph assembled");

    tracing::info!(?path, "pass 3: attaching buildings");
    let buildings = attach_buildings(path, &node_table)?;
    tracing::info!(buildings = buildings.len(), "buildings attached");

    Ok(Map::new(buildings, graph))
}
