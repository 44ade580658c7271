//! Adjacency-list weighted directed graph and Dijkstra's algorithm.

use std::cmp::Reverse;

use ordered_float::OrderedFloat;
use priority_queue::PriorityQueue;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use graphs_model::Node;

pub type Distance = f64;
pub type Distances = FxHashMap<Node, Distance>;
pub type Predecessors = FxHashMap<Node, Node>;

/// Weighted directed adjacency map: `Node -> (Node -> Distance)`.
///
/// No self-loops, at most one entry per (from, to), weights are
/// non-negative. Insertions are idempotent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Graph {
    adjacency: FxHashMap<Node, FxHashMap<Node, Distance>>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts (from -> to, d) if absent and from != to. Returns whether a
    /// new entry was added.
    pub fn add_edge_one_way(&mut self, from: Node, to: Node, d: Distance) -> bool {
        if from == to {
            return false;
        }
        let neighbors = self.adjacency.entry(from).or_default();
        if neighbors.contains_key(&to) {
            false
        } else {
            neighbors.insert(to, d);
            true
        }
    }

    /// Inserts both directions. Returns true only if both insertions
    /// succeeded (neither direction already existed).
    pub fn add_edge_two_way(&mut self, from: Node, to: Node, d: Distance) -> bool {
        let forward = self.add_edge_one_way(from, to, d);
        let backward = self.add_edge_one_way(to, from, d);
        forward && backward
    }

    pub fn nodes(&self) -> &FxHashMap<Node, FxHashMap<Node, Distance>> {
        &self.adjacency
    }

    pub fn contains_node(&self, node: &Node) -> bool {
        self.adjacency.contains_key(node)
    }

    /// Sum of every edge weight in the graph. A two-way edge contributes
    /// twice, once per direction.
    pub fn weights_sum(&self) -> Distance {
        self.adjacency
            .values()
            .flat_map(|neighbors| neighbors.values())
            .sum()
    }

    /// Classic Dijkstra from `source`, keyed by (distance, node-id) with
    /// ties broken by the smaller node id. Known nodes (those that appear
    /// as a key in the adjacency map) start at +infinity; the source
    /// starts at 0. Nodes never discovered and never the source are simply
    /// absent from the returned map — callers treat a missing entry as
    /// unreachable (+infinity).
    pub fn dijkstra(&self, source: Node) -> (Distances, Predecessors) {
        let mut dist: Distances = FxHashMap::default();
        let mut prev: Predecessors = FxHashMap::default();
        let mut queue: PriorityQueue<Node, Reverse<(OrderedFloat<Distance>, u64)>> =
            PriorityQueue::new();

        for &node in self.adjacency.keys() {
            dist.insert(node, Distance::INFINITY);
        }
        dist.insert(source, 0.0);
        queue.push(source, Reverse((OrderedFloat(0.0), source.id())));

        while let Some((u, Reverse((priority, _)))) = queue.pop() {
            let d_u = priority.into_inner();
            if d_u > *dist.get(&u).unwrap_or(&Distance::INFINITY) {
                continue;
            }
            if let Some(neighbors) = self.adjacency.get(&u) {
                for (&v, &weight) in neighbors {
                    let candidate = d_u + weight;
                    let known = dist.get(&v).copied().unwrap_or(Distance::INFINITY);
                    if candidate < known {
                        tracing::trace!(from = u.id(), to = v.id(), candidate, "relaxed edge");
                        dist.insert(v, candidate);
                        prev.insert(v, u);
                        queue.push(v, Reverse((OrderedFloat(candidate), v.id())));
                    }
                }
            }
        }

        (dist, prev)
    }
}

/// Reconstructs the node sequence from `source` to `target` by walking
/// `predecessors` backwards. Returns an empty vec if `target` is not
/// `source` and has no predecessor (unreachable).
pub fn reconstruct_path(source: Node, target: Node, predecessors: &Predecessors) -> Vec<Node> {
    if target == source {
        return vec![source];
    }
    let mut chain = vec![target];
    let mut current = target;
    loop {
        match predecessors.get(&current) {
            Some(&pred) => {
                chain.push(pred);
                if pred == source {
                    break;
                }
                current = pred;
            }
            None => return Vec::new(),
        }
    }
    chain.reverse();
    chain
}
