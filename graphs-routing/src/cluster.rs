//! Agglomerative hierarchical clustering over a building distance matrix.
//!
//! The dendrogram is a contiguous arena of [`Cluster`] records indexed by
//! id; children are indices rather than pointers, which removes the
//! lifetime hazards of the pointer-based original and makes the whole
//! structure trivially `Clone`/serializable.

use graphs_model::{haversine, Building, Buildings};

use crate::distance_matrix::DistanceMatrix;
use crate::graph::Distance;

/// One node of the dendrogram. Leaves have `left = right = None`.
#[derive(Debug, Clone, Copy)]
pub struct Cluster {
    pub id: u64,
    pub size: usize,
    pub left: Option<u64>,
    pub right: Option<u64>,
    pub first: usize,
    pub last: usize,
    pub centroid: Building,
}

impl Cluster {
    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }
}

/// Owns the element array (input buildings), every Cluster ever created
/// (leaves first, then merges in creation order — the last is the root),
/// the cluster-by-cluster distance matrix, and the `next` threading array.
///
/// Source labels the merge rule "complete linkage" but the distance
/// update it computes is a pairwise minimum; this structure honors the
/// implemented (min) rule rather than the label.
#[derive(Debug, Clone)]
pub struct ClusterStructure {
    elements: Buildings,
    clusters: Vec<Cluster>,
    next: Vec<i64>,
    cluster_dist: Vec<Distance>,
    capacity: usize,
}

impl ClusterStructure {
    /// Builds the full dendrogram from `elements` and their leaf distance
    /// matrix. Panics if `elements` is empty.
    pub fn build(elements: Buildings, leaf_matrix: &DistanceMatrix) -> Self {
        let n = elements.len();
        assert!(n > 0, "cannot cluster an empty building list");
        let capacity = 2 * n - 1;

        let mut clusters = Vec::with_capacity(capacity);
        let next = vec![-1i64; n];
        for (i, &building) in elements.iter().enumerate() {
            clusters.push(Cluster {
                id: i as u64,
                size: 1,
                left: None,
                right: None,
                first: i,
                last: i,
                centroid: building,
            });
        }

        let mut cluster_dist = vec![Distance::INFINITY; capacity * capacity];
        for i in 0..n {
            for j in 0..n {
                cluster_dist[i * capacity + j] = if i == j {
                    0.0
                } else {
                    leaf_matrix.get(elements[i], elements[j])
                };
            }
        }

        let mut structure = Self {
            elements,
            clusters,
            next,
            cluster_dist,
            capacity,
        };

        let mut active: Vec<u64> = (0..n as u64).collect();
        let mut next_id = n as u64;

        while active.len() > 1 {
            let (x, y) = structure.find_closest_pair(&active);
            let new_id = structure.merge(x, y, next_id);
            next_id += 1;

            active.retain(|&c| c != x && c != y);
            for &c in &active {
                let d = structure
                    .dist(x, c)
                    .min(structure.dist(y, c));
                structure.set_dist(new_id, c, d);
            }
            structure.set_dist(new_id, new_id, 0.0);
            active.push(new_id);
        }

        structure
    }

    fn dist(&self, a: u64, b: u64) -> Distance {
        self.cluster_dist[a as usize * self.capacity + b as usize]
    }

    fn set_dist(&mut self, a: u64, b: u64, d: Distance) {
        self.cluster_dist[a as usize * self.capacity + b as usize] = d;
        self.cluster_dist[b as usize * self.capacity + a as usize] = d;
    }

    /// Minimum cluster distance pair in `active`, x != y, tie-broken by
    /// lexicographic (id_x, id_y) with x < y.
    fn find_closest_pair(&self, active: &[u64]) -> (u64, u64) {
        let mut best: Option<(u64, u64, Distance)> = None;
        for &a in active {
            for &b in active {
                if a >= b {
                    continue;
                }
                let d = self.dist(a, b);
                best = Some(match best {
                    None => (a, b, d),
                    Some((bx, by, bd)) if d < bd || (d == bd && (a, b) < (bx, by)) => (a, b, d),
                    Some(existing) => existing,
                });
            }
        }
        let (x, y, _) = best.expect("active set has at least two clusters");
        (x, y)
    }

    fn merge(&mut self, x: u64, y: u64, new_id: u64) -> u64 {
        let cx = self.clusters[x as usize];
        let cy = self.clusters[y as usize];

        self.next[cx.last] = cy.first as i64;

        let (lat_x, lon_x) = cx.centroid.location();
        let (lat_y, lon_y) = cy.centroid.location();
        let (sx, sy) = (cx.size as f64, cy.size as f64);
        let weighted = (
            (lat_x * sx + lat_y * sy) / (sx + sy),
            (lon_x * sx + lon_y * sy) / (sx + sy),
        );

        // Nearest actual building to the weighted mean, scanned over
        // `self.elements` (the buildings this structure owns) rather than
        // the full map.
        let centroid = *self
            .elements
            .iter()
            .min_by(|a, b| {
                let da = haversine(a.location(), weighted);
                let db = haversine(b.location(), weighted);
                da.partial_cmp(&db)
                    .expect("haversine distances are never NaN")
                    .then(a.id().cmp(&b.id()))
            })
            .expect("element list is never empty");

        self.clusters.push(Cluster {
            id: new_id,
            size: cx.size + cy.size,
            left: Some(x),
            right: Some(y),
            first: cx.first,
            last: cy.last,
            centroid,
        });

        new_id
    }

    pub fn root(&self) -> u64 {
        (self.clusters.len() - 1) as u64
    }

    pub fn cluster(&self, id: u64) -> &Cluster {
        &self.clusters[id as usize]
    }

    pub fn total_clusters(&self) -> usize {
        self.clusters.len()
    }

    /// Walks the leaf chain from `first` to `last` via the `next` array.
    pub fn get_elements(&self, id: u64) -> Buildings {
        let cluster = self.cluster(id);
        let mut result = Vec::with_capacity(cluster.size);
        let mut i = cluster.first;
        loop {
            result.push(self.elements[i]);
            if i == cluster.last {
                break;
            }
            i = self.next[i] as usize;
        }
        result
    }

    /// Cuts the dendrogram into `k` clusters: starting from the root,
    /// repeatedly replace the largest cluster (ties broken by smallest
    /// id) with its two children until there are `k` clusters. Returns
    /// empty if `k` exceeds the total number of clusters ever created.
    pub fn get_k_clusters(&self, k: usize) -> Vec<u64> {
        if k == 0 || k > self.total_clusters() {
            return Vec::new();
        }

        let mut active = vec![self.root()];
        while active.len() < k {
            let (pos, &largest) = active
                .iter()
                .enumerate()
                .max_by_key(|&(_, &id)| {
                    let c = self.cluster(id);
                    (c.size, std::cmp::Reverse(id))
                })
                .expect("active set is never empty");

            let cluster = self.cluster(largest);
            match (cluster.left, cluster.right) {
                (Some(l), Some(r)) => {
                    active.remove(pos);
                    active.push(l);
                    active.push(r);
                }
                _ => break,
            }
        }
        active
    }
}
