//! Graph, Dijkstra, the Map facade, distance matrices and clustering.

pub mod cluster;
pub mod distance_matrix;
pub mod graph;
pub mod map;

pub use cluster::{Cluster, ClusterStructure};
pub use distance_matrix::DistanceMatrix;
pub use graph::{reconstruct_path, Distance, Distances, Graph, Predecessors};
pub use map::{Map, Path, TracedPath};

pub use graphs_model::{haversine, Angle, Building, BuildingKind, Buildings, Location, Node};
