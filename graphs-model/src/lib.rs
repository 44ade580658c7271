//! Building classification and the Building type.
//!
//! A [`Node`](graphs_geo::Node) is a bare routing-graph vertex; a
//! [`Building`] additionally carries a classification and a reference to
//! the nearest routing node, as established during OSM import (see
//! `graphs-geometry`).

pub use graphs_geo::{barycenter, haversine, Angle, Location, Node};

use serde::{Deserialize, Serialize};

/// House OSM `building=*` tag values, per the fixed white-list.
const HOUSE_TAGS: &[&str] = &[
    "apartments",
    "bungalow",
    "cabin",
    "detached",
    "dormitory",
    "farm",
    "ger",
    "hotel",
    "house",
    "houseboat",
    "residential",
    "semidetached_house",
    "static_caravan",
    "terrace",
];

/// Facility OSM `building=*` tag values, per the fixed white-list.
const FACILITY_TAGS: &[&str] = &["fire_station", "hospital", "retail", "kiosk", "supermarket"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BuildingKind {
    House,
    Facility,
    Other,
}

/// Classifies a `building=*` tag value against the fixed white-lists.
/// Total function: anything not in either list is `Other`.
pub fn classify(building_tag: &str) -> BuildingKind {
    if HOUSE_TAGS.contains(&building_tag) {
        BuildingKind::House
    } else if FACILITY_TAGS.contains(&building_tag) {
        BuildingKind::Facility
    } else {
        BuildingKind::Other
    }
}

/// A structure (house, facility, or other), identified by its OSM way id,
/// with a barycenter location and a reference to the closest routing node.
///
/// Equality and hashing are by `id` only.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Building {
    id: u64,
    kind: BuildingKind,
    location: Location,
    closest: Node,
}

impl Building {
    pub fn new(id: u64, kind: BuildingKind, location: Location, closest: Node) -> Self {
        Self {
            id,
            kind,
            location,
            closest,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn kind(&self) -> BuildingKind {
        self.kind
    }

    pub fn location(&self) -> Location {
        self.location
    }

    pub fn closest(&self) -> Node {
        self.closest
    }

    pub fn is_house(&self) -> bool {
        self.kind == BuildingKind::House
    }

    pub fn is_facility(&self) -> bool {
        self.kind == BuildingKind::Facility
    }

    pub fn is_other(&self) -> bool {
        self.kind == BuildingKind::Other
    }
}

impl PartialEq for Building {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Building {}

impl std::hash::Hash for Building {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

pub type Buildings = Vec<Building>;
