//! Geographic primitives: angles, locations, haversine distance, barycenter.
//!
//! `haversine` hand-rolls the great-circle formula instead of pulling in the
//! `geo` crate's `HaversineDistance`, because the earth radius is fixed by
//! spec at exactly 6_371_000 m; `geo`'s default mean radius differs slightly
//! and isn't parameterizable without an extra dependency for one constant.

use serde::{Deserialize, Serialize};

/// Degrees. Latitude in [-90, 90], longitude in [-180, 180].
pub type Angle = f64;

/// A (latitude, longitude) pair, in degrees.
pub type Location = (Angle, Angle);

const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Great-circle distance between two locations, in meters.
///
/// Returns 0 when `a == b`.
pub fn haversine(a: Location, b: Location) -> f64 {
    let (lat1, lon1) = a;
    let (lat2, lon2) = b;

    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let d_phi = (lat2 - lat1).to_radians();
    let d_lambda = (lon2 - lon1).to_radians();

    let sin_half_phi = (d_phi / 2.0).sin();
    let sin_half_lambda = (d_lambda / 2.0).sin();

    let a = sin_half_phi * sin_half_phi + phi1.cos() * phi2.cos() * sin_half_lambda * sin_half_lambda;
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_METERS * c
}

/// Arithmetic mean of a sequence of locations.
///
/// Panics if `locations` is empty; callers are expected to never pass an
/// empty way's node list (OSM ways always have at least one node).
pub fn barycenter(locations: &[Location]) -> Location {
    assert!(!locations.is_empty(), "barycenter of an empty location list");

    let n = locations.len() as f64;
    let (lat_sum, lon_sum) = locations
        .iter()
        .fold((0.0_f64, 0.0_f64), |(lat_acc, lon_acc), &(lat, lon)| {
            (lat_acc + lat, lon_acc + lon)
        });

    (lat_sum / n, lon_sum / n)
}

/// Stable 64-bit identifier, lat/lon location. Identity and ordering are by
/// `id` alone; equality on `id` implies semantic equality. Hashed over all
/// three fields (id, lat, lon) per the data model — an intentional asymmetry
/// between `Eq`/`Ord` (id-only) and `Hash` (full state).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Node {
    id: u64,
    lat: Angle,
    lon: Angle,
}

impl Node {
    pub fn new(id: u64, lat: Angle, lon: Angle) -> Self {
        Self { id, lat, lon }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn lat(&self) -> Angle {
        self.lat
    }

    pub fn lon(&self) -> Angle {
        self.lon
    }

    pub fn location(&self) -> Location {
        (self.lat, self.lon)
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Node {}

impl PartialOrd for Node {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Node {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.id.cmp(&other.id)
    }
}

impl std::hash::Hash for Node {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
        self.lat.to_bits().hash(state);
        self.lon.to_bits().hash(state);
    }
}
