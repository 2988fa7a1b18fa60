//! Shared types used across all Formica crates.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Earth's mean radius in metres, used by the haversine distance.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Identity of a compute node.
///
/// Ids index the pheromone matrix directly, so they may be sparse: a
/// directory holding nodes `{2, 7}` still yields an 8×8 matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub usize);

impl NodeId {
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node-{}", self.0)
    }
}

impl From<usize> for NodeId {
    fn from(id: usize) -> Self {
        Self(id)
    }
}

/// A point on the Earth's surface, in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPosition {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPosition {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Great-circle distance in metres (haversine).
    pub fn distance_to(&self, other: &GeoPosition) -> f64 {
        let lat_distance = (other.latitude - self.latitude).to_radians();
        let lon_distance = (other.longitude - self.longitude).to_radians();

        let a = (lat_distance / 2.0).sin().powi(2)
            + self.latitude.to_radians().cos()
                * other.latitude.to_radians().cos()
                * (lon_distance / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

        EARTH_RADIUS_M * c
    }
}

/// Capability profile of a compute node.
///
/// Immutable for the duration of a solve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeProfile {
    pub id: NodeId,
    #[serde(default)]
    pub name: String,
    /// Memory capacity. A module fits when this strictly exceeds its requirement.
    pub capacity: f64,
    /// Power draw, added to the placement cost of every hop landing here.
    #[serde(default)]
    pub power: f64,
    /// Uplink bandwidth, used to estimate module transfer time.
    #[serde(default)]
    pub bandwidth: f64,
    #[serde(default)]
    pub position: Option<GeoPosition>,
}

impl NodeProfile {
    pub fn new(id: usize, capacity: f64) -> Self {
        Self {
            id: NodeId(id),
            name: format!("node-{}", id),
            capacity,
            power: 0.0,
            bandwidth: 0.0,
            position: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_power(mut self, power: f64) -> Self {
        self.power = power;
        self
    }

    pub fn with_bandwidth(mut self, bandwidth: f64) -> Self {
        self.bandwidth = bandwidth;
        self
    }

    pub fn at(mut self, position: GeoPosition) -> Self {
        self.position = Some(position);
        self
    }

    /// Whether a module with the given requirement can be hosted here.
    pub fn can_host(&self, module: &Module) -> bool {
        self.capacity > module.capacity
    }
}

/// An application module that must be assigned to a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Module {
    pub name: String,
    /// Required capacity; hosts must strictly exceed it.
    pub capacity: f64,
    /// Resource size shipped to the host, used for elapsed-time estimates.
    #[serde(default)]
    pub size: f64,
}

impl Module {
    pub fn new(name: impl Into<String>, capacity: f64) -> Self {
        Self {
            name: name.into(),
            capacity,
            size: capacity,
        }
    }

    pub fn with_size(mut self, size: f64) -> Self {
        self.size = size;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn haversine_matches_known_distance() {
        // Dublin -> London is roughly 464 km.
        let dublin = GeoPosition::new(53.3498, -6.2603);
        let london = GeoPosition::new(51.5074, -0.1278);
        let d = dublin.distance_to(&london);
        assert!((d - 464_000.0).abs() < 5_000.0, "got {}", d);
    }

    #[test]
    fn distance_is_zero_for_same_point() {
        let p = GeoPosition::new(10.0, 20.0);
        assert_eq!(p.distance_to(&p), 0.0);
    }

    #[test]
    fn capacity_must_strictly_exceed_requirement() {
        let node = NodeProfile::new(1, 8.0);
        assert!(node.can_host(&Module::new("small", 5.0)));
        assert!(!node.can_host(&Module::new("exact", 8.0)));
    }

    #[test]
    fn node_id_serializes_transparently() {
        let json = serde_json::to_string(&NodeId(7)).unwrap();
        assert_eq!(json, "7");
    }
}
