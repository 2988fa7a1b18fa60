//! Scenario files — a whole problem instance as one JSON document.
//!
//! ```json
//! {
//!   "nodes": [{ "id": 0, "capacity": 8.0, "position": { "latitude": 0.0, "longitude": 0.0 } }],
//!   "links": [{ "from": 0, "to": 1, "latency": 5.0 }],
//!   "track": [{ "time": 0.0, "position": { "latitude": 0.0, "longitude": 0.0 } }],
//!   "routing": { "start": 0, "end": 1, "hops": 1 },
//!   "placement": { "modules": [{ "name": "client", "capacity": 0.0 }], "initial": "nearest_to_track_start" }
//! }
//! ```

use crate::directory_impl::{Link, SampledTrack, StaticDirectory, TrackSample};
use crate::placement::{InitialNode, PlacementEnvironment};
use crate::routing::{RouteRequest, RoutingEnvironment};
use formica_core::error::{FormicaError, Result};
use formica_core::types::{GeoPosition, Module, NodeProfile};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Module chain and starting rule of a placement problem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacementRequest {
    /// `modules[0]` is the client module.
    pub modules: Vec<Module>,
    #[serde(default)]
    pub initial: InitialNode,
}

/// A serialisable problem instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub nodes: Vec<NodeProfile>,
    #[serde(default)]
    pub links: Vec<Link>,
    #[serde(default)]
    pub track: Vec<TrackSample>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub routing: Option<RouteRequest>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placement: Option<PlacementRequest>,
}

impl Scenario {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&text)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path.as_ref(), self.to_json()?)?;
        Ok(())
    }

    pub fn directory(&self) -> Result<StaticDirectory> {
        StaticDirectory::new(self.nodes.clone(), &self.links)
    }

    pub fn reference_track(&self) -> Result<SampledTrack> {
        SampledTrack::new(self.track.clone())
    }

    pub fn supports_routing(&self) -> bool {
        self.routing.is_some()
    }

    pub fn supports_placement(&self) -> bool {
        self.placement.is_some()
    }

    pub fn routing_environment(&self) -> Result<RoutingEnvironment<StaticDirectory>> {
        let request = self
            .routing
            .clone()
            .ok_or_else(|| FormicaError::invalid_input("scenario has no routing section"))?;
        RoutingEnvironment::new(self.directory()?, request)
    }

    pub fn placement_environment(&self) -> Result<PlacementEnvironment<StaticDirectory, SampledTrack>> {
        let request = self
            .placement
            .clone()
            .ok_or_else(|| FormicaError::invalid_input("scenario has no placement section"))?;
        PlacementEnvironment::new(
            self.directory()?,
            self.reference_track()?,
            request.modules,
            request.initial,
        )
    }

    /// A small instance that supports both variants.
    pub fn example() -> Self {
        let nodes = vec![
            NodeProfile::new(0, 4.0)
                .with_name("gateway")
                .with_power(1.5)
                .with_bandwidth(10_000.0)
                .at(GeoPosition::new(48.2082, 16.3738)),
            NodeProfile::new(1, 8.0)
                .with_name("edge-a")
                .with_power(2.0)
                .with_bandwidth(10_000.0)
                .at(GeoPosition::new(48.2100, 16.3600)),
            NodeProfile::new(2, 16.0)
                .with_name("edge-b")
                .with_power(3.0)
                .with_bandwidth(10_000.0)
                .at(GeoPosition::new(48.1900, 16.3900)),
            NodeProfile::new(3, 32.0)
                .with_name("cloud")
                .with_power(8.0)
                .with_bandwidth(100_000.0)
                .at(GeoPosition::new(48.3000, 16.5000)),
        ];
        let links = vec![
            Link::new(0, 1, 5.0),
            Link::new(1, 2, 5.0),
            Link::new(2, 3, 5.0),
            Link::new(0, 2, 12.0),
            Link::new(1, 3, 20.0),
        ];
        let track = (0..5)
            .map(|i| TrackSample {
                time: i as f64 * 10.0,
                position: GeoPosition::new(48.2100 - i as f64 * 0.004, 16.3600 + i as f64 * 0.006),
            })
            .collect();
        Self {
            nodes,
            links,
            track,
            routing: Some(RouteRequest::new(0, 3, 3)),
            placement: Some(PlacementRequest {
                modules: vec![
                    Module::new("client", 0.0),
                    Module::new("filter", 5.0),
                    Module::new("analytics", 10.0),
                ],
                initial: InitialNode::NearestToTrackStart,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use formica_core::types::NodeId;

    #[test]
    fn example_builds_both_environments() {
        let s = Scenario::example();
        assert!(s.routing_environment().is_ok());
        let placement = s.placement_environment().unwrap();
        assert_eq!(placement.initiating_node(), NodeId(1));
    }

    #[test]
    fn save_and_load_through_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scenario.json");
        let s = Scenario::example();
        s.save(&path).unwrap();
        assert_eq!(Scenario::load(&path).unwrap(), s);
    }

    #[test]
    fn minimal_document_uses_defaults() {
        let s = Scenario::from_json(
            r#"{
                "nodes": [{ "id": 0, "capacity": 1.0 }, { "id": 1, "capacity": 1.0 }],
                "links": [{ "from": 0, "to": 1, "latency": 2.5 }],
                "routing": { "start": 0, "end": 1, "hops": 1 }
            }"#,
        )
        .unwrap();
        assert!(s.links[0].bidirectional);
        assert!(s.track.is_empty());
        assert!(s.placement_environment().unwrap_err().is_invalid_input());
        assert!(s.routing_environment().is_ok());
    }

    #[test]
    fn malformed_json_is_a_serialization_error() {
        let err = Scenario::from_json("{ nodes: }").unwrap_err();
        assert!(matches!(err, FormicaError::Serialization(_)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = Scenario::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, FormicaError::Io(_)));
    }
}
