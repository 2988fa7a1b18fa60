//! In-memory implementations of the directory traits.
//!
//! Callers with their own topology model implement
//! [`NodeDirectory`]/[`TimeTrack`] directly; these are what the scenario
//! loader, the CLI and the tests use.

use formica_core::directory::{NodeDirectory, TimeTrack};
use formica_core::error::{FormicaError, Result};
use formica_core::types::*;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// A latency-weighted link between two nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub from: NodeId,
    pub to: NodeId,
    pub latency: f64,
    /// Also define `to → from` with the same latency (default: true).
    #[serde(default = "default_bidirectional")]
    pub bidirectional: bool,
}

fn default_bidirectional() -> bool {
    true
}

impl Link {
    pub fn new(from: usize, to: usize, latency: f64) -> Self {
        Self {
            from: NodeId(from),
            to: NodeId(to),
            latency,
            bidirectional: true,
        }
    }

    pub fn directed(from: usize, to: usize, latency: f64) -> Self {
        Self {
            bidirectional: false,
            ..Self::new(from, to, latency)
        }
    }
}

/// Node list plus a sparse latency map, fixed at construction.
#[derive(Debug, Clone)]
pub struct StaticDirectory {
    nodes: Vec<NodeProfile>,
    index: HashMap<NodeId, usize>,
    latencies: HashMap<(NodeId, NodeId), f64>,
}

impl StaticDirectory {
    /// Build a directory, validating ids and latencies.
    pub fn new(nodes: Vec<NodeProfile>, links: &[Link]) -> Result<Self> {
        if nodes.is_empty() {
            return Err(FormicaError::invalid_input("node list is empty"));
        }

        let mut index = HashMap::with_capacity(nodes.len());
        for (i, node) in nodes.iter().enumerate() {
            if index.insert(node.id, i).is_some() {
                return Err(FormicaError::invalid_input(format!("duplicate node id {}", node.id)));
            }
        }

        let mut latencies = HashMap::with_capacity(links.len() * 2);
        for link in links {
            for end in [link.from, link.to] {
                if !index.contains_key(&end) {
                    return Err(FormicaError::invalid_input(format!(
                        "link {} -> {} references unknown {}",
                        link.from, link.to, end
                    )));
                }
            }
            if !link.latency.is_finite() || link.latency < 0.0 {
                return Err(FormicaError::invalid_input(format!(
                    "latency {} on {} -> {} must be finite and non-negative",
                    link.latency, link.from, link.to
                )));
            }
            latencies.insert((link.from, link.to), link.latency);
            if link.bidirectional {
                latencies.insert((link.to, link.from), link.latency);
            }
        }

        Ok(Self {
            nodes,
            index,
            latencies,
        })
    }

    pub fn link_count(&self) -> usize {
        self.latencies.len()
    }

    /// Every directed link, sorted by `(from, to)`.
    pub fn links(&self) -> Vec<Link> {
        let mut out: Vec<Link> = self
            .latencies
            .iter()
            .map(|(&(from, to), &latency)| Link {
                from,
                to,
                latency,
                bidirectional: false,
            })
            .collect();
        out.sort_by_key(|l| (l.from, l.to));
        out
    }

    /// Nodes that appear in no link at all.
    pub fn isolated_nodes(&self) -> Vec<NodeId> {
        let linked: HashSet<NodeId> = self
            .latencies
            .keys()
            .flat_map(|&(a, b)| [a, b])
            .collect();
        self.nodes
            .iter()
            .map(|n| n.id)
            .filter(|id| !linked.contains(id))
            .collect()
    }
}

impl NodeDirectory for StaticDirectory {
    fn nodes(&self) -> &[NodeProfile] {
        &self.nodes
    }

    fn node(&self, id: NodeId) -> Option<&NodeProfile> {
        self.index.get(&id).map(|&i| &self.nodes[i])
    }

    fn latency(&self, from: NodeId, to: NodeId) -> Option<f64> {
        self.latencies.get(&(from, to)).copied()
    }
}

/// One point of a reference trajectory.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackSample {
    pub time: f64,
    pub position: GeoPosition,
}

/// Discrete time → position track, kept in the order it was given.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SampledTrack {
    samples: Vec<TrackSample>,
}

impl SampledTrack {
    pub fn new(samples: Vec<TrackSample>) -> Result<Self> {
        if samples.is_empty() {
            return Err(FormicaError::invalid_input("reference track has no samples"));
        }
        if let Some(bad) = samples.iter().find(|s| !s.time.is_finite()) {
            return Err(FormicaError::invalid_input(format!(
                "track sample time {} is not finite",
                bad.time
            )));
        }
        Ok(Self { samples })
    }

    /// A track that never moves.
    pub fn stationary(position: GeoPosition) -> Self {
        Self {
            samples: vec![TrackSample {
                time: 0.0,
                position,
            }],
        }
    }

    pub fn samples(&self) -> &[TrackSample] {
        &self.samples
    }
}

impl TimeTrack for SampledTrack {
    fn position_at(&self, time: f64) -> Option<GeoPosition> {
        let mut best: Option<&TrackSample> = None;
        let mut best_diff = f64::MAX;
        for sample in &self.samples {
            let diff = (sample.time - time).abs();
            if diff < best_diff {
                best_diff = diff;
                best = Some(sample);
            }
        }
        best.map(|s| s.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three_nodes() -> Vec<NodeProfile> {
        vec![
            NodeProfile::new(0, 4.0),
            NodeProfile::new(5, 8.0),
            NodeProfile::new(2, 16.0),
        ]
    }

    #[test]
    fn bidirectional_links_are_mirrored() {
        let dir = StaticDirectory::new(three_nodes(), &[Link::new(0, 5, 3.0)]).unwrap();
        assert_eq!(dir.latency(NodeId(0), NodeId(5)), Some(3.0));
        assert_eq!(dir.latency(NodeId(5), NodeId(0)), Some(3.0));
        assert_eq!(dir.latency(NodeId(0), NodeId(2)), None);
        assert_eq!(dir.isolated_nodes(), vec![NodeId(2)]);
    }

    #[test]
    fn directed_links_are_one_way() {
        let dir = StaticDirectory::new(three_nodes(), &[Link::directed(0, 5, 3.0)]).unwrap();
        assert_eq!(dir.latency(NodeId(5), NodeId(0)), None);
    }

    #[test]
    fn neighbours_follow_node_order() {
        let dir = StaticDirectory::new(
            three_nodes(),
            &[Link::new(0, 2, 1.0), Link::new(0, 5, 1.0)],
        )
        .unwrap();
        assert_eq!(dir.neighbours(NodeId(0)), vec![NodeId(5), NodeId(2)]);
        assert_eq!(dir.max_node_id(), Some(NodeId(5)));
    }

    #[test]
    fn malformed_input_is_rejected() {
        assert!(StaticDirectory::new(vec![], &[]).unwrap_err().is_invalid_input());
        assert!(StaticDirectory::new(three_nodes(), &[Link::new(0, 9, 1.0)]).is_err());
        assert!(StaticDirectory::new(three_nodes(), &[Link::new(0, 5, f64::NAN)]).is_err());
        let dup = vec![NodeProfile::new(1, 1.0), NodeProfile::new(1, 2.0)];
        assert!(StaticDirectory::new(dup, &[]).is_err());
    }

    #[test]
    fn nearest_sample_wins_and_first_breaks_ties() {
        let track = SampledTrack::new(vec![
            TrackSample { time: 0.0, position: GeoPosition::new(0.0, 0.0) },
            TrackSample { time: 10.0, position: GeoPosition::new(1.0, 1.0) },
            TrackSample { time: 20.0, position: GeoPosition::new(2.0, 2.0) },
        ])
        .unwrap();
        assert_eq!(track.position_at(3.0), Some(GeoPosition::new(0.0, 0.0)));
        assert_eq!(track.position_at(14.0), Some(GeoPosition::new(1.0, 1.0)));
        // 15 is equidistant from 10 and 20: the earlier sample wins.
        assert_eq!(track.position_at(15.0), Some(GeoPosition::new(1.0, 1.0)));
        assert_eq!(track.position_at(1_000.0), Some(GeoPosition::new(2.0, 2.0)));
    }

    #[test]
    fn empty_track_is_rejected() {
        assert!(SampledTrack::new(vec![]).is_err());
    }
}
