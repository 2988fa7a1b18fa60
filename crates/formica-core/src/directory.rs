//! Directory — the external collaborators a solve consumes.
//!
//! The solver never builds nodes, simulates links or parses mobility
//! traces. It reads a pre-built node list and latency map through
//! [`NodeDirectory`], and for the placement variant a reference
//! trajectory through [`TimeTrack`].

use crate::types::*;

/// Read-only view of the candidate nodes and their pairwise latencies.
///
/// This is a trait rather than a concrete type so that callers can back it
/// with whatever topology model they already have.
pub trait NodeDirectory: Send + Sync {
    /// All nodes, in a stable order. Candidate lists follow this order.
    fn nodes(&self) -> &[NodeProfile];

    /// Look up a node by id.
    fn node(&self, id: NodeId) -> Option<&NodeProfile>;

    /// Latency from `from` to `to`, or `None` when not directly reachable.
    fn latency(&self, from: NodeId, to: NodeId) -> Option<f64>;

    /// Ids directly reachable from `id`, in node-list order.
    fn neighbours(&self, id: NodeId) -> Vec<NodeId> {
        self.nodes()
            .iter()
            .map(|n| n.id)
            .filter(|&other| self.latency(id, other).is_some())
            .collect()
    }

    /// Largest node id, or `None` when the directory is empty.
    fn max_node_id(&self) -> Option<NodeId> {
        self.nodes().iter().map(|n| n.id).max()
    }

    /// Every defined latency value, in node-list order of the sender.
    fn all_latencies(&self) -> Vec<f64> {
        let nodes = self.nodes();
        let mut out = Vec::new();
        for from in nodes {
            for to in nodes {
                if let Some(l) = self.latency(from.id, to.id) {
                    out.push(l);
                }
            }
        }
        out
    }

    /// Number of nodes.
    fn node_count(&self) -> usize {
        self.nodes().len()
    }

    /// Geographic position of a node, when known.
    fn position(&self, id: NodeId) -> Option<GeoPosition> {
        self.node(id).and_then(|n| n.position)
    }
}

/// A reference trajectory: elapsed time → geographic position.
pub trait TimeTrack: Send + Sync {
    /// Position of the sample whose time is nearest to `time`.
    ///
    /// The smallest absolute difference wins; on ties the sample that
    /// comes first in iteration order wins.
    fn position_at(&self, time: f64) -> Option<GeoPosition>;

    /// Position at the start of the trajectory.
    fn start_position(&self) -> Option<GeoPosition> {
        self.position_at(0.0)
    }
}
