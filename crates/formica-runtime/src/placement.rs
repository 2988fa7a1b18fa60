//! Placement variant — an ordered chain of module-to-node assignments.
//!
//! The module list is consumed front to back. `modules[0]` is the client
//! module, bound outside the candidate set; `modules[1]` always lands on
//! the initiating node; every later module is placed by the colony on a
//! node that can host it and is reachable from the previous host. The
//! heuristic favours nodes close to where the reference track will be by
//! the time the chain reaches them.

use formica_core::ant::Ant;
use formica_core::directory::{NodeDirectory, TimeTrack};
use formica_core::error::{FormicaError, Result};
use formica_core::pheromone::{PheromoneMatrix, Symmetry};
use formica_core::problem::{EmptyCandidates, Problem, SelectionRule};
use formica_core::types::{Module, NodeId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, VecDeque};

use crate::routing::LATENCY_EPSILON;

/// Bandwidth is divided by this to get the transfer rate of a module.
pub const BANDWIDTH_RATE_DIVISOR: f64 = 2.0 * 8000.0;

/// Where the chain starts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InitialNode {
    /// A caller-chosen node.
    Fixed(NodeId),
    /// The capable node closest to the start of the reference track.
    #[default]
    NearestToTrackStart,
}

/// Per-ant accumulators.
#[derive(Debug, Clone, Default)]
pub struct PlacementBookkeeping {
    /// Module indices still to place, front first.
    pub remaining: VecDeque<usize>,
    /// Module indices placed so far, parallel to the ant's solution.
    pub placed: Vec<usize>,
    /// Module index hosted by each visited node.
    pub assignment: BTreeMap<NodeId, usize>,
}

/// Decoded module assignment of a solution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacementOutcome {
    /// Node → module name.
    pub assignment: BTreeMap<NodeId, String>,
    /// `(module name, node)` in chain order, starting at the initiating node.
    pub placements: Vec<(String, NodeId)>,
}

/// Nodes, latencies, reference track and module chain.
#[derive(Debug)]
pub struct PlacementEnvironment<D: NodeDirectory, T: TimeTrack> {
    directory: D,
    track: T,
    modules: Vec<Module>,
    initial: NodeId,
}

impl<D: NodeDirectory, T: TimeTrack> PlacementEnvironment<D, T> {
    pub fn new(directory: D, track: T, modules: Vec<Module>, initial: InitialNode) -> Result<Self> {
        if directory.max_node_id().is_none() {
            return Err(FormicaError::invalid_input("placement needs at least one node"));
        }
        if modules.len() < 2 {
            return Err(FormicaError::invalid_input(format!(
                "placement needs a client module and at least one module to place, got {}",
                modules.len()
            )));
        }
        if let Some(node) = directory.nodes().iter().find(|n| n.position.is_none()) {
            return Err(FormicaError::invalid_input(format!(
                "{} has no position; the placement heuristic needs one for every node",
                node.id
            )));
        }
        if track.start_position().is_none() {
            return Err(FormicaError::invalid_input("reference track has no start position"));
        }

        let first = &modules[1];
        let initial = match initial {
            InitialNode::Fixed(id) => {
                let node = directory.node(id).ok_or_else(|| {
                    FormicaError::invalid_input(format!("initial {} is not in the directory", id))
                })?;
                if !node.can_host(first) {
                    return Err(FormicaError::invalid_input(format!(
                        "initial {} (capacity {}) cannot host '{}' (needs more than {})",
                        id, node.capacity, first.name, first.capacity
                    )));
                }
                id
            }
            InitialNode::NearestToTrackStart => nearest_to_track_start(&directory, &track, first)?,
        };

        Ok(Self {
            directory,
            track,
            modules,
            initial,
        })
    }

    pub fn directory(&self) -> &D {
        &self.directory
    }

    pub fn modules(&self) -> &[Module] {
        &self.modules
    }

    /// The node hosting `modules[1]`.
    pub fn initiating_node(&self) -> NodeId {
        self.initial
    }

    /// Estimated time at which the chain built so far hands over to the next node.
    pub fn elapsed_time(&self, ant: &Ant<PlacementBookkeeping>) -> f64 {
        let transfer: f64 = ant
            .solution()
            .iter()
            .zip(&ant.bookkeeping().placed)
            .map(|(&node, &module)| {
                let bandwidth = self.directory.node(node).map_or(0.0, |n| n.bandwidth);
                if bandwidth > 0.0 {
                    self.modules[module].size / (bandwidth / BANDWIDTH_RATE_DIVISOR)
                } else {
                    0.0
                }
            })
            .sum();
        let travel: f64 = ant
            .hops()
            .filter_map(|(a, b)| self.directory.latency(a, b))
            .sum();
        transfer + travel
    }

    /// Map a solution back to module names.
    pub fn outcome(&self, solution: &[NodeId]) -> PlacementOutcome {
        let placements: Vec<(String, NodeId)> = self.modules[1..]
            .iter()
            .zip(solution)
            .map(|(m, &node)| (m.name.clone(), node))
            .collect();
        let assignment = placements
            .iter()
            .map(|(name, node)| (*node, name.clone()))
            .collect();
        PlacementOutcome {
            assignment,
            placements,
        }
    }

    fn previous(&self, ant: &Ant<PlacementBookkeeping>) -> NodeId {
        ant.last().unwrap_or(self.initial)
    }
}

/// Capable node closest to the track start; the first one wins ties.
fn nearest_to_track_start<D: NodeDirectory, T: TimeTrack>(
    directory: &D,
    track: &T,
    module: &Module,
) -> Result<NodeId> {
    let start = track
        .start_position()
        .ok_or_else(|| FormicaError::invalid_input("reference track has no start position"))?;
    let mut best: Option<(NodeId, f64)> = None;
    for node in directory.nodes().iter().filter(|n| n.can_host(module)) {
        let Some(position) = node.position else { continue };
        let distance = position.distance_to(&start);
        match best {
            Some((_, d)) if distance >= d => {}
            _ => best = Some((node.id, distance)),
        }
    }
    best.map(|(id, _)| id).ok_or_else(|| {
        FormicaError::invalid_input(format!(
            "no node can host '{}' (needs capacity above {})",
            module.name, module.capacity
        ))
    })
}

impl<D: NodeDirectory, T: TimeTrack> Problem for PlacementEnvironment<D, T> {
    type Bookkeeping = PlacementBookkeeping;

    fn name(&self) -> &str {
        "placement"
    }

    fn fresh_bookkeeping(&self) -> PlacementBookkeeping {
        PlacementBookkeeping {
            remaining: (1..self.modules.len()).collect(),
            ..Default::default()
        }
    }

    fn on_visit(&self, bookkeeping: &mut PlacementBookkeeping, node: NodeId, _position: usize) {
        if let Some(module) = bookkeeping.remaining.pop_front() {
            bookkeeping.placed.push(module);
            bookkeeping.assignment.insert(node, module);
        }
    }

    fn initial_node(&self) -> NodeId {
        self.initial
    }

    /// Nodes able to host the next module.
    fn neighbourhood(&self, ant: &Ant<PlacementBookkeeping>) -> Vec<NodeId> {
        let Some(&next) = ant.bookkeeping().remaining.front() else {
            return Vec::new();
        };
        let module = &self.modules[next];
        self.directory
            .nodes()
            .iter()
            .filter(|n| n.can_host(module))
            .map(|n| n.id)
            .collect()
    }

    /// Reachable from the previous host.
    fn is_valid(&self, ant: &Ant<PlacementBookkeeping>, candidate: NodeId) -> bool {
        self.directory.latency(self.previous(ant), candidate).is_some()
    }

    /// Reciprocal distance from the candidate to where the client is
    /// expected to be once the chain so far has run.
    ///
    /// A candidate sitting exactly on that point reads as infinitely
    /// attractive; the resulting non-finite probability mass aborts the
    /// solve with a `Configuration` error, as with coincident nodes under
    /// the geo-distance routing heuristic.
    fn heuristic(&self, ant: &Ant<PlacementBookkeeping>, candidate: NodeId) -> f64 {
        let elapsed = self.elapsed_time(ant);
        match (self.track.position_at(elapsed), self.directory.position(candidate)) {
            (Some(user), Some(node)) => 1.0 / node.distance_to(&user),
            _ => f64::NAN,
        }
    }

    fn trail_cell(&self, previous: NodeId, candidate: NodeId) -> (NodeId, NodeId) {
        (previous, candidate)
    }

    fn is_complete(&self, ant: &Ant<PlacementBookkeeping>) -> bool {
        ant.bookkeeping().remaining.is_empty()
    }

    /// Σ latency of each hop plus the power draw of the node it lands on.
    /// The two terms are summed as-is, without unit normalisation.
    fn cost(&self, ant: &Ant<PlacementBookkeeping>) -> f64 {
        ant.hops()
            .map(|(a, b)| {
                let latency = self.directory.latency(a, b).unwrap_or(f64::INFINITY);
                let power = self.directory.node(b).map_or(0.0, |n| n.power);
                latency + power
            })
            .sum()
    }

    fn symmetry(&self) -> Symmetry {
        Symmetry::Directed
    }

    fn selection_rule(&self) -> SelectionRule {
        SelectionRule::PseudoRandomProportional
    }

    fn empty_candidates(&self) -> EmptyCandidates {
        EmptyCandidates::Fail
    }

    /// `1 / (latency + ε)` on every defined link, 0 elsewhere. A configured
    /// seed overrides the latency-derived values.
    fn create_pheromone_matrix(&self, seed: Option<f64>) -> Result<PheromoneMatrix> {
        let mut matrix = PheromoneMatrix::for_directory(&self.directory, Symmetry::Directed)?;
        if let Some(value) = seed {
            if !value.is_finite() || value < 0.0 {
                return Err(FormicaError::out_of_range("initial_pheromone", value, "finite and >= 0"));
            }
            matrix.fill(value);
            return Ok(matrix);
        }
        for from in self.directory.nodes() {
            for to in self.directory.nodes() {
                if let Some(latency) = self.directory.latency(from.id, to.id) {
                    matrix.set(from.id, to.id, 1.0 / (latency + LATENCY_EPSILON))?;
                }
            }
        }
        Ok(matrix)
    }
}
