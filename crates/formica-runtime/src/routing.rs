//! Routing variant — fixed start and end node, undirected trail.
//!
//! An ant walks the latency graph from the start node until it stands on
//! the end node with at least `hops - 1` nodes placed. Moves are drawn with
//! the roulette wheel; an ant that runs into a dead end is marked invalid
//! and simply skipped by the solver.

use formica_core::ant::Ant;
use formica_core::directory::NodeDirectory;
use formica_core::error::{FormicaError, Result};
use formica_core::pheromone::{PheromoneMatrix, Symmetry};
use formica_core::problem::{EmptyCandidates, Problem, SelectionRule};
use formica_core::types::NodeId;
use rand::seq::SliceRandom;
use rand::RngCore;
use serde::{Deserialize, Serialize};

/// Added to a latency before taking its reciprocal.
pub const LATENCY_EPSILON: f64 = f32::MIN_POSITIVE as f64;

/// How the attractiveness of a move is estimated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeuristicStrategy {
    /// `1 / great-circle distance` between previous node and candidate.
    /// Every node needs a position.
    GeoDistance,
    /// `1 / (link latency + ε)`.
    #[default]
    LinkLatency,
}

/// What to route: endpoints, required hop count and heuristic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteRequest {
    pub start: NodeId,
    pub end: NodeId,
    pub hops: usize,
    #[serde(default)]
    pub heuristic: HeuristicStrategy,
}

impl RouteRequest {
    pub fn new(start: usize, end: usize, hops: usize) -> Self {
        Self {
            start: NodeId(start),
            end: NodeId(end),
            hops,
            heuristic: HeuristicStrategy::default(),
        }
    }

    pub fn with_heuristic(mut self, heuristic: HeuristicStrategy) -> Self {
        self.heuristic = heuristic;
        self
    }
}

/// Latency graph plus routing parameters.
#[derive(Debug)]
pub struct RoutingEnvironment<D: NodeDirectory> {
    directory: D,
    request: RouteRequest,
}

impl<D: NodeDirectory> RoutingEnvironment<D> {
    pub fn new(directory: D, request: RouteRequest) -> Result<Self> {
        if directory.max_node_id().is_none() {
            return Err(FormicaError::invalid_input("routing needs at least one node"));
        }
        for (role, id) in [("start", request.start), ("end", request.end)] {
            if directory.node(id).is_none() {
                return Err(FormicaError::invalid_input(format!("{} {} is not in the directory", role, id)));
            }
        }
        if request.hops == 0 {
            return Err(FormicaError::invalid_input("required hop count must be at least 1"));
        }
        if request.heuristic == HeuristicStrategy::GeoDistance {
            if let Some(node) = directory.nodes().iter().find(|n| n.position.is_none()) {
                return Err(FormicaError::invalid_input(format!(
                    "geo-distance heuristic needs a position for {}",
                    node.id
                )));
            }
        }
        Ok(Self {
            directory,
            request,
        })
    }

    pub fn directory(&self) -> &D {
        &self.directory
    }

    pub fn request(&self) -> &RouteRequest {
        &self.request
    }

    /// Latency of `from → to`, or infinity when not directly reachable.
    pub fn latency_or_infinite(&self, from: NodeId, to: NodeId) -> f64 {
        self.directory.latency(from, to).unwrap_or(f64::INFINITY)
    }

    /// Sum of hop latencies along `path`.
    pub fn path_cost(&self, path: &[NodeId]) -> f64 {
        path.windows(2)
            .map(|w| self.latency_or_infinite(w[0], w[1]))
            .sum()
    }

    fn previous(&self, ant: &Ant<()>) -> NodeId {
        ant.last().unwrap_or(self.request.start)
    }
}

impl<D: NodeDirectory> Problem for RoutingEnvironment<D> {
    type Bookkeeping = ();

    fn name(&self) -> &str {
        "routing"
    }

    fn fresh_bookkeeping(&self) {}

    fn on_visit(&self, _: &mut (), _: NodeId, _: usize) {}

    fn initial_node(&self) -> NodeId {
        self.request.start
    }

    fn neighbourhood(&self, ant: &Ant<()>) -> Vec<NodeId> {
        self.directory.neighbours(self.previous(ant))
    }

    fn heuristic(&self, ant: &Ant<()>, candidate: NodeId) -> f64 {
        let previous = self.previous(ant);
        match self.request.heuristic {
            HeuristicStrategy::GeoDistance => {
                match (self.directory.position(previous), self.directory.position(candidate)) {
                    (Some(a), Some(b)) => 1.0 / a.distance_to(&b),
                    _ => f64::NAN,
                }
            }
            HeuristicStrategy::LinkLatency => {
                1.0 / (self.latency_or_infinite(previous, candidate) + LATENCY_EPSILON)
            }
        }
    }

    fn trail_cell(&self, previous: NodeId, candidate: NodeId) -> (NodeId, NodeId) {
        (candidate, previous)
    }

    fn is_complete(&self, ant: &Ant<()>) -> bool {
        ant.position() >= self.request.hops.saturating_sub(1) && ant.last() == Some(self.request.end)
    }

    fn cost(&self, ant: &Ant<()>) -> f64 {
        self.path_cost(ant.solution())
    }

    fn symmetry(&self) -> Symmetry {
        Symmetry::Undirected
    }

    fn selection_rule(&self) -> SelectionRule {
        SelectionRule::RouletteWheel
    }

    fn empty_candidates(&self) -> EmptyCandidates {
        EmptyCandidates::MarkInvalid
    }

    /// `hops / Σ latency` over a shuffled sample of `hops` real latencies.
    fn estimate_pheromone_seed(&self, rng: &mut dyn RngCore) -> Option<f64> {
        let mut latencies = self.directory.all_latencies();
        latencies.shuffle(rng);
        let sample = &latencies[..latencies.len().min(self.request.hops)];
        let total: f64 = sample.iter().sum();
        if sample.is_empty() || total <= 0.0 {
            return Some(1.0);
        }
        Some(sample.len() as f64 / total)
    }

    fn create_pheromone_matrix(&self, seed: Option<f64>) -> Result<PheromoneMatrix> {
        let value = seed.unwrap_or(1.0);
        if !value.is_finite() || value < 0.0 {
            return Err(FormicaError::out_of_range("initial_pheromone", value, "finite and >= 0"));
        }
        let mut matrix = PheromoneMatrix::for_directory(&self.directory, Symmetry::Undirected)?;
        matrix.fill(value);
        Ok(matrix)
    }
}
