//! Problem — the capability set a variant implements.
//!
//! Routing and placement differ only in a handful of decisions: where the
//! ant may go next, how attractive a move looks, which trail cell a move
//! reads, when a solution is complete and what it costs. Everything else
//! (the colony, the selection policy, the daemon actions and the solver
//! loop) is shared and generic over this trait.

use crate::ant::Ant;
use crate::error::Result;
use crate::pheromone::{PheromoneMatrix, Symmetry};
use crate::types::NodeId;
use rand::RngCore;
use serde::{Deserialize, Serialize};

/// How the selection policy draws from the candidate distribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectionRule {
    /// Weighted-random choice proportional to probability mass.
    RouletteWheel,
    /// Exploit the most probable candidate above a threshold draw,
    /// otherwise pick uniformly among all feasible candidates.
    PseudoRandomProportional,
}

/// What happens when an ant runs out of feasible candidates mid-build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EmptyCandidates {
    /// Finish the ant as `Invalid` with cost `f64::MAX`.
    MarkInvalid,
    /// Abort the whole solve with a `SolutionConstruction` error.
    Fail,
}

/// A problem variant the colony can solve.
pub trait Problem: Send + Sync {
    /// Per-ant accumulators (elapsed time, module assignment, ...).
    type Bookkeeping: Clone + Send + Sync + std::fmt::Debug;

    /// Short name for logs and reports.
    fn name(&self) -> &str;

    /// Accumulators of a freshly cleared ant.
    fn fresh_bookkeeping(&self) -> Self::Bookkeeping;

    /// Update accumulators after `node` was placed at `position`.
    fn on_visit(&self, bookkeeping: &mut Self::Bookkeeping, node: NodeId, position: usize);

    /// Node every ant is placed on deterministically at the first hop.
    fn initial_node(&self) -> NodeId;

    /// Nodes reachable from the ant's current position, before the
    /// visited/validity filter.
    fn neighbourhood(&self, ant: &Ant<Self::Bookkeeping>) -> Vec<NodeId>;

    /// Domain validity check for a candidate.
    fn is_valid(&self, _ant: &Ant<Self::Bookkeeping>, _candidate: NodeId) -> bool {
        true
    }

    /// Pheromone-independent desirability of moving to `candidate`.
    fn heuristic(&self, ant: &Ant<Self::Bookkeeping>, candidate: NodeId) -> f64;

    /// Trail cell read and reinforced when moving `previous → candidate`.
    fn trail_cell(&self, previous: NodeId, candidate: NodeId) -> (NodeId, NodeId);

    /// Completion predicate for a building ant.
    fn is_complete(&self, ant: &Ant<Self::Bookkeeping>) -> bool;

    /// Cost of a finished, valid solution.
    fn cost(&self, ant: &Ant<Self::Bookkeeping>) -> f64;

    fn symmetry(&self) -> Symmetry;

    fn selection_rule(&self) -> SelectionRule;

    fn empty_candidates(&self) -> EmptyCandidates;

    /// Estimate an initial trail value when none is configured.
    fn estimate_pheromone_seed(&self, _rng: &mut dyn RngCore) -> Option<f64> {
        None
    }

    /// Build the trail matrix used before the first iteration.
    fn create_pheromone_matrix(&self, seed: Option<f64>) -> Result<PheromoneMatrix>;

    /// Trail value for moving to `candidate`; an absent candidate reads 0.
    fn pheromone_value(
        &self,
        pheromone: &PheromoneMatrix,
        ant: &Ant<Self::Bookkeeping>,
        candidate: Option<NodeId>,
    ) -> f64 {
        let Some(candidate) = candidate else {
            return 0.0;
        };
        let previous = ant.last().unwrap_or_else(|| self.initial_node());
        let (from, to) = self.trail_cell(previous, candidate);
        pheromone.get(from, to)
    }
}
