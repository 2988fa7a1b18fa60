//! Ant — one stochastic solution-construction walker.
//!
//! An ant owns a single in-progress solution, a visited set and whatever
//! problem-specific bookkeeping its variant needs. It moves through a
//! small state machine:
//!
//! ```text
//! Cleared ──visit──▶ Building ──complete──▶ Ready
//!                        │
//!                        └──no candidates──▶ Invalid
//! ```
//!
//! Ants are cleared, not reconstructed, at the top of every iteration.

use crate::problem::Problem;
use crate::types::NodeId;
use serde::Serialize;
use std::collections::HashSet;

/// Lifecycle state of an ant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AntState {
    /// Empty solution, accumulators reset.
    Cleared,
    /// At least one node placed, completion predicate not yet satisfied.
    Building,
    /// The variant's completion predicate holds.
    Ready,
    /// No feasible candidate was found before completion.
    Invalid,
}

/// A solution-building agent, generic over the variant's bookkeeping.
#[derive(Debug, Clone)]
pub struct Ant<B> {
    solution: Vec<NodeId>,
    visited: HashSet<NodeId>,
    state: AntState,
    bookkeeping: B,
}

impl<B> Ant<B> {
    pub fn new(bookkeeping: B) -> Self {
        Self {
            solution: Vec::new(),
            visited: HashSet::new(),
            state: AntState::Cleared,
            bookkeeping,
        }
    }

    /// Reset to `Cleared` with fresh bookkeeping, keeping allocations.
    pub fn clear(&mut self, bookkeeping: B) {
        self.solution.clear();
        self.visited.clear();
        self.state = AntState::Cleared;
        self.bookkeeping = bookkeeping;
    }

    /// Append a node to the solution and mark it visited.
    ///
    /// Bookkeeping is updated by the caller through [`Problem::on_visit`].
    pub(crate) fn push(&mut self, node: NodeId) {
        self.solution.push(node);
        self.visited.insert(node);
        if self.state == AntState::Cleared {
            self.state = AntState::Building;
        }
    }

    /// Visit `node` and let the problem update its accumulators.
    pub fn visit<P>(&mut self, problem: &P, node: NodeId)
    where
        P: Problem<Bookkeeping = B> + ?Sized,
    {
        let position = self.solution.len();
        self.push(node);
        problem.on_visit(&mut self.bookkeeping, node, position);
    }

    /// Give up on this ant: it finished without a usable solution.
    pub fn mark_invalid(&mut self) {
        self.state = AntState::Invalid;
    }

    /// Re-evaluate the completion predicate and move to `Ready` if it holds.
    pub fn is_solution_ready<P>(&mut self, problem: &P) -> bool
    where
        P: Problem<Bookkeeping = B> + ?Sized,
    {
        match self.state {
            AntState::Invalid | AntState::Ready => true,
            AntState::Cleared => false,
            AntState::Building => {
                if problem.is_complete(self) {
                    self.state = AntState::Ready;
                    true
                } else {
                    false
                }
            }
        }
    }

    /// Cost of the finished solution; `f64::MAX` for an invalid ant.
    pub fn solution_cost<P>(&self, problem: &P) -> f64
    where
        P: Problem<Bookkeeping = B> + ?Sized,
    {
        match self.state {
            AntState::Invalid => f64::MAX,
            _ => problem.cost(self),
        }
    }

    pub fn solution(&self) -> &[NodeId] {
        &self.solution
    }

    /// Index of the next slot to fill.
    pub fn position(&self) -> usize {
        self.solution.len()
    }

    /// Most recently visited node.
    pub fn last(&self) -> Option<NodeId> {
        self.solution.last().copied()
    }

    pub fn is_visited(&self, node: NodeId) -> bool {
        self.visited.contains(&node)
    }

    pub fn state(&self) -> AntState {
        self.state
    }

    pub fn is_invalid(&self) -> bool {
        self.state == AntState::Invalid
    }

    pub fn bookkeeping(&self) -> &B {
        &self.bookkeeping
    }

    /// Consecutive `(previous, node)` pairs of the solution.
    pub fn hops(&self) -> impl Iterator<Item = (NodeId, NodeId)> + '_ {
        self.solution.windows(2).map(|w| (w[0], w[1]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_moves_cleared_to_building() {
        let mut ant: Ant<()> = Ant::new(());
        assert_eq!(ant.state(), AntState::Cleared);
        ant.push(NodeId(3));
        assert_eq!(ant.state(), AntState::Building);
        assert!(ant.is_visited(NodeId(3)));
        assert_eq!(ant.position(), 1);
    }

    #[test]
    fn clear_resets_everything() {
        let mut ant: Ant<u32> = Ant::new(1);
        ant.push(NodeId(0));
        ant.push(NodeId(1));
        ant.mark_invalid();
        ant.clear(7);
        assert_eq!(ant.state(), AntState::Cleared);
        assert!(ant.solution().is_empty());
        assert!(!ant.is_visited(NodeId(0)));
        assert_eq!(*ant.bookkeeping(), 7);
    }

    #[test]
    fn hops_are_consecutive_pairs() {
        let mut ant: Ant<()> = Ant::new(());
        for id in [0, 4, 2] {
            ant.push(NodeId(id));
        }
        let hops: Vec<_> = ant.hops().collect();
        assert_eq!(hops, vec![(NodeId(0), NodeId(4)), (NodeId(4), NodeId(2))]);
    }
}
