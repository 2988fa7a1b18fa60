//! Daemon actions — the pheromone lifecycle.
//!
//! Ants only read the trail. Everything that writes it lives here and
//! runs between iterations, after the colony has finished building:
//!
//! 1. `StartPheromoneMatrix`: once, before the first iteration
//! 2. `Evaporate`: every iteration, before the deposit
//! 3. `OfflineDeposit`: every iteration, from that iteration's ants

use formica_core::ant::Ant;
use formica_core::error::Result;
use formica_core::pheromone::PheromoneMatrix;
use formica_core::problem::Problem;
use serde::Serialize;
use tracing::trace;

/// A pheromone update step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DaemonAction {
    StartPheromoneMatrix,
    Evaporate,
    OfflineDeposit,
}

/// Actions applied after every iteration, in order.
pub const ITERATION_SCHEDULE: [DaemonAction; 2] = [DaemonAction::Evaporate, DaemonAction::OfflineDeposit];

/// Build the starting trail.
pub fn start_pheromone_matrix<P: Problem + ?Sized>(
    problem: &P,
    seed: Option<f64>,
) -> Result<PheromoneMatrix> {
    let matrix = problem.create_pheromone_matrix(seed)?;
    trace!(
        problem = problem.name(),
        dimension = matrix.dimension(),
        seed = ?seed,
        "pheromone matrix initialised"
    );
    Ok(matrix)
}

/// Multiply every cell by `1 - ratio`.
pub fn evaporate(pheromone: &mut PheromoneMatrix, ratio: f64) {
    pheromone.evaporate(ratio);
    trace!(ratio, total = pheromone.total(), "evaporated");
}

/// Add `1 / cost` along every hop of each finished, valid ant.
///
/// Returns the number of ants that deposited.
pub fn offline_deposit<P: Problem + ?Sized>(
    problem: &P,
    pheromone: &mut PheromoneMatrix,
    ants: &[Ant<P::Bookkeeping>],
) -> usize {
    let mut contributors = 0;
    for ant in ants.iter().filter(|a| !a.is_invalid()) {
        let cost = ant.solution_cost(problem);
        let amount = 1.0 / cost;
        if !amount.is_finite() {
            continue;
        }
        for (previous, node) in ant.hops() {
            let (from, to) = problem.trail_cell(previous, node);
            pheromone.deposit(from, to, amount);
        }
        contributors += 1;
    }
    trace!(contributors, total = pheromone.total(), "offline deposit");
    contributors
}

/// Run [`ITERATION_SCHEDULE`] for one finished iteration.
pub fn end_of_iteration<P: Problem + ?Sized>(
    problem: &P,
    pheromone: &mut PheromoneMatrix,
    ants: &[Ant<P::Bookkeeping>],
    evaporation_ratio: f64,
) {
    for action in ITERATION_SCHEDULE {
        match action {
            DaemonAction::Evaporate => evaporate(pheromone, evaporation_ratio),
            DaemonAction::OfflineDeposit => {
                offline_deposit(problem, pheromone, ants);
            }
            DaemonAction::StartPheromoneMatrix => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory_impl::{Link, StaticDirectory};
    use crate::routing::{RouteRequest, RoutingEnvironment};
    use formica_core::types::{NodeId, NodeProfile};

    fn env() -> RoutingEnvironment<StaticDirectory> {
        let nodes = (0..3).map(|i| NodeProfile::new(i, 1.0)).collect();
        let links = [Link::new(0, 1, 2.0), Link::new(1, 2, 2.0)];
        RoutingEnvironment::new(StaticDirectory::new(nodes, &links).unwrap(), RouteRequest::new(0, 2, 2))
            .unwrap()
    }

    fn walked(env: &RoutingEnvironment<StaticDirectory>, path: &[usize]) -> Ant<()> {
        let mut ant = Ant::new(());
        for &id in path {
            ant.visit(env, NodeId(id));
        }
        ant
    }

    #[test]
    fn deposit_follows_hops_and_mirrors() {
        let env = env();
        let mut trail = start_pheromone_matrix(&env, Some(0.0)).unwrap();
        let ants = vec![walked(&env, &[0, 1, 2])];
        assert_eq!(offline_deposit(&env, &mut trail, &ants), 1);
        // Cost 4, so each hop receives 0.25 in both directions.
        assert_eq!(trail.get(NodeId(0), NodeId(1)), 0.25);
        assert_eq!(trail.get(NodeId(2), NodeId(1)), 0.25);
        assert_eq!(trail.get(NodeId(0), NodeId(2)), 0.0);
        assert!(trail.is_symmetric());
    }

    #[test]
    fn invalid_ants_do_not_deposit() {
        let env = env();
        let mut trail = start_pheromone_matrix(&env, Some(0.0)).unwrap();
        let mut ant = walked(&env, &[0, 1]);
        ant.mark_invalid();
        assert_eq!(offline_deposit(&env, &mut trail, &[ant]), 0);
        assert_eq!(trail.total(), 0.0);
    }

    #[test]
    fn iteration_evaporates_before_depositing() {
        let env = env();
        let mut trail = start_pheromone_matrix(&env, Some(1.0)).unwrap();
        let ants = vec![walked(&env, &[0, 1, 2])];
        end_of_iteration(&env, &mut trail, &ants, 0.5);
        assert!((trail.get(NodeId(0), NodeId(1)) - 0.75).abs() < 1e-12);
        assert!((trail.get(NodeId(0), NodeId(2)) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn full_evaporation_keeps_only_fresh_deposits() {
        let env = env();
        let mut trail = start_pheromone_matrix(&env, Some(3.0)).unwrap();
        let ants = vec![walked(&env, &[0, 1, 2])];
        end_of_iteration(&env, &mut trail, &ants, 1.0);
        assert_eq!(trail.get(NodeId(1), NodeId(0)), 0.25);
        assert_eq!(trail.get(NodeId(0), NodeId(2)), 0.0);
        assert_eq!(trail.total(), 1.0);
    }
}
