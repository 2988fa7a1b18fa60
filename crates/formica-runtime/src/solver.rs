//! Solver — the iteration loop.
//!
//! Each iteration:
//! 1. Draw one generator seed per ant from the master generator
//! 2. Build every ant against the current trail
//! 3. Replace the global best when a valid ant is strictly cheaper
//! 4. Evaporate, then deposit along this iteration's solutions
//!
//! There is no early stopping; the iteration count alone bounds the run.

use crate::colony::Colony;
use crate::config::AcoConfig;
use crate::daemon;
use crate::metrics::ConvergenceSummary;
use formica_core::error::Result;
use formica_core::pheromone::PheromoneMatrix;
use formica_core::problem::Problem;
use formica_core::types::NodeId;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

/// Best solution found so far.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BestSolution {
    pub nodes: Vec<NodeId>,
    pub cost: f64,
}

impl BestSolution {
    /// Nothing found yet: empty path at `f64::MAX`.
    pub fn none() -> Self {
        Self {
            nodes: Vec::new(),
            cost: f64::MAX,
        }
    }

    pub fn is_found(&self) -> bool {
        !self.nodes.is_empty() && self.cost < f64::MAX
    }
}

/// Per-iteration statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IterationStats {
    pub iteration: usize,
    /// Global best after this iteration (`f64::MAX` while nothing is found).
    pub best_cost: f64,
    /// Cheapest valid ant of this iteration.
    pub iteration_best: Option<f64>,
    /// Mean cost over the valid ants of this iteration.
    pub mean_cost: Option<f64>,
    pub valid_agents: usize,
    pub invalid_agents: usize,
}

/// Everything a solve produces.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolveReport {
    pub problem: String,
    pub best: BestSolution,
    pub iterations: Vec<IterationStats>,
    /// Initial trail value, configured or estimated.
    pub initial_pheromone: Option<f64>,
    /// Trail after the last daemon actions.
    pub pheromone: PheromoneMatrix,
}

impl SolveReport {
    pub fn summary(&self) -> ConvergenceSummary {
        ConvergenceSummary::from_history(&self.iterations)
    }
}

/// Runs the colony for the configured number of iterations.
#[derive(Debug, Clone)]
pub struct Solver {
    config: AcoConfig,
}

impl Solver {
    pub fn new(config: AcoConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &AcoConfig {
        &self.config
    }

    /// Master generator seeded from the configuration, or from entropy
    /// when no seed is configured.
    pub fn master_rng(&self) -> ChaCha8Rng {
        let seed = self.config.seed.unwrap_or_else(rand::random);
        ChaCha8Rng::seed_from_u64(seed)
    }

    pub fn solve<P: Problem>(&self, problem: &P) -> Result<SolveReport> {
        let mut rng = self.master_rng();
        self.solve_with_rng(problem, &mut rng)
    }

    pub fn solve_with_rng<P: Problem, R: Rng>(&self, problem: &P, rng: &mut R) -> Result<SolveReport> {
        self.solve_observed(problem, rng, |_| {})
    }

    /// Solve, calling `observer` after every iteration.
    #[instrument(skip_all, fields(problem = problem.name()))]
    pub fn solve_observed<P, R, F>(&self, problem: &P, rng: &mut R, mut observer: F) -> Result<SolveReport>
    where
        P: Problem,
        R: Rng,
        F: FnMut(&IterationStats),
    {
        let config = &self.config;
        let params = config.selection_params();

        let initial_pheromone = match config.initial_pheromone {
            Some(value) => Some(value),
            None => problem.estimate_pheromone_seed(rng),
        };
        let mut pheromone = daemon::start_pheromone_matrix(problem, initial_pheromone)?;
        let mut colony = Colony::new(problem, config.agent_count)?;

        info!(
            agents = config.agent_count,
            iterations = config.iteration_count,
            parallel = config.parallel,
            initial_pheromone = ?initial_pheromone,
            "solve started"
        );

        let mut best = BestSolution::none();
        let mut history = Vec::with_capacity(config.iteration_count);

        for iteration in 0..config.iteration_count {
            let seeds: Vec<u64> = (0..colony.len()).map(|_| rng.gen()).collect();
            colony.build(problem, &pheromone, &params, &seeds, config.parallel)?;

            let valid_costs = colony.valid_costs(problem);
            let iteration_best = colony.iteration_best(problem);
            if let Some((nodes, cost)) = &iteration_best {
                if *cost < best.cost {
                    best = BestSolution {
                        nodes: nodes.clone(),
                        cost: *cost,
                    };
                }
            }

            let stats = IterationStats {
                iteration,
                best_cost: best.cost,
                iteration_best: iteration_best.map(|(_, cost)| cost),
                mean_cost: (!valid_costs.is_empty())
                    .then(|| valid_costs.iter().sum::<f64>() / valid_costs.len() as f64),
                valid_agents: valid_costs.len(),
                invalid_agents: colony.invalid_count(),
            };

            if stats.valid_agents == 0 {
                warn!(iteration, "no ant finished with a valid solution");
            }
            debug!(
                iteration,
                best = stats.best_cost,
                iteration_best = ?stats.iteration_best,
                mean = ?stats.mean_cost,
                invalid = stats.invalid_agents,
                "iteration finished"
            );

            daemon::end_of_iteration(problem, &mut pheromone, colony.ants(), config.evaporation_ratio);

            observer(&stats);
            history.push(stats);
        }

        if best.is_found() {
            info!(cost = best.cost, nodes = best.nodes.len(), "solve finished");
        } else {
            warn!("solve finished without a valid solution");
        }

        Ok(SolveReport {
            problem: problem.name().to_string(),
            best,
            iterations: history,
            initial_pheromone,
            pheromone,
        })
    }
}
