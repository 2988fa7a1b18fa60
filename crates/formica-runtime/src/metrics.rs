//! Convergence metrics computed from a solve's iteration history.

use crate::solver::IterationStats;
use serde::Serialize;
use std::fmt;

/// How quickly and how cleanly a solve converged.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConvergenceSummary {
    pub iterations: usize,
    /// Best cost at the end of the run, if any ant was ever valid.
    pub final_best: Option<f64>,
    /// First iteration whose global best equals the final best.
    pub converged_at: Option<usize>,
    /// Number of iterations that strictly lowered the global best.
    pub improvements: usize,
    pub total_invalid_agents: usize,
    pub total_valid_agents: usize,
}

impl ConvergenceSummary {
    pub fn from_history(history: &[IterationStats]) -> Self {
        let final_best = history
            .last()
            .map(|s| s.best_cost)
            .filter(|&c| c < f64::MAX);

        let mut improvements = 0;
        let mut previous = f64::MAX;
        for stats in history {
            if stats.best_cost < previous {
                improvements += 1;
                previous = stats.best_cost;
            }
        }

        let converged_at = final_best.and_then(|best| {
            history
                .iter()
                .find(|s| s.best_cost == best)
                .map(|s| s.iteration)
        });

        Self {
            iterations: history.len(),
            final_best,
            converged_at,
            improvements,
            total_invalid_agents: history.iter().map(|s| s.invalid_agents).sum(),
            total_valid_agents: history.iter().map(|s| s.valid_agents).sum(),
        }
    }

    /// Share of all ants that finished invalid.
    pub fn invalid_ratio(&self) -> f64 {
        let total = self.total_invalid_agents + self.total_valid_agents;
        if total == 0 {
            0.0
        } else {
            self.total_invalid_agents as f64 / total as f64
        }
    }
}

impl fmt::Display for ConvergenceSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.final_best, self.converged_at) {
            (Some(best), Some(at)) => write!(
                f,
                "best {:.4} reached at iteration {} of {} ({} improvements, {:.1}% invalid ants)",
                best,
                at + 1,
                self.iterations,
                self.improvements,
                self.invalid_ratio() * 100.0
            ),
            _ => write!(f, "no valid solution in {} iterations", self.iterations),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(iteration: usize, best_cost: f64, invalid: usize) -> IterationStats {
        IterationStats {
            iteration,
            best_cost,
            iteration_best: None,
            mean_cost: None,
            valid_agents: 4 - invalid,
            invalid_agents: invalid,
        }
    }

    #[test]
    fn counts_improvements_and_convergence_point() {
        let history = vec![
            stats(0, f64::MAX, 4),
            stats(1, 20.0, 1),
            stats(2, 15.0, 0),
            stats(3, 15.0, 0),
        ];
        let s = ConvergenceSummary::from_history(&history);
        assert_eq!(s.final_best, Some(15.0));
        assert_eq!(s.converged_at, Some(2));
        assert_eq!(s.improvements, 2);
        assert_eq!(s.total_invalid_agents, 5);
        assert!((s.invalid_ratio() - 5.0 / 16.0).abs() < 1e-12);
    }

    #[test]
    fn nothing_found() {
        let s = ConvergenceSummary::from_history(&[stats(0, f64::MAX, 4)]);
        assert_eq!(s.final_best, None);
        assert_eq!(s.converged_at, None);
        assert_eq!(s.to_string(), "no valid solution in 1 iterations");
    }
}
