//! Solver configuration.
//!
//! Immutable per-solve parameters. Use [`AcoConfig::routing`] or
//! [`AcoConfig::placement`] for the presets each variant was tuned with,
//! then adjust with the builder methods.

use formica_core::error::{FormicaError, Result};
use formica_core::selection::{SelectionParams, DEFAULT_EXPLOIT_THRESHOLD};
use serde::{Deserialize, Serialize};

/// Configuration for a single solve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcoConfig {
    /// Ants sent out per iteration (default: 10).
    #[serde(default = "default_agent_count")]
    pub agent_count: usize,
    /// Number of iterations; the only stopping criterion (default: 30).
    #[serde(default = "default_iteration_count")]
    pub iteration_count: usize,
    /// Fraction of every trail removed per iteration, in [0, 1) (default: 0.4).
    #[serde(default = "default_evaporation_ratio")]
    pub evaporation_ratio: f64,
    /// α — exponent applied to the heuristic value (default: 2.0).
    #[serde(default = "default_heuristic_exponent")]
    pub heuristic_exponent: f64,
    /// β — exponent applied to the pheromone value (default: 2.0).
    #[serde(default = "default_pheromone_exponent")]
    pub pheromone_exponent: f64,
    /// Initial trail value. Estimated from sampled latencies when absent.
    #[serde(default)]
    pub initial_pheromone: Option<f64>,
    /// Draws above this exploit the best candidate (default: 0.8).
    #[serde(default = "default_exploit_threshold")]
    pub exploit_threshold: f64,
    /// Seed of the master generator. A random seed is drawn when absent.
    #[serde(default)]
    pub seed: Option<u64>,
    /// Build the ants of an iteration on the rayon thread pool.
    #[serde(default)]
    pub parallel: bool,
}

fn default_agent_count() -> usize { 10 }
fn default_iteration_count() -> usize { 30 }
fn default_evaporation_ratio() -> f64 { 1.0 - 0.6 }
fn default_heuristic_exponent() -> f64 { 2.0 }
fn default_pheromone_exponent() -> f64 { 2.0 }
fn default_exploit_threshold() -> f64 { DEFAULT_EXPLOIT_THRESHOLD }

impl Default for AcoConfig {
    fn default() -> Self {
        Self::placement()
    }
}

impl AcoConfig {
    /// Preset for the routing variant: 100 ants, 100 iterations, α 2.5, β 1.0.
    pub fn routing() -> Self {
        Self {
            agent_count: 100,
            iteration_count: 100,
            evaporation_ratio: default_evaporation_ratio(),
            heuristic_exponent: 2.5,
            pheromone_exponent: 1.0,
            initial_pheromone: None,
            exploit_threshold: default_exploit_threshold(),
            seed: None,
            parallel: false,
        }
    }

    /// Preset for the placement variant: 10 ants, 30 iterations, α 2.0, β 2.0.
    pub fn placement() -> Self {
        Self {
            agent_count: default_agent_count(),
            iteration_count: default_iteration_count(),
            evaporation_ratio: default_evaporation_ratio(),
            heuristic_exponent: default_heuristic_exponent(),
            pheromone_exponent: default_pheromone_exponent(),
            initial_pheromone: None,
            exploit_threshold: default_exploit_threshold(),
            seed: None,
            parallel: false,
        }
    }

    pub fn with_agents(mut self, agent_count: usize) -> Self {
        self.agent_count = agent_count;
        self
    }

    pub fn with_iterations(mut self, iteration_count: usize) -> Self {
        self.iteration_count = iteration_count;
        self
    }

    pub fn with_evaporation(mut self, ratio: f64) -> Self {
        self.evaporation_ratio = ratio;
        self
    }

    pub fn with_exponents(mut self, heuristic: f64, pheromone: f64) -> Self {
        self.heuristic_exponent = heuristic;
        self.pheromone_exponent = pheromone;
        self
    }

    pub fn with_initial_pheromone(mut self, value: f64) -> Self {
        self.initial_pheromone = Some(value);
        self
    }

    pub fn with_exploit_threshold(mut self, threshold: f64) -> Self {
        self.exploit_threshold = threshold;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Parameters handed to the selection policy.
    pub fn selection_params(&self) -> SelectionParams {
        SelectionParams {
            heuristic_exponent: self.heuristic_exponent,
            pheromone_exponent: self.pheromone_exponent,
            exploit_threshold: self.exploit_threshold,
        }
    }

    /// Check every value is in range.
    pub fn validate(&self) -> Result<()> {
        if self.agent_count == 0 {
            return Err(FormicaError::configuration("the ant colony is empty (agent_count = 0)"));
        }
        if self.iteration_count == 0 {
            return Err(FormicaError::configuration("iteration_count must be at least 1"));
        }
        if !(0.0..1.0).contains(&self.evaporation_ratio) {
            return Err(FormicaError::out_of_range(
                "evaporation_ratio",
                self.evaporation_ratio,
                "in [0, 1)",
            ));
        }
        for (field, value) in [
            ("heuristic_exponent", self.heuristic_exponent),
            ("pheromone_exponent", self.pheromone_exponent),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(FormicaError::out_of_range(field, value, "finite and >= 0"));
            }
        }
        if let Some(seed) = self.initial_pheromone {
            if !seed.is_finite() || seed < 0.0 {
                return Err(FormicaError::out_of_range("initial_pheromone", seed, "finite and >= 0"));
            }
        }
        if !(0.0..=1.0).contains(&self.exploit_threshold) {
            return Err(FormicaError::out_of_range(
                "exploit_threshold",
                self.exploit_threshold,
                "in [0, 1]",
            ));
        }
        Ok(())
    }
}
