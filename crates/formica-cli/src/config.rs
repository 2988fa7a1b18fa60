//! Configuration management for the Formica CLI.

use anyhow::{Context, Result};
use formica::runtime::config::AcoConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "formica.toml";

/// Formica project configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub routing: RoutingConfig,
    #[serde(default)]
    pub placement: PlacementConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutingConfig {
    #[serde(default = "default_routing_ants")]
    pub ants: usize,
    #[serde(default = "default_routing_iterations")]
    pub iterations: usize,
    #[serde(default = "default_evaporation")]
    pub evaporation_ratio: f64,
    #[serde(default = "default_routing_alpha")]
    pub heuristic_exponent: f64,
    #[serde(default = "default_routing_beta")]
    pub pheromone_exponent: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_pheromone: Option<f64>,
    #[serde(default)]
    pub parallel: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacementConfig {
    #[serde(default = "default_placement_ants")]
    pub ants: usize,
    #[serde(default = "default_placement_iterations")]
    pub iterations: usize,
    #[serde(default = "default_evaporation")]
    pub evaporation_ratio: f64,
    #[serde(default = "default_placement_exponent")]
    pub heuristic_exponent: f64,
    #[serde(default = "default_placement_exponent")]
    pub pheromone_exponent: f64,
    #[serde(default = "default_exploit_threshold")]
    pub exploit_threshold: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_pheromone: Option<f64>,
    #[serde(default)]
    pub parallel: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Show a progress bar over iterations.
    #[serde(default = "default_true")]
    pub progress: bool,
    /// Print one line per iteration after the summary.
    #[serde(default)]
    pub history: bool,
}

// Default value functions
fn default_routing_ants() -> usize { AcoConfig::routing().agent_count }
fn default_routing_iterations() -> usize { AcoConfig::routing().iteration_count }
fn default_routing_alpha() -> f64 { AcoConfig::routing().heuristic_exponent }
fn default_routing_beta() -> f64 { AcoConfig::routing().pheromone_exponent }
fn default_placement_ants() -> usize { AcoConfig::placement().agent_count }
fn default_placement_iterations() -> usize { AcoConfig::placement().iteration_count }
fn default_placement_exponent() -> f64 { AcoConfig::placement().heuristic_exponent }
fn default_exploit_threshold() -> f64 { AcoConfig::placement().exploit_threshold }
fn default_evaporation() -> f64 { AcoConfig::placement().evaporation_ratio }
fn default_true() -> bool { true }

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            ants: default_routing_ants(),
            iterations: default_routing_iterations(),
            evaporation_ratio: default_evaporation(),
            heuristic_exponent: default_routing_alpha(),
            pheromone_exponent: default_routing_beta(),
            initial_pheromone: None,
            parallel: false,
        }
    }
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            ants: default_placement_ants(),
            iterations: default_placement_iterations(),
            evaporation_ratio: default_evaporation(),
            heuristic_exponent: default_placement_exponent(),
            pheromone_exponent: default_placement_exponent(),
            exploit_threshold: default_exploit_threshold(),
            initial_pheromone: None,
            parallel: false,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            progress: default_true(),
            history: false,
        }
    }
}

impl RoutingConfig {
    pub fn to_aco(&self) -> AcoConfig {
        let mut config = AcoConfig::routing()
            .with_agents(self.ants)
            .with_iterations(self.iterations)
            .with_evaporation(self.evaporation_ratio)
            .with_exponents(self.heuristic_exponent, self.pheromone_exponent)
            .with_parallel(self.parallel);
        config.initial_pheromone = self.initial_pheromone;
        config
    }
}

impl PlacementConfig {
    pub fn to_aco(&self) -> AcoConfig {
        let mut config = AcoConfig::placement()
            .with_agents(self.ants)
            .with_iterations(self.iterations)
            .with_evaporation(self.evaporation_ratio)
            .with_exponents(self.heuristic_exponent, self.pheromone_exponent)
            .with_exploit_threshold(self.exploit_threshold)
            .with_parallel(self.parallel);
        config.initial_pheromone = self.initial_pheromone;
        config
    }
}

impl Config {
    /// Load formica.toml from the current or a parent directory, then the
    /// user config directory; defaults when neither exists.
    pub fn load() -> Result<Self> {
        match find_config_file() {
            Some(path) => Self::load_from(&path),
            None => Ok(Config::default()),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse config: {}", path.display()))
    }

    /// Save config to the specified path.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;
        Ok(())
    }
}

fn find_config_file() -> Option<PathBuf> {
    let mut dir = std::env::current_dir().ok()?;
    loop {
        let config_path = dir.join(CONFIG_FILE);
        if config_path.exists() {
            return Some(config_path);
        }
        if !dir.pop() {
            break;
        }
    }
    user_config_path().filter(|p| p.exists())
}

/// `<user config dir>/formica/formica.toml`.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("formica").join(CONFIG_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_presets() {
        let c = Config::default();
        assert_eq!(c.routing.to_aco(), AcoConfig::routing());
        assert_eq!(c.placement.to_aco(), AcoConfig::placement());
    }

    #[test]
    fn partial_sections_keep_their_own_defaults() {
        let c: Config = toml::from_str("[routing]\nants = 7\n").unwrap();
        assert_eq!(c.routing.ants, 7);
        assert_eq!(c.routing.iterations, 100);
        assert_eq!(c.placement.ants, 10);
        assert!(c.output.progress);
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        let mut c = Config::default();
        c.placement.parallel = true;
        c.routing.initial_pheromone = Some(0.3);
        c.save(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), c);
    }
}
