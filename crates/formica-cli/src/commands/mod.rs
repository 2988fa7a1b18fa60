//! CLI command implementations.

pub mod init;
pub mod route;
pub mod place;
pub mod inspect;

use anyhow::{Context, Result};
use colored::Colorize;
use formica::prelude::*;
use indicatif::{ProgressBar, ProgressStyle};

use crate::config::OutputConfig;
use crate::SolveArgs;

/// Load a scenario file with a readable error.
pub fn load_scenario(path: &str) -> Result<Scenario> {
    Scenario::load(path).with_context(|| format!("Failed to load scenario: {}", path))
}

/// Apply command-line overrides on top of the file configuration.
pub fn apply_overrides(mut config: AcoConfig, args: &SolveArgs) -> AcoConfig {
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }
    if let Some(ants) = args.ants {
        config = config.with_agents(ants);
    }
    if let Some(iterations) = args.iterations {
        config = config.with_iterations(iterations);
    }
    if args.parallel {
        config = config.with_parallel(true);
    }
    config
}

/// Run the solver, driving a progress bar unless output is JSON or
/// progress is switched off.
pub fn solve_with_progress<P: Problem>(
    solver: &Solver,
    problem: &P,
    output: &OutputConfig,
    json: bool,
) -> Result<SolveReport> {
    let mut rng = solver.master_rng();

    if json || !output.progress {
        return Ok(solver.solve_with_rng(problem, &mut rng)?);
    }

    let pb = ProgressBar::new(solver.config().iteration_count as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} iterations {msg}")?
            .progress_chars("#>-"),
    );
    let report = solver.solve_observed(problem, &mut rng, |stats| {
        if stats.best_cost < f64::MAX {
            pb.set_message(format!("best {:.3}", stats.best_cost));
        }
        pb.inc(1);
    });
    pb.finish_and_clear();
    Ok(report?)
}

/// Per-iteration history lines.
pub fn print_history(report: &SolveReport) {
    println!();
    println!("{}", "Iterations:".bold());
    for s in &report.iterations {
        let best = if s.best_cost < f64::MAX {
            format!("{:.3}", s.best_cost)
        } else {
            "-".to_string()
        };
        let mean = s.mean_cost.map_or_else(|| "-".to_string(), |m| format!("{:.3}", m));
        println!(
            "  {:>4}  best {:>10}  mean {:>10}  valid {:>3}  invalid {:>3}",
            s.iteration + 1,
            best,
            mean,
            s.valid_agents,
            s.invalid_agents.to_string().yellow()
        );
    }
}

/// Render a node path as `node-0 → node-1 → ...`.
pub fn format_path(directory: &dyn NodeDirectory, nodes: &[NodeId]) -> String {
    nodes
        .iter()
        .map(|id| match directory.node(*id) {
            Some(n) if !n.name.is_empty() => format!("{} ({})", n.name, id.index()),
            _ => id.to_string(),
        })
        .collect::<Vec<_>>()
        .join(" → ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::{Cli, Commands};
    use clap::Parser;

    fn file_config() -> AcoConfig {
        let c: Config = toml::from_str(
            "[routing]\nants = 7\niterations = 40\nevaporation_ratio = 0.2\nparallel = true\n",
        )
        .unwrap();
        c.routing.to_aco()
    }

    fn route_args(argv: &[&str]) -> SolveArgs {
        let mut full = vec!["formica", "route", "scenario.json"];
        full.extend_from_slice(argv);
        match Cli::try_parse_from(full).unwrap().command {
            Commands::Route { solve, .. } => solve,
            _ => unreachable!(),
        }
    }

    #[test]
    fn no_flags_keep_file_values() {
        let merged = apply_overrides(file_config(), &route_args(&[]));
        assert_eq!(merged, file_config());
        assert_eq!(merged.agent_count, 7);
        assert_eq!(merged.seed, None);
    }

    #[test]
    fn flags_override_file_values() {
        let merged = apply_overrides(
            file_config(),
            &route_args(&["--seed", "9", "--ants", "3", "--iterations", "5"]),
        );
        assert_eq!(merged.seed, Some(9));
        assert_eq!(merged.agent_count, 3);
        assert_eq!(merged.iteration_count, 5);
        // Untouched settings still come from the file.
        assert!((merged.evaporation_ratio - 0.2).abs() < 1e-12);
        assert!(merged.parallel);
    }

    #[test]
    fn parallel_flag_only_switches_on() {
        let serial = AcoConfig::placement();
        assert!(apply_overrides(serial.clone(), &route_args(&["--parallel"])).parallel);
        assert!(!apply_overrides(serial, &route_args(&[])).parallel);
    }
}
