//! Solve the routing variant of a scenario.

use anyhow::{bail, Result};
use colored::Colorize;
use formica::prelude::*;
use serde::Serialize;

use super::{apply_overrides, format_path, load_scenario, print_history, solve_with_progress};
use crate::config::Config;
use crate::SolveArgs;

#[derive(Serialize)]
struct RouteOutput<'a> {
    problem: &'a str,
    start: NodeId,
    end: NodeId,
    best: &'a BestSolution,
    initial_pheromone: Option<f64>,
    convergence: ConvergenceSummary,
}

pub fn run(scenario_path: &str, args: &SolveArgs, verbose: bool) -> Result<()> {
    let config = Config::load()?;
    let scenario = load_scenario(scenario_path)?;
    if !scenario.supports_routing() {
        bail!("{} has no {} section", scenario_path, "routing".cyan());
    }
    let env = scenario.routing_environment()?;
    let solver = Solver::new(apply_overrides(config.routing.to_aco(), args))?;

    if !args.json {
        let request = env.request();
        println!(
            "{} Routing {} → {} ({} ants × {} iterations)...",
            "→".blue(),
            request.start.to_string().cyan(),
            request.end.to_string().cyan(),
            solver.config().agent_count,
            solver.config().iteration_count
        );
    }

    let report = solve_with_progress(&solver, &env, &config.output, args.json)?;
    let summary = report.summary();

    if args.json {
        let output = RouteOutput {
            problem: &report.problem,
            start: env.request().start,
            end: env.request().end,
            best: &report.best,
            initial_pheromone: report.initial_pheromone,
            convergence: summary,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!();
    if report.best.is_found() {
        println!("{} Route found", "✓".green().bold());
        println!("  Path: {}", format_path(env.directory(), &report.best.nodes));
        println!("  Cost: {}", format!("{:.3}", report.best.cost).green());
    } else {
        println!("{} No valid route found", "✗".red().bold());
    }
    println!("  {}", summary);
    if let Some(seed) = report.initial_pheromone {
        println!("  Initial pheromone: {:.6}", seed);
    }

    if verbose || config.output.history {
        print_history(&report);
    }

    Ok(())
}
