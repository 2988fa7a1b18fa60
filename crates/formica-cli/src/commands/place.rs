//! Solve the placement variant of a scenario.

use anyhow::{bail, Result};
use colored::Colorize;
use formica::prelude::*;
use serde::Serialize;

use super::{apply_overrides, format_path, load_scenario, print_history, solve_with_progress};
use crate::config::Config;
use crate::SolveArgs;

#[derive(Serialize)]
struct PlaceOutput<'a> {
    problem: &'a str,
    initiating_node: NodeId,
    best: &'a BestSolution,
    placement: Option<PlacementOutcome>,
    convergence: ConvergenceSummary,
}

pub fn run(scenario_path: &str, args: &SolveArgs, verbose: bool) -> Result<()> {
    let config = Config::load()?;
    let scenario = load_scenario(scenario_path)?;
    if !scenario.supports_placement() {
        bail!("{} has no {} section", scenario_path, "placement".cyan());
    }
    let env = scenario.placement_environment()?;
    let solver = Solver::new(apply_overrides(config.placement.to_aco(), args))?;

    if !args.json {
        println!(
            "{} Placing {} modules from {} ({} ants × {} iterations)...",
            "→".blue(),
            (env.modules().len() - 1).to_string().cyan(),
            env.initiating_node().to_string().cyan(),
            solver.config().agent_count,
            solver.config().iteration_count
        );
    }

    let report = solve_with_progress(&solver, &env, &config.output, args.json)?;
    let summary = report.summary();
    let outcome = report.best.is_found().then(|| env.outcome(&report.best.nodes));

    if args.json {
        let output = PlaceOutput {
            problem: &report.problem,
            initiating_node: env.initiating_node(),
            best: &report.best,
            placement: outcome,
            convergence: summary,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!();
    match outcome {
        Some(outcome) => {
            println!("{} Placement found", "✓".green().bold());
            println!("  Chain: {}", format_path(env.directory(), &report.best.nodes));
            for (module, node) in &outcome.placements {
                println!("    {} → {}", module.cyan(), node);
            }
            println!("  Cost: {}", format!("{:.3}", report.best.cost).green());
        }
        None => println!("{} No valid placement found", "✗".red().bold()),
    }
    println!("  {}", summary);

    if verbose || config.output.history {
        print_history(&report);
    }

    Ok(())
}
