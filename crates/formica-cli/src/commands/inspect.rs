//! Summarise a scenario file.

use anyhow::Result;
use colored::Colorize;
use formica::prelude::*;

use super::load_scenario;

pub fn run(scenario_path: &str) -> Result<()> {
    let scenario = load_scenario(scenario_path)?;
    let directory = scenario.directory()?;

    println!("{} {}", "Scenario".bold(), scenario_path.cyan());
    println!("  Nodes:        {}", directory.node_count());
    println!("  Links:        {} directed", directory.link_count());
    println!("  Track:        {} samples", scenario.track.len());
    if let Some(max) = directory.max_node_id() {
        println!("  Trail matrix: {0}×{0}", max.index() + 1);
    }

    let isolated = directory.isolated_nodes();
    if !isolated.is_empty() {
        let ids: Vec<String> = isolated.iter().map(|id| id.to_string()).collect();
        println!("  {} isolated: {}", "!".yellow(), ids.join(", "));
    }

    println!();
    println!("{}", "Nodes:".bold());
    for node in directory.nodes() {
        let position = node
            .position
            .map_or_else(|| "-".to_string(), |p| format!("{:.4}, {:.4}", p.latitude, p.longitude));
        println!(
            "  {:>4}  {:<12} cap {:>8.1}  power {:>6.2}  bw {:>10.1}  at {}",
            node.id.index(),
            node.name,
            node.capacity,
            node.power,
            node.bandwidth,
            position
        );
    }

    println!();
    println!("{}", "Variants:".bold());
    match scenario.routing_environment() {
        Ok(env) => {
            let r = env.request();
            println!(
                "  {} routing {} → {} in at least {} hops ({:?})",
                "✓".green(),
                r.start,
                r.end,
                r.hops,
                r.heuristic
            );
        }
        Err(e) if scenario.supports_routing() => println!("  {} routing: {}", "✗".red(), e),
        Err(_) => println!("  {} routing: no section", "•".yellow()),
    }
    match scenario.placement_environment() {
        Ok(env) => {
            let names: Vec<&str> = env.modules().iter().map(|m| m.name.as_str()).collect();
            println!(
                "  {} placement of [{}] starting at {}",
                "✓".green(),
                names.join(", "),
                env.initiating_node()
            );
        }
        Err(e) if scenario.supports_placement() => println!("  {} placement: {}", "✗".red(), e),
        Err(_) => println!("  {} placement: no section", "•".yellow()),
    }

    Ok(())
}
