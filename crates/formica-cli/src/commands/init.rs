//! Initialize a Formica project directory.

use anyhow::{Context, Result};
use colored::Colorize;
use formica::prelude::*;
use std::path::PathBuf;

use crate::config::{Config, CONFIG_FILE};

pub fn run(path: Option<String>, example: bool) -> Result<()> {
    let base_path = match path {
        Some(p) => PathBuf::from(p),
        None => std::env::current_dir().context("Failed to read current directory")?,
    };

    println!("{} Initializing Formica project...", "→".blue());

    std::fs::create_dir_all(&base_path)
        .with_context(|| format!("Failed to create {}", base_path.display()))?;

    let config_path = base_path.join(CONFIG_FILE);
    if !config_path.exists() {
        Config::default().save(&config_path)?;
        println!("  {} Created {}", "✓".green(), config_path.display());
    } else {
        println!("  {} {} already exists", "•".yellow(), config_path.display());
    }

    if example {
        let scenario_path = base_path.join("scenario.json");
        if !scenario_path.exists() {
            Scenario::example()
                .save(&scenario_path)
                .with_context(|| format!("Failed to write {}", scenario_path.display()))?;
            println!("  {} Created {}", "✓".green(), scenario_path.display());
        } else {
            println!("  {} {} already exists", "•".yellow(), scenario_path.display());
        }
    }

    println!();
    println!("{} Formica project initialized!", "✓".green().bold());
    println!();
    println!("Next steps:");
    println!("  {} formica inspect scenario.json", "1.".blue());
    println!("  {} formica route scenario.json --seed 42", "2.".blue());
    println!("  {} formica place scenario.json --seed 42", "3.".blue());

    Ok(())
}
