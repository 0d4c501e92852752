//! Run projections for every parameter set in a CSV file
//!
//! Usage: run_batch <parameters.csv> [summary_output.csv] [--strict]

use anyhow::{Context, Result};
use interest_projection::export::write_batch_summary_csv;
use interest_projection::params::load_parameter_batch;
use interest_projection::{ParseMode, ScenarioRunner};
use std::fs::File;
use std::time::Instant;

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let strict = args.iter().any(|a| a == "--strict");
    let positional: Vec<&String> = args.iter().filter(|a| !a.starts_with("--")).collect();

    let input = positional
        .first()
        .context("Usage: run_batch <parameters.csv> [summary_output.csv] [--strict]")?;
    let output = positional
        .get(1)
        .map(|s| s.as_str())
        .unwrap_or("batch_summary.csv");
    let mode = if strict { ParseMode::Strict } else { ParseMode::Lenient };

    let start = Instant::now();
    println!("Loading parameter sets from {}...", input);

    let batch = load_parameter_batch(input.as_str(), mode)
        .with_context(|| format!("Failed to load parameter sets from {}", input))?;
    println!("Loaded {} parameter sets in {:?}", batch.len(), start.elapsed());

    println!("Running projections...");
    let proj_start = Instant::now();
    let runner = ScenarioRunner::new();
    let outcomes = runner.run_batch(&batch);
    println!("Projections complete in {:?}", proj_start.elapsed());

    let failures = outcomes.iter().filter(|o| o.result.is_err()).count();
    for outcome in outcomes.iter().filter(|o| o.result.is_err()) {
        if let Err(e) = &outcome.result {
            log::warn!("{}: {}", outcome.name, e);
        }
    }

    let file = File::create(output).with_context(|| format!("Failed to create {}", output))?;
    write_batch_summary_csv(file, &outcomes)?;
    println!("Output written to {}", output);

    println!("\nBatch Summary:");
    println!("  Succeeded: {}", outcomes.len() - failures);
    println!("  Failed:    {}", failures);
    println!("\nTotal time: {:?}", start.elapsed());

    Ok(())
}
