//! Interest Projection CLI
//!
//! Command-line interface for running projections and managing saved scenarios

use anyhow::{anyhow, bail, Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use interest_projection::export::write_timeline_csv_file;
use interest_projection::params::load_parameters_json;
use interest_projection::scenario::store::write_atomic;
use interest_projection::scenario::{ScenarioData, ScenarioStore};
use interest_projection::{
    CompoundingRegime, ContributionFrequency, ContributionTiming, EngineConfig, ParseMode, ProjectionEngine,
    SimulationParameters, TermUnit, TimelineResult,
};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "interest_projection", version, about = "Deterministic compound-interest projections")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a projection and print the schedule
    Simulate(SimulateArgs),

    /// Manage saved scenarios
    Scenario {
        /// Scenario store file
        #[arg(long, default_value = "scenarios.json")]
        store: PathBuf,

        #[command(subcommand)]
        action: ScenarioAction,
    },
}

#[derive(Args)]
struct SimulateArgs {
    /// Read parameters from a JSON file instead of flags
    #[arg(long, conflicts_with_all = ["capital", "rate", "term"])]
    params: Option<PathBuf>,

    /// Initial capital
    #[arg(long)]
    capital: Option<Decimal>,

    /// Nominal annual rate in percent
    #[arg(long)]
    rate: Option<Decimal>,

    /// Term length
    #[arg(long)]
    term: Option<u32>,

    /// Term unit: years or months
    #[arg(long, default_value = "years")]
    unit: TermUnit,

    /// annual, semiannual, quarterly, monthly, daily, or continuous
    #[arg(long, default_value = "annual")]
    compounding: String,

    /// Recurring contribution amount
    #[arg(long, default_value = "0")]
    contribution: Decimal,

    /// Contribution frequency: monthly or annual (monthly when a contribution is set)
    #[arg(long)]
    frequency: Option<ContributionFrequency>,

    /// Contribution timing: start or end
    #[arg(long, default_value = "end")]
    timing: ContributionTiming,

    /// Annual inflation rate in percent
    #[arg(long)]
    inflation: Option<Decimal>,

    /// First date of the schedule (YYYY-MM-DD), defaults to today
    #[arg(long)]
    start_date: Option<NaiveDate>,

    /// Reject unknown compounding regimes instead of falling back to annual
    #[arg(long)]
    strict: bool,

    /// Maximum number of schedule steps
    #[arg(long)]
    max_steps: Option<u32>,

    /// Number of schedule rows to print
    #[arg(long, default_value_t = 24)]
    rows: usize,

    /// Write the full schedule to a CSV file
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Print the full result as JSON instead of a table
    #[arg(long)]
    json: bool,

    /// Save parameters and result under this scenario name
    #[arg(long)]
    save: Option<String>,

    /// Replace an existing scenario of the same name
    #[arg(long, requires = "save")]
    overwrite: bool,

    /// Scenario store file used with --save
    #[arg(long, default_value = "scenarios.json")]
    store: PathBuf,
}

#[derive(Subcommand)]
enum ScenarioAction {
    /// List scenarios, most recently modified first
    List,
    /// Show a saved scenario's parameters and summary
    Show { name: String },
    /// Re-run a saved scenario's parameters
    Run { name: String },
    /// Delete a scenario
    Delete { name: String },
    /// Rename a scenario
    Rename { old_name: String, new_name: String },
    /// Write all scenarios to a JSON file
    Export { path: PathBuf },
    /// Merge scenarios from a JSON file
    Import { path: PathBuf },
    /// Remove every scenario
    Clear,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    match cli.command {
        Command::Simulate(args) => run_simulate(args),
        Command::Scenario { store, action } => run_scenario(store, action),
    }
}

fn build_parameters(args: &SimulateArgs) -> Result<SimulationParameters> {
    let mode = if args.strict { ParseMode::Strict } else { ParseMode::Lenient };

    if let Some(path) = &args.params {
        return load_parameters_json(path, mode)
            .with_context(|| format!("Failed to load parameters from {}", path.display()));
    }

    let capital = args.capital.ok_or_else(|| anyhow!("--capital is required"))?;
    let rate = args.rate.ok_or_else(|| anyhow!("--rate is required"))?;
    let term = args.term.ok_or_else(|| anyhow!("--term is required"))?;

    Ok(SimulationParameters {
        capital,
        nominal_annual_rate: rate,
        term_count: term,
        term_unit: args.unit,
        compounding: CompoundingRegime::parse(&args.compounding, mode)?,
        contribution_amount: args.contribution,
        contribution_frequency: args.frequency,
        contribution_timing: args.timing,
        inflation_rate: args.inflation,
        start_date: args.start_date,
    })
}

fn run_simulate(args: SimulateArgs) -> Result<()> {
    let params = build_parameters(&args)?;

    let mut config = EngineConfig::default();
    if let Some(max_steps) = args.max_steps {
        config.max_total_steps = max_steps;
    }

    let engine = ProjectionEngine::new(config);
    let result = engine.simulate(&params)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_result(&result, args.rows);
    }

    if let Some(csv_path) = &args.csv {
        write_timeline_csv_file(csv_path, &result)
            .with_context(|| format!("Unable to write CSV file {}", csv_path.display()))?;
        println!("\nFull schedule written to: {}", csv_path.display());
    }

    if let Some(name) = &args.save {
        let mut store = ScenarioStore::open(&args.store)?;
        store.save(
            name,
            ScenarioData {
                parameters: params,
                result: Some(result),
            },
            args.overwrite,
        )?;
        store.persist()?;
        println!("Saved scenario '{}' to {}", name, args.store.display());
    }

    Ok(())
}

fn print_result(result: &TimelineResult, rows: usize) {
    println!(
        "Projection ({} {} steps, step rate {:.8}%):",
        result.total_steps,
        result.granularity,
        result.effective_step_rate * Decimal::ONE_HUNDRED
    );
    println!(
        "{:>6} {:>10} {:>16} {:>14} {:>12} {:>16} {:>16}",
        "Period", "Date", "Opening", "Interest", "Contrib", "Closing", "Real"
    );
    println!("{}", "-".repeat(96));

    for row in result.timeline.iter().take(rows) {
        println!(
            "{:>6} {:>10} {:>16.2} {:>14.2} {:>12.2} {:>16.2} {:>16.2}",
            row.period,
            row.date,
            row.opening_balance,
            row.interest,
            row.contribution,
            row.closing_balance,
            row.real_value,
        );
    }

    if result.timeline.len() > rows {
        println!("... ({} more periods)", result.timeline.len() - rows);
    }

    print_summary(result);
}

fn print_summary(result: &TimelineResult) {
    println!("\nSummary:");
    println!("  Total Steps: {}", result.total_steps);
    println!("  Final Balance: {:.2}", result.final_balance);
    println!("  Final Real Balance: {:.2}", result.final_real_balance);
    println!("  Total Interest: {:.2}", result.total_interest);
    println!("  Total Contributions: {:.2}", result.total_contributions);
    match result.real_rate_of_return {
        Some(rate) => println!("  Real Rate of Return: {:.2}%", rate * Decimal::ONE_HUNDRED),
        None => println!("  Real Rate of Return: -"),
    }
}

fn run_scenario(store_path: PathBuf, action: ScenarioAction) -> Result<()> {
    let mut store = ScenarioStore::open(&store_path)
        .with_context(|| format!("Failed to open scenario store {}", store_path.display()))?;

    match action {
        ScenarioAction::List => {
            if store.is_empty() {
                println!("No saved scenarios");
            }
            for (name, record) in store.list() {
                let params = &record.data.parameters;
                println!(
                    "{:<24} modified {}  capital {:.2} @ {}% for {} {:?}",
                    name,
                    record.modified_at.format("%Y-%m-%d %H:%M:%S"),
                    params.capital,
                    params.nominal_annual_rate,
                    params.term_count,
                    params.term_unit,
                );
            }
            return Ok(());
        }
        ScenarioAction::Show { name } => {
            let record = store.load(&name).ok_or_else(|| anyhow!("Scenario '{}' not found", name))?;
            println!("{}", serde_json::to_string_pretty(&record.data.parameters)?);
            if let Some(result) = &record.data.result {
                print_summary(result);
            }
            return Ok(());
        }
        ScenarioAction::Run { name } => {
            let record = store.load(&name).ok_or_else(|| anyhow!("Scenario '{}' not found", name))?;
            let result = ProjectionEngine::default().simulate(&record.data.parameters)?;
            print_result(&result, 24);
            return Ok(());
        }
        ScenarioAction::Delete { name } => {
            if !store.delete(&name) {
                bail!("Scenario '{}' not found", name);
            }
        }
        ScenarioAction::Rename { old_name, new_name } => store.rename(&old_name, &new_name)?,
        ScenarioAction::Export { path } => {
            let json = serde_json::to_string_pretty(&store.export_all())?;
            write_atomic(&path, json.as_bytes())
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("Exported {} scenarios to {}", store.len(), path.display());
            return Ok(());
        }
        ScenarioAction::Import { path } => {
            let reader = BufReader::new(File::open(&path)?);
            let records: BTreeMap<_, _> = serde_json::from_reader(reader)
                .with_context(|| format!("Invalid scenario export {}", path.display()))?;
            let names = store.import(records);
            println!("Imported {} scenarios", names.len());
        }
        ScenarioAction::Clear => store.clear(),
    }

    store.persist()?;
    Ok(())
}
