//! CSV export of projection output
//!
//! The only place amounts are rounded: two decimals, midpoint away from zero.

use crate::projection::{StepRecord, TimelineResult};
use crate::scenario::BatchOutcome;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use std::io::Write;
use std::path::Path;

fn money(value: Decimal) -> String {
    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.2}", rounded)
}

fn percent(fraction: Decimal) -> String {
    money(fraction * Decimal::ONE_HUNDRED)
}

/// One exported schedule row
#[derive(Debug, Serialize)]
struct TimelineCsvRow {
    period: u32,
    date: String,
    opening: String,
    interest: String,
    contribution: String,
    closing: String,
    cumulative_interest: String,
    real_value: String,
}

impl From<&StepRecord> for TimelineCsvRow {
    fn from(record: &StepRecord) -> Self {
        Self {
            period: record.period,
            date: record.date.format("%Y-%m-%d").to_string(),
            opening: money(record.opening_balance),
            interest: money(record.interest),
            contribution: money(record.contribution),
            closing: money(record.closing_balance),
            cumulative_interest: money(record.cumulative_interest),
            real_value: money(record.real_value),
        }
    }
}

/// Write the schedule of `result` as CSV
pub fn write_timeline_csv<W: Write>(writer: W, result: &TimelineResult) -> Result<(), csv::Error> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for record in &result.timeline {
        csv_writer.serialize(TimelineCsvRow::from(record))?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Write the schedule of `result` to a CSV file
pub fn write_timeline_csv_file<P: AsRef<Path>>(path: P, result: &TimelineResult) -> Result<(), csv::Error> {
    let file = std::fs::File::create(path)?;
    write_timeline_csv(file, result)
}

/// One summary row per batch entry
#[derive(Debug, Serialize)]
struct SummaryCsvRow {
    name: String,
    total_steps: Option<u32>,
    final_balance: Option<String>,
    final_real_balance: Option<String>,
    total_interest: Option<String>,
    total_contributions: Option<String>,
    real_rate_pct: Option<String>,
    error: Option<String>,
}

impl From<&BatchOutcome> for SummaryCsvRow {
    fn from(outcome: &BatchOutcome) -> Self {
        match &outcome.result {
            Ok(result) => Self {
                name: outcome.name.clone(),
                total_steps: Some(result.total_steps),
                final_balance: Some(money(result.final_balance)),
                final_real_balance: Some(money(result.final_real_balance)),
                total_interest: Some(money(result.total_interest)),
                total_contributions: Some(money(result.total_contributions)),
                real_rate_pct: result.real_rate_of_return.map(percent),
                error: None,
            },
            Err(e) => Self {
                name: outcome.name.clone(),
                total_steps: None,
                final_balance: None,
                final_real_balance: None,
                total_interest: None,
                total_contributions: None,
                real_rate_pct: None,
                error: Some(e.to_string()),
            },
        }
    }
}

/// Write one summary line per batch outcome
pub fn write_batch_summary_csv<W: Write>(writer: W, outcomes: &[BatchOutcome]) -> Result<(), csv::Error> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for outcome in outcomes {
        csv_writer.serialize(SummaryCsvRow::from(outcome))?;
    }
    csv_writer.flush()?;
    Ok(())
}
