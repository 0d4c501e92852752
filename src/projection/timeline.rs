//! Schedule output records and summary aggregation

use super::schedule::StepGranularity;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// A single row of the schedule
///
/// `closing_balance = opening_balance + interest + contribution`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepRecord {
    pub period: u32,
    pub date: NaiveDate,
    pub opening_balance: Decimal,
    pub interest: Decimal,
    pub contribution: Decimal,
    pub closing_balance: Decimal,
    pub cumulative_interest: Decimal,
    /// Closing balance deflated by cumulative inflation
    pub real_value: Decimal,
}

impl StepRecord {
    /// Period-0 record: the starting capital before any step runs
    pub fn initial(capital: Decimal, date: NaiveDate) -> Self {
        Self {
            period: 0,
            date,
            opening_balance: capital,
            interest: Decimal::ZERO,
            contribution: Decimal::ZERO,
            closing_balance: capital,
            cumulative_interest: Decimal::ZERO,
            real_value: capital,
        }
    }
}

/// Complete projection result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineResult {
    /// One record per period, index 0 being the initial state
    pub timeline: Vec<StepRecord>,

    /// Step unit the schedule ran in
    pub granularity: StepGranularity,

    /// Rate applied once per step
    pub effective_step_rate: Decimal,

    pub final_balance: Decimal,
    pub final_real_balance: Decimal,
    pub total_interest: Decimal,
    pub total_contributions: Decimal,

    /// Annual real rate as a fraction (0.0476 for 4.76%), `None` without inflation
    pub real_rate_of_return: Option<Decimal>,

    pub total_steps: u32,
}

impl TimelineResult {
    /// Reduce a finished schedule into its summary figures
    ///
    /// Periods are sequential from 0, so the last period is the step count.
    pub fn aggregate(
        timeline: Vec<StepRecord>,
        granularity: StepGranularity,
        effective_step_rate: Decimal,
        real_rate_of_return: Option<Decimal>,
    ) -> Self {
        let total_steps = timeline.last().map_or(0, |r| r.period);
        let total_contributions: Decimal = timeline.iter().map(|r| r.contribution).sum();

        let (final_balance, final_real_balance, total_interest) = match timeline.last() {
            Some(last) if last.period > 0 => (last.closing_balance, last.real_value, last.cumulative_interest),
            Some(initial) => (initial.opening_balance, initial.real_value, Decimal::ZERO),
            None => (Decimal::ZERO, Decimal::ZERO, Decimal::ZERO),
        };

        Self {
            timeline,
            granularity,
            effective_step_rate,
            final_balance,
            final_real_balance,
            total_interest,
            total_contributions,
            real_rate_of_return,
            total_steps,
        }
    }

    /// Final schedule record
    pub fn last_record(&self) -> Option<&StepRecord> {
        self.timeline.last()
    }
}

/// Inflation-adjusted annual rate: `(1 + r) / (1 + i) - 1`
///
/// Rates are percentages; the result is a fraction. `None` when no inflation
/// rate is given.
pub fn real_rate_of_return(nominal_annual_rate: Decimal, inflation_rate: Option<Decimal>) -> Option<Decimal> {
    let inflation = inflation_rate?;
    let nominal_growth = Decimal::ONE + nominal_annual_rate / dec!(100);
    let inflation_growth = Decimal::ONE + inflation / dec!(100);
    nominal_growth
        .checked_div(inflation_growth)
        .map(|ratio| ratio - Decimal::ONE)
}
