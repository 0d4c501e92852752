//! Period-by-period accumulation schedule

use super::rates::effective_step_rate;
use super::state::ScheduleState;
use super::timeline::StepRecord;
use crate::error::{SimulationError, SimulationResult};
use crate::params::{
    bounded_total_steps, CompoundingRegime, ContributionFrequency, ContributionTiming, SimulationParameters, TermUnit,
};
use chrono::{Months, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unit of one schedule step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepGranularity {
    Monthly,
    Annual,
}

impl StepGranularity {
    /// Finest requested granularity wins: monthly if the term is in months,
    /// compounding is monthly, or the contribution frequency is monthly
    pub fn resolve(params: &SimulationParameters) -> Self {
        let monthly = params.term_unit == TermUnit::Months
            || params.compounding == CompoundingRegime::Monthly
            || params.contribution_frequency() == Some(ContributionFrequency::Monthly);

        if monthly {
            StepGranularity::Monthly
        } else {
            StepGranularity::Annual
        }
    }

    pub fn steps_per_year(&self) -> u32 {
        match self {
            StepGranularity::Monthly => 12,
            StepGranularity::Annual => 1,
        }
    }

    pub fn months_per_step(&self) -> u32 {
        match self {
            StepGranularity::Monthly => 1,
            StepGranularity::Annual => 12,
        }
    }

    /// Number of steps covering the term, `None` on overflow
    pub fn total_steps(&self, term_count: u32, term_unit: TermUnit) -> Option<u32> {
        match (term_unit, self) {
            (TermUnit::Years, StepGranularity::Monthly) => term_count.checked_mul(12),
            _ => Some(term_count),
        }
    }
}

impl fmt::Display for StepGranularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepGranularity::Monthly => f.write_str("monthly"),
            StepGranularity::Annual => f.write_str("annual"),
        }
    }
}

/// Builds the step sequence for one validated parameter set
pub struct ScheduleBuilder<'a> {
    params: &'a SimulationParameters,
    granularity: StepGranularity,
    step_rate: Decimal,
    inflation_step_rate: Option<Decimal>,
    total_steps: u32,
    start_date: NaiveDate,
}

impl<'a> ScheduleBuilder<'a> {
    /// Resolve granularity, step count, and per-step rates
    ///
    /// Terms above `max_total_steps` steps are rejected before anything is
    /// allocated.
    pub fn new(
        params: &'a SimulationParameters,
        start_date: NaiveDate,
        max_total_steps: u32,
    ) -> SimulationResult<Self> {
        let granularity = StepGranularity::resolve(params);
        let steps_per_year = granularity.steps_per_year();
        let total_steps = bounded_total_steps(params, granularity, max_total_steps)?;

        let step_rate = effective_step_rate(params.nominal_annual_rate, params.compounding, steps_per_year)?;

        // Inflation is quoted as a simple annual rate
        let inflation_step_rate = params
            .inflation_rate
            .map(|inflation| effective_step_rate(inflation, CompoundingRegime::Annual, steps_per_year))
            .transpose()?;

        Ok(Self {
            params,
            granularity,
            step_rate,
            inflation_step_rate,
            total_steps,
            start_date,
        })
    }

    pub fn granularity(&self) -> StepGranularity {
        self.granularity
    }

    pub fn step_rate(&self) -> Decimal {
        self.step_rate
    }

    pub fn total_steps(&self) -> u32 {
        self.total_steps
    }

    /// Run every step, returning `total_steps + 1` records
    pub fn build(&self) -> SimulationResult<Vec<StepRecord>> {
        let mut state = ScheduleState::from_capital(self.params.capital);
        let mut records = Vec::with_capacity(self.total_steps as usize + 1);
        records.push(StepRecord::initial(self.params.capital, self.start_date));

        for _step in 1..=self.total_steps {
            state.advance();
            let record = self.calculate_step(&mut state)?;
            records.push(record);
        }

        Ok(records)
    }

    /// Whether a contribution lands in this step
    ///
    /// Monthly contributions at annual granularity are not modeled per
    /// sub-step; granularity resolution never produces that combination.
    fn is_contribution_step(&self, period: u32) -> bool {
        if !self.params.has_contribution() {
            return false;
        }

        match (self.params.contribution_frequency(), self.granularity) {
            (Some(ContributionFrequency::Monthly), StepGranularity::Monthly) => true,
            (Some(ContributionFrequency::Monthly), StepGranularity::Annual) => false,
            (Some(ContributionFrequency::Annual), StepGranularity::Annual) => true,
            (Some(ContributionFrequency::Annual), StepGranularity::Monthly) => period % 12 == 0,
            (None, _) => false,
        }
    }

    /// Calculate a single step and update state
    fn calculate_step(&self, state: &mut ScheduleState) -> SimulationResult<StepRecord> {
        let period = state.period;
        let overflow = SimulationError::ArithmeticOverflow { period };

        let opening_balance = state.balance;
        let mut balance = opening_balance;

        let contribution = if self.is_contribution_step(period) {
            self.params.contribution_amount
        } else {
            Decimal::ZERO
        };

        if self.params.contribution_timing == ContributionTiming::Start {
            balance = balance.checked_add(contribution).ok_or(overflow.clone())?;
        }

        let interest = balance.checked_mul(self.step_rate).ok_or(overflow.clone())?;
        balance = balance.checked_add(interest).ok_or(overflow.clone())?;

        if self.params.contribution_timing == ContributionTiming::End {
            balance = balance.checked_add(contribution).ok_or(overflow.clone())?;
        }

        state.balance = balance;
        state.cumulative_interest = state
            .cumulative_interest
            .checked_add(interest)
            .ok_or(overflow.clone())?;

        if let Some(inflation_step_rate) = self.inflation_step_rate {
            state.inflation_factor = state
                .inflation_factor
                .checked_mul(Decimal::ONE + inflation_step_rate)
                .ok_or(overflow.clone())?;
        }
        let real_value = state.real_value().ok_or(overflow.clone())?;

        Ok(StepRecord {
            period,
            date: self.date_at(period).ok_or(overflow)?,
            opening_balance,
            interest,
            contribution,
            closing_balance: balance,
            cumulative_interest: state.cumulative_interest,
            real_value,
        })
    }

    /// Calendar date of a period, measured from the start date so month-end
    /// clamping never accumulates
    fn date_at(&self, period: u32) -> Option<NaiveDate> {
        let months = period.checked_mul(self.granularity.months_per_step())?;
        self.start_date.checked_add_months(Months::new(months))
    }
}
