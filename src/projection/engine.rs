//! Core projection engine: validate, convert rates, build the schedule, aggregate

use super::schedule::ScheduleBuilder;
use super::timeline::{real_rate_of_return, TimelineResult};
use crate::error::SimulationResult;
use crate::params::{validate, SimulationParameters, DEFAULT_MAX_TOTAL_STEPS};
use chrono::{Local, NaiveDate};

/// Configuration for a projection run
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Reject parameter sets whose schedule would exceed this many steps
    pub max_total_steps: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_total_steps: DEFAULT_MAX_TOTAL_STEPS,
        }
    }
}

/// Main projection engine
///
/// Holds configuration only; every call computes from scratch.
#[derive(Debug, Clone, Default)]
pub struct ProjectionEngine {
    config: EngineConfig,
}

impl ProjectionEngine {
    /// Create a new projection engine with given config
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Run projection for a single parameter set
    ///
    /// Undated parameter sets start on today's local date.
    pub fn simulate(&self, params: &SimulationParameters) -> SimulationResult<TimelineResult> {
        let start_date = params.start_date.unwrap_or_else(|| Local::now().date_naive());
        self.simulate_from(params, start_date)
    }

    /// Run projection with an explicit start date, ignoring `params.start_date`
    pub fn simulate_from(&self, params: &SimulationParameters, start_date: NaiveDate) -> SimulationResult<TimelineResult> {
        validate(params, self.config.max_total_steps)?;

        let builder = ScheduleBuilder::new(params, start_date, self.config.max_total_steps)?;
        log::debug!(
            "Projecting {} {} steps at step rate {} ({} compounding)",
            builder.total_steps(),
            builder.granularity(),
            builder.step_rate(),
            params.compounding,
        );

        let timeline = builder.build()?;
        let real_rate = real_rate_of_return(params.nominal_annual_rate, params.inflation_rate);

        Ok(TimelineResult::aggregate(
            timeline,
            builder.granularity(),
            builder.step_rate(),
            real_rate,
        ))
    }
}

/// Project a parameter set with the default engine configuration
pub fn simulate(params: &SimulationParameters) -> SimulationResult<TimelineResult> {
    ProjectionEngine::default().simulate(params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Parameter, SimulationError};
    use crate::params::{CompoundingRegime, ContributionFrequency, ContributionTiming, TermUnit};
    use crate::projection::StepGranularity;
    use approx::assert_relative_eq;
    use rust_decimal::prelude::ToPrimitive;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    fn params(capital: Decimal, rate: Decimal, term: u32, unit: TermUnit) -> SimulationParameters {
        SimulationParameters::new(capital, rate, term, unit).with_start_date(start())
    }

    #[test]
    fn test_simple_annual_compounding() {
        let result = simulate(&params(dec!(1000), dec!(10), 1, TermUnit::Years)).unwrap();

        assert_eq!(result.granularity, StepGranularity::Annual);
        assert_eq!(result.total_steps, 1);
        assert_eq!(result.timeline.len(), 2);
        assert_eq!(result.final_balance, dec!(1100));
        assert_eq!(result.total_interest, dec!(100));
        assert!(result.real_rate_of_return.is_none());
    }

    #[test]
    fn test_monthly_compounding_one_year() {
        let p = params(dec!(1000), dec!(12), 1, TermUnit::Years).with_compounding(CompoundingRegime::Monthly);
        let result = simulate(&p).unwrap();

        assert_eq!(result.granularity, StepGranularity::Monthly);
        assert_eq!(result.total_steps, 12);
        assert_eq!(result.final_balance.round_dp(2), dec!(1126.83));
    }

    #[test]
    fn test_contributions_only_at_zero_rate() {
        let p = params(Decimal::ZERO, Decimal::ZERO, 1, TermUnit::Years).with_contribution(
            dec!(100),
            ContributionFrequency::Monthly,
            ContributionTiming::End,
        );
        let result = simulate(&p).unwrap();

        assert_eq!(result.total_steps, 12);
        assert_eq!(result.final_balance, dec!(1200));
        assert_eq!(result.total_contributions, dec!(1200));
        assert_eq!(result.total_interest, Decimal::ZERO);
    }

    #[test]
    fn test_inflation_adjusted_values() {
        let p = params(dec!(1000), dec!(10), 1, TermUnit::Years).with_inflation(dec!(5));
        let result = simulate(&p).unwrap();

        assert_eq!(result.final_balance, dec!(1100));
        assert_eq!(result.final_real_balance.round_dp(2), dec!(1047.62));

        let real_rate = result.real_rate_of_return.unwrap();
        assert_eq!((real_rate * dec!(100)).round_dp(2), dec!(4.76));
    }

    #[test]
    fn test_granularity_invariance_one_year() {
        let capital = dec!(1000);

        for regime in CompoundingRegime::ALL {
            for rate in [dec!(3), dec!(9.5), dec!(20)] {
                let yearly = simulate(&params(capital, rate, 1, TermUnit::Years).with_compounding(regime)).unwrap();
                let monthly = simulate(&params(capital, rate, 12, TermUnit::Months).with_compounding(regime)).unwrap();

                assert_eq!(monthly.granularity, StepGranularity::Monthly);
                assert_relative_eq!(
                    yearly.final_balance.to_f64().unwrap(),
                    monthly.final_balance.to_f64().unwrap(),
                    max_relative = 1e-6
                );

                // Monthly compounding always runs monthly; compare against one annual step
                let annual_rate = crate::projection::effective_annual_rate(rate, regime).unwrap();
                assert_relative_eq!(
                    monthly.final_balance.to_f64().unwrap(),
                    (capital * (Decimal::ONE + annual_rate)).to_f64().unwrap(),
                    max_relative = 1e-6
                );
            }
        }
    }

    #[test]
    fn test_idempotent() {
        let p = params(dec!(5000), dec!(6.5), 10, TermUnit::Years)
            .with_compounding(CompoundingRegime::Continuous)
            .with_contribution(dec!(200), ContributionFrequency::Monthly, ContributionTiming::Start)
            .with_inflation(dec!(3));

        let first = simulate(&p).unwrap();
        let second = simulate(&p).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_cumulative_interest_non_decreasing() {
        let p = params(dec!(10000), dec!(12), 10, TermUnit::Years)
            .with_contribution(dec!(500), ContributionFrequency::Monthly, ContributionTiming::End);
        let result = simulate(&p).unwrap();

        assert_eq!(result.total_steps, 120);
        for pair in result.timeline.windows(2) {
            assert!(
                pair[1].cumulative_interest >= pair[0].cumulative_interest,
                "cumulative interest fell at period {}",
                pair[1].period
            );
        }
    }

    #[test]
    fn test_periods_are_sequential() {
        let p = params(dec!(1000), dec!(4), 18, TermUnit::Months);
        let result = simulate(&p).unwrap();

        let periods: Vec<u32> = result.timeline.iter().map(|r| r.period).collect();
        assert_eq!(periods, (0..=18).collect::<Vec<u32>>());
        assert_eq!(result.total_steps, 18);
        assert_eq!(result.timeline[0].interest, Decimal::ZERO);
        assert_eq!(result.timeline[0].contribution, Decimal::ZERO);
    }

    #[test]
    fn test_total_steps_matches_long_monthly_schedule() {
        let p = params(dec!(1000), dec!(3), 400, TermUnit::Years).with_compounding(CompoundingRegime::Monthly);
        let result = simulate(&p).unwrap();

        assert_eq!(result.total_steps, 4_800);
        assert_eq!(result.timeline.len(), 4_801);
    }

    #[test]
    fn test_zero_capital_rejected() {
        let err = simulate(&params(Decimal::ZERO, dec!(10), 1, TermUnit::Years)).unwrap_err();
        assert_eq!(err.parameter(), Some(Parameter::Capital));
    }

    #[test]
    fn test_negative_rate_rejected() {
        let err = simulate(&params(dec!(1000), dec!(-1), 1, TermUnit::Years)).unwrap_err();
        assert!(matches!(
            err,
            SimulationError::InvalidParameter { parameter: Parameter::NominalAnnualRate, .. }
        ));
    }

    #[test]
    fn test_step_ceiling_from_config() {
        let engine = ProjectionEngine::new(EngineConfig { max_total_steps: 24 });
        let p = params(dec!(1000), dec!(5), 3, TermUnit::Years).with_compounding(CompoundingRegime::Monthly);

        let err = engine.simulate(&p).unwrap_err();
        assert_eq!(err.parameter(), Some(Parameter::TermCount));
    }

    #[test]
    fn test_real_value_without_inflation_equals_balance() {
        let p = params(dec!(1000), dec!(8), 5, TermUnit::Years);
        let result = simulate(&p).unwrap();

        assert_eq!(result.final_real_balance, result.final_balance);
    }
}
