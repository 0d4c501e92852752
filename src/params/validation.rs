//! Entry-point validation of simulation parameters

use super::data::SimulationParameters;
use crate::error::{Parameter, SimulationError, SimulationResult};
use crate::projection::StepGranularity;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Default ceiling on schedule steps (500 years of monthly steps)
pub const DEFAULT_MAX_TOTAL_STEPS: u32 = 6_000;

/// Check every documented constraint, before any step is computed
///
/// Zero capital is accepted only alongside a positive contribution, so a
/// pure savings plan can still be projected.
pub fn validate(params: &SimulationParameters, max_total_steps: u32) -> SimulationResult<()> {
    if params.capital < Decimal::ZERO {
        return Err(SimulationError::invalid(Parameter::Capital, "must be greater than 0"));
    }
    if params.capital.is_zero() && !params.has_contribution() {
        return Err(SimulationError::invalid(
            Parameter::Capital,
            "must be greater than 0 when no contribution is set",
        ));
    }

    if params.nominal_annual_rate < Decimal::ZERO {
        return Err(SimulationError::invalid(
            Parameter::NominalAnnualRate,
            "must not be negative",
        ));
    }

    if params.term_count < 1 {
        return Err(SimulationError::invalid(Parameter::TermCount, "must be at least 1"));
    }

    if params.contribution_amount < Decimal::ZERO {
        return Err(SimulationError::invalid(
            Parameter::ContributionAmount,
            "must not be negative",
        ));
    }

    if let Some(inflation) = params.inflation_rate {
        if inflation <= dec!(-100) {
            return Err(SimulationError::invalid(
                Parameter::InflationRate,
                "must be greater than -100",
            ));
        }
    }

    bounded_total_steps(params, StepGranularity::resolve(params), max_total_steps)?;

    Ok(())
}

/// Step count for `params` at `granularity`, rejected above `max_total_steps`
pub(crate) fn bounded_total_steps(
    params: &SimulationParameters,
    granularity: StepGranularity,
    max_total_steps: u32,
) -> SimulationResult<u32> {
    match granularity.total_steps(params.term_count, params.term_unit) {
        Some(steps) if steps <= max_total_steps => Ok(steps),
        _ => Err(SimulationError::invalid(
            Parameter::TermCount,
            format!("term exceeds the maximum of {} {} steps", max_total_steps, granularity),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{ContributionFrequency, ContributionTiming, TermUnit};

    fn base() -> SimulationParameters {
        SimulationParameters::new(dec!(1000), dec!(10), 1, TermUnit::Years)
    }

    #[test]
    fn test_valid_parameters_pass() {
        assert!(validate(&base(), DEFAULT_MAX_TOTAL_STEPS).is_ok());
    }

    #[test]
    fn test_zero_capital_without_contribution_rejected() {
        let mut params = base();
        params.capital = Decimal::ZERO;

        let err = validate(&params, DEFAULT_MAX_TOTAL_STEPS).unwrap_err();
        assert_eq!(err.parameter(), Some(Parameter::Capital));
    }

    #[test]
    fn test_zero_capital_with_contribution_accepted() {
        let mut params = base().with_contribution(
            dec!(100),
            ContributionFrequency::Monthly,
            ContributionTiming::End,
        );
        params.capital = Decimal::ZERO;

        assert!(validate(&params, DEFAULT_MAX_TOTAL_STEPS).is_ok());
    }

    #[test]
    fn test_negative_rate_rejected() {
        let mut params = base();
        params.nominal_annual_rate = dec!(-1);

        let err = validate(&params, DEFAULT_MAX_TOTAL_STEPS).unwrap_err();
        assert_eq!(err.parameter(), Some(Parameter::NominalAnnualRate));
    }

    #[test]
    fn test_zero_term_rejected() {
        let mut params = base();
        params.term_count = 0;

        let err = validate(&params, DEFAULT_MAX_TOTAL_STEPS).unwrap_err();
        assert_eq!(err.parameter(), Some(Parameter::TermCount));
    }

    #[test]
    fn test_negative_contribution_rejected() {
        let params = base().with_contribution(
            dec!(-5),
            ContributionFrequency::Annual,
            ContributionTiming::Start,
        );

        let err = validate(&params, DEFAULT_MAX_TOTAL_STEPS).unwrap_err();
        assert_eq!(err.parameter(), Some(Parameter::ContributionAmount));
    }

    #[test]
    fn test_total_deflation_rejected() {
        let params = base().with_inflation(dec!(-100));

        let err = validate(&params, DEFAULT_MAX_TOTAL_STEPS).unwrap_err();
        assert_eq!(err.parameter(), Some(Parameter::InflationRate));
    }

    #[test]
    fn test_step_ceiling_applies_after_granularity() {
        // 600 years at monthly granularity is 7200 steps
        let params = SimulationParameters::new(dec!(1000), dec!(5), 600, TermUnit::Years)
            .with_compounding(crate::params::CompoundingRegime::Monthly);

        let err = validate(&params, DEFAULT_MAX_TOTAL_STEPS).unwrap_err();
        assert_eq!(err.parameter(), Some(Parameter::TermCount));

        // Same term at annual granularity stays under the ceiling
        let annual = SimulationParameters::new(dec!(1000), dec!(5), 600, TermUnit::Years);
        assert!(validate(&annual, DEFAULT_MAX_TOTAL_STEPS).is_ok());
    }
}
