//! Conversion of nominal annual rates into effective per-step rates

use crate::error::{SimulationError, SimulationResult};
use crate::params::CompoundingRegime;
use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;

const ONE_HUNDRED: Decimal = dec!(100);

/// Effective rate applied once per schedule step
///
/// # Arguments
/// * `nominal_annual_rate` - Nominal annual rate in percent (e.g., 12 for 12%)
/// * `regime` - Compounding regime the nominal rate is quoted under
/// * `steps_per_year` - Schedule steps per year (12 for monthly steps)
///
/// Continuous: `exp(r / steps) - 1`. Discrete with `m` periods per year:
/// `(1 + r/m)^(m/steps) - 1`, using exact repeated multiplication when
/// `m/steps` is whole.
pub fn effective_step_rate(
    nominal_annual_rate: Decimal,
    regime: CompoundingRegime,
    steps_per_year: u32,
) -> SimulationResult<Decimal> {
    if nominal_annual_rate.is_zero() {
        return Ok(Decimal::ZERO);
    }

    let steps_per_year = steps_per_year.max(1);
    let r = nominal_annual_rate / ONE_HUNDRED;
    let overflow = SimulationError::ArithmeticOverflow { period: 0 };

    let growth = match regime.periods_per_year() {
        None => (r / Decimal::from(steps_per_year)).checked_exp(),
        Some(m) => {
            let base = Decimal::ONE + r / Decimal::from(m);
            if m % steps_per_year == 0 {
                base.checked_powu(u64::from(m / steps_per_year))
            } else {
                base.checked_powd(Decimal::from(m) / Decimal::from(steps_per_year))
            }
        }
    };

    growth.map(|g| g - Decimal::ONE).ok_or(overflow)
}

/// Effective annual rate (one step per year) for a nominal rate
pub fn effective_annual_rate(nominal_annual_rate: Decimal, regime: CompoundingRegime) -> SimulationResult<Decimal> {
    effective_step_rate(nominal_annual_rate, regime, 1)
}
