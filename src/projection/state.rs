//! Running state of a schedule between steps

use rust_decimal::Decimal;

/// State of the projection at a point in time
#[derive(Debug, Clone)]
pub struct ScheduleState {
    /// Current step (0 before the first step runs)
    pub period: u32,

    /// Balance carried into the next step
    pub balance: Decimal,

    /// Interest accrued since period 0
    pub cumulative_interest: Decimal,

    /// Compounded inflation since period 0 (1 when no inflation is given)
    pub inflation_factor: Decimal,
}

impl ScheduleState {
    /// Initialize state from the starting capital
    pub fn from_capital(capital: Decimal) -> Self {
        Self {
            period: 0,
            balance: capital,
            cumulative_interest: Decimal::ZERO,
            inflation_factor: Decimal::ONE,
        }
    }

    /// Advance to next step
    pub fn advance(&mut self) {
        self.period += 1;
    }

    /// Balance expressed in period-0 purchasing power
    pub fn real_value(&self) -> Option<Decimal> {
        self.balance.checked_div(self.inflation_factor)
    }
}
