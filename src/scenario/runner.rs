//! Scenario runner for batch projections
//!
//! Every projection is independent, so batches run in parallel.

use crate::error::SimulationResult;
use crate::params::{NamedParameters, SimulationParameters};
use crate::projection::{EngineConfig, ProjectionEngine, TimelineResult};
use rayon::prelude::*;
use rust_decimal::Decimal;

/// Outcome of one parameter set in a batch
#[derive(Debug, Clone)]
pub struct BatchOutcome {
    pub name: String,
    pub result: SimulationResult<TimelineResult>,
}

/// Runs many projections against one engine configuration
///
/// # Example
/// ```ignore
/// let runner = ScenarioRunner::new();
/// let results = runner.run_rate_sweep(&params, &[dec!(3), dec!(4), dec!(5)]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScenarioRunner {
    engine: ProjectionEngine,
}

impl ScenarioRunner {
    /// Create runner with the default engine configuration
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            engine: ProjectionEngine::new(config),
        }
    }

    /// Run a single projection
    pub fn run(&self, params: &SimulationParameters) -> SimulationResult<TimelineResult> {
        self.engine.simulate(params)
    }

    /// Run every named parameter set, preserving input order
    pub fn run_batch(&self, batch: &[NamedParameters]) -> Vec<BatchOutcome> {
        batch
            .par_iter()
            .map(|named| BatchOutcome {
                name: named.name.clone(),
                result: self.engine.simulate(&named.parameters),
            })
            .collect()
    }

    /// Run the same parameters at several nominal rates
    pub fn run_rate_sweep(&self, params: &SimulationParameters, rates: &[Decimal]) -> Vec<SimulationResult<TimelineResult>> {
        rates
            .par_iter()
            .map(|&rate| {
                let variant = SimulationParameters {
                    nominal_annual_rate: rate,
                    ..params.clone()
                };
                self.engine.simulate(&variant)
            })
            .collect()
    }

    pub fn engine(&self) -> &ProjectionEngine {
        &self.engine
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{CompoundingRegime, TermUnit};
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn base() -> SimulationParameters {
        SimulationParameters::new(dec!(100000), dec!(4), 10, TermUnit::Years)
            .with_compounding(CompoundingRegime::Quarterly)
            .with_start_date(NaiveDate::from_ymd_opt(2024, 6, 30).unwrap())
    }

    #[test]
    fn test_rate_sweep_orders_results() {
        let runner = ScenarioRunner::new();
        let results = runner.run_rate_sweep(&base(), &[dec!(3), dec!(4), dec!(5)]);
        assert_eq!(results.len(), 3);

        let finals: Vec<Decimal> = results.into_iter().map(|r| r.unwrap().final_balance).collect();

        // Higher rate should result in a higher final balance
        assert!(finals[0] < finals[1]);
        assert!(finals[1] < finals[2]);
    }

    #[test]
    fn test_batch_keeps_order_and_isolates_errors() {
        let runner = ScenarioRunner::new();
        let mut invalid = base();
        invalid.nominal_annual_rate = dec!(-2);

        let batch = vec![
            NamedParameters { name: "good".into(), parameters: base() },
            NamedParameters { name: "bad".into(), parameters: invalid },
            NamedParameters { name: "also good".into(), parameters: base() },
        ];

        let outcomes = runner.run_batch(&batch);
        let names: Vec<&str> = outcomes.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, vec!["good", "bad", "also good"]);

        assert!(outcomes[0].result.is_ok());
        assert!(outcomes[1].result.is_err());
        assert_eq!(
            outcomes[0].result.as_ref().unwrap(),
            outcomes[2].result.as_ref().unwrap()
        );
    }

    #[test]
    fn test_runner_config_applies() {
        let runner = ScenarioRunner::with_config(EngineConfig { max_total_steps: 5 });
        assert!(runner.run(&base()).is_err());
        assert_eq!(runner.engine().config().max_total_steps, 5);
    }
}
