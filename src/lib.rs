//! Interest Projection - Deterministic compound-interest projection engine
//!
//! This library provides:
//! - Nominal-to-effective rate conversion for any compounding regime
//! - Period-by-period schedules with contributions and inflation adjustment
//! - Summary figures (final nominal/real balance, total interest, real rate)
//! - Named scenario storage, CSV export, and parallel batch runs

pub mod error;
pub mod params;
pub mod projection;
pub mod scenario;
pub mod export;

// Re-export commonly used types
pub use error::{Parameter, SimulationError, SimulationResult};
pub use params::{
    CompoundingRegime, ContributionFrequency, ContributionTiming, ParseMode, SimulationParameters, TermUnit,
};
pub use projection::{simulate, EngineConfig, ProjectionEngine, StepRecord, TimelineResult};
pub use scenario::{ScenarioRunner, ScenarioStore};
