//! Simulation parameters, validation, and file loading

mod data;
mod validation;
pub mod loader;

pub use data::{
    CompoundingRegime, ContributionFrequency, ContributionTiming, ParseMode, SimulationParameters,
    TermUnit,
};
pub use validation::{validate, DEFAULT_MAX_TOTAL_STEPS};
pub(crate) use validation::bounded_total_steps;
pub use loader::{load_parameter_batch, load_parameter_batch_from_reader, load_parameters_json, LoadError, NamedParameters};
