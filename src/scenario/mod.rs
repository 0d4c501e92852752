//! Saved scenarios and batch execution

mod runner;
pub mod store;

pub use runner::{BatchOutcome, ScenarioRunner};
pub use store::{ScenarioData, ScenarioError, ScenarioRecord, ScenarioStore};
