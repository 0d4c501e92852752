//! Projection engine: rate conversion, schedule building, and summary aggregation

mod state;
mod engine;
mod rates;
mod schedule;
mod timeline;

pub use state::ScheduleState;
pub use engine::{simulate, EngineConfig, ProjectionEngine};
pub use rates::{effective_annual_rate, effective_step_rate};
pub use schedule::{ScheduleBuilder, StepGranularity};
pub use timeline::{real_rate_of_return, StepRecord, TimelineResult};
