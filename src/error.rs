//! Error types for parameter validation and projection

use std::fmt;
use thiserror::Error;

/// Input field a validation failure refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parameter {
    Capital,
    NominalAnnualRate,
    TermCount,
    ContributionAmount,
    InflationRate,
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Parameter::Capital => "capital",
            Parameter::NominalAnnualRate => "nominal_annual_rate",
            Parameter::TermCount => "term_count",
            Parameter::ContributionAmount => "contribution_amount",
            Parameter::InflationRate => "inflation_rate",
        };
        f.write_str(name)
    }
}

/// Errors raised by the projection engine
///
/// Either a complete `TimelineResult` is returned or one of these; there is
/// no partial result.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimulationError {
    /// A parameter violates its documented constraint
    #[error("Invalid parameter {parameter}: {constraint}")]
    InvalidParameter {
        parameter: Parameter,
        constraint: String,
    },

    /// Compounding regime name not recognized (strict parsing only)
    #[error("Unsupported compounding regime: {0}")]
    UnsupportedCompoundingRegime(String),

    /// Balance or rate left the representable decimal range
    #[error("Arithmetic overflow at period {period}")]
    ArithmeticOverflow { period: u32 },
}

impl SimulationError {
    pub(crate) fn invalid(parameter: Parameter, constraint: impl Into<String>) -> Self {
        SimulationError::InvalidParameter {
            parameter,
            constraint: constraint.into(),
        }
    }

    /// Parameter at fault, if this is a validation error
    pub fn parameter(&self) -> Option<Parameter> {
        match self {
            SimulationError::InvalidParameter { parameter, .. } => Some(*parameter),
            _ => None,
        }
    }
}

pub type SimulationResult<T> = Result<T, SimulationError>;
