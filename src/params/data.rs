//! Simulation parameter types

use crate::error::SimulationError;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Unit the term count is expressed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TermUnit {
    Years,
    Months,
}

impl FromStr for TermUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "years" | "year" | "y" => Ok(TermUnit::Years),
            "months" | "month" | "m" => Ok(TermUnit::Months),
            other => Err(format!("Unknown term unit: {}", other)),
        }
    }
}

/// Frequency at which interest is capitalized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompoundingRegime {
    Annual,
    Semiannual,
    Quarterly,
    Monthly,
    Daily,
    Continuous,
}

impl CompoundingRegime {
    pub const ALL: [CompoundingRegime; 6] = [
        CompoundingRegime::Annual,
        CompoundingRegime::Semiannual,
        CompoundingRegime::Quarterly,
        CompoundingRegime::Monthly,
        CompoundingRegime::Daily,
        CompoundingRegime::Continuous,
    ];

    /// Compounding periods per year, `None` for continuous compounding
    pub fn periods_per_year(&self) -> Option<u32> {
        match self {
            CompoundingRegime::Annual => Some(1),
            CompoundingRegime::Semiannual => Some(2),
            CompoundingRegime::Quarterly => Some(4),
            CompoundingRegime::Monthly => Some(12),
            CompoundingRegime::Daily => Some(365),
            CompoundingRegime::Continuous => None,
        }
    }

    /// Parse a regime name according to `mode`
    ///
    /// Lenient parsing maps unknown names to `Annual`; strict parsing rejects
    /// them with `UnsupportedCompoundingRegime`.
    pub fn parse(s: &str, mode: ParseMode) -> Result<Self, SimulationError> {
        match s.parse::<CompoundingRegime>() {
            Ok(regime) => Ok(regime),
            Err(err) => match mode {
                ParseMode::Strict => Err(err),
                ParseMode::Lenient => {
                    log::warn!("Unrecognized compounding regime '{}', falling back to annual", s);
                    Ok(CompoundingRegime::Annual)
                }
            },
        }
    }
}

impl FromStr for CompoundingRegime {
    type Err = SimulationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "annual" | "annually" | "yearly" => Ok(CompoundingRegime::Annual),
            "semiannual" | "semi-annual" | "semiannually" => Ok(CompoundingRegime::Semiannual),
            "quarterly" => Ok(CompoundingRegime::Quarterly),
            "monthly" => Ok(CompoundingRegime::Monthly),
            "daily" => Ok(CompoundingRegime::Daily),
            "continuous" | "continuously" => Ok(CompoundingRegime::Continuous),
            _ => Err(SimulationError::UnsupportedCompoundingRegime(s.to_string())),
        }
    }
}

impl fmt::Display for CompoundingRegime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CompoundingRegime::Annual => "annual",
            CompoundingRegime::Semiannual => "semiannual",
            CompoundingRegime::Quarterly => "quarterly",
            CompoundingRegime::Monthly => "monthly",
            CompoundingRegime::Daily => "daily",
            CompoundingRegime::Continuous => "continuous",
        };
        f.write_str(name)
    }
}

/// How strictly textual regime names are interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParseMode {
    /// Unknown names fall back to annual compounding
    #[default]
    Lenient,
    /// Unknown names are an error
    Strict,
}

/// How often a recurring contribution is made
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContributionFrequency {
    #[default]
    Monthly,
    Annual,
}

impl FromStr for ContributionFrequency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "monthly" => Ok(ContributionFrequency::Monthly),
            "annual" | "annually" | "yearly" => Ok(ContributionFrequency::Annual),
            other => Err(format!("Unknown contribution frequency: {}", other)),
        }
    }
}

/// Whether a contribution lands before or after interest accrues in its step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContributionTiming {
    Start,
    #[default]
    End,
}

impl FromStr for ContributionTiming {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "start" | "begin" | "beginning" => Ok(ContributionTiming::Start),
            "end" => Ok(ContributionTiming::End),
            other => Err(format!("Unknown contribution timing: {}", other)),
        }
    }
}

/// Inputs for one projection
///
/// Rates are percentages (`10` means 10%). Amounts are currency units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationParameters {
    pub capital: Decimal,

    /// Nominal annual rate in percent
    pub nominal_annual_rate: Decimal,

    pub term_count: u32,

    pub term_unit: TermUnit,

    #[serde(default = "default_compounding")]
    pub compounding: CompoundingRegime,

    #[serde(default)]
    pub contribution_amount: Decimal,

    /// Unset means monthly once a contribution amount is given
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contribution_frequency: Option<ContributionFrequency>,

    #[serde(default)]
    pub contribution_timing: ContributionTiming,

    /// Annual inflation rate in percent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inflation_rate: Option<Decimal>,

    /// First date of the schedule; today when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
}

fn default_compounding() -> CompoundingRegime {
    CompoundingRegime::Annual
}

impl SimulationParameters {
    /// Lump-sum projection with annual compounding and no contributions
    pub fn new(capital: Decimal, nominal_annual_rate: Decimal, term_count: u32, term_unit: TermUnit) -> Self {
        Self {
            capital,
            nominal_annual_rate,
            term_count,
            term_unit,
            compounding: default_compounding(),
            contribution_amount: Decimal::ZERO,
            contribution_frequency: None,
            contribution_timing: ContributionTiming::default(),
            inflation_rate: None,
            start_date: None,
        }
    }

    pub fn with_compounding(mut self, compounding: CompoundingRegime) -> Self {
        self.compounding = compounding;
        self
    }

    pub fn with_contribution(
        mut self,
        amount: Decimal,
        frequency: ContributionFrequency,
        timing: ContributionTiming,
    ) -> Self {
        self.contribution_amount = amount;
        self.contribution_frequency = Some(frequency);
        self.contribution_timing = timing;
        self
    }

    pub fn with_inflation(mut self, inflation_rate: Decimal) -> Self {
        self.inflation_rate = Some(inflation_rate);
        self
    }

    pub fn with_start_date(mut self, start_date: NaiveDate) -> Self {
        self.start_date = Some(start_date);
        self
    }

    /// Whether a recurring contribution is configured at all
    pub fn has_contribution(&self) -> bool {
        self.contribution_amount > Decimal::ZERO
    }

    /// Frequency in effect: the explicit one, else the default when a
    /// contribution amount is set, else none
    pub fn contribution_frequency(&self) -> Option<ContributionFrequency> {
        self.contribution_frequency
            .or_else(|| self.has_contribution().then(ContributionFrequency::default))
    }
}
