//! Load simulation parameters from JSON or CSV files
//!
//! Enumerated fields are read as text so unknown compounding regimes can be
//! handled according to the caller's `ParseMode`.

use super::data::{
    CompoundingRegime, ContributionFrequency, ContributionTiming, ParseMode, SimulationParameters,
    TermUnit,
};
use crate::error::SimulationError;
use chrono::NaiveDate;
use csv::Reader;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Row {row}: {message}")]
    Field { row: usize, message: String },

    #[error(transparent)]
    Simulation(#[from] SimulationError),
}

/// Parameter record as it appears in input files
#[derive(Debug, Deserialize)]
struct RawParameters {
    #[serde(default)]
    name: Option<String>,
    capital: Decimal,
    nominal_annual_rate: Decimal,
    term_count: u32,
    term_unit: String,
    #[serde(default)]
    compounding: Option<String>,
    #[serde(default)]
    contribution_amount: Option<Decimal>,
    #[serde(default)]
    contribution_frequency: Option<String>,
    #[serde(default)]
    contribution_timing: Option<String>,
    #[serde(default)]
    inflation_rate: Option<Decimal>,
    #[serde(default)]
    start_date: Option<NaiveDate>,
}

impl RawParameters {
    fn into_parameters(self, row: usize, mode: ParseMode) -> Result<NamedParameters, LoadError> {
        let field_err = |message: String| LoadError::Field { row, message };

        let term_unit: TermUnit = self.term_unit.parse().map_err(field_err)?;

        let compounding = match self.compounding.as_deref().map(str::trim) {
            None | Some("") => CompoundingRegime::Annual,
            Some(name) => CompoundingRegime::parse(name, mode)?,
        };

        let contribution_frequency = match self.contribution_frequency.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(name) => Some(name.parse::<ContributionFrequency>().map_err(field_err)?),
        };

        let contribution_timing = match self.contribution_timing.as_deref().map(str::trim) {
            None | Some("") => ContributionTiming::default(),
            Some(name) => name.parse().map_err(field_err)?,
        };

        let parameters = SimulationParameters {
            capital: self.capital,
            nominal_annual_rate: self.nominal_annual_rate,
            term_count: self.term_count,
            term_unit,
            compounding,
            contribution_amount: self.contribution_amount.unwrap_or(Decimal::ZERO),
            contribution_frequency,
            contribution_timing,
            inflation_rate: self.inflation_rate,
            start_date: self.start_date,
        };

        Ok(NamedParameters {
            name: self.name.unwrap_or_else(|| format!("row-{}", row)),
            parameters,
        })
    }
}

/// A parameter set with the label it was loaded under
#[derive(Debug, Clone, PartialEq)]
pub struct NamedParameters {
    pub name: String,
    pub parameters: SimulationParameters,
}

/// Load a single parameter set from a JSON file
pub fn load_parameters_json<P: AsRef<Path>>(path: P, mode: ParseMode) -> Result<SimulationParameters, LoadError> {
    let file = File::open(path)?;
    let raw: RawParameters = serde_json::from_reader(BufReader::new(file))?;
    Ok(raw.into_parameters(1, mode)?.parameters)
}

/// Load a batch of parameter sets from a CSV file with named columns
pub fn load_parameter_batch<P: AsRef<Path>>(path: P, mode: ParseMode) -> Result<Vec<NamedParameters>, LoadError> {
    let file = File::open(path)?;
    load_parameter_batch_from_reader(file, mode)
}

/// Load a batch of parameter sets from any reader (e.g., string buffer)
pub fn load_parameter_batch_from_reader<R: Read>(reader: R, mode: ParseMode) -> Result<Vec<NamedParameters>, LoadError> {
    let mut csv_reader = Reader::from_reader(reader);
    let mut batch = Vec::new();

    for (idx, result) in csv_reader.deserialize().enumerate() {
        let raw: RawParameters = result?;
        batch.push(raw.into_parameters(idx + 1, mode)?);
    }

    Ok(batch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::io::Write;

    const BATCH: &str = "\
name,capital,nominal_annual_rate,term_count,term_unit,compounding,contribution_amount,contribution_frequency,contribution_timing,inflation_rate,start_date
lump,1000,10,1,years,annual,,,,,2024-01-01
saver,0,0,1,years,,100,monthly,end,,
weird,500,6,24,months,fortnightly,50,annual,start,3.5,
";

    #[test]
    fn test_load_batch_lenient() {
        let batch = load_parameter_batch_from_reader(BATCH.as_bytes(), ParseMode::Lenient).unwrap();
        assert_eq!(batch.len(), 3);

        let lump = &batch[0];
        assert_eq!(lump.name, "lump");
        assert_eq!(lump.parameters.capital, dec!(1000));
        assert_eq!(lump.parameters.contribution_amount, Decimal::ZERO);
        assert_eq!(lump.parameters.start_date, NaiveDate::from_ymd_opt(2024, 1, 1));
        assert_eq!(lump.parameters.contribution_frequency, None);

        let saver = &batch[1];
        assert_eq!(saver.parameters.contribution_amount, dec!(100));
        assert_eq!(saver.parameters.contribution_frequency, Some(ContributionFrequency::Monthly));
        assert_eq!(saver.parameters.compounding, CompoundingRegime::Annual);

        let weird = &batch[2];
        assert_eq!(weird.parameters.term_unit, TermUnit::Months);
        assert_eq!(weird.parameters.compounding, CompoundingRegime::Annual);
        assert_eq!(weird.parameters.contribution_timing, ContributionTiming::Start);
        assert_eq!(weird.parameters.inflation_rate, Some(dec!(3.5)));
    }

    #[test]
    fn test_load_batch_strict_rejects_unknown_regime() {
        let err = load_parameter_batch_from_reader(BATCH.as_bytes(), ParseMode::Strict).unwrap_err();
        assert!(matches!(
            err,
            LoadError::Simulation(SimulationError::UnsupportedCompoundingRegime(ref name)) if name == "fortnightly"
        ));
    }

    #[test]
    fn test_bad_term_unit_reports_row() {
        let csv = "capital,nominal_annual_rate,term_count,term_unit\n1000,5,3,decades\n";
        let err = load_parameter_batch_from_reader(csv.as_bytes(), ParseMode::Lenient).unwrap_err();
        assert!(matches!(err, LoadError::Field { row: 1, .. }));
    }

    #[test]
    fn test_load_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"capital": 2500, "nominal_annual_rate": "7.5", "term_count": 10, "term_unit": "years", "compounding": "quarterly", "inflation_rate": 2}}"#
        )
        .unwrap();

        let params = load_parameters_json(file.path(), ParseMode::Strict).unwrap();
        assert_eq!(params.capital, dec!(2500));
        assert_eq!(params.nominal_annual_rate, dec!(7.5));
        assert_eq!(params.compounding, CompoundingRegime::Quarterly);
        assert_eq!(params.inflation_rate, Some(dec!(2)));
    }
}
