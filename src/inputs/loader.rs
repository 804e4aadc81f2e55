//! Load scenario parameter sets from CSV
//!
//! The header row names the input fields (snake_case, kebab-case or camelCase).
//! An optional `name` column labels each scenario. Columns that are absent
//! take the calculator defaults.

use super::{InputParameters, Parameter};
use crate::error::{ProjectionError, Result};
use csv::{ReaderBuilder, StringRecord};
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;

/// A labelled parameter set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub params: InputParameters,
}

enum Column {
    Name,
    Field(Parameter),
}

fn map_headers(headers: &StringRecord) -> Result<Vec<Column>> {
    headers
        .iter()
        .map(|h| {
            let h = h.trim();
            if h.eq_ignore_ascii_case("name") || h.eq_ignore_ascii_case("scenario") {
                Ok(Column::Name)
            } else {
                h.parse::<Parameter>().map(Column::Field)
            }
        })
        .collect()
}

fn parse_row(columns: &[Column], record: &StringRecord, row: usize) -> Result<Scenario> {
    let mut params = InputParameters::default();
    let mut name = format!("scenario-{}", row);

    for (column, cell) in columns.iter().zip(record.iter()) {
        let cell = cell.trim();
        match column {
            Column::Name => {
                if !cell.is_empty() {
                    name = cell.to_string();
                }
            }
            Column::Field(parameter) => {
                let value: f64 = cell.parse().map_err(|_| {
                    ProjectionError::invalid(
                        parameter.name(),
                        format!("row {}: cannot parse '{}' as a number", row, cell),
                    )
                })?;
                params.set(*parameter, value);
            }
        }
    }

    Ok(Scenario { name, params })
}

/// Load scenarios from any reader (e.g., string buffer, request body)
pub fn load_scenarios_from_reader<R: Read>(reader: R) -> Result<Vec<Scenario>> {
    let mut csv_reader = ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let columns = map_headers(csv_reader.headers()?)?;

    let mut scenarios = Vec::new();
    for (i, result) in csv_reader.records().enumerate() {
        let record = result?;
        scenarios.push(parse_row(&columns, &record, i + 1)?);
    }

    log::debug!("Loaded {} scenarios", scenarios.len());
    Ok(scenarios)
}

/// Load scenarios from a CSV file
pub fn load_scenarios<P: AsRef<Path>>(path: P) -> Result<Vec<Scenario>> {
    let file = std::fs::File::open(path)?;
    load_scenarios_from_reader(file)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_scenarios() {
        let data = "\
name,personal_ad_spend,displayAdRPM,projection_months
baseline,1000,2.5,12
no-budget,0,4.0,24
";
        let scenarios = load_scenarios_from_reader(data.as_bytes()).unwrap();
        assert_eq!(scenarios.len(), 2);

        assert_eq!(scenarios[0].name, "baseline");
        assert_eq!(scenarios[0].params, InputParameters::default());

        assert_eq!(scenarios[1].name, "no-budget");
        assert_eq!(scenarios[1].params.personal_ad_spend, 0.0);
        assert_eq!(scenarios[1].params.display_ad_rpm, 4.0);
        assert_eq!(scenarios[1].params.projection_months, 24);
        assert_eq!(scenarios[1].params.current_subscribers, 500.0);
    }

    #[test]
    fn test_unnamed_rows_get_row_labels() {
        let data = "current_subscribers\n800\n900\n";
        let scenarios = load_scenarios_from_reader(data.as_bytes()).unwrap();
        assert_eq!(scenarios[0].name, "scenario-1");
        assert_eq!(scenarios[1].name, "scenario-2");
        assert_eq!(scenarios[1].params.current_subscribers, 900.0);
    }

    #[test]
    fn test_unknown_column_rejected() {
        let data = "budget\n100\n";
        let err = load_scenarios_from_reader(data.as_bytes()).unwrap_err();
        assert!(matches!(err, ProjectionError::UnknownParameter(ref h) if h == "budget"));
    }

    #[test]
    fn test_bad_cell_names_field() {
        let data = "ad_conversion_cost\nfive\n";
        let err = load_scenarios_from_reader(data.as_bytes()).unwrap_err();
        assert_eq!(err.field(), Some("ad_conversion_cost"));
    }
}
