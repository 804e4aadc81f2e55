//! CSV and JSON export of projection output
//!
//! Values are written as raw numbers. Currency, locale and unit formatting
//! belong to whoever reads the export.

use crate::error::Result;
use crate::inputs::InputParameters;
use crate::projection::{MonthRecord, ProjectionResult, ProjectionSummary};
use serde::Serialize;
use std::io::Write;

/// Full projection report: inputs, summary and every month
#[derive(Debug, Serialize)]
pub struct ProjectionReport<'a> {
    pub inputs: &'a InputParameters,
    pub summary: ProjectionSummary,
    pub months: &'a [MonthRecord],
}

impl<'a> ProjectionReport<'a> {
    pub fn new(result: &'a ProjectionResult) -> Self {
        Self {
            inputs: &result.inputs,
            summary: result.summary(),
            months: &result.months,
        }
    }
}

/// Write one header row plus one row per month
pub fn write_csv<W: Write>(months: &[MonthRecord], writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for row in months {
        csv_writer.serialize(row)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Write the full report as pretty-printed JSON
pub fn write_json<W: Write>(result: &ProjectionResult, writer: W) -> Result<()> {
    serde_json::to_writer_pretty(writer, &ProjectionReport::new(result))?;
    Ok(())
}
