//! CSV batch evaluation: one vendor per row in, one rating per row out.

use super::domain::Rating;
use super::RiskRatingEvaluator;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::{Read, Write};
use std::path::Path;
use tracing::info;

#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    #[error("failed to access batch file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid batch CSV data: {0}")]
    Csv(#[from] csv::Error),
}

#[derive(Debug, Deserialize)]
struct VendorNotesRow {
    #[serde(rename = "vendor")]
    vendor: String,
    #[serde(rename = "notes", default)]
    notes: String,
}

/// One rated vendor as written to the output CSV.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchRow {
    pub vendor: String,
    pub rating: Rating,
    pub handles_pii: bool,
    pub remote_work_allowed: bool,
    pub software_provider: bool,
    pub missing_controls: String,
}

/// Ratings produced by a batch run, with a tally per outcome.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub rows: Vec<BatchRow>,
    pub tally: BTreeMap<String, usize>,
}

impl RiskRatingEvaluator {
    pub fn evaluate_csv<R: Read>(&self, reader: R) -> Result<BatchSummary, BatchError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::Headers)
            .from_reader(reader);
        let mut summary = BatchSummary::default();

        for record in csv_reader.deserialize::<VendorNotesRow>() {
            let row = record?;
            let result = self.evaluate(&row.notes);

            *summary
                .tally
                .entry(result.rating.as_str().to_string())
                .or_default() += 1;

            summary.rows.push(BatchRow {
                vendor: row.vendor.trim().to_string(),
                rating: result.rating,
                handles_pii: result.context.vendor.handles_pii,
                remote_work_allowed: result.context.vendor.remote_work_allowed,
                software_provider: result.context.vendor.software_provider,
                missing_controls: result.details.missing_controls().join(";"),
            });
        }

        info!(vendors = summary.rows.len(), tally = ?summary.tally, "batch evaluated");
        Ok(summary)
    }

    pub fn evaluate_csv_path<P: AsRef<Path>>(&self, path: P) -> Result<BatchSummary, BatchError> {
        let file = std::fs::File::open(path)?;
        self.evaluate_csv(file)
    }
}

impl BatchSummary {
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), BatchError> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        for row in &self.rows {
            csv_writer.serialize(row)?;
        }
        csv_writer.flush()?;
        Ok(())
    }
}
