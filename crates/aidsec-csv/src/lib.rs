//! CSV reader for the aid worker incident table.
//!
//! Turns the incidents CSV into an [`aidsec_core::IncidentTable`]. Pure
//! synchronous; the only I/O is reading the file in [`CsvSource`].
//!
//! # Quick start
//!
//! ```no_run
//! use aidsec_csv::parse;
//!
//! let csv = "Year,Country,Total killed\r\n2020,Afghanistan,2\r\n";
//! let parsed = parse(csv).unwrap();
//! println!("{} records", parsed.table.len());
//! ```

pub mod error;
mod parse;

use std::path::{Path, PathBuf};

use aidsec_core::{IncidentSource, IncidentTable};
pub use error::{Error, Result};
pub use parse::LoadReport;

// ─── Public types ────────────────────────────────────────────────────────────

/// A decoded table together with what the reader noticed on the way.
#[derive(Debug)]
pub struct ParsedTable {
  pub table:  IncidentTable,
  pub report: LoadReport,
}

// ─── Public API ──────────────────────────────────────────────────────────────

/// Parse a whole CSV document held in memory.
///
/// The first non-blank record is the header. Header cells are matched to the
/// incident schema; unknown headers are ignored and absent schema columns
/// are listed in the report.
pub fn parse(input: &str) -> Result<ParsedTable> { parse::parse_table(input) }

/// Reads the incident table from a CSV file on every [`load`].
///
/// Wrap it in [`aidsec_core::CachedSource`] to read the file once.
///
/// [`load`]: IncidentSource::load
#[derive(Debug, Clone)]
pub struct CsvSource {
  path: PathBuf,
}

impl CsvSource {
  pub fn new(path: impl Into<PathBuf>) -> Self { Self { path: path.into() } }

  pub fn path(&self) -> &Path { &self.path }

  /// Read and parse the file, logging the load report.
  pub fn read(&self) -> Result<ParsedTable> {
    let input =
      std::fs::read_to_string(&self.path).map_err(|source| Error::Io {
        path: self.path.clone(),
        source,
      })?;
    let parsed = parse(&input)?;
    let report = &parsed.report;

    tracing::info!(
      path = %self.path.display(),
      rows = report.rows,
      columns = report.columns.len(),
      ragged = report.ragged_rows,
      unusable = report.unusable_cells,
      "incident table loaded"
    );
    if report.unusable_cells > 0 {
      tracing::warn!(
        cells = report.unusable_cells,
        "unusable cells treated as missing"
      );
    }
    if !report.missing_columns.is_empty() {
      let missing: Vec<&str> =
        report.missing_columns.iter().map(|c| c.header()).collect();
      tracing::warn!(
        missing = %missing.join(", "),
        "columns absent; dependent panels will be skipped"
      );
    }

    Ok(parsed)
  }
}

impl IncidentSource for CsvSource {
  type Error = aidsec_core::Error;

  fn load(&self) -> Result<IncidentTable, aidsec_core::Error> {
    Ok(self.read()?.table)
  }
}
