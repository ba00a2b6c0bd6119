//! Error types for the aidsec-csv reader.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("cannot read {path}: {source}")]
  Io {
    path:   PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("CSV input has no header row")]
  MissingHeader,

  #[error("malformed CSV: {0}")]
  Csv(#[from] csv::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Every reader failure leaves the dashboard without data.
impl From<Error> for aidsec_core::Error {
  fn from(err: Error) -> Self { Self::DataUnavailable(err.to_string()) }
}
