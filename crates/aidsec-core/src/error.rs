//! Error types for `aidsec-core`.

use thiserror::Error;

use crate::{column::Column, pipeline::Derivation};

#[derive(Debug, Error)]
pub enum Error {
  /// The incident source could not be read. Nothing can be rendered.
  #[error("incident data unavailable: {0}")]
  DataUnavailable(String),

  /// A derivation needs a column the loaded table does not have.
  #[error("column '{0}' not present in the incident table")]
  ColumnMissing(Column),

  /// A derivation produced no rows.
  #[error("{0} produced no rows")]
  EmptyGroup(Derivation),
}

impl Error {
  /// `true` for the conditions a single panel recovers from.
  pub fn is_recoverable(&self) -> bool {
    matches!(self, Self::ColumnMissing(_) | Self::EmptyGroup(_))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
