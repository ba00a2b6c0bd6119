//! The in-memory incident table.

use std::collections::BTreeSet;

use strum::IntoEnumIterator;

use crate::{
  Result,
  column::Column,
  error::Error,
  incident::IncidentRecord,
};

/// All incident records in source order, plus the set of schema columns the
/// source actually carried.
///
/// Built once by a loader and then shared read-only; nothing mutates a table
/// after construction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IncidentTable {
  records: Vec<IncidentRecord>,
  columns: BTreeSet<Column>,
}

impl IncidentTable {
  pub fn new(
    records: Vec<IncidentRecord>,
    columns: impl IntoIterator<Item = Column>,
  ) -> Self {
    Self {
      records,
      columns: columns.into_iter().collect(),
    }
  }

  /// A table that claims every schema column.
  pub fn with_all_columns(records: Vec<IncidentRecord>) -> Self {
    Self::new(records, Column::iter())
  }

  pub fn records(&self) -> &[IncidentRecord] { &self.records }

  pub fn iter(&self) -> std::slice::Iter<'_, IncidentRecord> {
    self.records.iter()
  }

  pub fn len(&self) -> usize { self.records.len() }

  pub fn is_empty(&self) -> bool { self.records.is_empty() }

  pub fn columns(&self) -> impl Iterator<Item = Column> + '_ {
    self.columns.iter().copied()
  }

  pub fn has_column(&self, column: Column) -> bool {
    self.columns.contains(&column)
  }

  /// Schema columns absent from the source.
  pub fn missing_columns(&self) -> Vec<Column> {
    Column::iter().filter(|c| !self.has_column(*c)).collect()
  }

  /// Fail with [`Error::ColumnMissing`] naming the first absent column.
  pub fn require(&self, columns: &[Column]) -> Result<()> {
    match columns.iter().find(|c| !self.has_column(**c)) {
      Some(missing) => Err(Error::ColumnMissing(*missing)),
      None => Ok(()),
    }
  }
}

impl<'a> IntoIterator for &'a IncidentTable {
  type IntoIter = std::slice::Iter<'a, IncidentRecord>;
  type Item = &'a IncidentRecord;

  fn into_iter(self) -> Self::IntoIter { self.records.iter() }
}
