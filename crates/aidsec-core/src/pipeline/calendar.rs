//! Monthly and quarterly buckets. Records need both a year and a valid month
//! (1–12) to be bucketed.

use std::collections::BTreeMap;

use crate::{
  Result,
  column::Column,
  derived::BucketCount,
  incident::IncidentRecord,
  table::IncidentTable,
};

fn bucket(
  table: &IncidentTable,
  key: impl Fn(&IncidentRecord) -> Option<(i32, u8)>,
  label: impl Fn(i32, u8) -> String,
) -> Result<Vec<BucketCount>> {
  table.require(&[Column::Year, Column::Month])?;
  let mut counts: BTreeMap<(i32, u8), u64> = BTreeMap::new();
  for k in table.iter().filter_map(key) {
    *counts.entry(k).or_default() += 1;
  }
  Ok(
    counts
      .into_iter()
      .map(|((year, period), incidents)| BucketCount {
        label: label(year, period),
        year,
        period,
        incidents,
      })
      .collect(),
  )
}

/// Incidents per calendar month, chronological.
pub fn monthly(table: &IncidentTable) -> Result<Vec<BucketCount>> {
  bucket(table, IncidentRecord::year_month, |y, m| format!("{y}-{m:02}"))
}

/// Incidents per calendar quarter, chronological.
pub fn quarterly(table: &IncidentTable) -> Result<Vec<BucketCount>> {
  bucket(table, IncidentRecord::year_quarter, |y, q| format!("{y}Q{q}"))
}
