//! Whole-table totals.

use std::collections::HashSet;

use strum::IntoEnumIterator;

use crate::{
  Result,
  column::Column,
  derived::{DatasetSummary, LabelTotal},
  incident::{HarmCounts, HarmType},
  table::IncidentTable,
};

/// Record count, year span, distinct countries and column coverage.
pub fn dataset_summary(table: &IncidentTable) -> DatasetSummary {
  let years = table.iter().filter_map(|r| r.year);
  let (first_year, last_year) = years.fold((None, None), |(lo, hi), y| {
    (
      Some(lo.map_or(y, |lo: i32| lo.min(y))),
      Some(hi.map_or(y, |hi: i32| hi.max(y))),
    )
  });
  let countries = table
    .iter()
    .filter_map(|r| r.country.as_deref())
    .collect::<HashSet<_>>()
    .len();

  DatasetSummary {
    records: table.len(),
    first_year,
    last_year,
    countries,
    columns: table.columns().collect(),
    missing_columns: table.missing_columns(),
  }
}

/// Victims by staff type: `Total nationals` against `Total internationals`.
pub fn staff_composition(table: &IncidentTable) -> Result<Vec<LabelTotal>> {
  table.require(&[Column::TotalNationals, Column::TotalInternationals])?;
  let (nationals, internationals) =
    table.iter().fold((0_u64, 0_u64), |(n, i), r| {
      (
        n.saturating_add(r.total_nationals),
        i.saturating_add(r.total_internationals),
      )
    });
  Ok(vec![
    LabelTotal {
      label: "National staff".into(),
      value: nationals,
    },
    LabelTotal {
      label: "International staff".into(),
      value: internationals,
    },
  ])
}

/// Whole-table killed / wounded / kidnapped.
pub fn harm_totals(table: &IncidentTable) -> Result<Vec<LabelTotal>> {
  table.require(&Column::HARM_TOTALS)?;
  let mut sum = HarmCounts::default();
  for record in table {
    sum += record.harm;
  }
  Ok(
    HarmType::iter()
      .map(|harm| LabelTotal {
        label: harm.to_string(),
        value: sum.get(harm),
      })
      .collect(),
  )
}
