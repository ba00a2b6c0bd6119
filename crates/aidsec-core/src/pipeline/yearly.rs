//! Year-keyed derivations. Output is ascending by year; records without a
//! year are left out.

use std::collections::BTreeMap;

use crate::{
  Result,
  column::{Category, Column},
  derived::{TrendPoint, YearCount, YearHarm, YearTotal},
  incident::HarmCounts,
  pipeline::ranking::top_values,
  table::IncidentTable,
};

/// Number of incidents per year.
pub fn incidents_per_year(table: &IncidentTable) -> Result<Vec<YearCount>> {
  table.require(&[Column::Year])?;
  let mut counts: BTreeMap<i32, u64> = BTreeMap::new();
  for year in table.iter().filter_map(|r| r.year) {
    *counts.entry(year).or_default() += 1;
  }
  Ok(
    counts
      .into_iter()
      .map(|(year, incidents)| YearCount { year, incidents })
      .collect(),
  )
}

fn harm_per_year(table: &IncidentTable) -> Result<BTreeMap<i32, HarmCounts>> {
  table.require(&[Column::Year])?;
  table.require(&Column::HARM_TOTALS)?;
  let mut sums: BTreeMap<i32, HarmCounts> = BTreeMap::new();
  for record in table {
    if let Some(year) = record.year {
      *sums.entry(year).or_default() += record.harm;
    }
  }
  Ok(sums)
}

/// Killed, wounded and kidnapped summed per year.
pub fn severity_by_year(table: &IncidentTable) -> Result<Vec<YearHarm>> {
  Ok(
    harm_per_year(table)?
      .into_iter()
      .map(|(year, harm)| YearHarm { year, harm })
      .collect(),
  )
}

/// Killed + wounded + kidnapped per year.
pub fn impact_by_year(table: &IncidentTable) -> Result<Vec<YearTotal>> {
  Ok(
    harm_per_year(table)?
      .into_iter()
      .map(|(year, harm)| YearTotal {
        year,
        victims: harm.total(),
      })
      .collect(),
  )
}

/// Incidents per (year, value) for the `k` most frequent values of
/// `category`. Sorted by year, then by the value's global rank. Pairs with
/// no incidents are absent.
pub fn category_trend(
  table: &IncidentTable,
  category: Category,
  k: usize,
) -> Result<Vec<TrendPoint>> {
  table.require(&[Column::Year])?;
  let selected = top_values(table, category, k)?;

  let mut counts: BTreeMap<(i32, usize), u64> = BTreeMap::new();
  for record in table {
    let (Some(year), Some(value)) = (record.year, record.category(category))
    else {
      continue;
    };
    if let Some(rank) = selected.iter().position(|s| s == value) {
      *counts.entry((year, rank)).or_default() += 1;
    }
  }

  Ok(
    counts
      .into_iter()
      .map(|((year, rank), incidents)| TrendPoint {
        year,
        value: selected[rank].clone(),
        incidents,
      })
      .collect(),
  )
}
