//! Frequency rankings and per-category harm sums.
//!
//! Counting uses an insertion-ordered map and a stable sort, so categories
//! with equal counts keep the order in which they first appear in the table.
//! That order decides which tied values survive a top-N truncation.

use indexmap::IndexMap;

use crate::{
  Result,
  column::{Category, Column},
  derived::{CategoryCount, CategoryHarm},
  incident::HarmCounts,
  table::IncidentTable,
};

/// Incident count per category value, in first-appearance order.
pub(crate) fn tally(
  table: &IncidentTable,
  category: Category,
) -> IndexMap<&str, u64> {
  let mut counts: IndexMap<&str, u64> = IndexMap::new();
  for value in table.iter().filter_map(|r| r.category(category)) {
    *counts.entry(value).or_default() += 1;
  }
  counts
}

/// Every category value with its incident count, descending.
pub fn value_counts(
  table: &IncidentTable,
  category: Category,
) -> Result<Vec<CategoryCount>> {
  table.require(&[category.column()])?;
  let mut ranked: Vec<CategoryCount> = tally(table, category)
    .into_iter()
    .map(|(value, incidents)| CategoryCount {
      value: value.to_owned(),
      incidents,
    })
    .collect();
  ranked.sort_by(|a, b| b.incidents.cmp(&a.incidents));
  Ok(ranked)
}

/// The `n` most frequent category values, descending by count.
pub fn top_n(
  table: &IncidentTable,
  category: Category,
  n: usize,
) -> Result<Vec<CategoryCount>> {
  let mut ranked = value_counts(table, category)?;
  ranked.truncate(n);
  Ok(ranked)
}

/// Just the values of [`top_n`]; used to pre-select a subset for trend and
/// cross-tab derivations.
pub fn top_values(
  table: &IncidentTable,
  category: Category,
  k: usize,
) -> Result<Vec<String>> {
  Ok(
    top_n(table, category, k)?
      .into_iter()
      .map(|c| c.value)
      .collect(),
  )
}

/// Summed harm for each value in `selection`, in selection order. Values with
/// no matching record still get a (zero) row.
pub fn category_harm(
  table: &IncidentTable,
  category: Category,
  selection: &[String],
) -> Result<Vec<CategoryHarm>> {
  table.require(&[category.column()])?;
  table.require(&Column::HARM_TOTALS)?;

  let mut sums: IndexMap<&str, HarmCounts> = selection
    .iter()
    .map(|v| (v.as_str(), HarmCounts::default()))
    .collect();
  for record in table {
    if let Some(value) = record.category(category)
      && let Some(acc) = sums.get_mut(value)
    {
      *acc += record.harm;
    }
  }

  Ok(
    sums
      .into_iter()
      .map(|(value, harm)| CategoryHarm {
        value: value.to_owned(),
        harm,
        total: harm.total(),
      })
      .collect(),
  )
}

/// The `n` category values with the highest combined harm, descending by
/// total.
pub fn top_by_harm(
  table: &IncidentTable,
  category: Category,
  n: usize,
) -> Result<Vec<CategoryHarm>> {
  table.require(&[category.column()])?;
  table.require(&Column::HARM_TOTALS)?;

  let mut sums: IndexMap<&str, HarmCounts> = IndexMap::new();
  for record in table {
    if let Some(value) = record.category(category) {
      *sums.entry(value).or_default() += record.harm;
    }
  }

  let mut ranked: Vec<CategoryHarm> = sums
    .into_iter()
    .map(|(value, harm)| CategoryHarm {
      value: value.to_owned(),
      harm,
      total: harm.total(),
    })
    .collect();
  ranked.sort_by(|a, b| b.total.cmp(&a.total));
  ranked.truncate(n);
  Ok(ranked)
}
