//! Two-way cross-tabulations. Rows come out in first-appearance order; the
//! consumer pivots them as it needs.

use indexmap::IndexMap;

use crate::{
  Result,
  column::{Category, Column},
  derived::{CrossCount, CrossHarm},
  incident::HarmCounts,
  table::IncidentTable,
};

/// Incidents per (a, b) value pair. With `restrict_a`, only records whose
/// `a` value is in the list are counted. Records missing either value are
/// skipped.
pub fn cross_count(
  table: &IncidentTable,
  a: Category,
  b: Category,
  restrict_a: Option<&[String]>,
) -> Result<Vec<CrossCount>> {
  table.require(&[a.column(), b.column()])?;

  let mut counts: IndexMap<(&str, &str), u64> = IndexMap::new();
  for record in table {
    let (Some(va), Some(vb)) = (record.category(a), record.category(b)) else {
      continue;
    };
    if let Some(allowed) = restrict_a
      && !allowed.iter().any(|s| s == va)
    {
      continue;
    }
    *counts.entry((va, vb)).or_default() += 1;
  }

  Ok(
    counts
      .into_iter()
      .map(|((a, b), incidents)| CrossCount {
        a: a.to_owned(),
        b: b.to_owned(),
        incidents,
      })
      .collect(),
  )
}

/// Killed / wounded / kidnapped summed per (a, b) value pair.
pub fn cross_harm(
  table: &IncidentTable,
  a: Category,
  b: Category,
) -> Result<Vec<CrossHarm>> {
  table.require(&[a.column(), b.column()])?;
  table.require(&Column::HARM_TOTALS)?;

  let mut sums: IndexMap<(&str, &str), HarmCounts> = IndexMap::new();
  for record in table {
    if let (Some(va), Some(vb)) = (record.category(a), record.category(b)) {
      *sums.entry((va, vb)).or_default() += record.harm;
    }
  }

  Ok(
    sums
      .into_iter()
      .map(|((a, b), harm)| CrossHarm {
        a: a.to_owned(),
        b: b.to_owned(),
        harm,
      })
      .collect(),
  )
}
