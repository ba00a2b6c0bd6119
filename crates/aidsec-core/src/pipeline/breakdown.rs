//! Proportional breakdowns.
//!
//! Group shapes are fixed: every group carries every member, even when its
//! total is zero. Such groups report 0% throughout and are flagged
//! `data_poor`.

use strum::IntoEnumIterator;

use crate::{
  Result,
  column::{Category, Column},
  derived::ShareGroup,
  incident::{HarmCounts, HarmType, StaffType},
  pipeline::ranking::{category_harm, top_values},
  table::IncidentTable,
};

/// For each harm type, the national/international split of its victims.
pub fn staff_share_by_harm(table: &IncidentTable) -> Result<Vec<ShareGroup>> {
  table.require(&Column::STAFF_BREAKDOWN)?;

  let mut nationals = HarmCounts::default();
  let mut internationals = HarmCounts::default();
  for record in table {
    nationals += record.staff_harm(StaffType::National);
    internationals += record.staff_harm(StaffType::International);
  }

  Ok(
    HarmType::iter()
      .map(|harm| {
        ShareGroup::from_counts(harm.to_string(), [
          (StaffType::National.to_string(), nationals.get(harm)),
          (StaffType::International.to_string(), internationals.get(harm)),
        ])
      })
      .collect(),
  )
}

/// For the `k` most frequent values of `category`, the share of each harm
/// type in that value's combined harm.
pub fn harm_mix(
  table: &IncidentTable,
  category: Category,
  k: usize,
) -> Result<Vec<ShareGroup>> {
  let selected = top_values(table, category, k)?;
  let sums = category_harm(table, category, &selected)?;

  Ok(
    sums
      .into_iter()
      .map(|row| {
        let members = HarmType::iter()
          .map(|harm| (harm.to_string(), row.harm.get(harm)))
          .collect::<Vec<_>>();
        let group = ShareGroup::from_counts(row.value, members);
        if group.data_poor {
          tracing::debug!(group = %group.group, "harm mix group has no recorded harm");
        }
        group
      })
      .collect(),
  )
}
