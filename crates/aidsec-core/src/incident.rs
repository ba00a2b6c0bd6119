//! Incident records — one row of the source table.
//!
//! Records are immutable once loaded. Missing counts are stored as zero;
//! the dataset does not distinguish "no harm reported" from "not recorded",
//! and neither does this type.

use std::ops::AddAssign;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use crate::column::Category;

// ─── Harm ────────────────────────────────────────────────────────────────────

/// The three outcomes the dataset counts per incident.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  Display,
  EnumIter,
)]
#[serde(rename_all = "lowercase")]
pub enum HarmType {
  Killed,
  Wounded,
  Kidnapped,
}

/// Victim classification by employment origin.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  Display,
  EnumIter,
)]
#[serde(rename_all = "lowercase")]
pub enum StaffType {
  National,
  International,
}

/// Killed / wounded / kidnapped counts. Used both per record and as the
/// measure of harm-summing derivations.
#[derive(
  Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
pub struct HarmCounts {
  pub killed:    u64,
  pub wounded:   u64,
  pub kidnapped: u64,
}

impl HarmCounts {
  pub fn new(killed: u64, wounded: u64, kidnapped: u64) -> Self {
    Self {
      killed,
      wounded,
      kidnapped,
    }
  }

  /// Combined human impact: killed + wounded + kidnapped. Saturates at
  /// `u64::MAX`.
  pub fn total(&self) -> u64 {
    self
      .killed
      .saturating_add(self.wounded)
      .saturating_add(self.kidnapped)
  }

  pub fn get(&self, harm: HarmType) -> u64 {
    match harm {
      HarmType::Killed => self.killed,
      HarmType::Wounded => self.wounded,
      HarmType::Kidnapped => self.kidnapped,
    }
  }

  pub fn is_zero(&self) -> bool { self.total() == 0 }
}

/// Saturating: sums over huge counts stop at `u64::MAX` instead of wrapping.
impl AddAssign for HarmCounts {
  fn add_assign(&mut self, rhs: Self) {
    self.killed = self.killed.saturating_add(rhs.killed);
    self.wounded = self.wounded.saturating_add(rhs.wounded);
    self.kidnapped = self.kidnapped.saturating_add(rhs.kidnapped);
  }
}

// ─── IncidentRecord ──────────────────────────────────────────────────────────

/// One recorded security event.
///
/// Categorical fields are `None` when the cell was empty; such records are
/// left out of groupings on that field. A literal `"Unknown"` in the data is
/// an ordinary value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncidentRecord {
  pub year:                 Option<i32>,
  /// Calendar month, 1–12.
  pub month:                Option<u8>,
  pub country:              Option<String>,
  pub region:               Option<String>,
  pub means_of_attack:      Option<String>,
  /// Location type, e.g. "Road", "Project site".
  pub location:             Option<String>,
  /// Perpetrator classification.
  pub actor_type:           Option<String>,
  /// `Total killed` / `Total wounded` / `Total kidnapped`.
  pub harm:                 HarmCounts,
  pub total_nationals:      u64,
  pub total_internationals: u64,
  /// `Nationals killed` / `Nationals wounded` / `Nationals kidnapped`.
  pub nationals:            HarmCounts,
  /// `Internationals killed` / … breakdown.
  pub internationals:       HarmCounts,
}

impl IncidentRecord {
  /// The value of a categorical field, if recorded.
  pub fn category(&self, category: Category) -> Option<&str> {
    match category {
      Category::Country => self.country.as_deref(),
      Category::Region => self.region.as_deref(),
      Category::MeansOfAttack => self.means_of_attack.as_deref(),
      Category::Location => self.location.as_deref(),
      Category::ActorType => self.actor_type.as_deref(),
    }
  }

  /// Harm counts for one staff type.
  pub fn staff_harm(&self, staff: StaffType) -> HarmCounts {
    match staff {
      StaffType::National => self.nationals,
      StaffType::International => self.internationals,
    }
  }

  /// `(year, month)` when both are recorded and the month is valid.
  pub fn year_month(&self) -> Option<(i32, u8)> {
    match (self.year, self.month) {
      (Some(y), Some(m)) if (1..=12).contains(&m) => Some((y, m)),
      _ => None,
    }
  }

  /// `(year, quarter)` with quarter 1–4.
  pub fn year_quarter(&self) -> Option<(i32, u8)> {
    self.year_month().map(|(y, m)| (y, (m - 1) / 3 + 1))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn quarter_from_month() {
    let rec = |m| IncidentRecord {
      year: Some(2020),
      month: Some(m),
      ..Default::default()
    };
    assert_eq!(rec(1).year_quarter(), Some((2020, 1)));
    assert_eq!(rec(3).year_quarter(), Some((2020, 1)));
    assert_eq!(rec(4).year_quarter(), Some((2020, 2)));
    assert_eq!(rec(12).year_quarter(), Some((2020, 4)));
    assert_eq!(rec(13).year_quarter(), None);
  }

  #[test]
  fn year_month_requires_both() {
    let rec = IncidentRecord {
      month: Some(5),
      ..Default::default()
    };
    assert_eq!(rec.year_month(), None);
  }

  #[test]
  fn harm_accumulates() {
    let mut acc = HarmCounts::default();
    acc += HarmCounts::new(1, 2, 3);
    acc += HarmCounts::new(4, 0, 1);
    assert_eq!(acc, HarmCounts::new(5, 2, 4));
    assert_eq!(acc.total(), 11);
    assert_eq!(acc.get(HarmType::Wounded), 2);
  }

  #[test]
  fn harm_sums_saturate() {
    let big = i64::MAX as u64;
    let mut acc = HarmCounts::new(big, big, big);
    acc += HarmCounts::new(big, big, 1);
    assert_eq!(acc.killed, u64::MAX);
    assert_eq!(acc.kidnapped, big + 1);
    assert_eq!(acc.total(), u64::MAX);
  }
}
