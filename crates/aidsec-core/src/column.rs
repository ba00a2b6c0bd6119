//! The fixed column schema of the incident CSV.
//!
//! Column presence is checked per derivation rather than at load time: a
//! table without `Region` still renders every other chart.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, IntoEnumIterator, IntoStaticStr};

// ─── Column ──────────────────────────────────────────────────────────────────

/// A column of the source schema. The strum serialisation is the CSV header.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  PartialOrd,
  Ord,
  Hash,
  Serialize,
  Deserialize,
  Display,
  EnumIter,
  IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
pub enum Column {
  #[strum(serialize = "Year")]
  Year,
  #[strum(serialize = "Month")]
  Month,
  #[strum(serialize = "Country")]
  Country,
  #[strum(serialize = "Region")]
  Region,
  #[strum(serialize = "Means of attack")]
  MeansOfAttack,
  #[strum(serialize = "Location")]
  Location,
  #[strum(serialize = "Actor type")]
  ActorType,
  #[strum(serialize = "Total killed")]
  TotalKilled,
  #[strum(serialize = "Total wounded")]
  TotalWounded,
  #[strum(serialize = "Total kidnapped")]
  TotalKidnapped,
  #[strum(serialize = "Total nationals")]
  TotalNationals,
  #[strum(serialize = "Total internationals")]
  TotalInternationals,
  #[strum(serialize = "Nationals killed")]
  NationalsKilled,
  #[strum(serialize = "Internationals killed")]
  InternationalsKilled,
  #[strum(serialize = "Nationals wounded")]
  NationalsWounded,
  #[strum(serialize = "Internationals wounded")]
  InternationalsWounded,
  #[strum(serialize = "Nationals kidnapped")]
  NationalsKidnapped,
  #[strum(serialize = "Internationals kidnapped")]
  InternationalsKidnapped,
}

impl Column {
  /// The three per-incident harm totals.
  pub const HARM_TOTALS: [Column; 3] =
    [Column::TotalKilled, Column::TotalWounded, Column::TotalKidnapped];

  /// National/international splits of each harm total.
  pub const STAFF_BREAKDOWN: [Column; 6] = [
    Column::NationalsKilled,
    Column::InternationalsKilled,
    Column::NationalsWounded,
    Column::InternationalsWounded,
    Column::NationalsKidnapped,
    Column::InternationalsKidnapped,
  ];

  /// The CSV header text for this column.
  pub fn header(self) -> &'static str { self.into() }

  /// Match a CSV header cell. Case-insensitive, surrounding whitespace
  /// ignored. Returns `None` for columns outside the schema.
  pub fn from_header(header: &str) -> Option<Self> {
    let header = header.trim();
    Self::iter().find(|c| c.header().eq_ignore_ascii_case(header))
  }

  /// Whether the column holds a non-negative count.
  pub fn is_count(self) -> bool {
    !matches!(
      self,
      Self::Year
        | Self::Month
        | Self::Country
        | Self::Region
        | Self::MeansOfAttack
        | Self::Location
        | Self::ActorType
    )
  }
}

// ─── Category ────────────────────────────────────────────────────────────────

/// The categorical columns derivations group on.
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
#[serde(rename_all = "snake_case")]
pub enum Category {
  #[strum(serialize = "Country")]
  Country,
  #[strum(serialize = "Region")]
  Region,
  #[strum(serialize = "Means of attack")]
  MeansOfAttack,
  #[strum(serialize = "Location")]
  Location,
  #[strum(serialize = "Actor type")]
  ActorType,
}

impl Category {
  pub fn column(self) -> Column {
    match self {
      Self::Country => Column::Country,
      Self::Region => Column::Region,
      Self::MeansOfAttack => Column::MeansOfAttack,
      Self::Location => Column::Location,
      Self::ActorType => Column::ActorType,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn headers_match_case_insensitively() {
    assert_eq!(Column::from_header("Means of attack"), Some(Column::MeansOfAttack));
    assert_eq!(Column::from_header("  actor TYPE "), Some(Column::ActorType));
    assert_eq!(Column::from_header("Incident ID"), None);
  }

  #[test]
  fn every_category_maps_to_a_categorical_column() {
    for category in Category::iter() {
      assert!(!category.column().is_count(), "{category}");
      assert_eq!(category.to_string(), category.column().header());
    }
  }

  #[test]
  fn harm_columns_are_counts() {
    assert!(Column::HARM_TOTALS.iter().all(|c| c.is_count()));
    assert!(Column::STAFF_BREAKDOWN.iter().all(|c| c.is_count()));
    assert!(!Column::Year.is_count());
  }
}
