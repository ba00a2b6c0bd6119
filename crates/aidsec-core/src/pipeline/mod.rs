//! The derivation pipeline: a fixed catalog of named aggregations over the
//! incident table.
//!
//! Every derivation is a pure function of the table. None reads another's
//! output, so running one twice on the same table yields identical results.
//! Failure is limited to [`Error::ColumnMissing`] when the table lacks a
//! required column and [`Error::EmptyGroup`] when nothing was left to group.
//!
//! | Kind | Ordering |
//! |------|----------|
//! | per-year counts and sums | ascending year |
//! | top-N rankings | descending count, ties in first-appearance order |
//! | category trends | ascending year, then category rank |
//! | cross-tabulations | first-appearance order |
//! | proportional breakdowns | fixed member order |
//! | month / quarter buckets | chronological |

pub mod breakdown;
pub mod calendar;
pub mod cross;
pub mod ranking;
pub mod summary;
pub mod yearly;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::{
  Result,
  column::{Category, Column},
  derived::DerivedTable,
  error::Error,
  table::IncidentTable,
};

pub use breakdown::{harm_mix, staff_share_by_harm};
pub use calendar::{monthly, quarterly};
pub use cross::{cross_count, cross_harm};
pub use ranking::{category_harm, top_by_harm, top_n, top_values, value_counts};
pub use summary::{dataset_summary, harm_totals, staff_composition};
pub use yearly::{
  category_trend, impact_by_year, incidents_per_year, severity_by_year,
};

// ─── Catalog parameters ──────────────────────────────────────────────────────

pub const TOP_COUNTRIES: usize = 10;
pub const TREND_COUNTRIES: usize = 6;
pub const TOP_ATTACK_METHODS: usize = 10;
/// Attack methods kept for the location cross-tab and the trend chart.
pub const ATTACK_SUBSET: usize = 6;
pub const HARM_COUNTRIES: usize = 5;
pub const TOP_ACTOR_TYPES: usize = 10;
pub const HARM_ACTORS: usize = 5;

// ─── Derivation ──────────────────────────────────────────────────────────────

/// One named derivation; each feeds exactly one chart.
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
  EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Derivation {
  DatasetSummary,
  IncidentsPerYear,
  SeverityByYear,
  ImpactByYear,
  TopCountries,
  CountryTrends,
  RegionalDistribution,
  CountryMap,
  TopAttackMethods,
  AttackByLocation,
  AttackLocationTree,
  AttackTrends,
  StaffComposition,
  HarmTotals,
  StaffShareByHarm,
  TopCountriesByHarm,
  TopActorTypes,
  HarmByActor,
  HarmMixByActor,
  CountryActor,
  MonthlyIncidents,
  QuarterlyIncidents,
  CountryAttackSeverity,
}

impl Derivation {
  /// Columns that must be present for this derivation to run.
  pub fn required_columns(self) -> &'static [Column] {
    use Column as C;
    match self {
      Self::DatasetSummary => &[],
      Self::IncidentsPerYear => &[C::Year],
      Self::SeverityByYear | Self::ImpactByYear => {
        &[C::Year, C::TotalKilled, C::TotalWounded, C::TotalKidnapped]
      }
      Self::TopCountries | Self::CountryMap => &[C::Country],
      Self::CountryTrends => &[C::Year, C::Country],
      Self::RegionalDistribution => &[C::Region],
      Self::TopAttackMethods => &[C::MeansOfAttack],
      Self::AttackByLocation | Self::AttackLocationTree => {
        &[C::MeansOfAttack, C::Location]
      }
      Self::AttackTrends => &[C::Year, C::MeansOfAttack],
      Self::StaffComposition => &[C::TotalNationals, C::TotalInternationals],
      Self::HarmTotals => &Column::HARM_TOTALS,
      Self::StaffShareByHarm => &Column::STAFF_BREAKDOWN,
      Self::TopCountriesByHarm => {
        &[C::Country, C::TotalKilled, C::TotalWounded, C::TotalKidnapped]
      }
      Self::TopActorTypes => &[C::ActorType],
      Self::HarmByActor | Self::HarmMixByActor => {
        &[C::ActorType, C::TotalKilled, C::TotalWounded, C::TotalKidnapped]
      }
      Self::CountryActor => &[C::Country, C::ActorType],
      Self::MonthlyIncidents | Self::QuarterlyIncidents => &[C::Year, C::Month],
      Self::CountryAttackSeverity => {
        &[
          C::Country,
          C::MeansOfAttack,
          C::TotalKilled,
          C::TotalWounded,
          C::TotalKidnapped,
        ]
      }
    }
  }

  /// Run the derivation against `table`.
  pub fn run(self, table: &IncidentTable) -> Result<DerivedTable> {
    table.require(self.required_columns())?;

    let derived = match self {
      Self::DatasetSummary => DerivedTable::Summary(dataset_summary(table)),
      Self::IncidentsPerYear => {
        DerivedTable::YearCounts(incidents_per_year(table)?)
      }
      Self::SeverityByYear => DerivedTable::YearHarm(severity_by_year(table)?),
      Self::ImpactByYear => DerivedTable::YearTotals(impact_by_year(table)?),
      Self::TopCountries => {
        DerivedTable::Ranking(top_n(table, Category::Country, TOP_COUNTRIES)?)
      }
      Self::CountryTrends => DerivedTable::Trend(category_trend(
        table,
        Category::Country,
        TREND_COUNTRIES,
      )?),
      Self::RegionalDistribution => {
        DerivedTable::Ranking(value_counts(table, Category::Region)?)
      }
      Self::CountryMap => {
        DerivedTable::Ranking(value_counts(table, Category::Country)?)
      }
      Self::TopAttackMethods => DerivedTable::Ranking(top_n(
        table,
        Category::MeansOfAttack,
        TOP_ATTACK_METHODS,
      )?),
      Self::AttackByLocation | Self::AttackLocationTree => {
        let methods =
          top_values(table, Category::MeansOfAttack, ATTACK_SUBSET)?;
        DerivedTable::CrossCount(cross_count(
          table,
          Category::MeansOfAttack,
          Category::Location,
          Some(&methods),
        )?)
      }
      Self::AttackTrends => DerivedTable::Trend(category_trend(
        table,
        Category::MeansOfAttack,
        ATTACK_SUBSET,
      )?),
      Self::StaffComposition => DerivedTable::Totals(staff_composition(table)?),
      Self::HarmTotals => DerivedTable::Totals(harm_totals(table)?),
      Self::StaffShareByHarm => {
        DerivedTable::Breakdown(staff_share_by_harm(table)?)
      }
      Self::TopCountriesByHarm => DerivedTable::CategoryHarm(top_by_harm(
        table,
        Category::Country,
        HARM_COUNTRIES,
      )?),
      Self::TopActorTypes => DerivedTable::Ranking(top_n(
        table,
        Category::ActorType,
        TOP_ACTOR_TYPES,
      )?),
      Self::HarmByActor => {
        let actors = top_values(table, Category::ActorType, HARM_ACTORS)?;
        DerivedTable::CategoryHarm(category_harm(
          table,
          Category::ActorType,
          &actors,
        )?)
      }
      Self::HarmMixByActor => DerivedTable::Breakdown(harm_mix(
        table,
        Category::ActorType,
        HARM_ACTORS,
      )?),
      Self::CountryActor => DerivedTable::CrossCount(cross_count(
        table,
        Category::Country,
        Category::ActorType,
        None,
      )?),
      Self::MonthlyIncidents => DerivedTable::TimeBuckets(monthly(table)?),
      Self::QuarterlyIncidents => DerivedTable::TimeBuckets(quarterly(table)?),
      Self::CountryAttackSeverity => DerivedTable::CrossHarm(cross_harm(
        table,
        Category::Country,
        Category::MeansOfAttack,
      )?),
    };

    if derived.is_empty() {
      return Err(Error::EmptyGroup(self));
    }
    Ok(derived)
  }
}
