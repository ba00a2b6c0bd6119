//! Derived tables — the output of the derivation pipeline.
//!
//! Every derived table is computed fresh from the incident table for one
//! chart and never mutated afterwards. Row types are plain data; ordering is
//! part of each derivation's contract (see [`crate::pipeline`]).

use serde::Serialize;

use crate::{column::Column, incident::HarmCounts};

// ─── Year-keyed rows ─────────────────────────────────────────────────────────

/// Incident count for one year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct YearCount {
  pub year:      i32,
  pub incidents: u64,
}

/// Summed harm for one year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct YearHarm {
  pub year: i32,
  #[serde(flatten)]
  pub harm: HarmCounts,
}

/// Combined impact (killed + wounded + kidnapped) for one year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct YearTotal {
  pub year:    i32,
  pub victims: u64,
}

// ─── Category-keyed rows ─────────────────────────────────────────────────────

/// Incident count for one category value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
  pub value:     String,
  pub incidents: u64,
}

/// Summed harm for one category value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryHarm {
  pub value: String,
  #[serde(flatten)]
  pub harm:  HarmCounts,
  pub total: u64,
}

/// Incident count for one (year, category value) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrendPoint {
  pub year:      i32,
  pub value:     String,
  pub incidents: u64,
}

/// Incident count for one (A, B) pair of category values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CrossCount {
  pub a:         String,
  pub b:         String,
  pub incidents: u64,
}

/// Summed harm for one (A, B) pair of category values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CrossHarm {
  pub a:    String,
  pub b:    String,
  #[serde(flatten)]
  pub harm: HarmCounts,
}

// ─── Proportional breakdown ──────────────────────────────────────────────────

/// One member of a proportional group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Share {
  pub label:   String,
  pub count:   u64,
  /// Percentage of the group total, 0–100. Zero when the group is data-poor.
  pub percent: f64,
}

/// A group whose shares sum to 100, or to 0 when its total is zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShareGroup {
  pub group:     String,
  pub total:     u64,
  /// The group total is zero, so every share is reported as 0.
  pub data_poor: bool,
  pub shares:    Vec<Share>,
}

impl ShareGroup {
  /// Build a group from `(label, count)` members.
  pub fn from_counts(
    group: impl Into<String>,
    members: impl IntoIterator<Item = (String, u64)>,
  ) -> Self {
    let members: Vec<(String, u64)> = members.into_iter().collect();
    let total = members
      .iter()
      .fold(0_u64, |acc, (_, c)| acc.saturating_add(*c));
    // Shares divide by the exact sum so they still add to 100 when `total`
    // saturates.
    let exact: f64 = members.iter().map(|(_, c)| *c as f64).sum();
    let shares = members
      .into_iter()
      .map(|(label, count)| Share {
        label,
        count,
        percent: if total == 0 {
          0.0
        } else {
          count as f64 / exact * 100.0
        },
      })
      .collect();
    Self {
      group: group.into(),
      total,
      data_poor: total == 0,
      shares,
    }
  }

  pub fn percent_sum(&self) -> f64 { self.shares.iter().map(|s| s.percent).sum() }
}

// ─── Time buckets ────────────────────────────────────────────────────────────

/// Incident count for one calendar month or quarter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BucketCount {
  /// `2020-03` for months, `2020Q1` for quarters.
  pub label:     String,
  pub year:      i32,
  /// Month (1–12) or quarter (1–4).
  pub period:    u8,
  pub incidents: u64,
}

// ─── Totals and summary ──────────────────────────────────────────────────────

/// A labelled whole-table total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelTotal {
  pub label: String,
  pub value: u64,
}

/// Headline figures for the introduction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatasetSummary {
  pub records:         usize,
  pub first_year:      Option<i32>,
  pub last_year:       Option<i32>,
  pub countries:       usize,
  pub columns:         Vec<Column>,
  pub missing_columns: Vec<Column>,
}

// ─── DerivedTable ────────────────────────────────────────────────────────────

/// The result of one derivation, tagged by shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "shape", content = "rows", rename_all = "snake_case")]
pub enum DerivedTable {
  YearCounts(Vec<YearCount>),
  YearHarm(Vec<YearHarm>),
  YearTotals(Vec<YearTotal>),
  Ranking(Vec<CategoryCount>),
  Trend(Vec<TrendPoint>),
  CrossCount(Vec<CrossCount>),
  CrossHarm(Vec<CrossHarm>),
  CategoryHarm(Vec<CategoryHarm>),
  Breakdown(Vec<ShareGroup>),
  TimeBuckets(Vec<BucketCount>),
  Totals(Vec<LabelTotal>),
  Summary(DatasetSummary),
}

impl DerivedTable {
  /// Number of rows (groups, for breakdowns). A summary counts as one row.
  pub fn len(&self) -> usize {
    match self {
      Self::YearCounts(r) => r.len(),
      Self::YearHarm(r) => r.len(),
      Self::YearTotals(r) => r.len(),
      Self::Ranking(r) => r.len(),
      Self::Trend(r) => r.len(),
      Self::CrossCount(r) => r.len(),
      Self::CrossHarm(r) => r.len(),
      Self::CategoryHarm(r) => r.len(),
      Self::Breakdown(r) => r.len(),
      Self::TimeBuckets(r) => r.len(),
      Self::Totals(r) => r.len(),
      Self::Summary(_) => 1,
    }
  }

  pub fn is_empty(&self) -> bool { self.len() == 0 }

  /// Short shape name, matching the serde tag.
  pub fn shape(&self) -> &'static str {
    match self {
      Self::YearCounts(_) => "year_counts",
      Self::YearHarm(_) => "year_harm",
      Self::YearTotals(_) => "year_totals",
      Self::Ranking(_) => "ranking",
      Self::Trend(_) => "trend",
      Self::CrossCount(_) => "cross_count",
      Self::CrossHarm(_) => "cross_harm",
      Self::CategoryHarm(_) => "category_harm",
      Self::Breakdown(_) => "breakdown",
      Self::TimeBuckets(_) => "time_buckets",
      Self::Totals(_) => "totals",
      Self::Summary(_) => "summary",
    }
  }
}
