//! Rendering a section: run each panel's derivation and record the outcome.
//!
//! A panel whose derivation fails is not an error for the section. Missing
//! columns become a visible notice, empty groupings a placeholder, and every
//! other panel renders as usual.

use serde::Serialize;

use crate::{
  column::Column,
  derived::DerivedTable,
  error::Error,
  narrative::{self, Block},
  pipeline::Derivation,
  section::{PanelSpec, SectionId, VictimView},
  table::IncidentTable,
};

// ─── Panel ───────────────────────────────────────────────────────────────────

/// Outcome of one panel's derivation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PanelStatus {
  Ready {
    table:   DerivedTable,
    /// Sentence computed from the table, shown under the chart.
    caption: Option<String>,
  },
  /// The derivation had nothing to group; draw a placeholder.
  Empty { message: String },
  /// A required column is absent; draw the notice instead of the chart.
  Unavailable { column: Column, notice: String },
}

impl PanelStatus {
  pub(crate) fn from_result(
    derivation: Derivation,
    result: crate::Result<DerivedTable>,
  ) -> Self {
    match result {
      Ok(table) => {
        let caption = caption(derivation, &table);
        Self::Ready { table, caption }
      }
      Err(Error::ColumnMissing(column)) => {
        tracing::warn!(%derivation, %column, "panel skipped: column missing");
        Self::Unavailable {
          column,
          notice: format!("'{column}' column not found in the dataset. View skipped."),
        }
      }
      Err(Error::EmptyGroup(_)) => {
        tracing::debug!(%derivation, "panel has no rows");
        Self::Empty {
          message: "No incidents to show for this view.".into(),
        }
      }
      // Derivations never raise this; a source failure stops the load
      // before any panel runs.
      Err(err @ Error::DataUnavailable(_)) => {
        tracing::warn!(%derivation, error = %err, "panel failed");
        Self::Empty {
          message: err.to_string(),
        }
      }
    }
  }
}

/// One rendered chart slot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Panel {
  pub spec:   PanelSpec,
  #[serde(flatten)]
  pub status: PanelStatus,
}

impl Panel {
  /// Run `spec`'s derivation against `table`.
  pub fn render(table: &IncidentTable, spec: PanelSpec) -> Self {
    let status =
      PanelStatus::from_result(spec.derivation, spec.derivation.run(table));
    Self { spec, status }
  }

  pub fn table(&self) -> Option<&DerivedTable> {
    match &self.status {
      PanelStatus::Ready { table, .. } => Some(table),
      _ => None,
    }
  }

  pub fn is_ready(&self) -> bool { self.table().is_some() }
}

// ─── SectionView ─────────────────────────────────────────────────────────────

/// A fully rendered section, ready for a presentation sink.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionView {
  pub id:      SectionId,
  pub title:   &'static str,
  pub heading: &'static str,
  pub icon:    &'static str,
  pub view:    VictimView,
  pub intro:   &'static [&'static str],
  pub panels:  Vec<Panel>,
  pub closing: &'static [Block],
}

impl SectionView {
  /// Panels that could not be drawn because of missing columns.
  pub fn notices(&self) -> impl Iterator<Item = &str> {
    self.panels.iter().filter_map(|p| match &p.status {
      PanelStatus::Unavailable { notice, .. } => Some(notice.as_str()),
      _ => None,
    })
  }
}

/// Render section `id` from `table`. Derivations run sequentially, each
/// independently of the others.
pub fn render_section(
  table: &IncidentTable,
  id: SectionId,
  view: VictimView,
) -> SectionView {
  let panels: Vec<Panel> = id
    .panels(view)
    .into_iter()
    .map(|spec| Panel::render(table, spec))
    .collect();

  tracing::debug!(
    section = %id,
    %view,
    panels = panels.len(),
    ready = panels.iter().filter(|p| p.is_ready()).count(),
    "section rendered"
  );

  SectionView {
    id,
    title: id.title(),
    heading: id.heading(),
    icon: id.icon(),
    view,
    intro: narrative::intro(id),
    panels,
    closing: narrative::closing(id),
  }
}

// ─── Captions ────────────────────────────────────────────────────────────────

fn caption(derivation: Derivation, table: &DerivedTable) -> Option<String> {
  match (derivation, table) {
    (Derivation::DatasetSummary, DerivedTable::Summary(s)) => {
      let span = match (s.first_year, s.last_year) {
        (Some(a), Some(b)) => format!(" from {a} to {b}"),
        _ => String::new(),
      };
      Some(format!(
        "{} documented incidents{span} across {} countries.",
        s.records, s.countries
      ))
    }
    (Derivation::StaffComposition, DerivedTable::Totals(rows)) => {
      let nationals = rows.first()?.value;
      let total = rows
        .iter()
        .fold(0_u64, |acc, r| acc.saturating_add(r.value));
      if total == 0 {
        return Some("No victims are recorded by staff type.".into());
      }
      let pct = nationals as f64 / total as f64 * 100.0;
      Some(format!(
        "Among the {total} recorded aid worker victims, {pct:.1}% are \
         national staff."
      ))
    }
    (_, DerivedTable::Breakdown(groups)) => {
      let poor: Vec<&str> = groups
        .iter()
        .filter(|g| g.data_poor)
        .map(|g| g.group.as_str())
        .collect();
      (!poor.is_empty()).then(|| {
        format!("No harm recorded for: {}. Shown as 0%.", poor.join(", "))
      })
    }
    _ => None,
  }
}
