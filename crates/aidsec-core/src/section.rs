//! Navigation sections and the panels each one shows.
//!
//! A section is identified by [`SectionId`]; its handler is
//! [`SectionId::panels`], which lists the derivations to run and how each
//! result should be charted. Display titles and icons are presentation only.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

use crate::pipeline::Derivation;

// ─── SectionId ───────────────────────────────────────────────────────────────

/// The eight dashboard sections, in navigation order.
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
pub enum SectionId {
  Introduction,
  YearlyTrends,
  GeographicPatterns,
  AttackTypes,
  VictimProfiles,
  PerpetratorAnalysis,
  TimeCrossAnalysis,
  Conclusion,
}

impl SectionId {
  pub fn all() -> Vec<SectionId> { Self::iter().collect() }

  /// Sidebar label.
  pub fn title(self) -> &'static str {
    match self {
      Self::Introduction => "Introduction",
      Self::YearlyTrends => "Yearly Trends",
      Self::GeographicPatterns => "Geographic Patterns",
      Self::AttackTypes => "Attack Types",
      Self::VictimProfiles => "Victim Profiles",
      Self::PerpetratorAnalysis => "Perpetrator Analysis",
      Self::TimeCrossAnalysis => "Time & Cross Analysis",
      Self::Conclusion => "Conclusion & Recommendations",
    }
  }

  pub fn icon(self) -> &'static str {
    match self {
      Self::Introduction => "🏁",
      Self::YearlyTrends => "📅",
      Self::GeographicPatterns => "🌍",
      Self::AttackTypes => "⚔️",
      Self::VictimProfiles => "🧍",
      Self::PerpetratorAnalysis => "🧨",
      Self::TimeCrossAnalysis => "🔁",
      Self::Conclusion => "✅",
    }
  }

  /// Page heading.
  pub fn heading(self) -> &'static str {
    match self {
      Self::Introduction => "Aid Worker Security Incidents Dashboard",
      Self::YearlyTrends => "How Have Security Incidents Evolved Over Time?",
      Self::GeographicPatterns => {
        "Which Countries and Regions Are Most Affected?"
      }
      Self::AttackTypes => "What Types of Attacks Are Most Common?",
      Self::VictimProfiles => "Who Are the Victims?",
      Self::PerpetratorAnalysis => "Who Are the Perpetrators?",
      Self::TimeCrossAnalysis => "Time Trends & Cross-Dimensional Insights",
      Self::Conclusion => "Conclusions & Recommendations",
    }
  }

  /// Zero-based navigation position.
  pub fn position(self) -> usize {
    Self::iter().position(|s| s == self).unwrap_or_default()
  }

  /// The following section, wrapping to the first.
  pub fn next(self) -> Self {
    let all = Self::all();
    all[(self.position() + 1) % all.len()]
  }

  /// The preceding section, wrapping to the last.
  pub fn prev(self) -> Self {
    let all = Self::all();
    all[(self.position() + all.len() - 1) % all.len()]
  }

  /// The panels this section renders, in order. Only the victim profile
  /// section looks at `view`.
  pub fn panels(self, view: VictimView) -> Vec<PanelSpec> {
    match self {
      Self::Introduction => introduction(),
      Self::YearlyTrends => yearly_trends(),
      Self::GeographicPatterns => geographic_patterns(),
      Self::AttackTypes => attack_types(),
      Self::VictimProfiles => victim_profiles(view),
      Self::PerpetratorAnalysis => perpetrator_analysis(),
      Self::TimeCrossAnalysis => time_cross_analysis(),
      Self::Conclusion => Vec::new(),
    }
  }
}

// ─── VictimView ──────────────────────────────────────────────────────────────

/// The in-section toggle of the victim profile section.
#[derive(
  Debug,
  Clone,
  Copy,
  Default,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  Display,
  EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum VictimView {
  /// Absolute killed / wounded / kidnapped totals.
  #[default]
  Total,
  /// National vs. international share of each harm type.
  Proportional,
}

impl VictimView {
  pub fn toggled(self) -> Self {
    match self {
      Self::Total => Self::Proportional,
      Self::Proportional => Self::Total,
    }
  }

  pub fn label(self) -> &'static str {
    match self {
      Self::Total => "Total Count View",
      Self::Proportional => "Proportional View",
    }
  }
}

// ─── Chart description ───────────────────────────────────────────────────────

/// How a derived table should be drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
  SummaryCard,
  Line,
  MultiLine,
  Bar,
  StackedBar,
  GroupedBar,
  HorizontalBar,
  PercentStackedBar,
  Donut,
  Choropleth,
  Treemap,
  DensityHeatmap,
  /// Stacked area normalised to the share of each year's total.
  NormalizedArea,
  Bubble,
}

/// Presentation hints handed to the sink alongside the derived table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChartStyle {
  /// Continuous colour scale name (e.g. `"Reds"`), for value-coloured charts.
  pub color_scale: Option<&'static str>,
  /// Discrete colours, for series-coloured charts.
  pub palette:     &'static [&'static str],
  pub x_title:     &'static str,
  pub y_title:     &'static str,
  pub height:      u16,
}

impl ChartStyle {
  pub fn axes(x_title: &'static str, y_title: &'static str) -> Self {
    Self {
      color_scale: None,
      palette: &[],
      x_title,
      y_title,
      height: 450,
    }
  }

  pub fn scale(mut self, name: &'static str) -> Self {
    self.color_scale = Some(name);
    self
  }

  pub fn palette(mut self, colors: &'static [&'static str]) -> Self {
    self.palette = colors;
    self
  }

  pub fn height(mut self, height: u16) -> Self {
    self.height = height;
    self
  }
}

pub const SEVERITY_COLORS: &[&str] = &["#e63946", "#f4a261", "#457b9d"];
pub const HARM_COLORS: &[&str] = &["#d62728", "#1f77b4", "#2ca02c"];
pub const STAFF_COLORS: &[&str] = &["#66c2a5", "#fc8d62"];
pub const QUALITATIVE: &[&str] = &[
  "#66c2a5", "#fc8d62", "#8da0cb", "#e78ac3", "#a6d854", "#ffd92f",
  "#e5c494", "#b3b3b3",
];

/// One chart slot of a section.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PanelSpec {
  pub derivation: Derivation,
  pub chart:      ChartKind,
  /// Subheading shown above the chart.
  pub heading:    &'static str,
  /// Chart title.
  pub title:      &'static str,
  pub style:      ChartStyle,
  /// Bullet points shown under the chart.
  pub notes:      &'static [&'static str],
}

impl PanelSpec {
  fn new(
    derivation: Derivation,
    chart: ChartKind,
    heading: &'static str,
    title: &'static str,
    style: ChartStyle,
  ) -> Self {
    Self {
      derivation,
      chart,
      heading,
      title,
      style,
      notes: &[],
    }
  }

  fn notes(mut self, notes: &'static [&'static str]) -> Self {
    self.notes = notes;
    self
  }
}

// ─── Section handlers ────────────────────────────────────────────────────────

fn introduction() -> Vec<PanelSpec> {
  vec![PanelSpec::new(
    Derivation::DatasetSummary,
    ChartKind::SummaryCard,
    "Dataset Summary",
    "Dataset Summary",
    ChartStyle::axes("", "").height(0),
  )]
}

fn yearly_trends() -> Vec<PanelSpec> {
  vec![
    PanelSpec::new(
      Derivation::IncidentsPerYear,
      ChartKind::Line,
      "Total Incidents per Year",
      "Number of Incidents per Year",
      ChartStyle::axes("Year", "Number of Incidents")
        .palette(&["#2a9d8f"])
        .height(400),
    )
    .notes(&[
      "Recorded attacks rose steadily through the 2000s.",
      "The mid-2010s are volatile, tracking escalating regional conflicts.",
      "A drop in the latest year usually reflects incomplete reporting.",
    ]),
    PanelSpec::new(
      Derivation::SeverityByYear,
      ChartKind::StackedBar,
      "Deaths, Wounds, and Kidnappings per Year",
      "Severity of Incidents by Year",
      ChartStyle::axes("Year", "Total Victims").palette(SEVERITY_COLORS),
    )
    .notes(&[
      "Killed and wounded counts vary sharply from year to year.",
      "Kidnappings are steadier, with peaks tied to specific crises.",
    ]),
    PanelSpec::new(
      Derivation::ImpactByYear,
      ChartKind::Line,
      "Total Victims per Year (Killed + Wounded + Kidnapped)",
      "Combined Human Impact per Year",
      ChartStyle::axes("Year", "Total Victims")
        .palette(&["#1d3557"])
        .height(400),
    )
    .notes(&[
      "Combining outcomes shows the total human cost of each year.",
      "Years with many incidents are not always the deadliest per attack.",
    ]),
  ]
}

fn geographic_patterns() -> Vec<PanelSpec> {
  vec![
    PanelSpec::new(
      Derivation::TopCountries,
      ChartKind::HorizontalBar,
      "Top 10 Countries by Incident Count",
      "Top 10 Most Affected Countries",
      ChartStyle::axes("Number of Incidents", "Country")
        .palette(&["#e76f51"]),
    )
    .notes(&[
      "A handful of protracted conflict settings account for a \
       disproportionate share of attacks.",
    ]),
    PanelSpec::new(
      Derivation::CountryTrends,
      ChartKind::MultiLine,
      "Incident Trends in Top Countries Over Time",
      "Incident Trends Over Time in Most Affected Countries",
      ChartStyle::axes("Year", "Incidents").palette(QUALITATIVE),
    )
    .notes(&[
      "Country curves follow political events: surges line up with the \
       outbreak or escalation of conflicts.",
    ]),
    PanelSpec::new(
      Derivation::RegionalDistribution,
      ChartKind::HorizontalBar,
      "Regional Distribution of Incidents",
      "Total Incidents by Region",
      ChartStyle::axes("Incidents", "Region").scale("Blues"),
    )
    .notes(&[
      "Sub-national hotspots stand out even inside high-risk countries.",
    ]),
    PanelSpec::new(
      Derivation::CountryMap,
      ChartKind::Choropleth,
      "Interactive World Map of Incidents",
      "Total Incidents by Country",
      ChartStyle::axes("", "").scale("Reds").height(500),
    ),
  ]
}

fn attack_types() -> Vec<PanelSpec> {
  vec![
    PanelSpec::new(
      Derivation::TopAttackMethods,
      ChartKind::HorizontalBar,
      "Most Common Means of Attack",
      "Top 10 Attack Methods",
      ChartStyle::axes("Count", "Means of Attack").scale("Oranges"),
    ),
    PanelSpec::new(
      Derivation::AttackByLocation,
      ChartKind::GroupedBar,
      "Attack Methods by Location Type",
      "Top Attack Methods Across Locations",
      ChartStyle::axes("Means of Attack", "Number of Incidents")
        .palette(QUALITATIVE),
    ),
    PanelSpec::new(
      Derivation::AttackLocationTree,
      ChartKind::Treemap,
      "Treemap: Attack Methods and Locations",
      "Attack Methods and Locations",
      ChartStyle::axes("", "").palette(QUALITATIVE).height(500),
    ),
    PanelSpec::new(
      Derivation::AttackTrends,
      ChartKind::NormalizedArea,
      "How Have Attack Methods Changed Over Time?",
      "Trends of Attack Methods Over Time",
      ChartStyle::axes("Year", "Share of Incidents").palette(QUALITATIVE),
    ),
  ]
}

fn victim_profiles(view: VictimView) -> Vec<PanelSpec> {
  let breakdown = match view {
    VictimView::Total => PanelSpec::new(
      Derivation::HarmTotals,
      ChartKind::Bar,
      "Victim Type Breakdown: Total vs Proportional",
      "Total Number of Victims by Type",
      ChartStyle::axes("Victim Type", "Number of Victims")
        .palette(HARM_COLORS),
    )
    .notes(&["Killings and injuries account for most victimisation."]),
    VictimView::Proportional => PanelSpec::new(
      Derivation::StaffShareByHarm,
      ChartKind::PercentStackedBar,
      "Victim Type Breakdown: Total vs Proportional",
      "Relative Victim Composition by Staff Type",
      ChartStyle::axes("Harm Type", "Percentage (%)").palette(STAFF_COLORS),
    )
    .notes(&[
      "National staff make up the large majority in every harm category.",
      "International staff are relatively more exposed to kidnapping.",
    ]),
  };

  vec![
    PanelSpec::new(
      Derivation::StaffComposition,
      ChartKind::Donut,
      "National vs International Staff",
      "Victim Composition by Staff Type",
      ChartStyle::axes("", "").palette(STAFF_COLORS).height(400),
    ),
    breakdown,
    PanelSpec::new(
      Derivation::SeverityByYear,
      ChartKind::MultiLine,
      "Trends Over Time (by Harm Type)",
      "Victim Harm Types Over Time",
      ChartStyle::axes("Year", "Number of Victims").palette(HARM_COLORS),
    ),
    PanelSpec::new(
      Derivation::TopCountriesByHarm,
      ChartKind::GroupedBar,
      "Top 5 Countries by Harm Type",
      "Top 5 Countries: Victim Breakdown by Harm Type",
      ChartStyle::axes("Number of Victims", "Country")
        .palette(QUALITATIVE)
        .height(500),
    )
    .notes(&[
      "Each of the most affected countries has a distinct harm profile, \
       which argues for country-specific response plans.",
    ]),
  ]
}

fn perpetrator_analysis() -> Vec<PanelSpec> {
  vec![
    PanelSpec::new(
      Derivation::TopActorTypes,
      ChartKind::HorizontalBar,
      "Perpetrator Types",
      "Top Perpetrator Types",
      ChartStyle::axes("Count", "Actor Type").scale("Inferno"),
    )
    .notes(&[
      "A large share of incidents is attributed to unknown actors, which \
       makes targeted mitigation harder.",
    ]),
    PanelSpec::new(
      Derivation::HarmByActor,
      ChartKind::StackedBar,
      "Harm Caused by Top Perpetrator Types",
      "Top Perpetrators: Harm Type Distribution",
      ChartStyle::axes("Count", "Actor Type").palette(QUALITATIVE),
    ),
    PanelSpec::new(
      Derivation::HarmMixByActor,
      ChartKind::PercentStackedBar,
      "Harm Mix by Perpetrator Type",
      "Share of Each Harm Type per Perpetrator",
      ChartStyle::axes("Actor Type", "Percentage (%)").palette(HARM_COLORS),
    ),
    PanelSpec::new(
      Derivation::CountryActor,
      ChartKind::Bubble,
      "Perpetrator Spread by Country",
      "Perpetrator Incidents by Country",
      ChartStyle::axes("Country", "Actor Type")
        .palette(QUALITATIVE)
        .height(500),
    ),
  ]
}

fn time_cross_analysis() -> Vec<PanelSpec> {
  vec![
    PanelSpec::new(
      Derivation::MonthlyIncidents,
      ChartKind::Line,
      "Monthly and Quarterly Incident Trends",
      "Monthly Incident Trends",
      ChartStyle::axes("Month", "Incidents").height(400),
    ),
    PanelSpec::new(
      Derivation::QuarterlyIncidents,
      ChartKind::Bar,
      "Monthly and Quarterly Incident Trends",
      "Quarterly Incident Distribution",
      ChartStyle::axes("Quarter", "Incidents")
        .scale("Blues")
        .height(400),
    )
    .notes(&[
      "Monthly and quarterly counts climb over the period, with the \
       sharpest rise after 2015.",
    ]),
    PanelSpec::new(
      Derivation::CountryAttackSeverity,
      ChartKind::DensityHeatmap,
      "Country × Attack Method × Severity",
      "Heatmap: Country × Attack Type × Severity",
      ChartStyle::axes("Means of attack", "Country")
        .scale("OrRd")
        .height(600),
    )
    .notes(&[
      "High-lethality tactics concentrate in specific countries, pointing \
       to targeted risks that need tailored responses.",
    ]),
  ]
}
