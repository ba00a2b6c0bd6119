//! Core types and the derivation pipeline for the aid-worker security
//! dashboard.
//!
//! This crate is free of HTTP, terminal and file-format dependencies. The
//! loader (`aidsec-csv`) produces an [`IncidentTable`]; the presentation
//! crates (`aidsec-web`, `aidsec-cli`) consume [`SectionView`]s.

pub mod column;
pub mod derived;
pub mod error;
pub mod incident;
pub mod narrative;
pub mod pipeline;
pub mod render;
pub mod section;
pub mod source;
pub mod table;

pub use column::{Category, Column};
pub use derived::DerivedTable;
pub use error::{Error, Result};
pub use incident::{HarmCounts, HarmType, IncidentRecord, StaffType};
pub use pipeline::Derivation;
pub use render::{Panel, PanelStatus, SectionView, render_section};
pub use section::{ChartKind, ChartStyle, PanelSpec, SectionId, VictimView};
pub use source::{CachedSource, IncidentSource};
pub use table::IncidentTable;

#[cfg(test)]
mod tests;
