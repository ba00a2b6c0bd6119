//! CSV row reader and incident row decoder.
//!
//! Pipeline:
//!   raw &str
//!     └─ csv::Reader          → StringRecord per line
//!          └─ Layout::from_header() → column per position
//!               └─ Layout::decode()  → IncidentRecord per row
//!                    └─ IncidentTable + LoadReport

use aidsec_core::{Column, IncidentRecord, IncidentTable};
use csv::StringRecord;
use serde::Serialize;

use crate::{
  ParsedTable,
  error::{Error, Result},
};

// ─── Load report ─────────────────────────────────────────────────────────────

/// What the reader saw while building a table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
  /// Data rows read, excluding the header and blank lines.
  pub rows:            usize,
  /// Rows whose field count differed from the header.
  pub ragged_rows:     usize,
  /// Non-empty cells that could not be used and were treated as missing.
  pub unusable_cells:  usize,
  /// Schema columns found in the header, in header order.
  pub columns:         Vec<Column>,
  /// Schema columns the header did not carry.
  pub missing_columns: Vec<Column>,
  /// Header cells outside the schema. They are ignored.
  pub unknown_headers: Vec<String>,
}

// ─── Record reading ──────────────────────────────────────────────────────────

/// A reader over `input` (RFC 4180).
///
/// Flexible, so ragged rows come through for [`Layout::decode`] to count.
/// Fields are trimmed; a leading UTF-8 BOM is dropped.
fn reader(input: &str) -> csv::Reader<&[u8]> {
  let input = input.strip_prefix('\u{feff}').unwrap_or(input);
  csv::ReaderBuilder::new()
    .has_headers(true)
    .flexible(true)
    .trim(csv::Trim::All)
    .from_reader(input.as_bytes())
}

/// A line holding only whitespace is one empty field after trimming.
fn is_blank_line(record: &StringRecord) -> bool {
  record.len() == 1 && record[0].is_empty()
}

// ─── Cell decoding ───────────────────────────────────────────────────────────

/// A non-empty cell that could not be read as its column's type.
#[derive(Debug, PartialEq, Eq)]
struct Unusable;

/// Empty, whitespace and `NaN` cells carry no value.
fn is_blank(cell: &str) -> bool {
  let cell = cell.trim();
  cell.is_empty() || cell.eq_ignore_ascii_case("nan")
}

/// Integers and integral floats (`"3"`, `"3.0"`).
fn integer(cell: &str) -> Result<Option<i64>, Unusable> {
  if is_blank(cell) {
    return Ok(None);
  }
  let cell = cell.trim();
  if let Ok(n) = cell.parse::<i64>() {
    return Ok(Some(n));
  }
  match cell.parse::<f64>() {
    Ok(f)
      if f.is_finite()
        && f.fract() == 0.0
        && f >= i64::MIN as f64
        && f <= i64::MAX as f64 =>
    {
      Ok(Some(f as i64))
    }
    _ => Err(Unusable),
  }
}

/// Non-negative count; missing reads as zero.
fn count(cell: &str) -> Result<u64, Unusable> {
  match integer(cell)? {
    None => Ok(0),
    Some(n) => u64::try_from(n).map_err(|_| Unusable),
  }
}

fn year(cell: &str) -> Result<Option<i32>, Unusable> {
  integer(cell)?
    .map(|n| i32::try_from(n).map_err(|_| Unusable))
    .transpose()
}

fn month(cell: &str) -> Result<Option<u8>, Unusable> {
  match integer(cell)? {
    None => Ok(None),
    Some(n @ 1..=12) => Ok(Some(n as u8)),
    Some(_) => Err(Unusable),
  }
}

fn text(cell: &str) -> Option<String> {
  (!is_blank(cell)).then(|| cell.trim().to_string())
}

/// Store `cell` into `record`. On `Err` the field keeps its missing value.
fn apply(
  record: &mut IncidentRecord,
  column: Column,
  cell: &str,
) -> Result<(), Unusable> {
  match column {
    Column::Year => record.year = year(cell)?,
    Column::Month => record.month = month(cell)?,
    Column::Country => record.country = text(cell),
    Column::Region => record.region = text(cell),
    Column::MeansOfAttack => record.means_of_attack = text(cell),
    Column::Location => record.location = text(cell),
    Column::ActorType => record.actor_type = text(cell),
    Column::TotalKilled => record.harm.killed = count(cell)?,
    Column::TotalWounded => record.harm.wounded = count(cell)?,
    Column::TotalKidnapped => record.harm.kidnapped = count(cell)?,
    Column::TotalNationals => record.total_nationals = count(cell)?,
    Column::TotalInternationals => record.total_internationals = count(cell)?,
    Column::NationalsKilled => record.nationals.killed = count(cell)?,
    Column::InternationalsKilled => record.internationals.killed = count(cell)?,
    Column::NationalsWounded => record.nationals.wounded = count(cell)?,
    Column::InternationalsWounded => {
      record.internationals.wounded = count(cell)?
    }
    Column::NationalsKidnapped => record.nationals.kidnapped = count(cell)?,
    Column::InternationalsKidnapped => {
      record.internationals.kidnapped = count(cell)?
    }
  }
  Ok(())
}

// ─── Header layout ───────────────────────────────────────────────────────────

/// The schema column at each header position. A column named twice is read
/// from its first position only.
struct Layout {
  positions: Vec<Option<Column>>,
}

impl Layout {
  fn from_header(header: &StringRecord, report: &mut LoadReport) -> Self {
    let mut positions = Vec::with_capacity(header.len());
    for name in header {
      match Column::from_header(name) {
        Some(column) if !report.columns.contains(&column) => {
          report.columns.push(column);
          positions.push(Some(column));
        }
        Some(column) => {
          tracing::debug!(%column, "duplicate header ignored");
          positions.push(None);
        }
        None => {
          if !name.is_empty() {
            report.unknown_headers.push(name.to_string());
          }
          positions.push(None);
        }
      }
    }
    Self { positions }
  }

  /// Decode one data row. Short rows leave trailing fields missing; extra
  /// fields are dropped.
  fn decode(
    &self,
    row: &StringRecord,
    line: u64,
    report: &mut LoadReport,
  ) -> IncidentRecord {
    if row.len() != self.positions.len() {
      report.ragged_rows += 1;
      tracing::debug!(
        line,
        fields = row.len(),
        expected = self.positions.len(),
        "ragged row"
      );
    }

    let mut record = IncidentRecord::default();
    for (cell, column) in row.iter().zip(&self.positions) {
      let Some(column) = *column else { continue };
      if apply(&mut record, column, cell).is_err() {
        report.unusable_cells += 1;
        tracing::debug!(line, %column, cell = %cell, "unusable cell");
      }
    }
    record
  }
}

// ─── Entry point ─────────────────────────────────────────────────────────────

pub(crate) fn parse_table(input: &str) -> Result<ParsedTable> {
  let mut rdr = reader(input);
  let header = rdr.headers()?.clone();
  if header.is_empty() || is_blank_line(&header) {
    return Err(Error::MissingHeader);
  }

  let mut report = LoadReport::default();
  let layout = Layout::from_header(&header, &mut report);

  let mut records = Vec::new();
  for row in rdr.records() {
    let row = row?;
    if is_blank_line(&row) {
      continue;
    }
    let line = row.position().map_or(0, |p| p.line());
    records.push(layout.decode(&row, line, &mut report));
  }

  report.rows = records.len();
  let table = IncidentTable::new(records, report.columns.iter().copied());
  report.missing_columns = table.missing_columns();

  Ok(ParsedTable { table, report })
}

#[cfg(test)]
mod tests {
  use super::*;

  fn rows(input: &str) -> Vec<Vec<String>> {
    reader(input)
      .records()
      .map(|r| r.unwrap().iter().map(str::to_string).collect())
      .collect()
  }

  #[test]
  fn quoted_fields_keep_commas_quotes_and_newlines() {
    let rows =
      rows("a,b,c\r\n\"x, y\",\"say \"\"hi\"\"\",\"two\nlines\"\r\n");
    assert_eq!(rows, vec![vec!["x, y", "say \"hi\"", "two\nlines"]]);
  }

  #[test]
  fn bom_is_dropped_from_the_header() {
    let mut rdr = reader("\u{feff}Year,Country\n2020,Chad\n");
    assert_eq!(&rdr.headers().unwrap()[0], "Year");
  }

  #[test]
  fn empty_trailing_fields_survive() {
    assert_eq!(rows("a,b,c\n1,,\n"), vec![vec!["1", "", ""]]);
  }

  #[test]
  fn bare_cr_line_endings_split_records() {
    assert_eq!(rows("a\r1\r2\r"), vec![vec!["1"], vec!["2"]]);
  }

  #[test]
  fn blank_and_whitespace_lines_are_skipped() {
    let parsed = parse_table("Year\n\n2020\n   \n2021").unwrap();
    assert_eq!(parsed.report.rows, 2);
    assert_eq!(parsed.report.ragged_rows, 0);
  }

  #[test]
  fn unterminated_quote_runs_to_the_end_of_input() {
    let parsed = parse_table("Country,Region\nChad,\"open\nLake,x\n").unwrap();
    assert_eq!(parsed.report.rows, 1);
    let record = &parsed.table.records()[0];
    assert_eq!(record.country.as_deref(), Some("Chad"));
    assert!(record.region.as_deref().is_some_and(|r| r.starts_with("open")));
  }

  #[test]
  fn unusable_cells_are_counted_and_left_missing() {
    let parsed =
      parse_table("Year,Month,Total killed\n2020,1,2\n2021,14,many\n").unwrap();
    assert_eq!(parsed.report.unusable_cells, 2);
    assert_eq!(parsed.table.records()[1].month, None);
    assert_eq!(parsed.table.records()[1].harm.killed, 0);
  }

  #[test]
  fn numbers_accept_integral_floats() {
    assert_eq!(count("3"), Ok(3));
    assert_eq!(count(" 3.0 "), Ok(3));
    assert_eq!(count(""), Ok(0));
    assert_eq!(count("NaN"), Ok(0));
    assert_eq!(count("2.5"), Err(Unusable));
    assert_eq!(count("-1"), Err(Unusable));
    assert_eq!(count("many"), Err(Unusable));
    assert_eq!(year("2019.0"), Ok(Some(2019)));
  }

  #[test]
  fn months_outside_the_calendar_are_unusable() {
    assert_eq!(month("12"), Ok(Some(12)));
    assert_eq!(month("0"), Err(Unusable));
    assert_eq!(month("13"), Err(Unusable));
    assert_eq!(month(""), Ok(None));
  }

  #[test]
  fn categorical_cells_are_trimmed() {
    assert_eq!(text("  Road "), Some("Road".to_string()));
    assert_eq!(text("Unknown"), Some("Unknown".to_string()));
    assert_eq!(text(" "), None);
    assert_eq!(text("nan"), None);
  }

  #[test]
  fn headers_map_case_insensitively() {
    let header = StringRecord::from(vec!["year", "COUNTRY", "Notes", "Year"]);
    let mut report = LoadReport::default();
    let layout = Layout::from_header(&header, &mut report);
    assert_eq!(
      layout.positions,
      vec![Some(Column::Year), Some(Column::Country), None, None]
    );
    assert_eq!(report.columns, vec![Column::Year, Column::Country]);
    assert_eq!(report.unknown_headers, vec!["Notes"]);
  }
}
