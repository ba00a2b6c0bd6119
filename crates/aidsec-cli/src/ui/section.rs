//! Section pane — right panel.
//!
//! The pane is a vertical run of items: the intro text, one box per panel,
//! then the closing blocks. [`App::scroll`] drops leading items; whatever
//! does not fit below is cut off.
//!
//! Terminal cells are too coarse for most of the web figures, so every
//! derived table maps to one of four widgets: a braille line chart for
//! anything keyed by time, horizontal bars for rankings and totals, a table
//! for two-way groupings, and line gauges for proportional breakdowns.

use aidsec_core::{
  ChartKind, Column, DerivedTable, Panel, PanelSpec, PanelStatus, SectionId,
  SectionView, VictimView,
  derived::{CrossCount, CrossHarm, ShareGroup, TrendPoint},
  narrative,
};
use indexmap::IndexMap;
use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  symbols::{self, Marker},
  text::{Line, Span},
  widgets::{
    Axis, Bar, BarChart, BarGroup, Block, Borders, Chart, Dataset, GraphType,
    LegendPosition, LineGauge, Paragraph, Row, Table, Wrap,
  },
};

use super::series_color;
use crate::app::App;

/// Inner height of every line chart.
const CHART_HEIGHT: u16 = 12;

/// Ranking rows drawn before the rest are cut.
const MAX_BARS: usize = 15;

/// Table rows drawn before a "more" line.
const MAX_ROWS: usize = 12;

const HARM_HEADERS: [&str; 3] = ["Killed", "Wounded", "Kidnapped"];

// ─── Items ────────────────────────────────────────────────────────────────────

enum Item<'a> {
  Intro(&'a SectionView),
  Panel(&'a Panel),
  Closing(&'a narrative::Block),
}

fn items(view: &SectionView) -> Vec<Item<'_>> {
  let mut items = vec![Item::Intro(view)];
  items.extend(view.panels.iter().map(Item::Panel));
  items.extend(view.closing.iter().map(Item::Closing));
  items
}

impl Item<'_> {
  /// Rows this item wants at `width` columns.
  fn height(&self, width: u16) -> u16 {
    match self {
      Self::Intro(view) => {
        let text = view
          .intro
          .iter()
          .map(|p| wrapped_height(p, width).saturating_add(1))
          .fold(0, u16::saturating_add);
        if view.id == SectionId::VictimProfiles {
          text.saturating_add(2)
        } else {
          text
        }
      }
      Self::Panel(panel) => {
        let inner = width.saturating_sub(2);
        body_height(panel)
          .saturating_add(footer_height(panel, inner))
          .saturating_add(2 + 1)
      }
      Self::Closing(block) => {
        let inner = width.saturating_sub(2);
        block
          .bullets
          .iter()
          .map(|b| wrapped_height(b, inner.saturating_sub(2)))
          .fold(2, u16::saturating_add)
      }
    }
  }

  fn draw(&self, f: &mut Frame, area: Rect) {
    match self {
      Self::Intro(view) => draw_intro(f, area, view),
      Self::Panel(panel) => draw_panel(f, area, panel),
      Self::Closing(block) => draw_closing(f, area, block),
    }
  }
}

/// Rows `text` takes when wrapped at `width`, capped at `u16::MAX`. Word
/// wrapping can add a line to this estimate; the overflow is clipped.
fn wrapped_height(text: &str, width: u16) -> u16 {
  let rows = text.chars().count().div_ceil(usize::from(width.max(1)));
  u16::try_from(rows).unwrap_or(u16::MAX).max(1)
}

// ─── Root ─────────────────────────────────────────────────────────────────────

/// Render the current section into `area`.
pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let view = &app.rendered;
  let block = Block::default()
    .title(Span::styled(
      format!(" {} {} ", view.icon, view.heading),
      Style::default().add_modifier(Modifier::BOLD),
    ))
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);

  let bottom = inner.y + inner.height;
  let mut y = inner.y;
  for item in items(view).into_iter().skip(app.scroll) {
    if y >= bottom {
      break;
    }
    let height = item.height(inner.width).min(bottom - y);
    item.draw(f, Rect {
      x: inner.x,
      y,
      width: inner.width,
      height,
    });
    y += height;
  }
}

// ─── Prose ────────────────────────────────────────────────────────────────────

/// Narrative text marks emphasis with `**`; render those runs bold.
fn prose(text: &str) -> Line<'_> {
  let spans: Vec<Span> = text
    .split("**")
    .enumerate()
    .filter(|(_, part)| !part.is_empty())
    .map(|(i, part)| {
      if i % 2 == 1 {
        Span::styled(part, Style::default().add_modifier(Modifier::BOLD))
      } else {
        Span::raw(part)
      }
    })
    .collect();
  Line::from(spans)
}

fn draw_intro(f: &mut Frame, area: Rect, view: &SectionView) {
  let mut lines = Vec::new();
  for paragraph in view.intro {
    lines.push(prose(paragraph));
    lines.push(Line::default());
  }
  if view.id == SectionId::VictimProfiles {
    let radio = |v: VictimView| {
      let mark = if v == view.view { "(•)" } else { "( )" };
      format!("{mark} {}", v.label())
    };
    lines.push(Line::from(vec![
      Span::styled("Select View: ", Style::default().fg(Color::Gray)),
      Span::raw(radio(VictimView::Total)),
      Span::raw("   "),
      Span::raw(radio(VictimView::Proportional)),
      Span::styled("   [v]", Style::default().fg(Color::DarkGray)),
    ]));
    lines.push(Line::default());
  }
  f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), area);
}

fn draw_closing(f: &mut Frame, area: Rect, block: &narrative::Block) {
  let frame = Block::default()
    .title(format!(" {} ", block.title))
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));
  let lines: Vec<Line> = block
    .bullets
    .iter()
    .map(|b| {
      let mut line = prose(b);
      line.spans.insert(0, Span::raw("• "));
      line
    })
    .collect();
  f.render_widget(
    Paragraph::new(lines).block(frame).wrap(Wrap { trim: true }),
    area,
  );
}

// ─── Panels ───────────────────────────────────────────────────────────────────

fn body_height(panel: &Panel) -> u16 {
  let rows = match &panel.status {
    PanelStatus::Ready { table, .. } => match table {
      DerivedTable::Summary(_) => 3,
      DerivedTable::YearCounts(_)
      | DerivedTable::YearHarm(_)
      | DerivedTable::YearTotals(_)
      | DerivedTable::Trend(_)
      | DerivedTable::TimeBuckets(_) => CHART_HEIGHT as usize,
      DerivedTable::Ranking(rows) => rows.len().min(MAX_BARS),
      DerivedTable::Totals(rows) => rows.len(),
      DerivedTable::CategoryHarm(rows) => table_rows(rows.len()),
      DerivedTable::CrossCount(rows) => table_rows(rows.len()),
      DerivedTable::CrossHarm(rows) => table_rows(rows.len()),
      DerivedTable::Breakdown(groups) => {
        groups.iter().map(|g| 1 + g.shares.len()).sum()
      }
    },
    PanelStatus::Empty { .. } | PanelStatus::Unavailable { .. } => 1,
  };
  u16::try_from(rows).unwrap_or(u16::MAX)
}

/// Header, capped rows, and a "more" line when capped.
fn table_rows(len: usize) -> usize {
  1 + len.min(MAX_ROWS) + usize::from(len > MAX_ROWS)
}

/// Caption and notes, shown only under a drawn panel.
fn footer(panel: &Panel) -> Vec<String> {
  let PanelStatus::Ready { caption, .. } = &panel.status else {
    return Vec::new();
  };
  caption
    .iter()
    .cloned()
    .chain(panel.spec.notes.iter().map(|n| format!("• {n}")))
    .collect()
}

fn footer_height(panel: &Panel, width: u16) -> u16 {
  footer(panel)
    .iter()
    .map(|l| wrapped_height(l, width))
    .fold(0, u16::saturating_add)
}

fn draw_panel(f: &mut Frame, area: Rect, panel: &Panel) {
  let spec = &panel.spec;
  let block = Block::default()
    .title(format!(" {} ", spec.heading))
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);

  let [title, body, foot] = Layout::vertical([
    Constraint::Length(1),
    Constraint::Min(0),
    Constraint::Length(footer_height(panel, inner.width)),
  ])
  .areas(inner);

  f.render_widget(
    Paragraph::new(Span::styled(
      spec.title,
      Style::default().add_modifier(Modifier::BOLD),
    )),
    title,
  );

  match &panel.status {
    PanelStatus::Ready { table, .. } => draw_table(f, body, spec, table),
    PanelStatus::Empty { message } => f.render_widget(
      Paragraph::new(Span::styled(
        message.as_str(),
        Style::default().fg(Color::DarkGray),
      )),
      body,
    ),
    PanelStatus::Unavailable { notice, .. } => f.render_widget(
      Paragraph::new(Span::styled(
        format!("⚠ {notice}"),
        Style::default().fg(Color::Yellow),
      )),
      body,
    ),
  }

  let lines: Vec<Line> = footer(panel)
    .into_iter()
    .map(|l| Line::styled(l, Style::default().fg(Color::Gray)))
    .collect();
  f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), foot);
}

fn draw_table(f: &mut Frame, area: Rect, spec: &PanelSpec, table: &DerivedTable) {
  match table {
    DerivedTable::Summary(summary) => {
      let span = match (summary.first_year, summary.last_year) {
        (Some(a), Some(b)) => format!("{a}–{b}"),
        _ => "n/a".to_string(),
      };
      let metric = |value: String, label: &'static str| {
        vec![
          Span::styled(value, Style::default().add_modifier(Modifier::BOLD)),
          Span::styled(format!(" {label}    "), Style::default().fg(Color::Gray)),
        ]
      };
      let mut spans = metric(summary.records.to_string(), "incidents");
      spans.extend(metric(span, "years"));
      spans.extend(metric(summary.countries.to_string(), "countries"));
      let mut lines = vec![Line::default(), Line::from(spans)];
      if !summary.missing_columns.is_empty() {
        let missing: Vec<String> =
          summary.missing_columns.iter().map(Column::to_string).collect();
        lines.push(Line::styled(
          format!("Missing columns: {}", missing.join(", ")),
          Style::default().fg(Color::Yellow),
        ));
      }
      f.render_widget(Paragraph::new(lines), area);
    }

    DerivedTable::YearCounts(rows) => {
      let series = vec![Series {
        name:   spec.style.y_title.to_string(),
        points: rows
          .iter()
          .map(|r| (f64::from(r.year), r.incidents as f64))
          .collect(),
      }];
      line_chart(f, area, spec, &series, None);
    }
    DerivedTable::YearTotals(rows) => {
      let series = vec![Series {
        name:   spec.style.y_title.to_string(),
        points: rows
          .iter()
          .map(|r| (f64::from(r.year), r.victims as f64))
          .collect(),
      }];
      line_chart(f, area, spec, &series, None);
    }
    DerivedTable::YearHarm(rows) => {
      let series: Vec<Series> = HARM_HEADERS
        .iter()
        .enumerate()
        .map(|(i, name)| Series {
          name:   name.to_string(),
          points: rows
            .iter()
            .map(|r| {
              let value = [r.harm.killed, r.harm.wounded, r.harm.kidnapped][i];
              (f64::from(r.year), value as f64)
            })
            .collect(),
        })
        .collect();
      line_chart(f, area, spec, &series, None);
    }
    DerivedTable::Trend(points) => {
      let normalized = spec.chart == ChartKind::NormalizedArea;
      line_chart(f, area, spec, &trend_series(points, normalized), None);
    }
    DerivedTable::TimeBuckets(rows) => {
      let series = vec![Series {
        name:   spec.style.y_title.to_string(),
        points: rows
          .iter()
          .enumerate()
          .map(|(i, r)| (i as f64, r.incidents as f64))
          .collect(),
      }];
      let labels = match (rows.first(), rows.last()) {
        (Some(first), Some(last)) => {
          Some(vec![first.label.clone(), last.label.clone()])
        }
        _ => None,
      };
      line_chart(f, area, spec, &series, labels);
    }

    DerivedTable::Ranking(rows) => {
      let bars: Vec<(String, u64, String)> = rows
        .iter()
        .take(MAX_BARS)
        .map(|r| (r.value.clone(), r.incidents, r.incidents.to_string()))
        .collect();
      hbars(f, area, &bars, |_| series_color(spec, 0));
    }
    DerivedTable::Totals(rows) => {
      let total = rows
        .iter()
        .fold(0_u64, |acc, r| acc.saturating_add(r.value));
      let bars: Vec<(String, u64, String)> = rows
        .iter()
        .map(|r| {
          let text = if total == 0 {
            r.value.to_string()
          } else {
            format!("{} ({:.1}%)", r.value, r.value as f64 / total as f64 * 100.0)
          };
          (r.label.clone(), r.value, text)
        })
        .collect();
      hbars(f, area, &bars, |i| series_color(spec, i));
    }

    DerivedTable::CategoryHarm(rows) => {
      let first = header(spec, 0);
      let data = rows.iter().map(|r| {
        vec![
          r.value.clone(),
          r.harm.killed.to_string(),
          r.harm.wounded.to_string(),
          r.harm.kidnapped.to_string(),
          r.total.to_string(),
        ]
      });
      let mut headers = vec![first];
      headers.extend(HARM_HEADERS.iter().map(|h| h.to_string()));
      headers.push("Total".into());
      grid(f, area, headers, data, rows.len());
    }
    DerivedTable::CrossCount(rows) => {
      let data = by_weight(rows, |r: &CrossCount| r.incidents).map(|r| {
        vec![r.a.clone(), r.b.clone(), r.incidents.to_string()]
      });
      let headers = vec![header(spec, 0), header(spec, 1), "Incidents".into()];
      grid(f, area, headers, data, rows.len());
    }
    DerivedTable::CrossHarm(rows) => {
      let data = by_weight(rows, |r: &CrossHarm| r.harm.total()).map(|r| {
        vec![
          r.a.clone(),
          r.b.clone(),
          r.harm.killed.to_string(),
          r.harm.wounded.to_string(),
          r.harm.kidnapped.to_string(),
        ]
      });
      let mut headers = vec![header(spec, 0), header(spec, 1)];
      headers.extend(HARM_HEADERS.iter().map(|h| h.to_string()));
      grid(f, area, headers, data, rows.len());
    }

    DerivedTable::Breakdown(groups) => gauges(f, area, spec, groups),
  }
}

/// Name of the `index`th grouping column of `spec`'s derivation.
fn header(spec: &PanelSpec, index: usize) -> String {
  spec
    .derivation
    .required_columns()
    .get(index)
    .map(Column::to_string)
    .unwrap_or_default()
}

/// Rows ordered by descending `weight`, ties in their original order.
fn by_weight<'a, T>(
  rows: &'a [T],
  weight: impl Fn(&T) -> u64,
) -> impl Iterator<Item = &'a T> {
  let mut sorted: Vec<&T> = rows.iter().collect();
  sorted.sort_by(|a, b| weight(b).cmp(&weight(a)));
  sorted.into_iter()
}

// ─── Widgets ──────────────────────────────────────────────────────────────────

struct Series {
  name:   String,
  points: Vec<(f64, f64)>,
}

/// One series per category value, in order of first appearance. With
/// `normalized`, each point is the value's share of its year's total.
fn trend_series(points: &[TrendPoint], normalized: bool) -> Vec<Series> {
  let mut year_totals: IndexMap<i32, u64> = IndexMap::new();
  for p in points {
    let total = year_totals.entry(p.year).or_default();
    *total = total.saturating_add(p.incidents);
  }

  let mut series: IndexMap<&str, Vec<(f64, f64)>> = IndexMap::new();
  for p in points {
    let y = if normalized {
      match year_totals.get(&p.year) {
        Some(&total) if total > 0 => p.incidents as f64 / total as f64 * 100.0,
        _ => 0.0,
      }
    } else {
      p.incidents as f64
    };
    series
      .entry(p.value.as_str())
      .or_default()
      .push((f64::from(p.year), y));
  }

  series
    .into_iter()
    .map(|(name, points)| Series {
      name: name.to_string(),
      points,
    })
    .collect()
}

fn format_value(v: f64) -> String {
  if v >= 10_000.0 {
    format!("{:.0}k", v / 1000.0)
  } else if v >= 1000.0 {
    format!("{:.1}k", v / 1000.0)
  } else {
    format!("{v:.0}")
  }
}

fn line_chart(
  f: &mut Frame,
  area: Rect,
  spec: &PanelSpec,
  series: &[Series],
  x_labels: Option<Vec<String>>,
) {
  let (mut x_min, mut x_max, mut y_max) = (f64::MAX, f64::MIN, 0.0_f64);
  for &(x, y) in series.iter().flat_map(|s| &s.points) {
    x_min = x_min.min(x);
    x_max = x_max.max(x);
    y_max = y_max.max(y);
  }
  if x_min > x_max {
    (x_min, x_max) = (0.0, 1.0);
  }
  if x_min == x_max {
    x_min -= 1.0;
    x_max += 1.0;
  }
  let y_top = if y_max > 0.0 { y_max * 1.1 } else { 1.0 };

  let x_labels = x_labels.unwrap_or_else(|| {
    vec![
      format!("{x_min:.0}"),
      format!("{:.0}", (x_min + x_max) / 2.0),
      format!("{x_max:.0}"),
    ]
  });

  let datasets: Vec<Dataset> = series
    .iter()
    .enumerate()
    .map(|(i, s)| {
      Dataset::default()
        .name(s.name.clone())
        .marker(Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(series_color(spec, i)))
        .data(&s.points)
    })
    .collect();

  let axis_style = Style::default().fg(Color::Gray);
  let legend = (series.len() > 1).then_some(LegendPosition::TopLeft);
  let chart = Chart::new(datasets)
    .x_axis(
      Axis::default()
        .title(spec.style.x_title)
        .style(axis_style)
        .bounds([x_min, x_max])
        .labels(x_labels),
    )
    .y_axis(
      Axis::default()
        .title(spec.style.y_title)
        .style(axis_style)
        .bounds([0.0, y_top])
        .labels(vec![
          "0".to_string(),
          format_value(y_top / 2.0),
          format_value(y_top),
        ]),
    )
    .legend_position(legend)
    .hidden_legend_constraints((Constraint::Ratio(1, 2), Constraint::Ratio(1, 2)));
  f.render_widget(chart, area);
}

/// Horizontal bars, one row each: `(label, value, text shown at the end)`.
fn hbars(
  f: &mut Frame,
  area: Rect,
  rows: &[(String, u64, String)],
  color: impl Fn(usize) -> Color,
) {
  let bars: Vec<Bar> = rows
    .iter()
    .enumerate()
    .map(|(i, (label, value, text))| {
      Bar::default()
        .label(Line::from(label.as_str()))
        .value(*value)
        .text_value(text.clone())
        .style(Style::default().fg(color(i)))
        .value_style(Style::default().fg(Color::White).add_modifier(Modifier::BOLD))
    })
    .collect();

  let chart = BarChart::default()
    .direction(Direction::Horizontal)
    .bar_width(1)
    .bar_gap(0)
    .data(BarGroup::default().bars(&bars));
  f.render_widget(chart, area);
}

/// A table of the first rows, with a trailing count of what was cut.
fn grid(
  f: &mut Frame,
  area: Rect,
  headers: Vec<String>,
  data: impl Iterator<Item = Vec<String>>,
  len: usize,
) {
  let columns = headers.len();
  let mut rows: Vec<Row> = data.take(MAX_ROWS).map(Row::new).collect();
  if len > MAX_ROWS {
    rows.push(
      Row::new(vec![format!("… {} more", len - MAX_ROWS)])
        .style(Style::default().fg(Color::DarkGray)),
    );
  }

  // Label columns get the room; counts are narrow.
  let labels = columns.saturating_sub(match columns {
    3 => 1,
    _ => 3,
  });
  let widths: Vec<Constraint> = (0..columns)
    .map(|i| {
      if i < labels {
        Constraint::Fill(1)
      } else {
        Constraint::Length(10)
      }
    })
    .collect();

  let table = Table::new(rows, widths).header(
    Row::new(headers).style(
      Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD),
    ),
  );
  f.render_widget(table, area);
}

/// One line gauge per share, under a label line per group.
fn gauges(f: &mut Frame, area: Rect, spec: &PanelSpec, groups: &[ShareGroup]) {
  let mut y = area.y;
  let bottom = area.y + area.height;
  let mut next_row = || {
    let row = (y < bottom).then_some(Rect {
      x:      area.x,
      y,
      width:  area.width,
      height: 1,
    });
    y += 1;
    row
  };

  for group in groups {
    let title = if group.data_poor {
      format!("{} (no victims recorded)", group.group)
    } else {
      format!("{} ({})", group.group, group.total)
    };
    let Some(row) = next_row() else { return };
    f.render_widget(
      Paragraph::new(Span::styled(
        title,
        Style::default().add_modifier(Modifier::BOLD),
      )),
      row,
    );

    for (i, share) in group.shares.iter().enumerate() {
      let Some(row) = next_row() else { return };
      let gauge = LineGauge::default()
        .label(format!("  {:<14} {:>5.1}%", share.label, share.percent))
        .ratio((share.percent / 100.0).clamp(0.0, 1.0))
        .line_set(symbols::line::THICK)
        .filled_style(Style::default().fg(series_color(spec, i)))
        .unfilled_style(Style::default().fg(Color::DarkGray));
      f.render_widget(gauge, row);
    }
  }
}
