//! Plotly figure JSON for rendered panels.
//!
//! Each ready panel becomes a `{"data": [...], "layout": {...}}` object the
//! page hands straight to `Plotly.newPlot`. Summary cards have no figure;
//! the page draws them as metrics.

use aidsec_core::{
  ChartKind, DerivedTable, HarmType, Panel, PanelSpec, SectionView,
  derived::{CategoryHarm, CrossCount, TrendPoint},
};
use serde_json::{Value, json};
use strum::IntoEnumIterator;

/// The figure for `panel`, or `None` when it is not ready or is drawn
/// without a chart.
pub fn figure(panel: &Panel) -> Option<Value> {
  let table = panel.table()?;
  let data = traces(&panel.spec, table)?;
  Some(json!({ "data": data, "layout": layout(&panel.spec, table) }))
}

/// The whole section as JSON: the serialised [`SectionView`] with a
/// `figure` added to every panel and the notices collected at the top.
pub fn section_json(section: &SectionView) -> serde_json::Result<Value> {
  let mut value = serde_json::to_value(section)?;
  if let Some(panels) = value.get_mut("panels").and_then(Value::as_array_mut) {
    for (json, panel) in panels.iter_mut().zip(&section.panels) {
      json["figure"] = figure(panel).unwrap_or(Value::Null);
    }
  }
  value["notices"] = json!(section.notices().collect::<Vec<_>>());
  Ok(value)
}

// ─── Traces ──────────────────────────────────────────────────────────────────

fn traces(spec: &PanelSpec, table: &DerivedTable) -> Option<Vec<Value>> {
  let style = &spec.style;
  let color = |i: usize| -> Value {
    match style.palette {
      [] => Value::Null,
      p => json!(p[i % p.len()]),
    }
  };
  // Value-coloured marker when a continuous scale is set.
  let scaled = |values: &[u64], fallback: Value| -> Value {
    match style.color_scale {
      Some(scale) => json!({ "color": values, "colorscale": scale }),
      None => json!({ "color": fallback }),
    }
  };

  let data = match (spec.chart, table) {
    (ChartKind::SummaryCard, _) | (_, DerivedTable::Summary(_)) => {
      return None;
    }

    (ChartKind::Line, DerivedTable::YearCounts(rows)) => vec![line(
      "Incidents",
      json!(rows.iter().map(|r| r.year).collect::<Vec<_>>()),
      rows.iter().map(|r| r.incidents).collect(),
      color(0),
    )],
    (ChartKind::Line, DerivedTable::YearTotals(rows)) => vec![line(
      "Victims",
      json!(rows.iter().map(|r| r.year).collect::<Vec<_>>()),
      rows.iter().map(|r| r.victims).collect(),
      color(0),
    )],
    (ChartKind::Line, DerivedTable::TimeBuckets(rows)) => vec![line(
      "Incidents",
      json!(rows.iter().map(|r| &r.label).collect::<Vec<_>>()),
      rows.iter().map(|r| r.incidents).collect(),
      color(0),
    )],

    (ChartKind::Bar, DerivedTable::TimeBuckets(rows)) => {
      let counts: Vec<u64> = rows.iter().map(|r| r.incidents).collect();
      vec![json!({
        "type": "bar",
        "x": rows.iter().map(|r| &r.label).collect::<Vec<_>>(),
        "y": counts,
        "marker": scaled(&counts, color(0)),
      })]
    }
    (ChartKind::Bar, DerivedTable::Totals(rows)) => vec![json!({
      "type": "bar",
      "x": rows.iter().map(|r| &r.label).collect::<Vec<_>>(),
      "y": rows.iter().map(|r| r.value).collect::<Vec<_>>(),
      "marker": { "color": (0..rows.len()).map(color).collect::<Vec<_>>() },
    })],
    (ChartKind::Donut, DerivedTable::Totals(rows)) => vec![json!({
      "type": "pie",
      "hole": 0.4,
      "labels": rows.iter().map(|r| &r.label).collect::<Vec<_>>(),
      "values": rows.iter().map(|r| r.value).collect::<Vec<_>>(),
      "marker": { "colors": style.palette },
    })],

    (
      ChartKind::StackedBar | ChartKind::MultiLine,
      DerivedTable::YearHarm(rows),
    ) => {
      let years: Vec<i32> = rows.iter().map(|r| r.year).collect();
      HarmType::iter()
        .enumerate()
        .map(|(i, harm)| {
          let y: Vec<u64> = rows.iter().map(|r| r.harm.get(harm)).collect();
          if spec.chart == ChartKind::StackedBar {
            json!({
              "type": "bar",
              "name": harm.to_string(),
              "x": years,
              "y": y,
              "marker": { "color": color(i) },
            })
          } else {
            line(&harm.to_string(), json!(years), y, color(i))
          }
        })
        .collect()
    }

    (ChartKind::MultiLine, DerivedTable::Trend(points)) => series(points)
      .into_iter()
      .enumerate()
      .map(|(i, (name, years, counts))| {
        line(name, json!(years), counts, color(i))
      })
      .collect(),
    (ChartKind::NormalizedArea, DerivedTable::Trend(points)) => {
      series(points)
        .into_iter()
        .enumerate()
        .map(|(i, (name, years, counts))| {
          json!({
            "type": "scatter",
            "mode": "lines",
            "name": name,
            "x": years,
            "y": counts,
            "stackgroup": "one",
            "groupnorm": "percent",
            "line": { "color": color(i) },
          })
        })
        .collect()
    }

    (ChartKind::HorizontalBar, DerivedTable::Ranking(rows)) => {
      let counts: Vec<u64> = rows.iter().map(|r| r.incidents).collect();
      vec![json!({
        "type": "bar",
        "orientation": "h",
        "x": counts,
        "y": rows.iter().map(|r| &r.value).collect::<Vec<_>>(),
        "marker": scaled(&counts, color(0)),
      })]
    }
    (ChartKind::Choropleth, DerivedTable::Ranking(rows)) => vec![json!({
      "type": "choropleth",
      "locationmode": "country names",
      "locations": rows.iter().map(|r| &r.value).collect::<Vec<_>>(),
      "z": rows.iter().map(|r| r.incidents).collect::<Vec<_>>(),
      "colorscale": style.color_scale.unwrap_or("Reds"),
      "colorbar": { "title": { "text": "Incident Count" } },
    })],

    (
      ChartKind::StackedBar | ChartKind::GroupedBar,
      DerivedTable::CategoryHarm(rows),
    ) => harm_bars(rows, color),

    (ChartKind::GroupedBar, DerivedTable::CrossCount(rows)) => {
      by_second(rows)
        .into_iter()
        .enumerate()
        .map(|(i, (name, members))| {
          json!({
            "type": "bar",
            "name": name,
            "x": members.iter().map(|r| &r.a).collect::<Vec<_>>(),
            "y": members.iter().map(|r| r.incidents).collect::<Vec<_>>(),
            "marker": { "color": color(i) },
          })
        })
        .collect()
    }
    (ChartKind::Treemap, DerivedTable::CrossCount(rows)) => {
      vec![treemap(rows, style.palette)]
    }
    (ChartKind::Bubble, DerivedTable::CrossCount(rows)) => {
      let max = rows.iter().map(|r| r.incidents).max().unwrap_or(1).max(1);
      let sizeref = 2.0 * max as f64 / (40.0_f64 * 40.0);
      by_second(rows)
        .into_iter()
        .enumerate()
        .map(|(i, (name, members))| {
          json!({
            "type": "scatter",
            "mode": "markers",
            "name": name,
            "x": members.iter().map(|r| &r.a).collect::<Vec<_>>(),
            "y": members.iter().map(|r| &r.b).collect::<Vec<_>>(),
            "marker": {
              "size": members.iter().map(|r| r.incidents).collect::<Vec<_>>(),
              "sizemode": "area",
              "sizeref": sizeref,
              "color": color(i),
            },
          })
        })
        .collect()
    }

    (ChartKind::DensityHeatmap, DerivedTable::CrossHarm(rows)) => {
      HarmType::iter()
        .enumerate()
        .map(|(i, harm)| {
          let axis =
            if i == 0 { "x".to_string() } else { format!("x{}", i + 1) };
          json!({
            "type": "heatmap",
            "name": harm.to_string(),
            "x": rows.iter().map(|r| &r.b).collect::<Vec<_>>(),
            "y": rows.iter().map(|r| &r.a).collect::<Vec<_>>(),
            "z": rows.iter().map(|r| r.harm.get(harm)).collect::<Vec<_>>(),
            "xaxis": axis,
            "coloraxis": "coloraxis",
          })
        })
        .collect()
    }

    (ChartKind::PercentStackedBar, DerivedTable::Breakdown(groups)) => {
      let labels: Vec<&str> = groups
        .first()
        .map(|g| g.shares.iter().map(|s| s.label.as_str()).collect())
        .unwrap_or_default();
      labels
        .iter()
        .enumerate()
        .map(|(i, label)| {
          json!({
            "type": "bar",
            "name": label,
            "x": groups.iter().map(|g| &g.group).collect::<Vec<_>>(),
            "y": groups
              .iter()
              .map(|g| g.shares.get(i).map_or(0.0, |s| s.percent))
              .collect::<Vec<_>>(),
            "customdata": groups
              .iter()
              .map(|g| g.shares.get(i).map_or(0, |s| s.count))
              .collect::<Vec<_>>(),
            "hovertemplate": "%{y:.1f}% (%{customdata})",
            "marker": { "color": color(i) },
          })
        })
        .collect()
    }

    (chart, table) => {
      tracing::debug!(?chart, shape = table.shape(), "no figure for pairing");
      return None;
    }
  };

  Some(data)
}

fn line(name: &str, x: Value, y: Vec<u64>, color: Value) -> Value {
  json!({
    "type": "scatter",
    "mode": "lines+markers",
    "name": name,
    "x": x,
    "y": y,
    "line": { "color": color },
  })
}

/// Horizontal bars, one trace per harm type.
fn harm_bars(
  rows: &[CategoryHarm],
  color: impl Fn(usize) -> Value,
) -> Vec<Value> {
  HarmType::iter()
    .enumerate()
    .map(|(i, harm)| {
      json!({
        "type": "bar",
        "orientation": "h",
        "name": harm.to_string(),
        "x": rows.iter().map(|r| r.harm.get(harm)).collect::<Vec<_>>(),
        "y": rows.iter().map(|r| &r.value).collect::<Vec<_>>(),
        "marker": { "color": color(i) },
      })
    })
    .collect()
}

/// Split trend points into one `(value, years, counts)` series per
/// category value, in rank order.
fn series(points: &[TrendPoint]) -> Vec<(&str, Vec<i32>, Vec<u64>)> {
  let mut out: Vec<(&str, Vec<i32>, Vec<u64>)> = Vec::new();
  for p in points {
    let at = match out.iter().position(|(v, ..)| *v == p.value) {
      Some(at) => at,
      None => {
        out.push((&p.value, Vec::new(), Vec::new()));
        out.len() - 1
      }
    };
    out[at].1.push(p.year);
    out[at].2.push(p.incidents);
  }
  out
}

/// Group cross-tab rows by their second axis, in first-appearance order.
fn by_second(rows: &[CrossCount]) -> Vec<(&str, Vec<&CrossCount>)> {
  let mut out: Vec<(&str, Vec<&CrossCount>)> = Vec::new();
  for row in rows {
    match out.iter_mut().find(|(b, _)| *b == row.b) {
      Some((_, members)) => members.push(row),
      None => out.push((&row.b, vec![row])),
    }
  }
  out
}

/// Two-level treemap: first axis as parents, second as leaves.
fn treemap(rows: &[CrossCount], palette: &[&str]) -> Value {
  let mut parents: Vec<(&str, u64)> = Vec::new();
  for row in rows {
    match parents.iter_mut().find(|(a, _)| *a == row.a) {
      Some((_, total)) => *total += row.incidents,
      None => parents.push((&row.a, row.incidents)),
    }
  }

  let mut ids = Vec::new();
  let mut labels = Vec::new();
  let mut parent_ids = Vec::new();
  let mut values = Vec::new();
  for (a, total) in &parents {
    ids.push(a.to_string());
    labels.push(a.to_string());
    parent_ids.push(String::new());
    values.push(*total);
  }
  for row in rows {
    ids.push(format!("{}/{}", row.a, row.b));
    labels.push(row.b.clone());
    parent_ids.push(row.a.clone());
    values.push(row.incidents);
  }

  json!({
    "type": "treemap",
    "ids": ids,
    "labels": labels,
    "parents": parent_ids,
    "values": values,
    "branchvalues": "total",
    "marker": {
      "colors": palette.iter().cycle().take(parents.len()).collect::<Vec<_>>(),
    },
  })
}

// ─── Layout ──────────────────────────────────────────────────────────────────

fn layout(spec: &PanelSpec, table: &DerivedTable) -> Value {
  let style = &spec.style;
  let mut layout = json!({
    "title": { "text": spec.title },
    "height": style.height,
    "margin": { "l": 40, "r": 40, "t": 50, "b": 40 },
    "xaxis": { "title": { "text": style.x_title } },
    "yaxis": { "title": { "text": style.y_title } },
  });

  match spec.chart {
    ChartKind::StackedBar => layout["barmode"] = json!("stack"),
    ChartKind::GroupedBar => layout["barmode"] = json!("group"),
    ChartKind::PercentStackedBar => {
      layout["barmode"] = json!("stack");
      layout["yaxis"]["range"] = json!([0, 100]);
    }
    ChartKind::Choropleth => {
      layout["geo"] = json!({ "showframe": false, "showcoastlines": true });
    }
    ChartKind::DensityHeatmap => {
      let scale = style.color_scale.unwrap_or("OrRd");
      layout["coloraxis"] = json!({ "colorscale": scale });
      let domains = [[0.0, 0.32], [0.34, 0.66], [0.68, 1.0]];
      for (i, (harm, domain)) in HarmType::iter().zip(domains).enumerate() {
        let key = if i == 0 { "xaxis".to_string() } else { format!("xaxis{}", i + 1) };
        layout[key] = json!({
          "domain": domain,
          "title": { "text": harm.to_string() },
        });
      }
    }
    _ => {}
  }

  // Rankings read top-down.
  if spec.chart == ChartKind::HorizontalBar
    || matches!(table, DerivedTable::CategoryHarm(_))
  {
    layout["yaxis"]["autorange"] = json!("reversed");
  }

  layout
}
