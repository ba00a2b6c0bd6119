//! Self-contained HTML page for one section.
//!
//! Inline CSS, Plotly from its CDN. Figures are embedded as JSON script
//! blocks and drawn on load; notices and placeholders are plain boxes.

use aidsec_core::{
  ChartKind, DerivedTable, Panel, PanelStatus, SectionId, SectionView,
  VictimView,
};
use serde_json::Value;

use crate::figure::figure;

const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

fn escape_html(s: &str) -> String {
  s.replace('&', "&amp;")
    .replace('<', "&lt;")
    .replace('>', "&gt;")
    .replace('"', "&quot;")
    .replace('\'', "&#39;")
}

/// JSON safe to place inside a `<script>` element.
fn script_json(value: &Value) -> String {
  value.to_string().replace("</", "<\\/")
}

/// Inline markdown emphasis (`**bold**`) is the only markup narrative text
/// uses; everything else is escaped.
fn prose(s: &str) -> String {
  let escaped = escape_html(s);
  let mut out = String::with_capacity(escaped.len());
  for (i, part) in escaped.split("**").enumerate() {
    if i % 2 == 1 {
      out.push_str("<strong>");
      out.push_str(part);
      out.push_str("</strong>");
    } else {
      out.push_str(part);
    }
  }
  out
}

/// Render `section` as a complete HTML document.
pub fn render(section: &SectionView) -> String {
  let mut html = String::with_capacity(16 * 1024);

  html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
  html.push_str("<meta charset=\"UTF-8\">\n");
  html.push_str(
    "<meta name=\"viewport\" content=\"width=device-width, \
     initial-scale=1.0\">\n",
  );
  html.push_str(&format!(
    "<title>{} · Aid Worker Security Dashboard</title>\n",
    escape_html(section.title)
  ));
  html.push_str(&format!("<script src=\"{PLOTLY_CDN}\"></script>\n"));
  html.push_str("<style>\n");
  html.push_str(INLINE_CSS);
  html.push_str("</style>\n</head>\n<body>\n");

  sidebar(&mut html, section.id);

  html.push_str("<main>\n");
  html.push_str(&format!(
    "<h1>{} {}</h1>\n",
    section.icon,
    escape_html(section.heading)
  ));
  for paragraph in section.intro {
    html.push_str(&format!("<p>{}</p>\n", prose(paragraph)));
  }

  if section.id == SectionId::VictimProfiles {
    view_toggle(&mut html, section.id, section.view);
  }

  for (i, panel) in section.panels.iter().enumerate() {
    panel_html(&mut html, i, panel);
  }

  for block in section.closing {
    html.push_str(&format!("<h2>{}</h2>\n<ul>\n", escape_html(block.title)));
    for bullet in block.bullets {
      html.push_str(&format!("<li>{}</li>\n", prose(bullet)));
    }
    html.push_str("</ul>\n");
  }

  html.push_str("</main>\n");
  html.push_str(DRAW_SCRIPT);
  html.push_str("</body>\n</html>\n");
  html
}

fn sidebar(html: &mut String, current: SectionId) {
  html.push_str("<nav>\n<h2>Navigation</h2>\n<ul>\n");
  for id in SectionId::all() {
    let class = if id == current { " class=\"active\"" } else { "" };
    html.push_str(&format!(
      "<li><a href=\"/sections/{id}\"{class}>{} {}</a></li>\n",
      id.icon(),
      escape_html(id.title())
    ));
  }
  html.push_str("</ul>\n</nav>\n");
}

fn view_toggle(html: &mut String, id: SectionId, current: VictimView) {
  html.push_str("<div class=\"toggle\">Select View: ");
  for view in [VictimView::Total, VictimView::Proportional] {
    let checked = if view == current { " checked" } else { "" };
    html.push_str(&format!(
      "<label><input type=\"radio\" name=\"view\"{checked} \
       onclick=\"location.href='/sections/{id}?view={view}'\"> {}</label>",
      view.label()
    ));
  }
  html.push_str("</div>\n");
}

fn panel_html(html: &mut String, index: usize, panel: &Panel) {
  let spec = &panel.spec;
  html.push_str("<section class=\"panel\">\n");
  html.push_str(&format!("<h3>{}</h3>\n", escape_html(spec.heading)));

  match &panel.status {
    PanelStatus::Ready { table, caption } => {
      if let (ChartKind::SummaryCard, DerivedTable::Summary(summary)) =
        (spec.chart, table)
      {
        let span = match (summary.first_year, summary.last_year) {
          (Some(a), Some(b)) => format!("{a}–{b}"),
          _ => "n/a".to_string(),
        };
        html.push_str(&format!(
          "<div class=\"metrics\"><div><b>{}</b>Incidents</div>\
           <div><b>{span}</b>Years</div><div><b>{}</b>Countries</div></div>\n",
          summary.records, summary.countries
        ));
      } else if let Some(fig) = figure(panel) {
        html.push_str(&format!(
          "<div class=\"chart\" id=\"chart-{index}\"></div>\n<script \
           type=\"application/json\" id=\"fig-{index}\">{}</script>\n",
          script_json(&fig)
        ));
      }
      if let Some(caption) = caption {
        html.push_str(&format!(
          "<p class=\"caption\">{}</p>\n",
          escape_html(caption)
        ));
      }
    }
    PanelStatus::Empty { message } => {
      html.push_str(&format!(
        "<div class=\"placeholder\">{}</div>\n",
        escape_html(message)
      ));
    }
    PanelStatus::Unavailable { notice, .. } => {
      html.push_str(&format!(
        "<div class=\"notice\">{}</div>\n",
        escape_html(notice)
      ));
    }
  }

  if panel.is_ready() && !spec.notes.is_empty() {
    html.push_str("<ul class=\"notes\">\n");
    for note in spec.notes {
      html.push_str(&format!("<li>{}</li>\n", prose(note)));
    }
    html.push_str("</ul>\n");
  }
  html.push_str("</section>\n");
}

const DRAW_SCRIPT: &str = r#"<script>
document.querySelectorAll('script[id^="fig-"]').forEach(function (el) {
  var fig = JSON.parse(el.textContent);
  var target = 'chart-' + el.id.slice(4);
  Plotly.newPlot(target, fig.data, fig.layout, { responsive: true });
});
</script>
"#;

const INLINE_CSS: &str = r#"
body { margin: 0; display: flex; font-family: system-ui, sans-serif; color: #1d3557; }
nav { width: 260px; min-height: 100vh; background: #f1f3f6; padding: 1rem; box-sizing: border-box; }
nav ul { list-style: none; padding: 0; }
nav li { margin: 0.3rem 0; }
nav a { text-decoration: none; color: inherit; display: block; padding: 0.3rem 0.5rem; border-radius: 4px; }
nav a.active { background: #e63946; color: #fff; }
main { flex: 1; padding: 1.5rem 2rem; max-width: 1100px; }
.panel { margin: 2rem 0; }
.caption { color: #555; font-style: italic; }
.notice { background: #fff3cd; border: 1px solid #ffe08a; padding: 0.75rem; border-radius: 4px; }
.placeholder { background: #f1f3f6; padding: 2rem; text-align: center; color: #777; border-radius: 4px; }
.metrics { display: flex; gap: 2rem; }
.metrics div { background: #f1f3f6; padding: 1rem 1.5rem; border-radius: 6px; }
.metrics b { display: block; font-size: 1.6rem; }
.toggle label { margin-right: 1rem; }
"#;

#[cfg(test)]
mod tests {
  use aidsec_core::{IncidentRecord, IncidentTable, render_section};

  use super::*;

  #[test]
  fn escapes_markup() {
    assert_eq!(escape_html("<a & 'b'>"), "&lt;a &amp; &#39;b&#39;&gt;");
    assert_eq!(prose("a **b** c"), "a <strong>b</strong> c");
  }

  #[test]
  fn script_json_cannot_close_the_tag() {
    let value = serde_json::json!({ "label": "</script>" });
    assert!(!script_json(&value).contains("</script>"));
  }

  #[test]
  fn page_links_every_section_and_marks_the_current_one() {
    let table = IncidentTable::with_all_columns(vec![IncidentRecord {
      year: Some(2020),
      country: Some("Yemen".into()),
      ..Default::default()
    }]);
    let html = render(&render_section(
      &table,
      SectionId::Introduction,
      VictimView::Total,
    ));
    for id in SectionId::all() {
      assert!(html.contains(&format!("href=\"/sections/{id}\"")));
    }
    assert!(html.contains("class=\"active\">🏁 Introduction"));
    assert!(html.contains("<b>1</b>Incidents"));
    assert!(!html.contains("name=\"view\""));
  }

  #[test]
  fn victim_page_offers_the_view_toggle() {
    let table = IncidentTable::with_all_columns(Vec::new());
    let html = render(&render_section(
      &table,
      SectionId::VictimProfiles,
      VictimView::Proportional,
    ));
    assert!(html.contains("name=\"view\" checked"));
    assert!(html.contains("?view=total"));
    assert!(html.contains("Proportional View"));
  }
}
