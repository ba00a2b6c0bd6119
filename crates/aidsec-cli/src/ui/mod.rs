//! TUI rendering — orchestrates all panes.

pub mod section;
pub mod sidebar;

use aidsec_core::{PanelSpec, SectionId};
use chrono::Local;
use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Paragraph},
};

use crate::app::App;

/// Fallback series colours for panels without a palette.
const DEFAULT_COLORS: [Color; 6] = [
  Color::Red,
  Color::Yellow,
  Color::Cyan,
  Color::Magenta,
  Color::Green,
  Color::Blue,
];

/// Series colour `index` of `spec`'s palette, cycling when it runs out.
pub fn series_color(spec: &PanelSpec, index: usize) -> Color {
  let palette = spec.style.palette;
  if palette.is_empty() {
    return DEFAULT_COLORS[index % DEFAULT_COLORS.len()];
  }
  palette[index % palette.len()]
    .parse()
    .unwrap_or(DEFAULT_COLORS[index % DEFAULT_COLORS.len()])
}

// ─── Root draw ────────────────────────────────────────────────────────────────

/// Main draw function called each frame.
pub fn draw(f: &mut Frame, app: &App) {
  let area = f.area();

  // Vertical stack: header, body, status bar.
  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // header
      Constraint::Min(0),    // body
      Constraint::Length(1), // status bar
    ])
    .split(area);

  draw_header(f, rows[0], app);
  draw_body(f, rows[1], app);
  draw_status(f, rows[2], app);
}

// ─── Header ───────────────────────────────────────────────────────────────────

fn draw_header(f: &mut Frame, area: Rect, app: &App) {
  let date = Local::now().format("%Y-%m-%d").to_string();

  let left = Span::styled(
    " Aid Worker Security Dashboard",
    Style::default()
      .fg(Color::White)
      .add_modifier(Modifier::BOLD),
  );
  let right = Span::styled(
    format!("{} incidents  {date} ", app.table.len()),
    Style::default().fg(Color::Gray),
  );

  // Simple left-right header: pad the middle.
  let left_width = left.width() as u16;
  let right_width = right.width() as u16;
  let pad = area
    .width
    .saturating_sub(left_width)
    .saturating_sub(right_width);

  let line = Line::from(vec![
    left,
    Span::raw(" ".repeat(pad as usize)),
    right,
  ]);

  let block = Block::default().style(Style::default().bg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);
  f.render_widget(Paragraph::new(line), inner);
}

// ─── Body ─────────────────────────────────────────────────────────────────────

fn draw_body(f: &mut Frame, area: Rect, app: &App) {
  // Fixed-width navigation, the section takes the rest.
  let cols = Layout::default()
    .direction(Direction::Horizontal)
    .constraints([Constraint::Length(32), Constraint::Min(0)])
    .split(area);

  sidebar::draw(f, cols[0], app);
  section::draw(f, cols[1], app);
}

// ─── Status bar ───────────────────────────────────────────────────────────────

fn draw_status(f: &mut Frame, area: Rect, app: &App) {
  let hints = if app.section == SectionId::VictimProfiles {
    "↑↓/jk section  1-8 jump  PgUp/PgDn scroll  v toggle view  q quit"
  } else {
    "↑↓/jk section  1-8 jump  PgUp/PgDn scroll  q quit"
  };

  let status = if app.status_msg.is_empty() {
    hints.to_string()
  } else {
    app.status_msg.clone()
  };

  let mode_span = Span::styled(
    format!(" {} ", app.section.title().to_uppercase()),
    Style::default()
      .fg(Color::Black)
      .bg(Color::Cyan)
      .add_modifier(Modifier::BOLD),
  );
  let hint_span = Span::styled(
    format!("  {status}"),
    Style::default().fg(Color::Gray),
  );

  let line = Line::from(vec![mode_span, hint_span]);
  f.render_widget(
    Paragraph::new(line).style(Style::default().bg(Color::Black)),
    area,
  );
}
