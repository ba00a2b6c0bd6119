//! Section navigation pane — left panel.

use aidsec_core::SectionId;
use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, List, ListItem, ListState},
};

use crate::app::App;

/// Render the section list into `area`.
pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let block = Block::default()
    .title(" Navigation ")
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));

  let items: Vec<ListItem> = SectionId::all()
    .into_iter()
    .enumerate()
    .map(|(i, id)| {
      ListItem::new(Line::from(vec![
        Span::styled(
          format!("{} ", i + 1),
          Style::default().fg(Color::DarkGray),
        ),
        Span::raw(format!("{} ", id.icon())),
        Span::raw(id.title()),
      ]))
    })
    .collect();

  let list = List::new(items).block(block).highlight_style(
    Style::default()
      .bg(Color::Red)
      .fg(Color::White)
      .add_modifier(Modifier::BOLD),
  );

  let mut state = ListState::default();
  state.select(Some(app.section.position()));
  f.render_stateful_widget(list, area, &mut state);
}
