//! Application state machine and event dispatcher.

use std::sync::Arc;

use aidsec_core::{
  IncidentTable, SectionId, SectionView, VictimView, render_section,
};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

// ─── App ──────────────────────────────────────────────────────────────────────

/// Top-level application state.
pub struct App {
  /// The incident table, loaded once before the first frame.
  pub table: Arc<IncidentTable>,

  /// Section under the sidebar cursor; always the one rendered.
  pub section: SectionId,

  /// Victim profile toggle. Kept across section changes.
  pub view: VictimView,

  /// The current section, re-rendered on every selection or toggle.
  pub rendered: SectionView,

  /// Number of leading items (intro, panels, closing blocks) scrolled past.
  pub scroll: usize,

  /// One-line status message shown in the status bar.
  pub status_msg: String,
}

impl App {
  pub fn new(
    table: Arc<IncidentTable>,
    section: SectionId,
    view: VictimView,
  ) -> Self {
    let rendered = render_section(&table, section, view);
    let mut app = Self {
      table,
      section,
      view,
      rendered,
      scroll: 0,
      status_msg: String::new(),
    };
    app.note_notices();
    app
  }

  // ── Rendering ─────────────────────────────────────────────────────────────

  fn rerender(&mut self) {
    self.rendered = render_section(&self.table, self.section, self.view);
    self.scroll = self.scroll.min(self.max_scroll());
    self.note_notices();
  }

  fn note_notices(&mut self) {
    let skipped = self.rendered.notices().count();
    self.status_msg = match skipped {
      0 => String::new(),
      1 => "1 view skipped: column missing".into(),
      n => format!("{n} views skipped: columns missing"),
    };
  }

  /// Move the sidebar cursor to `section` and render it from the top.
  pub fn select(&mut self, section: SectionId) {
    if section == self.section {
      return;
    }
    self.section = section;
    self.scroll = 0;
    self.rerender();
  }

  pub fn toggle_view(&mut self) {
    self.view = self.view.toggled();
    if self.section == SectionId::VictimProfiles {
      self.rerender();
    }
    self.status_msg = format!("Victim view: {}", self.view.label());
  }

  /// Last valid scroll offset: one item stays on screen.
  pub fn max_scroll(&self) -> usize {
    self.rendered.panels.len() + self.rendered.closing.len()
  }

  // ── Key handling ──────────────────────────────────────────────────────────

  /// Process a key event. Returns `true` to continue, `false` to quit.
  pub fn handle_key(&mut self, key: KeyEvent) -> bool {
    // Global: Ctrl-C quits from anywhere.
    if key.modifiers.contains(KeyModifiers::CONTROL)
      && key.code == KeyCode::Char('c')
    {
      return false;
    }

    match key.code {
      // Quit
      KeyCode::Char('q') | KeyCode::Esc => return false,

      // Sidebar
      KeyCode::Down | KeyCode::Char('j') | KeyCode::Tab => {
        self.select(self.section.next());
      }
      KeyCode::Up | KeyCode::Char('k') | KeyCode::BackTab => {
        self.select(self.section.prev());
      }
      KeyCode::Char(c @ '1'..='8') => {
        let index = c as usize - '1' as usize;
        if let Some(section) = SectionId::all().get(index).copied() {
          self.select(section);
        }
      }

      // Victim view radio
      KeyCode::Char('v') => self.toggle_view(),

      // Scroll section pane
      KeyCode::PageDown | KeyCode::Char(' ') => {
        self.scroll = (self.scroll + 1).min(self.max_scroll());
      }
      KeyCode::PageUp => {
        self.scroll = self.scroll.saturating_sub(1);
      }
      KeyCode::Home => self.scroll = 0,

      _ => {}
    }
    true
  }
}

#[cfg(test)]
mod tests {
  use aidsec_core::{Column, HarmCounts, IncidentRecord};
  use crossterm::event::KeyEventKind;

  use super::*;

  fn key(code: KeyCode) -> KeyEvent { KeyEvent::new(code, KeyModifiers::NONE) }

  fn app_with(columns: impl IntoIterator<Item = Column>) -> App {
    let record = IncidentRecord {
      year: Some(2022),
      month: Some(6),
      country: Some("Mali".into()),
      region: Some("Mopti".into()),
      means_of_attack: Some("Shooting".into()),
      location: Some("Road".into()),
      actor_type: Some("Unknown".into()),
      harm: HarmCounts::new(1, 1, 0),
      total_nationals: 2,
      nationals: HarmCounts::new(1, 1, 0),
      ..Default::default()
    };
    let table = IncidentTable::new(vec![record], columns);
    App::new(Arc::new(table), SectionId::Introduction, VictimView::Total)
  }

  fn app() -> App {
    use strum::IntoEnumIterator as _;
    app_with(Column::iter())
  }

  #[test]
  fn arrows_move_through_sections_and_wrap() {
    let mut app = app();
    assert!(app.handle_key(key(KeyCode::Down)));
    assert_eq!(app.section, SectionId::YearlyTrends);
    assert_eq!(app.rendered.id, SectionId::YearlyTrends);

    app.handle_key(key(KeyCode::Char('k')));
    app.handle_key(key(KeyCode::Char('k')));
    assert_eq!(app.section, SectionId::Conclusion);
  }

  #[test]
  fn digits_jump_to_sections() {
    let mut app = app();
    app.handle_key(key(KeyCode::Char('5')));
    assert_eq!(app.section, SectionId::VictimProfiles);
    app.handle_key(key(KeyCode::Char('9')));
    assert_eq!(app.section, SectionId::VictimProfiles);
  }

  #[test]
  fn v_toggles_the_victim_breakdown() {
    let mut app = app();
    app.handle_key(key(KeyCode::Char('5')));
    assert_eq!(app.rendered.panels[1].spec.title, "Total Number of Victims by Type");

    app.handle_key(key(KeyCode::Char('v')));
    assert_eq!(app.view, VictimView::Proportional);
    assert_eq!(app.rendered.view, VictimView::Proportional);
    assert_eq!(
      app.rendered.panels[1].spec.derivation,
      aidsec_core::Derivation::StaffShareByHarm
    );
  }

  #[test]
  fn view_survives_section_changes() {
    let mut app = app();
    app.handle_key(key(KeyCode::Char('v')));
    app.handle_key(key(KeyCode::Char('5')));
    assert_eq!(app.rendered.view, VictimView::Proportional);
  }

  #[test]
  fn scrolling_is_bounded_and_resets_on_selection() {
    let mut app = app();
    app.handle_key(key(KeyCode::Char('2')));
    for _ in 0..20 {
      app.handle_key(key(KeyCode::PageDown));
    }
    assert_eq!(app.scroll, app.max_scroll());
    assert_eq!(app.scroll, 3);

    app.handle_key(key(KeyCode::PageUp));
    assert_eq!(app.scroll, 2);

    app.handle_key(key(KeyCode::Down));
    assert_eq!(app.scroll, 0);
  }

  #[test]
  fn quit_keys() {
    let mut app = app();
    assert!(!app.handle_key(key(KeyCode::Char('q'))));
    let ctrl_c = KeyEvent {
      code:      KeyCode::Char('c'),
      modifiers: KeyModifiers::CONTROL,
      kind:      KeyEventKind::Press,
      state:     crossterm::event::KeyEventState::NONE,
    };
    assert!(!app.handle_key(ctrl_c));
  }

  #[test]
  fn missing_columns_show_in_the_status_bar() {
    use strum::IntoEnumIterator as _;
    let mut app = app_with(Column::iter().filter(|c| *c != Column::Region));
    assert!(app.status_msg.is_empty());
    app.handle_key(key(KeyCode::Char('3')));
    assert_eq!(app.status_msg, "1 view skipped: column missing");
  }
}
