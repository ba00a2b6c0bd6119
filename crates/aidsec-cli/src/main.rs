//! `aidsec` — terminal dashboard for aid worker security incidents.
//!
//! # Usage
//!
//! ```
//! aidsec --data security_incidents.csv
//! aidsec --config ~/.config/aidsec/config.toml --section victim-profiles
//! aidsec --log aidsec.log
//! ```

mod app;
mod ui;

use std::{
  fs::File,
  io,
  path::{Path, PathBuf},
  sync::{Arc, Mutex},
  time::Duration,
};

use aidsec_core::{CachedSource, IncidentTable, SectionId, VictimView};
use aidsec_csv::CsvSource;
use anyhow::{Context, Result};
use app::App;
use clap::Parser;
use crossterm::{
  event::{self, Event, KeyEventKind},
  execute,
  terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use serde::Deserialize;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

const DEFAULT_DATA: &str = "security_incidents.csv";

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "aidsec", about = "Terminal dashboard for aid worker security incidents")]
struct Args {
  /// Path to a TOML config file (data, section, view).
  #[arg(short, long, value_name = "FILE")]
  config: Option<PathBuf>,

  /// Incident CSV (default: security_incidents.csv).
  #[arg(short, long, env = "AIDSEC_DATA")]
  data: Option<PathBuf>,

  /// Section to open first, e.g. `yearly-trends`.
  #[arg(short, long)]
  section: Option<SectionId>,

  /// Victim profile view to start in: `total` or `proportional`.
  #[arg(long)]
  view: Option<VictimView>,

  /// Write logs to this file. The terminal is taken by the UI, so nothing
  /// is logged unless this is set.
  #[arg(long, value_name = "FILE", env = "AIDSEC_LOG")]
  log: Option<PathBuf>,
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file.
#[derive(Deserialize, Default, Debug)]
#[serde(default)]
struct ConfigFile {
  data:    Option<PathBuf>,
  section: Option<SectionId>,
  view:    Option<VictimView>,
}

impl ConfigFile {
  fn read(path: &Path) -> Result<Self> {
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).context("parsing config file")
  }
}

/// Resolved startup settings.
#[derive(Debug, PartialEq, Eq)]
struct Settings {
  data:    PathBuf,
  section: SectionId,
  view:    VictimView,
}

impl Settings {
  /// CLI flags override the config file, which overrides defaults.
  fn resolve(args: Args, file: ConfigFile) -> Self {
    Self {
      data:    args
        .data
        .or(file.data)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA)),
      section: args
        .section
        .or(file.section)
        .unwrap_or(SectionId::Introduction),
      view:    args.view.or(file.view).unwrap_or_default(),
    }
  }
}

// ─── Entry point ──────────────────────────────────────────────────────────────

fn main() -> Result<()> {
  let args = Args::parse();

  if let Some(path) = &args.log {
    init_file_logging(path)?;
  }

  let file_cfg = match &args.config {
    Some(path) => ConfigFile::read(path)?,
    None => ConfigFile::default(),
  };
  let settings = Settings::resolve(args, file_cfg);

  // Load the table before touching the terminal so errors print normally.
  let table = load_table(&settings.data)?;
  let mut app = App::new(table, settings.section, settings.view);

  // Set up the terminal.
  enable_raw_mode().context("enabling raw mode")?;
  let mut stdout = io::stdout();
  execute!(stdout, EnterAlternateScreen).context("entering alternate screen")?;
  let backend = CrosstermBackend::new(stdout);
  let mut terminal = Terminal::new(backend).context("creating terminal")?;

  let run_result = run_event_loop(&mut terminal, &mut app);

  // Restore terminal regardless of result.
  disable_raw_mode().ok();
  execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
  terminal.show_cursor().ok();

  run_result
}

fn init_file_logging(path: &Path) -> Result<()> {
  let file = File::create(path)
    .with_context(|| format!("creating log file {}", path.display()))?;
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .with_ansi(false)
    .with_writer(Mutex::new(file))
    .init();
  Ok(())
}

fn load_table(path: &Path) -> Result<Arc<IncidentTable>> {
  let source = CachedSource::new(CsvSource::new(path));
  let table = source
    .get()
    .with_context(|| format!("failed to load incidents from {}", path.display()))?;
  tracing::info!(records = table.len(), "incident table ready");
  Ok(table)
}

// ─── Event loop ───────────────────────────────────────────────────────────────

fn run_event_loop(
  terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
  app: &mut App,
) -> Result<()> {
  loop {
    terminal.draw(|f| ui::draw(f, app)).context("drawing frame")?;

    if !event::poll(Duration::from_millis(250)).context("polling events")? {
      continue;
    }

    match event::read().context("reading event")? {
      Event::Key(key) if key.kind == KeyEventKind::Press => {
        if !app.handle_key(key) {
          break;
        }
      }
      Event::Resize(_, _) => {
        // Terminal will redraw on next iteration.
      }
      _ => {}
    }
  }

  Ok(())
}
