//! Web dashboard for the aid worker incident table.
//!
//! Exposes an axum [`Router`] that renders dashboard sections as HTML pages
//! with embedded Plotly figures, plus a JSON view of the same panels. The
//! incident table is loaded before the router is built and shared read-only
//! by every request.

pub mod error;
pub mod figure;
pub mod handlers;
pub mod page;

pub use error::ApiError;

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use aidsec_core::IncidentTable;
use axum::{Router, routing::get};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

// ─── Configuration ───────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `AIDSEC_*` environment variables.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ServerConfig {
  pub host:      String,
  pub port:      u16,
  pub data_path: PathBuf,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:      "127.0.0.1".to_string(),
      port:      8501,
      data_path: PathBuf::from("security_incidents.csv"),
    }
  }
}

impl ServerConfig {
  /// Layer the optional TOML file at `path` under `AIDSEC_*` variables.
  pub fn load(path: &Path) -> Result<Self, config::ConfigError> {
    let mut cfg: Self = config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("AIDSEC"))
      .build()?
      .try_deserialize()?;
    cfg.data_path = expand_tilde(&cfg.data_path);
    Ok(cfg)
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

// ─── Application state ───────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState {
  pub table:  Arc<IncidentTable>,
  pub config: Arc<ServerConfig>,
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// Build the dashboard [`Router`].
pub fn router(state: AppState) -> Router {
  Router::new()
    .route("/",                      get(handlers::index))
    .route("/health",                get(handlers::health))
    .route("/sections/{id}",         get(handlers::section_page))
    .route("/sections/{id}/panels",  get(handlers::section_panels))
    .fallback(handlers::not_found)
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

// ─── Integration tests ───────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use std::io::Write as _;

  use aidsec_core::{Column, HarmCounts, IncidentRecord};
  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
    response::Response,
  };
  use serde_json::Value;
  use strum::IntoEnumIterator;
  use tower::ServiceExt as _;

  use super::*;

  fn make_state(columns: impl IntoIterator<Item = Column>) -> AppState {
    let records = vec![
      IncidentRecord {
        year: Some(2020),
        month: Some(2),
        country: Some("Afghanistan".into()),
        region: Some("Kabul".into()),
        means_of_attack: Some("Shooting".into()),
        location: Some("Road".into()),
        actor_type: Some("Unknown".into()),
        harm: HarmCounts::new(1, 0, 0),
        total_nationals: 1,
        nationals: HarmCounts::new(1, 0, 0),
        ..Default::default()
      },
      IncidentRecord {
        year: Some(2021),
        month: Some(7),
        country: Some("Sudan".into()),
        region: Some("Darfur".into()),
        means_of_attack: Some("Kidnapping".into()),
        location: Some("Project site".into()),
        actor_type: Some("Criminal".into()),
        harm: HarmCounts::new(0, 1, 2),
        total_internationals: 3,
        internationals: HarmCounts::new(0, 1, 2),
        ..Default::default()
      },
    ];
    AppState {
      table:  Arc::new(IncidentTable::new(records, columns)),
      config: Arc::new(ServerConfig::default()),
    }
  }

  async fn get(state: AppState, uri: &str) -> Response {
    let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
    router(state).oneshot(req).await.unwrap()
  }

  async fn body_json(resp: Response) -> Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
      .await
      .unwrap();
    serde_json::from_slice(&bytes).unwrap()
  }

  async fn body_text(resp: Response) -> String {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
      .await
      .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
  }

  // ── Navigation ──────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn root_redirects_to_introduction() {
    let resp = get(make_state(Column::iter()), "/").await;
    assert!(resp.status().is_redirection());
    assert_eq!(
      resp.headers().get(header::LOCATION).unwrap(),
      "/sections/introduction"
    );
  }

  #[tokio::test]
  async fn every_section_page_renders() {
    for id in aidsec_core::SectionId::iter() {
      let resp =
        get(make_state(Column::iter()), &format!("/sections/{id}")).await;
      assert_eq!(resp.status(), StatusCode::OK, "{id}");
      let html = body_text(resp).await;
      assert!(html.contains("<nav>"), "{id}");
    }
  }

  #[tokio::test]
  async fn unknown_section_is_404_json() {
    let resp = get(make_state(Column::iter()), "/sections/weather").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let json = body_json(resp).await;
    assert!(json["error"].as_str().unwrap().contains("weather"));
  }

  #[tokio::test]
  async fn unknown_route_is_404_json() {
    let resp = get(make_state(Column::iter()), "/nowhere").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert!(body_json(resp).await["error"].is_string());
  }

  #[tokio::test]
  async fn bad_view_is_400() {
    let resp = get(
      make_state(Column::iter()),
      "/sections/victim-profiles?view=sideways",
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let json = body_json(resp).await;
    assert!(json["error"].as_str().unwrap().contains("sideways"));
  }

  // ── Panels ──────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn panels_follow_the_victim_view() {
    let total = body_json(
      get(make_state(Column::iter()), "/sections/victim-profiles/panels").await,
    )
    .await;
    assert_eq!(total["view"], "total");
    assert_eq!(total["panels"][1]["spec"]["derivation"], "harm-totals");

    let prop = body_json(
      get(
        make_state(Column::iter()),
        "/sections/victim-profiles/panels?view=proportional",
      )
      .await,
    )
    .await;
    assert_eq!(prop["view"], "proportional");
    let breakdown = &prop["panels"][1];
    assert_eq!(breakdown["spec"]["derivation"], "staff-share-by-harm");
    assert_eq!(breakdown["status"], "ready");
    assert_eq!(breakdown["table"]["shape"], "breakdown");
    assert_eq!(breakdown["figure"]["layout"]["barmode"], "stack");
  }

  #[tokio::test]
  async fn missing_region_is_a_notice_not_an_error() {
    let state = make_state(Column::iter().filter(|c| *c != Column::Region));
    let resp = get(state, "/sections/geographic-patterns/panels").await;
    assert_eq!(resp.status(), StatusCode::OK);

    let json = body_json(resp).await;
    let notices = json["notices"].as_array().unwrap();
    assert_eq!(notices.len(), 1);
    assert!(notices[0].as_str().unwrap().contains("Region"));

    let statuses: Vec<&str> = json["panels"]
      .as_array()
      .unwrap()
      .iter()
      .map(|p| p["status"].as_str().unwrap())
      .collect();
    assert_eq!(statuses, vec!["ready", "ready", "unavailable", "ready"]);
  }

  #[tokio::test]
  async fn health_reports_record_count() {
    let resp = get(make_state(Column::iter()), "/health").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["records"], 2);
  }

  // ── Configuration ───────────────────────────────────────────────────────────

  #[test]
  fn config_defaults_apply_without_a_file() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = ServerConfig::load(&dir.path().join("absent.toml")).unwrap();
    assert_eq!(cfg.port, 8501);
    assert_eq!(cfg.address(), "127.0.0.1:8501");
  }

  #[test]
  fn config_file_overrides_defaults() {
    let mut file =
      tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(file, "port = 9000\ndata_path = \"/srv/incidents.csv\"").unwrap();
    let cfg = ServerConfig::load(file.path()).unwrap();
    assert_eq!(cfg.port, 9000);
    assert_eq!(cfg.host, "127.0.0.1");
    assert_eq!(cfg.data_path, PathBuf::from("/srv/incidents.csv"));
  }

  #[test]
  fn tilde_expands_to_home() {
    let Ok(home) = std::env::var("HOME") else { return };
    assert_eq!(
      expand_tilde(Path::new("~/data.csv")),
      PathBuf::from(home).join("data.csv")
    );
    assert_eq!(expand_tilde(Path::new("/abs.csv")), PathBuf::from("/abs.csv"));
  }
}
