//! Route handlers.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/` | Redirects to the introduction |
//! | `GET`  | `/sections/{id}` | HTML page; optional `?view=total\|proportional` |
//! | `GET`  | `/sections/{id}/panels` | Same section as JSON |
//! | `GET`  | `/health` | Record count |

use std::str::FromStr;

use aidsec_core::{SectionId, SectionView, VictimView, render_section};
use axum::{
  Json,
  extract::{Path, Query, State},
  http::Uri,
  response::{Html, Redirect},
};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{
  AppState,
  error::{ApiError, Result},
  figure, page,
};

#[derive(Debug, Default, Deserialize)]
pub struct ViewParams {
  pub view: Option<String>,
}

fn parse_section(raw: &str) -> Result<SectionId> {
  SectionId::from_str(raw)
    .map_err(|_| ApiError::NotFound(format!("unknown section '{raw}'")))
}

fn parse_view(params: &ViewParams) -> Result<VictimView> {
  match params.view.as_deref() {
    None => Ok(VictimView::default()),
    Some(raw) => VictimView::from_str(raw).map_err(|_| {
      ApiError::BadRequest(format!(
        "unknown view '{raw}', expected 'total' or 'proportional'"
      ))
    }),
  }
}

fn render(
  state: &AppState,
  id: &str,
  params: &ViewParams,
) -> Result<SectionView> {
  let id = parse_section(id)?;
  let view = parse_view(params)?;
  Ok(render_section(&state.table, id, view))
}

/// `GET /`
pub async fn index() -> Redirect {
  Redirect::to(&format!("/sections/{}", SectionId::Introduction))
}

/// `GET /sections/{id}[?view=…]`
pub async fn section_page(
  State(state): State<AppState>,
  Path(id): Path<String>,
  Query(params): Query<ViewParams>,
) -> Result<Html<String>> {
  let section = render(&state, &id, &params)?;
  Ok(Html(page::render(&section)))
}

/// `GET /sections/{id}/panels[?view=…]`
pub async fn section_panels(
  State(state): State<AppState>,
  Path(id): Path<String>,
  Query(params): Query<ViewParams>,
) -> Result<Json<Value>> {
  let section = render(&state, &id, &params)?;
  Ok(Json(figure::section_json(&section)?))
}

/// `GET /health`
pub async fn health(State(state): State<AppState>) -> Json<Value> {
  Json(json!({ "status": "ok", "records": state.table.len() }))
}

pub async fn not_found(uri: Uri) -> ApiError {
  ApiError::NotFound(format!("no route for {}", uri.path()))
}
