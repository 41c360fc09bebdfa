//! `GET /health`

use axum::{Json, extract::State};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::AppState;

#[derive(Debug, Serialize)]
pub struct Health {
  pub status:      &'static str,
  pub message:     &'static str,
  pub timestamp:   DateTime<Utc>,
  pub environment: String,
}

pub async fn handler<E, C>(State(state): State<AppState<E, C>>) -> Json<Health> {
  Json(Health {
    status:      "OK",
    message:     "Minty Labs API is running",
    timestamp:   Utc::now(),
    environment: state.environment.to_string(),
  })
}
