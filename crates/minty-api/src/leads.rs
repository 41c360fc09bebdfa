//! Handlers for `/leads`.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/leads` | 201 on acceptance; notification runs afterwards |
//! | `GET`  | `/leads` | Aggregate counters |

use axum::{
  Json,
  extract::{State, rejection::JsonRejection},
  http::StatusCode,
  response::{IntoResponse, Response},
};
use chrono::Utc;
use minty_core::{
  envelope::Envelope,
  lead::{LeadStats, LeadSubmission},
  notify::NotificationSink,
};
use serde::{Deserialize, Serialize};

use crate::{AppState, error::ApiError};

pub const SUBMITTED: &str =
  "Your request has been submitted! We will get back to you within 48 hours.";

/// The contact echo returned to the submitter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Receipt {
  pub id:      String,
  pub email:   String,
  pub company: String,
}

// ─── Submit ──────────────────────────────────────────────────────────────────

/// `POST /leads`
///
/// The response is fully built before the fan-out is spawned, so delivery
/// latency and failures never reach the submitter.
pub async fn submit<E, C>(
  State(state): State<AppState<E, C>>,
  body: Result<Json<LeadSubmission>, JsonRejection>,
) -> Result<Response, ApiError>
where
  E: NotificationSink + 'static,
  C: NotificationSink + 'static,
{
  let Json(submission) = body.map_err(|e| {
    ApiError::Validation(format!("Invalid request body: {}", e.body_text()))
  })?;

  let accepted = state.intake.accept(submission)?;
  let lead = accepted.lead();
  let receipt = Receipt {
    id:      lead.id.clone(),
    email:   lead.email.clone(),
    company: lead.company.clone(),
  };
  let response = (
    StatusCode::CREATED,
    Json(Envelope::ok(receipt).with_message(SUBMITTED)),
  )
    .into_response();

  accepted.notify_in_background();
  Ok(response)
}

// ─── Stats ───────────────────────────────────────────────────────────────────

/// `GET /leads`
pub async fn stats<E, C>(
  State(state): State<AppState<E, C>>,
) -> Json<Envelope<LeadStats>>
where
  E: NotificationSink + 'static,
  C: NotificationSink + 'static,
{
  Json(Envelope::ok(state.intake.stats(Utc::now())))
}
