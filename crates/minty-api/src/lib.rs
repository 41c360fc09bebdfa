//! JSON REST API for the Minty Labs site.
//!
//! Exposes an axum [`Router`] over a [`LeadIntake`] and a read-only
//! [`ContentStore`]. TLS, request tracing and CORS headers are the caller's
//! responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", minty_api::api_router(state))
//! ```

pub mod content;
pub mod error;
pub mod health;
pub mod leads;
pub mod notifications;


use std::{any::Any, sync::Arc};

use axum::{
  Router,
  extract::FromRef,
  http::StatusCode,
  response::{IntoResponse, Response},
  routing::{MethodRouter, get, post},
};
use minty_core::{
  content::ContentStore,
  intake::LeadIntake,
  notify::NotificationSink,
};
use tower_http::catch_panic::CatchPanicLayer;

pub use error::ApiError;

/// Shared state handed to every handler.
pub struct AppState<E, C> {
  pub intake:      Arc<LeadIntake<E, C>>,
  pub content:     Arc<ContentStore>,
  /// Deployment label echoed by `/health` and `/notifications/status`.
  pub environment: Arc<str>,
}

// Derive would demand `E: Clone, C: Clone`.
impl<E, C> Clone for AppState<E, C> {
  fn clone(&self) -> Self {
    Self {
      intake:      Arc::clone(&self.intake),
      content:     Arc::clone(&self.content),
      environment: Arc::clone(&self.environment),
    }
  }
}

impl<E, C> FromRef<AppState<E, C>> for Arc<ContentStore> {
  fn from_ref(state: &AppState<E, C>) -> Self { Arc::clone(&state.content) }
}

/// Build a fully-materialised API router for `state`.
///
/// Every route answers `OPTIONS` with an empty 200 and any other unsupported
/// verb with a 405 envelope. A panicking handler yields the 500 envelope
/// instead of tearing down the connection.
pub fn api_router<E, C>(state: AppState<E, C>) -> Router<()>
where
  E: NotificationSink + 'static,
  C: NotificationSink + 'static,
{
  Router::new()
    // Leads
    .route(
      "/leads",
      strict(get(leads::stats::<E, C>).post(leads::submit::<E, C>)),
    )
    // Notifications
    .route(
      "/notifications/status",
      strict(get(notifications::status::<E, C>)),
    )
    .route("/notifications/test", strict(post(notifications::test::<E, C>)))
    .route("/health", strict(get(health::handler::<E, C>)))
    // Content
    .route("/testimonials", strict(get(content::testimonials)))
    .route(
      "/testimonials/featured",
      strict(get(content::featured_testimonials)),
    )
    .route("/testimonials/industries", strict(get(content::industries)))
    .route("/case-studies", strict(get(content::case_studies)))
    .route(
      "/case-studies/featured",
      strict(get(content::featured_case_studies)),
    )
    .route("/case-studies/categories", strict(get(content::categories)))
    .route("/case-studies/{slug}", strict(get(content::case_study)))
    .with_state(state)
    .layer(CatchPanicLayer::custom(panic_response))
}

/// Add the CORS preflight and 405 handling shared by every route.
fn strict<S>(route: MethodRouter<S>) -> MethodRouter<S>
where
  S: Clone + Send + Sync + 'static,
{
  route.options(preflight).fallback(method_not_allowed)
}

async fn preflight() -> StatusCode { StatusCode::OK }

async fn method_not_allowed() -> ApiError { ApiError::MethodNotAllowed }

fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
  let detail = panic
    .downcast_ref::<String>()
    .map(String::as_str)
    .or_else(|| panic.downcast_ref::<&str>().copied())
    .unwrap_or("handler panicked")
    .to_owned();
  ApiError::Internal(detail.into()).into_response()
}
