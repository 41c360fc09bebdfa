//! Async HTTP client wrapping the Minty Labs JSON API.

use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, Utc};
use minty_core::{
  envelope::Envelope,
  lead::{LeadStats, LeadSubmission},
};
use reqwest::{Client, Response};
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::Value;

/// `GET /api/health` reply. Not wrapped in an envelope.
#[derive(Debug, Deserialize)]
pub struct Health {
  pub status:      String,
  pub message:     String,
  pub timestamp:   DateTime<Utc>,
  pub environment: String,
}

/// The contact echo in a successful submission reply.
#[derive(Debug, Deserialize)]
pub struct Receipt {
  pub id:      String,
  pub email:   String,
  pub company: String,
}

/// Async HTTP client for the site API.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ApiClient {
  client:   Client,
  base_url: String,
}

impl ApiClient {
  pub fn new(base_url: impl Into<String>) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self {
      client,
      base_url: base_url.into(),
    })
  }

  fn url(&self, path: &str) -> String {
    format!("{}/api{}", self.base_url.trim_end_matches('/'), path)
  }

  /// Fail on a non-2xx status, otherwise decode the body.
  async fn decode<T: DeserializeOwned>(resp: Response, what: &str) -> Result<T> {
    if !resp.status().is_success() {
      return Err(anyhow!("{what} → {}", resp.status()));
    }
    resp.json().await.with_context(|| format!("deserialising {what}"))
  }

  /// `GET /api/health`
  pub async fn health(&self) -> Result<Health> {
    let resp = self
      .client
      .get(self.url("/health"))
      .send()
      .await
      .context("GET /health failed")?;
    Self::decode(resp, "GET /health").await
  }

  // ── Leads ─────────────────────────────────────────────────────────────────

  /// `GET /api/leads`
  pub async fn stats(&self) -> Result<Envelope<LeadStats>> {
    let resp = self
      .client
      .get(self.url("/leads"))
      .send()
      .await
      .context("GET /leads failed")?;
    Self::decode(resp, "GET /leads").await
  }

  /// `POST /api/leads`
  ///
  /// Rejections (400/500) carry an envelope too, so any reply with a
  /// readable body is returned as-is; only transport and decode failures are
  /// errors.
  pub async fn submit(&self, lead: &LeadSubmission) -> Result<Envelope<Receipt>> {
    let resp = self
      .client
      .post(self.url("/leads"))
      .json(lead)
      .send()
      .await
      .context("POST /leads failed")?;
    let status = resp.status();
    resp
      .json()
      .await
      .with_context(|| format!("POST /leads → {status}: unreadable reply"))
  }

  // ── Notifications ─────────────────────────────────────────────────────────

  /// `GET /api/notifications/status`
  pub async fn notification_status(&self) -> Result<Envelope<Value>> {
    let resp = self
      .client
      .get(self.url("/notifications/status"))
      .send()
      .await
      .context("GET /notifications/status failed")?;
    Self::decode(resp, "GET /notifications/status").await
  }

  /// `POST /api/notifications/test`
  pub async fn notification_test(&self) -> Result<Envelope<Value>> {
    let resp = self
      .client
      .post(self.url("/notifications/test"))
      .send()
      .await
      .context("POST /notifications/test failed")?;
    Self::decode(resp, "POST /notifications/test").await
  }
}
