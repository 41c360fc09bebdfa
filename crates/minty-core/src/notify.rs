//! The `NotificationSink` trait and the two-channel fan-out built on it.
//!
//! Sinks are implemented by transport crates (e.g. `minty-notify`). The
//! intake service only ever talks to a [`Notifier`], which attempts every
//! enabled sink concurrently and reports per-channel outcomes. A failed
//! delivery is logged and reported; it is never retried.

use std::future::Future;

use serde::Serialize;

use crate::lead::Lead;

// ─── Trait ───────────────────────────────────────────────────────────────────

/// A delivery channel for new-lead notifications.
pub trait NotificationSink: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Connection hints reported by the status endpoint. Must not contain
  /// secret values, only presence markers.
  type Status: Serialize + Send;

  /// Human-readable channel name used in logs and messages.
  fn name(&self) -> &'static str;

  /// Whether the operator switched this channel on.
  fn is_enabled(&self) -> bool;

  /// Whether the credentials this channel needs are present.
  fn is_configured(&self) -> bool;

  fn status(&self) -> Self::Status;

  /// Deliver one notification about `lead`.
  fn deliver<'a>(
    &'a self,
    lead: &'a Lead,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;
}

// ─── Outcomes ────────────────────────────────────────────────────────────────

/// What happened on one channel during a fan-out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
  Disabled,
  Sent,
  Failed(String),
}

impl Delivery {
  pub fn is_sent(&self) -> bool { matches!(self, Self::Sent) }
}

/// Per-channel outcomes of one fan-out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FanOutReport {
  pub email: Delivery,
  pub chat:  Delivery,
}

// ─── Fan-out ─────────────────────────────────────────────────────────────────

/// The email and chat sinks, notified together.
pub struct Notifier<E, C> {
  pub email: E,
  pub chat:  C,
}

impl<E, C> Notifier<E, C>
where
  E: NotificationSink,
  C: NotificationSink,
{
  pub fn new(email: E, chat: C) -> Self { Self { email, chat } }

  /// Attempt every enabled sink concurrently. Never fails; each channel's
  /// outcome is logged and returned.
  pub async fn fan_out(&self, lead: &Lead) -> FanOutReport {
    let (email, chat) =
      tokio::join!(deliver_one(&self.email, lead), deliver_one(&self.chat, lead));
    FanOutReport { email, chat }
  }
}

async fn deliver_one<S: NotificationSink>(sink: &S, lead: &Lead) -> Delivery {
  if !sink.is_enabled() {
    tracing::debug!(channel = sink.name(), lead_id = %lead.id, "channel disabled");
    return Delivery::Disabled;
  }
  match sink.deliver(lead).await {
    Ok(()) => {
      tracing::info!(channel = sink.name(), lead_id = %lead.id, "notification sent");
      Delivery::Sent
    }
    Err(e) => {
      tracing::warn!(
        channel = sink.name(),
        lead_id = %lead.id,
        error = %e,
        "notification delivery failed"
      );
      Delivery::Failed(e.to_string())
    }
  }
}

// ─── Test doubles ────────────────────────────────────────────────────────────

#[cfg(test)]
pub(crate) mod testing {
  use std::{
    sync::{
      Arc,
      atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
  };

  use serde::Serialize;
  use thiserror::Error;

  use super::*;

  #[derive(Debug, Error)]
  #[error("sink exploded")]
  pub struct Boom;

  #[derive(Serialize)]
  pub struct MockStatus {
    pub enabled: bool,
  }

  /// Counts deliveries; optionally fails or stalls.
  #[derive(Clone, Default)]
  pub struct MockSink {
    pub enabled:   bool,
    pub fail:      bool,
    pub delay:     Option<Duration>,
    pub delivered: Arc<AtomicUsize>,
  }

  impl MockSink {
    pub fn enabled() -> Self {
      Self {
        enabled: true,
        ..Default::default()
      }
    }

    pub fn failing() -> Self {
      Self {
        enabled: true,
        fail: true,
        ..Default::default()
      }
    }

    pub fn count(&self) -> usize { self.delivered.load(Ordering::SeqCst) }
  }

  impl NotificationSink for MockSink {
    type Error = Boom;
    type Status = MockStatus;

    fn name(&self) -> &'static str { "mock" }

    fn is_enabled(&self) -> bool { self.enabled }

    fn is_configured(&self) -> bool { true }

    fn status(&self) -> MockStatus {
      MockStatus {
        enabled: self.enabled,
      }
    }

    async fn deliver(&self, _lead: &Lead) -> Result<(), Boom> {
      if let Some(d) = self.delay {
        tokio::time::sleep(d).await;
      }
      if self.fail {
        return Err(Boom);
      }
      self.delivered.fetch_add(1, Ordering::SeqCst);
      Ok(())
    }
  }
}

#[cfg(test)]
mod tests {
  use chrono::Utc;

  use super::{testing::MockSink, *};

  #[tokio::test]
  async fn disabled_channels_are_skipped() {
    let n = Notifier::new(MockSink::default(), MockSink::default());
    let report = n.fan_out(&Lead::test_lead(Utc::now())).await;
    assert_eq!(report.email, Delivery::Disabled);
    assert_eq!(report.chat, Delivery::Disabled);
    assert_eq!(n.email.count() + n.chat.count(), 0);
  }

  #[tokio::test]
  async fn one_failure_does_not_block_the_other() {
    let n = Notifier::new(MockSink::failing(), MockSink::enabled());
    let report = n.fan_out(&Lead::test_lead(Utc::now())).await;
    assert_eq!(report.email, Delivery::Failed("sink exploded".into()));
    assert!(report.chat.is_sent());
    assert_eq!(n.chat.count(), 1);
  }
}
