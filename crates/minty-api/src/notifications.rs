//! Handlers for `/notifications/*`: configuration status and a test send.

use axum::{Json, extract::State};
use chrono::{DateTime, Utc};
use minty_core::{
  envelope::Envelope,
  lead::Lead,
  notify::{Delivery, NotificationSink},
};
use serde::Serialize;

use crate::AppState;

// ─── Status ──────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct StatusReport<ES, TS> {
  pub email:       ES,
  pub telegram:    TS,
  pub environment: String,
  pub timestamp:   DateTime<Utc>,
}

/// `GET /notifications/status`
pub async fn status<E, C>(
  State(state): State<AppState<E, C>>,
) -> Json<Envelope<StatusReport<E::Status, C::Status>>>
where
  E: NotificationSink + 'static,
  C: NotificationSink + 'static,
{
  let notifier = state.intake.notifier();
  Json(Envelope::ok(StatusReport {
    email:       notifier.email.status(),
    telegram:    notifier.chat.status(),
    environment: state.environment.to_string(),
    timestamp:   Utc::now(),
  }))
}

// ─── Test ────────────────────────────────────────────────────────────────────

/// The outcome of the test send on one channel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChannelResult {
  pub enabled: bool,
  pub sent:    bool,
  pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TestReport {
  pub email:    ChannelResult,
  pub telegram: ChannelResult,
}

/// User-facing wording for one channel.
struct Wording {
  sent:     &'static str,
  disabled: &'static str,
  error:    &'static str,
}

const EMAIL: Wording = Wording {
  sent:     "Test email sent successfully",
  disabled: "Email notifications disabled or not configured",
  error:    "Email error",
};

const TELEGRAM: Wording = Wording {
  sent:     "Test Telegram message sent successfully",
  disabled: "Telegram notifications disabled or not configured",
  error:    "Telegram error",
};

fn describe(enabled: bool, delivery: Delivery, wording: &Wording) -> ChannelResult {
  let message = match &delivery {
    Delivery::Sent => wording.sent.to_owned(),
    Delivery::Disabled => wording.disabled.to_owned(),
    Delivery::Failed(e) => format!("{}: {e}", wording.error),
  };
  ChannelResult {
    enabled,
    sent: delivery.is_sent(),
    message,
  }
}

/// `POST /notifications/test`
///
/// Unlike a real submission this waits for both channels, since the report
/// is the whole point of the call.
pub async fn test<E, C>(
  State(state): State<AppState<E, C>>,
) -> Json<Envelope<TestReport>>
where
  E: NotificationSink + 'static,
  C: NotificationSink + 'static,
{
  let notifier = state.intake.notifier();
  let report = notifier.fan_out(&Lead::test_lead(Utc::now())).await;
  Json(
    Envelope::ok(TestReport {
      email:    describe(notifier.email.is_enabled(), report.email, &EMAIL),
      telegram: describe(notifier.chat.is_enabled(), report.chat, &TELEGRAM),
    })
    .with_message("Notification tests completed"),
  )
}
