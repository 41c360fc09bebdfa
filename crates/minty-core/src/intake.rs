//! The lead intake service.
//!
//! Accepting a lead is synchronous: validate, stamp, count. Notification is a
//! separate step the caller triggers once its response is ready, via
//! [`Accepted::notify_in_background`]. Fan-out runs on a tracked background
//! task so [`LeadIntake::shutdown`] can drain it; deliveries are attempted
//! once and never retried.

use std::{
  collections::HashMap,
  sync::{Arc, Mutex, PoisonError},
};

use chrono::{DateTime, NaiveDate, Utc};
use tokio::task::JoinHandle;
use tokio_util::task::TaskTracker;

use crate::{
  Result,
  lead::{Lead, LeadStats, LeadStatus, LeadSubmission, SOURCE_WEBSITE_FORM},
  notify::{FanOutReport, NotificationSink, Notifier},
};

// ─── Counters ────────────────────────────────────────────────────────────────

/// In-memory tallies of accepted leads. Only counts are kept, never the
/// contact details themselves.
#[derive(Debug, Default)]
struct Tally {
  by_status:  HashMap<LeadStatus, u64>,
  /// Leads on the most recent UTC day seen; replaced when the date rolls over.
  latest_day: Option<(NaiveDate, u64)>,
}

impl Tally {
  fn record(&mut self, lead: &Lead) {
    *self.by_status.entry(lead.status).or_default() += 1;
    let day = lead.created_at.date_naive();
    match self.latest_day {
      Some((d, ref mut n)) if d == day => *n += 1,
      // A lead stamped before the latest day cannot count towards today.
      Some((d, _)) if d > day => {}
      _ => self.latest_day = Some((day, 1)),
    }
  }

  fn snapshot(&self, now: DateTime<Utc>) -> LeadStats {
    let count = |s: LeadStatus| self.by_status.get(&s).copied().unwrap_or(0);
    let total = self.by_status.values().sum::<u64>();
    let qualified = count(LeadStatus::Qualified);
    LeadStats {
      total,
      new: count(LeadStatus::New),
      contacted: count(LeadStatus::Contacted),
      qualified,
      closed: count(LeadStatus::Closed),
      today: match self.latest_day {
        Some((d, n)) if d == now.date_naive() => n,
        _ => 0,
      },
      conversion_rate: if total == 0 { 0 } else { qualified * 100 / total },
      last_updated: now,
    }
  }
}

// ─── Service ─────────────────────────────────────────────────────────────────

pub struct LeadIntake<E, C> {
  notifier: Arc<Notifier<E, C>>,
  tally:    Mutex<Tally>,
  tasks:    TaskTracker,
}

impl<E, C> LeadIntake<E, C>
where
  E: NotificationSink + 'static,
  C: NotificationSink + 'static,
{
  pub fn new(notifier: Notifier<E, C>) -> Self {
    Self {
      notifier: Arc::new(notifier),
      tally:    Mutex::default(),
      tasks:    TaskTracker::new(),
    }
  }

  pub fn notifier(&self) -> &Notifier<E, C> { &self.notifier }

  /// Validate `submission` and record it as a new website-form lead.
  ///
  /// Nothing is sent until the returned [`Accepted`] is told to notify.
  pub fn accept(&self, submission: LeadSubmission) -> Result<Accepted<E, C>> {
    let lead = Lead::accept(submission, SOURCE_WEBSITE_FORM, Utc::now())?;
    self
      .tally
      .lock()
      .unwrap_or_else(PoisonError::into_inner)
      .record(&lead);

    tracing::info!(
      lead_id = %lead.id,
      company = %lead.company,
      "new lead accepted"
    );

    Ok(Accepted {
      lead,
      notifier: Arc::clone(&self.notifier),
      tasks: self.tasks.clone(),
    })
  }

  pub fn stats(&self, now: DateTime<Utc>) -> LeadStats {
    self
      .tally
      .lock()
      .unwrap_or_else(PoisonError::into_inner)
      .snapshot(now)
  }

  /// Stop tracking new work and wait for in-flight notifications to finish.
  pub async fn shutdown(&self) {
    self.tasks.close();
    self.tasks.wait().await;
  }
}

/// A lead that has been accepted but not yet announced.
#[must_use = "call `notify_in_background` once the response is ready"]
pub struct Accepted<E, C> {
  lead:     Lead,
  notifier: Arc<Notifier<E, C>>,
  tasks:    TaskTracker,
}

impl<E, C> Accepted<E, C>
where
  E: NotificationSink + 'static,
  C: NotificationSink + 'static,
{
  pub fn lead(&self) -> &Lead { &self.lead }

  /// Spawn the fan-out as detached, tracked work. The handle may be dropped;
  /// it exists so callers that care can observe the per-channel report.
  pub fn notify_in_background(self) -> JoinHandle<FanOutReport> {
    let Self {
      lead,
      notifier,
      tasks,
    } = self;
    tasks.spawn(async move { notifier.fan_out(&lead).await })
  }
}

#[cfg(test)]
mod tests {
  use std::time::Duration;

  use chrono::TimeZone;

  use super::*;
  use crate::{
    Error,
    notify::{Delivery, testing::MockSink},
  };

  fn valid() -> LeadSubmission {
    LeadSubmission {
      full_name: Some("Jane".into()),
      email: Some("jane@x.com".into()),
      company: Some("Acme".into()),
      consent: Some(true),
      ..Default::default()
    }
  }

  fn intake(email: MockSink, chat: MockSink) -> LeadIntake<MockSink, MockSink> {
    LeadIntake::new(Notifier::new(email, chat))
  }

  #[tokio::test]
  async fn invalid_submission_is_not_counted() {
    let svc = intake(MockSink::enabled(), MockSink::enabled());
    let err = svc
      .accept(LeadSubmission {
        full_name: Some(String::new()),
        ..valid()
      })
      .err()
      .unwrap();
    assert!(matches!(err, Error::MissingField("fullName")));
    assert_eq!(svc.stats(Utc::now()).total, 0);
  }

  #[tokio::test(start_paused = true)]
  async fn notification_runs_after_acceptance() {
    let email = MockSink {
      delay: Some(Duration::from_secs(2)),
      ..MockSink::enabled()
    };
    let chat = MockSink::enabled();
    let svc = intake(email.clone(), chat.clone());

    let accepted = svc.accept(valid()).unwrap();
    assert_eq!(accepted.lead().status, LeadStatus::New);
    assert_eq!(email.count() + chat.count(), 0);

    let handle = accepted.notify_in_background();
    svc.shutdown().await;
    assert_eq!(email.count(), 1);
    assert_eq!(chat.count(), 1);

    let report = handle.await.unwrap();
    assert!(report.email.is_sent());
  }

  #[tokio::test]
  async fn sink_failure_does_not_affect_acceptance() {
    let chat = MockSink::enabled();
    let svc = intake(MockSink::failing(), chat.clone());
    let report = svc
      .accept(valid())
      .unwrap()
      .notify_in_background()
      .await
      .unwrap();
    assert!(matches!(report.email, Delivery::Failed(_)));
    assert!(report.chat.is_sent());
    assert_eq!(svc.stats(Utc::now()).new, 1);
  }

  #[test]
  fn stats_count_by_status_and_day() {
    let mut tally = Tally::default();
    let monday = Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap();
    let tuesday = Utc.with_ymd_and_hms(2026, 3, 3, 9, 0, 0).unwrap();
    for at in [monday, tuesday, tuesday] {
      let mut lead = Lead::test_lead(at);
      lead.status = LeadStatus::New;
      tally.record(&lead);
    }
    let mut qualified = Lead::test_lead(tuesday);
    qualified.status = LeadStatus::Qualified;
    tally.record(&qualified);

    let stats = tally.snapshot(tuesday);
    assert_eq!(stats.total, 4);
    assert_eq!(stats.new, 3);
    assert_eq!(stats.qualified, 1);
    assert_eq!(stats.today, 3);
    assert_eq!(stats.conversion_rate, 25);
  }

  #[test]
  fn today_resets_when_the_day_rolls_over() {
    let mut tally = Tally::default();
    let monday = Utc.with_ymd_and_hms(2026, 3, 2, 23, 59, 0).unwrap();
    let tuesday = Utc.with_ymd_and_hms(2026, 3, 3, 0, 1, 0).unwrap();
    tally.record(&Lead::test_lead(monday));
    tally.record(&Lead::test_lead(monday));
    assert_eq!(tally.snapshot(monday).today, 2);
    assert_eq!(tally.snapshot(tuesday).today, 0);

    tally.record(&Lead::test_lead(tuesday));
    let stats = tally.snapshot(tuesday);
    assert_eq!(stats.today, 1);
    assert_eq!(stats.total, 3);
    assert_eq!(tally.latest_day, Some((tuesday.date_naive(), 1)));
  }

  #[test]
  fn empty_stats_have_zero_conversion() {
    let stats = Tally::default().snapshot(Utc::now());
    assert_eq!(stats.total, 0);
    assert_eq!(stats.conversion_rate, 0);
  }
}
