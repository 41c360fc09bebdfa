//! Client-side state of the lead form: the field values and the status
//! banner shown after a submission.
//!
//! Every finished submission schedules its own banner clear
//! [`BANNER_TIMEOUT`] later. Those clears are independent of each other, so
//! an earlier submission's timer may hide a later submission's banner.

use std::{sync::Arc, time::Duration};

use tokio::{sync::watch, task::JoinHandle};

use crate::lead::LeadSubmission;

pub const BANNER_TIMEOUT: Duration = Duration::from_secs(5);

const FALLBACK_REJECTED: &str = "Something went wrong while sending the form.";
const FALLBACK_TRANSPORT: &str =
  "Something went wrong while sending the form. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmissionStatus {
  #[default]
  Idle,
  Loading,
  Success,
  Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Banner {
  pub status:  SubmissionStatus,
  pub message: String,
}

/// How a submission ended, as seen from the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormOutcome {
  /// The server answered. `message` is whatever it said, if anything.
  Replied {
    success: bool,
    message: Option<String>,
  },
  /// The request never produced a readable reply.
  Unreachable,
}

pub struct LeadForm {
  pub fields: LeadSubmission,
  banner:     Arc<watch::Sender<Banner>>,
  clears:     Vec<JoinHandle<()>>,
  timeout:    Duration,
}

impl Default for LeadForm {
  fn default() -> Self { Self::new(BANNER_TIMEOUT) }
}

impl LeadForm {
  pub fn new(timeout: Duration) -> Self {
    Self {
      fields: LeadSubmission::default(),
      banner: Arc::new(watch::channel(Banner::default()).0),
      clears: Vec::new(),
      timeout,
    }
  }

  pub fn banner(&self) -> Banner { self.banner.borrow().clone() }

  pub fn subscribe(&self) -> watch::Receiver<Banner> { self.banner.subscribe() }

  /// Mark a submission as in flight.
  pub fn begin(&mut self) {
    self.banner.send_replace(Banner {
      status:  SubmissionStatus::Loading,
      message: String::new(),
    });
  }

  /// Record how the submission ended and schedule the banner to clear.
  ///
  /// A successful reply also resets the fields. Must be called inside a tokio
  /// runtime.
  pub fn finish(&mut self, outcome: FormOutcome) {
    let banner = match outcome {
      FormOutcome::Replied {
        success: true,
        message,
      } => {
        self.fields = LeadSubmission::default();
        Banner {
          status:  SubmissionStatus::Success,
          message: message.unwrap_or_default(),
        }
      }
      FormOutcome::Replied {
        success: false,
        message,
      } => Banner {
        status:  SubmissionStatus::Error,
        message: message.unwrap_or_else(|| FALLBACK_REJECTED.into()),
      },
      FormOutcome::Unreachable => Banner {
        status:  SubmissionStatus::Error,
        message: FALLBACK_TRANSPORT.into(),
      },
    };
    self.banner.send_replace(banner);

    self.clears.retain(|h| !h.is_finished());
    let tx = Arc::clone(&self.banner);
    let timeout = self.timeout;
    self.clears.push(tokio::spawn(async move {
      tokio::time::sleep(timeout).await;
      tx.send_replace(Banner::default());
    }));
  }
}

impl Drop for LeadForm {
  fn drop(&mut self) {
    for h in self.clears.drain(..) {
      h.abort();
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn ok(msg: &str) -> FormOutcome {
    FormOutcome::Replied {
      success: true,
      message: Some(msg.into()),
    }
  }

  #[tokio::test(start_paused = true)]
  async fn success_resets_fields_and_clears_after_timeout() {
    let mut form = LeadForm::default();
    form.fields.full_name = Some("Jane".into());
    form.begin();
    assert_eq!(form.banner().status, SubmissionStatus::Loading);

    form.finish(ok("Thanks!"));
    assert_eq!(form.banner().status, SubmissionStatus::Success);
    assert_eq!(form.banner().message, "Thanks!");
    assert!(form.fields.full_name.is_none());

    tokio::time::sleep(Duration::from_millis(5_010)).await;
    assert_eq!(form.banner(), Banner::default());
  }

  #[tokio::test(start_paused = true)]
  async fn rejection_keeps_fields_and_uses_server_message() {
    let mut form = LeadForm::default();
    form.fields.full_name = Some("Jane".into());
    form.begin();
    form.finish(FormOutcome::Replied {
      success: false,
      message: Some("Please fill in all required fields".into()),
    });
    assert_eq!(form.banner().status, SubmissionStatus::Error);
    assert_eq!(form.banner().message, "Please fill in all required fields");
    assert_eq!(form.fields.full_name.as_deref(), Some("Jane"));
  }

  #[tokio::test(start_paused = true)]
  async fn unreachable_server_gets_fallback_message() {
    let mut form = LeadForm::default();
    form.begin();
    form.finish(FormOutcome::Unreachable);
    assert_eq!(form.banner().message, FALLBACK_TRANSPORT);
  }

  #[tokio::test(start_paused = true)]
  async fn earlier_clear_is_not_cancelled_by_a_later_submission() {
    let mut form = LeadForm::default();
    form.begin();
    form.finish(ok("first"));

    tokio::time::sleep(Duration::from_secs(3)).await;
    form.begin();
    form.finish(ok("second"));
    assert_eq!(form.banner().message, "second");

    // The first submission's clear fires at t=5s.
    tokio::time::sleep(Duration::from_millis(2_010)).await;
    assert_eq!(form.banner(), Banner::default());
  }
}
