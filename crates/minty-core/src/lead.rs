//! Lead types for an inquiry submitted through the site's contact form.
//!
//! A [`LeadSubmission`] is whatever the form posted. It becomes a [`Lead`]
//! only after [`Lead::accept`] has checked the required contact fields, so a
//! value of type `Lead` is always valid and always starts in
//! [`LeadStatus::New`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

/// Source tag stamped on leads accepted from the public form.
pub const SOURCE_WEBSITE_FORM: &str = "website-form";

/// Source tag stamped on the synthetic lead used to test notification sinks.
pub const SOURCE_NOTIFICATION_TEST: &str = "notification-test";

// ─── Status ──────────────────────────────────────────────────────────────────

/// Where a lead sits in the sales pipeline. Only `New` is ever assigned here;
/// later transitions belong to whatever CRM the team uses.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum LeadStatus {
  #[default]
  New,
  Contacted,
  Qualified,
  Closed,
}

// ─── Submission ──────────────────────────────────────────────────────────────

/// The raw payload posted by the lead form. Every field is optional at this
/// stage; [`Lead::accept`] decides whether it is good enough.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LeadSubmission {
  pub full_name:   Option<String>,
  pub email:       Option<String>,
  pub company:     Option<String>,
  pub role:        Option<String>,
  pub tech_stack:  Option<String>,
  pub seniority:   Option<String>,
  pub time_zone:   Option<String>,
  pub start_date:  Option<String>,
  pub description: Option<String>,
  pub consent:     Option<bool>,
}

// ─── Lead ────────────────────────────────────────────────────────────────────

/// An accepted inquiry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
  pub id:          String,
  pub full_name:   String,
  pub email:       String,
  pub company:     String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub role:        Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub tech_stack:  Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub seniority:   Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub time_zone:   Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub start_date:  Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
  pub consent:     bool,
  pub status:      LeadStatus,
  pub created_at:  DateTime<Utc>,
  pub source:      String,
}

impl Lead {
  /// Validate `submission` and turn it into a fresh `New` lead.
  ///
  /// Required fields are trimmed and must be non-empty. Optional fields that
  /// are blank after trimming are dropped. The email address is not checked
  /// for shape and duplicates are not detected.
  pub fn accept(
    submission: LeadSubmission,
    source: &str,
    now: DateTime<Utc>,
  ) -> Result<Self> {
    let full_name = required(submission.full_name, "fullName")?;
    let email = required(submission.email, "email")?;
    let company = required(submission.company, "company")?;

    Ok(Self {
      id: Uuid::new_v4().to_string(),
      full_name,
      email,
      company,
      role: optional(submission.role),
      tech_stack: optional(submission.tech_stack),
      seniority: optional(submission.seniority),
      time_zone: optional(submission.time_zone),
      start_date: optional(submission.start_date),
      description: optional(submission.description),
      consent: submission.consent.unwrap_or(false),
      status: LeadStatus::New,
      created_at: now,
      source: source.to_owned(),
    })
  }

  /// The fixed lead pushed through the sinks by the notification self-test.
  pub fn test_lead(now: DateTime<Utc>) -> Self {
    Self {
      id:          format!("test-{}", Uuid::new_v4().simple()),
      full_name:   "Test User".into(),
      email:       "test@example.com".into(),
      company:     "Test Company".into(),
      role:        Some("Full-stack Developer".into()),
      tech_stack:  Some("React, Node.js, TypeScript".into()),
      seniority:   Some("Senior (5+ years)".into()),
      time_zone:   Some("CET (Central European)".into()),
      start_date:  None,
      description: Some(
        "This is a test message to check Minty Labs notifications.".into(),
      ),
      consent:     true,
      status:      LeadStatus::New,
      created_at:  now,
      source:      SOURCE_NOTIFICATION_TEST.into(),
    }
  }
}

fn required(value: Option<String>, field: &'static str) -> Result<String> {
  optional(value).ok_or(Error::MissingField(field))
}

fn optional(value: Option<String>) -> Option<String> {
  value
    .map(|v| v.trim().to_owned())
    .filter(|v| !v.is_empty())
}

// ─── Stats ───────────────────────────────────────────────────────────────────

/// Aggregate counters over the leads accepted since the process started.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadStats {
  pub total:           u64,
  pub new:             u64,
  pub contacted:       u64,
  pub qualified:       u64,
  pub closed:          u64,
  /// Leads accepted on the current UTC calendar day.
  pub today:           u64,
  /// `qualified / total` as a whole percentage; 0 when there are no leads.
  pub conversion_rate: u64,
  pub last_updated:    DateTime<Utc>,
}

#[cfg(test)]
mod tests {
  use super::*;

  fn submission(name: &str, email: &str, company: &str) -> LeadSubmission {
    LeadSubmission {
      full_name: Some(name.into()),
      email: Some(email.into()),
      company: Some(company.into()),
      ..Default::default()
    }
  }

  #[test]
  fn accept_assigns_identity_and_new_status() {
    let now = Utc::now();
    let lead = Lead::accept(
      submission("Jane", "jane@x.com", "Acme"),
      SOURCE_WEBSITE_FORM,
      now,
    )
    .unwrap();

    assert!(!lead.id.is_empty());
    assert_eq!(lead.status, LeadStatus::New);
    assert_eq!(lead.created_at, now);
    assert_eq!(lead.source, "website-form");
    assert!(!lead.consent, "consent defaults to false");
  }

  #[test]
  fn accept_rejects_empty_required_fields() {
    let err = Lead::accept(
      submission("", "a@b.com", "X"),
      SOURCE_WEBSITE_FORM,
      Utc::now(),
    )
    .unwrap_err();
    assert!(matches!(err, Error::MissingField("fullName")));

    let err = Lead::accept(
      submission("Jane", "   ", "X"),
      SOURCE_WEBSITE_FORM,
      Utc::now(),
    )
    .unwrap_err();
    assert!(matches!(err, Error::MissingField("email")));

    let mut missing_company = submission("Jane", "a@b.com", "");
    missing_company.company = None;
    let err =
      Lead::accept(missing_company, SOURCE_WEBSITE_FORM, Utc::now()).unwrap_err();
    assert!(matches!(err, Error::MissingField("company")));
  }

  #[test]
  fn accept_trims_and_drops_blank_optionals() {
    let mut s = submission("  Jane  ", "jane@x.com", "Acme");
    s.role = Some("  ".into());
    s.tech_stack = Some(" Rust ".into());
    s.consent = Some(true);

    let lead = Lead::accept(s, SOURCE_WEBSITE_FORM, Utc::now()).unwrap();
    assert_eq!(lead.full_name, "Jane");
    assert_eq!(lead.role, None);
    assert_eq!(lead.tech_stack.as_deref(), Some("Rust"));
    assert!(lead.consent);
  }

  #[test]
  fn submission_deserialises_camel_case_with_missing_fields() {
    let s: LeadSubmission = serde_json::from_str(
      r#"{"fullName":"Jane","email":"jane@x.com","techStack":"Go"}"#,
    )
    .unwrap();
    assert_eq!(s.full_name.as_deref(), Some("Jane"));
    assert_eq!(s.tech_stack.as_deref(), Some("Go"));
    assert!(s.company.is_none());
    assert!(s.consent.is_none());
  }

  #[test]
  fn test_lead_is_tagged() {
    let lead = Lead::test_lead(Utc::now());
    assert!(lead.id.starts_with("test-"));
    assert_eq!(lead.source, SOURCE_NOTIFICATION_TEST);
  }
}
