//! SMTP notification sink.

use std::fmt;

use lettre::{
  AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
  message::header::ContentType,
  transport::smtp::authentication::Credentials,
};
use minty_core::{lead::Lead, notify::NotificationSink};
use serde::Serialize;

use crate::{Error, Result, template};

pub const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";
pub const DEFAULT_SMTP_PORT: u16 = 587;
pub const DEFAULT_FROM: &str = "noreply@mintylabs.com";
pub const DEFAULT_TO: &str = "hello@mintylabs.com";

#[derive(Clone)]
pub struct EmailConfig {
  pub enabled: bool,
  pub host:    String,
  pub port:    u16,
  pub user:    Option<String>,
  pub pass:    Option<String>,
  pub from:    String,
  pub to:      String,
}

impl Default for EmailConfig {
  fn default() -> Self {
    Self {
      enabled: false,
      host:    DEFAULT_SMTP_HOST.into(),
      port:    DEFAULT_SMTP_PORT,
      user:    None,
      pass:    None,
      from:    DEFAULT_FROM.into(),
      to:      DEFAULT_TO.into(),
    }
  }
}

impl fmt::Debug for EmailConfig {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("EmailConfig")
      .field("enabled", &self.enabled)
      .field("host", &self.host)
      .field("port", &self.port)
      .field("user", &self.user.as_ref().map(|_| "<set>"))
      .field("pass", &self.pass.as_ref().map(|_| "<set>"))
      .field("from", &self.from)
      .field("to", &self.to)
      .finish()
  }
}

/// What `GET /api/notifications/status` reports for email.
#[derive(Debug, Clone, Serialize)]
pub struct EmailStatus {
  pub enabled:    bool,
  pub configured: bool,
  pub host:       String,
  pub from:       String,
  pub to:         String,
}

pub struct EmailSink {
  config: EmailConfig,
}

impl EmailSink {
  pub fn new(config: EmailConfig) -> Self { Self { config } }

  fn credentials(&self) -> Option<Credentials> {
    match (&self.config.user, &self.config.pass) {
      (Some(user), Some(pass)) if !user.is_empty() && !pass.is_empty() => {
        Some(Credentials::new(user.clone(), pass.clone()))
      }
      _ => None,
    }
  }

  fn message(&self, lead: &Lead) -> Result<Message> {
    Ok(
      Message::builder()
        .from(self.config.from.parse()?)
        .to(self.config.to.parse()?)
        .subject(template::email_subject(lead))
        .header(ContentType::TEXT_HTML)
        .body(template::email_html(lead))?,
    )
  }
}

impl NotificationSink for EmailSink {
  type Error = Error;
  type Status = EmailStatus;

  fn name(&self) -> &'static str { "email" }

  fn is_enabled(&self) -> bool { self.config.enabled }

  fn is_configured(&self) -> bool { self.credentials().is_some() }

  fn status(&self) -> EmailStatus {
    EmailStatus {
      enabled:    self.is_enabled(),
      configured: self.is_configured(),
      host:       self.config.host.clone(),
      from:       self.config.from.clone(),
      to:         self.config.to.clone(),
    }
  }

  async fn deliver(&self, lead: &Lead) -> Result<()> {
    let credentials = self.credentials().ok_or(Error::NotConfigured("email"))?;
    let message = self.message(lead)?;

    // Port 587 with STARTTLS upgrade.
    let transport =
      AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.config.host)?
        .port(self.config.port)
        .credentials(credentials)
        .build();

    transport.send(message).await?;
    tracing::debug!(
      lead_id = %lead.id,
      to = %self.config.to,
      "email accepted by relay"
    );
    Ok(())
  }
}
