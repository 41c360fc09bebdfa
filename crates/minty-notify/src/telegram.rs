//! Telegram Bot API notification sink.

use std::{fmt, time::Duration};

use minty_core::{lead::Lead, notify::NotificationSink};
use reqwest::Client;
use serde::Serialize;
use serde_json::json;

use crate::{Error, Result, template};

pub const DEFAULT_API_BASE: &str = "https://api.telegram.org";

const SET: &str = "configured";
const NOT_SET: &str = "not set";

#[derive(Clone)]
pub struct TelegramConfig {
  pub enabled:   bool,
  pub bot_token: Option<String>,
  pub chat_id:   Option<String>,
  /// Overridable so tests can point the sink at a local server.
  pub api_base:  String,
}

impl Default for TelegramConfig {
  fn default() -> Self {
    Self {
      enabled:   false,
      bot_token: None,
      chat_id:   None,
      api_base:  DEFAULT_API_BASE.into(),
    }
  }
}

impl fmt::Debug for TelegramConfig {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("TelegramConfig")
      .field("enabled", &self.enabled)
      .field("bot_token", &self.bot_token.as_ref().map(|_| "<set>"))
      .field("chat_id", &self.chat_id.as_ref().map(|_| "<set>"))
      .field("api_base", &self.api_base)
      .finish()
  }
}

/// What `GET /api/notifications/status` reports for Telegram. Both values
/// are presence markers only.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TelegramStatus {
  pub enabled:    bool,
  pub configured: bool,
  pub bot_token:  &'static str,
  pub chat_id:    &'static str,
}

pub struct TelegramSink {
  client: Client,
  config: TelegramConfig,
}

impl TelegramSink {
  pub fn new(config: TelegramConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()
      .map_err(Error::Http)?;
    Ok(Self { client, config })
  }

  fn token(&self) -> Option<&str> { non_empty(&self.config.bot_token) }

  fn chat_id(&self) -> Option<&str> { non_empty(&self.config.chat_id) }
}

fn non_empty(v: &Option<String>) -> Option<&str> {
  v.as_deref().filter(|s| !s.is_empty())
}

impl NotificationSink for TelegramSink {
  type Error = Error;
  type Status = TelegramStatus;

  fn name(&self) -> &'static str { "telegram" }

  fn is_enabled(&self) -> bool { self.config.enabled }

  fn is_configured(&self) -> bool {
    self.token().is_some() && self.chat_id().is_some()
  }

  fn status(&self) -> TelegramStatus {
    let marker = |present: bool| if present { SET } else { NOT_SET };
    TelegramStatus {
      enabled:    self.is_enabled(),
      configured: self.is_configured(),
      bot_token:  marker(self.token().is_some()),
      chat_id:    marker(self.chat_id().is_some()),
    }
  }

  async fn deliver(&self, lead: &Lead) -> Result<()> {
    let (Some(token), Some(chat_id)) = (self.token(), self.chat_id()) else {
      return Err(Error::NotConfigured("telegram"));
    };

    let url = format!(
      "{}/bot{token}/sendMessage",
      self.config.api_base.trim_end_matches('/')
    );
    let resp = self
      .client
      .post(url)
      .json(&json!({
        "chat_id": chat_id,
        "text": template::telegram_text(lead),
        "parse_mode": "Markdown",
        "disable_web_page_preview": true,
      }))
      .send()
      .await
      .map_err(|e| Error::Http(e.without_url()))?;

    let status = resp.status();
    if !status.is_success() {
      let body = resp.text().await.unwrap_or_default();
      return Err(Error::Telegram {
        status: status.as_u16(),
        body,
      });
    }
    Ok(())
  }
}
