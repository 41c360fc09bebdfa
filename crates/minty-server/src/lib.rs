//! HTTP server for the Minty Labs site API.
//!
//! Owns configuration and the outer router; the API itself lives in
//! `minty-api`.

use std::path::{Path, PathBuf};

use axum::Router;
use config::{Config, ConfigError, Environment, File};
use minty_api::{AppState, api_router};
use minty_core::notify::NotificationSink;
use minty_notify::{
  EmailConfig, TelegramConfig,
  email::{DEFAULT_FROM, DEFAULT_SMTP_HOST, DEFAULT_SMTP_PORT, DEFAULT_TO},
  telegram::DEFAULT_API_BASE,
};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and the
/// process environment.
///
/// Field names double as the (upper-cased) environment variable names, so
/// `SMTP_HOST=...` overrides `smtp_host`. Deliberately not `Debug`: it holds
/// credentials.
#[derive(Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
  pub listen_addr:                   String,
  pub content_dir:                   PathBuf,
  pub environment:                   String,
  pub enable_email_notifications:    bool,
  pub smtp_host:                     String,
  pub smtp_port:                     u16,
  pub smtp_user:                     Option<String>,
  pub smtp_pass:                     Option<String>,
  pub from_email:                    String,
  pub to_email:                      String,
  pub enable_telegram_notifications: bool,
  pub telegram_bot_token:            Option<String>,
  pub telegram_chat_id:              Option<String>,
  pub telegram_api_base:             String,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      listen_addr:                   "127.0.0.1:3000".into(),
      content_dir:                   PathBuf::from("content"),
      environment:                   "development".into(),
      enable_email_notifications:    false,
      smtp_host:                     DEFAULT_SMTP_HOST.into(),
      smtp_port:                     DEFAULT_SMTP_PORT,
      smtp_user:                     None,
      smtp_pass:                     None,
      from_email:                    DEFAULT_FROM.into(),
      to_email:                      DEFAULT_TO.into(),
      enable_telegram_notifications: false,
      telegram_bot_token:            None,
      telegram_chat_id:              None,
      telegram_api_base:             DEFAULT_API_BASE.into(),
    }
  }
}

impl ServerConfig {
  /// Read `path` if it exists, then overlay the process environment.
  pub fn load(path: &Path) -> Result<Self, ConfigError> {
    Self::from_sources(path, Environment::default())
  }

  fn from_sources(path: &Path, env: Environment) -> Result<Self, ConfigError> {
    Config::builder()
      .add_source(File::from(path).required(false))
      .add_source(env)
      .build()?
      .try_deserialize()
  }

  pub fn email(&self) -> EmailConfig {
    EmailConfig {
      enabled: self.enable_email_notifications,
      host:    self.smtp_host.clone(),
      port:    self.smtp_port,
      user:    self.smtp_user.clone(),
      pass:    self.smtp_pass.clone(),
      from:    self.from_email.clone(),
      to:      self.to_email.clone(),
    }
  }

  pub fn telegram(&self) -> TelegramConfig {
    TelegramConfig {
      enabled:   self.enable_telegram_notifications,
      bot_token: self.telegram_bot_token.clone(),
      chat_id:   self.telegram_chat_id.clone(),
      api_base:  self.telegram_api_base.clone(),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// The API mounted under `/api`, with per-request tracing spans.
pub fn app<E, C>(state: AppState<E, C>) -> Router
where
  E: NotificationSink + 'static,
  C: NotificationSink + 'static,
{
  Router::new()
    .nest("/api", api_router(state))
    .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
  use std::{collections::HashMap, fs, sync::Arc};

  use axum::{
    body::Body,
    http::{Request, StatusCode},
  };
  use minty_core::{content::ContentStore, intake::LeadIntake};
  use tower::ServiceExt;

  use super::*;

  fn env(vars: &[(&str, &str)]) -> Environment {
    let map: HashMap<String, String> = vars
      .iter()
      .map(|(k, v)| (k.to_string(), v.to_string()))
      .collect();
    Environment::default().source(Some(map))
  }

  fn missing_file() -> PathBuf {
    std::env::temp_dir().join("minty-server-no-such-config.toml")
  }

  #[test]
  fn defaults_apply_without_file_or_env() {
    let cfg = ServerConfig::from_sources(&missing_file(), env(&[])).unwrap();
    assert_eq!(cfg.listen_addr, "127.0.0.1:3000");
    assert_eq!(cfg.environment, "development");
    assert_eq!(cfg.smtp_host, "smtp.gmail.com");
    assert_eq!(cfg.smtp_port, 587);
    assert_eq!(cfg.to_email, "hello@mintylabs.com");
    assert!(!cfg.enable_email_notifications);
    assert!(!cfg.telegram().enabled);
  }

  #[test]
  fn environment_overrides_use_site_variable_names() {
    let cfg = ServerConfig::from_sources(
      &missing_file(),
      env(&[
        ("ENABLE_TELEGRAM_NOTIFICATIONS", "true"),
        ("TELEGRAM_BOT_TOKEN", "123:abc"),
        ("TELEGRAM_CHAT_ID", "-1001"),
        ("SMTP_PORT", "2525"),
        ("SMTP_PASS", "0042"),
      ]),
    )
    .unwrap();

    let telegram = cfg.telegram();
    assert!(telegram.enabled);
    assert_eq!(telegram.bot_token.as_deref(), Some("123:abc"));
    assert_eq!(telegram.chat_id.as_deref(), Some("-1001"));
    assert_eq!(cfg.email().port, 2525);
    // Numeric-looking secrets stay strings.
    assert_eq!(cfg.email().pass.as_deref(), Some("0042"));
  }

  #[test]
  fn file_values_are_overridden_by_environment() {
    let path = std::env::temp_dir()
      .join(format!("minty-server-config-{}.toml", std::process::id()));
    fs::write(
      &path,
      "environment = \"staging\"\nsmtp_host = \"mail.example.com\"\n",
    )
    .unwrap();

    let cfg =
      ServerConfig::from_sources(&path, env(&[("ENVIRONMENT", "production")]))
        .unwrap();
    fs::remove_file(&path).ok();

    assert_eq!(cfg.environment, "production");
    assert_eq!(cfg.smtp_host, "mail.example.com");
  }

  #[tokio::test]
  async fn api_is_mounted_under_prefix() {
    let cfg = ServerConfig::default();
    let notifier = minty_notify::notifier(cfg.email(), cfg.telegram()).unwrap();
    let state = AppState {
      intake:      Arc::new(LeadIntake::new(notifier)),
      content:     Arc::new(ContentStore::default()),
      environment: Arc::from("test"),
    };

    let req = Request::builder()
      .uri("/api/health")
      .body(Body::empty())
      .unwrap();
    let resp = app(state).oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["environment"], "test");
  }
}
