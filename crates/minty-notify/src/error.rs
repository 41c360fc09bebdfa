//! Error type for `minty-notify`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("{0} credentials are not configured")]
  NotConfigured(&'static str),

  #[error("invalid email address: {0}")]
  Address(#[from] lettre::address::AddressError),

  #[error("failed to build email: {0}")]
  Message(#[from] lettre::error::Error),

  #[error("smtp error: {0}")]
  Smtp(#[from] lettre::transport::smtp::Error),

  /// Request-level failure. The URL is stripped because it embeds the bot
  /// token.
  #[error("http error: {0}")]
  Http(#[source] reqwest::Error),

  #[error("telegram api returned {status}: {body}")]
  Telegram { status: u16, body: String },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
