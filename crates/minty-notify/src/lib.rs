//! Notification transports for new leads.
//!
//! Provides the two [`NotificationSink`](minty_core::notify::NotificationSink)
//! implementations the site uses: SMTP email via `lettre` and the Telegram
//! Bot API via `reqwest`.

pub mod email;
pub mod error;
pub mod telegram;
pub mod template;

pub use email::{EmailConfig, EmailSink};
pub use error::{Error, Result};
pub use telegram::{TelegramConfig, TelegramSink};

use minty_core::notify::Notifier;

/// The production notifier: email plus Telegram.
pub type SiteNotifier = Notifier<EmailSink, TelegramSink>;

/// Build both sinks from their configuration.
pub fn notifier(
  email: EmailConfig,
  telegram: TelegramConfig,
) -> Result<SiteNotifier> {
  Ok(Notifier::new(EmailSink::new(email), TelegramSink::new(telegram)?))
}
