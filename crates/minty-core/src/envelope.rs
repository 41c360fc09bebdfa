//! The `{success, message, data, error}` JSON envelope shared by every API
//! response and the clients that read them.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
  pub success: bool,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub message: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub data:    Option<T>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub error:   Option<String>,
}

impl<T> Envelope<T> {
  pub fn ok(data: T) -> Self {
    Self {
      success: true,
      message: None,
      data:    Some(data),
      error:   None,
    }
  }

  pub fn with_message(mut self, message: impl Into<String>) -> Self {
    self.message = Some(message.into());
    self
  }
}

impl Envelope<()> {
  pub fn failure(message: impl Into<String>) -> Self {
    Self {
      success: false,
      message: Some(message.into()),
      data:    None,
      error:   None,
    }
  }
}
