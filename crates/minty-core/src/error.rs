//! Error types for `minty-core`.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// A lead submission is missing one of the required contact fields.
  #[error("missing required field: {0}")]
  MissingField(&'static str),

  #[error("testimonial {id} has rating {rating}; expected 1 to 5")]
  RatingOutOfRange { id: String, rating: u8 },

  #[error("duplicate case study slug: {0:?}")]
  DuplicateSlug(String),

  #[error("failed to read {path}: {source}")]
  Io {
    path:   PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("failed to parse {path}: {source}")]
  Parse {
    path:   PathBuf,
    #[source]
    source: serde_json::Error,
  },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
