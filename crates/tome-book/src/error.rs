//! Error types for `tome-book`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("fragment name {0:?}: expected <kind>-<locator>-<id>-<label>")]
  MalformedUnitName(String),

  #[error("fragment name {0:?}: expected <id>-<ordinal>")]
  MalformedProofName(String),

  #[error("invalid proof ordinal {value:?} in {name:?}")]
  InvalidOrdinal { name: String, value: String },

  #[error("core error: {0}")]
  Core(#[from] tome_core::Error),

  #[error("io error: {0}")]
  Io(#[from] std::io::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
