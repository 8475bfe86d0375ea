//! Error type for `tome-sync`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// A storage backend failure, boxed so the pipeline stays store-agnostic.
  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error("invalid marker pattern: {0}")]
  Pattern(#[from] regex::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
