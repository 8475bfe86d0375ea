//! Error type for `tome-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] tome_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  /// Another process holds the run lock on this store file.
  #[error("store is locked by another sync run")]
  Busy,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
