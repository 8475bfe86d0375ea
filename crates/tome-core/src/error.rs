//! Error types for `tome-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("invalid unit id: {0:?}")]
  InvalidUnitId(String),

  #[error("unknown extra kind: {0:?}")]
  UnknownExtraKind(String),

  #[error("unknown statistic name: {0:?}")]
  UnknownMetric(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
