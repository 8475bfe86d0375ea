//! Statistics rows produced by the aggregator.

use crate::{
  error::{Error, Result},
  unit::UnitId,
};

/// The per-unit metrics derived from the dependency closure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitMetric {
  /// Size of the unit's transitive dependency set.
  Preliminaries,
  /// Distinct chapters its preliminaries touch.
  Chapters,
  /// Distinct sections its preliminaries touch.
  Sections,
  /// How many other units transitively depend on it.
  Consequences,
}

impl UnitMetric {
  pub const ALL: [UnitMetric; 4] = [
    UnitMetric::Preliminaries,
    UnitMetric::Chapters,
    UnitMetric::Sections,
    UnitMetric::Consequences,
  ];

  pub fn parse(s: &str) -> Result<Self> {
    match s {
      "preliminaries" => Ok(Self::Preliminaries),
      "chapters" => Ok(Self::Chapters),
      "sections" => Ok(Self::Sections),
      "consequences" => Ok(Self::Consequences),
      other => Err(Error::UnknownMetric(other.to_string())),
    }
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Preliminaries => "preliminaries",
      Self::Chapters => "chapters",
      Self::Sections => "sections",
      Self::Consequences => "consequences",
    }
  }
}

impl std::fmt::Display for UnitMetric {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

/// One `(unit, metric)` row. The table carries exactly one row per pair and
/// is fully replaced on every run.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitStatistic {
  pub unit_id: UnitId,
  pub metric:  UnitMetric,
  pub value:   i64,
}

/// One corpus-wide metric row, sourced from the external statistics blob
/// (plus the optional page count). Fully replaced on every run.
#[derive(Debug, Clone, PartialEq)]
pub struct BookStatistic {
  pub name:  String,
  pub value: f64,
}
