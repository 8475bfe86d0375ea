//! The statistics aggregator: closure output → statistic rows.

use std::collections::{BTreeMap, BTreeSet};

use tome_core::{
  stats::{BookStatistic, UnitMetric, UnitStatistic},
  unit::{Unit, UnitId},
};

use crate::closure::{ClosureMap, consequence_counts};

/// Chapter/section components per stored unit, built once per run. A unit
/// whose locator has a single component carries a chapter but no section.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LocatorIndex {
  chapters: BTreeMap<UnitId, String>,
  sections: BTreeMap<UnitId, String>,
}

impl LocatorIndex {
  pub fn from_units(units: &[Unit]) -> Self {
    let mut chapters = BTreeMap::new();
    let mut sections = BTreeMap::new();
    for unit in units {
      chapters.insert(unit.id, unit.locator.chapter().to_string());
      if let Some(section) = unit.locator.section() {
        sections.insert(unit.id, section);
      }
    }
    Self { chapters, sections }
  }
}

/// The four metric rows for every stored unit. Dangling closure members
/// have no locator and therefore contribute to the preliminaries count but
/// not to the chapter or section counts.
pub fn unit_statistics(
  units: &[Unit],
  closure: &ClosureMap,
  locators: &LocatorIndex,
) -> Vec<UnitStatistic> {
  let consequences = consequence_counts(closure);
  let empty = BTreeSet::new();

  let mut rows = Vec::with_capacity(units.len() * UnitMetric::ALL.len());
  for unit in units {
    let preliminaries = closure.get(&unit.id).unwrap_or(&empty);

    let chapters: BTreeSet<&str> = preliminaries
      .iter()
      .filter_map(|p| locators.chapters.get(p).map(String::as_str))
      .collect();
    let sections: BTreeSet<&str> = preliminaries
      .iter()
      .filter_map(|p| locators.sections.get(p).map(String::as_str))
      .collect();

    rows.push(row(unit.id, UnitMetric::Preliminaries, preliminaries.len()));
    rows.push(row(unit.id, UnitMetric::Chapters, chapters.len()));
    rows.push(row(unit.id, UnitMetric::Sections, sections.len()));
    rows.push(UnitStatistic {
      unit_id: unit.id,
      metric:  UnitMetric::Consequences,
      value:   consequences.get(&unit.id).copied().unwrap_or(0),
    });
  }

  rows
}

fn row(unit_id: UnitId, metric: UnitMetric, value: usize) -> UnitStatistic {
  UnitStatistic { unit_id, metric, value: value as i64 }
}

/// Book-wide rows: the external statistics blob plus a `pages` row when a
/// page count was supplied. The supplied count overrides a `pages` entry
/// already in the blob; `name` is the table's key, so the rows must not
/// repeat it.
pub fn book_statistics(
  blob: &BTreeMap<String, f64>,
  pages: Option<u32>,
) -> Vec<BookStatistic> {
  let mut merged = blob.clone();
  if let Some(pages) = pages {
    merged.insert("pages".into(), f64::from(pages));
  }

  merged
    .into_iter()
    .map(|(name, value)| BookStatistic { name, value })
    .collect()
}

// ─── Tests ───────────────────────────────────────────────────────────────────
