//! The roster: the authoritative list of active unit ids and their labels.
//!
//! Plain text, one `id,label` pair per line. Lines starting with `#` are
//! comments; lines without a comma carry no pair and are skipped.

use std::{collections::BTreeMap, path::Path};

use tome_core::unit::UnitId;
use tracing::warn;

use crate::error::Result;

/// Mapping `id → label` as declared by the roster file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roster {
  entries: BTreeMap<UnitId, String>,
}

impl Roster {
  /// Parse roster text. Unusable lines (bad id) are warned about and
  /// skipped; only failing to read the file at all is fatal to a run.
  pub fn parse(input: &str) -> Self {
    let mut entries = BTreeMap::new();

    for line in input.lines() {
      let line = line.trim();
      if line.is_empty() || line.starts_with('#') {
        continue;
      }
      let Some((id, label)) = line.split_once(',') else {
        continue;
      };
      match UnitId::parse(id) {
        Ok(id) => {
          entries.insert(id, label.to_string());
        }
        Err(_) => warn!(line, "roster line has an invalid unit id, skipping"),
      }
    }

    Self { entries }
  }

  /// Read and parse a roster file.
  pub fn load(path: impl AsRef<Path>) -> Result<Self> {
    Ok(Self::parse(&std::fs::read_to_string(path)?))
  }

  pub fn contains(&self, id: UnitId) -> bool {
    self.entries.contains_key(&id)
  }

  /// The label the roster declares for `id`.
  pub fn label(&self, id: UnitId) -> Option<&str> {
    self.entries.get(&id).map(String::as_str)
  }

  pub fn iter(&self) -> impl Iterator<Item = (UnitId, &str)> {
    self.entries.iter().map(|(id, label)| (*id, label.as_str()))
  }

  pub fn len(&self) -> usize { self.entries.len() }

  pub fn is_empty(&self) -> bool { self.entries.is_empty() }

  /// The inverse mapping, `label → id`, used when joining title metadata
  /// (which is keyed by label) onto units.
  pub fn by_label(&self) -> BTreeMap<&str, UnitId> {
    self
      .entries
      .iter()
      .map(|(id, label)| (label.as_str(), *id))
      .collect()
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
