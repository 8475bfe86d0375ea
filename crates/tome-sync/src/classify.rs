//! Change classification for the content synchronizer.
//!
//! Classification drives logging only: the synchronizer overwrites every
//! content field unconditionally whatever the classification says. Syncing
//! the same input twice therefore classifies nothing on the second pass,
//! which is the observable idempotence contract.

use tome_core::unit::{NewUnit, Unit};

/// A changed aspect of an existing unit, or its creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitChange {
  Created,
  LabelChanged,
  ContentChanged,
  TypeChanged,
}

/// Classify an incoming unit fragment against the stored row. An empty
/// vector means unchanged; `Created` never co-occurs with field changes.
/// Locator and display-name differences are deliberately not classified.
pub fn classify_unit(
  stored: Option<&Unit>,
  incoming: &NewUnit,
) -> Vec<UnitChange> {
  let Some(stored) = stored else {
    return vec![UnitChange::Created];
  };

  let mut changes = Vec::new();
  if stored.label != incoming.label {
    changes.push(UnitChange::LabelChanged);
  }
  if stored.body != incoming.body {
    changes.push(UnitChange::ContentChanged);
  }
  if stored.kind != incoming.kind {
    changes.push(UnitChange::TypeChanged);
  }
  changes
}

/// Classification for body-only entities (proofs, extras).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyChange {
  Created,
  ContentChanged,
  Unchanged,
}

pub fn classify_body(stored: Option<&str>, incoming: &str) -> BodyChange {
  match stored {
    None => BodyChange::Created,
    Some(body) if body != incoming => BodyChange::ContentChanged,
    Some(_) => BodyChange::Unchanged,
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
