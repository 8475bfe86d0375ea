//! The content synchronizer: fragments in, stored entities out.
//!
//! Three passes, in order: content sync (units, proofs, extras, plus the
//! wholesale footnote rebuild), display-name import, and activity
//! reconciliation against the roster. Activity runs last so it sees the
//! fully-synced unit set.

use tome_book::{Fragment, Roster, meta::TitleMap};
use tome_core::store::CorpusStore;
use tracing::{info, warn};

use crate::{
  classify::{BodyChange, UnitChange, classify_body, classify_unit},
  error::{Error, Result},
};

/// What one sync pass touched. `created` and `changed` tally the change
/// classifications; both are zero when the pass re-applies input the store
/// has already seen.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SyncCounts {
  pub units:     usize,
  pub proofs:    usize,
  pub footnotes: usize,
  pub extras:    usize,
  pub created:   usize,
  pub changed:   usize,
}

/// End-of-run activity state, per the roster.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ActivityCounts {
  pub active:   usize,
  pub inactive: usize,
  /// Units whose stored label disagrees with the roster.
  pub drifted:  usize,
}

/// Apply a batch of fragments to the store. Every entity is overwritten
/// unconditionally; classification feeds the log and the counters only.
/// Footnotes are collected and swapped in as one atomic replace.
pub async fn sync_fragments<S: CorpusStore>(
  store: &S,
  fragments: Vec<Fragment>,
) -> Result<SyncCounts> {
  let mut counts = SyncCounts::default();
  let mut footnotes = Vec::new();

  for fragment in fragments {
    match fragment {
      Fragment::Unit(unit) => {
        let stored = store
          .get_unit(unit.id)
          .await
          .map_err(|e| Error::Store(Box::new(e)))?;

        for change in classify_unit(stored.as_ref(), &unit) {
          match change {
            UnitChange::Created => {
              info!("created unit {}", unit.id);
              counts.created += 1;
            }
            UnitChange::LabelChanged => {
              info!("unit {}: label has changed", unit.id);
              counts.changed += 1;
            }
            UnitChange::ContentChanged => {
              info!("unit {}: content has changed", unit.id);
              counts.changed += 1;
            }
            UnitChange::TypeChanged => {
              info!("unit {}: kind has changed", unit.id);
              counts.changed += 1;
            }
          }
        }

        store
          .upsert_unit(unit)
          .await
          .map_err(|e| Error::Store(Box::new(e)))?;
        counts.units += 1;
      }

      Fragment::Proof(proof) => {
        let stored = store
          .get_proof(proof.unit_id, proof.ordinal)
          .await
          .map_err(|e| Error::Store(Box::new(e)))?;

        match classify_body(stored.as_ref().map(|p| p.body.as_str()), &proof.body)
        {
          BodyChange::Created => {
            info!("unit {}: created proof #{}", proof.unit_id, proof.ordinal);
            counts.created += 1;
          }
          BodyChange::ContentChanged => {
            info!("unit {}: proof #{} has changed", proof.unit_id, proof.ordinal);
            counts.changed += 1;
          }
          BodyChange::Unchanged => {}
        }

        store
          .upsert_proof(proof)
          .await
          .map_err(|e| Error::Store(Box::new(e)))?;
        counts.proofs += 1;
      }

      Fragment::Extra(extra) => {
        let stored = store
          .get_extra(extra.unit_id, extra.kind)
          .await
          .map_err(|e| Error::Store(Box::new(e)))?;

        match classify_body(stored.as_ref().map(|x| x.body.as_str()), &extra.body)
        {
          BodyChange::Created => {
            info!("unit {}: added a {}", extra.unit_id, extra.kind);
            counts.created += 1;
          }
          BodyChange::ContentChanged => {
            info!("unit {}: {} has changed", extra.unit_id, extra.kind);
            counts.changed += 1;
          }
          BodyChange::Unchanged => {}
        }

        store
          .upsert_extra(extra)
          .await
          .map_err(|e| Error::Store(Box::new(e)))?;
        counts.extras += 1;
      }

      Fragment::Footnote(footnote) => footnotes.push(footnote),
    }
  }

  counts.footnotes = footnotes.len();
  store
    .replace_footnotes(footnotes)
    .await
    .map_err(|e| Error::Store(Box::new(e)))?;

  Ok(counts)
}

/// Copy titles from the metadata lookup onto units. Titles are keyed by
/// label; the roster's inverse mapping turns those into unit ids. Entries
/// without a title, or whose label the roster does not know, contribute
/// nothing.
pub async fn apply_display_names<S: CorpusStore>(
  store: &S,
  titles: &TitleMap,
  roster: &Roster,
) -> Result<usize> {
  let by_label = roster.by_label();
  let mut applied = 0;

  for (label, entry) in titles {
    let Some(title) = &entry.title else { continue };
    let Some(&id) = by_label.get(label.as_str()) else {
      continue;
    };
    store
      .set_display_name(id, title.clone())
      .await
      .map_err(|e| Error::Store(Box::new(e)))?;
    applied += 1;
  }

  Ok(applied)
}

/// Re-evaluate the activity flag of every stored unit against the roster.
/// Label drift is a data-integrity warning, never an error; the unit still
/// ends the run active.
pub async fn reconcile_activity<S: CorpusStore>(
  store: &S,
  roster: &Roster,
) -> Result<ActivityCounts> {
  let mut counts = ActivityCounts::default();
  let units = store
    .list_units()
    .await
    .map_err(|e| Error::Store(Box::new(e)))?;

  for unit in units {
    match roster.label(unit.id) {
      None => {
        if unit.active {
          info!("unit {} became inactive", unit.id);
        }
        store
          .set_active(unit.id, false)
          .await
          .map_err(|e| Error::Store(Box::new(e)))?;
        counts.inactive += 1;
      }
      Some(label) => {
        if label != unit.label {
          warn!(
            "unit {}: label differs between roster ({:?}) and store ({:?})",
            unit.id, label, unit.label
          );
          counts.drifted += 1;
        }
        store
          .set_active(unit.id, true)
          .await
          .map_err(|e| Error::Store(Box::new(e)))?;
        counts.active += 1;
      }
    }
  }

  Ok(counts)
}
