//! The reference resolver: symbolic label markers → canonical unit ids.
//!
//! Bodies arrive from the exporter carrying `\ref{<label>}` markers for
//! cross-references the renderer could not resolve. This pass substitutes
//! each marker with the target's canonical id. It must run before the
//! dependency extractor, which only recognizes id-shaped link targets.

use std::collections::BTreeMap;

use regex::{Captures, Regex};
use tome_core::{store::CorpusStore, unit::{Unit, UnitId}};
use tracing::{debug, warn};

use crate::error::{Error, Result};

/// Label marker: `\ref{<label>}`.
const MARKER: &str = r"\\ref\{([0-9A-Za-z\-]+)\}";

/// A compiled marker pattern plus the `label → id` mapping, built fresh per
/// run from the full stored unit set and immutable afterwards.
pub struct Resolver {
  marker: Regex,
  labels: BTreeMap<String, UnitId>,
}

impl Resolver {
  /// Build the mapping over every stored unit, active or not. Labels
  /// collide only transiently during churn; the first unit (lowest id)
  /// wins and the duplicate is debug-logged.
  pub fn from_units(units: &[Unit]) -> Result<Self> {
    let marker = Regex::new(MARKER)?;

    let mut labels: BTreeMap<String, UnitId> = BTreeMap::new();
    for unit in units {
      if unit.label.is_empty() {
        continue;
      }
      if let Some(holder) = labels.get(&unit.label) {
        debug!(
          "label {:?} is held by both {} and {}, keeping {}",
          unit.label, holder, unit.id, holder
        );
        continue;
      }
      labels.insert(unit.label.clone(), unit.id);
    }

    Ok(Self { marker, labels })
  }

  pub fn lookup(&self, label: &str) -> Option<UnitId> {
    self.labels.get(label).copied()
  }

  /// Substitute every marker whose label is known; unknown labels keep
  /// their marker verbatim. A label resolved once resolves identically
  /// everywhere it recurs.
  pub fn resolve(&self, body: &str) -> String {
    self
      .marker
      .replace_all(body, |caps: &Captures<'_>| {
        match self.labels.get(&caps[1]) {
          Some(id) => id.as_str().to_string(),
          None => {
            warn!("unresolved reference label {:?}", &caps[1]);
            caps[0].to_string()
          }
        }
      })
      .into_owned()
  }
}

/// Bodies actually rewritten by the resolution pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ResolveCounts {
  pub units:  usize,
  pub proofs: usize,
}

/// Resolve every stored unit and proof body, writing back only the bodies
/// that changed. `units` is the freshly synced unit set; it supplies both
/// the label mapping and the unit bodies to rewrite.
pub async fn resolve_bodies<S: CorpusStore>(
  store: &S,
  units: &[Unit],
) -> Result<ResolveCounts> {
  let resolver = Resolver::from_units(units)?;
  let mut counts = ResolveCounts::default();

  for unit in units {
    let resolved = resolver.resolve(&unit.body);
    if resolved != unit.body {
      store
        .set_unit_body(unit.id, resolved)
        .await
        .map_err(|e| Error::Store(Box::new(e)))?;
      counts.units += 1;
    }
  }

  let proofs = store
    .list_proofs()
    .await
    .map_err(|e| Error::Store(Box::new(e)))?;
  for proof in &proofs {
    let resolved = resolver.resolve(&proof.body);
    if resolved != proof.body {
      store
        .set_proof_body(proof.unit_id, proof.ordinal, resolved)
        .await
        .map_err(|e| Error::Store(Box::new(e)))?;
      counts.proofs += 1;
    }
  }

  Ok(counts)
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use tome_core::unit::{Locator, UnitKind};

  use super::*;

  fn unit(code: &str, label: &str) -> Unit {
    Unit {
      id:           UnitId::parse(code).unwrap(),
      label:        label.into(),
      kind:         UnitKind::Lemma,
      locator:      Locator::new("1.1"),
      body:         String::new(),
      active:       true,
      display_name: None,
    }
  }

  #[test]
  fn resolves_known_labels_everywhere() {
    let resolver =
      Resolver::from_units(&[unit("0001", "lbl1"), unit("0002", "lbl2")])
        .unwrap();

    assert_eq!(resolver.resolve(r"see \ref{lbl1}"), "see 0001");
    assert_eq!(
      resolver.resolve(r"\ref{lbl2}, \ref{lbl1}, and \ref{lbl2} again"),
      "0002, 0001, and 0002 again"
    );
  }

  #[test]
  fn unknown_labels_are_left_verbatim() {
    let resolver = Resolver::from_units(&[unit("0001", "lbl1")]).unwrap();
    let body = r"see \ref{never-heard-of-it}";
    assert_eq!(resolver.resolve(body), body);
  }

  #[test]
  fn bodies_without_markers_pass_through() {
    let resolver = Resolver::from_units(&[unit("0001", "lbl1")]).unwrap();
    assert_eq!(resolver.resolve("<p>plain</p>"), "<p>plain</p>");
  }

  #[test]
  fn first_unit_wins_a_duplicated_label() {
    let resolver =
      Resolver::from_units(&[unit("0001", "dup"), unit("0002", "dup")])
        .unwrap();
    assert_eq!(resolver.lookup("dup"), Some(UnitId::parse("0001").unwrap()));
    assert_eq!(resolver.resolve(r"\ref{dup}"), "0001");
  }

  #[test]
  fn empty_labels_never_enter_the_mapping() {
    let resolver = Resolver::from_units(&[unit("0001", "")]).unwrap();
    assert_eq!(resolver.lookup(""), None);
  }
}
