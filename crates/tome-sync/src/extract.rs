//! Edge extraction from resolved bodies.
//!
//! Dependencies come from rendered hyperlink targets of the form
//! `"/unit/<ID>"` (quotes included — the pattern anchors on the attribute
//! delimiters); a proof's links are attributed to its parent unit.
//! Citations come from `"/bibliography/<KEY>"` targets in unit bodies and
//! are deduplicated per unit. Both tables are pure views, atomically
//! replaced on every run.

use std::collections::{BTreeMap, BTreeSet};

use regex::Regex;
use tome_core::{
  graph::{CitationEdge, DependencyEdge},
  store::CorpusStore,
  unit::{Unit, UnitId},
};
use tracing::warn;

use crate::error::{Error, Result};

const DEPENDENCY: &str = r#""/unit/([0-9A-Z]{4})""#;
const CITATION: &str = r#""/bibliography/([0-9A-Za-z\-_]+)""#;

/// The two compiled link patterns.
pub struct Extractor {
  dependency: Regex,
  citation:   Regex,
}

impl Extractor {
  pub fn new() -> Result<Self> {
    Ok(Self {
      dependency: Regex::new(DEPENDENCY)?,
      citation:   Regex::new(CITATION)?,
    })
  }

  /// Unit-link targets in order of appearance, repeats kept.
  pub fn link_targets(&self, body: &str) -> Vec<UnitId> {
    self
      .dependency
      .captures_iter(body)
      // The capture group is exactly the id grammar, so parsing is
      // infallible here.
      .filter_map(|caps| UnitId::parse(&caps[1]).ok())
      .collect()
  }

  /// Distinct bibliography keys cited by `body`.
  pub fn citation_keys(&self, body: &str) -> BTreeSet<String> {
    self
      .citation
      .captures_iter(body)
      .map(|caps| caps[1].to_string())
      .collect()
  }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct EdgeCounts {
  pub dependencies: usize,
  pub citations:    usize,
}

/// Scan every unit body and its proofs' bodies for outbound links, then
/// atomically replace both edge tables. Targets need not exist as stored
/// units; dangling edges are kept as data, with one warning per distinct
/// missing target.
pub async fn extract_edges<S: CorpusStore>(
  store: &S,
  units: &[Unit],
) -> Result<EdgeCounts> {
  let extractor = Extractor::new()?;

  let proofs = store
    .list_proofs()
    .await
    .map_err(|e| Error::Store(Box::new(e)))?;
  let mut proof_bodies: BTreeMap<UnitId, Vec<String>> = BTreeMap::new();
  for proof in proofs {
    proof_bodies.entry(proof.unit_id).or_default().push(proof.body);
  }

  let mut dependencies = Vec::new();
  let mut citations = Vec::new();

  for unit in units {
    let mut targets = extractor.link_targets(&unit.body);
    if let Some(bodies) = proof_bodies.get(&unit.id) {
      for body in bodies {
        targets.extend(extractor.link_targets(body));
      }
    }
    dependencies.extend(
      targets
        .into_iter()
        .map(|to| DependencyEdge { from: unit.id, to }),
    );

    citations.extend(
      extractor
        .citation_keys(&unit.body)
        .into_iter()
        .map(|key| CitationEdge { unit_id: unit.id, key }),
    );
  }

  let stored: BTreeSet<UnitId> = units.iter().map(|unit| unit.id).collect();
  let dangling: BTreeSet<UnitId> = dependencies
    .iter()
    .map(|edge| edge.to)
    .filter(|to| !stored.contains(to))
    .collect();
  for to in dangling {
    warn!("dependency edges target {to}, but no unit has that id");
  }

  let counts = EdgeCounts {
    dependencies: dependencies.len(),
    citations:    citations.len(),
  };

  store
    .replace_dependencies(dependencies)
    .await
    .map_err(|e| Error::Store(Box::new(e)))?;
  store
    .replace_citations(citations)
    .await
    .map_err(|e| Error::Store(Box::new(e)))?;

  Ok(counts)
}

// ─── Tests ───────────────────────────────────────────────────────────────────
