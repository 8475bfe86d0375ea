//! The closure engine: per-unit transitive dependency sets.
//!
//! Works entirely in memory over an immutable index built once per run from
//! the stored edge snapshot. The graph carries no acyclicity guarantee; the
//! frontier expansion below terminates regardless, and a unit reachable from
//! itself through a cycle appears in its own closure.

use std::collections::{BTreeMap, BTreeSet};

use tome_core::{graph::DependencyEdge, unit::UnitId};

/// `unit → transitive dependency set` for some universe of units.
pub type ClosureMap = BTreeMap<UnitId, BTreeSet<UnitId>>;

/// Deduplicated direct-dependency lookup. Ids without outgoing edges —
/// including dangling targets that exist only on the right-hand side of
/// edges — act as leaves.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DependencyIndex {
  direct: BTreeMap<UnitId, BTreeSet<UnitId>>,
}

impl DependencyIndex {
  pub fn from_edges(edges: impl IntoIterator<Item = DependencyEdge>) -> Self {
    let mut direct: BTreeMap<UnitId, BTreeSet<UnitId>> = BTreeMap::new();
    for edge in edges {
      direct.entry(edge.from).or_default().insert(edge.to);
    }
    Self { direct }
  }

  /// The full transitive dependency set of `id`, by iterative frontier
  /// expansion: absorb the frontier, then advance to its dependencies not
  /// yet absorbed. The closure only grows and is bounded by the node
  /// count, so this finishes in at most that many rounds even on cycles.
  pub fn preliminaries(&self, id: UnitId) -> BTreeSet<UnitId> {
    let mut closed = BTreeSet::new();
    let Some(start) = self.direct.get(&id) else {
      return closed;
    };

    let mut frontier = start.clone();
    while !frontier.is_empty() {
      closed.extend(frontier.iter().copied());

      let mut next = BTreeSet::new();
      for member in &frontier {
        if let Some(deps) = self.direct.get(member) {
          next.extend(deps.iter().copied().filter(|d| !closed.contains(d)));
        }
      }
      frontier = next;
    }

    closed
  }

  /// The closure of every id in `universe`; ids without outgoing edges map
  /// to the empty set.
  pub fn close_over(
    &self,
    universe: impl IntoIterator<Item = UnitId>,
  ) -> ClosureMap {
    universe
      .into_iter()
      .map(|id| (id, self.preliminaries(id)))
      .collect()
  }
}

/// Invert a closure map into consequence counts: for each unit, how many of
/// the closures contain it. Computed in one pass over the map, not by a
/// second fixed point.
pub fn consequence_counts(closure: &ClosureMap) -> BTreeMap<UnitId, i64> {
  let mut counts: BTreeMap<UnitId, i64> = BTreeMap::new();
  for members in closure.values() {
    for member in members {
      *counts.entry(*member).or_insert(0) += 1;
    }
  }
  counts
}

// ─── Tests ───────────────────────────────────────────────────────────────────
