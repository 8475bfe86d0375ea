//! Edge types derived from resolved content.
//!
//! All three tables are pure recomputed views: rebuilt from scratch on every
//! run, with no identity carried across runs.

use crate::unit::UnitId;

/// A directed dependency: `from` relies on `to`. `to` may be dangling — the
/// target id can be absent from the unit table and the edge is kept anyway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct DependencyEdge {
  pub from: UnitId,
  pub to:   UnitId,
}

/// A citation of a bibliography entry by a unit. Deduplicated per unit
/// before storage.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct CitationEdge {
  pub unit_id: UnitId,
  pub key:     String,
}

/// Membership of a chapter unit in a part unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct PartLink {
  pub part_id:    UnitId,
  pub chapter_id: UnitId,
}
