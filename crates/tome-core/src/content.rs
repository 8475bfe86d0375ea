//! Secondary content entities: proofs, footnotes, extra annotations, and the
//! denormalized search documents derived from them.

use crate::{
  error::{Error, Result},
  unit::UnitId,
};

// ─── Proof ───────────────────────────────────────────────────────────────────

/// A proof body attached to a unit. Keyed by `(unit_id, ordinal)`; ordinals
/// come from the exporter and need not be contiguous.
#[derive(Debug, Clone, PartialEq)]
pub struct Proof {
  pub unit_id: UnitId,
  pub ordinal: u32,
  pub body:    String,
}

// ─── Footnote ────────────────────────────────────────────────────────────────

/// A footnote, keyed by its label. The footnote table is rebuilt wholesale on
/// every sync rather than upserted row by row.
#[derive(Debug, Clone, PartialEq)]
pub struct Footnote {
  pub label: String,
  pub body:  String,
}

// ─── Extra ───────────────────────────────────────────────────────────────────

/// The kinds of extra annotation a unit can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtraKind {
  Slogan,
  History,
  Reference,
}

impl ExtraKind {
  pub const ALL: [ExtraKind; 3] =
    [ExtraKind::Slogan, ExtraKind::History, ExtraKind::Reference];

  pub fn parse(s: &str) -> Result<Self> {
    match s {
      "slogan" => Ok(Self::Slogan),
      "history" => Ok(Self::History),
      "reference" => Ok(Self::Reference),
      other => Err(Error::UnknownExtraKind(other.to_string())),
    }
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Slogan => "slogan",
      Self::History => "history",
      Self::Reference => "reference",
    }
  }
}

impl std::fmt::Display for ExtraKind {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

/// An extra annotation, keyed by `(unit_id, kind)`. Upserted with change
/// detection, never deleted.
#[derive(Debug, Clone, PartialEq)]
pub struct Extra {
  pub unit_id: UnitId,
  pub kind:    ExtraKind,
  pub body:    String,
}

// ─── Search document ─────────────────────────────────────────────────────────

/// One row of a search view: a unit id and the text indexed for it.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchDocument {
  pub unit_id: UnitId,
  pub body:    String,
}
