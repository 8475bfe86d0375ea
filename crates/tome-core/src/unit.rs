//! Unit — the addressable content item of the corpus.
//!
//! A unit is one statement, chapter, section, … of the reference work. Its
//! canonical id is permanent; everything else is overwritten on every sync
//! from the latest book export.

use std::fmt;

use crate::error::{Error, Result};

// ─── UnitId ──────────────────────────────────────────────────────────────────

/// Canonical identifier of a unit: exactly four ASCII alphanumeric
/// characters, normalized to uppercase (`[0-9A-Z]{4}`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UnitId([u8; 4]);

impl UnitId {
  pub const LEN: usize = 4;

  /// Parse an identifier, uppercasing lowercase letters. Anything that is
  /// not exactly four ASCII alphanumerics is rejected.
  pub fn parse(s: &str) -> Result<Self> {
    let bytes = s.as_bytes();
    if bytes.len() != Self::LEN {
      return Err(Error::InvalidUnitId(s.to_string()));
    }

    let mut id = [0u8; Self::LEN];
    for (slot, &b) in id.iter_mut().zip(bytes) {
      if !b.is_ascii_alphanumeric() {
        return Err(Error::InvalidUnitId(s.to_string()));
      }
      *slot = b.to_ascii_uppercase();
    }
    Ok(Self(id))
  }

  /// The id as a string slice. The constructor only admits ASCII bytes.
  pub fn as_str(&self) -> &str {
    std::str::from_utf8(&self.0).unwrap_or("")
  }
}

impl fmt::Display for UnitId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl std::str::FromStr for UnitId {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> { Self::parse(s) }
}

// ─── UnitKind ────────────────────────────────────────────────────────────────

/// Category of a unit. The set is open — the exporter may emit kinds this
/// crate has never heard of — so unknown values round-trip through `Other`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnitKind {
  Chapter,
  Section,
  Definition,
  Example,
  Exercise,
  Lemma,
  Proposition,
  Remark,
  Remarks,
  Situation,
  Theorem,
  Equation,
  Item,
  Part,
  Other(String),
}

impl UnitKind {
  /// Parse a kind string (case-insensitive; canonical form is lowercase).
  pub fn parse(s: &str) -> Self {
    match s.to_ascii_lowercase().as_str() {
      "chapter" => Self::Chapter,
      "section" => Self::Section,
      "definition" => Self::Definition,
      "example" => Self::Example,
      "exercise" => Self::Exercise,
      "lemma" => Self::Lemma,
      "proposition" => Self::Proposition,
      "remark" => Self::Remark,
      "remarks" => Self::Remarks,
      "situation" => Self::Situation,
      "theorem" => Self::Theorem,
      "equation" => Self::Equation,
      "item" => Self::Item,
      "part" => Self::Part,
      other => Self::Other(other.to_string()),
    }
  }

  pub fn as_str(&self) -> &str {
    match self {
      Self::Chapter => "chapter",
      Self::Section => "section",
      Self::Definition => "definition",
      Self::Example => "example",
      Self::Exercise => "exercise",
      Self::Lemma => "lemma",
      Self::Proposition => "proposition",
      Self::Remark => "remark",
      Self::Remarks => "remarks",
      Self::Situation => "situation",
      Self::Theorem => "theorem",
      Self::Equation => "equation",
      Self::Item => "item",
      Self::Part => "part",
      Self::Other(s) => s,
    }
  }

  /// Whether units of this kind are standalone mathematical statements,
  /// eligible for the statement search view.
  pub fn is_statement(&self) -> bool {
    matches!(
      self,
      Self::Definition
        | Self::Example
        | Self::Exercise
        | Self::Lemma
        | Self::Proposition
        | Self::Remark
        | Self::Remarks
        | Self::Situation
        | Self::Theorem
    )
  }
}

impl fmt::Display for UnitKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

// ─── Locator ─────────────────────────────────────────────────────────────────

/// Dotted structural path encoding chapter/section position, e.g. `"3.2"`.
/// Used only for structural aggregation, never for uniqueness.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Locator(String);

impl Locator {
  pub fn new(s: impl Into<String>) -> Self { Self(s.into()) }

  pub fn as_str(&self) -> &str { &self.0 }

  /// The chapter component: everything before the first dot.
  pub fn chapter(&self) -> &str {
    self.0.split('.').next().unwrap_or("")
  }

  /// The section component: the first two dot-separated components joined
  /// back with a dot, or `None` when the path has fewer than two.
  pub fn section(&self) -> Option<String> {
    let mut parts = self.0.split('.');
    match (parts.next(), parts.next()) {
      (Some(chapter), Some(section)) => Some(format!("{chapter}.{section}")),
      _ => None,
    }
  }
}

impl fmt::Display for Locator {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

// ─── Unit ────────────────────────────────────────────────────────────────────

/// A stored content item.
#[derive(Debug, Clone, PartialEq)]
pub struct Unit {
  pub id:           UnitId,
  pub label:        String,
  pub kind:         UnitKind,
  pub locator:      Locator,
  /// Rich-text body; resolved (labels replaced by ids) after the reference
  /// pass has run.
  pub body:         String,
  /// True iff the unit appears in the current roster.
  pub active:       bool,
  pub display_name: Option<String>,
}

/// Content fields of a unit as delivered by a fragment. The activity flag
/// and display name are maintained by their own passes and survive the
/// content upsert untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUnit {
  pub id:      UnitId,
  pub label:   String,
  pub kind:    UnitKind,
  pub locator: Locator,
  pub body:    String,
}

// ─── Tests ───────────────────────────────────────────────────────────────────
