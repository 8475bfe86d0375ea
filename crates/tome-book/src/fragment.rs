//! Fragment filename conventions.
//!
//! The exporter writes one file per content item into a flat directory:
//!
//! - `<kind>-<locator>-<id>-<label…>.tag` — a unit; the label may itself
//!   contain `-`, so everything after the third piece is re-joined.
//! - `<id>-<ordinal>.proof` — a proof body for a unit.
//! - `<label>.footnote` — a footnote.
//! - `<id>.slogan` / `<id>.history` / `<id>.reference` — extra annotations.
//!
//! Everything else in the directory (`index`, `.bib`, `parts.json`,
//! `meta.statistics`, …) is not a fragment and is ignored.

use tome_core::{
  content::{Extra, ExtraKind, Footnote, Proof},
  unit::{Locator, NewUnit, UnitId, UnitKind},
};

use crate::error::{Error, Result};

/// A parsed content fragment, carrying the core entity it produces.
#[derive(Debug, Clone, PartialEq)]
pub enum Fragment {
  Unit(NewUnit),
  Proof(Proof),
  Footnote(Footnote),
  Extra(Extra),
}

impl Fragment {
  /// Whether `file_name` follows one of the fragment conventions. Used to
  /// avoid reading non-fragment files (PDFs, bibliographies) at all.
  pub fn recognizes(file_name: &str) -> bool {
    matches!(
      file_name.rsplit_once('.').map(|(_, ext)| ext),
      Some("tag" | "proof" | "footnote" | "slogan" | "history" | "reference")
    )
  }

  /// Parse a fragment from its file name and body.
  ///
  /// Returns `Ok(None)` for files that are not fragments at all, and `Err`
  /// for files that match a convention but violate it (the caller skips
  /// those and keeps going).
  pub fn parse(file_name: &str, body: String) -> Result<Option<Fragment>> {
    let Some((stem, ext)) = file_name.rsplit_once('.') else {
      return Ok(None);
    };

    match ext {
      "tag" => parse_unit(file_name, stem, body).map(Some),
      "proof" => parse_proof(file_name, stem, body).map(Some),
      "footnote" => Ok(Some(Fragment::Footnote(Footnote {
        label: stem.to_string(),
        body,
      }))),
      "slogan" | "history" | "reference" => {
        let unit_id = UnitId::parse(stem)?;
        let kind = ExtraKind::parse(ext)?;
        Ok(Some(Fragment::Extra(Extra { unit_id, kind, body })))
      }
      _ => Ok(None),
    }
  }
}

fn parse_unit(file_name: &str, stem: &str, body: String) -> Result<Fragment> {
  let pieces: Vec<&str> = stem.split('-').collect();
  if pieces.len() < 3 {
    return Err(Error::MalformedUnitName(file_name.to_string()));
  }

  Ok(Fragment::Unit(NewUnit {
    id:      UnitId::parse(pieces[2])?,
    label:   pieces[3..].join("-"),
    kind:    UnitKind::parse(pieces[0]),
    locator: Locator::new(pieces[1]),
    body,
  }))
}

fn parse_proof(file_name: &str, stem: &str, body: String) -> Result<Fragment> {
  let Some((id, ordinal)) = stem.split_once('-') else {
    return Err(Error::MalformedProofName(file_name.to_string()));
  };
  if ordinal.contains('-') {
    return Err(Error::MalformedProofName(file_name.to_string()));
  }

  let unit_id = UnitId::parse(id)?;
  let ordinal: u32 = match ordinal.parse() {
    Ok(n) if n > 0 => n,
    _ => {
      return Err(Error::InvalidOrdinal {
        name:  file_name.to_string(),
        value: ordinal.to_string(),
      });
    }
  };

  Ok(Fragment::Proof(Proof {
    unit_id,
    ordinal,
    body,
  }))
}

// ─── Tests ───────────────────────────────────────────────────────────────────
