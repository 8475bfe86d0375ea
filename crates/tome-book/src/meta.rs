//! Metadata files shipped alongside the fragments: title lookups, the
//! precompiled statistics blob, and the part composition.

use std::{collections::BTreeMap, path::Path};

use serde::Deserialize;

use crate::error::Result;

/// Title metadata, keyed by label. Entries without a title are legal and
/// simply contribute no display name.
pub type TitleMap = BTreeMap<String, TitleEntry>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TitleEntry {
  #[serde(default)]
  pub title: Option<String>,
}

/// Load a title-metadata file: a JSON object `label → { "title": … }`.
pub fn load_titles(path: impl AsRef<Path>) -> Result<TitleMap> {
  Ok(serde_json::from_str(&std::fs::read_to_string(path)?)?)
}

/// Load the corpus statistics blob: a JSON object `name → number`.
pub fn load_statistics(path: impl AsRef<Path>) -> Result<BTreeMap<String, f64>> {
  Ok(serde_json::from_str(&std::fs::read_to_string(path)?)?)
}

/// Load the part composition: a JSON object mapping each part locator to the
/// locators of the chapters it contains.
pub fn load_parts(
  path: impl AsRef<Path>,
) -> Result<BTreeMap<String, Vec<String>>> {
  Ok(serde_json::from_str(&std::fs::read_to_string(path)?)?)
}

// ─── Tests ───────────────────────────────────────────────────────────────────
