//! Derived views rebuilt from resolved content: the search documents and
//! the part/chapter membership links.

use std::collections::BTreeMap;

use tome_core::{
  content::SearchDocument,
  graph::PartLink,
  store::CorpusStore,
  unit::{Unit, UnitId, UnitKind},
};
use tracing::warn;

use crate::error::{Error, Result};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SearchCounts {
  pub documents:  usize,
  pub statements: usize,
}

/// Rebuild both search views. The full view indexes every unit's body
/// followed by its proofs' bodies in ordinal order; the statement view
/// indexes statement-kind units' bodies alone. One atomic replace covers
/// both tables.
pub async fn rebuild_search_documents<S: CorpusStore>(
  store: &S,
  units: &[Unit],
) -> Result<SearchCounts> {
  let proofs = store
    .list_proofs()
    .await
    .map_err(|e| Error::Store(Box::new(e)))?;
  // list_proofs is ordered by (unit, ordinal), so appending concatenates
  // each unit's proofs in ordinal order.
  let mut proof_bodies: BTreeMap<UnitId, String> = BTreeMap::new();
  for proof in proofs {
    proof_bodies
      .entry(proof.unit_id)
      .or_default()
      .push_str(&proof.body);
  }

  let mut documents = Vec::with_capacity(units.len());
  let mut statements = Vec::new();
  for unit in units {
    let mut body = unit.body.clone();
    if let Some(appendix) = proof_bodies.get(&unit.id) {
      body.push_str(appendix);
    }
    documents.push(SearchDocument { unit_id: unit.id, body });

    if unit.kind.is_statement() {
      statements.push(SearchDocument {
        unit_id: unit.id,
        body:    unit.body.clone(),
      });
    }
  }

  let counts = SearchCounts {
    documents:  documents.len(),
    statements: statements.len(),
  };
  store
    .replace_search_documents(documents, statements)
    .await
    .map_err(|e| Error::Store(Box::new(e)))?;

  Ok(counts)
}

/// Rebuild part membership from the parts file. Each entry maps a part
/// locator to its chapter locators; both sides resolve to unit ids through
/// the stored units of kind part resp. chapter. An entry whose locator
/// matches no stored unit is warned about and skipped.
pub async fn rebuild_part_links<S: CorpusStore>(
  store: &S,
  units: &[Unit],
  parts: &BTreeMap<String, Vec<String>>,
) -> Result<usize> {
  let mut part_ids: BTreeMap<&str, UnitId> = BTreeMap::new();
  let mut chapter_ids: BTreeMap<&str, UnitId> = BTreeMap::new();
  for unit in units {
    match unit.kind {
      UnitKind::Part => {
        part_ids.insert(unit.locator.as_str(), unit.id);
      }
      UnitKind::Chapter => {
        chapter_ids.insert(unit.locator.as_str(), unit.id);
      }
      _ => {}
    }
  }

  let mut links = Vec::new();
  for (part, chapters) in parts {
    let Some(&part_id) = part_ids.get(part.as_str()) else {
      warn!("parts file names part {part:?}, but no part unit has that locator");
      continue;
    };
    for chapter in chapters {
      let Some(&chapter_id) = chapter_ids.get(chapter.as_str()) else {
        warn!(
          "part {part:?} lists chapter {chapter:?}, but no chapter unit has \
           that locator"
        );
        continue;
      };
      links.push(PartLink { part_id, chapter_id });
    }
  }

  let count = links.len();
  store
    .replace_part_links(links)
    .await
    .map_err(|e| Error::Store(Box::new(e)))?;

  Ok(count)
}
