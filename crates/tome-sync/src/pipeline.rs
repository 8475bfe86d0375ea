//! One full pipeline run over a store.

use std::collections::BTreeMap;

use tome_book::{Fragment, Roster, meta::TitleMap};
use tome_core::{store::CorpusStore, unit::Unit};
use tracing::info;

use crate::{
  closure::DependencyIndex,
  error::{Error, Result},
  extract::{self, EdgeCounts},
  resolve::{self, ResolveCounts},
  stats::{self, LocatorIndex},
  sync::{self, ActivityCounts, SyncCounts},
  views::{self, SearchCounts},
};

/// Everything a run consumes, loaded up front by the caller. The pipeline
/// itself never touches the filesystem.
#[derive(Debug, Default)]
pub struct RunInput {
  pub fragments:  Vec<Fragment>,
  pub roster:     Roster,
  /// Title metadata, keyed by label; empty when not configured.
  pub titles:     TitleMap,
  /// The corpus statistics blob; empty when not configured.
  pub statistics: BTreeMap<String, f64>,
  /// Part composition; empty when the book has no parts file.
  pub parts:      BTreeMap<String, Vec<String>>,
  pub pages:      Option<u32>,
}

/// Per-stage counters for the run, for logging and assertions.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
  pub sync:            SyncCounts,
  pub display_names:   usize,
  pub activity:        ActivityCounts,
  pub resolved:        ResolveCounts,
  pub search:          SearchCounts,
  pub part_links:      usize,
  pub edges:           EdgeCounts,
  pub unit_statistics: usize,
  pub book_statistics: usize,
}

/// Run the whole pipeline once: sync, resolve, rebuild the derived views,
/// extract edges, close the dependency graph, and replace the statistics
/// tables. Stages run strictly in sequence; each one only reads state the
/// previous stages have already committed.
pub async fn run<S: CorpusStore>(
  store: &S,
  input: RunInput,
) -> Result<RunSummary> {
  let mut summary = RunSummary::default();

  info!("syncing {} fragments", input.fragments.len());
  summary.sync = sync::sync_fragments(store, input.fragments).await?;
  summary.display_names =
    sync::apply_display_names(store, &input.titles, &input.roster).await?;
  summary.activity = sync::reconcile_activity(store, &input.roster).await?;

  info!("resolving references");
  let units = list_units(store).await?;
  summary.resolved = resolve::resolve_bodies(store, &units).await?;

  // Later stages must see the resolved bodies.
  let units = list_units(store).await?;

  info!("rebuilding derived views");
  summary.search = views::rebuild_search_documents(store, &units).await?;
  summary.part_links =
    views::rebuild_part_links(store, &units, &input.parts).await?;

  info!("extracting dependency and citation edges");
  summary.edges = extract::extract_edges(store, &units).await?;

  info!("computing statistics");
  let edges = store
    .list_dependencies()
    .await
    .map_err(|e| Error::Store(Box::new(e)))?;
  let index = DependencyIndex::from_edges(edges);
  let closure = index.close_over(units.iter().map(|u| u.id));
  let locators = LocatorIndex::from_units(&units);

  let unit_rows = stats::unit_statistics(&units, &closure, &locators);
  summary.unit_statistics = unit_rows.len();
  store
    .replace_unit_statistics(unit_rows)
    .await
    .map_err(|e| Error::Store(Box::new(e)))?;

  let book_rows = stats::book_statistics(&input.statistics, input.pages);
  summary.book_statistics = book_rows.len();
  store
    .replace_book_statistics(book_rows)
    .await
    .map_err(|e| Error::Store(Box::new(e)))?;

  Ok(summary)
}

async fn list_units<S: CorpusStore>(store: &S) -> Result<Vec<Unit>> {
  store
    .list_units()
    .await
    .map_err(|e| Error::Store(Box::new(e)))
}
