//! The `CorpusStore` trait.
//!
//! Implemented by storage backends (e.g. `tome-store-sqlite`). The sync
//! engine (`tome-sync`) depends on this abstraction, not on any concrete
//! backend.
//!
//! Two write disciplines coexist:
//! - **upserts** for authoritative content (units, proofs, extras) — rows are
//!   overwritten in place and never deleted;
//! - **atomic replaces** for recomputed views (footnotes, edges, search
//!   documents, part links, statistics) — each `replace_*` call swaps the
//!   whole table as one unit, so a failure leaves the previous contents
//!   intact.

use std::future::Future;

use crate::{
  content::{Extra, ExtraKind, Footnote, Proof, SearchDocument},
  graph::{CitationEdge, DependencyEdge, PartLink},
  stats::{BookStatistic, UnitStatistic},
  unit::{NewUnit, Unit, UnitId},
};

/// Abstraction over a tome corpus store backend.
///
/// All methods return `Send` futures so the trait can be used from
/// multi-threaded async runtimes.
pub trait CorpusStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Units ─────────────────────────────────────────────────────────────

  /// Insert or overwrite the content fields of a unit. The activity flag
  /// and display name of an existing row are preserved; a fresh row starts
  /// inactive with no display name.
  fn upsert_unit(
    &self,
    unit: NewUnit,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Retrieve a unit by id. Returns `None` if not found.
  fn get_unit(
    &self,
    id: UnitId,
  ) -> impl Future<Output = Result<Option<Unit>, Self::Error>> + Send + '_;

  /// List all units, ordered by id.
  fn list_units(
    &self,
  ) -> impl Future<Output = Result<Vec<Unit>, Self::Error>> + Send + '_;

  /// Overwrite just the body of a unit (the reference pass writes resolved
  /// bodies back through this).
  fn set_unit_body(
    &self,
    id: UnitId,
    body: String,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Set the activity flag of a unit.
  fn set_active(
    &self,
    id: UnitId,
    active: bool,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Set the display name of a unit.
  fn set_display_name(
    &self,
    id: UnitId,
    name: String,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Proofs ────────────────────────────────────────────────────────────

  /// Insert or overwrite a proof, keyed by `(unit_id, ordinal)`.
  fn upsert_proof(
    &self,
    proof: Proof,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Retrieve one proof. Returns `None` if not found.
  fn get_proof(
    &self,
    unit_id: UnitId,
    ordinal: u32,
  ) -> impl Future<Output = Result<Option<Proof>, Self::Error>> + Send + '_;

  /// List all proofs, ordered by `(unit_id, ordinal)`.
  fn list_proofs(
    &self,
  ) -> impl Future<Output = Result<Vec<Proof>, Self::Error>> + Send + '_;

  /// Overwrite just the body of a proof.
  fn set_proof_body(
    &self,
    unit_id: UnitId,
    ordinal: u32,
    body: String,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Footnotes ─────────────────────────────────────────────────────────

  /// Atomically replace the whole footnote table.
  fn replace_footnotes(
    &self,
    footnotes: Vec<Footnote>,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// List all footnotes, ordered by label.
  fn list_footnotes(
    &self,
  ) -> impl Future<Output = Result<Vec<Footnote>, Self::Error>> + Send + '_;

  // ── Extras ────────────────────────────────────────────────────────────

  /// Insert or overwrite an extra annotation, keyed by `(unit_id, kind)`.
  fn upsert_extra(
    &self,
    extra: Extra,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Retrieve one extra annotation. Returns `None` if not found.
  fn get_extra(
    &self,
    unit_id: UnitId,
    kind: ExtraKind,
  ) -> impl Future<Output = Result<Option<Extra>, Self::Error>> + Send + '_;

  // ── Dependency & citation edges ───────────────────────────────────────

  /// Atomically replace the dependency edge table. Duplicates are stored
  /// as-is; consumers that need a set must deduplicate.
  fn replace_dependencies(
    &self,
    edges: Vec<DependencyEdge>,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// List all dependency edges in storage order.
  fn list_dependencies(
    &self,
  ) -> impl Future<Output = Result<Vec<DependencyEdge>, Self::Error>> + Send + '_;

  /// Atomically replace the citation edge table.
  fn replace_citations(
    &self,
    edges: Vec<CitationEdge>,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// List all citation edges, ordered by `(unit_id, key)`.
  fn list_citations(
    &self,
  ) -> impl Future<Output = Result<Vec<CitationEdge>, Self::Error>> + Send + '_;

  // ── Search documents & part links ─────────────────────────────────────

  /// Atomically replace both search views: the full view (every unit, body
  /// plus proofs) and the statement view (statement kinds, body only).
  fn replace_search_documents(
    &self,
    units: Vec<SearchDocument>,
    statements: Vec<SearchDocument>,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// List the statement search view, ordered by unit id.
  fn list_statement_documents(
    &self,
  ) -> impl Future<Output = Result<Vec<SearchDocument>, Self::Error>> + Send + '_;

  /// Atomically replace the part/chapter link table.
  fn replace_part_links(
    &self,
    links: Vec<PartLink>,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// List all part links, ordered by `(part_id, chapter_id)`.
  fn list_part_links(
    &self,
  ) -> impl Future<Output = Result<Vec<PartLink>, Self::Error>> + Send + '_;

  // ── Statistics ────────────────────────────────────────────────────────

  /// Atomically replace the per-unit statistics table. The natural key
  /// `(unit_id, metric)` is unique; a batch violating that aborts the
  /// replace and leaves the previous table intact.
  fn replace_unit_statistics(
    &self,
    stats: Vec<UnitStatistic>,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// List all per-unit statistics, ordered by `(unit_id, metric)`.
  fn list_unit_statistics(
    &self,
  ) -> impl Future<Output = Result<Vec<UnitStatistic>, Self::Error>> + Send + '_;

  /// The statistics rows of one unit.
  fn unit_statistics(
    &self,
    id: UnitId,
  ) -> impl Future<Output = Result<Vec<UnitStatistic>, Self::Error>> + Send + '_;

  /// Atomically replace the book-wide statistics table.
  fn replace_book_statistics(
    &self,
    stats: Vec<BookStatistic>,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// List all book-wide statistics, ordered by name.
  fn list_book_statistics(
    &self,
  ) -> impl Future<Output = Result<Vec<BookStatistic>, Self::Error>> + Send + '_;
}
