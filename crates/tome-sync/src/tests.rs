//! End-to-end pipeline tests against an in-memory store.
//!
//! The fixture is a miniature book: one part, one chapter, two lemmas, a
//! theorem with a proof, a footnote, and a slogan. The lemma bodies carry a
//! reference marker (one resolvable, one not), the theorem and its proof
//! carry unit links (one dangling), and one lemma cites the bibliography.

use std::{
  collections::BTreeMap,
  io,
  sync::{Arc, Mutex},
};

use tome_book::{Fragment, Roster, meta::TitleEntry};
use tome_core::{
  content::{Footnote, Proof, SearchDocument},
  graph::{CitationEdge, DependencyEdge, PartLink},
  stats::{BookStatistic, UnitMetric, UnitStatistic},
  store::CorpusStore,
  unit::{Unit, UnitId},
};
use tome_store_sqlite::SqliteStore;

use crate::{
  pipeline::{RunInput, run},
  sync,
};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn id(code: &str) -> UnitId {
  UnitId::parse(code).unwrap()
}

fn fragment(name: &str, body: &str) -> Fragment {
  Fragment::parse(name, body.to_string())
    .unwrap()
    .expect("fragment")
}

fn book_fragments() -> Vec<Fragment> {
  vec![
    fragment("part-1-0P01-part-one.tag", "<p>Part one.</p>"),
    fragment("chapter-10-0C10-algebra.tag", "<p>Commutative algebra.</p>"),
    fragment(
      "lemma-10.1-0AAA-lemma-one.tag",
      r#"<p>uses <a href="/unit/0BBB">lemma two</a>, cf. \ref{no-such}</p>"#,
    ),
    fragment(
      "lemma-10.2-0BBB-lemma-two.tag",
      r#"<p>see \ref{lemma-one} and <a href="/bibliography/EGA">EGA</a></p>"#,
    ),
    fragment(
      "theorem-11.1-0CCC-main-theorem.tag",
      r#"<p>see <a href="/unit/0AAA">the first lemma</a></p>"#,
    ),
    fragment(
      "0CCC-1.proof",
      r#"<p>by <a href="/unit/0BBB">lemma two</a> and
        <a href="/unit/0FFF">a removed unit</a></p>"#,
    ),
    fragment("a-note.footnote", "<p>An aside.</p>"),
    fragment("0AAA.slogan", "<p>Flat is nice.</p>"),
  ]
}

fn input() -> RunInput {
  RunInput {
    fragments:  book_fragments(),
    roster:     Roster::parse(
      "# authoritative tags\n\
       0AAA,lemma-one\n\
       0BBB,lemma-two\n\
       0CCC,main-theorem\n\
       0C10,algebra\n\
       0P01,part-one\n",
    ),
    titles:     BTreeMap::from([(
      "lemma-one".to_string(),
      TitleEntry { title: Some("Lemma the First".into()) },
    )]),
    statistics: BTreeMap::from([("lemmas".to_string(), 2.0)]),
    parts:      BTreeMap::from([("1".to_string(), vec!["10".to_string()])]),
    pages:      Some(42),
  }
}

async fn metric(s: &SqliteStore, code: &str, metric: UnitMetric) -> i64 {
  s.unit_statistics(id(code))
    .await
    .unwrap()
    .into_iter()
    .find(|row| row.metric == metric)
    .map(|row| row.value)
    .unwrap()
}

// ─── Full pipeline ───────────────────────────────────────────────────────────

#[tokio::test]
async fn full_run_summary_counts() {
  let s = store().await;
  let summary = run(&s, input()).await.unwrap();

  assert_eq!(summary.sync.units, 5);
  assert_eq!(summary.sync.proofs, 1);
  assert_eq!(summary.sync.footnotes, 1);
  assert_eq!(summary.sync.extras, 1);
  // 5 units + 1 proof + 1 extra; footnotes are not classified.
  assert_eq!(summary.sync.created, 7);
  assert_eq!(summary.sync.changed, 0);

  assert_eq!(summary.display_names, 1);
  assert_eq!(summary.activity.active, 5);
  assert_eq!(summary.activity.inactive, 0);
  assert_eq!(summary.activity.drifted, 0);

  // Only lemma-two's body carries a resolvable marker.
  assert_eq!(summary.resolved.units, 1);
  assert_eq!(summary.resolved.proofs, 0);

  assert_eq!(summary.search.documents, 5);
  assert_eq!(summary.search.statements, 3);
  assert_eq!(summary.part_links, 1);
  assert_eq!(summary.edges.dependencies, 4);
  assert_eq!(summary.edges.citations, 1);
  assert_eq!(summary.unit_statistics, 20);
  assert_eq!(summary.book_statistics, 2);
}

#[tokio::test]
async fn full_run_resolves_and_extracts() {
  let s = store().await;
  run(&s, input()).await.unwrap();

  // The known label resolved to its id; the unknown marker survived.
  let lemma_two = s.get_unit(id("0BBB")).await.unwrap().unwrap();
  assert_eq!(
    lemma_two.body,
    r#"<p>see 0AAA and <a href="/bibliography/EGA">EGA</a></p>"#
  );
  let lemma_one = s.get_unit(id("0AAA")).await.unwrap().unwrap();
  assert!(lemma_one.body.contains(r"\ref{no-such}"));

  // Proof links attribute to the parent theorem; 0FFF is dangling but kept.
  let edge = |from: &str, to: &str| DependencyEdge { from: id(from), to: id(to) };
  assert_eq!(
    s.list_dependencies().await.unwrap(),
    [
      edge("0AAA", "0BBB"),
      edge("0CCC", "0AAA"),
      edge("0CCC", "0BBB"),
      edge("0CCC", "0FFF"),
    ]
  );

  assert_eq!(
    s.list_citations().await.unwrap(),
    [CitationEdge { unit_id: id("0BBB"), key: "EGA".into() }]
  );
}

#[tokio::test]
async fn full_run_computes_statistics() {
  let s = store().await;
  run(&s, input()).await.unwrap();

  // The theorem reaches both lemmas plus the dangling 0FFF.
  assert_eq!(metric(&s, "0CCC", UnitMetric::Preliminaries).await, 3);
  // Both lemmas live in chapter 10; the dangling member has no locator.
  assert_eq!(metric(&s, "0CCC", UnitMetric::Chapters).await, 1);
  assert_eq!(metric(&s, "0CCC", UnitMetric::Sections).await, 2);
  assert_eq!(metric(&s, "0CCC", UnitMetric::Consequences).await, 0);

  assert_eq!(metric(&s, "0AAA", UnitMetric::Preliminaries).await, 1);
  assert_eq!(metric(&s, "0AAA", UnitMetric::Consequences).await, 1);
  assert_eq!(metric(&s, "0BBB", UnitMetric::Preliminaries).await, 0);
  assert_eq!(metric(&s, "0BBB", UnitMetric::Consequences).await, 2);

  let book = s.list_book_statistics().await.unwrap();
  assert_eq!(
    book,
    [
      BookStatistic { name: "lemmas".into(), value: 2.0 },
      BookStatistic { name: "pages".into(), value: 42.0 },
    ]
  );
}

#[tokio::test]
async fn full_run_builds_views_and_metadata() {
  let s = store().await;
  run(&s, input()).await.unwrap();

  // Statement view: the two lemmas and the theorem, never the chapter or
  // the part.
  let statements = s.list_statement_documents().await.unwrap();
  let ids: Vec<_> = statements.iter().map(|d| d.unit_id).collect();
  assert_eq!(ids, [id("0AAA"), id("0BBB"), id("0CCC")]);

  // The statement view stores the body alone, without the proof text.
  let theorem = s.get_unit(id("0CCC")).await.unwrap().unwrap();
  assert_eq!(
    statements
      .iter()
      .find(|d| d.unit_id == id("0CCC"))
      .map(|d| d.body.as_str()),
    Some(theorem.body.as_str())
  );

  assert_eq!(
    s.list_part_links().await.unwrap(),
    [PartLink { part_id: id("0P01"), chapter_id: id("0C10") }]
  );

  assert_eq!(
    s.list_footnotes().await.unwrap(),
    [Footnote { label: "a-note".into(), body: "<p>An aside.</p>".into() }]
  );

  let lemma_one = s.get_unit(id("0AAA")).await.unwrap().unwrap();
  assert_eq!(lemma_one.display_name.as_deref(), Some("Lemma the First"));
  assert!(lemma_one.active);
}

// ─── Idempotence ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn second_sync_classifies_nothing() {
  let s = store().await;

  let first = sync::sync_fragments(&s, book_fragments()).await.unwrap();
  assert_eq!(first.created, 7);

  let second = sync::sync_fragments(&s, book_fragments()).await.unwrap();
  assert_eq!(second.created, 0);
  assert_eq!(second.changed, 0);
  assert_eq!(second.units, first.units);
}

#[derive(Debug, PartialEq)]
struct Snapshot {
  units:           Vec<Unit>,
  proofs:          Vec<Proof>,
  footnotes:       Vec<Footnote>,
  dependencies:    Vec<DependencyEdge>,
  citations:       Vec<CitationEdge>,
  statements:      Vec<SearchDocument>,
  part_links:      Vec<PartLink>,
  unit_statistics: Vec<UnitStatistic>,
  book_statistics: Vec<BookStatistic>,
}

async fn snapshot(s: &SqliteStore) -> Snapshot {
  Snapshot {
    units:           s.list_units().await.unwrap(),
    proofs:          s.list_proofs().await.unwrap(),
    footnotes:       s.list_footnotes().await.unwrap(),
    dependencies:    s.list_dependencies().await.unwrap(),
    citations:       s.list_citations().await.unwrap(),
    statements:      s.list_statement_documents().await.unwrap(),
    part_links:      s.list_part_links().await.unwrap(),
    unit_statistics: s.list_unit_statistics().await.unwrap(),
    book_statistics: s.list_book_statistics().await.unwrap(),
  }
}

#[tokio::test]
async fn pipeline_rerun_reaches_the_same_state() {
  let s = store().await;

  run(&s, input()).await.unwrap();
  let first = snapshot(&s).await;

  run(&s, input()).await.unwrap();
  let second = snapshot(&s).await;

  assert_eq!(first, second);
}

// ─── Dangling-target reporting ───────────────────────────────────────────────

/// A cloneable sink the fmt subscriber writes into, so a test can assert on
/// what a run logged.
#[derive(Clone, Default)]
struct LogSink(Arc<Mutex<Vec<u8>>>);

impl LogSink {
  fn contents(&self) -> String {
    String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
  }
}

impl io::Write for LogSink {
  fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
    self.0.lock().unwrap().extend_from_slice(buf);
    Ok(buf.len())
  }

  fn flush(&mut self) -> io::Result<()> {
    Ok(())
  }
}

#[tokio::test]
async fn full_run_warns_about_the_dangling_dependency_target() {
  let sink = LogSink::default();
  let writer = sink.clone();
  let subscriber = tracing_subscriber::fmt()
    .with_writer(move || writer.clone())
    .with_max_level(tracing::Level::WARN)
    .finish();
  let _guard = tracing::subscriber::set_default(subscriber);

  let s = store().await;
  run(&s, input()).await.unwrap();

  // The proof's 0FFF link has no stored unit and must be reported; its
  // stored 0BBB target must not be.
  let logs = sink.contents();
  assert!(logs.contains("0FFF"), "no dangling-target warning in: {logs}");
  assert!(!logs.contains("0BBB"), "stored target warned about in: {logs}");
}

// ─── Activity reconciliation ─────────────────────────────────────────────────

#[tokio::test]
async fn roster_drives_activity_and_drift_is_tolerated() {
  let s = store().await;
  let fragments = vec![
    fragment("lemma-10.1-0AAA-lemma-one.tag", "<p>one</p>"),
    fragment("lemma-10.2-0BBB-lemma-two.tag", "<p>two</p>"),
  ];
  sync::sync_fragments(&s, fragments).await.unwrap();

  // Freshly created units start inactive.
  assert!(!s.get_unit(id("0AAA")).await.unwrap().unwrap().active);

  // 0AAA is rostered under a drifted label; 0BBB is not rostered at all.
  let roster = Roster::parse("0AAA,some-other-label\n");
  let counts = sync::reconcile_activity(&s, &roster).await.unwrap();
  assert_eq!(counts.active, 1);
  assert_eq!(counts.inactive, 1);
  assert_eq!(counts.drifted, 1);

  assert!(s.get_unit(id("0AAA")).await.unwrap().unwrap().active);
  assert!(!s.get_unit(id("0BBB")).await.unwrap().unwrap().active);

  // Restoring the roster entry reactivates the unit.
  let roster = Roster::parse("0AAA,lemma-one\n0BBB,lemma-two\n");
  let counts = sync::reconcile_activity(&s, &roster).await.unwrap();
  assert_eq!(counts.active, 2);
  assert_eq!(counts.drifted, 0);
  assert!(s.get_unit(id("0BBB")).await.unwrap().unwrap().active);
}
