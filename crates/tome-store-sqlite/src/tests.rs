//! Integration tests for `SqliteStore` against an in-memory database.

use tome_core::{
  content::{Extra, ExtraKind, Footnote, Proof, SearchDocument},
  graph::{CitationEdge, DependencyEdge, PartLink},
  stats::{BookStatistic, UnitMetric, UnitStatistic},
  store::CorpusStore,
  unit::{Locator, NewUnit, UnitId, UnitKind},
};

use crate::{Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn id(code: &str) -> UnitId {
  UnitId::parse(code).unwrap()
}

fn unit(code: &str, label: &str, locator: &str) -> NewUnit {
  NewUnit {
    id:      id(code),
    label:   label.into(),
    kind:    UnitKind::Lemma,
    locator: Locator::new(locator),
    body:    format!("body of {code}"),
  }
}

// ─── Units ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn upsert_and_get_unit() {
  let s = store().await;

  s.upsert_unit(unit("0A1B", "algebra-lemma-first", "10.2"))
    .await
    .unwrap();

  let fetched = s.get_unit(id("0A1B")).await.unwrap();
  let Some(fetched) = fetched else {
    panic!("unit should exist");
  };
  assert_eq!(fetched.id, id("0A1B"));
  assert_eq!(fetched.label, "algebra-lemma-first");
  assert_eq!(fetched.kind, UnitKind::Lemma);
  assert_eq!(fetched.locator.as_str(), "10.2");
  assert_eq!(fetched.body, "body of 0A1B");
  assert!(!fetched.active);
  assert!(fetched.display_name.is_none());
}

#[tokio::test]
async fn get_unit_missing_returns_none() {
  let s = store().await;
  let result = s.get_unit(id("ZZZZ")).await.unwrap();
  assert!(result.is_none());
}

#[tokio::test]
async fn list_units_ordered_by_id() {
  let s = store().await;
  s.upsert_unit(unit("0C00", "c", "3")).await.unwrap();
  s.upsert_unit(unit("0A00", "a", "1")).await.unwrap();
  s.upsert_unit(unit("0B00", "b", "2")).await.unwrap();

  let all = s.list_units().await.unwrap();
  let ids: Vec<_> = all.iter().map(|u| u.id.as_str().to_string()).collect();
  assert_eq!(ids, ["0A00", "0B00", "0C00"]);
}

#[tokio::test]
async fn reupsert_overwrites_content_but_keeps_flags() {
  let s = store().await;

  s.upsert_unit(unit("0A1B", "old-label", "10.2")).await.unwrap();
  s.set_active(id("0A1B"), true).await.unwrap();
  s.set_display_name(id("0A1B"), "Lemma 10.2.1".into())
    .await
    .unwrap();

  // A later sync delivers revised content for the same id.
  s.upsert_unit(NewUnit {
    id:      id("0A1B"),
    label:   "new-label".into(),
    kind:    UnitKind::Proposition,
    locator: Locator::new("10.3"),
    body:    "revised body".into(),
  })
  .await
  .unwrap();

  let fetched = s.get_unit(id("0A1B")).await.unwrap().unwrap();
  assert_eq!(fetched.label, "new-label");
  assert_eq!(fetched.kind, UnitKind::Proposition);
  assert_eq!(fetched.body, "revised body");
  assert!(fetched.active, "activity must survive a content upsert");
  assert_eq!(fetched.display_name.as_deref(), Some("Lemma 10.2.1"));
}

#[tokio::test]
async fn set_unit_body_overwrites_body_only() {
  let s = store().await;
  s.upsert_unit(unit("0A1B", "lemma", "10.2")).await.unwrap();

  s.set_unit_body(id("0A1B"), "resolved body".into())
    .await
    .unwrap();

  let fetched = s.get_unit(id("0A1B")).await.unwrap().unwrap();
  assert_eq!(fetched.body, "resolved body");
  assert_eq!(fetched.label, "lemma");
}

// ─── Proofs ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn upsert_and_get_proof() {
  let s = store().await;

  s.upsert_proof(Proof {
    unit_id: id("0A1B"),
    ordinal: 1,
    body:    "first proof".into(),
  })
  .await
  .unwrap();

  let fetched = s.get_proof(id("0A1B"), 1).await.unwrap().unwrap();
  assert_eq!(fetched.body, "first proof");

  assert!(s.get_proof(id("0A1B"), 2).await.unwrap().is_none());
}

#[tokio::test]
async fn reupsert_proof_overwrites_body() {
  let s = store().await;

  s.upsert_proof(Proof {
    unit_id: id("0A1B"),
    ordinal: 1,
    body:    "draft".into(),
  })
  .await
  .unwrap();
  s.upsert_proof(Proof {
    unit_id: id("0A1B"),
    ordinal: 1,
    body:    "final".into(),
  })
  .await
  .unwrap();

  let all = s.list_proofs().await.unwrap();
  assert_eq!(all.len(), 1);
  assert_eq!(all[0].body, "final");
}

#[tokio::test]
async fn list_proofs_ordered_by_unit_then_ordinal() {
  let s = store().await;

  for (code, ordinal) in [("0B00", 1), ("0A00", 2), ("0A00", 1)] {
    s.upsert_proof(Proof {
      unit_id: id(code),
      ordinal,
      body:    String::new(),
    })
    .await
    .unwrap();
  }

  let all = s.list_proofs().await.unwrap();
  let keys: Vec<_> = all
    .iter()
    .map(|p| (p.unit_id.as_str().to_string(), p.ordinal))
    .collect();
  assert_eq!(
    keys,
    [
      ("0A00".to_string(), 1),
      ("0A00".to_string(), 2),
      ("0B00".to_string(), 1)
    ]
  );
}

#[tokio::test]
async fn set_proof_body_targets_one_ordinal() {
  let s = store().await;

  for ordinal in [1, 2] {
    s.upsert_proof(Proof {
      unit_id: id("0A1B"),
      ordinal,
      body:    "raw".into(),
    })
    .await
    .unwrap();
  }

  s.set_proof_body(id("0A1B"), 2, "resolved".into())
    .await
    .unwrap();

  assert_eq!(s.get_proof(id("0A1B"), 1).await.unwrap().unwrap().body, "raw");
  assert_eq!(
    s.get_proof(id("0A1B"), 2).await.unwrap().unwrap().body,
    "resolved"
  );
}

// ─── Footnotes ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn replace_footnotes_swaps_whole_snapshot() {
  let s = store().await;

  s.replace_footnotes(vec![
    Footnote {
      label: "remark-on-limits".into(),
      body:  "older text".into(),
    },
    Footnote {
      label: "aside-on-notation".into(),
      body:  "kept nowhere".into(),
    },
  ])
  .await
  .unwrap();

  s.replace_footnotes(vec![Footnote {
    label: "remark-on-limits".into(),
    body:  "newer text".into(),
  }])
  .await
  .unwrap();

  let all = s.list_footnotes().await.unwrap();
  assert_eq!(all.len(), 1);
  assert_eq!(all[0].label, "remark-on-limits");
  assert_eq!(all[0].body, "newer text");
}

// ─── Extras ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn upsert_and_get_extra() {
  let s = store().await;

  s.upsert_extra(Extra {
    unit_id: id("0A1B"),
    kind:    ExtraKind::Slogan,
    body:    "flat is nice".into(),
  })
  .await
  .unwrap();
  s.upsert_extra(Extra {
    unit_id: id("0A1B"),
    kind:    ExtraKind::Slogan,
    body:    "flatness is generic".into(),
  })
  .await
  .unwrap();

  let fetched = s
    .get_extra(id("0A1B"), ExtraKind::Slogan)
    .await
    .unwrap()
    .unwrap();
  assert_eq!(fetched.body, "flatness is generic");

  assert!(
    s.get_extra(id("0A1B"), ExtraKind::History)
      .await
      .unwrap()
      .is_none()
  );
}

// ─── Dependency & citation edges ─────────────────────────────────────────────

#[tokio::test]
async fn dependencies_keep_insertion_order_and_dangling_targets() {
  let s = store().await;
  s.upsert_unit(unit("0A00", "a", "1")).await.unwrap();

  // 0X99 has no unit row; the edge is stored anyway.
  let edges = vec![
    DependencyEdge { from: id("0A00"), to: id("0X99") },
    DependencyEdge { from: id("0A00"), to: id("0B00") },
  ];
  s.replace_dependencies(edges.clone()).await.unwrap();

  assert_eq!(s.list_dependencies().await.unwrap(), edges);
}

#[tokio::test]
async fn citations_listed_by_unit_then_key() {
  let s = store().await;

  s.replace_citations(vec![
    CitationEdge { unit_id: id("0B00"), key: "EGA".into() },
    CitationEdge { unit_id: id("0A00"), key: "Matsumura".into() },
    CitationEdge { unit_id: id("0A00"), key: "EGA".into() },
  ])
  .await
  .unwrap();

  let all = s.list_citations().await.unwrap();
  let keys: Vec<_> = all
    .iter()
    .map(|c| (c.unit_id.as_str().to_string(), c.key.clone()))
    .collect();
  assert_eq!(
    keys,
    [
      ("0A00".to_string(), "EGA".to_string()),
      ("0A00".to_string(), "Matsumura".to_string()),
      ("0B00".to_string(), "EGA".to_string())
    ]
  );
}

// ─── Search documents & part links ───────────────────────────────────────────

#[tokio::test]
async fn replace_search_documents_swaps_both_views() {
  let s = store().await;

  s.replace_search_documents(
    vec![
      SearchDocument { unit_id: id("0A00"), body: "a plus proofs".into() },
      SearchDocument { unit_id: id("0B00"), body: "b plus proofs".into() },
    ],
    vec![SearchDocument { unit_id: id("0A00"), body: "a body".into() }],
  )
  .await
  .unwrap();

  let statements = s.list_statement_documents().await.unwrap();
  assert_eq!(statements.len(), 1);
  assert_eq!(statements[0].unit_id, id("0A00"));

  // A rerun that no longer classes 0A00 as a statement drops it.
  s.replace_search_documents(
    vec![SearchDocument { unit_id: id("0B00"), body: "b plus proofs".into() }],
    vec![SearchDocument { unit_id: id("0B00"), body: "b body".into() }],
  )
  .await
  .unwrap();

  let statements = s.list_statement_documents().await.unwrap();
  assert_eq!(statements.len(), 1);
  assert_eq!(statements[0].unit_id, id("0B00"));
}

#[tokio::test]
async fn part_links_round_trip() {
  let s = store().await;

  s.replace_part_links(vec![
    PartLink { part_id: id("0P01"), chapter_id: id("0C02") },
    PartLink { part_id: id("0P01"), chapter_id: id("0C01") },
  ])
  .await
  .unwrap();

  let all = s.list_part_links().await.unwrap();
  assert_eq!(all.len(), 2);
  assert_eq!(all[0].chapter_id, id("0C01"));
  assert_eq!(all[1].chapter_id, id("0C02"));
}

// ─── Statistics ──────────────────────────────────────────────────────────────

fn stat(code: &str, metric: UnitMetric, value: i64) -> UnitStatistic {
  UnitStatistic { unit_id: id(code), metric, value }
}

#[tokio::test]
async fn unit_statistics_round_trip() {
  let s = store().await;

  s.replace_unit_statistics(vec![
    stat("0B00", UnitMetric::Preliminaries, 12),
    stat("0A00", UnitMetric::Consequences, 3),
    stat("0A00", UnitMetric::Preliminaries, 7),
  ])
  .await
  .unwrap();

  let all = s.list_unit_statistics().await.unwrap();
  assert_eq!(all.len(), 3);
  assert_eq!(all[0].unit_id, id("0A00"));

  let one = s.unit_statistics(id("0A00")).await.unwrap();
  assert_eq!(one.len(), 2);
  assert!(one.iter().all(|row| row.unit_id == id("0A00")));
}

#[tokio::test]
async fn conflicting_statistics_batch_leaves_previous_rows() {
  let s = store().await;

  s.replace_unit_statistics(vec![stat("0A00", UnitMetric::Preliminaries, 7)])
    .await
    .unwrap();

  // Two rows for the same (unit, metric) violate the table's unique key;
  // the whole replace must roll back.
  let result = s
    .replace_unit_statistics(vec![
      stat("0B00", UnitMetric::Chapters, 2),
      stat("0B00", UnitMetric::Chapters, 3),
    ])
    .await;
  assert!(result.is_err());

  let all = s.list_unit_statistics().await.unwrap();
  assert_eq!(all.len(), 1);
  assert_eq!(all[0].unit_id, id("0A00"));
  assert_eq!(all[0].value, 7);
}

#[tokio::test]
async fn book_statistics_round_trip() {
  let s = store().await;

  s.replace_book_statistics(vec![
    BookStatistic { name: "pages".into(), value: 7521.0 },
    BookStatistic { name: "lemmas".into(), value: 3024.0 },
  ])
  .await
  .unwrap();

  let all = s.list_book_statistics().await.unwrap();
  assert_eq!(all.len(), 2);
  assert_eq!(all[0].name, "lemmas");
  assert_eq!(all[1].name, "pages");
  assert_eq!(all[1].value, 7521.0);
}

// ─── Run lock ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn second_open_of_same_file_is_rejected() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("tome.db");

  let _held = SqliteStore::open(&path).await.expect("first open");

  let second = SqliteStore::open(&path).await;
  let Err(err) = second else {
    panic!("second open should fail while the first connection lives");
  };
  assert!(matches!(err, Error::Busy), "unexpected error: {err}");
}
