//! [`SqliteStore`] — the SQLite implementation of [`CorpusStore`].

use std::path::Path;

use rusqlite::OptionalExtension as _;
use tome_core::{
  content::{Extra, ExtraKind, Footnote, Proof, SearchDocument},
  graph::{CitationEdge, DependencyEdge, PartLink},
  stats::{BookStatistic, UnitStatistic},
  store::CorpusStore,
  unit::{NewUnit, Unit, UnitId},
};

use crate::{
  Error, Result,
  encode::{RawProof, RawStatistic, RawUnit, decode_unit_id},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A tome corpus store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path`, run schema initialisation, and take
  /// the run lock: the connection keeps SQLite's EXCLUSIVE locking mode for
  /// its whole lifetime, so a second concurrent run fails fast with
  /// [`Error::Busy`]. The lock is released by the OS when the connection (or
  /// the process) goes away.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema(true).await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing. A private in-memory
  /// database has no second writer to exclude, so no run lock is taken.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema(false).await?;
    Ok(store)
  }

  async fn init_schema(&self, exclusive: bool) -> Result<()> {
    let result = self
      .conn
      .call(move |conn| {
        if exclusive {
          conn.pragma_update(None, "locking_mode", "exclusive")?;
          conn.busy_timeout(std::time::Duration::ZERO)?;
        }
        // The schema batch writes, which under EXCLUSIVE locking mode
        // acquires and holds the file lock.
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await;

    match result {
      Ok(()) => Ok(()),
      Err(e) if is_busy(&e) => Err(Error::Busy),
      Err(e) => Err(e.into()),
    }
  }
}

fn is_busy(e: &tokio_rusqlite::Error) -> bool {
  matches!(
    e,
    tokio_rusqlite::Error::Rusqlite(rusqlite::Error::SqliteFailure(err, _))
      if matches!(
        err.code,
        rusqlite::ErrorCode::DatabaseBusy | rusqlite::ErrorCode::DatabaseLocked
      )
  )
}

// ─── CorpusStore impl ────────────────────────────────────────────────────────

impl CorpusStore for SqliteStore {
  type Error = Error;

  // ── Units ─────────────────────────────────────────────────────────────────

  async fn upsert_unit(&self, unit: NewUnit) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO units (unit_id, label, kind, locator, body)
           VALUES (?1, ?2, ?3, ?4, ?5)
           ON CONFLICT(unit_id) DO UPDATE SET
             label   = excluded.label,
             kind    = excluded.kind,
             locator = excluded.locator,
             body    = excluded.body",
          rusqlite::params![
            unit.id.as_str(),
            unit.label,
            unit.kind.as_str(),
            unit.locator.as_str(),
            unit.body,
          ],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn get_unit(&self, id: UnitId) -> Result<Option<Unit>> {
    let raw: Option<RawUnit> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT unit_id, label, kind, locator, body, active, display_name
               FROM units WHERE unit_id = ?1",
              rusqlite::params![id.as_str()],
              |row| {
                Ok(RawUnit {
                  unit_id:      row.get(0)?,
                  label:        row.get(1)?,
                  kind:         row.get(2)?,
                  locator:      row.get(3)?,
                  body:         row.get(4)?,
                  active:       row.get(5)?,
                  display_name: row.get(6)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawUnit::into_unit).transpose()
  }

  async fn list_units(&self) -> Result<Vec<Unit>> {
    let raws: Vec<RawUnit> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT unit_id, label, kind, locator, body, active, display_name
           FROM units ORDER BY unit_id",
        )?;
        let rows = stmt
          .query_map([], |row| {
            Ok(RawUnit {
              unit_id:      row.get(0)?,
              label:        row.get(1)?,
              kind:         row.get(2)?,
              locator:      row.get(3)?,
              body:         row.get(4)?,
              active:       row.get(5)?,
              display_name: row.get(6)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawUnit::into_unit).collect()
  }

  async fn set_unit_body(&self, id: UnitId, body: String) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE units SET body = ?2 WHERE unit_id = ?1",
          rusqlite::params![id.as_str(), body],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn set_active(&self, id: UnitId, active: bool) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE units SET active = ?2 WHERE unit_id = ?1",
          rusqlite::params![id.as_str(), active],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn set_display_name(&self, id: UnitId, name: String) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE units SET display_name = ?2 WHERE unit_id = ?1",
          rusqlite::params![id.as_str(), name],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  // ── Proofs ────────────────────────────────────────────────────────────────

  async fn upsert_proof(&self, proof: Proof) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO proofs (unit_id, ordinal, body)
           VALUES (?1, ?2, ?3)
           ON CONFLICT(unit_id, ordinal) DO UPDATE SET body = excluded.body",
          rusqlite::params![proof.unit_id.as_str(), proof.ordinal, proof.body],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn get_proof(&self, unit_id: UnitId, ordinal: u32) -> Result<Option<Proof>> {
    let body: Option<String> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT body FROM proofs WHERE unit_id = ?1 AND ordinal = ?2",
              rusqlite::params![unit_id.as_str(), ordinal],
              |row| row.get(0),
            )
            .optional()?,
        )
      })
      .await?;

    Ok(body.map(|body| Proof {
      unit_id,
      ordinal,
      body,
    }))
  }

  async fn list_proofs(&self) -> Result<Vec<Proof>> {
    let raws: Vec<RawProof> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT unit_id, ordinal, body FROM proofs ORDER BY unit_id, ordinal",
        )?;
        let rows = stmt
          .query_map([], |row| {
            Ok(RawProof {
              unit_id: row.get(0)?,
              ordinal: row.get(1)?,
              body:    row.get(2)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawProof::into_proof).collect()
  }

  async fn set_proof_body(
    &self,
    unit_id: UnitId,
    ordinal: u32,
    body: String,
  ) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE proofs SET body = ?3 WHERE unit_id = ?1 AND ordinal = ?2",
          rusqlite::params![unit_id.as_str(), ordinal, body],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  // ── Footnotes ─────────────────────────────────────────────────────────────

  async fn replace_footnotes(&self, footnotes: Vec<Footnote>) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM footnotes", [])?;
        {
          let mut stmt = tx
            .prepare("INSERT INTO footnotes (label, body) VALUES (?1, ?2)")?;
          for footnote in &footnotes {
            stmt.execute(rusqlite::params![footnote.label, footnote.body])?;
          }
        }
        tx.commit()?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn list_footnotes(&self) -> Result<Vec<Footnote>> {
    let rows = self
      .conn
      .call(|conn| {
        let mut stmt =
          conn.prepare("SELECT label, body FROM footnotes ORDER BY label")?;
        let rows = stmt
          .query_map([], |row| {
            Ok(Footnote {
              label: row.get(0)?,
              body:  row.get(1)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(rows)
  }

  // ── Extras ────────────────────────────────────────────────────────────────

  async fn upsert_extra(&self, extra: Extra) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO extras (unit_id, kind, body)
           VALUES (?1, ?2, ?3)
           ON CONFLICT(unit_id, kind) DO UPDATE SET body = excluded.body",
          rusqlite::params![
            extra.unit_id.as_str(),
            extra.kind.as_str(),
            extra.body,
          ],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn get_extra(
    &self,
    unit_id: UnitId,
    kind: ExtraKind,
  ) -> Result<Option<Extra>> {
    let body: Option<String> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT body FROM extras WHERE unit_id = ?1 AND kind = ?2",
              rusqlite::params![unit_id.as_str(), kind.as_str()],
              |row| row.get(0),
            )
            .optional()?,
        )
      })
      .await?;

    Ok(body.map(|body| Extra {
      unit_id,
      kind,
      body,
    }))
  }

  // ── Dependency & citation edges ───────────────────────────────────────────

  async fn replace_dependencies(&self, edges: Vec<DependencyEdge>) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM dependencies", [])?;
        {
          let mut stmt = tx.prepare(
            "INSERT INTO dependencies (from_id, to_id) VALUES (?1, ?2)",
          )?;
          for edge in &edges {
            stmt.execute(rusqlite::params![
              edge.from.as_str(),
              edge.to.as_str()
            ])?;
          }
        }
        tx.commit()?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn list_dependencies(&self) -> Result<Vec<DependencyEdge>> {
    let raws: Vec<(String, String)> = self
      .conn
      .call(|conn| {
        let mut stmt =
          conn.prepare("SELECT from_id, to_id FROM dependencies ORDER BY rowid")?;
        let rows = stmt
          .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws
      .into_iter()
      .map(|(from, to)| {
        Ok(DependencyEdge {
          from: decode_unit_id(&from)?,
          to:   decode_unit_id(&to)?,
        })
      })
      .collect()
  }

  async fn replace_citations(&self, edges: Vec<CitationEdge>) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM citations", [])?;
        {
          let mut stmt = tx
            .prepare("INSERT INTO citations (unit_id, key) VALUES (?1, ?2)")?;
          for edge in &edges {
            stmt.execute(rusqlite::params![edge.unit_id.as_str(), edge.key])?;
          }
        }
        tx.commit()?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn list_citations(&self) -> Result<Vec<CitationEdge>> {
    let raws: Vec<(String, String)> = self
      .conn
      .call(|conn| {
        let mut stmt = conn
          .prepare("SELECT unit_id, key FROM citations ORDER BY unit_id, key")?;
        let rows = stmt
          .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws
      .into_iter()
      .map(|(unit_id, key)| {
        Ok(CitationEdge {
          unit_id: decode_unit_id(&unit_id)?,
          key,
        })
      })
      .collect()
  }

  // ── Search documents & part links ─────────────────────────────────────────

  async fn replace_search_documents(
    &self,
    units: Vec<SearchDocument>,
    statements: Vec<SearchDocument>,
  ) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM search_units", [])?;
        tx.execute("DELETE FROM search_statements", [])?;
        {
          let mut stmt = tx.prepare(
            "INSERT INTO search_units (unit_id, body) VALUES (?1, ?2)",
          )?;
          for doc in &units {
            stmt.execute(rusqlite::params![doc.unit_id.as_str(), doc.body])?;
          }
          let mut stmt = tx.prepare(
            "INSERT INTO search_statements (unit_id, body) VALUES (?1, ?2)",
          )?;
          for doc in &statements {
            stmt.execute(rusqlite::params![doc.unit_id.as_str(), doc.body])?;
          }
        }
        tx.commit()?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn list_statement_documents(&self) -> Result<Vec<SearchDocument>> {
    let raws: Vec<(String, String)> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT unit_id, body FROM search_statements ORDER BY unit_id",
        )?;
        let rows = stmt
          .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws
      .into_iter()
      .map(|(unit_id, body)| {
        Ok(SearchDocument {
          unit_id: decode_unit_id(&unit_id)?,
          body,
        })
      })
      .collect()
  }

  async fn replace_part_links(&self, links: Vec<PartLink>) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM part_links", [])?;
        {
          let mut stmt = tx.prepare(
            "INSERT INTO part_links (part_id, chapter_id) VALUES (?1, ?2)",
          )?;
          for link in &links {
            stmt.execute(rusqlite::params![
              link.part_id.as_str(),
              link.chapter_id.as_str()
            ])?;
          }
        }
        tx.commit()?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn list_part_links(&self) -> Result<Vec<PartLink>> {
    let raws: Vec<(String, String)> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT part_id, chapter_id FROM part_links
           ORDER BY part_id, chapter_id",
        )?;
        let rows = stmt
          .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws
      .into_iter()
      .map(|(part_id, chapter_id)| {
        Ok(PartLink {
          part_id:    decode_unit_id(&part_id)?,
          chapter_id: decode_unit_id(&chapter_id)?,
        })
      })
      .collect()
  }

  // ── Statistics ────────────────────────────────────────────────────────────

  async fn replace_unit_statistics(&self, stats: Vec<UnitStatistic>) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM unit_statistics", [])?;
        {
          let mut stmt = tx.prepare(
            "INSERT INTO unit_statistics (unit_id, metric, value)
             VALUES (?1, ?2, ?3)",
          )?;
          for stat in &stats {
            stmt.execute(rusqlite::params![
              stat.unit_id.as_str(),
              stat.metric.as_str(),
              stat.value,
            ])?;
          }
        }
        tx.commit()?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn list_unit_statistics(&self) -> Result<Vec<UnitStatistic>> {
    let raws: Vec<RawStatistic> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT unit_id, metric, value FROM unit_statistics
           ORDER BY unit_id, metric",
        )?;
        let rows = stmt
          .query_map([], |row| {
            Ok(RawStatistic {
              unit_id: row.get(0)?,
              metric:  row.get(1)?,
              value:   row.get(2)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawStatistic::into_statistic).collect()
  }

  async fn unit_statistics(&self, id: UnitId) -> Result<Vec<UnitStatistic>> {
    let raws: Vec<RawStatistic> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT unit_id, metric, value FROM unit_statistics
           WHERE unit_id = ?1 ORDER BY metric",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![id.as_str()], |row| {
            Ok(RawStatistic {
              unit_id: row.get(0)?,
              metric:  row.get(1)?,
              value:   row.get(2)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawStatistic::into_statistic).collect()
  }

  async fn replace_book_statistics(&self, stats: Vec<BookStatistic>) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM book_statistics", [])?;
        {
          let mut stmt = tx.prepare(
            "INSERT INTO book_statistics (name, value) VALUES (?1, ?2)",
          )?;
          for stat in &stats {
            stmt.execute(rusqlite::params![stat.name, stat.value])?;
          }
        }
        tx.commit()?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn list_book_statistics(&self) -> Result<Vec<BookStatistic>> {
    let rows = self
      .conn
      .call(|conn| {
        let mut stmt = conn
          .prepare("SELECT name, value FROM book_statistics ORDER BY name")?;
        let rows = stmt
          .query_map([], |row| {
            Ok(BookStatistic {
              name:  row.get(0)?,
              value: row.get(1)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(rows)
  }
}
