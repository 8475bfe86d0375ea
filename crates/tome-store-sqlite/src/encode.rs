//! Decoding helpers between SQLite rows and domain types.
//!
//! Encoding needs no helpers — unit ids, kinds, and metric names all expose
//! their stored text form via `as_str()`. Decoding goes through `Raw*` row
//! structs read inside the connection closure and converted afterwards, so
//! the fallible parsing happens outside the database thread.

use tome_core::{
  content::Proof,
  stats::{UnitMetric, UnitStatistic},
  unit::{Locator, Unit, UnitId, UnitKind},
};

use crate::Result;

pub fn decode_unit_id(s: &str) -> Result<UnitId> {
  Ok(UnitId::parse(s)?)
}

pub fn decode_metric(s: &str) -> Result<UnitMetric> {
  Ok(UnitMetric::parse(s)?)
}

// ─── Raw rows ────────────────────────────────────────────────────────────────

pub struct RawUnit {
  pub unit_id:      String,
  pub label:        String,
  pub kind:         String,
  pub locator:      String,
  pub body:         String,
  pub active:       bool,
  pub display_name: Option<String>,
}

impl RawUnit {
  pub fn into_unit(self) -> Result<Unit> {
    Ok(Unit {
      id:           decode_unit_id(&self.unit_id)?,
      label:        self.label,
      kind:         UnitKind::parse(&self.kind),
      locator:      Locator::new(self.locator),
      body:         self.body,
      active:       self.active,
      display_name: self.display_name,
    })
  }
}

pub struct RawProof {
  pub unit_id: String,
  pub ordinal: u32,
  pub body:    String,
}

impl RawProof {
  pub fn into_proof(self) -> Result<Proof> {
    Ok(Proof {
      unit_id: decode_unit_id(&self.unit_id)?,
      ordinal: self.ordinal,
      body:    self.body,
    })
  }
}

pub struct RawStatistic {
  pub unit_id: String,
  pub metric:  String,
  pub value:   i64,
}

impl RawStatistic {
  pub fn into_statistic(self) -> Result<UnitStatistic> {
    Ok(UnitStatistic {
      unit_id: decode_unit_id(&self.unit_id)?,
      metric:  decode_metric(&self.metric)?,
      value:   self.value,
    })
  }
}
