//! The synchronization and dependency-analytics pipeline.
//!
//! One run reconciles a book export against the store, resolves reference
//! markers, rebuilds the derived views, extracts the dependency and citation
//! graphs, computes per-unit transitive closures, and replaces the
//! statistics tables:
//!
//! ```text
//! sync → resolve → views → extract → closure → aggregate
//! ```
//!
//! Every stage commits before the next begins, and all stages work over the
//! generic `CorpusStore` trait, so the pipeline never depends on a concrete
//! backend.

pub mod classify;
pub mod closure;
pub mod error;
pub mod extract;
pub mod pipeline;
pub mod resolve;
pub mod stats;
pub mod sync;
pub mod views;

pub use error::{Error, Result};
pub use pipeline::{RunInput, RunSummary, run};

#[cfg(test)]
mod tests;
