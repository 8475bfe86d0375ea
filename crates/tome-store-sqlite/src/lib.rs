//! SQLite backend for the tome corpus store.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated
//! thread without blocking the async runtime. Opening an on-disk store also
//! takes the run lock (SQLite EXCLUSIVE locking mode), giving the pipeline
//! its one-run-per-store guarantee.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;

#[cfg(test)]
mod tests;
