//! Core types and trait definitions for the tome corpus store.
//!
//! This crate is deliberately free of filesystem and database dependencies.
//! All other crates depend on it; it depends on nothing heavier than
//! `thiserror`.

pub mod content;
pub mod error;
pub mod graph;
pub mod stats;
pub mod store;
pub mod unit;

pub use error::{Error, Result};
