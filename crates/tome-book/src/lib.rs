//! Book-export ingestion for tome.
//!
//! Parses the flat directory produced by the upstream book exporter — one
//! file per statement, proof, footnote, or annotation, named by convention —
//! plus the roster, title-metadata, statistics-blob, and parts files. Bodies
//! are opaque rendered text; nothing here parses LaTeX and nothing here
//! touches the database.
//!
//! A malformed fragment yields an error for that file only; scanning a
//! directory returns everything that parsed plus the list of files that did
//! not, so one bad fragment never aborts a sync batch.

pub mod error;
pub mod fragment;
pub mod meta;
pub mod roster;
pub mod source;

pub use error::{Error, Result};
pub use fragment::Fragment;
pub use roster::Roster;
pub use source::{BookScan, SkippedFile, scan_book_dir};
