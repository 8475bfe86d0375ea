//! Scanning a book directory into fragments.

use std::{
  fs,
  path::{Path, PathBuf},
};

use crate::{
  error::{Error, Result},
  fragment::Fragment,
};

/// The outcome of scanning a book directory.
#[derive(Debug, Default)]
pub struct BookScan {
  pub fragments: Vec<Fragment>,
  /// Files that matched a fragment convention but could not be used. One bad
  /// fragment never aborts the scan; the caller logs these and moves on.
  pub skipped:   Vec<SkippedFile>,
}

#[derive(Debug)]
pub struct SkippedFile {
  pub path:  PathBuf,
  pub error: Error,
}

/// Scan a flat book directory (the exporter does not nest). Every regular
/// file whose name matches a fragment convention is read as UTF-8 and
/// parsed; other files are ignored. Failing to list the directory is fatal;
/// failing on a single file is not.
///
/// Entries are processed in file-name order so runs are deterministic.
pub fn scan_book_dir(dir: impl AsRef<Path>) -> Result<BookScan> {
  let mut names: Vec<(String, PathBuf)> = Vec::new();
  for entry in fs::read_dir(dir)? {
    let entry = entry?;
    let path = entry.path();
    if !path.is_file() {
      continue;
    }
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
      continue;
    };
    if Fragment::recognizes(name) {
      names.push((name.to_string(), path));
    }
  }
  names.sort();

  let mut scan = BookScan::default();
  for (name, path) in names {
    let body = match fs::read_to_string(&path) {
      Ok(body) => body,
      Err(e) => {
        scan.skipped.push(SkippedFile {
          path,
          error: e.into(),
        });
        continue;
      }
    };

    match Fragment::parse(&name, body) {
      Ok(Some(fragment)) => scan.fragments.push(fragment),
      Ok(None) => {}
      Err(error) => scan.skipped.push(SkippedFile { path, error }),
    }
  }

  Ok(scan)
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  fn write(dir: &Path, name: &str, contents: &str) {
    fs::write(dir.join(name), contents).unwrap();
  }

  #[test]
  fn scans_fragments_and_collects_failures() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path();

    write(path, "lemma-3.1-0A1B-first-lemma.tag", "<p>lemma</p>");
    write(path, "0A1B-1.proof", "<p>proof</p>");
    write(path, "a-note.footnote", "<p>note</p>");
    write(path, "0A1B.slogan", "<p>slogan</p>");
    // Not fragments: ignored entirely.
    write(path, "index", "");
    write(path, "parts.json", "{}");
    write(path, "refs.bib", "@book{}");
    // Matches the .proof convention but is malformed: skipped, not fatal.
    write(path, "0A1B-zero.proof", "<p>bad</p>");

    let scan = scan_book_dir(path).unwrap();

    assert_eq!(scan.fragments.len(), 4);
    assert_eq!(scan.skipped.len(), 1);
    assert!(
      scan.skipped[0]
        .path
        .to_string_lossy()
        .ends_with("0A1B-zero.proof")
    );
  }

  #[test]
  fn missing_directory_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("no-such-dir");
    assert!(scan_book_dir(&missing).is_err());
  }
}
