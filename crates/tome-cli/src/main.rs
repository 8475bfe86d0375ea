//! tome binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), opens the
//! exclusive SQLite store, and either runs the sync pipeline over a book
//! export (`tome sync`) or prints stored statistics (`tome stats`).

use std::{
  collections::BTreeMap,
  path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use serde::Deserialize;
use tome_book::{
  Roster,
  meta::{self, TitleMap},
};
use tome_core::{store::CorpusStore as _, unit::UnitId};
use tome_store_sqlite::SqliteStore;
use tome_sync::RunInput;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Tome corpus synchronizer")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// Ingest a book export and rebuild every derived table.
  Sync {
    /// Book directory to ingest; overrides the configured one.
    #[arg(long)]
    book_dir: Option<PathBuf>,

    /// Page count to record as the `pages` book statistic.
    #[arg(long)]
    pages: Option<u32>,
  },

  /// Print stored statistics.
  Stats {
    /// Print the metrics of one unit instead of the book table.
    #[arg(long)]
    unit: Option<String>,
  },
}

/// Runtime configuration, deserialised from `config.toml`.
#[derive(Deserialize, Clone)]
struct SyncConfig {
  store_path: PathBuf,
  book_dir:   PathBuf,
  roster:     PathBuf,
  #[serde(default)]
  titles:     Option<PathBuf>,
  #[serde(default)]
  statistics: Option<PathBuf>,
  #[serde(default)]
  pages:      Option<u32>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  // Load configuration.
  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("TOME"))
    .build()
    .context("failed to read config file")?;

  let cfg: SyncConfig = settings
    .try_deserialize()
    .context("failed to deserialise SyncConfig")?;

  // Open the store. A second concurrent run fails here with a busy error.
  let store_path = expand_tilde(&cfg.store_path);
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  match cli.command {
    Command::Sync { book_dir, pages } => {
      let book_dir = book_dir.unwrap_or_else(|| cfg.book_dir.clone());
      let pages = pages.or(cfg.pages);
      run_sync(&store, &cfg, &expand_tilde(&book_dir), pages).await
    }
    Command::Stats { unit } => print_stats(&store, unit.as_deref()).await,
  }
}

/// Load every input, hand the batch to the pipeline, and log the summary.
async fn run_sync(
  store: &SqliteStore,
  cfg: &SyncConfig,
  book_dir: &Path,
  pages: Option<u32>,
) -> anyhow::Result<()> {
  let scan = tome_book::scan_book_dir(book_dir)
    .with_context(|| format!("failed to scan book directory {book_dir:?}"))?;
  for skipped in &scan.skipped {
    tracing::error!("skipping {}: {}", skipped.path.display(), skipped.error);
  }

  let roster =
    Roster::load(expand_tilde(&cfg.roster)).context("failed to read roster")?;

  let titles = match &cfg.titles {
    Some(path) => meta::load_titles(expand_tilde(path))
      .with_context(|| format!("failed to read titles at {path:?}"))?,
    None => TitleMap::default(),
  };
  let statistics = match &cfg.statistics {
    Some(path) => meta::load_statistics(expand_tilde(path))
      .with_context(|| format!("failed to read statistics at {path:?}"))?,
    None => BTreeMap::new(),
  };

  // The parts file lives inside the export itself and is optional.
  let parts_path = book_dir.join("parts.json");
  let parts = if parts_path.is_file() {
    meta::load_parts(&parts_path)
      .with_context(|| format!("failed to read {parts_path:?}"))?
  } else {
    BTreeMap::new()
  };

  let summary = tome_sync::run(store, RunInput {
    fragments: scan.fragments,
    roster,
    titles,
    statistics,
    parts,
    pages,
  })
  .await
  .context("sync run failed")?;

  tracing::info!(
    "run complete: {} units ({} created, {} changed), {} active, {} \
     dependency edges, {} citations",
    summary.sync.units,
    summary.sync.created,
    summary.sync.changed,
    summary.activity.active,
    summary.edges.dependencies,
    summary.edges.citations,
  );

  Ok(())
}

/// Print the book statistics table, or one unit's metric rows.
async fn print_stats(
  store: &SqliteStore,
  unit: Option<&str>,
) -> anyhow::Result<()> {
  if let Some(code) = unit {
    let id = UnitId::parse(code)
      .with_context(|| format!("{code:?} is not a unit id"))?;
    let rows = store
      .unit_statistics(id)
      .await
      .context("failed to read unit statistics")?;
    if rows.is_empty() {
      println!("no statistics recorded for {id}; run `tome sync` first");
      return Ok(());
    }
    for row in rows {
      println!("{:<16} {}", row.metric, row.value);
    }
    return Ok(());
  }

  let stats = store
    .list_book_statistics()
    .await
    .context("failed to read book statistics")?;
  if stats.is_empty() {
    println!("no book statistics recorded; run `tome sync` first");
    return Ok(());
  }
  for stat in stats {
    println!("{:<24} {}", stat.name, stat.value);
  }
  Ok(())
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
