//! `landlord`: command-line front end for the rental ledger.
//!
//! Reads `landlord.toml` (or the path given with `--config`), opens the
//! SQLite store and runs one command, printing the result as JSON.
//!
//! # Usage
//!
//! ```
//! landlord building add "A栋" "1 Harbour Rd" --rooms 3
//! landlord --today 2024-02-01 dashboard
//! LANDLORD_STORE_PATH=/tmp/ledger.db landlord room list
//! ```

mod args;
mod commands;

use std::{
  path::{Path, PathBuf},
  process::ExitCode,
};

use anyhow::Context as _;
use args::Cli;
use chrono::NaiveDate;
use clap::Parser;
use landlord_core::{Bookkeeper, Clock};
use landlord_store_sqlite::SqliteStore;
use serde::Deserialize;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── Config file ──────────────────────────────────────────────────────────────

#[derive(Deserialize, Debug)]
struct CliConfig {
  #[serde(default = "default_store_path")]
  store_path: PathBuf,
  /// Fixed application date; `--today` takes precedence.
  #[serde(default)]
  today:      Option<NaiveDate>,
}

fn default_store_path() -> PathBuf { PathBuf::from("landlord.db") }

// ─── Entry point ──────────────────────────────────────────────────────────────

/// Rejected input exits with 2; any other failure with 1.
fn main() -> anyhow::Result<ExitCode> {
  // Logs go to stderr; stdout carries the JSON result.
  tracing_subscriber::fmt()
    .with_writer(std::io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config.as_path()).required(false))
    .add_source(config::Environment::with_prefix("LANDLORD"))
    .build()
    .context("failed to read config file")?;

  let cli_cfg: CliConfig = settings
    .try_deserialize()
    .context("failed to deserialise CliConfig")?;

  let store_path = expand_tilde(&cli_cfg.store_path);
  if let Some(parent) = store_path.parent()
    && !parent.as_os_str().is_empty()
  {
    std::fs::create_dir_all(parent)
      .with_context(|| format!("failed to create {}", parent.display()))?;
  }

  let store = SqliteStore::open(&store_path)
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  let schema = store.schema_version()?;
  let clock = cli.today.or(cli_cfg.today).map_or_else(Clock::system, Clock::new);
  tracing::debug!(today = %clock.get(), store = %store_path.display(), schema, "starting");

  let mut keeper = Bookkeeper::new(store, clock);
  match commands::run(&mut keeper, cli.command) {
    Ok(()) => Ok(ExitCode::SUCCESS),
    Err(err) if is_rejection(&err) => {
      tracing::error!("{err}");
      Ok(ExitCode::from(2))
    }
    Err(err) => Err(err),
  }
}

/// Whether `err` is the ledger refusing the input rather than a failure.
fn is_rejection(err: &anyhow::Error) -> bool {
  err
    .downcast_ref::<landlord_core::Error>()
    .is_some_and(landlord_core::Error::is_validation)
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

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn config_defaults_and_overrides() {
    let settings = config::Config::builder()
      .set_override("today", "2024-03-01")
      .unwrap()
      .build()
      .unwrap();
    let cfg: CliConfig = settings.try_deserialize().unwrap();
    assert_eq!(cfg.today, NaiveDate::from_ymd_opt(2024, 3, 1));
    assert_eq!(cfg.store_path, default_store_path());
  }

  #[test]
  fn only_validation_failures_are_rejections() {
    let rejected = anyhow::Error::from(landlord_core::Error::from(
      landlord_core::ValidationError::MissingField("room name"),
    ));
    assert!(is_rejection(&rejected));

    let missing = anyhow::Error::from(landlord_core::Error::not_found(
      landlord_core::RecordKind::Room,
      uuid::Uuid::nil(),
    ));
    assert!(!is_rejection(&missing));
    assert!(!is_rejection(&anyhow::anyhow!("disk full")));
  }

  #[test]
  fn tilde_only_expands_as_a_prefix() {
    let plain = Path::new("/var/lib/ledger.db");
    assert_eq!(expand_tilde(plain), plain);
    let odd = Path::new("data/~/ledger.db");
    assert_eq!(expand_tilde(odd), odd);
  }

  #[test]
  fn cli_parses_nested_commands() {
    let cli = Cli::try_parse_from([
      "landlord",
      "--today",
      "2024-01-15",
      "ledger",
      "set",
      "67e55044-10b1-426f-9247-bb680e5fe0c8",
      "2024-02-14",
    ])
    .unwrap();
    assert_eq!(cli.today, NaiveDate::from_ymd_opt(2024, 1, 15));
    assert!(matches!(cli.command, args::Command::Ledger(args::LedgerCommand::Set { .. })));
  }
}
