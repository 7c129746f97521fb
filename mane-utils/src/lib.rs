//! Common helpers shared across mane crates.

/// SQLite hairstyle catalog ingestion.
pub mod catalog;
/// Application configuration and settings management.
pub mod config;
/// Test fixture loading and path resolution.
pub mod fixtures;
/// Instrumentation helpers for optional performance tracing.
pub mod telemetry;

use std::path::Path;

use anyhow::Result;
use log::LevelFilter;

pub use catalog::{CatalogData, load_catalog};
pub use fixtures::{fixture_path, fixtures_dir, load_fixture_json};
pub use telemetry::{TimingGuard, configure as configure_telemetry, telemetry_allows, timing_guard};

/// Initialize logging once for command-line front ends.
///
/// Respects `RUST_LOG` when set, falling back to the provided default filter
/// level, and keeps the telemetry target unthrottled so timing guards stay
/// gated by [`telemetry::configure`] alone.
pub fn init_logging(default_filter: LevelFilter) -> Result<()> {
    let mut builder = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(default_filter.as_str()),
    );
    builder.filter_module("mane::telemetry", LevelFilter::Trace);

    if builder.try_init().is_err() {
        // Logger already initialized; nothing to do.
    }
    Ok(())
}

/// Validate that a path exists and resolve it to an absolute path.
pub fn normalize_path<P: AsRef<Path>>(path: P) -> Result<std::path::PathBuf> {
    let path = path.as_ref();
    anyhow::ensure!(path.exists(), "path does not exist: {}", path.display());
    Ok(path.canonicalize()?)
}
