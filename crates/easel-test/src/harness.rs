//! Test harness helpers.

use std::path::PathBuf;

use tempfile::TempDir;
use tracing_subscriber::EnvFilter;

/// Create a temporary directory for testing.
///
/// # Panics
///
/// Panics if the temporary directory cannot be created.
#[must_use]
pub fn test_dir() -> TempDir {
    TempDir::with_prefix("easel-test").expect("Failed to create temp directory")
}

/// Write a document file into `dir` and return its path.
///
/// # Panics
///
/// Panics if the file cannot be written.
#[must_use]
pub fn write_document(dir: &TempDir, name: &str, json: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, json).expect("Failed to write document");
    path
}

/// Install a test-writer subscriber with the given filter.
///
/// Safe to call from many tests; only the first call installs anything.
pub fn init_test_logging(filter: &str) {
    let installed = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_test_writer()
        .try_init()
        .is_ok();
    if installed {
        tracing::debug!(filter, "Test logging installed");
    }
}
