#![allow(clippy::module_name_repetitions)]
//! Canonical file paths for the `DuckDB` data directory.
//!
//! All paths are relative to the project root's `data/` directory.

use std::path::{Path, PathBuf};

/// File name of the default database.
pub const DEFAULT_DB_FILE: &str = "geogrid.duckdb";

/// Returns the workspace root directory.
///
/// Resolved at compile time from `CARGO_MANIFEST_DIR`. Falls back to the
/// manifest directory itself if it is not nested two levels deep.
#[must_use]
pub fn project_root() -> PathBuf {
    let manifest = Path::new(env!("CARGO_MANIFEST_DIR"));
    manifest
        .ancestors()
        .nth(2)
        .map_or_else(|| manifest.to_path_buf(), Path::to_path_buf)
}

/// Returns the `data/` directory path.
#[must_use]
pub fn data_dir() -> PathBuf {
    project_root().join("data")
}

/// Returns the path of the default database, `data/geogrid.duckdb`.
#[must_use]
pub fn default_db_path() -> PathBuf {
    data_dir().join(DEFAULT_DB_FILE)
}

/// Ensures a directory exists, creating it if necessary.
///
/// # Errors
///
/// Returns an I/O error if the directory cannot be created.
pub fn ensure_dir(path: &Path) -> std::io::Result<()> {
    if !path.as_os_str().is_empty() && !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_db_lives_in_data_dir() {
        let path = default_db_path();
        assert!(path.ends_with("data/geogrid.duckdb"));
        assert!(path.starts_with(project_root()));
    }

    #[test]
    fn ensure_dir_accepts_relative_file_parent() {
        // `Path::new("geogrid.duckdb").parent()` is the empty path.
        ensure_dir(Path::new("")).unwrap();
    }
}
