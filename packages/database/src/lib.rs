#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! `DuckDB` storage for extracted grid polygons.
//!
//! One database file holds the `states` table and one polygon table per
//! reference kind. Rings are stored as WKT text and the grid metadata as
//! JSON text, next to bounding-box columns used to prefilter point
//! lookups. The exact containment test runs in Rust with `geo`.

pub mod paths;
pub mod ring;
pub mod states;
pub mod store;

use std::path::Path;

use duckdb::Connection;

pub use store::SpatialStore;

/// Errors that can occur during database operations.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// `DuckDB` error.
    #[error("DuckDB error: {0}")]
    DuckDb(#[from] duckdb::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Data conversion error.
    #[error("Data conversion error: {message}")]
    Conversion {
        /// Description of what went wrong.
        message: String,
    },

    /// A batch insert failed and was rolled back as a whole.
    #[error("Failed to persist batch of {attempted} polygons, nothing was written: {message}")]
    PersistenceFailure {
        /// Number of polygons in the rejected batch.
        attempted: usize,
        /// Description of the row failure.
        message: String,
    },
}

/// Opens (or creates) the geogrid `DuckDB` and ensures the schema exists.
///
/// # Errors
///
/// Returns [`DbError`] if the connection or schema creation fails.
pub fn open(path: &Path) -> Result<Connection, DbError> {
    if let Some(parent) = path.parent() {
        paths::ensure_dir(parent)?;
    }

    let conn = Connection::open(path)?;
    create_schema(&conn)?;

    log::debug!("Opened {}", path.display());

    Ok(conn)
}

/// Opens a throwaway in-memory database with the schema in place.
///
/// # Errors
///
/// Returns [`DbError`] if the connection or schema creation fails.
pub fn open_in_memory() -> Result<Connection, DbError> {
    let conn = Connection::open_in_memory()?;
    create_schema(&conn)?;
    Ok(conn)
}

fn create_schema(conn: &Connection) -> Result<(), DbError> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS states (
            id BIGINT PRIMARY KEY,
            name TEXT NOT NULL,
            code TEXT NOT NULL
        );

        CREATE SEQUENCE IF NOT EXISTS polygons_by_state_id_seq START 1;

        CREATE TABLE IF NOT EXISTS polygons_by_state (
            id BIGINT PRIMARY KEY,
            object_id TEXT NOT NULL,
            cap_city TEXT NOT NULL,
            source TEXT NOT NULL,
            state_id BIGINT,
            shape_area TEXT NOT NULL,
            shape_length TEXT NOT NULL,
            geo_zone TEXT NOT NULL,
            ring_wkt TEXT NOT NULL,
            metadata TEXT NOT NULL,
            min_x DOUBLE NOT NULL,
            min_y DOUBLE NOT NULL,
            max_x DOUBLE NOT NULL,
            max_y DOUBLE NOT NULL,
            created_at TIMESTAMPTZ DEFAULT CURRENT_TIMESTAMP
        );

        CREATE SEQUENCE IF NOT EXISTS polygons_by_country_id_seq START 1;

        CREATE TABLE IF NOT EXISTS polygons_by_country (
            id BIGINT PRIMARY KEY,
            shape_area TEXT NOT NULL,
            shape_length TEXT NOT NULL,
            ring_wkt TEXT NOT NULL,
            metadata TEXT NOT NULL,
            min_x DOUBLE NOT NULL,
            min_y DOUBLE NOT NULL,
            max_x DOUBLE NOT NULL,
            max_y DOUBLE NOT NULL,
            created_at TIMESTAMPTZ DEFAULT CURRENT_TIMESTAMP
        );",
    )?;

    Ok(())
}
