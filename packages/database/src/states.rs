//! The `states` table.
//!
//! States are seeded once and read back whole into a
//! [`StateDirectory`] at startup. Nothing queries them row by row.

use std::path::Path;

use duckdb::Connection;
use geogrid_grid_models::{StateDirectory, StateRecord};

use crate::DbError;

/// Reads a JSON array of `{ "id", "name", "code" }` records.
///
/// # Errors
///
/// Returns [`DbError`] if the file cannot be read or parsed.
pub fn read_states_file(path: &Path) -> Result<Vec<StateRecord>, DbError> {
    let text = std::fs::read_to_string(path)?;
    let records: Vec<StateRecord> = serde_json::from_str(&text)?;
    log::info!("Read {} states from {}", records.len(), path.display());
    Ok(records)
}

/// Upserts state records by id in one transaction.
///
/// Returns the number of records written.
///
/// # Errors
///
/// Returns [`DbError`] if any insert fails. Nothing is written in that
/// case.
pub fn seed_states(conn: &Connection, records: &[StateRecord]) -> Result<usize, DbError> {
    if records.is_empty() {
        return Ok(0);
    }

    conn.execute_batch("BEGIN TRANSACTION")?;

    let result = (|| -> Result<(), DbError> {
        let mut stmt = conn.prepare(
            "INSERT INTO states (id, name, code) VALUES (?, ?, ?)
             ON CONFLICT (id) DO UPDATE SET name = EXCLUDED.name, code = EXCLUDED.code",
        )?;
        for record in records {
            stmt.execute(duckdb::params![record.id, record.name, record.code])?;
        }
        Ok(())
    })();

    match result {
        Ok(()) => {
            conn.execute_batch("COMMIT")?;
            log::info!("Seeded {} states", records.len());
            Ok(records.len())
        }
        Err(e) => {
            conn.execute_batch("ROLLBACK")?;
            Err(e)
        }
    }
}

/// Loads every state into an immutable [`StateDirectory`].
///
/// # Errors
///
/// Returns [`DbError`] if the query fails.
pub fn load_directory(conn: &Connection) -> Result<StateDirectory, DbError> {
    let mut stmt = conn.prepare("SELECT id, name, code FROM states ORDER BY id")?;
    let mut rows = stmt.query([])?;

    let mut records = Vec::new();
    while let Some(row) = rows.next()? {
        records.push(StateRecord {
            id: row.get(0)?,
            name: row.get(1)?,
            code: row.get(2)?,
        });
    }

    let directory = StateDirectory::from_records(records);
    log::debug!("Loaded {} states", directory.len());
    Ok(directory)
}
