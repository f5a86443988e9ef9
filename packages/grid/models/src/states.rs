//! State records and the read-only state lookup table.
//!
//! The [`StateDirectory`] is built once during startup from whatever source
//! holds the state table and is then shared by reference. It has no
//! interior mutability, so concurrent lookups need no locking.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// A state row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StateRecord {
    /// Primary key in the `states` table.
    pub id: i64,
    /// Full name (e.g. "Ogun").
    pub name: String,
    /// Short code matched against the boundary `statecode` property.
    pub code: String,
}

/// Immutable code/id lookup over every known state.
#[derive(Debug, Clone, Default)]
pub struct StateDirectory {
    by_code: BTreeMap<String, Arc<StateRecord>>,
    by_id: BTreeMap<i64, Arc<StateRecord>>,
}

impl StateDirectory {
    /// Builds the directory from a set of records.
    ///
    /// If two records share a code or id, the later one wins.
    #[must_use]
    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = StateRecord>,
    {
        let mut by_code = BTreeMap::new();
        let mut by_id = BTreeMap::new();

        for record in records {
            let record = Arc::new(record);
            by_code.insert(record.code.clone(), Arc::clone(&record));
            by_id.insert(record.id, record);
        }

        Self { by_code, by_id }
    }

    /// Looks up a state by its code.
    #[must_use]
    pub fn by_code(&self, code: &str) -> Option<&Arc<StateRecord>> {
        self.by_code.get(code)
    }

    /// Looks up a state by its primary key.
    #[must_use]
    pub fn by_id(&self, id: i64) -> Option<&Arc<StateRecord>> {
        self.by_id.get(&id)
    }

    /// Number of distinct state ids.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    /// Returns `true` if no states were loaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// Iterates over the states in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<StateRecord>> {
        self.by_id.values()
    }
}
