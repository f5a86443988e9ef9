//! Persistence and point lookup of extracted polygons.
//!
//! A [`SpatialStore`] is bound to one [`ReferenceKind`] and reads and
//! writes only that kind's table. Point lookups prefilter on the stored
//! bounding-box columns in SQL and run the exact containment test in
//! Rust. Points on a polygon's boundary count as contained.

use std::collections::BTreeSet;
use std::sync::Arc;

use duckdb::{Connection, Row, ToSql};
use geo::{BoundingRect, Intersects, Point};
use geogrid_grid_models::{ExtractedPolygon, PolygonMetadata, ReferenceKind, StateDirectory};

use crate::DbError;
use crate::ring::{ring_from_wkt, ring_to_wkt};

const STATE_COLUMNS: &str =
    "id, object_id, cap_city, source, state_id, shape_area, shape_length, geo_zone, ring_wkt, metadata";

const COUNTRY_COLUMNS: &str = "id, shape_area, shape_length, ring_wkt, metadata";

/// Extracted polygons of one reference kind in `DuckDB`.
pub struct SpatialStore {
    conn: Connection,
    kind: ReferenceKind,
    states: Arc<StateDirectory>,
}

impl std::fmt::Debug for SpatialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpatialStore")
            .field("kind", &self.kind)
            .field("states", &self.states.len())
            .finish_non_exhaustive()
    }
}

impl SpatialStore {
    /// Wraps an open connection. The schema must already exist (see
    /// [`crate::open`]).
    #[must_use]
    pub const fn new(conn: Connection, kind: ReferenceKind, states: Arc<StateDirectory>) -> Self {
        Self { conn, kind, states }
    }

    /// Wraps an open connection, loading the state directory from its
    /// `states` table.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the states cannot be read.
    pub fn with_loaded_states(conn: Connection, kind: ReferenceKind) -> Result<Self, DbError> {
        let states = Arc::new(crate::states::load_directory(&conn)?);
        Ok(Self::new(conn, kind, states))
    }

    /// The reference kind this store reads and writes.
    #[must_use]
    pub const fn kind(&self) -> ReferenceKind {
        self.kind
    }

    /// The state directory used to hydrate reads.
    #[must_use]
    pub const fn states(&self) -> &Arc<StateDirectory> {
        &self.states
    }

    /// The underlying connection.
    #[must_use]
    pub const fn connection(&self) -> &Connection {
        &self.conn
    }

    const fn table(&self) -> &'static str {
        match self.kind {
            ReferenceKind::State => "polygons_by_state",
            ReferenceKind::Country => "polygons_by_country",
        }
    }

    const fn columns(&self) -> &'static str {
        match self.kind {
            ReferenceKind::State => STATE_COLUMNS,
            ReferenceKind::Country => COUNTRY_COLUMNS,
        }
    }

    /// Stores one polygon and returns its new id.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the ring is not a closed ring of at least four
    /// points or the insert fails.
    pub fn insert_one(&self, polygon: &ExtractedPolygon) -> Result<i64, DbError> {
        self.insert_row(polygon)
    }

    /// Stores every polygon in one transaction and returns how many were
    /// written.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::PersistenceFailure`] if any row or the commit
    /// fails. The whole batch is rolled back in that case.
    pub fn insert_many(&self, polygons: &[ExtractedPolygon]) -> Result<usize, DbError> {
        if polygons.is_empty() {
            return Ok(0);
        }

        self.in_transaction(polygons.len(), || self.insert_rows(polygons))?;
        log::info!("Inserted {} polygons into {}", polygons.len(), self.table());
        Ok(polygons.len())
    }

    /// Deletes every stored polygon of this kind and stores `polygons` in
    /// their place, in one transaction. Returns how many were written.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::PersistenceFailure`] if the delete, any row or
    /// the commit fails. The previously stored polygons are kept in that
    /// case.
    pub fn replace_all(&self, polygons: &[ExtractedPolygon]) -> Result<usize, DbError> {
        let mut removed = 0;
        self.in_transaction(polygons.len(), || {
            removed = self
                .conn
                .execute(&format!("DELETE FROM {}", self.table()), [])
                .map_err(|e| format!("delete: {e}"))?;
            self.insert_rows(polygons)
        })?;
        log::info!(
            "Replaced {removed} polygons in {} with {}",
            self.table(),
            polygons.len()
        );
        Ok(polygons.len())
    }

    fn insert_rows(&self, polygons: &[ExtractedPolygon]) -> Result<(), String> {
        polygons
            .iter()
            .enumerate()
            .try_for_each(|(i, polygon)| {
                self.insert_row(polygon)
                    .map(|_| ())
                    .map_err(|e| format!("row {i}: {e}"))
            })
    }

    /// Runs `body` between `BEGIN` and `COMMIT`, rolling back if the body
    /// or the commit fails.
    fn in_transaction<F>(&self, attempted: usize, body: F) -> Result<(), DbError>
    where
        F: FnOnce() -> Result<(), String>,
    {
        self.conn
            .execute_batch("BEGIN TRANSACTION")
            .map_err(|e| DbError::PersistenceFailure {
                attempted,
                message: format!("begin: {e}"),
            })?;

        let result = body().and_then(|()| {
            self.conn
                .execute_batch("COMMIT")
                .map_err(|e| format!("commit: {e}"))
        });

        let Err(message) = result else {
            return Ok(());
        };

        if let Err(e) = self.conn.execute_batch("ROLLBACK") {
            log::warn!("Rollback on {} failed: {e}", self.table());
        }
        log::error!(
            "Rolled back batch of {attempted} polygons into {}: {message}",
            self.table()
        );
        Err(DbError::PersistenceFailure { attempted, message })
    }

    fn insert_row(&self, polygon: &ExtractedPolygon) -> Result<i64, DbError> {
        if !polygon.has_valid_ring() {
            return Err(DbError::Conversion {
                message: format!(
                    "ring must be closed with at least 4 points, got {} points",
                    polygon.ring.len()
                ),
            });
        }

        let unknown_state = polygon
            .state_id()
            .filter(|&id| self.kind == ReferenceKind::State && self.states.by_id(id).is_none());
        if let Some(id) = unknown_state {
            return Err(DbError::Conversion {
                message: format!("state id {id} is not in the states table"),
            });
        }

        let rect = polygon
            .to_polygon()
            .bounding_rect()
            .ok_or_else(|| DbError::Conversion {
                message: "ring has no extent".to_string(),
            })?;
        let ring_wkt = ring_to_wkt(&polygon.ring);
        let metadata = serde_json::to_string(&polygon.metadata)?;

        let id: i64 = self.conn.query_row(
            &format!("SELECT nextval('{}_id_seq')", self.table()),
            [],
            |row| row.get(0),
        )?;

        match self.kind {
            ReferenceKind::State => {
                self.conn.execute(
                    "INSERT INTO polygons_by_state (
                        id, object_id, cap_city, source, state_id, shape_area,
                        shape_length, geo_zone, ring_wkt, metadata,
                        min_x, min_y, max_x, max_y
                    ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
                    duckdb::params![
                        id,
                        polygon.object_id,
                        polygon.cap_city,
                        polygon.source,
                        polygon.state_id(),
                        polygon.shape_area,
                        polygon.shape_length,
                        polygon.geo_zone,
                        ring_wkt,
                        metadata,
                        rect.min().x,
                        rect.min().y,
                        rect.max().x,
                        rect.max().y,
                    ],
                )?;
            }
            ReferenceKind::Country => {
                self.conn.execute(
                    "INSERT INTO polygons_by_country (
                        id, shape_area, shape_length, ring_wkt, metadata,
                        min_x, min_y, max_x, max_y
                    ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
                    duckdb::params![
                        id,
                        polygon.shape_area,
                        polygon.shape_length,
                        ring_wkt,
                        metadata,
                        rect.min().x,
                        rect.min().y,
                        rect.max().x,
                        rect.max().y,
                    ],
                )?;
            }
        }

        Ok(id)
    }

    /// Finds a stored polygon containing the point, boundary included.
    ///
    /// If stored polygons overlap at the point, any one of them may be
    /// returned.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the query fails or a row cannot be decoded.
    pub fn find_containing(&self, lon: f64, lat: f64) -> Result<Option<ExtractedPolygon>, DbError> {
        let point = Point::new(lon, lat);

        let candidates = self.query_polygons(
            "WHERE min_x <= ? AND max_x >= ? AND min_y <= ? AND max_y >= ?",
            duckdb::params![lon, lon, lat, lat],
        )?;
        log::debug!(
            "({lon}, {lat}): {} bounding-box candidates in {}",
            candidates.len(),
            self.table()
        );

        Ok(candidates
            .into_iter()
            .find(|polygon| polygon.to_polygon().intersects(&point)))
    }

    /// Returns every polygon whose state has one of the given codes.
    ///
    /// Unknown codes match nothing, and an empty code set returns nothing.
    /// A country store has no state references and always returns nothing.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the query fails or a row cannot be decoded.
    pub fn find_by_codes<S: AsRef<str>>(&self, codes: &[S]) -> Result<Vec<ExtractedPolygon>, DbError> {
        if self.kind == ReferenceKind::Country {
            log::warn!("State codes do not apply to {} polygons", self.kind);
            return Ok(vec![]);
        }

        let ids: BTreeSet<i64> = codes
            .iter()
            .filter_map(|code| {
                let state = self.states.by_code(code.as_ref());
                if state.is_none() {
                    log::debug!("Unknown state code {:?}", code.as_ref());
                }
                state.map(|s| s.id)
            })
            .collect();

        if ids.is_empty() {
            return Ok(vec![]);
        }

        let placeholders = ids.iter().map(|_| "?").collect::<Vec<_>>().join(", ");
        let params: Vec<&dyn ToSql> = ids.iter().map(|id| id as &dyn ToSql).collect();

        self.query_polygons(
            &format!("WHERE state_id IN ({placeholders})"),
            params.as_slice(),
        )
    }

    /// Returns every stored polygon of this kind, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the query fails or a row cannot be decoded.
    pub fn find_all(&self) -> Result<Vec<ExtractedPolygon>, DbError> {
        self.query_polygons("", [])
    }

    /// Number of stored polygons of this kind.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the query fails.
    pub fn count(&self) -> Result<u64, DbError> {
        let count: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM {}", self.table()),
            [],
            |row| row.get(0),
        )?;
        #[allow(clippy::cast_sign_loss)]
        Ok(count as u64)
    }

    /// Deletes every stored polygon of this kind and returns how many
    /// were removed.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the delete fails.
    pub fn clear(&self) -> Result<usize, DbError> {
        let removed = self
            .conn
            .execute(&format!("DELETE FROM {}", self.table()), [])?;
        log::info!("Cleared {removed} polygons from {}", self.table());
        Ok(removed)
    }

    fn query_polygons<P: duckdb::Params>(
        &self,
        filter: &str,
        params: P,
    ) -> Result<Vec<ExtractedPolygon>, DbError> {
        let sql = format!(
            "SELECT {} FROM {} {filter} ORDER BY id",
            self.columns(),
            self.table()
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params)?;

        let mut polygons = Vec::new();
        while let Some(row) = rows.next()? {
            polygons.push(self.hydrate(row)?);
        }
        Ok(polygons)
    }

    fn hydrate(&self, row: &Row<'_>) -> Result<ExtractedPolygon, DbError> {
        match self.kind {
            ReferenceKind::State => {
                let state_id: Option<i64> = row.get(4)?;
                let state = state_id.and_then(|id| {
                    let state = self.states.by_id(id).cloned();
                    if state.is_none() {
                        log::warn!("Stored polygon references unknown state id {id}");
                    }
                    state
                });
                let ring_wkt: String = row.get(8)?;
                let metadata: String = row.get(9)?;

                Ok(ExtractedPolygon {
                    id: Some(row.get(0)?),
                    ring: ring_from_wkt(&ring_wkt)?,
                    object_id: row.get(1)?,
                    cap_city: row.get(2)?,
                    source: row.get(3)?,
                    shape_area: row.get(5)?,
                    shape_length: row.get(6)?,
                    geo_zone: row.get(7)?,
                    state,
                    metadata: serde_json::from_str::<PolygonMetadata>(&metadata)?,
                })
            }
            ReferenceKind::Country => {
                let ring_wkt: String = row.get(3)?;
                let metadata: String = row.get(4)?;

                Ok(ExtractedPolygon {
                    id: Some(row.get(0)?),
                    ring: ring_from_wkt(&ring_wkt)?,
                    object_id: String::new(),
                    cap_city: String::new(),
                    source: String::new(),
                    shape_area: row.get(1)?,
                    shape_length: row.get(2)?,
                    geo_zone: String::new(),
                    state: None,
                    metadata: serde_json::from_str::<PolygonMetadata>(&metadata)?,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use geogrid_grid_models::StateRecord;

    use super::*;
    use crate::open_in_memory;
    use crate::states::seed_states;

    fn records() -> Vec<StateRecord> {
        vec![
            StateRecord {
                id: 1,
                name: "Ogun".to_string(),
                code: "OG".to_string(),
            },
            StateRecord {
                id: 2,
                name: "Kaduna".to_string(),
                code: "KD".to_string(),
            },
        ]
    }

    fn state_store() -> SpatialStore {
        let conn = open_in_memory().unwrap();
        seed_states(&conn, &records()).unwrap();
        SpatialStore::with_loaded_states(conn, ReferenceKind::State).unwrap()
    }

    fn country_store() -> SpatialStore {
        SpatialStore::new(
            open_in_memory().unwrap(),
            ReferenceKind::Country,
            Arc::new(StateDirectory::default()),
        )
    }

    fn square(store: &SpatialStore, x0: f64, y0: f64, size: f64, code: Option<&str>) -> ExtractedPolygon {
        let (x1, y1) = (x0 + size, y0 + size);
        ExtractedPolygon {
            id: None,
            ring: vec![(x0, y0), (x1, y0), (x1, y1), (x0, y1), (x0, y0)],
            object_id: "12".to_string(),
            cap_city: "Abeokuta".to_string(),
            source: "survey".to_string(),
            shape_area: "3.25".to_string(),
            shape_length: "9.5".to_string(),
            geo_zone: "South West".to_string(),
            state: code.and_then(|c| store.states().by_code(c).cloned()),
            metadata: PolygonMetadata {
                left: x0,
                top: y1,
                right: x1,
                bottom: y0,
                index: 5,
                row_index: 0,
                col_index: 5,
            },
        }
    }

    #[test]
    fn finds_inserted_polygon_by_interior_point() {
        let store = state_store();
        let polygon = square(&store, 3.0, 4.0, 0.3, Some("OG"));
        let id = store.insert_one(&polygon).unwrap();

        let found = store.find_containing(3.1, 4.1).unwrap().unwrap();
        assert_eq!(found.id, Some(id));
        assert_eq!(found.ring.len(), polygon.ring.len());
        for (a, b) in found.ring.iter().zip(&polygon.ring) {
            assert!((a.0 - b.0).abs() < 1e-9 && (a.1 - b.1).abs() < 1e-9);
        }
        assert_eq!(found.object_id, "12");
        assert_eq!(found.geo_zone, "South West");
        assert_eq!(found.metadata, polygon.metadata);
        assert_eq!(found.state_id(), Some(1));
    }

    #[test]
    fn reads_share_directory_records() {
        let store = state_store();
        store
            .insert_one(&square(&store, 0.0, 0.0, 1.0, Some("KD")))
            .unwrap();

        let found = store.find_all().unwrap();
        let directory_record = store.states().by_code("KD").unwrap();
        assert!(Arc::ptr_eq(found[0].state.as_ref().unwrap(), directory_record));
    }

    #[test]
    fn point_outside_every_polygon_is_none() {
        let store = state_store();
        store
            .insert_one(&square(&store, 0.0, 0.0, 1.0, Some("OG")))
            .unwrap();

        assert!(store.find_containing(5.0, 5.0).unwrap().is_none());
        assert!(store.find_containing(1.5, 0.5).unwrap().is_none());
    }

    #[test]
    fn bounding_box_hit_outside_the_ring_is_none() {
        let store = state_store();
        let mut triangle = square(&store, 0.0, 0.0, 2.0, Some("OG"));
        triangle.ring = vec![(0.0, 0.0), (2.0, 0.0), (0.0, 2.0), (0.0, 0.0)];
        store.insert_one(&triangle).unwrap();

        assert!(store.find_containing(1.8, 1.8).unwrap().is_none());
        assert!(store.find_containing(0.5, 0.5).unwrap().is_some());
    }

    #[test]
    fn point_on_boundary_is_contained() {
        let store = state_store();
        store
            .insert_one(&square(&store, 0.0, 0.0, 1.0, Some("OG")))
            .unwrap();

        assert!(store.find_containing(1.0, 0.5).unwrap().is_some());
        assert!(store.find_containing(0.0, 0.0).unwrap().is_some());
    }

    #[test]
    fn overlapping_polygons_return_one_of_them() {
        let store = state_store();
        let a = store
            .insert_one(&square(&store, 0.0, 0.0, 2.0, Some("OG")))
            .unwrap();
        let b = store
            .insert_one(&square(&store, 1.0, 1.0, 2.0, Some("KD")))
            .unwrap();

        let found = store.find_containing(1.5, 1.5).unwrap().unwrap();
        assert!(found.id == Some(a) || found.id == Some(b));
    }

    #[test]
    fn finds_by_state_codes() {
        let store = state_store();
        let polygons = vec![
            square(&store, 0.0, 0.0, 1.0, Some("OG")),
            square(&store, 1.0, 0.0, 1.0, Some("OG")),
            square(&store, 5.0, 5.0, 1.0, Some("KD")),
            square(&store, 9.0, 9.0, 1.0, None),
        ];
        assert_eq!(store.insert_many(&polygons).unwrap(), 4);

        let ogun = store.find_by_codes(&["OG"]).unwrap();
        assert_eq!(ogun.len(), 2);
        assert!(ogun.iter().all(|p| p.state_id() == Some(1)));

        assert_eq!(store.find_by_codes(&["OG", "KD"]).unwrap().len(), 3);
        assert!(store.find_by_codes(&["ZZ"]).unwrap().is_empty());
        assert!(store.find_by_codes::<&str>(&[]).unwrap().is_empty());
    }

    #[test]
    fn failed_batch_writes_nothing() {
        let store = state_store();
        let mut broken = square(&store, 2.0, 2.0, 1.0, Some("OG"));
        broken.ring.truncate(3);

        let batch = vec![square(&store, 0.0, 0.0, 1.0, Some("OG")), broken];
        let result = store.insert_many(&batch);

        assert!(matches!(
            result,
            Err(DbError::PersistenceFailure { attempted: 2, .. })
        ));
        assert_eq!(store.count().unwrap(), 0);

        // The connection is usable again after the rollback.
        store
            .insert_one(&square(&store, 0.0, 0.0, 1.0, Some("OG")))
            .unwrap();
        assert_eq!(store.count().unwrap(), 1);
    }

    #[test]
    fn state_missing_from_directory_is_rejected() {
        let store = state_store();
        let mut orphan = square(&store, 2.0, 2.0, 1.0, None);
        orphan.state = Some(Arc::new(StateRecord {
            id: 99,
            name: "Nowhere".to_string(),
            code: "NW".to_string(),
        }));

        assert!(matches!(
            store.insert_one(&orphan),
            Err(DbError::Conversion { .. })
        ));

        let batch = vec![square(&store, 0.0, 0.0, 1.0, Some("OG")), orphan];
        assert!(matches!(
            store.insert_many(&batch),
            Err(DbError::PersistenceFailure { attempted: 2, .. })
        ));
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn failed_commit_is_a_persistence_failure() {
        let store = state_store();

        let result = store.in_transaction(3, || {
            store
                .connection()
                .execute_batch("COMMIT")
                .map_err(|e| e.to_string())
        });

        match result {
            Err(DbError::PersistenceFailure { attempted, message }) => {
                assert_eq!(attempted, 3);
                assert!(message.starts_with("commit"), "{message}");
            }
            other => panic!("expected a persistence failure, got {other:?}"),
        }

        // The connection is usable again.
        store
            .insert_one(&square(&store, 0.0, 0.0, 1.0, Some("OG")))
            .unwrap();
    }

    #[test]
    fn batch_inside_open_transaction_is_a_persistence_failure() {
        let store = state_store();
        store.connection().execute_batch("BEGIN TRANSACTION").unwrap();

        let result = store.insert_many(&[square(&store, 0.0, 0.0, 1.0, Some("OG"))]);
        assert!(matches!(
            result,
            Err(DbError::PersistenceFailure { attempted: 1, .. })
        ));
    }

    #[test]
    fn replace_all_swaps_stored_polygons() {
        let store = state_store();
        store
            .insert_many(&[
                square(&store, 0.0, 0.0, 1.0, Some("OG")),
                square(&store, 1.0, 0.0, 1.0, Some("KD")),
            ])
            .unwrap();

        let written = store
            .replace_all(&[square(&store, 5.0, 5.0, 1.0, Some("KD"))])
            .unwrap();

        assert_eq!(written, 1);
        assert_eq!(store.count().unwrap(), 1);
        assert!(store.find_containing(0.5, 0.5).unwrap().is_none());
        assert!(store.find_containing(5.5, 5.5).unwrap().is_some());
    }

    #[test]
    fn failed_replace_keeps_previous_polygons() {
        let store = state_store();
        store
            .insert_many(&[
                square(&store, 0.0, 0.0, 1.0, Some("OG")),
                square(&store, 1.0, 0.0, 1.0, Some("KD")),
            ])
            .unwrap();

        let mut broken = square(&store, 5.0, 5.0, 1.0, Some("OG"));
        broken.ring.truncate(3);
        let result = store.replace_all(&[square(&store, 7.0, 7.0, 1.0, Some("OG")), broken]);

        assert!(matches!(
            result,
            Err(DbError::PersistenceFailure { attempted: 2, .. })
        ));
        assert_eq!(store.count().unwrap(), 2);
        assert!(store.find_containing(0.5, 0.5).unwrap().is_some());
        assert!(store.find_containing(7.5, 7.5).unwrap().is_none());
    }

    #[test]
    fn find_all_keeps_insertion_order() {
        let store = state_store();
        let polygons: Vec<ExtractedPolygon> = (0..3)
            .map(|i| square(&store, f64::from(i), 0.0, 1.0, Some("OG")))
            .collect();
        store.insert_many(&polygons).unwrap();

        let lefts: Vec<f64> = store
            .find_all()
            .unwrap()
            .iter()
            .map(|p| p.metadata.left)
            .collect();
        assert_eq!(lefts, vec![0.0, 1.0, 2.0]);
    }

    #[test]
    fn country_store_keeps_area_and_length_only() {
        let store = country_store();
        let mut polygon = square(&store, 0.0, 0.0, 1.0, None);
        polygon.object_id = String::new();
        store.insert_one(&polygon).unwrap();

        let found = store.find_containing(0.5, 0.5).unwrap().unwrap();
        assert!(found.state.is_none());
        assert_eq!(found.shape_area, "3.25");
        assert_eq!(found.shape_length, "9.5");
        assert!(found.cap_city.is_empty());
    }

    #[test]
    fn country_store_ignores_state_codes() {
        let store = country_store();
        store
            .insert_one(&square(&store, 0.0, 0.0, 1.0, None))
            .unwrap();
        assert!(store.find_by_codes(&["OG"]).unwrap().is_empty());
    }

    #[test]
    fn kinds_use_separate_tables() {
        let conn = open_in_memory().unwrap();
        let country = SpatialStore::new(conn, ReferenceKind::Country, Arc::new(StateDirectory::default()));
        country
            .insert_one(&square(&country, 0.0, 0.0, 1.0, None))
            .unwrap();

        let count: i64 = country
            .connection()
            .query_row("SELECT COUNT(*) FROM polygons_by_state", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
        assert_eq!(country.count().unwrap(), 1);
    }

    #[test]
    fn clear_removes_everything() {
        let store = state_store();
        store
            .insert_many(&[
                square(&store, 0.0, 0.0, 1.0, Some("OG")),
                square(&store, 1.0, 0.0, 1.0, Some("KD")),
            ])
            .unwrap();

        assert_eq!(store.clear().unwrap(), 2);
        assert_eq!(store.count().unwrap(), 0);
        assert!(store.find_all().unwrap().is_empty());
    }
}
