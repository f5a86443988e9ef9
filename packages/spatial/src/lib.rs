#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! In-memory spatial index over stored grid polygons.
//!
//! Loads every polygon of one reference kind from a [`SpatialStore`] once,
//! builds an R-tree over their envelopes, and answers point lookups
//! without touching the database again. Meant for batches of lookups where
//! one query per point would dominate.

use geo::{BoundingRect, Intersects, Point, Polygon};
use geogrid_database::{DbError, SpatialStore};
use geogrid_grid_models::ExtractedPolygon;
use rstar::{AABB, RTree, RTreeObject};

/// A stored polygon in the R-tree with its decoded geometry.
struct PolygonEntry {
    envelope: AABB<[f64; 2]>,
    shape: Polygon<f64>,
    polygon: ExtractedPolygon,
}

impl RTreeObject for PolygonEntry {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

impl PolygonEntry {
    fn new(polygon: ExtractedPolygon) -> Self {
        let shape = polygon.to_polygon();
        let envelope = compute_envelope(&shape);
        Self {
            envelope,
            shape,
            polygon,
        }
    }

    fn sort_key(&self) -> i64 {
        self.polygon.id.unwrap_or(i64::MAX)
    }
}

/// Pre-built R-tree of extracted polygons.
pub struct PolygonIndex {
    tree: RTree<PolygonEntry>,
}

impl std::fmt::Debug for PolygonIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PolygonIndex")
            .field("len", &self.tree.size())
            .finish()
    }
}

impl PolygonIndex {
    /// Builds an index over the given polygons.
    #[must_use]
    pub fn from_polygons(polygons: Vec<ExtractedPolygon>) -> Self {
        let entries: Vec<PolygonEntry> = polygons
            .into_iter()
            .filter(|p| {
                let valid = p.has_valid_ring();
                if !valid {
                    log::warn!("Skipping polygon {:?} with an open ring", p.id);
                }
                valid
            })
            .map(PolygonEntry::new)
            .collect();

        Self {
            tree: RTree::bulk_load(entries),
        }
    }

    /// Loads every polygon of the store's reference kind.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the polygons cannot be read.
    pub fn load(store: &SpatialStore) -> Result<Self, DbError> {
        let index = Self::from_polygons(store.find_all()?);
        log::info!(
            "Loaded {} {} polygons into spatial index",
            index.len(),
            store.kind()
        );
        Ok(index)
    }

    /// Number of indexed polygons.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    /// Returns `true` if nothing is indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// Looks up a polygon containing the point, boundary included.
    ///
    /// Where polygons overlap, the one with the lowest id wins, which is
    /// the same polygon [`SpatialStore::find_containing`] returns.
    #[must_use]
    pub fn lookup(&self, lon: f64, lat: f64) -> Option<&ExtractedPolygon> {
        self.matches(lon, lat)
            .min_by_key(|entry| entry.sort_key())
            .map(|entry| &entry.polygon)
    }

    /// Every polygon containing the point, ordered by id.
    #[must_use]
    pub fn lookup_all(&self, lon: f64, lat: f64) -> Vec<&ExtractedPolygon> {
        let mut found: Vec<&PolygonEntry> = self.matches(lon, lat).collect();
        found.sort_by_key(|entry| entry.sort_key());
        found.into_iter().map(|entry| &entry.polygon).collect()
    }

    fn matches(&self, lon: f64, lat: f64) -> impl Iterator<Item = &PolygonEntry> {
        let point = Point::new(lon, lat);
        self.tree
            .locate_in_envelope_intersecting(&AABB::from_point([lon, lat]))
            .filter(move |entry| entry.shape.intersects(&point))
    }
}

/// Compute the bounding box envelope for a [`Polygon`].
fn compute_envelope(polygon: &Polygon<f64>) -> AABB<[f64; 2]> {
    polygon.bounding_rect().map_or_else(
        || AABB::from_point([0.0, 0.0]),
        |rect| AABB::from_corners([rect.min().x, rect.min().y], [rect.max().x, rect.max().y]),
    )
}
