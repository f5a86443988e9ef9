//! Decomposition of clipped features into tagged simple polygons.
//!
//! Every clipped feature is identified by its position in the clipped
//! collection. That position becomes the polygon's `index`, from which the
//! grid `row_index` and `col_index` are derived. All members of a
//! multi-polygon share their source feature's position, so they cannot be
//! told apart by grid position.

use std::collections::BTreeMap;

use geo::BoundingRect;
use geogrid_grid_models::{
    BoundaryProperties, ClippedFeature, ExtractedPolygon, PolygonMetadata, ReferenceKind,
    StateDirectory, merge_rects,
};

use crate::GridError;
use crate::builder::validate_dimension;

/// How extracted polygons are referenced.
#[derive(Debug, Clone, Copy)]
pub enum ReferenceMode<'a> {
    /// Keep administrative attributes and resolve each feature's
    /// `statecode` against the directory.
    State(&'a StateDirectory),
    /// Dissolved national boundary: only geometry, area and length.
    Country,
}

impl ReferenceMode<'_> {
    /// The storage kind for polygons extracted in this mode.
    #[must_use]
    pub const fn kind(&self) -> ReferenceKind {
        match self {
            Self::State(_) => ReferenceKind::State,
            Self::Country => ReferenceKind::Country,
        }
    }
}

/// Row and column counts of the grid spanned by the clipped collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridShape {
    /// `floor(height / grid_height)`.
    pub rows: u64,
    /// `floor(width / grid_width)`.
    pub cols: u64,
}

impl GridShape {
    /// Derives the grid shape from the total bounds of `clipped`.
    ///
    /// Returns `Ok(None)` for an empty collection.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::InvalidParameter`] if a dimension is not
    /// positive or yields zero rows or columns.
    pub fn of(
        clipped: &[ClippedFeature],
        grid_height: f64,
        grid_width: f64,
    ) -> Result<Option<Self>, GridError> {
        validate_dimension("grid_height", grid_height)?;
        validate_dimension("grid_width", grid_width)?;

        let Some(rect) = clipped
            .iter()
            .filter_map(|c| c.geometry.bounding_rect())
            .reduce(merge_rects)
        else {
            return Ok(None);
        };

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let rows = ((rect.max().y - rect.min().y) / grid_height).floor() as u64;
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let cols = ((rect.max().x - rect.min().x) / grid_width).floor() as u64;

        if rows == 0 || cols == 0 {
            return Err(GridError::invalid(format!(
                "grid of {grid_width} x {grid_height} degrees over clipped bounds \
                 ({}, {}, {}, {}) yields {rows} rows and {cols} columns",
                rect.min().x,
                rect.min().y,
                rect.max().x,
                rect.max().y
            )));
        }

        Ok(Some(Self { rows, cols }))
    }

    /// `(row_index, col_index)` of the feature at `index`.
    #[must_use]
    pub const fn position(&self, index: u64) -> (u64, u64) {
        (index / self.rows, index % self.cols)
    }
}

/// Extracts tagged simple polygons from clipped features.
///
/// A polygon feature yields one [`ExtractedPolygon`]; a multi-polygon
/// yields one per member, all with the same `index`. The metadata bounding
/// box is computed per member polygon.
///
/// In [`ReferenceMode::State`], a feature whose `statecode` is not in the
/// directory is logged and its polygons are emitted without a state.
///
/// # Errors
///
/// Returns [`GridError::InvalidParameter`] if the grid dimensions are not
/// positive or yield zero rows or columns over the clipped bounds.
pub fn extract(
    clipped: &[ClippedFeature],
    grid_height: f64,
    grid_width: f64,
    mode: &ReferenceMode<'_>,
) -> Result<Vec<ExtractedPolygon>, GridError> {
    let Some(shape) = GridShape::of(clipped, grid_height, grid_width)? else {
        log::info!("No clipped features to extract");
        return Ok(vec![]);
    };

    let mut polygons = Vec::with_capacity(clipped.len());
    let mut unresolved: BTreeMap<String, usize> = BTreeMap::new();
    let mut skipped = 0usize;

    for (i, feature) in clipped.iter().enumerate() {
        let index = i as u64;
        let (row_index, col_index) = shape.position(index);

        for polygon in feature.geometry.polygons() {
            let Some(rect) = polygon.bounding_rect() else {
                skipped += 1;
                continue;
            };

            let ring: Vec<(f64, f64)> = polygon.exterior().coords().map(|c| (c.x, c.y)).collect();
            if ring.len() < 4 {
                log::debug!("Skipping degenerate ring with {} points at index {index}", ring.len());
                skipped += 1;
                continue;
            }

            let metadata = PolygonMetadata {
                left: rect.min().x,
                top: rect.max().y,
                right: rect.max().x,
                bottom: rect.min().y,
                index,
                row_index,
                col_index,
            };

            let extracted = match mode {
                ReferenceMode::State(states) => {
                    state_polygon(ring, metadata, &feature.properties, states, &mut unresolved)
                }
                ReferenceMode::Country => country_polygon(ring, metadata, &feature.properties),
            };

            polygons.push(extracted);
        }
    }

    for (code, count) in &unresolved {
        log::warn!("Cannot find state with code {code:?} ({count} polygons left without a state)");
    }
    if skipped > 0 {
        log::warn!("Skipped {skipped} degenerate polygons");
    }

    log::info!(
        "Extracted {} polygons from {} clipped features ({} rows x {} columns)",
        polygons.len(),
        clipped.len(),
        shape.rows,
        shape.cols
    );

    Ok(polygons)
}

fn state_polygon(
    ring: Vec<(f64, f64)>,
    metadata: PolygonMetadata,
    props: &BoundaryProperties,
    states: &StateDirectory,
    unresolved: &mut BTreeMap<String, usize>,
) -> ExtractedPolygon {
    let code = props.state_code.as_deref().unwrap_or_default();
    let state = states.by_code(code).cloned();
    if state.is_none() {
        log::debug!(
            "No state with code {code:?} for polygon at index {} (row {}, col {})",
            metadata.index,
            metadata.row_index,
            metadata.col_index
        );
        *unresolved.entry(code.to_string()).or_default() += 1;
    }

    ExtractedPolygon {
        id: None,
        ring,
        object_id: BoundaryProperties::get_or_empty(props.object_id.as_ref()),
        cap_city: BoundaryProperties::get_or_empty(props.cap_city.as_ref()),
        source: BoundaryProperties::get_or_empty(props.source.as_ref()),
        shape_area: BoundaryProperties::get_or_empty(props.shape_area.as_ref()),
        shape_length: BoundaryProperties::get_or_empty(props.shape_length.as_ref()),
        geo_zone: BoundaryProperties::get_or_empty(props.geo_zone.as_ref()),
        state,
        metadata,
    }
}

fn country_polygon(
    ring: Vec<(f64, f64)>,
    metadata: PolygonMetadata,
    props: &BoundaryProperties,
) -> ExtractedPolygon {
    ExtractedPolygon {
        id: None,
        ring,
        object_id: String::new(),
        cap_city: String::new(),
        source: String::new(),
        shape_area: BoundaryProperties::get_or_empty(props.shape_area.as_ref()),
        shape_length: BoundaryProperties::get_or_empty(props.shape_length.as_ref()),
        geo_zone: String::new(),
        state: None,
        metadata,
    }
}
