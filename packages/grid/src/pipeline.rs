//! End-to-end gridding of a boundary.
//!
//! Runs every in-memory stage in order, each one fully consuming the
//! previous stage's output: repair (and dissolve, for country grids),
//! grid generation over the boundary's bounds, clipping and extraction.
//! Persistence is left to the caller.

use geogrid_grid_models::{BoundaryFeature, BoundingBox, ExtractedPolygon};

use crate::GridError;
use crate::builder::build_grid;
use crate::clip::clip;
use crate::extract::{ReferenceMode, extract};
use crate::repair::{dissolve, repair_features};
use crate::units::km_to_degrees;

/// Default cell size in kilometres.
pub const DEFAULT_GRID_KM: f64 = 33.0;

/// Output of [`run`].
#[derive(Debug, Clone)]
pub struct Extraction {
    /// Cell width in degrees.
    pub grid_width: f64,
    /// Cell height in degrees.
    pub grid_height: f64,
    /// Bounds the grid was laid over.
    pub bounds: BoundingBox,
    /// Number of generated grid cells.
    pub cell_count: usize,
    /// Number of non-empty clipped pieces.
    pub clipped_count: usize,
    /// Boundary features that stayed invalid after repair.
    pub repair_failures: usize,
    /// Extracted polygons, ready to insert.
    pub polygons: Vec<ExtractedPolygon>,
}

/// Grids `features` with square cells of `grid_km` kilometres.
///
/// Country grids dissolve every feature into one national boundary first.
///
/// # Errors
///
/// Returns [`GridError::InvalidParameter`] if `grid_km` does not convert to
/// positive degrees, the boundary has no extent, or the clipped grid has
/// zero rows or columns.
pub fn run(
    mut features: Vec<BoundaryFeature>,
    grid_km: f64,
    mode: &ReferenceMode<'_>,
) -> Result<Extraction, GridError> {
    let (grid_width, grid_height) = km_to_degrees(grid_km);
    if !(grid_width > 0.0 && grid_height > 0.0 && grid_width.is_finite()) {
        return Err(GridError::invalid(format!(
            "grid size must be a positive number of kilometres, got {grid_km}"
        )));
    }

    let repair_failures = repair_features(&mut features);

    let boundary = match mode {
        ReferenceMode::Country => dissolve(&features).into_iter().collect(),
        ReferenceMode::State(_) => features,
    };

    let rect = BoundingBox::of(boundary.iter().map(|f| &f.geometry)).ok_or_else(|| {
        GridError::Conversion {
            message: "boundary has no geometry".to_string(),
        }
    })?;
    let bounds = BoundingBox::from_rect(rect)?;

    log::info!(
        "Gridding {} boundary features over ({:.5}, {:.5}, {:.5}, {:.5}) with {grid_km} km cells \
         ({grid_width:.5} x {grid_height:.5} degrees)",
        boundary.len(),
        bounds.min_x,
        bounds.min_y,
        bounds.max_x,
        bounds.max_y
    );

    let grid = build_grid(&bounds, grid_height, grid_width)?;
    let clipped = clip(&grid, &boundary);
    let polygons = extract(&clipped, grid_height, grid_width, mode)?;

    Ok(Extraction {
        grid_width,
        grid_height,
        bounds,
        cell_count: grid.len(),
        clipped_count: clipped.len(),
        repair_failures,
        polygons,
    })
}

#[cfg(test)]
mod tests {
    use geo::{Area, Coord, LineString, MultiPolygon, Polygon, Rect};
    use geogrid_grid_models::{BoundaryProperties, StateDirectory, StateRecord};

    use super::*;

    fn feature(x0: f64, y0: f64, x1: f64, y1: f64, code: &str) -> BoundaryFeature {
        BoundaryFeature {
            geometry: MultiPolygon(vec![
                Rect::new(Coord { x: x0, y: y0 }, Coord { x: x1, y: y1 }).to_polygon(),
            ]),
            properties: BoundaryProperties {
                state_code: Some(code.to_string()),
                shape_area: Some("9.9".to_string()),
                ..BoundaryProperties::default()
            },
        }
    }

    fn directory() -> StateDirectory {
        StateDirectory::from_records([
            StateRecord {
                id: 1,
                name: "West".to_string(),
                code: "WE".to_string(),
            },
            StateRecord {
                id: 2,
                name: "East".to_string(),
                code: "EA".to_string(),
            },
        ])
    }

    fn two_states() -> Vec<BoundaryFeature> {
        vec![
            feature(3.0, 4.0, 8.0, 14.0, "WE"),
            feature(8.0, 4.0, 14.0, 14.0, "EA"),
        ]
    }

    #[test]
    fn grids_the_reference_scenario() {
        let dir = directory();
        let extraction = run(two_states(), 33.0, &ReferenceMode::State(&dir)).unwrap();

        assert_eq!(extraction.cell_count, 37 * 34);
        assert!((extraction.grid_height - 0.298_443).abs() < 1e-6);
        assert!((extraction.grid_width - 0.300_393).abs() < 1e-6);

        let total: f64 = extraction
            .polygons
            .iter()
            .map(|p| p.to_polygon().unsigned_area())
            .sum();
        assert!((total - 110.0).abs() < 1e-4);
        assert!(extraction.polygons.iter().all(|p| p.state.is_some()));
        assert_eq!(extraction.repair_failures, 0);
    }

    #[test]
    fn repaired_boundary_counts_no_failures() {
        let dir = directory();
        let mut features = two_states();
        features[0].geometry = MultiPolygon(vec![Polygon::new(
            LineString::from(vec![(3.0, 4.0), (8.0, 14.0), (8.0, 4.0), (3.0, 14.0), (3.0, 4.0)]),
            vec![],
        )]);

        let extraction = run(features, 33.0, &ReferenceMode::State(&dir)).unwrap();

        assert_eq!(extraction.repair_failures, 0);
        assert!(extraction.polygons.iter().any(|p| p.state_id() == Some(1)));
        assert!(extraction.polygons.iter().any(|p| p.state_id() == Some(2)));
    }

    #[test]
    fn country_grid_dissolves_internal_borders() {
        let dir = directory();
        let state = run(two_states(), 33.0, &ReferenceMode::State(&dir)).unwrap();
        let country = run(two_states(), 33.0, &ReferenceMode::Country).unwrap();

        // Cells straddling the shared border at x = 8 are split in two per
        // state but stay whole for the dissolved country.
        assert!(country.clipped_count < state.clipped_count);
        assert!(country.polygons.iter().all(|p| p.state.is_none()));
        assert!(country.polygons.iter().all(|p| p.shape_area.is_empty()));
    }

    #[test]
    fn rejects_non_positive_grid_size() {
        let result = run(two_states(), 0.0, &ReferenceMode::Country);
        assert!(matches!(result, Err(GridError::InvalidParameter { .. })));

        let result = run(two_states(), -5.0, &ReferenceMode::Country);
        assert!(matches!(result, Err(GridError::InvalidParameter { .. })));
    }

    #[test]
    fn cell_larger_than_boundary_fails_fast() {
        let features = vec![feature(3.0, 4.0, 3.1, 4.1, "WE")];
        let result = run(features, 33.0, &ReferenceMode::Country);
        assert!(matches!(result, Err(GridError::InvalidParameter { .. })));
    }
}
