//! Clipping grid cells to a boundary.

use geo::{BooleanOps, BoundingRect, Rect};
use geogrid_grid_models::{BoundaryFeature, ClippedFeature, ClippedGeometry, GridCell};

/// Intersects every grid cell with every boundary feature.
///
/// Cells are visited in the order given, and for each cell the features
/// in their input order. Each non-empty intersection becomes one
/// [`ClippedFeature`] carrying the properties of the feature it came from.
/// Cells that miss the boundary entirely produce nothing.
#[must_use]
pub fn clip(grid: &[GridCell], boundary: &[BoundaryFeature]) -> Vec<ClippedFeature> {
    let envelopes: Vec<Option<Rect<f64>>> = boundary
        .iter()
        .map(|feature| feature.geometry.bounding_rect())
        .collect();

    let mut clipped = Vec::new();

    for cell in grid {
        let cell_rect = cell.rect();
        let cell_polygon = cell.to_polygon();

        for (feature, envelope) in boundary.iter().zip(&envelopes) {
            let Some(envelope) = envelope else {
                continue;
            };
            if !rects_overlap(&cell_rect, envelope) {
                continue;
            }

            let piece = cell_polygon.intersection(&feature.geometry);
            let Some(geometry) = ClippedGeometry::from_multi_polygon(piece) else {
                continue;
            };

            clipped.push(ClippedFeature {
                geometry,
                properties: feature.properties.clone(),
            });
        }
    }

    log::info!(
        "Clipped {} grid cells against {} boundary features: {} pieces",
        grid.len(),
        boundary.len(),
        clipped.len()
    );

    clipped
}

fn rects_overlap(a: &Rect<f64>, b: &Rect<f64>) -> bool {
    a.min().x < b.max().x && b.min().x < a.max().x && a.min().y < b.max().y && b.min().y < a.max().y
}
