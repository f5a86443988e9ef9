//! Regular grid generation over a bounding box.

use geogrid_grid_models::{BoundingBox, GridCell};

use crate::GridError;

/// Builds a regular grid of `cell_width` × `cell_height` cells covering
/// `bounds`.
///
/// Cells start at `(min_x, min_y)` and are emitted column by column: every
/// cell of one `x` column (with `y` ascending) before the next column.
/// No partial cells are produced, so the last column and row overhang the
/// box whenever the extent is not an exact multiple of the cell size.
///
/// # Errors
///
/// Returns [`GridError::InvalidParameter`] if either dimension is not a
/// positive finite number.
pub fn build_grid(
    bounds: &BoundingBox,
    cell_height: f64,
    cell_width: f64,
) -> Result<Vec<GridCell>, GridError> {
    validate_dimension("cell_height", cell_height)?;
    validate_dimension("cell_width", cell_width)?;

    let xs = steps(bounds.min_x, bounds.max_x, cell_width);
    let ys = steps(bounds.min_y, bounds.max_y, cell_height);

    let mut cells = Vec::with_capacity(xs.len() * ys.len());
    for &x in &xs {
        for &y in &ys {
            cells.push(GridCell {
                x0: x,
                y0: y,
                x1: x + cell_width,
                y1: y + cell_height,
            });
        }
    }

    log::debug!(
        "Built {} grid cells ({} columns x {} rows)",
        cells.len(),
        xs.len(),
        ys.len()
    );

    Ok(cells)
}

pub(crate) fn validate_dimension(name: &str, value: f64) -> Result<(), GridError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(GridError::invalid(format!(
            "{name} must be a positive number of degrees, got {value}"
        )))
    }
}

/// Cell origins from `start` while below `end`. Origins are computed by
/// multiplication so rounding does not accumulate across the row.
fn steps(start: f64, end: f64, step: f64) -> Vec<f64> {
    let mut origins = Vec::new();
    let mut i = 0u32;
    loop {
        let origin = f64::from(i).mul_add(step, start);
        if origin >= end {
            break;
        }
        origins.push(origin);
        i += 1;
    }
    origins
}
