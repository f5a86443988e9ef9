//! Boundary to database in one call.
//!
//! Chains filter -> repair -> grid -> clip -> extract -> insert for the
//! store's reference kind and reports what each stage produced.

use std::time::Instant;

use geogrid_database::{DbError, SpatialStore};
use geogrid_grid::boundary::filter_states;
use geogrid_grid::{GridError, ReferenceMode};
use geogrid_grid_models::{BoundaryFeature, ReferenceKind};

/// Errors from [`run_extraction`].
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Gridding failed.
    #[error(transparent)]
    Grid(#[from] GridError),

    /// Persisting failed.
    #[error(transparent)]
    Db(#[from] DbError),
}

/// What [`run_extraction`] did.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionSummary {
    /// Table the polygons went into.
    pub reference: ReferenceKind,
    /// Cell size in kilometres.
    pub grid_km: f64,
    /// Boundary features gridded, after the state filter.
    pub feature_count: usize,
    /// Boundary features that stayed invalid after repair.
    pub repair_failures: usize,
    /// Grid cells generated.
    pub cell_count: usize,
    /// Non-empty clipped pieces.
    pub clipped_count: usize,
    /// Polygons written.
    pub inserted: usize,
    /// Polygons whose state code did not resolve.
    pub unresolved: usize,
}

/// Grids `features` and stores the result in `store`.
///
/// `only_states` keeps only features whose `state` property matches one
/// of the names; an empty list keeps everything. With `replace`, the
/// polygons already stored for this kind are deleted in the same
/// transaction that writes the new grid, so a failed run keeps them.
///
/// # Errors
///
/// Returns [`PipelineError`] if gridding fails or the batch write is
/// rolled back.
pub fn run_extraction(
    store: &SpatialStore,
    features: Vec<BoundaryFeature>,
    grid_km: f64,
    only_states: &[String],
    replace: bool,
) -> Result<ExtractionSummary, PipelineError> {
    let start = Instant::now();

    let features = filter_states(features, only_states);
    let feature_count = features.len();
    if !only_states.is_empty() {
        log::info!(
            "Kept {feature_count} boundary features for {}",
            only_states.join(", ")
        );
    }

    let mode = match store.kind() {
        ReferenceKind::State => {
            if store.states().is_empty() {
                log::warn!("No states loaded; every polygon will have an unresolved state");
            }
            ReferenceMode::State(store.states())
        }
        ReferenceKind::Country => ReferenceMode::Country,
    };

    let extraction = geogrid_grid::pipeline::run(features, grid_km, &mode)?;

    let unresolved = match mode {
        ReferenceMode::State(_) => extraction
            .polygons
            .iter()
            .filter(|p| p.state.is_none())
            .count(),
        ReferenceMode::Country => 0,
    };

    let inserted = if replace {
        store.replace_all(&extraction.polygons)?
    } else {
        store.insert_many(&extraction.polygons)?
    };

    log::info!(
        "Extracted {inserted} {} polygons from {} cells in {:.1}s",
        store.kind(),
        extraction.cell_count,
        start.elapsed().as_secs_f64()
    );

    Ok(ExtractionSummary {
        reference: mode.kind(),
        grid_km,
        feature_count,
        repair_failures: extraction.repair_failures,
        cell_count: extraction.cell_count,
        clipped_count: extraction.clipped_count,
        inserted,
        unresolved,
    })
}
