//! Boundary validation, repair and dissolve.
//!
//! Invalid geometries (self-intersections, bow-ties, overlapping members)
//! are rebuilt by overlaying them with an empty geometry, which is the
//! zero-width equivalent of the `buffer(0)` repair idiom: the overlay
//! engine resolves crossings and emits a valid multi-polygon. Repair is
//! best-effort and never fails the pipeline.

use geo::{BooleanOps, MultiPolygon, Validation};
use geogrid_grid_models::{BoundaryFeature, BoundaryProperties};

/// What [`repair_reporting`] did to a geometry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepairOutcome {
    /// The geometry was already valid and is returned untouched.
    Valid,
    /// The geometry was invalid and the rebuilt geometry is valid.
    Repaired,
    /// The geometry is still invalid after the repair pass.
    StillInvalid(String),
}

/// Repairs a geometry if it is invalid. Valid input is returned as is.
#[must_use]
pub fn repair(geometry: MultiPolygon<f64>) -> MultiPolygon<f64> {
    repair_reporting(geometry).0
}

/// Repairs a geometry and reports what happened.
///
/// The validity explanation of invalid input is logged. A geometry that is
/// still invalid afterwards is logged as a repair failure and returned
/// anyway.
#[must_use]
pub fn repair_reporting(geometry: MultiPolygon<f64>) -> (MultiPolygon<f64>, RepairOutcome) {
    let Err(reason) = geometry.check_validation() else {
        return (geometry, RepairOutcome::Valid);
    };

    log::warn!("Invalid geometry: {reason}");

    let rebuilt = geometry.union(&MultiPolygon::<f64>::new(vec![]));

    match rebuilt.check_validation() {
        Ok(()) => (rebuilt, RepairOutcome::Repaired),
        Err(still) => {
            log::error!("Geometry repair failed, continuing with best-effort geometry: {still}");
            (rebuilt, RepairOutcome::StillInvalid(still.to_string()))
        }
    }
}

/// Repairs every feature in place and returns how many could not be
/// repaired.
pub fn repair_features(features: &mut [BoundaryFeature]) -> usize {
    repair_features_with(features, repair_reporting)
}

fn repair_features_with<F>(features: &mut [BoundaryFeature], mut repair: F) -> usize
where
    F: FnMut(MultiPolygon<f64>) -> (MultiPolygon<f64>, RepairOutcome),
{
    let mut failures = 0;
    for feature in features.iter_mut() {
        let geometry = std::mem::replace(&mut feature.geometry, MultiPolygon::new(vec![]));
        let (repaired, outcome) = repair(geometry);
        if matches!(outcome, RepairOutcome::StillInvalid(_)) {
            failures += 1;
        }
        feature.geometry = repaired;
    }
    if failures > 0 {
        log::warn!("{failures} of {} boundary features are still invalid", features.len());
    }
    failures
}

/// Unions every feature into one.
///
/// Per-feature administrative attributes do not apply to the merged
/// result and are discarded. Returns `None` for empty input.
#[must_use]
pub fn dissolve(features: &[BoundaryFeature]) -> Option<BoundaryFeature> {
    let (first, rest) = features.split_first()?;

    let geometry = rest
        .iter()
        .fold(first.geometry.clone(), |acc, feature| {
            acc.union(&feature.geometry)
        });

    log::info!(
        "Dissolved {} boundary features into {} polygon(s)",
        features.len(),
        geometry.0.len()
    );

    Some(BoundaryFeature {
        geometry,
        properties: BoundaryProperties::default(),
    })
}
