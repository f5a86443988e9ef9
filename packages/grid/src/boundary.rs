//! Reading boundary features from `GeoJSON`.
//!
//! Accepts a `FeatureCollection`, a single `Feature` or a bare geometry.
//! Polygon and multi-polygon features are kept; anything else is skipped
//! with a warning. Property maps are parsed into [`BoundaryProperties`]
//! here and nowhere else.

use std::path::Path;

use geo::MultiPolygon;
use geogrid_grid_models::{BoundaryFeature, BoundaryProperties};
use geojson::GeoJson;

use crate::GridError;

/// Reads and parses a boundary file.
///
/// # Errors
///
/// Returns [`GridError`] if the file cannot be read, is not `GeoJSON`, or
/// contains no polygon features.
pub fn read_boundary_file(path: &Path) -> Result<Vec<BoundaryFeature>, GridError> {
    let text = std::fs::read_to_string(path)?;
    let features = parse_boundary(&text)?;
    log::info!(
        "Read {} boundary features from {}",
        features.len(),
        path.display()
    );
    Ok(features)
}

/// Parses boundary features from `GeoJSON` text.
///
/// # Errors
///
/// Returns [`GridError`] if the text is not `GeoJSON` or contains no
/// polygon features.
pub fn parse_boundary(text: &str) -> Result<Vec<BoundaryFeature>, GridError> {
    let geojson: GeoJson = text.parse()?;

    let features: Vec<BoundaryFeature> = match geojson {
        GeoJson::FeatureCollection(collection) => collection
            .features
            .into_iter()
            .enumerate()
            .filter_map(|(i, feature)| convert_feature(i, feature))
            .collect(),
        GeoJson::Feature(feature) => convert_feature(0, feature).into_iter().collect(),
        GeoJson::Geometry(geometry) => to_multi_polygon(geometry)
            .map(|geometry| BoundaryFeature {
                geometry,
                properties: BoundaryProperties::default(),
            })
            .into_iter()
            .collect(),
    };

    if features.is_empty() {
        return Err(GridError::Conversion {
            message: "boundary contains no polygon features".to_string(),
        });
    }

    Ok(features)
}

/// Keeps only features whose `state` property is one of `names`.
///
/// An empty `names` list keeps everything.
#[must_use]
pub fn filter_states(features: Vec<BoundaryFeature>, names: &[String]) -> Vec<BoundaryFeature> {
    if names.is_empty() {
        return features;
    }

    features
        .into_iter()
        .filter(|feature| {
            feature
                .properties
                .state_name
                .as_ref()
                .is_some_and(|name| names.iter().any(|n| n.eq_ignore_ascii_case(name)))
        })
        .collect()
}

fn convert_feature(i: usize, feature: geojson::Feature) -> Option<BoundaryFeature> {
    let properties = feature
        .properties
        .as_ref()
        .map(BoundaryProperties::from_json_map)
        .unwrap_or_default();

    let Some(geometry) = feature.geometry else {
        log::warn!("Skipping boundary feature {i}: no geometry");
        return None;
    };

    let Some(geometry) = to_multi_polygon(geometry) else {
        log::warn!("Skipping boundary feature {i}: not a Polygon or MultiPolygon");
        return None;
    };

    Some(BoundaryFeature {
        geometry,
        properties,
    })
}

fn to_multi_polygon(geometry: geojson::Geometry) -> Option<MultiPolygon<f64>> {
    let geo_geom: geo::Geometry<f64> = geometry.try_into().ok()?;
    match geo_geom {
        geo::Geometry::MultiPolygon(mp) => Some(mp),
        geo::Geometry::Polygon(p) => Some(MultiPolygon(vec![p])),
        _ => None,
    }
}
