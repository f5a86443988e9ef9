//! `GeoJSON` rendering of query results.
//!
//! Feature properties use the polygon's field names and metadata keys
//! verbatim, so `left`, `top`, `right`, `bottom`, `index`, `row_index` and
//! `col_index` appear at the top level of each feature's properties.

use std::path::Path;

use geogrid_grid_models::ExtractedPolygon;
use geojson::{Feature, FeatureCollection, Geometry, JsonObject, JsonValue};

/// Renders one polygon as a `GeoJSON` feature.
///
/// # Errors
///
/// Returns [`serde_json::Error`] if the metadata cannot be serialized.
pub fn to_feature(polygon: &ExtractedPolygon) -> Result<Feature, serde_json::Error> {
    let mut properties = JsonObject::new();

    properties.insert("id".to_string(), JsonValue::from(polygon.id));
    for (key, value) in [
        ("object_id", &polygon.object_id),
        ("cap_city", &polygon.cap_city),
        ("source", &polygon.source),
        ("shape_area", &polygon.shape_area),
        ("shape_length", &polygon.shape_length),
        ("geo_zone", &polygon.geo_zone),
    ] {
        properties.insert(key.to_string(), JsonValue::from(value.as_str()));
    }

    properties.insert("state_id".to_string(), JsonValue::from(polygon.state_id()));
    properties.insert(
        "state_code".to_string(),
        JsonValue::from(polygon.state.as_ref().map(|s| s.code.as_str())),
    );
    properties.insert(
        "state_name".to_string(),
        JsonValue::from(polygon.state.as_ref().map(|s| s.name.as_str())),
    );

    if let JsonValue::Object(metadata) = serde_json::to_value(polygon.metadata)? {
        properties.extend(metadata);
    }

    Ok(Feature {
        bbox: None,
        geometry: Some(Geometry::new(geojson::Value::from(&polygon.to_polygon()))),
        id: polygon
            .id
            .map(|id| geojson::feature::Id::Number(serde_json::Number::from(id))),
        properties: Some(properties),
        foreign_members: None,
    })
}

/// Renders polygons as a `GeoJSON` feature collection.
///
/// # Errors
///
/// Returns [`serde_json::Error`] if any feature cannot be rendered.
pub fn to_feature_collection(
    polygons: &[ExtractedPolygon],
) -> Result<FeatureCollection, serde_json::Error> {
    Ok(FeatureCollection {
        bbox: None,
        features: polygons.iter().map(to_feature).collect::<Result<_, _>>()?,
        foreign_members: None,
    })
}

/// Writes polygons as pretty-printed `GeoJSON` to `output`, or to stdout.
///
/// # Errors
///
/// Returns an error if rendering or writing fails.
pub fn write_polygons(
    polygons: &[ExtractedPolygon],
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let text = serde_json::to_string_pretty(&to_feature_collection(polygons)?)?;

    match output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                geogrid_database::paths::ensure_dir(parent)?;
            }
            std::fs::write(path, text)?;
            log::info!("Wrote {} features to {}", polygons.len(), path.display());
        }
        None => println!("{text}"),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use geogrid_grid_models::{PolygonMetadata, StateRecord};

    use super::*;

    fn polygon() -> ExtractedPolygon {
        ExtractedPolygon {
            id: Some(42),
            ring: vec![(3.0, 4.0), (3.3, 4.0), (3.3, 4.3), (3.0, 4.3), (3.0, 4.0)],
            object_id: "7".to_string(),
            cap_city: "Abeokuta".to_string(),
            source: String::new(),
            shape_area: "1.5".to_string(),
            shape_length: "6.25".to_string(),
            geo_zone: "South West".to_string(),
            state: Some(Arc::new(StateRecord {
                id: 1,
                name: "Ogun".to_string(),
                code: "OG".to_string(),
            })),
            metadata: PolygonMetadata {
                left: 3.0,
                top: 4.3,
                right: 3.3,
                bottom: 4.0,
                index: 5,
                row_index: 0,
                col_index: 5,
            },
        }
    }

    #[test]
    fn properties_use_field_and_metadata_names() {
        let feature = to_feature(&polygon()).unwrap();
        let properties = feature.properties.unwrap();

        for key in [
            "id",
            "object_id",
            "cap_city",
            "source",
            "shape_area",
            "shape_length",
            "geo_zone",
            "state_id",
            "state_code",
            "left",
            "top",
            "right",
            "bottom",
            "index",
            "row_index",
            "col_index",
        ] {
            assert!(properties.contains_key(key), "missing {key}");
        }

        assert_eq!(properties["state_code"], JsonValue::from("OG"));
        assert_eq!(properties["index"], JsonValue::from(5));
        assert_eq!(properties["cap_city"], JsonValue::from("Abeokuta"));
    }

    #[test]
    fn geometry_is_the_ring() {
        let feature = to_feature(&polygon()).unwrap();
        let geometry = feature.geometry.unwrap();
        let geo_polygon: geo::Polygon<f64> = geometry.value.try_into().unwrap();
        assert_eq!(geo_polygon.exterior().0.len(), 5);
    }

    #[test]
    fn missing_state_renders_null() {
        let mut unresolved = polygon();
        unresolved.state = None;
        unresolved.id = None;

        let feature = to_feature(&unresolved).unwrap();
        assert!(feature.id.is_none());
        let properties = feature.properties.unwrap();
        assert_eq!(properties["state_id"], JsonValue::Null);
        assert_eq!(properties["state_code"], JsonValue::Null);
    }

    #[test]
    fn collection_keeps_order() {
        let mut second = polygon();
        second.id = Some(43);
        let collection = to_feature_collection(&[polygon(), second]).unwrap();
        assert_eq!(collection.features.len(), 2);
        assert_eq!(
            collection.features[1].id,
            Some(geojson::feature::Id::Number(43.into()))
        );
    }
}
