//! Typed administrative attributes of a boundary feature.
//!
//! Boundary files carry an untyped property map. It is converted into
//! [`BoundaryProperties`] exactly once, when the feature is read, so the
//! rest of the pipeline never deals with string keys.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Administrative attributes recognized on a boundary feature.
///
/// Every field is optional. Absent keys surface as empty strings through
/// [`BoundaryProperties::get_or_empty`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundaryProperties {
    /// `objectid`
    pub object_id: Option<String>,
    /// `statecode`
    pub state_code: Option<String>,
    /// `state` (state name, used for filtering)
    pub state_name: Option<String>,
    /// `capcity`
    pub cap_city: Option<String>,
    /// `source`
    pub source: Option<String>,
    /// `shape_area`
    pub shape_area: Option<String>,
    /// `shape_len`
    pub shape_length: Option<String>,
    /// `geozone`
    pub geo_zone: Option<String>,
    /// `timestamp`
    pub timestamp: Option<String>,
    /// `created_at`
    pub created_at: Option<String>,
    /// `updated_at`
    pub updated_at: Option<String>,
}

impl BoundaryProperties {
    /// Parses a `GeoJSON` property map.
    ///
    /// Keys are matched case-insensitively. Strings are trimmed, numbers and
    /// booleans are stringified, nulls and empty strings count as absent.
    #[must_use]
    pub fn from_json_map(map: &Map<String, Value>) -> Self {
        let mut props = Self::default();

        for (key, value) in map {
            let Some(text) = value_to_string(value) else {
                continue;
            };

            let slot = match key.to_ascii_lowercase().as_str() {
                "objectid" => &mut props.object_id,
                "statecode" => &mut props.state_code,
                "state" => &mut props.state_name,
                "capcity" => &mut props.cap_city,
                "source" => &mut props.source,
                "shape_area" => &mut props.shape_area,
                "shape_len" => &mut props.shape_length,
                "geozone" => &mut props.geo_zone,
                "timestamp" => &mut props.timestamp,
                "created_at" => &mut props.created_at,
                "updated_at" => &mut props.updated_at,
                _ => continue,
            };
            *slot = Some(text);
        }

        props
    }

    /// Returns the field's value or an empty string.
    #[must_use]
    pub fn get_or_empty(field: Option<&String>) -> String {
        field.cloned().unwrap_or_default()
    }
}

fn value_to_string(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => return None,
    };

    if text.is_empty() { None } else { Some(text) }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(m) => m,
            _ => Map::new(),
        }
    }

    #[test]
    fn parses_recognized_keys() {
        let props = BoundaryProperties::from_json_map(&map(serde_json::json!({
            "objectid": 12,
            "statecode": " OG ",
            "state": "Ogun",
            "capcity": "Abeokuta",
            "shape_len": 8.25,
            "geozone": "South West",
            "unrelated": "ignored",
        })));

        assert_eq!(props.object_id.as_deref(), Some("12"));
        assert_eq!(props.state_code.as_deref(), Some("OG"));
        assert_eq!(props.state_name.as_deref(), Some("Ogun"));
        assert_eq!(props.cap_city.as_deref(), Some("Abeokuta"));
        assert_eq!(props.shape_length.as_deref(), Some("8.25"));
        assert_eq!(props.geo_zone.as_deref(), Some("South West"));
        assert!(props.source.is_none());
    }

    #[test]
    fn missing_and_null_keys_are_absent() {
        let props = BoundaryProperties::from_json_map(&map(serde_json::json!({
            "statecode": null,
            "source": "",
        })));

        assert_eq!(props, BoundaryProperties::default());
        assert_eq!(BoundaryProperties::get_or_empty(props.source.as_ref()), "");
    }

    #[test]
    fn matches_keys_case_insensitively() {
        let props = BoundaryProperties::from_json_map(&map(serde_json::json!({
            "StateCode": "KD",
            "Shape_Area": 1.5,
        })));

        assert_eq!(props.state_code.as_deref(), Some("KD"));
        assert_eq!(props.shape_area.as_deref(), Some("1.5"));
    }
}
