//! WKT encoding of stored rings.

use std::str::FromStr;

use geo::{Geometry, LineString, Polygon};
use wkt::ToWkt;

use crate::DbError;

/// Encodes a closed ring as a WKT `POLYGON`.
#[must_use]
pub fn ring_to_wkt(ring: &[(f64, f64)]) -> String {
    Polygon::new(LineString::from(ring.to_vec()), vec![]).wkt_string()
}

/// Decodes the exterior ring of a WKT `POLYGON`.
///
/// # Errors
///
/// Returns [`DbError::Conversion`] if the text is not WKT or not a polygon.
pub fn ring_from_wkt(text: &str) -> Result<Vec<(f64, f64)>, DbError> {
    let geometry: Geometry<f64> = wkt::Wkt::from_str(text)
        .map_err(|e| conversion(format!("WKT parse error: {e:?}")))
        .and_then(|w| {
            w.try_into()
                .map_err(|e: wkt::conversion::Error| conversion(format!("WKT conversion error: {e:?}")))
        })?;

    match geometry {
        Geometry::Polygon(polygon) => Ok(polygon.exterior().points().map(|p| p.x_y()).collect()),
        other => Err(conversion(format!(
            "expected a POLYGON, got {}",
            other.wkt_string()
        ))),
    }
}

fn conversion(message: String) -> DbError {
    DbError::Conversion { message }
}
