//! Kilometre to degree conversion.
//!
//! The constants are averages over the region the grids are built for
//! (roughly 4°N–14°N). They are not valid near the poles.

/// Kilometres spanned by one degree of latitude.
pub const KM_PER_DEGREE_LATITUDE: f64 = 110.574;

/// Kilometres spanned by one degree of longitude at the region's mid
/// latitude (regional circumference / 360).
pub const KM_PER_DEGREE_LONGITUDE: f64 = 109.856_12;

/// Converts a distance into `(width_deg, height_deg)`.
#[must_use]
pub fn km_to_degrees(km: f64) -> (f64, f64) {
    (km / KM_PER_DEGREE_LONGITUDE, km / KM_PER_DEGREE_LATITUDE)
}
