#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Grid generation, boundary clipping and polygon extraction.
//!
//! Lays a regular grid over an administrative boundary, clips every cell
//! to the boundary and decomposes the covered pieces into simple polygons
//! tagged with their grid position. The resulting polygons are handed to
//! `geogrid_database` for storage.

pub mod boundary;
pub mod builder;
pub mod clip;
pub mod extract;
pub mod pipeline;
pub mod repair;
pub mod units;

use geogrid_grid_models::InvalidBoundsError;
use thiserror::Error;

pub use extract::ReferenceMode;

/// Errors that can occur while gridding a boundary.
#[derive(Debug, Error)]
pub enum GridError {
    /// A grid dimension or derived row/column count is unusable.
    #[error("Invalid parameter: {message}")]
    InvalidParameter {
        /// Description of what went wrong.
        message: String,
    },

    /// The boundary has an empty or inverted extent.
    #[error("Invalid parameter: {0}")]
    InvalidBounds(#[from] InvalidBoundsError),

    /// The boundary file is not valid `GeoJSON`.
    #[error("GeoJSON error: {0}")]
    GeoJson(#[from] geojson::Error),

    /// The boundary file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The boundary contains nothing usable.
    #[error("Conversion error: {message}")]
    Conversion {
        /// Description of what went wrong.
        message: String,
    },
}

impl GridError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            message: message.into(),
        }
    }
}
