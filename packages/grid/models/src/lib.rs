#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Grid, boundary and extracted polygon types.
//!
//! These types describe every stage of the gridding pipeline: the bounding
//! box of a boundary, the regular grid cells laid over it, the clipped
//! pieces of each cell and the simple polygons that are finally persisted
//! and queried. All coordinates are longitude/latitude (EPSG:4326).

pub mod properties;
pub mod states;

use std::sync::Arc;

use geo::{BoundingRect, Coord, LineString, MultiPolygon, Polygon, Rect};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

pub use properties::BoundaryProperties;
pub use states::{StateDirectory, StateRecord};

/// Axis-aligned bounding box in degrees.
///
/// Always satisfies `min_x < max_x` and `min_y < max_y`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Western edge (minimum longitude).
    pub min_x: f64,
    /// Southern edge (minimum latitude).
    pub min_y: f64,
    /// Eastern edge (maximum longitude).
    pub max_x: f64,
    /// Northern edge (maximum latitude).
    pub max_y: f64,
}

impl BoundingBox {
    /// Creates a bounding box, rejecting empty or inverted extents.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidBoundsError`] if either axis has a non-positive
    /// extent or any coordinate is not finite.
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Result<Self, InvalidBoundsError> {
        let finite = [min_x, min_y, max_x, max_y].iter().all(|v| v.is_finite());
        if !finite || min_x >= max_x || min_y >= max_y {
            return Err(InvalidBoundsError {
                min_x,
                min_y,
                max_x,
                max_y,
            });
        }

        Ok(Self {
            min_x,
            min_y,
            max_x,
            max_y,
        })
    }

    /// Computes the total bounds of a set of geometries.
    ///
    /// Returns `None` when the input is empty or every geometry is empty.
    #[must_use]
    pub fn of<'a, I>(geometries: I) -> Option<Rect<f64>>
    where
        I: IntoIterator<Item = &'a MultiPolygon<f64>>,
    {
        geometries
            .into_iter()
            .filter_map(BoundingRect::bounding_rect)
            .reduce(merge_rects)
    }

    /// Converts a `geo` rectangle into a validated bounding box.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidBoundsError`] if the rectangle is degenerate.
    pub fn from_rect(rect: Rect<f64>) -> Result<Self, InvalidBoundsError> {
        Self::new(rect.min().x, rect.min().y, rect.max().x, rect.max().y)
    }

    /// East-west extent in degrees.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// North-south extent in degrees.
    #[must_use]
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}

/// Smallest rectangle containing both `a` and `b`.
#[must_use]
pub fn merge_rects(a: Rect<f64>, b: Rect<f64>) -> Rect<f64> {
    Rect::new(
        Coord {
            x: a.min().x.min(b.min().x),
            y: a.min().y.min(b.min().y),
        },
        Coord {
            x: a.max().x.max(b.max().x),
            y: a.max().y.max(b.max().y),
        },
    )
}

/// Error returned when a bounding box would be empty or inverted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InvalidBoundsError {
    /// Requested western edge.
    pub min_x: f64,
    /// Requested southern edge.
    pub min_y: f64,
    /// Requested eastern edge.
    pub max_x: f64,
    /// Requested northern edge.
    pub max_y: f64,
}

impl std::fmt::Display for InvalidBoundsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid bounds ({}, {}, {}, {}): expected min < max on both axes",
            self.min_x, self.min_y, self.max_x, self.max_y
        )
    }
}

impl std::error::Error for InvalidBoundsError {}

/// One rectangle of the regular grid.
///
/// Every cell of a grid has the same width and height. Cells on the
/// eastern and northern edges may extend past the bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridCell {
    /// Western edge.
    pub x0: f64,
    /// Southern edge.
    pub y0: f64,
    /// Eastern edge.
    pub x1: f64,
    /// Northern edge.
    pub y1: f64,
}

impl GridCell {
    /// The cell as a `geo` rectangle.
    #[must_use]
    pub fn rect(&self) -> Rect<f64> {
        Rect::new(
            Coord {
                x: self.x0,
                y: self.y0,
            },
            Coord {
                x: self.x1,
                y: self.y1,
            },
        )
    }

    /// The cell as a closed polygon.
    #[must_use]
    pub fn to_polygon(&self) -> Polygon<f64> {
        self.rect().to_polygon()
    }
}

/// Which table and attribute set a polygon belongs to.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum ReferenceKind {
    /// Polygons keep their administrative attributes and a state reference.
    State,
    /// Polygons come from a dissolved national boundary with no state.
    Country,
}

/// A boundary feature after its property map has been parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryFeature {
    /// Feature geometry. Single polygons are stored as one-member
    /// multi-polygons.
    pub geometry: MultiPolygon<f64>,
    /// Typed administrative attributes.
    pub properties: BoundaryProperties,
}

/// Geometry of one clipped grid piece.
#[derive(Debug, Clone, PartialEq)]
pub enum ClippedGeometry {
    /// The cell overlapped the boundary in one connected piece.
    Polygon(Polygon<f64>),
    /// The cell overlapped the boundary in several disjoint pieces.
    MultiPolygon(MultiPolygon<f64>),
}

impl ClippedGeometry {
    /// Normalizes an overlay result. Returns `None` for an empty result.
    #[must_use]
    pub fn from_multi_polygon(mut multi: MultiPolygon<f64>) -> Option<Self> {
        match multi.0.len() {
            0 => None,
            1 => multi.0.pop().map(Self::Polygon),
            _ => Some(Self::MultiPolygon(multi)),
        }
    }

    /// Iterates over the member polygons.
    pub fn polygons(&self) -> impl Iterator<Item = &Polygon<f64>> {
        match self {
            Self::Polygon(polygon) => std::slice::from_ref(polygon).iter(),
            Self::MultiPolygon(multi) => multi.0.iter(),
        }
    }

    /// Bounding rectangle of the whole piece.
    #[must_use]
    pub fn bounding_rect(&self) -> Option<Rect<f64>> {
        match self {
            Self::Polygon(polygon) => polygon.bounding_rect(),
            Self::MultiPolygon(multi) => multi.bounding_rect(),
        }
    }
}

/// Intersection of one grid cell with one boundary feature.
#[derive(Debug, Clone, PartialEq)]
pub struct ClippedFeature {
    /// The covered part of the cell.
    pub geometry: ClippedGeometry,
    /// Properties inherited from the boundary feature.
    pub properties: BoundaryProperties,
}

/// Tiling metadata attached to every extracted polygon.
///
/// Key names are part of the export contract: `GeoJSON` output uses them
/// verbatim as feature properties.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PolygonMetadata {
    /// Minimum longitude of this polygon.
    pub left: f64,
    /// Maximum latitude of this polygon.
    pub top: f64,
    /// Maximum longitude of this polygon.
    pub right: f64,
    /// Minimum latitude of this polygon.
    pub bottom: f64,
    /// Position of the source clipped feature. Shared by all members of a
    /// multi-polygon.
    pub index: u64,
    /// `index / grid_row_count`.
    pub row_index: u64,
    /// `index % grid_col_count`.
    pub col_index: u64,
}

/// A simple polygon produced by the extractor, persisted and queried.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedPolygon {
    /// Database id, present once the polygon has been stored.
    pub id: Option<i64>,
    /// Closed exterior ring as `(longitude, latitude)` pairs.
    pub ring: Vec<(f64, f64)>,
    /// Source `objectid`.
    pub object_id: String,
    /// Source `capcity`.
    pub cap_city: String,
    /// Source `source`.
    pub source: String,
    /// Source `shape_area`.
    pub shape_area: String,
    /// Source `shape_len`.
    pub shape_length: String,
    /// Source `geozone`.
    pub geo_zone: String,
    /// Resolved state, shared with the [`StateDirectory`].
    pub state: Option<Arc<StateRecord>>,
    /// Tiling metadata.
    pub metadata: PolygonMetadata,
}

impl ExtractedPolygon {
    /// Foreign key of the resolved state, if any.
    #[must_use]
    pub fn state_id(&self) -> Option<i64> {
        self.state.as_ref().map(|s| s.id)
    }

    /// Rebuilds the `geo` polygon from the stored ring.
    #[must_use]
    pub fn to_polygon(&self) -> Polygon<f64> {
        let exterior: LineString<f64> = self
            .ring
            .iter()
            .map(|&(x, y)| Coord { x, y })
            .collect::<Vec<_>>()
            .into();
        Polygon::new(exterior, vec![])
    }

    /// Returns `true` if the ring is closed and has at least four points.
    #[must_use]
    pub fn has_valid_ring(&self) -> bool {
        self.ring.len() >= 4 && self.ring.first() == self.ring.last()
    }
}
