//! Boundary polygons and the even-odd containment test.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::coord::{Coordinate, GeoBounds};

/// Minimum number of vertices for a closed polygon.
pub const MIN_VERTICES: usize = 3;

/// Reasons a vertex list cannot form a boundary polygon.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PolygonError {
    /// Fewer than three vertices.
    #[error("polygon needs at least 3 vertices, got {0}")]
    TooFewVertices(usize),

    /// A vertex contains NaN or infinity.
    #[error("vertex {0} is not a finite coordinate")]
    NonFiniteVertex(usize),
}

/// A simple closed polygon in geographic-degree space.
///
/// The closing edge from the last vertex back to the first is implicit.
/// Vertex winding does not matter to [`is_inside`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<[f64; 2]>", into = "Vec<[f64; 2]>")]
pub struct BoundaryPolygon {
    vertices: Vec<Coordinate>,
}

impl BoundaryPolygon {
    /// Build a polygon from its vertices.
    pub fn new(vertices: Vec<Coordinate>) -> Result<Self, PolygonError> {
        if vertices.len() < MIN_VERTICES {
            return Err(PolygonError::TooFewVertices(vertices.len()));
        }
        if let Some(index) = vertices
            .iter()
            .position(|v| !v.latitude.is_finite() || !v.longitude.is_finite())
        {
            return Err(PolygonError::NonFiniteVertex(index));
        }
        Ok(Self { vertices })
    }

    /// Build a polygon from `(latitude, longitude)` pairs.
    pub fn from_pairs(pairs: &[(f64, f64)]) -> Result<Self, PolygonError> {
        Self::new(
            pairs
                .iter()
                .map(|&(lat, lon)| Coordinate::new(lat, lon))
                .collect(),
        )
    }

    /// Polygon vertices in their configured order.
    pub fn vertices(&self) -> &[Coordinate] {
        &self.vertices
    }

    /// Number of vertices.
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Always false for a constructed polygon; provided for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Axis-aligned bounding box of the vertices.
    pub fn bounds(&self) -> GeoBounds {
        let first = self.vertices[0];
        let mut bounds = GeoBounds::from_point(first.latitude, first.longitude);
        for v in &self.vertices[1..] {
            bounds.expand(v.latitude, v.longitude);
        }
        bounds
    }

    /// Whether `point` lies inside this polygon.
    ///
    /// Points outside the bounding box are rejected before the ray cast.
    pub fn contains(&self, point: &Coordinate) -> bool {
        self.bounds().contains(point) && is_inside(point, self)
    }
}

impl TryFrom<Vec<[f64; 2]>> for BoundaryPolygon {
    type Error = PolygonError;

    fn try_from(pairs: Vec<[f64; 2]>) -> Result<Self, Self::Error> {
        Self::new(
            pairs
                .into_iter()
                .map(|[lat, lon]| Coordinate::new(lat, lon))
                .collect(),
        )
    }
}

impl From<BoundaryPolygon> for Vec<[f64; 2]> {
    fn from(polygon: BoundaryPolygon) -> Self {
        polygon
            .vertices
            .into_iter()
            .map(|v| [v.latitude, v.longitude])
            .collect()
    }
}

/// Even-odd (ray casting) point-in-polygon test.
///
/// Treats latitude as `x` and longitude as `y`, casts a ray towards increasing
/// `x`, and toggles the result for every edge it crosses. An edge `(v_i, v_j)`
/// counts when the point's `y` is strictly on one side of `y_i` and not of
/// `y_j`, and the edge's intercept at that `y` lies strictly beyond the
/// point's `x`.
///
/// Points exactly on an edge or vertex may land on either side, but the
/// answer for a given input never changes.
pub fn is_inside(point: &Coordinate, polygon: &BoundaryPolygon) -> bool {
    let (px, py) = (point.latitude, point.longitude);
    let vertices = polygon.vertices();
    let mut inside = false;

    let mut j = vertices.len() - 1;
    for i in 0..vertices.len() {
        let (xi, yi) = (vertices[i].latitude, vertices[i].longitude);
        let (xj, yj) = (vertices[j].latitude, vertices[j].longitude);

        // (yi > py) != (yj > py) guarantees yj != yi, so the division is safe
        let crosses = (yi > py) != (yj > py) && px < (xj - xi) * (py - yi) / (yj - yi) + xi;
        if crosses {
            inside = !inside;
        }
        j = i;
    }

    inside
}
