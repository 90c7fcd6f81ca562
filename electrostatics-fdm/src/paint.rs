//! Placement of rasterised shapes onto a grid of known extent

use electrostatics_grid::{Coordinate, Extent, GridError};

/// One of the four outer edges of a grid
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Edge {
    Left,
    Right,
    Top,
    Bottom,
}

impl Edge {
    /// The end points of the edge on a grid covering `extent`
    pub(crate) fn end_points(&self, extent: &Extent) -> (Coordinate, Coordinate) {
        let (i_min, i_max, j_min, j_max) = (
            extent.i_min(),
            extent.i_max(),
            extent.j_min(),
            extent.j_max(),
        );
        match self {
            Edge::Left => (Coordinate::new(i_min, j_min), Coordinate::new(i_min, j_max)),
            Edge::Right => (Coordinate::new(i_max, j_min), Coordinate::new(i_max, j_max)),
            Edge::Top => (Coordinate::new(i_min, j_max), Coordinate::new(i_max, j_max)),
            Edge::Bottom => (Coordinate::new(i_min, j_min), Coordinate::new(i_max, j_min)),
        }
    }
}

/// The linear positions of the points inside `extent`, silently dropping the rest
pub(crate) fn clipped(extent: &Extent, points: Vec<Coordinate>) -> Vec<usize> {
    points
        .into_iter()
        .filter_map(|point| extent.ij2k(point.i, point.j).ok())
        .collect()
}

/// The linear positions of every point, failing on the first point outside `extent`
pub(crate) fn checked(extent: &Extent, points: Vec<Coordinate>) -> Result<Vec<usize>, GridError> {
    points
        .into_iter()
        .map(|point| extent.ij2k(point.i, point.j))
        .collect()
}
