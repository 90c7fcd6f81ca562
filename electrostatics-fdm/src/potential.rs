use crate::paint::{checked, clipped, Edge};
use crate::ElectricField;
use electrostatics_grid::{primitives, Coordinate, Extent, Grid, GridError};
use nalgebra::{DMatrix, RealField};
use std::fmt;

/// The electric potential at every cell of a rectangular grid
///
/// On its own a `PotentialField` is a solved system. The derived electric field is cached the
/// first time it is requested and is not refreshed when potentials change afterwards: call
/// `compute_electric_field` to recompute it.
#[derive(Clone, Debug, PartialEq)]
pub struct PotentialField<T: Copy + RealField> {
    potential: Grid<T>,
    field: Option<ElectricField<T>>,
}

impl<T: Copy + RealField> PotentialField<T> {
    /// A zero potential over `extent`
    pub fn new(extent: Extent) -> Self {
        Self::from_grid(Grid::zeros(extent))
    }

    pub fn from_grid(potential: Grid<T>) -> Self {
        Self {
            potential,
            field: None,
        }
    }

    /// Wraps a dense matrix whose rows run over `j` and columns over `i`
    pub fn from_matrix(matrix: &DMatrix<T>, i_min: i64, j_min: i64) -> Result<Self, GridError> {
        Ok(Self::from_grid(Grid::from_matrix(matrix, i_min, j_min)?))
    }

    pub fn extent(&self) -> &Extent {
        self.potential.extent()
    }

    pub fn grid(&self) -> &Grid<T> {
        &self.potential
    }

    /// The potentials in order of increasing linear position
    pub fn as_slice(&self) -> &[T] {
        self.potential.as_slice()
    }

    pub fn get(&self, i: i64, j: i64) -> Result<T, GridError> {
        self.potential.get(i, j)
    }

    pub fn get_k(&self, k: usize) -> Result<T, GridError> {
        self.potential.get_k(k)
    }

    pub fn set(&mut self, i: i64, j: i64, value: T) -> Result<(), GridError> {
        self.potential.set(i, j, value)
    }

    pub fn set_k(&mut self, k: usize, value: T) -> Result<(), GridError> {
        self.potential.set_k(k, value)
    }

    /// Paint the outline of a circle, cells outside the grid are skipped
    pub fn set_ring(&mut self, centre: Coordinate, radius: f64, value: T) {
        let extent = *self.extent();
        let positions = clipped(&extent, primitives::ring_within(centre, radius, &extent));
        self.paint(&positions, value);
    }

    /// Paint a filled circle, cells outside the grid are skipped
    pub fn set_circle(&mut self, centre: Coordinate, radius: f64, value: T) {
        let extent = *self.extent();
        let positions = clipped(&extent, primitives::disc_within(centre, radius, &extent));
        self.paint(&positions, value);
    }

    /// Paint a straight line between two cells
    ///
    /// Fails without painting anything if any cell along the line lies outside the grid.
    pub fn set_line(&mut self, start: Coordinate, end: Coordinate, value: T) -> Result<(), GridError> {
        let positions = checked(self.extent(), primitives::line(start, end))?;
        self.paint(&positions, value);
        Ok(())
    }

    /// Paint the perimeter of the rectangle with opposite corners `a` and `b`
    pub fn set_rectangle(&mut self, a: Coordinate, b: Coordinate, value: T) -> Result<(), GridError> {
        let positions = checked(self.extent(), primitives::rectangle(a, b))?;
        self.paint(&positions, value);
        Ok(())
    }

    pub fn set_edge(&mut self, edge: Edge, value: T) {
        let (start, end) = edge.end_points(self.extent());
        let positions = clipped(self.extent(), primitives::line(start, end));
        self.paint(&positions, value);
    }

    pub fn set_left(&mut self, value: T) {
        self.set_edge(Edge::Left, value)
    }

    pub fn set_right(&mut self, value: T) {
        self.set_edge(Edge::Right, value)
    }

    pub fn set_top(&mut self, value: T) {
        self.set_edge(Edge::Top, value)
    }

    pub fn set_bottom(&mut self, value: T) {
        self.set_edge(Edge::Bottom, value)
    }

    /// The cell-wise difference `self - other`
    pub fn compare_to(&self, other: &PotentialField<T>) -> Result<PotentialField<T>, GridError> {
        let difference = self.potential.zip_map(&other.potential, |a, b| a - b)?;
        Ok(Self::from_grid(difference))
    }

    /// Overwrite every potential with those of `other`, the cached field is left untouched
    pub fn copy_from(&mut self, other: &PotentialField<T>) -> Result<(), GridError> {
        self.potential.copy_from(&other.potential)
    }

    /// The electric field, computed on first request and cached thereafter
    pub fn electric_field(&mut self) -> &ElectricField<T> {
        let potential = &self.potential;
        self.field
            .get_or_insert_with(|| ElectricField::from_potential(potential))
    }

    /// Recompute the electric field from the current potentials
    pub fn compute_electric_field(&mut self) -> &ElectricField<T> {
        self.field.insert(ElectricField::from_potential(&self.potential))
    }

    /// The cached electric field, if one has been computed
    pub fn cached_electric_field(&self) -> Option<&ElectricField<T>> {
        self.field.as_ref()
    }

    pub(crate) fn paint(&mut self, positions: &[usize], value: T) {
        let values = self.potential.as_mut_slice();
        for &k in positions {
            values[k] = value;
        }
    }
}

/// Prints the grid as it would be drawn, `j_max` on the top line and `i` increasing to the right
impl<T: Copy + RealField + fmt::Display> fmt::Display for PotentialField<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let extent = self.extent();
        for j in (extent.j_min()..=extent.j_max()).rev() {
            let row = (extent.i_min()..=extent.i_max())
                .map(|i| self.get(i, j).map(|value| value.to_string()))
                .collect::<Result<Vec<_>, _>>()
                .map_err(|_| fmt::Error)?;
            writeln!(f, "{}", row.join(" "))?;
        }
        Ok(())
    }
}
