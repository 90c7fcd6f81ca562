use crate::paint::{checked, clipped, Edge};
use crate::PotentialField;
use electrostatics_grid::{primitives, Coordinate, Extent, Grid, GridError};
use nalgebra::RealField;

/// Marks which cells of a grid hold a fixed (Dirichlet) potential
///
/// A `true` cell is a boundary condition which no solver may alter, a `false` cell is an unknown.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BoundaryMask {
    mask: Grid<bool>,
}

impl BoundaryMask {
    /// A mask over `extent` with every cell free
    pub fn new(extent: Extent) -> Self {
        Self {
            mask: Grid::from_element(extent, false),
        }
    }

    pub fn from_grid(mask: Grid<bool>) -> Self {
        Self { mask }
    }

    pub fn extent(&self) -> &Extent {
        self.mask.extent()
    }

    pub fn grid(&self) -> &Grid<bool> {
        &self.mask
    }

    /// The flags in order of increasing linear position
    pub fn as_slice(&self) -> &[bool] {
        self.mask.as_slice()
    }

    pub fn is_boundary_condition(&self, i: i64, j: i64) -> Result<bool, GridError> {
        self.mask.get(i, j)
    }

    pub fn is_boundary_condition_k(&self, k: usize) -> Result<bool, GridError> {
        self.mask.get_k(k)
    }

    pub fn set_boundary_condition(&mut self, i: i64, j: i64, fixed: bool) -> Result<(), GridError> {
        self.mask.set(i, j, fixed)
    }

    pub fn set_boundary_condition_k(&mut self, k: usize, fixed: bool) -> Result<(), GridError> {
        self.mask.set_k(k, fixed)
    }

    /// Number of fixed cells
    pub fn count(&self) -> usize {
        self.as_slice().iter().filter(|&&fixed| fixed).count()
    }
}

/// A potential together with the mask of which potentials are fixed
///
/// Every boundary operation writes the mask and the potential together, and every addressed
/// cell is validated before either is changed.
#[derive(Clone, Debug, PartialEq)]
pub struct UnsolvedSystem<T: Copy + RealField> {
    potential: PotentialField<T>,
    mask: BoundaryMask,
}

impl<T: Copy + RealField> UnsolvedSystem<T> {
    /// A system over `extent` with zero potential and no boundary conditions
    pub fn new(extent: Extent) -> Self {
        Self {
            potential: PotentialField::new(extent),
            mask: BoundaryMask::new(extent),
        }
    }

    /// Pair an existing potential and mask, which must cover the same cells
    pub fn from_parts(potential: PotentialField<T>, mask: BoundaryMask) -> Result<Self, GridError> {
        potential.extent().ensure_matches(mask.extent())?;
        Ok(Self { potential, mask })
    }

    pub fn extent(&self) -> &Extent {
        self.potential.extent()
    }

    pub fn potential(&self) -> &PotentialField<T> {
        &self.potential
    }

    pub fn mask(&self) -> &BoundaryMask {
        &self.mask
    }

    /// Number of cells with a fixed potential
    pub fn boundary_count(&self) -> usize {
        self.mask.count()
    }

    pub fn get_potential(&self, i: i64, j: i64) -> Result<T, GridError> {
        self.potential.get(i, j)
    }

    pub fn is_boundary_condition(&self, i: i64, j: i64) -> Result<bool, GridError> {
        self.mask.is_boundary_condition(i, j)
    }

    pub fn is_boundary_condition_k(&self, k: usize) -> Result<bool, GridError> {
        self.mask.is_boundary_condition_k(k)
    }

    pub fn set_boundary_condition(&mut self, i: i64, j: i64, fixed: bool) -> Result<(), GridError> {
        self.mask.set_boundary_condition(i, j, fixed)
    }

    pub fn set_boundary_condition_k(&mut self, k: usize, fixed: bool) -> Result<(), GridError> {
        self.mask.set_boundary_condition_k(k, fixed)
    }

    /// Fix the potential of cell (`i`, `j`) at `value`
    pub fn set_boundary_point(&mut self, i: i64, j: i64, value: T) -> Result<(), GridError> {
        let k = self.extent().ij2k(i, j)?;
        self.fix(&[k], value);
        Ok(())
    }

    pub fn set_boundary_point_k(&mut self, k: usize, value: T) -> Result<(), GridError> {
        self.extent().k2ij(k)?;
        self.fix(&[k], value);
        Ok(())
    }

    /// Fix the outline of a circle, cells outside the grid are skipped
    pub fn set_boundary_ring(&mut self, centre: Coordinate, radius: f64, value: T) {
        let extent = *self.extent();
        let positions = clipped(&extent, primitives::ring_within(centre, radius, &extent));
        self.fix(&positions, value);
    }

    /// Fix a filled circle, cells outside the grid are skipped
    pub fn set_boundary_circle(&mut self, centre: Coordinate, radius: f64, value: T) {
        let extent = *self.extent();
        let positions = clipped(&extent, primitives::disc_within(centre, radius, &extent));
        self.fix(&positions, value);
    }

    /// Fix a straight line, failing without change if it leaves the grid
    pub fn set_boundary_line(
        &mut self,
        start: Coordinate,
        end: Coordinate,
        value: T,
    ) -> Result<(), GridError> {
        let positions = checked(self.extent(), primitives::line(start, end))?;
        self.fix(&positions, value);
        Ok(())
    }

    /// Fix the perimeter of a rectangle, failing without change if it leaves the grid
    pub fn set_boundary_rectangle(
        &mut self,
        a: Coordinate,
        b: Coordinate,
        value: T,
    ) -> Result<(), GridError> {
        let positions = checked(self.extent(), primitives::rectangle(a, b))?;
        self.fix(&positions, value);
        Ok(())
    }

    pub fn set_boundary_edge(&mut self, edge: Edge, value: T) {
        let (start, end) = edge.end_points(self.extent());
        let positions = clipped(self.extent(), primitives::line(start, end));
        self.fix(&positions, value);
    }

    pub fn set_left_boundary(&mut self, value: T) {
        self.set_boundary_edge(Edge::Left, value)
    }

    pub fn set_right_boundary(&mut self, value: T) {
        self.set_boundary_edge(Edge::Right, value)
    }

    pub fn set_top_boundary(&mut self, value: T) {
        self.set_boundary_edge(Edge::Top, value)
    }

    pub fn set_bottom_boundary(&mut self, value: T) {
        self.set_boundary_edge(Edge::Bottom, value)
    }

    // Positions must already be validated against the extent
    fn fix(&mut self, positions: &[usize], value: T) {
        self.potential.paint(positions, value);
        let mask = self.mask.mask.as_mut_slice();
        for &k in positions {
            mask[k] = true;
        }
    }
}

#[cfg(test)]
mod test {
    use super::{BoundaryMask, UnsolvedSystem};
    use crate::PotentialField;
    use electrostatics_grid::{Coordinate, Extent, GridError};

    fn reference_system() -> UnsolvedSystem<f64> {
        UnsolvedSystem::new(Extent::new(-18, 2, -8, 6).unwrap())
    }

    #[test]
    fn boundary_flags_set_by_ij_are_read_back_by_k() {
        let mut system = reference_system();
        system.set_boundary_condition(1, 5, true).unwrap();
        let k = system.extent().ij2k(1, 5).unwrap();
        assert!(system.is_boundary_condition_k(k).unwrap());
        system.set_boundary_condition_k(k, false).unwrap();
        assert!(!system.is_boundary_condition(1, 5).unwrap());
    }

    #[test]
    fn out_of_range_flags_are_rejected() {
        let mut system = reference_system();
        assert!(system.is_boundary_condition(-19, 0).is_err());
        assert!(system.is_boundary_condition_k(315).is_err());
        assert!(system.set_boundary_condition(3, 0, true).is_err());
        assert!(system.set_boundary_condition_k(315, true).is_err());
        assert_eq!(system.boundary_count(), 0);
    }

    #[test]
    fn boundary_points_fix_the_potential() {
        let mut system = reference_system();
        system.set_boundary_point(-3, 2, 5.5).unwrap();
        assert!(system.is_boundary_condition(-3, 2).unwrap());
        assert_eq!(system.get_potential(-3, 2).unwrap(), 5.5);

        system.set_boundary_point_k(0, -1.0).unwrap();
        assert_eq!(system.get_potential(-18, -8).unwrap(), -1.0);
        assert_eq!(system.boundary_count(), 2);
    }

    #[test]
    fn boundary_points_off_the_grid_change_nothing() {
        let mut system = reference_system();
        assert!(matches!(
            system.set_boundary_point(3, 0, 5.0),
            Err(GridError::OutOfRange { .. })
        ));
        assert!(system.set_boundary_point_k(315, 5.0).is_err());
        assert_eq!(system.boundary_count(), 0);
        assert!(system.potential().as_slice().iter().all(|&x| x == 0.0));
    }

    #[test]
    fn rings_off_the_edge_fix_only_cells_on_the_grid() {
        let mut system = reference_system();
        system.set_boundary_ring(Coordinate::new(0, 4), 4.0, 2.0);
        let expected = electrostatics_grid::primitives::ring(Coordinate::new(0, 4), 4.0)
            .into_iter()
            .filter(|point| system.extent().contains(point.i, point.j))
            .count();
        assert_eq!(system.boundary_count(), expected);
        assert!(system.is_boundary_condition(-4, 4).unwrap());
        assert!(!system.is_boundary_condition(0, 4).unwrap());
    }

    #[test]
    fn circles_fix_every_cell_inside() {
        let mut system = reference_system();
        system.set_boundary_circle(Coordinate::new(-10, 0), 1.0, 7.0);
        assert_eq!(system.boundary_count(), 5);
        assert_eq!(system.get_potential(-10, 1).unwrap(), 7.0);
    }

    #[test]
    fn circles_far_larger_than_the_grid_are_clipped() {
        let mut system = reference_system();
        system.set_boundary_ring(Coordinate::new(0, 0), 1e15, 1.0);
        assert_eq!(system.boundary_count(), 0);
        system.set_boundary_circle(Coordinate::new(0, 0), 1e15, 1.0);
        assert_eq!(system.boundary_count(), 315);
    }

    #[test]
    fn rectangles_which_leave_the_grid_fix_nothing() {
        let mut system = reference_system();
        assert!(system
            .set_boundary_rectangle(Coordinate::new(-2, -2), Coordinate::new(4, 2), 1.0)
            .is_err());
        assert_eq!(system.boundary_count(), 0);

        system
            .set_boundary_rectangle(Coordinate::new(-2, -2), Coordinate::new(2, 2), 1.0)
            .unwrap();
        assert_eq!(system.boundary_count(), 16);
        assert!(!system.is_boundary_condition(0, 0).unwrap());
    }

    #[test]
    fn edges_fix_the_outer_cells() {
        let mut system = reference_system();
        system.set_left_boundary(1.0);
        system.set_right_boundary(2.0);
        assert_eq!(system.boundary_count(), 30);
        system.set_top_boundary(3.0);
        system.set_bottom_boundary(4.0);
        assert_eq!(system.boundary_count(), 2 * 21 + 2 * 15 - 4);
        // later edges overwrite the corners
        assert_eq!(system.get_potential(-18, 6).unwrap(), 3.0);
        assert_eq!(system.get_potential(2, -8).unwrap(), 4.0);
    }

    #[test]
    fn parts_must_share_an_extent() {
        let potential = PotentialField::<f64>::new(Extent::new(0, 4, 0, 4).unwrap());
        let mask = BoundaryMask::new(Extent::new(0, 4, 0, 3).unwrap());
        assert!(matches!(
            UnsolvedSystem::from_parts(potential.clone(), mask),
            Err(GridError::DimensionMismatch { .. })
        ));
        let mask = BoundaryMask::new(*potential.extent());
        assert!(UnsolvedSystem::from_parts(potential, mask).is_ok());
    }
}
