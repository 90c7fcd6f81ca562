use electrostatics_grid::{Extent, Grid, GridError};
use nalgebra::RealField;

/// The electric field derived from a potential, `E = -∇V`, sampled at every grid cell
#[derive(Clone, Debug, PartialEq)]
pub struct ElectricField<T: Copy + RealField> {
    x: Grid<T>,
    y: Grid<T>,
    magnitude: Grid<T>,
    maximum_magnitude: T,
}

impl<T: Copy + RealField> ElectricField<T> {
    /// Differentiate `potential` by central differences
    ///
    /// Interior cells use `-(V(i+1) - V(i-1)) / 2`. Cells on an edge fall back to the one-sided
    /// difference towards the interior, and a component along an axis only one cell long is zero.
    #[tracing::instrument(name = "Electric field", level = "debug", skip(potential))]
    pub fn from_potential(potential: &Grid<T>) -> Self {
        let extent = *potential.extent();
        let values = potential.as_slice();
        let width = extent.width();
        let half = nalgebra::convert::<f64, T>(0.5);

        let mut x = Grid::zeros(extent);
        let mut y = Grid::zeros(extent);
        let mut magnitude = Grid::zeros(extent);
        let mut maximum_magnitude = T::zero();

        for (k, coordinate) in extent.coordinates().enumerate() {
            let ex = derivative(
                values,
                k,
                1,
                coordinate.i == extent.i_min(),
                coordinate.i == extent.i_max(),
                half,
            );
            let ey = derivative(
                values,
                k,
                width,
                coordinate.j == extent.j_min(),
                coordinate.j == extent.j_max(),
                half,
            );
            let norm = (ex * ex + ey * ey).sqrt();
            maximum_magnitude = maximum_magnitude.max(norm);
            x.as_mut_slice()[k] = ex;
            y.as_mut_slice()[k] = ey;
            magnitude.as_mut_slice()[k] = norm;
        }

        Self {
            x,
            y,
            magnitude,
            maximum_magnitude,
        }
    }

    pub fn extent(&self) -> &Extent {
        self.x.extent()
    }

    pub fn x(&self) -> &Grid<T> {
        &self.x
    }

    pub fn y(&self) -> &Grid<T> {
        &self.y
    }

    pub fn magnitude(&self) -> &Grid<T> {
        &self.magnitude
    }

    /// The largest field magnitude anywhere on the grid
    pub fn maximum_magnitude(&self) -> T {
        self.maximum_magnitude
    }

    /// The (x, y) components at cell (`i`, `j`)
    pub fn get(&self, i: i64, j: i64) -> Result<(T, T), GridError> {
        Ok((self.x.get(i, j)?, self.y.get(i, j)?))
    }
}

// Negative derivative along the axis whose neighbours sit `stride` apart in storage
fn derivative<T: Copy + RealField>(
    values: &[T],
    k: usize,
    stride: usize,
    at_lower_edge: bool,
    at_upper_edge: bool,
    half: T,
) -> T {
    match (at_lower_edge, at_upper_edge) {
        (true, true) => T::zero(),
        (true, false) => -(values[k + stride] - values[k]),
        (false, true) => -(values[k] - values[k - stride]),
        (false, false) => -(values[k + stride] - values[k - stride]) * half,
    }
}

#[cfg(test)]
mod test {
    use super::ElectricField;
    use approx::assert_relative_eq;
    use electrostatics_grid::{Extent, Grid};

    #[test]
    fn a_linear_ramp_has_a_constant_field() {
        let extent = Extent::new(-4, 5, -2, 3).unwrap();
        let mut potential = Grid::zeros(extent);
        for coordinate in extent.coordinates() {
            potential
                .set(
                    coordinate.i,
                    coordinate.j,
                    2.0 * coordinate.i as f64 - 0.5 * coordinate.j as f64,
                )
                .unwrap();
        }
        let field = ElectricField::from_potential(&potential);
        for coordinate in extent.coordinates() {
            let (ex, ey) = field.get(coordinate.i, coordinate.j).unwrap();
            assert_relative_eq!(ex, -2.0, epsilon = 1e-12);
            assert_relative_eq!(ey, 0.5, epsilon = 1e-12);
        }
        assert_relative_eq!(field.maximum_magnitude(), 4.25f64.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn a_single_column_has_no_horizontal_field() {
        let extent = Extent::new(0, 0, 0, 2).unwrap();
        let potential = Grid::from_matrix(
            &nalgebra::DMatrix::from_row_slice(3, 1, &[0.0, 1.0, 4.0]),
            0,
            0,
        )
        .unwrap();
        assert_eq!(potential.extent(), &extent);
        let field = ElectricField::from_potential(&potential);
        assert_eq!(field.x().as_slice(), &[0.0, 0.0, 0.0]);
        assert_eq!(field.y().as_slice(), &[-1.0, -2.0, -3.0]);
    }

    #[test]
    fn a_non_constant_potential_never_has_zero_maximum_field() {
        let extent = Extent::new(0, 6, 0, 6).unwrap();
        let mut potential = Grid::zeros(extent);
        potential.set(3, 3, 1.0).unwrap();
        let field = ElectricField::from_potential(&potential);
        assert!(field.maximum_magnitude() > 0.0);

        let flat = Grid::from_element(extent, 7.0);
        assert_eq!(ElectricField::from_potential(&flat).maximum_magnitude(), 0.0);
    }
}
