//! # Analytical
//!
//! Closed-form potentials of a few standard configurations, used to check numerical solutions.
//! All configurations are centred on the grid origin `(0, 0)`.

use crate::PotentialField;
use electrostatics_grid::{Extent, Grid};
use nalgebra::RealField;
use std::f64::consts::FRAC_PI_2;

/// Potential between two coaxial cylinders
///
/// The inner cylinder of radius `radius_a` is held at `potential_a` and everything at or beyond
/// `radius_b` at `potential_b`. Between them the potential varies with the logarithm of the
/// distance from the axis.
pub fn coaxial_cylinders(
    i: i64,
    j: i64,
    radius_a: f64,
    radius_b: f64,
    potential_a: f64,
    potential_b: f64,
) -> f64 {
    let radius = ((i * i + j * j) as f64).sqrt();
    if radius > radius_b {
        potential_b
    } else if radius > radius_a {
        potential_a + (potential_b - potential_a) / (radius_b / radius_a).ln() * (radius / radius_a).ln()
    } else {
        potential_a
    }
}

/// Potential around a grounded cylinder of `cylinder_radius` placed in a uniform field
///
/// Zero on and inside the cylinder. Outside it is `±E cos θ (R² / r - r)` with `θ = atan(j / i)`,
/// taking `θ = π / 2` on the `j` axis and the sign of `i`.
pub fn cylinder_in_uniform_field(i: i64, j: i64, cylinder_radius: f64, uniform_field: f64) -> f64 {
    let radius = ((i * i + j * j) as f64).sqrt();
    if radius <= cylinder_radius {
        return 0.0;
    }
    let theta = if i == 0 {
        FRAC_PI_2
    } else {
        (j as f64 / i as f64).atan()
    };
    let sign = if i >= 0 { 1.0 } else { -1.0 };
    sign * uniform_field * theta.cos() * (cylinder_radius.powi(2) / radius - radius)
}

/// The field strength between two plates at `left_position` and `right_position`
pub fn uniform_field(
    left_position: f64,
    right_position: f64,
    left_potential: f64,
    right_potential: f64,
) -> f64 {
    (left_potential - right_potential) / (right_position - left_position)
}

/// Potential at column `i` between two plates, held constant beyond either plate
pub fn parallel_plates(
    i: i64,
    left_position: i64,
    right_position: i64,
    left_potential: f64,
    right_potential: f64,
) -> f64 {
    if i <= left_position {
        return left_potential;
    }
    if i >= right_position {
        return right_potential;
    }
    let fraction = (i - left_position) as f64 / (right_position - left_position) as f64;
    left_potential + (right_potential - left_potential) * fraction
}

/// Fill a field over `extent` by evaluating `potential` at every cell
pub fn tabulate<T, F>(extent: Extent, mut potential: F) -> PotentialField<T>
where
    T: Copy + RealField,
    F: FnMut(i64, i64) -> f64,
{
    let mut grid = Grid::zeros(extent);
    for (cell, coordinate) in grid.as_mut_slice().iter_mut().zip(extent.coordinates()) {
        *cell = nalgebra::convert::<f64, T>(potential(coordinate.i, coordinate.j));
    }
    PotentialField::from_grid(grid)
}

/// The coaxial cylinder potential tabulated over `extent`
pub fn coaxial_cylinders_field<T: Copy + RealField>(
    extent: Extent,
    radius_a: f64,
    radius_b: f64,
    potential_a: f64,
    potential_b: f64,
) -> PotentialField<T> {
    tabulate(extent, |i, j| {
        coaxial_cylinders(i, j, radius_a, radius_b, potential_a, potential_b)
    })
}

/// A grounded cylinder between plates on the left and right edges of `extent`
pub fn cylinder_between_plates_field<T: Copy + RealField>(
    extent: Extent,
    left_potential: f64,
    right_potential: f64,
    cylinder_radius: f64,
) -> PotentialField<T> {
    let field = uniform_field(
        extent.i_min() as f64,
        extent.i_max() as f64,
        left_potential,
        right_potential,
    );
    tabulate(extent, |i, j| {
        cylinder_in_uniform_field(i, j, cylinder_radius, field)
    })
}

/// Linear ramp between plates on the left and right edges of `extent`
pub fn parallel_plates_field<T: Copy + RealField>(
    extent: Extent,
    left_potential: f64,
    right_potential: f64,
) -> PotentialField<T> {
    tabulate(extent, |i, _| {
        parallel_plates(
            i,
            extent.i_min(),
            extent.i_max(),
            left_potential,
            right_potential,
        )
    })
}
