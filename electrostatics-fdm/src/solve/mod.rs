//! # Solve
//!
//! Direct and iterative solution of the assembled finite difference system.
//!
//! A solve assembles the operator of an `UnsolvedSystem`, hands it to the backend selected by a
//! [`Method`] and scatters the solution back onto the grid. Systems without a unique solution are
//! rejected before any backend runs.

mod bicgstab;
mod dense;
mod lu;

pub use bicgstab::BiCgStab;
pub use dense::DenseLu;
pub use lu::{BandedLu, SparseLu};

use crate::operator::OperatorAssemblerBuilder;
use crate::{MethodParseError, PotentialField, SolveError, UnsolvedSystem};
use electrostatics_grid::Grid;
use itertools::izip;
use nalgebra::{DVector, RealField};
use nalgebra_sparse::CsrMatrix;
use std::fmt;
use std::str::FromStr;

/// A backend able to solve `matrix · x = rhs`
pub trait SparseSolver<T: Copy + RealField> {
    /// Solve the system, `initial` is a starting guess which direct methods may ignore
    fn solve(
        &self,
        matrix: &CsrMatrix<T>,
        rhs: &DVector<T>,
        initial: &DVector<T>,
    ) -> Result<DVector<T>, SolveError>;
}

/// The available linear solvers
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Method {
    /// Jacobi preconditioned stabilised biconjugate gradient
    BiCgStab,
    /// Banded LU factorisation
    SparseLu,
    /// Dense LU factorisation, for small systems
    DenseLu,
}

impl Method {
    pub fn key(&self) -> &'static str {
        match self {
            Method::BiCgStab => "bicgstab",
            Method::SparseLu => "sparselu",
            Method::DenseLu => "denselu",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

impl FromStr for Method {
    type Err = MethodParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "bicgstab" | "eigenbicon" | "viennabicon" => Ok(Method::BiCgStab),
            "sparselu" | "eigensparselu" => Ok(Method::SparseLu),
            "denselu" => Ok(Method::DenseLu),
            _ => Err(MethodParseError(s.to_string())),
        }
    }
}

/// Convergence controls for the iterative backends
#[derive(Clone, Debug, PartialEq)]
pub struct LinearSolverSettings<T> {
    /// Relative residual `|b - Ax| / |b|` at which iteration stops
    pub tolerance: T,
    pub maximum_iterations: usize,
}

impl<T: Copy + RealField> Default for LinearSolverSettings<T> {
    fn default() -> Self {
        Self {
            tolerance: nalgebra::convert(1e-10),
            maximum_iterations: 10_000,
        }
    }
}

/// Assemble and solve `system` with the chosen backend
///
/// Boundary cells of the result hold exactly the fixed potentials of `system`.
#[tracing::instrument(name = "Linear solve", level = "info", skip(system, settings))]
pub fn solve_linear_system<T: Copy + RealField>(
    system: &UnsolvedSystem<T>,
    method: Method,
    settings: &LinearSolverSettings<T>,
) -> Result<PotentialField<T>, SolveError> {
    check_well_posed(system)?;

    let assembler = OperatorAssemblerBuilder::new().with_system(system).build();
    let matrix = assembler.assemble_matrix()?;
    let rhs = assembler.assemble_vector();
    let initial = DVector::from_column_slice(system.potential().as_slice());

    let solution = match method {
        Method::BiCgStab => BiCgStab::from(settings).solve(&matrix, &rhs, &initial),
        Method::SparseLu => SparseLu.solve(&matrix, &rhs, &initial),
        Method::DenseLu => DenseLu.solve(&matrix, &rhs, &initial),
    }?;

    if let Some(k) = solution.iter().position(|value| !value.is_finite()) {
        return Err(SolveError::NonFinite { k });
    }

    let fixed = system.mask().as_slice();
    let seed = system.potential().as_slice();
    let mut solved = Grid::zeros(*system.extent());
    for (cell, &is_fixed, &seed, &value) in
        izip!(solved.as_mut_slice().iter_mut(), fixed, seed, solution.iter())
    {
        *cell = if is_fixed { seed } else { value };
    }
    tracing::info!("Solved {} cells with {}", solution.len(), method);
    Ok(PotentialField::from_grid(solved))
}

/// Reject systems whose operator is singular
///
/// The grid is connected, so once a single cell is fixed every free cell is linked to it through
/// its neighbours and the discrete Laplacian has a unique solution.
pub fn check_well_posed<T: Copy + RealField>(system: &UnsolvedSystem<T>) -> Result<(), SolveError> {
    if system.boundary_count() == 0 {
        return Err(SolveError::NoBoundaryConditions);
    }
    Ok(())
}

// y = A x
pub(crate) fn multiply_into<T: Copy + RealField>(
    matrix: &CsrMatrix<T>,
    x: &DVector<T>,
    y: &mut DVector<T>,
) {
    for (row, value) in matrix.row_iter().zip(y.iter_mut()) {
        *value = row
            .col_indices()
            .iter()
            .zip(row.values())
            .fold(T::zero(), |acc, (&col, &entry)| acc + entry * x[col]);
    }
}
