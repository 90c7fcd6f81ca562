//! # Operator
//!
//! Assembles the finite difference Laplace operator of an unsolved system as a sparse matrix.
//!
//! Each row `k` of the system corresponds to one grid cell. A boundary cell contributes the
//! identity row `V(k) = V_fixed`, every other cell the discrete Laplacian
//! `Σ V(neighbour) - n V(k) = 0` where `n` is the number of neighbours the cell actually has.

use crate::{SolveError, UnsolvedSystem};
use nalgebra::{DVector, RealField};
use nalgebra_sparse::CsrMatrix;

pub struct OperatorAssemblerBuilder<RefSystem> {
    system: RefSystem,
}

impl OperatorAssemblerBuilder<()> {
    pub fn new() -> Self {
        Self { system: () }
    }
}

impl Default for OperatorAssemblerBuilder<()> {
    fn default() -> Self {
        Self::new()
    }
}

impl<RefSystem> OperatorAssemblerBuilder<RefSystem> {
    pub fn with_system<System>(self, system: &System) -> OperatorAssemblerBuilder<&System> {
        OperatorAssemblerBuilder { system }
    }
}

pub struct OperatorAssembler<'a, T: Copy + RealField> {
    system: &'a UnsolvedSystem<T>,
}

impl<'a, T: Copy + RealField> OperatorAssemblerBuilder<&'a UnsolvedSystem<T>> {
    pub fn build(self) -> OperatorAssembler<'a, T> {
        OperatorAssembler {
            system: self.system,
        }
    }
}

impl<'a, T: Copy + RealField> OperatorAssembler<'a, T> {
    fn num_rows(&self) -> usize {
        self.system.extent().num_cells()
    }

    /// The operator, with at most five non-zeros per row stored in ascending column order
    #[tracing::instrument(name = "Operator assembly", level = "debug", skip(self))]
    pub fn assemble_matrix(&self) -> Result<CsrMatrix<T>, SolveError> {
        let extent = self.system.extent();
        let fixed = self.system.mask().as_slice();
        let n = self.num_rows();

        let mut row_offsets = Vec::with_capacity(n + 1);
        let mut col_indices = Vec::with_capacity(5 * n);
        let mut values = Vec::with_capacity(5 * n);
        row_offsets.push(0);

        for (k, &is_fixed) in fixed.iter().enumerate() {
            if is_fixed {
                col_indices.push(k);
                values.push(T::one());
            } else {
                let neighbours = extent.neighbours(k);
                let diagonal = -nalgebra::convert::<f64, T>(neighbours.len() as f64);
                let mut diagonal_pending = true;
                for &neighbour in neighbours.iter() {
                    if diagonal_pending && neighbour > k {
                        col_indices.push(k);
                        values.push(diagonal);
                        diagonal_pending = false;
                    }
                    col_indices.push(neighbour);
                    values.push(T::one());
                }
                if diagonal_pending {
                    col_indices.push(k);
                    values.push(diagonal);
                }
            }
            row_offsets.push(col_indices.len());
        }
        tracing::trace!(
            "Assembled {n} x {n} operator with {} non-zeros",
            values.len()
        );

        CsrMatrix::try_from_csr_data(n, n, row_offsets, col_indices, values)
            .map_err(|e| SolveError::Csr(e.to_string()))
    }

    /// The right hand side: fixed potentials in boundary rows, zero elsewhere
    pub fn assemble_vector(&self) -> DVector<T> {
        let fixed = self.system.mask().as_slice();
        let potential = self.system.potential().as_slice();
        DVector::from_iterator(
            self.num_rows(),
            fixed
                .iter()
                .zip(potential)
                .map(|(&is_fixed, &value)| if is_fixed { value } else { T::zero() }),
        )
    }
}
