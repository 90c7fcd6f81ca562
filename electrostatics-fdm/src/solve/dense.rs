use super::SparseSolver;
use crate::SolveError;
use nalgebra::{DVector, RealField};
use nalgebra_sparse::CsrMatrix;

// Above this many unknowns the dense matrix alone runs to hundreds of megabytes
const DENSE_WARNING_THRESHOLD: usize = 4096;

/// Direct solution by dense LU decomposition with partial pivoting
///
/// Storage and work grow as `n²` and `n³`, this is intended for small grids and for checking
/// the other backends.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct DenseLu;

impl<T: Copy + RealField> SparseSolver<T> for DenseLu {
    #[tracing::instrument(name = "Dense LU", level = "debug", skip_all)]
    fn solve(
        &self,
        matrix: &CsrMatrix<T>,
        rhs: &DVector<T>,
        _initial: &DVector<T>,
    ) -> Result<DVector<T>, SolveError> {
        if matrix.nrows() > DENSE_WARNING_THRESHOLD {
            tracing::warn!(
                "Dense LU of a {} x {} system, consider a sparse method",
                matrix.nrows(),
                matrix.ncols()
            );
        }
        let dense = nalgebra_sparse::convert::serial::convert_csr_dense(matrix);
        let lu = dense.lu();
        if !lu.is_invertible() {
            let row = (0..lu.u().nrows())
                .find(|&k| lu.u()[(k, k)] == T::zero())
                .unwrap_or(0);
            return Err(SolveError::Singular { row });
        }
        lu.solve(rhs).ok_or(SolveError::Singular { row: 0 })
    }
}
