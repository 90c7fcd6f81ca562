use super::SparseSolver;
use crate::SolveError;
use nalgebra::{DVector, RealField};
use nalgebra_sparse::CsrMatrix;

/// The largest band, in stored values, `SparseLu` will allocate. One gibibyte of `f64`.
pub const BAND_ENTRY_LIMIT: usize = 1 << 27;

/// Direct solution by banded LU factorisation
///
/// The operator of an `m`-wide grid couples each cell only to cells at most `m` positions away,
/// so the factors fit inside a band of half-width `m` and the cost is `O(n m²)` rather than
/// `O(n³)`. Rows are not pivoted: the operator is diagonally dominant, and a pivot which is
/// negligible against the largest coefficient of its row is reported as `Singular`.
///
/// The band is stored densely, so systems needing more than [`BAND_ENTRY_LIMIT`] stored values
/// are refused with `BandTooLarge` before anything is allocated.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SparseLu;

impl<T: Copy + RealField> SparseSolver<T> for SparseLu {
    #[tracing::instrument(name = "Banded LU", level = "debug", skip_all)]
    fn solve(
        &self,
        matrix: &CsrMatrix<T>,
        rhs: &DVector<T>,
        _initial: &DVector<T>,
    ) -> Result<DVector<T>, SolveError> {
        let factorisation = BandedLu::factor(matrix)?;
        Ok(factorisation.solve(rhs))
    }
}

/// An LU factorisation stored as a dense band
///
/// Row `r` holds columns `r - bandwidth ..= r + bandwidth`. The unit lower factor and the upper
/// factor share storage.
#[derive(Clone, Debug)]
pub struct BandedLu<T> {
    n: usize,
    bandwidth: usize,
    values: Vec<T>,
}

impl<T: Copy + RealField> BandedLu<T> {
    pub fn factor(matrix: &CsrMatrix<T>) -> Result<Self, SolveError> {
        Self::factor_with_limit(matrix, BAND_ENTRY_LIMIT)
    }

    /// Factorise `matrix`, refusing bands which would need more than `limit` stored values
    pub fn factor_with_limit(matrix: &CsrMatrix<T>, limit: usize) -> Result<Self, SolveError> {
        let n = matrix.nrows();
        let bandwidth = matrix
            .triplet_iter()
            .map(|(row, col, _)| if row > col { row - col } else { col - row })
            .max()
            .unwrap_or(0);

        let entries = bandwidth
            .checked_mul(2)
            .and_then(|width| width.checked_add(1))
            .and_then(|width| width.checked_mul(n))
            .filter(|&entries| entries <= limit)
            .ok_or(SolveError::BandTooLarge {
                rows: n,
                bandwidth,
                limit,
            })?;

        let mut lu = Self {
            n,
            bandwidth,
            values: vec![T::zero(); entries],
        };
        let mut row_scale = vec![T::zero(); n];
        for (row, col, &value) in matrix.triplet_iter() {
            *lu.entry_mut(row, col) = value;
            row_scale[row] = row_scale[row].max(value.abs());
        }
        tracing::trace!("Factorising {n} rows with bandwidth {bandwidth}");

        for pivot_row in 0..n {
            let pivot = lu.entry(pivot_row, pivot_row);
            if pivot.abs() <= T::default_epsilon() * row_scale[pivot_row] {
                return Err(SolveError::Singular { row: pivot_row });
            }
            let last = (pivot_row + bandwidth).min(n - 1);
            for row in pivot_row + 1..=last {
                let multiplier = lu.entry(row, pivot_row) / pivot;
                if multiplier == T::zero() {
                    continue;
                }
                *lu.entry_mut(row, pivot_row) = multiplier;
                for col in pivot_row + 1..=last {
                    let update = multiplier * lu.entry(pivot_row, col);
                    *lu.entry_mut(row, col) -= update;
                }
            }
        }
        Ok(lu)
    }

    pub fn solve(&self, rhs: &DVector<T>) -> DVector<T> {
        let mut x = rhs.clone();
        // forward substitution with the unit lower factor
        for row in 0..self.n {
            let first = row.saturating_sub(self.bandwidth);
            let mut value = x[row];
            for col in first..row {
                value -= self.entry(row, col) * x[col];
            }
            x[row] = value;
        }
        // back substitution with the upper factor
        for row in (0..self.n).rev() {
            let last = (row + self.bandwidth).min(self.n - 1);
            let mut value = x[row];
            for col in row + 1..=last {
                value -= self.entry(row, col) * x[col];
            }
            x[row] = value / self.entry(row, row);
        }
        x
    }

    fn index(&self, row: usize, col: usize) -> usize {
        row * (2 * self.bandwidth + 1) + col + self.bandwidth - row
    }

    fn entry(&self, row: usize, col: usize) -> T {
        self.values[self.index(row, col)]
    }

    fn entry_mut(&mut self, row: usize, col: usize) -> &mut T {
        let index = self.index(row, col);
        &mut self.values[index]
    }
}
