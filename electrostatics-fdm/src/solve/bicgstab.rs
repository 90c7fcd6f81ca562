use super::{multiply_into, LinearSolverSettings, SparseSolver};
use crate::SolveError;
use nalgebra::{DVector, RealField};
use nalgebra_sparse::CsrMatrix;

/// Stabilised biconjugate gradient with a Jacobi (diagonal) preconditioner
///
/// Iteration stops once the relative residual `|b - Ax| / |b|` is below `tolerance`. Exhausting
/// `maximum_iterations` is a `DidNotConverge` failure, a vanishing inner product a `Breakdown`.
#[derive(Clone, Debug, PartialEq)]
pub struct BiCgStab<T> {
    pub tolerance: T,
    pub maximum_iterations: usize,
}

impl<T: Copy + RealField> From<&LinearSolverSettings<T>> for BiCgStab<T> {
    fn from(settings: &LinearSolverSettings<T>) -> Self {
        Self {
            tolerance: settings.tolerance,
            maximum_iterations: settings.maximum_iterations,
        }
    }
}

impl<T: Copy + RealField> SparseSolver<T> for BiCgStab<T> {
    #[tracing::instrument(name = "BiCGSTAB", level = "debug", skip_all)]
    fn solve(
        &self,
        matrix: &CsrMatrix<T>,
        rhs: &DVector<T>,
        initial: &DVector<T>,
    ) -> Result<DVector<T>, SolveError> {
        let n = rhs.len();
        let rhs_norm = rhs.norm();
        if rhs_norm == T::zero() {
            return Ok(DVector::zeros(n));
        }

        let inverse_diagonal = jacobi_preconditioner(matrix)?;

        let mut x = initial.clone();
        let mut residual = DVector::zeros(n);
        multiply_into(matrix, &x, &mut residual);
        residual = rhs - residual;
        if residual.norm() / rhs_norm <= self.tolerance {
            return Ok(x);
        }

        let shadow = residual.clone();
        let mut rho = T::one();
        let mut alpha = T::one();
        let mut omega = T::one();
        let mut v = DVector::zeros(n);
        let mut p = DVector::zeros(n);
        let mut t = DVector::zeros(n);

        for iteration in 1..=self.maximum_iterations {
            let rho_next = shadow.dot(&residual);
            if rho_next == T::zero() {
                return Err(SolveError::Breakdown { iteration });
            }
            let beta = (rho_next / rho) * (alpha / omega);
            p = &residual + (&p - &v * omega) * beta;

            let y = p.component_mul(&inverse_diagonal);
            multiply_into(matrix, &y, &mut v);
            let projection = shadow.dot(&v);
            if projection == T::zero() {
                return Err(SolveError::Breakdown { iteration });
            }
            alpha = rho_next / projection;

            let s = &residual - &v * alpha;
            if s.norm() / rhs_norm <= self.tolerance {
                x += y * alpha;
                tracing::debug!("Converged after {iteration} iterations");
                return Ok(x);
            }

            let z = s.component_mul(&inverse_diagonal);
            multiply_into(matrix, &z, &mut t);
            let t_norm_squared = t.dot(&t);
            if t_norm_squared == T::zero() {
                return Err(SolveError::Breakdown { iteration });
            }
            omega = t.dot(&s) / t_norm_squared;

            x += y * alpha + &z * omega;
            residual = s - &t * omega;

            let relative_residual = residual.norm() / rhs_norm;
            tracing::trace!("Iteration {iteration}: relative residual {relative_residual}");
            if relative_residual <= self.tolerance {
                tracing::debug!("Converged after {iteration} iterations");
                return Ok(x);
            }
            if omega == T::zero() {
                return Err(SolveError::Breakdown { iteration });
            }
            rho = rho_next;
        }

        let residual = nalgebra::try_convert::<T, f64>(residual.norm() / rhs_norm).unwrap_or(f64::NAN);
        tracing::warn!(
            "BiCGSTAB did not converge in {} iterations",
            self.maximum_iterations
        );
        Err(SolveError::DidNotConverge {
            iterations: self.maximum_iterations,
            residual,
        })
    }
}

// Reciprocal of the diagonal, a zero diagonal entry makes the operator unusable
fn jacobi_preconditioner<T: Copy + RealField>(
    matrix: &CsrMatrix<T>,
) -> Result<DVector<T>, SolveError> {
    let mut inverse = DVector::zeros(matrix.nrows());
    for (row, (k, entry)) in matrix.row_iter().zip(inverse.iter_mut().enumerate()) {
        let diagonal = row
            .col_indices()
            .iter()
            .position(|&col| col == k)
            .map(|position| row.values()[position])
            .unwrap_or_else(T::zero);
        if diagonal == T::zero() {
            return Err(SolveError::Singular { row: k });
        }
        *entry = T::one() / diagonal;
    }
    Ok(inverse)
}

#[cfg(test)]
mod test {
    use super::BiCgStab;
    use crate::solve::SparseSolver;
    use crate::SolveError;
    use approx::assert_relative_eq;
    use nalgebra::DVector;
    use nalgebra_sparse::{CooMatrix, CsrMatrix};
    use rand::{rngs::StdRng, Rng, SeedableRng};

    fn tridiagonal(n: usize) -> CsrMatrix<f64> {
        let mut coo = CooMatrix::new(n, n);
        for k in 0..n {
            coo.push(k, k, 4.0);
            if k > 0 {
                coo.push(k, k - 1, -1.0);
            }
            if k + 1 < n {
                coo.push(k, k + 1, -1.5);
            }
        }
        CsrMatrix::from(&coo)
    }

    #[test]
    fn random_right_hand_sides_are_solved_to_tolerance() {
        let mut rng = StdRng::seed_from_u64(64);
        let n = 64;
        let matrix = tridiagonal(n);
        let rhs = DVector::from_fn(n, |_, _| rng.gen::<f64>() - 0.5);
        let solver = BiCgStab {
            tolerance: 1e-12,
            maximum_iterations: 500,
        };
        let x = solver.solve(&matrix, &rhs, &DVector::zeros(n)).unwrap();
        let dense = nalgebra_sparse::convert::serial::convert_csr_dense(&matrix);
        let residual = (&dense * &x - &rhs).norm() / rhs.norm();
        assert!(residual < 1e-10);
    }

    #[test]
    fn a_zero_right_hand_side_gives_the_zero_vector() {
        let matrix = tridiagonal(5);
        let solver = BiCgStab {
            tolerance: 1e-12,
            maximum_iterations: 10,
        };
        let x = solver
            .solve(&matrix, &DVector::zeros(5), &DVector::from_element(5, 3.0))
            .unwrap();
        assert_relative_eq!(x.norm(), 0.0);
    }

    #[test]
    fn an_iteration_cap_of_zero_does_not_converge() {
        let matrix = tridiagonal(16);
        let rhs = DVector::from_element(16, 1.0);
        let solver = BiCgStab {
            tolerance: 1e-12,
            maximum_iterations: 0,
        };
        assert!(matches!(
            solver.solve(&matrix, &rhs, &DVector::zeros(16)),
            Err(SolveError::DidNotConverge { iterations: 0, .. })
        ));
    }

    #[test]
    fn a_zero_diagonal_is_rejected() {
        let mut coo = CooMatrix::new(2, 2);
        coo.push(0, 1, 1.0);
        coo.push(1, 0, 1.0);
        let matrix = CsrMatrix::from(&coo);
        let solver = BiCgStab {
            tolerance: 1e-12,
            maximum_iterations: 10,
        };
        assert!(matches!(
            solver.solve(&matrix, &DVector::from_element(2, 1.0), &DVector::zeros(2)),
            Err(SolveError::Singular { row: 0 })
        ));
    }
}
