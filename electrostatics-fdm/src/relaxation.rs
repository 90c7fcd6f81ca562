//! # Relaxation
//!
//! Jacobi iteration of the five-point Laplace stencil. Every free cell is replaced by the mean of
//! its existing grid neighbours, reading only the values written by the previous sweep. Cells on
//! the edge of the grid average over the two or three neighbours they actually have.

use crate::{PotentialField, UnsolvedSystem};
use electrostatics_grid::Grid;
use nalgebra::RealField;
use std::time::{Duration, Instant};

/// Controls when relaxation stops
///
/// The iteration cap always applies. A tolerance stops the sweep after the first iteration whose
/// largest change is at most the tolerance, a time budget after the first iteration which
/// finishes past the budget.
#[derive(Clone, Debug, PartialEq)]
pub struct RelaxationSettings<T> {
    maximum_iterations: usize,
    tolerance: Option<T>,
    time_budget: Option<Duration>,
}

impl<T: Copy + RealField> RelaxationSettings<T> {
    pub fn new(maximum_iterations: usize) -> Self {
        Self {
            maximum_iterations,
            tolerance: None,
            time_budget: None,
        }
    }

    pub fn with_tolerance(self, tolerance: T) -> Self {
        Self {
            tolerance: Some(tolerance),
            ..self
        }
    }

    pub fn with_time_budget(self, time_budget: Duration) -> Self {
        Self {
            time_budget: Some(time_budget),
            ..self
        }
    }

    pub fn maximum_iterations(&self) -> usize {
        self.maximum_iterations
    }

    pub fn tolerance(&self) -> Option<T> {
        self.tolerance
    }

    pub fn time_budget(&self) -> Option<Duration> {
        self.time_budget
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelaxationStopReason {
    /// Ran the full number of iterations
    IterationLimit,
    /// The largest update fell to the tolerance
    Converged,
    /// An iteration finished after the time budget expired
    TimeBudget,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RelaxationReport<T> {
    /// Number of completed sweeps
    pub iterations: usize,
    /// Largest absolute change of any cell in the final sweep, zero if none ran
    pub max_update: T,
    pub stop_reason: RelaxationStopReason,
}

/// Relax `system` towards a solution of Laplace's equation
///
/// Both buffers are seeded with the system's potentials, boundary values included, and boundary
/// cells are never written.
#[tracing::instrument(name = "Relaxation", level = "info", skip_all, fields(cells = system.extent().num_cells()))]
pub fn relax<T: Copy + RealField>(
    system: &UnsolvedSystem<T>,
    settings: &RelaxationSettings<T>,
) -> (PotentialField<T>, RelaxationReport<T>) {
    let extent = *system.extent();
    let fixed = system.mask().as_slice();
    let mut previous = system.potential().as_slice().to_vec();
    let mut next = previous.clone();

    // Reciprocal neighbour counts, zero for cells which are never updated
    let weights = (0..extent.num_cells())
        .map(|k| {
            let count = extent.neighbours(k).len();
            if fixed[k] || count == 0 {
                T::zero()
            } else {
                T::one() / nalgebra::convert::<f64, T>(count as f64)
            }
        })
        .collect::<Vec<_>>();

    let start = Instant::now();
    let mut report = RelaxationReport {
        iterations: 0,
        max_update: T::zero(),
        stop_reason: RelaxationStopReason::IterationLimit,
    };

    while report.iterations < settings.maximum_iterations {
        let mut max_update = T::zero();
        for k in 0..extent.num_cells() {
            if weights[k] == T::zero() {
                continue;
            }
            let sum = extent
                .neighbours(k)
                .iter()
                .fold(T::zero(), |acc, &n| acc + previous[n]);
            let updated = sum * weights[k];
            max_update = max_update.max((updated - previous[k]).abs());
            next[k] = updated;
        }
        std::mem::swap(&mut previous, &mut next);
        report.iterations += 1;
        report.max_update = max_update;
        tracing::trace!("Iteration {}: largest update {}", report.iterations, max_update);

        if let Some(tolerance) = settings.tolerance {
            if max_update <= tolerance {
                report.stop_reason = RelaxationStopReason::Converged;
                break;
            }
        }
        if let Some(budget) = settings.time_budget {
            if start.elapsed() > budget {
                tracing::warn!(
                    "Relaxation time budget of {:?} exhausted after {} iterations",
                    budget,
                    report.iterations
                );
                report.stop_reason = RelaxationStopReason::TimeBudget;
                break;
            }
        }
    }

    tracing::info!(
        "Relaxation finished after {} iterations ({:?})",
        report.iterations,
        report.stop_reason
    );

    let mut solved = Grid::zeros(extent);
    solved.as_mut_slice().copy_from_slice(&previous);
    (PotentialField::from_grid(solved), report)
}

#[cfg(test)]
mod test {
    use super::{relax, RelaxationSettings, RelaxationStopReason};
    use crate::UnsolvedSystem;
    use approx::assert_relative_eq;
    use electrostatics_grid::{Coordinate, Extent};
    use std::time::Duration;

    #[test]
    fn one_sweep_averages_the_previous_values() {
        // 3 x 1 grid: [1, free, 3]
        let mut system = UnsolvedSystem::new(Extent::new(0, 2, 0, 0).unwrap());
        system.set_boundary_point(0, 0, 1.0).unwrap();
        system.set_boundary_point(2, 0, 3.0).unwrap();
        let (solved, report) = relax(&system, &RelaxationSettings::new(1));
        assert_eq!(solved.get(1, 0).unwrap(), 2.0);
        assert_eq!(report.iterations, 1);
        assert_eq!(report.max_update, 2.0);
        assert_eq!(report.stop_reason, RelaxationStopReason::IterationLimit);
    }

    #[test]
    fn sweeps_read_only_the_previous_iteration() {
        // 4 x 1 grid: [4, free, free, 0]. With in-place updates the third cell would see 2.
        let mut system = UnsolvedSystem::new(Extent::new(0, 3, 0, 0).unwrap());
        system.set_boundary_point(0, 0, 4.0).unwrap();
        system.set_boundary_point(3, 0, 0.0).unwrap();
        let (solved, _) = relax(&system, &RelaxationSettings::new(1));
        assert_eq!(solved.get(1, 0).unwrap(), 2.0);
        assert_eq!(solved.get(2, 0).unwrap(), 0.0);
    }

    #[test]
    fn edge_cells_average_over_their_real_neighbours() {
        // 2 x 2 grid with one corner fixed at 3: every free corner has two neighbours
        let mut system = UnsolvedSystem::new(Extent::new(0, 1, 0, 1).unwrap());
        system.set_boundary_point(0, 0, 3.0).unwrap();
        let (solved, _) = relax(&system, &RelaxationSettings::new(1));
        assert_eq!(solved.get(1, 0).unwrap(), 1.5);
        assert_eq!(solved.get(0, 1).unwrap(), 1.5);
        assert_eq!(solved.get(1, 1).unwrap(), 0.0);
    }

    #[test]
    fn boundary_cells_are_never_changed() {
        let mut system = UnsolvedSystem::new(Extent::new(-6, 6, -6, 6).unwrap());
        system.set_boundary_ring(Coordinate::new(0, 0), 4.0, 10.0);
        system.set_left_boundary(-2.0);
        let (solved, _) = relax(&system, &RelaxationSettings::new(50));
        for (k, &fixed) in system.mask().as_slice().iter().enumerate() {
            if fixed {
                assert_eq!(
                    solved.get_k(k).unwrap(),
                    system.potential().get_k(k).unwrap()
                );
            }
        }
    }

    #[test]
    fn zero_iterations_return_the_seed() {
        let mut system = UnsolvedSystem::new(Extent::new(0, 3, 0, 3).unwrap());
        system.set_top_boundary(1.0);
        let (solved, report) = relax(&system, &RelaxationSettings::new(0));
        assert_eq!(solved.as_slice(), system.potential().as_slice());
        assert_eq!(report.iterations, 0);
    }

    #[test]
    fn a_tolerance_stops_early_once_converged() {
        let mut system = UnsolvedSystem::new(Extent::new(0, 10, 0, 0).unwrap());
        system.set_left_boundary(0.0);
        system.set_right_boundary(10.0);
        let settings = RelaxationSettings::new(100_000).with_tolerance(1e-10);
        let (solved, report) = relax(&system, &settings);
        assert_eq!(report.stop_reason, RelaxationStopReason::Converged);
        assert!(report.iterations < 100_000);
        assert!(report.max_update <= 1e-10);
        for i in 0..=10 {
            assert_relative_eq!(solved.get(i, 0).unwrap(), i as f64, epsilon = 1e-6);
        }
    }

    #[test]
    fn an_exhausted_time_budget_stops_after_one_iteration() {
        let mut system = UnsolvedSystem::new(Extent::new(0, 20, 0, 20).unwrap());
        system.set_top_boundary(1.0);
        let settings = RelaxationSettings::new(1_000_000).with_time_budget(Duration::ZERO);
        let (_, report) = relax(&system, &settings);
        assert_eq!(report.stop_reason, RelaxationStopReason::TimeBudget);
        assert_eq!(report.iterations, 1);
    }
}
