// Copyright 2022 Chris Gubbin
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! # Error
//! Failures raised while assembling or solving an electrostatic system

use electrostatics_grid::GridError;
use miette::Diagnostic;

#[derive(thiserror::Error, Debug, Diagnostic)]
/// A system could not be solved. Range errors raised while addressing the grid are wrapped,
/// everything else describes a system which has no unique or finite solution
pub enum SolveError {
    #[error(transparent)]
    #[diagnostic(code(electrostatics_fdm::grid))]
    Grid(#[from] GridError),
    #[error("the system has no boundary conditions, so the potential is undetermined")]
    #[diagnostic(
        code(electrostatics_fdm::ill_posed),
        help("fix at least one cell with `point`, `line` or an edge command")
    )]
    NoBoundaryConditions,
    #[error("the operator is singular, zero pivot in row {row}")]
    #[diagnostic(code(electrostatics_fdm::singular))]
    Singular { row: usize },
    #[error("a banded factorisation of {rows} rows with bandwidth {bandwidth} needs more than {limit} stored values")]
    #[diagnostic(
        code(electrostatics_fdm::band_too_large),
        help("use bicgstab for grids this wide")
    )]
    BandTooLarge {
        rows: usize,
        bandwidth: usize,
        limit: usize,
    },
    #[error("the solver did not converge in {iterations} iterations, relative residual {residual:e}")]
    #[diagnostic(
        code(electrostatics_fdm::did_not_converge),
        help("raise the iteration cap or try a direct method")
    )]
    DidNotConverge { iterations: usize, residual: f64 },
    #[error("the iterative solver broke down at iteration {iteration}")]
    #[diagnostic(code(electrostatics_fdm::breakdown))]
    Breakdown { iteration: usize },
    #[error("the solution is not finite at linear position {k}")]
    #[diagnostic(code(electrostatics_fdm::non_finite))]
    NonFinite { k: usize },
    // The format error holds a non-`Send` source, so only its message is kept
    #[error("failed to assemble the sparse operator: {0}")]
    #[diagnostic(code(electrostatics_fdm::csr))]
    Csr(String),
}

#[derive(thiserror::Error, Debug, Diagnostic, Clone, PartialEq, Eq)]
#[error("unknown solver method `{0}`, expected one of bicgstab, sparselu, denselu")]
#[diagnostic(code(electrostatics_fdm::unknown_method))]
pub struct MethodParseError(pub String);
