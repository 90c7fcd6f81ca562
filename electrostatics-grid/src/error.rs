// Copyright 2022 Chris Gubbin
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! # Error
//! Errors raised when addressing or combining grids

use crate::Extent;
use miette::Diagnostic;

#[derive(thiserror::Error, Debug, Diagnostic, Clone, PartialEq, Eq)]
/// Failures of grid addressing. Every accessor raises these before touching any data
pub enum GridError {
    #[error("position ({i}, {j}) lies outside the grid, {extent}")]
    #[diagnostic(code(electrostatics_grid::out_of_range))]
    OutOfRange { i: i64, j: i64, extent: Extent },
    #[error("linear position {k} lies outside the grid, k must be in [0, {k_max}]")]
    #[diagnostic(code(electrostatics_grid::out_of_range))]
    KOutOfRange { k: usize, k_max: usize },
    #[error("grid extents differ: expected {expected}, found {found}")]
    #[diagnostic(code(electrostatics_grid::dimension_mismatch))]
    DimensionMismatch { expected: Extent, found: Extent },
    #[error("invalid grid extent: i in [{i_min}, {i_max}], j in [{j_min}, {j_max}]")]
    #[diagnostic(code(electrostatics_grid::invalid_extent))]
    InvalidExtent {
        i_min: i64,
        i_max: i64,
        j_min: i64,
        j_max: i64,
    },
}
