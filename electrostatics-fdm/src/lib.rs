// Copyright 2022 Chris Gubbin
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! # Electrostatics FDM
//!
//! Finite difference solution of Laplace's equation on a rectangular grid.
//!
//! In two dimensions the potential satisfies
//! $ \partial^2 V / \partial x^2 + \partial^2 V / \partial y^2 = 0 $
//! away from the fixed boundary conditions. On a unit-spaced grid the five-point stencil gives
//! $ V(i+1, j) + V(i-1, j) + V(i, j+1) + V(i, j-1) - 4 V(i, j) = 0 $
//! for every free cell, with cells on the grid edge using only the neighbours they have.
//!
//! An [`UnsolvedSystem`] pairs a [`PotentialField`] with a [`BoundaryMask`]. It can be solved by
//! [`relax`]ation or by assembling and solving the sparse linear system with
//! [`solve_linear_system`], and the resulting field differentiated into an [`ElectricField`].

pub mod analytical;
mod error;
mod field;
mod operator;
mod paint;
mod potential;
mod relaxation;
mod solve;
mod system;

pub use error::*;
pub use field::ElectricField;
pub use operator::{OperatorAssembler, OperatorAssemblerBuilder};
pub use paint::Edge;
pub use potential::PotentialField;
pub use relaxation::*;
pub use solve::*;
pub use system::{BoundaryMask, UnsolvedSystem};
