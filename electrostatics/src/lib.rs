// Copyright 2022 Chris Gubbin
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Electrostatics solves Laplace's equation for two dimensional systems of fixed potentials
//!
//! # Overview
//! A system is a rectangular grid of cells addressed by integer coordinates (`i`, `j`). Cells can be
//! fixed to a potential, either individually or by drawing points, rings, filled circles, lines,
//! rectangles or whole grid edges. The remaining cells are found either by repeated relaxation or
//! by assembling the five-point finite difference operator and solving the sparse linear system.
//! Solved potentials can be differentiated into electric fields, compared with one another or with
//! closed-form solutions, and written out alongside a gnuplot script to plot them.
//!
//! # Usage
//! Electrostatics is distributed as a binary crate, and is intended to be run from the command line
//! with a command file:
//!
//! ```text
//! # A grounded cylinder between two parallel plates
//! new plates -50 50 -50 50
//! left 10
//! right -10
//! circle 0 0 10 0
//!
//! starttimer lu
//! solve sparselu plates platessolved
//! stoptimer lu
//!
//! analytical2 exact -50 50 -50 50 10 -10 10
//! savesolution platessolved
//! savecomparison platessolved exact difference
//! savefield platessolved
//!
//! plotfile plot.gp -50 50 -50 50
//! plot platessolved
//! fieldplot platessolved 5
//! contourplot platessolved
//! ```
//!
//! Every command is documented on [`script::Command`]. Solver defaults are read from
//! `.config/default.toml`, an optional `.config/{RUN_MODE}.toml` and `ELECTROSTATICS_` environment
//! variables.

#![warn(missing_docs)]

/// The command line global application, tracing and display primitives
pub mod app;

/// Error handling
mod error;

/// Writers for solved potentials, fields and gnuplot scripts
pub mod output;

/// Parsing of command files
pub mod script;

/// Execution of parsed command files
pub mod session;

pub use error::*;
