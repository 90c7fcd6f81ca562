// Copyright 2022 Chris Gubbin
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! # Electrostatics Grid
//!
//! Integer-indexed rectangular grids for finite difference electrostatics.
//!
//! A grid covers the inclusive ranges `i_min..=i_max` and `j_min..=j_max`, which may be negative.
//! Every cell can be addressed either by its coordinate (`i`, `j`) or by a linear position `k`
//! counted from the bottom left with `i` varying fastest. The `primitives` module rasterises
//! the rings, discs, lines and rectangles used to paint values onto a grid.

mod error;
mod extent;
mod grid;
pub mod primitives;

pub use error::*;
pub use extent::*;
pub use grid::*;
