use crate::{Extent, GridError};
use nalgebra::{DMatrix, Scalar};
use num_traits::Zero;

/// A dense grid of values addressed by (`i`, `j`) or by the linear position `k`
///
/// Storage is a column-major `DMatrix` with `width` rows and `height` columns indexed by
/// (`i - i_min`, `j - j_min`), so the flat storage slice is indexed directly by `k`. All
/// checked accessors validate before reading or writing and never clamp.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid<T: Scalar> {
    extent: Extent,
    values: DMatrix<T>,
}

impl<T: Scalar + Zero> Grid<T> {
    /// A zero-initialised grid covering `extent`
    pub fn zeros(extent: Extent) -> Self {
        Self {
            extent,
            values: DMatrix::zeros(extent.width(), extent.height()),
        }
    }
}

impl<T: Scalar + Copy> Grid<T> {
    pub fn from_element(extent: Extent, value: T) -> Self {
        Self {
            extent,
            values: DMatrix::from_element(extent.width(), extent.height(), value),
        }
    }

    /// Build a grid from a dense matrix whose bottom left cell sits at (`i_min`, `j_min`)
    ///
    /// Matrix rows are read as `j` and columns as `i`, so `i_max = i_min + ncols - 1` and
    /// `j_max = j_min + nrows - 1`.
    pub fn from_matrix(matrix: &DMatrix<T>, i_min: i64, j_min: i64) -> Result<Self, GridError> {
        let extent = Extent::from_origin_and_shape(i_min, j_min, matrix.ncols(), matrix.nrows())?;
        Ok(Self {
            extent,
            values: matrix.transpose(),
        })
    }

    pub fn extent(&self) -> &Extent {
        &self.extent
    }

    pub fn get(&self, i: i64, j: i64) -> Result<T, GridError> {
        let k = self.extent.ij2k(i, j)?;
        Ok(self.values.as_slice()[k])
    }

    pub fn get_k(&self, k: usize) -> Result<T, GridError> {
        self.as_slice()
            .get(k)
            .copied()
            .ok_or(GridError::KOutOfRange {
                k,
                k_max: self.extent.k_max(),
            })
    }

    pub fn set(&mut self, i: i64, j: i64, value: T) -> Result<(), GridError> {
        let k = self.extent.ij2k(i, j)?;
        self.values.as_mut_slice()[k] = value;
        Ok(())
    }

    pub fn set_k(&mut self, k: usize, value: T) -> Result<(), GridError> {
        let k_max = self.extent.k_max();
        let cell = self
            .values
            .as_mut_slice()
            .get_mut(k)
            .ok_or(GridError::KOutOfRange { k, k_max })?;
        *cell = value;
        Ok(())
    }

    /// The cell values in order of increasing `k`
    pub fn as_slice(&self) -> &[T] {
        self.values.as_slice()
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        self.values.as_mut_slice()
    }

    /// The grid as a matrix with rows running over `j` and columns over `i`, the inverse of
    /// `from_matrix`
    pub fn to_row_matrix(&self) -> DMatrix<T> {
        self.values.transpose()
    }

    /// Combine two grids of identical extent cell by cell
    pub fn zip_map<U, V, F>(&self, other: &Grid<U>, mut f: F) -> Result<Grid<V>, GridError>
    where
        U: Scalar + Copy,
        V: Scalar + Copy,
        F: FnMut(T, U) -> V,
    {
        self.extent.ensure_matches(other.extent())?;
        let values = self
            .as_slice()
            .iter()
            .zip(other.as_slice())
            .map(|(&a, &b)| f(a, b))
            .collect::<Vec<_>>();
        Ok(Grid {
            extent: self.extent,
            values: DMatrix::from_vec(self.extent.width(), self.extent.height(), values),
        })
    }

    /// Overwrite every cell with the contents of `other`, which must cover the same cells
    pub fn copy_from(&mut self, other: &Grid<T>) -> Result<(), GridError> {
        self.extent.ensure_matches(other.extent())?;
        self.values.copy_from(&other.values);
        Ok(())
    }
}
