use crate::GridError;
use std::fmt;

/// A single cell address on the grid, `i` counts columns left to right and `j` counts rows
/// bottom to top
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Coordinate {
    pub i: i64,
    pub j: i64,
}

impl Coordinate {
    pub fn new(i: i64, j: i64) -> Self {
        Self { i, j }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.i, self.j)
    }
}

/// The inclusive index ranges of a rectangular grid
///
/// The ranges need not start at zero and may be negative. Each cell is also assigned a linear
/// position `k`, counted from the bottom left with `i` varying fastest:
///
/// ```text
/// 8  9 10 11
/// 4  5  6  7
/// 0  1  2  3
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Extent {
    i_min: i64,
    i_max: i64,
    j_min: i64,
    j_max: i64,
}

impl Extent {
    pub fn new(i_min: i64, i_max: i64, j_min: i64, j_max: i64) -> Result<Self, GridError> {
        if i_min > i_max || j_min > j_max {
            return Err(GridError::InvalidExtent {
                i_min,
                i_max,
                j_min,
                j_max,
            });
        }
        Ok(Self {
            i_min,
            i_max,
            j_min,
            j_max,
        })
    }

    /// The extent of a `width` x `height` grid whose bottom left cell sits at (`i_min`, `j_min`)
    pub fn from_origin_and_shape(
        i_min: i64,
        j_min: i64,
        width: usize,
        height: usize,
    ) -> Result<Self, GridError> {
        if width == 0 || height == 0 {
            return Err(GridError::InvalidExtent {
                i_min,
                i_max: i_min + width as i64 - 1,
                j_min,
                j_max: j_min + height as i64 - 1,
            });
        }
        Self::new(
            i_min,
            i_min + width as i64 - 1,
            j_min,
            j_min + height as i64 - 1,
        )
    }

    pub fn i_min(&self) -> i64 {
        self.i_min
    }

    pub fn i_max(&self) -> i64 {
        self.i_max
    }

    pub fn j_min(&self) -> i64 {
        self.j_min
    }

    pub fn j_max(&self) -> i64 {
        self.j_max
    }

    /// The largest valid linear position, `k_min` is always zero
    pub fn k_max(&self) -> usize {
        self.num_cells() - 1
    }

    /// Number of cells along `i`, counting from one
    pub fn width(&self) -> usize {
        (self.i_max - self.i_min + 1) as usize
    }

    /// Number of cells along `j`, counting from one
    pub fn height(&self) -> usize {
        (self.j_max - self.j_min + 1) as usize
    }

    pub fn num_cells(&self) -> usize {
        self.width() * self.height()
    }

    pub fn contains(&self, i: i64, j: i64) -> bool {
        i >= self.i_min && i <= self.i_max && j >= self.j_min && j <= self.j_max
    }

    pub fn contains_k(&self, k: usize) -> bool {
        k <= self.k_max()
    }

    /// Convert a grid coordinate to its linear position
    pub fn ij2k(&self, i: i64, j: i64) -> Result<usize, GridError> {
        if !self.contains(i, j) {
            return Err(GridError::OutOfRange {
                i,
                j,
                extent: *self,
            });
        }
        Ok(self.ij2k_unchecked(i, j))
    }

    /// Convert a linear position to its grid coordinate
    pub fn k2ij(&self, k: usize) -> Result<Coordinate, GridError> {
        if !self.contains_k(k) {
            return Err(GridError::KOutOfRange {
                k,
                k_max: self.k_max(),
            });
        }
        Ok(self.k2ij_unchecked(k))
    }

    /// The offset of cell (`i`, `j`) in dense storage, callers must have checked `contains`
    pub(crate) fn ij2k_unchecked(&self, i: i64, j: i64) -> usize {
        (i - self.i_min) as usize + (j - self.j_min) as usize * self.width()
    }

    pub(crate) fn k2ij_unchecked(&self, k: usize) -> Coordinate {
        let width = self.width();
        Coordinate {
            i: (k % width) as i64 + self.i_min,
            j: (k / width) as i64 + self.j_min,
        }
    }

    /// The linear positions of the grid-aligned neighbours of `k` which exist, in increasing order
    ///
    /// Interior cells have four neighbours, cells on an edge three and corner cells two. No
    /// neighbour is reflected or substituted at the edges. Callers must have checked `contains_k`.
    pub fn neighbours(&self, k: usize) -> Neighbours {
        let width = self.width();
        let Coordinate { i, j } = self.k2ij_unchecked(k);
        let mut neighbours = Neighbours::default();
        if j > self.j_min {
            neighbours.push(k - width);
        }
        if i > self.i_min {
            neighbours.push(k - 1);
        }
        if i < self.i_max {
            neighbours.push(k + 1);
        }
        if j < self.j_max {
            neighbours.push(k + width);
        }
        neighbours
    }

    /// Iterate over every coordinate in order of increasing `k`
    pub fn coordinates(&self) -> impl Iterator<Item = Coordinate> + '_ {
        (0..self.num_cells()).map(move |k| self.k2ij_unchecked(k))
    }

    /// Returns an error unless `other` covers exactly the same cells
    pub fn ensure_matches(&self, other: &Extent) -> Result<(), GridError> {
        if self != other {
            return Err(GridError::DimensionMismatch {
                expected: *self,
                found: *other,
            });
        }
        Ok(())
    }
}

/// Up to four neighbouring linear positions, stored inline
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Neighbours {
    indices: [usize; 4],
    len: usize,
}

impl Neighbours {
    fn push(&mut self, k: usize) {
        self.indices[self.len] = k;
        self.len += 1;
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.indices[..self.len]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, usize> {
        self.as_slice().iter()
    }
}

impl fmt::Display for Extent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "i in [{}, {}], j in [{}, {}]",
            self.i_min, self.i_max, self.j_min, self.j_max
        )
    }
}

#[cfg(test)]
mod test {
    use super::{Coordinate, Extent};
    use crate::GridError;
    use proptest::prelude::*;

    fn reference_extent() -> Extent {
        Extent::new(-18, 2, -8, 6).unwrap()
    }

    #[test]
    fn dimensions_count_from_one() {
        let extent = reference_extent();
        assert_eq!(extent.width(), 21);
        assert_eq!(extent.height(), 15);
        assert_eq!(extent.k_max(), 314);
    }

    #[test]
    fn ij2k_matches_hand_computed_positions() {
        let extent = reference_extent();
        assert_eq!(extent.ij2k(-18, -8).unwrap(), 0);
        assert_eq!(extent.ij2k(-17, -7).unwrap(), 22);
        assert_eq!(extent.ij2k(2, 6).unwrap(), extent.k_max());
    }

    #[test]
    fn k2ij_matches_hand_computed_coordinates() {
        let extent = reference_extent();
        assert_eq!(extent.k2ij(22).unwrap(), Coordinate::new(-17, -7));
        assert_eq!(extent.k2ij(0).unwrap(), Coordinate::new(-18, -8));
        assert_eq!(extent.k2ij(extent.k_max()).unwrap(), Coordinate::new(2, 6));
    }

    #[test]
    fn conversions_outside_the_grid_are_range_errors() {
        let extent = reference_extent();
        assert!(matches!(
            extent.ij2k(-20, 3),
            Err(GridError::OutOfRange { i: -20, j: 3, .. })
        ));
        assert!(matches!(extent.ij2k(0, 7), Err(GridError::OutOfRange { .. })));
        assert!(matches!(
            extent.k2ij(315),
            Err(GridError::KOutOfRange { k: 315, k_max: 314 })
        ));
        assert!(extent.ij2k(-12, 4).is_ok());
        assert!(extent.k2ij(7).is_ok());
    }

    #[test]
    fn inverted_ranges_are_rejected() {
        assert!(matches!(
            Extent::new(3, 2, 0, 0),
            Err(GridError::InvalidExtent { .. })
        ));
        assert!(Extent::from_origin_and_shape(0, 0, 0, 4).is_err());
    }

    #[test]
    fn single_cell_grid_maps_to_k_zero() {
        let extent = Extent::new(5, 5, -3, -3).unwrap();
        assert_eq!(extent.k_max(), 0);
        assert_eq!(extent.ij2k(5, -3).unwrap(), 0);
        assert_eq!(extent.k2ij(0).unwrap(), Coordinate::new(5, -3));
    }

    #[test]
    fn coordinates_are_visited_in_k_order() {
        let extent = Extent::new(-1, 1, 0, 1).unwrap();
        let visited = extent.coordinates().collect::<Vec<_>>();
        assert_eq!(visited.len(), 6);
        assert_eq!(visited[0], Coordinate::new(-1, 0));
        assert_eq!(visited[2], Coordinate::new(1, 0));
        assert_eq!(visited[3], Coordinate::new(-1, 1));
        for (k, coordinate) in visited.into_iter().enumerate() {
            assert_eq!(extent.ij2k(coordinate.i, coordinate.j).unwrap(), k);
        }
    }

    #[test]
    fn edge_and_corner_cells_have_fewer_neighbours() {
        // 4 wide, 3 high
        let extent = Extent::new(0, 3, 0, 2).unwrap();
        assert_eq!(extent.neighbours(0).as_slice(), &[1, 4]);
        assert_eq!(extent.neighbours(1).as_slice(), &[0, 2, 5]);
        assert_eq!(extent.neighbours(5).as_slice(), &[1, 4, 6, 9]);
        assert_eq!(extent.neighbours(11).as_slice(), &[7, 10]);
        assert_eq!(extent.neighbours(8).as_slice(), &[4, 9]);
    }

    #[test]
    fn single_column_grids_only_have_vertical_neighbours() {
        let extent = Extent::new(0, 0, 0, 2).unwrap();
        assert_eq!(extent.neighbours(1).as_slice(), &[0, 2]);
        let single = Extent::new(0, 0, 0, 0).unwrap();
        assert!(single.neighbours(0).is_empty());
    }

    proptest! {
        #[test]
        fn k2ij_inverts_ij2k(
            i_min in -50i64..50,
            j_min in -50i64..50,
            width in 1usize..40,
            height in 1usize..40,
            di in 0usize..40,
            dj in 0usize..40,
        ) {
            let extent = Extent::from_origin_and_shape(i_min, j_min, width, height).unwrap();
            let i = i_min + (di % width) as i64;
            let j = j_min + (dj % height) as i64;
            let k = extent.ij2k(i, j).unwrap();
            prop_assert!(k <= extent.k_max());
            prop_assert_eq!(extent.k2ij(k).unwrap(), Coordinate::new(i, j));
        }

        #[test]
        fn ij2k_is_a_bijection_onto_the_k_range(
            i_min in -20i64..20,
            j_min in -20i64..20,
            width in 1usize..12,
            height in 1usize..12,
        ) {
            let extent = Extent::from_origin_and_shape(i_min, j_min, width, height).unwrap();
            let mut seen = vec![false; extent.num_cells()];
            for i in extent.i_min()..=extent.i_max() {
                for j in extent.j_min()..=extent.j_max() {
                    let k = extent.ij2k(i, j).unwrap();
                    prop_assert!(!seen[k]);
                    seen[k] = true;
                }
            }
            prop_assert!(seen.into_iter().all(|x| x));
        }
    }
}
