pub mod structures;

use electrostatics_fdm::UnsolvedSystem;
use electrostatics_grid::{Coordinate, Extent};
use rand::{rngs::StdRng, Rng, SeedableRng};

/// A square grid of side `2 * half_width + 1` centred on the origin
pub fn centred_extent(half_width: i64) -> Extent {
    Extent::new(-half_width, half_width, -half_width, half_width)
        .expect("A non-negative half width gives a valid extent")
}

/// An unsolved system with `num_points` boundary points of random potential scattered over it,
/// plus a grounded bottom edge so the system is always well posed
///
/// The same `seed` always gives the same system.
pub fn construct_random_system(
    extent: Extent,
    num_points: usize,
    seed: u64,
) -> UnsolvedSystem<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut system = UnsolvedSystem::new(extent);
    system.set_bottom_boundary(0.0);
    for _ in 0..num_points {
        let i = rng.gen_range(extent.i_min()..=extent.i_max());
        let j = rng.gen_range(extent.j_min()..=extent.j_max());
        let potential = rng.gen_range(-10.0..10.0);
        system
            .set_boundary_point(i, j, potential)
            .expect("Random points are drawn from inside the grid");
    }
    system
}

/// A ring of random radius and potential inside a grounded box
pub fn construct_random_ring(extent: Extent, seed: u64) -> UnsolvedSystem<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let max_radius = (extent.width().min(extent.height()) / 2).max(1) as f64;
    let radius = rng.gen_range(0.0..max_radius);
    let mut system = structures::grounded_box(extent);
    system.set_boundary_ring(Coordinate::new(0, 0), radius, rng.gen_range(-10.0..10.0));
    system
}
