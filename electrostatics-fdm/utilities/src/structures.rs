use electrostatics_fdm::UnsolvedSystem;
use electrostatics_grid::{Coordinate, Extent};

/// Every edge of the grid held at zero
pub fn grounded_box(extent: Extent) -> UnsolvedSystem<f64> {
    let mut system = UnsolvedSystem::new(extent);
    system.set_left_boundary(0.0);
    system.set_right_boundary(0.0);
    system.set_top_boundary(0.0);
    system.set_bottom_boundary(0.0);
    system
}

/// Two plates on the left and right edges, the top and bottom left free
pub fn parallel_plates(extent: Extent, left: f64, right: f64) -> UnsolvedSystem<f64> {
    let mut system = UnsolvedSystem::new(extent);
    system.set_left_boundary(left);
    system.set_right_boundary(right);
    system
}

/// An inner cylinder of `radius_a` held at `potential_a` inside a ring of `radius_b` held at
/// `potential_b`, with the region outside the outer ring also at `potential_b`
pub fn coaxial_cylinders(
    extent: Extent,
    radius_a: f64,
    radius_b: f64,
    potential_a: f64,
    potential_b: f64,
) -> UnsolvedSystem<f64> {
    let centre = Coordinate::new(0, 0);
    let mut system = UnsolvedSystem::new(extent);
    for coordinate in extent.coordinates() {
        let radius = ((coordinate.i.pow(2) + coordinate.j.pow(2)) as f64).sqrt();
        if radius >= radius_b {
            system
                .set_boundary_point(coordinate.i, coordinate.j, potential_b)
                .expect("Coordinates of the extent lie on the grid");
        }
    }
    system.set_boundary_ring(centre, radius_b, potential_b);
    system.set_boundary_circle(centre, radius_a, potential_a);
    system
}

/// A grounded cylinder between two plates on the left and right edges
pub fn cylinder_between_plates(
    extent: Extent,
    left: f64,
    right: f64,
    cylinder_radius: f64,
) -> UnsolvedSystem<f64> {
    let mut system = parallel_plates(extent, left, right);
    system.set_boundary_circle(Coordinate::new(0, 0), cylinder_radius, 0.0);
    system
}
