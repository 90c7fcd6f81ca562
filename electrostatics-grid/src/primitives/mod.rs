//! Rasterisers for the shapes used to paint potentials and boundary conditions
//!
//! Each function returns the distinct cells covered by a shape, sorted by coordinate. `ring`,
//! `disc`, `line` and `rectangle` know nothing of any grid: clipping to a grid, or rejecting
//! shapes which leave it, is left to the caller. `ring_within` and `disc_within` only visit the
//! part of a circle which can overlap an extent, so their cost is bounded by the grid rather than
//! by the radius.
//!
//! Radii which are negative or not finite give no cells.

use crate::{Coordinate, Extent};

/// The one-cell-thick outline of a circle of `radius` about `centre`
///
/// For every integer offset along `i` from zero to `ceil(radius)` the matching `j` offset is
/// `round(sqrt(radius² - offset²))`, or zero once the offset exceeds the radius, and the four
/// mirror images about the centre are taken. The scan is repeated with the roles of `i` and `j`
/// exchanged so steep sections of the outline have no gaps.
pub fn ring(centre: Coordinate, radius: f64) -> Vec<Coordinate> {
    if !is_valid_radius(radius) {
        return Vec::new();
    }
    trace_ring(centre, radius, radius.ceil() as i64, |_| true)
}

/// The cells of [`ring`] which lie inside `extent`
pub fn ring_within(centre: Coordinate, radius: f64, extent: &Extent) -> Vec<Coordinate> {
    if !is_valid_radius(radius) {
        return Vec::new();
    }
    // An offset further than every edge puts the point outside whichever axis carries it
    let farthest = [
        centre.i.abs_diff(extent.i_min()),
        centre.i.abs_diff(extent.i_max()),
        centre.j.abs_diff(extent.j_min()),
        centre.j.abs_diff(extent.j_max()),
    ]
    .into_iter()
    .max()
    .unwrap_or(0)
    .min(i64::MAX as u64) as i64;
    let reach = (radius.ceil() as i64).min(farthest);
    trace_ring(centre, radius, reach, |point| extent.contains(point.i, point.j))
}

/// Every cell whose distance from `centre` is at most `radius`
pub fn disc(centre: Coordinate, radius: f64) -> Vec<Coordinate> {
    if !is_valid_radius(radius) {
        return Vec::new();
    }
    let reach = radius.ceil() as i64;
    fill_disc(
        centre,
        radius,
        (centre.i.saturating_sub(reach), centre.i.saturating_add(reach)),
        (centre.j.saturating_sub(reach), centre.j.saturating_add(reach)),
    )
}

/// The cells of [`disc`] which lie inside `extent`
pub fn disc_within(centre: Coordinate, radius: f64, extent: &Extent) -> Vec<Coordinate> {
    if !is_valid_radius(radius) {
        return Vec::new();
    }
    let reach = radius.ceil() as i64;
    fill_disc(
        centre,
        radius,
        clamp_span(centre.i, reach, extent.i_min(), extent.i_max()),
        clamp_span(centre.j, reach, extent.j_min(), extent.j_max()),
    )
}

/// The inclusive range `centre ± reach` limited to `min..=max`, empty if they do not meet
fn clamp_span(centre: i64, reach: i64, min: i64, max: i64) -> (i64, i64) {
    let centre = i128::from(centre);
    let reach = i128::from(reach);
    let low = (centre - reach).max(i128::from(min));
    let high = (centre + reach).min(i128::from(max));
    if low > high {
        (1, 0)
    } else {
        (low as i64, high as i64)
    }
}

fn is_valid_radius(radius: f64) -> bool {
    radius.is_finite() && radius >= 0.0
}

fn trace_ring(
    centre: Coordinate,
    radius: f64,
    reach: i64,
    keep: impl Fn(&Coordinate) -> bool,
) -> Vec<Coordinate> {
    let mut points = Vec::new();
    for offset in 0..=reach {
        let other = partner_offset(offset, radius);
        for (di, dj) in [(offset, other), (other, offset)] {
            points.extend(mirrored(centre, di, dj).filter(|point| keep(point)));
        }
    }
    points.sort_unstable();
    points.dedup();
    points
}

/// Cells in the inclusive ranges `i` and `j` within `radius` of `centre`, ordered by coordinate
fn fill_disc(centre: Coordinate, radius: f64, i: (i64, i64), j: (i64, i64)) -> Vec<Coordinate> {
    let mut points = Vec::new();
    for i in i.0..=i.1 {
        let di = i as f64 - centre.i as f64;
        for j in j.0..=j.1 {
            let dj = j as f64 - centre.j as f64;
            if (di * di + dj * dj).sqrt() <= radius {
                points.push(Coordinate::new(i, j));
            }
        }
    }
    points
}

fn partner_offset(offset: i64, radius: f64) -> i64 {
    let offset = offset as f64;
    if offset > radius {
        0
    } else {
        (radius * radius - offset * offset).sqrt().round() as i64
    }
}

/// The four reflections of an offset about `centre`, skipping any which overflow
fn mirrored(centre: Coordinate, di: i64, dj: i64) -> impl Iterator<Item = Coordinate> {
    [
        (centre.i.checked_add(di), centre.j.checked_add(dj)),
        (centre.i.checked_sub(di), centre.j.checked_add(dj)),
        (centre.i.checked_add(di), centre.j.checked_sub(dj)),
        (centre.i.checked_sub(di), centre.j.checked_sub(dj)),
    ]
    .into_iter()
    .filter_map(|(i, j)| Some(Coordinate::new(i?, j?)))
}
