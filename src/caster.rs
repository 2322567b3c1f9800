//! Single-ray grid traversal.
//!
//! Rays are stepped from one grid-line crossing to the next (DDA), so every
//! cell boundary the ray touches is visited exactly and there is no fixed
//! step size to tune. All stepping happens in grid units; results are scaled
//! back to world units by the map's cell size.

use std::f32::consts::TAU;

use tracing::error;

use crate::error::{Error, Result};
use crate::map::GridMap;

/// Direction components smaller than this are treated as axis-aligned.
pub const NEAR_ZERO: f32 = 1e-8;
/// Stand-in for an infinite crossing distance on an axis the ray runs
/// parallel to. Far beyond any map, but finite so comparisons stay ordered.
pub const RAY_CLAMP: f32 = 1e8;
/// Lower bound on reported distances, keeps projection free of divide-by-zero.
pub const MIN_DISTANCE: f32 = 1e-4;

/// Which family of grid lines the ray crossed to reach the wall.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// A horizontal grid line: the north or south face of a cell.
    NorthSouth,
    /// A vertical grid line: the east or west face of a cell.
    EastWest,
}

/// Result of one cast.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Distance projected onto the view axis (no fisheye), world units.
    pub distance: f32,
    /// Raw length along the ray, world units.
    pub ray_length: f32,
    pub side: Side,
    pub wall_id: u32,
    /// Where along the face the ray landed, in `[0, 1)`.
    pub wall_fraction: f32,
    /// Column and row of the wall cell.
    pub cell: [isize; 2],
}

/// Wrap an angle into `[0, 2π)`.
#[inline]
pub fn normalize_angle(angle: f32) -> f32 {
    let a = angle.rem_euclid(TAU);
    // rem_euclid can round up to TAU for tiny negative inputs
    if a >= TAU { 0.0 } else { a }
}

#[inline]
fn fraction(v: f32) -> f32 {
    let f = v - v.floor();
    if f.is_finite() && f < 1.0 { f } else { 0.0 }
}

/// Stepping state along one axis.
#[derive(Debug, Clone, Copy)]
struct Axis {
    step: isize, // +1 / -1 in cell index
    next: f32,   // ray distance to the next crossing on this axis
    delta: f32,  // ray distance between successive crossings
}

impl Axis {
    /// `origin` is in grid units, `component` is this axis' share of the unit
    /// ray direction. Near-zero components clamp both distances to
    /// [`RAY_CLAMP`] so the axis never wins a comparison inside the map.
    fn new(origin: f32, component: f32) -> Self {
        let step = if component > 0.0 { 1 } else { -1 };
        if component.abs() < NEAR_ZERO {
            return Self {
                step,
                next: RAY_CLAMP,
                delta: RAY_CLAMP,
            };
        }

        let delta = (1.0 / component.abs()).min(RAY_CLAMP);
        let cell = origin.floor();
        let gap = if step > 0 {
            cell + 1.0 - origin
        } else {
            origin - cell
        };
        Self {
            step,
            next: (gap * delta).min(RAY_CLAMP),
            delta,
        }
    }
}

/// Ties go to the vertical grid line so corner hits are reproducible.
#[inline]
fn vertical_first(x: &Axis, y: &Axis) -> bool {
    x.next <= y.next
}

fn escaped(col: isize, row: isize) -> Error {
    error!(col, row, "ray left the map; is it enclosed by walls?");
    Error::RayEscapedBounds {
        col: col as i64,
        row: row as i64,
    }
}

/// Cast one ray from `origin` (world units) at `ray_angle` and report the
/// first wall it meets. `view_heading` is the direction the viewer faces and
/// only affects the fisheye-corrected `distance`.
pub fn cast_ray(
    map: &GridMap,
    origin: [f32; 2],
    ray_angle: f32,
    view_heading: f32,
) -> Result<RayHit> {
    let angle = normalize_angle(ray_angle);
    let (dir_x, dir_y) = (angle.cos(), angle.sin());

    let cell_size = map.cell_size();
    let (ox, oy) = (origin[0] / cell_size, origin[1] / cell_size);
    let mut col = ox.floor() as isize;
    let mut row = oy.floor() as isize;
    if map.cell_at(col, row).is_none() {
        return Err(escaped(col, row));
    }

    let mut xs = Axis::new(ox, dir_x);
    let mut ys = Axis::new(oy, dir_y);

    let (t, side, wall_id) = loop {
        let (t, side) = if vertical_first(&xs, &ys) {
            let t = xs.next;
            xs.next += xs.delta;
            col += xs.step;
            (t, Side::EastWest)
        } else {
            let t = ys.next;
            ys.next += ys.delta;
            row += ys.step;
            (t, Side::NorthSouth)
        };

        match map.cell_at(col, row) {
            None => return Err(escaped(col, row)),
            Some(0) => continue,
            Some(id) => break (t, side, id),
        }
    };

    let wall_fraction = match side {
        Side::EastWest => fraction(oy + t * dir_y),
        Side::NorthSouth => fraction(ox + t * dir_x),
    };

    let ray_length = t * cell_size;
    // Raw inputs, not the normalized angle, so the centre ray gets cos(0) == 1
    let distance = (ray_length * (ray_angle - view_heading).cos()).max(MIN_DISTANCE);

    Ok(RayHit {
        distance,
        ray_length,
        side,
        wall_id,
        wall_fraction,
        cell: [col, row],
    })
}

#[cfg(test)]
mod tests {
    use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, PI};

    use super::*;

    /// `size`x`size` map with a border of `id` walls.
    fn bordered(size: usize, id: u32) -> GridMap {
        let rows = (0..size)
            .map(|r| {
                (0..size)
                    .map(|c| {
                        if r == 0 || c == 0 || r == size - 1 || c == size - 1 {
                            id
                        } else {
                            0
                        }
                    })
                    .collect()
            })
            .collect();
        GridMap::new(rows, 1.0).unwrap()
    }

    #[test]
    fn east_wall_straight_ahead() {
        let map = bordered(10, 3);
        let hit = cast_ray(&map, [5.0, 5.0], 0.0, 0.0).unwrap();
        assert!((hit.distance - 4.0).abs() < 1e-5);
        assert_eq!(hit.side, Side::EastWest);
        assert_eq!(hit.wall_id, 3);
        assert_eq!(hit.cell, [9, 5]);
    }

    #[test]
    fn cardinal_directions() {
        let map = bordered(10, 1);
        let south = cast_ray(&map, [5.5, 5.5], FRAC_PI_2, FRAC_PI_2).unwrap();
        assert_eq!(south.side, Side::NorthSouth);
        assert_eq!(south.cell, [5, 9]);
        assert!((south.distance - 3.5).abs() < 1e-4);

        let west = cast_ray(&map, [5.5, 5.5], PI, PI).unwrap();
        assert_eq!(west.side, Side::EastWest);
        assert_eq!(west.cell, [0, 5]);
        assert!((west.distance - 4.5).abs() < 1e-4);

        let north = cast_ray(&map, [5.5, 5.5], 3.0 * FRAC_PI_2, 3.0 * FRAC_PI_2).unwrap();
        assert_eq!(north.side, Side::NorthSouth);
        assert_eq!(north.cell, [5, 0]);
        assert!((north.distance - 4.5).abs() < 1e-4);
    }

    #[test]
    fn centre_ray_is_not_corrected() {
        let map = GridMap::demo();
        for i in 0..64 {
            let angle = i as f32 * 0.098;
            let hit = cast_ray(&map, [1.5, 1.5], angle, angle).unwrap();
            assert_eq!(hit.distance, hit.ray_length.max(MIN_DISTANCE));
        }
    }

    #[test]
    fn off_centre_rays_are_projected() {
        let map = bordered(10, 1);
        // Every ray that lands on the east wall is exactly 4 units ahead of
        // a viewer at x = 5 facing east.
        for angle in [-0.6f32, -0.3, 0.1, 0.3, 0.6] {
            let hit = cast_ray(&map, [5.0, 5.0], angle, 0.0).unwrap();
            assert_eq!(hit.side, Side::EastWest);
            assert!((hit.distance - 4.0).abs() < 1e-4, "angle {angle}: {hit:?}");
            assert!(hit.ray_length > hit.distance);
        }
    }

    #[test]
    fn wall_fraction_is_where_the_face_was_hit() {
        let map = bordered(10, 1);
        let hit = cast_ray(&map, [5.0, 5.25], 0.0, 0.0).unwrap();
        assert!((hit.wall_fraction - 0.25).abs() < 1e-5);

        let hit = cast_ray(&map, [5.75, 5.5], 3.0 * FRAC_PI_2, 3.0 * FRAC_PI_2).unwrap();
        assert!((hit.wall_fraction - 0.75).abs() < 1e-4);
    }

    #[test]
    fn fractions_stay_in_range() {
        let map = GridMap::demo();
        for i in 0..720 {
            let angle = i as f32 * (TAU / 720.0);
            let hit = cast_ray(&map, [7.3, 4.6], angle, 0.0).unwrap();
            assert!((0.0..1.0).contains(&hit.wall_fraction), "{hit:?}");
            assert!(hit.distance >= MIN_DISTANCE);
            assert!(hit.wall_id > 0);
        }
    }

    #[test]
    fn casting_is_deterministic() {
        let map = GridMap::demo();
        for i in 0..200 {
            let angle = i as f32 * 0.0317;
            let a = cast_ray(&map, [3.3, 8.1], angle, 1.0).unwrap();
            let b = cast_ray(&map, [3.3, 8.1], angle, 1.0).unwrap();
            assert_eq!(a.distance.to_bits(), b.distance.to_bits());
            assert_eq!(a.wall_fraction.to_bits(), b.wall_fraction.to_bits());
            assert_eq!((a.side, a.wall_id, a.cell), (b.side, b.wall_id, b.cell));
        }
    }

    #[test]
    fn cell_size_scales_distances() {
        let rows = bordered(10, 1).rows().map(<[u32]>::to_vec).collect();
        let map = GridMap::new(rows, 64.0).unwrap();
        let hit = cast_ray(&map, [320.0, 320.0], 0.0, 0.0).unwrap();
        assert!((hit.distance - 256.0).abs() < 1e-2);
        assert_eq!(hit.cell, [9, 5]);
    }

    #[test]
    fn unenclosed_map_is_reported() {
        let map = GridMap::from_ascii("###\n#..\n###", 1.0).unwrap();
        let err = cast_ray(&map, [1.5, 1.5], 0.0, 0.0).unwrap_err();
        assert!(matches!(err, Error::RayEscapedBounds { col: 3, row: 1 }));
    }

    #[test]
    fn origin_outside_the_map_is_reported() {
        let map = bordered(5, 1);
        assert!(matches!(
            cast_ray(&map, [-2.0, 2.5], 0.0, 0.0),
            Err(Error::RayEscapedBounds { .. })
        ));
    }

    #[test]
    fn parallel_axis_is_clamped() {
        let axis = Axis::new(5.0, 0.0);
        assert_eq!(axis.next, RAY_CLAMP);
        assert_eq!(axis.delta, RAY_CLAMP);

        let axis = Axis::new(5.25, -1.0);
        assert_eq!(axis.step, -1);
        assert!((axis.next - 0.25).abs() < 1e-6);
        assert_eq!(axis.delta, 1.0);
    }

    #[test]
    fn corner_ties_prefer_vertical_lines() {
        let x = Axis {
            step: 1,
            next: 0.5,
            delta: 1.0,
        };
        let y = Axis {
            step: 1,
            next: 0.5,
            delta: 1.0,
        };
        assert!(vertical_first(&x, &y));
    }

    #[test]
    fn ray_through_exact_corners_crosses_vertical_lines_first() {
        let map = bordered(10, 1);
        let angle = FRAC_PI_4;
        // Equal components make every crossing a corner
        assert_eq!(angle.cos().to_bits(), angle.sin().to_bits());

        let hit = cast_ray(&map, [5.5, 5.5], angle, angle).unwrap();
        // (5,5) -> (6,5) -> (6,6) -> (7,6) -> (7,7) -> (8,7) -> (8,8) -> (9,8)
        assert_eq!(hit.side, Side::EastWest);
        assert_eq!(hit.cell, [9, 8]);
        assert!((hit.ray_length - 3.5 * std::f32::consts::SQRT_2).abs() < 1e-4);
    }

    #[test]
    fn angles_wrap() {
        assert_eq!(normalize_angle(0.0), 0.0);
        assert!((normalize_angle(-FRAC_PI_2) - 3.0 * FRAC_PI_2).abs() < 1e-6);
        assert!((normalize_angle(5.0 * PI) - PI).abs() < 1e-5);
        assert!(normalize_angle(-1e-9) < TAU);
    }
}
