use rayon::prelude::*;

use crate::caster::{RayHit, cast_ray};
use crate::error::Result;
use crate::map::GridMap;
use crate::player::Player;

/// One hit per screen column, left to right.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    hits: Vec<RayHit>,
}

impl Frame {
    #[inline]
    pub fn len(&self) -> usize {
        self.hits.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    #[inline]
    pub fn hits(&self) -> &[RayHit] {
        &self.hits
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RayHit> {
        self.hits.iter()
    }

    /// Closest wall in view.
    pub fn nearest(&self) -> Option<&RayHit> {
        self.hits.iter().min_by(|a, b| a.distance.total_cmp(&b.distance))
    }
}

impl<'a> IntoIterator for &'a Frame {
    type Item = &'a RayHit;
    type IntoIter = std::slice::Iter<'a, RayHit>;

    fn into_iter(self) -> Self::IntoIter {
        self.hits.iter()
    }
}

/// Angle of column `i` out of `ray_count`, spread evenly over
/// `[heading - fov/2, heading + fov/2]`.
#[inline]
pub fn column_angle(heading: f32, fov: f32, i: usize, ray_count: usize) -> f32 {
    if ray_count <= 1 {
        return heading;
    }
    heading - 0.5 * fov + fov * (i as f32 / (ray_count - 1) as f32)
}

/// Cast one ray per column for the player's current view. Rays only read the
/// map, so they are cast in parallel; collection keeps column order.
pub fn cast_frame(map: &GridMap, player: &Player, fov: f32, ray_count: usize) -> Result<Frame> {
    let hits = (0..ray_count)
        .into_par_iter()
        .map(|i| {
            let angle = column_angle(player.heading, fov, i, ray_count);
            cast_ray(map, player.pos, angle, player.heading)
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(Frame { hits })
}
