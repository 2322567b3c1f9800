//! Wall textures and column sampling.
//!
//! Colours are packed `0x00RRGGBB`, the same layout the framebuffer uses.

use crate::caster::{RayHit, Side};

#[inline]
pub fn pack_rgb(r: u8, g: u8, b: u8) -> u32 {
    (b as u32) | ((g as u32) << 8) | ((r as u32) << 16)
}

/// Scale each channel by `factor`, saturating at 255.
#[inline]
pub fn shade(color: u32, factor: f32) -> u32 {
    let scale = |c: u32| ((c & 0xFF) as f32 * factor).clamp(0.0, 255.0) as u32;
    let r = scale(color >> 16);
    let g = scale(color >> 8);
    let b = scale(color);
    (r << 16) | (g << 8) | b
}

/// Flat colour for a wall id when no textures are loaded.
pub fn palette(wall_id: u32) -> u32 {
    match wall_id {
        1 => pack_rgb(255, 0, 0),
        2 => pack_rgb(0, 255, 0),
        3 => pack_rgb(0, 0, 255),
        4 => pack_rgb(255, 255, 0),
        5 => pack_rgb(0, 255, 255),
        6 => pack_rgb(255, 0, 255),
        _ => pack_rgb(200, 200, 200),
    }
}

/// A `width`x`height` image stored column by column.
#[derive(Debug, Clone, PartialEq)]
pub struct Texture {
    width: usize,
    height: usize,
    texels: Vec<u32>,
}

impl Texture {
    /// Build from a texel function `f(x, y)`, `y` counted from the top.
    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(usize, usize) -> u32) -> Self {
        let mut texels = Vec::with_capacity(width * height);
        for x in 0..width {
            for y in 0..height {
                texels.push(f(x, y));
            }
        }
        Self {
            width,
            height,
            texels,
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// A texture with no texels in some dimension has nothing to sample.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Texel column `x`, top to bottom. `x` is clamped to the last column.
    #[inline]
    pub fn column(&self, x: usize) -> &[u32] {
        let x = x.min(self.width.saturating_sub(1));
        &self.texels[x * self.height..(x + 1) * self.height]
    }
}

/// Two textures per wall id, one for each [`Side`].
#[derive(Debug, Clone, Default)]
pub struct TextureSet {
    walls: Vec<[Texture; 2]>, // [north/south, east/west]
}

impl TextureSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, north_south: Texture, east_west: Texture) {
        self.walls.push([north_south, east_west]);
    }

    pub fn len(&self) -> usize {
        self.walls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.walls.is_empty()
    }

    /// Texture for a wall id (1-based). Ids past the end wrap around. Empty
    /// textures are skipped so callers fall back to the flat palette.
    pub fn get(&self, wall_id: u32, side: Side) -> Option<&Texture> {
        if self.walls.is_empty() || wall_id == 0 {
            return None;
        }
        let pair = &self.walls[(wall_id as usize - 1) % self.walls.len()];
        let tex = match side {
            Side::NorthSouth => &pair[0],
            Side::EastWest => &pair[1],
        };
        (!tex.is_empty()).then_some(tex)
    }

    /// Generated patterns tinted by the wall palette: bricks, checks and
    /// planks in turn. East/west faces get a slightly darker mortar.
    pub fn procedural(wall_ids: u32, size: usize) -> Self {
        let size = size.max(4);
        let mut set = Self::new();
        for id in 1..=wall_ids {
            let base = palette(id);
            let pattern = (id - 1) % 3;
            let make = |mortar: u32| {
                Texture::from_fn(size, size, |x, y| match pattern {
                    0 => {
                        let brick_h = size / 4;
                        let course = y / brick_h;
                        let offset = if course % 2 == 0 { 0 } else { size / 4 };
                        let edge = y % brick_h == 0 || (x + offset) % (size / 2) == 0;
                        if edge { mortar } else { shade(base, 0.85) }
                    }
                    1 => {
                        let cell = size / 4;
                        if (x / cell + y / cell) % 2 == 0 {
                            base
                        } else {
                            shade(base, 0.6)
                        }
                    }
                    _ => {
                        let plank = size / 8;
                        let grain = 0.75 + 0.25 * (((x * 7 + y * 3) % 5) as f32 / 4.0);
                        if x % plank.max(1) == 0 {
                            mortar
                        } else {
                            shade(base, grain)
                        }
                    }
                })
            };
            set.push(make(pack_rgb(90, 90, 90)), make(pack_rgb(60, 60, 60)));
        }
        set
    }
}

/// Distance falloff and side shadowing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shading {
    pub lightness: f32,
    /// Divisor applied to east/west faces.
    pub shadow: f32,
    pub max_brightness: f32,
}

impl Default for Shading {
    fn default() -> Self {
        Self {
            lightness: 4.0,
            shadow: 2.0,
            max_brightness: 1.0,
        }
    }
}

impl Shading {
    pub fn brightness(&self, hit: &RayHit) -> f32 {
        let b = (self.lightness / hit.distance).min(self.max_brightness);
        match hit.side {
            Side::NorthSouth => b,
            Side::EastWest => b / self.shadow,
        }
    }
}

/// Shaded colour samples for the wall strip behind `hit`, top to bottom.
///
/// With textures this is one full texture column; without, a single flat
/// sample the renderer stretches over the whole strip.
pub fn sample_column(hit: &RayHit, textures: Option<&TextureSet>, shading: &Shading) -> Vec<u32> {
    let brightness = shading.brightness(hit);
    match textures.and_then(|set| set.get(hit.wall_id, hit.side)) {
        Some(tex) => {
            let x = (hit.wall_fraction * tex.width() as f32) as usize;
            tex.column(x).iter().map(|&c| shade(c, brightness)).collect()
        }
        None => vec![shade(palette(hit.wall_id), brightness)],
    }
}
