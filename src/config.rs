use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::texture::Shading;

/// Session tunables. Missing fields fall back to [`Config::default`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub fov_degrees: f32,
    /// Rays per frame, one per framebuffer column.
    pub ray_count: usize,
    /// World units per tick. Must not exceed one cell.
    pub move_speed: f32,
    pub turn_speed_degrees: f32,
    /// Lookahead past the destination when probing for walls, world units.
    pub collision_margin: f32,
    pub spawn: [f32; 2],
    pub heading_degrees: f32,
    pub lightness: f32,
    pub shadow: f32,
    pub max_brightness: f32,
    /// Wall height in screen heights at unit distance.
    pub projection_scale: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fov_degrees: 50.0,
            ray_count: 320,
            move_speed: 0.08,
            turn_speed_degrees: 2.5,
            collision_margin: 0.1,
            spawn: [1.5, 1.5],
            heading_degrees: 45.0,
            lightness: 4.0,
            shadow: 2.0,
            max_brightness: 1.0,
            projection_scale: 1.0,
        }
    }
}

impl Config {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    #[inline]
    pub fn fov(&self) -> f32 {
        self.fov_degrees.to_radians()
    }

    #[inline]
    pub fn turn_speed(&self) -> f32 {
        self.turn_speed_degrees.to_radians()
    }

    #[inline]
    pub fn heading(&self) -> f32 {
        self.heading_degrees.to_radians()
    }

    pub fn shading(&self) -> Shading {
        Shading {
            lightness: self.lightness,
            shadow: self.shadow,
            max_brightness: self.max_brightness,
        }
    }

    /// Check the values against a map's cell size. Collision only probes the
    /// destination point, so a step longer than a cell could skip a wall.
    pub fn validate(&self, cell_size: f32) -> Result<()> {
        let finite = [
            self.fov_degrees,
            self.move_speed,
            self.turn_speed_degrees,
            self.collision_margin,
            self.spawn[0],
            self.spawn[1],
            self.heading_degrees,
            self.lightness,
            self.shadow,
            self.max_brightness,
            self.projection_scale,
        ];
        if finite.iter().any(|v| !v.is_finite()) {
            return Err(Error::InvalidConfig("values must be finite".into()));
        }
        if self.move_speed <= 0.0 || self.move_speed > cell_size {
            return Err(Error::InvalidConfig(format!(
                "move_speed {} must be in (0, {cell_size}]",
                self.move_speed
            )));
        }
        if self.collision_margin < 0.0 || self.collision_margin >= cell_size {
            return Err(Error::InvalidConfig(format!(
                "collision_margin {} must be in [0, {cell_size})",
                self.collision_margin
            )));
        }
        if self.fov_degrees <= 0.0 || self.fov_degrees >= 180.0 {
            return Err(Error::InvalidConfig(format!(
                "fov_degrees {} must be in (0, 180)",
                self.fov_degrees
            )));
        }
        if self.ray_count == 0 {
            return Err(Error::InvalidConfig("ray_count must be at least 1".into()));
        }
        if self.lightness <= 0.0 || self.shadow < 1.0 || self.max_brightness <= 0.0 {
            return Err(Error::InvalidConfig(
                "lightness and max_brightness must be positive, shadow at least 1".into(),
            ));
        }
        if self.projection_scale <= 0.0 {
            return Err(Error::InvalidConfig("projection_scale must be positive".into()));
        }
        Ok(())
    }
}
