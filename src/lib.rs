//! Grid ray-casting core: DDA wall traversal, fisheye-corrected distances,
//! texture column sampling and collision-checked player movement.
//!
//! The crate only produces data. Each tick a [`Session`] turns a
//! [`TickInput`] into a [`Frame`] of [`RayHit`]s, one per screen column;
//! drawing them is left to the caller.

pub mod caster;
pub mod collision;
pub mod config;
pub mod error;
pub mod frame;
pub mod map;
pub mod player;
pub mod session;
pub mod texture;

pub use caster::{RayHit, Side, cast_ray};
pub use collision::CollisionResolver;
pub use config::Config;
pub use error::{Error, Result};
pub use frame::{Frame, cast_frame};
pub use map::GridMap;
pub use player::{Player, Turn};
pub use session::{Session, TickInput};
pub use texture::{Shading, Texture, TextureSet, sample_column};
