use tracing::{info, trace, warn};

use crate::collision::CollisionResolver;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::frame::{Frame, cast_frame};
use crate::map::GridMap;
use crate::player::{Player, Turn};

/// Key state sampled once per tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub move_forward: bool,
    pub move_backward: bool,
    pub turn_left: bool,
    pub turn_right: bool,
}

/// Everything one run needs: the map, the player and the tunables.
#[derive(Debug, Clone)]
pub struct Session {
    map: GridMap,
    player: Player,
    config: Config,
    ticks: u64,
}

impl Session {
    pub fn new(map: GridMap, config: Config) -> Result<Self> {
        config.validate(map.cell_size())?;

        let [x, y] = config.spawn;
        if !CollisionResolver::new(&map, 0.0).can_occupy(x, y) {
            return Err(Error::BlockedSpawn { x, y });
        }
        if !map.is_enclosed() {
            warn!("map border has gaps; rays that find them will end the session");
        }

        let player = Player::new(
            config.spawn,
            config.heading(),
            config.move_speed,
            config.turn_speed(),
        );
        info!(
            width = map.width(),
            height = map.height(),
            x,
            y,
            "session started"
        );
        Ok(Self {
            map,
            player,
            config,
            ticks: 0,
        })
    }

    #[inline]
    pub fn map(&self) -> &GridMap {
        &self.map
    }

    #[inline]
    pub fn player(&self) -> &Player {
        &self.player
    }

    #[inline]
    pub fn config(&self) -> &Config {
        &self.config
    }

    #[inline]
    pub fn tick_count(&self) -> u64 {
        self.ticks
    }

    /// Apply one tick of input. Opposing keys cancel out.
    pub fn update(&mut self, input: TickInput) {
        match (input.turn_left, input.turn_right) {
            (true, false) => self.player.turn(Turn::Left),
            (false, true) => self.player.turn(Turn::Right),
            _ => {}
        }

        let resolver = CollisionResolver::new(&self.map, self.config.collision_margin);
        match (input.move_forward, input.move_backward) {
            (true, false) => self.player.move_step(true, &resolver),
            (false, true) => self.player.move_step(false, &resolver),
            _ => {}
        }
        self.ticks += 1;
    }

    /// The view from the player's current position.
    pub fn cast(&self) -> Result<Frame> {
        cast_frame(
            &self.map,
            &self.player,
            self.config.fov(),
            self.config.ray_count,
        )
    }

    /// Update then cast.
    pub fn tick(&mut self, input: TickInput) -> Result<Frame> {
        self.update(input);
        trace!(
            tick = self.ticks,
            x = self.player.pos[0],
            y = self.player.pos[1],
            heading = self.player.heading,
            "tick"
        );
        self.cast()
    }
}
