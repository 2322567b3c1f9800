use crate::caster::normalize_angle;
use crate::collision::CollisionResolver;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Turn {
    Left,
    Right,
}

/// The viewpoint. Owned by the session and updated once per tick.
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub pos: [f32; 2],   // (x, y) in world units
    pub heading: f32,    // radians in [0, 2π), 0 = east, π/2 = south
    pub move_speed: f32, // world units per tick
    pub turn_speed: f32, // radians per tick
}

impl Player {
    pub fn new(pos: [f32; 2], heading: f32, move_speed: f32, turn_speed: f32) -> Self {
        Self {
            pos,
            heading: normalize_angle(heading),
            move_speed,
            turn_speed,
        }
    }

    /// Unit vector along the heading.
    #[inline]
    pub fn direction(&self) -> [f32; 2] {
        [self.heading.cos(), self.heading.sin()]
    }

    pub fn rotate(&mut self, delta: f32) {
        self.heading = normalize_angle(self.heading + delta);
    }

    /// Angles grow clockwise on the map, so turning right adds.
    pub fn turn(&mut self, turn: Turn) {
        match turn {
            Turn::Left => self.rotate(-self.turn_speed),
            Turn::Right => self.rotate(self.turn_speed),
        }
    }

    /// Step one tick along (or against) the heading. Blocked axes stay put.
    pub fn move_step(&mut self, forward: bool, resolver: &CollisionResolver<'_>) {
        let [c, s] = self.direction();
        let speed = if forward {
            self.move_speed
        } else {
            -self.move_speed
        };
        self.pos = resolver.resolve(self.pos, [c * speed, s * speed]);
    }
}
