use crate::map::GridMap;

/// Point-in-wall tests and per-axis move resolution against a [`GridMap`].
#[derive(Debug, Clone, Copy)]
pub struct CollisionResolver<'a> {
    map: &'a GridMap,
    margin: f32, // lookahead past the destination, world units
}

impl<'a> CollisionResolver<'a> {
    pub fn new(map: &'a GridMap, margin: f32) -> Self {
        Self { map, margin }
    }

    #[inline]
    pub fn margin(&self) -> f32 {
        self.margin
    }

    /// Whether a point lies in an open cell. Anything outside the grid is
    /// blocked.
    #[inline]
    pub fn can_occupy(&self, x: f32, y: f32) -> bool {
        let (col, row) = self.map.cell_of(x, y);
        self.map.cell_at(col, row) == Some(0)
    }

    /// Apply `delta` to `pos` one axis at a time, x first, so a diagonal move
    /// into a wall still slides along it. Each axis probes its destination
    /// and the destination pushed out by the margin in the direction of
    /// travel; both must be open.
    pub fn resolve(&self, pos: [f32; 2], delta: [f32; 2]) -> [f32; 2] {
        let [x, y] = pos;
        let [dx, dy] = delta;

        let new_x = if dx != 0.0 && self.step_open(x + dx, dx, |v| (v, y)) {
            x + dx
        } else {
            x
        };
        // y is probed from the settled x so a diagonal step cannot cut a corner
        let new_y = if dy != 0.0 && self.step_open(y + dy, dy, |v| (new_x, v)) {
            y + dy
        } else {
            y
        };

        [new_x, new_y]
    }

    /// `dest` itself must be open, not only the lookahead point: a long step
    /// can put the lookahead past a one-cell wall.
    #[inline]
    fn step_open(&self, dest: f32, d: f32, point: impl Fn(f32) -> (f32, f32)) -> bool {
        [dest, dest + self.margin.copysign(d)].into_iter().all(|v| {
            let (x, y) = point(v);
            self.can_occupy(x, y)
        })
    }
}
