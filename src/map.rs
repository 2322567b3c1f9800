use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::error::{Error, Result};

/// Built-in level. Row 0 is the north edge.
const DEMO: [[u32; 20]; 20] = [
    [1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
    [1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
    [1, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
    [1, 0, 1, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 1, 1, 1, 1, 0, 0, 1],
    [1, 0, 1, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
    [1, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
    [1, 1, 1, 0, 0, 1, 0, 0, 0, 4, 4, 4, 0, 0, 0, 0, 0, 0, 0, 1],
    [1, 0, 0, 0, 0, 0, 0, 0, 0, 4, 0, 4, 0, 0, 5, 5, 0, 0, 0, 1],
    [1, 0, 0, 0, 0, 0, 0, 0, 0, 4, 0, 4, 0, 0, 5, 5, 0, 0, 0, 1],
    [1, 0, 0, 0, 0, 0, 0, 0, 0, 4, 4, 4, 0, 0, 0, 0, 0, 0, 0, 1],
    [2, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
    [1, 0, 2, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
    [1, 0, 3, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 1, 1, 1, 1, 1, 0, 1],
    [1, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 1, 0, 0, 1],
    [1, 1, 1, 0, 0, 1, 0, 0, 1, 1, 1, 1, 0, 1, 0, 0, 1, 0, 1, 1],
    [1, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 1, 0, 0, 1, 0, 0, 1],
    [1, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 1, 3, 0, 1, 6, 0, 1],
    [1, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 1, 0, 0, 0, 6, 0, 1],
    [1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 1],
    [1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
];

fn default_cell_size() -> f32 {
    1.0
}

/// On-disk map document.
#[derive(Debug, Deserialize)]
struct MapFile {
    #[serde(default = "default_cell_size")]
    cell_size: f32,
    cells: Vec<Vec<u32>>,
}

/// Rectangular grid of cell codes. `0` is open floor, anything else is a wall
/// whose code doubles as its texture id.
///
/// World `x` runs along columns and world `y` along rows, so row 0 is the
/// north edge and `y` grows southwards.
#[derive(Debug, Clone, PartialEq)]
pub struct GridMap {
    cells: Vec<u32>, // row-major
    width: usize,
    height: usize,
    cell_size: f32,
}

impl GridMap {
    pub fn new(rows: Vec<Vec<u32>>, cell_size: f32) -> Result<Self> {
        if !cell_size.is_finite() || cell_size <= 0.0 {
            return Err(Error::MalformedMap(format!(
                "cell size must be positive and finite, got {cell_size}"
            )));
        }
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        if height == 0 || width == 0 {
            return Err(Error::MalformedMap("grid is empty".into()));
        }
        if let Some((row, r)) = rows.iter().enumerate().find(|(_, r)| r.len() != width) {
            return Err(Error::MalformedMap(format!(
                "row {row} has {} cells, expected {width}",
                r.len()
            )));
        }

        let cells: Vec<u32> = rows.into_iter().flatten().collect();
        debug!(width, height, cell_size, "grid map built");
        Ok(Self {
            cells,
            width,
            height,
            cell_size,
        })
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let file: MapFile = serde_json::from_str(json)?;
        Self::new(file.cells, file.cell_size)
    }

    /// Load a map from disk. `.json` files are parsed as a map document,
    /// anything else as ASCII art.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json_str(&text)
        } else {
            Self::from_ascii(&text, default_cell_size())
        }
    }

    /// Parse ASCII art: `.`, `0` or space is floor, `#` is wall 1 and digits
    /// `1`-`9` are that wall id. Trailing whitespace is dropped, so ragged
    /// input is rejected like any other non-rectangular grid.
    pub fn from_ascii(text: &str, cell_size: f32) -> Result<Self> {
        let lines: Vec<&str> = text.lines().map(str::trim_end).collect();
        let first = lines.iter().position(|l| !l.is_empty());
        let last = lines.iter().rposition(|l| !l.is_empty());
        let (Some(first), Some(last)) = (first, last) else {
            return Err(Error::MalformedMap("grid is empty".into()));
        };

        let mut rows = Vec::with_capacity(last - first + 1);
        for (i, line) in lines[first..=last].iter().enumerate() {
            let row = line
                .chars()
                .map(|c| match c {
                    '.' | ' ' | '0' => Ok(0),
                    '#' => Ok(1),
                    '1'..='9' => Ok(c as u32 - '0' as u32),
                    other => Err(Error::MalformedMap(format!(
                        "unexpected character {other:?} on line {}",
                        first + i + 1
                    ))),
                })
                .collect::<Result<Vec<u32>>>()?;
            rows.push(row);
        }
        Self::new(rows, cell_size)
    }

    /// The built-in 20x20 level.
    pub fn demo() -> Self {
        Self {
            cells: DEMO.iter().flatten().copied().collect(),
            width: 20,
            height: 20,
            cell_size: 1.0,
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

    #[inline]
    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Cell code at `(col, row)`, or `None` outside the grid.
    #[inline]
    pub fn cell_at(&self, col: isize, row: isize) -> Option<u32> {
        if col < 0 || row < 0 {
            return None;
        }
        let (col, row) = (col as usize, row as usize);
        if col >= self.width || row >= self.height {
            return None;
        }
        Some(self.cells[row * self.width + col])
    }

    #[inline]
    pub fn is_wall(&self, col: isize, row: isize) -> bool {
        self.cell_at(col, row).is_some_and(|code| code != 0)
    }

    /// Cell enclosing a world position.
    #[inline]
    pub fn cell_of(&self, x: f32, y: f32) -> (isize, isize) {
        (
            (x / self.cell_size).floor() as isize,
            (y / self.cell_size).floor() as isize,
        )
    }

    /// True when every border cell is a wall, so no ray can leave the grid.
    pub fn is_enclosed(&self) -> bool {
        let (w, h) = (self.width as isize, self.height as isize);
        let top_bottom = (0..w).all(|c| self.is_wall(c, 0) && self.is_wall(c, h - 1));
        let sides = (0..h).all(|r| self.is_wall(0, r) && self.is_wall(w - 1, r));
        top_bottom && sides
    }

    /// Rows of cell codes, north to south.
    pub fn rows(&self) -> impl Iterator<Item = &[u32]> {
        self.cells.chunks(self.width)
    }
}
