/// Errors surfaced by the ray-casting core.
///
/// Per-ray numeric edge cases (near-axis angles) are handled inside the caster
/// and never show up here. Everything below aborts the session.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("malformed map: {0}")]
    MalformedMap(String),
    #[error("ray escaped the map at cell ({col}, {row}); the map must be enclosed by walls")]
    RayEscapedBounds { col: i64, row: i64 },
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error("spawn point ({x}, {y}) is not a free cell")]
    BlockedSpawn { x: f32, y: f32 },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
