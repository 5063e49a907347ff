use thiserror::Error;

#[derive(Error, Debug)]
pub enum WorldError {
    #[error("Invalid dimensions: {width}x{height} tiles (must be non-empty and within the tile limit)")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("Invalid tile size: {0} (must be finite and positive)")]
    InvalidTileSize(f32),

    #[error("Invalid seed: {0} (must be finite)")]
    InvalidSeed(f64),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Cell out of bounds: ({x}, {y})")]
    OutOfBounds { x: i32, y: i32 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Config parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, WorldError>;
