pub mod config;
pub mod error;
pub mod types;

pub use config::WorldConfig;
pub use error::{Result, WorldError};
pub use types::{AgentId, BuildingId, GridCoord, WorldSeed};
