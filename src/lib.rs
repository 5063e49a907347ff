//! Isle Core - island terrain generation, grid pathfinding and viewport culling

pub mod core;
pub mod culling;
pub mod pathfinding;
pub mod terrain;
pub mod world;
