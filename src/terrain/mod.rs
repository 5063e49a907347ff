//! Terrain generation: noise, island mask, biomes and the tile grid

pub mod biome;
pub mod generator;
pub mod grid;
pub mod island;
pub mod noise;

pub use biome::Biome;
pub use generator::TerrainGenerator;
pub use grid::{TerrainGrid, Tile};
pub use noise::NoiseField;
