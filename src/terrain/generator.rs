//! Island terrain generation
//!
//! Three independent noise layers (elevation, moisture, temperature) are
//! sampled per tile, elevation is pushed down by the island mask, and each
//! tile is classified into a biome. Sampling has no cross-tile dependency, so
//! large maps are generated row-parallel on the rayon pool and joined before
//! the grid is handed out. An optional majority-vote pass then removes
//! isolated water/land specks.

use rayon::prelude::*;

use crate::core::config::GenerationConfig;
use crate::core::error::{Result, WorldError};
use crate::core::types::WorldSeed;
use crate::terrain::biome::Biome;
use crate::terrain::grid::{TerrainGrid, Tile};
use crate::terrain::island::{apply_mask, edge_distance};
use crate::terrain::noise::NoiseField;

/// Seed offsets for the independent layers
const ELEVATION_SEED_OFFSET: u64 = 0;
const MOISTURE_SEED_OFFSET: u64 = 1;
const TEMPERATURE_SEED_OFFSET: u64 = 2;

/// Largest grid the generator will allocate (4096 x 4096 tiles)
pub const MAX_TILE_COUNT: u64 = 1 << 24;

/// The three noise layers for one seed
struct ClimateFields {
    elevation: NoiseField,
    moisture: NoiseField,
    temperature: NoiseField,
}

impl ClimateFields {
    fn new(seed: WorldSeed, config: &GenerationConfig) -> Self {
        Self {
            elevation: NoiseField::new(seed.offset(ELEVATION_SEED_OFFSET), config.elevation),
            moisture: NoiseField::new(seed.offset(MOISTURE_SEED_OFFSET), config.moisture),
            temperature: NoiseField::new(seed.offset(TEMPERATURE_SEED_OFFSET), config.temperature),
        }
    }
}

/// Builds `TerrainGrid`s that satisfy the island invariant
#[derive(Debug, Clone)]
pub struct TerrainGenerator {
    config: GenerationConfig,
}

impl TerrainGenerator {
    pub fn new(config: GenerationConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    /// Generate a grid sized from a world extent in world units
    pub fn generate_for_world(
        &self,
        seed: WorldSeed,
        world_width: f32,
        world_height: f32,
    ) -> Result<TerrainGrid> {
        let (width, height) = self.tiles_for_world(world_width, world_height)?;
        self.generate(seed, width, height)
    }

    /// Tile counts for a world extent (`world size / tile size`, rounded down).
    /// Extents that would exceed `MAX_TILE_COUNT` tiles are rejected.
    pub fn tiles_for_world(&self, world_width: f32, world_height: f32) -> Result<(u32, u32)> {
        if !(world_width.is_finite() && world_height.is_finite()) {
            return Err(WorldError::InvalidConfig(format!(
                "world size must be finite, got {}x{}",
                world_width, world_height
            )));
        }
        let to_tiles = |extent: f32| (f64::from(extent.max(0.0)) / f64::from(self.config.tile_size)).floor();
        let (tiles_x, tiles_y) = (to_tiles(world_width), to_tiles(world_height));
        if tiles_x * tiles_y > MAX_TILE_COUNT as f64 {
            return Err(WorldError::InvalidDimensions {
                width: tiles_x.min(u32::MAX as f64) as u32,
                height: tiles_y.min(u32::MAX as f64) as u32,
            });
        }
        Ok((tiles_x as u32, tiles_y as u32))
    }

    /// Generate a `width x height` tile grid. Empty grids and grids over
    /// `MAX_TILE_COUNT` tiles are rejected.
    pub fn generate(&self, seed: WorldSeed, width: u32, height: u32) -> Result<TerrainGrid> {
        if width == 0 || height == 0 || u64::from(width) * u64::from(height) > MAX_TILE_COUNT {
            return Err(WorldError::InvalidDimensions { width, height });
        }

        let fields = ClimateFields::new(seed, &self.config);
        let tile_count = width as usize * height as usize;

        let rows: Vec<Vec<Tile>> = if tile_count >= self.config.parallel_threshold {
            (0..height)
                .into_par_iter()
                .map(|y| self.generate_row(&fields, y, width, height))
                .collect()
        } else {
            (0..height)
                .map(|y| self.generate_row(&fields, y, width, height))
                .collect()
        };
        let mut tiles: Vec<Tile> = rows.into_iter().flatten().collect();

        for pass in 0..self.config.smoothing_iterations {
            let changed = self.smooth_pass(&mut tiles, width, height);
            tracing::debug!("Smoothing pass {}: {} tiles changed", pass, changed);
            if changed == 0 {
                break;
            }
        }

        let grid = TerrainGrid::from_tiles(width, height, self.config.tile_size, seed, tiles);
        tracing::debug!(
            "Generated {}x{} terrain for seed {} ({:.1}% walkable)",
            width,
            height,
            seed.value(),
            grid.walkable_fraction() * 100.0
        );
        Ok(grid)
    }

    fn generate_row(&self, fields: &ClimateFields, y: u32, width: u32, height: u32) -> Vec<Tile> {
        (0..width)
            .map(|x| self.generate_tile(fields, x, y, width, height))
            .collect()
    }

    fn generate_tile(&self, fields: &ClimateFields, x: u32, y: u32, width: u32, height: u32) -> Tile {
        let thresholds = &self.config.biomes;
        let (fx, fy) = (x as f64, y as f64);

        let raw_elevation = fields.elevation.sample(fx, fy) as f32;
        let d = edge_distance(x, y, width, height, self.config.island.shape);
        let elevation = apply_mask(raw_elevation, d, &self.config.island);

        let moisture = fields.moisture.sample(fx, fy) as f32;

        // Higher ground is colder
        let altitude = (elevation - thresholds.water_level).max(0.0);
        let temperature = (fields.temperature.sample(fx, fy) as f32
            - altitude * thresholds.altitude_cooling)
            .clamp(0.0, 1.0);

        let biome = Biome::classify(elevation, moisture, temperature, thresholds);
        Tile::new(
            x,
            y,
            biome,
            elevation,
            moisture,
            temperature,
            self.config.mountains_passable,
        )
    }

    /// One majority-vote pass over interior tiles. Returns the number of tiles changed.
    ///
    /// Reads from a snapshot so results don't depend on iteration order.
    fn smooth_pass(&self, tiles: &mut [Tile], width: u32, height: u32) -> usize {
        if width < 3 || height < 3 {
            return 0;
        }

        let snapshot = tiles.to_vec();
        let w = width as usize;
        let majority = self.config.smoothing_majority as usize;
        let mut changed = 0;

        for y in 1..(height as usize - 1) {
            for x in 1..(w - 1) {
                let tile = &snapshot[y * w + x];
                let mut water_votes = [0usize; 2];
                let mut land_votes = [0usize; Biome::ALL.len()];

                for (dx, dy) in NEIGHBOR_OFFSETS {
                    let nx = (x as i32 + dx) as usize;
                    let ny = (y as i32 + dy) as usize;
                    match snapshot[ny * w + nx].biome {
                        Biome::DeepWater => water_votes[0] += 1,
                        Biome::Water => water_votes[1] += 1,
                        other => land_votes[other as usize] += 1,
                    }
                }

                let water_count = water_votes[0] + water_votes[1];
                let land_count = 8 - water_count;

                let replacement = if tile.biome.is_water() && land_count >= majority {
                    Some(most_voted(&land_votes))
                } else if !tile.biome.is_water() && water_count >= majority {
                    Some(if water_votes[1] >= water_votes[0] {
                        Biome::Water
                    } else {
                        Biome::DeepWater
                    })
                } else {
                    None
                };

                if let Some(biome) = replacement {
                    tiles[y * w + x] = tile.with_biome(biome, self.config.mountains_passable);
                    changed += 1;
                }
            }
        }

        changed
    }
}

const NEIGHBOR_OFFSETS: [(i32, i32); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Biome with the most votes; ties go to the earlier biome in `Biome::ALL`
fn most_voted(votes: &[usize]) -> Biome {
    let mut best = Biome::Grassland;
    let mut best_votes = 0;
    for biome in Biome::ALL {
        let v = votes[biome as usize];
        if v > best_votes {
            best = biome;
            best_votes = v;
        }
    }
    best
}
