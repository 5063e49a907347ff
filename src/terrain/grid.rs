//! Generated tile grid and world/grid coordinate conversion

use std::collections::BTreeMap;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::core::error::{Result, WorldError};
use crate::core::types::{GridCoord, WorldSeed};
use crate::terrain::biome::Biome;

/// A single generated tile. Never mutated after generation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tile {
    pub grid_x: u32,
    pub grid_y: u32,
    pub biome: Biome,
    pub elevation: f32,
    pub moisture: f32,
    pub temperature: f32,
    pub passable: bool,
    /// >= 1.0 for passable tiles, infinite otherwise
    pub movement_cost: f32,
    pub build_value: f32,
}

impl Tile {
    /// Build a tile, deriving passability, cost and build value from the biome
    pub fn new(
        grid_x: u32,
        grid_y: u32,
        biome: Biome,
        elevation: f32,
        moisture: f32,
        temperature: f32,
        mountains_passable: bool,
    ) -> Self {
        let passable = biome.is_passable(mountains_passable);
        Self {
            grid_x,
            grid_y,
            biome,
            elevation,
            moisture,
            temperature,
            passable,
            movement_cost: if passable { biome.movement_cost() } else { f32::INFINITY },
            build_value: if passable { biome.build_value() } else { 0.0 },
        }
    }

    /// Same tile with a different biome; climate values are kept
    pub fn with_biome(&self, biome: Biome, mountains_passable: bool) -> Self {
        Self::new(
            self.grid_x,
            self.grid_y,
            biome,
            self.elevation,
            self.moisture,
            self.temperature,
            mountains_passable,
        )
    }

    pub fn coord(&self) -> GridCoord {
        GridCoord::new(self.grid_x as i32, self.grid_y as i32)
    }
}

/// Dense `width x height` tile grid produced by the terrain generator
#[derive(Debug, Clone, PartialEq)]
pub struct TerrainGrid {
    width: u32,
    height: u32,
    tile_size: f32,
    seed: WorldSeed,
    tiles: Vec<Tile>,
}

impl TerrainGrid {
    /// Assemble a grid from row-major tiles. `tiles.len()` must equal `width * height`.
    pub(crate) fn from_tiles(
        width: u32,
        height: u32,
        tile_size: f32,
        seed: WorldSeed,
        tiles: Vec<Tile>,
    ) -> Self {
        debug_assert_eq!(tiles.len(), (width * height) as usize);
        Self {
            width,
            height,
            tile_size,
            seed,
            tiles,
        }
    }

    /// Build a grid from a row-major biome layout, deriving tile attributes from each biome.
    ///
    /// Used for hand-authored maps and test fixtures; climate values are set to neutral 0.5.
    pub fn from_biomes(
        width: u32,
        height: u32,
        tile_size: f32,
        biomes: &[Biome],
        mountains_passable: bool,
    ) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(WorldError::InvalidDimensions { width, height });
        }
        if biomes.len() != (width * height) as usize {
            return Err(WorldError::InvalidConfig(format!(
                "expected {} biomes for a {}x{} grid, got {}",
                width * height,
                width,
                height,
                biomes.len()
            )));
        }
        if !(tile_size > 0.0 && tile_size.is_finite()) {
            return Err(WorldError::InvalidTileSize(tile_size));
        }

        let tiles = biomes
            .iter()
            .enumerate()
            .map(|(i, &biome)| {
                let elevation = if biome.is_water() { 0.0 } else { 0.5 };
                Tile::new(
                    i as u32 % width,
                    i as u32 / width,
                    biome,
                    elevation,
                    0.5,
                    0.5,
                    mountains_passable,
                )
            })
            .collect();

        Ok(Self::from_tiles(width, height, tile_size, WorldSeed(0), tiles))
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn tile_size(&self) -> f32 {
        self.tile_size
    }

    pub fn seed(&self) -> WorldSeed {
        self.seed
    }

    /// World extent in world units (pixels)
    pub fn world_size(&self) -> Vec2 {
        Vec2::new(
            self.width as f32 * self.tile_size,
            self.height as f32 * self.tile_size,
        )
    }

    #[inline]
    pub fn in_bounds(&self, coord: GridCoord) -> bool {
        coord.x >= 0 && coord.y >= 0 && (coord.x as u32) < self.width && (coord.y as u32) < self.height
    }

    #[inline]
    pub fn index_of(&self, coord: GridCoord) -> Option<usize> {
        if self.in_bounds(coord) {
            Some(coord.y as usize * self.width as usize + coord.x as usize)
        } else {
            None
        }
    }

    #[inline]
    pub fn get(&self, coord: GridCoord) -> Option<&Tile> {
        self.index_of(coord).map(|i| &self.tiles[i])
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Convert a world position to the tile containing it
    pub fn world_to_cell(&self, pos: Vec2) -> Option<GridCoord> {
        let coord = GridCoord::new(
            (pos.x / self.tile_size).floor() as i32,
            (pos.y / self.tile_size).floor() as i32,
        );
        self.in_bounds(coord).then_some(coord)
    }

    /// Tile centre in world coordinates
    pub fn cell_center(&self, coord: GridCoord) -> Vec2 {
        cell_center(coord, self.tile_size)
    }

    /// Is every tile on the outer ring water?
    pub fn border_is_water(&self) -> bool {
        self.border_coords()
            .all(|c| self.get(c).map(|t| t.biome.is_water()).unwrap_or(false))
    }

    /// Iterate over the outer ring
    pub fn border_coords(&self) -> impl Iterator<Item = GridCoord> + '_ {
        let w = self.width as i32;
        let h = self.height as i32;
        (0..h).flat_map(move |y| {
            (0..w).filter_map(move |x| {
                (x == 0 || y == 0 || x == w - 1 || y == h - 1).then_some(GridCoord::new(x, y))
            })
        })
    }

    /// Number of tiles per biome, in biome order
    pub fn biome_counts(&self) -> BTreeMap<Biome, usize> {
        let mut counts = BTreeMap::new();
        for tile in &self.tiles {
            *counts.entry(tile.biome).or_insert(0) += 1;
        }
        counts
    }

    /// Share of passable tiles, in `[0, 1]`
    pub fn walkable_fraction(&self) -> f32 {
        if self.tiles.is_empty() {
            return 0.0;
        }
        let passable = self.tiles.iter().filter(|t| t.passable).count();
        passable as f32 / self.tiles.len() as f32
    }
}

/// Tile centre for a given tile size
#[inline]
pub fn cell_center(coord: GridCoord, tile_size: f32) -> Vec2 {
    Vec2::new(
        (coord.x as f32 + 0.5) * tile_size,
        (coord.y as f32 + 0.5) * tile_size,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_grid(width: u32, height: u32, biome: Biome) -> TerrainGrid {
        let biomes = vec![biome; (width * height) as usize];
        TerrainGrid::from_biomes(width, height, 4.0, &biomes, true).unwrap()
    }

    #[test]
    fn test_from_biomes_rejects_wrong_length() {
        let result = TerrainGrid::from_biomes(3, 3, 4.0, &[Biome::Grassland; 4], true);
        assert!(matches!(result, Err(WorldError::InvalidConfig(_))));
    }

    #[test]
    fn test_from_biomes_derives_attributes() {
        let grid = TerrainGrid::from_biomes(2, 1, 4.0, &[Biome::Forest, Biome::Water], true).unwrap();
        let forest = grid.get(GridCoord::new(0, 0)).unwrap();
        assert!(forest.passable);
        assert_eq!(forest.movement_cost, 1.5);
        let water = grid.get(GridCoord::new(1, 0)).unwrap();
        assert!(!water.passable);
        assert_eq!(water.coord(), GridCoord::new(1, 0));
    }

    #[test]
    fn test_world_to_cell() {
        let grid = flat_grid(10, 10, Biome::Grassland);
        assert_eq!(grid.world_to_cell(Vec2::new(0.0, 0.0)), Some(GridCoord::new(0, 0)));
        assert_eq!(grid.world_to_cell(Vec2::new(5.0, 9.0)), Some(GridCoord::new(1, 2)));
        assert_eq!(grid.world_to_cell(Vec2::new(40.0, 0.0)), None);
        assert_eq!(grid.world_to_cell(Vec2::new(-1.0, 0.0)), None);
    }

    #[test]
    fn test_cell_center_roundtrip() {
        let grid = flat_grid(10, 10, Biome::Grassland);
        let coord = GridCoord::new(3, 7);
        let center = grid.cell_center(coord);
        assert_eq!(center, Vec2::new(14.0, 30.0));
        assert_eq!(grid.world_to_cell(center), Some(coord));
    }

    #[test]
    fn test_border_coords_count() {
        let grid = flat_grid(5, 4, Biome::Water);
        assert_eq!(grid.border_coords().count(), 2 * 5 + 2 * 2);
        assert!(grid.border_is_water());
    }

    #[test]
    fn test_land_border_detected() {
        let grid = flat_grid(5, 5, Biome::Grassland);
        assert!(!grid.border_is_water());
        assert_eq!(grid.walkable_fraction(), 1.0);
        assert_eq!(grid.biome_counts().get(&Biome::Grassland), Some(&25));
    }
}
