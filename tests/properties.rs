//! Property tests: island invariant, determinism, obstacle accounting

use isle_core::core::config::{GenerationConfig, PathfindingConfig};
use isle_core::core::types::{GridCoord, WorldSeed};
use isle_core::pathfinding::{footprint_rect, PathfindingEngine, PathfindingGrid};
use isle_core::terrain::{Biome, TerrainGenerator, TerrainGrid};
use proptest::prelude::*;

fn open_grid(width: u32, height: u32) -> PathfindingGrid {
    let biomes = vec![Biome::Grassland; (width * height) as usize];
    let terrain = TerrainGrid::from_biomes(width, height, 4.0, &biomes, true).unwrap();
    PathfindingGrid::from_terrain(&terrain)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_border_always_water(seed in any::<u64>(), width in 1u32..48, height in 1u32..48) {
        let generator = TerrainGenerator::new(GenerationConfig::default()).unwrap();
        let grid = generator.generate(WorldSeed::new(seed), width, height).unwrap();
        prop_assert!(grid.border_is_water());
        for coord in grid.border_coords() {
            prop_assert_eq!(grid.get(coord).unwrap().elevation, 0.0);
        }
    }

    #[test]
    fn prop_generation_is_deterministic(seed in any::<u64>()) {
        let generator = TerrainGenerator::new(GenerationConfig::default()).unwrap();
        let a = generator.generate(WorldSeed::new(seed), 24, 24).unwrap();
        let b = generator.generate(WorldSeed::new(seed), 24, 24).unwrap();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn prop_mark_unmark_restores_walkability(
        footprints in prop::collection::vec((0i32..16, 0i32..16, 1u32..4, 1u32..4), 1..8)
    ) {
        let mut grid = open_grid(16, 16);
        let rects: Vec<Vec<GridCoord>> = footprints
            .iter()
            .map(|&(x, y, w, h)| footprint_rect(GridCoord::new(x, y), w, h))
            .collect();

        for rect in &rects {
            grid.mark_blocked(rect);
        }
        for rect in rects.iter().rev() {
            prop_assert_eq!(grid.unmark_blocked(rect), 0);
        }

        prop_assert!(grid.obstacles().is_empty());
        for y in 0..16 {
            for x in 0..16 {
                prop_assert!(grid.is_walkable(GridCoord::new(x, y)));
            }
        }
    }

    #[test]
    fn prop_open_grid_cost_is_octile(sx in 0i32..12, sy in 0i32..12, gx in 0i32..12, gy in 0i32..12) {
        let grid = open_grid(12, 12);
        let engine = PathfindingEngine::new(&grid, PathfindingConfig::default());
        let start = GridCoord::new(sx, sy);
        let goal = GridCoord::new(gx, gy);

        let result = engine.find_path(start, goal);
        prop_assert!(result.found);
        prop_assert!((result.total_cost - start.octile_distance(&goal)).abs() < 1e-3);
    }
}
