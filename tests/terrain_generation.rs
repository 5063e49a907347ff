//! Integration tests for island generation through the public API

use isle_core::core::config::{FalloffShape, GenerationConfig, WorldConfig};
use isle_core::core::types::{GridCoord, WorldSeed};
use isle_core::terrain::{Biome, NoiseField, TerrainGenerator};

fn generator() -> TerrainGenerator {
    TerrainGenerator::new(GenerationConfig::default()).unwrap()
}

#[test]
fn test_seed_42_world_is_an_island() {
    let grid = generator().generate_for_world(WorldSeed::new(42), 400.0, 400.0).unwrap();

    assert_eq!((grid.width(), grid.height()), (100, 100));
    assert!(grid.border_is_water());
    for coord in grid.border_coords() {
        let tile = grid.get(coord).unwrap();
        assert!(tile.biome.is_water(), "border tile {:?} is {:?}", coord, tile.biome);
        assert!(!tile.passable);
    }

    let counts = grid.biome_counts();
    assert_eq!(counts.values().sum::<usize>(), 10_000);
    let land: usize = counts
        .iter()
        .filter(|(biome, _)| !biome.is_water())
        .map(|(_, n)| n)
        .sum();
    assert!(land > 1_000, "only {} land tiles", land);
}

#[test]
fn test_same_seed_same_world() {
    let gen = generator();
    let a = gen.generate(WorldSeed::new(1234), 60, 45).unwrap();
    let b = gen.generate(WorldSeed::new(1234), 60, 45).unwrap();
    assert_eq!(a, b);

    let c = gen.generate(WorldSeed::new(1235), 60, 45).unwrap();
    assert_ne!(a, c);
}

#[test]
fn test_float_seed_truncates() {
    let gen = generator();
    let a = gen.generate(WorldSeed::from_f64(99.7).unwrap(), 30, 30).unwrap();
    let b = gen.generate(WorldSeed::new(99), 30, 30).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_radial_falloff_keeps_border_water() {
    let config = WorldConfig::from_toml_str(
        r#"
        [generation.island]
        shape = "radial"
        power = 2.0
        "#,
    )
    .unwrap();
    assert_eq!(config.generation.island.shape, FalloffShape::Radial);

    let gen = TerrainGenerator::new(config.generation).unwrap();
    for seed in [1u64, 2, 3] {
        let grid = gen.generate(WorldSeed::new(seed), 48, 32).unwrap();
        assert!(grid.border_is_water());
    }
}

#[test]
fn test_tiny_grids() {
    let gen = generator();
    for (w, h) in [(1, 1), (2, 2), (1, 5), (3, 1)] {
        let grid = gen.generate(WorldSeed::new(5), w, h).unwrap();
        assert_eq!(grid.tiles().len(), (w * h) as usize);
        assert!(grid.tiles().iter().all(|t| t.biome.is_water()));
        assert_eq!(grid.walkable_fraction(), 0.0);
    }
}

#[test]
fn test_world_cell_conversion() {
    let grid = generator().generate(WorldSeed::new(3), 20, 10).unwrap();
    let center = grid.cell_center(GridCoord::new(4, 7));
    assert_eq!(grid.world_to_cell(center), Some(GridCoord::new(4, 7)));
    assert_eq!(grid.world_to_cell(glam::Vec2::new(-1.0, 0.0)), None);
    assert_eq!(grid.world_size(), glam::Vec2::new(80.0, 40.0));
}

#[test]
fn test_noise_field_is_pure() {
    let config = GenerationConfig::default().elevation;
    let a = NoiseField::new(WorldSeed::new(8), config);
    let b = NoiseField::new(WorldSeed::new(8), config);
    for i in 0..50 {
        let (x, y) = (i as f64 * 1.37, i as f64 * -0.71);
        let v = a.sample(x, y);
        assert_eq!(v, b.sample(x, y));
        assert!((0.0..=1.0).contains(&v));
    }
}

#[test]
fn test_water_tiles_are_never_buildable() {
    let grid = generator().generate(WorldSeed::new(77), 64, 64).unwrap();
    for tile in grid.tiles() {
        if matches!(tile.biome, Biome::Water | Biome::DeepWater) {
            assert_eq!(tile.build_value, 0.0);
            assert!(tile.movement_cost.is_infinite());
        }
    }
}
