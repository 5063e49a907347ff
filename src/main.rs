//! Isle Core - world generation driver
//!
//! Generates an island from a seed, prints the biome histogram and the
//! walkable share, and optionally runs a path test between two cells.

use std::path::PathBuf;

use clap::Parser;
use isle_core::core::config::WorldConfig;
use isle_core::core::error::Result;
use isle_core::core::types::{GridCoord, WorldSeed};
use isle_core::world::World;

/// Generate an island world and inspect it
#[derive(Parser, Debug)]
#[command(name = "isle")]
#[command(about = "Generate an island world and run path tests on it")]
struct Args {
    /// Generation seed
    #[arg(long, default_value_t = 42.0)]
    seed: f64,

    /// World width in world units
    #[arg(long, default_value_t = 400.0)]
    width: f32,

    /// World height in world units
    #[arg(long, default_value_t = 400.0)]
    height: f32,

    /// Tile size in world units (overrides the config file)
    #[arg(long)]
    tile_size: Option<f32>,

    /// TOML config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Path test start cell, as `x,y`
    #[arg(long, value_parser = parse_cell)]
    from: Option<GridCoord>,

    /// Path test goal cell, as `x,y`
    #[arg(long, value_parser = parse_cell)]
    to: Option<GridCoord>,
}

fn parse_cell(s: &str) -> std::result::Result<GridCoord, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected x,y but got '{}'", s))?;
    let x = x.trim().parse::<i32>().map_err(|e| e.to_string())?;
    let y = y.trim().parse::<i32>().map_err(|e| e.to_string())?;
    Ok(GridCoord::new(x, y))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "isle_core=info".into()),
        )
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => WorldConfig::load(path)?,
        None => WorldConfig::default(),
    };
    if let Some(tile_size) = args.tile_size {
        config.generation.tile_size = tile_size;
    }

    let seed = WorldSeed::from_f64(args.seed)?;
    let world = World::generate(seed, args.width, args.height, config)?;
    let terrain = world.terrain();

    println!("\n=== ISLAND seed={} ===", seed.value());
    println!(
        "{}x{} tiles, tile size {}",
        terrain.width(),
        terrain.height(),
        terrain.tile_size()
    );
    println!();

    let total = terrain.tiles().len() as f32;
    for (biome, count) in terrain.biome_counts() {
        println!(
            "  {:<12} {:>7}  {:>5.1}%",
            biome.name(),
            count,
            count as f32 / total * 100.0
        );
    }
    println!();
    println!("Walkable: {:.1}%", terrain.walkable_fraction() * 100.0);
    println!("Border is water: {}", terrain.border_is_water());

    match (args.from, args.to) {
        (Some(from), Some(to)) => run_path_test(&world, from, to),
        (None, None) => {}
        _ => println!("\nPath test needs both --from and --to"),
    }

    Ok(())
}

fn run_path_test(world: &World, from: GridCoord, to: GridCoord) {
    println!("\n--- Path test ({},{}) -> ({},{}) ---", from.x, from.y, to.x, to.y);

    let result = world.find_path(from, to);
    if !result.found {
        println!("No path ({} nodes expanded)", result.expanded);
        return;
    }

    println!(
        "Cost {:.2}, {} cells, {} waypoints, {} nodes expanded",
        result.total_cost,
        result.cells.len(),
        result.waypoints.len(),
        result.expanded
    );
    for point in &result.waypoints {
        println!("  ({:.1}, {:.1})", point.x, point.y);
    }
}
