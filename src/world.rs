//! World context: terrain, pathfinding grid, buildings and path refresh
//!
//! Owns everything that must stay consistent across building placement and
//! regeneration. Persisted state is only the seed, the world extent and the
//! building footprints; terrain and obstacles are rebuilt on restore.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::config::WorldConfig;
use crate::core::error::{Result, WorldError};
use crate::core::types::{AgentId, BuildingId, GridCoord, WorldSeed};
use crate::pathfinding::astar::{PathRequest, PathResult, PathfindingEngine};
use crate::pathfinding::grid::PathfindingGrid;
use crate::pathfinding::refresh::PathRefresh;
use crate::terrain::generator::TerrainGenerator;
use crate::terrain::grid::TerrainGrid;

/// Building entry in a save file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedBuilding {
    pub id: BuildingId,
    pub cells: Vec<GridCoord>,
}

/// Everything needed to rebuild a world
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldSave {
    pub seed: WorldSeed,
    pub world_width: f32,
    pub world_height: f32,
    pub buildings: Vec<SavedBuilding>,
}

impl WorldSave {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }
}

pub struct World {
    config: WorldConfig,
    generator: TerrainGenerator,
    seed: WorldSeed,
    world_width: f32,
    world_height: f32,
    terrain: TerrainGrid,
    pathing: PathfindingGrid,
    buildings: BTreeMap<BuildingId, Vec<GridCoord>>,
    /// Next id to hand out; one past `u32::MAX` means the id space is used up
    next_building_id: u64,
    refresh: PathRefresh,
}

impl World {
    /// Generate terrain for a `world_width x world_height` extent (world units)
    /// and build its pathfinding grid
    pub fn generate(seed: WorldSeed, world_width: f32, world_height: f32, config: WorldConfig) -> Result<Self> {
        config.validate()?;
        let generator = TerrainGenerator::new(config.generation.clone())?;
        let terrain = generator.generate_for_world(seed, world_width, world_height)?;
        let pathing = PathfindingGrid::from_terrain(&terrain);

        tracing::info!(
            "Generated world seed={} ({}x{} tiles, {:.0}% walkable)",
            seed.value(),
            terrain.width(),
            terrain.height(),
            terrain.walkable_fraction() * 100.0
        );

        Ok(Self {
            config,
            generator,
            seed,
            world_width,
            world_height,
            terrain,
            pathing,
            buildings: BTreeMap::new(),
            next_building_id: 0,
            refresh: PathRefresh::new(),
        })
    }

    /// Rebuild a world from a save: same terrain, same buildings and ids
    pub fn restore(save: &WorldSave, config: WorldConfig) -> Result<Self> {
        let mut world = Self::generate(save.seed, save.world_width, save.world_height, config)?;
        for building in &save.buildings {
            world.check_footprint(&building.cells)?;
            world.insert_building(building.id, building.cells.clone())?;
        }
        world.next_building_id = save
            .buildings
            .iter()
            .map(|b| u64::from(b.id.0) + 1)
            .max()
            .unwrap_or(0);
        Ok(world)
    }

    pub fn snapshot(&self) -> WorldSave {
        WorldSave {
            seed: self.seed,
            world_width: self.world_width,
            world_height: self.world_height,
            buildings: self
                .buildings
                .iter()
                .map(|(&id, cells)| SavedBuilding {
                    id,
                    cells: cells.clone(),
                })
                .collect(),
        }
    }

    /// Replace the terrain with a fresh one for `seed`. Buildings, obstacles
    /// and tracked paths are dropped.
    pub fn regenerate(&mut self, seed: WorldSeed) -> Result<()> {
        let terrain = self
            .generator
            .generate_for_world(seed, self.world_width, self.world_height)?;
        self.pathing.rebuild(&terrain);
        self.terrain = terrain;
        self.seed = seed;
        self.buildings.clear();
        self.next_building_id = 0;
        self.refresh.clear();

        tracing::info!("Regenerated world with seed={}", seed.value());
        Ok(())
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    pub fn seed(&self) -> WorldSeed {
        self.seed
    }

    pub fn terrain(&self) -> &TerrainGrid {
        &self.terrain
    }

    pub fn pathing(&self) -> &PathfindingGrid {
        &self.pathing
    }

    pub fn building_count(&self) -> usize {
        self.buildings.len()
    }

    pub fn building(&self, id: BuildingId) -> Option<&[GridCoord]> {
        self.buildings.get(&id).map(Vec::as_slice)
    }

    /// Register a building footprint and block its cells.
    ///
    /// Every cell must be inside the grid. Overlapping footprints are allowed;
    /// shared cells stay blocked until all of them are removed.
    pub fn place_building(&mut self, footprint: &[GridCoord]) -> Result<BuildingId> {
        self.check_footprint(footprint)?;
        let id = u32::try_from(self.next_building_id)
            .map(BuildingId)
            .map_err(|_| WorldError::InvalidConfig("building id space exhausted".into()))?;
        self.insert_building(id, footprint.to_vec())?;
        self.next_building_id += 1;
        Ok(id)
    }

    /// Remove a building and release its cells. False if the id is unknown.
    pub fn remove_building(&mut self, id: BuildingId) -> bool {
        match self.buildings.remove(&id) {
            Some(cells) => {
                self.pathing.unmark_blocked(&cells);
                self.refresh.mark_dirty();
                true
            }
            None => false,
        }
    }

    fn check_footprint(&self, footprint: &[GridCoord]) -> Result<()> {
        match footprint.iter().find(|c| !self.pathing.in_bounds(**c)) {
            Some(cell) => Err(WorldError::OutOfBounds { x: cell.x, y: cell.y }),
            None => Ok(()),
        }
    }

    fn insert_building(&mut self, id: BuildingId, cells: Vec<GridCoord>) -> Result<()> {
        if self.buildings.contains_key(&id) {
            return Err(WorldError::InvalidConfig(format!(
                "duplicate building id {}",
                id.0
            )));
        }
        self.pathing.mark_blocked(&cells);
        self.buildings.insert(id, cells);
        self.refresh.mark_dirty();
        Ok(())
    }

    pub fn engine(&self) -> PathfindingEngine<'_> {
        PathfindingEngine::new(&self.pathing, self.config.pathfinding)
    }

    pub fn find_path(&self, start: GridCoord, goal: GridCoord) -> PathResult {
        self.engine().find_path(start, goal)
    }

    /// Closest walkable cell to `cell` within `max_radius` rings
    pub fn nearest_passable(&self, cell: GridCoord, max_radius: u32) -> Option<GridCoord> {
        self.pathing.nearest_walkable(cell, max_radius)
    }

    /// Keep an agent's path up to date across building changes
    pub fn track_agent_path(&mut self, agent: AgentId, request: PathRequest) {
        self.refresh.track(agent, request);
    }

    pub fn untrack_agent_path(&mut self, agent: AgentId) -> Option<PathRequest> {
        self.refresh.untrack(agent)
    }

    /// Run once per simulation tick. Returns recomputed paths, if any.
    pub fn tick(&mut self) -> Vec<(AgentId, PathResult)> {
        let engine = PathfindingEngine::new(&self.pathing, self.config.pathfinding);
        self.refresh.run_pending(&engine)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pathfinding::grid::footprint_rect;

    fn small_world() -> World {
        World::generate(WorldSeed::new(42), 160.0, 160.0, WorldConfig::default()).unwrap()
    }

    fn land_cell(world: &World) -> GridCoord {
        let center = GridCoord::new(
            world.terrain().width() as i32 / 2,
            world.terrain().height() as i32 / 2,
        );
        world.nearest_passable(center, 20).unwrap()
    }

    #[test]
    fn test_generate_sizes_grid_from_world_extent() {
        let world = small_world();
        assert_eq!(world.terrain().width(), 40);
        assert_eq!(world.pathing().height(), 40);
        assert!(world.terrain().border_is_water());
    }

    #[test]
    fn test_place_and_remove_building() {
        let mut world = small_world();
        let cell = land_cell(&world);

        let id = world.place_building(&[cell]).unwrap();
        assert!(!world.pathing().is_walkable(cell));
        assert_eq!(world.building_count(), 1);

        assert!(world.remove_building(id));
        assert!(world.pathing().is_walkable(cell));
        assert!(!world.remove_building(id));
    }

    #[test]
    fn test_overlapping_buildings_refcount() {
        let mut world = small_world();
        let cell = land_cell(&world);

        let a = world.place_building(&[cell]).unwrap();
        let b = world.place_building(&[cell]).unwrap();
        assert_ne!(a, b);
        world.remove_building(a);
        assert!(!world.pathing().is_walkable(cell));
        world.remove_building(b);
        assert!(world.pathing().is_walkable(cell));
    }

    #[test]
    fn test_out_of_bounds_footprint_rejected() {
        let mut world = small_world();
        let result = world.place_building(&footprint_rect(GridCoord::new(38, 38), 4, 4));
        assert!(matches!(result, Err(WorldError::OutOfBounds { x: 40, .. })));
        assert_eq!(world.building_count(), 0);
        assert_eq!(world.pathing().obstacles().len(), 0);
    }

    #[test]
    fn test_regenerate_clears_buildings() {
        let mut world = small_world();
        let cell = land_cell(&world);
        world.place_building(&[cell]).unwrap();

        world.regenerate(WorldSeed::new(7)).unwrap();
        assert_eq!(world.seed(), WorldSeed::new(7));
        assert_eq!(world.building_count(), 0);
        assert!(world.pathing().obstacles().is_empty());
    }

    #[test]
    fn test_snapshot_restore() {
        let mut world = small_world();
        let cell = land_cell(&world);
        let id = world.place_building(&[cell]).unwrap();

        let json = world.snapshot().to_json().unwrap();
        let save = WorldSave::from_json(&json).unwrap();
        let mut restored = World::restore(&save, WorldConfig::default()).unwrap();

        assert_eq!(restored.terrain(), world.terrain());
        assert!(!restored.pathing().is_walkable(cell));
        assert_eq!(restored.building(id), Some(&[cell][..]));

        // Fresh ids continue after the restored ones
        let next = restored.place_building(&[cell]).unwrap();
        assert!(next > id);
    }

    #[test]
    fn test_restore_rejects_duplicate_building_ids() {
        let world = small_world();
        let cell = land_cell(&world);
        let mut save = world.snapshot();
        save.buildings = vec![
            SavedBuilding { id: BuildingId(3), cells: vec![cell] },
            SavedBuilding { id: BuildingId(3), cells: vec![cell] },
        ];

        let result = World::restore(&save, WorldConfig::default());
        assert!(matches!(result, Err(WorldError::InvalidConfig(_))));
    }

    #[test]
    fn test_restore_with_max_id_never_reuses_it() {
        let world = small_world();
        let cell = land_cell(&world);
        let mut save = world.snapshot();
        save.buildings = vec![SavedBuilding { id: BuildingId(u32::MAX), cells: vec![cell] }];

        let mut restored = World::restore(&save, WorldConfig::default()).unwrap();
        let result = restored.place_building(&[cell]);
        assert!(matches!(result, Err(WorldError::InvalidConfig(_))));

        // The restored building is intact and still releases its cell
        assert_eq!(restored.building_count(), 1);
        assert_eq!(restored.pathing().obstacle_count(cell), 1);
        assert!(restored.remove_building(BuildingId(u32::MAX)));
        assert!(restored.pathing().is_walkable(cell));
    }

    #[test]
    fn test_tick_refreshes_tracked_paths() {
        let mut world = small_world();
        let cell = land_cell(&world);
        world.track_agent_path(AgentId::new(1), PathRequest::new(cell, cell));

        let first = world.tick();
        assert_eq!(first.len(), 1);
        assert!(first[0].1.found);
        assert!(world.tick().is_empty());

        world.place_building(&[cell]).unwrap();
        let after = world.tick();
        assert_eq!(after.len(), 1);
        assert!(!after[0].1.found);
    }
}
