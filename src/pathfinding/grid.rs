//! Walkability and cost lookup for path search
//!
//! Combines the static terrain costs with the dynamic obstacle layer.
//! Obstacle updates touch only the footprint cells; the terrain part is
//! replaced wholesale by `rebuild` after regeneration.

use ahash::AHashSet;
use glam::Vec2;

use crate::core::types::GridCoord;
use crate::pathfinding::astar::PathResult;
use crate::pathfinding::obstacles::ObstacleLayer;
use crate::terrain::grid::{cell_center, TerrainGrid};

/// Search-facing view of terrain passability/cost plus building obstacles
#[derive(Debug, Clone)]
pub struct PathfindingGrid {
    width: u32,
    height: u32,
    tile_size: f32,
    /// Terrain movement cost per cell, infinite where the terrain is impassable
    costs: Vec<f32>,
    min_cost: f32,
    obstacles: ObstacleLayer,
}

impl PathfindingGrid {
    pub fn from_terrain(terrain: &TerrainGrid) -> Self {
        let mut grid = Self {
            width: 0,
            height: 0,
            tile_size: terrain.tile_size(),
            costs: Vec::new(),
            min_cost: 1.0,
            obstacles: ObstacleLayer::new(),
        };
        grid.rebuild(terrain);
        grid
    }

    /// Replace the terrain data and clear every obstacle
    pub fn rebuild(&mut self, terrain: &TerrainGrid) {
        self.width = terrain.width();
        self.height = terrain.height();
        self.tile_size = terrain.tile_size();
        self.costs = terrain
            .tiles()
            .iter()
            .map(|t| if t.passable { t.movement_cost } else { f32::INFINITY })
            .collect();
        self.min_cost = self
            .costs
            .iter()
            .copied()
            .filter(|c| c.is_finite() && *c > 0.0)
            .fold(f32::INFINITY, f32::min);
        if !self.min_cost.is_finite() {
            self.min_cost = 1.0;
        }
        self.obstacles.clear();
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

    /// Cheapest per-tile cost on the map, used to keep the heuristic admissible
    pub fn min_cost(&self) -> f32 {
        self.min_cost
    }

    pub fn obstacles(&self) -> &ObstacleLayer {
        &self.obstacles
    }

    #[inline]
    pub fn in_bounds(&self, cell: GridCoord) -> bool {
        cell.x >= 0 && cell.y >= 0 && (cell.x as u32) < self.width && (cell.y as u32) < self.height
    }

    #[inline]
    pub(crate) fn index_of(&self, cell: GridCoord) -> Option<usize> {
        if self.in_bounds(cell) {
            Some(cell.y as usize * self.width as usize + cell.x as usize)
        } else {
            None
        }
    }

    #[inline]
    pub(crate) fn coord_of(&self, index: usize) -> GridCoord {
        let w = self.width as usize;
        GridCoord::new((index % w) as i32, (index / w) as i32)
    }

    /// Terrain movement cost; infinite for impassable terrain or out of bounds.
    /// Obstacles are not reflected here, check `is_walkable`.
    #[inline]
    pub fn cost(&self, cell: GridCoord) -> f32 {
        self.index_of(cell)
            .map(|i| self.costs[i])
            .unwrap_or(f32::INFINITY)
    }

    /// Passable terrain and not covered by any obstacle
    #[inline]
    pub fn is_walkable(&self, cell: GridCoord) -> bool {
        self.cost(cell).is_finite() && !self.obstacles.is_blocked(cell)
    }

    /// Number of footprints currently blocking a cell
    pub fn obstacle_count(&self, cell: GridCoord) -> u32 {
        self.obstacles.count(cell)
    }

    /// Add one obstacle reference to every in-bounds cell of a footprint.
    ///
    /// Duplicate cells within one footprint count once. Returns the number of
    /// cells marked.
    pub fn mark_blocked(&mut self, footprint: &[GridCoord]) -> usize {
        let cells = self.footprint_cells(footprint);
        for &cell in &cells {
            self.obstacles.block(cell);
        }
        cells.len()
    }

    /// Remove one obstacle reference from every in-bounds cell of a footprint.
    ///
    /// Cells that were not blocked stay at zero and are logged. Returns the
    /// number of such stray cells.
    pub fn unmark_blocked(&mut self, footprint: &[GridCoord]) -> usize {
        let cells = self.footprint_cells(footprint);
        let mut stray = 0;
        for &cell in &cells {
            if !self.obstacles.unblock(cell) {
                stray += 1;
            }
        }
        if stray > 0 {
            tracing::warn!(
                "Unmarked {} cell(s) with no matching obstacle reference",
                stray
            );
        }
        stray
    }

    fn footprint_cells(&self, footprint: &[GridCoord]) -> Vec<GridCoord> {
        let mut seen = AHashSet::with_capacity(footprint.len());
        footprint
            .iter()
            .copied()
            .filter(|&c| self.in_bounds(c) && seen.insert(c))
            .collect()
    }

    /// Tile centre in world coordinates
    pub fn cell_center(&self, cell: GridCoord) -> Vec2 {
        cell_center(cell, self.tile_size)
    }

    /// Tile containing a world position, if inside the map
    pub fn world_to_cell(&self, pos: Vec2) -> Option<GridCoord> {
        let cell = GridCoord::new(
            (pos.x / self.tile_size).floor() as i32,
            (pos.y / self.tile_size).floor() as i32,
        );
        self.in_bounds(cell).then_some(cell)
    }

    /// Closest walkable cell to `origin` within `max_radius` rings (Chebyshev).
    ///
    /// Within a ring the cell nearest in straight-line distance wins; ties go to
    /// the smaller `(x, y)`. Only ring perimeters are visited, and the search
    /// stops once a ring lies wholly outside the grid.
    pub fn nearest_walkable(&self, origin: GridCoord, max_radius: u32) -> Option<GridCoord> {
        let (ox, oy) = (origin.x as i64, origin.y as i64);
        let (w, h) = (self.width as i64, self.height as i64);

        // Farthest ring that can still touch an in-bounds cell
        let reach = [ox, w - 1 - ox, oy, h - 1 - oy]
            .into_iter()
            .map(i64::abs)
            .max()
            .unwrap_or(0);
        let max_radius = (max_radius as i64).min(reach);

        for radius in 0..=max_radius {
            let mut best: Option<(i64, GridCoord)> = None;
            let mut consider = |x: i64, y: i64| {
                if x < 0 || y < 0 || x >= w || y >= h {
                    return;
                }
                let cell = GridCoord::new(x as i32, y as i32);
                if !self.is_walkable(cell) {
                    return;
                }
                let (dx, dy) = (x - ox, y - oy);
                let dist_sq = dx * dx + dy * dy;
                let better = match best {
                    None => true,
                    Some((d, c)) => dist_sq < d || (dist_sq == d && cell < c),
                };
                if better {
                    best = Some((dist_sq, cell));
                }
            };

            if radius == 0 {
                consider(ox, oy);
            } else {
                for x in (ox - radius)..=(ox + radius) {
                    consider(x, oy - radius);
                    consider(x, oy + radius);
                }
                for y in (oy - radius + 1)..=(oy + radius - 1) {
                    consider(ox - radius, y);
                    consider(ox + radius, y);
                }
            }

            if let Some((_, cell)) = best {
                return Some(cell);
            }
        }
        None
    }

    /// Is every cell of a previously computed path still walkable?
    pub fn path_is_clear(&self, path: &PathResult) -> bool {
        path.found && path.cells.iter().all(|&c| self.is_walkable(c))
    }
}

/// Cells covered by a `width x height` rectangle with its top-left at `origin`
pub fn footprint_rect(origin: GridCoord, width: u32, height: u32) -> Vec<GridCoord> {
    let mut cells = Vec::with_capacity((width * height) as usize);
    for dy in 0..height as i32 {
        for dx in 0..width as i32 {
            cells.push(GridCoord::new(origin.x + dx, origin.y + dy));
        }
    }
    cells
}
