//! A* pathfinding over the tile grid
//!
//! 8-directional moves, diagonal steps cost `cost * sqrt(2)`. The heuristic is
//! the octile distance scaled by the cheapest tile on the map, so it never
//! overestimates. Ties on `f` go to the node with the smaller `h`, then the
//! smaller cell index, which makes results reproducible for identical input.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::f32::consts::SQRT_2;

use glam::Vec2;
use ordered_float::OrderedFloat;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::core::config::PathfindingConfig;
use crate::core::types::GridCoord;
use crate::pathfinding::grid::PathfindingGrid;

/// Start/goal pair in tile coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PathRequest {
    pub start: GridCoord,
    pub goal: GridCoord,
}

impl PathRequest {
    pub fn new(start: GridCoord, goal: GridCoord) -> Self {
        Self { start, goal }
    }
}

/// Outcome of a path search. `found == false` is a normal result, not an error.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PathResult {
    pub found: bool,
    /// Cell centres in world units, simplified if configured
    pub waypoints: Vec<Vec2>,
    /// Every cell on the path, start and goal included
    pub cells: Vec<GridCoord>,
    pub total_cost: f32,
    /// Nodes expanded by the search
    pub expanded: usize,
}

impl PathResult {
    pub fn not_found(expanded: usize) -> Self {
        Self {
            expanded,
            ..Self::default()
        }
    }
}

/// Node in the A* open set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct OpenNode {
    f: OrderedFloat<f32>,
    h: OrderedFloat<f32>,
    index: usize,
}

impl Ord for OpenNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse order for min-heap
        other
            .f
            .cmp(&self.f)
            .then_with(|| other.h.cmp(&self.h))
            .then_with(|| other.index.cmp(&self.index))
    }
}

impl PartialOrd for OpenNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A* search over a read-only `PathfindingGrid`
#[derive(Debug, Clone, Copy)]
pub struct PathfindingEngine<'a> {
    grid: &'a PathfindingGrid,
    config: PathfindingConfig,
}

impl<'a> PathfindingEngine<'a> {
    pub fn new(grid: &'a PathfindingGrid, config: PathfindingConfig) -> Self {
        Self { grid, config }
    }

    pub fn grid(&self) -> &'a PathfindingGrid {
        self.grid
    }

    pub fn find_request(&self, request: &PathRequest) -> PathResult {
        self.find_path(request.start, request.goal)
    }

    /// Run a batch of searches, in parallel once the batch is large enough.
    /// Results are in request order.
    pub fn find_paths(&self, requests: &[PathRequest]) -> Vec<PathResult> {
        if requests.len() >= self.config.parallel_threshold {
            requests.par_iter().map(|r| self.find_request(r)).collect()
        } else {
            requests.iter().map(|r| self.find_request(r)).collect()
        }
    }

    /// Find a path from `start` to `goal`
    ///
    /// Returns `found == false` without searching if either endpoint is out of
    /// bounds or unwalkable, and after searching if the open set runs dry or
    /// the expansion cap is exceeded.
    pub fn find_path(&self, start: GridCoord, goal: GridCoord) -> PathResult {
        let grid = self.grid;

        let (Some(start_idx), Some(goal_idx)) = (grid.index_of(start), grid.index_of(goal)) else {
            return PathResult::not_found(0);
        };
        if !grid.is_walkable(start) || !grid.is_walkable(goal) {
            return PathResult::not_found(0);
        }

        if start == goal {
            return self.build_result(vec![start], 0.0, 0);
        }

        let cell_count = grid.width() as usize * grid.height() as usize;
        let mut g_scores = vec![f32::INFINITY; cell_count];
        let mut came_from = vec![usize::MAX; cell_count];
        let mut closed = vec![false; cell_count];
        let mut open_set = BinaryHeap::new();

        let h_scale = grid.min_cost();
        let heuristic = |cell: GridCoord| cell.octile_distance(&goal) * h_scale;

        g_scores[start_idx] = 0.0;
        let h = heuristic(start);
        open_set.push(OpenNode {
            f: OrderedFloat(h),
            h: OrderedFloat(h),
            index: start_idx,
        });

        let mut expanded = 0;

        while let Some(current) = open_set.pop() {
            if closed[current.index] {
                continue;
            }
            if current.index == goal_idx {
                let cells = reconstruct_path(grid, &came_from, goal_idx);
                return self.build_result(cells, g_scores[goal_idx], expanded);
            }

            closed[current.index] = true;
            expanded += 1;
            if expanded > self.config.max_expansions {
                tracing::warn!(
                    "Path search {:?} -> {:?} hit expansion cap ({})",
                    start,
                    goal,
                    self.config.max_expansions
                );
                return PathResult::not_found(expanded);
            }

            let current_coord = grid.coord_of(current.index);
            let current_g = g_scores[current.index];

            for (i, neighbor) in current_coord.neighbors().into_iter().enumerate() {
                let Some(neighbor_idx) = grid.index_of(neighbor) else {
                    continue;
                };
                if closed[neighbor_idx] || !grid.is_walkable(neighbor) {
                    continue;
                }

                // neighbors() lists the four orthogonal moves first
                let diagonal = i >= 4;
                if diagonal && !self.config.allow_corner_cutting {
                    let side_a = GridCoord::new(neighbor.x, current_coord.y);
                    let side_b = GridCoord::new(current_coord.x, neighbor.y);
                    if !grid.is_walkable(side_a) || !grid.is_walkable(side_b) {
                        continue;
                    }
                }

                let step = grid.cost(neighbor) * if diagonal { SQRT_2 } else { 1.0 };
                let tentative_g = current_g + step;

                if tentative_g < g_scores[neighbor_idx] {
                    g_scores[neighbor_idx] = tentative_g;
                    came_from[neighbor_idx] = current.index;
                    let h = heuristic(neighbor);
                    open_set.push(OpenNode {
                        f: OrderedFloat(tentative_g + h),
                        h: OrderedFloat(h),
                        index: neighbor_idx,
                    });
                }
            }
        }

        tracing::debug!(
            "No path {:?} -> {:?} ({} nodes expanded)",
            start,
            goal,
            expanded
        );
        PathResult::not_found(expanded)
    }

    fn build_result(&self, cells: Vec<GridCoord>, total_cost: f32, expanded: usize) -> PathResult {
        let waypoints = if self.config.simplify_paths {
            simplify_cells(&cells)
        } else {
            cells.clone()
        }
        .into_iter()
        .map(|c| self.grid.cell_center(c))
        .collect();

        PathResult {
            found: true,
            waypoints,
            cells,
            total_cost,
            expanded,
        }
    }
}

/// Reconstruct path from came_from links
fn reconstruct_path(grid: &PathfindingGrid, came_from: &[usize], goal_idx: usize) -> Vec<GridCoord> {
    let mut path = vec![grid.coord_of(goal_idx)];
    let mut current = goal_idx;
    while came_from[current] != usize::MAX {
        current = came_from[current];
        path.push(grid.coord_of(current));
    }
    path.reverse();
    path
}

/// Drop interior cells that continue in the same direction as the previous step.
///
/// Removed cells all lie on the straight segment between the kept ones, so the
/// simplified route covers exactly the same cells.
pub fn simplify_cells(cells: &[GridCoord]) -> Vec<GridCoord> {
    if cells.len() <= 2 {
        return cells.to_vec();
    }

    let mut simplified = vec![cells[0]];
    for window in cells.windows(3) {
        let (prev, mid, next) = (window[0], window[1], window[2]);
        let dir_in = (mid.x - prev.x, mid.y - prev.y);
        let dir_out = (next.x - mid.x, next.y - mid.y);
        if dir_in != dir_out {
            simplified.push(mid);
        }
    }
    simplified.push(cells[cells.len() - 1]);
    simplified
}

/// Cost of walking a cell sequence (the start cell is free)
pub fn path_cost(grid: &PathfindingGrid, cells: &[GridCoord]) -> f32 {
    cells
        .windows(2)
        .map(|w| {
            let diagonal = w[0].x != w[1].x && w[0].y != w[1].y;
            grid.cost(w[1]) * if diagonal { SQRT_2 } else { 1.0 }
        })
        .sum()
}
