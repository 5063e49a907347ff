//! Grid pathfinding: obstacle layer, walkability grid, A* search and deferred refresh

pub mod astar;
pub mod grid;
pub mod obstacles;
pub mod refresh;

pub use astar::{path_cost, simplify_cells, PathRequest, PathResult, PathfindingEngine};
pub use grid::{footprint_rect, PathfindingGrid};
pub use obstacles::ObstacleLayer;
pub use refresh::PathRefresh;
