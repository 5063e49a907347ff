//! Core type definitions shared by terrain, pathfinding and culling

use serde::{Deserialize, Serialize};

use crate::core::error::{Result, WorldError};

/// Seed for deterministic world generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorldSeed(pub u64);

impl WorldSeed {
    pub fn new(seed: u64) -> Self {
        Self(seed)
    }

    /// Accept a seed coming from a numeric (floating point) source.
    ///
    /// NaN and infinities are rejected; finite values are truncated toward zero
    /// and reinterpreted as two's complement so negative seeds stay distinct.
    pub fn from_f64(value: f64) -> Result<Self> {
        if !value.is_finite() {
            return Err(WorldError::InvalidSeed(value));
        }
        Ok(Self(value.trunc() as i64 as u64))
    }

    /// Seed for an independent noise layer (`seed + offset`)
    pub fn offset(&self, offset: u64) -> Self {
        Self(self.0.wrapping_add(offset))
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl From<u64> for WorldSeed {
    fn from(seed: u64) -> Self {
        Self(seed)
    }
}

/// Integer tile coordinate on the terrain grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct GridCoord {
    pub x: i32,
    pub y: i32,
}

impl GridCoord {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The 8 surrounding cells, orthogonal first, then diagonals
    pub fn neighbors(&self) -> [GridCoord; 8] {
        let GridCoord { x, y } = *self;
        [
            GridCoord::new(x + 1, y),
            GridCoord::new(x - 1, y),
            GridCoord::new(x, y + 1),
            GridCoord::new(x, y - 1),
            GridCoord::new(x + 1, y + 1),
            GridCoord::new(x + 1, y - 1),
            GridCoord::new(x - 1, y + 1),
            GridCoord::new(x - 1, y - 1),
        ]
    }

    /// Chebyshev (king-move) distance
    pub fn chebyshev_distance(&self, other: &GridCoord) -> i32 {
        (self.x - other.x).abs().max((self.y - other.y).abs())
    }

    /// Octile distance: straight steps cost 1, diagonal steps cost sqrt(2)
    pub fn octile_distance(&self, other: &GridCoord) -> f32 {
        let dx = (self.x - other.x).abs() as f32;
        let dy = (self.y - other.y).abs() as f32;
        let (lo, hi) = if dx < dy { (dx, dy) } else { (dy, dx) };
        (hi - lo) + std::f32::consts::SQRT_2 * lo
    }
}

impl From<(i32, i32)> for GridCoord {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

/// Identifier handed out for each placed building footprint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BuildingId(pub u32);

/// Identifier of an agent whose path is tracked for refresh
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AgentId(pub u32);

impl AgentId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neighbors_are_adjacent() {
        let center = GridCoord::new(3, 3);
        for n in center.neighbors() {
            assert_eq!(center.chebyshev_distance(&n), 1);
        }
    }

    #[test]
    fn test_octile_distance() {
        let a = GridCoord::new(0, 0);
        assert_eq!(a.octile_distance(&GridCoord::new(5, 0)), 5.0);
        let diag = a.octile_distance(&GridCoord::new(3, 3));
        assert!((diag - 3.0 * std::f32::consts::SQRT_2).abs() < 1e-5);
    }

    #[test]
    fn test_seed_from_f64() {
        assert_eq!(WorldSeed::from_f64(42.0).unwrap(), WorldSeed(42));
        assert_eq!(WorldSeed::from_f64(42.9).unwrap(), WorldSeed(42));
        assert!(WorldSeed::from_f64(f64::NAN).is_err());
        assert!(WorldSeed::from_f64(f64::INFINITY).is_err());
        assert_ne!(WorldSeed::from_f64(-1.0).unwrap(), WorldSeed::from_f64(1.0).unwrap());
    }

    #[test]
    fn test_seed_offset_wraps() {
        assert_eq!(WorldSeed(u64::MAX).offset(2), WorldSeed(1));
    }
}
