//! Reference-counted blocked cells
//!
//! Building footprints may overlap, so each cell keeps a count of the
//! footprints covering it. A cell is free again only when its count is back
//! to zero. Uses an AHashMap so lookups stay O(1) on the search hot path.

use ahash::AHashMap;

use crate::core::types::GridCoord;

/// Sparse set of blocked grid cells with per-cell reference counts
#[derive(Debug, Clone, Default)]
pub struct ObstacleLayer {
    counts: AHashMap<GridCoord, u32>,
}

impl ObstacleLayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one reference to a cell
    pub fn block(&mut self, cell: GridCoord) {
        *self.counts.entry(cell).or_insert(0) += 1;
    }

    /// Drop one reference from a cell.
    ///
    /// Returns false for a stray unblock (count already zero); the count
    /// stays at zero.
    pub fn unblock(&mut self, cell: GridCoord) -> bool {
        match self.counts.get_mut(&cell) {
            Some(count) if *count > 1 => {
                *count -= 1;
                true
            }
            Some(_) => {
                self.counts.remove(&cell);
                true
            }
            None => false,
        }
    }

    #[inline]
    pub fn is_blocked(&self, cell: GridCoord) -> bool {
        self.counts.contains_key(&cell)
    }

    /// Number of footprints covering a cell
    pub fn count(&self, cell: GridCoord) -> u32 {
        self.counts.get(&cell).copied().unwrap_or(0)
    }

    /// Clear all blocked cells
    pub fn clear(&mut self) {
        self.counts.clear();
    }

    /// Number of distinct blocked cells
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_unblock() {
        let mut layer = ObstacleLayer::new();
        let cell = GridCoord::new(5, 10);

        layer.block(cell);
        assert!(layer.is_blocked(cell));
        assert!(!layer.is_blocked(GridCoord::new(5, 11)));

        assert!(layer.unblock(cell));
        assert!(!layer.is_blocked(cell));
        assert!(layer.is_empty());
    }

    #[test]
    fn test_overlapping_references() {
        let mut layer = ObstacleLayer::new();
        let cell = GridCoord::new(1, 1);

        layer.block(cell);
        layer.block(cell);
        assert_eq!(layer.count(cell), 2);

        layer.unblock(cell);
        assert!(layer.is_blocked(cell));
        layer.unblock(cell);
        assert!(!layer.is_blocked(cell));
    }

    #[test]
    fn test_stray_unblock_clamps_at_zero() {
        let mut layer = ObstacleLayer::new();
        let cell = GridCoord::new(2, 2);

        assert!(!layer.unblock(cell));
        assert_eq!(layer.count(cell), 0);

        // A later block still takes effect normally
        layer.block(cell);
        assert!(layer.is_blocked(cell));
    }

    #[test]
    fn test_clear() {
        let mut layer = ObstacleLayer::new();
        layer.block(GridCoord::new(1, 1));
        layer.block(GridCoord::new(2, 2));
        assert_eq!(layer.len(), 2);

        layer.clear();
        assert!(layer.is_empty());
    }
}
