//! Deferred path recomputation
//!
//! Building changes only raise a dirty flag. The owning loop calls
//! `run_pending` once per tick, so several placements in the same tick cost
//! one recomputation of the tracked paths instead of one each.

use std::collections::{BTreeMap, BTreeSet};

use crate::core::types::AgentId;
use crate::pathfinding::astar::{PathRequest, PathResult, PathfindingEngine};

/// Tracks agent path requests and recomputes them when the grid changes
#[derive(Debug, Clone, Default)]
pub struct PathRefresh {
    tracked: BTreeMap<AgentId, PathRequest>,
    /// Agents whose request was added or changed since the last run
    pending: BTreeSet<AgentId>,
    /// Set when obstacles changed; every tracked path is recomputed
    dirty: bool,
}

impl PathRefresh {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track (or replace) an agent's request. It is computed on the next run.
    pub fn track(&mut self, agent: AgentId, request: PathRequest) {
        self.tracked.insert(agent, request);
        self.pending.insert(agent);
    }

    pub fn untrack(&mut self, agent: AgentId) -> Option<PathRequest> {
        self.pending.remove(&agent);
        self.tracked.remove(&agent)
    }

    pub fn request_for(&self, agent: AgentId) -> Option<&PathRequest> {
        self.tracked.get(&agent)
    }

    pub fn tracked_count(&self) -> usize {
        self.tracked.len()
    }

    /// Flag every tracked path for recomputation
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Is there anything to recompute?
    pub fn is_dirty(&self) -> bool {
        self.dirty || !self.pending.is_empty()
    }

    /// Drop all tracked requests (used on full regeneration)
    pub fn clear(&mut self) {
        self.tracked.clear();
        self.pending.clear();
        self.dirty = false;
    }

    /// Recompute whatever is outstanding. Returns `(agent, result)` in agent order.
    pub fn run_pending(&mut self, engine: &PathfindingEngine<'_>) -> Vec<(AgentId, PathResult)> {
        if !self.is_dirty() {
            return Vec::new();
        }

        let agents: Vec<AgentId> = if self.dirty {
            self.tracked.keys().copied().collect()
        } else {
            self.pending.iter().copied().collect()
        };
        let requests: Vec<PathRequest> = agents.iter().map(|a| self.tracked[a]).collect();

        let results = engine.find_paths(&requests);
        tracing::debug!("Refreshed {} tracked path(s)", results.len());

        self.dirty = false;
        self.pending.clear();
        agents.into_iter().zip(results).collect()
    }
}
