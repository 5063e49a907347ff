//! Viewport culling with a throttled update gate
//!
//! `is_visible` and `cull_entities` are pure given their inputs. The only
//! mutable state is the last accepted camera pose and timestamp used by
//! `should_update_culling`.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::core::config::CullingConfig;
use crate::culling::camera::Camera;
use crate::culling::entity::{CullEntity, Cullable, Priority};

/// Per-call policy overrides
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CullOptions {
    /// Critical entities are always kept
    pub respect_priority: bool,
    /// Low-priority entities use a shrunk buffer
    pub aggressive_culling: bool,
}

impl CullOptions {
    pub fn with_priority() -> Self {
        Self {
            respect_priority: true,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CullStats {
    pub total: usize,
    pub visible: usize,
    pub culled: usize,
    /// Share of entities culled, 0-100
    pub cull_percentage: f32,
}

impl CullStats {
    fn from_counts(total: usize, visible: usize) -> Self {
        let culled = total - visible;
        let cull_percentage = if total == 0 {
            0.0
        } else {
            culled as f32 / total as f32 * 100.0
        };
        Self {
            total,
            visible,
            culled,
            cull_percentage,
        }
    }
}

/// Visible subset plus statistics for one pass
#[derive(Debug, Clone)]
pub struct CullResult<'a, E> {
    pub visible: Vec<&'a E>,
    pub stats: CullStats,
}

#[derive(Debug, Clone, Copy)]
struct LastUpdate {
    camera: Camera,
    at: Instant,
}

#[derive(Debug, Clone)]
pub struct EntityCullingEngine {
    config: CullingConfig,
    last_update: Option<LastUpdate>,
}

impl EntityCullingEngine {
    pub fn new(config: CullingConfig) -> Self {
        Self {
            config,
            last_update: None,
        }
    }

    pub fn config(&self) -> &CullingConfig {
        &self.config
    }

    /// Inside the view expanded by `buffer / zoom` on every side?
    pub fn is_visible<E: Cullable>(&self, entity: &E, camera: &Camera) -> bool {
        self.visible_with_buffer(entity, camera, self.config.buffer)
    }

    fn visible_with_buffer<E: Cullable>(&self, entity: &E, camera: &Camera, buffer: f32) -> bool {
        let view = camera.view_rect(buffer);
        let bounds = entity.bounds().bounding_box(entity.position());
        view.overlaps(&bounds)
    }

    fn passes<E: Cullable>(&self, entity: &E, camera: &Camera, options: CullOptions) -> bool {
        match entity.priority() {
            Priority::Critical if options.respect_priority => true,
            Priority::Low if options.aggressive_culling => {
                let buffer = self.config.buffer * self.config.low_priority_buffer_scale;
                self.visible_with_buffer(entity, camera, buffer)
            }
            _ => self.is_visible(entity, camera),
        }
    }

    /// Filter `entities` down to the visible subset, preserving input order
    pub fn cull_entities<'a, E: Cullable>(
        &self,
        entities: &'a [E],
        camera: &Camera,
        options: CullOptions,
    ) -> CullResult<'a, E> {
        let visible: Vec<&E> = entities
            .iter()
            .filter(|entity| self.passes(*entity, camera, options))
            .collect();
        let stats = CullStats::from_counts(entities.len(), visible.len());

        tracing::trace!(
            "Culled {}/{} entities ({:.1}%)",
            stats.culled,
            stats.total,
            stats.cull_percentage
        );

        CullResult { visible, stats }
    }

    /// Write the `visible` flag onto each entity in place
    pub fn mark_visibility(&self, entities: &mut [CullEntity], camera: &Camera, options: CullOptions) -> CullStats {
        let mut visible = 0;
        for entity in entities.iter_mut() {
            entity.visible = self.passes(&*entity, camera, options);
            if entity.visible {
                visible += 1;
            }
        }
        CullStats::from_counts(entities.len(), visible)
    }

    /// Throttle gate. Returns true and records the camera when enough time
    /// has passed or the camera moved or zoomed past its threshold.
    pub fn should_update_culling(&mut self, camera: &Camera, now: Instant) -> bool {
        let accept = match self.last_update {
            None => true,
            Some(last) => {
                let elapsed = now.saturating_duration_since(last.at);
                let moved = last.camera.center().distance(camera.center());
                let zoomed = (last.camera.zoom - camera.zoom).abs();

                elapsed >= Duration::from_millis(self.config.update_interval_ms)
                    || moved > self.config.move_threshold
                    || zoomed > self.config.zoom_threshold
            }
        };

        if accept {
            self.last_update = Some(LastUpdate { camera: *camera, at: now });
        }
        accept
    }

    /// Forget the last accepted camera so the next gate check passes
    pub fn reset(&mut self) {
        self.last_update = None;
    }
}

impl Default for EntityCullingEngine {
    fn default() -> Self {
        Self::new(CullingConfig::default())
    }
}
