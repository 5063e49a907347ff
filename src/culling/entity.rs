//! Entity shapes and priorities for visibility culling

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::culling::camera::ViewRect;

/// Bounding shape of a cullable entity, resolved once at creation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BoundsKind {
    #[default]
    Point,
    /// Box centred on the entity position
    Aabb { width: f32, height: f32 },
    Circle { radius: f32 },
}

impl BoundsKind {
    /// Pick a shape from optional dimensions. A box wins over a radius;
    /// neither gives a point.
    pub fn resolve(width: Option<f32>, height: Option<f32>, radius: Option<f32>) -> Self {
        match (width, height, radius) {
            (Some(width), Some(height), _) => BoundsKind::Aabb { width, height },
            (_, _, Some(radius)) => BoundsKind::Circle { radius },
            _ => BoundsKind::Point,
        }
    }

    /// World-space bounding box for an entity at `position`
    pub fn bounding_box(&self, position: Vec2) -> ViewRect {
        let (half_w, half_h) = match *self {
            BoundsKind::Point => (0.0, 0.0),
            BoundsKind::Aabb { width, height } => (width.abs() / 2.0, height.abs() / 2.0),
            BoundsKind::Circle { radius } => (radius.abs(), radius.abs()),
        };
        ViewRect {
            min_x: position.x - half_w,
            min_y: position.y - half_h,
            max_x: position.x + half_w,
            max_y: position.y + half_h,
        }
    }
}

/// Culling priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Never culled when priorities are respected
    Critical,
    #[default]
    Normal,
    /// Tested against a smaller buffer under aggressive culling
    Low,
}

/// Anything the culling engine can test
pub trait Cullable {
    fn position(&self) -> Vec2;

    fn bounds(&self) -> BoundsKind {
        BoundsKind::Point
    }

    fn priority(&self) -> Priority {
        Priority::Normal
    }
}

/// Plain cullable record with a visibility flag the engine can write back
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CullEntity {
    pub id: u64,
    pub position: Vec2,
    pub bounds: BoundsKind,
    pub priority: Priority,
    pub visible: bool,
}

impl CullEntity {
    pub fn point(id: u64, position: Vec2) -> Self {
        Self {
            id,
            position,
            bounds: BoundsKind::Point,
            priority: Priority::Normal,
            visible: false,
        }
    }

    pub fn with_bounds(mut self, bounds: BoundsKind) -> Self {
        self.bounds = bounds;
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }
}

impl Cullable for CullEntity {
    fn position(&self) -> Vec2 {
        self.position
    }

    fn bounds(&self) -> BoundsKind {
        self.bounds
    }

    fn priority(&self) -> Priority {
        self.priority
    }
}
