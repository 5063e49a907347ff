//! Viewport visibility culling

pub mod camera;
pub mod engine;
pub mod entity;

pub use camera::{Camera, ViewRect};
pub use engine::{CullOptions, CullResult, CullStats, EntityCullingEngine};
pub use entity::{BoundsKind, CullEntity, Cullable, Priority};
