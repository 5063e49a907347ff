//! Island mask: pushes elevation toward zero near the map edge
//!
//! `d` is 0 at the centre and exactly 1 on the outer ring. The mask is
//! multiplicative in `(1 - d^power)` and additive in `(1 - d)`, so the outer
//! ring always lands at elevation 0, below any water threshold.

use crate::core::config::{FalloffShape, IslandConfig};

/// Normalised distance from the grid centre toward the edge, in `[0, 1]`
pub fn edge_distance(x: u32, y: u32, width: u32, height: u32, shape: FalloffShape) -> f32 {
    if x == 0 || y == 0 || x + 1 >= width || y + 1 >= height {
        return 1.0;
    }

    let dx = axis_distance(x, width);
    let dy = axis_distance(y, height);

    let d = match shape {
        FalloffShape::Radial => (dx * dx + dy * dy).sqrt(),
        FalloffShape::Square => dx.max(dy),
    };
    d.clamp(0.0, 1.0)
}

fn axis_distance(i: u32, extent: u32) -> f32 {
    let half = (extent.saturating_sub(1)) as f32 / 2.0;
    if half <= 0.0 {
        return 1.0;
    }
    (i as f32 - half).abs() / half
}

/// Apply the mask to a raw elevation sample
pub fn apply_mask(raw_elevation: f32, d: f32, config: &IslandConfig) -> f32 {
    let falloff = 1.0 - d.powf(config.power);
    let lift = config.center_lift * (1.0 - d);
    (raw_elevation * falloff + lift).clamp(0.0, 1.0)
}
