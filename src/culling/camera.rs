//! Camera/viewport descriptor as seen by the culling engine
//!
//! Owned by the input layer and passed in by value; the core never moves it.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Viewport in world pixels. `(x, y)` is the top-left corner of the view.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub x: f32,
    pub y: f32,
    /// Zoom level (1.0 = normal). Must be positive.
    pub zoom: f32,
    pub width: f32,
    pub height: f32,
}

impl Camera {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            zoom: 1.0,
            width,
            height,
        }
    }

    pub fn with_zoom(mut self, zoom: f32) -> Self {
        self.zoom = zoom;
        self
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Zoom clamped away from zero so screen-space buffers stay finite
    pub fn effective_zoom(&self) -> f32 {
        if self.zoom.is_finite() && self.zoom > f32::EPSILON {
            self.zoom
        } else {
            f32::EPSILON
        }
    }

    /// View rectangle grown on every side by `buffer / zoom` world units
    pub fn view_rect(&self, buffer: f32) -> ViewRect {
        let margin = buffer / self.effective_zoom();
        ViewRect {
            min_x: self.x - margin,
            min_y: self.y - margin,
            max_x: self.x + self.width + margin,
            max_y: self.y + self.height + margin,
        }
    }
}

/// Axis-aligned rectangle in world coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewRect {
    pub min_x: f32,
    pub min_y: f32,
    pub max_x: f32,
    pub max_y: f32,
}

impl ViewRect {
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.min_x && point.x <= self.max_x && point.y >= self.min_y && point.y <= self.max_y
    }

    /// Inclusive overlap test against another box
    pub fn overlaps(&self, other: &ViewRect) -> bool {
        other.max_x >= self.min_x
            && other.min_x <= self.max_x
            && other.max_y >= self.min_y
            && other.min_y <= self.max_y
    }
}
