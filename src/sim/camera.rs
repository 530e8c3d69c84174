//! Horizontal scrolling camera
//!
//! The camera is a single offset recomputed from the character every tick.
//! World coordinates are never touched; the offset is applied on the way to
//! the screen only.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::geometry::Aabb;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Camera {
    /// Added to world X to get screen X
    pub offset: i32,
    pub viewport_width: i32,
}

impl Camera {
    pub fn new(viewport_width: i32) -> Self {
        Self {
            offset: 0,
            viewport_width,
        }
    }

    /// Center the viewport horizontally on `target`
    pub fn follow(&mut self, target: &Aabb) {
        self.offset = -(target.min.x + target.size.x / 2 - self.viewport_width / 2);
    }

    /// World-space box to screen space
    #[inline]
    pub fn to_screen(&self, world: &Aabb) -> Aabb {
        world.translated(IVec2::new(self.offset, 0))
    }

    /// True if any part of `world` is horizontally inside the viewport
    pub fn is_visible(&self, world: &Aabb) -> bool {
        let screen = self.to_screen(world);
        screen.max().x > 0 && screen.min.x < self.viewport_width
    }
}
