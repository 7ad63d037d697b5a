#[cfg(test)]
#[path = "camera_test.rs"]
mod camera_test;

use crate::consts::LEVEL_PADDING_PX;
use crate::doc::Dimensions;

/// A point in either screen or level space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Maps the host surface onto the level.
///
/// `pan_x` / `pan_y` are the screen position of the level's top-left corner
/// in CSS pixels. `zoom` is a scale factor (1.0 = no zoom).
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    pub pan_x: f64,
    pub pan_y: f64,
    pub zoom: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self { pan_x: 0.0, pan_y: 0.0, zoom: 1.0 }
    }
}

impl Camera {
    /// Camera that centres a level inside a container, keeping at least
    /// [`LEVEL_PADDING_PX`] of margin on each side.
    #[must_use]
    pub fn centered(container_width: f64, container_height: f64, level: Dimensions) -> Self {
        Self {
            pan_x: LEVEL_PADDING_PX.max((container_width - level.width) / 2.0),
            pan_y: LEVEL_PADDING_PX.max((container_height - level.height) / 2.0),
            zoom: 1.0,
        }
    }

    /// Convert a screen-space point (CSS pixels) to level coordinates.
    #[must_use]
    pub fn screen_to_world(&self, screen: Point) -> Point {
        Point {
            x: (screen.x - self.pan_x) / self.zoom,
            y: (screen.y - self.pan_y) / self.zoom,
        }
    }

    /// Convert a level-space point to screen coordinates (CSS pixels).
    #[must_use]
    pub fn world_to_screen(&self, world: Point) -> Point {
        Point {
            x: world.x * self.zoom + self.pan_x,
            y: world.y * self.zoom + self.pan_y,
        }
    }

    /// Convert a screen-space distance (pixels) to level-space distance.
    #[must_use]
    pub fn screen_dist_to_world(&self, screen_dist: f64) -> f64 {
        screen_dist / self.zoom
    }
}
