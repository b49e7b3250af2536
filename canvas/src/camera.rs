#[cfg(test)]
#[path = "camera_test.rs"]
mod camera_test;

use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

/// A point in either screen or canvas space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Both coordinates are finite numbers.
    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// The viewport transform between canvas and screen space.
///
/// `translate_x` / `translate_y` are in screen pixels.
/// `scale` is a zoom factor (1.0 = no zoom) and is never zero while owned by
/// a [`crate::viewport::Viewport`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Camera {
    pub scale: f64,
    pub translate_x: f64,
    pub translate_y: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self { scale: 1.0, translate_x: 0.0, translate_y: 0.0 }
    }
}

impl Camera {
    #[must_use]
    pub fn new(scale: f64, translate_x: f64, translate_y: f64) -> Self {
        Self { scale, translate_x, translate_y }
    }

    /// Whether this transform can be inverted.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.scale.is_finite() && self.scale > 0.0 && self.translate_x.is_finite() && self.translate_y.is_finite()
    }

    /// Convert a screen-space point (pixels) to canvas coordinates.
    #[must_use]
    pub fn screen_to_canvas(&self, screen: Point) -> Point {
        Point {
            x: (screen.x - self.translate_x) / self.scale,
            y: (screen.y - self.translate_y) / self.scale,
        }
    }

    /// Convert a canvas-space point to screen coordinates (pixels).
    #[must_use]
    pub fn canvas_to_screen(&self, canvas: Point) -> Point {
        Point {
            x: canvas.x * self.scale + self.translate_x,
            y: canvas.y * self.scale + self.translate_y,
        }
    }

    /// Convert a screen-space distance (pixels) to a canvas-space distance.
    #[must_use]
    pub fn screen_dist_to_canvas(&self, screen_dist: f64) -> f64 {
        screen_dist / self.scale
    }
}
