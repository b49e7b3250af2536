//! Pan/zoom state for the visible area of the canvas.
//!
//! `Viewport` owns the live [`Camera`] plus the screen size it is drawn into.
//! Every other component reads the transform from here; nothing infers it from
//! rendered output.

#[cfg(test)]
#[path = "viewport_test.rs"]
mod viewport_test;

use crate::camera::{Camera, Point};
use crate::consts::{MAX_ZOOM, MIN_ZOOM, WHEEL_ZOOM_RATE};
use crate::input::{Modifiers, WheelDelta};

/// Zoom bounds and input toggles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportConfig {
    pub min_scale: f64,
    pub max_scale: f64,
    /// Wheel input is honored. Cleared while in focus mode.
    pub wheel_enabled: bool,
    /// Dragging empty canvas pans, and a plain wheel scrolls instead of zooming.
    pub panning_enabled: bool,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self { min_scale: MIN_ZOOM, max_scale: MAX_ZOOM, wheel_enabled: true, panning_enabled: false }
    }
}

/// Current transform and screen dimensions.
#[derive(Debug, Clone)]
pub struct Viewport {
    camera: Camera,
    width: f64,
    height: f64,
    config: ViewportConfig,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(ViewportConfig::default())
    }
}

impl Viewport {
    #[must_use]
    pub fn new(config: ViewportConfig) -> Self {
        let config = if config.min_scale > 0.0 && config.min_scale <= config.max_scale {
            config
        } else {
            tracing::warn!(min = config.min_scale, max = config.max_scale, "invalid zoom bounds; using defaults");
            ViewportConfig { min_scale: MIN_ZOOM, max_scale: MAX_ZOOM, ..config }
        };
        Self { camera: Camera::default(), width: 0.0, height: 0.0, config }
    }

    #[must_use]
    pub fn camera(&self) -> Camera {
        self.camera
    }

    #[must_use]
    pub fn config(&self) -> ViewportConfig {
        self.config
    }

    #[must_use]
    pub fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    /// Update the screen size in CSS pixels. Negative or non-finite values become zero.
    pub fn set_size(&mut self, width: f64, height: f64) {
        self.width = if width.is_finite() { width.max(0.0) } else { 0.0 };
        self.height = if height.is_finite() { height.max(0.0) } else { 0.0 };
    }

    /// Screen-space center of the viewport.
    #[must_use]
    pub fn center_screen(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }

    /// Canvas-space point currently shown at the center of the viewport.
    #[must_use]
    pub fn center_canvas(&self) -> Point {
        self.camera.screen_to_canvas(self.center_screen())
    }

    #[must_use]
    pub fn screen_to_canvas(&self, screen: Point) -> Point {
        self.camera.screen_to_canvas(screen)
    }

    #[must_use]
    pub fn canvas_to_screen(&self, canvas: Point) -> Point {
        self.camera.canvas_to_screen(canvas)
    }

    /// Adopt a transform reported by the host. Invalid transforms are rejected
    /// and the scale is clamped to the zoom bounds. Returns whether the camera changed.
    pub fn set_camera(&mut self, camera: Camera) -> bool {
        if !camera.is_valid() {
            tracing::warn!(?camera, "rejecting invalid camera");
            return false;
        }
        let next = Camera { scale: self.clamp_scale(camera.scale), ..camera };
        let changed = next != self.camera;
        self.camera = next;
        changed
    }

    /// Multiply the scale by `factor`, keeping the canvas point under `screen_pt` fixed.
    pub fn zoom_at(&mut self, screen_pt: Point, factor: f64) -> bool {
        if !factor.is_finite() || factor <= 0.0 || !screen_pt.is_finite() {
            return false;
        }
        let old = self.camera.scale;
        let new = self.clamp_scale(old * factor);
        if new == old {
            return false;
        }
        let ratio = new / old;
        self.camera = Camera {
            scale: new,
            translate_x: screen_pt.x - (screen_pt.x - self.camera.translate_x) * ratio,
            translate_y: screen_pt.y - (screen_pt.y - self.camera.translate_y) * ratio,
        };
        true
    }

    /// Shift the view by a screen-space delta.
    pub fn pan_by(&mut self, dx: f64, dy: f64) -> bool {
        if !dx.is_finite() || !dy.is_finite() || (dx == 0.0 && dy == 0.0) {
            return false;
        }
        self.camera.translate_x += dx;
        self.camera.translate_y += dy;
        true
    }

    /// Apply a wheel event. Returns whether the camera changed.
    ///
    /// With panning enabled a plain wheel scrolls and Ctrl/Meta+wheel zooms;
    /// otherwise the wheel always zooms.
    pub fn on_wheel(&mut self, screen_pt: Point, delta: WheelDelta, modifiers: Modifiers) -> bool {
        if !self.config.wheel_enabled {
            return false;
        }
        if self.config.panning_enabled && !modifiers.command() {
            return self.pan_by(-delta.dx, -delta.dy);
        }
        self.zoom_at(screen_pt, (-delta.dy * WHEEL_ZOOM_RATE).exp())
    }

    pub fn set_wheel_enabled(&mut self, enabled: bool) {
        self.config.wheel_enabled = enabled;
    }

    pub fn set_panning_enabled(&mut self, enabled: bool) {
        self.config.panning_enabled = enabled;
    }

    /// Return to the identity transform.
    pub fn reset(&mut self) -> bool {
        let changed = self.camera != Camera::default();
        self.camera = Camera::default();
        changed
    }

    fn clamp_scale(&self, scale: f64) -> f64 {
        scale.clamp(self.config.min_scale, self.config.max_scale)
    }
}
