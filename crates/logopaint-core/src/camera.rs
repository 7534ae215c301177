//! Camera module for pan/zoom/rotation transforms.

use kurbo::{Affine, Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Minimum allowed zoom level.
pub const MIN_ZOOM: f64 = 0.1;
/// Maximum allowed zoom level.
pub const MAX_ZOOM: f64 = 10.0;

/// Zoom change per wheel delta unit.
const WHEEL_ZOOM_STEP: f64 = 0.001;
/// Rotation change (radians) per wheel delta unit.
const WHEEL_ROTATE_STEP: f64 = 0.002;

/// Camera manages the view transform for the canvas.
///
/// World space is centered on the viewport: the world origin sits at the
/// viewport center when `pan` is zero. Screen points map to world points by
/// un-rotating, un-scaling and then un-translating.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    /// Translation in world units.
    pub pan: Vec2,
    /// Current zoom level (1.0 = 100%).
    pub zoom: f64,
    /// Rotation in radians.
    pub rotation: f64,
    /// Size of the viewport in screen pixels.
    pub viewport: Size,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            pan: Vec2::ZERO,
            zoom: 1.0,
            rotation: 0.0,
            viewport: Size::new(800.0, 600.0),
        }
    }
}

impl Camera {
    /// Create a new camera with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a camera for a viewport of the given size.
    pub fn with_viewport(viewport: Size) -> Self {
        Self {
            viewport,
            ..Self::default()
        }
    }

    fn center(&self) -> Vec2 {
        Vec2::new(self.viewport.width / 2.0, self.viewport.height / 2.0)
    }

    /// Get the affine transform for rendering.
    ///
    /// This transform converts world coordinates to screen coordinates.
    pub fn transform(&self) -> Affine {
        Affine::translate(self.center())
            * Affine::scale(self.zoom)
            * Affine::rotate(self.rotation)
            * Affine::translate(self.pan)
    }

    /// Get the inverse transform for input handling.
    ///
    /// This transform converts screen coordinates to world coordinates.
    pub fn inverse_transform(&self) -> Affine {
        Affine::translate(-self.pan)
            * Affine::rotate(-self.rotation)
            * Affine::scale(1.0 / self.zoom)
            * Affine::translate(-self.center())
    }

    /// Convert a screen point to world coordinates.
    pub fn screen_to_world(&self, screen_point: Point) -> Point {
        self.inverse_transform() * screen_point
    }

    /// Convert a world point to screen coordinates.
    pub fn world_to_screen(&self, world_point: Point) -> Point {
        self.transform() * world_point
    }

    /// Pan the camera by a drag delta in screen pixels.
    ///
    /// The delta is scaled by the zoom and un-rotated, so the world follows
    /// the pointer at any rotation.
    pub fn pan_by_screen(&mut self, delta: Vec2) {
        let world_delta = Affine::rotate(-self.rotation) * (delta / self.zoom).to_point();
        self.pan += world_delta.to_vec2();
    }

    /// Zoom the camera, keeping the given screen point fixed.
    pub fn zoom_at(&mut self, screen_point: Point, factor: f64) {
        let new_zoom = (self.zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);
        if !new_zoom.is_finite() || (new_zoom - self.zoom).abs() < f64::EPSILON {
            return;
        }

        let before = self.screen_to_world(screen_point);
        self.zoom = new_zoom;
        let after = self.screen_to_world(screen_point);

        // Shift the pan so `before` lands back under the pointer.
        self.pan += after - before;
    }

    /// Rotate the view by `delta` radians around the viewport center.
    pub fn rotate_by(&mut self, delta: f64) {
        if delta.is_finite() {
            self.rotation += delta;
        }
    }

    /// Apply a wheel event: rotate when the rotate modifier is held,
    /// otherwise zoom anchored at the pointer.
    pub fn wheel(&mut self, screen_point: Point, delta_y: f64, rotate: bool) {
        if rotate {
            self.rotate_by(delta_y * WHEEL_ROTATE_STEP);
        } else {
            self.zoom_at(screen_point, 1.0 - delta_y * WHEEL_ZOOM_STEP);
        }
    }

    /// Reset pan, zoom and rotation, keeping the viewport.
    pub fn reset(&mut self) {
        *self = Self::with_viewport(self.viewport);
    }

    /// Zoom and pan so `bounds` fills the viewport inside `padding` pixels.
    /// Rotation is reset.
    pub fn fit_to_bounds(&mut self, bounds: Rect, padding: f64) {
        if bounds.is_zero_area() {
            self.reset();
            return;
        }

        let width = (self.viewport.width - padding * 2.0).max(1.0);
        let height = (self.viewport.height - padding * 2.0).max(1.0);
        self.zoom = (width / bounds.width())
            .min(height / bounds.height())
            .clamp(MIN_ZOOM, MAX_ZOOM);
        self.rotation = 0.0;
        self.pan = -bounds.center().to_vec2();
    }

    /// World-space positions of the four viewport corners.
    pub fn visible_corners(&self) -> [Point; 4] {
        let (w, h) = (self.viewport.width, self.viewport.height);
        [
            Point::new(0.0, 0.0),
            Point::new(w, 0.0),
            Point::new(w, h),
            Point::new(0.0, h),
        ]
        .map(|p| self.screen_to_world(p))
    }
}
