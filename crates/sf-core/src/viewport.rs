//! Camera transform: world space ↔ screen space.
//!
//! The camera owns an origin in world coordinates and a zoom factor.
//! `screen = (world - cam) * zoom`. Zooming around a screen point solves for
//! the new origin that keeps the world point under that screen point fixed.

/// Zoom bounds. A wheel step that would leave this range is clamped.
pub const MIN_ZOOM: f32 = 0.3;
pub const MAX_ZOOM: f32 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    /// Camera origin in world space.
    pub cam_x: f32,
    pub cam_y: f32,
    pub zoom: f32,
    /// Viewport size in screen pixels.
    pub view_width: f32,
    pub view_height: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            cam_x: 0.0,
            cam_y: 0.0,
            zoom: 1.0,
            view_width: 800.0,
            view_height: 600.0,
        }
    }
}

impl Camera {
    pub fn new(view_width: f32, view_height: f32) -> Self {
        Self {
            view_width,
            view_height,
            ..Self::default()
        }
    }

    pub fn to_screen(&self, wx: f32, wy: f32) -> (f32, f32) {
        ((wx - self.cam_x) * self.zoom, (wy - self.cam_y) * self.zoom)
    }

    pub fn to_world(&self, sx: f32, sy: f32) -> (f32, f32) {
        (sx / self.zoom + self.cam_x, sy / self.zoom + self.cam_y)
    }

    /// Pan by a screen-space delta (drag semantics: dragging right moves the
    /// camera left in world space).
    pub fn pan_by(&mut self, screen_dx: f32, screen_dy: f32) {
        self.cam_x -= screen_dx / self.zoom;
        self.cam_y -= screen_dy / self.zoom;
    }

    /// Set the zoom factor, holding the world point under screen point
    /// `(sx, sy)` fixed. The factor is clamped to `[MIN_ZOOM, MAX_ZOOM]`.
    pub fn set_zoom_about(&mut self, new_zoom: f32, sx: f32, sy: f32) {
        let new_zoom = new_zoom.clamp(MIN_ZOOM, MAX_ZOOM);
        let (wx, wy) = self.to_world(sx, sy);
        self.zoom = new_zoom;
        self.cam_x = wx - sx / new_zoom;
        self.cam_y = wy - sy / new_zoom;
    }

    /// Multiplicative zoom step (wheel input), anchored at `(sx, sy)`.
    pub fn zoom_by(&mut self, factor: f32, sx: f32, sy: f32) {
        self.set_zoom_about(self.zoom * factor, sx, sy);
    }

    /// World point currently at the middle of the viewport.
    pub fn visual_center(&self) -> (f32, f32) {
        (
            self.cam_x + self.view_width / 2.0 / self.zoom,
            self.cam_y + self.view_height / 2.0 / self.zoom,
        )
    }

    /// Camera origin that would center the viewport on a world point.
    pub fn origin_centering(&self, wx: f32, wy: f32) -> (f32, f32) {
        (
            wx - self.view_width / 2.0 / self.zoom,
            wy - self.view_height / 2.0 / self.zoom,
        )
    }

    /// Jump the camera so the viewport centers on a world point.
    pub fn center_on(&mut self, wx: f32, wy: f32) {
        let (ox, oy) = self.origin_centering(wx, wy);
        self.cam_x = ox;
        self.cam_y = oy;
    }
}
