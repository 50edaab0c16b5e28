use eframe::egui::{Pos2, Rect, Vec2};

const WHEEL_ZOOM_RATE: f32 = 0.0018;
const MIN_WHEEL_FACTOR: f32 = 0.85;
const MAX_WHEEL_FACTOR: f32 = 1.15;

/// Optional scale limits; `None` leaves that side unbounded.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ZoomBounds {
    pub min: Option<f32>,
    pub max: Option<f32>,
}

impl ZoomBounds {
    pub fn clamp(self, zoom: f32) -> f32 {
        let mut zoom = zoom.max(f32::EPSILON);
        if let Some(min) = self.min {
            zoom = zoom.max(min);
        }
        if let Some(max) = self.max {
            zoom = zoom.min(max);
        }
        zoom
    }
}

/// Translate + uniform scale applied at render time only.
///
/// World origin maps to the center of the canvas rect plus `pan`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub pan: Vec2,
    pub zoom: f32,
    bounds: ZoomBounds,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(ZoomBounds::default())
    }
}

impl Viewport {
    pub fn new(bounds: ZoomBounds) -> Self {
        Self {
            pan: Vec2::ZERO,
            zoom: 1.0,
            bounds,
        }
    }

    pub fn reset(&mut self) {
        self.pan = Vec2::ZERO;
        self.zoom = 1.0;
    }

    pub fn world_to_screen(&self, rect: Rect, world: Vec2) -> Pos2 {
        rect.center() + self.pan + world * self.zoom
    }

    pub fn screen_to_world(&self, rect: Rect, screen: Pos2) -> Vec2 {
        (screen - rect.center() - self.pan) / self.zoom
    }

    pub fn pan_by(&mut self, delta: Vec2) {
        self.pan += delta;
    }

    /// Wheel zoom about `pointer`, keeping the world point under it in place.
    pub fn zoom_at(&mut self, rect: Rect, pointer: Pos2, scroll: f32) {
        if scroll.abs() <= f32::EPSILON {
            return;
        }

        let anchor = self.screen_to_world(rect, pointer);
        let factor = (1.0 + scroll * WHEEL_ZOOM_RATE).clamp(MIN_WHEEL_FACTOR, MAX_WHEEL_FACTOR);
        self.zoom = self.bounds.clamp(self.zoom * factor);
        self.pan = pointer - rect.center() - anchor * self.zoom;
    }
}
