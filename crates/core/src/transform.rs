use serde::{Deserialize, Serialize};

use crate::geometry::BoundingBox;

pub const MIN_SCALE: f64 = 1.0;
pub const MAX_SCALE: f64 = 8.0;

/// Share of the viewport a focused region may cover on its longer axis.
pub const FOCUS_FILL: f64 = 0.9;

/// Size of the area the map is drawn into, in surface units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> (f64, f64) {
        (self.width / 2.0, self.height / 2.0)
    }
}

/// Pan and zoom applied on top of the projection:
/// `screen = translate + scale * surface`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewTransform {
    pub scale: f64,
    pub translate_x: f64,
    pub translate_y: f64,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl ViewTransform {
    pub const IDENTITY: Self = Self {
        scale: 1.0,
        translate_x: 0.0,
        translate_y: 0.0,
    };

    pub fn clamp_scale(scale: f64) -> f64 {
        scale.clamp(MIN_SCALE, MAX_SCALE)
    }

    pub fn apply(&self, (x, y): (f64, f64)) -> (f64, f64) {
        (
            self.scale.mul_add(x, self.translate_x),
            self.scale.mul_add(y, self.translate_y),
        )
    }

    pub fn invert(&self, (x, y): (f64, f64)) -> (f64, f64) {
        (
            (x - self.translate_x) / self.scale,
            (y - self.translate_y) / self.scale,
        )
    }

    /// Transform that frames `bounds` in the middle of `viewport`.
    pub fn focus(bounds: &BoundingBox, viewport: Viewport) -> Self {
        let spread = (bounds.width() / viewport.width).max(bounds.height() / viewport.height);
        // A degenerate box (a single point) gets the closest zoom available.
        let scale = if spread > 0.0 {
            Self::clamp_scale(FOCUS_FILL / spread)
        } else {
            MAX_SCALE
        };
        let (center_x, center_y) = bounds.center();
        let (view_x, view_y) = viewport.center();
        Self {
            scale,
            translate_x: scale.mul_add(-center_x, view_x),
            translate_y: scale.mul_add(-center_y, view_y),
        }
    }

    /// Multiply the scale by `factor`, keeping `anchor` (screen coordinates) fixed.
    #[must_use]
    pub fn zoom_about(&self, anchor: (f64, f64), factor: f64) -> Self {
        let scale = Self::clamp_scale(self.scale * factor);
        let (x, y) = self.invert(anchor);
        Self {
            scale,
            translate_x: scale.mul_add(-x, anchor.0),
            translate_y: scale.mul_add(-y, anchor.1),
        }
    }

    #[must_use]
    pub fn pan(&self, dx: f64, dy: f64) -> Self {
        Self {
            translate_x: self.translate_x + dx,
            translate_y: self.translate_y + dy,
            ..*self
        }
    }

    /// Linear blend between two transforms, `t` in `[0, 1]`.
    #[must_use]
    pub fn lerp(&self, to: &Self, t: f64) -> Self {
        let mix = |a: f64, b: f64| t.mul_add(b - a, a);
        Self {
            scale: mix(self.scale, to.scale),
            translate_x: mix(self.translate_x, to.translate_x),
            translate_y: mix(self.translate_y, to.translate_y),
        }
    }
}
