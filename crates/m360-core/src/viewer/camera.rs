//! Virtual camera for sphere-mapped rendering.

use std::f32::consts::FRAC_PI_2;

use serde::{Deserialize, Serialize};

/// Radians per pixel of pointer drag.
pub const DRAG_SENSITIVITY: f32 = 0.005;
/// Field-of-view degrees per wheel delta unit.
pub const ZOOM_SENSITIVITY: f32 = 0.05;
pub const DEFAULT_FOV: f32 = 75.0;
pub const MIN_FOV: f32 = 30.0;
pub const MAX_FOV: f32 = 120.0;
/// Keeps the camera off the poles.
pub const PITCH_LIMIT: f32 = FRAC_PI_2 - 0.1;

/// Camera placed at the centre of the video sphere.
///
/// `phi` is the yaw and `theta` the pitch, both in radians.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SphereCamera {
    pub phi: f32,
    pub theta: f32,
    pub fov: f32,
    pub aspect: f32,
}

impl Default for SphereCamera {
    fn default() -> Self {
        Self {
            phi: 0.0,
            theta: 0.0,
            fov: DEFAULT_FOV,
            aspect: 16.0 / 9.0,
        }
    }
}

impl SphereCamera {
    /// Applies a pointer drag of `(dx, dy)` pixels.
    pub fn drag(&mut self, dx: f32, dy: f32) {
        self.phi += dx * DRAG_SENSITIVITY;
        self.theta = (self.theta + dy * DRAG_SENSITIVITY).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    /// Applies a wheel delta; positive values zoom out.
    pub fn zoom(&mut self, delta_y: f32) {
        self.fov = (self.fov + delta_y * ZOOM_SENSITIVITY).clamp(MIN_FOV, MAX_FOV);
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    /// Unit vector the camera looks along.
    pub fn look_at(&self) -> [f32; 3] {
        [
            self.theta.cos() * self.phi.sin(),
            self.theta.sin(),
            self.theta.cos() * self.phi.cos(),
        ]
    }

    /// Restores the initial orientation and zoom, keeping the aspect ratio.
    pub fn reset(&mut self) {
        *self = Self {
            aspect: self.aspect,
            ..Self::default()
        };
    }
}
