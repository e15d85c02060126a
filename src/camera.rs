//! Orbit camera for the viewer.

use glam::{Mat4, Vec3};
use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, PI, TAU};

/// Seconds per full orbit at an auto-rotate speed of 1.
const SECONDS_PER_ORBIT: f32 = 60.0;

/// Orbit camera circling a target point.
///
/// Pitch is measured from the horizon, so a pitch of 0 looks straight at the
/// target from the side.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// Horizontal rotation angle in radians.
    pub yaw: f32,
    /// Vertical rotation angle in radians.
    pub pitch: f32,
    /// Distance from the target point.
    pub distance: f32,
    /// Point the camera orbits around.
    pub target: Vec3,
    /// Vertical field of view in radians.
    pub fov_y: f32,
    /// Lowest pitch reachable by orbiting, in radians.
    pub min_pitch: f32,
    /// Highest pitch reachable by orbiting, in radians.
    pub max_pitch: f32,
    /// Closest zoom distance.
    pub min_distance: f32,
    /// Farthest zoom distance.
    pub max_distance: f32,
    /// Auto-rotate speed; 1.0 is one orbit per minute.
    pub auto_rotate_speed: f32,
}

impl Camera {
    /// Camera 25 units back on +Z looking at the origin.
    pub fn new() -> Self {
        Self {
            yaw: 0.0,
            pitch: 0.0,
            distance: 25.0,
            target: Vec3::ZERO,
            fov_y: 45.0_f32.to_radians(),
            // Polar angle kept between PI/4 and PI/1.8 from straight up
            min_pitch: FRAC_PI_2 - PI / 1.8,
            max_pitch: FRAC_PI_2 - FRAC_PI_4,
            min_distance: 8.0,
            max_distance: 60.0,
            auto_rotate_speed: 0.5,
        }
    }

    /// Calculate the camera's world position.
    pub fn position(&self) -> Vec3 {
        let x = self.distance * self.pitch.cos() * self.yaw.sin();
        let y = self.distance * self.pitch.sin();
        let z = self.distance * self.pitch.cos() * self.yaw.cos();
        self.target + Vec3::new(x, y, z)
    }

    /// Calculate the view matrix for rendering.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position(), self.target, Vec3::Y)
    }

    /// Perspective projection for a viewport of the given aspect ratio.
    pub fn projection(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, aspect.max(f32::EPSILON), 0.1, 200.0)
    }

    /// Combined view-projection matrix.
    pub fn view_proj(&self, aspect: f32) -> Mat4 {
        self.projection(aspect) * self.view_matrix()
    }

    /// Rotate by a mouse drag of `dx`, `dy` pixels.
    pub fn orbit(&mut self, dx: f32, dy: f32) {
        self.yaw -= dx * 0.005;
        self.pitch = (self.pitch + dy * 0.005).clamp(self.min_pitch, self.max_pitch);
    }

    /// Move toward or away from the target by `scroll` wheel lines.
    pub fn zoom(&mut self, scroll: f32) {
        self.distance =
            (self.distance * (1.0 - scroll * 0.1)).clamp(self.min_distance, self.max_distance);
    }

    /// Advance the automatic orbit by `delta` seconds.
    pub fn auto_rotate(&mut self, delta: f32) {
        self.yaw = (self.yaw + TAU / SECONDS_PER_ORBIT * self.auto_rotate_speed * delta) % TAU;
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}
