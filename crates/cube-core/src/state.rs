//! Camera state shared with the renderers.
//!
//! These types avoid referencing platform-specific APIs and are used by both
//! native and web targets to build view/projection matrices.

use glam::{Mat4, Vec3};

use crate::config::GridConfig;
use crate::constants::*;

/// Simple right-handed camera description with perspective projection.
#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub aspect: f32,
    pub fovy_radians: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Camera {
    /// Starting camera: off to the side of the cube at half height, aimed at
    /// its center. The aspect ratio stays fixed from here on.
    pub fn for_cube(cube_length: f32, width: u32, height: u32) -> Self {
        let center = cube_center(cube_length);
        Self {
            eye: Vec3::new(CAMERA_START_OFFSET, center.y, CAMERA_START_OFFSET),
            target: center,
            up: Vec3::Y,
            aspect: width as f32 / height.max(1) as f32,
            fovy_radians: CAMERA_FOVY_DEGREES.to_radians(),
            znear: CAMERA_ZNEAR,
            zfar: CAMERA_ZFAR,
        }
    }

    /// Place the camera on its circular orbit for `frame` and re-aim it at
    /// the cube's center.
    pub fn orbit(&mut self, frame: u64, config: &GridConfig) {
        let cube_length = config.cube_length();
        let radius = config.orbit_radius();
        let angle = orbit_angle(frame, config.time_factor);
        let half = cube_length / 2.0;
        self.eye = Vec3::new(
            radius * angle.sin() as f32 + half,
            half,
            radius * angle.cos() as f32 + half,
        );
        self.target = cube_center(cube_length);
    }

    /// Compute the clip-space projection matrix.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fovy_radians, self.aspect, self.znear, self.zfar)
    }
    /// Compute the view matrix that transforms world to view space.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    #[inline]
    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

/// Camera orbit angle in radians for `frame`, in `f64` like the line time.
#[inline]
pub fn orbit_angle(frame: u64, time_factor: f32) -> f64 {
    frame as f64 * time_factor as f64
}

#[inline]
pub fn cube_center(cube_length: f32) -> Vec3 {
    Vec3::splat(cube_length / 2.0)
}
