//! Camera description shared with the GPU front-end.
//!
//! Avoids platform APIs so projection math stays host-testable.

use crate::config::SceneConfig;
use glam::{Mat4, Vec3};

/// Right-handed perspective camera looking down -Z at the scene origin.
#[derive(Clone, Debug)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub aspect: f32,
    pub fovy_radians: f32,
    pub znear: f32,
    pub zfar: f32,
    /// Translation applied to all scene content (the "content group").
    pub content_offset: Vec3,
}

impl Camera {
    pub fn from_config(cfg: &SceneConfig, aspect: f32) -> Self {
        Self {
            eye: Vec3::new(0.0, 0.0, cfg.camera_z),
            target: Vec3::ZERO,
            up: Vec3::Y,
            aspect: sanitize_aspect(aspect),
            fovy_radians: cfg.camera_fov_deg.to_radians(),
            znear: cfg.camera_near,
            zfar: cfg.camera_far,
            content_offset: Vec3::new(cfg.content_offset_x(), 0.0, 0.0),
        }
    }

    /// Update the aspect ratio after a surface resize.
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.aspect = sanitize_aspect(width as f32 / height.max(1) as f32);
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fovy_radians, self.aspect, self.znear, self.zfar)
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_translation(self.content_offset)
    }

    /// Combined clip-from-content matrix uploaded to the line shaders.
    pub fn view_proj(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix() * self.model_matrix()
    }
}

#[inline]
fn sanitize_aspect(aspect: f32) -> f32 {
    if aspect.is_finite() && aspect > 0.0 {
        aspect
    } else {
        1.0
    }
}
