mod depth;
mod mesh;
mod renderer;
mod sparkles;

use glam::Mat4;

use crate::{controls::Orbit, entity::Scene, window::Size};

pub use renderer::Renderer;

/// Camera matrices and surface metrics shared by every pass of a frame.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct View {
    pub v_mat: Mat4,
    pub p_mat: Mat4,
    pub size: Size,
    pub scale_factor: f32,
}

impl View {
    pub fn new(scene: &Scene, orbit: &Orbit, size: Size, scale_factor: f32) -> Self {
        Self {
            v_mat: orbit.view_matrix(),
            p_mat: scene.camera.proj_matrix(),
            size,
            scale_factor,
        }
    }
}

impl Default for View {
    fn default() -> Self {
        Self {
            v_mat: Mat4::IDENTITY,
            p_mat: Mat4::IDENTITY,
            size: Size {
                width: 1,
                height: 1,
            },
            scale_factor: 1.,
        }
    }
}
