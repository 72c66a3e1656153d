use glam::{Mat4, Vec3};

use crate::{color::Color, window::Size};

/// Layout of the drawing surface, in viewport-relative units.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Viewport {
    pub height_vh: f32,
    pub width_vw: f32,
    pub centered: bool,
}

impl Viewport {
    pub const FILL: Viewport = Viewport {
        height_vh: 100.,
        width_vw: 100.,
        centered: true,
    };

    /// Size of the surface for a window of `available` pixels.
    pub fn resolve(&self, available: Size) -> Size {
        Size {
            width: (available.width as f32 * self.width_vw / 100.).round() as u32,
            height: (available.height as f32 * self.height_vh / 100.).round() as u32,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Camera {
    /// Vertical field of view in degrees.
    pub fov: f32,
    pub aspect_ratio: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    pub fn proj_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov.to_radians(), self.aspect_ratio, self.near, self.far)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            fov: 75.,
            aspect_ratio: 1.,
            near: 0.1,
            far: 1000.,
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct OrbitControls {
    pub enable_zoom: bool,
    pub enable_pan: bool,
    pub enable_rotate: bool,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DirectionalLight {
    /// Position of the light; it shines from here towards the origin.
    pub position: Vec3,
    pub intensity: f32,
    pub color: Color,
}

impl DirectionalLight {
    pub fn direction_to_light(&self) -> Vec3 {
        self.position.normalize_or_zero()
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CylinderGeometry {
    pub radius_top: f32,
    pub radius_bottom: f32,
    pub height: f32,
    pub radial_segments: u32,
    pub height_segments: u32,
    pub open_ended: bool,
}

impl CylinderGeometry {
    pub fn new(radius_top: f32, radius_bottom: f32, height: f32) -> Self {
        Self {
            radius_top,
            radius_bottom,
            height,
            radial_segments: 32,
            height_segments: 1,
            open_ended: false,
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct LambertMaterial {
    pub color: Color,
    pub emissive: Color,
}

/// Parameters of the sparkle halo attached to a mesh.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Emitter {
    pub count: u32,
    pub scale: f32,
    pub size: f32,
    pub speed: f32,
    pub noise: f32,
    pub color: Color,
}
