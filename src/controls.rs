use std::f32::consts::{PI, TAU};

use glam::{vec3, Mat4, Vec3};
use log::debug;

use crate::{
    component::{Camera, OrbitControls},
    window::Size,
};

const MIN_POLAR: f32 = 1e-6;
const MIN_DISTANCE: f32 = 0.1;
const MAX_DISTANCE: f32 = 1000.;
const DOLLY_SCALE: f32 = 0.95;

/// Which gesture a pointer drag performs.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Drag {
    Rotate,
    Pan,
}

/// Camera orbiting a target point, driven by pointer gestures.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Orbit {
    pub target: Vec3,
    pub radius: f32,
    /// Azimuth around +Y, measured from +Z.
    pub theta: f32,
    /// Angle from +Y.
    pub phi: f32,
}

impl Orbit {
    pub fn looking_at(position: Vec3, target: Vec3) -> Self {
        let offset = position - target;
        let radius = offset.length();
        let (theta, phi) = if radius == 0. {
            (0., PI / 2.)
        } else {
            (
                offset.x.atan2(offset.z),
                (offset.y / radius).clamp(-1., 1.).acos(),
            )
        };
        Self {
            target,
            radius,
            theta,
            phi,
        }
    }

    pub fn position(&self) -> Vec3 {
        let (sin_phi, cos_phi) = self.phi.sin_cos();
        let (sin_theta, cos_theta) = self.theta.sin_cos();
        self.target + vec3(sin_phi * sin_theta, cos_phi, sin_phi * cos_theta) * self.radius
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position(), self.target, Vec3::Y)
    }

    /// Applies a drag of `(dx, dy)` pixels on a surface of `size`.
    pub fn drag(
        &mut self,
        controls: &OrbitControls,
        camera: &Camera,
        gesture: Drag,
        (dx, dy): (f32, f32),
        size: Size,
    ) {
        if size.is_empty() {
            return;
        }
        let height = size.height as f32;
        match gesture {
            Drag::Rotate if controls.enable_rotate => {
                self.theta -= TAU * dx / height;
                self.phi = (self.phi - TAU * dy / height).clamp(MIN_POLAR, PI - MIN_POLAR);
                debug!("orbit rotate: theta {} phi {}", self.theta, self.phi);
            }
            Drag::Pan if controls.enable_pan => {
                let distance = self.radius * (camera.fov.to_radians() / 2.).tan();
                let forward = (self.target - self.position()).normalize_or_zero();
                let right = forward.cross(Vec3::Y).normalize_or_zero();
                let up = right.cross(forward);
                let pan = right * (-2. * dx * distance / height) + up * (2. * dy * distance / height);
                self.target += pan;
                debug!("orbit pan: target {:?}", self.target);
            }
            _ => (),
        }
    }

    /// Positive `notches` move the camera closer.
    pub fn zoom(&mut self, controls: &OrbitControls, notches: f32) {
        if !controls.enable_zoom {
            return;
        }
        self.radius = (self.radius * DOLLY_SCALE.powf(notches)).clamp(MIN_DISTANCE, MAX_DISTANCE);
        debug!("orbit zoom: radius {}", self.radius);
    }
}

impl Default for Orbit {
    fn default() -> Self {
        Self::looking_at(vec3(0., 0., 5.), Vec3::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: OrbitControls = OrbitControls {
        enable_zoom: true,
        enable_pan: true,
        enable_rotate: true,
    };
    const NONE: OrbitControls = OrbitControls {
        enable_zoom: false,
        enable_pan: false,
        enable_rotate: false,
    };
    const SIZE: Size = Size {
        width: 800,
        height: 600,
    };

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).abs().max_element() < 1e-4
    }

    #[test]
    fn default_camera_sits_on_positive_z() {
        let orbit = Orbit::default();
        assert!(approx(orbit.position(), vec3(0., 0., 5.)));
        assert!((orbit.radius - 5.).abs() < 1e-6);

        let origin_in_view = orbit.view_matrix().transform_point3(Vec3::ZERO);
        assert!(approx(origin_in_view, vec3(0., 0., -5.)));
    }

    #[test]
    fn rotate_keeps_distance_to_target() {
        let mut orbit = Orbit::default();
        orbit.drag(&ALL, &Camera::default(), Drag::Rotate, (120., -45.), SIZE);
        assert!(!approx(orbit.position(), vec3(0., 0., 5.)));
        assert!(((orbit.position() - orbit.target).length() - 5.).abs() < 1e-4);
    }

    #[test]
    fn polar_angle_is_clamped() {
        let mut orbit = Orbit::default();
        orbit.drag(&ALL, &Camera::default(), Drag::Rotate, (0., 10_000.), SIZE);
        assert!(orbit.phi >= MIN_POLAR);
        orbit.drag(&ALL, &Camera::default(), Drag::Rotate, (0., -10_000.), SIZE);
        assert!(orbit.phi <= PI - MIN_POLAR);
    }

    #[test]
    fn pan_moves_target_and_camera_together() {
        let mut orbit = Orbit::default();
        let offset_before = orbit.position() - orbit.target;
        orbit.drag(&ALL, &Camera::default(), Drag::Pan, (50., 20.), SIZE);

        assert_ne!(orbit.target, Vec3::ZERO);
        assert!(approx(orbit.position() - orbit.target, offset_before));
        // dragging right moves the scene right, so the target goes left
        assert!(orbit.target.x < 0.);
        assert!(orbit.target.y > 0.);
    }

    #[test]
    fn zoom_is_clamped() {
        let mut orbit = Orbit::default();
        orbit.zoom(&ALL, 1.);
        assert!((orbit.radius - 5. * DOLLY_SCALE).abs() < 1e-5);

        orbit.zoom(&ALL, 1_000.);
        assert_eq!(orbit.radius, MIN_DISTANCE);
        orbit.zoom(&ALL, -10_000.);
        assert_eq!(orbit.radius, MAX_DISTANCE);
    }

    #[test]
    fn disabled_gestures_are_ignored() {
        let mut orbit = Orbit::default();
        let before = orbit;
        orbit.drag(&NONE, &Camera::default(), Drag::Rotate, (100., 100.), SIZE);
        orbit.drag(&NONE, &Camera::default(), Drag::Pan, (100., 100.), SIZE);
        orbit.zoom(&NONE, 3.);
        assert_eq!(orbit, before);
    }

    #[test]
    fn empty_surface_ignores_drags() {
        let mut orbit = Orbit::default();
        let before = orbit;
        orbit.drag(&ALL, &Camera::default(), Drag::Rotate, (10., 10.), Size::default());
        assert_eq!(orbit, before);
    }
}
