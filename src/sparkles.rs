use std::time::SystemTime;

use glam::{vec3, Mat4, Vec3};
use log::info;
use rand::prelude::*;
use rand_pcg::Pcg64Mcg;

use crate::component::Emitter;

/// Amplitude of the per-axis drift, in world units.
pub const DRIFT_AMPLITUDE: f32 = 0.2;

/// Current unix time in milliseconds, used to seed a fresh field each run.
pub fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}

/// World-space displacement of a particle at `position` after `seconds`.
fn drift(position: Vec3, seconds: f32, speed: f32, noise: f32) -> Vec3 {
    let phase = seconds * speed + position.x * noise * 100.;
    vec3(phase.cos(), phase.sin(), phase.cos()) * DRIFT_AMPLITUDE
}

/// Rest positions of an emitter's particles plus the drift applied over time.
#[derive(Debug, Clone)]
pub struct SparkleField {
    emitter: Emitter,
    rest_positions: Vec<Vec3>,
}

impl SparkleField {
    pub fn new(emitter: Emitter, seed: u64) -> Self {
        let mut rng = Pcg64Mcg::seed_from_u64(seed);
        info!("Seeded sparkle RNG with {}", seed);

        let half = emitter.scale * 0.5;
        let rest_positions = (0..emitter.count)
            .map(|_| {
                vec3(
                    rng.gen_range(-half..=half),
                    rng.gen_range(-half..=half),
                    rng.gen_range(-half..=half),
                )
            })
            .collect();

        Self {
            emitter,
            rest_positions,
        }
    }

    pub fn emitter(&self) -> &Emitter {
        &self.emitter
    }

    pub fn len(&self) -> usize {
        self.rest_positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rest_positions.is_empty()
    }

    pub fn rest_positions(&self) -> &[Vec3] {
        &self.rest_positions
    }

    /// World-space particle positions `seconds` after the field was created.
    ///
    /// Rest positions are carried by `model` first; the drift is then added
    /// in world space, keyed on the transformed x coordinate.
    pub fn positions_at(&self, seconds: f32, model: Mat4) -> impl Iterator<Item = Vec3> + '_ {
        let Emitter { speed, noise, .. } = self.emitter;
        self.rest_positions.iter().map(move |&p| {
            let world = model.transform_point3(p);
            world + drift(world, seconds, speed, noise)
        })
    }
}

#[cfg(test)]
mod tests {
    use glam::{EulerRot, Quat};

    use super::*;
    use crate::color::Color;

    fn emitter() -> Emitter {
        Emitter {
            count: 100,
            scale: 1.,
            size: 6.,
            speed: 0.002,
            noise: 0.2,
            color: Color::from_hex(0xffa500),
        }
    }

    #[test]
    fn seeds_count_particles_inside_scale_cube() {
        let field = SparkleField::new(emitter(), 42);
        assert_eq!(field.len(), 100);
        for p in field.rest_positions() {
            assert!(p.abs().max_element() <= 0.5, "{:?} outside cube", p);
        }
    }

    #[test]
    fn same_seed_same_field() {
        let a = SparkleField::new(emitter(), 7);
        let b = SparkleField::new(emitter(), 7);
        let c = SparkleField::new(emitter(), 8);
        assert_eq!(a.rest_positions(), b.rest_positions());
        assert_ne!(a.rest_positions(), c.rest_positions());
    }

    #[test]
    fn drift_is_bounded() {
        let field = SparkleField::new(emitter(), 1);
        let bound = DRIFT_AMPLITUDE * 3f32.sqrt() + 1e-5;
        for t in [0., 1., 60., 3600.] {
            let moved = field.positions_at(t, Mat4::IDENTITY);
            for (rest, moved) in field.rest_positions().iter().zip(moved) {
                assert!((moved - *rest).length() <= bound);
            }
        }
    }

    #[test]
    fn field_moves_over_time() {
        let field = SparkleField::new(emitter(), 3);
        let start: Vec<_> = field.positions_at(0., Mat4::IDENTITY).collect();
        let later: Vec<_> = field.positions_at(1000., Mat4::IDENTITY).collect();
        assert_ne!(start, later);
    }

    #[test]
    fn emitter_is_kept_unchanged() {
        let field = SparkleField::new(emitter(), 5);
        let _ = field.positions_at(10., Mat4::IDENTITY).count();
        assert_eq!(field.emitter(), &emitter());
    }

    #[test]
    fn empty_emitter() {
        let field = SparkleField::new(Emitter { count: 0, ..emitter() }, 0);
        assert!(field.is_empty());
        assert_eq!(field.positions_at(1., Mat4::IDENTITY).count(), 0);
    }

    #[test]
    fn drift_axes_do_not_spin_with_the_model() {
        let field = SparkleField::new(emitter(), 11);
        let model = Mat4::from_quat(Quat::from_euler(EulerRot::XYZ, 0.7, 1.3, 0.));
        let t = 42.;
        let moved = field.positions_at(t, model);
        for (rest, moved) in field.rest_positions().iter().zip(moved) {
            let world = model.transform_point3(*rest);
            let phase = t * 0.002 + world.x * 0.2 * 100.;
            let offset = moved - world;
            assert!((offset.x - phase.cos() * DRIFT_AMPLITUDE).abs() < 1e-4);
            assert!((offset.y - phase.sin() * DRIFT_AMPLITUDE).abs() < 1e-4);
            assert!((offset.z - phase.cos() * DRIFT_AMPLITUDE).abs() < 1e-4);
        }
    }

    #[test]
    fn clock_seed_changes_the_field() {
        let seed = clock_seed();
        assert_ne!(seed, 0, "system clock should be past the unix epoch");
        let a = SparkleField::new(emitter(), seed);
        let b = SparkleField::new(emitter(), seed.wrapping_add(1));
        assert_eq!(a.len(), 100);
        assert_ne!(a.rest_positions(), b.rest_positions());
    }
}
