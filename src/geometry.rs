use std::f32::consts::TAU;

use bytemuck::{Pod, Zeroable};
use glam::{vec3, Vec3};

use crate::component::CylinderGeometry;

#[derive(Debug, Copy, Clone, PartialEq, Default, Pod, Zeroable)]
#[repr(C)]
pub struct Vertex {
    pub position: Vec3,
    pub normal: Vec3,
}

#[derive(Debug, Clone, Default)]
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    fn push(&mut self, position: Vec3, normal: Vec3) -> u32 {
        let index = self.vertices.len() as u32;
        self.vertices.push(Vertex { position, normal });
        index
    }
}

impl From<&CylinderGeometry> for MeshData {
    /// Counter-clockwise triangles, centered on the origin, axis along +Y.
    fn from(geometry: &CylinderGeometry) -> Self {
        let mut mesh = MeshData::default();
        build_torso(geometry, &mut mesh);
        if !geometry.open_ended {
            if geometry.radius_top > 0. {
                build_cap(geometry, true, &mut mesh);
            }
            if geometry.radius_bottom > 0. {
                build_cap(geometry, false, &mut mesh);
            }
        }
        mesh
    }
}

fn build_torso(geometry: &CylinderGeometry, mesh: &mut MeshData) {
    let CylinderGeometry {
        radius_top,
        radius_bottom,
        height,
        radial_segments,
        height_segments,
        ..
    } = *geometry;
    let half_height = height / 2.;
    let slope = (radius_bottom - radius_top) / height;

    let mut rows = Vec::with_capacity(height_segments as usize + 1);
    for y in 0..=height_segments {
        let v = y as f32 / height_segments as f32;
        let radius = v * (radius_bottom - radius_top) + radius_top;

        let row = (0..=radial_segments)
            .map(|x| {
                let theta = x as f32 / radial_segments as f32 * TAU;
                let (sin, cos) = theta.sin_cos();
                let position = vec3(radius * sin, -v * height + half_height, radius * cos);
                let normal = vec3(sin, slope, cos).normalize();
                mesh.push(position, normal)
            })
            .collect::<Vec<_>>();
        rows.push(row);
    }

    for x in 0..radial_segments as usize {
        for y in 0..height_segments as usize {
            let a = rows[y][x];
            let b = rows[y + 1][x];
            let c = rows[y + 1][x + 1];
            let d = rows[y][x + 1];
            mesh.indices.extend_from_slice(&[a, b, d, b, c, d]);
        }
    }
}

fn build_cap(geometry: &CylinderGeometry, top: bool, mesh: &mut MeshData) {
    let radius = if top {
        geometry.radius_top
    } else {
        geometry.radius_bottom
    };
    let sign = if top { 1. } else { -1. };
    let y = geometry.height / 2. * sign;
    let normal = vec3(0., sign, 0.);

    let centers = (0..geometry.radial_segments)
        .map(|_| mesh.push(vec3(0., y, 0.), normal))
        .collect::<Vec<_>>();

    let ring = (0..=geometry.radial_segments)
        .map(|x| {
            let theta = x as f32 / geometry.radial_segments as f32 * TAU;
            let (sin, cos) = theta.sin_cos();
            mesh.push(vec3(radius * sin, y, radius * cos), normal)
        })
        .collect::<Vec<_>>();

    for (x, &c) in centers.iter().enumerate() {
        let (i, j) = (ring[x], ring[x + 1]);
        if top {
            mesh.indices.extend_from_slice(&[i, j, c]);
        } else {
            mesh.indices.extend_from_slice(&[j, i, c]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_cylinder() -> MeshData {
        MeshData::from(&CylinderGeometry::new(1., 1., 1.))
    }

    fn face_normal(mesh: &MeshData, tri: &[u32]) -> Vec3 {
        let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| mesh.vertices[i as usize].position);
        (b - a).cross(c - a)
    }

    #[test]
    fn vertex_and_index_counts() {
        let mesh = unit_cylinder();
        // torso 2 rows of 33, two caps of 32 centers + 33 ring vertices
        assert_eq!(mesh.vertices.len(), 66 + 2 * 65);
        assert_eq!(mesh.indices.len(), 32 * 6 + 2 * 32 * 3);
        assert!(mesh
            .indices
            .iter()
            .all(|&i| (i as usize) < mesh.vertices.len()));
    }

    #[test]
    fn vertices_lie_on_the_cylinder() {
        let mesh = unit_cylinder();
        for v in &mesh.vertices {
            assert!(v.position.y.abs() <= 0.5 + 1e-6);
            let r = (v.position.x * v.position.x + v.position.z * v.position.z).sqrt();
            assert!(r <= 1. + 1e-5, "radius {} out of bounds", r);
            assert!((v.normal.length() - 1.).abs() < 1e-5);
        }
    }

    #[test]
    fn side_normals_point_outwards() {
        let mesh = unit_cylinder();
        for v in &mesh.vertices[..66] {
            let radial = vec3(v.position.x, 0., v.position.z);
            assert!((radial.length() - 1.).abs() < 1e-5);
            assert!(radial.dot(v.normal) > 0.99);
        }
    }

    #[test]
    fn triangles_wind_counter_clockwise_from_outside() {
        let mesh = unit_cylinder();
        for tri in mesh.indices.chunks(3) {
            let centroid = tri
                .iter()
                .map(|&i| mesh.vertices[i as usize].position)
                .fold(Vec3::ZERO, |acc, p| acc + p)
                / 3.;
            let n = face_normal(&mesh, tri);
            assert!(n.dot(centroid) > 0., "inward facing triangle {:?}", tri);
        }
    }

    #[test]
    fn open_ended_cylinder_has_no_caps() {
        let geometry = CylinderGeometry {
            open_ended: true,
            ..CylinderGeometry::new(1., 1., 1.)
        };
        let mesh = MeshData::from(&geometry);
        assert_eq!(mesh.vertices.len(), 66);
        assert_eq!(mesh.indices.len(), 32 * 6);
    }

    #[test]
    fn dense_cylinder_indices_reach_past_u16() {
        let geometry = CylinderGeometry {
            radial_segments: 400,
            height_segments: 200,
            ..CylinderGeometry::new(1., 1., 1.)
        };
        let mesh = MeshData::from(&geometry);
        assert_eq!(mesh.vertices.len(), 401 * 201 + 2 * (400 + 401));
        assert!(mesh.vertices.len() > u16::MAX as usize);
        let max = mesh.indices.iter().copied().max().unwrap();
        assert_eq!(max as usize, mesh.vertices.len() - 1);
    }
}
