//! Low-poly instance meshes.
//!
//! Every face gets its own three vertices so normals stay flat.

use crate::role::Role;
use crate::Vec3;
use bytemuck::{Pod, Zeroable};
use std::f32::consts::TAU;

/// Vertex of an instance mesh.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

/// Indexed triangle list.
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u16>,
}

impl Mesh {
    /// Mesh drawn for each particle of `role`.
    pub fn for_role(role: Role) -> Self {
        match role {
            // Three-sided cone reads as a sharp tetrahedron
            Role::Needles => Self::cone(0.2, 0.8, 3),
            Role::Ornaments => Self::icosahedron(0.5),
        }
    }

    /// Mesh for the star on top.
    pub fn star() -> Self {
        Self::octahedron(1.5)
    }

    /// Cone along +Y, centered on the origin, apex up.
    pub fn cone(radius: f32, height: f32, segments: u32) -> Self {
        let segments = segments.max(3);
        let half = height / 2.0;
        let apex = Vec3::new(0.0, half, 0.0);
        let base_center = Vec3::new(0.0, -half, 0.0);
        let ring = |i: u32| {
            let angle = i as f32 / segments as f32 * TAU;
            Vec3::new(radius * angle.sin(), -half, radius * angle.cos())
        };

        let mut mesh = Self::default();
        for i in 0..segments {
            let a = ring(i);
            let b = ring(i + 1);
            let mut radial = (a + b) / 2.0;
            radial.y = 0.0;
            mesh.push_triangle(apex, a, b, radial);
            mesh.push_triangle(base_center, b, a, Vec3::NEG_Y);
        }
        mesh
    }

    /// Regular icosahedron inscribed in a sphere of `radius`.
    pub fn icosahedron(radius: f32) -> Self {
        let t = (1.0 + 5.0_f32.sqrt()) / 2.0;
        let corners = [
            Vec3::new(-1.0, t, 0.0),
            Vec3::new(1.0, t, 0.0),
            Vec3::new(-1.0, -t, 0.0),
            Vec3::new(1.0, -t, 0.0),
            Vec3::new(0.0, -1.0, t),
            Vec3::new(0.0, 1.0, t),
            Vec3::new(0.0, -1.0, -t),
            Vec3::new(0.0, 1.0, -t),
            Vec3::new(t, 0.0, -1.0),
            Vec3::new(t, 0.0, 1.0),
            Vec3::new(-t, 0.0, -1.0),
            Vec3::new(-t, 0.0, 1.0),
        ]
        .map(|v| v.normalize() * radius);

        const FACES: [[usize; 3]; 20] = [
            [0, 11, 5], [0, 5, 1], [0, 1, 7], [0, 7, 10], [0, 10, 11],
            [1, 5, 9], [5, 11, 4], [11, 10, 2], [10, 7, 6], [7, 1, 8],
            [3, 9, 4], [3, 4, 2], [3, 2, 6], [3, 6, 8], [3, 8, 9],
            [4, 9, 5], [2, 4, 11], [6, 2, 10], [8, 6, 7], [9, 8, 1],
        ];
        Self::from_faces(&corners, &FACES)
    }

    /// Regular octahedron with vertices on the axes at `radius`.
    pub fn octahedron(radius: f32) -> Self {
        let corners = [Vec3::X, Vec3::NEG_X, Vec3::Y, Vec3::NEG_Y, Vec3::Z, Vec3::NEG_Z]
            .map(|v| v * radius);

        const FACES: [[usize; 3]; 8] = [
            [0, 2, 4], [0, 4, 3], [0, 3, 5], [0, 5, 2],
            [1, 2, 5], [1, 5, 3], [1, 3, 4], [1, 4, 2],
        ];
        Self::from_faces(&corners, &FACES)
    }

    /// Number of triangles.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    fn from_faces(corners: &[Vec3], faces: &[[usize; 3]]) -> Self {
        let mut mesh = Self::default();
        for &[a, b, c] in faces {
            let (a, b, c) = (corners[a], corners[b], corners[c]);
            // Convex and centered on the origin: the centroid points outward
            mesh.push_triangle(a, b, c, (a + b + c) / 3.0);
        }
        mesh
    }

    /// Append a flat triangle, winding it counter-clockwise seen from `outward`.
    fn push_triangle(&mut self, a: Vec3, b: Vec3, c: Vec3, outward: Vec3) {
        let mut normal = (b - a).cross(c - a).normalize_or_zero();
        let (b, c) = if normal.dot(outward) < 0.0 {
            normal = -normal;
            (c, b)
        } else {
            (b, c)
        };

        let base = self.vertices.len() as u16;
        for position in [a, b, c] {
            self.vertices.push(MeshVertex {
                position: position.to_array(),
                normal: normal.to_array(),
            });
        }
        self.indices.extend_from_slice(&[base, base + 1, base + 2]);
    }
}
