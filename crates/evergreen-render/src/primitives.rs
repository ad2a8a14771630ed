//! Ornament meshes (box, sphere)

use bytemuck::{Pod, Zeroable};
use evergreen_formation::GeometryKind;
use std::f32::consts::{PI, TAU};

/// A vertex with position and normal; color comes from the instance
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

impl MeshVertex {
    const ATTRIBS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        0 => Float32x3,
        1 => Float32x3,
    ];

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<MeshVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBS,
        }
    }
}

/// A mesh with vertices and indices, CCW when seen from outside
pub struct Mesh {
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }
}

/// Mesh for a geometry kind; point sprites have none
pub fn mesh_for(kind: GeometryKind) -> Option<Mesh> {
    match kind {
        GeometryKind::Point => None,
        GeometryKind::Box => Some(create_box_mesh(1.0)),
        GeometryKind::Sphere => Some(create_sphere_mesh(0.6, 16, 16)),
    }
}

/// Axis-aligned cube with edge length `size`, four vertices per face
pub fn create_box_mesh(size: f32) -> Mesh {
    let h = size / 2.0;
    // (normal, u, v) with u × v = normal
    let faces: [([f32; 3], [f32; 3], [f32; 3]); 6] = [
        ([1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]),
        ([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]),
        ([0.0, 1.0, 0.0], [0.0, 0.0, 1.0], [1.0, 0.0, 0.0]),
        ([0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
        ([0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
        ([0.0, 0.0, -1.0], [0.0, 1.0, 0.0], [1.0, 0.0, 0.0]),
    ];

    let mut vertices = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);
    for (normal, u, v) in faces {
        let base = vertices.len() as u32;
        for (su, sv) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
            let position = [
                (normal[0] + su * u[0] + sv * v[0]) * h,
                (normal[1] + su * u[1] + sv * v[1]) * h,
                (normal[2] + su * u[2] + sv * v[2]) * h,
            ];
            vertices.push(MeshVertex { position, normal });
        }
        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    Mesh { vertices, indices }
}

/// UV sphere; `segments` around the equator, `rings` from pole to pole
pub fn create_sphere_mesh(radius: f32, segments: u32, rings: u32) -> Mesh {
    let segments = segments.max(3);
    let rings = rings.max(2);

    let mut vertices = Vec::with_capacity(((segments + 1) * (rings + 1)) as usize);
    for iy in 0..=rings {
        let theta = iy as f32 / rings as f32 * PI;
        let (sin_theta, cos_theta) = theta.sin_cos();
        for ix in 0..=segments {
            let phi = ix as f32 / segments as f32 * TAU;
            let (sin_phi, cos_phi) = phi.sin_cos();
            let normal = [-cos_phi * sin_theta, cos_theta, sin_phi * sin_theta];
            vertices.push(MeshVertex {
                position: [normal[0] * radius, normal[1] * radius, normal[2] * radius],
                normal,
            });
        }
    }

    let row = segments + 1;
    let mut indices = Vec::new();
    for iy in 0..rings {
        for ix in 0..segments {
            let a = iy * row + ix + 1;
            let b = iy * row + ix;
            let c = (iy + 1) * row + ix;
            let d = (iy + 1) * row + ix + 1;
            // The pole rows collapse to a point; skip their degenerate halves
            if iy != 0 {
                indices.extend_from_slice(&[a, b, d]);
            }
            if iy != rings - 1 {
                indices.extend_from_slice(&[b, c, d]);
            }
        }
    }

    Mesh { vertices, indices }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sub(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
        [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
    }

    fn cross(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
        [
            a[1] * b[2] - a[2] * b[1],
            a[2] * b[0] - a[0] * b[2],
            a[0] * b[1] - a[1] * b[0],
        ]
    }

    fn dot(a: [f32; 3], b: [f32; 3]) -> f32 {
        a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
    }

    /// Every triangle of a convex, origin-centered mesh must face away from the origin
    fn assert_outward_ccw(mesh: &Mesh) {
        for tri in mesh.indices.chunks(3) {
            let [a, b, c] = [0, 1, 2].map(|i| mesh.vertices[tri[i] as usize].position);
            let face = cross(sub(b, a), sub(c, a));
            let centroid = [
                (a[0] + b[0] + c[0]) / 3.0,
                (a[1] + b[1] + c[1]) / 3.0,
                (a[2] + b[2] + c[2]) / 3.0,
            ];
            assert!(dot(face, centroid) > 0.0, "inward triangle {tri:?}");
        }
    }

    #[test]
    fn box_mesh_is_unit_cube() {
        let mesh = create_box_mesh(1.0);
        assert_eq!(mesh.vertex_count(), 24);
        assert_eq!(mesh.index_count(), 36);
        for v in &mesh.vertices {
            assert!(v.position.iter().all(|c| (c.abs() - 0.5).abs() < 1e-6));
            // Each vertex sits on the face its normal points out of
            assert!((dot(v.position, v.normal) - 0.5).abs() < 1e-6);
        }
        assert_outward_ccw(&mesh);
    }

    #[test]
    fn sphere_mesh_has_radius_and_winding() {
        let mesh = create_sphere_mesh(0.6, 16, 16);
        assert_eq!(mesh.vertex_count(), 17 * 17);
        // Two triangles per quad, minus one per quad on each pole row
        assert_eq!(mesh.index_count(), (16 * 16 * 2 - 2 * 16) * 3);
        for v in &mesh.vertices {
            let r = dot(v.position, v.position).sqrt();
            assert!((r - 0.6).abs() < 1e-5);
        }
        assert_outward_ccw(&mesh);
    }

    #[test]
    fn geometry_kinds_map_to_meshes() {
        assert!(mesh_for(GeometryKind::Point).is_none());
        assert_eq!(mesh_for(GeometryKind::Box).unwrap().vertex_count(), 24);
        assert_eq!(mesh_for(GeometryKind::Sphere).unwrap().vertex_count(), 289);
    }

    #[test]
    fn vertex_layout() {
        assert_eq!(std::mem::size_of::<MeshVertex>(), 24);
    }
}
