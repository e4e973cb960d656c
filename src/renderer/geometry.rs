//! Cube geometry
//!
//! Non-indexed: 6 faces, 2 triangles each, 36 vertices. Triangles are wound
//! clockwise as seen from outside the cube.

use crate::core::vertex::{VertexP, VertexUv};
use crate::device::GraphicsDevice;
use tracing::debug;

/// Vertices drawn per frame.
pub const CUBE_VERTEX_COUNT: u32 = 36;

const CORNERS: [[f32; 3]; 8] = [
    [-1.0, -1.0, -1.0],
    [1.0, -1.0, -1.0],
    [1.0, 1.0, -1.0],
    [-1.0, 1.0, -1.0],
    [-1.0, -1.0, 1.0],
    [1.0, -1.0, 1.0],
    [1.0, 1.0, 1.0],
    [-1.0, 1.0, 1.0],
];

// Corners of each face as seen from outside: top-left, top-right,
// bottom-right, bottom-left.
const FACES: [[usize; 4]; 6] = [
    [7, 6, 5, 4], // +z
    [2, 3, 0, 1], // -z
    [6, 2, 1, 5], // +x
    [3, 7, 4, 0], // -x
    [3, 2, 6, 7], // +y
    [4, 5, 1, 0], // -y
];

// Quad corner indices for the two triangles of a face.
const FACE_TRIANGLES: [usize; 6] = [0, 1, 2, 2, 3, 0];

/// Texture coordinates shared by every face.
pub const FACE_TEX_COORDS: [[f32; 2]; 6] = [
    [0.0, 0.0],
    [1.0, 0.0],
    [1.0, 1.0],
    [1.0, 1.0],
    [0.0, 1.0],
    [0.0, 0.0],
];

/// CPU-side cube arrays.
#[derive(Debug, Clone)]
pub struct CubeMesh {
    pub positions: Vec<VertexP>,
    pub tex_coords: Vec<VertexUv>,
}

impl CubeMesh {
    pub fn new() -> Self {
        let positions = FACES
            .iter()
            .flat_map(|face| FACE_TRIANGLES.iter().map(move |&i| VertexP::new(CORNERS[face[i]])))
            .collect();

        let tex_coords = FACES
            .iter()
            .flat_map(|_| FACE_TEX_COORDS.iter().map(|&uv| VertexUv::new(uv)))
            .collect();

        Self {
            positions,
            tex_coords,
        }
    }

    pub fn vertex_count(&self) -> u32 {
        self.positions.len() as u32
    }
}

impl Default for CubeMesh {
    fn default() -> Self {
        Self::new()
    }
}

/// Cube vertex data resident on the GPU.
pub struct GeometryBuffers<B> {
    positions: B,
    tex_coords: B,
    vertex_count: u32,
}

impl<B> GeometryBuffers<B> {
    /// Upload the cube once.
    pub fn build<D: GraphicsDevice<Buffer = B>>(device: &mut D) -> Self {
        let mesh = CubeMesh::new();
        debug_assert_eq!(mesh.positions.len(), mesh.tex_coords.len());

        let positions = device.create_vertex_buffer("cube positions", &mesh.positions);
        let tex_coords = device.create_vertex_buffer("cube tex coords", &mesh.tex_coords);
        debug!(vertices = mesh.vertex_count(), "uploaded cube geometry");

        Self {
            positions,
            tex_coords,
            vertex_count: mesh.vertex_count(),
        }
    }

    pub fn positions(&self) -> &B {
        &self.positions
    }

    pub fn tex_coords(&self) -> &B {
        &self.tex_coords
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn test_counts_match() {
        let mesh = CubeMesh::new();
        assert_eq!(mesh.positions.len(), 36);
        assert_eq!(mesh.tex_coords.len(), 36);
        assert_eq!(mesh.vertex_count(), CUBE_VERTEX_COUNT);
    }

    #[test]
    fn test_triangles_wind_clockwise_from_outside() {
        let mesh = CubeMesh::new();
        for triangle in mesh.positions.chunks(3) {
            let [a, b, c] = [0, 1, 2].map(|i| Vec3::from(triangle[i].position));
            let normal = (b - a).cross(c - a);
            let centroid = (a + b + c) / 3.0;
            // Clockwise from outside means the right-handed normal points inward.
            assert!(normal.dot(centroid) < 0.0, "triangle {a} {b} {c}");
        }
    }

    #[test]
    fn test_every_face_covers_one_side() {
        let mesh = CubeMesh::new();
        let mut normals: Vec<Vec3> = mesh
            .positions
            .chunks(6)
            .map(|face| {
                let sum: Vec3 = face.iter().map(|v| Vec3::from(v.position)).sum();
                (sum / 6.0).round()
            })
            .collect();
        normals.sort_by(|a, b| a.to_array().partial_cmp(&b.to_array()).unwrap());
        normals.dedup();
        assert_eq!(normals.len(), 6);
        for n in normals {
            assert_eq!(n.abs().element_sum(), 1.0);
        }
    }

    #[test]
    fn test_tex_coords_repeat_per_face() {
        let mesh = CubeMesh::new();
        for face in mesh.tex_coords.chunks(6) {
            let uvs: Vec<[f32; 2]> = face.iter().map(|v| v.uv).collect();
            assert_eq!(uvs, FACE_TEX_COORDS);
        }
    }

    #[test]
    fn test_uv_origin_is_top_left_of_face() {
        let mesh = CubeMesh::new();
        // +z face: uv (0, 0) sits at the top-left corner seen from +z.
        assert_eq!(mesh.positions[0].position, [-1.0, 1.0, 1.0]);
        assert_eq!(mesh.tex_coords[0].uv, [0.0, 0.0]);
    }
}
