//! Planar quad construction with flat per-face normal and tangent.
//!
//! A quad is described by four ordered corner points (bottom-left,
//! bottom-right, top-right, top-left, coplanar and consistently wound) and
//! a texel-density divisor. Construction is pure vertex math with no GPU
//! side effects; uploading the result is the scene's job.

use cgmath::{InnerSpace, Point3, Vector3};

/// One vertex as the scene shaders consume it.
///
/// Normal and tangent are flat per quad: derived once from the corner
/// points and shared by all six vertices of the two triangles. The
/// bitangent is reconstructed in the shader as `cross(normal, tangent)`.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub tex_coords: [f32; 2],
    pub tangent: [f32; 3],
}

impl Vertex {
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        use std::mem;
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 6]>() as wgpu::BufferAddress,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 8]>() as wgpu::BufferAddress,
                    shader_location: 3,
                    format: wgpu::VertexFormat::Float32x3,
                },
            ],
        }
    }
}

/// Which of the three hallway texture groups a quad samples from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    Floor,
    Wall,
    Ceiling,
}

/// An immutable planar quad: corners, derived vertices and a surface tag.
#[derive(Debug, Clone)]
pub struct Quad {
    pub corners: [Point3<f32>; 4],
    pub vertices: [Vertex; 6],
    pub surface: Surface,
}

impl Quad {
    pub fn new(corners: [Point3<f32>; 4], texel_size: f32, surface: Surface) -> Self {
        Self {
            corners,
            vertices: quad_vertices(corners, texel_size),
            surface,
        }
    }
}

/// Build the six vertices (triangles `0,1,2` and `2,3,0`) of a quad.
///
/// UVs run from `(0, 0)` at corner 0 to `(|c0c1|, |c1c2|) / texel_size` at
/// the opposite corners, so tiling frequency depends only on world-space
/// size, never on how large the quad is. The normal is the normalized
/// cross product of the two edges leaving corner 0; with the winding above
/// it points toward the side from which the corners read counter-clockwise.
/// The tangent comes from the UV-gradient solve over the first triangle;
/// since UVs are axis-aligned it lands on the corner 0 → corner 1 edge.
///
/// Degenerate (zero-area) or non-coplanar corners produce undefined
/// normals/tangents; the caller guarantees valid geometry.
pub fn quad_vertices(corners: [Point3<f32>; 4], texel_size: f32) -> [Vertex; 6] {
    let u_max = (corners[1] - corners[0]).magnitude() / texel_size;
    let v_max = (corners[2] - corners[1]).magnitude() / texel_size;
    let uvs = [[0.0, 0.0], [u_max, 0.0], [u_max, v_max], [0.0, v_max]];

    let edge_u = corners[1] - corners[0];
    let edge_v = corners[3] - corners[0];
    let normal = edge_u.cross(edge_v).normalize();

    let tangent = face_tangent(
        [corners[0], corners[1], corners[2]],
        [uvs[0].into(), uvs[1].into(), uvs[2].into()],
    );

    let vertex = |i: usize| Vertex {
        position: corners[i].into(),
        normal: normal.into(),
        tex_coords: uvs[i],
        tangent: tangent.into(),
    };
    [vertex(0), vertex(1), vertex(2), vertex(2), vertex(3), vertex(0)]
}

/// Solve for the U-axis tangent of one triangle from its positions and UVs.
///
/// ```text
/// delta_pos1 = delta_uv1.x * T + delta_uv1.y * B
/// delta_pos2 = delta_uv2.x * T + delta_uv2.y * B
/// ```
pub(crate) fn face_tangent(
    positions: [Point3<f32>; 3],
    uvs: [cgmath::Vector2<f32>; 3],
) -> Vector3<f32> {
    let delta_pos1 = positions[1] - positions[0];
    let delta_pos2 = positions[2] - positions[0];
    let delta_uv1 = uvs[1] - uvs[0];
    let delta_uv2 = uvs[2] - uvs[0];

    let r = 1.0 / (delta_uv1.x * delta_uv2.y - delta_uv1.y * delta_uv2.x);
    ((delta_pos1 * delta_uv2.y - delta_pos2 * delta_uv1.y) * r).normalize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{Point3, Vector3};

    fn floor_corners(w: f32, l: f32) -> [Point3<f32>; 4] {
        [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(w, 0.0, 0.0),
            Point3::new(w, 0.0, -l),
            Point3::new(0.0, 0.0, -l),
        ]
    }

    fn triangle_normal(a: [f32; 3], b: [f32; 3], c: [f32; 3]) -> Vector3<f32> {
        let a = Vector3::from(a);
        let b = Vector3::from(b);
        let c = Vector3::from(c);
        (b - a).cross(c - a)
    }

    #[test]
    fn both_triangles_share_a_parallel_nonzero_normal() {
        let v = quad_vertices(floor_corners(5.0, 10.0), 3.0);
        let n1 = triangle_normal(v[0].position, v[1].position, v[2].position);
        let n2 = triangle_normal(v[3].position, v[4].position, v[5].position);
        assert!(n1.magnitude() > 0.0);
        assert!(n2.magnitude() > 0.0);
        let cosine = n1.normalize().dot(n2.normalize());
        assert!((cosine - 1.0).abs() < 1e-6, "normals not parallel: {cosine}");
        // Flat shading: every vertex carries the same derived normal.
        for vertex in &v {
            assert_eq!(vertex.normal, [0.0, 1.0, 0.0]);
        }
    }

    #[test]
    fn uv_tiling_scales_with_edge_length_over_divisor() {
        let v = quad_vertices(floor_corners(5.0, 10.0), 3.0);
        assert_eq!(v[0].tex_coords, [0.0, 0.0]);
        assert_eq!(v[1].tex_coords, [5.0 / 3.0, 0.0]);
        assert_eq!(v[2].tex_coords, [5.0 / 3.0, 10.0 / 3.0]);
        assert_eq!(v[4].tex_coords, [0.0, 10.0 / 3.0]);
    }

    #[test]
    fn tangent_follows_the_u_axis() {
        let v = quad_vertices(floor_corners(5.0, 10.0), 3.0);
        // Corner 0 to corner 1 runs along +x, so the tangent must too.
        for vertex in &v {
            let t = Vector3::from(vertex.tangent);
            assert!((t - Vector3::unit_x()).magnitude() < 1e-5);
        }
    }

    #[test]
    fn triangles_cover_all_four_corners() {
        let v = quad_vertices(floor_corners(2.0, 2.0), 1.0);
        assert_eq!(v[0].position, [0.0, 0.0, 0.0]);
        assert_eq!(v[1].position, [2.0, 0.0, 0.0]);
        assert_eq!(v[2].position, v[3].position);
        assert_eq!(v[5].position, v[0].position);
        assert_eq!(v[4].position, [0.0, 0.0, -2.0]);
    }
}
