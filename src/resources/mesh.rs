//! Mesh extraction from parsed OBJ data.
//!
//! OBJ files carry no tangents, so they are reconstructed per triangle
//! from the UV gradients and averaged per vertex for normal mapping.

use wgpu::util::DeviceExt;

use crate::scene::model;
use crate::scene::quad::Vertex;

pub fn load_meshes(
    models: &[tobj::Model],
    file_name: &str,
    device: &wgpu::Device,
) -> Vec<model::Mesh> {
    models
        .iter()
        .map(|m| {
            let vertices = mesh_vertices(&m.mesh);

            let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{file_name} vertex buffer")),
                contents: bytemuck::cast_slice(&vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });
            let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{file_name} index buffer")),
                contents: bytemuck::cast_slice(&m.mesh.indices),
                usage: wgpu::BufferUsages::INDEX,
            });

            model::Mesh {
                name: file_name.to_string(),
                vertex_buffer,
                index_buffer,
                num_elements: m.mesh.indices.len() as u32,
                material: m.mesh.material_id.unwrap_or(0),
            }
        })
        .collect()
}

/// Build shader-ready vertices from a single-indexed tobj mesh.
///
/// Texture V is flipped to match the top-left image origin. Tangents are
/// accumulated over every triangle touching a vertex and averaged, so
/// smooth surfaces get a continuous tangent field.
pub fn mesh_vertices(mesh: &tobj::Mesh) -> Vec<Vertex> {
    let mut vertices = (0..mesh.positions.len() / 3)
        .map(|i| Vertex {
            position: [
                mesh.positions[i * 3],
                mesh.positions[i * 3 + 1],
                mesh.positions[i * 3 + 2],
            ],
            normal: [
                mesh.normals.get(i * 3).copied().unwrap_or(0.0),
                mesh.normals.get(i * 3 + 1).copied().unwrap_or(0.0),
                mesh.normals.get(i * 3 + 2).copied().unwrap_or(0.0),
            ],
            tex_coords: [
                mesh.texcoords.get(i * 2).copied().unwrap_or(0.0),
                1.0 - mesh.texcoords.get(i * 2 + 1).copied().unwrap_or(0.0),
            ],
            tangent: [0.0; 3],
        })
        .collect::<Vec<_>>();

    let mut triangles_included = vec![0u32; vertices.len()];
    for c in mesh.indices.chunks(3) {
        let v0 = vertices[c[0] as usize];
        let v1 = vertices[c[1] as usize];
        let v2 = vertices[c[2] as usize];

        let pos0: cgmath::Vector3<f32> = v0.position.into();
        let pos1: cgmath::Vector3<f32> = v1.position.into();
        let pos2: cgmath::Vector3<f32> = v2.position.into();

        let uv0: cgmath::Vector2<f32> = v0.tex_coords.into();
        let uv1: cgmath::Vector2<f32> = v1.tex_coords.into();
        let uv2: cgmath::Vector2<f32> = v2.tex_coords.into();

        let delta_pos1 = pos1 - pos0;
        let delta_pos2 = pos2 - pos0;
        let delta_uv1 = uv1 - uv0;
        let delta_uv2 = uv2 - uv0;

        //     delta_pos1 = delta_uv1.x * T + delta_uv1.y * B
        //     delta_pos2 = delta_uv2.x * T + delta_uv2.y * B
        let r = 1.0 / (delta_uv1.x * delta_uv2.y - delta_uv1.y * delta_uv2.x);
        let tangent = (delta_pos1 * delta_uv2.y - delta_pos2 * delta_uv1.y) * r;

        for index in c {
            let v = &mut vertices[*index as usize];
            v.tangent = (tangent + cgmath::Vector3::from(v.tangent)).into();
            triangles_included[*index as usize] += 1;
        }
    }

    for (i, n) in triangles_included.into_iter().enumerate() {
        if n > 0 {
            let v = &mut vertices[i];
            v.tangent = (cgmath::Vector3::from(v.tangent) / n as f32).into();
        }
    }

    vertices
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{InnerSpace, Vector3};

    fn unit_quad_mesh() -> tobj::Mesh {
        tobj::Mesh {
            positions: vec![
                0.0, 0.0, 0.0, //
                1.0, 0.0, 0.0, //
                1.0, 1.0, 0.0, //
                0.0, 1.0, 0.0,
            ],
            normals: vec![
                0.0, 0.0, 1.0, //
                0.0, 0.0, 1.0, //
                0.0, 0.0, 1.0, //
                0.0, 0.0, 1.0,
            ],
            texcoords: vec![
                0.0, 0.0, //
                1.0, 0.0, //
                1.0, 1.0, //
                0.0, 1.0,
            ],
            indices: vec![0, 1, 2, 2, 3, 0],
            ..Default::default()
        }
    }

    #[test]
    fn tangents_follow_the_u_axis_on_a_planar_quad() {
        let vertices = mesh_vertices(&unit_quad_mesh());
        assert_eq!(vertices.len(), 4);
        for v in &vertices {
            let t = Vector3::from(v.tangent).normalize();
            assert!(
                (t - Vector3::unit_x()).magnitude() < 1e-5,
                "tangent {:?} not along +x",
                v.tangent
            );
        }
    }

    #[test]
    fn texture_v_is_flipped() {
        let vertices = mesh_vertices(&unit_quad_mesh());
        assert_eq!(vertices[0].tex_coords, [0.0, 1.0]);
        assert_eq!(vertices[2].tex_coords, [1.0, 0.0]);
    }

    #[test]
    fn missing_texcoords_default_without_panicking() {
        let mesh = tobj::Mesh {
            positions: vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
            indices: vec![0, 1, 2],
            ..Default::default()
        };
        let vertices = mesh_vertices(&mesh);
        assert_eq!(vertices.len(), 3);
        assert_eq!(vertices[0].tex_coords, [0.0, 1.0]);
    }
}
