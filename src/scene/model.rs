//! Loaded 3D models: meshes, their materials, and draw helpers.

use crate::scene::material::Material;

/// One GPU-resident mesh with an index into its model's material list.
#[derive(Debug)]
pub struct Mesh {
    pub name: String,
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub num_elements: u32,
    pub material: usize,
}

/// A model is a set of meshes sharing a material list.
#[derive(Debug)]
pub struct Model {
    pub meshes: Vec<Mesh>,
    pub materials: Vec<Material>,
}

impl Model {
    /// True when every material carries a real normal map; such models run
    /// through the normal-mapped pipeline variant.
    pub fn normal_mapped(&self) -> bool {
        !self.materials.is_empty() && self.materials.iter().all(|m| m.normal_mapped)
    }
}

/// Draw helpers for indexed meshes. The caller has already set the
/// pipeline and the camera/scene/transform bind groups; these only bind
/// the material (group 0) and the geometry buffers.
pub trait DrawModel<'a> {
    fn draw_mesh(&mut self, mesh: &'a Mesh, material: &'a Material);
    fn draw_model(&mut self, model: &'a Model);
}

impl<'a, 'b> DrawModel<'b> for wgpu::RenderPass<'a>
where
    'b: 'a,
{
    fn draw_mesh(&mut self, mesh: &'b Mesh, material: &'b Material) {
        self.set_bind_group(0, &material.bind_group, &[]);
        self.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
        self.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        self.draw_indexed(0..mesh.num_elements, 0, 0..1);
    }

    fn draw_model(&mut self, model: &'b Model) {
        for mesh in &model.meshes {
            let material = &model.materials[mesh.material];
            self.draw_mesh(mesh, material);
        }
    }
}
