//! Scene data: quads, hallway layout, lights, materials and models.
//!
//! - `quad` builds planar quads (position/normal/UV/tangent vertices)
//! - `hallway` emits the six-quad box layout
//! - `light` holds the fixed two-light setup and its uniform packing
//! - `material` groups up to five texture slots into one bind group
//! - `model` holds loaded OBJ meshes and draw helpers

pub mod hallway;
pub mod light;
pub mod material;
pub mod model;
pub mod quad;

use cgmath::Matrix4;
use wgpu::util::DeviceExt;

use crate::scene::hallway::{generate_hallway, HallwayDims};
use crate::scene::light::{PointLight, LIGHT_COUNT};
use crate::scene::material::{FallbackMaps, Material, TextureGroup};
use crate::scene::model::Model;
use crate::scene::quad::{Quad, Surface};

/// One uploaded quad: a vertex buffer (no indices, six vertices) plus the
/// surface tag selecting its material.
#[derive(Debug)]
pub struct QuadMesh {
    pub vertex_buffer: wgpu::Buffer,
    pub num_vertices: u32,
    pub surface: Surface,
}

/// Upload CPU-side quads into per-quad vertex buffers.
pub fn upload_quads(device: &wgpu::Device, quads: &[Quad]) -> Vec<QuadMesh> {
    quads
        .iter()
        .map(|quad| QuadMesh {
            vertex_buffer: device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{:?} quad vertex buffer", quad.surface)),
                contents: bytemuck::cast_slice(&quad.vertices),
                usage: wgpu::BufferUsages::VERTEX,
            }),
            num_vertices: quad.vertices.len() as u32,
            surface: quad.surface,
        })
        .collect()
}

/// A static model placed in the hallway with a fixed transform.
#[derive(Debug)]
pub struct PlacedModel {
    pub model: Model,
    pub transform: Matrix4<f32>,
    /// Whether this model runs through the normal-mapped pipeline variant.
    pub normal_mapped: bool,
    pub transform_bind_group: wgpu::BindGroup,
}

/// Everything the renderer draws each frame: the uploaded hallway, placed
/// models, and the two point lights.
#[derive(Debug)]
pub struct Scene {
    pub hallway: Vec<QuadMesh>,
    pub models: Vec<PlacedModel>,
    pub lights: [PointLight; LIGHT_COUNT],
    floor: Material,
    wall: Material,
    ceiling: Material,
    /// Identity transform shared by all hallway quads.
    pub identity_bind_group: wgpu::BindGroup,
}

impl Scene {
    /// Build and upload the hallway, wrapping each surface kind with its
    /// texture group. The geometry is immutable from here on.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        device: &wgpu::Device,
        dims: HallwayDims,
        floor_group: &TextureGroup,
        wall_group: &TextureGroup,
        ceiling_group: &TextureGroup,
        fallbacks: &FallbackMaps,
        material_layout: &wgpu::BindGroupLayout,
        transform_layout: &wgpu::BindGroupLayout,
        lights: [PointLight; LIGHT_COUNT],
    ) -> Self {
        let quads = generate_hallway(dims);
        let hallway = upload_quads(device, &quads);

        let floor = Material::new(device, "floor", floor_group, fallbacks, material_layout);
        let wall = Material::new(device, "wall", wall_group, fallbacks, material_layout);
        let ceiling = Material::new(device, "ceiling", ceiling_group, fallbacks, material_layout);

        let identity_bind_group =
            mk_transform_bind_group(device, transform_layout, Matrix4::from_scale(1.0));

        Self {
            hallway,
            models: Vec::new(),
            lights,
            floor,
            wall,
            ceiling,
            identity_bind_group,
        }
    }

    pub fn material_for(&self, surface: Surface) -> &Material {
        match surface {
            Surface::Floor => &self.floor,
            Surface::Wall => &self.wall,
            Surface::Ceiling => &self.ceiling,
        }
    }

    /// Place a static model in the hallway.
    pub fn place_model(
        &mut self,
        device: &wgpu::Device,
        transform_layout: &wgpu::BindGroupLayout,
        model: Model,
        transform: Matrix4<f32>,
    ) {
        let normal_mapped = model.normal_mapped();
        let transform_bind_group = mk_transform_bind_group(device, transform_layout, transform);
        self.models.push(PlacedModel {
            model,
            transform,
            normal_mapped,
            transform_bind_group,
        });
    }
}

/// Per-object model matrix uniform. Transforms here are rigid (rotation +
/// translation), so the shader reuses the upper 3x3 for normals.
pub fn mk_transform_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    transform: Matrix4<f32>,
) -> wgpu::BindGroup {
    let matrix: [[f32; 4]; 4] = transform.into();
    let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("model transform buffer"),
        contents: bytemuck::cast_slice(&[matrix]),
        usage: wgpu::BufferUsages::UNIFORM,
    });
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: buffer.as_entire_binding(),
        }],
        label: Some("model transform bind group"),
    })
}

pub fn transform_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }],
        label: Some("transform_bind_group_layout"),
    })
}
