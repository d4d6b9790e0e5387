//! Scene pipeline pair: normal/parallax-mapped and flat-shaded variants.
//!
//! Both variants share bind groups and vertex layout so a placed model
//! can switch between them without touching its resources:
//! group 0 = material textures, group 1 = camera, group 2 = lights +
//! material constants, group 3 = per-object transform.

use crate::pipelines::mk_render_pipeline;
use crate::scene::light::{LightsUniform, PointLight, LIGHT_COUNT};
use crate::scene::material::texture_group_layout;
use crate::scene::quad::Vertex;
use crate::settings::Settings;
use crate::texture::Texture;

/// Lights plus the overlay-tunable material constants, written once per
/// frame. Mirrors `SceneParams` in `scene.wgsl`/`scene_flat.wgsl`.
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SceneParamsUniform {
    lights: LightsUniform,
    shininess: f32,
    height_scale: f32,
    _padding: [f32; 2],
}

impl SceneParamsUniform {
    pub fn new(lights: &[PointLight; LIGHT_COUNT], settings: &Settings) -> Self {
        Self {
            lights: LightsUniform::new(lights),
            shininess: settings.shininess,
            height_scale: settings.height_scale,
            _padding: [0.0; 2],
        }
    }
}

pub fn scene_params_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    crate::pipelines::uniform_layout(device, "scene_params_layout")
}

/// Build the normal-mapped scene pipeline.
pub fn mk_scene_pipeline(
    device: &wgpu::Device,
    camera_bind_group_layout: &wgpu::BindGroupLayout,
    params_bind_group_layout: &wgpu::BindGroupLayout,
    transform_bind_group_layout: &wgpu::BindGroupLayout,
) -> wgpu::RenderPipeline {
    mk_scene_variant(
        device,
        camera_bind_group_layout,
        params_bind_group_layout,
        transform_bind_group_layout,
        wgpu::ShaderModuleDescriptor {
            label: Some("scene shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("scene.wgsl").into()),
        },
        "scene pipeline",
    )
}

/// Build the flat-shaded variant (vertex normals, no parallax) used by
/// models that carry no normal map.
pub fn mk_scene_flat_pipeline(
    device: &wgpu::Device,
    camera_bind_group_layout: &wgpu::BindGroupLayout,
    params_bind_group_layout: &wgpu::BindGroupLayout,
    transform_bind_group_layout: &wgpu::BindGroupLayout,
) -> wgpu::RenderPipeline {
    mk_scene_variant(
        device,
        camera_bind_group_layout,
        params_bind_group_layout,
        transform_bind_group_layout,
        wgpu::ShaderModuleDescriptor {
            label: Some("scene flat shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("scene_flat.wgsl").into()),
        },
        "scene flat pipeline",
    )
}

fn mk_scene_variant(
    device: &wgpu::Device,
    camera_bind_group_layout: &wgpu::BindGroupLayout,
    params_bind_group_layout: &wgpu::BindGroupLayout,
    transform_bind_group_layout: &wgpu::BindGroupLayout,
    shader: wgpu::ShaderModuleDescriptor,
    label: &str,
) -> wgpu::RenderPipeline {
    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("scene pipeline layout"),
        bind_group_layouts: &[
            &texture_group_layout(device),
            camera_bind_group_layout,
            params_bind_group_layout,
            transform_bind_group_layout,
        ],
        push_constant_ranges: &[],
    });

    mk_render_pipeline(
        device,
        &layout,
        Texture::HDR_FORMAT,
        Some(wgpu::BlendState {
            alpha: wgpu::BlendComponent::REPLACE,
            color: wgpu::BlendComponent::REPLACE,
        }),
        Some(Texture::DEPTH_FORMAT),
        &[Vertex::desc()],
        shader,
        label,
    )
}
