//! Texture groups and their bind groups.
//!
//! A [`TextureGroup`] is the unit of material addressing: up to five image
//! slots bound together. Only diffuse is required. Missing slots resolve
//! to fallbacks at bind-group creation time so a single shader interface
//! covers every material: specular reuses diffuse, normal falls back to
//! the flat neutral map, height and emission fall back to black.

use crate::texture::Texture;

/// Up to five image slots addressed as one unit.
#[derive(Debug)]
pub struct TextureGroup {
    pub diffuse: Texture,
    pub normal: Option<Texture>,
    pub specular: Option<Texture>,
    pub height: Option<Texture>,
    pub emission: Option<Texture>,
}

impl TextureGroup {
    /// A group with just a diffuse map; every other slot uses its fallback.
    pub fn diffuse_only(diffuse: Texture) -> Self {
        Self {
            diffuse,
            normal: None,
            specular: None,
            height: None,
            emission: None,
        }
    }

    /// Whether the group carries a real normal map (used to pick the
    /// normal-mapped or flat-shaded pipeline variant for models).
    pub fn has_normal_map(&self) -> bool {
        self.normal.is_some()
    }
}

/// Shared fallback maps for unset slots, created once per device.
#[derive(Debug)]
pub struct FallbackMaps {
    pub normal: Texture,
    pub black: Texture,
}

impl FallbackMaps {
    pub fn new(device: &wgpu::Device, queue: &wgpu::Queue) -> Self {
        Self {
            normal: Texture::create_default_normal_map(device, queue),
            black: Texture::create_solid(device, queue, [0, 0, 0, 255], "black fallback"),
        }
    }
}

/// Bind-group layout shared by every material: five textures and one
/// repeat-addressing sampler.
pub fn texture_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    let texture_entry = |binding| wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Texture {
            multisampled: false,
            view_dimension: wgpu::TextureViewDimension::D2,
            sample_type: wgpu::TextureSampleType::Float { filterable: true },
        },
        count: None,
    };
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[
            texture_entry(0), // diffuse
            texture_entry(1), // normal
            texture_entry(2), // specular
            texture_entry(3), // height
            texture_entry(4), // emission
            wgpu::BindGroupLayoutEntry {
                binding: 5,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                count: None,
            },
        ],
        label: Some("texture_group_layout"),
    })
}

/// A texture group resolved against fallbacks and baked into a bind group.
#[derive(Debug)]
pub struct Material {
    pub name: String,
    pub normal_mapped: bool,
    pub bind_group: wgpu::BindGroup,
}

impl Material {
    pub fn new(
        device: &wgpu::Device,
        name: &str,
        group: &TextureGroup,
        fallbacks: &FallbackMaps,
        layout: &wgpu::BindGroupLayout,
    ) -> Self {
        let normal = group.normal.as_ref().unwrap_or(&fallbacks.normal);
        // An absent specular slot reuses the diffuse image.
        let specular = group.specular.as_ref().unwrap_or(&group.diffuse);
        let height = group.height.as_ref().unwrap_or(&fallbacks.black);
        let emission = group.emission.as_ref().unwrap_or(&fallbacks.black);

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&group.diffuse.view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&normal.view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::TextureView(&specular.view),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: wgpu::BindingResource::TextureView(&height.view),
                },
                wgpu::BindGroupEntry {
                    binding: 4,
                    resource: wgpu::BindingResource::TextureView(&emission.view),
                },
                wgpu::BindGroupEntry {
                    binding: 5,
                    resource: wgpu::BindingResource::Sampler(&group.diffuse.sampler),
                },
            ],
            label: Some(name),
        });

        Self {
            name: name.to_string(),
            normal_mapped: group.has_normal_map(),
            bind_group,
        }
    }
}
