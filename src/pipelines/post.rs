//! Bloom post-process chain: bright-pass, separable blur, composite.
//!
//! All three are fullscreen-triangle passes (the triangle is generated
//! from the vertex index, no vertex buffer). The bright pass isolates
//! pixels above a luminance threshold into the bright target; the blur
//! ping-pongs that target against a scratch target, one axis per draw;
//! the composite adds the blurred result onto the HDR colour and maps it
//! into display range with exposure scaling and gamma correction.

use crate::pipelines::{mk_render_pipeline, uniform_layout};
use crate::settings::Settings;
use crate::texture::Texture;

/// Mirrors `BrightParams` in `bright.wgsl`.
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct BrightUniform {
    pub threshold: f32,
    _padding: [f32; 3],
}

impl BrightUniform {
    pub fn new(settings: &Settings) -> Self {
        Self {
            threshold: settings.bloom_threshold,
            _padding: [0.0; 3],
        }
    }
}

/// Mirrors `BlurParams` in `blur.wgsl`.
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct BlurUniform {
    pub horizontal: u32,
    _padding: [u32; 3],
}

impl BlurUniform {
    pub fn new(axis: BlurAxis) -> Self {
        Self {
            horizontal: matches!(axis, BlurAxis::Horizontal) as u32,
            _padding: [0; 3],
        }
    }
}

/// Mirrors `CompositeParams` in `composite.wgsl`.
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CompositeUniform {
    pub exposure: f32,
    pub gamma: f32,
    _padding: [f32; 2],
}

impl CompositeUniform {
    pub fn new(settings: &Settings) -> Self {
        Self {
            exposure: settings.exposure,
            gamma: settings.gamma,
            _padding: [0.0; 2],
        }
    }
}

/// One single-axis blur draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlurAxis {
    Horizontal,
    Vertical,
}

/// The per-frame blur pass list. Bloom off means no blur draws at all;
/// bloom on yields `iterations` horizontal/vertical pairs, horizontal
/// first, converging toward a Gaussian over `2 * iterations` draws.
pub fn blur_schedule(bloom_enabled: bool, iterations: u32) -> Vec<BlurAxis> {
    if !bloom_enabled {
        return Vec::new();
    }
    (0..iterations)
        .flat_map(|_| [BlurAxis::Horizontal, BlurAxis::Vertical])
        .collect()
}

/// CPU reference for the composite pass's tone-mapping law, kept in sync
/// with `composite.wgsl`: exposure first, then gamma. Black maps to black
/// for every exposure and any positive gamma.
pub fn tonemap(hdr: [f32; 3], exposure: f32, gamma: f32) -> [f32; 3] {
    hdr.map(|channel| (1.0 - (-channel * exposure).exp()).powf(1.0 / gamma))
}

/// Layout for passes sampling one offscreen colour attachment.
pub fn sampled_input_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[
            wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    multisampled: false,
                    view_dimension: wgpu::TextureViewDimension::D2,
                    sample_type: wgpu::TextureSampleType::Float { filterable: true },
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 1,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                count: None,
            },
        ],
        label: Some("post_input_layout"),
    })
}

/// Layout for the composite pass: HDR colour plus the bloom contribution.
pub fn composite_input_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[
            wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    multisampled: false,
                    view_dimension: wgpu::TextureViewDimension::D2,
                    sample_type: wgpu::TextureSampleType::Float { filterable: true },
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 1,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    multisampled: false,
                    view_dimension: wgpu::TextureViewDimension::D2,
                    sample_type: wgpu::TextureSampleType::Float { filterable: true },
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 2,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                count: None,
            },
        ],
        label: Some("composite_input_layout"),
    })
}

pub fn mk_bright_pipeline(
    device: &wgpu::Device,
    input_layout: &wgpu::BindGroupLayout,
    params_layout: &wgpu::BindGroupLayout,
) -> wgpu::RenderPipeline {
    mk_fullscreen_pipeline(
        device,
        input_layout,
        params_layout,
        Texture::HDR_FORMAT,
        wgpu::ShaderModuleDescriptor {
            label: Some("bright shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("bright.wgsl").into()),
        },
        "bright pipeline",
    )
}

pub fn mk_blur_pipeline(
    device: &wgpu::Device,
    input_layout: &wgpu::BindGroupLayout,
    params_layout: &wgpu::BindGroupLayout,
) -> wgpu::RenderPipeline {
    mk_fullscreen_pipeline(
        device,
        input_layout,
        params_layout,
        Texture::HDR_FORMAT,
        wgpu::ShaderModuleDescriptor {
            label: Some("blur shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("blur.wgsl").into()),
        },
        "blur pipeline",
    )
}

pub fn mk_composite_pipeline(
    device: &wgpu::Device,
    input_layout: &wgpu::BindGroupLayout,
    params_layout: &wgpu::BindGroupLayout,
    surface_format: wgpu::TextureFormat,
) -> wgpu::RenderPipeline {
    mk_fullscreen_pipeline(
        device,
        input_layout,
        params_layout,
        surface_format,
        wgpu::ShaderModuleDescriptor {
            label: Some("composite shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("composite.wgsl").into()),
        },
        "composite pipeline",
    )
}

fn mk_fullscreen_pipeline(
    device: &wgpu::Device,
    input_layout: &wgpu::BindGroupLayout,
    params_layout: &wgpu::BindGroupLayout,
    color_format: wgpu::TextureFormat,
    shader: wgpu::ShaderModuleDescriptor,
    label: &str,
) -> wgpu::RenderPipeline {
    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some(label),
        bind_group_layouts: &[input_layout, params_layout],
        push_constant_ranges: &[],
    });
    mk_render_pipeline(
        device,
        &layout,
        color_format,
        Some(wgpu::BlendState {
            alpha: wgpu::BlendComponent::REPLACE,
            color: wgpu::BlendComponent::REPLACE,
        }),
        None,
        &[],
        shader,
        label,
    )
}

/// Convenience for the shared single-uniform layout of the post passes.
pub fn post_params_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    uniform_layout(device, "post_params_layout")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bloom_disabled_schedules_no_blur_draws() {
        assert!(blur_schedule(false, 4).is_empty());
        assert!(blur_schedule(false, 100).is_empty());
    }

    #[test]
    fn four_iterations_schedule_eight_alternating_draws() {
        let schedule = blur_schedule(true, 4);
        assert_eq!(schedule.len(), 8);
        for (i, axis) in schedule.iter().enumerate() {
            let expected = if i % 2 == 0 {
                BlurAxis::Horizontal
            } else {
                BlurAxis::Vertical
            };
            assert_eq!(*axis, expected, "pass {i}");
        }
    }

    #[test]
    fn schedule_length_tracks_iteration_count() {
        for iterations in 1..=10 {
            assert_eq!(blur_schedule(true, iterations).len(), 2 * iterations as usize);
        }
    }

    #[test]
    fn black_stays_black_for_any_exposure_and_gamma() {
        for exposure in [0.0, 0.5, 1.0, 4.0] {
            for gamma in [0.1, 1.0, 2.2, 4.0] {
                assert_eq!(tonemap([0.0; 3], exposure, gamma), [0.0; 3]);
            }
        }
    }

    #[test]
    fn tonemap_is_monotone_and_bounded() {
        let mut last = 0.0;
        for step in 0..50 {
            let input = step as f32 * 0.5;
            let [value, _, _] = tonemap([input; 3], 1.0, 2.2);
            assert!(value >= last, "not monotone at {input}");
            assert!((0.0..=1.0).contains(&value));
            last = value;
        }
    }

    #[test]
    fn exposure_brightens_mid_range_input() {
        let low = tonemap([1.0; 3], 0.5, 2.2)[0];
        let high = tonemap([1.0; 3], 2.0, 2.2)[0];
        assert!(high > low);
    }
}
