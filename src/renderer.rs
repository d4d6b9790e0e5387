//! Frame orchestration: scene pass, bloom chain, composite.
//!
//! The renderer owns every pipeline, offscreen target and post-process
//! uniform, and drives the fixed per-frame order: scene into the HDR
//! target, bright extraction, ping-pong blur, composite to the surface.
//! With bloom off the bright target is only cleared, so the composite
//! shader never needs a separate no-bloom path.

use bytemuck::Zeroable;
use wgpu::util::DeviceExt;

use crate::context::Context;
use crate::pipelines::post::{
    blur_schedule, composite_input_layout, mk_blur_pipeline, mk_bright_pipeline,
    mk_composite_pipeline, post_params_layout, sampled_input_layout, BlurAxis, BlurUniform,
    BrightUniform, CompositeUniform,
};
use crate::pipelines::scene::{
    mk_scene_flat_pipeline, mk_scene_pipeline, scene_params_layout, SceneParamsUniform,
};
use crate::pipelines::Pipelines;
use crate::scene::model::DrawModel;
use crate::scene::{transform_layout, Scene};
use crate::settings::Settings;
use crate::target::OffscreenTarget;
use crate::texture::Texture;

/// Draw counts for one frame, surfaced to the overlay and to tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub scene_draws: u32,
    pub bright_draws: u32,
    pub blur_draws: u32,
}

#[derive(Debug)]
pub struct Renderer {
    pipelines: Pipelines,

    hdr: OffscreenTarget,
    bright: OffscreenTarget,
    blur: OffscreenTarget,

    scene_params_buffer: wgpu::Buffer,
    scene_params_bind_group: wgpu::BindGroup,
    bright_params_buffer: wgpu::Buffer,
    bright_params_bind_group: wgpu::BindGroup,
    composite_params_buffer: wgpu::Buffer,
    composite_params_bind_group: wgpu::BindGroup,
    // One static uniform per blur axis, so no buffer is rewritten between
    // draws of a single encoder.
    blur_horizontal_bind_group: wgpu::BindGroup,
    blur_vertical_bind_group: wgpu::BindGroup,

    input_layout: wgpu::BindGroupLayout,
    composite_layout: wgpu::BindGroupLayout,
    hdr_input_bind_group: wgpu::BindGroup,
    bright_input_bind_group: wgpu::BindGroup,
    blur_input_bind_group: wgpu::BindGroup,
    composite_input_bind_group: wgpu::BindGroup,

    pub transform_layout: wgpu::BindGroupLayout,
}

impl Renderer {
    pub fn new(
        device: &wgpu::Device,
        config: &wgpu::SurfaceConfiguration,
        camera_layout: &wgpu::BindGroupLayout,
    ) -> Self {
        let params_layout = scene_params_layout(device);
        let transform_layout = transform_layout(device);
        let input_layout = sampled_input_layout(device);
        let composite_layout = composite_input_layout(device);
        let post_params = post_params_layout(device);

        let pipelines = Pipelines {
            scene: mk_scene_pipeline(device, camera_layout, &params_layout, &transform_layout),
            scene_flat: mk_scene_flat_pipeline(
                device,
                camera_layout,
                &params_layout,
                &transform_layout,
            ),
            bright: mk_bright_pipeline(device, &input_layout, &post_params),
            blur: mk_blur_pipeline(device, &input_layout, &post_params),
            composite: mk_composite_pipeline(device, &composite_layout, &post_params, config.format),
        };

        let hdr = OffscreenTarget::new(
            device,
            config.width,
            config.height,
            Texture::HDR_FORMAT,
            true,
            "hdr target",
        );
        let bright = OffscreenTarget::new(
            device,
            config.width,
            config.height,
            Texture::HDR_FORMAT,
            false,
            "bright target",
        );
        let blur = OffscreenTarget::new(
            device,
            config.width,
            config.height,
            Texture::HDR_FORMAT,
            false,
            "blur target",
        );

        let mk_uniform = |label: &str, contents: &[u8], writable: bool| {
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents,
                usage: if writable {
                    wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST
                } else {
                    wgpu::BufferUsages::UNIFORM
                },
            })
        };
        let mk_bind = |label: &str, layout: &wgpu::BindGroupLayout, buffer: &wgpu::Buffer| {
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: buffer.as_entire_binding(),
                }],
                label: Some(label),
            })
        };

        let defaults = Settings::default();
        // Placeholder contents; every frame rewrites these before drawing.
        let scene_params_buffer = mk_uniform(
            "scene params buffer",
            bytemuck::bytes_of(&SceneParamsUniform::zeroed()),
            true,
        );
        let scene_params_bind_group =
            mk_bind("scene params bind group", &params_layout, &scene_params_buffer);

        let bright_params_buffer = mk_uniform(
            "bright params buffer",
            bytemuck::cast_slice(&[BrightUniform::new(&defaults)]),
            true,
        );
        let bright_params_bind_group =
            mk_bind("bright params bind group", &post_params, &bright_params_buffer);

        let composite_params_buffer = mk_uniform(
            "composite params buffer",
            bytemuck::cast_slice(&[CompositeUniform::new(&defaults)]),
            true,
        );
        let composite_params_bind_group = mk_bind(
            "composite params bind group",
            &post_params,
            &composite_params_buffer,
        );

        let blur_horizontal_buffer = mk_uniform(
            "blur horizontal buffer",
            bytemuck::cast_slice(&[BlurUniform::new(BlurAxis::Horizontal)]),
            false,
        );
        let blur_horizontal_bind_group = mk_bind(
            "blur horizontal bind group",
            &post_params,
            &blur_horizontal_buffer,
        );
        let blur_vertical_buffer = mk_uniform(
            "blur vertical buffer",
            bytemuck::cast_slice(&[BlurUniform::new(BlurAxis::Vertical)]),
            false,
        );
        let blur_vertical_bind_group =
            mk_bind("blur vertical bind group", &post_params, &blur_vertical_buffer);

        let (hdr_input_bind_group, bright_input_bind_group, blur_input_bind_group, composite_input_bind_group) =
            mk_input_bind_groups(device, &input_layout, &composite_layout, &hdr, &bright, &blur);

        Self {
            pipelines,
            hdr,
            bright,
            blur,
            scene_params_buffer,
            scene_params_bind_group,
            bright_params_buffer,
            bright_params_bind_group,
            composite_params_buffer,
            composite_params_bind_group,
            blur_horizontal_bind_group,
            blur_vertical_bind_group,
            input_layout,
            composite_layout,
            hdr_input_bind_group,
            bright_input_bind_group,
            blur_input_bind_group,
            composite_input_bind_group,
            transform_layout,
        }
    }

    /// Track the surface size. Bind groups sampling the old attachments are
    /// rebuilt only when a target actually reallocated.
    fn resize_targets(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        let resized = self.hdr.update_size(device, width, height)
            | self.bright.update_size(device, width, height)
            | self.blur.update_size(device, width, height);
        if resized {
            let (hdr_input, bright_input, blur_input, composite_input) = mk_input_bind_groups(
                device,
                &self.input_layout,
                &self.composite_layout,
                &self.hdr,
                &self.bright,
                &self.blur,
            );
            self.hdr_input_bind_group = hdr_input;
            self.bright_input_bind_group = bright_input;
            self.blur_input_bind_group = blur_input;
            self.composite_input_bind_group = composite_input;
        }
    }

    /// Render one frame: scene, bloom chain, composite, optional overlay.
    pub fn render(
        &mut self,
        ctx: &Context,
        scene: &Scene,
        settings: &Settings,
        mut overlay: Option<&mut (dyn FnMut(&mut wgpu::RenderPass, &FrameStats) + '_)>,
    ) -> Result<FrameStats, wgpu::SurfaceError> {
        self.resize_targets(&ctx.device, ctx.config.width, ctx.config.height);

        ctx.queue.write_buffer(
            &self.scene_params_buffer,
            0,
            bytemuck::cast_slice(&[SceneParamsUniform::new(&scene.lights, settings)]),
        );
        ctx.queue.write_buffer(
            &self.bright_params_buffer,
            0,
            bytemuck::cast_slice(&[BrightUniform::new(settings)]),
        );
        ctx.queue.write_buffer(
            &self.composite_params_buffer,
            0,
            bytemuck::cast_slice(&[CompositeUniform::new(settings)]),
        );

        let frame = ctx.surface.get_current_texture()?;
        let surface_view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("frame encoder"),
            });

        let mut stats = FrameStats::default();

        {
            let mut pass = self.hdr.begin_pass(&mut encoder, wgpu::Color::BLACK);
            pass.set_pipeline(&self.pipelines.scene);
            pass.set_bind_group(1, &ctx.camera.bind_group, &[]);
            pass.set_bind_group(2, &self.scene_params_bind_group, &[]);
            pass.set_bind_group(3, &scene.identity_bind_group, &[]);

            for quad in &scene.hallway {
                pass.set_bind_group(0, &scene.material_for(quad.surface).bind_group, &[]);
                pass.set_vertex_buffer(0, quad.vertex_buffer.slice(..));
                pass.draw(0..quad.num_vertices, 0..1);
                stats.scene_draws += 1;
            }

            for placed in &scene.models {
                let pipeline = if placed.normal_mapped {
                    &self.pipelines.scene
                } else {
                    &self.pipelines.scene_flat
                };
                pass.set_pipeline(pipeline);
                pass.set_bind_group(3, &placed.transform_bind_group, &[]);
                pass.draw_model(&placed.model);
                stats.scene_draws += placed.model.meshes.len() as u32;
            }
        }

        let schedule = blur_schedule(settings.bloom, settings.blur_iterations);
        if settings.bloom {
            let mut pass = self.bright.begin_pass(&mut encoder, wgpu::Color::BLACK);
            pass.set_pipeline(&self.pipelines.bright);
            pass.set_bind_group(0, &self.hdr_input_bind_group, &[]);
            pass.set_bind_group(1, &self.bright_params_bind_group, &[]);
            pass.draw(0..3, 0..1);
            stats.bright_draws += 1;
        } else {
            // Clear only; the composite still samples this target.
            drop(self.bright.begin_pass(&mut encoder, wgpu::Color::BLACK));
        }

        for axis in schedule {
            let (target, input, params) = match axis {
                BlurAxis::Horizontal => (
                    &self.blur,
                    &self.bright_input_bind_group,
                    &self.blur_horizontal_bind_group,
                ),
                BlurAxis::Vertical => (
                    &self.bright,
                    &self.blur_input_bind_group,
                    &self.blur_vertical_bind_group,
                ),
            };
            let mut pass = target.begin_pass(&mut encoder, wgpu::Color::BLACK);
            pass.set_pipeline(&self.pipelines.blur);
            pass.set_bind_group(0, input, &[]);
            pass.set_bind_group(1, params, &[]);
            pass.draw(0..3, 0..1);
            stats.blur_draws += 1;
        }

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("composite pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &surface_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });
            pass.set_pipeline(&self.pipelines.composite);
            pass.set_bind_group(0, &self.composite_input_bind_group, &[]);
            pass.set_bind_group(1, &self.composite_params_bind_group, &[]);
            pass.draw(0..3, 0..1);

            if let Some(draw_overlay) = overlay.take() {
                draw_overlay(&mut pass, &stats);
            }
        }

        ctx.queue.submit(std::iter::once(encoder.finish()));
        frame.present();

        Ok(stats)
    }
}

fn mk_input_bind_groups(
    device: &wgpu::Device,
    input_layout: &wgpu::BindGroupLayout,
    composite_layout: &wgpu::BindGroupLayout,
    hdr: &OffscreenTarget,
    bright: &OffscreenTarget,
    blur: &OffscreenTarget,
) -> (wgpu::BindGroup, wgpu::BindGroup, wgpu::BindGroup, wgpu::BindGroup) {
    let sampled = |label: &str, source: &Texture| {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: input_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&source.view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&source.sampler),
                },
            ],
            label: Some(label),
        })
    };

    let composite = device.create_bind_group(&wgpu::BindGroupDescriptor {
        layout: composite_layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(&hdr.color.view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::TextureView(&bright.color.view),
            },
            wgpu::BindGroupEntry {
                binding: 2,
                resource: wgpu::BindingResource::Sampler(&hdr.color.sampler),
            },
        ],
        label: Some("composite input bind group"),
    });

    (
        sampled("hdr input bind group", &hdr.color),
        sampled("bright input bind group", &bright.color),
        sampled("blur input bind group", &blur.color),
        composite,
    )
}
