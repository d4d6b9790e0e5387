//! Offscreen render targets for the HDR and bloom passes.
//!
//! An [`OffscreenTarget`] owns a floating-point colour attachment and an
//! optional depth attachment, both always sized to the declared
//! width/height. "Binding" the target means beginning a render pass whose
//! attachments are this target's views; dropping the pass restores the
//! default. Resizing reallocates both attachments together and never
//! preserves contents — callers re-render after a resize.

use crate::texture::Texture;

#[derive(Debug)]
pub struct OffscreenTarget {
    label: String,
    width: u32,
    height: u32,
    format: wgpu::TextureFormat,
    pub color: Texture,
    pub depth: Option<Texture>,
}

impl OffscreenTarget {
    /// Create a target with an HDR colour attachment and, when requested,
    /// a matching depth attachment.
    pub fn new(
        device: &wgpu::Device,
        width: u32,
        height: u32,
        format: wgpu::TextureFormat,
        with_depth: bool,
        label: &str,
    ) -> Self {
        let (width, height) = clamp_size(width, height, label);
        let color = Texture::create_color_target(device, [width, height], format, label);
        let depth = with_depth
            .then(|| Texture::create_depth_texture(device, [width, height], label));
        Self {
            label: label.to_string(),
            width,
            height,
            format,
            color,
            depth,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Resize the attachments. No-op when the size is unchanged (returns
    /// `false`); otherwise colour and depth storage are reallocated
    /// together before the next pass (returns `true`). Prior contents are
    /// not preserved. Bind groups sampling the old colour view must be
    /// rebuilt by their owner.
    pub fn update_size(&mut self, device: &wgpu::Device, width: u32, height: u32) -> bool {
        let (width, height) = clamp_size(width, height, &self.label);
        if width == self.width && height == self.height {
            return false;
        }
        self.width = width;
        self.height = height;
        self.color =
            Texture::create_color_target(device, [width, height], self.format, &self.label);
        if self.depth.is_some() {
            self.depth = Some(Texture::create_depth_texture(
                device,
                [width, height],
                &self.label,
            ));
        }
        true
    }

    /// Begin a render pass targeting this target's attachments, clearing
    /// colour (and depth, when present) first.
    pub fn begin_pass<'e>(
        &self,
        encoder: &'e mut wgpu::CommandEncoder,
        clear_color: wgpu::Color,
    ) -> wgpu::RenderPass<'e> {
        encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some(&self.label),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &self.color.view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(clear_color),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: self.depth.as_ref().map(|depth| {
                wgpu::RenderPassDepthStencilAttachment {
                    view: &depth.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }
            }),
            occlusion_query_set: None,
            timestamp_writes: None,
        })
    }
}

/// A zero-sized attachment is an incomplete target. Keep running with a
/// 1x1 attachment and log it; the output is visibly broken but the frame
/// loop survives (minimized windows report zero-size surfaces).
fn clamp_size(width: u32, height: u32, label: &str) -> (u32, u32) {
    if width == 0 || height == 0 {
        log::error!("offscreen target '{label}' requested with degenerate size {width}x{height}");
    }
    (width.max(1), height.max(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn degenerate_sizes_are_clamped_to_one() {
        assert_eq!(clamp_size(0, 600, "t"), (1, 600));
        assert_eq!(clamp_size(800, 0, "t"), (800, 1));
        assert_eq!(clamp_size(800, 600, "t"), (800, 600));
    }
}
