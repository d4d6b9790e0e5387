//! GPU-backed checks for offscreen target resizing. These need a real
//! adapter, so they only run with `--features integration-tests`.

#![cfg(feature = "integration-tests")]

use futures::executor::block_on;
use hallway::target::OffscreenTarget;
use hallway::texture::Texture;

fn request_device() -> (wgpu::Device, wgpu::Queue) {
    block_on(async {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
            .expect("no adapter available");
        adapter
            .request_device(&wgpu::DeviceDescriptor::default())
            .await
            .expect("no device available")
    })
}

#[test]
fn resize_restores_attachment_dimensions() {
    let (device, _queue) = request_device();
    let mut target = OffscreenTarget::new(&device, 800, 600, Texture::HDR_FORMAT, true, "t");

    assert!(target.update_size(&device, 1024, 768));
    assert_eq!((target.width(), target.height()), (1024, 768));
    assert_eq!(target.color.texture.width(), 1024);
    assert_eq!(target.color.texture.height(), 768);

    assert!(target.update_size(&device, 800, 600));
    assert_eq!((target.width(), target.height()), (800, 600));
    assert_eq!(target.color.texture.width(), 800);
    let depth = target.depth.as_ref().expect("depth attachment requested");
    assert_eq!(depth.texture.width(), 800);
    assert_eq!(depth.texture.height(), 600);
}

#[test]
fn same_size_update_is_a_noop() {
    let (device, _queue) = request_device();
    let mut target = OffscreenTarget::new(&device, 640, 480, Texture::HDR_FORMAT, false, "t");
    assert!(!target.update_size(&device, 640, 480));
    assert_eq!((target.width(), target.height()), (640, 480));
}

#[test]
fn degenerate_request_clamps_to_one() {
    let (device, _queue) = request_device();
    let mut target = OffscreenTarget::new(&device, 640, 480, Texture::HDR_FORMAT, false, "t");
    assert!(target.update_size(&device, 0, 480));
    assert_eq!((target.width(), target.height()), (1, 480));
}
