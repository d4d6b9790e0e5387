//! The Rust uniform structs and the WGSL struct declarations are a fixed
//! contract: a uniform buffer smaller than the shader-side struct fails
//! bind-group validation at draw time. These tests lay out each shader
//! struct with naga and compare against the mirrored `#[repr(C)]` struct.

use std::mem::size_of;

use naga::proc::Layouter;

use hallway::camera::CameraUniform;
use hallway::pipelines::post::{BlurUniform, BrightUniform, CompositeUniform};
use hallway::pipelines::scene::SceneParamsUniform;

const SCENE: &str = include_str!("../src/pipelines/scene.wgsl");
const SCENE_FLAT: &str = include_str!("../src/pipelines/scene_flat.wgsl");
const BRIGHT: &str = include_str!("../src/pipelines/bright.wgsl");
const BLUR: &str = include_str!("../src/pipelines/blur.wgsl");
const COMPOSITE: &str = include_str!("../src/pipelines/composite.wgsl");

fn wgsl_struct_size(source: &str, name: &str) -> usize {
    let module = naga::front::wgsl::parse_str(source).expect("shader parses");
    let mut layouter = Layouter::default();
    layouter.update(module.to_ctx()).expect("layout resolves");
    let (handle, _) = module
        .types
        .iter()
        .find(|(_, ty)| ty.name.as_deref() == Some(name))
        .unwrap_or_else(|| panic!("struct {name} not declared in shader"));
    layouter[handle].size as usize
}

#[test]
fn bright_params_match_the_cpu_struct() {
    assert_eq!(size_of::<BrightUniform>(), 16);
    assert_eq!(wgsl_struct_size(BRIGHT, "BrightParams"), size_of::<BrightUniform>());
}

#[test]
fn blur_params_match_the_cpu_struct() {
    assert_eq!(size_of::<BlurUniform>(), 16);
    assert_eq!(wgsl_struct_size(BLUR, "BlurParams"), size_of::<BlurUniform>());
}

#[test]
fn composite_params_match_the_cpu_struct() {
    assert_eq!(
        wgsl_struct_size(COMPOSITE, "CompositeParams"),
        size_of::<CompositeUniform>()
    );
}

#[test]
fn scene_params_match_the_cpu_struct() {
    for source in [SCENE, SCENE_FLAT] {
        assert_eq!(
            wgsl_struct_size(source, "SceneParams"),
            size_of::<SceneParamsUniform>()
        );
        assert_eq!(
            wgsl_struct_size(source, "CameraUniform"),
            size_of::<CameraUniform>()
        );
    }
}
