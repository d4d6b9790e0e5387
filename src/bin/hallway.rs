//! Demo: a procedurally textured hallway with two point lights and bloom.
//!
//! Textures are generated at startup so the demo runs without an asset
//! pack. An OBJ prop (path relative to `assets/`) can be passed as the
//! first command-line argument; a missing file is a startup error.

use anyhow::Result;
use cgmath::{Matrix4, Point3, Vector3};

use hallway::app::{self, SceneAssets};
use hallway::resources;
use hallway::scene::hallway::HallwayDims;
use hallway::scene::light::PointLight;
use hallway::scene::material::TextureGroup;
use hallway::scene::Scene;
use hallway::settings::Settings;
use hallway::texture::Texture;

const HALLWAY_DIMS: (f32, f32, f32) = (5.0, 5.0, 10.0);
const LIGHT_POSITIONS: [(f32, f32, f32); 2] = [(4.0, 1.0, -1.0), (1.0, 4.0, -6.0)];

fn checkerboard(size: u32, cell: u32, light: [u8; 3], dark: [u8; 3]) -> image::DynamicImage {
    let img = image::RgbaImage::from_fn(size, size, |x, y| {
        let c = if ((x / cell) + (y / cell)) % 2 == 0 {
            light
        } else {
            dark
        };
        image::Rgba([c[0], c[1], c[2], 255])
    });
    image::DynamicImage::ImageRgba8(img)
}

/// Mostly-black emission map with bright cells, so the ceiling feeds the
/// bloom bright pass.
fn ceiling_lights(size: u32, cell: u32) -> image::DynamicImage {
    let img = image::RgbaImage::from_fn(size, size, |x, y| {
        let lit = (x / cell) % 4 == 1 && (y / cell) % 4 == 1;
        if lit {
            image::Rgba([255, 255, 240, 255])
        } else {
            image::Rgba([0, 0, 0, 255])
        }
    });
    image::DynamicImage::ImageRgba8(img)
}

async fn build_scene(assets: SceneAssets<'_>, prop: Option<String>) -> Result<Scene> {
    let device = assets.device;
    let queue = assets.queue;

    let upload = |img: &image::DynamicImage, label: &str| {
        Texture::from_image(device, queue, img, Some(label), false)
    };

    let floor = TextureGroup::diffuse_only(upload(
        &checkerboard(256, 32, [140, 120, 100], [90, 75, 60]),
        "floor diffuse",
    )?);
    let wall = TextureGroup::diffuse_only(upload(
        &checkerboard(256, 64, [160, 160, 170], [120, 120, 130]),
        "wall diffuse",
    )?);
    let ceiling = TextureGroup {
        diffuse: upload(
            &checkerboard(256, 64, [200, 200, 200], [180, 180, 180]),
            "ceiling diffuse",
        )?,
        normal: None,
        specular: None,
        height: None,
        emission: Some(upload(&ceiling_lights(256, 16), "ceiling emission")?),
    };

    let settings = Settings::default();
    let lights = LIGHT_POSITIONS
        .map(|(x, y, z)| PointLight::from_settings(Point3::new(x, y, z), &settings));

    let (w, h, l) = HALLWAY_DIMS;
    let mut scene = Scene::new(
        device,
        HallwayDims::new(w, h, l),
        &floor,
        &wall,
        &ceiling,
        assets.fallbacks,
        assets.material_layout,
        assets.transform_layout,
        lights,
    );

    if let Some(path) = prop {
        let model =
            resources::load_model_obj(&path, device, queue, assets.fallbacks, assets.material_layout)
                .await?;
        scene.place_model(
            device,
            assets.transform_layout,
            model,
            Matrix4::from_translation(Vector3::new(w / 2.0, 0.0, -l / 2.0)),
        );
    }

    Ok(scene)
}

fn main() -> Result<()> {
    let prop = std::env::args().nth(1);
    app::run(
        Box::new(move |assets| Box::pin(build_scene(assets, prop))),
        None,
    )
}
