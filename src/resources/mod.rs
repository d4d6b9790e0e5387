//! Loading of textures and OBJ models from the `assets/` directory.
//!
//! Loading is fail-fast: a missing or undecodable file surfaces as an
//! error naming the file instead of a silently untextured surface.

use std::io::{BufReader, Cursor};

use anyhow::Context;

use crate::scene::material::{FallbackMaps, Material, TextureGroup};
use crate::scene::model::Model;
use crate::texture::Texture;

pub mod mesh;

fn asset_path(file_name: &str) -> std::path::PathBuf {
    std::path::Path::new("./").join("assets").join(file_name)
}

pub async fn load_string(file_name: &str) -> anyhow::Result<String> {
    std::fs::read_to_string(asset_path(file_name))
        .with_context(|| format!("can't read asset {file_name}"))
}

pub async fn load_binary(file_name: &str) -> anyhow::Result<Vec<u8>> {
    std::fs::read(asset_path(file_name)).with_context(|| format!("can't read asset {file_name}"))
}

/// Load an image asset into a GPU texture. `is_data_map` selects linear
/// colour space for normal and height maps.
pub async fn load_texture(
    file_name: &str,
    is_data_map: bool,
    device: &wgpu::Device,
    queue: &wgpu::Queue,
) -> anyhow::Result<Texture> {
    let data = load_binary(file_name).await?;
    Texture::from_bytes(
        device,
        queue,
        &data,
        file_name,
        file_extension(file_name),
        is_data_map,
    )
}

/// File extension as an image-format hint; `None` lets the decoder guess
/// from the content.
fn file_extension(file_name: &str) -> Option<&str> {
    std::path::Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
}

async fn load_optional_texture(
    file_name: Option<&String>,
    is_data_map: bool,
    device: &wgpu::Device,
    queue: &wgpu::Queue,
) -> anyhow::Result<Option<Texture>> {
    match file_name {
        Some(name) => Ok(Some(load_texture(name, is_data_map, device, queue).await?)),
        None => Ok(None),
    }
}

/// Load an OBJ model with its MTL materials.
///
/// Each material maps onto a [`TextureGroup`]: diffuse is required,
/// normal/specular come from the standard MTL fields, and displacement
/// (`disp`) and emission (`map_Ke`) are picked up when the exporter wrote
/// them. A material without a diffuse texture is an error, not a warning.
pub async fn load_model_obj(
    file_name: &str,
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    fallbacks: &FallbackMaps,
    layout: &wgpu::BindGroupLayout,
) -> anyhow::Result<Model> {
    let obj_text = load_string(file_name).await?;
    let obj_cursor = Cursor::new(obj_text);
    let mut obj_reader = BufReader::new(obj_cursor);

    let (models, obj_materials) = tobj::load_obj_buf_async(
        &mut obj_reader,
        &tobj::LoadOptions {
            triangulate: true,
            single_index: true,
            ..Default::default()
        },
        |p| async move {
            match load_string(&p).await {
                Ok(mat_text) => tobj::load_mtl_buf(&mut BufReader::new(Cursor::new(mat_text))),
                Err(_) => Err(tobj::LoadError::OpenFileFailed),
            }
        },
    )
    .await
    .with_context(|| format!("can't parse model {file_name}"))?;

    let obj_materials =
        obj_materials.with_context(|| format!("can't load materials for {file_name}"))?;

    let mut materials = Vec::new();
    for m in obj_materials {
        let diffuse_name = m
            .diffuse_texture
            .as_ref()
            .with_context(|| format!("material {} in {file_name} has no diffuse texture", m.name))?;
        let group = TextureGroup {
            diffuse: load_texture(diffuse_name, false, device, queue).await?,
            normal: load_optional_texture(m.normal_texture.as_ref(), true, device, queue).await?,
            specular: load_optional_texture(m.specular_texture.as_ref(), false, device, queue)
                .await?,
            height: load_optional_texture(m.unknown_param.get("disp"), true, device, queue).await?,
            emission: load_optional_texture(m.unknown_param.get("map_Ke"), false, device, queue)
                .await?,
        };
        materials.push(Material::new(device, &m.name, &group, fallbacks, layout));
    }

    check_material_indices(&models, materials.len(), file_name)?;
    let meshes = mesh::load_meshes(&models, file_name, device);

    Ok(Model { meshes, materials })
}

/// Every mesh must resolve to a loaded material, or drawing would index
/// past the material list. A mesh without a `usemtl` statement defaults to
/// material 0, so an OBJ with no MTL at all also fails here, at load time.
fn check_material_indices(
    models: &[tobj::Model],
    material_count: usize,
    file_name: &str,
) -> anyhow::Result<()> {
    for m in models {
        let id = m.mesh.material_id.unwrap_or(0);
        anyhow::ensure!(
            id < material_count,
            "mesh {} in {file_name} references material {id} but the file provides {material_count}",
            m.name
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle_model(material_id: Option<usize>) -> tobj::Model {
        let mesh = tobj::Mesh {
            positions: vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
            indices: vec![0, 1, 2],
            material_id,
            ..Default::default()
        };
        tobj::Model::new(mesh, "tri".to_string())
    }

    #[test]
    fn material_less_obj_is_rejected_at_load() {
        let err = check_material_indices(&[triangle_model(None)], 0, "prop.obj")
            .expect_err("no materials to resolve against");
        let message = format!("{err}");
        assert!(message.contains("prop.obj"), "error must name the file: {message}");
        assert!(message.contains("material 0"), "{message}");
    }

    #[test]
    fn out_of_range_material_id_is_rejected() {
        assert!(check_material_indices(&[triangle_model(Some(2))], 2, "prop.obj").is_err());
    }

    #[test]
    fn resolvable_indices_pass() {
        let models = [triangle_model(Some(0)), triangle_model(Some(1))];
        assert!(check_material_indices(&models, 2, "prop.obj").is_ok());
    }

    #[test]
    fn extension_is_forwarded_as_format_hint() {
        assert_eq!(file_extension("textures/wall.png"), Some("png"));
        assert_eq!(file_extension("wall.diffuse.jpg"), Some("jpg"));
        assert_eq!(file_extension("wall"), None);
    }
}
