use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::data_structures::{
    model::{Material, Mesh},
    scene::TextureId,
    shape::ShapeId,
    texture::{PixelBuffer, Texture},
};

/**
 * This module contains all logic for loading meshes and textures into GPU memory.
 */
pub mod texture;

/// Resolve a texture file inside the configured asset directory.
pub fn asset_path(asset_dir: &Path, file_name: &str) -> PathBuf {
    asset_dir.join(file_name)
}

pub async fn load_binary(path: &Path) -> anyhow::Result<Vec<u8>> {
    tokio::fs::read(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))
}

/// Read and decode an image file. Row 0 of the result is the image's bottom row.
pub async fn load_pixels(path: &Path) -> anyhow::Result<PixelBuffer> {
    let data = load_binary(path).await?;
    let name = path.display().to_string();
    PixelBuffer::decode(&data, &name)
}

pub async fn load_texture(
    asset_dir: &Path,
    id: TextureId,
    device: &wgpu::Device,
    queue: &wgpu::Queue,
) -> anyhow::Result<Texture> {
    let path = asset_path(asset_dir, id.file_name());
    let pixels = load_pixels(&path).await?;
    log::info!(
        "decoded {} ({}x{}, {} channels)",
        path.display(),
        pixels.width,
        pixels.height,
        pixels.channels
    );
    Texture::from_pixels(device, queue, &pixels, id.file_name())
}

/// Load every scene texture and bind it for the fragment shader.
///
/// Any texture that is missing or cannot be decoded fails the whole load.
pub async fn load_materials(
    asset_dir: &Path,
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    layout: &wgpu::BindGroupLayout,
) -> anyhow::Result<MaterialStore> {
    let textures = futures::future::try_join_all(
        TextureId::ALL
            .iter()
            .map(|&id| load_texture(asset_dir, id, device, queue)),
    )
    .await?;
    let materials = TextureId::ALL
        .iter()
        .zip(textures)
        .map(|(id, texture)| Material::new(device, id.file_name(), texture, layout))
        .collect();
    log::info!("loaded {} textures from {}", TextureId::ALL.len(), asset_dir.display());
    Ok(MaterialStore { materials })
}

/// One uploaded mesh per catalogue entry, looked up by [`ShapeId`].
#[derive(Debug)]
pub struct MeshStore {
    meshes: Vec<Mesh>,
}

impl MeshStore {
    /// Upload every catalogue shape. Called once, before the first frame.
    pub fn upload(device: &wgpu::Device) -> Self {
        let meshes = ShapeId::ALL
            .iter()
            .map(|&id| Mesh::new(device, id.name(), &id.vertices()))
            .collect();
        Self { meshes }
    }

    pub fn get(&self, id: ShapeId) -> &Mesh {
        &self.meshes[id as usize]
    }
}

/// One bound texture per [`TextureId`].
#[derive(Debug)]
pub struct MaterialStore {
    materials: Vec<Material>,
}

impl MaterialStore {
    pub fn get(&self, id: TextureId) -> &Material {
        &self.materials[id as usize]
    }
}
