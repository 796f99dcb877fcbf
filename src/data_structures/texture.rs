//! Decoded pixel data and GPU textures.
//!
//! [`PixelBuffer`] is the CPU side of a texture: decoded, flipped so the first
//! row is the bottom of the image, and restricted to 3 or 4 channels.
//! [`Texture`] wraps the GPU resources created from it, including a full mip
//! chain and a repeating linear sampler.

use anyhow::{Context, Result, bail};
use image::{DynamicImage, RgbaImage, imageops::FilterType};

/// Decoded 8-bit pixels, `channels` bytes per pixel, rows packed without padding.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    pub width: u32,
    pub height: u32,
    pub channels: u8,
    pub pixels: Vec<u8>,
}

impl PixelBuffer {
    /// Decode an encoded image file and flip it vertically.
    ///
    /// Texture coordinates put `v = 0` at the bottom of an image while decoders
    /// hand out the top row first, so row 0 of the result is the image's last row.
    pub fn decode(bytes: &[u8], name: &str) -> Result<Self> {
        let img = image::load_from_memory(bytes).with_context(|| format!("failed to decode {name}"))?;
        let mut buffer = Self::from_image(img, name)?;
        buffer.flip_vertically();
        Ok(buffer)
    }

    /// Keep 3 and 4 channel images as they are, reject everything else.
    pub fn from_image(img: DynamicImage, name: &str) -> Result<Self> {
        let (width, height) = (img.width(), img.height());
        let channels = img.color().channel_count();
        let pixels = match channels {
            3 => img.into_rgb8().into_raw(),
            4 => img.into_rgba8().into_raw(),
            n => bail!("unsupported channel count {n} in {name}"),
        };
        Ok(Self {
            width,
            height,
            channels,
            pixels,
        })
    }

    pub fn flip_vertically(&mut self) {
        let row_len = self.row_len();
        if row_len == 0 {
            return;
        }
        self.pixels = self
            .pixels
            .chunks_exact(row_len)
            .rev()
            .flatten()
            .copied()
            .collect();
    }

    pub fn row(&self, y: u32) -> &[u8] {
        let row_len = self.row_len();
        let start = y as usize * row_len;
        &self.pixels[start..start + row_len]
    }

    fn row_len(&self) -> usize {
        self.width as usize * self.channels as usize
    }

    /// Expand to RGBA8 for upload. Three channel images get an opaque alpha.
    pub fn to_rgba8(&self) -> Result<RgbaImage> {
        let rgba = match self.channels {
            4 => self.pixels.clone(),
            _ => self
                .pixels
                .chunks_exact(3)
                .flat_map(|p| [p[0], p[1], p[2], u8::MAX])
                .collect(),
        };
        RgbaImage::from_raw(self.width, self.height, rgba).context("pixel buffer does not match its dimensions")
    }

    /// Number of levels down to a 1x1 image.
    pub fn mip_level_count(&self) -> u32 {
        32 - self.width.max(self.height).max(1).leading_zeros()
    }

    /// The base level followed by successively halved copies.
    pub fn mip_chain(&self) -> Result<Vec<RgbaImage>> {
        let mut levels = vec![self.to_rgba8()?];
        for _ in 1..self.mip_level_count() {
            let Some(previous) = levels.last() else { break };
            let width = (previous.width() / 2).max(1);
            let height = (previous.height() / 2).max(1);
            let next = image::imageops::resize(previous, width, height, FilterType::Triangle);
            levels.push(next);
        }
        Ok(levels)
    }
}

/// A GPU texture with its default view and sampler.
#[derive(Clone, Debug)]
pub struct Texture {
    #[allow(unused)]
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
}

impl Texture {
    /// Standard depth buffer texture format (32-bit float).
    pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

    /// Create a depth texture matching the surface size.
    ///
    /// * `size` is [width, height] of the texture in pixels
    /// * `label` is used as a debug label for the GPU resource
    pub fn create_depth_texture(device: &wgpu::Device, size: [u32; 2], label: &str) -> Self {
        let size = wgpu::Extent3d {
            width: size[0].max(1),
            height: size[1].max(1),
            depth_or_array_layers: 1,
        };
        let desc = wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[Self::DEPTH_FORMAT],
        };
        let texture = device.create_texture(&desc);
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            compare: Some(wgpu::CompareFunction::LessEqual),
            lod_min_clamp: 0.0,
            lod_max_clamp: 100.0,
            ..Default::default()
        });

        Self {
            texture,
            view,
            sampler,
        }
    }

    /// Upload decoded pixels, every mip level included.
    pub fn from_pixels(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        pixels: &PixelBuffer,
        label: &str,
    ) -> Result<Self> {
        let levels = pixels.mip_chain()?;
        let size = wgpu::Extent3d {
            width: pixels.width,
            height: pixels.height,
            depth_or_array_layers: 1,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: levels.len() as u32,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        for (mip_level, level) in levels.iter().enumerate() {
            let (width, height) = level.dimensions();
            queue.write_texture(
                wgpu::TexelCopyTextureInfo {
                    aspect: wgpu::TextureAspect::All,
                    texture: &texture,
                    mip_level: mip_level as u32,
                    origin: wgpu::Origin3d::ZERO,
                },
                level.as_raw(),
                wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(4 * width),
                    rows_per_image: Some(height),
                },
                wgpu::Extent3d {
                    width,
                    height,
                    depth_or_array_layers: 1,
                },
            );
        }

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = create_default_sampler(device);

        Ok(Self {
            texture,
            view,
            sampler,
        })
    }
}

/// Repeat wrapping with linear filtering between texels and mip levels.
pub fn create_default_sampler(device: &wgpu::Device) -> wgpu::Sampler {
    device.create_sampler(&wgpu::SamplerDescriptor {
        address_mode_u: wgpu::AddressMode::Repeat,
        address_mode_v: wgpu::AddressMode::Repeat,
        address_mode_w: wgpu::AddressMode::Repeat,
        mag_filter: wgpu::FilterMode::Linear,
        min_filter: wgpu::FilterMode::Linear,
        mipmap_filter: wgpu::FilterMode::Linear,
        ..Default::default()
    })
}
