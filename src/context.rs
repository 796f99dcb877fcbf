use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use winit::window::Window;

use crate::{
    camera::{Camera, CameraResources, Projection, ProjectionMode},
    data_structures::{instance::InstanceRaw, scene::SceneEntry, texture},
    pipelines::{basic, light::{LightResources, LightUniform}},
    resources::{self, MaterialStore, MeshStore},
};

/// Compile-time tunables of the renderer.
#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub clear_colour: wgpu::Color,
    pub object_color: [f32; 3],
    pub light_color: [f32; 3],
    pub light_position: [f32; 3],
    pub lamp_scale: f32,
    pub draw_lamp: bool,
    pub asset_dir: PathBuf,
    pub znear: f32,
    pub zfar: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            title: String::from("Final Project"),
            width: 1600,
            height: 900,
            clear_colour: wgpu::Color::BLACK,
            object_color: [1.0, 0.2, 0.0],
            light_color: [1.0, 1.0, 0.95],
            light_position: [0.0, 7.5, 5.0],
            lamp_scale: 0.7,
            draw_lamp: false,
            asset_dir: PathBuf::from("assets").join("textures"),
            znear: 0.1,
            zfar: 100.0,
        }
    }
}

/// Everything the frame renderer needs, created once before the first frame.
#[derive(Debug)]
pub struct Context {
    pub(crate) window: Arc<Window>,
    pub(crate) depth_texture: texture::Texture,
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub camera: CameraResources,
    pub projection: Projection,
    pub light: LightResources,
    pub pipeline: wgpu::RenderPipeline,
    pub meshes: MeshStore,
    pub materials: MaterialStore,
    pub instance_buffer: wgpu::Buffer,
    pub settings: Settings,
}

impl Context {
    pub async fn new(window: Arc<Window>, settings: Settings, scene: &[SceneEntry]) -> anyhow::Result<Self> {
        let size = window.inner_size();

        // The instance is a handle to our GPU
        // BackendBit::PRIMARY => Vulkan + Metal + DX12 + Browser WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .context("failed to create a surface for the window")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("no graphics adapter can present to this window")?;
        let info = adapter.get_info();
        log::info!("using {} ({:?})", info.name, info.backend);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("diorama device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                ..Default::default()
            })
            .await
            .context("failed to open the graphics device")?;

        let surface_caps = surface.get_capabilities(&adapter);
        // Shader code assumes an Srgb surface texture. Using a different one
        // makes every colour come out darker.
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
            .context("the surface supports no texture formats")?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);
        log::info!("surface format {surface_format:?}");

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        // The aspect ratio comes from the configured window size, not the surface.
        let projection = Projection::new(settings.width, settings.height, settings.znear, settings.zfar);
        let camera = CameraResources::new(&device, Camera::default(), &projection, ProjectionMode::default());

        let depth_texture =
            texture::Texture::create_depth_texture(&device, [config.width, config.height], "depth_texture");

        let light = LightResources::new(
            &device,
            &config,
            LightUniform::new(settings.light_position, settings.light_color, settings.object_color),
            settings.lamp_scale,
            &camera.bind_group_layout,
        )?;

        let diffuse_layout = resources::texture::diffuse_layout(&device);
        let pipeline = basic::mk_phong_pipeline(
            &device,
            &config,
            &diffuse_layout,
            &camera.bind_group_layout,
            &light.bind_group_layout,
        )?;

        let meshes = MeshStore::upload(&device);
        let materials = resources::load_materials(&settings.asset_dir, &device, &queue, &diffuse_layout).await?;

        // rewritten every frame, one slot per scene entry
        let instance_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Scene Instance Buffer"),
            size: (std::mem::size_of::<InstanceRaw>() * scene.len().max(1)) as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Ok(Self {
            window,
            depth_texture,
            surface,
            device,
            queue,
            config,
            camera,
            projection,
            light,
            pipeline,
            meshes,
            materials,
            instance_buffer,
            settings,
        })
    }

    /// Reconfigure the surface and depth buffer. The projection aspect is left alone.
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        if width == 0 || height == 0 {
            return false;
        }
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
        self.depth_texture =
            texture::Texture::create_depth_texture(&self.device, [width, height], "depth_texture");
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.title, "Final Project");
        assert_eq!((settings.width, settings.height), (1600, 900));
        assert_eq!(settings.clear_colour, wgpu::Color::BLACK);
        assert_eq!(settings.light_position, [0.0, 7.5, 5.0]);
        assert!(!settings.draw_lamp);
        assert!(settings.asset_dir.ends_with("textures"));
    }
}
