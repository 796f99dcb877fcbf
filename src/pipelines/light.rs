use wgpu::util::DeviceExt;

use crate::{
    data_structures::{
        instance::{Instance, InstanceRaw},
        model::{ModelVertex, Vertex},
        texture,
    },
    pipelines::shader,
};

/// The light uniform and the unlit lamp marker drawn at its position.
#[derive(Debug)]
pub struct LightResources {
    pub uniform: LightUniform,
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    pub bind_group_layout: wgpu::BindGroupLayout,
    pub lamp_pipeline: wgpu::RenderPipeline,
    pub lamp_instance: wgpu::Buffer,
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightUniform {
    pub position: [f32; 3],
    // Due to uniforms requiring 16 byte (4 float) spacing, we need to use a padding field here
    _padding: u32,
    pub color: [f32; 3],
    _padding2: u32,
    pub object_color: [f32; 3],
    _padding3: u32,
}

impl LightUniform {
    pub fn new(position: [f32; 3], color: [f32; 3], object_color: [f32; 3]) -> Self {
        Self {
            position,
            _padding: 0,
            color,
            _padding2: 0,
            object_color,
            _padding3: 0,
        }
    }
}

impl LightResources {
    pub fn new(
        device: &wgpu::Device,
        config: &wgpu::SurfaceConfiguration,
        uniform: LightUniform,
        lamp_scale: f32,
        camera_bind_group_layout: &wgpu::BindGroupLayout,
    ) -> anyhow::Result<Self> {
        let buffer = mk_buffer(device, uniform);
        let bind_group_layout = mk_bind_group_layout(device);
        let bind_group = mk_bind_group(device, &bind_group_layout, &buffer);
        let lamp_pipeline = mk_lamp_pipeline(device, config, camera_bind_group_layout)?;

        let lamp = Instance::placed(uniform.position, lamp_scale);
        let lamp_instance = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Lamp Instance Buffer"),
            contents: bytemuck::cast_slice(&[lamp.to_raw(cgmath::Vector2::new(1.0, 1.0))]),
            usage: wgpu::BufferUsages::VERTEX,
        });

        Ok(Self {
            uniform,
            buffer,
            bind_group,
            bind_group_layout,
            lamp_pipeline,
            lamp_instance,
        })
    }

    pub fn write_to_buffer(&self, queue: &wgpu::Queue) {
        queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&[self.uniform]));
    }
}

pub fn mk_buffer(device: &wgpu::Device, light_uniform: LightUniform) -> wgpu::Buffer {
    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("Light Uniform Buffer"),
        contents: bytemuck::cast_slice(&[light_uniform]),
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
    })
}

pub fn mk_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }],
        label: Some("light_bind_group_layout"),
    })
}

pub fn mk_bind_group(
    device: &wgpu::Device,
    bind_group_layout: &wgpu::BindGroupLayout,
    light_buffer: &wgpu::Buffer,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        layout: bind_group_layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: light_buffer.as_entire_binding(),
        }],
        label: Some("light_bind_group"),
    })
}

pub fn mk_lamp_pipeline(
    device: &wgpu::Device,
    config: &wgpu::SurfaceConfiguration,
    camera_bind_group_layout: &wgpu::BindGroupLayout,
) -> anyhow::Result<wgpu::RenderPipeline> {
    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("Lamp Pipeline Layout"),
        bind_group_layouts: &[camera_bind_group_layout],
        push_constant_ranges: &[],
    });
    let shader = shader::compile(device, "Lamp Shader", shader::LAMP)?;
    Ok(crate::pipelines::basic::mk_render_pipeline(
        device,
        "Lamp Pipeline",
        &layout,
        config.format,
        Some(wgpu::BlendState {
            alpha: wgpu::BlendComponent::REPLACE,
            color: wgpu::BlendComponent::REPLACE,
        }),
        Some(texture::Texture::DEPTH_FORMAT),
        &[ModelVertex::desc(), InstanceRaw::desc()],
        &shader,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_matches_wgsl_layout() {
        // three vec3<f32> members, each aligned to 16 bytes
        assert_eq!(std::mem::size_of::<LightUniform>(), 48);
        let uniform = LightUniform::new([0.0, 7.5, 5.0], [1.0, 1.0, 0.95], [1.0, 0.2, 0.0]);
        let floats: &[f32] = bytemuck::cast_slice(std::slice::from_ref(&uniform));
        assert_eq!(&floats[0..3], &[0.0, 7.5, 5.0]);
        assert_eq!(&floats[4..7], &[1.0, 1.0, 0.95]);
        assert_eq!(&floats[8..11], &[1.0, 0.2, 0.0]);
    }
}
