//! Per-draw transformation data for GPU rendering.
//!
//! Every scene entry owns an [`Instance`]. Its model matrix, normal matrix and
//! texture coordinate scale are packed into an [`InstanceRaw`] and read by the
//! vertex shader from a per-instance vertex buffer.

use cgmath::{One, Rotation3};

use crate::data_structures::model;

/// Translation, rotation and uniform scale of one placed mesh.
///
/// The model matrix is composed as `T * R * S`.
#[derive(Clone, Debug, PartialEq)]
pub struct Instance {
    pub position: cgmath::Vector3<f32>,
    pub rotation: cgmath::Quaternion<f32>,
    pub scale: f32,
}

impl Instance {
    /// Identity transform.
    pub fn new() -> Self {
        Self {
            position: cgmath::Vector3::new(0.0, 0.0, 0.0),
            rotation: cgmath::Quaternion::one(),
            scale: 1.0,
        }
    }

    /// Translate then uniformly scale, the placement every prop in the scene uses.
    pub fn placed(position: [f32; 3], scale: f32) -> Self {
        Self {
            position: position.into(),
            scale,
            ..Self::new()
        }
    }

    /// Rotate the frame first and translate inside the rotated frame.
    ///
    /// `R(angle, axis) * T(offset)` is rewritten as `T(R * offset) * R` so the
    /// result stays in `T * R * S` form.
    pub fn rotated_then_translated(
        axis: cgmath::Vector3<f32>,
        angle: cgmath::Deg<f32>,
        offset: cgmath::Vector3<f32>,
        scale: f32,
    ) -> Self {
        let rotation = cgmath::Quaternion::from_axis_angle(axis, angle);
        Self {
            position: rotation * offset,
            rotation,
            scale,
        }
    }

    pub fn to_matrix(&self) -> cgmath::Matrix4<f32> {
        cgmath::Matrix4::from_translation(self.position)
            * cgmath::Matrix4::from(self.rotation)
            * cgmath::Matrix4::from_scale(self.scale)
    }

    /// Pack for upload. With uniform scale the rotation alone transforms normals.
    pub fn to_raw(&self, uv_scale: cgmath::Vector2<f32>) -> InstanceRaw {
        InstanceRaw {
            model: self.to_matrix().into(),
            normal: cgmath::Matrix3::from(self.rotation).into(),
            uv_scale: uv_scale.into(),
        }
    }
}

impl Default for Instance {
    fn default() -> Self {
        Self::new()
    }
}

/**
 * The raw instance is the data stored on the GPU
 */
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct InstanceRaw {
    pub model: [[f32; 4]; 4],
    pub normal: [[f32; 3]; 3],
    pub uv_scale: [f32; 2],
}

/**
 * Stride layout: model matrix as four vec4 columns, normal matrix as three
 * vec3 columns, then the texture coordinate scale.
 */
impl model::Vertex for InstanceRaw {
    fn desc() -> wgpu::VertexBufferLayout<'static> {
        use std::mem;
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<InstanceRaw>() as wgpu::BufferAddress,
            // advance once per instance rather than per vertex
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 5,
                    format: wgpu::VertexFormat::Float32x4,
                },
                // A mat4 takes up 4 vertex slots, one per column.
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 4]>() as wgpu::BufferAddress,
                    shader_location: 6,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 8]>() as wgpu::BufferAddress,
                    shader_location: 7,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 12]>() as wgpu::BufferAddress,
                    shader_location: 8,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 16]>() as wgpu::BufferAddress,
                    shader_location: 9,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 19]>() as wgpu::BufferAddress,
                    shader_location: 10,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 22]>() as wgpu::BufferAddress,
                    shader_location: 11,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 25]>() as wgpu::BufferAddress,
                    shader_location: 12,
                    format: wgpu::VertexFormat::Float32x2,
                },
            ],
        }
    }
}
