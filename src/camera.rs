//! Free-fly camera, projection selection and the camera uniform.
//!
//! The camera keeps its orientation as yaw/pitch in degrees and derives an
//! orthonormal `front`/`right`/`up` basis from them after every change. The
//! projection is either a perspective frustum driven by the camera zoom or a
//! fixed orthographic box; both are converted from OpenGL clip space to the
//! `[0, 1]` depth range wgpu expects.

use cgmath::{Angle, Deg, InnerSpace, Matrix4, Point3, Vector3};
use wgpu::util::DeviceExt;

/// Default heading: looking down the negative z axis.
pub const YAW: f32 = -90.0;
pub const PITCH: f32 = 0.0;
/// World units per second.
pub const SPEED: f32 = 2.5;
/// Degrees per cursor pixel.
pub const SENSITIVITY: f32 = 0.1;
/// Field of view in degrees, also the upper zoom bound.
pub const ZOOM: f32 = 45.0;
pub const MIN_ZOOM: f32 = 1.0;
pub const MAX_ZOOM: f32 = 45.0;
pub const MAX_PITCH: f32 = 89.0;

#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

/// Direction of a keyboard driven camera move.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CameraMovement {
    Forward,
    Backward,
    Left,
    Right,
    Up,
    Down,
}

#[derive(Clone, Debug)]
pub struct Camera {
    pub position: Point3<f32>,
    yaw: Deg<f32>,
    pitch: Deg<f32>,
    front: Vector3<f32>,
    right: Vector3<f32>,
    up: Vector3<f32>,
    world_up: Vector3<f32>,
    zoom: f32,
    speed: f32,
    sensitivity: f32,
}

impl Camera {
    pub fn new<P: Into<Point3<f32>>, Y: Into<Deg<f32>>, Q: Into<Deg<f32>>>(
        position: P,
        yaw: Y,
        pitch: Q,
    ) -> Self {
        let mut camera = Self {
            position: position.into(),
            yaw: yaw.into(),
            pitch: pitch.into(),
            front: -Vector3::unit_z(),
            right: Vector3::unit_x(),
            up: Vector3::unit_y(),
            world_up: Vector3::unit_y(),
            zoom: ZOOM,
            speed: SPEED,
            sensitivity: SENSITIVITY,
        };
        camera.update_vectors();
        camera
    }

    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    pub fn yaw(&self) -> Deg<f32> {
        self.yaw
    }

    pub fn pitch(&self) -> Deg<f32> {
        self.pitch
    }

    pub fn zoom(&self) -> Deg<f32> {
        Deg(self.zoom)
    }

    pub fn front(&self) -> Vector3<f32> {
        self.front
    }

    pub fn right(&self) -> Vector3<f32> {
        self.right
    }

    pub fn up(&self) -> Vector3<f32> {
        self.up
    }

    /// Move along one of the camera's basis vectors. Position is unbounded.
    pub fn process_keyboard(&mut self, direction: CameraMovement, delta_time: f32) {
        let velocity = self.speed * delta_time;
        match direction {
            CameraMovement::Forward => self.position += self.front * velocity,
            CameraMovement::Backward => self.position -= self.front * velocity,
            CameraMovement::Left => self.position -= self.right * velocity,
            CameraMovement::Right => self.position += self.right * velocity,
            CameraMovement::Up => self.position += self.up * velocity,
            CameraMovement::Down => self.position -= self.up * velocity,
        }
    }

    /// Apply a cursor delta. Yaw wraps freely, pitch stays within `±MAX_PITCH`.
    pub fn process_mouse_movement(&mut self, xoffset: f32, yoffset: f32) {
        self.yaw += Deg(xoffset * self.sensitivity);
        self.pitch += Deg(yoffset * self.sensitivity);
        self.pitch = Deg(self.pitch.0.clamp(-MAX_PITCH, MAX_PITCH));
        self.update_vectors();
    }

    pub fn process_mouse_scroll(&mut self, yoffset: f32) {
        self.zoom = (self.zoom - yoffset).clamp(MIN_ZOOM, MAX_ZOOM);
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(self.position, self.position + self.front, self.up)
    }

    fn update_vectors(&mut self) {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        self.front = Vector3::new(cos_yaw * cos_pitch, sin_pitch, sin_yaw * cos_pitch).normalize();
        self.right = self.front.cross(self.world_up).normalize();
        self.up = self.right.cross(self.front).normalize();
    }
}

impl Default for Camera {
    fn default() -> Self {
        Camera::new((0.0, 0.2, 4.0), Deg(YAW), Deg(PITCH))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum ProjectionMode {
    #[default]
    Perspective,
    Orthographic,
}

/// Fixed projection parameters. The aspect ratio is taken once from the
/// configured window size and is not updated on resize.
#[derive(Clone, Debug)]
pub struct Projection {
    aspect: f32,
    znear: f32,
    zfar: f32,
    ortho_extent: f32,
}

impl Projection {
    pub fn new(width: u32, height: u32, znear: f32, zfar: f32) -> Self {
        Self {
            aspect: width as f32 / height.max(1) as f32,
            znear,
            zfar,
            ortho_extent: 5.0,
        }
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn calc_matrix(&self, mode: ProjectionMode, fovy: Deg<f32>) -> Matrix4<f32> {
        let projection = match mode {
            ProjectionMode::Perspective => {
                cgmath::perspective(fovy, self.aspect, self.znear, self.zfar)
            }
            ProjectionMode::Orthographic => cgmath::ortho(
                -self.ortho_extent,
                self.ortho_extent,
                -self.ortho_extent,
                self.ortho_extent,
                self.znear,
                self.zfar,
            ),
        };
        OPENGL_TO_WGPU_MATRIX * projection
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    view_position: [f32; 4],
    view: [[f32; 4]; 4],
    proj: [[f32; 4]; 4],
}

impl CameraUniform {
    pub fn new() -> Self {
        use cgmath::SquareMatrix;
        Self {
            view_position: [0.0; 4],
            view: Matrix4::identity().into(),
            proj: Matrix4::identity().into(),
        }
    }

    pub fn update_view_proj(&mut self, camera: &Camera, projection: &Projection, mode: ProjectionMode) {
        self.view_position = camera.position.to_homogeneous().into();
        self.view = camera.view_matrix().into();
        self.proj = projection.calc_matrix(mode, camera.zoom()).into();
    }

    pub fn view(&self) -> Matrix4<f32> {
        self.view.into()
    }

    pub fn proj(&self) -> Matrix4<f32> {
        self.proj.into()
    }
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new()
    }
}

/// The camera together with the GPU buffer it is mirrored into every frame.
#[derive(Debug)]
pub struct CameraResources {
    pub camera: Camera,
    pub uniform: CameraUniform,
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    pub bind_group_layout: wgpu::BindGroupLayout,
}

impl CameraResources {
    pub fn new(
        device: &wgpu::Device,
        camera: Camera,
        projection: &Projection,
        mode: ProjectionMode,
    ) -> Self {
        let mut uniform = CameraUniform::new();
        uniform.update_view_proj(&camera, projection, mode);

        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Camera Buffer"),
            contents: bytemuck::cast_slice(&[uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
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
            label: Some("camera_bind_group_layout"),
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
            label: Some("camera_bind_group"),
        });

        Self {
            camera,
            uniform,
            buffer,
            bind_group,
            bind_group_layout,
        }
    }

    /// Recompute view/projection from the current camera and upload them.
    pub fn write_to_buffer(&mut self, queue: &wgpu::Queue, projection: &Projection, mode: ProjectionMode) {
        self.uniform.update_view_proj(&self.camera, projection, mode);
        queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&[self.uniform]));
    }
}
