//! diorama
//!
//! A small fixed-scene renderer: a paved ground, a sky backdrop, a row of
//! glass towers and a few bushes, lit by a single point light with Phong
//! shading and explored with a free-fly camera.
//!
//! High-level modules
//! - `camera`: free-fly camera, projection modes and the camera uniform
//! - `context`: settings and the GPU context that owns device/queue/pipelines
//! - `data_structures`: vertices, meshes, instances, textures and the scene table
//! - `flow`: the winit event loop and `run`
//! - `input`: keyboard bindings, held-key polling and cursor tracking
//! - `pipelines`: the Phong and lamp pipelines and WGSL validation
//! - `resources`: loading textures and uploading meshes
//! - `render`: draw list construction and frame encoding
//!

pub mod camera;
pub mod context;
pub mod data_structures;
pub mod flow;
pub mod input;
pub mod pipelines;
pub mod render;
pub mod resources;
