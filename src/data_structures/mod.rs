//! Scene data: vertices, meshes, instances, textures and the scene table.
//!
//! - `model` contains the vertex format, uploaded meshes and bound materials
//! - `shape` is the procedural mesh catalogue
//! - `instance` holds per-draw transformation data
//! - `scene` is the static draw table
//! - `texture` wraps decoded pixels and GPU textures

pub mod instance;
pub mod model;
pub mod scene;
pub mod shape;
pub mod texture;
