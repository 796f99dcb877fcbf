//! Render pipelines and the shader programs they are built from.
//!
//! - `basic` holds the textured Phong pipeline and the shared pipeline builder
//! - `light` holds the light uniform and the lamp marker pipeline
//! - `shader` validates WGSL programs before they reach the device

pub mod basic;
pub mod light;
pub mod shader;
