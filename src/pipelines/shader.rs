//! WGSL shader programs.
//!
//! A program is one WGSL source holding a `vs_main` vertex entry point and an
//! `fs_main` fragment entry point. Sources are parsed and validated with naga
//! before wgpu sees them so that a broken shader fails startup with a readable
//! diagnostic instead of a device error later on.

use anyhow::{anyhow, bail};

pub const VERTEX_ENTRY: &str = "vs_main";
pub const FRAGMENT_ENTRY: &str = "fs_main";

pub const PHONG: &str = include_str!("phong.wgsl");
pub const LAMP: &str = include_str!("lamp.wgsl");

/// Parse, validate and check the entry points of a WGSL program.
pub fn validate(label: &str, source: &str) -> anyhow::Result<naga::Module> {
    let module = naga::front::wgsl::parse_str(source)
        .map_err(|err| anyhow!("{label} failed to compile:\n{}", err.emit_to_string(source)))?;

    naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::default(),
    )
    .validate(&module)
    .map_err(|err| anyhow!("{label} failed validation: {err}"))?;

    for (name, stage) in [
        (VERTEX_ENTRY, naga::ShaderStage::Vertex),
        (FRAGMENT_ENTRY, naga::ShaderStage::Fragment),
    ] {
        if !module
            .entry_points
            .iter()
            .any(|ep| ep.name == name && ep.stage == stage)
        {
            bail!("{label} failed to link: no {stage:?} entry point named {name}");
        }
    }

    Ok(module)
}

/// Validate `source` and hand it to the device.
pub fn compile(device: &wgpu::Device, label: &str, source: &str) -> anyhow::Result<wgpu::ShaderModule> {
    validate(label, source)?;
    log::debug!("{label} validated");
    Ok(device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(label),
        source: wgpu::ShaderSource::Wgsl(source.into()),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phong_shader_validates() {
        let module = validate("phong", PHONG).unwrap();
        assert_eq!(module.entry_points.len(), 2);
    }

    #[test]
    fn lamp_shader_validates() {
        validate("lamp", LAMP).unwrap();
    }

    #[test]
    fn syntax_error_is_reported_with_label() {
        let err = validate("broken", "@vertex fn vs_main( -> {").unwrap_err();
        assert!(err.to_string().starts_with("broken failed to compile"));
    }

    #[test]
    fn type_error_fails_validation_or_compile() {
        let source = "
            @vertex fn vs_main() -> @builtin(position) vec4<f32> { return 1.0; }
            @fragment fn fs_main() -> @location(0) vec4<f32> { return vec4<f32>(1.0); }
        ";
        let err = validate("mistyped", source).unwrap_err().to_string();
        assert!(err.starts_with("mistyped failed"), "{err}");
    }

    #[test]
    fn missing_fragment_stage_fails_to_link() {
        let source = "@vertex fn vs_main() -> @builtin(position) vec4<f32> { return vec4<f32>(0.0); }";
        let err = validate("vertex only", source).unwrap_err();
        assert_eq!(
            err.to_string(),
            "vertex only failed to link: no Fragment entry point named fs_main"
        );
    }
}
