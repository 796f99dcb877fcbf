//! Frame rendering.
//!
//! A frame is one render pass: clear colour and depth, draw every scene entry
//! in table order with the Phong pipeline, optionally draw the lamp, present.
//! [`draw_list`] turns the scene table into draw commands and is independent
//! of the GPU.

use std::{iter, ops::Range};

use cgmath::Vector2;

use crate::{
    camera::ProjectionMode,
    context::Context,
    data_structures::{
        instance::InstanceRaw,
        model::DrawMesh,
        scene::{SceneEntry, TextureId},
        shape::ShapeId,
    },
};

/// One non-indexed draw of a whole shape with a single instance.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DrawCommand {
    pub shape: ShapeId,
    pub texture: TextureId,
    pub vertices: Range<u32>,
    pub instance: u32,
}

pub fn draw_list(scene: &[SceneEntry]) -> Vec<DrawCommand> {
    scene
        .iter()
        .enumerate()
        .map(|(index, entry)| DrawCommand {
            shape: entry.shape,
            texture: entry.texture,
            vertices: 0..entry.shape.vertex_count(),
            instance: index as u32,
        })
        .collect()
}

/// Per-entry instance data, in table order.
pub fn instance_data(scene: &[SceneEntry], uv_scale: Vector2<f32>) -> Vec<InstanceRaw> {
    scene.iter().map(|entry| entry.to_raw(uv_scale)).collect()
}

/// Upload this frame's uniforms and instances, then draw and present.
pub fn render_frame(
    ctx: &mut Context,
    scene: &[SceneEntry],
    projection: ProjectionMode,
    uv_scale: Vector2<f32>,
) -> Result<(), wgpu::SurfaceError> {
    ctx.camera.write_to_buffer(&ctx.queue, &ctx.projection, projection);
    ctx.light.write_to_buffer(&ctx.queue);
    ctx.queue.write_buffer(
        &ctx.instance_buffer,
        0,
        bytemuck::cast_slice(&instance_data(scene, uv_scale)),
    );

    let output = ctx.surface.get_current_texture()?;
    let view = output
        .texture
        .create_view(&wgpu::TextureViewDescriptor::default());

    let mut encoder = ctx
        .device
        .create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Render Encoder"),
        });
    {
        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Render Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(ctx.settings.clear_colour),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &ctx.depth_texture.view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            occlusion_query_set: None,
            timestamp_writes: None,
        });

        render_pass.set_pipeline(&ctx.pipeline);
        render_pass.set_bind_group(1, &ctx.camera.bind_group, &[]);
        render_pass.set_bind_group(2, &ctx.light.bind_group, &[]);
        render_pass.set_vertex_buffer(1, ctx.instance_buffer.slice(..));
        for command in draw_list(scene) {
            render_pass.draw_mesh_instanced(
                ctx.meshes.get(command.shape),
                ctx.materials.get(command.texture),
                command.vertices,
                command.instance..command.instance + 1,
            );
        }

        if ctx.settings.draw_lamp {
            render_pass.set_pipeline(&ctx.light.lamp_pipeline);
            render_pass.set_vertex_buffer(1, ctx.light.lamp_instance.slice(..));
            render_pass.draw_light_mesh(ctx.meshes.get(ShapeId::Lamp), &ctx.camera.bind_group);
        }
    }

    ctx.queue.submit(iter::once(encoder.finish()));
    output.present();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_structures::scene::diorama;

    #[test]
    fn one_command_per_entry_in_table_order() {
        let scene = diorama();
        let commands = draw_list(&scene);
        assert_eq!(commands.len(), scene.len());
        for (index, (command, entry)) in commands.iter().zip(&scene).enumerate() {
            assert_eq!(command.shape, entry.shape);
            assert_eq!(command.texture, entry.texture);
            assert_eq!(command.instance, index as u32);
        }
    }

    #[test]
    fn commands_draw_full_shapes() {
        let commands = draw_list(&diorama());
        assert_eq!(commands[0].vertices, 0..6);
        assert_eq!(commands[1].vertices, 0..6);
        assert_eq!(commands[6].vertices, 0..48);
        assert!(commands[9..].iter().all(|c| c.vertices == (0..96)));
    }

    #[test]
    fn commands_cover_the_uploaded_vertices() {
        for command in draw_list(&diorama()) {
            let uploaded = command.shape.vertices().len() as u32;
            assert_eq!(command.vertices, 0..uploaded, "{}", command.shape.name());
        }
    }

    #[test]
    fn instance_data_carries_current_uv_scale() {
        let scene = diorama();
        let data = instance_data(&scene, Vector2::new(3.0, 3.0));
        assert_eq!(data.len(), scene.len());
        assert_eq!(data[0].uv_scale, [10.0, 10.0]);
        assert_eq!(data[14].uv_scale, [3.0, 3.0]);
        assert_eq!(data[2].model[3][0], 1.6);
    }
}
