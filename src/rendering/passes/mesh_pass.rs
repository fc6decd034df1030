use wgpu::{
    DepthBiasState, Device, MultisampleState, PipelineCompilationOptions, RenderPassDescriptor,
    ShaderSource, StencilState,
};

use crate::rendering::{
    passes::render_pass_context::{PassCreationContext, RenderPassContext},
    render_model::{RenderModel, INSTANCE_VBL, MODEL_PRIMITIVE_STATE, RENDER_MODEL_VBL},
    shader_loader::{PipelineId, ShaderDefinition},
    texture::DepthTexture,
};

const MESH_SHADER: ShaderDefinition = ShaderDefinition {
    name: "Mesh Shader",
    path: "mesh.wgsl",
};

/// One mesh object: its geometry, its material and the slot of its model
/// matrix in the instance buffer.
pub struct MeshDraw<'a> {
    pub model: &'a RenderModel,
    pub material: &'a wgpu::BindGroup,
    pub instance: u32,
}

pub struct MeshPassTextureViews<'a> {
    pub color: &'a wgpu::TextureView,
    pub depth: &'a wgpu::TextureView,
}

pub struct MeshPass {
    pipeline_id: PipelineId,
}

impl MeshPass {
    pub fn create(
        context: &mut PassCreationContext,
        material_bind_group_layout: &wgpu::BindGroupLayout,
    ) -> Self {
        let render_pipeline_layout =
            context
                .device
                .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                    label: Some("Mesh render pipeline layout"),
                    bind_group_layouts: &[
                        context.global_bind_group_layout,
                        material_bind_group_layout,
                    ],
                    push_constant_ranges: &[],
                });

        let format = context.surface_format;

        let pipeline_id = context.cache_builder.add_shader(
            MESH_SHADER,
            Box::new(
                move |device: &Device, shader_def: &ShaderDefinition, source: &str| {
                    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
                        label: Some(shader_def.name),
                        source: ShaderSource::Wgsl(source.into()),
                    });

                    let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                        label: Some("Mesh render pipeline"),
                        layout: Some(&render_pipeline_layout),
                        vertex: wgpu::VertexState {
                            module: &shader,
                            entry_point: Some("vs_main"),
                            buffers: &[RENDER_MODEL_VBL, INSTANCE_VBL],
                            compilation_options: PipelineCompilationOptions::default(),
                        },
                        fragment: Some(wgpu::FragmentState {
                            module: &shader,
                            entry_point: Some("fs_main"),
                            targets: &[Some(wgpu::ColorTargetState {
                                format,
                                blend: Some(wgpu::BlendState::REPLACE),
                                write_mask: wgpu::ColorWrites::ALL,
                            })],
                            compilation_options: PipelineCompilationOptions::default(),
                        }),
                        primitive: MODEL_PRIMITIVE_STATE,
                        depth_stencil: Some(wgpu::DepthStencilState {
                            format: DepthTexture::DEPTH_FORMAT,
                            depth_write_enabled: true,
                            depth_compare: wgpu::CompareFunction::Less,
                            stencil: StencilState::default(),
                            bias: DepthBiasState::default(),
                        }),
                        multisample: MultisampleState::default(),
                        multiview: None,
                        cache: None,
                    });

                    Ok(pipeline)
                },
            ),
        );

        MeshPass { pipeline_id }
    }

    /// Clears the targets and draws every mesh.
    pub fn render(
        &self,
        texture_views: &MeshPassTextureViews,
        context: &mut RenderPassContext,
        clear_color: wgpu::Color,
        instance_buffer: Option<&wgpu::Buffer>,
        draws: &[MeshDraw],
    ) {
        let mut render_pass = context.encoder.begin_render_pass(&RenderPassDescriptor {
            label: Some("Mesh Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: texture_views.color,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(clear_color),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: texture_views.depth,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            occlusion_query_set: None,
            timestamp_writes: None,
        });

        let (Some(pipeline), Some(instance_buffer)) =
            (context.pipeline_cache.get(self.pipeline_id), instance_buffer)
        else {
            return;
        };

        render_pass.set_pipeline(pipeline);
        render_pass.set_bind_group(0, context.global_bind_group, &[]);
        render_pass.set_vertex_buffer(1, instance_buffer.slice(..));

        for draw in draws {
            render_pass.set_bind_group(1, draw.material, &[]);

            for primitive in &draw.model.primitives {
                render_pass.set_vertex_buffer(0, primitive.vertex_buffer.slice(..));
                render_pass
                    .set_index_buffer(primitive.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                render_pass.draw_indexed(
                    0..primitive.num_indices,
                    0,
                    draw.instance..draw.instance + 1,
                );
            }
        }
    }
}
