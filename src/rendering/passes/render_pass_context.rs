use crate::rendering::shader_loader::{PipelineCache, PipelineCacheBuilder};

pub struct PassCreationContext<'a> {
    pub device: &'a wgpu::Device,
    pub surface_format: wgpu::TextureFormat,
    pub global_bind_group_layout: &'a wgpu::BindGroupLayout,
    pub cache_builder: &'a mut PipelineCacheBuilder,
}

pub struct RenderPassContext<'a> {
    pub encoder: &'a mut wgpu::CommandEncoder,
    pub pipeline_cache: &'a PipelineCache,
    pub global_bind_group: &'a wgpu::BindGroup,
}
