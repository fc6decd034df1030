use std::collections::HashMap;

use bytemuck::{Pod, Zeroable};
use glam::Vec4;
use wgpu::{util::DeviceExt, TexelCopyBufferLayout, TexelCopyTextureInfo, TextureDescriptor};

use crate::material_manager::{
    Material, MaterialId, MaterialManager, TextureData, TextureId,
};

pub struct TextureEntry {
    #[allow(dead_code)]
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
}

#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct MaterialUniform {
    pub base_color: Vec4,
}

struct RenderMaterial {
    _uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

/// GPU side of the `MaterialManager`. Materials and textures never change
/// after creation, so each one is uploaded once, the first time it is seen.
pub struct RenderMaterialManager {
    textures: HashMap<TextureId, TextureEntry>,
    materials: HashMap<MaterialId, RenderMaterial>,
    default_texture: TextureEntry,
    sampler: wgpu::Sampler,
    bind_group_layout: wgpu::BindGroupLayout,
}

impl RenderMaterialManager {
    pub fn new(device: &wgpu::Device, queue: &wgpu::Queue) -> Self {
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Default sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            address_mode_w: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Linear,
            lod_min_clamp: 0.0,
            lod_max_clamp: 32.0,
            compare: None,
            anisotropy_clamp: 1,
            border_color: None,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Material bind group layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        Self {
            textures: HashMap::new(),
            materials: HashMap::new(),
            default_texture: Self::create_default_texture(device, queue),
            sampler,
            bind_group_layout,
        }
    }

    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout
    }

    pub fn bind_group(&self, id: MaterialId) -> Option<&wgpu::BindGroup> {
        self.materials.get(&id).map(|material| &material.bind_group)
    }

    /// Uploads every material and texture created since the last call.
    pub fn prepare(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        material_manager: &MaterialManager,
    ) {
        for (id, texture) in material_manager.textures() {
            if !self.textures.contains_key(&id) {
                let entry = Self::create_texture(device, queue, texture);
                self.textures.insert(id, entry);
            }
        }

        for (id, material) in material_manager.materials() {
            if !self.materials.contains_key(&id) {
                let render_material = self.create_material(device, material);
                self.materials.insert(id, render_material);
            }
        }
    }

    fn create_material(&self, device: &wgpu::Device, material: &Material) -> RenderMaterial {
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("Material uniform ({})", material.name)),
            contents: bytemuck::cast_slice(&[MaterialUniform {
                base_color: material.base_color,
            }]),
            usage: wgpu::BufferUsages::UNIFORM,
        });

        let texture = material
            .base_color_texture
            .and_then(|id| self.textures.get(&id))
            .unwrap_or(&self.default_texture);

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&format!("Material bind group ({})", material.name)),
            layout: &self.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&texture.view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
            ],
        });

        RenderMaterial {
            _uniform_buffer: uniform_buffer,
            bind_group,
        }
    }

    fn create_texture(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        texture_data: &TextureData,
    ) -> TextureEntry {
        let texture = device.create_texture_with_data(
            queue,
            &TextureDescriptor {
                label: Some(&texture_data.name),
                size: wgpu::Extent3d {
                    width: texture_data.width,
                    height: texture_data.height,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: wgpu::TextureFormat::Rgba8UnormSrgb,
                usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            },
            wgpu::wgt::TextureDataOrder::default(),
            &texture_data.pixels,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        TextureEntry { texture, view }
    }

    // 1x1 white, so untextured materials show their base colour unchanged.
    fn create_default_texture(device: &wgpu::Device, queue: &wgpu::Queue) -> TextureEntry {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Default texture"),
            size: wgpu::Extent3d {
                width: 1,
                height: 1,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        queue.write_texture(
            TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &[255u8, 255, 255, 255],
            TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4),
                rows_per_image: None,
            },
            wgpu::Extent3d {
                width: 1,
                height: 1,
                depth_or_array_layers: 1,
            },
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        TextureEntry { texture, view }
    }
}
