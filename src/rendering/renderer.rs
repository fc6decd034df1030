use std::{collections::HashMap, sync::Arc};

use anyhow::Context;
use glam::Mat4;
use wgpu::CommandEncoderDescriptor;
use winit::{dpi::PhysicalSize, window::Window};

use crate::{
    rendering::{
        config::RenderConfig,
        global_uniform::{GlobalUniform, GlobalUniformState},
        imgui_renderer::ImguiRendererState,
        passes::{
            line_pass::{LinePass, LinePassTextureViews},
            mesh_pass::{MeshDraw, MeshPass, MeshPassTextureViews},
            render_pass_context::{PassCreationContext, RenderPassContext},
        },
        render_material_manager::RenderMaterialManager,
        render_model::RenderModel,
        shader_loader::{PipelineCacheBuilder, ShaderLoader},
        texture::DepthTexture,
    },
    scene_graph::{scene::Scene, scene_model::SceneModelId},
    viewer::ViewerState,
};

pub struct Renderer {
    pub window: Arc<Window>,
    pub size: PhysicalSize<u32>,
    config: RenderConfig,

    surface: wgpu::Surface<'static>,
    surface_config: wgpu::SurfaceConfiguration,
    device: wgpu::Device,
    queue: wgpu::Queue,

    depth_texture: DepthTexture,
    global_uniform: GlobalUniform,

    render_models: HashMap<SceneModelId, RenderModel>,
    material_manager: RenderMaterialManager,
    instance_buffer: Option<wgpu::Buffer>,
    instance_capacity: usize,

    shader_loader: ShaderLoader,
    mesh_pass: MeshPass,
    line_pass: LinePass,
    imgui_renderer: ImguiRendererState,
}

impl Renderer {
    pub async fn new(
        window: Arc<Window>,
        state: &ViewerState,
        config: RenderConfig,
        imgui_context: &mut imgui::Context,
    ) -> anyhow::Result<Renderer> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
        let surface = instance
            .create_surface(window.clone())
            .context("Failed to create surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("No suitable graphics adapter")?;

        log::info!("Using adapter {}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                label: None,
                memory_hints: Default::default(),
                trace: wgpu::Trace::Off,
            })
            .await
            .context("Failed to create device")?;

        let mut surface_config = surface
            .get_default_config(&adapter, size.width.max(1), size.height.max(1))
            .context("Surface is not supported by the adapter")?;
        surface_config.present_mode = config.present_mode;
        surface.configure(&device, &surface_config);

        let depth_texture = DepthTexture::new(&device, size, "Depth Texture");
        let global_uniform = GlobalUniform::new(
            &device,
            GlobalUniformState::new(&state.camera, &state.lights),
        );
        let material_manager = RenderMaterialManager::new(&device, &queue);

        let mut cache_builder = PipelineCacheBuilder::new();
        let mut pass_context = PassCreationContext {
            device: &device,
            surface_format: surface_config.format,
            global_bind_group_layout: &global_uniform.bind_group_layout,
            cache_builder: &mut cache_builder,
        };

        let mesh_pass = MeshPass::create(&mut pass_context, material_manager.bind_group_layout());
        let line_pass = LinePass::create(&mut pass_context);

        let shader_loader = ShaderLoader::new(device.clone(), cache_builder)?;

        let imgui_renderer =
            ImguiRendererState::new(&device, &queue, surface_config.format, imgui_context);

        Ok(Self {
            window,
            size,
            config,
            surface,
            surface_config,
            device,
            queue,
            depth_texture,
            global_uniform,
            render_models: HashMap::new(),
            material_manager,
            instance_buffer: None,
            instance_capacity: 0,
            shader_loader,
            mesh_pass,
            line_pass,
            imgui_renderer,
        })
    }

    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.size = new_size;
            self.surface_config.width = new_size.width;
            self.surface_config.height = new_size.height;
            self.surface.configure(&self.device, &self.surface_config);
            self.depth_texture.resize(&self.device, new_size);
        }
    }

    /// Creates GPU geometry for new scene models and re-uploads deformed ones.
    fn sync_models(&mut self, scene: &Scene) {
        for (id, scene_model) in scene.models.iter() {
            match self.render_models.get(&id) {
                Some(render_model) => {
                    if scene_model.take_vertices_dirty() {
                        render_model.update_vertices(&self.queue, &scene_model.model);
                    }
                }
                None => {
                    scene_model.take_vertices_dirty();
                    let render_model = RenderModel::from_model(&self.device, &scene_model.model);
                    self.render_models.insert(id, render_model);
                }
            }
        }
    }

    fn upload_instances(&mut self, model_matrices: &[Mat4]) {
        if model_matrices.is_empty() {
            return;
        }

        if model_matrices.len() > self.instance_capacity || self.instance_buffer.is_none() {
            let capacity = model_matrices.len().next_power_of_two();
            self.instance_buffer = Some(self.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("Instance buffer"),
                size: (capacity * std::mem::size_of::<Mat4>()) as wgpu::BufferAddress,
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            }));
            self.instance_capacity = capacity;
        }

        if let Some(buffer) = &self.instance_buffer {
            self.queue
                .write_buffer(buffer, 0, bytemuck::cast_slice(model_matrices));
        }
    }

    pub fn render(
        &mut self,
        state: &ViewerState,
        imgui_context: &mut imgui::Context,
    ) -> Result<(), wgpu::SurfaceError> {
        self.shader_loader.load_pending_shaders();

        self.global_uniform.update(
            &self.queue,
            GlobalUniformState::new(&state.camera, &state.lights),
        );
        self.material_manager
            .prepare(&self.device, &self.queue, &state.materials);
        self.sync_models(&state.scene);

        let mut model_matrices = Vec::new();
        let mut drawn = Vec::new();
        for (_, object) in state.scene.objects.iter() {
            let (Some(model_id), Some(material_id)) = (object.model_id, object.material_id) else {
                continue;
            };

            drawn.push((model_id, material_id, model_matrices.len() as u32));
            model_matrices.push(*object.transform.get_world_matrix());
        }
        self.upload_instances(&model_matrices);

        let mut segments = Vec::new();
        for helper in state.scene.helpers() {
            helper.line_segments(&mut segments);
        }
        self.line_pass.prepare(&self.device, &self.queue, &segments);

        let default_material = self
            .material_manager
            .bind_group(state.materials.default_material());
        let draws: Vec<MeshDraw> = drawn
            .into_iter()
            .filter_map(|(model_id, material_id, instance)| {
                Some(MeshDraw {
                    model: self.render_models.get(&model_id)?,
                    material: self
                        .material_manager
                        .bind_group(material_id)
                        .or(default_material)?,
                    instance,
                })
            })
            .collect();

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut context = RenderPassContext {
                encoder: &mut encoder,
                pipeline_cache: &self.shader_loader.cache,
                global_bind_group: &self.global_uniform.bind_group,
            };

            self.mesh_pass.render(
                &MeshPassTextureViews {
                    color: &view,
                    depth: self.depth_texture.view(),
                },
                &mut context,
                self.config.clear_color,
                self.instance_buffer.as_ref(),
                &draws,
            );

            self.line_pass.render(
                &LinePassTextureViews {
                    color: &view,
                    depth: self.depth_texture.view(),
                },
                &mut context,
            );
        }

        self.imgui_renderer.render(
            &view,
            imgui_context,
            &self.device,
            &self.queue,
            &mut encoder,
        );

        self.queue.submit([encoder.finish()]);
        output.present();

        Ok(())
    }
}
