use std::{sync::Arc, time::Instant};

use anyhow::Context;
use glam::Vec2;
use imgui::{FontConfig, FontSource};
use imgui_winit_support::WinitPlatform;
use winit::{
    application::ApplicationHandler,
    event::{ElementState, Event, MouseButton, MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    window::Window,
};

use crate::{
    camera::cursor_to_ndc,
    config::ViewerConfig,
    engine,
    rendering::{config::RenderConfig, renderer::Renderer},
    viewer::ViewerState,
};

struct ImguiState {
    context: imgui::Context,
    platform: WinitPlatform,
}

struct App {
    renderer: Option<Renderer>,
    imgui: Option<ImguiState>,
    viewer: ViewerState,
    cursor: Vec2,
    last_frame: Instant,
    error: Option<anyhow::Error>,
}

impl App {
    fn new(viewer: ViewerState) -> Self {
        Self {
            renderer: None,
            imgui: None,
            viewer,
            cursor: Vec2::ZERO,
            last_frame: Instant::now(),
            error: None,
        }
    }

    fn create_imgui(window: &Window) -> ImguiState {
        let mut context = imgui::Context::create();
        let mut platform = WinitPlatform::new(&mut context);
        platform.attach_window(
            context.io_mut(),
            window,
            imgui_winit_support::HiDpiMode::Default,
        );

        let font_size = 14.0;
        context.fonts().add_font(&[FontSource::DefaultFontData {
            config: Some(FontConfig {
                oversample_h: 1,
                pixel_snap_h: true,
                size_pixels: font_size,
                ..Default::default()
            }),
        }]);

        // Disable INI support because it's broken in the published version of imgui
        context.set_ini_filename(None);

        ImguiState { context, platform }
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> anyhow::Result<()> {
        let window = event_loop
            .create_window(Window::default_attributes().with_title("Stretchview"))
            .context("Failed to create window")?;
        let window = Arc::new(window);

        let mut imgui = Self::create_imgui(&window);
        let render_config = RenderConfig::with_background(self.viewer.config.background);
        let renderer = pollster::block_on(Renderer::new(
            window.clone(),
            &self.viewer,
            render_config,
            &mut imgui.context,
        ))?;

        let size = window.inner_size();
        self.viewer
            .camera
            .set_resolution(Vec2::new(size.width as f32, size.height as f32));

        self.renderer = Some(renderer);
        self.imgui = Some(imgui);

        Ok(())
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: anyhow::Error) {
        log::error!("{:#}", error);
        self.error = Some(error);
        event_loop.exit();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.renderer.is_some() {
            return;
        }

        if let Err(e) = self.init(event_loop) {
            self.fail(event_loop, e);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let (Some(renderer), Some(imgui)) = (self.renderer.as_mut(), self.imgui.as_mut()) else {
            return;
        };

        imgui.platform.handle_event::<()>(
            imgui.context.io_mut(),
            &renderer.window,
            &Event::WindowEvent {
                window_id,
                event: event.clone(),
            },
        );
        let ui_wants_mouse = imgui.context.io().want_capture_mouse;

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                renderer.resize(new_size);
                self.viewer
                    .camera
                    .set_resolution(Vec2::new(new_size.width as f32, new_size.height as f32));
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = Vec2::new(position.x as f32, position.y as f32);
                let resolution = Vec2::new(renderer.size.width as f32, renderer.size.height as f32);
                self.viewer.cursor_moved(cursor_to_ndc(self.cursor, resolution));
                self.viewer.controls.cursor_moved(self.cursor);
            }
            WindowEvent::MouseInput { state, button, .. } => match (button, state) {
                (MouseButton::Right, ElementState::Pressed) if !ui_wants_mouse => {
                    self.viewer.pick();
                }
                (MouseButton::Left, ElementState::Pressed) if !ui_wants_mouse => {
                    self.viewer.controls.set_dragging(true);
                }
                (MouseButton::Left, ElementState::Released) => {
                    self.viewer.controls.set_dragging(false);
                }
                _ => (),
            },
            WindowEvent::MouseWheel { delta, .. } if !ui_wants_mouse => {
                let lines = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(position) => position.y as f32 / 40.0,
                };
                self.viewer.controls.scrolled(lines);
            }
            WindowEvent::RedrawRequested => {
                let delta_time = self.last_frame.elapsed();
                self.last_frame = Instant::now();
                imgui.context.io_mut().update_delta_time(delta_time);

                renderer.window.request_redraw();

                if let Err(e) = imgui
                    .platform
                    .prepare_frame(imgui.context.io_mut(), &renderer.window)
                {
                    log::error!("Failed to prepare imgui frame: {}", e);
                    return;
                }

                let ui = imgui.context.new_frame();

                if let Err(e) = engine::update(&mut self.viewer, ui, delta_time) {
                    log::error!("Error during engine::update: {:#}", e);
                }

                imgui.platform.prepare_render(ui, &renderer.window);

                match renderer.render(&self.viewer, &mut imgui.context) {
                    Ok(()) => (),
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        renderer.resize(renderer.size);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory");
                        event_loop.exit();
                    }
                    Err(wgpu::SurfaceError::Timeout) => {
                        log::warn!("Timeout");
                    }
                    Err(other) => {
                        log::error!("Unexpected error: {:?}", other);
                    }
                }
            }
            _ => (),
        }
    }
}

pub async fn run(config: ViewerConfig) -> anyhow::Result<()> {
    let event_loop = EventLoop::new().context("Failed to create event loop")?;
    let viewer = ViewerState::new(config);
    let mut app = App::new(viewer);
    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(error) => Err(error),
        None => Ok(()),
    }
}
