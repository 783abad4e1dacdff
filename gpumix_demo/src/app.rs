/// Window and event loop for the onscreen mode

use gpumix_engine::gpumix::{Error, Result};
use gpumix_engine::gpumix::render::{Config, TextureData, TextureFormat, Vertex};
use gpumix_engine::{engine_debug, engine_error, engine_info};
use gpumix_engine_renderer_vulkan::gpumix::{OnscreenRenderer, ShaderCode};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

/// Onscreen demo state
///
/// The renderer is declared before the window so it is dropped first.
struct OnscreenApp {
    config: Config,
    shaders: ShaderCode,
    texture: TextureData,
    renderer: Option<OnscreenRenderer>,
    window: Option<Window>,
    minimized: bool,
    frames: u64,
    error: Option<Error>,
}

impl OnscreenApp {
    fn create_renderer(&self, window: &Window) -> Result<OnscreenRenderer> {
        let mut renderer = OnscreenRenderer::new(window, self.config.clone(), &self.shaders)?;
        renderer.create_texture(self.texture.width(), self.texture.height(), TextureFormat::R8G8B8A8_UNORM)?;
        renderer.copy_texture_data(&self.texture)?;
        renderer.create_vertex_buffer(Vertex::STRIDE as u64 * Vertex::QUAD.len() as u64)?;
        renderer.update_vertex_data(&Vertex::QUAD)?;
        Ok(renderer)
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: Error) {
        engine_error!("gpumix::demo", "{}", error);
        self.error = Some(error);
        event_loop.exit();
    }
}

impl ApplicationHandler for OnscreenApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attributes = Window::default_attributes()
            .with_title("GpuMix")
            .with_inner_size(LogicalSize::new(800.0, 600.0));
        let window = match event_loop.create_window(attributes) {
            Ok(window) => window,
            Err(e) => {
                self.fail(event_loop, Error::InitializationFailed(format!("Failed to create window: {}", e)));
                return;
            }
        };

        match self.create_renderer(&window) {
            Ok(renderer) => {
                engine_info!("gpumix::demo", "Onscreen renderer ready ({} swap chain images)",
                    renderer.swapchain_image_count());
                self.renderer = Some(renderer);
                self.window = Some(window);
            }
            Err(e) => self.fail(event_loop, e),
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                engine_info!("gpumix::demo", "Window closed after {} frames", self.frames);
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                self.minimized = size.width == 0 || size.height == 0;
                if self.minimized {
                    return;
                }
                engine_debug!("gpumix::demo", "Window resized to {}x{}", size.width, size.height);
                if let Some(renderer) = self.renderer.as_mut() {
                    if let Err(e) = renderer.recreate_swapchain() {
                        self.fail(event_loop, e);
                    }
                }
            }
            WindowEvent::RedrawRequested => {
                if self.minimized {
                    return;
                }
                if let Some(renderer) = self.renderer.as_mut() {
                    match renderer.draw() {
                        Ok(_) => self.frames += 1,
                        Err(e) => self.fail(event_loop, e),
                    }
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = self.window.as_ref() {
            window.request_redraw();
        }
    }
}

/// Open the window and render until it is closed
pub fn run(config: Config, shaders: ShaderCode, texture: TextureData) -> Result<()> {
    let event_loop = EventLoop::new()
        .map_err(|e| Error::InitializationFailed(format!("Failed to create event loop: {}", e)))?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = OnscreenApp {
        config,
        shaders,
        texture,
        renderer: None,
        window: None,
        minimized: false,
        frames: 0,
        error: None,
    };

    event_loop.run_app(&mut app)
        .map_err(|e| Error::BackendError(format!("Event loop failed: {}", e)))?;

    // Renderer before window
    app.renderer = None;
    match app.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
