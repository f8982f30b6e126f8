use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use glow::HasContext;
use log::{debug, error, info};
use winit::{
    application::ApplicationHandler,
    event::*,
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use gl_sandbox::cli::Cli;
use gl_sandbox::config::{AppConfig, TextureConfig};
use gl_sandbox::core::clock::{Clock, FpsCounter};
use gl_sandbox::core::controller::{Button, Controller};
use gl_sandbox::core::gl_backend::log_driver_info;
use gl_sandbox::core::gl_context::GlWindow;
use gl_sandbox::core::input_adapter::WinitController;
use gl_sandbox::core::mesh::{Mesh, VertexLayout};
use gl_sandbox::core::texture::Texture;
use gl_sandbox::scene::{cube_model_matrix, CLEAR_COLOR, CUBE_ATTRIBUTES, CUBE_POSITIONS, CUBE_VERTICES};
use gl_sandbox::{FreeCamera, ShaderProgram};

// === Constants ===

const FPS_UPDATE_INTERVAL: f32 = 1.0;
/// Field-of-view change per second while an arrow key is held, in degrees.
/// The keys move the same clamped zoom as the scroll wheel, so Up does nothing
/// at the widest zoom (45 by default) and Down nothing at the narrowest.
const ZOOM_KEY_RATE: f32 = 10.0;
const TEXTURE_MIX: f32 = 0.2;

/// GL resources for the cube scene
// The window owns the context, so it is declared last and dropped last.
struct Renderer {
    program: ShaderProgram<glow::Context>,
    mesh: Mesh,
    textures: Vec<(Texture, TextureConfig)>,
    window: GlWindow,
}

impl Renderer {
    fn new(window: Arc<Window>, config: &AppConfig) -> Result<Self> {
        let window =
            GlWindow::new(window, config.window.vsync).context("Failed to create OpenGL context")?;
        let gl = window.gl().clone();
        log_driver_info(&gl);

        let program = ShaderProgram::from_files(
            gl.clone(),
            &config.shaders.vertex,
            &config.shaders.fragment,
        )
        .context("Failed to build shader program")?;

        // `program` is dropped before `window` if this fails
        let mesh = Mesh::new(&gl, &CUBE_VERTICES, &VertexLayout::packed(&CUBE_ATTRIBUTES))
            .map_err(anyhow::Error::msg)
            .context("Failed to upload cube mesh")?;

        let textures: Vec<_> = config
            .textures
            .iter()
            .map(|t| (Texture::load(&gl, &t.path, t.layout), t.clone()))
            .collect();

        unsafe {
            gl.enable(glow::DEPTH_TEST);
        }

        program.use_program();
        for (_, texture) in &textures {
            program.set_int(&texture.uniform, texture.unit as i32);
        }
        program.set_float("mixValue", TEXTURE_MIX);

        Ok(Self {
            program,
            mesh,
            textures,
            window,
        })
    }

    fn textured(&self) -> bool {
        !self.textures.is_empty() && self.textures.iter().all(|(t, _)| t.is_loaded())
    }

    fn render(&self, camera: &FreeCamera, time: f32) -> Result<()> {
        let gl = self.window.gl();
        let [r, g, b, a] = CLEAR_COLOR;
        unsafe {
            gl.clear_color(r, g, b, a);
            gl.clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);
        }

        self.program.use_program();
        self.program.set_bool("useTexture", self.textured());
        for (texture, config) in &self.textures {
            texture.bind(gl, config.unit);
        }

        self.program.set_mat4("view", camera.view_matrix());
        self.program
            .set_mat4("projection", camera.projection_matrix(self.window.aspect_ratio()));

        for index in 0..CUBE_POSITIONS.len() {
            self.program.set_mat4("model", cube_model_matrix(index, time));
            self.mesh.draw(gl);
        }

        self.window.swap_buffers()?;
        Ok(())
    }

    fn destroy(self) {
        info!("Releasing GL resources");
        let gl = self.window.gl().clone();
        self.mesh.destroy(&gl);
        for (texture, _) in self.textures {
            texture.destroy(&gl);
        }
        self.program.destroy();
    }
}

struct App {
    config: AppConfig,
    renderer: Option<Renderer>,
    camera: FreeCamera,
    controller: WinitController,
    clock: Clock,
    fps: FpsCounter,
    cursor_captured: bool,
    startup_error: Option<anyhow::Error>,
}

impl App {
    fn new(config: AppConfig) -> Self {
        Self {
            camera: FreeCamera::from_config(&config.camera),
            cursor_captured: config.window.capture_cursor,
            config,
            renderer: None,
            controller: WinitController::new(),
            clock: Clock::new(),
            fps: FpsCounter::new(FPS_UPDATE_INTERVAL),
            startup_error: None,
        }
    }

    fn create_window(&self, event_loop: &ActiveEventLoop) -> Result<Arc<Window>> {
        let attributes = Window::default_attributes()
            .with_title(self.config.window.title.clone())
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.config.window.width,
                self.config.window.height,
            ));
        let window = event_loop
            .create_window(attributes)
            .context("Failed to create window")?;
        Ok(Arc::new(window))
    }

    fn set_cursor_captured(&mut self, captured: bool) {
        self.cursor_captured = captured;
        self.controller.set_captured(captured);
        if let Some(renderer) = &self.renderer {
            renderer.window.set_cursor_captured(captured);
        }
    }

    /// Feed this frame's input into the camera
    fn apply_input(&mut self, delta: f32) {
        for button in self.controller.get_down_keys() {
            if let Some(movement) = button.movement() {
                self.camera.process_keyboard(movement, delta);
            }
        }

        if self.controller.is_down(Button::ArrowUp) {
            self.camera.process_mouse_scroll(-ZOOM_KEY_RATE * delta);
        }
        if self.controller.is_down(Button::ArrowDown) {
            self.camera.process_mouse_scroll(ZOOM_KEY_RATE * delta);
        }

        // Raw motion while captured, cursor positions otherwise
        let (dx, dy) = self.controller.mouse_delta();
        if dx != 0.0 || dy != 0.0 {
            // Window y grows downward; pitch grows upward
            self.camera.process_mouse_movement(dx, -dy, true);
        }

        let scroll = self.controller.scroll_delta();
        if scroll != 0.0 {
            self.camera.process_mouse_scroll(scroll);
        }

        self.controller.reset_deltas();
    }

    fn redraw(&mut self) {
        let timing = self.clock.tick();
        if let Some(fps) = self.fps.tick(timing.delta) {
            debug!("FPS: {:.1}", fps);
        }

        self.apply_input(timing.delta);

        if let Some(renderer) = &self.renderer {
            if let Err(e) = renderer.render(&self.camera, timing.elapsed) {
                error!("Render error: {:#}", e);
            }
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.renderer.is_some() {
            return;
        }

        let renderer = self
            .create_window(event_loop)
            .and_then(|window| Renderer::new(window, &self.config));
        match renderer {
            Ok(renderer) => {
                self.renderer = Some(renderer);
                self.set_cursor_captured(self.cursor_captured);
                self.clock.reset();
            }
            Err(e) => {
                error!("{:#}", e);
                self.startup_error = Some(e);
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        self.controller.process_event(&event);

        match event {
            WindowEvent::CloseRequested
            | WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        ..
                    },
                ..
            } => event_loop.exit(),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(KeyCode::Tab),
                        repeat: false,
                        ..
                    },
                ..
            } => self.set_cursor_captured(!self.cursor_captured),
            WindowEvent::Resized(size) => {
                if let Some(renderer) = &self.renderer {
                    renderer.window.resize(size.width, size.height);
                }
            }
            WindowEvent::RedrawRequested => self.redraw(),
            _ => {}
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: DeviceId,
        event: DeviceEvent,
    ) {
        self.controller.process_device_event(&event);
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(renderer) = &self.renderer {
            renderer.window.request_redraw();
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(renderer) = self.renderer.take() {
            renderer.destroy();
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = AppConfig::resolve(&cli)?;

    let event_loop = EventLoop::new()?;
    let mut app = App::new(config);

    info!("Controls: WASD move, mouse look, scroll or Up/Down zoom, Tab frees the cursor, Escape quits");
    event_loop.run_app(&mut app)?;

    match app.startup_error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
