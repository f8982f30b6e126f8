use std::ffi::CStr;
use std::num::NonZeroU32;
use std::rc::Rc;
use std::sync::Arc;

use glow::HasContext;
use glutin::{
    config::ConfigTemplateBuilder,
    context::{ContextApi, ContextAttributesBuilder, GlProfile, PossiblyCurrentContext, Version},
    display::{Display, DisplayApiPreference},
    prelude::*,
    surface::{Surface, SurfaceAttributesBuilder, SwapInterval, WindowSurface},
};
use log::{debug, warn};
use raw_window_handle::{HasDisplayHandle, HasWindowHandle};
use winit::window::{CursorGrabMode, Window};

use crate::error::ContextError;

/// A winit window with a current OpenGL 3.3 core context
// Field order is drop order: GL objects go before the context, the context before the window.
pub struct GlWindow {
    gl: Rc<glow::Context>,
    context: PossiblyCurrentContext,
    surface: Surface<WindowSurface>,
    window: Arc<Window>,
}

impl GlWindow {
    pub fn new(window: Arc<Window>, vsync: bool) -> Result<Self, ContextError> {
        let display_handle = window.display_handle()?.as_raw();

        #[cfg(target_os = "windows")]
        let preference = DisplayApiPreference::Wgl(None);
        #[cfg(target_os = "macos")]
        let preference = DisplayApiPreference::Cgl;
        #[cfg(all(unix, not(target_os = "macos")))]
        let preference = DisplayApiPreference::Egl;

        let display = unsafe { Display::new(display_handle, preference)? };

        let template = ConfigTemplateBuilder::new()
            .with_alpha_size(0)
            .with_depth_size(24)
            .with_transparency(false)
            .build();
        let config = unsafe { display.find_configs(template)?.next() }.ok_or(ContextError::NoConfig)?;

        let (width, height): (u32, u32) = window.inner_size().into();
        let (width, height) = match (NonZeroU32::new(width), NonZeroU32::new(height)) {
            (Some(w), Some(h)) => (w, h),
            _ => return Err(ContextError::ZeroSize),
        };

        let raw_window_handle = window.window_handle()?.as_raw();
        let surface_attributes =
            SurfaceAttributesBuilder::<WindowSurface>::new().build(raw_window_handle, width, height);
        let surface = unsafe { display.create_window_surface(&config, &surface_attributes)? };

        let context_attributes = ContextAttributesBuilder::new()
            .with_context_api(ContextApi::OpenGl(Some(Version::new(3, 3))))
            .with_profile(GlProfile::Core)
            .build(Some(raw_window_handle));
        let context =
            unsafe { display.create_context(&config, &context_attributes)? }.make_current(&surface)?;

        let interval = match (vsync, NonZeroU32::new(1)) {
            (true, Some(one)) => SwapInterval::Wait(one),
            _ => SwapInterval::DontWait,
        };
        if let Err(e) = surface.set_swap_interval(&context, interval) {
            warn!("Failed to set swap interval (VSync): {:?}", e);
        } else {
            debug!("VSync {}", if vsync { "on" } else { "off" });
        }

        let gl = unsafe {
            glow::Context::from_loader_function_cstr(|s: &CStr| display.get_proc_address(s))
        };

        Ok(Self {
            gl: Rc::new(gl),
            context,
            surface,
            window,
        })
    }

    pub fn gl(&self) -> &Rc<glow::Context> {
        &self.gl
    }

    fn inner_size(&self) -> (u32, u32) {
        self.window.inner_size().into()
    }

    pub fn aspect_ratio(&self) -> f32 {
        let (width, height) = self.inner_size();
        if height == 0 {
            1.0
        } else {
            width as f32 / height as f32
        }
    }

    pub fn resize(&self, width: u32, height: u32) {
        let (Some(w), Some(h)) = (NonZeroU32::new(width), NonZeroU32::new(height)) else {
            debug!("Ignoring resize to zero dimensions");
            return;
        };
        self.surface.resize(&self.context, w, h);
        unsafe {
            self.gl.viewport(0, 0, width as i32, height as i32);
        }
    }

    pub fn swap_buffers(&self) -> Result<(), ContextError> {
        self.surface.swap_buffers(&self.context)?;
        Ok(())
    }

    pub fn request_redraw(&self) {
        self.window.request_redraw();
    }

    /// Hide and grab the cursor for mouse look
    pub fn set_cursor_captured(&self, captured: bool) {
        let result = if captured {
            self.window
                .set_cursor_grab(CursorGrabMode::Confined)
                .or_else(|_| self.window.set_cursor_grab(CursorGrabMode::Locked))
        } else {
            self.window.set_cursor_grab(CursorGrabMode::None)
        };
        if let Err(e) = result {
            warn!("Cursor grab not supported: {}", e);
        }
        self.window.set_cursor_visible(!captured);
    }
}
