use std::ffi::{CString, c_void};
use std::num::NonZero;
use std::ptr::NonNull;

use glcore::GLCore;
use glutin::config::{Api, Config, ConfigTemplateBuilder, GlConfig};
use glutin::context::{
    ContextApi, ContextAttributesBuilder, GlProfile, NotCurrentContext, PossiblyCurrentContext,
    Version,
};
use glutin::display::{Display, DisplayApiPreference};
use glutin::error::{Error as GlutError, ErrorKind as GlutErrorKind};
use glutin::prelude::{GlDisplay, NotCurrentGlContext};
use glutin::surface::{GlSurface, Surface, SurfaceAttributesBuilder, WindowSurface};
use log::{debug, info};
use raw_window_handle::{HasDisplayHandle, RawWindowHandle, WaylandWindowHandle};
use wayland_client::Connection;
use wayland_client::Proxy;
use wayland_client::protocol::wl_surface::WlSurface;

use crate::config::{GlVersion, WindowSize};
use crate::error::{Error, Result};

/// EGL display bound to the Wayland connection.
#[derive(Debug, Clone)]
pub struct GlAbstraction {
    display: Display,
}

impl GlAbstraction {
    pub fn new(connection: &Connection) -> std::result::Result<Self, GlutError> {
        let backend = connection.backend();
        let raw_display_handle = match backend.display_handle() {
            Ok(handle) => handle,
            Err(_) => {
                return Err(GlutError::from(GlutErrorKind::BadDisplay));
            }
        }
        .as_raw();
        let display = unsafe { Display::new(raw_display_handle, DisplayApiPreference::Egl) }?;
        Ok(GlAbstraction { display })
    }

    /// Picks the RGB8 desktop GL config with the most samples.
    fn find_config(&self) -> std::result::Result<Config, GlutError> {
        let config_template = ConfigTemplateBuilder::new()
            .with_buffer_type(glutin::config::ColorBufferType::Rgb {
                r_size: 8,
                g_size: 8,
                b_size: 8,
            })
            .with_api(Api::OPENGL)
            .build();
        unsafe { self.display.find_configs(config_template) }?
            .reduce(
                |config, best| match config.num_samples() > best.num_samples() {
                    true => config,
                    false => best,
                },
            )
            .ok_or(GlutError::from(GlutErrorKind::BadConfig))
    }

    fn create_context(
        &self,
        config: &Config,
        window_handle: RawWindowHandle,
        version: GlVersion,
    ) -> std::result::Result<NotCurrentContext, GlutError> {
        let profile = match version.core_profile {
            true => GlProfile::Core,
            false => GlProfile::Compatibility,
        };
        let context_attrs = ContextAttributesBuilder::new()
            .with_context_api(ContextApi::OpenGl(Some(Version::new(
                version.major,
                version.minor,
            ))))
            .with_profile(profile)
            .build(Some(window_handle));
        unsafe { self.display.create_context(config, &context_attrs) }
    }

    fn create_surface(
        &self,
        config: &Config,
        window_handle: RawWindowHandle,
        size: WindowSize,
    ) -> std::result::Result<Surface<WindowSurface>, GlutError> {
        let surface_attrs = SurfaceAttributesBuilder::<WindowSurface>::new().build(
            window_handle,
            size.width,
            size.height,
        );
        unsafe { self.display.create_window_surface(config, &surface_attrs) }
    }
}

fn wayland_window_handle(surface: &WlSurface) -> std::result::Result<RawWindowHandle, GlutError> {
    let surface_ptr = NonNull::new(surface.id().as_ptr() as *mut c_void)
        .ok_or(GlutError::from(GlutErrorKind::BadNativeWindow))?;
    Ok(RawWindowHandle::Wayland(WaylandWindowHandle::new(
        surface_ptr,
    )))
}

/// A current GL context drawing into a Wayland surface.
pub struct GpuSurface {
    context: PossiblyCurrentContext,
    surface: Surface<WindowSurface>,
    renderer: GLCore,
}

impl GpuSurface {
    pub fn new(
        abstraction: &GlAbstraction,
        surface: &WlSurface,
        size: WindowSize,
        version: GlVersion,
    ) -> Result<GpuSurface> {
        let window_handle = wayland_window_handle(surface)?;
        let config = abstraction.find_config()?;
        let not_context = abstraction.create_context(&config, window_handle, version)?;
        let surface = abstraction.create_surface(&config, window_handle, size)?;
        let context = not_context.make_current(&surface)?;
        info!(
            "Created OpenGL {}.{} context on a {}x{} surface",
            version.major, version.minor, size.width, size.height
        );

        let renderer = GLCore::new(|fn_name| match CString::new(fn_name) {
            Ok(c_str) => abstraction.display.get_proc_address(&c_str),
            Err(_) => std::ptr::null(),
        })
        .map_err(|_| Error::Loader)?;
        debug!("Loaded OpenGL function pointers");

        Ok(GpuSurface {
            context,
            surface,
            renderer,
        })
    }

    pub fn resize(&mut self, width: NonZero<u32>, height: NonZero<u32>) {
        self.surface.resize(&self.context, width, height);
    }

    pub fn swap_buffers(&mut self) -> Result<()> {
        self.surface.swap_buffers(&self.context)?;
        Ok(())
    }

    pub fn get_renderer(&self) -> GLCore {
        self.renderer
    }
}
