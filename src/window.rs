use std::io::ErrorKind;

use glcore::GLCore;
use log::{debug, info, trace};
use wayland_client::backend::WaylandError;
use wayland_client::protocol::wl_surface::WlSurface;
use wayland_client::{Connection, EventQueue};
use wayland_protocols::xdg::shell::client::{xdg_surface::XdgSurface, xdg_toplevel::XdgToplevel};

use crate::config::{AppConfig, WindowSize};
use crate::error::Result;
use crate::gpu_surface::{GlAbstraction, GpuSurface};
use crate::state::WaylandState;

/// Non-blocking socket calls report an empty or full buffer as `WouldBlock`.
fn ignore_would_block<T>(result: std::result::Result<T, WaylandError>) -> Result<()> {
    match result {
        Ok(_) => Ok(()),
        Err(WaylandError::Io(err)) if err.kind() == ErrorKind::WouldBlock => Ok(()),
        Err(err) => Err(err.into()),
    }
}

/// What the render loop needs from the platform window.
pub trait Window {
    /// Handles whatever input and window events arrived since the last call.
    fn poll_events(&mut self) -> Result<()>;

    fn close_requested(&self) -> bool;

    /// Presents the back buffer.
    fn swap_buffers(&mut self) -> Result<()>;

    /// New framebuffer size, if the window was resized since the last call.
    fn take_resize(&mut self) -> Option<WindowSize> {
        None
    }
}

/// An `xdg_toplevel` with an EGL OpenGL context attached to it.
pub struct WaylandWindow {
    // fields drop in order: EGL lets go of the surface before the connection closes
    gpu: GpuSurface,
    size: WindowSize,
    _toplevel: XdgToplevel,
    _xdg_surface: XdgSurface,
    _surface: WlSurface,
    state: WaylandState,
    event_queue: EventQueue<WaylandState>,
    connection: Connection,
}

impl WaylandWindow {
    pub fn open(config: &AppConfig) -> Result<WaylandWindow> {
        let connection = Connection::connect_to_env()?;

        let display = connection.display();
        let mut event_queue = connection.new_event_queue();
        let queue_handle = event_queue.handle();

        display.get_registry(&queue_handle, ());

        let mut state = WaylandState::new();
        event_queue.roundtrip(&mut state)?;
        let protocols = state.protocols()?.clone();
        debug!("Bound wl_compositor and xdg_wm_base");

        let surface = protocols.get_compositor().create_surface(&queue_handle, ());
        let xdg_surface = protocols
            .get_wm_base()
            .get_xdg_surface(&surface, &queue_handle, ());
        let toplevel = xdg_surface.get_toplevel(&queue_handle, ());
        toplevel.set_title(config.title.clone());
        toplevel.set_app_id(config.app_id.clone());
        surface.commit();

        while !state.configured {
            event_queue.blocking_dispatch(&mut state)?;
        }

        let size = state.take_pending_size().unwrap_or(config.size);
        let gl = GlAbstraction::new(&connection)?;
        let gpu = GpuSurface::new(&gl, &surface, size, config.gl)?;
        info!(
            "Opened window '{}' ({}x{})",
            config.title, size.width, size.height
        );

        Ok(WaylandWindow {
            gpu,
            size,
            _toplevel: toplevel,
            _xdg_surface: xdg_surface,
            _surface: surface,
            state,
            event_queue,
            connection,
        })
    }

    pub fn get_renderer(&self) -> GLCore {
        self.gpu.get_renderer()
    }

    pub fn size(&self) -> WindowSize {
        self.size
    }
}

impl Window for WaylandWindow {
    fn poll_events(&mut self) -> Result<()> {
        // a full socket buffer is flushed again on the next poll
        ignore_would_block(self.connection.flush())?;
        if let Some(guard) = self.event_queue.prepare_read() {
            ignore_would_block(guard.read())?;
        }
        let dispatched = self.event_queue.dispatch_pending(&mut self.state)?;
        if dispatched > 0 {
            trace!("Dispatched {dispatched} events");
        }
        Ok(())
    }

    fn close_requested(&self) -> bool {
        self.state.close_requested
    }

    fn swap_buffers(&mut self) -> Result<()> {
        self.gpu.swap_buffers()
    }

    fn take_resize(&mut self) -> Option<WindowSize> {
        let size = self.state.take_pending_size()?;
        if size == self.size {
            return None;
        }
        self.gpu.resize(size.width, size.height);
        self.size = size;
        debug!("Resized surface to {}x{}", size.width, size.height);
        Some(size)
    }
}
