use log::{debug, info};
use wayland_client::{
    self, Connection, Dispatch, QueueHandle, delegate_noop,
    protocol::{
        wl_compositor::WlCompositor,
        wl_registry::{self, WlRegistry},
        wl_surface::WlSurface,
    },
};
use wayland_protocols::xdg::shell::client::{
    xdg_surface::{self, XdgSurface},
    xdg_toplevel::{self, XdgToplevel},
    xdg_wm_base::{self, XdgWmBase},
};

use crate::config::WindowSize;
use crate::error::{Error, Result};

#[derive(Debug, Clone, Default)]
pub struct UnboundProtocols {
    compositor: Option<WlCompositor>,
    wm_base: Option<XdgWmBase>,
}

impl UnboundProtocols {
    fn finalize(&mut self) -> Option<BoundProtocols> {
        match (&self.compositor, &self.wm_base) {
            (Some(compositor), Some(wm_base)) => Some(BoundProtocols {
                compositor: compositor.clone(),
                wm_base: wm_base.clone(),
            }),
            _ => None,
        }
    }

    /// Name of the first global the compositor never advertised.
    pub fn missing(&self) -> Option<&'static str> {
        if self.compositor.is_none() {
            Some("wl_compositor")
        } else if self.wm_base.is_none() {
            Some("xdg_wm_base")
        } else {
            None
        }
    }
}

#[derive(Debug, Clone)]
pub struct BoundProtocols {
    compositor: WlCompositor,
    wm_base: XdgWmBase,
}

impl BoundProtocols {
    pub fn get_compositor(&self) -> &WlCompositor {
        &self.compositor
    }

    pub fn get_wm_base(&self) -> &XdgWmBase {
        &self.wm_base
    }
}

/// Everything the Wayland event handlers write to.
#[derive(Debug, Default)]
pub struct WaylandState {
    pub unbound: UnboundProtocols,
    pub bound: Option<BoundProtocols>,
    /// Set once the first `xdg_surface.configure` was acknowledged.
    pub configured: bool,
    pub close_requested: bool,
    pub pending_size: Option<WindowSize>,
}

impl WaylandState {
    pub fn new() -> WaylandState {
        WaylandState::default()
    }

    pub fn protocols(&self) -> Result<&BoundProtocols> {
        self.bound
            .as_ref()
            .ok_or(Error::MissingGlobal(self.unbound.missing().unwrap_or("globals")))
    }

    pub fn take_pending_size(&mut self) -> Option<WindowSize> {
        self.pending_size.take()
    }
}

impl Dispatch<WlRegistry, ()> for WaylandState {
    fn event(
        state: &mut Self,
        proxy: &WlRegistry,
        event: wl_registry::Event,
        _data: &(),
        _conn: &Connection,
        qhandle: &QueueHandle<Self>,
    ) {
        if let wl_registry::Event::Global {
            name,
            interface,
            version,
        } = event
        {
            match interface.as_str() {
                "wl_compositor" => {
                    state.unbound.compositor =
                        Some(proxy.bind::<WlCompositor, _, _>(name, version.min(4), qhandle, ()));
                    state.bound = state.unbound.finalize();
                }
                "xdg_wm_base" => {
                    state.unbound.wm_base =
                        Some(proxy.bind::<XdgWmBase, _, _>(name, version.min(2), qhandle, ()));
                    state.bound = state.unbound.finalize();
                }
                _ => {}
            }
        }
    }
}

impl Dispatch<XdgWmBase, ()> for WaylandState {
    fn event(
        _state: &mut Self,
        proxy: &XdgWmBase,
        event: xdg_wm_base::Event,
        _data: &(),
        _conn: &Connection,
        _qhandle: &QueueHandle<Self>,
    ) {
        if let xdg_wm_base::Event::Ping { serial } = event {
            proxy.pong(serial);
        }
    }
}

impl Dispatch<XdgSurface, ()> for WaylandState {
    fn event(
        state: &mut Self,
        proxy: &XdgSurface,
        event: xdg_surface::Event,
        _data: &(),
        _conn: &Connection,
        _qhandle: &QueueHandle<Self>,
    ) {
        if let xdg_surface::Event::Configure { serial } = event {
            proxy.ack_configure(serial);
            if !state.configured {
                debug!("First configure acknowledged");
            }
            state.configured = true;
        }
    }
}

impl Dispatch<XdgToplevel, ()> for WaylandState {
    fn event(
        state: &mut Self,
        _proxy: &XdgToplevel,
        event: xdg_toplevel::Event,
        _data: &(),
        _conn: &Connection,
        _qhandle: &QueueHandle<Self>,
    ) {
        match event {
            xdg_toplevel::Event::Configure { width, height, .. } => {
                // 0x0 leaves the size up to the client
                if let (Ok(width), Ok(height)) = (u32::try_from(width), u32::try_from(height))
                    && let Some(size) = WindowSize::new(width, height)
                {
                    state.pending_size = Some(size);
                }
            }
            xdg_toplevel::Event::Close => {
                info!("Close requested by the compositor");
                state.close_requested = true;
            }
            _ => {}
        }
    }
}

delegate_noop!(WaylandState: ignore WlCompositor);
delegate_noop!(WaylandState: ignore WlSurface);
