use log::{debug, info};

use crate::config::AppConfig;
use crate::error::Result;
use crate::opengl::api::GraphicsApi;
use crate::renderer::Renderer;
use crate::window::{WaylandWindow, Window};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderState {
    Running,
    Closed,
}

impl RenderState {
    /// `Closed` is terminal: once reached, no flag value leads back.
    pub fn advance(self, close_requested: bool) -> RenderState {
        match (self, close_requested) {
            (RenderState::Closed, _) | (RenderState::Running, true) => RenderState::Closed,
            (RenderState::Running, false) => RenderState::Running,
        }
    }
}

/// Draws frames until the window asks to close. Returns how many frames were
/// presented.
pub fn run_loop<W, A>(window: &mut W, renderer: &Renderer<A>) -> Result<u64>
where
    W: Window,
    A: GraphicsApi,
{
    let mut state = RenderState::Running;
    let mut frames = 0;

    loop {
        state = state.advance(window.close_requested());
        if state == RenderState::Closed {
            break;
        }

        window.poll_events()?;
        if let Some(size) = window.take_resize() {
            renderer.resize(size)?;
        }
        renderer.render_frame()?;
        window.swap_buffers()?;
        frames += 1;
    }

    info!("Window closed after {frames} frames");
    Ok(frames)
}

/// Opens the window, prepares the GPU objects and runs until closed.
pub fn run(config: &AppConfig) -> Result<u64> {
    let mut window = WaylandWindow::open(config)?;
    let renderer = Renderer::new(window.get_renderer(), config)?;
    renderer.resize(window.size())?;
    debug!(
        "Drawing a {}-point circle, radius {}",
        config.segments, config.radius
    );

    run_loop(&mut window, &renderer)
}
