use log::{debug, trace, warn};

use crate::config::{AppConfig, WindowSize};
use crate::error::Result;
use crate::geometry::CircleGeometry;
use crate::opengl::api::GraphicsApi;
use crate::opengl::mesh::Mesh;
use crate::opengl::shaders::{
    ShaderProgram, build_program, builtin, release_after_failure,
};

/// Owns every GPU object the program draws with. Objects are released when
/// the renderer is dropped, so it must go before the context does.
pub struct Renderer<A: GraphicsApi> {
    api: A,
    program: ShaderProgram,
    mesh: Mesh,
    clear_color: [f32; 4],
}

impl<A: GraphicsApi> Renderer<A> {
    /// Uploads the configured circle and builds the builtin shader pair.
    pub fn new(api: A, config: &AppConfig) -> Result<Renderer<A>> {
        let geometry = CircleGeometry::new(config.segments, config.radius)?;
        Renderer::with_sources(
            api,
            &geometry,
            builtin::CIRCLE_VERTEX,
            builtin::CIRCLE_FRAGMENT,
            config.clear_color,
        )
    }

    pub fn with_sources(
        api: A,
        geometry: &CircleGeometry,
        vertex: &str,
        fragment: &str,
        clear_color: [f32; 4],
    ) -> Result<Renderer<A>> {
        let mesh = Mesh::upload(&api, geometry)?;
        let program = match build_program(&api, vertex, fragment) {
            Ok(program) => program,
            Err(err) => {
                release_after_failure(mesh.delete(&api), "vertex data");
                return Err(err);
            }
        };
        debug!(
            "Renderer ready: program {}, {} vertices",
            program.id(),
            mesh.vertex_count()
        );

        Ok(Renderer {
            api,
            program,
            mesh,
            clear_color,
        })
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn program(&self) -> ShaderProgram {
        self.program
    }

    pub fn mesh(&self) -> Mesh {
        self.mesh
    }

    pub fn resize(&self, size: WindowSize) -> Result<()> {
        let width = i32::try_from(size.width.get()).unwrap_or(i32::MAX);
        let height = i32::try_from(size.height.get()).unwrap_or(i32::MAX);
        self.api.viewport(0, 0, width, height)?;
        debug!("Viewport set to {width}x{height}");
        Ok(())
    }

    /// Clears the color buffer and draws the mesh once.
    pub fn render_frame(&self) -> Result<()> {
        let [r, g, b, a] = self.clear_color;
        self.api.clear_color(r, g, b, a)?;
        self.api.clear_color_buffer()?;

        self.program.use_program(&self.api)?;
        self.mesh.draw(&self.api)?;
        ShaderProgram::unuse(&self.api)?;

        trace!("Drew {} vertices", self.mesh.vertex_count());
        Ok(())
    }
}

impl<A: GraphicsApi> Drop for Renderer<A> {
    fn drop(&mut self) {
        if let Err(err) = self.mesh.delete(&self.api) {
            warn!("Failed releasing vertex data: {err}");
        }
        if let Err(err) = self.program.delete(&self.api) {
            warn!("Failed releasing shader program: {err}");
        }
    }
}
