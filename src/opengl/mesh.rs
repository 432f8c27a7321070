use log::debug;

use super::api::{ElementsMode, GraphicsApi};
use crate::error::{Error, Result};
use crate::geometry::{CircleGeometry, FLOATS_PER_VERTEX};

/// Attribute location of `pos` in the vertex shader.
pub const POSITION_ATTRIBUTE: u32 = 0;

/// Vertex array and its backing buffer, uploaded once and drawn as is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mesh {
    vertex_array: u32,
    vertex_buffer: u32,
    vertex_count: i32,
    mode: ElementsMode,
}

impl Mesh {
    pub fn upload<A: GraphicsApi>(api: &A, geometry: &CircleGeometry) -> Result<Mesh> {
        let vertices = geometry.as_floats();
        let vertex_count = i32::try_from(geometry.vertex_count())
            .map_err(|_| Error::InvalidGeometry(geometry.vertex_count()))?;

        let vertex_array = api.create_vertex_array()?;
        api.bind_vertex_array(vertex_array)?;

        let vertex_buffer = api.create_buffer()?;
        api.bind_array_buffer(vertex_buffer)?;
        api.upload_static_floats(vertices)?;

        api.vertex_attrib_floats(POSITION_ATTRIBUTE, FLOATS_PER_VERTEX)?;
        api.enable_vertex_attrib(POSITION_ATTRIBUTE)?;

        api.bind_array_buffer(0)?;
        api.bind_vertex_array(0)?;

        debug!(
            "Uploaded {} floats to buffer {vertex_buffer} (vertex array {vertex_array})",
            vertices.len()
        );
        Ok(Mesh {
            vertex_array,
            vertex_buffer,
            vertex_count,
            mode: ElementsMode::TriangleFan,
        })
    }

    pub fn vertex_array(&self) -> u32 {
        self.vertex_array
    }

    pub fn vertex_buffer(&self) -> u32 {
        self.vertex_buffer
    }

    pub fn vertex_count(&self) -> i32 {
        self.vertex_count
    }

    pub fn mode(&self) -> ElementsMode {
        self.mode
    }

    /// Binds the vertex array, draws every vertex and unbinds again.
    pub fn draw<A: GraphicsApi>(&self, api: &A) -> Result<()> {
        api.bind_vertex_array(self.vertex_array)?;
        api.draw_arrays(self.mode, 0, self.vertex_count)?;
        api.bind_vertex_array(0)?;
        Ok(())
    }

    pub fn delete<A: GraphicsApi>(self, api: &A) -> Result<()> {
        api.delete_buffer(self.vertex_buffer)?;
        api.delete_vertex_array(self.vertex_array)?;
        Ok(())
    }
}
