use glcore::GLCoreError;

pub mod api;
pub mod mesh;
pub mod shaders;

pub type GlResult<T> = Result<T, GLCoreError>;
