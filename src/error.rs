use thiserror::Error;

use crate::opengl::shaders::ShaderKind;

#[derive(Debug, Error)]
pub enum Error {
    #[error("OpenGL call failed: {0:?}")]
    Gl(glcore::GLCoreError),

    #[error("EGL context error: {0}")]
    Glutin(#[from] glutin::error::Error),

    #[error("unable to connect to the Wayland display: {0}")]
    Connect(#[from] wayland_client::ConnectError),

    #[error("Wayland dispatch failed: {0}")]
    Dispatch(#[from] wayland_client::DispatchError),

    #[error("Wayland connection failed: {0}")]
    Wayland(#[from] wayland_client::backend::WaylandError),

    #[error("compositor does not advertise {0}")]
    MissingGlobal(&'static str),

    #[error("OpenGL function pointers could not be loaded")]
    Loader,

    #[error("circle needs at least 3 points to form a fan, got {0}")]
    InvalidGeometry(usize),

    #[error("failed compiling the {kind} shader: {log}")]
    ShaderCompile { kind: ShaderKind, log: String },

    #[error("glCreateProgram returned no program")]
    ProgramCreation,

    #[error("failed linking program: {log}")]
    ShaderLink { log: String },

    #[error("failed validating program: {log}")]
    ShaderValidate { log: String },
}

impl From<glcore::GLCoreError> for Error {
    fn from(value: glcore::GLCoreError) -> Self {
        Error::Gl(value)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
