use std::ffi::CString;
use std::fmt;

use glcore::GLCoreError;
use log::{debug, error, warn};

use super::api::GraphicsApi;
use crate::error::{Error, Result};

/// Sources for the flat red circle.
pub mod builtin {
    pub const CIRCLE_VERTEX: &str = include_str!("shaders/circle.vert");
    pub const CIRCLE_FRAGMENT: &str = include_str!("shaders/circle.frag");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgramValidation {
    Vertex,
    Fragment,
    Linking,
    Validating,
}

impl ProgramValidation {
    fn label(self) -> &'static str {
        match self {
            ProgramValidation::Vertex => "compiling vertex",
            ProgramValidation::Fragment => "compiling fragment",
            ProgramValidation::Linking => "linking shaders",
            ProgramValidation::Validating => "validating program",
        }
    }

    pub fn pname(self) -> u32 {
        match self {
            ProgramValidation::Vertex | ProgramValidation::Fragment => glcore::GL_COMPILE_STATUS,
            ProgramValidation::Linking => glcore::GL_LINK_STATUS,
            ProgramValidation::Validating => glcore::GL_VALIDATE_STATUS,
        }
    }

    fn is_program(self) -> bool {
        matches!(
            self,
            ProgramValidation::Linking | ProgramValidation::Validating
        )
    }
}

/// Reads the status flag for `validate_type`. Returns the info log when the
/// step failed.
fn validate_shader_step<A: GraphicsApi>(
    api: &A,
    shader_or_program: u32,
    validate_type: ProgramValidation,
) -> Result<Option<String>> {
    let pname = validate_type.pname();
    let status = match validate_type.is_program() {
        true => api.program_parameter(shader_or_program, pname)?,
        false => api.shader_parameter(shader_or_program, pname)?,
    };
    if status != 0 {
        return Ok(None);
    }

    let mut log = match validate_type.is_program() {
        true => api.program_info_log(shader_or_program)?,
        false => api.shader_info_log(shader_or_program)?,
    };
    if log.is_empty() {
        log = "no info log available".to_owned();
    }
    error!("Failed {}: '{log}'", validate_type.label());
    Ok(Some(log))
}

/// Releases on a failure path. A failing delete is only logged so the caller
/// still gets the error that caused the cleanup.
pub(crate) fn release_after_failure<E: fmt::Debug>(
    result: std::result::Result<(), E>,
    what: &str,
) {
    if let Err(err) = result {
        warn!("Failed releasing {what}: {err:?}");
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderKind {
    Vertex,
    Fragment,
}

impl ShaderKind {
    pub fn kind(self) -> u32 {
        match self {
            ShaderKind::Vertex => glcore::GL_VERTEX_SHADER,
            ShaderKind::Fragment => glcore::GL_FRAGMENT_SHADER,
        }
    }
}

impl fmt::Display for ShaderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderKind::Vertex => f.write_str("vertex"),
            ShaderKind::Fragment => f.write_str("fragment"),
        }
    }
}

impl From<ShaderKind> for ProgramValidation {
    fn from(value: ShaderKind) -> Self {
        match value {
            ShaderKind::Vertex => ProgramValidation::Vertex,
            ShaderKind::Fragment => ProgramValidation::Fragment,
        }
    }
}

/// A successfully compiled shader object, not yet attached to anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shader {
    shader_id: u32,
    kind: ShaderKind,
}

impl Shader {
    pub fn compile<A: GraphicsApi>(api: &A, kind: ShaderKind, source: &str) -> Result<Shader> {
        if !source.is_ascii() {
            return Err(GLCoreError::InvalidValue("Shader source must only contain ASCII").into());
        }
        let cstr_source = CString::new(source).map_err(|_| {
            GLCoreError::InvalidValue("Shader source cannot be represented as a C-style string")
        })?;

        let shader_id = api.create_shader(kind)?;
        api.shader_source(shader_id, &cstr_source)?;
        api.compile_shader(shader_id)?;

        if let Some(log) = validate_shader_step(api, shader_id, kind.into())? {
            release_after_failure(api.delete_shader(shader_id), "shader");
            return Err(Error::ShaderCompile { kind, log });
        }

        debug!("Compiled {kind} shader {shader_id}");
        Ok(Shader { shader_id, kind })
    }

    pub fn id(&self) -> u32 {
        self.shader_id
    }

    pub fn kind(&self) -> ShaderKind {
        self.kind
    }
}

/// A vertex and fragment shader ready to be linked together.
#[derive(Debug, Clone, Copy)]
pub struct ShaderBundle {
    vertex: Shader,
    fragment: Shader,
}

impl ShaderBundle {
    pub fn new(vertex: Shader, fragment: Shader) -> Result<ShaderBundle> {
        if vertex.kind != ShaderKind::Vertex {
            return Err(
                GLCoreError::InvalidValue("Passed vertex shader is not a vertex shader").into(),
            );
        }
        if fragment.kind != ShaderKind::Fragment {
            return Err(
                GLCoreError::InvalidValue("Passed fragment shader is not a fragment shader")
                    .into(),
            );
        }
        Ok(ShaderBundle { vertex, fragment })
    }

    pub fn new_from_sources<A: GraphicsApi>(
        api: &A,
        vertex: &str,
        fragment: &str,
    ) -> Result<ShaderBundle> {
        let vertex = Shader::compile(api, ShaderKind::Vertex, vertex)?;
        let fragment = match Shader::compile(api, ShaderKind::Fragment, fragment) {
            Ok(fragment) => fragment,
            Err(err) => {
                release_after_failure(api.delete_shader(vertex.shader_id), "vertex shader");
                return Err(err);
            }
        };
        ShaderBundle::new(vertex, fragment)
    }

    fn delete_shaders<A: GraphicsApi>(&self, api: &A) -> Result<()> {
        api.delete_shader(self.vertex.shader_id)?;
        api.delete_shader(self.fragment.shader_id)?;
        Ok(())
    }

    /// Links, then validates the program. The shader objects are consumed
    /// either way.
    pub fn link<A: GraphicsApi>(self, api: &A) -> Result<ShaderProgram> {
        let program = api.create_program()?;
        if program == 0 {
            release_after_failure(self.delete_shaders(api), "shaders");
            return Err(Error::ProgramCreation);
        }

        api.attach_shader(program, self.vertex.shader_id)?;
        api.attach_shader(program, self.fragment.shader_id)?;
        api.link_program(program)?;
        if let Some(log) = validate_shader_step(api, program, ProgramValidation::Linking)? {
            release_after_failure(api.delete_program(program), "program");
            release_after_failure(self.delete_shaders(api), "shaders");
            return Err(Error::ShaderLink { log });
        }

        api.validate_program(program)?;
        if let Some(log) = validate_shader_step(api, program, ProgramValidation::Validating)? {
            release_after_failure(api.delete_program(program), "program");
            release_after_failure(self.delete_shaders(api), "shaders");
            return Err(Error::ShaderValidate { log });
        }

        api.detach_shader(program, self.vertex.shader_id)?;
        api.detach_shader(program, self.fragment.shader_id)?;
        self.delete_shaders(api)?;

        debug!("Linked shader program {program}");
        Ok(ShaderProgram { program })
    }
}

/// Compiles, links and validates a vertex/fragment pair in one go.
pub fn build_program<A: GraphicsApi>(api: &A, vertex: &str, fragment: &str) -> Result<ShaderProgram> {
    ShaderBundle::new_from_sources(api, vertex, fragment)?.link(api)
}

/// A linked and validated program. Never zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShaderProgram {
    program: u32,
}

impl ShaderProgram {
    pub fn id(&self) -> u32 {
        self.program
    }

    pub fn use_program<A: GraphicsApi>(&self, api: &A) -> Result<()> {
        api.use_program(self.program)?;
        Ok(())
    }

    pub fn unuse<A: GraphicsApi>(api: &A) -> Result<()> {
        api.use_program(0)?;
        Ok(())
    }

    pub fn delete<A: GraphicsApi>(self, api: &A) -> Result<()> {
        api.delete_program(self.program)?;
        Ok(())
    }
}
