use std::ffi::{CStr, c_void};

use glcore::{GL_1_0_g, GL_1_1_g, GL_1_5_g, GL_2_0_g, GL_3_0_g, GLCore};

use super::shaders::ShaderKind;
use super::GlResult;

/// Capacity of the buffer info logs are read into.
pub const INFO_LOG_CAPACITY: usize = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementsMode {
    TriangleFan,
}

impl ElementsMode {
    pub fn into_opengl_mode(self) -> u32 {
        match self {
            ElementsMode::TriangleFan => glcore::GL_TRIANGLE_FAN,
        }
    }
}

/// The slice of OpenGL the renderer talks to.
///
/// Handles are raw GL names. A name of `0` passed to one of the `bind`/`use`
/// calls unbinds, exactly as in GL.
pub trait GraphicsApi {
    fn create_shader(&self, kind: ShaderKind) -> GlResult<u32>;
    fn shader_source(&self, shader: u32, source: &CStr) -> GlResult<()>;
    fn compile_shader(&self, shader: u32) -> GlResult<()>;
    fn shader_parameter(&self, shader: u32, pname: u32) -> GlResult<i32>;
    fn shader_info_log(&self, shader: u32) -> GlResult<String>;
    fn delete_shader(&self, shader: u32) -> GlResult<()>;

    fn create_program(&self) -> GlResult<u32>;
    fn attach_shader(&self, program: u32, shader: u32) -> GlResult<()>;
    fn detach_shader(&self, program: u32, shader: u32) -> GlResult<()>;
    fn link_program(&self, program: u32) -> GlResult<()>;
    fn validate_program(&self, program: u32) -> GlResult<()>;
    fn program_parameter(&self, program: u32, pname: u32) -> GlResult<i32>;
    fn program_info_log(&self, program: u32) -> GlResult<String>;
    fn use_program(&self, program: u32) -> GlResult<()>;
    fn delete_program(&self, program: u32) -> GlResult<()>;

    fn create_vertex_array(&self) -> GlResult<u32>;
    fn bind_vertex_array(&self, array: u32) -> GlResult<()>;
    fn delete_vertex_array(&self, array: u32) -> GlResult<()>;

    fn create_buffer(&self) -> GlResult<u32>;
    fn bind_array_buffer(&self, buffer: u32) -> GlResult<()>;
    /// Uploads into whatever is bound to `GL_ARRAY_BUFFER` with `GL_STATIC_DRAW`.
    fn upload_static_floats(&self, data: &[f32]) -> GlResult<()>;
    fn delete_buffer(&self, buffer: u32) -> GlResult<()>;

    /// Tightly packed, non-normalized float attribute at offset zero.
    fn vertex_attrib_floats(&self, index: u32, components: usize) -> GlResult<()>;
    fn enable_vertex_attrib(&self, index: u32) -> GlResult<()>;

    fn viewport(&self, x: i32, y: i32, width: i32, height: i32) -> GlResult<()>;
    fn clear_color(&self, r: f32, g: f32, b: f32, a: f32) -> GlResult<()>;
    fn clear_color_buffer(&self) -> GlResult<()>;
    fn draw_arrays(&self, mode: ElementsMode, first: i32, count: i32) -> GlResult<()>;
}

fn log_to_string(log: &[glcore::GLchar], written: i32) -> String {
    let bytes: Vec<u8> = log
        .iter()
        .take(written.max(0) as usize)
        .map(|&byte| byte as u8)
        .collect();
    String::from_utf8_lossy(&bytes).trim_end().to_owned()
}

impl GraphicsApi for GLCore {
    fn create_shader(&self, kind: ShaderKind) -> GlResult<u32> {
        self.glCreateShader(kind.kind())
    }

    fn shader_source(&self, shader: u32, source: &CStr) -> GlResult<()> {
        let sources = [source.as_ptr()];
        self.glShaderSource(shader, 1, sources.as_ptr(), std::ptr::null())
    }

    fn compile_shader(&self, shader: u32) -> GlResult<()> {
        self.glCompileShader(shader)
    }

    fn shader_parameter(&self, shader: u32, pname: u32) -> GlResult<i32> {
        let mut value = 0;
        self.glGetShaderiv(shader, pname, &mut value)?;
        Ok(value)
    }

    fn shader_info_log(&self, shader: u32) -> GlResult<String> {
        let mut log: [glcore::GLchar; INFO_LOG_CAPACITY] = [0; INFO_LOG_CAPACITY];
        let mut written = 0;
        self.glGetShaderInfoLog(
            shader,
            INFO_LOG_CAPACITY as i32,
            &mut written,
            log.as_mut_ptr(),
        )?;
        Ok(log_to_string(&log, written))
    }

    fn delete_shader(&self, shader: u32) -> GlResult<()> {
        self.glDeleteShader(shader)
    }

    fn create_program(&self) -> GlResult<u32> {
        self.glCreateProgram()
    }

    fn attach_shader(&self, program: u32, shader: u32) -> GlResult<()> {
        self.glAttachShader(program, shader)
    }

    fn detach_shader(&self, program: u32, shader: u32) -> GlResult<()> {
        self.glDetachShader(program, shader)
    }

    fn link_program(&self, program: u32) -> GlResult<()> {
        self.glLinkProgram(program)
    }

    fn validate_program(&self, program: u32) -> GlResult<()> {
        self.glValidateProgram(program)
    }

    fn program_parameter(&self, program: u32, pname: u32) -> GlResult<i32> {
        let mut value = 0;
        self.glGetProgramiv(program, pname, &mut value)?;
        Ok(value)
    }

    fn program_info_log(&self, program: u32) -> GlResult<String> {
        let mut log: [glcore::GLchar; INFO_LOG_CAPACITY] = [0; INFO_LOG_CAPACITY];
        let mut written = 0;
        self.glGetProgramInfoLog(
            program,
            INFO_LOG_CAPACITY as i32,
            &mut written,
            log.as_mut_ptr(),
        )?;
        Ok(log_to_string(&log, written))
    }

    fn use_program(&self, program: u32) -> GlResult<()> {
        self.glUseProgram(program)
    }

    fn delete_program(&self, program: u32) -> GlResult<()> {
        self.glDeleteProgram(program)
    }

    fn create_vertex_array(&self) -> GlResult<u32> {
        let mut array = 0;
        self.glGenVertexArrays(1, &mut array)?;
        Ok(array)
    }

    fn bind_vertex_array(&self, array: u32) -> GlResult<()> {
        self.glBindVertexArray(array)
    }

    fn delete_vertex_array(&self, array: u32) -> GlResult<()> {
        self.glDeleteVertexArrays(1, [array].as_ptr())
    }

    fn create_buffer(&self) -> GlResult<u32> {
        let mut buffer = 0;
        self.glGenBuffers(1, &mut buffer)?;
        Ok(buffer)
    }

    fn bind_array_buffer(&self, buffer: u32) -> GlResult<()> {
        self.glBindBuffer(glcore::GL_ARRAY_BUFFER, buffer)
    }

    fn upload_static_floats(&self, data: &[f32]) -> GlResult<()> {
        self.glBufferData(
            glcore::GL_ARRAY_BUFFER,
            std::mem::size_of_val(data),
            data.as_ptr() as *const c_void,
            glcore::GL_STATIC_DRAW,
        )
    }

    fn delete_buffer(&self, buffer: u32) -> GlResult<()> {
        self.glDeleteBuffers(1, [buffer].as_ptr())
    }

    fn vertex_attrib_floats(&self, index: u32, components: usize) -> GlResult<()> {
        self.glVertexAttribPointer(
            index,
            components as i32,
            glcore::GL_FLOAT,
            glcore::GL_FALSE as u8,
            0,
            std::ptr::null(),
        )
    }

    fn enable_vertex_attrib(&self, index: u32) -> GlResult<()> {
        self.glEnableVertexAttribArray(index)
    }

    fn viewport(&self, x: i32, y: i32, width: i32, height: i32) -> GlResult<()> {
        self.glViewport(x, y, width, height)
    }

    fn clear_color(&self, r: f32, g: f32, b: f32, a: f32) -> GlResult<()> {
        self.glClearColor(r, g, b, a)
    }

    fn clear_color_buffer(&self) -> GlResult<()> {
        self.glClear(glcore::GL_COLOR_BUFFER_BIT)
    }

    fn draw_arrays(&self, mode: ElementsMode, first: i32, count: i32) -> GlResult<()> {
        self.glDrawArrays(mode.into_opengl_mode(), first, count)
    }
}
