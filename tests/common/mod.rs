#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::ffi::CStr;
use std::rc::Rc;

use fanwheel::Result;
use fanwheel::config::WindowSize;
use fanwheel::opengl::GlResult;
use fanwheel::opengl::api::{ElementsMode, GraphicsApi};
use fanwheel::opengl::shaders::ShaderKind;
use fanwheel::window::Window;
use glcore::GLCoreError;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    CreateShader(ShaderKind, u32),
    CompileShader(u32),
    DeleteShader(u32),
    CreateProgram(u32),
    AttachShader { program: u32, shader: u32 },
    DetachShader { program: u32, shader: u32 },
    LinkProgram(u32),
    ValidateProgram(u32),
    UseProgram(u32),
    DeleteProgram(u32),
    CreateVertexArray(u32),
    BindVertexArray(u32),
    DeleteVertexArray(u32),
    CreateBuffer(u32),
    BindArrayBuffer(u32),
    Upload(usize),
    DeleteBuffer(u32),
    VertexAttrib { index: u32, components: usize },
    EnableVertexAttrib(u32),
    Viewport(i32, i32, i32, i32),
    ClearColor([f32; 4]),
    Clear,
    Draw(DrawCall),
    PollEvents,
    SwapBuffers,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawCall {
    pub mode: ElementsMode,
    pub first: i32,
    pub count: i32,
    pub program: u32,
    pub vertex_array: u32,
}

pub type Journal = Rc<RefCell<Vec<Call>>>;

/// GL stand-in that records every call and tracks the little binding state
/// the renderer relies on.
///
/// A shader "compiles" when its braces balance.
pub struct RecordingGl {
    journal: Journal,
    next_name: Cell<u32>,
    shaders: RefCell<HashMap<u32, (ShaderKind, bool)>>,
    attached: RefCell<HashMap<u32, Vec<u32>>>,
    bound_program: Cell<u32>,
    bound_vertex_array: Cell<u32>,
    uploaded: RefCell<Vec<f32>>,
    pub link_ok: Cell<bool>,
    pub validate_ok: Cell<bool>,
    pub program_name: Cell<Option<u32>>,
    /// Every `delete_*` call fails, as on a lost context.
    pub fail_deletes: Cell<bool>,
    /// Info log queries come back empty.
    pub empty_logs: Cell<bool>,
}

impl RecordingGl {
    pub fn new(journal: Journal) -> RecordingGl {
        RecordingGl {
            journal,
            next_name: Cell::new(1),
            shaders: RefCell::new(HashMap::new()),
            attached: RefCell::new(HashMap::new()),
            bound_program: Cell::new(0),
            bound_vertex_array: Cell::new(0),
            uploaded: RefCell::new(Vec::new()),
            link_ok: Cell::new(true),
            validate_ok: Cell::new(true),
            program_name: Cell::new(None),
            fail_deletes: Cell::new(false),
            empty_logs: Cell::new(false),
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.journal.borrow().clone()
    }

    pub fn draws(&self) -> Vec<DrawCall> {
        self.journal
            .borrow()
            .iter()
            .filter_map(|call| match call {
                Call::Draw(draw) => Some(*draw),
                _ => None,
            })
            .collect()
    }

    pub fn uploaded(&self) -> Vec<f32> {
        self.uploaded.borrow().clone()
    }

    pub fn attached_to(&self, program: u32) -> Vec<u32> {
        self.attached
            .borrow()
            .get(&program)
            .cloned()
            .unwrap_or_default()
    }

    pub fn bound_program(&self) -> u32 {
        self.bound_program.get()
    }

    pub fn bound_vertex_array(&self) -> u32 {
        self.bound_vertex_array.get()
    }

    fn deleted(&self, call: Call) -> GlResult<()> {
        self.record(call);
        match self.fail_deletes.get() {
            true => Err(GLCoreError::InvalidOperation("lost context")),
            false => Ok(()),
        }
    }

    fn record(&self, call: Call) {
        self.journal.borrow_mut().push(call);
    }

    fn name(&self) -> u32 {
        let name = self.next_name.get();
        self.next_name.set(name + 1);
        name
    }
}

fn braces_balance(source: &str) -> bool {
    let mut depth = 0i32;
    for ch in source.chars() {
        match ch {
            '{' => depth += 1,
            '}' => depth -= 1,
            _ => {}
        }
        if depth < 0 {
            return false;
        }
    }
    depth == 0 && source.contains("void main")
}

impl GraphicsApi for RecordingGl {
    fn create_shader(&self, kind: ShaderKind) -> GlResult<u32> {
        let name = self.name();
        self.shaders.borrow_mut().insert(name, (kind, false));
        self.record(Call::CreateShader(kind, name));
        Ok(name)
    }

    fn shader_source(&self, shader: u32, source: &CStr) -> GlResult<()> {
        let compiles = source.to_str().map(braces_balance).unwrap_or(false);
        if let Some(entry) = self.shaders.borrow_mut().get_mut(&shader) {
            entry.1 = compiles;
        }
        Ok(())
    }

    fn compile_shader(&self, shader: u32) -> GlResult<()> {
        self.record(Call::CompileShader(shader));
        Ok(())
    }

    fn shader_parameter(&self, shader: u32, pname: u32) -> GlResult<i32> {
        assert_eq!(pname, glcore::GL_COMPILE_STATUS);
        let compiled = self
            .shaders
            .borrow()
            .get(&shader)
            .map(|(_, ok)| *ok)
            .unwrap_or(false);
        Ok(compiled as i32)
    }

    fn shader_info_log(&self, shader: u32) -> GlResult<String> {
        if self.empty_logs.get() {
            return Ok(String::new());
        }
        Ok(format!(
            "0:7(1): error: syntax error, unexpected end of file in shader {shader}"
        ))
    }

    fn delete_shader(&self, shader: u32) -> GlResult<()> {
        self.deleted(Call::DeleteShader(shader))
    }

    fn create_program(&self) -> GlResult<u32> {
        let name = match self.program_name.get() {
            Some(name) => name,
            None => self.name(),
        };
        self.record(Call::CreateProgram(name));
        Ok(name)
    }

    fn attach_shader(&self, program: u32, shader: u32) -> GlResult<()> {
        self.attached
            .borrow_mut()
            .entry(program)
            .or_default()
            .push(shader);
        self.record(Call::AttachShader { program, shader });
        Ok(())
    }

    fn detach_shader(&self, program: u32, shader: u32) -> GlResult<()> {
        if let Some(shaders) = self.attached.borrow_mut().get_mut(&program) {
            shaders.retain(|&attached| attached != shader);
        }
        self.record(Call::DetachShader { program, shader });
        Ok(())
    }

    fn link_program(&self, program: u32) -> GlResult<()> {
        self.record(Call::LinkProgram(program));
        Ok(())
    }

    fn validate_program(&self, program: u32) -> GlResult<()> {
        self.record(Call::ValidateProgram(program));
        Ok(())
    }

    fn program_parameter(&self, _program: u32, pname: u32) -> GlResult<i32> {
        match pname {
            glcore::GL_LINK_STATUS => Ok(self.link_ok.get() as i32),
            glcore::GL_VALIDATE_STATUS => Ok(self.validate_ok.get() as i32),
            other => panic!("unexpected program query {other:#x}"),
        }
    }

    fn program_info_log(&self, _program: u32) -> GlResult<String> {
        if self.empty_logs.get() {
            return Ok(String::new());
        }
        match self.link_ok.get() {
            true => Ok("error: current draw framebuffer is invalid".to_owned()),
            false => Ok("error: fragment shader lacks `main'".to_owned()),
        }
    }

    fn use_program(&self, program: u32) -> GlResult<()> {
        self.bound_program.set(program);
        self.record(Call::UseProgram(program));
        Ok(())
    }

    fn delete_program(&self, program: u32) -> GlResult<()> {
        self.deleted(Call::DeleteProgram(program))
    }

    fn create_vertex_array(&self) -> GlResult<u32> {
        let name = self.name();
        self.record(Call::CreateVertexArray(name));
        Ok(name)
    }

    fn bind_vertex_array(&self, array: u32) -> GlResult<()> {
        self.bound_vertex_array.set(array);
        self.record(Call::BindVertexArray(array));
        Ok(())
    }

    fn delete_vertex_array(&self, array: u32) -> GlResult<()> {
        self.deleted(Call::DeleteVertexArray(array))
    }

    fn create_buffer(&self) -> GlResult<u32> {
        let name = self.name();
        self.record(Call::CreateBuffer(name));
        Ok(name)
    }

    fn bind_array_buffer(&self, buffer: u32) -> GlResult<()> {
        self.record(Call::BindArrayBuffer(buffer));
        Ok(())
    }

    fn upload_static_floats(&self, data: &[f32]) -> GlResult<()> {
        *self.uploaded.borrow_mut() = data.to_vec();
        self.record(Call::Upload(data.len()));
        Ok(())
    }

    fn delete_buffer(&self, buffer: u32) -> GlResult<()> {
        self.deleted(Call::DeleteBuffer(buffer))
    }

    fn vertex_attrib_floats(&self, index: u32, components: usize) -> GlResult<()> {
        self.record(Call::VertexAttrib { index, components });
        Ok(())
    }

    fn enable_vertex_attrib(&self, index: u32) -> GlResult<()> {
        self.record(Call::EnableVertexAttrib(index));
        Ok(())
    }

    fn viewport(&self, x: i32, y: i32, width: i32, height: i32) -> GlResult<()> {
        self.record(Call::Viewport(x, y, width, height));
        Ok(())
    }

    fn clear_color(&self, r: f32, g: f32, b: f32, a: f32) -> GlResult<()> {
        self.record(Call::ClearColor([r, g, b, a]));
        Ok(())
    }

    fn clear_color_buffer(&self) -> GlResult<()> {
        self.record(Call::Clear);
        Ok(())
    }

    fn draw_arrays(&self, mode: ElementsMode, first: i32, count: i32) -> GlResult<()> {
        self.record(Call::Draw(DrawCall {
            mode,
            first,
            count,
            program: self.bound_program.get(),
            vertex_array: self.bound_vertex_array.get(),
        }));
        Ok(())
    }
}

/// Window that raises its close flag during a chosen poll.
pub struct ScriptedWindow {
    journal: Journal,
    polls: usize,
    close_on_poll: Option<usize>,
    close_requested: bool,
    resize_on_poll: Option<(usize, WindowSize)>,
    pending_resize: Option<WindowSize>,
    pub swaps: usize,
}

impl ScriptedWindow {
    /// `close_on_poll` is 1-based; `None` never closes.
    pub fn new(journal: Journal, close_on_poll: Option<usize>) -> ScriptedWindow {
        ScriptedWindow {
            journal,
            polls: 0,
            close_on_poll,
            close_requested: false,
            resize_on_poll: None,
            pending_resize: None,
            swaps: 0,
        }
    }

    pub fn already_closed(journal: Journal) -> ScriptedWindow {
        let mut window = ScriptedWindow::new(journal, None);
        window.close_requested = true;
        window
    }

    pub fn resize_on(mut self, poll: usize, size: WindowSize) -> ScriptedWindow {
        self.resize_on_poll = Some((poll, size));
        self
    }

    pub fn polls(&self) -> usize {
        self.polls
    }
}

impl Window for ScriptedWindow {
    fn poll_events(&mut self) -> Result<()> {
        self.polls += 1;
        self.journal.borrow_mut().push(Call::PollEvents);
        if self.close_on_poll == Some(self.polls) {
            self.close_requested = true;
        }
        if let Some((poll, size)) = self.resize_on_poll
            && poll == self.polls
        {
            self.pending_resize = Some(size);
        }
        Ok(())
    }

    fn close_requested(&self) -> bool {
        self.close_requested
    }

    fn swap_buffers(&mut self) -> Result<()> {
        self.swaps += 1;
        self.journal.borrow_mut().push(Call::SwapBuffers);
        Ok(())
    }

    fn take_resize(&mut self) -> Option<WindowSize> {
        self.pending_resize.take()
    }
}

pub fn journal() -> Journal {
    Rc::new(RefCell::new(Vec::new()))
}
