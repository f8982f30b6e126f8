use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;
use std::rc::Rc;

use glam::Mat4;
use log::{debug, error};

use crate::error::ShaderError;
use crate::traits::ShaderBackend;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Vertex => f.write_str("vertex"),
            Self::Fragment => f.write_str("fragment"),
        }
    }
}

/// A value that can be uploaded to a named uniform
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    Bool(bool),
    Int(i32),
    Float(f32),
    Mat4(Mat4),
}

impl From<bool> for UniformValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i32> for UniformValue {
    fn from(value: i32) -> Self {
        Self::Int(value)
    }
}

impl From<f32> for UniformValue {
    fn from(value: f32) -> Self {
        Self::Float(value)
    }
}

impl From<Mat4> for UniformValue {
    fn from(value: Mat4) -> Self {
        Self::Mat4(value)
    }
}

/// A linked vertex + fragment program.
///
/// Only one program is active per GL context at a time; `use_program` switches
/// the context's global state and uniform uploads go to whichever program is
/// active. Holding an `Rc` keeps the program on the context's thread.
///
/// The GL program is deleted when the value is dropped, so it must not outlive
/// its context. `destroy` makes the release point explicit.
pub struct ShaderProgram<B: ShaderBackend> {
    backend: Rc<B>,
    handle: B::Program,
    locations: RefCell<HashMap<String, Option<B::UniformLocation>>>,
}

impl<B: ShaderBackend> ShaderProgram<B> {
    /// Compile both stages and link them. Nothing is retained on failure.
    pub fn new(backend: Rc<B>, vertex_source: &str, fragment_source: &str) -> Result<Self, ShaderError> {
        let result = Self::build(&backend, vertex_source, fragment_source);
        match result {
            Ok(handle) => {
                debug!("Linked shader program {:?}", handle);
                Ok(Self {
                    backend,
                    handle,
                    locations: RefCell::new(HashMap::new()),
                })
            }
            Err(e) => {
                error!("{}", e);
                Err(e)
            }
        }
    }

    pub fn from_files(
        backend: Rc<B>,
        vertex_path: impl AsRef<Path>,
        fragment_path: impl AsRef<Path>,
    ) -> Result<Self, ShaderError> {
        let vertex_source = read_source(vertex_path.as_ref())?;
        let fragment_source = read_source(fragment_path.as_ref())?;
        Self::new(backend, &vertex_source, &fragment_source)
    }

    fn build(backend: &B, vertex_source: &str, fragment_source: &str) -> Result<B::Program, ShaderError> {
        let vertex = compile_stage(backend, ShaderStage::Vertex, vertex_source)?;
        let fragment = match compile_stage(backend, ShaderStage::Fragment, fragment_source) {
            Ok(shader) => shader,
            Err(e) => {
                backend.delete_shader(vertex);
                return Err(e);
            }
        };

        let program = match backend.create_program() {
            Ok(program) => program,
            Err(reason) => {
                backend.delete_shader(vertex);
                backend.delete_shader(fragment);
                return Err(ShaderError::CreateObject {
                    what: "program",
                    reason,
                });
            }
        };

        backend.attach_shader(program, vertex);
        backend.attach_shader(program, fragment);
        backend.link_program(program);
        let linked = backend.program_link_status(program);

        // Stage objects are not needed once linking has been attempted
        backend.detach_shader(program, vertex);
        backend.detach_shader(program, fragment);
        backend.delete_shader(vertex);
        backend.delete_shader(fragment);

        if !linked {
            let log = backend.program_info_log(program);
            backend.delete_program(program);
            return Err(ShaderError::Link { log });
        }

        Ok(program)
    }

    pub fn handle(&self) -> B::Program {
        self.handle
    }

    pub fn use_program(&self) {
        self.backend.use_program(Some(self.handle));
    }

    /// Upload `value` to the uniform called `name` on the active program.
    ///
    /// Names the linker did not keep resolve to no location and the upload is
    /// dropped silently.
    pub fn set_uniform(&self, name: &str, value: impl Into<UniformValue>) {
        let location = self.location(name);
        let location = location.as_ref();
        match value.into() {
            UniformValue::Bool(v) => self.backend.uniform_i32(location, i32::from(v)),
            UniformValue::Int(v) => self.backend.uniform_i32(location, v),
            UniformValue::Float(v) => self.backend.uniform_f32(location, v),
            UniformValue::Mat4(v) => self.backend.uniform_mat4(location, &v),
        }
    }

    pub fn set_bool(&self, name: &str, value: bool) {
        self.set_uniform(name, value);
    }

    pub fn set_int(&self, name: &str, value: i32) {
        self.set_uniform(name, value);
    }

    pub fn set_float(&self, name: &str, value: f32) {
        self.set_uniform(name, value);
    }

    pub fn set_mat4(&self, name: &str, value: Mat4) {
        self.set_uniform(name, value);
    }

    pub fn destroy(self) {
        drop(self);
    }

    fn location(&self, name: &str) -> Option<B::UniformLocation> {
        if let Some(cached) = self.locations.borrow().get(name) {
            return cached.clone();
        }
        let location = self.backend.uniform_location(self.handle, name);
        if location.is_none() {
            debug!("Uniform {:?} not found in program {:?}", name, self.handle);
        }
        self.locations
            .borrow_mut()
            .insert(name.to_string(), location.clone());
        location
    }
}

impl<B: ShaderBackend> Drop for ShaderProgram<B> {
    fn drop(&mut self) {
        debug!("Deleting shader program {:?}", self.handle);
        self.backend.delete_program(self.handle);
    }
}

fn compile_stage<B: ShaderBackend>(
    backend: &B,
    stage: ShaderStage,
    source: &str,
) -> Result<B::Shader, ShaderError> {
    let shader = backend
        .create_shader(stage)
        .map_err(|reason| ShaderError::CreateObject {
            what: "shader",
            reason,
        })?;
    backend.shader_source(shader, source);
    backend.compile_shader(shader);

    if !backend.shader_compile_status(shader) {
        let log = backend.shader_info_log(shader);
        backend.delete_shader(shader);
        return Err(ShaderError::Compile { stage, log });
    }
    Ok(shader)
}

fn read_source(path: &Path) -> Result<String, ShaderError> {
    fs::read_to_string(path).map_err(|source| ShaderError::Source {
        path: path.to_path_buf(),
        source,
    })
}
