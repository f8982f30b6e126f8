use std::fmt::Debug;

use glam::Mat4;

use crate::shader::ShaderStage;

/// The slice of the GL function table that shader programs need.
///
/// Mirrors the underlying API one call per method so that `ShaderProgram`
/// owns the sequencing (compile, link, release). Uniform uploads apply to
/// whichever program is currently in use, exactly like GL, and a `None`
/// location is a silent no-op.
pub trait ShaderBackend {
    type Shader: Copy + Debug;
    type Program: Copy + Debug;
    type UniformLocation: Clone + Debug;

    fn create_shader(&self, stage: ShaderStage) -> Result<Self::Shader, String>;
    fn shader_source(&self, shader: Self::Shader, source: &str);
    fn compile_shader(&self, shader: Self::Shader);
    fn shader_compile_status(&self, shader: Self::Shader) -> bool;
    fn shader_info_log(&self, shader: Self::Shader) -> String;
    fn delete_shader(&self, shader: Self::Shader);

    fn create_program(&self) -> Result<Self::Program, String>;
    fn attach_shader(&self, program: Self::Program, shader: Self::Shader);
    fn detach_shader(&self, program: Self::Program, shader: Self::Shader);
    fn link_program(&self, program: Self::Program);
    fn program_link_status(&self, program: Self::Program) -> bool;
    fn program_info_log(&self, program: Self::Program) -> String;
    fn use_program(&self, program: Option<Self::Program>);
    fn delete_program(&self, program: Self::Program);

    fn uniform_location(&self, program: Self::Program, name: &str)
        -> Option<Self::UniformLocation>;
    fn uniform_i32(&self, location: Option<&Self::UniformLocation>, value: i32);
    fn uniform_f32(&self, location: Option<&Self::UniformLocation>, value: f32);
    fn uniform_mat4(&self, location: Option<&Self::UniformLocation>, value: &Mat4);
}
