use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::path::Path;
use std::rc::Rc;

use glam::Mat4;
use gl_sandbox::{ShaderBackend, ShaderError, ShaderProgram, ShaderStage, UniformValue};

const VERTEX_SOURCE: &str = "#version 330 core
layout (location = 0) in vec3 aPos;
uniform mat4 model;
uniform mat4 view;
void main() {
  gl_Position = view * model * vec4(aPos, 1.0);
}";

const FRAGMENT_SOURCE: &str = "#version 330 core
out vec4 FragColor;
uniform float brightness;
uniform bool enabled;
uniform int mode;
void main() {
  FragColor = vec4(1.0, 0.5, 0.2, 1.0) * brightness;
}";

const MALFORMED_FRAGMENT: &str = "#version 330 core
out vec4 FragColor;
void main() {
  FragColor = vec4(1.0, 0.5, 0.2, 1.0)
";

const FRAGMENT_WITH_UNMATCHED_INPUT: &str = "#version 330 core
in vec2 TexCoord;
out vec4 FragColor;
void main() {
  FragColor = vec4(TexCoord, 0.0, 1.0);
}";

#[derive(Debug, Clone)]
struct MockShader {
    source: String,
    compiled: bool,
}

#[derive(Debug, Clone, Default)]
struct MockProgram {
    attached: Vec<u32>,
    linked: bool,
    declared: Vec<String>,
    values: HashMap<String, UniformValue>,
}

#[derive(Debug, Clone, PartialEq)]
struct MockLocation {
    program: u32,
    name: String,
}

/// In-memory stand-in for a GL context with a toy "compiler": a stage compiles
/// when it has a `main` and balanced braces, and linking requires every
/// fragment `in` to be written by a matching vertex `out`.
#[derive(Default)]
struct MockGl {
    next_id: Cell<u32>,
    shaders: RefCell<HashMap<u32, MockShader>>,
    programs: RefCell<HashMap<u32, MockProgram>>,
    active: Cell<Option<u32>>,
    deleted_shaders: RefCell<Vec<u32>>,
    deleted_programs: RefCell<Vec<u32>>,
    location_queries: Cell<usize>,
    fail_create_program: Cell<bool>,
}

impl MockGl {
    fn id(&self) -> u32 {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        id
    }

    fn live_shaders(&self) -> usize {
        self.shaders.borrow().len()
    }

    fn live_programs(&self) -> usize {
        self.programs.borrow().len()
    }

    fn value(&self, program: u32, name: &str) -> Option<UniformValue> {
        self.programs.borrow()[&program].values.get(name).copied()
    }

    fn upload(&self, location: Option<&MockLocation>, value: UniformValue) {
        let Some(location) = location else { return };
        let Some(active) = self.active.get() else { return };
        if active != location.program {
            return;
        }
        if let Some(program) = self.programs.borrow_mut().get_mut(&active) {
            program.values.insert(location.name.clone(), value);
        }
    }
}

fn declared_uniforms(source: &str) -> Vec<String> {
    source
        .lines()
        .map(str::trim)
        .filter(|line| line.starts_with("uniform "))
        .filter_map(|line| line.trim_end_matches(';').split_whitespace().last())
        .map(str::to_string)
        .collect()
}

impl ShaderBackend for MockGl {
    type Shader = u32;
    type Program = u32;
    type UniformLocation = MockLocation;

    fn create_shader(&self, _stage: ShaderStage) -> Result<u32, String> {
        let id = self.id();
        self.shaders.borrow_mut().insert(
            id,
            MockShader {
                source: String::new(),
                compiled: false,
            },
        );
        Ok(id)
    }

    fn shader_source(&self, shader: u32, source: &str) {
        if let Some(s) = self.shaders.borrow_mut().get_mut(&shader) {
            s.source = source.to_string();
        }
    }

    fn compile_shader(&self, shader: u32) {
        if let Some(s) = self.shaders.borrow_mut().get_mut(&shader) {
            let balanced = s.source.matches('{').count() == s.source.matches('}').count();
            s.compiled = balanced && s.source.contains("void main");
        }
    }

    fn shader_compile_status(&self, shader: u32) -> bool {
        self.shaders.borrow()[&shader].compiled
    }

    fn shader_info_log(&self, shader: u32) -> String {
        if self.shader_compile_status(shader) {
            String::new()
        } else {
            "0:5(1): error: syntax error, unexpected end of file".to_string()
        }
    }

    fn delete_shader(&self, shader: u32) {
        self.shaders.borrow_mut().remove(&shader);
        self.deleted_shaders.borrow_mut().push(shader);
    }

    fn create_program(&self) -> Result<u32, String> {
        if self.fail_create_program.get() {
            return Err("out of memory".to_string());
        }
        let id = self.id();
        self.programs.borrow_mut().insert(id, MockProgram::default());
        Ok(id)
    }

    fn attach_shader(&self, program: u32, shader: u32) {
        if let Some(p) = self.programs.borrow_mut().get_mut(&program) {
            p.attached.push(shader);
        }
    }

    fn detach_shader(&self, program: u32, shader: u32) {
        if let Some(p) = self.programs.borrow_mut().get_mut(&program) {
            p.attached.retain(|&s| s != shader);
        }
    }

    fn link_program(&self, program: u32) {
        let shaders = self.shaders.borrow();
        let mut programs = self.programs.borrow_mut();
        let Some(p) = programs.get_mut(&program) else { return };

        let sources: Vec<&str> = p
            .attached
            .iter()
            .filter_map(|id| shaders.get(id))
            .filter(|s| s.compiled)
            .map(|s| s.source.as_str())
            .collect();
        if sources.len() != 2 {
            p.linked = false;
            return;
        }

        let (vertex, fragment) = (sources[0], sources[1]);
        p.linked = fragment
            .lines()
            .map(str::trim)
            .filter_map(|line| line.strip_prefix("in "))
            .all(|decl| vertex.lines().any(|l| l.trim() == format!("out {}", decl)));
        p.declared = declared_uniforms(vertex);
        p.declared.extend(declared_uniforms(fragment));
    }

    fn program_link_status(&self, program: u32) -> bool {
        self.programs.borrow()[&program].linked
    }

    fn program_info_log(&self, program: u32) -> String {
        if self.program_link_status(program) {
            String::new()
        } else {
            "error: fragment shader input not written by vertex shader".to_string()
        }
    }

    fn use_program(&self, program: Option<u32>) {
        self.active.set(program);
    }

    fn delete_program(&self, program: u32) {
        self.programs.borrow_mut().remove(&program);
        self.deleted_programs.borrow_mut().push(program);
    }

    fn uniform_location(&self, program: u32, name: &str) -> Option<MockLocation> {
        self.location_queries.set(self.location_queries.get() + 1);
        let programs = self.programs.borrow();
        let p = programs.get(&program)?;
        p.declared.iter().any(|d| d == name).then(|| MockLocation {
            program,
            name: name.to_string(),
        })
    }

    fn uniform_i32(&self, location: Option<&MockLocation>, value: i32) {
        self.upload(location, UniformValue::Int(value));
    }

    fn uniform_f32(&self, location: Option<&MockLocation>, value: f32) {
        self.upload(location, UniformValue::Float(value));
    }

    fn uniform_mat4(&self, location: Option<&MockLocation>, value: &Mat4) {
        self.upload(location, UniformValue::Mat4(*value));
    }
}

fn build() -> (Rc<MockGl>, ShaderProgram<MockGl>) {
    let gl = Rc::new(MockGl::default());
    let program = ShaderProgram::new(gl.clone(), VERTEX_SOURCE, FRAGMENT_SOURCE).unwrap();
    (gl, program)
}

#[test]
fn valid_pair_yields_usable_program() {
    let (gl, program) = build();

    assert_eq!(gl.live_programs(), 1);
    assert!(gl.program_link_status(program.handle()));

    program.use_program();
    assert_eq!(gl.active.get(), Some(program.handle()));
}

#[test]
fn stage_shaders_are_released_after_link() {
    let (gl, program) = build();

    assert_eq!(gl.live_shaders(), 0);
    assert_eq!(gl.deleted_shaders.borrow().len(), 2);
    assert!(gl.programs.borrow()[&program.handle()].attached.is_empty());
}

#[test]
fn malformed_fragment_fails_with_diagnostic() {
    let gl = Rc::new(MockGl::default());
    let result = ShaderProgram::new(gl.clone(), VERTEX_SOURCE, MALFORMED_FRAGMENT);

    match result {
        Err(ShaderError::Compile { stage, log }) => {
            assert_eq!(stage, ShaderStage::Fragment);
            assert!(!log.is_empty());
        }
        Err(other) => panic!("expected compile error, got {other}"),
        Ok(_) => panic!("malformed fragment source must not link"),
    }
    assert_eq!(gl.live_shaders(), 0, "compiled vertex stage must be released");
    assert_eq!(gl.live_programs(), 0);
}

#[test]
fn malformed_vertex_stops_before_fragment() {
    let gl = Rc::new(MockGl::default());
    let err = ShaderProgram::new(gl.clone(), "void main() {", FRAGMENT_SOURCE)
        .err()
        .expect("vertex stage should fail");

    assert!(matches!(err, ShaderError::Compile { stage: ShaderStage::Vertex, .. }));
    assert!(!err.diagnostic().is_empty());
    assert!(err.to_string().starts_with("vertex shader compilation failed"));
    assert_eq!(gl.deleted_shaders.borrow().len(), 1);
    assert_eq!(gl.live_shaders(), 0);
}

#[test]
fn link_failure_releases_everything() {
    let gl = Rc::new(MockGl::default());
    let err = ShaderProgram::new(gl.clone(), VERTEX_SOURCE, FRAGMENT_WITH_UNMATCHED_INPUT)
        .err()
        .expect("link should fail");

    assert!(matches!(err, ShaderError::Link { .. }));
    assert!(!err.diagnostic().is_empty());
    assert_eq!(gl.live_shaders(), 0);
    assert_eq!(gl.live_programs(), 0);
    assert_eq!(gl.deleted_programs.borrow().len(), 1);
}

#[test]
fn program_creation_failure_releases_shaders() {
    let gl = Rc::new(MockGl::default());
    gl.fail_create_program.set(true);

    let err = ShaderProgram::new(gl.clone(), VERTEX_SOURCE, FRAGMENT_SOURCE)
        .err()
        .expect("program creation should fail");

    assert!(matches!(err, ShaderError::CreateObject { what: "program", .. }));
    assert_eq!(gl.live_shaders(), 0);
}

#[test]
fn typed_uniforms_upload_to_active_program() {
    let (gl, program) = build();
    let handle = program.handle();
    let model = Mat4::from_translation(glam::Vec3::new(1.0, 2.0, 3.0));

    program.use_program();
    program.set_mat4("model", model);
    program.set_float("brightness", 0.75);
    program.set_int("mode", 2);
    program.set_bool("enabled", true);

    assert_eq!(gl.value(handle, "model"), Some(UniformValue::Mat4(model)));
    assert_eq!(gl.value(handle, "brightness"), Some(UniformValue::Float(0.75)));
    assert_eq!(gl.value(handle, "mode"), Some(UniformValue::Int(2)));
    assert_eq!(gl.value(handle, "enabled"), Some(UniformValue::Int(1)));

    program.set_bool("enabled", false);
    assert_eq!(gl.value(handle, "enabled"), Some(UniformValue::Int(0)));
}

#[test]
fn unknown_uniform_is_silently_ignored() {
    let (gl, program) = build();
    let handle = program.handle();

    program.use_program();
    program.set_mat4("view", Mat4::IDENTITY);
    program.set_float("brightness", 0.5);

    program.set_uniform("doesNotExist", 42.0_f32);
    program.set_uniform("alsoMissing", Mat4::ZERO);
    program.set_uniform("missingFlag", true);

    let values = gl.programs.borrow()[&handle].values.clone();
    assert_eq!(values.len(), 2);
    assert_eq!(values["view"], UniformValue::Mat4(Mat4::IDENTITY));
    assert_eq!(values["brightness"], UniformValue::Float(0.5));
}

#[test]
fn uniform_locations_are_looked_up_once() {
    let (gl, program) = build();
    program.use_program();

    for i in 0..5 {
        program.set_float("brightness", i as f32);
        program.set_float("missing", i as f32);
    }

    assert_eq!(gl.location_queries.get(), 2);
    assert_eq!(gl.value(program.handle(), "brightness"), Some(UniformValue::Float(4.0)));
}

#[test]
fn destroy_deletes_program() {
    let (gl, program) = build();
    let handle = program.handle();

    program.destroy();

    assert_eq!(gl.live_programs(), 0);
    assert_eq!(*gl.deleted_programs.borrow(), vec![handle]);
}

#[test]
fn dropping_program_releases_it_once() {
    let (gl, program) = build();
    let handle = program.handle();

    drop(program);

    assert_eq!(gl.live_programs(), 0);
    assert_eq!(*gl.deleted_programs.borrow(), vec![handle]);
}

#[test]
fn program_is_released_when_later_setup_fails() {
    fn setup(gl: Rc<MockGl>) -> Result<(ShaderProgram<MockGl>, u32), String> {
        let program = ShaderProgram::new(gl, VERTEX_SOURCE, FRAGMENT_SOURCE).map_err(|e| e.to_string())?;
        let buffer: Result<u32, String> = Err("out of memory".to_string());
        Ok((program, buffer?))
    }

    let gl = Rc::new(MockGl::default());
    let err = setup(gl.clone()).err().expect("buffer step should fail");

    assert_eq!(err, "out of memory");
    assert_eq!(gl.live_programs(), 0);
    assert_eq!(gl.deleted_programs.borrow().len(), 1);
}

#[test]
fn from_files_reports_missing_source() {
    let gl = Rc::new(MockGl::default());
    let err = ShaderProgram::from_files(gl.clone(), "no/such/shader.vert", "no/such/shader.frag")
        .err()
        .expect("missing file should fail");

    match err {
        ShaderError::Source { path, .. } => assert_eq!(path, Path::new("no/such/shader.vert")),
        other => panic!("expected source error, got {other}"),
    }
    assert_eq!(gl.live_shaders(), 0);
}

#[test]
fn bundled_shaders_link_and_expose_scene_uniforms() {
    let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("shaders");
    let gl = Rc::new(MockGl::default());
    let program = ShaderProgram::from_files(gl.clone(), dir.join("default.vert"), dir.join("default.frag"))
        .expect("bundled shaders should link");

    let declared = gl.programs.borrow()[&program.handle()].declared.clone();
    for name in ["model", "view", "projection", "texture1", "texture2", "mixValue", "useTexture"] {
        assert!(declared.iter().any(|d| d == name), "missing uniform {name}");
    }
}
