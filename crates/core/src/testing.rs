//! Recording [`GlBackend`] used by unit tests.
//!
//! `MockGl` keeps just enough driver state to behave like a core-profile
//! context for the calls this crate makes: an error queue, cubemap storage
//! sizes, framebuffer bindings, and a log of draw-related calls. Binding an
//! unknown texture name, or a 2D texture as a cubemap, queues
//! `GL_INVALID_OPERATION`, as a real driver does.
//!
//! Available to other crates' tests through the `test-util` feature.

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tracing::span::{Attributes, Id, Record};
use tracing::{Event, Metadata, Subscriber};

use crate::backend::{GlBackend, ShaderStage};
use crate::face::CubeFace;
use crate::handle::{
    FramebufferHandle, ProgramHandle, ShaderHandle, TextureHandle, VertexArrayHandle,
};
use crate::image::{pixel_offset, rgba_len};

const FRAMEBUFFER_COMPLETE: u32 = 0x8CD5;
const INVALID_VALUE: u32 = 0x0501;
const INVALID_OPERATION: u32 = 0x0502;
const INVALID_FRAMEBUFFER_OPERATION: u32 = 0x0506;

#[derive(Debug, Clone, PartialEq)]
pub enum UniformValue {
    I32(i32),
    F32(f32),
    Vec2([f32; 2]),
    Mat4Array(Vec<f32>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    BindFramebuffer(FramebufferHandle),
    Viewport(i32, i32, u32, u32),
    Clear([f32; 4]),
    UseProgram(ProgramHandle),
    BindCubemap(u32, TextureHandle),
    Uniform(String, UniformValue),
    DrawTriangles(i32, i32),
    AttachFace(TextureHandle, CubeFace),
    AttachLayered(TextureHandle),
    ReadPixels(u32, u32),
}

#[derive(Default)]
pub struct MockGl {
    errors: RefCell<VecDeque<u32>>,
    get_error_calls: Cell<usize>,
    framebuffer_status: Cell<Option<u32>>,
    next_name: Cell<u32>,
    textures: RefCell<HashMap<u32, [(u32, u32); 6]>>,
    textures_2d: RefCell<HashSet<u32>>,
    framebuffers: RefCell<HashSet<u32>>,
    programs: RefCell<HashSet<u32>>,
    shaders: RefCell<HashMap<u32, ShaderStage>>,
    vertex_arrays: RefCell<HashSet<u32>>,
    bound_framebuffer: Cell<u32>,
    attached_face: Cell<Option<(u32, CubeFace)>>,
    uniform_names: RefCell<Vec<String>>,
    calls: RefCell<Vec<Call>>,
    fail_stage: Cell<Option<ShaderStage>>,
    fail_link: Cell<bool>,
    fail_create: Cell<bool>,
    read_error_face: Cell<Option<CubeFace>>,
}

impl MockGl {
    pub fn new() -> Self {
        let gl = Self::default();
        gl.next_name.set(1);
        gl
    }

    pub fn push_error(&self, code: u32) {
        self.errors.borrow_mut().push_back(code);
    }

    pub fn pending_errors(&self) -> usize {
        self.errors.borrow().len()
    }

    pub fn get_error_calls(&self) -> usize {
        self.get_error_calls.get()
    }

    /// Forces every completeness check to return `code`.
    pub fn set_framebuffer_status(&self, code: u32) {
        self.framebuffer_status.set(Some(code));
    }

    /// Registers a cubemap with square faces of `size` and returns its name.
    pub fn add_cubemap(&self, size: u32) -> TextureHandle {
        let name = self.alloc();
        self.textures.borrow_mut().insert(name, [(size, size); 6]);
        TextureHandle(name)
    }

    /// Registers a live texture that is not a cubemap and returns its name.
    pub fn add_texture_2d(&self) -> TextureHandle {
        let name = self.alloc();
        self.textures_2d.borrow_mut().insert(name);
        TextureHandle(name)
    }

    pub fn set_face_size(&self, texture: TextureHandle, face: CubeFace, w: u32, h: u32) {
        if let Some(faces) = self.textures.borrow_mut().get_mut(&texture.0) {
            faces[face.index()] = (w, h);
        }
    }

    /// Queues `GL_INVALID_FRAMEBUFFER_OPERATION` when `face` is read back.
    pub fn fail_read_on(&self, face: CubeFace) {
        self.read_error_face.set(Some(face));
    }

    pub fn fail_compile(&self, stage: ShaderStage) {
        self.fail_stage.set(Some(stage));
    }

    pub fn fail_link(&self) {
        self.fail_link.set(true);
    }

    /// Makes every `create_*` call fail, as with no current context.
    pub fn fail_create(&self) {
        self.fail_create.set(true);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.borrow_mut().clear();
    }

    pub fn live_framebuffers(&self) -> usize {
        self.framebuffers.borrow().len()
    }

    pub fn live_programs(&self) -> usize {
        self.programs.borrow().len()
    }

    pub fn live_textures(&self) -> usize {
        self.textures.borrow().len()
    }

    pub fn live_shaders(&self) -> usize {
        self.shaders.borrow().len()
    }

    pub fn live_vertex_arrays(&self) -> usize {
        self.vertex_arrays.borrow().len()
    }

    pub fn bound_framebuffer(&self) -> FramebufferHandle {
        FramebufferHandle(self.bound_framebuffer.get())
    }

    /// Last viewport set before the most recent draw call.
    pub fn last_viewport(&self) -> Option<(i32, i32, u32, u32)> {
        self.calls.borrow().iter().rev().find_map(|c| match c {
            Call::Viewport(x, y, w, h) => Some((*x, *y, *w, *h)),
            _ => None,
        })
    }

    pub fn draw_count(&self) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|c| matches!(c, Call::DrawTriangles(..)))
            .count()
    }

    /// Most recent value uploaded to the uniform called `name`.
    pub fn uniform(&self, name: &str) -> Option<UniformValue> {
        self.calls.borrow().iter().rev().find_map(|c| match c {
            Call::Uniform(n, v) if n == name => Some(v.clone()),
            _ => None,
        })
    }

    fn alloc(&self) -> u32 {
        let name = self.next_name.get();
        self.next_name.set(name + 1);
        name
    }

    fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }

    fn create<T>(&self, set: &RefCell<HashSet<u32>>, wrap: fn(u32) -> T) -> Result<T, String> {
        if self.fail_create.get() {
            return Err("no current context".into());
        }
        let name = self.alloc();
        set.borrow_mut().insert(name);
        Ok(wrap(name))
    }

    fn uniform_name(&self, location: u32) -> String {
        self.uniform_names
            .borrow()
            .get(location as usize)
            .cloned()
            .unwrap_or_default()
    }
}

impl GlBackend for MockGl {
    fn get_error(&self) -> u32 {
        self.get_error_calls.set(self.get_error_calls.get() + 1);
        self.errors.borrow_mut().pop_front().unwrap_or(0)
    }

    fn check_framebuffer_status(&self) -> u32 {
        self.framebuffer_status.get().unwrap_or(FRAMEBUFFER_COMPLETE)
    }

    fn create_framebuffer(&self) -> Result<FramebufferHandle, String> {
        self.create(&self.framebuffers, FramebufferHandle)
    }

    fn delete_framebuffer(&self, framebuffer: FramebufferHandle) {
        self.framebuffers.borrow_mut().remove(&framebuffer.0);
    }

    fn bind_framebuffer(&self, framebuffer: FramebufferHandle) {
        self.bound_framebuffer.set(framebuffer.0);
        self.attached_face.set(None);
        self.record(Call::BindFramebuffer(framebuffer));
    }

    fn current_framebuffer(&self) -> FramebufferHandle {
        FramebufferHandle(self.bound_framebuffer.get())
    }

    fn attach_cubemap_face(&self, texture: TextureHandle, face: CubeFace) {
        if !self.textures.borrow().contains_key(&texture.0) {
            self.push_error(INVALID_OPERATION);
            return;
        }
        self.attached_face.set(Some((texture.0, face)));
        self.record(Call::AttachFace(texture, face));
    }

    fn attach_cubemap_layered(&self, texture: TextureHandle) {
        if !self.textures.borrow().contains_key(&texture.0) {
            self.push_error(INVALID_OPERATION);
            return;
        }
        self.record(Call::AttachLayered(texture));
    }

    fn create_cubemap(&self, size: u32) -> Result<TextureHandle, String> {
        if self.fail_create.get() {
            return Err("no current context".into());
        }
        Ok(self.add_cubemap(size))
    }

    fn delete_texture(&self, texture: TextureHandle) {
        self.textures.borrow_mut().remove(&texture.0);
        self.textures_2d.borrow_mut().remove(&texture.0);
    }

    fn is_texture(&self, texture: TextureHandle) -> bool {
        self.textures.borrow().contains_key(&texture.0)
            || self.textures_2d.borrow().contains(&texture.0)
    }

    fn cubemap_face_size(&self, texture: TextureHandle, face: CubeFace) -> (u32, u32) {
        if self.textures_2d.borrow().contains(&texture.0) {
            self.push_error(INVALID_OPERATION);
            return (0, 0);
        }
        self.textures
            .borrow()
            .get(&texture.0)
            .map(|faces| faces[face.index()])
            .unwrap_or((0, 0))
    }

    fn bind_cubemap(&self, unit: u32, texture: TextureHandle) {
        if !texture.is_null() && !self.textures.borrow().contains_key(&texture.0) {
            self.push_error(INVALID_OPERATION);
        }
        self.record(Call::BindCubemap(unit, texture));
    }

    fn read_pixels_rgba(&self, width: u32, height: u32, out: &mut [u8]) {
        self.record(Call::ReadPixels(width, height));
        let Some((_, face)) = self.attached_face.get() else {
            self.push_error(INVALID_FRAMEBUFFER_OPERATION);
            return;
        };
        if self.read_error_face.get() == Some(face) {
            self.push_error(INVALID_FRAMEBUFFER_OPERATION);
            return;
        }
        if out.len() < rgba_len(width, height) {
            self.push_error(INVALID_VALUE);
            return;
        }
        // R encodes the face, G the GL row (0 = bottom), B the column.
        for y in 0..height {
            for x in 0..width {
                let i = pixel_offset(width, x, y);
                out[i] = face.index() as u8 * 40;
                out[i + 1] = y as u8;
                out[i + 2] = x as u8;
                out[i + 3] = 255;
            }
        }
    }

    fn create_shader(&self, stage: ShaderStage) -> Result<ShaderHandle, String> {
        if self.fail_create.get() {
            return Err("no current context".into());
        }
        let name = self.alloc();
        self.shaders.borrow_mut().insert(name, stage);
        Ok(ShaderHandle(name))
    }

    fn compile_shader_source(&self, _shader: ShaderHandle, _source: &str) {}

    fn shader_compile_status(&self, shader: ShaderHandle) -> bool {
        let stage = self.shaders.borrow().get(&shader.0).copied();
        stage.is_some() && stage != self.fail_stage.get()
    }

    fn shader_info_log(&self, _shader: ShaderHandle) -> String {
        "ERROR: 0:1: mock compile failure".into()
    }

    fn delete_shader(&self, shader: ShaderHandle) {
        self.shaders.borrow_mut().remove(&shader.0);
    }

    fn create_program(&self) -> Result<ProgramHandle, String> {
        self.create(&self.programs, ProgramHandle)
    }

    fn attach_shader(&self, _program: ProgramHandle, _shader: ShaderHandle) {}

    fn detach_shader(&self, _program: ProgramHandle, _shader: ShaderHandle) {}

    fn link_program(&self, _program: ProgramHandle) {}

    fn program_link_status(&self, program: ProgramHandle) -> bool {
        self.programs.borrow().contains(&program.0) && !self.fail_link.get()
    }

    fn program_info_log(&self, _program: ProgramHandle) -> String {
        "mock link failure".into()
    }

    fn delete_program(&self, program: ProgramHandle) {
        self.programs.borrow_mut().remove(&program.0);
    }

    fn use_program(&self, program: ProgramHandle) {
        self.record(Call::UseProgram(program));
    }

    fn uniform_location(&self, _program: ProgramHandle, name: &str) -> Option<u32> {
        let mut names = self.uniform_names.borrow_mut();
        let index = match names.iter().position(|n| n == name) {
            Some(i) => i,
            None => {
                names.push(name.to_string());
                names.len() - 1
            }
        };
        Some(index as u32)
    }

    fn uniform_i32(&self, location: u32, value: i32) {
        self.record(Call::Uniform(
            self.uniform_name(location),
            UniformValue::I32(value),
        ));
    }

    fn uniform_f32(&self, location: u32, value: f32) {
        self.record(Call::Uniform(
            self.uniform_name(location),
            UniformValue::F32(value),
        ));
    }

    fn uniform_vec2(&self, location: u32, value: [f32; 2]) {
        self.record(Call::Uniform(
            self.uniform_name(location),
            UniformValue::Vec2(value),
        ));
    }

    fn uniform_mat4_array(&self, location: u32, values: &[f32]) {
        self.record(Call::Uniform(
            self.uniform_name(location),
            UniformValue::Mat4Array(values.to_vec()),
        ));
    }

    fn create_vertex_array(&self) -> Result<VertexArrayHandle, String> {
        self.create(&self.vertex_arrays, VertexArrayHandle)
    }

    fn bind_vertex_array(&self, _vertex_array: VertexArrayHandle) {}

    fn delete_vertex_array(&self, vertex_array: VertexArrayHandle) {
        self.vertex_arrays.borrow_mut().remove(&vertex_array.0);
    }

    fn viewport(&self, x: i32, y: i32, width: u32, height: u32) {
        self.record(Call::Viewport(x, y, width, height));
    }

    fn clear(&self, rgba: [f32; 4]) {
        self.record(Call::Clear(rgba));
    }

    fn draw_triangles(&self, first: i32, count: i32) {
        self.record(Call::DrawTriangles(first, count));
    }
}

/// Subscriber that only counts the events it receives.
struct EventCounter {
    events: Arc<AtomicUsize>,
}

impl Subscriber for EventCounter {
    fn enabled(&self, _metadata: &Metadata<'_>) -> bool {
        true
    }

    fn new_span(&self, _span: &Attributes<'_>) -> Id {
        Id::from_u64(1)
    }

    fn record(&self, _span: &Id, _values: &Record<'_>) {}

    fn record_follows_from(&self, _span: &Id, _follows: &Id) {}

    fn event(&self, _event: &Event<'_>) {
        self.events.fetch_add(1, Ordering::SeqCst);
    }

    fn enter(&self, _span: &Id) {}

    fn exit(&self, _span: &Id) {}
}

/// Runs `f` with a thread-local subscriber and returns how many log events
/// it emitted, at any level.
pub fn count_events(f: impl FnOnce()) -> usize {
    let events = Arc::new(AtomicUsize::new(0));
    let counter = EventCounter {
        events: Arc::clone(&events),
    };
    tracing::subscriber::with_default(counter, f);
    events.load(Ordering::SeqCst)
}
