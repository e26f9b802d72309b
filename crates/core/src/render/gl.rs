//! [`GlBackend`] over `glow`.
//!
//! Object names cross the trait boundary as plain `u32`s and are rewrapped
//! into glow's native handle types here. Name `0` maps to `None` (unbind or
//! default framebuffer).

use std::num::NonZeroU32;

use glow::HasContext;

use super::context::GpuContext;
use super::texture::{create_cubemap, CubemapConfig};
use crate::backend::{GlBackend, ShaderStage};
use crate::face::CubeFace;
use crate::handle::{
    FramebufferHandle, ProgramHandle, ShaderHandle, TextureHandle, VertexArrayHandle,
};

fn texture(h: TextureHandle) -> Option<glow::Texture> {
    NonZeroU32::new(h.0).map(glow::NativeTexture)
}

fn framebuffer(h: FramebufferHandle) -> Option<glow::Framebuffer> {
    NonZeroU32::new(h.0).map(glow::NativeFramebuffer)
}

fn program(h: ProgramHandle) -> Option<glow::Program> {
    NonZeroU32::new(h.0).map(glow::NativeProgram)
}

fn shader(h: ShaderHandle) -> Option<glow::Shader> {
    NonZeroU32::new(h.0).map(glow::NativeShader)
}

fn vertex_array(h: VertexArrayHandle) -> Option<glow::VertexArray> {
    NonZeroU32::new(h.0).map(glow::NativeVertexArray)
}

/// Object name from an integer state query; negative values read as `0`.
fn name_from_i32(name: i32) -> u32 {
    u32::try_from(name).unwrap_or(0)
}

fn location(loc: u32) -> glow::UniformLocation {
    glow::NativeUniformLocation(loc)
}

// SAFETY (applies to every unsafe block below): glow marks all raw GL entry
// points unsafe. Each call passes enums taken from glow constants and names
// that were either created by this backend or supplied by the host; an unknown
// name makes the driver queue an error rather than touch memory. Buffers
// passed to read_pixels are sized by the caller to width * height * 4.
#[allow(unsafe_code)]
impl GlBackend for glow::Context {
    fn get_error(&self) -> u32 {
        unsafe { HasContext::get_error(self) }
    }

    fn check_framebuffer_status(&self) -> u32 {
        unsafe { HasContext::check_framebuffer_status(self, glow::FRAMEBUFFER) }
    }

    fn create_framebuffer(&self) -> Result<FramebufferHandle, String> {
        let fbo = unsafe { HasContext::create_framebuffer(self)? };
        Ok(FramebufferHandle(fbo.0.get()))
    }

    fn delete_framebuffer(&self, fbo: FramebufferHandle) {
        if let Some(fbo) = framebuffer(fbo) {
            unsafe { HasContext::delete_framebuffer(self, fbo) };
        }
    }

    fn bind_framebuffer(&self, fbo: FramebufferHandle) {
        unsafe { HasContext::bind_framebuffer(self, glow::FRAMEBUFFER, framebuffer(fbo)) };
    }

    fn current_framebuffer(&self) -> FramebufferHandle {
        let name = unsafe { self.get_parameter_i32(glow::FRAMEBUFFER_BINDING) };
        FramebufferHandle(name_from_i32(name))
    }

    fn attach_cubemap_face(&self, tex: TextureHandle, face: CubeFace) {
        unsafe {
            self.framebuffer_texture_2d(
                glow::FRAMEBUFFER,
                glow::COLOR_ATTACHMENT0,
                face.gl_target(),
                texture(tex),
                0,
            );
            self.read_buffer(glow::COLOR_ATTACHMENT0);
        }
    }

    fn attach_cubemap_layered(&self, tex: TextureHandle) {
        unsafe {
            self.framebuffer_texture(glow::FRAMEBUFFER, glow::COLOR_ATTACHMENT0, texture(tex), 0);
        }
    }

    fn create_cubemap(&self, size: u32) -> Result<TextureHandle, String> {
        let tex = create_cubemap(self, &CubemapConfig::rgba8(size))?;
        Ok(TextureHandle(tex.0.get()))
    }

    fn delete_texture(&self, tex: TextureHandle) {
        if let Some(tex) = texture(tex) {
            unsafe { HasContext::delete_texture(self, tex) };
        }
    }

    fn is_texture(&self, tex: TextureHandle) -> bool {
        match texture(tex) {
            Some(tex) => unsafe { HasContext::is_texture(self, tex) },
            None => false,
        }
    }

    fn cubemap_face_size(&self, tex: TextureHandle, face: CubeFace) -> (u32, u32) {
        unsafe {
            let previous = self.get_parameter_i32(glow::TEXTURE_BINDING_CUBE_MAP);
            self.bind_texture(glow::TEXTURE_CUBE_MAP, texture(tex));
            let w = self.get_tex_level_parameter_i32(face.gl_target(), 0, glow::TEXTURE_WIDTH);
            let h = self.get_tex_level_parameter_i32(face.gl_target(), 0, glow::TEXTURE_HEIGHT);
            self.bind_texture(glow::TEXTURE_CUBE_MAP, texture(name_from_i32(previous)));
            (u32::try_from(w).unwrap_or(0), u32::try_from(h).unwrap_or(0))
        }
    }

    fn bind_cubemap(&self, unit: u32, tex: TextureHandle) {
        unsafe {
            self.active_texture(glow::TEXTURE0 + unit);
            self.bind_texture(glow::TEXTURE_CUBE_MAP, texture(tex));
        }
    }

    fn read_pixels_rgba(&self, width: u32, height: u32, out: &mut [u8]) {
        unsafe {
            let alignment = self.get_parameter_i32(glow::PACK_ALIGNMENT);
            self.pixel_store_i32(glow::PACK_ALIGNMENT, 1);
            self.read_pixels(
                0,
                0,
                width as i32,
                height as i32,
                glow::RGBA,
                glow::UNSIGNED_BYTE,
                glow::PixelPackData::Slice(Some(out)),
            );
            self.pixel_store_i32(glow::PACK_ALIGNMENT, alignment);
        }
    }

    fn create_shader(&self, stage: ShaderStage) -> Result<ShaderHandle, String> {
        let sh = unsafe { HasContext::create_shader(self, stage.gl_enum())? };
        Ok(ShaderHandle(sh.0.get()))
    }

    fn compile_shader_source(&self, sh: ShaderHandle, source: &str) {
        if let Some(sh) = shader(sh) {
            unsafe {
                self.shader_source(sh, source);
                HasContext::compile_shader(self, sh);
            }
        }
    }

    fn shader_compile_status(&self, sh: ShaderHandle) -> bool {
        shader(sh).is_some_and(|sh| unsafe { self.get_shader_compile_status(sh) })
    }

    fn shader_info_log(&self, sh: ShaderHandle) -> String {
        shader(sh)
            .map(|sh| unsafe { self.get_shader_info_log(sh) })
            .unwrap_or_default()
    }

    fn delete_shader(&self, sh: ShaderHandle) {
        if let Some(sh) = shader(sh) {
            unsafe { HasContext::delete_shader(self, sh) };
        }
    }

    fn create_program(&self) -> Result<ProgramHandle, String> {
        let p = unsafe { HasContext::create_program(self)? };
        Ok(ProgramHandle(p.0.get()))
    }

    fn attach_shader(&self, p: ProgramHandle, sh: ShaderHandle) {
        if let (Some(p), Some(sh)) = (program(p), shader(sh)) {
            unsafe { HasContext::attach_shader(self, p, sh) };
        }
    }

    fn detach_shader(&self, p: ProgramHandle, sh: ShaderHandle) {
        if let (Some(p), Some(sh)) = (program(p), shader(sh)) {
            unsafe { HasContext::detach_shader(self, p, sh) };
        }
    }

    fn link_program(&self, p: ProgramHandle) {
        if let Some(p) = program(p) {
            unsafe { HasContext::link_program(self, p) };
        }
    }

    fn program_link_status(&self, p: ProgramHandle) -> bool {
        program(p).is_some_and(|p| unsafe { self.get_program_link_status(p) })
    }

    fn program_info_log(&self, p: ProgramHandle) -> String {
        program(p)
            .map(|p| unsafe { self.get_program_info_log(p) })
            .unwrap_or_default()
    }

    fn delete_program(&self, p: ProgramHandle) {
        if let Some(p) = program(p) {
            unsafe { HasContext::delete_program(self, p) };
        }
    }

    fn use_program(&self, p: ProgramHandle) {
        unsafe { HasContext::use_program(self, program(p)) };
    }

    fn uniform_location(&self, p: ProgramHandle, name: &str) -> Option<u32> {
        let p = program(p)?;
        unsafe { self.get_uniform_location(p, name) }.map(|loc| loc.0)
    }

    fn uniform_i32(&self, loc: u32, value: i32) {
        unsafe { self.uniform_1_i32(Some(&location(loc)), value) };
    }

    fn uniform_f32(&self, loc: u32, value: f32) {
        unsafe { self.uniform_1_f32(Some(&location(loc)), value) };
    }

    fn uniform_vec2(&self, loc: u32, value: [f32; 2]) {
        unsafe { self.uniform_2_f32(Some(&location(loc)), value[0], value[1]) };
    }

    fn uniform_mat4_array(&self, loc: u32, values: &[f32]) {
        unsafe { self.uniform_matrix_4_f32_slice(Some(&location(loc)), false, values) };
    }

    fn create_vertex_array(&self) -> Result<VertexArrayHandle, String> {
        let vao = unsafe { HasContext::create_vertex_array(self)? };
        Ok(VertexArrayHandle(vao.0.get()))
    }

    fn bind_vertex_array(&self, vao: VertexArrayHandle) {
        unsafe { HasContext::bind_vertex_array(self, vertex_array(vao)) };
    }

    fn delete_vertex_array(&self, vao: VertexArrayHandle) {
        if let Some(vao) = vertex_array(vao) {
            unsafe { HasContext::delete_vertex_array(self, vao) };
        }
    }

    fn viewport(&self, x: i32, y: i32, width: u32, height: u32) {
        unsafe { HasContext::viewport(self, x, y, width as i32, height as i32) };
    }

    fn clear(&self, rgba: [f32; 4]) {
        unsafe {
            self.clear_color(rgba[0], rgba[1], rgba[2], rgba[3]);
            HasContext::clear(self, glow::COLOR_BUFFER_BIT);
        }
    }

    fn draw_triangles(&self, first: i32, count: i32) {
        unsafe { self.draw_arrays(glow::TRIANGLES, first, count) };
    }
}

/// Lets callers hand a `GpuContext` straight to the renderers.
impl GpuContext {
    /// The context as a [`GlBackend`].
    pub fn backend(&self) -> &dyn GlBackend {
        self.gl()
    }
}
