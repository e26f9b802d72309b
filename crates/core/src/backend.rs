//! The narrow GL surface used by the diagnostics, readback, and renderers.
//!
//! `GlBackend` exposes only the calls this crate issues, as safe methods over
//! plain object names. With the `render` feature it is implemented for
//! `glow::Context` (see [`crate::render`]); tests drive the same code through
//! a recording mock. Every method must be called on the thread that owns the
//! current GL context.

use crate::face::CubeFace;
use crate::handle::{
    FramebufferHandle, ProgramHandle, ShaderHandle, TextureHandle, VertexArrayHandle,
};

/// A programmable pipeline stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Geometry,
    Fragment,
}

impl ShaderStage {
    /// The GL shader type enum.
    pub fn gl_enum(self) -> u32 {
        match self {
            ShaderStage::Vertex => 0x8B31,
            ShaderStage::Geometry => 0x8DD9,
            ShaderStage::Fragment => 0x8B30,
        }
    }

    /// Lowercase stage name used in error messages.
    pub fn name(self) -> &'static str {
        match self {
            ShaderStage::Vertex => "vertex",
            ShaderStage::Geometry => "geometry",
            ShaderStage::Fragment => "fragment",
        }
    }
}

/// GL calls needed by this crate.
///
/// Methods mirror single GL entry points. None of them check the error queue;
/// callers poll it with [`crate::diagnostics::drain_error_queue`].
pub trait GlBackend {
    /// `glGetError`: pops one pending error code, `0` when the queue is empty.
    fn get_error(&self) -> u32;

    /// `glCheckFramebufferStatus(GL_FRAMEBUFFER)` for the bound framebuffer.
    fn check_framebuffer_status(&self) -> u32;

    fn create_framebuffer(&self) -> Result<FramebufferHandle, String>;

    fn delete_framebuffer(&self, framebuffer: FramebufferHandle);

    /// Binds `framebuffer` for drawing and reading.
    fn bind_framebuffer(&self, framebuffer: FramebufferHandle);

    /// The framebuffer currently bound for drawing.
    fn current_framebuffer(&self) -> FramebufferHandle;

    /// Attaches a single face of a cubemap as `COLOR_ATTACHMENT0` of the bound
    /// framebuffer and selects it as the read buffer.
    fn attach_cubemap_face(&self, texture: TextureHandle, face: CubeFace);

    /// Attaches all faces of a cubemap as a layered `COLOR_ATTACHMENT0`.
    fn attach_cubemap_layered(&self, texture: TextureHandle);

    /// Allocates an RGBA8 cubemap with `size x size` faces, linear filtering
    /// and clamp-to-edge wrapping.
    fn create_cubemap(&self, size: u32) -> Result<TextureHandle, String>;

    fn delete_texture(&self, texture: TextureHandle);

    /// `glIsTexture`.
    fn is_texture(&self, texture: TextureHandle) -> bool;

    /// Level-0 storage size of one cubemap face, `(0, 0)` if `texture` is not
    /// a cubemap. The cubemap binding of the active unit is left unchanged.
    fn cubemap_face_size(&self, texture: TextureHandle, face: CubeFace) -> (u32, u32);

    /// Binds `texture` to `TEXTURE_CUBE_MAP` on texture unit `unit`.
    fn bind_cubemap(&self, unit: u32, texture: TextureHandle);

    /// Reads an RGBA8 rectangle from the read buffer at the origin, rows
    /// bottom-up, with pack alignment 1. The host's pack alignment is restored
    /// afterwards. `out` holds `width * height * 4` bytes.
    fn read_pixels_rgba(&self, width: u32, height: u32, out: &mut [u8]);

    fn create_shader(&self, stage: ShaderStage) -> Result<ShaderHandle, String>;

    /// Sets the shader source and compiles it.
    fn compile_shader_source(&self, shader: ShaderHandle, source: &str);

    fn shader_compile_status(&self, shader: ShaderHandle) -> bool;

    fn shader_info_log(&self, shader: ShaderHandle) -> String;

    fn delete_shader(&self, shader: ShaderHandle);

    fn create_program(&self) -> Result<ProgramHandle, String>;

    fn attach_shader(&self, program: ProgramHandle, shader: ShaderHandle);

    fn detach_shader(&self, program: ProgramHandle, shader: ShaderHandle);

    fn link_program(&self, program: ProgramHandle);

    fn program_link_status(&self, program: ProgramHandle) -> bool;

    fn program_info_log(&self, program: ProgramHandle) -> String;

    fn delete_program(&self, program: ProgramHandle);

    /// Installs `program`; [`ProgramHandle::NULL`] uninstalls.
    fn use_program(&self, program: ProgramHandle);

    /// Location of an active uniform, `None` if the linker dropped it.
    fn uniform_location(&self, program: ProgramHandle, name: &str) -> Option<u32>;

    fn uniform_i32(&self, location: u32, value: i32);

    fn uniform_f32(&self, location: u32, value: f32);

    fn uniform_vec2(&self, location: u32, value: [f32; 2]);

    /// Uploads `values.len() / 16` column-major matrices.
    fn uniform_mat4_array(&self, location: u32, values: &[f32]);

    fn create_vertex_array(&self) -> Result<VertexArrayHandle, String>;

    fn bind_vertex_array(&self, vertex_array: VertexArrayHandle);

    fn delete_vertex_array(&self, vertex_array: VertexArrayHandle);

    fn viewport(&self, x: i32, y: i32, width: u32, height: u32);

    /// Clears the color buffer of the bound framebuffer to `rgba`.
    fn clear(&self, rgba: [f32; 4]);

    /// `glDrawArrays(GL_TRIANGLES, first, count)`.
    fn draw_triangles(&self, first: i32, count: i32);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_enums_match_gl() {
        assert_eq!(ShaderStage::Vertex.gl_enum(), 0x8B31);
        assert_eq!(ShaderStage::Fragment.gl_enum(), 0x8B30);
        assert_eq!(ShaderStage::Geometry.gl_enum(), 0x8DD9);
    }

    #[test]
    fn backend_is_object_safe() {
        fn _assert_object_safe(_: &dyn GlBackend) {}
    }
}
