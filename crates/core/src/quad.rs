//! Quad renderer: displays a cubemap on the host's default framebuffer.
//!
//! The renderer samples whatever cubemap it is given along a view ray steered
//! by the pointer position. It owns only its program and vertex array; the
//! default framebuffer and the cubemap texture belong to the host.

use crate::backend::GlBackend;
use crate::config::SampleConfig;
use crate::diagnostics::drain_error_queue;
use crate::error::RenderError;
use crate::handle::{FramebufferHandle, ProgramHandle, TextureHandle, VertexArrayHandle};
use crate::shader::{compile_program, ProgramSources};
use crate::shaders::{QUAD_FRAGMENT_SHADER, QUAD_VERTEX_SHADER};

/// Lifecycle of a [`QuadRenderer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RendererState {
    /// Constructed; viewport is the configured initial size.
    Initialized,
    /// Resized since the last draw.
    Resized,
    /// At least one frame drawn at the current size.
    Rendering,
    /// GPU objects released; no further draws.
    Disposed,
}

#[derive(Debug, Clone, Copy)]
struct Uniforms {
    cubemap: Option<u32>,
    resolution: Option<u32>,
    mouse: Option<u32>,
}

/// Draws a fullscreen view of a cubemap into the default framebuffer.
pub struct QuadRenderer {
    default_framebuffer: FramebufferHandle,
    program: ProgramHandle,
    vertex_array: VertexArrayHandle,
    uniforms: Uniforms,
    size: (u32, u32),
    mouse_coords: (f32, f32),
    color_cubemap_texture: TextureHandle,
    clear_color: [f32; 4],
    state: RendererState,
}

impl QuadRenderer {
    /// Creates a renderer drawing into `default_framebuffer`.
    ///
    /// The viewport starts at `config.viewport` until [`resize`](Self::resize)
    /// is called.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDimensions` for a zero viewport, `Shader` if the quad
    /// program does not build, or `ContextUnavailable` if GL objects cannot
    /// be created.
    pub fn new<B: GlBackend + ?Sized>(
        gl: &B,
        default_framebuffer: FramebufferHandle,
        config: &SampleConfig,
    ) -> Result<Self, RenderError> {
        let [width, height] = config.viewport;
        if width == 0 || height == 0 {
            return Err(RenderError::InvalidDimensions);
        }

        let program = compile_program(
            gl,
            &ProgramSources {
                vertex: QUAD_VERTEX_SHADER,
                geometry: None,
                fragment: QUAD_FRAGMENT_SHADER,
            },
        )?;

        let vertex_array = match gl.create_vertex_array() {
            Ok(vao) => vao,
            Err(e) => {
                gl.delete_program(program);
                return Err(RenderError::ContextUnavailable(e));
            }
        };

        let uniforms = Uniforms {
            cubemap: gl.uniform_location(program, "u_cubemap"),
            resolution: gl.uniform_location(program, "u_resolution"),
            mouse: gl.uniform_location(program, "u_mouse"),
        };

        tracing::debug!(
            %default_framebuffer,
            width,
            height,
            "quad renderer initialized"
        );

        Ok(Self {
            default_framebuffer,
            program,
            vertex_array,
            uniforms,
            size: (width, height),
            mouse_coords: (0.0, 0.0),
            color_cubemap_texture: TextureHandle::NULL,
            clear_color: config.clear_color,
            state: RendererState::Initialized,
        })
    }

    /// Renders one frame at the current viewport size.
    ///
    /// With no cubemap set the frame is only cleared.
    ///
    /// # Errors
    ///
    /// Returns `InvalidState` after [`dispose`](Self::dispose), or `Driver`
    /// when the driver queued errors during the frame (for example because the
    /// cubemap handle names no texture). The errors are also logged.
    pub fn draw<B: GlBackend + ?Sized>(&mut self, gl: &B) -> Result<(), RenderError> {
        if self.state == RendererState::Disposed {
            return Err(RenderError::InvalidState(
                "draw called on a disposed quad renderer".into(),
            ));
        }

        let (width, height) = self.size;
        gl.bind_framebuffer(self.default_framebuffer);
        gl.viewport(0, 0, width, height);
        gl.clear(self.clear_color);

        if self.color_cubemap_texture.is_null() {
            tracing::debug!("no cubemap set; drawing empty frame");
        } else {
            gl.use_program(self.program);
            gl.bind_cubemap(0, self.color_cubemap_texture);
            if let Some(loc) = self.uniforms.cubemap {
                gl.uniform_i32(loc, 0);
            }
            if let Some(loc) = self.uniforms.resolution {
                gl.uniform_vec2(loc, [width as f32, height as f32]);
            }
            if let Some(loc) = self.uniforms.mouse {
                gl.uniform_vec2(loc, [self.mouse_coords.0, self.mouse_coords.1]);
            }
            gl.bind_vertex_array(self.vertex_array);
            gl.draw_triangles(0, 3);
            gl.bind_vertex_array(VertexArrayHandle::NULL);
            gl.bind_cubemap(0, TextureHandle::NULL);
            gl.use_program(ProgramHandle::NULL);
        }

        self.state = RendererState::Rendering;

        let errors = drain_error_queue(gl, file!(), line!());
        if errors.is_empty() {
            Ok(())
        } else {
            Err(RenderError::Driver(errors))
        }
    }

    /// Sets the viewport used by subsequent draws.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDimensions` for a zero side (e.g. a minimized window),
    /// leaving the previous size in place.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), RenderError> {
        if width == 0 || height == 0 {
            return Err(RenderError::InvalidDimensions);
        }
        if self.state == RendererState::Disposed {
            return Err(RenderError::InvalidState(
                "resize called on a disposed quad renderer".into(),
            ));
        }
        self.size = (width, height);
        self.state = RendererState::Resized;
        Ok(())
    }

    /// Releases the program and vertex array. The host's framebuffer and
    /// cubemap are left alone.
    pub fn dispose<B: GlBackend + ?Sized>(&mut self, gl: &B) {
        if self.state == RendererState::Disposed {
            return;
        }
        gl.delete_vertex_array(self.vertex_array);
        gl.delete_program(self.program);
        self.state = RendererState::Disposed;
    }

    pub fn state(&self) -> RendererState {
        self.state
    }

    /// Current viewport size.
    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    pub fn default_framebuffer(&self) -> FramebufferHandle {
        self.default_framebuffer
    }

    /// Last pointer position in renderer-local pixels.
    pub fn mouse_coords(&self) -> (f32, f32) {
        self.mouse_coords
    }

    pub fn set_mouse_coords(&mut self, x: f32, y: f32) {
        self.mouse_coords = (x, y);
    }

    /// The cubemap sampled by [`draw`](Self::draw).
    pub fn color_cubemap_texture(&self) -> TextureHandle {
        self.color_cubemap_texture
    }

    /// Sets the cubemap to sample. Not validated; a bad handle surfaces as a
    /// driver error from the next draw.
    pub fn set_color_cubemap_texture(&mut self, texture: TextureHandle) {
        self.color_cubemap_texture = texture;
    }
}
