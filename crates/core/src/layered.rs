//! Layered cubemap pass: fills all six faces of a cubemap in one draw.
//!
//! The cubemap is attached to a framebuffer as a layered color attachment.
//! One fullscreen triangle goes in; the geometry shader emits it six times,
//! setting `gl_Layer` to the face index and passing the world-space view
//! direction of each corner, so the fragment shader shades every face from
//! the same function of direction.

use crate::backend::GlBackend;
use crate::config::SampleConfig;
use crate::diagnostics::{drain_error_queue, report_framebuffer_status};
use crate::error::RenderError;
use crate::face::inverse_view_projections;
use crate::handle::{FramebufferHandle, ProgramHandle, TextureHandle, VertexArrayHandle};
use crate::shader::{compile_program, ProgramSources};
use crate::shaders::{LAYERED_FRAGMENT_SHADER, LAYERED_GEOMETRY_SHADER, LAYERED_VERTEX_SHADER};

/// Owns a cubemap render target and the program that renders into it.
pub struct LayeredCubemap {
    texture: TextureHandle,
    framebuffer: FramebufferHandle,
    program: ProgramHandle,
    vertex_array: VertexArrayHandle,
    size: u32,
    time_location: Option<u32>,
}

impl LayeredCubemap {
    /// Allocates a `config.cubemap_size` cubemap, attaches it layered, and
    /// builds the layered program.
    ///
    /// # Errors
    ///
    /// `InvalidDimensions` for a zero size, `ContextUnavailable` if GL objects
    /// cannot be created, `FramebufferIncomplete` if the driver rejects the
    /// layered attachment, or `Shader`. Everything created so far is released
    /// on error.
    pub fn new<B: GlBackend + ?Sized>(gl: &B, config: &SampleConfig) -> Result<Self, RenderError> {
        let size = config.cubemap_size;
        if size == 0 {
            return Err(RenderError::InvalidDimensions);
        }

        let texture = gl
            .create_cubemap(size)
            .map_err(RenderError::ContextUnavailable)?;
        let framebuffer = match gl.create_framebuffer() {
            Ok(fbo) => fbo,
            Err(e) => {
                gl.delete_texture(texture);
                return Err(RenderError::ContextUnavailable(e));
            }
        };

        let previous = gl.current_framebuffer();
        gl.bind_framebuffer(framebuffer);
        gl.attach_cubemap_layered(texture);
        let status = report_framebuffer_status(gl);
        gl.bind_framebuffer(previous);

        let built = if status.is_complete() {
            Self::build_program(gl)
        } else {
            Err(RenderError::FramebufferIncomplete(status))
        };

        let (program, vertex_array) = match built {
            Ok(objects) => objects,
            Err(e) => {
                gl.delete_framebuffer(framebuffer);
                gl.delete_texture(texture);
                return Err(e);
            }
        };

        let time_location = gl.uniform_location(program, "u_time");
        if let Some(loc) = gl.uniform_location(program, "u_inv_view_proj") {
            gl.use_program(program);
            gl.uniform_mat4_array(loc, &inverse_view_projections());
            gl.use_program(ProgramHandle::NULL);
        }

        tracing::debug!(%texture, size, "layered cubemap target created");

        Ok(Self {
            texture,
            framebuffer,
            program,
            vertex_array,
            size,
            time_location,
        })
    }

    fn build_program<B: GlBackend + ?Sized>(
        gl: &B,
    ) -> Result<(ProgramHandle, VertexArrayHandle), RenderError> {
        let program = compile_program(
            gl,
            &ProgramSources {
                vertex: LAYERED_VERTEX_SHADER,
                geometry: Some(LAYERED_GEOMETRY_SHADER),
                fragment: LAYERED_FRAGMENT_SHADER,
            },
        )?;
        match gl.create_vertex_array() {
            Ok(vao) => Ok((program, vao)),
            Err(e) => {
                gl.delete_program(program);
                Err(RenderError::ContextUnavailable(e))
            }
        }
    }

    /// Renders all six faces for animation time `time` (seconds).
    ///
    /// Restores the previously bound framebuffer; the caller must reset its
    /// own viewport afterwards.
    ///
    /// # Errors
    ///
    /// Returns `Driver` if the driver queued errors during the pass.
    pub fn render<B: GlBackend + ?Sized>(&self, gl: &B, time: f32) -> Result<(), RenderError> {
        let previous = gl.current_framebuffer();
        gl.bind_framebuffer(self.framebuffer);
        gl.viewport(0, 0, self.size, self.size);
        gl.clear([0.0, 0.0, 0.0, 1.0]);

        gl.use_program(self.program);
        if let Some(loc) = self.time_location {
            gl.uniform_f32(loc, time);
        }
        gl.bind_vertex_array(self.vertex_array);
        gl.draw_triangles(0, 3);
        gl.bind_vertex_array(VertexArrayHandle::NULL);
        gl.use_program(ProgramHandle::NULL);
        gl.bind_framebuffer(previous);

        let errors = drain_error_queue(gl, file!(), line!());
        if errors.is_empty() {
            Ok(())
        } else {
            Err(RenderError::Driver(errors))
        }
    }

    /// The cubemap rendered into; hand this to the quad renderer or extractor.
    pub fn texture(&self) -> TextureHandle {
        self.texture
    }

    /// Edge length of each face in pixels.
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Deletes the cubemap, framebuffer, program, and vertex array.
    pub fn destroy<B: GlBackend + ?Sized>(self, gl: &B) {
        gl.delete_vertex_array(self.vertex_array);
        gl.delete_program(self.program);
        gl.delete_framebuffer(self.framebuffer);
        gl.delete_texture(self.texture);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::ShaderStage;
    use crate::diagnostics::FramebufferStatus;
    use crate::extract::read_cubemap;
    use crate::face::CubeFace;
    use crate::quad::QuadRenderer;
    use crate::testing::{Call, MockGl, UniformValue};

    fn config(size: u32) -> SampleConfig {
        SampleConfig {
            cubemap_size: size,
            ..SampleConfig::default()
        }
    }

    #[test]
    fn new_attaches_cubemap_layered_and_uploads_matrices() {
        let gl = MockGl::new();
        let layered = LayeredCubemap::new(&gl, &config(32)).unwrap();

        assert!(gl.calls().contains(&Call::AttachLayered(layered.texture())));
        match gl.uniform("u_inv_view_proj") {
            Some(UniformValue::Mat4Array(values)) => assert_eq!(values.len(), 6 * 16),
            other => panic!("expected six matrices, got {other:?}"),
        }
        assert_eq!(gl.cubemap_face_size(layered.texture(), CubeFace::NegativeZ), (32, 32));
        assert_eq!(gl.bound_framebuffer(), FramebufferHandle::DEFAULT);
    }

    #[test]
    fn render_draws_once_at_face_size_and_restores_binding() {
        let gl = MockGl::new();
        let layered = LayeredCubemap::new(&gl, &config(64)).unwrap();
        gl.bind_framebuffer(FramebufferHandle(77));
        gl.clear_calls();

        layered.render(&gl, 1.5).unwrap();

        assert_eq!(gl.draw_count(), 1, "one draw fills all six layers");
        assert_eq!(gl.last_viewport(), Some((0, 0, 64, 64)));
        assert_eq!(gl.uniform("u_time"), Some(UniformValue::F32(1.5)));
        assert_eq!(gl.bound_framebuffer(), FramebufferHandle(77));
    }

    #[test]
    fn incomplete_layered_attachment_releases_everything() {
        let gl = MockGl::new();
        gl.set_framebuffer_status(FramebufferStatus::IncompleteLayerTargets.code());

        let err = LayeredCubemap::new(&gl, &config(16)).err().unwrap();

        assert!(matches!(
            err,
            RenderError::FramebufferIncomplete(FramebufferStatus::IncompleteLayerTargets)
        ));
        assert_eq!(gl.live_textures(), 0);
        assert_eq!(gl.live_framebuffers(), 0);
        assert_eq!(gl.live_programs(), 0);
    }

    #[test]
    fn geometry_shader_failure_releases_target() {
        let gl = MockGl::new();
        gl.fail_compile(ShaderStage::Geometry);
        let err = LayeredCubemap::new(&gl, &config(16)).err().unwrap();
        assert!(matches!(err, RenderError::Shader(_)));
        assert_eq!(gl.live_textures(), 0);
        assert_eq!(gl.live_framebuffers(), 0);
    }

    #[test]
    fn zero_size_is_rejected() {
        let gl = MockGl::new();
        assert!(matches!(
            LayeredCubemap::new(&gl, &config(0)).err(),
            Some(RenderError::InvalidDimensions)
        ));
    }

    #[test]
    fn destroy_releases_all_objects() {
        let gl = MockGl::new();
        let layered = LayeredCubemap::new(&gl, &config(8)).unwrap();
        layered.destroy(&gl);
        assert_eq!(gl.live_textures(), 0);
        assert_eq!(gl.live_framebuffers(), 0);
        assert_eq!(gl.live_programs(), 0);
        assert_eq!(gl.live_vertex_arrays(), 0);
    }

    #[test]
    fn layered_output_feeds_quad_and_extractor() {
        let gl = MockGl::new();
        let config = config(4);
        let layered = LayeredCubemap::new(&gl, &config).unwrap();
        let mut quad = QuadRenderer::new(&gl, FramebufferHandle::DEFAULT, &config).unwrap();
        quad.set_color_cubemap_texture(layered.texture());

        layered.render(&gl, 0.0).unwrap();
        quad.draw(&gl).unwrap();
        let images = read_cubemap(&gl, layered.texture(), layered.size(), layered.size()).unwrap();

        assert!(images.is_complete());
        assert_eq!(gl.draw_count(), 2);
    }
}
