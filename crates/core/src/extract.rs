//! Cubemap readback: copies each face of a cubemap texture into host memory.
//!
//! Faces are read in [`CubeFace::ALL`] order through a temporary framebuffer,
//! one `glReadPixels` per face. Readback stalls the calling thread until the
//! GPU has finished every command touching the texture.
//!
//! Extraction stops at the first failing face. Faces handed to the sink before
//! that stay wherever the sink put them.

use crate::backend::GlBackend;
use crate::diagnostics::{drain_error_queue, report_framebuffer_status};
use crate::error::RenderError;
use crate::face::CubeFace;
use crate::handle::TextureHandle;
use crate::image::{rgba_len, CubemapImages, FaceImage, FaceSink};

/// Reads all six faces of `texture` into `sink`.
///
/// Returns `true` only when every face was read and accepted. On failure the
/// cause is logged and `false` returned; use [`try_extract_cubemap_faces`] to
/// get the cause instead.
pub fn extract_cubemap_faces<B, S>(
    gl: &B,
    texture: TextureHandle,
    width: u32,
    height: u32,
    sink: &mut S,
) -> bool
where
    B: GlBackend + ?Sized,
    S: FaceSink + ?Sized,
{
    match try_extract_cubemap_faces(gl, texture, width, height, sink) {
        Ok(()) => true,
        Err(e) => {
            tracing::error!(%texture, width, height, "cubemap extraction failed: {e}");
            false
        }
    }
}

/// Reads all six faces of `texture` into memory.
pub fn read_cubemap<B: GlBackend + ?Sized>(
    gl: &B,
    texture: TextureHandle,
    width: u32,
    height: u32,
) -> Result<CubemapImages, RenderError> {
    let mut images = CubemapImages::new();
    try_extract_cubemap_faces(gl, texture, width, height, &mut images)?;
    Ok(images)
}

/// Reads all six faces of `texture` into `sink`, stopping at the first error.
///
/// # Errors
///
/// * `InvalidDimensions` if `width` or `height` is zero.
/// * `InvalidHandle` if `texture` is zero or not a texture.
/// * `DimensionMismatch` if a face's storage is not `width x height`.
/// * `FramebufferIncomplete` if a face cannot be attached for reading.
/// * `Driver` if the driver queued errors during a face's readback.
/// * Any error returned by the sink.
pub fn try_extract_cubemap_faces<B, S>(
    gl: &B,
    texture: TextureHandle,
    width: u32,
    height: u32,
    sink: &mut S,
) -> Result<(), RenderError>
where
    B: GlBackend + ?Sized,
    S: FaceSink + ?Sized,
{
    if width == 0 || height == 0 {
        return Err(RenderError::InvalidDimensions);
    }
    if texture.is_null() || !gl.is_texture(texture) {
        return Err(RenderError::InvalidHandle(texture.to_string()));
    }

    let stale = drain_error_queue(gl, file!(), line!());
    if !stale.is_empty() {
        tracing::warn!(
            count = stale.len(),
            "discarded GL errors queued before cubemap extraction"
        );
    }

    let previous = gl.current_framebuffer();
    let fbo = gl
        .create_framebuffer()
        .map_err(RenderError::ContextUnavailable)?;
    gl.bind_framebuffer(fbo);

    let result = CubeFace::ALL.into_iter().try_for_each(|face| {
        let image = read_face(gl, texture, face, width, height)?;
        sink.accept(image)
    });

    gl.bind_framebuffer(previous);
    gl.delete_framebuffer(fbo);

    match &result {
        Ok(()) => tracing::debug!(%texture, width, height, "extracted six cubemap faces"),
        // Nothing from the failed face may stay queued for the host.
        Err(_) => {
            drain_error_queue(gl, file!(), line!());
        }
    }
    result
}

fn read_face<B: GlBackend + ?Sized>(
    gl: &B,
    texture: TextureHandle,
    face: CubeFace,
    width: u32,
    height: u32,
) -> Result<FaceImage, RenderError> {
    let (actual_w, actual_h) = gl.cubemap_face_size(texture, face);
    if (actual_w, actual_h) != (width, height) {
        return Err(RenderError::DimensionMismatch {
            face,
            expected_w: width,
            expected_h: height,
            actual_w,
            actual_h,
        });
    }

    gl.attach_cubemap_face(texture, face);
    let status = report_framebuffer_status(gl);
    if !status.is_complete() {
        return Err(RenderError::FramebufferIncomplete(status));
    }

    let mut pixels = vec![0u8; rgba_len(width, height)];
    gl.read_pixels_rgba(width, height, &mut pixels);

    let errors = drain_error_queue(gl, file!(), line!());
    if !errors.is_empty() {
        return Err(RenderError::Driver(errors));
    }

    tracing::trace!(%face, width, height, "read cubemap face");
    FaceImage::from_gl_rows(face, width, height, pixels)
}
