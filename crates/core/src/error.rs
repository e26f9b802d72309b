//! Error types for the cubemap sample core.

use thiserror::Error;

use crate::diagnostics::{FramebufferStatus, GlError};
use crate::face::CubeFace;
use crate::shader::ShaderError;

/// Errors produced by rendering and readback operations.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The bound framebuffer failed its completeness check.
    #[error("framebuffer incomplete: {0}")]
    FramebufferIncomplete(FramebufferStatus),

    /// The driver reported one or more errors after a GPU operation.
    #[error("driver reported {}", format_errors(.0))]
    Driver(Vec<GlError>),

    /// A texture or framebuffer name is zero or unknown to the driver.
    #[error("invalid handle: {0}")]
    InvalidHandle(String),

    /// Width or height was zero.
    #[error("invalid dimensions: width and height must be non-zero")]
    InvalidDimensions,

    /// A cubemap face's storage does not match the requested size.
    #[error(
        "dimension mismatch on face {face}: requested {expected_w}x{expected_h}, storage is {actual_w}x{actual_h}"
    )]
    DimensionMismatch {
        face: CubeFace,
        expected_w: u32,
        expected_h: u32,
        actual_w: u32,
        actual_h: u32,
    },

    /// Shader compilation or linking failed.
    #[error(transparent)]
    Shader(#[from] ShaderError),

    /// A GL object could not be created, usually because no context is current.
    #[error("graphics context unavailable: {0}")]
    ContextUnavailable(String),

    /// An operation was called in a lifecycle state that does not allow it.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// A configuration value was rejected.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// Writing or reading an image artifact failed.
    #[error("I/O error: {0}")]
    Io(String),
}

fn format_errors(errors: &[GlError]) -> String {
    errors
        .iter()
        .map(|e| e.label())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn driver_error_lists_every_label() {
        let err = RenderError::Driver(vec![GlError::InvalidEnum, GlError::OutOfMemory]);
        let msg = err.to_string();
        assert!(msg.contains("GL_INVALID_ENUM"), "missing first label in: {msg}");
        assert!(msg.contains("GL_OUT_OF_MEMORY"), "missing second label in: {msg}");
    }

    #[test]
    fn framebuffer_incomplete_names_cause() {
        let err = RenderError::FramebufferIncomplete(FramebufferStatus::MissingAttachment);
        let msg = err.to_string();
        assert!(msg.contains("no attachments"), "missing cause in: {msg}");
    }

    #[test]
    fn dimension_mismatch_includes_face_and_sizes() {
        let err = RenderError::DimensionMismatch {
            face: CubeFace::NegativeY,
            expected_w: 512,
            expected_h: 256,
            actual_w: 1024,
            actual_h: 1000,
        };
        let msg = err.to_string();
        assert!(msg.contains("-Y"), "missing face in: {msg}");
        assert!(msg.contains("512x256"), "missing requested size in: {msg}");
        assert!(msg.contains("1024x1000"), "missing storage size in: {msg}");
    }

    #[test]
    fn shader_error_converts_transparently() {
        let err: RenderError = ShaderError::LinkError("varying mismatch".into()).into();
        assert!(err.to_string().contains("varying mismatch"));
    }

    #[test]
    fn render_error_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<RenderError>();
    }

    #[test]
    fn render_error_implements_std_error() {
        fn assert_std_error<T: std::error::Error>() {}
        assert_std_error::<RenderError>();
    }
}
