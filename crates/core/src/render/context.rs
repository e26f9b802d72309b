//! GPU context wrapper with capability detection.
//!
//! `GpuContext` wraps a `glow::Context` and checks at initialization that the
//! driver can run the layered pass, which needs geometry shaders and
//! `gl_Layer` (desktop GL 3.2+). The shaders are GLSL `330 core`, so OpenGL ES
//! contexts are rejected whatever their version.

use crate::error::RenderError;

/// Wraps a `glow::Context` with detected GPU capabilities.
///
/// Created once by the host after making its context current. All GL calls
/// go through [`GpuContext::gl`] on that same thread.
pub struct GpuContext {
    gl: glow::Context,
    version: (u32, u32),
    is_embedded: bool,
}

impl GpuContext {
    /// Wraps `gl`, failing fast if it cannot run the layered pass.
    ///
    /// # Errors
    ///
    /// Returns `ContextUnavailable` for an OpenGL ES context or a desktop
    /// context older than 3.2.
    pub fn new(gl: glow::Context) -> Result<Self, RenderError> {
        use glow::HasContext;

        let v = gl.version();
        let version = (v.major, v.minor);
        let is_embedded = v.is_embedded;

        if !supports_layered_rendering(version, is_embedded) {
            return Err(RenderError::ContextUnavailable(format!(
                "layered rendering needs desktop GL 3.2+; context is {}{}.{}",
                if is_embedded { "ES " } else { "" },
                version.0,
                version.1
            )));
        }

        tracing::info!(
            major = version.0,
            minor = version.1,
            embedded = is_embedded,
            vendor = %v.vendor_info,
            "GL context ready"
        );

        Ok(Self {
            gl,
            version,
            is_embedded,
        })
    }

    /// Returns a reference to the underlying `glow::Context`.
    pub fn gl(&self) -> &glow::Context {
        &self.gl
    }

    /// Consumes this wrapper and returns the underlying `glow::Context`.
    pub fn into_gl(self) -> glow::Context {
        self.gl
    }

    /// `(major, minor)` context version.
    pub fn version(&self) -> (u32, u32) {
        self.version
    }

    pub fn is_embedded(&self) -> bool {
        self.is_embedded
    }
}

/// Whether a context can build the layered program: desktop GL 3.2 or later.
pub fn supports_layered_rendering(version: (u32, u32), is_embedded: bool) -> bool {
    !is_embedded && version >= (3, 2)
}
