#![deny(unsafe_code)]
//! Core of the layered cubemap rendering sample.
//!
//! Provides GL diagnostics (`drain_error_queue`, `report_framebuffer_status`),
//! cubemap face readback (`extract_cubemap_faces`), the `QuadRenderer` that
//! displays a cubemap, and the `LayeredCubemap` pass that renders all six
//! faces with one geometry-shader draw. GPU access goes through the
//! `GlBackend` trait; the `render` feature implements it for `glow`.

pub mod backend;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod extract;
pub mod face;
pub mod handle;
pub mod image;
pub mod layered;
pub mod quad;
pub mod shader;
pub mod shaders;

#[cfg(feature = "render")]
pub mod render;

#[cfg(any(test, feature = "test-util"))]
pub mod testing;

pub use backend::{GlBackend, ShaderStage};
pub use config::SampleConfig;
pub use diagnostics::{drain_error_queue, report_framebuffer_status, FramebufferStatus, GlError};
pub use error::RenderError;
pub use extract::{extract_cubemap_faces, read_cubemap, try_extract_cubemap_faces};
pub use face::CubeFace;
pub use handle::{FramebufferHandle, ProgramHandle, ShaderHandle, TextureHandle, VertexArrayHandle};
pub use image::{CubemapImages, FaceImage, FaceSink};
pub use layered::LayeredCubemap;
pub use quad::{QuadRenderer, RendererState};
