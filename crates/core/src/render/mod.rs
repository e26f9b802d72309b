//! OpenGL binding through `glow`.
//!
//! This module is only available when the `render` feature is enabled. It
//! implements [`GlBackend`](crate::backend::GlBackend) for `glow::Context`
//! and provides context capability checks and cubemap allocation.
//!
//! # Module overview
//!
//! - [`context`] -- GPU context wrapper with capability detection.
//! - [`gl`] -- `GlBackend` implementation for `glow::Context`.
//! - [`texture`] -- Cubemap configuration and creation helpers.

pub mod context;
pub mod gl;
pub mod texture;

pub use context::{supports_layered_rendering, GpuContext};
pub use texture::{create_cubemap, CubemapConfig};
