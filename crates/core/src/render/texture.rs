//! Cubemap texture allocation for the layered render target.
//!
//! Provides `CubemapConfig` for the storage parameters and
//! `create_cubemap` for allocating all six faces at once.

/// Storage parameters for a cubemap texture.
///
/// Faces are always RGBA8, the format the extractor reads back with
/// `UNSIGNED_BYTE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CubemapConfig {
    /// Edge length of each square face in pixels.
    pub size: u32,
    /// GL texture filter mode (e.g. `glow::LINEAR`).
    pub filter: u32,
}

impl CubemapConfig {
    /// RGBA8 with LINEAR filtering: readable with `UNSIGNED_BYTE` readback
    /// and directly writable as PNG.
    pub fn rgba8(size: u32) -> Self {
        Self {
            size,
            filter: glow::LINEAR,
        }
    }
}

/// Creates a cubemap and allocates storage for all six faces.
///
/// Wrap mode is `CLAMP_TO_EDGE` on all three axes so face seams do not
/// sample across edges.
///
/// # Errors
///
/// Returns an error string if the GL context fails to create the texture.
#[allow(unsafe_code)]
pub fn create_cubemap(gl: &glow::Context, config: &CubemapConfig) -> Result<glow::Texture, String> {
    use glow::HasContext;

    // SAFETY: glow wraps raw GL calls as unsafe. The texture is freshly
    // created and every parameter comes from CubemapConfig.
    let texture = unsafe { gl.create_texture()? };

    unsafe {
        gl.bind_texture(glow::TEXTURE_CUBE_MAP, Some(texture));

        for wrap in [
            glow::TEXTURE_WRAP_S,
            glow::TEXTURE_WRAP_T,
            glow::TEXTURE_WRAP_R,
        ] {
            gl.tex_parameter_i32(glow::TEXTURE_CUBE_MAP, wrap, glow::CLAMP_TO_EDGE as i32);
        }
        gl.tex_parameter_i32(
            glow::TEXTURE_CUBE_MAP,
            glow::TEXTURE_MIN_FILTER,
            config.filter as i32,
        );
        gl.tex_parameter_i32(
            glow::TEXTURE_CUBE_MAP,
            glow::TEXTURE_MAG_FILTER,
            config.filter as i32,
        );

        for face in crate::face::CubeFace::ALL {
            gl.tex_image_2d(
                face.gl_target(),
                0,
                glow::RGBA8 as i32,
                config.size as i32,
                config.size as i32,
                0,
                glow::RGBA,
                glow::UNSIGNED_BYTE,
                glow::PixelUnpackData::Slice(None),
            );
        }

        gl.bind_texture(glow::TEXTURE_CUBE_MAP, None);
    }

    Ok(texture)
}
