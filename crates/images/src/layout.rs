//! Assembles six cubemap faces into one image for inspection.
//!
//! Two layouts are supported:
//!
//! ```text
//! Cross (4 x 3 tiles)          Strip (6 x 1 tiles)
//!       +Y                     +X -X +Y -Y +Z -Z
//!    -X +Z +X -Z
//!       -Y
//! ```
//!
//! The strip follows the face order used everywhere else in the sample, so
//! tile `i` is layer `i` of the cubemap.

use std::fmt;
use std::str::FromStr;

use cubemap_core::{CubeFace, CubemapImages, RenderError};

use crate::pixel::{blit, checkerboard};

/// Arrangement of faces in an assembled image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Layout {
    /// Horizontal cross, unfolded around +Z.
    #[default]
    Cross,
    /// All faces side by side in layer order.
    Strip,
}

impl Layout {
    pub fn name(self) -> &'static str {
        match self {
            Layout::Cross => "cross",
            Layout::Strip => "strip",
        }
    }

    /// Grid size in tiles, `(columns, rows)`.
    pub fn grid(self) -> (u32, u32) {
        match self {
            Layout::Cross => (4, 3),
            Layout::Strip => (6, 1),
        }
    }

    /// Tile `(column, row)` of a face.
    pub fn tile(self, face: CubeFace) -> (u32, u32) {
        match self {
            Layout::Strip => (face.index() as u32, 0),
            Layout::Cross => match face {
                CubeFace::PositiveY => (1, 0),
                CubeFace::NegativeX => (0, 1),
                CubeFace::PositiveZ => (1, 1),
                CubeFace::PositiveX => (2, 1),
                CubeFace::NegativeZ => (3, 1),
                CubeFace::NegativeY => (1, 2),
            },
        }
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Layout {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cross" => Ok(Layout::Cross),
            "strip" => Ok(Layout::Strip),
            other => Err(RenderError::InvalidConfig(format!(
                "unknown layout '{other}' (expected cross or strip)"
            ))),
        }
    }
}

/// An assembled RGBA8 image, top row first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assembled {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

/// Places every face of `images` on the `layout` grid.
///
/// All six faces must be present and share one size. Empty cross cells are
/// filled with a dim checkerboard.
pub fn assemble(images: &CubemapImages, layout: Layout) -> Result<Assembled, RenderError> {
    if !images.is_complete() {
        return Err(RenderError::InvalidConfig(format!(
            "need all six faces to assemble, have {}",
            images.len()
        )));
    }

    let first = images
        .get(CubeFace::PositiveX)
        .ok_or_else(|| RenderError::InvalidConfig("missing +X face".into()))?;
    let (tile_w, tile_h) = (first.width(), first.height());
    if let Some(odd) = images
        .iter()
        .find(|img| (img.width(), img.height()) != (tile_w, tile_h))
    {
        return Err(RenderError::DimensionMismatch {
            face: odd.face(),
            expected_w: tile_w,
            expected_h: tile_h,
            actual_w: odd.width(),
            actual_h: odd.height(),
        });
    }

    let (cols, rows) = layout.grid();
    let width = tile_w * cols;
    let height = tile_h * rows;
    let mut pixels = match layout {
        Layout::Cross => checkerboard(width, height, (tile_w / 8).max(1)),
        Layout::Strip => vec![0; width as usize * height as usize * 4],
    };

    for img in images.iter() {
        let (col, row) = layout.tile(img.face());
        blit(
            &mut pixels,
            width,
            img.pixels(),
            tile_w,
            tile_h,
            col * tile_w,
            row * tile_h,
        );
    }

    tracing::debug!(%layout, width, height, "assembled cubemap faces");
    Ok(Assembled {
        width,
        height,
        pixels,
    })
}
