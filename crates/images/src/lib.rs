#![deny(unsafe_code)]
//! Face image artifacts for the layered cubemap sample.
//!
//! Sits on top of `cubemap-core`: turns extracted [`FaceImage`]s into PNG
//! files, loads them back, and assembles a whole cubemap into one picture
//! for inspection. The layout and pixel code is always available; everything
//! that touches the `image` crate is gated behind the `png` feature (default
//! on).
//!
//! [`FaceImage`]: cubemap_core::FaceImage

pub mod layout;
pub mod pixel;

#[cfg(feature = "png")]
pub mod snapshot;

use cubemap_core::CubeFace;

/// File name of an extracted face: `<prefix>_<suffix>.png`, e.g.
/// `cubemap_px.png` for the +X face.
pub fn face_file_name(prefix: &str, face: CubeFace) -> String {
    format!("{prefix}_{}.png", face.suffix())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_names_follow_face_order() {
        let names: Vec<_> = CubeFace::ALL
            .iter()
            .map(|&f| face_file_name("cubemap", f))
            .collect();
        assert_eq!(
            names,
            [
                "cubemap_px.png",
                "cubemap_nx.png",
                "cubemap_py.png",
                "cubemap_ny.png",
                "cubemap_pz.png",
                "cubemap_nz.png",
            ]
        );
    }

    #[test]
    fn prefix_is_used_verbatim() {
        assert_eq!(face_file_name("sky-01", CubeFace::NegativeY), "sky-01_ny.png");
    }
}
