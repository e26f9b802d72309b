//! Cubemap face enumeration.
//!
//! Faces are always visited in GL order: `+X, -X, +Y, -Y, +Z, -Z`. The
//! layered pass writes face `i` to `gl_Layer = i`, extraction reads faces in
//! this order, and artifact file names use [`CubeFace::suffix`]. Anything that
//! consumes extracted images can rely on that order.

use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

/// One of the six faces of a cubemap texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CubeFace {
    PositiveX,
    NegativeX,
    PositiveY,
    NegativeY,
    PositiveZ,
    NegativeZ,
}

/// GL enum of `TEXTURE_CUBE_MAP_POSITIVE_X`; the other faces follow in order.
pub const TEXTURE_CUBE_MAP_POSITIVE_X: u32 = 0x8515;

impl CubeFace {
    /// All faces in layer order.
    pub const ALL: [CubeFace; 6] = [
        CubeFace::PositiveX,
        CubeFace::NegativeX,
        CubeFace::PositiveY,
        CubeFace::NegativeY,
        CubeFace::PositiveZ,
        CubeFace::NegativeZ,
    ];

    /// Layer index of this face (0..6).
    pub fn index(self) -> usize {
        match self {
            CubeFace::PositiveX => 0,
            CubeFace::NegativeX => 1,
            CubeFace::PositiveY => 2,
            CubeFace::NegativeY => 3,
            CubeFace::PositiveZ => 4,
            CubeFace::NegativeZ => 5,
        }
    }

    /// Face for a layer index, or `None` past the sixth face.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// The `TEXTURE_CUBE_MAP_*` target used to attach or upload this face.
    pub fn gl_target(self) -> u32 {
        TEXTURE_CUBE_MAP_POSITIVE_X + self.index() as u32
    }

    /// Short name used in artifact file names (`px`, `nx`, ...).
    pub fn suffix(self) -> &'static str {
        match self {
            CubeFace::PositiveX => "px",
            CubeFace::NegativeX => "nx",
            CubeFace::PositiveY => "py",
            CubeFace::NegativeY => "ny",
            CubeFace::PositiveZ => "pz",
            CubeFace::NegativeZ => "nz",
        }
    }

    /// Human-readable axis label (`+X`, `-X`, ...).
    pub fn label(self) -> &'static str {
        match self {
            CubeFace::PositiveX => "+X",
            CubeFace::NegativeX => "-X",
            CubeFace::PositiveY => "+Y",
            CubeFace::NegativeY => "-Y",
            CubeFace::PositiveZ => "+Z",
            CubeFace::NegativeZ => "-Z",
        }
    }

    /// Parses a [`suffix`](Self::suffix).
    pub fn from_suffix(suffix: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.suffix() == suffix)
    }

    /// Direction the face looks along.
    pub fn forward(self) -> Vec3 {
        match self {
            CubeFace::PositiveX => Vec3::X,
            CubeFace::NegativeX => Vec3::NEG_X,
            CubeFace::PositiveY => Vec3::Y,
            CubeFace::NegativeY => Vec3::NEG_Y,
            CubeFace::PositiveZ => Vec3::Z,
            CubeFace::NegativeZ => Vec3::NEG_Z,
        }
    }

    /// Up vector matching the GL cubemap texel layout.
    ///
    /// Cubemap faces are stored with the t axis pointing down for the side
    /// faces, hence the negative Y up vector.
    pub fn up(self) -> Vec3 {
        match self {
            CubeFace::PositiveY => Vec3::Z,
            CubeFace::NegativeY => Vec3::NEG_Z,
            _ => Vec3::NEG_Y,
        }
    }

    /// View-projection matrix rendering this face from the cube center:
    /// 90 degree field of view, square aspect.
    pub fn view_projection(self) -> Mat4 {
        let projection = Mat4::perspective_rh_gl(std::f32::consts::FRAC_PI_2, 1.0, 0.1, 10.0);
        let view = Mat4::look_at_rh(Vec3::ZERO, self.forward(), self.up());
        projection * view
    }
}

impl std::fmt::Display for CubeFace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Inverse view-projection matrices for all six faces, flattened
/// column-major for upload as a `mat4[6]` uniform.
pub fn inverse_view_projections() -> [f32; 96] {
    let mut out = [0.0; 96];
    for face in CubeFace::ALL {
        let m = face.view_projection().inverse().to_cols_array();
        out[face.index() * 16..face.index() * 16 + 16].copy_from_slice(&m);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    #[test]
    fn all_faces_are_in_gl_order() {
        for (i, face) in CubeFace::ALL.iter().enumerate() {
            assert_eq!(face.index(), i);
            assert_eq!(CubeFace::from_index(i), Some(*face));
        }
        assert_eq!(CubeFace::from_index(6), None);
    }

    #[test]
    fn gl_targets_are_consecutive() {
        assert_eq!(CubeFace::PositiveX.gl_target(), 0x8515);
        assert_eq!(CubeFace::NegativeX.gl_target(), 0x8516);
        assert_eq!(CubeFace::PositiveY.gl_target(), 0x8517);
        assert_eq!(CubeFace::NegativeY.gl_target(), 0x8518);
        assert_eq!(CubeFace::PositiveZ.gl_target(), 0x8519);
        assert_eq!(CubeFace::NegativeZ.gl_target(), 0x851A);
    }

    #[test]
    fn suffixes_are_unique_and_parse_back() {
        for face in CubeFace::ALL {
            assert_eq!(CubeFace::from_suffix(face.suffix()), Some(face));
        }
        assert_eq!(CubeFace::from_suffix("qq"), None);
    }

    #[test]
    fn face_center_projects_to_its_forward_direction() {
        let inv = inverse_view_projections();
        for face in CubeFace::ALL {
            let cols: [f32; 16] = inv[face.index() * 16..face.index() * 16 + 16]
                .try_into()
                .unwrap();
            let m = Mat4::from_cols_array(&cols);
            let p = m * Vec4::new(0.0, 0.0, 1.0, 1.0);
            let dir = (p.truncate() / p.w).normalize();
            assert!(
                dir.dot(face.forward()) > 0.999,
                "face {face}: center direction {dir} does not match {}",
                face.forward()
            );
        }
    }

    #[test]
    fn up_is_perpendicular_to_forward() {
        for face in CubeFace::ALL {
            assert_eq!(face.up().dot(face.forward()), 0.0, "face {face}");
        }
    }

    #[test]
    fn serde_uses_snake_case() {
        let json = serde_json::to_string(&CubeFace::NegativeZ).unwrap();
        assert_eq!(json, "\"negative_z\"");
    }
}
