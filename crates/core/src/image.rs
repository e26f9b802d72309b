//! Host-side face images and the sink that receives them during readback.

use crate::error::RenderError;
use crate::face::CubeFace;

/// One cubemap face read back from the GPU: RGBA8, top row first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FaceImage {
    face: CubeFace,
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl FaceImage {
    /// Wraps a top-down RGBA8 buffer.
    ///
    /// Returns `InvalidDimensions` for a zero side or a buffer whose length is
    /// not `width * height * 4`.
    pub fn new(
        face: CubeFace,
        width: u32,
        height: u32,
        pixels: Vec<u8>,
    ) -> Result<Self, RenderError> {
        if width == 0 || height == 0 || pixels.len() != rgba_len(width, height) {
            return Err(RenderError::InvalidDimensions);
        }
        Ok(Self {
            face,
            width,
            height,
            pixels,
        })
    }

    /// Wraps a buffer as returned by the driver (bottom row first), flipping
    /// it into image order.
    pub fn from_gl_rows(
        face: CubeFace,
        width: u32,
        height: u32,
        mut pixels: Vec<u8>,
    ) -> Result<Self, RenderError> {
        if pixels.len() != rgba_len(width, height) {
            return Err(RenderError::InvalidDimensions);
        }
        flip_rows(&mut pixels, width as usize * 4);
        Self::new(face, width, height, pixels)
    }

    pub fn face(&self) -> CubeFace {
        self.face
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }

    /// RGBA of the pixel at column `x`, row `y` (row 0 is the top).
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = pixel_offset(self.width, x, y);
        self.pixels.get(i..i + 4)?.try_into().ok()
    }
}

/// Byte length of a tightly packed RGBA8 image.
pub fn rgba_len(width: u32, height: u32) -> usize {
    width as usize * height as usize * 4
}

/// Byte offset of pixel `(x, y)` in a tightly packed RGBA8 image `width`
/// pixels wide.
pub fn pixel_offset(width: u32, x: u32, y: u32) -> usize {
    (y as usize * width as usize + x as usize) * 4
}

/// Reverses row order in place. Applying it twice restores the buffer.
///
/// GL returns rows bottom-up; image files store them top-down. A trailing
/// partial row (length not a multiple of `stride`) is left untouched.
pub fn flip_rows(buf: &mut [u8], stride: usize) {
    if stride == 0 {
        return;
    }
    let rows = buf.len() / stride;
    for top in 0..rows / 2 {
        let bottom = rows - 1 - top;
        let (upper, lower) = buf.split_at_mut(bottom * stride);
        upper[top * stride..(top + 1) * stride].swap_with_slice(&mut lower[..stride]);
    }
}

/// Receives faces as they are read back, in [`CubeFace::ALL`] order.
///
/// A sink error halts extraction; faces already accepted are not revisited.
pub trait FaceSink {
    fn accept(&mut self, image: FaceImage) -> Result<(), RenderError>;
}

/// In-memory set of extracted faces.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CubemapImages {
    faces: Vec<FaceImage>,
}

impl CubemapImages {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a set from exactly six images, one per face, in any order.
    pub fn from_faces(mut faces: Vec<FaceImage>) -> Result<Self, RenderError> {
        faces.sort_by_key(|f| f.face().index());
        let complete = faces.len() == 6
            && faces
                .iter()
                .zip(CubeFace::ALL)
                .all(|(img, face)| img.face() == face);
        if !complete {
            return Err(RenderError::InvalidConfig(
                "expected exactly one image per cubemap face".into(),
            ));
        }
        Ok(Self { faces })
    }

    pub fn len(&self) -> usize {
        self.faces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// `true` once all six faces are present.
    pub fn is_complete(&self) -> bool {
        self.faces.len() == 6
    }

    pub fn get(&self, face: CubeFace) -> Option<&FaceImage> {
        self.faces.iter().find(|img| img.face() == face)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FaceImage> {
        self.faces.iter()
    }

    pub fn into_faces(self) -> Vec<FaceImage> {
        self.faces
    }
}

impl FaceSink for CubemapImages {
    fn accept(&mut self, image: FaceImage) -> Result<(), RenderError> {
        if self.get(image.face()).is_some() {
            return Err(RenderError::InvalidState(format!(
                "face {} already extracted",
                image.face()
            )));
        }
        self.faces.push(image);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(face: CubeFace, w: u32, h: u32) -> FaceImage {
        FaceImage::new(face, w, h, vec![face.index() as u8; rgba_len(w, h)]).unwrap()
    }

    #[test]
    fn new_rejects_wrong_buffer_length() {
        let err = FaceImage::new(CubeFace::PositiveX, 2, 2, vec![0; 15]).unwrap_err();
        assert!(matches!(err, RenderError::InvalidDimensions));
    }

    #[test]
    fn new_rejects_zero_side() {
        assert!(FaceImage::new(CubeFace::PositiveX, 0, 2, Vec::new()).is_err());
    }

    #[test]
    fn from_gl_rows_puts_bottom_row_last() {
        // Two rows: GL row 0 (bottom) is all 1s, row 1 (top) all 2s.
        let mut buf = vec![1u8; 8];
        buf.extend_from_slice(&[2u8; 8]);
        let img = FaceImage::from_gl_rows(CubeFace::PositiveZ, 2, 2, buf).unwrap();
        assert_eq!(img.pixel(0, 0), Some([2, 2, 2, 2]));
        assert_eq!(img.pixel(1, 1), Some([1, 1, 1, 1]));
        assert_eq!(img.pixel(2, 0), None);
    }

    #[test]
    fn pixel_offset_does_not_wrap_for_large_faces() {
        assert_eq!(pixel_offset(4, 1, 2), 36);
        assert_eq!(pixel_offset(32_768, 0, 32_767), 32_767 * 32_768 * 4);
        assert_eq!(
            pixel_offset(65_536, 65_535, 65_535),
            (65_536 * 65_536 - 1) * 4
        );
    }

    #[test]
    fn flip_rows_odd_row_count_keeps_middle() {
        let mut buf = vec![0, 0, 1, 1, 2, 2];
        flip_rows(&mut buf, 2);
        assert_eq!(buf, vec![2, 2, 1, 1, 0, 0]);
    }

    #[test]
    fn flip_rows_zero_stride_is_noop() {
        let mut buf = vec![1, 2, 3];
        flip_rows(&mut buf, 0);
        assert_eq!(buf, vec![1, 2, 3]);
    }

    #[test]
    fn sink_rejects_duplicate_face() {
        let mut images = CubemapImages::new();
        images.accept(solid(CubeFace::NegativeX, 1, 1)).unwrap();
        let err = images.accept(solid(CubeFace::NegativeX, 1, 1)).unwrap_err();
        assert!(matches!(err, RenderError::InvalidState(_)));
        assert_eq!(images.len(), 1);
        assert!(!images.is_complete());
    }

    #[test]
    fn from_faces_sorts_into_face_order() {
        let faces = CubeFace::ALL
            .iter()
            .rev()
            .map(|&f| solid(f, 1, 1))
            .collect();
        let images = CubemapImages::from_faces(faces).unwrap();
        let order: Vec<_> = images.iter().map(FaceImage::face).collect();
        assert_eq!(order, CubeFace::ALL.to_vec());
    }

    #[test]
    fn from_faces_rejects_missing_face() {
        let faces = CubeFace::ALL[..5].iter().map(|&f| solid(f, 1, 1)).collect();
        assert!(CubemapImages::from_faces(faces).is_err());
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn flip_rows_twice_is_identity(
                stride in 1_usize..16,
                rows in 0_usize..16,
                seed in any::<u8>(),
            ) {
                let original: Vec<u8> = (0..stride * rows)
                    .map(|i| (i as u8).wrapping_mul(31).wrapping_add(seed))
                    .collect();
                let mut buf = original.clone();
                flip_rows(&mut buf, stride);
                flip_rows(&mut buf, stride);
                prop_assert_eq!(buf, original);
            }

            #[test]
            fn flip_rows_moves_first_row_last(stride in 1_usize..8, rows in 1_usize..8) {
                let mut buf: Vec<u8> = (0..rows)
                    .flat_map(|r| std::iter::repeat(r as u8).take(stride))
                    .collect();
                flip_rows(&mut buf, stride);
                prop_assert!(buf[buf.len() - stride..].iter().all(|&b| b == 0));
                prop_assert!(buf[..stride].iter().all(|&b| b == (rows - 1) as u8));
            }
        }
    }
}
