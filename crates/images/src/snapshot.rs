//! PNG artifacts for extracted cubemap faces.
//!
//! This module is feature-gated behind `png` (default on). The pixel and
//! layout code it builds on lives in [`crate::pixel`] and [`crate::layout`].

use std::path::{Path, PathBuf};

use cubemap_core::{
    extract_cubemap_faces, CubeFace, CubemapImages, FaceImage, FaceSink, GlBackend, RenderError,
    TextureHandle,
};

use crate::face_file_name;
use crate::layout::Assembled;

/// Writes a face as an RGBA PNG.
pub fn write_face_png(image: &FaceImage, path: &Path) -> Result<(), RenderError> {
    write_rgba_png(image.width(), image.height(), image.pixels().to_vec(), path)
}

/// Writes an assembled cubemap as an RGBA PNG.
pub fn write_assembled_png(assembled: &Assembled, path: &Path) -> Result<(), RenderError> {
    write_rgba_png(
        assembled.width,
        assembled.height,
        assembled.pixels.clone(),
        path,
    )
}

fn write_rgba_png(width: u32, height: u32, rgba: Vec<u8>, path: &Path) -> Result<(), RenderError> {
    let img = image::RgbaImage::from_raw(width, height, rgba)
        .ok_or_else(|| RenderError::Io("RGBA buffer size mismatch".into()))?;
    img.save_with_format(path, image::ImageFormat::Png)
        .map_err(|e| RenderError::Io(format!("{}: {e}", path.display())))
}

/// Reads a PNG as the image of `face`.
pub fn load_face_png(path: &Path, face: CubeFace) -> Result<FaceImage, RenderError> {
    let img = image::open(path)
        .map_err(|e| RenderError::Io(format!("{}: {e}", path.display())))?
        .to_rgba8();
    let (width, height) = img.dimensions();
    FaceImage::new(face, width, height, img.into_raw())
}

/// Loads `<dir>/<prefix>_<suffix>.png` for all six faces.
pub fn load_faces(dir: &Path, prefix: &str) -> Result<CubemapImages, RenderError> {
    let faces = CubeFace::ALL
        .iter()
        .map(|&face| load_face_png(&dir.join(face_file_name(prefix, face)), face))
        .collect::<Result<Vec<_>, _>>()?;
    CubemapImages::from_faces(faces)
}

/// Face sink writing one PNG per face into a directory.
///
/// The directory is created on the first face. Files from earlier faces stay
/// on disk if a later face fails.
#[derive(Debug, Clone)]
pub struct PngDirectory {
    dir: PathBuf,
    prefix: String,
    written: Vec<PathBuf>,
}

impl PngDirectory {
    pub fn new(dir: impl Into<PathBuf>, prefix: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            prefix: prefix.into(),
            written: Vec::new(),
        }
    }

    /// Path a face is written to.
    pub fn path_for(&self, face: CubeFace) -> PathBuf {
        self.dir.join(face_file_name(&self.prefix, face))
    }

    /// Files written so far, in face order.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}

impl FaceSink for PngDirectory {
    fn accept(&mut self, image: FaceImage) -> Result<(), RenderError> {
        std::fs::create_dir_all(&self.dir)
            .map_err(|e| RenderError::Io(format!("{}: {e}", self.dir.display())))?;
        let path = self.path_for(image.face());
        write_face_png(&image, &path)?;
        tracing::info!(face = %image.face(), path = %path.display(), "wrote cubemap face");
        self.written.push(path);
        Ok(())
    }
}

/// Reads the six faces of `texture` and writes them as PNGs into `dir`.
///
/// Returns `true` only if all six files were written.
pub fn images_from_cubemap<B: GlBackend + ?Sized>(
    gl: &B,
    texture: TextureHandle,
    width: u32,
    height: u32,
    dir: &Path,
    prefix: &str,
) -> bool {
    let mut sink = PngDirectory::new(dir, prefix);
    extract_cubemap_faces(gl, texture, width, height, &mut sink)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{assemble, Layout};
    use cubemap_core::testing::MockGl;

    fn gradient(face: CubeFace, w: u32, h: u32) -> FaceImage {
        let pixels = (0..w * h)
            .flat_map(|i| [face.index() as u8 * 40, (i % 256) as u8, (i / 256) as u8, 255])
            .collect();
        FaceImage::new(face, w, h, pixels).unwrap()
    }

    #[test]
    fn sink_writes_named_files_and_they_load_back() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = PngDirectory::new(dir.path().join("faces"), "cube");

        for face in CubeFace::ALL {
            sink.accept(gradient(face, 8, 4)).unwrap();
        }

        assert_eq!(sink.written().len(), 6);
        assert!(dir.path().join("faces/cube_px.png").exists());
        assert!(dir.path().join("faces/cube_nz.png").exists());

        let loaded = load_faces(&dir.path().join("faces"), "cube").unwrap();
        assert!(loaded.is_complete());
        let nz = loaded.get(CubeFace::NegativeZ).unwrap();
        assert_eq!((nz.width(), nz.height()), (8, 4));
        assert_eq!(nz, &gradient(CubeFace::NegativeZ, 8, 4));
    }

    #[test]
    fn load_faces_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = PngDirectory::new(dir.path(), "cubemap");
        sink.accept(gradient(CubeFace::PositiveX, 2, 2)).unwrap();

        let err = load_faces(dir.path(), "cubemap").unwrap_err();
        assert!(matches!(err, RenderError::Io(_)));
        assert!(err.to_string().contains("cubemap_nx.png"), "got: {err}");
    }

    #[test]
    fn assembled_png_has_grid_dimensions() {
        let dir = tempfile::tempdir().unwrap();
        let faces = CubeFace::ALL.iter().map(|&f| gradient(f, 4, 4)).collect();
        let images = CubemapImages::from_faces(faces).unwrap();
        let assembled = assemble(&images, Layout::Cross).unwrap();
        let path = dir.path().join("cross.png");

        write_assembled_png(&assembled, &path).unwrap();

        let img = image::open(&path).unwrap().to_rgba8();
        assert_eq!(img.dimensions(), (16, 12));
    }

    #[test]
    fn write_into_missing_directory_fails_with_io() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no/such/dir/face.png");
        let err = write_face_png(&gradient(CubeFace::PositiveY, 2, 2), &path).unwrap_err();
        assert!(matches!(err, RenderError::Io(_)));
    }

    #[test]
    fn images_from_cubemap_writes_six_flipped_faces() {
        let gl = MockGl::new();
        let tex = gl.add_cubemap(4);
        let dir = tempfile::tempdir().unwrap();

        assert!(images_from_cubemap(&gl, tex, 4, 4, dir.path(), "env"));

        for face in CubeFace::ALL {
            let path = dir.path().join(face_file_name("env", face));
            assert!(path.exists(), "missing {}", path.display());
            let img = load_face_png(&path, face).unwrap();
            assert_eq!((img.width(), img.height()), (4, 4));
            // The mock stores the GL row in G; the top image row is GL row 3.
            let r = face.index() as u8 * 40;
            assert_eq!(img.pixel(0, 0), Some([r, 3, 0, 255]));
            assert_eq!(img.pixel(2, 3), Some([r, 0, 2, 255]));
        }
        assert_eq!(gl.pending_errors(), 0);
    }

    #[test]
    fn images_from_cubemap_stops_at_failing_face() {
        let gl = MockGl::new();
        let tex = gl.add_cubemap(2);
        gl.fail_read_on(CubeFace::PositiveY);
        let dir = tempfile::tempdir().unwrap();

        assert!(!images_from_cubemap(&gl, tex, 2, 2, dir.path(), "env"));

        let mut written: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().into_string().unwrap())
            .collect();
        written.sort();
        assert_eq!(written, ["env_nx.png", "env_px.png"]);
        assert_eq!(gl.pending_errors(), 0);
    }

    #[test]
    fn path_for_uses_prefix_and_suffix() {
        let sink = PngDirectory::new("/tmp/out", "env");
        assert_eq!(
            sink.path_for(CubeFace::PositiveY),
            PathBuf::from("/tmp/out/env_py.png")
        );
    }
}
