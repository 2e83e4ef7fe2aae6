use image::RgbImage;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Destination for an annotated debug image.
pub trait ImageSink {
    fn emit(&self, image: &RgbImage) -> Result<()>;
}

/// Writes the image to a file, replacing whatever was there.
///
/// The format follows the file extension.
#[derive(Debug, Clone)]
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ImageSink for FileSink {
    fn emit(&self, image: &RgbImage) -> Result<()> {
        image.save(&self.path).map_err(|e| {
            Error::Render(format!("failed to write {}: {}", self.path.display(), e))
        })?;
        log::info!("debug image written to {}", self.path.display());
        Ok(())
    }
}

/// Write an annotated image to `path`.
pub fn persist(image: &RgbImage, path: impl AsRef<Path>) -> Result<()> {
    FileSink::new(path.as_ref()).emit(image)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn persist_overwrites_existing_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("debug.png");

        persist(&RgbImage::from_pixel(4, 4, Rgb([255, 0, 0])), &path).unwrap();
        persist(&RgbImage::from_pixel(8, 2, Rgb([0, 0, 255])), &path).unwrap();

        let written = image::open(&path).unwrap().to_rgb8();
        assert_eq!(written.dimensions(), (8, 2));
        assert_eq!(*written.get_pixel(0, 0), Rgb([0, 0, 255]));
    }

    #[test]
    fn unwritable_path_is_a_render_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("missing").join("debug.png");

        let err = persist(&RgbImage::new(2, 2), &path).unwrap_err();
        assert!(matches!(err, Error::Render(_)));
    }

    #[test]
    fn unknown_extension_is_a_render_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = persist(&RgbImage::new(2, 2), dir.path().join("debug.nope")).unwrap_err();
        assert!(matches!(err, Error::Render(_)));
    }
}
