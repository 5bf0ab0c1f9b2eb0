use std::path::Path;

use crate::shared::frame::Frame;
use crate::snapshot::domain::image_writer::ImageWriter;
use crate::snapshot::domain::snapshot_format::SnapshotFormat;

/// Encodes frames with the `image` crate (JPEG, PNG or BMP by extension).
///
/// The destination directory must already exist; a bad path is reported
/// rather than silently created.
pub struct ImageFileWriter;

impl ImageFileWriter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ImageFileWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageWriter for ImageFileWriter {
    fn write(&self, path: &Path, frame: &Frame) -> Result<(), Box<dyn std::error::Error>> {
        let format = SnapshotFormat::from_path(path)
            .ok_or_else(|| format!("Unsupported image format: {}", path.display()))?;

        let img = frame
            .to_rgb_image()
            .ok_or("Failed to create image from frame data")?;

        img.save_with_format(path, format.image_format())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn make_frame(width: u32, height: u32, r: u8, g: u8, b: u8) -> Frame {
        let mut data = Vec::with_capacity((width * height * 3) as usize);
        for _ in 0..(width * height) {
            data.push(r);
            data.push(g);
            data.push(b);
        }
        Frame::new(data, width, height, 3, 0)
    }

    #[rstest]
    #[case::jpeg("out.jpg", image::ImageFormat::Jpeg)]
    #[case::png("out.png", image::ImageFormat::Png)]
    #[case::bmp("out.BMP", image::ImageFormat::Bmp)]
    fn test_write_uses_extension_format(#[case] name: &str, #[case] expected: image::ImageFormat) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(name);
        let frame = make_frame(32, 24, 50, 100, 200);
        ImageFileWriter::new().write(&path, &frame).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(image::guess_format(&bytes).unwrap(), expected);
        let img = image::load_from_memory(&bytes).unwrap();
        assert_eq!((img.width(), img.height()), (32, 24));
    }

    #[test]
    fn test_png_roundtrip_preserves_pixels() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");
        let frame = make_frame(10, 10, 50, 100, 200);
        ImageFileWriter::new().write(&path, &frame).unwrap();

        let img = image::open(&path).unwrap().to_rgb8();
        assert_eq!(img.get_pixel(0, 0).0, [50, 100, 200]);
    }

    #[test]
    fn test_unsupported_extension_creates_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.gif");
        let frame = make_frame(4, 4, 0, 0, 0);
        assert!(ImageFileWriter::new().write(&path, &frame).is_err());
        assert!(!path.exists());
    }

    #[test]
    fn test_write_missing_directory_returns_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.png");
        let frame = make_frame(4, 4, 0, 0, 0);
        assert!(ImageFileWriter::new().write(&path, &frame).is_err());
    }
}
